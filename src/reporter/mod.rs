//! Report-to-TestRail reconciliation
//!
//! Walks the report in order, submits one result per tagged test to a freshly
//! created run and keeps going when a single submission fails.

pub mod case;
pub mod record;

pub use case::extract_case_id;
pub use record::{DuplicatePolicy, PendingResult, ResultPlan};

use crate::error::TestRailError;
use crate::report::TestReport;
use crate::screenshot::{ScreenshotPublisher, ScreenshotResolver};
use crate::testrail::{ResultPayload, TestManagement};
use crate::utils::config::StatusCodes;
use chrono::{DateTime, Local};
use colored::Colorize;

/// Run name used when none is given, e.g. "Automated Run - 3/14/2026, 9:05:01 PM"
pub fn default_run_name(now: DateTime<Local>) -> String {
    format!("Automated Run - {}", now.format("%-m/%-d/%Y, %-I:%M:%S %p"))
}

/// A result TestRail did not accept
#[derive(Debug, Clone)]
pub struct SubmissionFailure {
    pub case_id: u64,
    pub title: String,
    pub error: String,
}

/// Outcome of one reporter invocation
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub run_id: u64,
    pub submitted: usize,
    pub untagged: usize,
    pub duplicates_dropped: usize,
    /// Tagged tests whose verdict was not "expected"
    pub failed_tests: usize,
    pub submission_failures: Vec<SubmissionFailure>,
}

impl RunSummary {
    pub fn is_success(&self) -> bool {
        self.failed_tests == 0 && self.submission_failures.is_empty()
    }

    pub fn exit_code(&self) -> i32 {
        if self.is_success() {
            0
        } else {
            1
        }
    }

    pub fn print(&self) {
        println!(
            "{} Results uploaded to TestRail (Test Run ID: {})",
            "✅".green(),
            self.run_id.to_string().cyan()
        );
        println!(
            "  Submitted: {}  Untagged: {}  Failed tests: {}",
            self.submitted, self.untagged, self.failed_tests
        );
        if self.duplicates_dropped > 0 {
            println!("  Duplicates dropped: {}", self.duplicates_dropped);
        }

        if !self.submission_failures.is_empty() {
            eprintln!(
                "{} {} result(s) could not be submitted:",
                "❌".red(),
                self.submission_failures.len()
            );
            for failure in &self.submission_failures {
                eprintln!("    C{} {}: {}", failure.case_id, failure.title, failure.error);
            }
        }
        if self.failed_tests > 0 {
            eprintln!("{} Some tests failed.", "❌".red());
        }
    }
}

/// Pushes the results of one report into a new TestRail run
pub struct Reporter<'a> {
    client: &'a dyn TestManagement,
    resolver: &'a ScreenshotResolver,
    publisher: &'a ScreenshotPublisher,
    status: StatusCodes,
    policy: DuplicatePolicy,
}

impl<'a> Reporter<'a> {
    pub fn new(
        client: &'a dyn TestManagement,
        resolver: &'a ScreenshotResolver,
        publisher: &'a ScreenshotPublisher,
        status: StatusCodes,
    ) -> Self {
        Self {
            client,
            resolver,
            publisher,
            status,
            policy: DuplicatePolicy::default(),
        }
    }

    pub fn with_duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Create the run and submit every tagged test
    ///
    /// Only run creation is fatal. Submission errors are recorded in the
    /// summary and the remaining tests are still submitted.
    pub async fn run(&self, report: &TestReport, run_name: &str) -> Result<RunSummary, TestRailError> {
        let plan = ResultPlan::from_report(report, self.policy);

        let run_id = self.client.add_run(run_name).await?;
        println!(
            "{} Created TestRail run {} ({})",
            "▶".green().bold(),
            run_id.to_string().cyan(),
            run_name
        );

        let mut summary = RunSummary {
            run_id,
            untagged: plan.untagged.len(),
            duplicates_dropped: plan.duplicates_dropped,
            ..Default::default()
        };

        for pending in &plan.results {
            if !pending.passed {
                summary.failed_tests += 1;
            }

            let payload = self.build_payload(pending).await;
            let status_text = if pending.passed {
                pending.status_text().green()
            } else {
                pending.status_text().red()
            };
            println!("    Test: {} → {}", pending.title, status_text);

            match self
                .client
                .add_result_for_case(run_id, pending.case_id, &payload)
                .await
            {
                Ok(()) => summary.submitted += 1,
                Err(e) => {
                    log::error!("Failed to submit result for C{}: {}", pending.case_id, e);
                    eprintln!(
                        "    {} Could not submit C{}: {}",
                        "⚠".yellow(),
                        pending.case_id,
                        e
                    );
                    summary.submission_failures.push(SubmissionFailure {
                        case_id: pending.case_id,
                        title: pending.title.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        Ok(summary)
    }

    async fn build_payload(&self, pending: &PendingResult) -> ResultPayload {
        let screenshot_url = match self.resolver.resolve(&pending.title) {
            Some(shot) => Some(self.publisher.publish(&shot).await.to_string()),
            None => None,
        };

        ResultPayload {
            status_id: pending.status_id(&self.status),
            comment: pending.comment(screenshot_url.as_deref()),
        }
    }
}

/// Print what would be submitted, without touching the network
pub fn print_plan(plan: &ResultPlan, resolver: &ScreenshotResolver, status: &StatusCodes) {
    for pending in &plan.results {
        let screenshot = resolver
            .resolve(&pending.title)
            .map(|s| s.name)
            .unwrap_or_else(|| "-".to_string());
        println!(
            "    C{} [{}] {} ({}) screenshot: {}",
            pending.case_id.to_string().cyan(),
            pending.status_id(status),
            pending.title,
            pending.status_text(),
            screenshot
        );
    }
    for title in &plan.untagged {
        println!("    {} {} (no case tag)", "○".dimmed(), title);
    }
    println!(
        "  {} tagged, {} untagged, {} duplicate(s) dropped",
        plan.results.len(),
        plan.untagged.len(),
        plan.duplicates_dropped
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{Outcome, Spec, Suite, TestEntry};
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeTestRail {
        submissions: Mutex<Vec<(u64, u64, ResultPayload)>>,
        failing_cases: Vec<u64>,
        fail_run: bool,
    }

    #[async_trait::async_trait]
    impl TestManagement for FakeTestRail {
        async fn add_run(&self, _name: &str) -> Result<u64, TestRailError> {
            if self.fail_run {
                return Err(TestRailError::Api {
                    endpoint: "add_run/1".to_string(),
                    status: 403,
                    body: "forbidden".to_string(),
                });
            }
            Ok(77)
        }

        async fn add_result_for_case(
            &self,
            run_id: u64,
            case_id: u64,
            result: &ResultPayload,
        ) -> Result<(), TestRailError> {
            if self.failing_cases.contains(&case_id) {
                return Err(TestRailError::Api {
                    endpoint: format!("add_result_for_case/{}/{}", run_id, case_id),
                    status: 400,
                    body: "case not in run".to_string(),
                });
            }
            self.submissions
                .lock()
                .unwrap()
                .push((run_id, case_id, result.clone()));
            Ok(())
        }
    }

    fn entry(title: &str, verdict: &str) -> TestEntry {
        TestEntry {
            title: vec![title.to_string()],
            outcome: Outcome {
                verdict: verdict.to_string(),
            },
            duration: 10.0,
            error: None,
        }
    }

    fn report(tests: Vec<TestEntry>) -> TestReport {
        TestReport {
            suites: vec![Suite {
                specs: vec![Spec { title: None, tests }],
                ..Default::default()
            }],
        }
    }

    #[test]
    fn test_default_run_name() {
        use chrono::TimeZone;
        let now = Local.with_ymd_and_hms(2026, 3, 14, 21, 5, 1).unwrap();
        assert_eq!(default_run_name(now), "Automated Run - 3/14/2026, 9:05:01 PM");
    }

    #[tokio::test]
    async fn test_pass_and_fail_are_both_submitted() {
        let dir = tempfile::tempdir().unwrap();
        let client = FakeTestRail::default();
        let resolver = ScreenshotResolver::new(dir.path());
        let publisher = ScreenshotPublisher::offline();
        let reporter = Reporter::new(&client, &resolver, &publisher, StatusCodes::default());

        let summary = reporter
            .run(
                &report(vec![
                    entry("login works @C100", "expected"),
                    entry("no tag", "unexpected"),
                    entry("logout works @C200", "unexpected"),
                ]),
                "run",
            )
            .await
            .unwrap();

        let submissions = client.submissions.lock().unwrap();
        let codes: Vec<(u64, u64, u32)> = submissions
            .iter()
            .map(|(run, case, p)| (*run, *case, p.status_id))
            .collect();
        assert_eq!(codes, vec![(77, 100, 1), (77, 200, 5)]);
        assert_eq!(summary.untagged, 1);
        assert_eq!(summary.failed_tests, 1);
        assert_eq!(summary.exit_code(), 1);
    }

    #[tokio::test]
    async fn test_all_passing_exits_zero() {
        let dir = tempfile::tempdir().unwrap();
        let client = FakeTestRail::default();
        let resolver = ScreenshotResolver::new(dir.path());
        let publisher = ScreenshotPublisher::offline();
        let reporter = Reporter::new(&client, &resolver, &publisher, StatusCodes::default());

        let summary = reporter
            .run(&report(vec![entry("a @C1", "expected"), entry("b @C2", "expected")]), "run")
            .await
            .unwrap();
        assert_eq!(summary.submitted, 2);
        assert_eq!(summary.exit_code(), 0);
    }

    #[tokio::test]
    async fn test_submission_failure_does_not_stop_the_batch() {
        let dir = tempfile::tempdir().unwrap();
        let client = FakeTestRail {
            failing_cases: vec![1],
            ..Default::default()
        };
        let resolver = ScreenshotResolver::new(dir.path());
        let publisher = ScreenshotPublisher::offline();
        let reporter = Reporter::new(&client, &resolver, &publisher, StatusCodes::default());

        let summary = reporter
            .run(&report(vec![entry("a @C1", "expected"), entry("b @C2", "expected")]), "run")
            .await
            .unwrap();
        assert_eq!(summary.submitted, 1);
        assert_eq!(summary.submission_failures.len(), 1);
        assert_eq!(summary.submission_failures[0].case_id, 1);
        assert_eq!(client.submissions.lock().unwrap()[0].1, 2);
        assert_eq!(summary.exit_code(), 1);
    }

    #[tokio::test]
    async fn test_run_creation_failure_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let client = FakeTestRail {
            fail_run: true,
            ..Default::default()
        };
        let resolver = ScreenshotResolver::new(dir.path());
        let publisher = ScreenshotPublisher::offline();
        let reporter = Reporter::new(&client, &resolver, &publisher, StatusCodes::default());

        let result = reporter.run(&report(vec![entry("a @C1", "expected")]), "run").await;
        assert!(result.is_err());
        assert!(client.submissions.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_screenshot_is_linked_in_comment() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("checkout_fails_@c9_1.png"), b"png").unwrap();
        let client = FakeTestRail::default();
        let resolver = ScreenshotResolver::new(dir.path());
        let publisher = ScreenshotPublisher::offline();
        let reporter = Reporter::new(&client, &resolver, &publisher, StatusCodes::default());

        reporter
            .run(&report(vec![entry("Checkout fails @C9", "unexpected")]), "run")
            .await
            .unwrap();

        let submissions = client.submissions.lock().unwrap();
        assert!(submissions[0]
            .2
            .comment
            .ends_with("🖼️ Screenshot: ./screenshots/checkout_fails_@c9_1.png"));
    }
}
