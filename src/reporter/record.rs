use super::case::extract_case_id;
use crate::report::{TestEntry, TestReport};
use crate::utils::config::StatusCodes;

/// How repeated case ids inside one report are handled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum DuplicatePolicy {
    /// Submit every occurrence; the remote history keeps them all
    #[default]
    SubmitAll,
    /// Submit only the last occurrence of each case id
    KeepLast,
}

/// A tagged test waiting to be submitted
#[derive(Debug, Clone, PartialEq)]
pub struct PendingResult {
    pub case_id: u64,
    pub title: String,
    pub passed: bool,
    pub error: Option<String>,
}

impl PendingResult {
    pub fn from_entry(entry: &TestEntry) -> Option<Self> {
        let title = entry.full_title();
        let case_id = extract_case_id(&title)?;
        Some(Self {
            case_id,
            title,
            passed: entry.passed(),
            error: entry.error.clone(),
        })
    }

    pub fn status_id(&self, codes: &StatusCodes) -> u32 {
        if self.passed {
            codes.passed
        } else {
            codes.failed
        }
    }

    pub fn status_text(&self) -> &'static str {
        if self.passed {
            "PASSED"
        } else {
            "FAILED"
        }
    }

    /// Comment attached to the TestRail result
    pub fn comment(&self, screenshot_url: Option<&str>) -> String {
        let mut comment = format!("Automated result for: {}", self.title);
        if !self.passed {
            if let Some(error) = self.error.as_deref().filter(|e| !e.is_empty()) {
                comment.push_str(&format!("\n\n❌ Error:\n{}", error));
            }
        }
        if let Some(url) = screenshot_url {
            comment.push_str(&format!("\n\n🖼️ Screenshot: {}", url));
        }
        comment
    }
}

/// Tagged tests in submission order plus what was left out
#[derive(Debug, Clone, Default)]
pub struct ResultPlan {
    pub results: Vec<PendingResult>,
    /// Titles of tests without a case tag
    pub untagged: Vec<String>,
    pub duplicates_dropped: usize,
}

impl ResultPlan {
    pub fn from_report(report: &TestReport, policy: DuplicatePolicy) -> Self {
        let mut plan = Self::default();
        for entry in report.tests() {
            match PendingResult::from_entry(entry) {
                Some(pending) => plan.results.push(pending),
                None => plan.untagged.push(entry.full_title()),
            }
        }

        if policy == DuplicatePolicy::KeepLast {
            let before = plan.results.len();
            let mut seen = std::collections::HashSet::new();
            let mut kept: Vec<PendingResult> = plan
                .results
                .into_iter()
                .rev()
                .filter(|r| seen.insert(r.case_id))
                .collect();
            kept.reverse();
            plan.duplicates_dropped = before - kept.len();
            plan.results = kept;
            if plan.duplicates_dropped > 0 {
                log::info!(
                    "Dropped {} duplicate case result(s), keeping the last occurrence",
                    plan.duplicates_dropped
                );
            }
        }

        plan
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{Outcome, Spec, Suite};

    fn entry(title: &str, verdict: &str, error: Option<&str>) -> TestEntry {
        TestEntry {
            title: title.split(" > ").map(String::from).collect(),
            outcome: Outcome {
                verdict: verdict.to_string(),
            },
            duration: 0.0,
            error: error.map(String::from),
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
    fn test_status_mapping() {
        let codes = StatusCodes::default();
        let passed = PendingResult::from_entry(&entry("a @C1", "expected", None)).unwrap();
        let failed = PendingResult::from_entry(&entry("b @C2", "unexpected", None)).unwrap();
        let flaky = PendingResult::from_entry(&entry("c @C3", "flaky", None)).unwrap();
        assert_eq!(passed.status_id(&codes), 1);
        assert_eq!(failed.status_id(&codes), 5);
        assert_eq!(flaky.status_id(&codes), 5);
        assert_eq!(failed.status_text(), "FAILED");
    }

    #[test]
    fn test_comment() {
        let failed = PendingResult::from_entry(&entry(
            "Login > bad password @C2",
            "unexpected",
            Some("Timeout 5000ms exceeded"),
        ))
        .unwrap();
        assert_eq!(
            failed.comment(Some("https://i.ibb.co/x.png")),
            "Automated result for: Login > bad password @C2\n\n❌ Error:\nTimeout 5000ms exceeded\n\n🖼️ Screenshot: https://i.ibb.co/x.png"
        );

        let passed =
            PendingResult::from_entry(&entry("Login > ok @C1", "expected", Some("ignored")))
                .unwrap();
        assert_eq!(passed.comment(None), "Automated result for: Login > ok @C1");
    }

    #[test]
    fn test_plan_skips_untagged() {
        let plan = ResultPlan::from_report(
            &report(vec![
                entry("tagged @C100", "expected", None),
                entry("untagged", "unexpected", None),
            ]),
            DuplicatePolicy::SubmitAll,
        );
        assert_eq!(plan.results.len(), 1);
        assert_eq!(plan.results[0].case_id, 100);
        assert_eq!(plan.untagged, vec!["untagged".to_string()]);
    }

    #[test]
    fn test_duplicate_policies() {
        let tests = vec![
            entry("first @C1", "unexpected", None),
            entry("other @C2", "expected", None),
            entry("retry @C1", "expected", None),
        ];

        let all = ResultPlan::from_report(&report(tests.clone()), DuplicatePolicy::SubmitAll);
        assert_eq!(all.results.len(), 3);
        assert_eq!(all.duplicates_dropped, 0);

        let last = ResultPlan::from_report(&report(tests), DuplicatePolicy::KeepLast);
        let titles: Vec<&str> = last.results.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["other @C2", "retry @C1"]);
        assert_eq!(last.duplicates_dropped, 1);
        assert!(last.results[1].passed);
    }
}
