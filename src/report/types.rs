use serde::{Deserialize, Serialize};

/// Verdict the browser engine assigns to a test that behaved as declared
pub const VERDICT_EXPECTED: &str = "expected";

/// JSON report written by the browser-automation run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TestReport {
    #[serde(default)]
    pub suites: Vec<Suite>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Suite {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub specs: Vec<Spec>,
    /// Nested `describe` blocks
    #[serde(default)]
    pub suites: Vec<Suite>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Spec {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub tests: Vec<TestEntry>,
}

/// A single test as it appears in the report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestEntry {
    /// Hierarchical title fragments, outermost first
    pub title: Vec<String>,
    pub outcome: Outcome,
    #[serde(default)]
    pub duration: f64,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Outcome {
    pub verdict: String,
}

impl TestEntry {
    /// Title fragments joined the way they are shown to humans
    pub fn full_title(&self) -> String {
        self.title.join(" > ")
    }

    pub fn passed(&self) -> bool {
        self.outcome.verdict == VERDICT_EXPECTED
    }
}

impl TestReport {
    /// All tests in report order: each suite's specs first, then its child suites
    pub fn tests(&self) -> Vec<&TestEntry> {
        let mut out = Vec::new();
        for suite in &self.suites {
            collect_suite(suite, &mut out);
        }
        out
    }
}

fn collect_suite<'a>(suite: &'a Suite, out: &mut Vec<&'a TestEntry>) {
    for spec in &suite.specs {
        out.extend(spec.tests.iter());
    }
    for child in &suite.suites {
        collect_suite(child, out);
    }
}
