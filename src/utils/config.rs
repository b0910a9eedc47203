use crate::error::ConfigError;

/// Default job name used to build CI artifact URLs
pub const DEFAULT_JOB_NAME: &str = "playwright-demo-framework";

/// Status id TestRail uses for a passed result
pub const DEFAULT_STATUS_PASSED: u32 = 1;

/// Status id TestRail uses for a failed result
pub const DEFAULT_STATUS_FAILED: u32 = 5;

/// Reporter configuration, built once at startup and handed to constructors
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub testrail: TestRailConfig,

    /// Status ids written for passed/failed tests
    pub status: StatusCodes,

    /// CI artifact settings, present only when running inside CI
    pub ci: Option<CiConfig>,

    /// API key for the image host; uploads are disabled without it
    pub imgbb_api_key: Option<String>,
}

/// Connection settings for the TestRail API
#[derive(Debug, Clone, PartialEq)]
pub struct TestRailConfig {
    /// Base URL, e.g. "https://example.testrail.io" (no trailing slash)
    pub host: String,
    pub user: String,
    pub api_key: String,
    pub project_id: u64,
    pub suite_id: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusCodes {
    pub passed: u32,
    pub failed: u32,
}

impl StatusCodes {
    /// Status ids from the process environment, defaults where unset
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Status ids through an arbitrary key lookup; needs no TestRail credentials
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let code = |key: &'static str, default: u32| match non_empty(&lookup, key) {
            Some(v) => parse_number(key, &v),
            None => Ok(default),
        };

        Ok(Self {
            passed: code("TESTRAIL_STATUS_PASSED", DEFAULT_STATUS_PASSED)?,
            failed: code("TESTRAIL_STATUS_FAILED", DEFAULT_STATUS_FAILED)?,
        })
    }
}

impl Default for StatusCodes {
    fn default() -> Self {
        Self {
            passed: DEFAULT_STATUS_PASSED,
            failed: DEFAULT_STATUS_FAILED,
        }
    }
}

/// Jenkins-style CI context
#[derive(Debug, Clone, PartialEq)]
pub struct CiConfig {
    pub base_url: String,
    pub job_name: String,
    /// Numeric build identifier; artifact URLs need it
    pub build_number: Option<u64>,
}

impl CiConfig {
    /// Artifact URL for a screenshot archived by this build, if one can be built
    pub fn artifact_url(&self, screenshot_name: &str) -> Option<String> {
        self.build_number.map(|build| {
            format!(
                "{}/job/{}/{}/artifact/screenshots/{}",
                self.base_url, self.job_name, build, screenshot_name
            )
        })
    }
}

impl Config {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| non_empty(&lookup, key);
        let required = |key: &'static str| get(key).ok_or(ConfigError::Missing(key));

        let testrail = TestRailConfig {
            host: trim_url(&required("TESTRAIL_HOST")?),
            user: required("TESTRAIL_USER")?,
            api_key: required("TESTRAIL_API_KEY")?,
            project_id: parse_number("TESTRAIL_PROJECT_ID", &required("TESTRAIL_PROJECT_ID")?)?,
            suite_id: parse_number("TESTRAIL_SUITE_ID", &required("TESTRAIL_SUITE_ID")?)?,
        };

        let status = StatusCodes::from_lookup(&lookup)?;

        let ci = get("JENKINS_BASE_URL").map(|base| {
            let build_number = get("BUILD_NUMBER").and_then(|raw| match raw.parse::<u64>() {
                Ok(n) => Some(n),
                Err(_) => {
                    log::warn!("Ignoring non-numeric BUILD_NUMBER '{}'", raw);
                    None
                }
            });
            CiConfig {
                base_url: trim_url(&base),
                job_name: get("JENKINS_JOB_NAME").unwrap_or_else(|| DEFAULT_JOB_NAME.to_string()),
                build_number,
            }
        });

        Ok(Self {
            testrail,
            status,
            ci,
            imgbb_api_key: get("IMGBB_API_KEY"),
        })
    }
}

fn non_empty<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn trim_url(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}

fn parse_number<T: std::str::FromStr>(name: &'static str, value: &str) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    value.parse::<T>().map_err(|e| ConfigError::Invalid {
        name,
        value: value.to_string(),
        reason: e.to_string(),
    })
}
