use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::store::DEFAULT_DATA_FILE;

const DEFAULT_API_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-5";
const DEFAULT_REASONING_EFFORT: &str = "low";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_SEASON: u32 = 2025;
/// ESPN season type 2 is the regular season.
const DEFAULT_SEASON_TYPE: u32 = 2;

/// Environment variables checked for the API key, in order.
pub const API_KEY_VARS: [&str; 2] = ["OPENAI_KEY", "OPENAI_API_KEY"];

#[derive(Debug, Clone)]
pub struct GraderConfig {
    pub data_file: PathBuf,

    // Completion API (key optional, grading is skipped without it)
    pub openai_api_key: Option<String>,
    pub openai_api_url: String,
    pub openai_model: String,
    pub reasoning_effort: String,
    pub request_timeout_secs: u64,

    // Scoreboard reference embedded in the prompt
    pub season: u32,
    pub season_type: u32,

    pub metrics_file: Option<PathBuf>,
}

impl Default for GraderConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            openai_api_key: None,
            openai_api_url: DEFAULT_API_URL.into(),
            openai_model: DEFAULT_MODEL.into(),
            reasoning_effort: DEFAULT_REASONING_EFFORT.into(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            season: DEFAULT_SEASON,
            season_type: DEFAULT_SEASON_TYPE,
            metrics_file: None,
        }
    }
}

impl GraderConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            data_file: env::var("WEEKS_DATA_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| DEFAULT_DATA_FILE.into()),

            openai_api_key: first_non_blank(API_KEY_VARS.iter().map(|name| env::var(name).ok())),
            openai_api_url: env::var("OPENAI_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.into()),
            openai_model: env::var("OPENAI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.into()),
            reasoning_effort: env::var("OPENAI_REASONING_EFFORT")
                .unwrap_or_else(|_| DEFAULT_REASONING_EFFORT.into()),
            request_timeout_secs: parse_var(
                "OPENAI_TIMEOUT_SECS",
                env::var("OPENAI_TIMEOUT_SECS").ok(),
                DEFAULT_TIMEOUT_SECS,
                "a whole number of seconds",
            )?,

            season: parse_var(
                "NFL_SEASON",
                env::var("NFL_SEASON").ok(),
                DEFAULT_SEASON,
                "a year, e.g. 2025",
            )?,
            season_type: parse_var(
                "NFL_SEASON_TYPE",
                env::var("NFL_SEASON_TYPE").ok(),
                DEFAULT_SEASON_TYPE,
                "an ESPN season type, e.g. 2",
            )?,

            metrics_file: env::var("GRADER_METRICS_FILE")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from),
        })
    }

    /// Returns true if an API key is configured.
    pub fn has_api_key(&self) -> bool {
        self.openai_api_key.is_some()
    }

    /// ESPN scoreboard page for the given week, referenced in the grading prompt.
    pub fn scoreboard_url(&self, week: u32) -> String {
        format!(
            "https://www.espn.com/nfl/scoreboard/_/week/{week}/year/{}/seasontype/{}",
            self.season, self.season_type
        )
    }
}

/// Unset or blank uses the default; anything else must parse.
fn parse_var<T: FromStr>(
    name: &str,
    raw: Option<String>,
    default: T,
    expected: &str,
) -> anyhow::Result<T> {
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(default),
        Some(value) => value
            .parse()
            .map_err(|_| anyhow::anyhow!("{name} must be {expected}, got {value:?}")),
    }
}

/// Blank values count as unset.
fn first_non_blank<I>(values: I) -> Option<String>
where
    I: IntoIterator<Item = Option<String>>,
{
    values
        .into_iter()
        .flatten()
        .map(|v| v.trim().to_string())
        .find(|v| !v.is_empty())
}
