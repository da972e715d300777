pub mod verdict;
pub mod week;

pub use verdict::{Verdict, VerdictParseError, VerdictResult};
pub use week::{parse_odds, Pick, Week, WeeksDocument, NO_PICK};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// PickStatus
// ---------------------------------------------------------------------------

/// Grading state of a single pick.
///
/// `Won`/`Lost` are set by hand in the data file, `AiWon`/`AiLost` by the
/// grader. All four are final.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PickStatus {
    #[default]
    Pending,
    Won,
    #[serde(alias = "loss")]
    Lost,
    AiWon,
    AiLost,
}

impl PickStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PickStatus::Pending => "pending",
            PickStatus::Won => "won",
            PickStatus::Lost => "lost",
            PickStatus::AiWon => "ai_won",
            PickStatus::AiLost => "ai_lost",
        }
    }

    /// True once a human or the grader has settled the pick.
    pub fn is_final(&self) -> bool {
        !matches!(self, PickStatus::Pending)
    }
}

impl fmt::Display for PickStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PickStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(PickStatus::Pending),
            "won" => Ok(PickStatus::Won),
            "lost" | "loss" => Ok(PickStatus::Lost),
            "ai_won" => Ok(PickStatus::AiWon),
            "ai_lost" => Ok(PickStatus::AiLost),
            other => Err(format!("unknown pick status: {other}")),
        }
    }
}
