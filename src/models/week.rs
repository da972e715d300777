use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_yaml::{Mapping, Value};

use super::PickStatus;

/// Placeholder stored in `pick` until a participant submits a wager.
pub const NO_PICK: &str = "_";

// ---------------------------------------------------------------------------
// WeeksDocument: the whole data file
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeeksDocument {
    #[serde(default)]
    pub weeks: Vec<Week>,
    /// Unix timestamp of the last save.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,
    /// Top-level keys this tool does not know about, written back untouched.
    #[serde(flatten)]
    pub extra: Mapping,
}

impl WeeksDocument {
    /// The week with the highest number.
    pub fn current_week(&self) -> Option<&Week> {
        self.weeks.iter().max_by_key(|w| w.week)
    }

    pub fn current_week_mut(&mut self) -> Option<&mut Week> {
        self.weeks.iter_mut().max_by_key(|w| w.week)
    }

    pub fn week(&self, number: u32) -> Option<&Week> {
        self.weeks.iter().find(|w| w.week == number)
    }

    pub fn week_mut(&mut self, number: u32) -> Option<&mut Week> {
        self.weeks.iter_mut().find(|w| w.week == number)
    }

    /// First week number that appears more than once, if any.
    pub fn duplicate_week(&self) -> Option<u32> {
        let mut seen = std::collections::HashSet::new();
        self.weeks
            .iter()
            .map(|w| w.week)
            .find(|number| !seen.insert(*number))
    }
}

// ---------------------------------------------------------------------------
// Week
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Week {
    pub week: u32,
    /// Maintained by hand; the grader never recomputes it.
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub total_potential: Option<Value>,
    /// Participant name -> pick, in file order.
    #[serde(default)]
    pub picks: IndexMap<String, Pick>,
    #[serde(flatten)]
    pub extra: Mapping,
}

impl Week {
    /// A fresh week with an empty pick for every given participant.
    pub fn blank<I, S>(number: u32, participants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            week: number,
            total_potential: Some(Value::Number(0.into())),
            picks: participants
                .into_iter()
                .map(|name| (name.into(), Pick::blank()))
                .collect(),
            extra: Mapping::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Pick
// ---------------------------------------------------------------------------

/// `worst` and `odds` are hand-kept columns. They hold whatever scalar the
/// file has, an explicit `null` included, and are written back as read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pick {
    #[serde(default = "no_pick")]
    pub pick: String,
    #[serde(default)]
    pub status: PickStatus,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub worst: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub odds: Option<Value>,
    #[serde(flatten)]
    pub extra: Mapping,
}

fn no_pick() -> String {
    NO_PICK.to_string()
}

/// Only a missing key is `None`; `key:` with no value stays `Some(Value::Null)`.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl Pick {
    pub fn blank() -> Self {
        Self {
            pick: no_pick(),
            status: PickStatus::Pending,
            worst: Some(Value::Bool(false)),
            odds: Some(Value::String(String::new())),
            extra: Mapping::new(),
        }
    }

    pub fn is_made(&self) -> bool {
        self.pick.trim() != NO_PICK
    }

    /// Only a literal `true` marks the worst pick.
    pub fn is_worst(&self) -> bool {
        self.worst.as_ref().and_then(Value::as_bool).unwrap_or(false)
    }

    /// Odds as they read in the file, empty when absent or null.
    pub fn odds_label(&self) -> String {
        match &self.odds {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::Bool(b)) => b.to_string(),
            Some(other) => serde_yaml::to_string(other)
                .map(|s| s.trim_end().to_string())
                .unwrap_or_default(),
        }
    }
}

/// Odds typed on the command line: plain integers stay numeric, `+150` stays text.
pub fn parse_odds(raw: &str) -> Value {
    let trimmed = raw.trim();
    match trimmed.parse::<i64>() {
        Ok(n) if !trimmed.starts_with('+') => Value::Number(n.into()),
        _ => Value::String(raw.to_string()),
    }
}
