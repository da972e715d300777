use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Outcome the model reported for one pick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerdictResult {
    Won,
    Lost,
    /// The game has not finished yet.
    Pending,
    /// Anything else, including transport and parse failures. Leaves the pick untouched.
    Undetermined(String),
}

impl VerdictResult {
    fn from_json(value: &Value) -> Self {
        match value {
            Value::Bool(true) => VerdictResult::Won,
            Value::Bool(false) => VerdictResult::Lost,
            Value::String(s) => match s.trim().to_lowercase().as_str() {
                "true" => VerdictResult::Won,
                "false" => VerdictResult::Lost,
                "pending" => VerdictResult::Pending,
                _ => VerdictResult::Undetermined(s.clone()),
            },
            other => VerdictResult::Undetermined(other.to_string()),
        }
    }
}

impl fmt::Display for VerdictResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VerdictResult::Won => f.write_str("won"),
            VerdictResult::Lost => f.write_str("lost"),
            VerdictResult::Pending => f.write_str("pending"),
            VerdictResult::Undetermined(raw) => write!(f, "undetermined ({raw})"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub result: VerdictResult,
    pub rationale: String,
}

#[derive(Debug, Error)]
pub enum VerdictParseError {
    #[error("verdict is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("verdict is not a JSON object")]
    NotAnObject,

    #[error("verdict is missing field `{0}`")]
    MissingField(&'static str),
}

impl Verdict {
    /// Parse the model's answer text, e.g. `{"result": true, "rationale": "..."}`.
    ///
    /// Markdown code fences around the object are tolerated.
    pub fn parse(text: &str) -> Result<Self, VerdictParseError> {
        let value: Value = serde_json::from_str(strip_code_fence(text))?;
        let obj = value.as_object().ok_or(VerdictParseError::NotAnObject)?;

        let result = obj
            .get("result")
            .ok_or(VerdictParseError::MissingField("result"))?;
        let rationale = match obj.get("rationale") {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) | None => return Err(VerdictParseError::MissingField("rationale")),
            Some(other) => other.to_string(),
        };

        Ok(Self {
            result: VerdictResult::from_json(result),
            rationale,
        })
    }
}

fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop an optional language tag on the opening fence line.
    let body = rest.split_once('\n').map_or(rest, |(_, body)| body);
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}
