use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Request (POST /responses)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct ResponsesRequest {
    pub model: String,
    pub reasoning: Reasoning,
    pub tools: Vec<Tool>,
    pub input: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Reasoning {
    pub effort: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Tool {
    #[serde(rename = "type")]
    pub tool_type: String,
}

impl Tool {
    pub fn web_search() -> Self {
        Self {
            tool_type: "web_search".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Response envelope
// ---------------------------------------------------------------------------

/// Only the fields needed to reach the answer text; everything else is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct ResponsesEnvelope {
    #[serde(default)]
    pub output: Vec<OutputItem>,
}

/// Web search calls appear as output items without `content`.
#[derive(Debug, Clone, Deserialize)]
pub struct OutputItem {
    #[serde(default)]
    pub content: Option<Vec<ContentBlock>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContentBlock {
    #[serde(default)]
    pub text: Option<String>,
}

impl ResponsesEnvelope {
    /// Text of the first content block across all output items.
    pub fn first_text(&self) -> Option<&str> {
        self.output
            .iter()
            .filter_map(|item| item.content.as_deref())
            .flatten()
            .find_map(|block| block.text.as_deref())
    }
}
