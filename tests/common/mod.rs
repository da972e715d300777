use std::path::PathBuf;

use chrono::{NaiveDate, NaiveDateTime};
use serde_json::json;
use tempfile::TempDir;
use wiremock::ResponseTemplate;

use pick_grader::config::GraderConfig;
use pick_grader::store::WeeksStore;

pub const WEEKS_YAML: &str = r#"weeks:
  - week: 2
    total_potential: 1800
    picks:
      andy: { pick: "Bills ML", status: won, worst: false, odds: -130 }
  - week: 3
    total_potential: 2400
    picks:
      andy: { pick: "Chiefs -3.5", status: pending, worst: false, odds: -110 }
      sam: { pick: _, status: pending, worst: false, odds: "" }
      jeff: { pick: "Lions ML", status: ai_lost, worst: true, odds: "+120" }
version: 1726000000
season_label: "2025 Pick'em"
"#;

/// A temp dir holding `weeks.yml` with the given content.
pub struct DataDir {
    _dir: TempDir,
    pub path: PathBuf,
}

#[allow(dead_code)]
pub fn data_file(content: &str) -> DataDir {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("weeks.yml");
    std::fs::write(&path, content).expect("write weeks.yml");
    DataDir { _dir: dir, path }
}

#[allow(dead_code)]
pub fn store(data: &DataDir) -> WeeksStore {
    WeeksStore::new(&data.path)
}

/// Config pointed at a mock server, with an API key.
#[allow(dead_code)]
pub fn config(api_url: &str) -> GraderConfig {
    GraderConfig {
        openai_api_key: Some("sk-test".into()),
        openai_api_url: api_url.into(),
        request_timeout_secs: 1,
        ..Default::default()
    }
}

/// Sunday evening: always a grading day.
#[allow(dead_code)]
pub fn sunday_night() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 9, 21)
        .unwrap()
        .and_hms_opt(22, 0, 0)
        .unwrap()
}

/// Wednesday noon: never a grading day.
#[allow(dead_code)]
pub fn wednesday_noon() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 9, 17)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

/// A Responses API reply whose answer text is `verdict` serialized as JSON.
#[allow(dead_code)]
pub fn responses_reply(verdict: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "id": "resp_test",
        "object": "response",
        "output": [
            { "type": "web_search_call", "id": "ws_1", "status": "completed" },
            {
                "type": "message",
                "role": "assistant",
                "content": [
                    { "type": "output_text", "text": verdict.to_string(), "annotations": [] }
                ]
            }
        ]
    }))
}
