pub mod client;
pub mod types;

pub use client::{grading_prompt, ResponsesClient, VerdictError, VerdictRequester};
pub use types::{ResponsesEnvelope, ResponsesRequest};
