use serde_json::Value;
use std::fmt;

#[derive(Debug, Clone)]
pub struct NotifyDiagnosticsError {
    pub transport: &'static str,
    pub stage: &'static str,
    pub detail: String,
    pub raw_body: Option<String>,
    pub raw_response_json: Option<Value>,
}

impl fmt::Display for NotifyDiagnosticsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "notification error (transport={}, stage={}): {}",
            self.transport, self.stage, self.detail
        )
    }
}

impl std::error::Error for NotifyDiagnosticsError {}
