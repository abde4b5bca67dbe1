use serde::{Deserialize, Serialize};

/// Body of a successful image-to-prompt call.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PromptResponse {
    pub success: bool,
    pub prompt: String,
}

/// Body of any failed call.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigStatus {
    Configured,
    NotConfigured,
}

/// Body of `GET /api/tools/image-to-prompt`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StatusResponse {
    pub status: ConfigStatus,
    pub message: String,
    pub demo_mode: bool,
    pub environment: String,
}
