use thiserror::Error;

/// Everything that can go wrong while turning an image into a prompt.
#[derive(Debug, Error)]
pub enum CozeError {
    /// API key or workflow id missing. Never retried.
    #[error("Coze API is not properly configured")]
    Configuration,

    /// Upload failed or returned a response with no recognizable file id.
    #[error("failed to upload file: {0}")]
    Upload(String),

    /// The workflow call failed or the service reported a non-zero code.
    #[error("workflow execution failed: {0}")]
    Workflow(String),

    /// A polled run reached status `failed`.
    #[error("workflow execution failed (execute id {execute_id})")]
    WorkflowExecution { execute_id: String },

    /// A polled run never reached a terminal status.
    #[error("workflow execution timeout after {attempts} attempts (execute id {execute_id})")]
    WorkflowTimeout { execute_id: String, attempts: u32 },

    /// The workflow succeeded but no prompt text could be found.
    #[error("no prompt found in workflow result. Available keys: {}", .keys.join(", "))]
    NoPromptFound { keys: Vec<String> },
}

pub type Result<T> = std::result::Result<T, CozeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_prompt_found_lists_keys() {
        let err = CozeError::NoPromptFound {
            keys: vec!["a".to_string(), "b".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "no prompt found in workflow result. Available keys: a, b"
        );
    }

    #[test]
    fn no_prompt_found_with_empty_keys() {
        let err = CozeError::NoPromptFound { keys: vec![] };
        assert!(err.to_string().ends_with("Available keys: "));
    }

    #[test]
    fn workflow_error_carries_remote_message() {
        let err = CozeError::Workflow("bad input".to_string());
        assert!(err.to_string().contains("bad input"));
    }

    #[test]
    fn timeout_reports_attempts() {
        let err = CozeError::WorkflowTimeout {
            execute_id: "e1".to_string(),
            attempts: 30,
        };
        let msg = err.to_string();
        assert!(msg.contains("timeout"));
        assert!(msg.contains("30"));
        assert!(msg.contains("e1"));
    }
}
