//! Client for the Coze workflow API.
//!
//! [`CozeClient::generate_prompt_from_image`] is the whole job: upload the
//! image, run the workflow on it, wait for the run if it is asynchronous, and
//! dig the prompt out of whatever shape the result comes back in.

pub mod extract;
pub mod poll;
pub mod probe;

use std::sync::Arc;

use serde_json::{Map, Value, json};

use crate::config::CozeConfig;
use crate::consts::{DEFAULT_PROMPT_TYPE, DEFAULT_USER_QUERY, KNOWN_PROMPT_TYPES};
use crate::error::{CozeError, Result};
use crate::transport::http::HttpTransport;
use crate::transport::{ApiRequest, Transport};
use crate::upload::ImageUpload;

pub use extract::{extract_file_id, extract_prompt_from_result};
pub use poll::PollState;

/// Caller choices for one prompt generation. Empty strings count as unset.
#[derive(Debug, Clone, Default)]
pub struct PromptOptions {
    /// Prompt style, sent as `promptType`.
    pub model: Option<String>,
    pub user_query: Option<String>,
}

impl PromptOptions {
    fn model(&self) -> &str {
        non_empty(self.model.as_deref()).unwrap_or(DEFAULT_PROMPT_TYPE)
    }

    fn user_query(&self) -> &str {
        non_empty(self.user_query.as_deref()).unwrap_or(DEFAULT_USER_QUERY)
    }
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.is_empty())
}

/// Talks to one Coze workflow. Holds no per-request state, so one instance
/// can be shared across concurrent requests.
pub struct CozeClient {
    config: CozeConfig,
    transport: Arc<dyn Transport>,
}

impl CozeClient {
    pub fn new(config: CozeConfig, transport: Arc<dyn Transport>) -> Self {
        Self { config, transport }
    }

    /// A client that talks HTTP to `config.base_url`.
    pub fn http(config: CozeConfig) -> Self {
        Self::new(config, Arc::new(HttpTransport::new()))
    }

    pub fn config(&self) -> &CozeConfig {
        &self.config
    }

    pub fn is_configured(&self) -> bool {
        self.config.is_configured()
    }

    fn ensure_configured(&self) -> Result<()> {
        if self.is_configured() {
            Ok(())
        } else {
            Err(CozeError::Configuration)
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url(), path)
    }

    /// Upload a file and return the id Coze assigned to it.
    pub async fn upload_file(&self, file: ImageUpload) -> Result<String> {
        self.ensure_configured()?;

        log::info!("uploading {} ({} bytes)", file.file_name, file.len());

        let request = ApiRequest::post_file(self.url("/v1/files/upload"), &self.config.api_key, file);
        let reply = self
            .transport
            .send(request)
            .await
            .map_err(|e| CozeError::Upload(format!("{e:#}")))?;

        log::debug!("upload response status: {}", reply.status);

        if !reply.is_success() {
            log::error!("upload failed: {}", reply.body);
            return Err(CozeError::Upload(reply.body));
        }

        let body = reply
            .json()
            .map_err(|_| CozeError::Upload(format!("response is not JSON: {}", reply.body)))?;

        extract_file_id(&body)
    }

    /// Run the workflow with `parameters`, polling if the run is asynchronous.
    pub async fn run_workflow(&self, parameters: Map<String, Value>) -> Result<Value> {
        self.ensure_configured()?;

        let body = json!({
            "workflow_id": self.config.workflow_id,
            "parameters": parameters,
        });
        log::info!("running workflow {}", self.config.workflow_id);
        log::debug!("workflow request: {}", body);

        let request = ApiRequest::post_json(self.url("/v1/workflow/run"), &self.config.api_key, body);
        let reply = self
            .transport
            .send(request)
            .await
            .map_err(|e| CozeError::Workflow(format!("{e:#}")))?;

        log::debug!("workflow response status: {}", reply.status);

        if !reply.is_success() {
            log::error!("workflow call failed: {}", reply.body);
            return Err(CozeError::Workflow(format!(
                "HTTP {}: {}",
                reply.status, reply.body
            )));
        }

        let mut result = reply
            .json()
            .map_err(|_| CozeError::Workflow(format!("response is not JSON: {}", reply.body)))?;

        let code = result.get("code").and_then(Value::as_i64);
        if code != Some(0) {
            let msg = result
                .get("msg")
                .and_then(Value::as_str)
                .unwrap_or("unknown error")
                .to_string();
            return Err(CozeError::Workflow(msg));
        }

        let data = result
            .as_object_mut()
            .and_then(|obj| obj.remove("data"))
            .unwrap_or(Value::Null);

        let execute_id = data.get("execute_id").and_then(Value::as_str);
        let status = data.get("status").and_then(Value::as_str);
        if let Some(execute_id) = execute_id
            && status != Some("completed")
        {
            return self.poll_workflow_result(execute_id).await;
        }

        // The workflow usually returns its output as a JSON string in `data`.
        if let Value::String(raw) = &data
            && let Ok(parsed) = serde_json::from_str::<Value>(raw)
        {
            return Ok(parsed);
        }

        Ok(data)
    }

    /// Poll an asynchronous run at a fixed cadence until it completes,
    /// fails, or the configured number of attempts is used up.
    pub async fn poll_workflow_result(&self, execute_id: &str) -> Result<Value> {
        let poll = self.config.poll;
        let url = self.url(&format!("/v1/workflow/run/{execute_id}"));

        let mut state = PollState::Running;
        for attempt in 1..=poll.max_attempts {
            tokio::time::sleep(poll.interval).await;

            let reply = self
                .transport
                .send(ApiRequest::get(url.clone(), &self.config.api_key))
                .await;
            state = PollState::from_reply(&reply);

            log::debug!(
                "poll {}/{} for {}: {:?}",
                attempt,
                poll.max_attempts,
                execute_id,
                state
            );

            if state.is_terminal() {
                break;
            }
        }
        if state == PollState::Running {
            state = PollState::TimedOut;
        }

        match state {
            PollState::Completed(data) => Ok(data),
            PollState::Failed => Err(CozeError::WorkflowExecution {
                execute_id: execute_id.to_string(),
            }),
            PollState::Running | PollState::TimedOut => Err(CozeError::WorkflowTimeout {
                execute_id: execute_id.to_string(),
                attempts: poll.max_attempts,
            }),
        }
    }

    /// Upload `file`, run the workflow on it and return the generated prompt.
    pub async fn generate_prompt_from_image(
        &self,
        file: ImageUpload,
        options: &PromptOptions,
    ) -> Result<String> {
        let prompt_type = options.model();
        if !KNOWN_PROMPT_TYPES.contains(&prompt_type) {
            log::warn!("unknown prompt type {prompt_type:?}, passing it through");
        }

        let file_id = self.upload_file(file).await?;
        log::info!("file uploaded with id {file_id}");

        let parameters = build_parameters(&file_id, prompt_type, options.user_query());
        let result = self.run_workflow(parameters).await.inspect_err(|e| {
            log::error!("workflow execution failed: {e}");
        })?;

        extract_prompt_from_result(&result)
    }
}

/// Parameter bag the image-to-prompt workflow expects.
pub fn build_parameters(file_id: &str, prompt_type: &str, user_query: &str) -> Map<String, Value> {
    let mut parameters = Map::new();
    parameters.insert("userQuery".to_string(), json!(user_query));
    parameters.insert("img".to_string(), json!({ "file_id": file_id }));
    parameters.insert("promptType".to_string(), json!(prompt_type));
    parameters
}
