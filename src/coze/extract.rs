//! Pulling file ids and prompt text out of Coze responses.

use serde_json::Value;

use super::probe::{Probe, code_is_zero, first_match};
use crate::error::{CozeError, Result};

/// Where an upload response may carry the file id, most likely first.
pub const FILE_ID_PROBES: &[Probe] = &[
    Probe::when("data.id", code_is_zero, "/data/id"),
    Probe::when("data.file_info.id", code_is_zero, "/data/file_info/id"),
    Probe::at("id", "/id"),
    Probe::at("file_id", "/file_id"),
];

/// Output fields set by the workflow itself. `outpu2` is misspelled by the
/// workflow and has to stay.
pub const PROMPT_PROBES: &[Probe] = &[
    Probe::at("output1", "/output1"),
    Probe::at("outpu2", "/outpu2"),
    Probe::at("output2", "/output2"),
    Probe::at("output", "/output"),
];

/// Older or wrapped result shapes, checked against the unparsed result.
pub const FALLBACK_PROMPT_PROBES: &[Probe] = &[
    Probe::at("output.prompt", "/output/prompt"),
    Probe::at("result.prompt", "/result/prompt"),
    Probe::at("data.prompt", "/data/prompt"),
    Probe::at("data.output", "/data/output"),
    Probe::at("data.result", "/data/result"),
    Probe::at("prompt", "/prompt"),
    Probe::at("text", "/text"),
    Probe::at("message", "/message"),
];

/// File id from an upload response body.
pub fn extract_file_id(response: &Value) -> Result<String> {
    match first_match(FILE_ID_PROBES, response) {
        Some(hit) => {
            log::debug!("file id found at {}", hit.probe);
            Ok(hit.value.to_string())
        }
        None => {
            log::error!("unexpected upload response format: {}", response);
            Err(CozeError::Upload(format!(
                "no file id found in response. Response: {}",
                response
            )))
        }
    }
}

/// Prompt text from a workflow result.
///
/// A string result is parsed as JSON first. The workflow's own output fields
/// are probed on the parsed value; the fallback shapes on the result as
/// given, so a string result that fails to parse never matches.
pub fn extract_prompt_from_result(result: &Value) -> Result<String> {
    let parsed = match result {
        Value::String(raw) => serde_json::from_str::<Value>(raw).ok(),
        _ => None,
    };
    let data = parsed.as_ref().unwrap_or(result);

    let hit = first_match(PROMPT_PROBES, data).or_else(|| first_match(FALLBACK_PROMPT_PROBES, result));

    match hit {
        Some(hit) => {
            log::info!("prompt extracted from {} ({} chars)", hit.probe, hit.value.len());
            Ok(hit.value.to_string())
        }
        None => {
            log::error!("could not find prompt in result: {}", result);
            Err(CozeError::NoPromptFound {
                keys: top_level_keys(result),
            })
        }
    }
}

fn top_level_keys(value: &Value) -> Vec<String> {
    value
        .as_object()
        .map(|obj| obj.keys().cloned().collect())
        .unwrap_or_default()
}
