//! State of an asynchronous workflow run between polls.

use anyhow::Result;
use serde_json::Value;

use crate::transport::ApiReply;

/// Where a run stands after one poll.
#[derive(Debug, Clone, PartialEq)]
pub enum PollState {
    /// Not finished, or the poll itself failed. Poll again.
    Running,
    /// Finished; carries the run's `data` object.
    Completed(Value),
    /// The run reported `failed`.
    Failed,
    /// Attempts ran out while still running.
    TimedOut,
}

impl PollState {
    /// Classify one poll outcome. Transport errors, non-2xx replies and
    /// unreadable bodies all count as still running.
    pub fn from_reply(reply: &Result<ApiReply>) -> Self {
        let reply = match reply {
            Ok(reply) if reply.is_success() => reply,
            Ok(reply) => {
                log::warn!("poll returned HTTP {}, retrying", reply.status);
                return PollState::Running;
            }
            Err(e) => {
                log::warn!("poll failed: {e:#}, retrying");
                return PollState::Running;
            }
        };

        let Ok(mut body) = reply.json() else {
            log::warn!("poll returned a non-JSON body, retrying");
            return PollState::Running;
        };

        let status = body
            .pointer("/data/status")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        match status.as_str() {
            "completed" => PollState::Completed(body["data"].take()),
            "failed" => PollState::Failed,
            _ => PollState::Running,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, PollState::Running)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn completed_carries_data() {
        let reply = Ok(ApiReply::ok(json!({
            "code": 0,
            "data": {"execute_id": "e1", "status": "completed", "output": "done"}
        })));
        match PollState::from_reply(&reply) {
            PollState::Completed(data) => {
                assert_eq!(data["output"], "done");
                assert_eq!(data["execute_id"], "e1");
            }
            other => panic!("expected Completed, got {other:?}"),
        }
    }

    #[test]
    fn failed_status() {
        let reply = Ok(ApiReply::ok(json!({"data": {"status": "failed"}})));
        assert_eq!(PollState::from_reply(&reply), PollState::Failed);
    }

    #[test]
    fn running_and_unknown_statuses_keep_running() {
        for status in ["running", "queued", ""] {
            let reply = Ok(ApiReply::ok(json!({"data": {"status": status}})));
            assert_eq!(PollState::from_reply(&reply), PollState::Running);
        }
        let reply = Ok(ApiReply::ok(json!({"code": 0})));
        assert_eq!(PollState::from_reply(&reply), PollState::Running);
    }

    #[test]
    fn transport_error_keeps_running() {
        let reply = Err(anyhow::anyhow!("connection refused"));
        assert_eq!(PollState::from_reply(&reply), PollState::Running);
    }

    #[test]
    fn http_error_keeps_running() {
        let reply = Ok(ApiReply::new(502, "bad gateway"));
        assert_eq!(PollState::from_reply(&reply), PollState::Running);
    }

    #[test]
    fn garbage_body_keeps_running() {
        let reply = Ok(ApiReply::new(200, "not json"));
        assert_eq!(PollState::from_reply(&reply), PollState::Running);
    }

    #[test]
    fn terminal_states() {
        assert!(!PollState::Running.is_terminal());
        assert!(PollState::Completed(Value::Null).is_terminal());
        assert!(PollState::Failed.is_terminal());
        assert!(PollState::TimedOut.is_terminal());
    }
}
