pub mod http;
pub mod mock;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

use crate::upload::ImageUpload;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// Request body variants the Coze API uses.
#[derive(Debug, Clone)]
pub enum Payload {
    Empty,
    Json(Value),
    /// Multipart form with a single `file` field.
    File(ImageUpload),
}

/// One outbound call to the workflow provider.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub url: String,
    /// Sent as `Authorization: Bearer <token>`.
    pub bearer: String,
    pub payload: Payload,
}

impl ApiRequest {
    pub fn get(url: String, bearer: &str) -> Self {
        Self {
            method: Method::Get,
            url,
            bearer: bearer.to_string(),
            payload: Payload::Empty,
        }
    }

    pub fn post_json(url: String, bearer: &str, body: Value) -> Self {
        Self {
            method: Method::Post,
            url,
            bearer: bearer.to_string(),
            payload: Payload::Json(body),
        }
    }

    pub fn post_file(url: String, bearer: &str, file: ImageUpload) -> Self {
        Self {
            method: Method::Post,
            url,
            bearer: bearer.to_string(),
            payload: Payload::File(file),
        }
    }
}

/// Status and raw body of a completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiReply {
    pub status: u16,
    pub body: String,
}

impl ApiReply {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// A 200 reply carrying the given JSON document.
    pub fn ok(body: Value) -> Self {
        Self::new(200, body.to_string())
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn json(&self) -> serde_json::Result<Value> {
        serde_json::from_str(&self.body)
    }
}

/// Moves requests to the workflow provider. An `Err` means no HTTP response
/// was received at all; non-2xx replies come back as `Ok`.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> Result<ApiReply>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reply_success_range() {
        assert!(ApiReply::new(200, "").is_success());
        assert!(ApiReply::new(204, "").is_success());
        assert!(!ApiReply::new(302, "").is_success());
        assert!(!ApiReply::new(500, "").is_success());
    }

    #[test]
    fn ok_reply_round_trips_json() {
        let reply = ApiReply::ok(json!({"code": 0}));
        assert_eq!(reply.status, 200);
        assert_eq!(reply.json().unwrap()["code"], 0);
    }

    #[test]
    fn non_json_body_fails_to_parse() {
        assert!(ApiReply::new(200, "<html>").json().is_err());
    }

    #[test]
    fn request_constructors_set_method_and_payload() {
        let get = ApiRequest::get("http://x/run/1".to_string(), "k");
        assert_eq!(get.method, Method::Get);
        assert!(matches!(get.payload, Payload::Empty));

        let post = ApiRequest::post_json("http://x/run".to_string(), "k", json!({}));
        assert_eq!(post.method, Method::Post);
        assert_eq!(post.bearer, "k");
        assert!(matches!(post.payload, Payload::Json(_)));
    }
}
