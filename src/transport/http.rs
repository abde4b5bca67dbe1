use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};

use super::{ApiReply, ApiRequest, Method, Payload, Transport};

/// The real transport, backed by a shared reqwest client.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiReply> {
        let mut req = match request.method {
            Method::Get => self.client.get(&request.url),
            Method::Post => self.client.post(&request.url),
        }
        .bearer_auth(&request.bearer);

        req = match request.payload {
            Payload::Empty => req,
            // .json() also sets Content-Type: application/json
            Payload::Json(body) => req.json(&body),
            Payload::File(file) => {
                let mime = file.mime();
                let part = Part::bytes(file.bytes)
                    .file_name(file.file_name)
                    .mime_str(&mime)
                    .with_context(|| format!("invalid content type: {mime}"))?;
                req.multipart(Form::new().part("file", part))
            }
        };

        let resp = req
            .send()
            .await
            .with_context(|| format!("request to {} failed", request.url))?;
        let status = resp.status().as_u16();
        let body = resp
            .text()
            .await
            .with_context(|| format!("failed to read response body from {}", request.url))?;

        log::debug!("{} -> {}", request.url, status);

        Ok(ApiReply { status, body })
    }
}
