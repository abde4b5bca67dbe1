use std::sync::Arc;

use axum::{
    Json,
    extract::{Multipart, State, multipart::{MultipartError, MultipartRejection}},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::AppState;
use super::messages::{ConfigStatus, ErrorResponse, PromptResponse, StatusResponse};
use crate::coze::PromptOptions;
use crate::upload::ImageUpload;

const MISSING_IMAGE: &str = "No image file provided";
/// Instruction the route sends when the form has no `userQuery`.
pub const ROUTE_USER_QUERY: &str = "Generate a detailed AI image prompt for this image";
const MISSING_CONFIG: &str =
    "API configuration missing. Please set COZE_API_KEY and COZE_WORKFLOW_ID in environment variables.";

/// Fields of the inbound multipart form.
#[derive(Debug, Default)]
struct PromptForm {
    img: Option<ImageUpload>,
    prompt_type: Option<String>,
    user_query: Option<String>,
}

async fn read_form(multipart: &mut Multipart) -> Result<PromptForm, MultipartError> {
    let mut form = PromptForm::default();
    while let Some(field) = multipart.next_field().await? {
        match field.name() {
            Some("img") => {
                let file_name = field.file_name().unwrap_or("upload").to_string();
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await?;
                form.img = Some(ImageUpload {
                    file_name,
                    content_type,
                    bytes: bytes.to_vec(),
                });
            }
            Some("promptType") => form.prompt_type = Some(field.text().await?),
            Some("userQuery") => form.user_query = Some(field.text().await?),
            _ => {}
        }
    }
    Ok(form)
}

fn error_response(status: StatusCode, error: impl Into<String>, details: Option<String>) -> Response {
    let body = ErrorResponse {
        error: error.into(),
        details,
    };
    (status, Json(body)).into_response()
}

/// `POST /api/tools/image-to-prompt`
pub async fn post_image_to_prompt(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let mut multipart = match multipart {
        Ok(multipart) => multipart,
        Err(rejection) => {
            log::warn!("rejected non-multipart request: {rejection}");
            return error_response(rejection.status(), rejection.body_text(), None);
        }
    };
    let form = match read_form(&mut multipart).await {
        Ok(form) => form,
        Err(e) => {
            log::warn!("rejected malformed upload: {e}");
            return error_response(e.status(), e.body_text(), None);
        }
    };

    let Some(img) = form.img.filter(|img| !img.is_empty()) else {
        return error_response(StatusCode::BAD_REQUEST, MISSING_IMAGE, None);
    };

    if !state.client.is_configured() {
        log::error!("Coze API is not configured");
        return error_response(StatusCode::INTERNAL_SERVER_ERROR, MISSING_CONFIG, None);
    }

    let options = PromptOptions {
        model: form.prompt_type,
        user_query: form
            .user_query
            .filter(|q| !q.is_empty())
            .or_else(|| Some(ROUTE_USER_QUERY.to_string())),
    };

    match state.client.generate_prompt_from_image(img, &options).await {
        Ok(prompt) => (
            StatusCode::OK,
            Json(PromptResponse {
                success: true,
                prompt,
            }),
        )
            .into_response(),
        Err(e) => {
            log::error!("image-to-prompt failed: {e}");
            let details = (!state.server.is_production()).then(|| format!("{e:?}"));
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string(), details)
        }
    }
}

/// `GET /api/tools/image-to-prompt`
pub async fn get_status(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let configured = state.client.is_configured();
    let (status, message) = if configured {
        (ConfigStatus::Configured, "Coze API is properly configured")
    } else {
        (
            ConfigStatus::NotConfigured,
            "Please configure COZE_API_KEY and COZE_WORKFLOW_ID in environment variables",
        )
    };

    Json(StatusResponse {
        status,
        message: message.to_string(),
        demo_mode: !configured && state.server.is_development(),
        environment: state.server.environment.clone(),
    })
}
