//! Custom print request route handlers.
//!
//! Design files are uploaded first via the multipart `upload` endpoint, which
//! returns the stored file's name and URL; the client then attaches both to
//! its JSON quote submission.

use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use printforge_core::{Email, PrintRequestId};

use crate::error::{AppError, Result};
use crate::models::{CustomPrintRequest, NewPrintRequest};
use crate::state::AppState;

/// Body for submitting a custom print quote request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePrintRequestPayload {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub material: Option<String>,
    /// Defaults to 1.
    pub quantity: Option<i32>,
    pub size: Option<String>,
    pub color: Option<String>,
    pub project_description: String,
    pub file_name: Option<String>,
    pub file_url: Option<String>,
}

/// Response for a stored design file upload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub file_name: String,
    pub file_url: String,
}

impl CreatePrintRequestPayload {
    fn validate(self) -> std::result::Result<NewPrintRequest, Vec<String>> {
        let mut errors = Vec::new();

        if self.name.trim().is_empty() {
            errors.push("name must not be empty".to_owned());
        }
        if self.phone.trim().is_empty() {
            errors.push("phone must not be empty".to_owned());
        }

        let email = match Email::parse(&self.email) {
            Ok(email) => Some(email),
            Err(err) => {
                errors.push(format!("email: {err}"));
                None
            }
        };

        let quantity = self.quantity.unwrap_or(1);
        if quantity < 1 {
            errors.push("quantity must be at least 1".to_owned());
        }

        if self.project_description.trim().chars().count() < 10 {
            errors.push("projectDescription must be at least 10 characters".to_owned());
        }

        match (email, errors.is_empty()) {
            (Some(email), true) => Ok(NewPrintRequest {
                name: self.name,
                email,
                phone: self.phone,
                material: self.material,
                quantity,
                size: self.size,
                color: self.color,
                project_description: self.project_description,
                file_name: self.file_name,
                file_url: self.file_url,
            }),
            _ => Err(errors),
        }
    }
}

/// `POST /api/custom-print-requests` — submit a quote request.
#[instrument(skip_all)]
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<CreatePrintRequestPayload>,
) -> Result<(StatusCode, Json<CustomPrintRequest>)> {
    let new = payload
        .validate()
        .map_err(|errors| AppError::validation("Invalid print request data", errors))?;

    let request = state.storage().create_print_request(new).await?;
    tracing::info!(request_id = %request.id, "Print request submitted");

    Ok((StatusCode::CREATED, Json(request)))
}

/// `POST /api/custom-print-requests/upload` — store a design file.
///
/// Expects a multipart body with a `file` part. Returns the original file
/// name and the public URL the file is served under.
#[instrument(skip_all)]
pub async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| AppError::BadRequest(format!("Invalid multipart body: {err}")))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field
            .file_name()
            .map(ToOwned::to_owned)
            .ok_or_else(|| AppError::BadRequest("Upload is missing a file name".to_owned()))?;
        let bytes = field
            .bytes()
            .await
            .map_err(|err| AppError::BadRequest(format!("Failed to read upload: {err}")))?;

        let stored = state.uploads().store(&file_name, &bytes).await?;
        tracing::info!(file_url = %stored.file_url, "Design file stored");

        return Ok(Json(UploadResponse {
            file_name: stored.file_name,
            file_url: stored.file_url,
        }));
    }

    Err(AppError::BadRequest(
        "Multipart body has no file part".to_owned(),
    ))
}

/// `GET /api/custom-print-requests` — list all quote requests.
#[instrument(skip_all)]
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<CustomPrintRequest>>> {
    let requests = state.storage().list_print_requests().await?;
    Ok(Json(requests))
}

/// `GET /api/custom-print-requests/{id}` — quote request detail.
#[instrument(skip_all)]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CustomPrintRequest>> {
    let id: PrintRequestId = id
        .parse()
        .map_err(|_| AppError::BadRequest("Invalid print request id".to_owned()))?;

    let request = state
        .storage()
        .get_print_request(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Print request".to_owned()))?;

    Ok(Json(request))
}
