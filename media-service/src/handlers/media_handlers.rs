use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{Method, StatusCode},
    Json,
};
use chrono::Utc;
use log::{info, warn};
use serde::de::DeserializeOwned;
use std::sync::Arc;

use super::MediaState;
use crate::error::{AppError, Result};
use crate::models::{
    DeleteMediaRequest, DeleteMediaResponse, ListMediaQuery, ListMediaResponse, ResourceType,
    SignUploadRequest, SignUploadResponse,
};
use crate::provider::MediaProvider;
use crate::signing::{sign_params, upload_params};

/// An empty body reads as the default request so that missing fields are
/// reported as such rather than as malformed JSON.
fn parse_body<T: DeserializeOwned + Default>(body: &Bytes) -> Result<T> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body)
        .map_err(|e| AppError::bad_request(format!("Invalid JSON body: {}", e)))
}

/// OPTIONS
/// Plain pre-flight; CORS headers are added by the router layer.
pub async fn preflight() -> StatusCode {
    StatusCode::OK
}

/// POST
/// Signs a direct upload so the browser can send the file to the host itself.
pub async fn sign_upload<P>(
    State(state): State<Arc<MediaState<P>>>,
    body: Bytes,
) -> Result<Json<SignUploadResponse>>
where
    P: MediaProvider + ?Sized + 'static,
{
    let request: SignUploadRequest = parse_body(&body)?;
    let timestamp = Utc::now().timestamp();
    let tags = request.tags.map(|t| t.into_vec()).unwrap_or_default();

    let params = upload_params(
        request.folder.as_deref(),
        &tags,
        request.transformation.as_deref(),
        timestamp,
    )?;
    let credentials = state.config.credentials()?;
    let signature = sign_params(&params, &credentials.api_secret);

    info!(
        "Signed upload for folder={}",
        params.get("folder").map(String::as_str).unwrap_or_default()
    );

    Ok(Json(SignUploadResponse {
        signature,
        timestamp,
        cloud_name: credentials.cloud_name,
        api_key: credentials.api_key,
    }))
}

/// DELETE
/// Removes one asset by public id.
pub async fn delete_media<P>(
    State(state): State<Arc<MediaState<P>>>,
    body: Bytes,
) -> Result<Json<DeleteMediaResponse>>
where
    P: MediaProvider + ?Sized + 'static,
{
    let request: DeleteMediaRequest = parse_body(&body)?;
    let public_id = request
        .public_id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| AppError::bad_request("publicId is required".to_string()))?;
    let resource_type = ResourceType::parse_optional(request.resource_type.as_deref())
        .map_err(AppError::bad_request)?;

    let credentials = state.config.credentials()?;
    let result = state
        .provider
        .destroy(&credentials, &public_id, resource_type)
        .await?;

    info!("Delete of {} finished with result={}", public_id, result.result);
    Ok(Json(result))
}

/// GET
/// Lists the assets stored under a folder.
pub async fn list_media<P>(
    State(state): State<Arc<MediaState<P>>>,
    Query(query): Query<ListMediaQuery>,
) -> Result<Json<ListMediaResponse>>
where
    P: MediaProvider + ?Sized + 'static,
{
    let folder = query
        .folder
        .filter(|f| !f.trim().is_empty())
        .ok_or_else(|| AppError::bad_request("folder query parameter is required".to_string()))?;
    let resource_type = ResourceType::parse_optional(query.resource_type.as_deref())
        .map_err(AppError::bad_request)?;

    let credentials = state.config.credentials()?;
    let resources = state
        .provider
        .list(&credentials, folder.trim(), resource_type)
        .await?;

    Ok(Json(ListMediaResponse { resources }))
}

/// Any method the endpoint does not serve.
pub async fn method_not_allowed(method: Method) -> AppError {
    warn!("Method not allowed: {}", method);
    AppError::method_not_allowed(format!("Method {} is not allowed", method))
}
