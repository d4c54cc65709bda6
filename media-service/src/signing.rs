//! Request signing for the media host.
//!
//! The host verifies a signature computed over the upload parameters: every
//! non-empty parameter is sorted by name, joined as `name=value` pairs with
//! `&`, the API secret is appended and the result is hashed with SHA-256.

use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SigningError {
    #[error("folder is required")]
    MissingFolder,

    #[error("parameter '{0}' must not contain '&' or '='")]
    ReservedCharacter(String),
}

pub type Params = BTreeMap<String, String>;

pub fn string_to_sign(params: &Params) -> String {
    params
        .iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(name, value)| format!("{}={}", name, value))
        .collect::<Vec<_>>()
        .join("&")
}

pub fn sign_params(params: &Params, api_secret: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(string_to_sign(params).as_bytes());
    hasher.update(api_secret.as_bytes());
    hex::encode(hasher.finalize())
}

fn checked(name: &str, value: &str) -> Result<String, SigningError> {
    if value.contains('&') || value.contains('=') {
        return Err(SigningError::ReservedCharacter(name.to_string()));
    }
    Ok(value.to_string())
}

/// Builds the parameter set a client must send alongside a signed upload.
pub fn upload_params(
    folder: Option<&str>,
    tags: &[String],
    transformation: Option<&str>,
    timestamp: i64,
) -> Result<Params, SigningError> {
    let folder = folder
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .ok_or(SigningError::MissingFolder)?;

    let mut params = Params::new();
    params.insert("folder".to_string(), checked("folder", folder)?);
    params.insert("timestamp".to_string(), timestamp.to_string());

    let tags: Vec<&str> = tags
        .iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .collect();
    if !tags.is_empty() {
        params.insert("tags".to_string(), checked("tags", &tags.join(","))?);
    }
    if let Some(transformation) = transformation.filter(|t| !t.is_empty()) {
        params.insert(
            "transformation".to_string(),
            checked("transformation", transformation)?,
        );
    }
    Ok(params)
}
