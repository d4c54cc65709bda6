use thiserror::Error;
use vowcard_shared::store::StoreError;

use crate::models::FieldError;

/// Why a guest form was not submitted.
#[derive(Error, Debug)]
pub enum SubmitError {
    /// Caught locally, no request was made.
    #[error("{} field(s) need attention", .0.len())]
    Validation(Vec<FieldError>),

    #[error("No invitation is loaded")]
    NoInvitation,

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Invalid slug: {0}")]
    InvalidSlug(String),

    #[error("Slug {0} is already taken")]
    SlugTaken(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type Result<T> = std::result::Result<T, DashboardError>;
