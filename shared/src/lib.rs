//! Shared building blocks for the invitation services: the content model,
//! the remote store interface and its push-subscription plumbing.

pub mod ids;
pub mod models;
pub mod push;
pub mod store;

#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;
