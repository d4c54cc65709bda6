//! Media upload proxy: signs direct uploads to the media host and forwards
//! delete and list calls, all on a single endpoint multiplexed by method.

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod provider;
pub mod routes;
pub mod signing;
