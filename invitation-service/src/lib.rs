//! Guest-facing side of an invitation: the client cache of the viewed
//! invitation with its RSVPs and guestbook, the guest forms, and the owner
//! operations used from the dashboard.

pub mod dashboard;
pub mod data_store;
pub mod error;
pub mod forms;
pub mod models;

pub use data_store::{GuestViewState, InvitationDataStore};
pub use error::{DashboardError, SubmitError};

#[cfg(test)]
mod tests;
