use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

use crate::models::events::PushUpdate;
use crate::models::{
    GuestbookEntry, Invitation, InvitationContent, NewGuestbookEntry, NewRsvp, Rsvp,
};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Receiving end of a push subscription. Dropping it ends the subscription.
pub type Subscription = mpsc::Receiver<PushUpdate>;

/// Access to the hosted document database holding invitations, RSVPs and
/// guestbook entries.
#[async_trait]
pub trait InvitationStore: Send + Sync {
    async fn get_invitation(&self, id: &str) -> Result<Invitation>;

    /// Fails with `NotFound` when no invitation carries `slug`.
    async fn get_invitation_by_slug(&self, slug: &str) -> Result<Invitation>;

    async fn slug_exists(&self, slug: &str) -> Result<bool>;

    async fn create_invitation(&self, invitation: Invitation) -> Result<Invitation>;

    async fn update_invitation(&self, invitation: Invitation) -> Result<Invitation>;

    /// Whole-tree write of the content document.
    async fn update_invitation_content(
        &self,
        id: &str,
        content: InvitationContent,
    ) -> Result<Invitation>;

    async fn delete_invitation(&self, id: &str) -> Result<()>;

    async fn increment_view_count(&self, id: &str) -> Result<u64>;

    async fn create_rsvp(&self, rsvp: NewRsvp) -> Result<Rsvp>;

    async fn list_rsvps(&self, invitation_id: &str) -> Result<Vec<Rsvp>>;

    async fn create_guestbook_entry(&self, entry: NewGuestbookEntry) -> Result<GuestbookEntry>;

    /// Newest entry first.
    async fn list_guestbook_entries(&self, invitation_id: &str) -> Result<Vec<GuestbookEntry>>;

    /// Pushes the full invitation document whenever it changes.
    async fn subscribe_invitation(&self, invitation_id: &str) -> Result<Subscription>;

    /// Pushes the full guestbook collection whenever an entry is added.
    async fn subscribe_guestbook(&self, invitation_id: &str) -> Result<Subscription>;
}
