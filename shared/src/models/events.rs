use super::{GuestbookEntry, Invitation};

/// What a push subscription is listening to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    Invitation,
    Guestbook,
}

/// Update delivered through a push subscription. Every update is tagged with
/// the invitation it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub enum PushUpdate {
    /// The invitation document changed; carries the full new document.
    Invitation(Invitation),
    /// The guestbook collection changed; carries the whole collection,
    /// newest entry first.
    Guestbook {
        invitation_id: String,
        entries: Vec<GuestbookEntry>,
    },
}

impl PushUpdate {
    pub fn invitation_id(&self) -> &str {
        match self {
            PushUpdate::Invitation(invitation) => &invitation.id,
            PushUpdate::Guestbook { invitation_id, .. } => invitation_id,
        }
    }

    pub fn topic(&self) -> Topic {
        match self {
            PushUpdate::Invitation(_) => Topic::Invitation,
            PushUpdate::Guestbook { .. } => Topic::Guestbook,
        }
    }
}
