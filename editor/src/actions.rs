use serde_json::Value;
use vowcard_shared::models::content::{GalleryImage, GalleryLayout};
use vowcard_shared::models::{InvitationContent, Section};

/// Lists inside the content tree whose items carry generated ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListKind {
    BankAccounts,
    EWallets,
    Timeline,
    GalleryImages,
}

impl ListKind {
    /// Prefix used for ids of newly created items.
    pub fn id_prefix(&self) -> &'static str {
        match self {
            ListKind::BankAccounts => "bank",
            ListKind::EWallets => "ewallet",
            ListKind::Timeline => "story",
            ListKind::GalleryImages => "image",
        }
    }

    pub fn section(&self) -> Section {
        match self {
            ListKind::BankAccounts | ListKind::EWallets => Section::GiftSection,
            ListKind::Timeline => Section::StorySection,
            ListKind::GalleryImages => Section::GallerySection,
        }
    }
}

/// A single mutation of the content tree. Field and array names use the
/// persisted camelCase keys.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorAction {
    /// Sets `section.field`, keeping every other field of the section.
    UpdateField {
        section: Section,
        field: String,
        value: Value,
    },
    /// Sets `section.subsection.field`, e.g. the shipping address recipient.
    UpdateNestedField {
        section: Section,
        subsection: String,
        field: String,
        value: Value,
    },
    /// Sets one field of `section.array[index]`; out of range is a no-op.
    UpdateArrayItem {
        section: Section,
        array: String,
        index: usize,
        field: String,
        value: Value,
    },
    AddListItem {
        list: ListKind,
        id: String,
    },
    RemoveListItem {
        list: ListKind,
        id: String,
    },
    /// Positional removal; out of range is a no-op.
    RemoveListItemAt {
        list: ListKind,
        index: usize,
    },
    AddGalleryImage(GalleryImage),
    SetGalleryLayout(GalleryLayout),
    ReplaceContent(Box<InvitationContent>),
}

/// Result of dispatching an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    /// The action was valid but did not change the tree.
    Unchanged,
    /// The value did not fit the content model; the tree is untouched.
    Rejected(String),
}

impl Outcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied)
    }
}
