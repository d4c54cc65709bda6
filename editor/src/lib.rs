//! Editing state for invitation content.
//!
//! [`ContentEditor`] owns the content tree and applies [`EditorAction`]s one
//! at a time. [`EditorSession`] ties an editor to a stored invitation and
//! handles the explicit whole-tree save.

pub mod actions;
pub mod completeness;
pub mod error;
pub mod fields;
pub mod session;
pub mod state;

pub use actions::{EditorAction, ListKind, Outcome};
pub use error::EditorError;
pub use session::EditorSession;
pub use state::ContentEditor;
