//! Guest forms. Required fields are checked locally so an incomplete form
//! never reaches the store.

pub mod guestbook;
pub mod rsvp;

pub use guestbook::GuestbookForm;
pub use rsvp::RsvpForm;

use crate::models::FieldError;

/// Looks up the inline message for `field`.
pub(crate) fn error_for<'a>(errors: &'a [FieldError], field: &str) -> Option<&'a str> {
    errors
        .iter()
        .find(|e| e.field == field)
        .map(|e| e.message.as_str())
}
