use serde::Serialize;

// Form field names, matching the JSON keys of the submitted records
pub const FIELD_NAME: &str = "name";
pub const FIELD_MESSAGE: &str = "message";
pub const FIELD_GUEST_NAME: &str = "guestName";
pub const FIELD_ATTENDANCE: &str = "attendance";
pub const FIELD_GUEST_COUNT: &str = "guestCount";

/// Inline validation error shown next to a form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }

    pub fn required(field: &'static str) -> Self {
        Self::new(field, "This field is required")
    }
}
