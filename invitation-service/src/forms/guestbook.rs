use log::{error, info};
use vowcard_shared::models::{GuestbookEntry, NewGuestbookEntry};
use vowcard_shared::store::InvitationStore;

use crate::data_store::InvitationDataStore;
use crate::error::SubmitError;
use crate::models::{FieldError, FIELD_MESSAGE, FIELD_NAME};

const MAX_MESSAGE_CHARS: usize = 500;

#[derive(Debug, Clone, Default)]
pub struct GuestbookForm {
    pub name: String,
    pub message: String,
    pub(crate) errors: Vec<FieldError>,
    pub(crate) submit_error: Option<String>,
}

impl GuestbookForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if self.name.trim().is_empty() {
            errors.push(FieldError::required(FIELD_NAME));
        }
        if self.message.trim().is_empty() {
            errors.push(FieldError::required(FIELD_MESSAGE));
        } else if self.message.trim().chars().count() > MAX_MESSAGE_CHARS {
            errors.push(FieldError::new(
                FIELD_MESSAGE,
                format!("Keep it under {} characters", MAX_MESSAGE_CHARS),
            ));
        }
        errors
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn error_for(&self, field: &str) -> Option<&str> {
        super::error_for(&self.errors, field)
    }

    pub fn submit_error(&self) -> Option<&str> {
        self.submit_error.as_deref()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub async fn submit<S>(
        &mut self,
        store: &InvitationDataStore<S>,
    ) -> Result<GuestbookEntry, SubmitError>
    where
        S: InvitationStore + ?Sized + 'static,
    {
        self.submit_error = None;
        let errors = self.validate();
        if !errors.is_empty() {
            self.errors = errors.clone();
            return Err(SubmitError::Validation(errors));
        }
        self.errors.clear();

        let invitation_id = store
            .current_invitation_id()
            .ok_or(SubmitError::NoInvitation)?;

        let entry = NewGuestbookEntry {
            invitation_id,
            name: self.name.trim().to_string(),
            message: self.message.trim().to_string(),
        };

        match store.submit_guestbook_entry(entry).await {
            Ok(created) => {
                info!("Guestbook form submitted by {}", created.name);
                self.reset();
                Ok(created)
            }
            Err(e) => {
                error!("Guestbook submission failed: {}", e);
                self.submit_error = Some(e.to_string());
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_flags_each_empty_field() {
        let form = GuestbookForm {
            name: "  ".to_string(),
            ..Default::default()
        };
        let errors = form.validate();
        let fields: Vec<&str> = errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec![FIELD_NAME, FIELD_MESSAGE]);
    }

    #[test]
    fn test_validate_limits_message_length() {
        let form = GuestbookForm {
            name: "Ana".to_string(),
            message: "a".repeat(MAX_MESSAGE_CHARS + 1),
            ..Default::default()
        };
        let errors = form.validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, FIELD_MESSAGE);
    }
}
