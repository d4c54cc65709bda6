use log::{error, info};
use vowcard_shared::models::{Attendance, NewRsvp, Rsvp};
use vowcard_shared::store::InvitationStore;

use crate::data_store::InvitationDataStore;
use crate::error::SubmitError;
use crate::models::{FieldError, FIELD_ATTENDANCE, FIELD_GUEST_COUNT, FIELD_GUEST_NAME};

pub const MAX_GUESTS_PER_RSVP: u32 = 10;

#[derive(Debug, Clone, Default)]
pub struct RsvpForm {
    pub guest_name: String,
    pub attendance: Option<Attendance>,
    /// Raw text of the party-size input.
    pub guest_count: String,
    pub message: String,
    pub(crate) errors: Vec<FieldError>,
    pub(crate) submit_error: Option<String>,
}

impl RsvpForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Party size; only asked of guests who are (maybe) coming.
    fn parsed_guest_count(&self) -> Result<u32, FieldError> {
        match self.attendance {
            Some(Attendance::NotAttending) | None => Ok(0),
            Some(_) => {
                let raw = self.guest_count.trim();
                if raw.is_empty() {
                    return Err(FieldError::required(FIELD_GUEST_COUNT));
                }
                match raw.parse::<u32>() {
                    Ok(n) if (1..=MAX_GUESTS_PER_RSVP).contains(&n) => Ok(n),
                    _ => Err(FieldError::new(
                        FIELD_GUEST_COUNT,
                        format!("Enter a number from 1 to {}", MAX_GUESTS_PER_RSVP),
                    )),
                }
            }
        }
    }

    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if self.guest_name.trim().is_empty() {
            errors.push(FieldError::required(FIELD_GUEST_NAME));
        }
        if self.attendance.is_none() {
            errors.push(FieldError::required(FIELD_ATTENDANCE));
        }
        if let Err(e) = self.parsed_guest_count() {
            errors.push(e);
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

    pub async fn submit<S>(&mut self, store: &InvitationDataStore<S>) -> Result<Rsvp, SubmitError>
    where
        S: InvitationStore + ?Sized + 'static,
    {
        self.submit_error = None;
        let errors = self.validate();
        let (Some(attendance), Ok(guest_count), true) = (
            self.attendance,
            self.parsed_guest_count(),
            errors.is_empty(),
        ) else {
            self.errors = errors.clone();
            return Err(SubmitError::Validation(errors));
        };
        self.errors.clear();

        let invitation_id = store
            .current_invitation_id()
            .ok_or(SubmitError::NoInvitation)?;

        let message = self.message.trim();
        let rsvp = NewRsvp {
            invitation_id,
            guest_name: self.guest_name.trim().to_string(),
            attendance,
            guest_count,
            message: (!message.is_empty()).then(|| message.to_string()),
        };

        match store.submit_rsvp(rsvp).await {
            Ok(created) => {
                info!(
                    "RSVP form submitted by {} ({:?})",
                    created.guest_name, created.attendance
                );
                self.reset();
                Ok(created)
            }
            Err(e) => {
                error!("RSVP submission failed: {}", e);
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
    fn test_not_attending_needs_no_guest_count() {
        let form = RsvpForm {
            guest_name: "Ana".to_string(),
            attendance: Some(Attendance::NotAttending),
            ..Default::default()
        };
        assert!(form.validate().is_empty());
    }

    #[test]
    fn test_attending_requires_valid_guest_count() {
        let mut form = RsvpForm {
            guest_name: "Ana".to_string(),
            attendance: Some(Attendance::Attending),
            ..Default::default()
        };
        assert_eq!(form.validate()[0].field, FIELD_GUEST_COUNT);

        form.guest_count = "two".to_string();
        assert_eq!(form.validate()[0].field, FIELD_GUEST_COUNT);

        form.guest_count = "11".to_string();
        assert_eq!(form.validate().len(), 1);

        form.guest_count = "2".to_string();
        assert!(form.validate().is_empty());
    }

    #[test]
    fn test_missing_name_and_attendance() {
        let form = RsvpForm::new();
        let fields: Vec<&str> = form.validate().iter().map(|e| e.field).collect();
        assert_eq!(fields, vec![FIELD_GUEST_NAME, FIELD_ATTENDANCE]);
    }
}
