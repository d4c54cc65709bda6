use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod content;
pub mod events;

pub use content::{InvitationContent, Section};

/// Current UTC time as an RFC 3339 string, the format every record uses.
pub fn now_str() -> String {
    Utc::now().to_rfc3339()
}

/// Per-section visibility toggle stored on the theme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeSection {
    pub id: String,
    #[serde(default = "default_visible")]
    pub visible: bool,
}

fn default_visible() -> bool {
    true
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Theme {
    pub id: String,
    pub name: String,
    pub primary_color: String,
    pub font_family: String,
    pub sections: Vec<ThemeSection>,
}

impl Theme {
    /// A section is shown unless the theme explicitly hides it.
    pub fn is_section_visible(&self, section: Section) -> bool {
        self.sections
            .iter()
            .find(|s| s.id == section.key())
            .map(|s| s.visible)
            .unwrap_or(true)
    }

    pub fn set_section_visible(&mut self, section: Section, visible: bool) {
        match self.sections.iter_mut().find(|s| s.id == section.key()) {
            Some(entry) => entry.visible = visible,
            None => self.sections.push(ThemeSection {
                id: section.key().to_string(),
                visible,
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invitation {
    pub id: String,
    pub slug: String,
    pub owner_id: String,
    pub title: String,
    #[serde(default)]
    pub content: InvitationContent,
    #[serde(default)]
    pub theme: Theme,
    #[serde(default)]
    pub view_count: u64,
    #[serde(default)]
    pub is_published: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl Invitation {
    pub fn new(owner_id: &str, title: &str, slug: &str) -> Self {
        let now = now_str();
        Self {
            id: Uuid::new_v4().to_string(),
            slug: slug.to_string(),
            owner_id: owner_id.to_string(),
            title: title.to_string(),
            content: InvitationContent::default(),
            theme: Theme::default(),
            view_count: 0,
            is_published: false,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    pub fn is_section_visible(&self, section: Section) -> bool {
        self.theme.is_section_visible(section)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attendance {
    Attending,
    NotAttending,
    Maybe,
}

/// RSVP as submitted by a guest, before the store assigns an id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRsvp {
    pub invitation_id: String,
    pub guest_name: String,
    pub attendance: Attendance,
    pub guest_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rsvp {
    pub id: String,
    pub invitation_id: String,
    pub guest_name: String,
    pub attendance: Attendance,
    pub guest_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub created_at: String,
}

impl Rsvp {
    pub fn from_new(new: NewRsvp) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            invitation_id: new.invitation_id,
            guest_name: new.guest_name,
            attendance: new.attendance,
            guest_count: new.guest_count,
            message: new.message,
            created_at: now_str(),
        }
    }
}

/// Head counts for the couple's dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RsvpSummary {
    pub attending: usize,
    pub not_attending: usize,
    pub maybe: usize,
    /// Sum of party sizes for guests who confirmed. Wider than a single
    /// party size since stored counts are not bounded.
    pub expected_guests: u64,
}

impl RsvpSummary {
    pub fn from_rsvps(rsvps: &[Rsvp]) -> Self {
        rsvps.iter().fold(Self::default(), |mut acc, rsvp| {
            match rsvp.attendance {
                Attendance::Attending => {
                    acc.attending += 1;
                    acc.expected_guests += u64::from(rsvp.guest_count);
                }
                Attendance::NotAttending => acc.not_attending += 1,
                Attendance::Maybe => acc.maybe += 1,
            }
            acc
        })
    }

    pub fn total(&self) -> usize {
        self.attending + self.not_attending + self.maybe
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGuestbookEntry {
    pub invitation_id: String,
    pub name: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestbookEntry {
    pub id: String,
    pub invitation_id: String,
    pub name: String,
    pub message: String,
    pub created_at: String,
}

impl GuestbookEntry {
    pub fn from_new(new: NewGuestbookEntry) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            invitation_id: new.invitation_id,
            name: new.name,
            message: new.message,
            created_at: now_str(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rsvp(attendance: Attendance, guest_count: u32) -> Rsvp {
        Rsvp::from_new(NewRsvp {
            invitation_id: "inv-1".to_string(),
            guest_name: "Guest".to_string(),
            attendance,
            guest_count,
            message: None,
        })
    }

    #[test]
    fn test_section_visibility_defaults_to_true() {
        let mut theme = Theme::default();
        assert!(theme.is_section_visible(Section::GiftSection));

        theme.set_section_visible(Section::GiftSection, false);
        assert!(!theme.is_section_visible(Section::GiftSection));
        assert!(theme.is_section_visible(Section::StorySection));

        theme.set_section_visible(Section::GiftSection, true);
        assert!(theme.is_section_visible(Section::GiftSection));
        assert_eq!(theme.sections.len(), 1);
    }

    #[test]
    fn test_theme_section_without_flag_is_visible() {
        let theme: Theme =
            serde_json::from_str(r#"{"sections":[{"id":"storySection"}]}"#).unwrap();
        assert!(theme.is_section_visible(Section::StorySection));
    }

    #[test]
    fn test_rsvp_summary_counts() {
        let summary = RsvpSummary::from_rsvps(&[
            rsvp(Attendance::Attending, 2),
            rsvp(Attendance::Attending, 3),
            rsvp(Attendance::NotAttending, 1),
            rsvp(Attendance::Maybe, 4),
        ]);

        assert_eq!(summary.attending, 2);
        assert_eq!(summary.not_attending, 1);
        assert_eq!(summary.maybe, 1);
        assert_eq!(summary.expected_guests, 5);
        assert_eq!(summary.total(), 4);
    }

    #[test]
    fn test_rsvp_summary_with_unbounded_party_sizes() {
        let summary = RsvpSummary::from_rsvps(&[
            rsvp(Attendance::Attending, u32::MAX),
            rsvp(Attendance::Attending, u32::MAX),
        ]);

        assert_eq!(summary.attending, 2);
        assert_eq!(summary.expected_guests, 2 * u64::from(u32::MAX));
    }

    #[test]
    fn test_attendance_wire_format() {
        assert_eq!(
            serde_json::to_string(&Attendance::NotAttending).unwrap(),
            "\"not_attending\""
        );
    }
}
