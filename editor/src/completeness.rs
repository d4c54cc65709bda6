//! Per-section completeness checks. They only drive the progress indicator
//! in the editor and never block saving.

use serde::Serialize;
use vowcard_shared::models::content::{EventItem, PersonDetails};
use vowcard_shared::models::{InvitationContent, Section};

fn filled(value: &str) -> bool {
    !value.trim().is_empty()
}

pub fn is_hero_complete(content: &InvitationContent) -> bool {
    content
        .hero_section
        .as_ref()
        .map(|hero| filled(&hero.title) && filled(&hero.date_display))
        .unwrap_or(false)
}

fn person_complete(person: &PersonDetails) -> bool {
    filled(&person.full_name) && filled(&person.nickname)
}

pub fn is_bride_groom_complete(content: &InvitationContent) -> bool {
    content
        .bride_groom_details_section
        .as_ref()
        .map(|couple| person_complete(&couple.bride) && person_complete(&couple.groom))
        .unwrap_or(false)
}

fn event_complete(event: &EventItem) -> bool {
    filled(&event.name) && filled(&event.date) && filled(&event.address)
}

/// At least one event, and every event present has a name, date and address.
pub fn is_event_details_complete(content: &InvitationContent) -> bool {
    let Some(events) = content.event_details.as_ref() else {
        return false;
    };
    let present: Vec<&EventItem> = [events.ceremony.as_ref(), events.reception.as_ref()]
        .into_iter()
        .flatten()
        .collect();
    !present.is_empty() && present.into_iter().all(event_complete)
}

pub fn is_story_complete(content: &InvitationContent) -> bool {
    content
        .story_section
        .as_ref()
        .map(|story| {
            !story.timeline.is_empty() && story.timeline.iter().all(|entry| filled(&entry.title))
        })
        .unwrap_or(false)
}

pub fn is_gallery_complete(content: &InvitationContent) -> bool {
    content
        .gallery_section
        .as_ref()
        .map(|gallery| !gallery.images.is_empty())
        .unwrap_or(false)
}

/// Complete once guests have at least one visible way to send a gift.
pub fn is_gift_complete(content: &InvitationContent) -> bool {
    let Some(gift) = content.gift_section.as_ref() else {
        return false;
    };
    let banks = gift.show_bank_accounts
        && gift
            .bank_accounts
            .iter()
            .any(|a| filled(&a.bank_name) && filled(&a.account_number));
    let wallets = gift.show_e_wallets
        && gift
            .e_wallets
            .iter()
            .any(|w| filled(&w.provider) && filled(&w.account_number));
    let shipping = gift.show_shipping_address
        && gift
            .shipping_address
            .as_ref()
            .map(|s| filled(&s.address))
            .unwrap_or(false);
    banks || wallets || shipping
}

pub fn is_wishes_complete(content: &InvitationContent) -> bool {
    content
        .wishes_section
        .as_ref()
        .map(|wishes| filled(&wishes.title))
        .unwrap_or(false)
}

pub fn is_closing_complete(content: &InvitationContent) -> bool {
    content
        .closing_section
        .as_ref()
        .map(|closing| filled(&closing.message))
        .unwrap_or(false)
}

pub fn is_section_complete(content: &InvitationContent, section: Section) -> bool {
    match section {
        Section::HeroSection => is_hero_complete(content),
        Section::BrideGroomDetailsSection => is_bride_groom_complete(content),
        Section::EventDetails => is_event_details_complete(content),
        Section::StorySection => is_story_complete(content),
        Section::GallerySection => is_gallery_complete(content),
        Section::GiftSection => is_gift_complete(content),
        Section::WishesSection => is_wishes_complete(content),
        Section::ClosingSection => is_closing_complete(content),
        // Settings have usable defaults.
        Section::Settings => content.settings.is_some(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionStatus {
    pub section: Section,
    pub configured: bool,
    pub complete: bool,
}

pub fn section_statuses(content: &InvitationContent) -> Vec<SectionStatus> {
    Section::ALL
        .into_iter()
        .map(|section| SectionStatus {
            section,
            configured: content.is_configured(section),
            complete: is_section_complete(content, section),
        })
        .collect()
}
