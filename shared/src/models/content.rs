use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Notes lines starting with this prefix carried the map link before it got
/// its own field.
pub const LEGACY_MAP_LINK_PREFIX: &str = "map:";

/// Top-level sections of the invitation content tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Section {
    HeroSection,
    BrideGroomDetailsSection,
    EventDetails,
    StorySection,
    GallerySection,
    GiftSection,
    WishesSection,
    ClosingSection,
    Settings,
}

impl Section {
    pub const ALL: [Section; 9] = [
        Section::HeroSection,
        Section::BrideGroomDetailsSection,
        Section::EventDetails,
        Section::StorySection,
        Section::GallerySection,
        Section::GiftSection,
        Section::WishesSection,
        Section::ClosingSection,
        Section::Settings,
    ];

    /// Key of the section in the persisted JSON document.
    pub fn key(&self) -> &'static str {
        match self {
            Section::HeroSection => "heroSection",
            Section::BrideGroomDetailsSection => "brideGroomDetailsSection",
            Section::EventDetails => "eventDetails",
            Section::StorySection => "storySection",
            Section::GallerySection => "gallerySection",
            Section::GiftSection => "giftSection",
            Section::WishesSection => "wishesSection",
            Section::ClosingSection => "closingSection",
            Section::Settings => "settings",
        }
    }

    pub fn from_key(key: &str) -> Option<Section> {
        Section::ALL.into_iter().find(|s| s.key() == key)
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HeroContent {
    pub title: String,
    pub subtitle: String,
    pub date_display: String,
    pub background_image: String,
    pub quote: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PersonDetails {
    pub full_name: String,
    pub nickname: String,
    pub father_name: String,
    pub mother_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub child_order: Option<u32>,
    pub photo: String,
    pub instagram: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BrideGroomContent {
    pub bride: PersonDetails,
    pub groom: PersonDetails,
    pub intro_text: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EventItem {
    pub name: String,
    pub date: String,
    /// Free-form range such as "08:00 - 10:00".
    pub time: String,
    pub venue: String,
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
    pub notes: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub map_link: Option<String>,
}

impl EventItem {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    /// Moves a legacy `map:` line out of the notes into `map_link`.
    /// Returns true when the notes were rewritten.
    pub fn migrate_legacy_map_link(&mut self) -> bool {
        let mut link = None;
        let mut kept = Vec::new();
        for line in self.notes.lines() {
            let trimmed = line.trim();
            let is_legacy = trimmed
                .get(..LEGACY_MAP_LINK_PREFIX.len())
                .map(|head| head.eq_ignore_ascii_case(LEGACY_MAP_LINK_PREFIX))
                .unwrap_or(false);
            if is_legacy && link.is_none() {
                link = Some(trimmed[LEGACY_MAP_LINK_PREFIX.len()..].trim().to_string());
            } else {
                kept.push(line);
            }
        }

        let Some(link) = link else {
            return false;
        };

        self.notes = kept.join("\n").trim().to_string();
        if self.map_link.is_none() && !link.is_empty() {
            self.map_link = Some(link);
        }
        true
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EventDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ceremony: Option<EventItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reception: Option<EventItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TimelineEntry {
    pub id: String,
    /// Display label, not a parsed date ("Spring 2019").
    pub date: String,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StoryContent {
    pub title: String,
    pub timeline: Vec<TimelineEntry>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GalleryLayout {
    #[default]
    Grid,
    Masonry,
    Carousel,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GalleryImage {
    pub id: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    /// Media host identifier, needed to delete the asset later.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GalleryContent {
    pub title: String,
    pub images: Vec<GalleryImage>,
    pub layout: GalleryLayout,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BankAccount {
    pub id: String,
    pub bank_name: String,
    pub account_number: String,
    pub account_holder: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EWallet {
    pub id: String,
    pub provider: String,
    pub account_number: String,
    pub account_holder: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ShippingAddress {
    pub recipient_name: String,
    pub phone: String,
    pub address: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GiftContent {
    pub title: String,
    pub description: String,
    pub bank_accounts: Vec<BankAccount>,
    #[serde(rename = "eWallets")]
    pub e_wallets: Vec<EWallet>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_address: Option<ShippingAddress>,
    pub show_bank_accounts: bool,
    #[serde(rename = "showEWallets")]
    pub show_e_wallets: bool,
    pub show_shipping_address: bool,
}

impl Default for GiftContent {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            bank_accounts: Vec::new(),
            e_wallets: Vec::new(),
            shipping_address: None,
            show_bank_accounts: true,
            show_e_wallets: true,
            show_shipping_address: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WishesContent {
    pub title: String,
    pub description: String,
    pub placeholder: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClosingContent {
    pub title: String,
    pub message: String,
    pub signature: String,
    pub image: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ContentSettings {
    pub music_url: String,
    pub autoplay_music: bool,
    pub show_countdown: bool,
    pub language: String,
}

/// The editable content of an invitation.
///
/// Every section is optional: `None` means the couple has not configured it
/// yet, which is different from a configured but empty section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InvitationContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hero_section: Option<HeroContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bride_groom_details_section: Option<BrideGroomContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_details: Option<EventDetails>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub story_section: Option<StoryContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gallery_section: Option<GalleryContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gift_section: Option<GiftContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wishes_section: Option<WishesContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closing_section: Option<ClosingContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settings: Option<ContentSettings>,
}

impl InvitationContent {
    /// The starting point of every editing session.
    pub fn defaults() -> Self {
        Self {
            hero_section: Some(HeroContent::default()),
            bride_groom_details_section: Some(BrideGroomContent::default()),
            event_details: Some(EventDetails {
                ceremony: Some(EventItem::named("Ceremony")),
                reception: Some(EventItem::named("Reception")),
            }),
            story_section: Some(StoryContent {
                title: "Our Story".to_string(),
                timeline: Vec::new(),
            }),
            gallery_section: Some(GalleryContent {
                title: "Gallery".to_string(),
                ..Default::default()
            }),
            gift_section: Some(GiftContent::default()),
            wishes_section: Some(WishesContent {
                title: "Wishes".to_string(),
                description: String::new(),
                placeholder: "Write your wishes for the couple".to_string(),
            }),
            closing_section: Some(ClosingContent::default()),
            settings: Some(ContentSettings {
                show_countdown: true,
                ..Default::default()
            }),
        }
    }

    /// Builds the editor tree: defaults with the persisted document merged on
    /// top. A persisted section that no longer matches the model falls back to
    /// its defaults instead of failing the whole load.
    pub fn materialize(persisted: Option<&Value>) -> Self {
        let mut content = Self::defaults();

        if let Some(Value::Object(persisted)) = persisted {
            for section in Section::ALL {
                let Some(stored) = persisted.get(section.key()) else {
                    continue;
                };
                if stored.is_null() {
                    continue;
                }
                let mut merged = content.section_value(section);
                merge_json(&mut merged, stored);
                if let Err(e) = content.set_section_from_value(section, merged) {
                    warn!(
                        "Persisted section {} is malformed, using defaults: {}",
                        section, e
                    );
                }
            }
        }

        content.migrate_legacy_map_links();
        content
    }

    pub fn is_configured(&self, section: Section) -> bool {
        match section {
            Section::HeroSection => self.hero_section.is_some(),
            Section::BrideGroomDetailsSection => self.bride_groom_details_section.is_some(),
            Section::EventDetails => self.event_details.is_some(),
            Section::StorySection => self.story_section.is_some(),
            Section::GallerySection => self.gallery_section.is_some(),
            Section::GiftSection => self.gift_section.is_some(),
            Section::WishesSection => self.wishes_section.is_some(),
            Section::ClosingSection => self.closing_section.is_some(),
            Section::Settings => self.settings.is_some(),
        }
    }

    /// JSON view of one section; an unconfigured section reads as `{}`.
    pub fn section_value(&self, section: Section) -> Value {
        let value = match section {
            Section::HeroSection => serde_json::to_value(&self.hero_section),
            Section::BrideGroomDetailsSection => {
                serde_json::to_value(&self.bride_groom_details_section)
            }
            Section::EventDetails => serde_json::to_value(&self.event_details),
            Section::StorySection => serde_json::to_value(&self.story_section),
            Section::GallerySection => serde_json::to_value(&self.gallery_section),
            Section::GiftSection => serde_json::to_value(&self.gift_section),
            Section::WishesSection => serde_json::to_value(&self.wishes_section),
            Section::ClosingSection => serde_json::to_value(&self.closing_section),
            Section::Settings => serde_json::to_value(&self.settings),
        };

        match value {
            Ok(Value::Object(map)) => Value::Object(map),
            _ => Value::Object(Map::new()),
        }
    }

    /// Replaces one section with the typed form of `value`. On error the
    /// section is left untouched.
    pub fn set_section_from_value(
        &mut self,
        section: Section,
        value: Value,
    ) -> Result<(), serde_json::Error> {
        match section {
            Section::HeroSection => self.hero_section = Some(serde_json::from_value(value)?),
            Section::BrideGroomDetailsSection => {
                self.bride_groom_details_section = Some(serde_json::from_value(value)?)
            }
            Section::EventDetails => self.event_details = Some(serde_json::from_value(value)?),
            Section::StorySection => self.story_section = Some(serde_json::from_value(value)?),
            Section::GallerySection => {
                self.gallery_section = Some(serde_json::from_value(value)?)
            }
            Section::GiftSection => self.gift_section = Some(serde_json::from_value(value)?),
            Section::WishesSection => self.wishes_section = Some(serde_json::from_value(value)?),
            Section::ClosingSection => {
                self.closing_section = Some(serde_json::from_value(value)?)
            }
            Section::Settings => self.settings = Some(serde_json::from_value(value)?),
        }
        Ok(())
    }

    fn migrate_legacy_map_links(&mut self) {
        if let Some(events) = self.event_details.as_mut() {
            for event in [events.ceremony.as_mut(), events.reception.as_mut()]
                .into_iter()
                .flatten()
            {
                event.migrate_legacy_map_link();
            }
        }
    }
}

/// Deep merge of `source` into `target`. Objects merge key by key, `null`
/// in the source keeps the target value, anything else replaces it.
pub fn merge_json(target: &mut Value, source: &Value) {
    match (target, source) {
        (Value::Object(target), Value::Object(source)) => {
            for (key, value) in source {
                if value.is_null() {
                    continue;
                }
                match target.get_mut(key) {
                    Some(existing) => merge_json(existing, value),
                    None => {
                        target.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (target, source) => {
            if !source.is_null() {
                *target = source.clone();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_absent_sections_stay_absent_when_serialized() {
        let content = InvitationContent {
            hero_section: Some(HeroContent {
                title: "Ana & Ben".to_string(),
                ..Default::default()
            }),
            ..Default::default()
        };

        let value = serde_json::to_value(&content).unwrap();
        let obj = value.as_object().unwrap();
        assert!(obj.contains_key("heroSection"));
        assert!(!obj.contains_key("giftSection"));
        assert_eq!(value["heroSection"]["title"], "Ana & Ben");
    }

    #[test]
    fn test_partial_section_deserializes_with_defaults() {
        let content: InvitationContent = serde_json::from_value(json!({
            "giftSection": { "bankAccounts": [{ "id": "b1", "bankName": "BCA" }] }
        }))
        .unwrap();

        let gift = content.gift_section.unwrap();
        assert_eq!(gift.bank_accounts.len(), 1);
        assert_eq!(gift.bank_accounts[0].bank_name, "BCA");
        assert!(gift.show_bank_accounts);
        assert!(gift.show_e_wallets);
        assert!(content.hero_section.is_none());
    }

    #[test]
    fn test_materialize_merges_persisted_over_defaults() {
        let persisted = json!({
            "eventDetails": { "ceremony": { "date": "2026-12-12" } },
            "galleryLayout": "ignored",
            "giftSection": { "showEWallets": false }
        });

        let content = InvitationContent::materialize(Some(&persisted));

        let events = content.event_details.unwrap();
        let ceremony = events.ceremony.unwrap();
        assert_eq!(ceremony.name, "Ceremony");
        assert_eq!(ceremony.date, "2026-12-12");
        assert_eq!(events.reception.unwrap().name, "Reception");

        let gift = content.gift_section.unwrap();
        assert!(!gift.show_e_wallets);
        assert!(gift.show_bank_accounts);
        assert_eq!(content.gallery_section.unwrap().layout, GalleryLayout::Grid);
    }

    #[test]
    fn test_materialize_without_persisted_is_defaults() {
        assert_eq!(
            InvitationContent::materialize(None),
            InvitationContent::defaults()
        );
    }

    #[test]
    fn test_materialize_falls_back_on_malformed_section() {
        let persisted = json!({
            "brideGroomDetailsSection": { "bride": { "childOrder": "first" } },
            "heroSection": { "title": "Kept" }
        });

        let content = InvitationContent::materialize(Some(&persisted));

        assert_eq!(content.hero_section.unwrap().title, "Kept");
        assert_eq!(
            content.bride_groom_details_section.unwrap(),
            BrideGroomContent::default()
        );
    }

    #[test]
    fn test_materialize_migrates_legacy_map_link() {
        let persisted = json!({
            "eventDetails": {
                "reception": {
                    "notes": "Parking at the back\nmap: https://maps.example.com/abc\nDress code: batik"
                }
            }
        });

        let content = InvitationContent::materialize(Some(&persisted));
        let reception = content.event_details.unwrap().reception.unwrap();

        assert_eq!(
            reception.map_link.as_deref(),
            Some("https://maps.example.com/abc")
        );
        assert_eq!(reception.notes, "Parking at the back\nDress code: batik");
    }

    #[test]
    fn test_legacy_map_link_does_not_override_structured_field() {
        let mut event = EventItem {
            notes: "Map: https://old.example.com".to_string(),
            map_link: Some("https://new.example.com".to_string()),
            ..Default::default()
        };

        assert!(event.migrate_legacy_map_link());
        assert_eq!(event.map_link.as_deref(), Some("https://new.example.com"));
        assert!(event.notes.is_empty());
    }

    #[test]
    fn test_notes_without_legacy_line_untouched() {
        let mut event = EventItem {
            notes: "Bring an umbrella\nmapping the route is easy".to_string(),
            ..Default::default()
        };

        assert!(!event.migrate_legacy_map_link());
        assert_eq!(event.notes, "Bring an umbrella\nmapping the route is easy");
        assert!(event.map_link.is_none());
    }

    #[test]
    fn test_section_keys_round_trip() {
        for section in Section::ALL {
            assert_eq!(Section::from_key(section.key()), Some(section));
            let as_json = serde_json::to_value(section).unwrap();
            assert_eq!(as_json, json!(section.key()));
        }
        assert_eq!(Section::from_key("unknown"), None);
    }

    #[test]
    fn test_merge_json_keeps_target_on_null() {
        let mut target = json!({ "a": 1, "b": { "c": 2 } });
        merge_json(&mut target, &json!({ "a": null, "b": { "d": 3 } }));
        assert_eq!(target, json!({ "a": 1, "b": { "c": 2, "d": 3 } }));
    }
}
