use log::{debug, warn};
use serde_json::{Map, Value};
use tokio::sync::watch;
use vowcard_shared::ids::generate_item_id;
use vowcard_shared::models::content::{
    BankAccount, EWallet, GalleryImage, GalleryLayout, TimelineEntry,
};
use vowcard_shared::models::{InvitationContent, Section};

use crate::actions::{EditorAction, ListKind, Outcome};
use crate::fields::coordinates_value;

/// Items of the id-carrying lists.
trait ListItem {
    fn id(&self) -> &str;
    fn with_id(id: String) -> Self;
}

macro_rules! impl_list_item {
    ($($ty:ty),*) => {
        $(impl ListItem for $ty {
            fn id(&self) -> &str {
                &self.id
            }

            fn with_id(id: String) -> Self {
                Self {
                    id,
                    ..Default::default()
                }
            }
        })*
    };
}

impl_list_item!(BankAccount, EWallet, TimelineEntry, GalleryImage);

enum ListOp<'a> {
    Add(String),
    RemoveId(&'a str),
    RemoveAt(usize),
}

impl ListOp<'_> {
    fn creates_section(&self) -> bool {
        matches!(self, ListOp::Add(_))
    }

    fn apply<T: ListItem>(self, items: &mut Vec<T>) {
        match self {
            ListOp::Add(id) => items.push(T::with_id(id)),
            ListOp::RemoveId(id) => items.retain(|item| item.id() != id),
            ListOp::RemoveAt(index) => {
                if index < items.len() {
                    items.remove(index);
                }
            }
        }
    }
}

fn section_mut<T: Default>(slot: &mut Option<T>, create: bool) -> Option<&mut T> {
    if create {
        Some(slot.get_or_insert_with(T::default))
    } else {
        slot.as_mut()
    }
}

/// In-progress content of one invitation.
///
/// All mutation goes through [`ContentEditor::dispatch`], which takes
/// `&mut self`, so actions apply one after another against the latest tree.
/// Each action is applied to a copy and committed whole, never partially.
pub struct ContentEditor {
    content: InvitationContent,
    tx: watch::Sender<InvitationContent>,
}

impl Default for ContentEditor {
    fn default() -> Self {
        Self::new(InvitationContent::defaults())
    }
}

impl ContentEditor {
    pub fn new(content: InvitationContent) -> Self {
        let (tx, _rx) = watch::channel(content.clone());
        Self { content, tx }
    }

    pub fn content(&self) -> &InvitationContent {
        &self.content
    }

    /// Observes every applied change, e.g. to drive a live preview.
    pub fn subscribe(&self) -> watch::Receiver<InvitationContent> {
        self.tx.subscribe()
    }

    pub fn dispatch(&mut self, action: EditorAction) -> Outcome {
        let mut next = self.content.clone();

        if let Err(reason) = apply(&mut next, action) {
            warn!("Rejected editor action: {}", reason);
            return Outcome::Rejected(reason);
        }

        if next == self.content {
            return Outcome::Unchanged;
        }

        self.content = next;
        self.tx.send_replace(self.content.clone());
        Outcome::Applied
    }

    pub fn update_field(&mut self, section: Section, field: &str, value: Value) -> Outcome {
        self.dispatch(EditorAction::UpdateField {
            section,
            field: field.to_string(),
            value,
        })
    }

    pub fn update_nested_field(
        &mut self,
        section: Section,
        subsection: &str,
        field: &str,
        value: Value,
    ) -> Outcome {
        self.dispatch(EditorAction::UpdateNestedField {
            section,
            subsection: subsection.to_string(),
            field: field.to_string(),
            value,
        })
    }

    pub fn update_array_item(
        &mut self,
        section: Section,
        array: &str,
        index: usize,
        field: &str,
        value: Value,
    ) -> Outcome {
        self.dispatch(EditorAction::UpdateArrayItem {
            section,
            array: array.to_string(),
            index,
            field: field.to_string(),
            value,
        })
    }

    /// Appends an empty item and returns its generated id.
    pub fn add_list_item(&mut self, list: ListKind) -> String {
        let id = generate_item_id(list.id_prefix());
        self.dispatch(EditorAction::AddListItem {
            list,
            id: id.clone(),
        });
        id
    }

    pub fn remove_list_item(&mut self, list: ListKind, id: &str) -> Outcome {
        self.dispatch(EditorAction::RemoveListItem {
            list,
            id: id.to_string(),
        })
    }

    pub fn remove_list_item_at(&mut self, list: ListKind, index: usize) -> Outcome {
        self.dispatch(EditorAction::RemoveListItemAt { list, index })
    }

    /// Sets the map pin of `event` ("ceremony" or "reception") from a pasted
    /// "lat, lng" pair. Unparseable input clears the pin.
    pub fn set_event_coordinates(&mut self, event: &str, input: &str) -> Outcome {
        self.update_nested_field(
            Section::EventDetails,
            event,
            "coordinates",
            coordinates_value(input),
        )
    }

    /// Adds an uploaded image to the gallery and returns its id.
    pub fn add_gallery_image(
        &mut self,
        url: &str,
        thumbnail: Option<String>,
        public_id: Option<String>,
    ) -> String {
        let id = generate_item_id(ListKind::GalleryImages.id_prefix());
        self.dispatch(EditorAction::AddGalleryImage(GalleryImage {
            id: id.clone(),
            url: url.to_string(),
            caption: None,
            thumbnail,
            public_id,
        }));
        id
    }
}

fn apply(content: &mut InvitationContent, action: EditorAction) -> Result<(), String> {
    match action {
        EditorAction::UpdateField {
            section,
            field,
            value,
        } => {
            let clears = value.is_null();
            patch_section(content, section, |map| {
                map.insert(field.clone(), value);
            })?;
            if !clears && content.section_value(section).get(&field).is_none() {
                debug!("Unknown field {}.{} ignored", section, field);
            }
            Ok(())
        }
        EditorAction::UpdateNestedField {
            section,
            subsection,
            field,
            value,
        } => patch_section(content, section, |map| {
            let nested = map
                .entry(subsection)
                .or_insert_with(|| Value::Object(Map::new()));
            if !nested.is_object() {
                *nested = Value::Object(Map::new());
            }
            if let Value::Object(nested) = nested {
                nested.insert(field, value);
            }
        }),
        EditorAction::UpdateArrayItem {
            section,
            array,
            index,
            field,
            value,
        } => {
            if !content.is_configured(section) {
                debug!("Array update against unconfigured section {}", section);
                return Ok(());
            }
            patch_section(content, section, |map| {
                let item = map
                    .get_mut(&array)
                    .and_then(Value::as_array_mut)
                    .and_then(|items| items.get_mut(index))
                    .and_then(Value::as_object_mut);
                match item {
                    Some(item) => {
                        item.insert(field, value);
                    }
                    None => debug!("No element {}[{}] in {}, ignoring", array, index, section),
                }
            })
        }
        EditorAction::AddListItem { list, id } => {
            apply_list_op(content, list, ListOp::Add(id));
            Ok(())
        }
        EditorAction::RemoveListItem { list, id } => {
            apply_list_op(content, list, ListOp::RemoveId(&id));
            Ok(())
        }
        EditorAction::RemoveListItemAt { list, index } => {
            apply_list_op(content, list, ListOp::RemoveAt(index));
            Ok(())
        }
        EditorAction::AddGalleryImage(image) => {
            content
                .gallery_section
                .get_or_insert_with(Default::default)
                .images
                .push(image);
            Ok(())
        }
        EditorAction::SetGalleryLayout(layout) => {
            set_layout(content, layout);
            Ok(())
        }
        EditorAction::ReplaceContent(replacement) => {
            *content = *replacement;
            Ok(())
        }
    }
}

fn set_layout(content: &mut InvitationContent, layout: GalleryLayout) {
    content
        .gallery_section
        .get_or_insert_with(Default::default)
        .layout = layout;
}

/// Edits the JSON form of one section and reads it back into the typed tree.
fn patch_section(
    content: &mut InvitationContent,
    section: Section,
    edit: impl FnOnce(&mut Map<String, Value>),
) -> Result<(), String> {
    let mut value = content.section_value(section);
    if let Value::Object(map) = &mut value {
        edit(map);
    }
    content
        .set_section_from_value(section, value)
        .map_err(|e| format!("invalid value for {}: {}", section, e))
}

fn apply_list_op(content: &mut InvitationContent, list: ListKind, op: ListOp<'_>) {
    let create = op.creates_section();
    if !create && !content.is_configured(list.section()) {
        debug!("Removal from {:?} while {} is not configured, ignoring", list, list.section());
        return;
    }
    match list {
        ListKind::BankAccounts => {
            if let Some(gift) = section_mut(&mut content.gift_section, create) {
                op.apply(&mut gift.bank_accounts);
            }
        }
        ListKind::EWallets => {
            if let Some(gift) = section_mut(&mut content.gift_section, create) {
                op.apply(&mut gift.e_wallets);
            }
        }
        ListKind::Timeline => {
            if let Some(story) = section_mut(&mut content.story_section, create) {
                op.apply(&mut story.timeline);
            }
        }
        ListKind::GalleryImages => {
            if let Some(gallery) = section_mut(&mut content.gallery_section, create) {
                op.apply(&mut gallery.images);
            }
        }
    }
}
