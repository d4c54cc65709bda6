use log::{error, info};
use vowcard_shared::models::{Invitation, InvitationContent};
use vowcard_shared::store::InvitationStore;

use crate::actions::{EditorAction, Outcome};
use crate::error::Result;
use crate::state::ContentEditor;

/// Editing session for one stored invitation.
///
/// Content is materialized fresh on load, edited locally and written back in
/// whole on [`EditorSession::save`].
pub struct EditorSession {
    invitation_id: String,
    editor: ContentEditor,
    saved: InvitationContent,
}

impl EditorSession {
    pub async fn load<S>(store: &S, invitation_id: &str) -> Result<Self>
    where
        S: InvitationStore + ?Sized,
    {
        let invitation = store.get_invitation(invitation_id).await?;
        let persisted = serde_json::to_value(&invitation.content)?;
        let content = InvitationContent::materialize(Some(&persisted));

        info!("Loaded editing session for invitation_id={}", invitation_id);

        Ok(Self {
            invitation_id: invitation.id,
            editor: ContentEditor::new(content.clone()),
            saved: content,
        })
    }

    pub fn invitation_id(&self) -> &str {
        &self.invitation_id
    }

    pub fn editor(&self) -> &ContentEditor {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut ContentEditor {
        &mut self.editor
    }

    pub fn dispatch(&mut self, action: EditorAction) -> Outcome {
        self.editor.dispatch(action)
    }

    /// Throws away local edits, going back to the last loaded or saved tree.
    pub fn discard_changes(&mut self) -> Outcome {
        let outcome = self
            .editor
            .dispatch(EditorAction::ReplaceContent(Box::new(self.saved.clone())));
        if outcome.is_applied() {
            info!(
                "Discarded unsaved changes for invitation_id={}",
                self.invitation_id
            );
        }
        outcome
    }

    /// True when the local tree differs from the last loaded or saved one.
    pub fn is_dirty(&self) -> bool {
        self.editor.content() != &self.saved
    }

    /// Writes the whole content tree. On failure nothing local changes and
    /// the session stays dirty; retrying is left to the user.
    pub async fn save<S>(&mut self, store: &S) -> Result<Invitation>
    where
        S: InvitationStore + ?Sized,
    {
        let content = self.editor.content().clone();

        match store
            .update_invitation_content(&self.invitation_id, content.clone())
            .await
        {
            Ok(invitation) => {
                info!("Saved content for invitation_id={}", self.invitation_id);
                self.saved = content;
                Ok(invitation)
            }
            Err(e) => {
                error!(
                    "Failed to save content for invitation_id={}: {}",
                    self.invitation_id, e
                );
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EditorError;
    use serde_json::json;
    use vowcard_shared::models::Section;
    use vowcard_shared::store::StoreError;
    use vowcard_shared::test_utils::mock_invitation_store::MockInvitationStore;
    use vowcard_shared::test_utils::test_logging::init_test_logging;

    async fn store_with_invitation() -> (MockInvitationStore, Invitation) {
        init_test_logging();
        let store = MockInvitationStore::new();
        let mut invitation = Invitation::new("owner-1", "Ana & Ben", "ana-ben");
        invitation.content = serde_json::from_value(json!({
            "heroSection": { "title": "Ana & Ben" }
        }))
        .unwrap();
        store.create_invitation(invitation.clone()).await.unwrap();
        (store, invitation)
    }

    #[tokio::test]
    async fn test_load_materializes_defaults_and_persisted() {
        let (store, invitation) = store_with_invitation().await;

        let session = EditorSession::load(&store, &invitation.id).await.unwrap();

        let content = session.editor().content();
        assert_eq!(content.hero_section.as_ref().unwrap().title, "Ana & Ben");
        assert!(content.gift_section.is_some());
        assert!(!session.is_dirty());
    }

    #[tokio::test]
    async fn test_load_unknown_invitation_fails() {
        let (store, _) = store_with_invitation().await;
        let result = EditorSession::load(&store, "missing").await;
        assert!(matches!(
            result,
            Err(EditorError::Store(StoreError::NotFound(_)))
        ));
    }

    #[tokio::test]
    async fn test_save_writes_whole_tree() {
        let (store, invitation) = store_with_invitation().await;
        let mut session = EditorSession::load(&store, &invitation.id).await.unwrap();

        session
            .editor_mut()
            .update_field(Section::ClosingSection, "message", json!("Thank you"));
        assert!(session.is_dirty());

        session.save(&store).await.unwrap();

        assert!(!session.is_dirty());
        let stored = store.get_invitation(&invitation.id).await.unwrap();
        assert_eq!(&stored.content, session.editor().content());
    }

    #[tokio::test]
    async fn test_failed_save_keeps_local_state() {
        let (store, invitation) = store_with_invitation().await;
        let mut session = EditorSession::load(&store, &invitation.id).await.unwrap();
        session
            .editor_mut()
            .update_field(Section::ClosingSection, "message", json!("Thank you"));
        let local = session.editor().content().clone();

        store.fail_next_writes(1);
        assert!(session.save(&store).await.is_err());

        assert!(session.is_dirty());
        assert_eq!(session.editor().content(), &local);
        let stored = store.get_invitation(&invitation.id).await.unwrap();
        assert!(stored.content.closing_section.is_none());

        session.save(&store).await.unwrap();
        assert!(!session.is_dirty());
    }

    #[tokio::test]
    async fn test_discard_changes_restores_saved_tree() {
        let (store, invitation) = store_with_invitation().await;
        let mut session = EditorSession::load(&store, &invitation.id).await.unwrap();
        let loaded = session.editor().content().clone();

        assert_eq!(session.discard_changes(), Outcome::Unchanged);

        let edit = session.dispatch(EditorAction::UpdateField {
            section: Section::HeroSection,
            field: "title".to_string(),
            value: json!("Ana & Ben, 2025"),
        });
        assert!(edit.is_applied());
        assert!(session.is_dirty());

        assert!(session.discard_changes().is_applied());
        assert!(!session.is_dirty());
        assert_eq!(session.editor().content(), &loaded);
    }
}
