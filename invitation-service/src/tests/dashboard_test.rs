use vowcard_shared::models::{Invitation, Section};
use vowcard_shared::store::{InvitationStore, StoreError};
use vowcard_shared::test_utils::mock_invitation_store::MockInvitationStore;
use vowcard_shared::test_utils::test_logging::init_test_logging;

use crate::dashboard::{
    create_invitation, delete_invitation, set_published, set_section_visible, suggest_slug,
};
use crate::error::DashboardError;

async fn store_with(slugs: &[&str]) -> MockInvitationStore {
    init_test_logging();
    let store = MockInvitationStore::new();
    for slug in slugs {
        store
            .create_invitation(Invitation::new("owner-1", "Seed", slug))
            .await
            .unwrap();
    }
    store
}

#[tokio::test]
async fn test_create_invitation() {
    let store = store_with(&[]).await;

    let invitation = create_invitation(&store, "owner-1", "Ana & Ben", "ana-ben")
        .await
        .unwrap();

    assert_eq!(invitation.slug, "ana-ben");
    assert_eq!(invitation.owner_id, "owner-1");
    assert!(!invitation.is_published);
    let stored = store.get_invitation_by_slug("ana-ben").await.unwrap();
    assert_eq!(stored.id, invitation.id);
}

#[tokio::test]
async fn test_create_invitation_rejects_taken_and_invalid_slugs() {
    let store = store_with(&["ana-ben"]).await;

    let taken = create_invitation(&store, "owner-2", "Ana & Ben", "ana-ben").await;
    assert!(matches!(taken, Err(DashboardError::SlugTaken(_))));

    let invalid = create_invitation(&store, "owner-2", "Ana & Ben", "Ana Ben").await;
    assert!(matches!(invalid, Err(DashboardError::InvalidSlug(_))));
}

#[tokio::test]
async fn test_suggest_slug_appends_suffix() {
    let store = store_with(&["ana-ben", "ana-ben-2"]).await;

    assert_eq!(
        suggest_slug(&store, "Ana", "Ben").await.unwrap(),
        "ana-ben-3"
    );
    assert_eq!(
        suggest_slug(&store, "Citra", "Dimas").await.unwrap(),
        "citra-dimas"
    );
    assert!(matches!(
        suggest_slug(&store, "", "").await,
        Err(DashboardError::InvalidSlug(_))
    ));
}

#[tokio::test]
async fn test_owner_only_operations() {
    let store = store_with(&[]).await;
    let invitation = create_invitation(&store, "owner-1", "Ana & Ben", "ana-ben")
        .await
        .unwrap();

    let forbidden = set_published(&store, &invitation.id, "intruder", true).await;
    assert!(matches!(forbidden, Err(DashboardError::Forbidden(_))));

    let published = set_published(&store, &invitation.id, "owner-1", true)
        .await
        .unwrap();
    assert!(published.is_published);

    let hidden = set_section_visible(
        &store,
        &invitation.id,
        "owner-1",
        Section::GiftSection,
        false,
    )
    .await
    .unwrap();
    assert!(!hidden.is_section_visible(Section::GiftSection));
    assert!(hidden.is_section_visible(Section::StorySection));

    assert!(matches!(
        delete_invitation(&store, &invitation.id, "intruder").await,
        Err(DashboardError::Forbidden(_))
    ));
    delete_invitation(&store, &invitation.id, "owner-1")
        .await
        .unwrap();
    assert!(matches!(
        store.get_invitation(&invitation.id).await,
        Err(StoreError::NotFound(_))
    ));
}
