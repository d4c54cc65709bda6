use async_trait::async_trait;
use log::debug;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::RwLock;

use crate::models::events::{PushUpdate, Topic};
use crate::models::{
    now_str, GuestbookEntry, Invitation, InvitationContent, NewGuestbookEntry, NewRsvp, Rsvp,
};
use crate::push::PushRegistry;
use crate::store::{InvitationStore, Result, StoreError, Subscription};

/// In-memory stand-in for the hosted document database, including push
/// subscriptions and failure injection.
#[derive(Default)]
pub struct MockInvitationStore {
    invitations: RwLock<HashMap<String, Invitation>>,
    rsvps: RwLock<Vec<Rsvp>>,
    guestbook: RwLock<Vec<GuestbookEntry>>,
    push: PushRegistry,
    failing_writes: AtomicUsize,
    unavailable: AtomicBool,
    view_tracking_fails: AtomicBool,
    subscribe_delays: Mutex<HashMap<String, Duration>>,
}

impl MockInvitationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next `count` write operations fail with `Unavailable`.
    pub fn fail_next_writes(&self, count: usize) {
        self.failing_writes.store(count, Ordering::SeqCst);
    }

    /// While set, every operation fails with `Unavailable`.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn set_view_tracking_fails(&self, fails: bool) {
        self.view_tracking_fails.store(fails, Ordering::SeqCst);
    }

    /// Holds back invitation subscriptions for `invitation_id` by `delay`.
    pub fn delay_subscriptions(&self, invitation_id: &str, delay: Duration) {
        self.subscribe_delays
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(invitation_id.to_string(), delay);
    }

    pub fn subscriber_count(&self) -> usize {
        self.push.subscriber_count()
    }

    /// Publishes an arbitrary update, as if another client had written it.
    pub fn push_raw(&self, update: PushUpdate) -> usize {
        self.push.publish(update)
    }

    fn check_read(&self) -> Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("database offline".into()));
        }
        Ok(())
    }

    fn check_write(&self) -> Result<()> {
        self.check_read()?;
        let injected = self
            .failing_writes
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if injected {
            return Err(StoreError::Unavailable("write rejected".into()));
        }
        Ok(())
    }

    async fn publish_guestbook(&self, invitation_id: &str) {
        let entries = self.guestbook_for(invitation_id).await;
        self.push.publish(PushUpdate::Guestbook {
            invitation_id: invitation_id.to_string(),
            entries,
        });
    }

    async fn guestbook_for(&self, invitation_id: &str) -> Vec<GuestbookEntry> {
        self.guestbook
            .read()
            .await
            .iter()
            .rev()
            .filter(|e| e.invitation_id == invitation_id)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl InvitationStore for MockInvitationStore {
    async fn get_invitation(&self, id: &str) -> Result<Invitation> {
        self.check_read()?;
        self.invitations
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("Invitation {}", id)))
    }

    async fn get_invitation_by_slug(&self, slug: &str) -> Result<Invitation> {
        self.check_read()?;
        self.invitations
            .read()
            .await
            .values()
            .find(|inv| inv.slug == slug)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("Invitation with slug {}", slug)))
    }

    async fn slug_exists(&self, slug: &str) -> Result<bool> {
        self.check_read()?;
        Ok(self
            .invitations
            .read()
            .await
            .values()
            .any(|inv| inv.slug == slug))
    }

    async fn create_invitation(&self, invitation: Invitation) -> Result<Invitation> {
        self.check_write()?;
        let mut invitations = self.invitations.write().await;
        if invitations.contains_key(&invitation.id) {
            return Err(StoreError::Conflict(format!(
                "Invitation {} already exists",
                invitation.id
            )));
        }
        if invitations.values().any(|inv| inv.slug == invitation.slug) {
            return Err(StoreError::Conflict(format!(
                "Slug {} is already taken",
                invitation.slug
            )));
        }
        debug!("Mock store: creating invitation {}", invitation.id);
        invitations.insert(invitation.id.clone(), invitation.clone());
        Ok(invitation)
    }

    async fn update_invitation(&self, mut invitation: Invitation) -> Result<Invitation> {
        self.check_write()?;
        let updated = {
            let mut invitations = self.invitations.write().await;
            let existing = invitations
                .get_mut(&invitation.id)
                .ok_or_else(|| StoreError::NotFound(format!("Invitation {}", invitation.id)))?;
            invitation.updated_at = now_str();
            *existing = invitation;
            existing.clone()
        };
        self.push.publish(PushUpdate::Invitation(updated.clone()));
        Ok(updated)
    }

    async fn update_invitation_content(
        &self,
        id: &str,
        content: InvitationContent,
    ) -> Result<Invitation> {
        self.check_write()?;
        let updated = {
            let mut invitations = self.invitations.write().await;
            let existing = invitations
                .get_mut(id)
                .ok_or_else(|| StoreError::NotFound(format!("Invitation {}", id)))?;
            existing.content = content;
            existing.updated_at = now_str();
            existing.clone()
        };
        self.push.publish(PushUpdate::Invitation(updated.clone()));
        Ok(updated)
    }

    async fn delete_invitation(&self, id: &str) -> Result<()> {
        self.check_write()?;
        self.invitations
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(format!("Invitation {}", id)))?;
        self.rsvps.write().await.retain(|r| r.invitation_id != id);
        self.guestbook.write().await.retain(|e| e.invitation_id != id);
        Ok(())
    }

    async fn increment_view_count(&self, id: &str) -> Result<u64> {
        self.check_read()?;
        if self.view_tracking_fails.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("view counter rejected".into()));
        }
        let updated = {
            let mut invitations = self.invitations.write().await;
            let existing = invitations
                .get_mut(id)
                .ok_or_else(|| StoreError::NotFound(format!("Invitation {}", id)))?;
            existing.view_count += 1;
            existing.clone()
        };
        let count = updated.view_count;
        self.push.publish(PushUpdate::Invitation(updated));
        Ok(count)
    }

    async fn create_rsvp(&self, rsvp: NewRsvp) -> Result<Rsvp> {
        self.check_write()?;
        let rsvp = Rsvp::from_new(rsvp);
        self.rsvps.write().await.push(rsvp.clone());
        Ok(rsvp)
    }

    async fn list_rsvps(&self, invitation_id: &str) -> Result<Vec<Rsvp>> {
        self.check_read()?;
        Ok(self
            .rsvps
            .read()
            .await
            .iter()
            .filter(|r| r.invitation_id == invitation_id)
            .cloned()
            .collect())
    }

    async fn create_guestbook_entry(&self, entry: NewGuestbookEntry) -> Result<GuestbookEntry> {
        self.check_write()?;
        let entry = GuestbookEntry::from_new(entry);
        self.guestbook.write().await.push(entry.clone());
        self.publish_guestbook(&entry.invitation_id).await;
        Ok(entry)
    }

    async fn list_guestbook_entries(&self, invitation_id: &str) -> Result<Vec<GuestbookEntry>> {
        self.check_read()?;
        Ok(self.guestbook_for(invitation_id).await)
    }

    async fn subscribe_invitation(&self, invitation_id: &str) -> Result<Subscription> {
        self.check_read()?;
        let delay = self
            .subscribe_delays
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(invitation_id)
            .copied();
        if let Some(delay) = delay {
            debug!("Delaying subscription for invitation_id={} by {:?}", invitation_id, delay);
            tokio::time::sleep(delay).await;
        }
        Ok(self.push.subscribe(invitation_id, Topic::Invitation))
    }

    async fn subscribe_guestbook(&self, invitation_id: &str) -> Result<Subscription> {
        self.check_read()?;
        Ok(self.push.subscribe(invitation_id, Topic::Guestbook))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Attendance;

    async fn seeded_store() -> (MockInvitationStore, Invitation) {
        let store = MockInvitationStore::new();
        let invitation = Invitation::new("owner-1", "Ana & Ben", "ana-ben");
        store.create_invitation(invitation.clone()).await.unwrap();
        (store, invitation)
    }

    #[tokio::test]
    async fn test_get_by_slug_and_not_found() {
        let (store, invitation) = seeded_store().await;

        let found = store.get_invitation_by_slug("ana-ben").await.unwrap();
        assert_eq!(found.id, invitation.id);

        let missing = store.get_invitation_by_slug("nobody").await;
        assert!(matches!(missing, Err(StoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_duplicate_slug_conflicts() {
        let (store, _) = seeded_store().await;
        let other = Invitation::new("owner-2", "Other", "ana-ben");
        let result = store.create_invitation(other).await;
        assert!(matches!(result, Err(StoreError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_guestbook_is_newest_first_and_pushed() {
        let (store, invitation) = seeded_store().await;
        let mut sub = store.subscribe_guestbook(&invitation.id).await.unwrap();

        for name in ["First", "Second"] {
            store
                .create_guestbook_entry(NewGuestbookEntry {
                    invitation_id: invitation.id.clone(),
                    name: name.to_string(),
                    message: "Congrats".to_string(),
                })
                .await
                .unwrap();
        }

        let entries = store.list_guestbook_entries(&invitation.id).await.unwrap();
        assert_eq!(entries[0].name, "Second");
        assert_eq!(entries[1].name, "First");

        let first_push = sub.recv().await.unwrap();
        let second_push = sub.recv().await.unwrap();
        assert_eq!(first_push.invitation_id(), invitation.id);
        match second_push {
            PushUpdate::Guestbook { entries, .. } => assert_eq!(entries.len(), 2),
            other => panic!("unexpected update {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_injected_write_failures_are_consumed() {
        let (store, invitation) = seeded_store().await;
        store.fail_next_writes(1);

        let rsvp = NewRsvp {
            invitation_id: invitation.id.clone(),
            guest_name: "Guest".to_string(),
            attendance: Attendance::Attending,
            guest_count: 2,
            message: None,
        };

        assert!(matches!(
            store.create_rsvp(rsvp.clone()).await,
            Err(StoreError::Unavailable(_))
        ));
        assert!(store.create_rsvp(rsvp).await.is_ok());
        assert_eq!(store.list_rsvps(&invitation.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_removes_related_records() {
        let (store, invitation) = seeded_store().await;
        store
            .create_guestbook_entry(NewGuestbookEntry {
                invitation_id: invitation.id.clone(),
                name: "Guest".to_string(),
                message: "Hi".to_string(),
            })
            .await
            .unwrap();

        store.delete_invitation(&invitation.id).await.unwrap();

        assert!(store.get_invitation(&invitation.id).await.is_err());
        assert!(store
            .list_guestbook_entries(&invitation.id)
            .await
            .unwrap()
            .is_empty());
    }
}
