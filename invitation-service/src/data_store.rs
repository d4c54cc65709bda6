use log::{debug, error, info, warn};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{watch, Mutex as AsyncMutex};
use tokio::task::JoinHandle;
use vowcard_shared::models::events::PushUpdate;
use vowcard_shared::models::{
    GuestbookEntry, Invitation, NewGuestbookEntry, NewRsvp, Rsvp, RsvpSummary,
};
use vowcard_shared::store::{InvitationStore, Result, StoreError, Subscription};

/// What the guest-facing pages render.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GuestViewState {
    pub invitation: Option<Invitation>,
    pub rsvps: Vec<Rsvp>,
    pub guestbook: Vec<GuestbookEntry>,
    pub loading: bool,
    pub error: Option<String>,
}

impl GuestViewState {
    pub fn invitation_id(&self) -> Option<&str> {
        self.invitation.as_ref().map(|inv| inv.id.as_str())
    }
}

fn error_message(err: &StoreError) -> String {
    match err {
        StoreError::NotFound(_) => "Invitation not found".to_string(),
        other => other.to_string(),
    }
}

/// Client-side cache of the invitation being viewed, kept current through
/// push subscriptions.
///
/// The guestbook and the invitation document are push-subscribed. RSVPs are
/// not: they are refreshed after each submission or on `reload_rsvps`.
pub struct InvitationDataStore<S>
where
    S: InvitationStore + ?Sized + 'static,
{
    remote: Arc<S>,
    state: Arc<watch::Sender<GuestViewState>>,
    subscriptions: Mutex<Vec<JoinHandle<()>>>,
    // Held for the whole of a load so subscriptions of overlapping loads never mix
    load_lock: AsyncMutex<()>,
}

impl<S> InvitationDataStore<S>
where
    S: InvitationStore + ?Sized + 'static,
{
    pub fn new(remote: Arc<S>) -> Self {
        let (tx, _rx) = watch::channel(GuestViewState::default());
        Self {
            remote,
            state: Arc::new(tx),
            subscriptions: Mutex::new(Vec::new()),
            load_lock: AsyncMutex::new(()),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<GuestViewState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> GuestViewState {
        self.state.borrow().clone()
    }

    pub fn current_invitation_id(&self) -> Option<String> {
        self.state.borrow().invitation_id().map(str::to_string)
    }

    pub fn rsvp_summary(&self) -> RsvpSummary {
        RsvpSummary::from_rsvps(&self.state.borrow().rsvps)
    }

    /// Loads the invitation behind `slug`, replacing whatever was loaded
    /// before, then subscribes to pushes and records a view.
    ///
    /// Concurrent loads run one after another. A failed load leaves nothing
    /// loaded and no subscription open.
    pub async fn load_by_slug(&self, slug: &str) -> Result<Invitation> {
        let _guard = self.load_lock.lock().await;
        info!("Loading invitation by slug: {}", slug);
        self.state.send_modify(|s| {
            s.loading = true;
            s.error = None;
        });

        match self.fetch_and_subscribe(slug).await {
            Ok(invitation) => Ok(invitation),
            Err(e) => {
                error!("Failed to load invitation with slug {}: {}", slug, e);
                let message = error_message(&e);
                self.teardown();
                self.state.send_modify(|s| {
                    s.invitation = None;
                    s.rsvps.clear();
                    s.guestbook.clear();
                    s.loading = false;
                    s.error = Some(message);
                });
                Err(e)
            }
        }
    }

    async fn fetch_and_subscribe(&self, slug: &str) -> Result<Invitation> {
        let invitation = self.remote.get_invitation_by_slug(slug).await?;
        let rsvps = self.remote.list_rsvps(&invitation.id).await?;
        let guestbook = self.remote.list_guestbook_entries(&invitation.id).await?;

        self.teardown();

        let loaded = invitation.clone();
        self.state.send_modify(move |s| {
            s.invitation = Some(loaded);
            s.rsvps = rsvps;
            s.guestbook = guestbook;
            s.loading = false;
            s.error = None;
        });

        self.subscribe_to(&invitation.id).await;
        self.record_view(&invitation.id);

        Ok(invitation)
    }

    /// Best effort: failures are logged and never reach the guest.
    fn record_view(&self, invitation_id: &str) {
        let remote = Arc::clone(&self.remote);
        let invitation_id = invitation_id.to_string();
        tokio::spawn(async move {
            match remote.increment_view_count(&invitation_id).await {
                Ok(count) => debug!(
                    "Recorded view for invitation_id={}, views={}",
                    invitation_id, count
                ),
                Err(e) => error!(
                    "Failed to record view for invitation_id={}: {}",
                    invitation_id, e
                ),
            }
        });
    }

    async fn subscribe_to(&self, invitation_id: &str) {
        let mut handles = Vec::new();

        match self.remote.subscribe_invitation(invitation_id).await {
            Ok(rx) => handles.push(self.spawn_listener(rx)),
            Err(e) => warn!(
                "Could not subscribe to invitation_id={}: {}",
                invitation_id, e
            ),
        }

        match self.remote.subscribe_guestbook(invitation_id).await {
            Ok(rx) => handles.push(self.spawn_listener(rx)),
            Err(e) => warn!(
                "Could not subscribe to guestbook of invitation_id={}: {}",
                invitation_id, e
            ),
        }

        debug!(
            "Established {} subscription(s) for invitation_id={}",
            handles.len(),
            invitation_id
        );
        self.subscriptions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend(handles);
    }

    fn spawn_listener(&self, mut rx: Subscription) -> JoinHandle<()> {
        let state = Arc::clone(&self.state);
        tokio::spawn(async move {
            while let Some(update) = rx.recv().await {
                apply_push(&state, update);
            }
        })
    }

    /// Ends every active push subscription.
    pub fn teardown(&self) {
        let handles: Vec<JoinHandle<()>> = self
            .subscriptions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .drain(..)
            .collect();
        if !handles.is_empty() {
            debug!("Tearing down {} subscription(s)", handles.len());
        }
        for handle in handles {
            handle.abort();
        }
    }

    pub fn active_subscriptions(&self) -> usize {
        self.subscriptions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|h| !h.is_finished())
            .count()
    }

    /// Appends an RSVP, then reloads the RSVP list since it is not pushed.
    pub async fn submit_rsvp(&self, rsvp: NewRsvp) -> Result<Rsvp> {
        let created = self.remote.create_rsvp(rsvp).await?;
        info!(
            "RSVP {} submitted for invitation_id={}",
            created.id, created.invitation_id
        );
        if let Err(e) = self.reload_rsvps().await {
            warn!("RSVP saved but reloading the list failed: {}", e);
        }
        Ok(created)
    }

    /// The new entry reaches the local guestbook through the push subscription.
    pub async fn submit_guestbook_entry(&self, entry: NewGuestbookEntry) -> Result<GuestbookEntry> {
        let created = self.remote.create_guestbook_entry(entry).await?;
        info!(
            "Guestbook entry {} submitted for invitation_id={}",
            created.id, created.invitation_id
        );
        Ok(created)
    }

    pub async fn reload_rsvps(&self) -> Result<()> {
        let Some(invitation_id) = self.current_invitation_id() else {
            return Ok(());
        };
        let rsvps = self.remote.list_rsvps(&invitation_id).await?;
        self.state.send_if_modified(move |s| {
            if s.invitation_id() != Some(invitation_id.as_str()) {
                return false;
            }
            s.rsvps = rsvps;
            true
        });
        Ok(())
    }
}

impl<S> Drop for InvitationDataStore<S>
where
    S: InvitationStore + ?Sized + 'static,
{
    fn drop(&mut self) {
        self.teardown();
    }
}

/// Applies a push update unless it belongs to an invitation other than the
/// one currently loaded. Last writer wins.
fn apply_push(state: &watch::Sender<GuestViewState>, update: PushUpdate) {
    state.send_if_modified(move |s| {
        if s.invitation_id() != Some(update.invitation_id()) {
            debug!(
                "Dropping push update for invitation_id={}, not the loaded invitation",
                update.invitation_id()
            );
            return false;
        }
        match update {
            PushUpdate::Invitation(invitation) => s.invitation = Some(invitation),
            PushUpdate::Guestbook { entries, .. } => s.guestbook = entries,
        }
        true
    });
}
