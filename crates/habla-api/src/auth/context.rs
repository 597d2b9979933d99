//! Process-wide view of who is signed in.
//!
//! The context is an explicit value held in [`ApiState`](crate::state::ApiState)
//! and handed to whatever needs it. Listeners get an [`AuthSubscription`] and
//! release it by dropping it or calling [`AuthSubscription::unsubscribe`].

use std::{collections::HashMap, sync::Arc};

use chrono::{DateTime, Utc};
use tokio::sync::{RwLock, broadcast};
use uuid::Uuid;

use super::middleware::AuthUser;

const EVENT_CAPACITY: usize = 64;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AuthEvent {
    SignedIn(AuthUser),
    /// `at` is when the sign-out happened. Anything the user started later
    /// belongs to a new sign-in.
    SignedOut { user_id: Uuid, at: DateTime<Utc> },
}

#[derive(Clone, Debug)]
pub struct AuthContext {
    users: Arc<RwLock<HashMap<Uuid, AuthUser>>>,
    events: broadcast::Sender<AuthEvent>,
}

impl Default for AuthContext {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthContext {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            users: Arc::new(RwLock::new(HashMap::new())),
            events,
        }
    }

    /// Record `user` as signed in.
    ///
    /// Subscribers only hear about it when the user is new or their identity
    /// changed, so every authenticated request can call this.
    pub async fn sign_in(&self, user: AuthUser) {
        let previous = self.users.write().await.insert(user.user_id, user.clone());
        if previous.as_ref() != Some(&user) {
            tracing::debug!(user_id = %user.user_id, "User signed in");
            // No subscribers is fine.
            let _ = self.events.send(AuthEvent::SignedIn(user));
        }
    }

    /// Forget `user_id`. Returns whether the user was signed in.
    pub async fn sign_out(&self, user_id: Uuid) -> bool {
        let removed = self.users.write().await.remove(&user_id).is_some();
        tracing::debug!(%user_id, removed, "User signed out");
        let _ = self.events.send(AuthEvent::SignedOut {
            user_id,
            at: Utc::now(),
        });
        removed
    }

    pub async fn current(&self, user_id: Uuid) -> Option<AuthUser> {
        self.users.read().await.get(&user_id).cloned()
    }

    pub fn subscribe(&self) -> AuthSubscription {
        AuthSubscription {
            receiver: self.events.subscribe(),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.events.receiver_count()
    }
}

/// A live registration for auth events.
#[derive(Debug)]
pub struct AuthSubscription {
    receiver: broadcast::Receiver<AuthEvent>,
}

impl AuthSubscription {
    /// Wait for the next event. `None` once the context is gone.
    pub async fn recv(&mut self) -> Option<AuthEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Auth subscriber lagged behind");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    pub fn unsubscribe(self) {
        drop(self);
    }
}
