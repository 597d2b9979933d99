//! Background jobs that run for the life of the server.
//!
//! One job reacts to auth events and drops the sessions of users who sign
//! out. The other sweeps sessions nobody has touched for a while, so the
//! in-memory store does not grow without bound.

use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::{task::JoinHandle, time::interval};

use crate::{
    auth::{AuthEvent, AuthSubscription},
    practice::SessionStore,
    state::ApiState,
};

/// Upper bound on how often idle sessions are swept.
const MAX_SWEEP_INTERVAL: Duration = Duration::from_secs(300);

/// Start all background jobs
///
/// Returns the join handles so the server can abort them on shutdown.
pub fn start_background_jobs(state: &ApiState) -> Vec<JoinHandle<()>> {
    // Subscribe before spawning so no event published after this call is missed.
    let subscription = state.auth.subscribe();
    vec![
        tokio::spawn(evict_signed_out_sessions(subscription, state.sessions.clone())),
        tokio::spawn(periodic_session_sweep_job(
            state.sessions.clone(),
            state.session_idle_ttl,
        )),
    ]
}

async fn evict_signed_out_sessions(mut subscription: AuthSubscription, sessions: SessionStore) {
    while let Some(event) = subscription.recv().await {
        if let AuthEvent::SignedOut { user_id, at } = event {
            let removed = sessions.remove_for_user(user_id, at).await;
            if removed > 0 {
                tracing::info!(%user_id, removed, "Evicted sessions of signed-out user");
            }
        }
    }
    tracing::debug!("Auth context closed, session eviction stopped");
}

/// Drop sessions idle for longer than `ttl`, checking a few times per `ttl`.
async fn periodic_session_sweep_job(sessions: SessionStore, ttl: Duration) {
    let mut interval = interval(sweep_interval(ttl));

    loop {
        interval.tick().await;

        let removed = sweep_idle_sessions(&sessions, ttl, Utc::now()).await;
        if removed > 0 {
            tracing::info!(removed, "Swept idle practice sessions");
        } else {
            tracing::debug!("Session sweep complete: no idle sessions found");
        }
    }
}

/// Remove the sessions whose last activity is more than `ttl` before `now`.
pub async fn sweep_idle_sessions(sessions: &SessionStore, ttl: Duration, now: DateTime<Utc>) -> usize {
    let Ok(ttl) = chrono::Duration::from_std(ttl) else {
        tracing::warn!(?ttl, "Session TTL out of range, skipping sweep");
        return 0;
    };
    sessions.remove_idle(now - ttl).await
}

fn sweep_interval(ttl: Duration) -> Duration {
    (ttl / 4).clamp(Duration::from_secs(1), MAX_SWEEP_INTERVAL)
}
