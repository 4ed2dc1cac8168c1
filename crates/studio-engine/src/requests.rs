//! Cancellation tokens of in-flight requests, one per action.

use std::collections::HashMap;

use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::action::ActionKind;

#[derive(Debug, Clone)]
pub struct InFlight {
    pub request_id: Uuid,
    pub token: CancellationToken,
}

#[derive(Debug, Default)]
pub struct RequestRegistry {
    in_flight: RwLock<HashMap<ActionKind, InFlight>>,
}

impl RequestRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new request for `kind`, cancelling the one it supersedes.
    pub async fn begin(&self, kind: ActionKind) -> InFlight {
        let entry = InFlight {
            request_id: Uuid::new_v4(),
            token: CancellationToken::new(),
        };

        let mut in_flight = self.in_flight.write().await;
        if let Some(previous) = in_flight.insert(kind, entry.clone()) {
            log::debug!(
                "[{}] Request {} superseded by {}",
                kind,
                previous.request_id,
                entry.request_id
            );
            previous.token.cancel();
        }
        entry
    }

    /// Drop the entry if it still belongs to `request_id`.
    pub async fn finish(&self, kind: ActionKind, request_id: Uuid) {
        let mut in_flight = self.in_flight.write().await;
        if in_flight
            .get(&kind)
            .is_some_and(|entry| entry.request_id == request_id)
        {
            in_flight.remove(&kind);
        }
    }

    /// Cancel the in-flight request of `kind`, if any.
    pub async fn cancel(&self, kind: ActionKind) -> Option<Uuid> {
        let entry = self.in_flight.write().await.remove(&kind)?;
        entry.token.cancel();
        Some(entry.request_id)
    }

    /// Cancel every in-flight request.
    pub async fn cancel_all(&self) -> Vec<(ActionKind, Uuid)> {
        let mut in_flight = self.in_flight.write().await;
        in_flight
            .drain()
            .map(|(kind, entry)| {
                entry.token.cancel();
                (kind, entry.request_id)
            })
            .collect()
    }

    #[cfg(test)]
    pub(crate) async fn is_in_flight(&self, kind: ActionKind) -> bool {
        self.in_flight.read().await.contains_key(&kind)
    }
}
