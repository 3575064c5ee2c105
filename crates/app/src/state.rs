//! Shared portal state
//!
//! Flows reach the session and cart through these slots instead of owning
//! them, so the browser's reactive signals and plain locks in tests can both
//! back them.

use std::sync::{PoisonError, RwLock};

use pedido_listo::{
    cart::{CartSnapshot, CartStore},
    pricing::TaxRate,
    session::{BearerToken, Session, SessionState, SessionStore},
    storage::KeyValueStore,
};
use tracing::warn;

use crate::backend::TokenSource;

/// Holder of the current session.
pub trait SessionSlot: Send + Sync {
    /// Current session, if any.
    fn current(&self) -> Option<Session>;

    /// Router view of the session.
    fn state(&self) -> SessionState;

    /// Makes `session` current and persists it.
    fn begin(&self, session: Session);

    /// Forgets the current session.
    fn end(&self);
}

/// Holder of the cart.
pub trait CartSlot: Send + Sync {
    /// Lines and totals at `rate`.
    fn snapshot(&self, rate: TaxRate) -> CartSnapshot;

    /// Removes every line.
    fn clear(&self);
}

impl<S: KeyValueStore> SessionSlot for RwLock<SessionStore<S>> {
    fn current(&self) -> Option<Session> {
        self.read()
            .unwrap_or_else(PoisonError::into_inner)
            .current()
            .cloned()
    }

    fn state(&self) -> SessionState {
        self.read().unwrap_or_else(PoisonError::into_inner).state()
    }

    fn begin(&self, session: Session) {
        let mut sessions = self.write().unwrap_or_else(PoisonError::into_inner);

        if let Err(error) = sessions.begin(session) {
            warn!(%error, "session not persisted");
        }
    }

    fn end(&self) {
        let mut sessions = self.write().unwrap_or_else(PoisonError::into_inner);

        if let Err(error) = sessions.end() {
            warn!(%error, "persisted session not removed");
        }
    }
}

impl<S: KeyValueStore> TokenSource for RwLock<SessionStore<S>> {
    fn bearer(&self) -> Option<BearerToken> {
        self.current().map(|session| session.token)
    }
}

impl<S: KeyValueStore> CartSlot for RwLock<CartStore<S>> {
    fn snapshot(&self, rate: TaxRate) -> CartSnapshot {
        self.read()
            .unwrap_or_else(PoisonError::into_inner)
            .snapshot(rate)
    }

    fn clear(&self) {
        self.write().unwrap_or_else(PoisonError::into_inner).clear();
    }
}
