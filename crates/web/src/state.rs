//! Reactive portal state
//!
//! The session and cart stores live in signals so views re-render when they
//! change; the same handles back the app crate's slots so flows can read and
//! update them.

use std::time::Duration;

use leptos::prelude::*;
use pedido_listo::{
    cart::{AddedToCart, CartLine, CartSnapshot, CartStore},
    menu::{MenuItem, MenuItemId},
    notice::Notice,
    pricing::TaxRate,
    session::{BearerToken, Session, SessionState, SessionStore, UserProfile},
};
use pedido_listo_app::{
    backend::TokenSource,
    context::AppContext,
    state::{CartSlot, SessionSlot},
};
use tracing::warn;

use crate::{router::Navigator, storage::BrowserStorage};

const NOTICE_LIFETIME: Duration = Duration::from_secs(5);

/// The persisted session, observable from views.
#[derive(Debug, Clone, Copy)]
pub struct SessionHandle(RwSignal<SessionStore<BrowserStorage>>);

impl SessionHandle {
    /// Restores the persisted session.
    pub fn load() -> Self {
        Self(RwSignal::new(SessionStore::load(BrowserStorage)))
    }

    /// Router view of the session; tracked.
    pub fn state(self) -> SessionState {
        self.0.with(SessionStore::state)
    }

    /// Signed-in user; tracked.
    pub fn user(self) -> Option<UserProfile> {
        self.0.with(|store| store.current().map(|session| session.user.clone()))
    }
}

impl SessionSlot for SessionHandle {
    fn current(&self) -> Option<Session> {
        self.0.with_untracked(|store| store.current().cloned())
    }

    fn state(&self) -> SessionState {
        self.0.with_untracked(SessionStore::state)
    }

    fn begin(&self, session: Session) {
        self.0.update(|store| {
            if let Err(error) = store.begin(session) {
                warn!(%error, "session not persisted");
            }
        });
    }

    fn end(&self) {
        self.0.update(|store| {
            if let Err(error) = store.end() {
                warn!(%error, "persisted session not removed");
            }
        });
    }
}

impl TokenSource for SessionHandle {
    fn bearer(&self) -> Option<BearerToken> {
        self.0
            .with_untracked(|store| store.current().map(|session| session.token.clone()))
    }
}

/// The persisted cart, observable from views.
#[derive(Debug, Clone, Copy)]
pub struct CartHandle(RwSignal<CartStore<BrowserStorage>>);

impl CartHandle {
    /// Restores the persisted cart.
    pub fn load() -> Self {
        Self(RwSignal::new(CartStore::load(BrowserStorage)))
    }

    pub fn add(self, item: &MenuItem) -> Option<AddedToCart> {
        self.0.try_update(|cart| cart.add_item(item))
    }

    pub fn remove(self, id: MenuItemId) {
        self.0.update(|cart| cart.remove_item(id));
    }

    pub fn set_quantity(self, id: MenuItemId, quantity: i64) {
        self.0.update(|cart| cart.set_quantity(id, quantity));
    }

    pub fn set_note(self, id: MenuItemId, note: String) {
        self.0.update(|cart| cart.set_note(id, note));
    }

    /// Lines; tracked.
    pub fn lines(self) -> Vec<CartLine> {
        self.0.with(|cart| cart.lines().to_vec())
    }

    /// Units in the cart; tracked.
    pub fn count(self) -> u32 {
        self.0.with(CartStore::count)
    }

    /// Lines and totals; tracked.
    pub fn totals(self, rate: TaxRate) -> CartSnapshot {
        self.0.with(|cart| cart.snapshot(rate))
    }
}

impl CartSlot for CartHandle {
    fn snapshot(&self, rate: TaxRate) -> CartSnapshot {
        self.0.with_untracked(|cart| cart.snapshot(rate))
    }

    fn clear(&self) {
        self.0.update(CartStore::clear);
    }
}

/// Toast queue. Each notice disappears on its own after a few seconds.
#[derive(Debug, Clone, Copy)]
pub struct Notices {
    shown: RwSignal<Vec<(u64, Notice)>>,
    next_id: StoredValue<u64>,
}

impl Notices {
    pub fn new() -> Self {
        Self {
            shown: RwSignal::new(Vec::new()),
            next_id: StoredValue::new(0),
        }
    }

    pub fn push(self, notice: Notice) {
        let id = self.next_id.get_value();

        self.next_id.set_value(id.wrapping_add(1));
        self.shown.update(|shown| shown.push((id, notice)));

        set_timeout(move || self.dismiss(id), NOTICE_LIFETIME);
    }

    pub fn dismiss(self, id: u64) {
        self.shown.update(|shown| shown.retain(|(shown_id, _)| *shown_id != id));
    }

    /// Notices on screen; tracked.
    pub fn shown(self) -> Vec<(u64, Notice)> {
        self.shown.get()
    }
}

impl Default for Notices {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything views reach through context.
#[derive(Debug, Clone)]
pub struct Portal {
    /// Backend services and checkout settings.
    pub services: AppContext,

    pub session: SessionHandle,
    pub cart: CartHandle,
    pub notices: Notices,
    pub navigator: Navigator,

    /// Whether the cart panel is open.
    pub cart_open: RwSignal<bool>,
}

/// The portal provided by the app shell.
pub fn use_portal() -> Portal {
    expect_context::<Portal>()
}
