//! History-based routing.

use leptos::{ev, prelude::*};
use pedido_listo::{
    access::{GuardOutcome, guard},
    routes::Route,
};
use tracing::{debug, warn};
use wasm_bindgen::JsValue;

use crate::{state::use_portal, storage::js_message};

/// Current view, kept in step with the address bar.
#[derive(Debug, Clone, Copy)]
pub struct Navigator {
    route: RwSignal<Route>,
}

impl Navigator {
    /// Starts at the page's location and follows back/forward navigation.
    pub fn install() -> Self {
        let route = RwSignal::new(location_route());

        let popstate = window_event_listener(ev::popstate, move |_| {
            route.set(location_route());
        });

        on_cleanup(move || popstate.remove());

        Self { route }
    }

    /// Current view; tracked.
    pub fn current(self) -> Route {
        self.route.get()
    }

    /// Opens `route`, adding a history entry.
    pub fn go(self, route: Route) {
        self.change(route, HistoryMode::Push);
    }

    /// Opens `route` in place of the current history entry.
    pub fn replace(self, route: Route) {
        self.change(route, HistoryMode::Replace);
    }

    fn change(self, route: Route, mode: HistoryMode) {
        let path = route.path();

        debug!(%path, "navigating");

        if let Err(error) = write_history(&path, mode) {
            warn!(%error, %path, "history not updated");
        }

        self.route.set(route);
    }
}

#[derive(Debug, Clone, Copy)]
enum HistoryMode {
    Push,
    Replace,
}

fn write_history(path: &str, mode: HistoryMode) -> Result<(), String> {
    let history = web_sys::window()
        .ok_or_else(|| "no window".to_string())?
        .history()
        .map_err(|error| js_message(&error))?;

    match mode {
        HistoryMode::Push => history.push_state_with_url(&JsValue::NULL, "", Some(path)),
        HistoryMode::Replace => history.replace_state_with_url(&JsValue::NULL, "", Some(path)),
    }
    .map_err(|error| js_message(&error))
}

fn location_route() -> Route {
    web_sys::window()
        .and_then(|window| window.location().pathname().ok())
        .map_or(Route::Home, |path| Route::parse(&path))
}

/// Anchor that navigates without reloading the page.
#[component]
pub fn Link(
    to: Route,
    #[prop(optional, into)] class: String,
    children: Children,
) -> impl IntoView {
    let navigator = use_portal().navigator;

    view! {
        <a
            href=to.path()
            class=class
            on:click=move |event| {
                event.prevent_default();
                navigator.go(to);
            }
        >
            {children()}
        </a>
    }
}

/// Renders `children` only when the signed-in role may open `route`;
/// otherwise redirects to login or to the role's landing view.
#[component]
pub fn Protected(route: Route, children: ChildrenFn) -> impl IntoView {
    let portal = use_portal();
    let session = portal.session;
    let navigator = portal.navigator;

    Effect::new(move |_| {
        if let GuardOutcome::Redirect(target) = guard(session.state(), route) {
            navigator.replace(target);
        }
    });

    move || match guard(session.state(), route) {
        GuardOutcome::Render => children().into_any(),
        GuardOutcome::Placeholder | GuardOutcome::Redirect(_) => view! {
            <p class="loading">"Cargando..."</p>
        }
        .into_any(),
    }
}
