//! Views, one per route.

use std::future::Future;

use leptos::{prelude::*, task::spawn_local};
use pedido_listo::notice::Notice;
use pedido_listo_app::backend::BackendError;
use tracing::warn;

use crate::state::use_portal;

pub mod admin;
pub mod auth;
pub mod invoices;
pub mod menu;
pub mod not_found;
pub mod orders;

pub(crate) const LOAD_FAILED: &str = "No se pudieron obtener los datos de la API.";

/// Fills `target` from `fetch`, then clears `loading`.
///
/// A failed fetch keeps whatever `target` held and raises an error notice
/// titled `title`.
pub(crate) fn load_into<T, F>(
    target: RwSignal<Vec<T>>,
    loading: RwSignal<bool>,
    title: &'static str,
    fetch: F,
) where
    T: Send + Sync + 'static,
    F: Future<Output = Result<Vec<T>, BackendError>> + 'static,
{
    let notices = use_portal().notices;

    spawn_local(async move {
        match fetch.await {
            Ok(items) => target.set(items),
            Err(error) => {
                warn!(%error, view = title, "load failed");
                notices.push(Notice::error(title, error.user_message(LOAD_FAILED)));
            }
        }

        loading.set(false);
    });
}

/// Placeholder shown while a view's data loads.
#[component]
pub fn Loading() -> impl IntoView {
    view! { <p class="loading">"Cargando..."</p> }
}
