//! Pedido Listo browser portal

use std::sync::Arc;

use leptos::prelude::*;
use pedido_listo::routes::Route;
use pedido_listo_app::{config::PortalConfig, context::AppContext, observability::init_logging};
use tracing::{error, info};

mod components;
mod logging;
mod pages;
mod router;
mod state;
mod storage;

use crate::{
    components::{cart::CartPanel, header::Header, toasts::Toasts},
    pages::{
        admin::{
            AdminLayout, audit::AdminAuditPage, billing::AdminBillingPage,
            customers::AdminCustomersPage, dishes::AdminDishesPage, orders::AdminOrdersPage,
        },
        auth::{LoginPage, RegisterPage},
        invoices::{InvoicePrintPage, InvoicesPage},
        menu::MenuPage,
        not_found::NotFoundPage,
        orders::OrdersPage,
    },
    router::{Navigator, Protected},
    state::{CartHandle, Notices, Portal, SessionHandle},
};

/// Settings baked in at build time, passed through the same parser the
/// native tooling uses.
const BUILD_SETTINGS: [(&str, Option<&str>); 6] = [
    ("--graphql-url", option_env!("PEDIDO_LISTO_GRAPHQL_URL")),
    ("--rest-url", option_env!("PEDIDO_LISTO_REST_URL")),
    ("--tax-rate", option_env!("PEDIDO_LISTO_TAX_RATE")),
    ("--submission-mode", option_env!("PEDIDO_LISTO_SUBMISSION_MODE")),
    ("--delivery-type", option_env!("PEDIDO_LISTO_DELIVERY_TYPE")),
    ("--log-level", option_env!("RUST_LOG")),
];

fn load_config() -> Result<PortalConfig, String> {
    let args = std::iter::once("pedido-listo".to_string()).chain(
        BUILD_SETTINGS
            .into_iter()
            .filter_map(|(flag, value)| value.map(|value| format!("{flag}={value}"))),
    );

    let mut config = PortalConfig::from_args(args).map_err(|error| error.to_string())?;

    // The browser has no clock tracing-subscriber can read.
    config.logging.timestamps = false;

    Ok(config)
}

fn page_origin() -> Option<String> {
    web_sys::window().and_then(|window| window.location().origin().ok())
}

/// Current view, wrapped in its guard and layout.
#[component]
fn Shell() -> impl IntoView {
    let navigator = expect_context::<Portal>().navigator;

    move || {
        let route = navigator.current();

        match route.canonical() {
            Route::Home => view! { <MenuPage /> }.into_any(),
            Route::Login => view! { <LoginPage /> }.into_any(),
            Route::Register => view! { <RegisterPage /> }.into_any(),
            Route::Orders => view! {
                <Protected route=route>
                    <OrdersPage />
                </Protected>
            }
            .into_any(),
            Route::Invoices => view! {
                <Protected route=route>
                    <InvoicesPage />
                </Protected>
            }
            .into_any(),
            Route::InvoicePrint(id) => view! {
                <Protected route=route>
                    <InvoicePrintPage id=id staff=false />
                </Protected>
            }
            .into_any(),
            Route::Admin | Route::AdminOrders => view! {
                <Protected route=route>
                    <AdminLayout>
                        <AdminOrdersPage />
                    </AdminLayout>
                </Protected>
            }
            .into_any(),
            Route::AdminDishes => view! {
                <Protected route=route>
                    <AdminLayout>
                        <AdminDishesPage />
                    </AdminLayout>
                </Protected>
            }
            .into_any(),
            Route::AdminCustomers => view! {
                <Protected route=route>
                    <AdminLayout>
                        <AdminCustomersPage />
                    </AdminLayout>
                </Protected>
            }
            .into_any(),
            Route::AdminAudit => view! {
                <Protected route=route>
                    <AdminLayout>
                        <AdminAuditPage />
                    </AdminLayout>
                </Protected>
            }
            .into_any(),
            Route::AdminBilling => view! {
                <Protected route=route>
                    <AdminLayout>
                        <AdminBillingPage />
                    </AdminLayout>
                </Protected>
            }
            .into_any(),
            Route::AdminBillingPrint(id) => view! {
                <Protected route=route>
                    <InvoicePrintPage id=id staff=true />
                </Protected>
            }
            .into_any(),
            Route::NotFound => view! { <NotFoundPage /> }.into_any(),
        }
    }
}

/// Portal root: builds the services and shared state, then renders the shell.
#[component]
fn App(config: PortalConfig) -> impl IntoView {
    let session = SessionHandle::load();
    let origin = page_origin();

    let services = match AppContext::from_config(&config, origin.as_deref(), Arc::new(session)) {
        Ok(services) => services,
        Err(error) => {
            error!(%error, "portal not started");

            return view! { <ConfigurationError message=error.to_string() /> }.into_any();
        }
    };

    info!(origin = origin.as_deref().unwrap_or("-"), "portal started");

    provide_context(Portal {
        services,
        session,
        cart: CartHandle::load(),
        notices: Notices::new(),
        navigator: Navigator::install(),
        cart_open: RwSignal::new(false),
    });

    view! {
        <Header />
        <Toasts />
        <CartPanel />
        <main class="portal-content">
            <Shell />
        </main>
    }
    .into_any()
}

#[component]
fn ConfigurationError(message: String) -> impl IntoView {
    view! {
        <main class="portal-content">
            <h1>"Pedido Listo"</h1>
            <p class="config-error">{message}</p>
        </main>
    }
}

fn main() {
    console_error_panic_hook::set_once();

    let config = match load_config() {
        Ok(config) => config,
        Err(message) => {
            leptos::mount::mount_to_body(move || view! { <ConfigurationError message=message /> });
            return;
        }
    };

    if let Err(error) = init_logging(&config.logging, logging::ConsoleMakeWriter) {
        web_sys::console::warn_1(&format!("logging not initialised: {error}").into());
    }

    leptos::mount::mount_to_body(move || view! { <App config=config /> });
}
