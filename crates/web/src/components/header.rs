use leptos::prelude::*;
use pedido_listo::{routes::Route, session::Role};
use pedido_listo_app::auth::flow;

use crate::{router::Link, state::use_portal};

fn initials(first_name: &str, last_name: &str) -> String {
    first_name
        .chars()
        .next()
        .into_iter()
        .chain(last_name.chars().next())
        .flat_map(char::to_uppercase)
        .collect()
}

#[component]
pub fn Header() -> impl IntoView {
    let portal = use_portal();
    let session = portal.session;
    let cart = portal.cart;
    let cart_open = portal.cart_open;
    let navigator = portal.navigator;

    let is_staff = move || session.state().role().is_some_and(Role::is_staff);

    view! {
        <header class="site-header">
            <Link to=Route::Home class="logo">
                "Pedido Listo"
            </Link>
            <nav class="site-nav">
                <Show when=move || !is_staff()>
                    <button
                        type="button"
                        class="cart-toggle"
                        aria-label="Abrir carrito"
                        on:click=move |_| cart_open.update(|open| *open = !*open)
                    >
                        "Carrito"
                        <span class="cart-count">{move || cart.count()}</span>
                    </button>
                </Show>
                {move || match session.user() {
                    Some(user) => {
                        let badge = initials(&user.first_name, &user.last_name);
                        let full_name = user.full_name();
                        let email = user.email.clone();

                        view! {
                            <div class="user-menu">
                                <span class="avatar" title=full_name.clone()>{badge}</span>
                                <div class="user-details">
                                    <p class="user-name">{full_name}</p>
                                    <p class="user-email">{email}</p>
                                </div>
                                {if is_staff() {
                                    view! { <Link to=Route::AdminOrders>"Panel de Admin"</Link> }
                                        .into_any()
                                } else {
                                    view! {
                                        <Link to=Route::Orders>"Mis Pedidos"</Link>
                                        <Link to=Route::Invoices>"Mis Facturas"</Link>
                                    }
                                        .into_any()
                                }}
                                <button
                                    type="button"
                                    on:click=move |_| navigator.go(flow::logout(&session))
                                >
                                    "Cerrar sesión"
                                </button>
                            </div>
                        }
                            .into_any()
                    }
                    None => view! {
                        <div class="auth-links">
                            <Link to=Route::Login>"Iniciar Sesión"</Link>
                            <Link to=Route::Register class="primary">
                                "Registrarse"
                            </Link>
                        </div>
                    }
                        .into_any(),
                }}
            </nav>
        </header>
    }
}
