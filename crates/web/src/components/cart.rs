use leptos::{prelude::*, task::spawn_local};
use pedido_listo::{pricing::format_currency, routes::Route, session::SessionState};
use pedido_listo_app::orders::submit_order;

use crate::{
    router::Link,
    state::{Portal, use_portal},
};

fn submit(portal: Portal, submitting: RwSignal<bool>) {
    if submitting.get_untracked() {
        return;
    }

    submitting.set(true);

    spawn_local(async move {
        let result = submit_order(
            portal.services.orders.as_ref(),
            &portal.session,
            &portal.cart,
            &portal.services.checkout,
        )
        .await;

        match result {
            Ok(checkout) => {
                portal.notices.push(checkout.notice);
                portal.cart_open.set(false);
                portal.navigator.go(checkout.next);
            }
            Err(error) => portal.notices.push(error.notice()),
        }

        submitting.set(false);
    });
}

/// Slide-over cart with totals and order submission.
#[component]
pub fn CartPanel() -> impl IntoView {
    let portal = use_portal();
    let session = portal.session;
    let cart = portal.cart;
    let cart_open = portal.cart_open;
    let rate = portal.services.checkout.tax_rate;
    let submitting = RwSignal::new(false);
    let stored = StoredValue::new(portal);

    view! {
        <Show when=move || cart_open.get()>
            <section class="cart-panel" aria-label="Tu Pedido">
                <header>
                    <h2>"Tu Pedido"</h2>
                    <button type="button" aria-label="Cerrar" on:click=move |_| cart_open.set(false)>
                        "×"
                    </button>
                </header>
                {move || {
                    let snapshot = cart.totals(rate);

                    if snapshot.is_empty() {
                        return view! { <p class="cart-empty">"Tu carrito está vacío."</p> }.into_any();
                    }

                    view! {
                        <ul class="cart-lines">
                            {snapshot
                                .lines
                                .iter()
                                .map(|line| {
                                    let id = line.item_id();
                                    let quantity = i64::from(line.quantity());

                                    view! {
                                        <li class="cart-line">
                                            <div>
                                                <p class="cart-line-name">{line.item().name.clone()}</p>
                                                <p class="cart-line-price">
                                                    {format_currency(line.subtotal())}
                                                </p>
                                            </div>
                                            <div class="cart-line-quantity">
                                                <button
                                                    type="button"
                                                    aria-label="Quitar uno"
                                                    on:click=move |_| cart.set_quantity(id, quantity - 1)
                                                >
                                                    "−"
                                                </button>
                                                <span>{quantity}</span>
                                                <button
                                                    type="button"
                                                    aria-label="Agregar uno"
                                                    on:click=move |_| cart.set_quantity(id, quantity + 1)
                                                >
                                                    "+"
                                                </button>
                                                <button
                                                    type="button"
                                                    class="cart-line-remove"
                                                    on:click=move |_| cart.remove(id)
                                                >
                                                    "Eliminar"
                                                </button>
                                            </div>
                                            <input
                                                type="text"
                                                placeholder="Notas (ej. sin cebolla)"
                                                prop:value=line.note().to_string()
                                                on:change=move |event| {
                                                    cart.set_note(id, event_target_value(&event));
                                                }
                                            />
                                        </li>
                                    }
                                })
                                .collect_view()}
                        </ul>
                        <dl class="cart-totals">
                            <dt>"Subtotal"</dt>
                            <dd>{format_currency(snapshot.subtotal)}</dd>
                            <dt>{format!("IVA ({})", snapshot.tax_rate)}</dt>
                            <dd>{format_currency(snapshot.tax)}</dd>
                            <dt class="cart-total">"Total"</dt>
                            <dd class="cart-total">{format_currency(snapshot.total)}</dd>
                        </dl>
                        {match session.state() {
                            SessionState::Authenticated(_) => view! {
                                <button
                                    type="button"
                                    class="primary"
                                    disabled=move || submitting.get()
                                    on:click=move |_| submit(stored.get_value(), submitting)
                                >
                                    {move || if submitting.get() { "Enviando..." } else { "Enviar Pedido" }}
                                </button>
                            }
                                .into_any(),
                            SessionState::Unknown | SessionState::Anonymous => view! {
                                <div class="cart-sign-in">
                                    <p>"Por favor, inicia sesión o regístrate para completar tu pedido."</p>
                                    <Link to=Route::Login>"Iniciar Sesión"</Link>
                                    <Link to=Route::Register>"Registrarse"</Link>
                                </div>
                            }
                                .into_any(),
                        }}
                    }
                        .into_any()
                }}
            </section>
        </Show>
    }
}
