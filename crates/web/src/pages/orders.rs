use leptos::prelude::*;
use pedido_listo::{
    dates::format_date,
    orders::{Order, orders_for_customer},
    pricing::format_currency,
};

use crate::{
    pages::{Loading, load_into},
    state::use_portal,
};

/// Status badge shared by the customer and staff order tables.
#[component]
pub fn StatusBadge(label: &'static str) -> impl IntoView {
    let class = format!("status status-{}", label.to_lowercase());

    view! { <span class=class>{label}</span> }
}

fn order_row(order: Order) -> impl IntoView {
    let lines = order
        .details
        .iter()
        .map(|detail| {
            let note = detail
                .note
                .as_deref()
                .filter(|note| !note.trim().is_empty())
                .map(|note| view! { <em class="order-line-note">{format!(" ({note})")}</em> });

            view! {
                <li>
                    {format!("{} × {}", detail.quantity, detail.dish_name())}
                    {note}
                </li>
            }
        })
        .collect_view();

    view! {
        <tr>
            <td>{format!("#{}", order.id)}</td>
            <td>{format_date(&order.placed_at)}</td>
            <td><StatusBadge label=order.status.as_str() /></td>
            <td><ul class="order-lines">{lines}</ul></td>
            <td class="amount">{format_currency(order.total)}</td>
        </tr>
    }
}

/// Order history of the signed-in customer, newest first.
#[component]
pub fn OrdersPage() -> impl IntoView {
    let portal = use_portal();
    let orders_service = portal.services.orders;
    let customer = portal.session.user().map(|user| user.national_id);
    let orders = RwSignal::new(Vec::<Order>::new());
    let loading = RwSignal::new(true);

    load_into(orders, loading, "Error al cargar pedidos", async move {
        let all = orders_service.list_orders().await?;

        Ok(customer.map_or_else(Vec::new, |customer| orders_for_customer(all, &customer)))
    });

    view! {
        <section class="orders-page">
            <h1>"Mis Pedidos"</h1>
            <Show when=move || !loading.get() fallback=Loading>
                <Show
                    when=move || orders.with(|orders| !orders.is_empty())
                    fallback=|| view! { <p class="empty">"Aún no has realizado pedidos."</p> }
                >
                    <table class="data-table">
                        <thead>
                            <tr>
                                <th>"Pedido"</th>
                                <th>"Fecha"</th>
                                <th>"Estado"</th>
                                <th>"Detalle"</th>
                                <th>"Total"</th>
                            </tr>
                        </thead>
                        <tbody>
                            <For each=move || orders.get() key=|order| order.id children=order_row />
                        </tbody>
                    </table>
                </Show>
            </Show>
        </section>
    }
}
