use leptos::{prelude::*, task::spawn_local};
use pedido_listo::{
    dates::format_date_time,
    invoices::NewInvoice,
    notice::Notice,
    orders::{Order, OrderId, OrderStatus, apply_status, sort_newest_first},
    pricing::format_currency,
};
use tracing::warn;

use crate::{
    pages::{Loading, load_into, orders::StatusBadge},
    state::{Portal, use_portal},
};

const STATUS_FAILED: &str = "No se pudo cambiar el estado del pedido.";
const INVOICE_FAILED: &str = "No se pudo generar la factura.";

/// Moves order `id` to `status` on screen first, then on the backend.
/// The previous status comes back if the backend refuses.
fn change_status(portal: &Portal, orders: RwSignal<Vec<Order>>, id: OrderId, status: OrderStatus) {
    let Some(previous) = orders
        .try_update(|orders| apply_status(orders, id, status))
        .flatten()
    else {
        return;
    };

    if previous == status {
        return;
    }

    let service = portal.services.orders.clone();
    let notices = portal.notices;

    spawn_local(async move {
        match service.update_status(id, status).await {
            Ok(()) => notices.push(Notice::success(
                "Estado Actualizado",
                format!("El pedido #{id} ha sido actualizado a \"{status}\"."),
            )),
            Err(error) => {
                warn!(%error, %id, %status, "order status not updated");
                orders.update(|orders| {
                    apply_status(orders, id, previous);
                });
                notices.push(Notice::error(
                    "Error al actualizar",
                    error.user_message(STATUS_FAILED),
                ));
            }
        }
    });
}

fn generate_invoice(portal: &Portal, order: &Order, generating: RwSignal<bool>) {
    if generating.get_untracked() {
        return;
    }

    generating.set(true);

    let service = portal.services.invoices.clone();
    let notices = portal.notices;
    let request = NewInvoice::for_order(order);
    let id = order.id;

    spawn_local(async move {
        match service.create(&request).await {
            Ok(invoice) => notices.push(Notice::success(
                "Factura Generada",
                format!(
                    "La factura {} del pedido #{id} ha sido creada.",
                    invoice.display_number()
                ),
            )),
            Err(error) => {
                warn!(%error, %id, "invoice not generated");
                notices.push(Notice::error(
                    "Error al generar factura",
                    error.user_message(INVOICE_FAILED),
                ));
            }
        }

        generating.set(false);
    });
}

#[component]
fn StatusSelect(order: Order, orders: RwSignal<Vec<Order>>) -> impl IntoView {
    let portal = StoredValue::new(use_portal());
    let id = order.id;
    let current = order.status;

    let options = std::iter::once(current)
        .chain(current.transitions())
        .map(|status| {
            view! {
                <option value=status.as_str() selected={status == current}>
                    {status.as_str()}
                </option>
            }
        })
        .collect_view();

    view! {
        <select
            class="status-select"
            disabled=current.is_terminal()
            on:change=move |event| {
                if let Some(status) = OrderStatus::from_wire(&event_target_value(&event)) {
                    change_status(&portal.get_value(), orders, id, status);
                }
            }
        >
            {options}
        </select>
    }
}

#[component]
fn OrderDetailPanel(order: Order, on_close: impl Fn() + 'static) -> impl IntoView {
    let portal = StoredValue::new(use_portal());
    let generating = RwSignal::new(false);
    let delivered = order.status == OrderStatus::Delivered;

    let customer = order.customer.as_ref().map_or_else(
        || order.customer_id.to_string(),
        |customer| format!("{} ({})", customer.first_name, customer.email),
    );

    let lines = order
        .details
        .iter()
        .map(|detail| {
            view! {
                <tr>
                    <td>{detail.dish_name().to_string()}</td>
                    <td class="amount">{detail.quantity}</td>
                    <td class="amount">{format_currency(detail.unit_price)}</td>
                    <td class="amount">{format_currency(detail.subtotal)}</td>
                    <td>{detail.note.clone().unwrap_or_default()}</td>
                </tr>
            }
        })
        .collect_view();

    let invoice_order = StoredValue::new(order.clone());

    view! {
        <aside class="order-detail">
            <header>
                <h2>{format!("Pedido #{}", order.id)}</h2>
                <button type="button" aria-label="Cerrar" on:click=move |_| on_close()>"×"</button>
            </header>
            <dl>
                <dt>"Cliente"</dt>
                <dd>{customer}</dd>
                <dt>"Fecha"</dt>
                <dd>{format_date_time(&order.placed_at)}</dd>
                <dt>"Entrega"</dt>
                <dd>{format!("{} · {}", order.delivery_type, order.delivery_address)}</dd>
                <dt>"Estado"</dt>
                <dd><StatusBadge label=order.status.as_str() /></dd>
            </dl>
            <table class="data-table">
                <thead>
                    <tr>
                        <th>"Platillo"</th>
                        <th>"Cantidad"</th>
                        <th>"Precio"</th>
                        <th>"Subtotal"</th>
                        <th>"Notas"</th>
                    </tr>
                </thead>
                <tbody>{lines}</tbody>
            </table>
            <p class="order-detail-total">{format!("Total: {}", format_currency(order.total))}</p>
            <Show when=move || delivered>
                <button
                    type="button"
                    class="primary"
                    disabled=move || generating.get()
                    on:click=move |_| {
                        invoice_order
                            .with_value(|order| generate_invoice(&portal.get_value(), order, generating));
                    }
                >
                    {move || if generating.get() { "Generando..." } else { "Generar factura" }}
                </button>
            </Show>
        </aside>
    }
}

/// Every order, newest first, with status changes and invoicing.
#[component]
pub fn AdminOrdersPage() -> impl IntoView {
    let service = use_portal().services.orders;
    let orders = RwSignal::new(Vec::<Order>::new());
    let loading = RwSignal::new(true);
    let selected = RwSignal::new(None::<OrderId>);

    load_into(orders, loading, "Error al cargar pedidos", async move {
        let mut all = service.list_orders().await?;

        sort_newest_first(&mut all);

        Ok(all)
    });

    let selected_order = move || {
        let id = selected.get()?;

        orders.with(|orders| orders.iter().find(|order| order.id == id).cloned())
    };

    view! {
        <section class="admin-orders">
            <h1>"Gestión de Pedidos"</h1>
            <Show when=move || !loading.get() fallback=Loading>
                <table class="data-table">
                    <thead>
                        <tr>
                            <th>"Pedido"</th>
                            <th>"Cliente"</th>
                            <th>"Fecha"</th>
                            <th>"Total"</th>
                            <th>"Estado"</th>
                            <th></th>
                        </tr>
                    </thead>
                    <tbody>
                        <For
                            each=move || orders.get()
                            key=|order| (order.id, order.status)
                            children=move |order| {
                                let id = order.id;
                                let customer = order
                                    .customer
                                    .as_ref()
                                    .map_or_else(|| order.customer_id.to_string(), |customer| customer.first_name.clone());

                                view! {
                                    <tr>
                                        <td>{format!("#{id}")}</td>
                                        <td>{customer}</td>
                                        <td>{format_date_time(&order.placed_at)}</td>
                                        <td class="amount">{format_currency(order.total)}</td>
                                        <td><StatusSelect order=order.clone() orders=orders /></td>
                                        <td>
                                            <button type="button" on:click=move |_| selected.set(Some(id))>
                                                "Ver detalle"
                                            </button>
                                        </td>
                                    </tr>
                                }
                            }
                        />
                    </tbody>
                </table>
            </Show>
            {move || {
                selected_order()
                    .map(|order| view! { <OrderDetailPanel order=order on_close=move || selected.set(None) /> })
            }}
        </section>
    }
}
