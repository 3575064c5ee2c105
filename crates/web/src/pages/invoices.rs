//! Invoice lists and the printable invoice.

use leptos::{prelude::*, task::spawn_local};
use pedido_listo::{
    dates::format_date,
    invoices::{Invoice, InvoiceId, find_invoice},
    notice::Notice,
    pricing::format_currency,
    routes::Route,
};
use tracing::warn;

use crate::{
    pages::{LOAD_FAILED, Loading, load_into},
    router::Link,
    state::use_portal,
    storage::js_message,
};

/// The signed-in customer's invoices.
#[component]
pub fn InvoicesPage() -> impl IntoView {
    let invoices_service = use_portal().services.invoices;
    let invoices = RwSignal::new(Vec::<Invoice>::new());
    let loading = RwSignal::new(true);

    load_into(invoices, loading, "Error al cargar facturas", async move {
        invoices_service.list_mine().await
    });

    view! {
        <section class="invoices-page">
            <h1>"Mis Facturas"</h1>
            <Show when=move || !loading.get() fallback=Loading>
                <Show
                    when=move || invoices.with(|invoices| !invoices.is_empty())
                    fallback=|| view! { <p class="empty">"No tienes facturas registradas."</p> }
                >
                    <table class="data-table">
                        <thead>
                            <tr>
                                <th>"Número"</th>
                                <th>"Fecha"</th>
                                <th>"Total"</th>
                                <th></th>
                            </tr>
                        </thead>
                        <tbody>
                            <For
                                each=move || invoices.get()
                                key=|invoice| invoice.id
                                children=|invoice| {
                                    view! {
                                        <tr>
                                            <td>{invoice.display_number()}</td>
                                            <td>{format_date(&invoice.issued_at)}</td>
                                            <td class="amount">{format_currency(invoice.total)}</td>
                                            <td>
                                                <Link to=Route::InvoicePrint(invoice.id)>"Ver / Imprimir"</Link>
                                            </td>
                                        </tr>
                                    }
                                }
                            />
                        </tbody>
                    </table>
                </Show>
            </Show>
        </section>
    }
}

/// Printable rendering of one invoice.
#[component]
pub fn InvoiceDocument(invoice: Invoice) -> impl IntoView {
    let customer = invoice.customer.clone().map(|customer| {
        view! {
            <dl class="invoice-customer">
                <dt>"Cliente"</dt>
                <dd>{customer.full_name()}</dd>
                <dt>"Cédula"</dt>
                <dd>{customer.national_id.to_string()}</dd>
                <dt>"Email"</dt>
                <dd>{customer.email}</dd>
                <dt>"Dirección"</dt>
                <dd>{customer.address}</dd>
            </dl>
        }
    });

    let lines = invoice
        .lines
        .iter()
        .map(|line| {
            view! {
                <tr>
                    <td>{line.label()}</td>
                    <td class="amount">{line.quantity}</td>
                    <td class="amount">{format_currency(line.unit_price)}</td>
                    <td class="amount">{format_currency(line.subtotal)}</td>
                </tr>
            }
        })
        .collect_view();

    let order = invoice
        .order_id
        .map(|order_id| view! { <p>{format!("Pedido #{order_id}")}</p> });

    view! {
        <article class="invoice-document">
            <header>
                <h1>"Pedido Listo"</h1>
                <p class="invoice-number">{format!("Factura {}", invoice.display_number())}</p>
                <p>{format!("Fecha: {}", format_date(&invoice.issued_at))}</p>
                {order}
            </header>
            {customer}
            <table class="data-table">
                <thead>
                    <tr>
                        <th>"Descripción"</th>
                        <th>"Cantidad"</th>
                        <th>"Precio unitario"</th>
                        <th>"Subtotal"</th>
                    </tr>
                </thead>
                <tbody>{lines}</tbody>
            </table>
            <dl class="invoice-totals">
                <dt>"Subtotal"</dt>
                <dd>{format_currency(invoice.subtotal)}</dd>
                <dt>{invoice.tax_label()}</dt>
                <dd>{format_currency(invoice.tax)}</dd>
                <dt class="invoice-total">"Total"</dt>
                <dd class="invoice-total">{format_currency(invoice.total)}</dd>
            </dl>
        </article>
    }
}

fn print_page() {
    let Some(window) = web_sys::window() else {
        return;
    };

    if let Err(error) = window.print() {
        warn!(error = %js_message(&error), "print dialog not opened");
    }
}

/// Loads invoice `id` and shows it ready to print.
///
/// Staff look it up among every invoice, customers among their own. An
/// unknown id sends the visitor back to the list it came from.
#[component]
pub fn InvoicePrintPage(id: InvoiceId, staff: bool) -> impl IntoView {
    let portal = use_portal();
    let invoices_service = portal.services.invoices;
    let notices = portal.notices;
    let navigator = portal.navigator;
    let back = if staff { Route::AdminBilling } else { Route::Invoices };
    let invoice = RwSignal::new(None::<Invoice>);

    spawn_local(async move {
        let listed = if staff {
            invoices_service.list_all().await
        } else {
            invoices_service.list_mine().await
        };

        match listed {
            Ok(invoices) => match find_invoice(&invoices, id) {
                Ok(found) => invoice.set(Some(found.clone())),
                Err(error) => {
                    notices.push(Notice::from(&error));
                    navigator.replace(back);
                }
            },
            Err(error) => {
                warn!(%error, %id, "invoice not loaded");
                notices.push(Notice::error(
                    "Error al cargar factura",
                    error.user_message(LOAD_FAILED),
                ));
                navigator.replace(back);
            }
        }
    });

    view! {
        <section class="invoice-print-page">
            <nav class="print-actions">
                <Link to=back>"Volver"</Link>
                <button type="button" class="primary" on:click=move |_| print_page()>
                    "Imprimir"
                </button>
            </nav>
            {move || match invoice.get() {
                Some(invoice) => view! { <InvoiceDocument invoice=invoice /> }.into_any(),
                None => view! { <Loading /> }.into_any(),
            }}
        </section>
    }
}
