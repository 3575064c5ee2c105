use leptos::prelude::*;
use pedido_listo::{
    dates::format_date,
    invoices::{Invoice, InvoiceFilter},
    pricing::format_currency,
    routes::Route,
};

use crate::{
    pages::{Loading, load_into},
    router::Link,
    state::use_portal,
};

fn invoice_row(invoice: &Invoice) -> AnyView {
    let customer = invoice
        .customer_name()
        .unwrap_or_else(|| invoice.customer_id.to_string());

    view! {
        <tr>
            <td>{invoice.display_number()}</td>
            <td>{customer}</td>
            <td>{invoice.customer_id.to_string()}</td>
            <td>{format_date(&invoice.issued_at)}</td>
            <td class="amount">{format_currency(invoice.total)}</td>
            <td>{invoice.status.clone()}</td>
            <td>
                <Link to=Route::AdminBillingPrint(invoice.id)>"Imprimir"</Link>
            </td>
        </tr>
    }
    .into_any()
}

/// Every invoice, searchable by number, customer name or national id.
#[component]
pub fn AdminBillingPage() -> impl IntoView {
    let service = use_portal().services.invoices;
    let invoices = RwSignal::new(Vec::<Invoice>::new());
    let loading = RwSignal::new(true);
    let query = RwSignal::new(String::new());

    load_into(invoices, loading, "Error al cargar facturas", async move {
        service.list_all().await
    });

    let rows = move || {
        let filter = InvoiceFilter { query: query.get() };

        invoices.with(|invoices| {
            let matching = filter.apply(invoices);

            if matching.is_empty() {
                return view! {
                    <tr><td colspan="7" class="empty">"No se encontraron facturas."</td></tr>
                }
                .into_any();
            }

            matching.into_iter().map(invoice_row).collect_view().into_any()
        })
    };

    view! {
        <section class="admin-billing">
            <header class="page-heading">
                <h1>"Facturación"</h1>
                <input
                    type="search"
                    placeholder="Buscar por número, cliente o cédula"
                    prop:value=move || query.get()
                    on:input=move |event| query.set(event_target_value(&event))
                />
            </header>
            <Show when=move || !loading.get() fallback=Loading>
                <table class="data-table">
                    <thead>
                        <tr>
                            <th>"Número"</th>
                            <th>"Cliente"</th>
                            <th>"Cédula"</th>
                            <th>"Fecha"</th>
                            <th>"Total"</th>
                            <th>"Estado"</th>
                            <th></th>
                        </tr>
                    </thead>
                    <tbody>{rows}</tbody>
                </table>
            </Show>
        </section>
    }
}
