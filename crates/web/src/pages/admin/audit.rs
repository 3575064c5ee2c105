use leptos::prelude::*;
use pedido_listo::{
    audit::{AuditColumn, AuditRecord, AuditSort, arrange, render_payload},
    dates::format_date_time,
};

use crate::{
    pages::{Loading, load_into},
    state::use_portal,
};

fn audit_row(record: &AuditRecord) -> AnyView {
    view! {
        <tr>
            <td>{record.id.clone()}</td>
            <td>{record.actor.clone()}</td>
            <td>{format_date_time(&record.occurred_at)}</td>
            <td>{record.action.clone()}</td>
            <td>{record.table.clone()}</td>
            <td>{record.record_id.clone()}</td>
            <td><pre class="payload">{render_payload(&record.before)}</pre></td>
            <td><pre class="payload">{render_payload(&record.after)}</pre></td>
        </tr>
    }
    .into_any()
}

/// Audit log with column sorting and an actor filter.
#[component]
pub fn AdminAuditPage() -> impl IntoView {
    let service = use_portal().services.audit;
    let records = RwSignal::new(Vec::<AuditRecord>::new());
    let loading = RwSignal::new(true);
    let sort = RwSignal::new(AuditSort::default());
    let actor = RwSignal::new(String::new());

    load_into(records, loading, "Error al cargar auditoría", async move {
        service.list_records().await
    });

    let headings = move || {
        AuditColumn::ALL
            .into_iter()
            .map(|column| {
                view! {
                    <th>
                        <button
                            type="button"
                            class="sort-heading"
                            on:click=move |_| sort.update(|sort| *sort = sort.request(column))
                        >
                            {column.heading()}
                            {move || sort.get().indicator(column).map(|arrow| format!(" {arrow}"))}
                        </button>
                    </th>
                }
            })
            .collect_view()
    };

    let rows = move || {
        let sort = sort.get();

        actor.with(|actor| {
            records.with(|records| {
                arrange(records, sort, actor)
                    .into_iter()
                    .map(audit_row)
                    .collect_view()
            })
        })
    };

    view! {
        <section class="admin-audit">
            <header class="page-heading">
                <h1>"Auditoría"</h1>
                <input
                    type="search"
                    placeholder="Filtrar por usuario"
                    prop:value=move || actor.get()
                    on:input=move |event| actor.set(event_target_value(&event))
                />
            </header>
            <Show when=move || !loading.get() fallback=Loading>
                <table class="data-table">
                    <thead>
                        <tr>
                            {headings}
                            <th>"Datos anteriores"</th>
                            <th>"Datos nuevos"</th>
                        </tr>
                    </thead>
                    <tbody>{rows}</tbody>
                </table>
            </Show>
        </section>
    }
}
