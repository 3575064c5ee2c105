use leptos::{prelude::*, task::spawn_local};
use pedido_listo::{
    customers::{apply_status, toggled_status},
    notice::Notice,
    session::{AccountStatus, NationalId, UserProfile},
};
use tracing::warn;

use crate::{
    pages::{Loading, load_into},
    state::{Portal, use_portal},
};

const TOGGLE_FAILED: &str = "No se pudo cambiar el estado del cliente.";

fn toggle_customer(
    portal: &Portal,
    customers: RwSignal<Vec<UserProfile>>,
    id: NationalId,
    current: Option<AccountStatus>,
) {
    let status = toggled_status(current);

    let Some(previous) = customers
        .try_update(|customers| apply_status(customers, &id, Some(status)))
        .flatten()
    else {
        return;
    };

    let service = portal.services.customers.clone();
    let notices = portal.notices;

    spawn_local(async move {
        match service.set_status(&id, status).await {
            Ok(()) => notices.push(Notice::success(
                "Estado del Cliente Actualizado",
                format!("El cliente está ahora {}.", status.as_str().to_lowercase()),
            )),
            Err(error) => {
                warn!(%error, national_id = %id, "customer status not updated");
                customers.update(|customers| {
                    apply_status(customers, &id, previous);
                });
                notices.push(Notice::error("Error al actualizar", error.user_message(TOGGLE_FAILED)));
            }
        }
    });
}

/// Customer accounts with activation toggles.
#[component]
pub fn AdminCustomersPage() -> impl IntoView {
    let portal = use_portal();
    let service = portal.services.customers.clone();
    let stored = StoredValue::new(portal);
    let customers = RwSignal::new(Vec::<UserProfile>::new());
    let loading = RwSignal::new(true);

    load_into(customers, loading, "Error al cargar clientes", async move {
        service.list_customers().await
    });

    view! {
        <section class="admin-customers">
            <h1>"Gestión de Clientes"</h1>
            <Show when=move || !loading.get() fallback=Loading>
                <table class="data-table">
                    <thead>
                        <tr>
                            <th>"Cédula"</th>
                            <th>"Nombre"</th>
                            <th>"Email"</th>
                            <th>"Teléfono"</th>
                            <th>"Estado"</th>
                            <th></th>
                        </tr>
                    </thead>
                    <tbody>
                        <For
                            each=move || customers.get()
                            key=|customer| (customer.national_id.clone(), customer.status)
                            children=move |customer| {
                                let id = customer.national_id.clone();
                                let current = customer.status;
                                let (label, action) = match current {
                                    Some(AccountStatus::Active) => ("ACTIVO", "Desactivar"),
                                    Some(AccountStatus::Inactive) => ("INACTIVO", "Activar"),
                                    None => ("-", "Activar"),
                                };

                                view! {
                                    <tr>
                                        <td>{customer.national_id.to_string()}</td>
                                        <td>{customer.full_name()}</td>
                                        <td>{customer.email.clone()}</td>
                                        <td>{customer.phone.clone()}</td>
                                        <td>{label}</td>
                                        <td>
                                            <button
                                                type="button"
                                                on:click=move |_| {
                                                    toggle_customer(&stored.get_value(), customers, id.clone(), current);
                                                }
                                            >
                                                {action}
                                            </button>
                                        </td>
                                    </tr>
                                }
                            }
                        />
                    </tbody>
                </table>
            </Show>
        </section>
    }
}
