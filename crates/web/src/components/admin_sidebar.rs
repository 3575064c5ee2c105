use leptos::prelude::*;
use pedido_listo::{
    access::{Access, authorize},
    routes::Route,
};

use crate::{router::Link, state::use_portal};

const NAV_ITEMS: [(Route, &str); 5] = [
    (Route::AdminOrders, "Pedidos"),
    (Route::AdminDishes, "Platillos"),
    (Route::AdminCustomers, "Clientes"),
    (Route::AdminAudit, "Auditoría"),
    (Route::AdminBilling, "Facturación"),
];

/// Staff console navigation. Sellers only see the views they may open.
#[component]
pub fn AdminSidebar() -> impl IntoView {
    let portal = use_portal();
    let session = portal.session;
    let navigator = portal.navigator;

    view! {
        <aside class="admin-sidebar">
            <nav>
                {move || {
                    let state = session.state();
                    let current = navigator.current().canonical();

                    NAV_ITEMS
                        .into_iter()
                        .filter(|(route, _)| {
                            authorize(state, route.allowed_roles()) == Access::Authorized
                        })
                        .map(|(route, label)| {
                            let class = if route == current { "nav-item active" } else { "nav-item" };

                            view! {
                                <Link to=route class=class>
                                    {label}
                                </Link>
                            }
                        })
                        .collect_view()
                }}
            </nav>
            <p class="admin-sidebar-footer">"Panel de Administrador"</p>
        </aside>
    }
}
