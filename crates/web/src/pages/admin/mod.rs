//! Staff console views.

use leptos::prelude::*;

use crate::components::admin_sidebar::AdminSidebar;

pub mod audit;
pub mod billing;
pub mod customers;
pub mod dishes;
pub mod orders;

/// Sidebar plus the current console view.
#[component]
pub fn AdminLayout(children: Children) -> impl IntoView {
    view! {
        <div class="admin-layout">
            <AdminSidebar />
            <main class="admin-content">{children()}</main>
        </div>
    }
}
