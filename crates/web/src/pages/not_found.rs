use leptos::prelude::*;
use pedido_listo::routes::Route;

use crate::router::Link;

#[component]
pub fn NotFoundPage() -> impl IntoView {
    view! {
        <section class="not-found">
            <h1>"Página no encontrada"</h1>
            <Link to=Route::Home>"Volver al menú"</Link>
        </section>
    }
}
