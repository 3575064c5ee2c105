use leptos::prelude::*;
use pedido_listo::menu::{MenuItem, orderable};

use crate::{
    components::dish_card::DishCard,
    pages::{Loading, load_into},
    state::use_portal,
};

/// Public menu: every dish a customer can order right now.
#[component]
pub fn MenuPage() -> impl IntoView {
    let menu = use_portal().services.menu;
    let dishes = RwSignal::new(Vec::<MenuItem>::new());
    let loading = RwSignal::new(true);

    load_into(dishes, loading, "Error al cargar platillos", async move {
        menu.list_dishes().await.map(orderable)
    });

    view! {
        <section class="menu-page">
            <header class="page-heading">
                <h1>"Nuestro Menú"</h1>
                <p>"Deléitate con nuestros sabores únicos."</p>
            </header>
            <Show when=move || !loading.get() fallback=Loading>
                <Show
                    when=move || dishes.with(|dishes| !dishes.is_empty())
                    fallback=|| view! { <p class="empty">"No hay platillos disponibles."</p> }
                >
                    <div class="dish-grid">
                        <For
                            each=move || dishes.get()
                            key=|dish| dish.id
                            children=|dish| view! { <DishCard dish=dish /> }
                        />
                    </div>
                </Show>
            </Show>
        </section>
    }
}
