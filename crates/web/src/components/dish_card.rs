use leptos::prelude::*;
use pedido_listo::{menu::MenuItem, notice::Notice, pricing::format_currency, session::Role};

use crate::state::use_portal;

#[component]
pub fn DishCard(dish: MenuItem) -> impl IntoView {
    let portal = use_portal();
    let session = portal.session;
    let cart = portal.cart;
    let notices = portal.notices;

    let price = format_currency(dish.price);
    let name = dish.name.clone();
    let description = dish.description.clone().unwrap_or_default();
    let category = dish.category.clone();

    view! {
        <article class="dish-card">
            <header>
                <p class="dish-category">{category}</p>
                <h3>{name}</h3>
                <p class="dish-description">{description}</p>
            </header>
            <footer>
                <p class="dish-price">{price}</p>
                <button
                    type="button"
                    disabled=move || session.state().role().is_some_and(Role::is_staff)
                    on:click=move |_| {
                        if let Some(added) = cart.add(&dish) {
                            notices.push(Notice::from(&added));
                        }
                    }
                >
                    "Agregar"
                </button>
            </footer>
        </article>
    }
}
