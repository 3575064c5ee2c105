use leptos::{ev::SubmitEvent, prelude::*, task::spawn_local};
use pedido_listo::{
    menu::{DishDraft, DishFilter, ItemStatus, MenuItem, MenuItemId},
    notice::Notice,
    pricing::format_currency,
};
use tracing::warn;

use crate::{
    pages::{Loading, load_into},
    state::{Portal, use_portal},
};

const TOGGLE_FAILED: &str = "No se pudo cambiar el estado del platillo.";
const SAVE_FAILED: &str = "No se pudo conectar a la API.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FormMode {
    Closed,
    Create,
    Edit(MenuItemId),
}

fn replace_item(items: &mut [MenuItem], item: MenuItem) -> Option<MenuItem> {
    items
        .iter_mut()
        .find(|existing| existing.id == item.id)
        .map(|existing| std::mem::replace(existing, item))
}

/// Flips the dish's status on screen, then on the backend; reverts if refused.
fn toggle_status(portal: &Portal, dishes: RwSignal<Vec<MenuItem>>, dish: &MenuItem) {
    let toggled = dish.with_toggled_status();
    let (id, status, name) = (toggled.id, toggled.status, toggled.name.clone());

    let Some(previous) = dishes.try_update(|dishes| replace_item(dishes, toggled)).flatten() else {
        return;
    };

    let service = portal.services.menu.clone();
    let notices = portal.notices;

    spawn_local(async move {
        match service.set_dish_status(id, status).await {
            Ok(()) => {
                let state = match status {
                    ItemStatus::Active => "activo",
                    ItemStatus::Discontinued => "descontinuado",
                };

                notices.push(Notice::success(
                    "Estado del platillo actualizado",
                    format!("\"{name}\" ahora está {state}."),
                ));
            }
            Err(error) => {
                warn!(%error, %id, "dish status not updated");
                dishes.update(|dishes| {
                    replace_item(dishes, previous);
                });
                notices.push(Notice::error("Error al actualizar", error.user_message(TOGGLE_FAILED)));
            }
        }
    });
}

fn save(
    portal: &Portal,
    dishes: RwSignal<Vec<MenuItem>>,
    mode: RwSignal<FormMode>,
    draft: &DishDraft,
    saving: RwSignal<bool>,
) {
    let target = mode.get_untracked();

    if target == FormMode::Closed || saving.get_untracked() {
        return;
    }

    let dish = match draft.validate() {
        Ok(dish) => dish,
        Err(errors) => {
            portal.notices.push(Notice::from(&errors));
            return;
        }
    };

    saving.set(true);

    let service = portal.services.menu.clone();
    let notices = portal.notices;

    spawn_local(async move {
        let result = match target {
            FormMode::Edit(id) => service.update_dish(id, &dish).await,
            FormMode::Create | FormMode::Closed => service.create_dish(&dish).await,
        };

        match (result, target) {
            (Ok(saved), FormMode::Edit(_)) => {
                notices.push(Notice::success(
                    "Platillo Actualizado",
                    format!("\"{}\" ha sido actualizado.", dish.name),
                ));
                dishes.update(|dishes| {
                    replace_item(dishes, saved);
                });
                mode.set(FormMode::Closed);
            }
            (Ok(saved), _) => {
                notices.push(Notice::success(
                    "Platillo Agregado",
                    format!("\"{}\" ha sido creado.", dish.name),
                ));
                dishes.update(|dishes| dishes.push(saved));
                mode.set(FormMode::Closed);
            }
            (Err(error), FormMode::Edit(_)) => {
                warn!(%error, "dish not updated");
                notices.push(Notice::error("Error al actualizar platillo", error.user_message(SAVE_FAILED)));
            }
            (Err(error), _) => {
                warn!(%error, "dish not created");
                notices.push(Notice::error("Error al crear platillo", error.user_message(SAVE_FAILED)));
            }
        }

        saving.set(false);
    });
}

#[component]
fn FilterInput(placeholder: &'static str, value: RwSignal<String>) -> impl IntoView {
    view! {
        <input
            type="search"
            placeholder=placeholder
            prop:value=move || value.get()
            on:input=move |event| value.set(event_target_value(&event))
        />
    }
}

#[component]
fn DishForm(
    dishes: RwSignal<Vec<MenuItem>>,
    mode: RwSignal<FormMode>,
    draft: RwSignal<DishDraft>,
) -> impl IntoView {
    let portal = StoredValue::new(use_portal());
    let saving = RwSignal::new(false);

    let on_submit = move |event: SubmitEvent| {
        event.prevent_default();
        draft.with_untracked(|draft| save(&portal.get_value(), dishes, mode, draft, saving));
    };

    let text_field = move |label: &'static str, read: fn(&DishDraft) -> String, write: fn(&mut DishDraft, String)| {
        view! {
            <label class="field">
                <span>{label}</span>
                <input
                    type="text"
                    prop:value=move || draft.with(read)
                    on:input=move |event| {
                        let value = event_target_value(&event);
                        draft.update(|draft| write(draft, value));
                    }
                />
            </label>
        }
    };

    view! {
        <form class="dish-form" on:submit=on_submit>
            <h2>
                {move || match mode.get() {
                    FormMode::Edit(_) => "Editar Platillo",
                    FormMode::Create | FormMode::Closed => "Agregar Platillo",
                }}
            </h2>
            {text_field("Nombre", |draft| draft.name.clone(), |draft, value| draft.name = value)}
            {text_field("Categoría", |draft| draft.category.clone(), |draft, value| draft.category = value)}
            {text_field("Descripción", |draft| draft.description.clone(), |draft, value| draft.description = value)}
            {text_field("Precio", |draft| draft.price.clone(), |draft, value| draft.price = value)}
            <label class="field checkbox">
                <input
                    type="checkbox"
                    prop:checked=move || draft.with(|draft| draft.available)
                    on:change=move |event| {
                        let checked = event_target_checked(&event);
                        draft.update(|draft| draft.available = checked);
                    }
                />
                <span>"Disponible"</span>
            </label>
            <div class="form-actions">
                <button type="button" on:click=move |_| mode.set(FormMode::Closed)>"Cancelar"</button>
                <button type="submit" class="primary" disabled=move || saving.get()>
                    {move || if saving.get() { "Guardando..." } else { "Guardar" }}
                </button>
            </div>
        </form>
    }
}

/// Dish administration: filter, create, edit and (de)activate dishes.
#[component]
pub fn AdminDishesPage() -> impl IntoView {
    let portal = use_portal();
    let service = portal.services.menu.clone();
    let stored = StoredValue::new(portal);
    let dishes = RwSignal::new(Vec::<MenuItem>::new());
    let loading = RwSignal::new(true);
    let mode = RwSignal::new(FormMode::Closed);
    let draft = RwSignal::new(DishDraft::default());

    let name = RwSignal::new(String::new());
    let category = RwSignal::new(String::new());
    let price = RwSignal::new(String::new());
    let status = RwSignal::new(String::new());

    load_into(dishes, loading, "Error al cargar platillos", async move {
        service.list_dishes().await
    });

    let visible = move || {
        let filter = DishFilter {
            name: name.get(),
            category: category.get(),
            price: price.get(),
            status: status.get(),
        };

        dishes.with(|dishes| filter.apply(dishes).into_iter().cloned().collect::<Vec<_>>())
    };

    view! {
        <section class="admin-dishes">
            <header class="page-heading">
                <h1>"Gestión de Platillos"</h1>
                <button
                    type="button"
                    class="primary"
                    on:click=move |_| {
                        draft.set(DishDraft::default());
                        mode.set(FormMode::Create);
                    }
                >
                    "Agregar Platillo"
                </button>
            </header>
            <Show when=move || mode.get() != FormMode::Closed>
                <DishForm dishes=dishes mode=mode draft=draft />
            </Show>
            <Show when=move || !loading.get() fallback=Loading>
                <table class="data-table">
                    <thead>
                        <tr>
                            <th><FilterInput placeholder="Nombre" value=name /></th>
                            <th><FilterInput placeholder="Categoría" value=category /></th>
                            <th><FilterInput placeholder="Precio" value=price /></th>
                            <th><FilterInput placeholder="Estado" value=status /></th>
                            <th></th>
                        </tr>
                    </thead>
                    <tbody>
                        <For
                            each=visible
                            key=|dish| (dish.id, dish.status, dish.name.clone(), dish.price)
                            children=move |dish| {
                                let edited = dish.clone();
                                let toggled = dish.clone();
                                let toggle_label = match dish.status {
                                    ItemStatus::Active => "Desactivar",
                                    ItemStatus::Discontinued => "Activar",
                                };

                                view! {
                                    <tr>
                                        <td>{dish.name.clone()}</td>
                                        <td>{dish.category.clone()}</td>
                                        <td class="amount">{format_currency(dish.price)}</td>
                                        <td>{dish.status.as_str()}</td>
                                        <td class="row-actions">
                                            <button
                                                type="button"
                                                on:click=move |_| {
                                                    draft.set(DishDraft::from(&edited));
                                                    mode.set(FormMode::Edit(edited.id));
                                                }
                                            >
                                                "Editar"
                                            </button>
                                            <button
                                                type="button"
                                                on:click=move |_| toggle_status(&stored.get_value(), dishes, &toggled)
                                            >
                                                {toggle_label}
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

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use rust_decimal::Decimal;
    use testresult::TestResult;

    use super::*;

    fn dish(id: i64, name: &str) -> TestResult<MenuItem> {
        Ok(MenuItem {
            id: MenuItemId(id),
            category: "Platos fuertes".to_string(),
            name: name.to_string(),
            description: None,
            price: Decimal::from_str("4.50")?,
            available: true,
            status: ItemStatus::Active,
        })
    }

    #[test]
    fn replacing_hands_back_the_previous_copy() -> TestResult {
        let mut dishes = vec![dish(1, "Locro")?, dish(2, "Fanesca")?];
        let toggled = dish(2, "Fanesca")?.with_toggled_status();

        let previous = replace_item(&mut dishes, toggled.clone());

        assert_eq!(previous, Some(dish(2, "Fanesca")?));
        assert_eq!(dishes, vec![dish(1, "Locro")?, toggled]);

        Ok(())
    }

    #[test]
    fn unknown_dishes_are_left_alone() -> TestResult {
        let mut dishes = vec![dish(1, "Locro")?];

        assert_eq!(replace_item(&mut dishes, dish(9, "Humita")?), None);
        assert_eq!(dishes, vec![dish(1, "Locro")?]);

        Ok(())
    }
}
