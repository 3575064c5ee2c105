use leptos::prelude::*;

use crate::state::use_portal;

#[component]
pub fn Toasts() -> impl IntoView {
    let notices = use_portal().notices;

    view! {
        <ol class="toasts" aria-live="polite">
            <For
                each=move || notices.shown()
                key=|(id, _)| *id
                children=move |(id, notice)| {
                    let class = if notice.is_error() { "toast toast-error" } else { "toast" };

                    view! {
                        <li class=class role="status">
                            <p class="toast-title">{notice.title}</p>
                            <p class="toast-message">{notice.message}</p>
                            <button
                                type="button"
                                aria-label="Cerrar"
                                on:click=move |_| notices.dismiss(id)
                            >
                                "×"
                            </button>
                        </li>
                    }
                }
            />
        </ol>
    }
}
