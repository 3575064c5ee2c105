//! Sign-in and registration forms.

use leptos::{ev::SubmitEvent, prelude::*, task::spawn_local};
use pedido_listo::{
    notice::Notice,
    routes::Route,
    session::{Credentials, RegistrationDraft},
};
use pedido_listo_app::auth::flow;

use crate::{router::Link, state::use_portal};

#[component]
fn Field(
    label: &'static str,
    name: &'static str,
    #[prop(default = "text")] kind: &'static str,
    value: RwSignal<String>,
) -> impl IntoView {
    view! {
        <label class="field">
            <span>{label}</span>
            <input
                type=kind
                name=name
                prop:value=move || value.get()
                on:input=move |event| value.set(event_target_value(&event))
            />
        </label>
    }
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let portal = StoredValue::new(use_portal());
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let pending = RwSignal::new(false);

    let on_submit = move |event: SubmitEvent| {
        event.prevent_default();

        if pending.get_untracked() {
            return;
        }

        pending.set(true);

        let portal = portal.get_value();
        let credentials = Credentials {
            email: email.get_untracked(),
            password: password.get_untracked(),
        };

        spawn_local(async move {
            match flow::login(portal.services.auth.as_ref(), &portal.session, &credentials).await {
                Ok(landing) => {
                    portal.notices.push(Notice::success(
                        "¡Bienvenido!",
                        "Has iniciado sesión correctamente.",
                    ));
                    portal.navigator.go(landing);
                }
                Err(error) => portal.notices.push(error.login_notice()),
            }

            pending.set(false);
        });
    };

    view! {
        <section class="auth-page">
            <h1>"Iniciar Sesión"</h1>
            <form on:submit=on_submit>
                <Field label="Email" name="email" kind="email" value=email />
                <Field label="Contraseña" name="password" kind="password" value=password />
                <button type="submit" class="primary" disabled=move || pending.get()>
                    {move || if pending.get() { "Ingresando..." } else { "Ingresar" }}
                </button>
            </form>
            <p>"¿No tienes cuenta? " <Link to=Route::Register>"Regístrate"</Link></p>
        </section>
    }
}

#[component]
pub fn RegisterPage() -> impl IntoView {
    let portal = StoredValue::new(use_portal());
    let national_id = RwSignal::new(String::new());
    let first_name = RwSignal::new(String::new());
    let last_name = RwSignal::new(String::new());
    let phone = RwSignal::new(String::new());
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let address = RwSignal::new(String::new());
    let pending = RwSignal::new(false);

    let on_submit = move |event: SubmitEvent| {
        event.prevent_default();

        if pending.get_untracked() {
            return;
        }

        pending.set(true);

        let portal = portal.get_value();
        let draft = RegistrationDraft {
            national_id: national_id.get_untracked(),
            first_name: first_name.get_untracked(),
            last_name: last_name.get_untracked(),
            phone: phone.get_untracked(),
            email: email.get_untracked(),
            password: password.get_untracked(),
            address: address.get_untracked(),
        };

        spawn_local(async move {
            match flow::register(portal.services.auth.as_ref(), &draft).await {
                Ok((_, next)) => {
                    portal.notices.push(Notice::success(
                        "¡Registro Exitoso!",
                        "Tu cuenta ha sido creada. Ahora puedes iniciar sesión.",
                    ));
                    portal.navigator.go(next);
                }
                Err(error) => portal.notices.push(error.register_notice()),
            }

            pending.set(false);
        });
    };

    view! {
        <section class="auth-page">
            <h1>"Crear Cuenta"</h1>
            <form on:submit=on_submit>
                <Field label="Cédula" name="cedula" value=national_id />
                <Field label="Nombre" name="nombre" value=first_name />
                <Field label="Apellido" name="apellido" value=last_name />
                <Field label="Teléfono" name="telefono" kind="tel" value=phone />
                <Field label="Email" name="email" kind="email" value=email />
                <Field label="Contraseña" name="password" kind="password" value=password />
                <Field label="Dirección principal" name="direccionPrincipal" value=address />
                <button type="submit" class="primary" disabled=move || pending.get()>
                    {move || if pending.get() { "Creando cuenta..." } else { "Registrarse" }}
                </button>
            </form>
            <p>"¿Ya tienes cuenta? " <Link to=Route::Login>"Inicia sesión"</Link></p>
        </section>
    }
}
