//! Registration and sign-in against an in-memory account backend

use std::sync::{Mutex, PoisonError, RwLock};

use async_trait::async_trait;
use pedido_listo::{
    routes::Route,
    session::{
        AccountStatus, BearerToken, Credentials, NewCustomer, RegistrationDraft, Role, RoleRef,
        Session, SessionState, SessionStore, UserProfile,
    },
    storage::MemoryStore,
};
use pedido_listo_app::{
    auth::{AuthError, AuthService, RegisteredUser, flow},
    backend::{BackendError, TokenSource},
    state::SessionSlot,
};
use testresult::TestResult;

struct Account {
    profile: UserProfile,
    password: String,
}

#[derive(Default)]
struct InMemoryAccounts {
    accounts: Mutex<Vec<Account>>,
}

impl InMemoryAccounts {
    fn len(&self) -> usize {
        self.accounts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

#[async_trait(?Send)]
impl AuthService for InMemoryAccounts {
    async fn login(&self, credentials: &Credentials) -> Result<Session, AuthError> {
        let accounts = self.accounts.lock().unwrap_or_else(PoisonError::into_inner);

        accounts
            .iter()
            .find(|account| {
                account.profile.email == credentials.email && account.password == credentials.password
            })
            .map(|account| Session {
                user: account.profile.clone(),
                token: BearerToken::new(format!("token-{}", account.profile.national_id)),
            })
            .ok_or(AuthError::InvalidCredentials)
    }

    async fn register(&self, customer: &NewCustomer) -> Result<RegisteredUser, AuthError> {
        let mut accounts = self.accounts.lock().unwrap_or_else(PoisonError::into_inner);

        if accounts.iter().any(|account| account.profile.email == customer.email) {
            return Err(BackendError::rejected("El email ya está registrado").into());
        }

        if accounts
            .iter()
            .any(|account| account.profile.national_id == customer.national_id)
        {
            return Err(BackendError::rejected("La cédula ya está registrada").into());
        }

        let role = match customer.role_id {
            Role::CUSTOMER_ROLE_ID => Role::Customer,
            _ => Role::Seller,
        };

        accounts.push(Account {
            profile: UserProfile {
                national_id: customer.national_id.clone(),
                first_name: customer.first_name.clone(),
                last_name: customer.last_name.clone(),
                email: customer.email.clone(),
                phone: customer.phone.clone(),
                address: customer.address.clone(),
                role: RoleRef {
                    id: Some(customer.role_id),
                    role,
                },
                status: Some(AccountStatus::Active),
            },
            password: customer.password.clone(),
        });

        Ok(RegisteredUser {
            national_id: customer.national_id.clone(),
            email: customer.email.clone(),
            first_name: customer.first_name.clone(),
        })
    }
}

fn draft(email: &str, national_id: &str) -> RegistrationDraft {
    RegistrationDraft {
        national_id: national_id.to_string(),
        first_name: "Luis".to_string(),
        last_name: "Pérez".to_string(),
        phone: "0987654321".to_string(),
        email: email.to_string(),
        password: "clave-segura".to_string(),
        address: "Calle Larga 5-27, Cuenca".to_string(),
    }
}

fn credentials(email: &str, password: &str) -> Credentials {
    Credentials {
        email: email.to_string(),
        password: password.to_string(),
    }
}

#[tokio::test]
async fn registered_customer_can_sign_in() -> TestResult {
    let accounts = InMemoryAccounts::default();
    let sessions = RwLock::new(SessionStore::load(MemoryStore::new()));

    let (registered, next) = flow::register(&accounts, &draft("luis@example.com", "0102030405")).await?;

    assert_eq!(next, Route::Login);
    assert_eq!(sessions.state(), SessionState::Anonymous);
    assert_eq!(registered.first_name, "Luis");

    let landing = flow::login(
        &accounts,
        &sessions,
        &credentials("luis@example.com", "clave-segura"),
    )
    .await?;

    assert_eq!(landing, Route::Home);
    assert_eq!(sessions.state(), SessionState::Authenticated(Role::Customer));
    assert_eq!(
        sessions.bearer().map(|token| token.authorization()),
        Some("Bearer token-0102030405".to_string())
    );

    Ok(())
}

#[tokio::test]
async fn duplicate_email_is_rejected_without_creating_an_account() -> TestResult {
    let accounts = InMemoryAccounts::default();

    flow::register(&accounts, &draft("luis@example.com", "0102030405")).await?;

    let error = flow::register(&accounts, &draft("luis@example.com", "0911223344"))
        .await
        .err();

    assert_eq!(accounts.len(), 1);
    assert_eq!(
        error.map(|error| error.register_notice().message),
        Some("El email ya está registrado".to_string())
    );

    Ok(())
}

#[tokio::test]
async fn wrong_password_leaves_everyone_signed_out() -> TestResult {
    let accounts = InMemoryAccounts::default();
    let sessions = RwLock::new(SessionStore::load(MemoryStore::new()));

    flow::register(&accounts, &draft("luis@example.com", "0102030405")).await?;

    let error = flow::login(&accounts, &sessions, &credentials("luis@example.com", "otra"))
        .await
        .err();

    assert_eq!(
        error.map(|error| error.login_notice().message),
        Some("Email o contraseña incorrectos.".to_string())
    );
    assert_eq!(sessions.state(), SessionState::Anonymous);
    assert!(sessions.bearer().is_none());

    Ok(())
}

#[tokio::test]
async fn logout_forgets_the_persisted_session() -> TestResult {
    let accounts = InMemoryAccounts::default();
    let store = MemoryStore::new();
    let sessions = RwLock::new(SessionStore::load(store.clone()));

    flow::register(&accounts, &draft("luis@example.com", "0102030405")).await?;
    flow::login(&accounts, &sessions, &credentials("luis@example.com", "clave-segura")).await?;

    assert_eq!(flow::logout(&sessions), Route::Login);

    let reloaded = SessionStore::load(store);

    assert_eq!(reloaded.state(), SessionState::Anonymous);

    Ok(())
}
