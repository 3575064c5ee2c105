//! Sign-in, sign-out and registration.

use pedido_listo::{
    routes::Route,
    session::{Credentials, RegistrationDraft},
};
use tracing::{info, warn};

use crate::{
    auth::{AuthError, AuthService, RegisteredUser},
    state::SessionSlot,
};

/// Signs in and returns the view the user should land on.
///
/// The stored session only changes on success.
///
/// # Errors
///
/// Returns the service's [`AuthError`] for rejected credentials or backend failures.
pub async fn login(
    auth: &dyn AuthService,
    sessions: &dyn SessionSlot,
    credentials: &Credentials,
) -> Result<Route, AuthError> {
    let session = auth.login(credentials).await.inspect_err(|error| {
        warn!(%error, "sign-in failed");
    })?;

    let role = session.role();

    sessions.begin(session);

    info!(%role, "signed in");

    Ok(role.landing())
}

/// Signs out immediately and returns the login view.
pub fn logout(sessions: &dyn SessionSlot) -> Route {
    sessions.end();

    info!("signed out");

    Route::Login
}

/// Registers a customer account and returns the login view.
///
/// Nobody is signed in afterwards; the new customer logs in separately.
///
/// # Errors
///
/// Returns [`AuthError::Invalid`] without calling the backend when the form
/// fails validation, or the service's error when the backend rejects it.
pub async fn register(
    auth: &dyn AuthService,
    draft: &RegistrationDraft,
) -> Result<(RegisteredUser, Route), AuthError> {
    let customer = draft.validate().map_err(AuthError::Invalid)?;

    let registered = auth.register(&customer).await.inspect_err(|error| {
        warn!(%error, "registration failed");
    })?;

    info!(national_id = %registered.national_id, "customer registered");

    Ok((registered, Route::Login))
}

#[cfg(test)]
mod tests {
    use std::sync::RwLock;

    use pedido_listo::{
        session::{
            AccountStatus, BearerToken, NationalId, Role, RoleRef, Session, SessionState,
            SessionStore, UserProfile,
        },
        storage::MemoryStore,
    };
    use testresult::TestResult;

    use crate::{auth::MockAuthService, backend::BackendError};

    use super::*;

    fn session(role: Role) -> Session {
        Session {
            user: UserProfile {
                national_id: NationalId::new("1712345678"),
                first_name: "Ana".to_string(),
                last_name: "Torres".to_string(),
                email: "ana@example.com".to_string(),
                phone: "0991234567".to_string(),
                address: "Av. Amazonas N34-12".to_string(),
                role: RoleRef { id: None, role },
                status: Some(AccountStatus::Active),
            },
            token: BearerToken::new("token-abc"),
        }
    }

    fn credentials() -> Credentials {
        Credentials {
            email: "ana@example.com".to_string(),
            password: "secreto".to_string(),
        }
    }

    fn draft() -> RegistrationDraft {
        RegistrationDraft {
            national_id: "1712345678".to_string(),
            first_name: "Ana".to_string(),
            last_name: "Torres".to_string(),
            phone: "0991234567".to_string(),
            email: "ana@example.com".to_string(),
            password: "secreto".to_string(),
            address: "Av. Amazonas N34-12".to_string(),
        }
    }

    fn sessions() -> RwLock<SessionStore<MemoryStore>> {
        RwLock::new(SessionStore::load(MemoryStore::new()))
    }

    #[tokio::test]
    async fn staff_sign_in_lands_on_admin_orders() -> TestResult {
        let mut auth = MockAuthService::new();
        let sessions = sessions();

        auth.expect_login()
            .once()
            .withf(|credentials| credentials.email == "ana@example.com")
            .return_once(|_| Ok(session(Role::Administrator)));
        auth.expect_register().never();

        let landing = login(&auth, &sessions, &credentials()).await?;

        assert_eq!(landing, Route::AdminOrders);
        assert_eq!(
            sessions.state(),
            SessionState::Authenticated(Role::Administrator)
        );

        Ok(())
    }

    #[tokio::test]
    async fn customer_sign_in_lands_on_the_menu() -> TestResult {
        let mut auth = MockAuthService::new();

        auth.expect_login()
            .once()
            .return_once(|_| Ok(session(Role::Customer)));

        assert_eq!(login(&auth, &sessions(), &credentials()).await?, Route::Home);

        Ok(())
    }

    #[tokio::test]
    async fn failed_sign_in_keeps_the_stored_session() {
        let mut auth = MockAuthService::new();
        let sessions = sessions();

        sessions.begin(session(Role::Seller));

        auth.expect_login()
            .once()
            .return_once(|_| Err(AuthError::InvalidCredentials));

        let result = login(&auth, &sessions, &credentials()).await;

        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
        assert_eq!(sessions.current(), Some(session(Role::Seller)));
    }

    #[test]
    fn logout_clears_the_session() {
        let sessions = sessions();

        sessions.begin(session(Role::Customer));

        assert_eq!(logout(&sessions), Route::Login);
        assert_eq!(sessions.state(), SessionState::Anonymous);
    }

    #[tokio::test]
    async fn registration_sends_the_customer_role_and_does_not_sign_in() -> TestResult {
        let mut auth = MockAuthService::new();

        auth.expect_login().never();
        auth.expect_register()
            .once()
            .withf(|customer| customer.role_id == Role::CUSTOMER_ROLE_ID)
            .return_once(|customer| {
                Ok(RegisteredUser {
                    national_id: customer.national_id.clone(),
                    email: customer.email.clone(),
                    first_name: customer.first_name.clone(),
                })
            });

        let (registered, next) = register(&auth, &draft()).await?;

        assert_eq!(next, Route::Login);
        assert_eq!(registered.email, "ana@example.com");

        Ok(())
    }

    #[tokio::test]
    async fn invalid_registration_never_reaches_the_backend() {
        let mut auth = MockAuthService::new();
        let mut invalid = draft();

        invalid.phone = "099".to_string();

        auth.expect_register().never();

        let result = register(&auth, &invalid).await;

        assert!(matches!(result, Err(AuthError::Invalid(_))));
    }

    #[tokio::test]
    async fn rejected_registration_surfaces_the_backend_message() {
        let mut auth = MockAuthService::new();

        auth.expect_register().once().return_once(|_| {
            Err(AuthError::Backend(BackendError::rejected(
                "El email ya está registrado",
            )))
        });

        let notice = register(&auth, &draft())
            .await
            .err()
            .map(|error| error.register_notice());

        assert_eq!(
            notice.map(|notice| notice.message),
            Some("El email ya está registrado".to_string())
        );
    }
}
