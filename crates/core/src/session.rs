//! Authentication session
//!
//! A [`Session`] pairs the signed-in user's profile with the bearer token the
//! backend issued. [`SessionStore`] keeps it in durable storage so a reload
//! doesn't sign the user out, and derives the role flags views branch on.

use std::fmt;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::warn;
use zeroize::Zeroize;

use crate::{
    routes::Route,
    storage::{KeyValueStore, SESSION_KEY, StorageError, load_json, save_json},
    validation::{ValidationError, ValidationErrors, is_email, trimmed_len},
};

/// Closed set of user categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Places orders from the menu.
    #[serde(rename = "CLIENTE")]
    Customer,

    /// Manages the whole business.
    #[serde(rename = "ADMINISTRADOR")]
    Administrator,

    /// Sales staff working orders and billing.
    #[serde(rename = "VENDEDOR")]
    Seller,
}

impl Role {
    /// Backend role id assigned to self-registered customers.
    pub const CUSTOMER_ROLE_ID: i64 = 2;

    /// Wire name of the role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Customer => "CLIENTE",
            Self::Administrator => "ADMINISTRADOR",
            Self::Seller => "VENDEDOR",
        }
    }

    /// Administrators and sellers.
    #[must_use]
    pub const fn is_staff(self) -> bool {
        matches!(self, Self::Administrator | Self::Seller)
    }

    /// View a user of this role lands on after signing in.
    #[must_use]
    pub const fn landing(self) -> Route {
        if self.is_staff() {
            Route::AdminOrders
        } else {
            Route::Home
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role as nested in backend user records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleRef {
    /// Backend role id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    /// Role name.
    #[serde(rename = "nombre")]
    pub role: Role,
}

/// Whether an account may sign in and order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccountStatus {
    /// Enabled.
    #[serde(rename = "ACTIVO")]
    Active,

    /// Disabled by an administrator.
    #[serde(rename = "INACTIVO")]
    Inactive,
}

impl AccountStatus {
    /// Wire name of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "ACTIVO",
            Self::Inactive => "INACTIVO",
        }
    }

    /// The other status.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Active => Self::Inactive,
            Self::Inactive => Self::Active,
        }
    }
}

/// National identity number (cédula), the backend's user key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NationalId(String);

impl NationalId {
    /// Wraps a raw identifier.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Identifier text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NationalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A backend user record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// National identity number.
    #[serde(rename = "cedula")]
    pub national_id: NationalId,

    /// Given name.
    #[serde(rename = "nombre")]
    pub first_name: String,

    /// Family name.
    #[serde(rename = "apellido")]
    pub last_name: String,

    /// Contact e-mail, also the login name.
    pub email: String,

    /// Contact phone.
    #[serde(rename = "telefono", default)]
    pub phone: String,

    /// Default delivery address.
    #[serde(rename = "direccionPrincipal", default)]
    pub address: String,

    /// Assigned role.
    #[serde(rename = "rol")]
    pub role: RoleRef,

    /// Account status, when the backend includes it.
    #[serde(rename = "estado", default, skip_serializing_if = "Option::is_none")]
    pub status: Option<AccountStatus>,
}

impl UserProfile {
    /// `"first last"`.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// The user's role.
    #[must_use]
    pub fn role(&self) -> Role {
        self.role.role
    }
}

/// Opaque bearer token issued by the backend.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BearerToken(String);

impl BearerToken {
    /// Wraps a raw token.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Raw token, for building the `Authorization` header.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// `Bearer <token>` header value.
    #[must_use]
    pub fn authorization(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken(**redacted**)")
    }
}

impl Drop for BearerToken {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

/// The signed-in user and their token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Signed-in user.
    pub user: UserProfile,

    /// Token attached to authenticated calls.
    pub token: BearerToken,
}

impl Session {
    /// The session holder's role.
    #[must_use]
    pub fn role(&self) -> Role {
        self.user.role()
    }
}

/// Identity as seen by the router.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Persisted session not restored yet.
    Unknown,

    /// No one signed in.
    Anonymous,

    /// Signed in with the given role.
    Authenticated(Role),
}

impl SessionState {
    /// Role of the signed-in user, if any.
    #[must_use]
    pub const fn role(self) -> Option<Role> {
        match self {
            Self::Authenticated(role) => Some(role),
            Self::Unknown | Self::Anonymous => None,
        }
    }
}

/// The current session backed by a [`KeyValueStore`].
#[derive(Debug, Clone)]
pub struct SessionStore<S> {
    session: Option<Session>,
    store: S,
}

impl<S: KeyValueStore> SessionStore<S> {
    /// Restores the session persisted in `store`. Unreadable entries are discarded.
    pub fn load(store: S) -> Self {
        let session = load_json::<Session, _>(&store, SESSION_KEY).unwrap_or_else(|error| {
            warn!(%error, "discarding persisted session");
            None
        });

        Self { session, store }
    }

    /// Stores `session` as the current one.
    ///
    /// # Errors
    ///
    /// Returns the storage failure; the session is still held in memory.
    pub fn begin(&mut self, session: Session) -> Result<(), StorageError> {
        let saved = save_json(&self.store, SESSION_KEY, &session);

        self.session = Some(session);

        saved
    }

    /// Forgets the current session.
    ///
    /// # Errors
    ///
    /// Returns the storage failure; the session is still cleared in memory.
    pub fn end(&mut self) -> Result<(), StorageError> {
        self.session = None;

        self.store.remove(SESSION_KEY)
    }

    /// Current session, if any.
    #[must_use]
    pub fn current(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Router view of the session.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.session
            .as_ref()
            .map_or(SessionState::Anonymous, |session| {
                SessionState::Authenticated(session.role())
            })
    }

    /// Whether anyone is signed in.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    /// Whether a customer is signed in.
    #[must_use]
    pub fn is_customer(&self) -> bool {
        self.has_role(Role::Customer)
    }

    /// Whether an administrator is signed in.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.has_role(Role::Administrator)
    }

    /// Whether a seller is signed in.
    #[must_use]
    pub fn is_seller(&self) -> bool {
        self.has_role(Role::Seller)
    }

    /// Whether an administrator or seller is signed in.
    #[must_use]
    pub fn is_staff(&self) -> bool {
        self.state().role().is_some_and(Role::is_staff)
    }

    fn has_role(&self, role: Role) -> bool {
        self.state().role() == Some(role)
    }
}

/// Login form contents.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Login e-mail.
    pub email: String,

    /// Plain password, sent once and dropped.
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"**redacted**")
            .finish()
    }
}

impl Drop for Credentials {
    fn drop(&mut self) {
        self.password.zeroize();
    }
}

/// Registration form contents, as typed.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct RegistrationDraft {
    /// National identity number.
    pub national_id: String,

    /// Given name.
    pub first_name: String,

    /// Family name.
    pub last_name: String,

    /// Contact phone.
    pub phone: String,

    /// Contact and login e-mail.
    pub email: String,

    /// Chosen password.
    pub password: String,

    /// Default delivery address.
    pub address: String,
}

impl fmt::Debug for RegistrationDraft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistrationDraft")
            .field("national_id", &self.national_id)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

impl Drop for RegistrationDraft {
    fn drop(&mut self) {
        self.password.zeroize();
    }
}

impl RegistrationDraft {
    /// Checks every field and builds the registration request.
    ///
    /// # Errors
    ///
    /// Returns every failed field check, in form order.
    pub fn validate(&self) -> Result<NewCustomer, ValidationErrors> {
        let mut errors: SmallVec<[ValidationError; 4]> = SmallVec::new();

        let at_least = |errors: &mut SmallVec<[ValidationError; 4]>, field, value: &str, min: usize| {
            if trimmed_len(value) < min {
                errors.push(ValidationError::TooShort { field, min });
            }
        };
        let exactly = |errors: &mut SmallVec<[ValidationError; 4]>, field, value: &str, len: usize| {
            if trimmed_len(value) != len {
                errors.push(ValidationError::WrongLength { field, len });
            }
        };

        at_least(&mut errors, "nombre", &self.first_name, 2);
        at_least(&mut errors, "apellido", &self.last_name, 2);
        exactly(&mut errors, "cedula", &self.national_id, 10);
        exactly(&mut errors, "telefono", &self.phone, 10);

        if !is_email(&self.email) {
            errors.push(ValidationError::InvalidEmail { field: "email" });
        }

        at_least(&mut errors, "direccionPrincipal", &self.address, 5);

        if self.password.chars().count() < 6 {
            errors.push(ValidationError::TooShort {
                field: "password",
                min: 6,
            });
        }

        if !errors.is_empty() {
            return Err(ValidationErrors::new(errors));
        }

        Ok(NewCustomer {
            national_id: NationalId::new(self.national_id.trim()),
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            phone: self.phone.trim().to_string(),
            email: self.email.trim().to_string(),
            password: self.password.clone(),
            address: self.address.trim().to_string(),
            role_id: Role::CUSTOMER_ROLE_ID,
        })
    }
}

/// Registration request. Always carries the customer role.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct NewCustomer {
    /// National identity number.
    #[serde(rename = "cedula")]
    pub national_id: NationalId,

    /// Given name.
    #[serde(rename = "nombre")]
    pub first_name: String,

    /// Family name.
    #[serde(rename = "apellido")]
    pub last_name: String,

    /// Contact phone.
    #[serde(rename = "telefono")]
    pub phone: String,

    /// Contact and login e-mail.
    pub email: String,

    /// Chosen password.
    pub password: String,

    /// Default delivery address.
    #[serde(rename = "direccionPrincipal")]
    pub address: String,

    /// Backend role id.
    #[serde(rename = "rolId")]
    pub role_id: i64,
}

impl fmt::Debug for NewCustomer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewCustomer")
            .field("national_id", &self.national_id)
            .field("email", &self.email)
            .field("role_id", &self.role_id)
            .finish_non_exhaustive()
    }
}

impl Drop for NewCustomer {
    fn drop(&mut self) {
        self.password.zeroize();
    }
}


#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::storage::MemoryStore;

    use super::{fixtures::session, *};

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

    #[test]
    fn no_session_means_every_flag_is_false() {
        let sessions = SessionStore::load(MemoryStore::new());

        assert_eq!(sessions.state(), SessionState::Anonymous);
        assert!(!sessions.is_authenticated());
        assert!(!sessions.is_customer());
        assert!(!sessions.is_admin());
        assert!(!sessions.is_seller());
        assert!(!sessions.is_staff());
    }

    #[test]
    fn flags_follow_the_role() -> TestResult {
        let mut sessions = SessionStore::load(MemoryStore::new());

        sessions.begin(session(Role::Seller))?;

        assert!(sessions.is_authenticated());
        assert!(sessions.is_seller());
        assert!(sessions.is_staff());
        assert!(!sessions.is_admin());
        assert!(!sessions.is_customer());

        Ok(())
    }

    #[test]
    fn session_survives_a_reload_and_ends_cleanly() -> TestResult {
        let store = MemoryStore::new();
        let mut sessions = SessionStore::load(store.clone());

        sessions.begin(session(Role::Customer))?;

        let mut restored = SessionStore::load(store.clone());

        assert_eq!(restored.current(), Some(&session(Role::Customer)));

        restored.end()?;

        assert!(store.is_empty());
        assert_eq!(
            SessionStore::load(store).state(),
            SessionState::Anonymous
        );

        Ok(())
    }

    #[test]
    fn corrupt_session_is_discarded() -> TestResult {
        let store = MemoryStore::new();

        store.set(SESSION_KEY, "null-ish")?;

        assert!(!SessionStore::load(store).is_authenticated());

        Ok(())
    }

    #[test]
    fn profile_deserializes_backend_user() -> TestResult {
        let user: UserProfile = serde_json::from_str(
            r#"{
                "cedula": "0102030405",
                "nombre": "Luis",
                "apellido": "Pérez",
                "email": "luis@example.com",
                "telefono": "0987654321",
                "direccionPrincipal": "Calle Larga 3-45",
                "rol": { "id": 1, "nombre": "ADMINISTRADOR" }
            }"#,
        )?;

        assert_eq!(user.role(), Role::Administrator);
        assert_eq!(user.full_name(), "Luis Pérez");
        assert_eq!(user.status, None);

        Ok(())
    }

    #[test]
    fn token_debug_is_redacted() {
        let token = BearerToken::new("very-secret");

        assert_eq!(format!("{token:?}"), "BearerToken(**redacted**)");
        assert_eq!(token.authorization(), "Bearer very-secret");
    }

    #[test]
    fn staff_land_on_admin_orders() {
        assert_eq!(Role::Administrator.landing(), Route::AdminOrders);
        assert_eq!(Role::Seller.landing(), Route::AdminOrders);
        assert_eq!(Role::Customer.landing(), Route::Home);
    }

    #[test]
    fn valid_registration_always_requests_customer_role() -> TestResult {
        let customer = draft().validate()?;

        assert_eq!(customer.role_id, Role::CUSTOMER_ROLE_ID);

        let json = serde_json::to_value(&customer)?;

        assert_eq!(json["rolId"], 2);
        assert_eq!(json["direccionPrincipal"], "Av. Amazonas N34-12");

        Ok(())
    }

    #[test]
    fn registration_reports_each_invalid_field() {
        let mut invalid = draft();
        invalid.first_name = "A".to_string();
        invalid.national_id = "123".to_string();
        invalid.email = "ana".to_string();
        invalid.password = "12345".to_string();

        let fields: Vec<&str> = invalid
            .validate()
            .err()
            .map(ValidationErrors::into_vec)
            .unwrap_or_default()
            .iter()
            .map(ValidationError::field)
            .collect();

        assert_eq!(fields, vec!["nombre", "cedula", "email", "password"]);
    }
}
