//! Order submission
//!
//! Turns the cart into an order on behalf of the signed-in customer. The
//! cart is cleared only once the backend has accepted the whole order.

use pedido_listo::{
    notice::Notice,
    orders::{Delivery, NewOrder, NewOrderError, OrderId},
    routes::Route,
};
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    backend::BackendError,
    config::CheckoutConfig,
    orders::OrdersService,
    state::{CartSlot, SessionSlot},
};

const SUBMIT_FAILED: &str = "No se pudo completar el pedido. Inténtalo de nuevo.";

/// How an order reaches the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum SubmissionMode {
    /// One request carrying the header and its lines.
    #[default]
    Nested,

    /// The header first, then each line in sequence.
    HeaderThenLines,
}

#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("no one is signed in")]
    NotAuthenticated,

    #[error(transparent)]
    Order(#[from] NewOrderError),

    #[error("order submission failed")]
    Backend(#[from] BackendError),
}

impl CheckoutError {
    /// Notice shown after a failed submission.
    #[must_use]
    pub fn notice(&self) -> Notice {
        match self {
            Self::NotAuthenticated => {
                Notice::error("Error", "Debes iniciar sesión para hacer un pedido.")
            }
            Self::Order(error) => Notice::from(error),
            Self::Backend(error) => {
                Notice::error("Error al enviar pedido", error.user_message(SUBMIT_FAILED))
            }
        }
    }
}

/// Result of an accepted order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checkout {
    /// Identifier the backend assigned.
    pub order_id: OrderId,

    /// View to show next.
    pub next: Route,

    /// Confirmation for the customer.
    pub notice: Notice,
}

/// Submits the cart as an order.
///
/// In [`SubmissionMode::HeaderThenLines`] the lines go out one at a time
/// after the header; a failure part-way leaves the header and earlier lines
/// on the backend and the cart untouched.
///
/// # Errors
///
/// Returns [`CheckoutError::NotAuthenticated`] without a session,
/// [`CheckoutError::Order`] for an empty cart, or the first backend failure.
pub async fn submit_order(
    orders: &dyn OrdersService,
    sessions: &dyn SessionSlot,
    cart: &dyn CartSlot,
    config: &CheckoutConfig,
) -> Result<Checkout, CheckoutError> {
    let session = sessions.current().ok_or(CheckoutError::NotAuthenticated)?;
    let snapshot = cart.snapshot(config.tax_rate);

    let delivery = Delivery::to_primary_address(config.delivery_type.as_str(), &session);
    let order = NewOrder::from_snapshot(&session, delivery, &snapshot, Uuid::now_v7())?;

    let order_id = send(orders, &order, config.submission_mode)
        .await
        .inspect_err(|error| {
            warn!(
                %error,
                idempotency_key = %order.header.idempotency_key,
                "order submission failed"
            );
        })?;

    cart.clear();

    info!(
        %order_id,
        lines = order.lines.len(),
        total = %order.header.total,
        "order submitted"
    );

    Ok(Checkout {
        order_id,
        next: Route::Orders,
        notice: Notice::success(
            "¡Pedido Enviado!",
            "Tu pedido ha sido recibido y está siendo procesado.",
        ),
    })
}

async fn send(
    orders: &dyn OrdersService,
    order: &NewOrder,
    mode: SubmissionMode,
) -> Result<OrderId, BackendError> {
    match mode {
        SubmissionMode::Nested => orders.create_order(order).await,
        SubmissionMode::HeaderThenLines => {
            let order_id = orders.create_order_header(&order.header).await?;

            for input in order.lines_for(order_id) {
                orders.create_order_line(input.order_id, input.line).await?;
            }

            Ok(order_id)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::RwLock;

    use pedido_listo::{
        cart::CartStore,
        menu::{ItemStatus, MenuItem, MenuItemId},
        orders::OrderStatus,
        session::{
            AccountStatus, BearerToken, NationalId, Role, RoleRef, Session, SessionStore,
            UserProfile,
        },
        storage::MemoryStore,
    };
    use rust_decimal::Decimal;
    use testresult::TestResult;

    use crate::orders::MockOrdersService;

    use super::*;

    fn session() -> Session {
        Session {
            user: UserProfile {
                national_id: NationalId::new("1712345678"),
                first_name: "Ana".to_string(),
                last_name: "Torres".to_string(),
                email: "ana@example.com".to_string(),
                phone: "0991234567".to_string(),
                address: "Av. Amazonas N34-12".to_string(),
                role: RoleRef {
                    id: Some(Role::CUSTOMER_ROLE_ID),
                    role: Role::Customer,
                },
                status: Some(AccountStatus::Active),
            },
            token: BearerToken::new("token-abc"),
        }
    }

    fn dish(id: i64, price: Decimal) -> MenuItem {
        MenuItem {
            id: MenuItemId(id),
            category: "Platos fuertes".to_string(),
            name: format!("Plato {id}"),
            description: None,
            price,
            available: true,
            status: ItemStatus::Active,
        }
    }

    fn signed_in() -> RwLock<SessionStore<MemoryStore>> {
        let sessions = RwLock::new(SessionStore::load(MemoryStore::new()));

        sessions.begin(session());

        sessions
    }

    fn filled_cart() -> RwLock<CartStore<MemoryStore>> {
        let mut cart = CartStore::load(MemoryStore::new());

        cart.add_item(&dish(1, Decimal::new(500, 2)));
        cart.add_item(&dish(1, Decimal::new(500, 2)));
        cart.add_item(&dish(2, Decimal::new(350, 2)));
        cart.set_note(MenuItemId(2), "sin cebolla");

        RwLock::new(cart)
    }

    #[tokio::test]
    async fn nested_submission_sends_header_and_lines_at_once() -> TestResult {
        let mut orders = MockOrdersService::new();
        let sessions = signed_in();
        let cart = filled_cart();

        orders
            .expect_create_order()
            .once()
            .withf(|order| {
                order.header.total == Decimal::new(1350, 2)
                    && order.header.status == OrderStatus::Pending
                    && order.header.delivery_address == "Av. Amazonas N34-12"
                    && order.header.delivery_type == "Delivery"
                    && order.lines.len() == 2
                    && order.lines.iter().any(|line| line.note.as_deref() == Some("sin cebolla"))
            })
            .return_once(|_| Ok(OrderId(81)));
        orders.expect_create_order_header().never();
        orders.expect_create_order_line().never();

        let checkout = submit_order(&orders, &sessions, &cart, &CheckoutConfig::default()).await?;

        assert_eq!(checkout.order_id, OrderId(81));
        assert_eq!(checkout.next, Route::Orders);
        assert!(!checkout.notice.is_error());
        assert_eq!(cart.snapshot(CheckoutConfig::default().tax_rate).count, 0);

        Ok(())
    }

    #[tokio::test]
    async fn two_step_submission_attaches_each_line_to_the_header() -> TestResult {
        let mut orders = MockOrdersService::new();
        let sessions = signed_in();
        let cart = filled_cart();
        let config = CheckoutConfig {
            submission_mode: SubmissionMode::HeaderThenLines,
            ..CheckoutConfig::default()
        };

        orders.expect_create_order().never();
        orders
            .expect_create_order_header()
            .once()
            .return_once(|_| Ok(OrderId(9)));
        orders
            .expect_create_order_line()
            .times(2)
            .withf(|order_id, _| *order_id == OrderId(9))
            .returning(|_, _| Ok(()));

        let checkout = submit_order(&orders, &sessions, &cart, &config).await?;

        assert_eq!(checkout.order_id, OrderId(9));
        assert!(cart.snapshot(config.tax_rate).is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn failed_line_keeps_the_cart() {
        let mut orders = MockOrdersService::new();
        let sessions = signed_in();
        let cart = filled_cart();
        let config = CheckoutConfig {
            submission_mode: SubmissionMode::HeaderThenLines,
            ..CheckoutConfig::default()
        };

        orders
            .expect_create_order_header()
            .once()
            .return_once(|_| Ok(OrderId(9)));
        orders
            .expect_create_order_line()
            .once()
            .returning(|_, _| Err(BackendError::rejected("Platillo no disponible")));

        let error = submit_order(&orders, &sessions, &cart, &config).await.err();

        assert_eq!(
            error.map(|error| error.notice().message),
            Some("Platillo no disponible".to_string())
        );
        assert_eq!(cart.snapshot(config.tax_rate).count, 3);
    }

    #[tokio::test]
    async fn anonymous_checkout_is_refused_before_any_request() {
        let mut orders = MockOrdersService::new();
        let sessions = RwLock::new(SessionStore::load(MemoryStore::new()));

        orders.expect_create_order().never();

        let result =
            submit_order(&orders, &sessions, &filled_cart(), &CheckoutConfig::default()).await;

        assert!(matches!(result, Err(CheckoutError::NotAuthenticated)));
    }

    #[tokio::test]
    async fn empty_cart_is_refused_before_any_request() {
        let mut orders = MockOrdersService::new();
        let cart = RwLock::new(CartStore::load(MemoryStore::new()));

        orders.expect_create_order().never();

        let result = submit_order(&orders, &signed_in(), &cart, &CheckoutConfig::default()).await;

        assert!(matches!(
            result,
            Err(CheckoutError::Order(NewOrderError::EmptyCart))
        ));
    }
}
