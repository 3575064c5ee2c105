//! Orders
//!
//! Read models for submitted orders and the request built from a cart
//! snapshot at checkout.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::{
    cart::{CartLine, CartSnapshot},
    dates::parse_instant,
    menu::MenuItemId,
    session::{NationalId, Session},
};

/// Backend identifier of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub i64);

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Where an order is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    /// Just placed.
    #[serde(rename = "Pendiente")]
    Pending,
    /// Accepted by staff.
    #[serde(rename = "Autorizado")]
    Authorized,
    /// On its way.
    #[serde(rename = "Enviado")]
    Dispatched,
    /// Handed over. Terminal.
    #[serde(rename = "Entregado")]
    Delivered,
    /// Called off. Terminal.
    #[serde(rename = "Cancelado")]
    Cancelled,
}

impl OrderStatus {
    /// Every status in lifecycle order.
    pub const ALL: [Self; 5] = [
        Self::Pending,
        Self::Authorized,
        Self::Dispatched,
        Self::Delivered,
        Self::Cancelled,
    ];

    /// Wire name of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "Pendiente",
            Self::Authorized => "Autorizado",
            Self::Dispatched => "Enviado",
            Self::Delivered => "Entregado",
            Self::Cancelled => "Cancelado",
        }
    }

    /// Parses a wire name.
    #[must_use]
    pub fn from_wire(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.as_str() == value)
    }

    /// Delivered and cancelled orders can't change any more.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }

    /// Statuses staff may move an order in this status to.
    pub fn transitions(self) -> impl Iterator<Item = Self> {
        Self::ALL
            .into_iter()
            .filter(move |next| !self.is_terminal() && *next != self)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Customer summary nested in staff order listings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OrderCustomer {
    /// National identity number.
    #[serde(rename = "cedula")]
    pub national_id: NationalId,

    /// Given name.
    #[serde(rename = "nombre")]
    pub first_name: String,

    /// Contact e-mail.
    #[serde(default)]
    pub email: String,
}

/// Dish reference inside an order line.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OrderedDish {
    /// Dish identifier.
    pub id: MenuItemId,

    /// Dish name.
    #[serde(rename = "nombreItem")]
    pub name: String,
}

/// A line of a submitted order.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OrderDetail {
    /// Line identifier.
    pub id: i64,

    /// Units ordered.
    #[serde(rename = "cantidad")]
    pub quantity: u32,

    /// Price per unit at order time.
    #[serde(rename = "precioUnitario")]
    pub unit_price: Decimal,

    /// `unit_price × quantity` as recorded by the backend.
    pub subtotal: Decimal,

    /// Customer note.
    #[serde(rename = "notasAdicionales", default)]
    pub note: Option<String>,

    /// Ordered dish.
    #[serde(rename = "platillo")]
    pub dish: Option<OrderedDish>,
}

impl OrderDetail {
    /// Dish name, or a placeholder when the dish was deleted.
    #[must_use]
    pub fn dish_name(&self) -> &str {
        self.dish.as_ref().map_or("Platillo no disponible", |dish| dish.name.as_str())
    }
}

/// A submitted order.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Order {
    /// Order identifier.
    pub id: OrderId,

    /// Customer who placed it.
    #[serde(rename = "usuarioCedula")]
    pub customer_id: NationalId,

    /// Placement time as sent by the backend.
    #[serde(rename = "fechaPedido", default)]
    pub placed_at: String,

    /// Current status.
    #[serde(rename = "estadoPedido")]
    pub status: OrderStatus,

    /// Delivery type, e.g. `Delivery`.
    #[serde(rename = "tipoEntrega", default)]
    pub delivery_type: String,

    /// Delivery address.
    #[serde(rename = "direccionEntrega", default)]
    pub delivery_address: String,

    /// Amount recorded for the order.
    #[serde(rename = "montoTotal")]
    pub total: Decimal,

    /// Lines.
    #[serde(rename = "detalles", default)]
    pub details: Vec<OrderDetail>,

    /// Customer summary, only in staff listings.
    #[serde(rename = "usuario", default)]
    pub customer: Option<OrderCustomer>,
}

impl Order {
    /// Whether the order was delivered to an address.
    #[must_use]
    pub fn is_delivery(&self) -> bool {
        self.delivery_type.eq_ignore_ascii_case("delivery")
    }
}

/// Sorts orders newest first. Orders with unreadable dates go last.
pub fn sort_newest_first(orders: &mut [Order]) {
    orders.sort_by_cached_key(|order| std::cmp::Reverse(parse_instant(&order.placed_at)));
}

/// The orders placed by `customer`, newest first.
pub fn orders_for_customer(orders: Vec<Order>, customer: &NationalId) -> Vec<Order> {
    let mut mine: Vec<Order> = orders
        .into_iter()
        .filter(|order| &order.customer_id == customer)
        .collect();

    sort_newest_first(&mut mine);

    mine
}

/// Sets the status of order `id`, returning the status it had.
pub fn apply_status(orders: &mut [Order], id: OrderId, status: OrderStatus) -> Option<OrderStatus> {
    orders
        .iter_mut()
        .find(|order| order.id == id)
        .map(|order| std::mem::replace(&mut order.status, status))
}

/// Delivery particulars of a new order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    /// Delivery type sent to the backend.
    pub kind: String,

    /// Address the order goes to.
    pub address: String,
}

impl Delivery {
    /// Home delivery of `kind` to the user's primary address.
    #[must_use]
    pub fn to_primary_address(kind: impl Into<String>, session: &Session) -> Self {
        Self {
            kind: kind.into(),
            address: session.user.address.clone(),
        }
    }
}

/// Errors raised while building a [`NewOrder`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NewOrderError {
    /// There's nothing to order.
    #[error("the cart is empty")]
    EmptyCart,
}

/// Order header fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderHeader {
    /// Customer placing the order.
    #[serde(rename = "usuarioCedula")]
    pub customer_id: NationalId,

    /// Delivery type.
    #[serde(rename = "tipoEntrega")]
    pub delivery_type: String,

    /// Delivery address.
    #[serde(rename = "direccionEntrega")]
    pub delivery_address: String,

    /// Cart subtotal.
    #[serde(rename = "montoTotal", with = "rust_decimal::serde::float")]
    pub total: Decimal,

    /// Initial status, always pending.
    #[serde(rename = "estadoPedido")]
    pub status: OrderStatus,

    /// Client-generated key the backend can deduplicate retries on.
    #[serde(rename = "idempotencyKey")]
    pub idempotency_key: Uuid,
}

/// A line of a new order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewOrderLine {
    /// Dish identifier.
    #[serde(rename = "itemId")]
    pub item_id: MenuItemId,

    /// Units.
    #[serde(rename = "cantidad")]
    pub quantity: u32,

    /// Price per unit.
    #[serde(rename = "precioUnitario", with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,

    /// `unit_price × quantity`.
    #[serde(with = "rust_decimal::serde::float")]
    pub subtotal: Decimal,

    /// Customer note, omitted when blank.
    #[serde(rename = "notasAdicionales", skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl From<&CartLine> for NewOrderLine {
    fn from(line: &CartLine) -> Self {
        let note = line.note().trim();

        Self {
            item_id: line.item_id(),
            quantity: line.quantity(),
            unit_price: line.unit_price(),
            subtotal: line.subtotal(),
            note: (!note.is_empty()).then(|| note.to_string()),
        }
    }
}

/// A line attached to an already-created order header.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderLineInput<'a> {
    /// Header the line belongs to.
    #[serde(rename = "pedidoId")]
    pub order_id: OrderId,

    /// Line fields.
    #[serde(flatten)]
    pub line: &'a NewOrderLine,
}

/// Order request built from a cart snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewOrder {
    /// Header fields.
    #[serde(flatten)]
    pub header: OrderHeader,

    /// Lines, sent nested in single-request submissions.
    #[serde(rename = "detalles")]
    pub lines: Vec<NewOrderLine>,
}

impl NewOrder {
    /// Builds the request for `snapshot` on behalf of the session holder.
    ///
    /// # Errors
    ///
    /// Returns [`NewOrderError::EmptyCart`] when the snapshot has no lines.
    pub fn from_snapshot(
        session: &Session,
        delivery: Delivery,
        snapshot: &CartSnapshot,
        idempotency_key: Uuid,
    ) -> Result<Self, NewOrderError> {
        if snapshot.is_empty() {
            return Err(NewOrderError::EmptyCart);
        }

        Ok(Self {
            header: OrderHeader {
                customer_id: session.user.national_id.clone(),
                delivery_type: delivery.kind,
                delivery_address: delivery.address,
                total: snapshot.subtotal,
                status: OrderStatus::Pending,
                idempotency_key,
            },
            lines: snapshot.lines.iter().map(NewOrderLine::from).collect(),
        })
    }

    /// Lines ready to attach to the created header `order_id`.
    pub fn lines_for(&self, order_id: OrderId) -> impl Iterator<Item = OrderLineInput<'_>> {
        self.lines
            .iter()
            .map(move |line| OrderLineInput { order_id, line })
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use testresult::TestResult;

    use crate::{
        cart::CartStore,
        menu::{ItemStatus, MenuItem},
        pricing::TaxRate,
        session::{Role, fixtures},
        storage::MemoryStore,
    };

    use super::*;

    fn dish(id: i64, price: &str) -> TestResult<MenuItem> {
        Ok(MenuItem {
            id: MenuItemId(id),
            category: "Platos fuertes".to_string(),
            name: format!("Platillo {id}"),
            description: None,
            price: Decimal::from_str(price)?,
            available: true,
            status: ItemStatus::Active,
        })
    }

    fn order(id: i64, customer: &str, placed_at: &str) -> TestResult<Order> {
        Ok(serde_json::from_value(serde_json::json!({
            "id": id,
            "usuarioCedula": customer,
            "fechaPedido": placed_at,
            "estadoPedido": "Pendiente",
            "tipoEntrega": "Delivery",
            "direccionEntrega": "Av. Amazonas",
            "montoTotal": 10.5,
            "detalles": [],
        }))?)
    }

    #[test]
    fn terminal_statuses_offer_no_transitions() {
        for status in OrderStatus::ALL {
            let transitions: Vec<OrderStatus> = status.transitions().collect();

            if status.is_terminal() {
                assert!(transitions.is_empty(), "{status} should be locked");
            } else {
                assert_eq!(transitions.len(), 4, "{status}");
                assert!(!transitions.contains(&status), "{status} lists itself");
            }
        }
    }

    #[test]
    fn status_wire_names_round_trip() {
        for status in OrderStatus::ALL {
            assert_eq!(OrderStatus::from_wire(status.as_str()), Some(status));
        }

        assert_eq!(OrderStatus::from_wire("Perdido"), None);
    }

    #[test]
    fn deserializes_staff_listing() -> TestResult {
        let order: Order = serde_json::from_str(
            r#"{
                "id": 4,
                "usuarioCedula": "1712345678",
                "tipoEntrega": "Delivery",
                "direccionEntrega": "Av. Amazonas",
                "montoTotal": 22.5,
                "estadoPedido": "Enviado",
                "estado": "ACTIVO",
                "fechaPedido": "2025-03-01T14:30:00.000Z",
                "usuario": { "cedula": "1712345678", "nombre": "Ana", "email": "ana@example.com" },
                "detalles": [{
                    "id": 9,
                    "cantidad": 2,
                    "precioUnitario": 11.25,
                    "subtotal": 22.5,
                    "notasAdicionales": null,
                    "platillo": { "id": 3, "nombreItem": "Ceviche" }
                }]
            }"#,
        )?;

        assert_eq!(order.status, OrderStatus::Dispatched);
        assert_eq!(order.total, Decimal::from_str("22.5")?);
        assert!(order.is_delivery());
        assert_eq!(order.details.first().map(OrderDetail::dish_name), Some("Ceviche"));
        assert_eq!(
            order.customer.map(|customer| customer.first_name),
            Some("Ana".to_string())
        );

        Ok(())
    }

    #[test]
    fn customer_history_is_filtered_and_newest_first() -> TestResult {
        let orders = vec![
            order(1, "1712345678", "2025-01-01T10:00:00Z")?,
            order(2, "0999999999", "2025-02-01T10:00:00Z")?,
            order(3, "1712345678", "2025-03-01T10:00:00Z")?,
            order(4, "1712345678", "not a date")?,
        ];

        let ids: Vec<OrderId> = orders_for_customer(orders, &NationalId::new("1712345678"))
            .into_iter()
            .map(|order| order.id)
            .collect();

        assert_eq!(ids, vec![OrderId(3), OrderId(1), OrderId(4)]);

        Ok(())
    }

    #[test]
    fn apply_status_returns_the_previous_status() -> TestResult {
        let mut orders = vec![order(1, "1712345678", "2025-01-01T10:00:00Z")?];

        let previous = apply_status(&mut orders, OrderId(1), OrderStatus::Authorized);

        assert_eq!(previous, Some(OrderStatus::Pending));
        assert_eq!(
            orders.first().map(|order| order.status),
            Some(OrderStatus::Authorized)
        );
        assert_eq!(apply_status(&mut orders, OrderId(5), OrderStatus::Cancelled), None);

        Ok(())
    }

    #[test]
    fn new_order_reflects_the_snapshot() -> TestResult {
        let session = fixtures::session(Role::Customer);
        let mut cart = CartStore::load(MemoryStore::new());

        cart.add_item(&dish(1, "12.50")?);
        cart.add_item(&dish(2, "10.00")?);
        cart.add_item(&dish(2, "10.00")?);
        cart.set_note(MenuItemId(2), " sin sal ");

        let key = Uuid::now_v7();
        let snapshot = cart.snapshot(TaxRate::from_percent(12));
        let order = NewOrder::from_snapshot(
            &session,
            Delivery::to_primary_address("Delivery", &session),
            &snapshot,
            key,
        )?;

        assert_eq!(order.header.customer_id, session.user.national_id);
        assert_eq!(order.header.total, Decimal::from_str("32.50")?);
        assert_eq!(order.header.status, OrderStatus::Pending);
        assert_eq!(order.header.idempotency_key, key);
        assert_eq!(order.header.delivery_address, session.user.address);

        let json = serde_json::to_value(&order)?;

        assert_eq!(json["estadoPedido"], "Pendiente");
        assert_eq!(json["detalles"][1]["cantidad"], 2);
        assert_eq!(json["detalles"][1]["subtotal"], 20.0);
        assert_eq!(json["detalles"][1]["notasAdicionales"], "sin sal");
        assert!(json["detalles"][0].get("notasAdicionales").is_none());

        Ok(())
    }

    #[test]
    fn empty_snapshot_is_rejected() {
        let session = fixtures::session(Role::Customer);
        let snapshot = CartStore::load(MemoryStore::new()).snapshot(TaxRate::from_percent(12));

        let result = NewOrder::from_snapshot(
            &session,
            Delivery::to_primary_address("Delivery", &session),
            &snapshot,
            Uuid::now_v7(),
        );

        assert_eq!(result, Err(NewOrderError::EmptyCart));
    }

    #[test]
    fn detached_lines_carry_the_header_id() -> TestResult {
        let session = fixtures::session(Role::Customer);
        let mut cart = CartStore::load(MemoryStore::new());

        cart.add_item(&dish(1, "12.50")?);

        let order = NewOrder::from_snapshot(
            &session,
            Delivery::to_primary_address("Delivery", &session),
            &cart.snapshot(TaxRate::ZERO),
            Uuid::now_v7(),
        )?;

        let lines: Vec<serde_json::Value> = order
            .lines_for(OrderId(77))
            .map(serde_json::to_value)
            .collect::<Result<_, _>>()?;

        assert_eq!(lines.len(), 1);
        assert_eq!(lines.first().map(|line| &line["pedidoId"]), Some(&serde_json::json!(77)));
        assert_eq!(lines.first().map(|line| &line["itemId"]), Some(&serde_json::json!(1)));

        Ok(())
    }
}
