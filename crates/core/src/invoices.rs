//! Invoices
//!
//! Invoices are issued by the backend and read-only here, apart from the
//! request staff send to bill an order.

use std::{fmt, num::ParseIntError, str::FromStr};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    dates::year_of,
    menu::{MenuItemId, contains_ignore_case},
    orders::{Order, OrderId, OrderedDish},
    pricing::{TaxRate, provisional_invoice_number},
    session::{NationalId, UserProfile},
};

/// Backend identifier of an invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InvoiceId(pub i64);

impl fmt::Display for InvoiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for InvoiceId {
    type Err = ParseIntError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        value.parse().map(Self)
    }
}

/// An invoice line, referencing a dish or carrying free text.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct InvoiceLine {
    /// Line identifier.
    pub id: i64,

    /// Units.
    #[serde(rename = "cantidad")]
    pub quantity: u32,

    /// Price per unit.
    #[serde(rename = "precioUnitario")]
    pub unit_price: Decimal,

    /// Line amount.
    pub subtotal: Decimal,

    /// Dish identifier, when the line bills a dish.
    #[serde(rename = "itemId", default)]
    pub item_id: Option<MenuItemId>,

    /// Free-text description.
    #[serde(rename = "descripcionItem", default)]
    pub description: Option<String>,

    /// Billed dish.
    #[serde(rename = "platillo", default)]
    pub dish: Option<OrderedDish>,
}

impl InvoiceLine {
    /// Text shown for the line: its description, else the dish name.
    #[must_use]
    pub fn label(&self) -> String {
        let description = self
            .description
            .as_deref()
            .map(str::trim)
            .filter(|description| !description.is_empty());

        if let Some(description) = description {
            return description.to_string();
        }

        match (&self.dish, self.item_id) {
            (Some(dish), _) => dish.name.clone(),
            (None, Some(id)) => format!("Item #{id}"),
            (None, None) => "Item".to_string(),
        }
    }
}

/// A backend-issued invoice.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Invoice {
    /// Invoice identifier.
    pub id: InvoiceId,

    /// Billed customer.
    #[serde(rename = "usuarioCedula")]
    pub customer_id: NationalId,

    /// Billed order, if any.
    #[serde(rename = "pedidoId", default)]
    pub order_id: Option<OrderId>,

    /// Backend-issued number.
    #[serde(rename = "numeroFactura")]
    pub number: String,

    /// Issue date as sent by the backend.
    #[serde(rename = "fechaFactura", default)]
    pub issued_at: String,

    /// Amount before tax.
    #[serde(rename = "montoSubtotal")]
    pub subtotal: Decimal,

    /// Tax (IVA).
    #[serde(rename = "montoIva")]
    pub tax: Decimal,

    /// Amount due.
    #[serde(rename = "montoTotal")]
    pub total: Decimal,

    /// Invoice status.
    #[serde(rename = "estadoFactura", default)]
    pub status: String,

    /// Invoice type.
    #[serde(rename = "tipoFactura", default)]
    pub kind: String,

    /// Free-text description.
    #[serde(rename = "descripcion", default)]
    pub description: Option<String>,

    /// Billed customer's record.
    #[serde(rename = "usuario", default)]
    pub customer: Option<UserProfile>,

    /// Lines.
    #[serde(rename = "detalles", default)]
    pub lines: Vec<InvoiceLine>,
}

impl Invoice {
    /// Tax rate implied by the invoice's own amounts. `None` for zero subtotals
    /// and for amounts whose ratio overflows.
    #[must_use]
    pub fn effective_tax_rate(&self) -> Option<TaxRate> {
        if self.subtotal.is_zero() {
            return None;
        }

        let fraction = self.tax.checked_div(self.subtotal)?;

        TaxRate::from_fraction(fraction.round_dp(4)).ok()
    }

    /// `IVA (12%)`, or plain `IVA` when no rate can be derived.
    #[must_use]
    pub fn tax_label(&self) -> String {
        self.effective_tax_rate()
            .map_or_else(|| "IVA".to_string(), |rate| format!("IVA ({rate})"))
    }

    /// Backend invoice number, or a provisional `FAC-YYYY-NNNNN` while it has none.
    #[must_use]
    pub fn display_number(&self) -> String {
        if !self.number.trim().is_empty() {
            return self.number.clone();
        }

        let year = year_of(&self.issued_at).unwrap_or_default();

        u64::try_from(self.id.0)
            .map_or_else(|_| self.id.to_string(), |id| provisional_invoice_number(id, year))
    }

    /// Customer's full name, when the record came with the invoice.
    #[must_use]
    pub fn customer_name(&self) -> Option<String> {
        self.customer.as_ref().map(UserProfile::full_name)
    }
}

/// Errors raised while looking up an invoice.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvoiceLookupError {
    /// No invoice has the id.
    #[error("invoice {0} not found")]
    NotFound(InvoiceId),
}

/// Finds invoice `id` among `invoices`.
///
/// # Errors
///
/// Returns [`InvoiceLookupError::NotFound`] when no invoice matches.
pub fn find_invoice(invoices: &[Invoice], id: InvoiceId) -> Result<&Invoice, InvoiceLookupError> {
    invoices
        .iter()
        .find(|invoice| invoice.id == id)
        .ok_or(InvoiceLookupError::NotFound(id))
}

/// Billing table search: invoice number, customer full name or national id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvoiceFilter {
    /// Search text; empty matches everything.
    pub query: String,
}

impl InvoiceFilter {
    /// Whether `invoice` matches the query.
    #[must_use]
    pub fn matches(&self, invoice: &Invoice) -> bool {
        let query = self.query.trim();

        query.is_empty()
            || contains_ignore_case(&invoice.number, query)
            || invoice
                .customer_name()
                .is_some_and(|name| contains_ignore_case(&name, query))
            || invoice.customer_id.as_str().contains(query)
    }

    /// Invoices matching the query, in their original order.
    pub fn apply<'a>(&self, invoices: &'a [Invoice]) -> Vec<&'a Invoice> {
        invoices.iter().filter(|invoice| self.matches(invoice)).collect()
    }
}

/// A line of an invoice request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewInvoiceLine {
    /// Dish identifier, when billing a dish.
    #[serde(rename = "itemId", skip_serializing_if = "Option::is_none")]
    pub item_id: Option<MenuItemId>,

    /// Units.
    #[serde(rename = "cantidad")]
    pub quantity: u32,

    /// Price per unit.
    #[serde(rename = "precioUnitario", with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,

    /// Free-text description.
    #[serde(rename = "descripcionItem", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Invoice request sent to `POST /api/facturacion`. Numbering and amounts are the backend's.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewInvoice {
    /// Billed customer.
    #[serde(rename = "usuarioCedula")]
    pub customer_id: NationalId,

    /// Billed order.
    #[serde(rename = "pedidoId", skip_serializing_if = "Option::is_none")]
    pub order_id: Option<OrderId>,

    /// Invoice type.
    #[serde(rename = "tipoFactura")]
    pub kind: String,

    /// Free-text description.
    #[serde(rename = "descripcion", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Lines.
    #[serde(rename = "detalles")]
    pub lines: Vec<NewInvoiceLine>,
}

impl NewInvoice {
    /// Invoice type used when billing an order.
    pub const ORDER_KIND: &'static str = "PEDIDO";

    /// Request billing every line of `order`.
    #[must_use]
    pub fn for_order(order: &Order) -> Self {
        Self {
            customer_id: order.customer_id.clone(),
            order_id: Some(order.id),
            kind: Self::ORDER_KIND.to_string(),
            description: Some(format!("Pedido #{}", order.id)),
            lines: order
                .details
                .iter()
                .map(|detail| NewInvoiceLine {
                    item_id: detail.dish.as_ref().map(|dish| dish.id),
                    quantity: detail.quantity,
                    unit_price: detail.unit_price,
                    description: None,
                })
                .collect(),
        }
    }
}
