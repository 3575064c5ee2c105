//! Cart
//!
//! The cart is the one piece of state every view shares. [`CartStore`] owns the
//! lines, enforces one line per dish, and writes the lines back to durable
//! storage after each mutation. Totals are never stored; [`CartStore::snapshot`]
//! recomputes them.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
    menu::{MenuItem, MenuItemId},
    pricing::{self, TaxRate},
    storage::{CART_KEY, KeyValueStore, load_json, save_json},
};

/// A dish in the cart with its quantity and the customer's note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    item: MenuItem,
    quantity: u32,
    #[serde(default)]
    note: String,
}

impl CartLine {
    /// A line holding `quantity` units of `item` with an empty note.
    #[must_use]
    pub fn new(item: MenuItem, quantity: u32) -> Self {
        Self {
            item,
            quantity,
            note: String::new(),
        }
    }

    /// Snapshot of the dish taken when it was added.
    #[must_use]
    pub fn item(&self) -> &MenuItem {
        &self.item
    }

    /// Dish identifier.
    #[must_use]
    pub fn item_id(&self) -> MenuItemId {
        self.item.id
    }

    /// Unit price captured with the dish.
    #[must_use]
    pub fn unit_price(&self) -> Decimal {
        self.item.price
    }

    /// Units ordered, always at least one inside a cart.
    #[must_use]
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Free-text note for the kitchen.
    #[must_use]
    pub fn note(&self) -> &str {
        &self.note
    }

    /// `unit_price × quantity`.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        pricing::line_subtotal(self.unit_price(), self.quantity)
    }
}

/// Acknowledgment returned by [`CartStore::add_item`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddedToCart {
    /// Display name of the dish.
    pub name: String,

    /// Quantity of the line after the addition.
    pub quantity: u32,
}

/// Lines plus derived totals at one point in time.
#[derive(Debug, Clone, PartialEq)]
pub struct CartSnapshot {
    /// Lines in insertion order.
    pub lines: Vec<CartLine>,

    /// Σ line subtotals.
    pub subtotal: Decimal,

    /// `subtotal × tax_rate`.
    pub tax: Decimal,

    /// `subtotal + tax`.
    pub total: Decimal,

    /// Σ quantities.
    pub count: u32,

    /// Rate the tax was computed with.
    pub tax_rate: TaxRate,
}

impl CartSnapshot {
    /// Whether the snapshot holds no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// The cart's lines backed by a [`KeyValueStore`].
#[derive(Debug, Clone)]
pub struct CartStore<S> {
    lines: Vec<CartLine>,
    store: S,
}

impl<S: KeyValueStore> CartStore<S> {
    /// Restores the cart persisted in `store`.
    ///
    /// A missing entry yields an empty cart. An unreadable or corrupt entry
    /// also yields an empty cart and logs a warning.
    pub fn load(store: S) -> Self {
        let lines = match load_json::<Vec<CartLine>, _>(&store, CART_KEY) {
            Ok(lines) => lines.unwrap_or_default(),
            Err(error) => {
                warn!(%error, "discarding persisted cart");
                Vec::new()
            }
        };

        let mut lines: Vec<CartLine> = lines.into_iter().filter(|line| line.quantity > 0).collect();
        dedupe(&mut lines);

        Self { lines, store }
    }

    /// Current lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Whether the cart holds no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Σ quantities.
    #[must_use]
    pub fn count(&self) -> u32 {
        self.lines
            .iter()
            .fold(0, |count: u32, line| count.saturating_add(line.quantity()))
    }

    /// Adds one unit of `item`, extending its line when one exists.
    pub fn add_item(&mut self, item: &MenuItem) -> AddedToCart {
        let quantity = if let Some(line) = self.line_mut(item.id) {
            line.quantity = line.quantity.saturating_add(1);
            line.quantity
        } else {
            self.lines.push(CartLine::new(item.clone(), 1));
            1
        };

        self.persist();

        AddedToCart {
            name: item.name.clone(),
            quantity,
        }
    }

    /// Removes the line for `id`. Missing lines are ignored.
    pub fn remove_item(&mut self, id: MenuItemId) {
        let before = self.lines.len();

        self.lines.retain(|line| line.item_id() != id);

        if self.lines.len() != before {
            self.persist();
        }
    }

    /// Sets the quantity of the line for `id`; zero or less removes it.
    pub fn set_quantity(&mut self, id: MenuItemId, quantity: i64) {
        let Ok(quantity @ 1..) = u32::try_from(quantity) else {
            self.remove_item(id);
            return;
        };

        if let Some(line) = self.line_mut(id) {
            line.quantity = quantity;
            self.persist();
        }
    }

    /// Replaces the note of the line for `id`. Missing lines are ignored.
    pub fn set_note(&mut self, id: MenuItemId, note: impl Into<String>) {
        if let Some(line) = self.line_mut(id) {
            line.note = note.into();
            self.persist();
        }
    }

    /// Removes every line.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.persist();
    }

    /// Lines with totals computed at `tax_rate`.
    #[must_use]
    pub fn snapshot(&self, tax_rate: TaxRate) -> CartSnapshot {
        let subtotal = pricing::cart_subtotal(&self.lines);
        let tax = pricing::tax(subtotal, tax_rate);

        CartSnapshot {
            lines: self.lines.clone(),
            subtotal,
            tax,
            total: pricing::total(subtotal, tax),
            count: self.count(),
            tax_rate,
        }
    }

    fn line_mut(&mut self, id: MenuItemId) -> Option<&mut CartLine> {
        self.lines.iter_mut().find(|line| line.item_id() == id)
    }

    fn persist(&self) {
        match save_json(&self.store, CART_KEY, &self.lines) {
            Ok(()) => debug!(lines = self.lines.len(), "persisted cart"),
            Err(error) => warn!(%error, "failed to persist cart"),
        }
    }
}

/// Merges lines sharing a dish into the first one, summing quantities.
fn dedupe(lines: &mut Vec<CartLine>) {
    let mut merged: Vec<CartLine> = Vec::with_capacity(lines.len());

    for line in lines.drain(..) {
        match merged.iter_mut().find(|kept| kept.item_id() == line.item_id()) {
            Some(kept) => kept.quantity = kept.quantity.saturating_add(line.quantity),
            None => merged.push(line),
        }
    }

    *lines = merged;
}
