//! Transient user notifications

use crate::{
    cart::AddedToCart, invoices::InvoiceLookupError, orders::NewOrderError,
    validation::ValidationErrors,
};

/// Tone of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoticeKind {
    /// Something worked.
    Success,
    /// Something failed; the user may retry.
    Error,
}

/// A short message shown to the user and dismissed after a while.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Tone.
    pub kind: NoticeKind,
    /// Headline.
    pub title: String,
    /// Detail line.
    pub message: String,
}

impl Notice {
    /// A success notice.
    pub fn success(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            title: title.into(),
            message: message.into(),
        }
    }

    /// An error notice.
    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            title: title.into(),
            message: message.into(),
        }
    }

    /// Whether the notice reports a failure.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.kind == NoticeKind::Error
    }
}

impl From<&AddedToCart> for Notice {
    fn from(added: &AddedToCart) -> Self {
        Self::success(
            "Añadido al carrito",
            format!("{} (x{}) está en tu pedido.", added.name, added.quantity),
        )
    }
}

impl From<&ValidationErrors> for Notice {
    fn from(errors: &ValidationErrors) -> Self {
        Self::error("Revisa el formulario", errors.to_string())
    }
}

impl From<&InvoiceLookupError> for Notice {
    fn from(error: &InvoiceLookupError) -> Self {
        Self::error("Factura no encontrada", error.to_string())
    }
}

impl From<&NewOrderError> for Notice {
    fn from(error: &NewOrderError) -> Self {
        match error {
            NewOrderError::EmptyCart => {
                Self::error("Carrito vacío", "Agrega platillos antes de hacer el pedido.")
            }
        }
    }
}
