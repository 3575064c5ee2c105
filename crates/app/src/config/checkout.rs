//! Checkout Config

use clap::Args;
use pedido_listo::pricing::TaxRate;
use rust_decimal::Decimal;

use crate::orders::SubmissionMode;

/// Order submission settings.
#[derive(Debug, Clone, Args)]
pub struct CheckoutConfig {
    /// IVA rate as a fraction of the subtotal
    #[arg(long, env = "PEDIDO_LISTO_TAX_RATE", default_value = "0.12", value_parser = parse_tax_rate)]
    pub tax_rate: TaxRate,

    /// How orders reach the backend (nested, header-then-lines)
    #[arg(
        long,
        env = "PEDIDO_LISTO_SUBMISSION_MODE",
        value_enum,
        default_value_t = SubmissionMode::Nested
    )]
    pub submission_mode: SubmissionMode,

    /// Delivery type sent with every order
    #[arg(long, env = "PEDIDO_LISTO_DELIVERY_TYPE", default_value = "Delivery")]
    pub delivery_type: String,
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            tax_rate: TaxRate::from_percent(12),
            submission_mode: SubmissionMode::Nested,
            delivery_type: "Delivery".to_string(),
        }
    }
}

fn parse_tax_rate(value: &str) -> Result<TaxRate, String> {
    let fraction = value
        .trim()
        .parse::<Decimal>()
        .map_err(|error| format!("{value:?} is not a decimal: {error}"))?;

    TaxRate::from_fraction(fraction).map_err(|error| error.to_string())
}
