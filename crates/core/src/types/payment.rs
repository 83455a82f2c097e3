//! Payment method accepted at checkout.

use serde::{Deserialize, Serialize};

/// How the customer pays for an order.
///
/// The wire values are the backend's lowercase, accent-free Portuguese names
/// (`dinheiro`, `pix`, `cartao`); [`PaymentMethod::label`] carries the
/// accented form shown to customers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Cash on delivery or pickup.
    #[serde(rename = "dinheiro")]
    Cash,
    /// Instant bank transfer.
    #[default]
    Pix,
    /// Credit or debit card.
    #[serde(rename = "cartao")]
    Card,
}

impl PaymentMethod {
    /// All accepted methods, in the order they are offered at checkout.
    pub const ALL: [Self; 3] = [Self::Pix, Self::Cash, Self::Card];

    /// Wire value used by the order API.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cash => "dinheiro",
            Self::Pix => "pix",
            Self::Card => "cartao",
        }
    }

    /// Customer-facing label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Cash => "Dinheiro",
            Self::Pix => "Pix",
            Self::Card => "Cartão",
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dinheiro" => Ok(Self::Cash),
            "pix" => Ok(Self::Pix),
            "cartao" | "cartão" => Ok(Self::Card),
            _ => Err(format!("invalid payment method: {s}")),
        }
    }
}
