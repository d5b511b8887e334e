//! Typed failure kinds for every operation the core exposes.
//!
//! Every rejected action carries exactly one of these kinds plus a
//! human-readable message. No operation commits partial state before
//! returning an error; the request layer decides how to present it.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    /// Malformed or out-of-range input
    #[error("{0}")]
    Validation(String),

    /// Referenced item, meal, child, or order does not exist
    #[error("{0}")]
    NotFound(String),

    /// Resource exists but is not owned by the acting parent
    #[error("{0}")]
    Authorization(String),

    /// The cart (or custom meal builder) has no entries
    #[error("{0}")]
    EmptyCart(String),

    /// No child has been selected for the order
    #[error("{0}")]
    MissingSelection(String),

    /// Delivery date is today or in the past
    #[error("{0}")]
    PastDeliveryDate(String),

    /// A store write or read failed; nothing was committed
    #[error("{0}")]
    Persistence(String),
}

impl DomainError {
    /// Stable machine-readable kind, used in error payloads.
    pub fn kind(&self) -> &'static str {
        match self {
            DomainError::Validation(_) => "validation",
            DomainError::NotFound(_) => "not_found",
            DomainError::Authorization(_) => "authorization",
            DomainError::EmptyCart(_) => "empty_cart",
            DomainError::MissingSelection(_) => "missing_selection",
            DomainError::PastDeliveryDate(_) => "past_delivery_date",
            DomainError::Persistence(_) => "persistence",
        }
    }
}

impl From<anyhow::Error> for DomainError {
    fn from(err: anyhow::Error) -> Self {
        DomainError::Persistence(format!("storage failure: {:#}", err))
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
