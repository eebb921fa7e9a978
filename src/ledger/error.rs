// Ledger error module
// Every variant is a client error; the router maps them to 400 responses

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("customer not found")]
    NotFound,

    #[error("taxId already registered")]
    Conflict,

    #[error("insufficient funds")]
    InsufficientFunds,

    #[error("amount must be non-negative")]
    NegativeAmount,

    #[error("amount out of range")]
    AmountOverflow,

    #[error("invalid date, expected YYYY-MM-DD")]
    InvalidDate,

    #[error("invalid request body: {0}")]
    InvalidBody(String),
}

impl LedgerError {
    /// Short machine-friendly name, used in log lines
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::Conflict => "conflict",
            Self::InsufficientFunds | Self::NegativeAmount | Self::AmountOverflow => {
                "domain_violation"
            },
            Self::InvalidDate | Self::InvalidBody(_) => "bad_input",
        }
    }
}
