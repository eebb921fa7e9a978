// Request and response bodies of the ledger API

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ledger::{Customer, StatementEntry};

/// POST /account
#[derive(Debug, Deserialize)]
pub struct CreateAccountRequest {
    #[serde(rename = "taxId")]
    pub tax_id: String,
    pub name: String,
}

/// PUT /account
#[derive(Debug, Deserialize)]
pub struct UpdateAccountRequest {
    pub name: String,
}

/// POST /deposit
#[derive(Debug, Deserialize)]
pub struct DepositRequest {
    #[serde(default)]
    pub description: Option<String>,
    pub amount: Decimal,
}

/// POST /withdraw
#[derive(Debug, Deserialize)]
pub struct WithdrawRequest {
    pub amount: Decimal,
}

#[derive(Debug, Serialize)]
pub struct StatementResponse<'a> {
    pub statement: Vec<&'a StatementEntry>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
}

#[derive(Debug, Serialize)]
pub struct OperationResponse {
    pub operation: StatementEntry,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
}

#[derive(Debug, Serialize)]
pub struct UpdateAccountResponse<'a> {
    pub customer: &'a Customer,
    pub message: &'static str,
}
