//! Account handlers
//!
//! One function per endpoint. Handlers receive an already-resolved customer
//! (see [`super::middleware`]) or the registry itself, and return either a
//! finished response or a [`LedgerError`] for the router to render.

use std::borrow::Cow;

use chrono::{DateTime, NaiveDate, Utc};
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use super::types::{
    CreateAccountRequest, DepositRequest, OperationResponse, StatementResponse,
    UpdateAccountRequest, UpdateAccountResponse, WithdrawRequest,
};
use crate::http::{empty_response, json_response};
use crate::ledger::{compute_balance, CalendarZone, Customer, LedgerError, Registry};
use crate::logger;

type HandlerResult = Result<Response<Full<Bytes>>, LedgerError>;

const UPDATED_MESSAGE: &str = "customer updated";

fn parse_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, LedgerError> {
    serde_json::from_slice(body).map_err(|e| LedgerError::InvalidBody(e.to_string()))
}

/// POST /account
pub fn create_account(registry: &mut Registry, body: &[u8]) -> HandlerResult {
    let request: CreateAccountRequest = parse_body(body)?;
    let customer = registry.create(request.tax_id, request.name)?;
    logger::log_account_created(&customer.tax_id);
    Ok(empty_response(StatusCode::CREATED))
}

/// GET /statement
pub fn get_statement(customer: &Customer) -> HandlerResult {
    let response = StatementResponse {
        statement: customer.statement.iter().collect(),
        total: customer.balance()?,
    };
    Ok(json_response(StatusCode::OK, &response))
}

/// POST /deposit
pub fn deposit(customer: &mut Customer, body: &[u8], now: DateTime<Utc>) -> HandlerResult {
    let request: DepositRequest = parse_body(body)?;
    let (operation, total) = customer.deposit(request.description, request.amount, now)?;
    Ok(json_response(
        StatusCode::CREATED,
        &OperationResponse { operation, total },
    ))
}

/// POST /withdraw
pub fn withdraw(customer: &mut Customer, body: &[u8], now: DateTime<Utc>) -> HandlerResult {
    let request: WithdrawRequest = parse_body(body)?;
    let (operation, total) = customer.withdraw(request.amount, now)?;
    Ok(json_response(
        StatusCode::CREATED,
        &OperationResponse { operation, total },
    ))
}

/// GET /statement/date?date=YYYY-MM-DD
pub fn statement_by_date(
    customer: &Customer,
    date: Option<&str>,
    zone: CalendarZone,
) -> HandlerResult {
    let day = date
        .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
        .ok_or(LedgerError::InvalidDate)?;

    let statement = customer.statement_on(day, zone);
    let total = compute_balance(statement.iter().copied())?;
    Ok(json_response(
        StatusCode::OK,
        &StatementResponse { statement, total },
    ))
}

/// PUT /account
pub fn update_account(customer: &mut Customer, body: &[u8]) -> HandlerResult {
    let request: UpdateAccountRequest = parse_body(body)?;
    customer.rename(request.name);
    Ok(json_response(
        StatusCode::CREATED,
        &UpdateAccountResponse {
            customer,
            message: UPDATED_MESSAGE,
        },
    ))
}

/// GET /account
pub fn get_account(customer: &Customer) -> Response<Full<Bytes>> {
    json_response(StatusCode::OK, customer)
}

/// DELETE /account
///
/// Responds with the registry as it stands after the removal.
pub fn delete_account(registry: &mut Registry, id: Uuid) -> HandlerResult {
    let removed = registry.remove(id).ok_or(LedgerError::NotFound)?;
    logger::log_account_deleted(&removed.tax_id, registry.len());
    Ok(json_response(StatusCode::OK, &*registry))
}

/// GET /balance
pub fn balance(customer: &Customer) -> HandlerResult {
    Ok(json_response(StatusCode::CREATED, &customer.breakdown()?))
}

/// Percent-decoded value of `key` in a raw query string.
/// A value that does not decode to UTF-8 is treated as absent.
pub fn query_param<'q>(query: Option<&'q str>, key: &str) -> Option<Cow<'q, str>> {
    query?
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(k, _)| *k == key)
        .and_then(|(_, v)| urlencoding::decode(v).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_param() {
        assert_eq!(
            query_param(Some("date=2024-03-01&x=1"), "date").as_deref(),
            Some("2024-03-01")
        );
        assert_eq!(
            query_param(Some("x=1&date=2024-03-02"), "date").as_deref(),
            Some("2024-03-02")
        );
        assert_eq!(query_param(Some("dated=1"), "date"), None);
        assert_eq!(query_param(None, "date"), None);
    }

    #[test]
    fn test_query_param_percent_decodes() {
        assert_eq!(
            query_param(Some("date=2024%2D03%2D01"), "date").as_deref(),
            Some("2024-03-01")
        );
        assert_eq!(query_param(Some("date=%FF"), "date"), None);
    }

    #[test]
    fn test_statement_by_date_accepts_encoded_date() {
        let mut customer = Customer::new("111".to_string(), "Alice".to_string());
        let at = "2024-03-01T12:00:00Z".parse::<DateTime<Utc>>().unwrap();
        customer.deposit(None, rust_decimal::Decimal::TEN, at).unwrap();

        let date = query_param(Some("date=2024%2D03%2D01"), "date");
        let response = statement_by_date(&customer, date.as_deref(), CalendarZone::Utc).unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn test_create_account_rejects_bad_json() {
        let mut registry = Registry::new();
        let result = create_account(&mut registry, br#"{"name":"Alice"}"#);
        assert!(matches!(result, Err(LedgerError::InvalidBody(_))));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_non_numeric_amount_is_rejected() {
        let mut customer = Customer::new("111".to_string(), "Alice".to_string());
        let result = deposit(&mut customer, br#"{"amount":"lots"}"#, Utc::now());
        assert!(matches!(result, Err(LedgerError::InvalidBody(_))));
        assert!(customer.statement.is_empty());
    }

    #[test]
    fn test_statement_by_date_rejects_bad_date() {
        let customer = Customer::new("111".to_string(), "Alice".to_string());
        assert_eq!(
            statement_by_date(&customer, Some("03/01/2024"), CalendarZone::Utc).err(),
            Some(LedgerError::InvalidDate)
        );
        assert_eq!(
            statement_by_date(&customer, None, CalendarZone::Utc).err(),
            Some(LedgerError::InvalidDate)
        );
    }
}
