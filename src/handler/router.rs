//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: endpoint matching, body limits,
//! customer resolution, dispatch, and access logging.

use chrono::Utc;
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::{Body, Bytes};
use hyper::header::{self, HeaderValue};
use hyper::http::request::Parts;
use hyper::{HeaderMap, Method, Request, Response, StatusCode, Version};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Instant;

use super::{accounts, middleware};
use crate::config::AppState;
use crate::http;
use crate::ledger::LedgerError;
use crate::logger::{self, AccessLogEntry};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Every operation the API exposes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Endpoint {
    CreateAccount,
    GetAccount,
    UpdateAccount,
    DeleteAccount,
    Statement,
    StatementByDate,
    Deposit,
    Withdraw,
    Balance,
}

impl Endpoint {
    /// Endpoints whose JSON body must be read before dispatch
    const fn has_body(self) -> bool {
        matches!(
            self,
            Self::CreateAccount | Self::UpdateAccount | Self::Deposit | Self::Withdraw
        )
    }
}

/// Why a request did not match an endpoint
#[derive(Debug, PartialEq, Eq)]
enum RouteMiss {
    NotFound,
    /// Path exists; carries the `Allow` header value
    MethodNotAllowed(&'static str),
}

fn match_endpoint(method: &Method, path: &str) -> Result<Endpoint, RouteMiss> {
    let (allow, endpoint) = match path {
        "/account" => (
            "GET, POST, PUT, DELETE",
            match method {
                &Method::POST => Some(Endpoint::CreateAccount),
                &Method::GET => Some(Endpoint::GetAccount),
                &Method::PUT => Some(Endpoint::UpdateAccount),
                &Method::DELETE => Some(Endpoint::DeleteAccount),
                _ => None,
            },
        ),
        "/statement" => ("GET", (method == Method::GET).then_some(Endpoint::Statement)),
        "/statement/date" => (
            "GET",
            (method == Method::GET).then_some(Endpoint::StatementByDate),
        ),
        "/deposit" => ("POST", (method == Method::POST).then_some(Endpoint::Deposit)),
        "/withdraw" => ("POST", (method == Method::POST).then_some(Endpoint::Withdraw)),
        "/balance" => ("GET", (method == Method::GET).then_some(Endpoint::Balance)),
        _ => return Err(RouteMiss::NotFound),
    };
    endpoint.ok_or(RouteMiss::MethodNotAllowed(allow))
}

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: Body,
    B::Error: Into<BoxError>,
{
    let started = Instant::now();
    let access_entry = state
        .cached_access_log
        .load(Ordering::Relaxed)
        .then(|| new_access_entry(&req, peer_addr));

    let mut response = route(req, &state).await;

    if let Ok(server) = HeaderValue::from_str(&state.config.http.server_name) {
        response.headers_mut().insert(header::SERVER, server);
    }

    if let Some(mut entry) = access_entry {
        entry.status = response.status().as_u16();
        entry.body_bytes = response.body().size_hint().exact().unwrap_or(0);
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

fn new_access_entry<B>(req: &Request<B>, peer_addr: SocketAddr) -> AccessLogEntry {
    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        req.method().to_string(),
        req.uri().path().to_string(),
    );
    entry.query = req.uri().query().map(ToString::to_string);
    entry.http_version = version_label(req.version()).to_string();
    entry.tax_id = middleware::tax_id(req.headers()).map(ToString::to_string);
    entry.user_agent = req
        .headers()
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string);
    entry
}

fn version_label(version: Version) -> &'static str {
    if version == Version::HTTP_10 {
        "1.0"
    } else if version == Version::HTTP_2 {
        "2"
    } else {
        "1.1"
    }
}

/// Route the request and render any ledger error
async fn route<B>(req: Request<B>, state: &AppState) -> Response<Full<Bytes>>
where
    B: Body,
    B::Error: Into<BoxError>,
{
    let (parts, body) = req.into_parts();
    let path = parts.uri.path();

    // 0. Health check (highest priority, no customer lookup)
    if state.config.health.enabled && path == state.config.health.path {
        return http::build_health_response();
    }

    // 1. Match endpoint
    let endpoint = match match_endpoint(&parts.method, path) {
        Ok(endpoint) => endpoint,
        Err(RouteMiss::NotFound) => return http::build_404_response(),
        Err(RouteMiss::MethodNotAllowed(allow)) => {
            logger::log_warning(&format!("Method not allowed: {} {path}", parts.method));
            return http::build_405_response(allow);
        }
    };

    // 2. Read body within the configured limit
    let max_body_size = state.config.http.max_body_size;
    let payload = if endpoint.has_body() {
        if let Some(resp) = check_body_size(&parts.headers, max_body_size) {
            return resp;
        }
        match read_body(body, max_body_size).await {
            Ok(bytes) => bytes,
            Err(resp) => return resp,
        }
    } else {
        Bytes::new()
    };

    // 3. Dispatch
    match dispatch(endpoint, &parts, &payload, state).await {
        Ok(response) => response,
        Err(e) => {
            let message = e.to_string();
            logger::log_rejected(parts.method.as_str(), path, e.kind(), &message);
            http::error_response(StatusCode::BAD_REQUEST, &message)
        }
    }
}

/// Validate Content-Length header and return 413 if exceeded
fn check_body_size(headers: &HeaderMap, max_body_size: u64) -> Option<Response<Full<Bytes>>> {
    let content_length = headers.get(header::CONTENT_LENGTH)?;
    content_length.to_str().map_or_else(
        |_| {
            logger::log_warning("Content-Length header contains non-ASCII characters");
            None
        },
        |size_str| match size_str.parse::<u64>() {
            Ok(size) if size > max_body_size => {
                logger::log_warning(&format!(
                    "Request body too large: {size} bytes (max: {max_body_size})"
                ));
                Some(http::build_413_response())
            }
            Err(_) => {
                logger::log_warning(&format!(
                    "Invalid Content-Length value: '{size_str}', relying on streaming limit"
                ));
                None
            }
            _ => None,
        },
    )
}

/// Collect the body, enforcing the limit even without Content-Length
async fn read_body<B>(body: B, max_body_size: u64) -> Result<Bytes, Response<Full<Bytes>>>
where
    B: Body,
    B::Error: Into<BoxError>,
{
    let limit = usize::try_from(max_body_size).unwrap_or(usize::MAX);
    match Limited::new(body, limit).collect().await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(e) if e.is::<LengthLimitError>() => Err(http::build_413_response()),
        Err(e) => Err(http::error_response(
            StatusCode::BAD_REQUEST,
            &LedgerError::InvalidBody(e.to_string()).to_string(),
        )),
    }
}

/// Resolve the customer where needed and run the handler.
///
/// The registry lock is taken once per request and held for the whole
/// handler, so each request's read-modify-write is atomic.
async fn dispatch(
    endpoint: Endpoint,
    parts: &Parts,
    body: &[u8],
    state: &AppState,
) -> Result<Response<Full<Bytes>>, LedgerError> {
    let headers = &parts.headers;

    match endpoint {
        Endpoint::CreateAccount => {
            let mut registry = state.registry.write().await;
            accounts::create_account(&mut registry, body)
        }
        Endpoint::Statement => {
            let registry = state.registry.read().await;
            let customer = middleware::resolve_customer(&registry, headers)?;
            accounts::get_statement(customer)
        }
        Endpoint::StatementByDate => {
            let registry = state.registry.read().await;
            let customer = middleware::resolve_customer(&registry, headers)?;
            let date = accounts::query_param(parts.uri.query(), "date");
            accounts::statement_by_date(
                customer,
                date.as_deref(),
                state.config.ledger.calendar_timezone,
            )
        }
        Endpoint::Deposit => {
            let mut registry = state.registry.write().await;
            let customer = middleware::resolve_customer_mut(&mut registry, headers)?;
            accounts::deposit(customer, body, Utc::now())
        }
        Endpoint::Withdraw => {
            let mut registry = state.registry.write().await;
            let customer = middleware::resolve_customer_mut(&mut registry, headers)?;
            accounts::withdraw(customer, body, Utc::now())
        }
        Endpoint::UpdateAccount => {
            let mut registry = state.registry.write().await;
            let customer = middleware::resolve_customer_mut(&mut registry, headers)?;
            accounts::update_account(customer, body)
        }
        Endpoint::GetAccount => {
            let registry = state.registry.read().await;
            let customer = middleware::resolve_customer(&registry, headers)?;
            Ok(accounts::get_account(customer))
        }
        Endpoint::DeleteAccount => {
            let mut registry = state.registry.write().await;
            let id = middleware::resolve_customer(&registry, headers)?.id;
            accounts::delete_account(&mut registry, id)
        }
        Endpoint::Balance => {
            let registry = state.registry.read().await;
            let customer = middleware::resolve_customer(&registry, headers)?;
            accounts::balance(customer)
        }
    }
}
