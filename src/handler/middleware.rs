//! Customer resolution middleware
//!
//! Account-scoped endpoints identify the caller with a `taxId` header. The
//! lookup runs before the handler; an unknown or missing taxId short-circuits
//! with [`LedgerError::NotFound`] and the handler never runs.

use hyper::HeaderMap;

use crate::ledger::{Customer, LedgerError, Registry};

/// Header carrying the caller's taxId
pub const TAX_ID_HEADER: &str = "taxid";

/// Raw taxId header value, if present and valid UTF-8
pub fn tax_id(headers: &HeaderMap) -> Option<&str> {
    headers.get(TAX_ID_HEADER).and_then(|v| v.to_str().ok())
}

/// Resolve the caller for read-only handlers
pub fn resolve_customer<'r>(
    registry: &'r Registry,
    headers: &HeaderMap,
) -> Result<&'r Customer, LedgerError> {
    tax_id(headers)
        .and_then(|tax_id| registry.find(tax_id))
        .ok_or(LedgerError::NotFound)
}

/// Resolve the caller for mutating handlers; changes land in the registry
pub fn resolve_customer_mut<'r>(
    registry: &'r mut Registry,
    headers: &HeaderMap,
) -> Result<&'r mut Customer, LedgerError> {
    tax_id(headers)
        .and_then(|tax_id| registry.find_mut(tax_id))
        .ok_or(LedgerError::NotFound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyper::header::HeaderValue;

    fn registry() -> Registry {
        let mut registry = Registry::new();
        registry
            .create("111".to_string(), "Alice".to_string())
            .unwrap();
        registry
    }

    fn headers(tax_id: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(TAX_ID_HEADER, HeaderValue::from_str(tax_id).unwrap());
        headers
    }

    #[test]
    fn test_resolves_known_customer() {
        let registry = registry();
        let customer = resolve_customer(&registry, &headers("111")).unwrap();
        assert_eq!(customer.name, "Alice");
    }

    #[test]
    fn test_unknown_or_missing_tax_id() {
        let registry = registry();
        assert_eq!(
            resolve_customer(&registry, &headers("999")).err(),
            Some(LedgerError::NotFound)
        );
        assert_eq!(
            resolve_customer(&registry, &HeaderMap::new()).err(),
            Some(LedgerError::NotFound)
        );
    }

    #[test]
    fn test_mutation_is_visible_in_registry() {
        let mut registry = registry();
        resolve_customer_mut(&mut registry, &headers("111"))
            .unwrap()
            .rename("Alice B.".to_string());
        assert_eq!(registry.find("111").unwrap().name, "Alice B.");
    }
}
