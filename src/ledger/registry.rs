// Customer registry
// Insertion-ordered list of customers, unique by taxId

use serde::Serialize;
use uuid::Uuid;

use super::customer::Customer;
use super::error::LedgerError;

#[derive(Debug, Default, Serialize)]
#[serde(transparent)]
pub struct Registry {
    customers: Vec<Customer>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new customer. Fails without touching the registry if the
    /// taxId is already taken.
    pub fn create(&mut self, tax_id: String, name: String) -> Result<&Customer, LedgerError> {
        if self.find(&tax_id).is_some() {
            return Err(LedgerError::Conflict);
        }

        let index = self.customers.len();
        self.customers.push(Customer::new(tax_id, name));
        Ok(&self.customers[index])
    }

    /// Exact, case-sensitive lookup
    pub fn find(&self, tax_id: &str) -> Option<&Customer> {
        self.customers.iter().find(|c| c.tax_id == tax_id)
    }

    pub fn find_mut(&mut self, tax_id: &str) -> Option<&mut Customer> {
        self.customers.iter_mut().find(|c| c.tax_id == tax_id)
    }

    /// Remove a customer by identity
    pub fn remove(&mut self, id: Uuid) -> Option<Customer> {
        let position = self.customers.iter().position(|c| c.id == id)?;
        Some(self.customers.remove(position))
    }

    pub fn len(&self) -> usize {
        self.customers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.customers.is_empty()
    }
}
