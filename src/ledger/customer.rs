// Customer and statement types
// A customer owns its statement; balance is always derived from it

use chrono::{DateTime, Local, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::balance::{compute_balance, BalanceBreakdown};
use super::error::LedgerError;

/// Direction of a statement entry
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Credit,
    Debit,
}

/// A single, immutable ledger line
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct StatementEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub created_at: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: EntryKind,
}

/// Timezone used to decide which calendar day an entry belongs to
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum CalendarZone {
    /// Host clock timezone
    #[default]
    Local,
    Utc,
}

impl CalendarZone {
    pub fn date_of(self, at: DateTime<Utc>) -> NaiveDate {
        match self {
            Self::Local => at.with_timezone(&Local).date_naive(),
            Self::Utc => at.date_naive(),
        }
    }
}

/// Account holder record
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: Uuid,
    pub tax_id: String,
    pub name: String,
    pub statement: Vec<StatementEntry>,
}

impl Customer {
    pub fn new(tax_id: String, name: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            tax_id,
            name,
            statement: Vec::new(),
        }
    }

    pub fn balance(&self) -> Result<Decimal, LedgerError> {
        compute_balance(&self.statement)
    }

    /// Append a credit entry. Returns the entry and the balance after it.
    ///
    /// The sum of all credits must stay within `Decimal` range. Debits never
    /// exceed credits, so every fold over the statement stays foldable.
    pub fn deposit(
        &mut self,
        description: Option<String>,
        amount: Decimal,
        now: DateTime<Utc>,
    ) -> Result<(StatementEntry, Decimal), LedgerError> {
        if amount < Decimal::ZERO {
            return Err(LedgerError::NegativeAmount);
        }

        let current = self.breakdown()?;
        if current.deposit.checked_add(amount).is_none() {
            return Err(LedgerError::AmountOverflow);
        }
        let total = current
            .total
            .checked_add(amount)
            .ok_or(LedgerError::AmountOverflow)?;

        let entry = StatementEntry {
            description,
            amount,
            created_at: now,
            kind: EntryKind::Credit,
        };
        self.statement.push(entry.clone());
        Ok((entry, total))
    }

    /// Append a debit entry if the balance covers it.
    ///
    /// The returned total is the balance *before* the debit, matching the
    /// public API of the withdraw endpoint.
    pub fn withdraw(
        &mut self,
        amount: Decimal,
        now: DateTime<Utc>,
    ) -> Result<(StatementEntry, Decimal), LedgerError> {
        if amount < Decimal::ZERO {
            return Err(LedgerError::NegativeAmount);
        }

        let balance = self.balance()?;
        if balance < amount {
            return Err(LedgerError::InsufficientFunds);
        }

        let entry = StatementEntry {
            description: None,
            amount,
            created_at: now,
            kind: EntryKind::Debit,
        };
        self.statement.push(entry.clone());
        Ok((entry, balance))
    }

    /// Entries created on `day`, as seen from `zone`
    pub fn statement_on(&self, day: NaiveDate, zone: CalendarZone) -> Vec<&StatementEntry> {
        self.statement
            .iter()
            .filter(|entry| zone.date_of(entry.created_at) == day)
            .collect()
    }

    pub fn rename(&mut self, name: String) {
        self.name = name;
    }

    pub fn breakdown(&self) -> Result<BalanceBreakdown, LedgerError> {
        BalanceBreakdown::from_entries(&self.statement)
    }
}
