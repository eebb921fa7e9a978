use rust_decimal::Decimal;
use serde::Serialize;

use super::customer::{EntryKind, StatementEntry};
use super::error::LedgerError;

/// Signed sum of a statement: credits add, debits subtract.
///
/// Fails with [`LedgerError::AmountOverflow`] if a partial sum leaves the
/// range of `Decimal`.
pub fn compute_balance<'a, I>(entries: I) -> Result<Decimal, LedgerError>
where
    I: IntoIterator<Item = &'a StatementEntry>,
{
    entries
        .into_iter()
        .try_fold(Decimal::ZERO, |balance, entry| {
            match entry.kind {
                EntryKind::Credit => balance.checked_add(entry.amount),
                EntryKind::Debit => balance.checked_sub(entry.amount),
            }
            .ok_or(LedgerError::AmountOverflow)
        })
}

/// Totals split by direction. `debit` is reported as a magnitude.
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
pub struct BalanceBreakdown {
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub debit: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub deposit: Decimal,
}

impl BalanceBreakdown {
    pub fn from_entries(entries: &[StatementEntry]) -> Result<Self, LedgerError> {
        let (debits, credits): (Vec<&StatementEntry>, Vec<&StatementEntry>) = entries
            .iter()
            .partition(|entry| entry.kind == EntryKind::Debit);

        Ok(Self {
            total: compute_balance(entries)?,
            debit: compute_balance(debits)?.abs(),
            deposit: compute_balance(credits)?,
        })
    }
}
