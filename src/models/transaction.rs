use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::date_utils::parse_date;
use crate::error::RecordError;
use crate::money::cents_from_json;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Debit,
    Credit,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Debit => "debit",
            Self::Credit => "credit",
        }
    }
}

impl FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "debit" => Ok(Self::Debit),
            "credit" => Ok(Self::Credit),
            other => Err(other.to_string()),
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A transaction exactly as `GET /transactions` returns it.
///
/// Fields are deliberately loose so that one malformed record cannot fail
/// deserialization of the whole list; validation happens in
/// [`Transaction::from_record`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub date: Value,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub amount: Value,
    #[serde(default)]
    pub transaction_type: Option<String>,
    #[serde(default)]
    pub category_id: Option<i64>,
}

/// A validated transaction.
///
/// `amount_cents` keeps whatever sign the backend stored. Classification
/// always goes through `transaction_type`; aggregation always uses the
/// magnitude.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transaction {
    pub id: i64,
    /// `None` when the upstream date could not be parsed.
    pub date: Option<NaiveDate>,
    pub description: String,
    pub amount_cents: i64,
    pub transaction_type: TransactionType,
    pub category_id: Option<i64>,
}

impl Transaction {
    pub fn new(
        id: i64,
        date: NaiveDate,
        description: impl Into<String>,
        amount_cents: i64,
        transaction_type: TransactionType,
        category_id: Option<i64>,
    ) -> Self {
        Self {
            id,
            date: Some(date),
            description: description.into(),
            amount_cents,
            transaction_type,
            category_id,
        }
    }

    /// Validate a wire record.
    ///
    /// A bad amount or transaction type rejects the record. A bad date does
    /// not: the record is kept with `date = None` so that passes without a
    /// date constraint still count it.
    pub fn from_record(record: &TransactionRecord) -> Result<Self, RecordError> {
        let amount_cents =
            cents_from_json(&record.amount).ok_or_else(|| RecordError::InvalidAmount {
                id: record.id,
                value: record.amount.to_string(),
            })?;

        let raw_type = record.transaction_type.as_deref().unwrap_or_default();
        let transaction_type = raw_type.parse::<TransactionType>().map_err(|value| {
            RecordError::UnknownTransactionType {
                id: record.id,
                value,
            }
        })?;

        let date = record.date.as_str().and_then(parse_date);

        Ok(Self {
            id: record.id,
            date,
            description: record.description.clone().unwrap_or_default(),
            amount_cents,
            transaction_type,
            category_id: record.category_id,
        })
    }

    /// Spending magnitude; the stored sign is ignored.
    pub fn magnitude_cents(&self) -> i64 {
        self.amount_cents.saturating_abs()
    }

    /// Amount with the sign derived from the transaction type: debits are
    /// negative, credits positive.
    pub fn signed_cents(&self) -> i64 {
        match self.transaction_type {
            TransactionType::Debit => -self.magnitude_cents(),
            TransactionType::Credit => self.magnitude_cents(),
        }
    }
}

/// Transactions that survived validation plus the records that did not.
#[derive(Debug, Clone, Default)]
pub struct TransactionBatch {
    pub transactions: Vec<Transaction>,
    pub rejected: Vec<RecordError>,
}

impl TransactionBatch {
    pub fn from_records(records: &[TransactionRecord]) -> Self {
        let mut batch = Self::default();
        for record in records {
            match Transaction::from_record(record) {
                Ok(transaction) => {
                    if transaction.date.is_none() {
                        tracing::debug!(
                            "Transaction {} has unparsable date {}",
                            record.id,
                            record.date
                        );
                    }
                    batch.transactions.push(transaction);
                }
                Err(e) => {
                    tracing::warn!("Skipping record: {}", e);
                    batch.rejected.push(e);
                }
            }
        }
        batch
    }

    pub fn skipped(&self) -> usize {
        self.rejected.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> TransactionRecord {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_from_record_happy_path() {
        let r = record(json!({
            "id": 7,
            "date": "2024-02-10",
            "description": "Weekly shop",
            "amount": -54.3,
            "transaction_type": "debit",
            "category_id": 3
        }));
        let t = Transaction::from_record(&r).unwrap();
        assert_eq!(t.id, 7);
        assert_eq!(t.date, NaiveDate::from_ymd_opt(2024, 2, 10));
        assert_eq!(t.amount_cents, -5430);
        assert_eq!(t.magnitude_cents(), 5430);
        assert_eq!(t.transaction_type, TransactionType::Debit);
        assert_eq!(t.category_id, Some(3));
    }

    #[test]
    fn test_type_is_authoritative_for_sign() {
        let positive_debit = record(json!({
            "id": 1, "date": "2024-01-01", "amount": 20, "transaction_type": "DEBIT"
        }));
        let negative_credit = record(json!({
            "id": 2, "date": "2024-01-01", "amount": -20, "transaction_type": "credit"
        }));
        assert_eq!(
            Transaction::from_record(&positive_debit).unwrap().signed_cents(),
            -2000
        );
        assert_eq!(
            Transaction::from_record(&negative_credit).unwrap().signed_cents(),
            2000
        );
    }

    #[test]
    fn test_bad_date_is_kept_without_date() {
        let r = record(json!({
            "id": 3, "date": "last tuesday", "amount": 5, "transaction_type": "debit"
        }));
        let t = Transaction::from_record(&r).unwrap();
        assert!(t.date.is_none());
    }

    #[test]
    fn test_rejections() {
        let bad_amount = record(json!({
            "id": 4, "date": "2024-01-01", "amount": "ten", "transaction_type": "debit"
        }));
        let bad_type = record(json!({
            "id": 5, "date": "2024-01-01", "amount": 10, "transaction_type": "transfer"
        }));
        let missing_type = record(json!({ "id": 6, "date": "2024-01-01", "amount": 10 }));

        assert!(matches!(
            Transaction::from_record(&bad_amount),
            Err(RecordError::InvalidAmount { id: 4, .. })
        ));
        assert!(matches!(
            Transaction::from_record(&bad_type),
            Err(RecordError::UnknownTransactionType { id: 5, .. })
        ));
        assert!(Transaction::from_record(&missing_type).is_err());
    }

    #[test]
    fn test_batch_counts_rejected() {
        let records: Vec<TransactionRecord> = serde_json::from_value(json!([
            { "id": 1, "date": "2024-01-01", "amount": 10, "transaction_type": "debit" },
            { "id": 2, "date": "2024-01-02", "amount": null, "transaction_type": "debit" },
            { "id": 3, "date": 20240103, "amount": 30, "transaction_type": "credit" }
        ]))
        .unwrap();
        let batch = TransactionBatch::from_records(&records);
        assert_eq!(batch.transactions.len(), 2);
        assert_eq!(batch.skipped(), 1);
        assert!(batch.transactions[1].date.is_none());
    }
}
