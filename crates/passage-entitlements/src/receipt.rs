// Copyright 2025 - Passage Contributors
// SPDX-License-Identifier: GPL-3.0-only

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One in-app purchase entry inside a receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseRecord {
    pub product_id: String,
    pub purchase_date: Option<DateTime<Utc>>,
    /// Present when the purchase was refunded. A cancelled record stays in
    /// the raw receipt but must not grant an entitlement.
    pub cancellation_date: Option<DateTime<Utc>>,
}

impl PurchaseRecord {
    pub fn new(product_id: impl Into<String>) -> Self {
        PurchaseRecord {
            product_id: product_id.into(),
            purchase_date: None,
            cancellation_date: None,
        }
    }

    pub fn purchased_at(mut self, date: DateTime<Utc>) -> Self {
        self.purchase_date = Some(date);
        self
    }

    pub fn cancelled_at(mut self, date: DateTime<Utc>) -> Self {
        self.cancellation_date = Some(date);
        self
    }
}

/// Parsed purchase receipt, as handed over by the purchase backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Receipt {
    /// Build number of the app version originally purchased, for the
    /// grandfather clause.
    pub original_build_number: Option<u32>,
    pub purchases: Vec<PurchaseRecord>,
}

/// Supplies the latest receipt. Decoding the raw store payload is the
/// caller's concern; this core only consumes the parsed fields.
pub trait ReceiptReader {
    type ReadError: std::error::Error + Send + Sync + 'static;

    fn receipt(&self) -> Result<Receipt, Self::ReadError>;
}
