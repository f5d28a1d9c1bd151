// Copyright 2025 - Passage Contributors
// SPDX-License-Identifier: GPL-3.0-only

#[derive(Debug, thiserror::Error)]
pub enum EntitlementError {
    #[error("could not parse purchase receipt")]
    ReceiptUnparseable {
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },
}

/// Outcome of a completed purchase flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PurchaseOutcome {
    Done,
    /// The user backed out. Not an error: callers show no dialog.
    Cancelled,
}

#[derive(Debug, thiserror::Error)]
pub enum PurchaseError {
    #[error("purchase failed: {reason}")]
    Failed { reason: String },

    #[error("purchases unavailable on this device")]
    Unavailable,
}

pub type Result<T> = std::result::Result<T, EntitlementError>;
