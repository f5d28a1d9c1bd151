// Copyright 2025 - Passage Contributors
// SPDX-License-Identifier: GPL-3.0-only

//! Purchase entitlements and feature eligibility.
//!
//! [`EntitlementStore`] holds the last fully-reloaded snapshot parsed from a
//! purchase receipt; [`EligibilityGate`] answers feature and provider
//! eligibility questions against that snapshot without side effects.

mod error;
mod gate;
mod product;
mod receipt;
mod store;

pub use crate::{
    error::{EntitlementError, PurchaseError, PurchaseOutcome},
    gate::{EligibilityGate, MAX_FREE_HOSTS},
    product::{DonationTier, Product},
    receipt::{PurchaseRecord, Receipt, ReceiptReader},
    store::{EntitlementSet, EntitlementStore, LAST_FULL_VERSION_BUILD},
};
