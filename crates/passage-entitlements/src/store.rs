// Copyright 2025 - Passage Contributors
// SPDX-License-Identifier: GPL-3.0-only

use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use crate::{
    error::{EntitlementError, Result},
    product::Product,
    receipt::ReceiptReader,
};

/// Builds at or below this number were sold as paid-up-front: their receipts
/// grant the full version without an explicit purchase record.
pub const LAST_FULL_VERSION_BUILD: u32 = 2016;

/// Immutable snapshot of what the user owns, derived from one receipt parse.
/// Donations and cancelled purchases never appear in `products`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntitlementSet {
    products: HashSet<Product>,
    cancelled: HashSet<Product>,
    purchase_dates: HashMap<Product, DateTime<Utc>>,
    purchased_build: Option<u32>,
}

impl EntitlementSet {
    pub fn contains(&self, product: &Product) -> bool {
        self.products.contains(product)
    }

    pub fn is_cancelled(&self, product: &Product) -> bool {
        self.cancelled.contains(product)
    }

    pub fn purchase_date(&self, product: &Product) -> Option<DateTime<Utc>> {
        self.purchase_dates.get(product).copied()
    }

    pub fn purchased_build(&self) -> Option<u32> {
        self.purchased_build
    }

    pub fn products(&self) -> impl Iterator<Item = &Product> {
        self.products.iter()
    }
}

/// Holds the last fully-reloaded [`EntitlementSet`]. Reload is atomic: a
/// malformed receipt leaves the previous snapshot in place.
#[derive(Clone, Default)]
pub struct EntitlementStore {
    inner: Arc<RwLock<EntitlementSet>>,
}

impl EntitlementStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> EntitlementSet {
        self.inner.read().clone()
    }

    /// Replaces the snapshot from a fresh receipt parse and returns the
    /// products cancelled since the previous reload, so callers can react to
    /// refunds.
    pub fn reload<R>(&self, reader: &R) -> Result<Vec<Product>>
    where
        R: ReceiptReader,
    {
        let receipt = reader
            .receipt()
            .map_err(|err| EntitlementError::ReceiptUnparseable {
                source: Box::new(err),
            })
            .inspect_err(|_| tracing::warn!("Could not parse purchase receipt, keeping previous entitlements"))?;

        let mut products = HashSet::new();
        let mut cancelled = HashSet::new();
        let mut purchase_dates = HashMap::new();

        if let Some(build) = receipt.original_build_number {
            tracing::debug!("Original purchased build: {build}");
            if build <= LAST_FULL_VERSION_BUILD {
                products.insert(Product::FullVersion);
            }
        }
        for record in &receipt.purchases {
            let Some(product) = Product::from_id(&record.product_id) else {
                tracing::debug!("Skipping unrecognized product id: {}", record.product_id);
                continue;
            };
            if let Some(date) = record.cancellation_date {
                tracing::debug!("{product} [cancelled on: {date}]");
                cancelled.insert(product);
                continue;
            }
            if product.is_donation() {
                continue;
            }
            if let Some(date) = record.purchase_date {
                purchase_dates.insert(product.clone(), date);
            }
            products.insert(product);
        }
        tracing::info!(
            "Purchased products: {:?}",
            products.iter().map(Product::id).collect::<Vec<_>>()
        );

        let next = EntitlementSet {
            products,
            cancelled,
            purchase_dates,
            purchased_build: receipt.original_build_number,
        };

        let mut guard = self.inner.write();
        let newly_cancelled = next
            .cancelled
            .iter()
            .filter(|product| !guard.cancelled.contains(*product))
            .cloned()
            .collect();
        *guard = next;
        Ok(newly_cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::receipt::{PurchaseRecord, Receipt};

    struct StaticReader(Receipt);

    impl ReceiptReader for StaticReader {
        type ReadError = std::io::Error;

        fn receipt(&self) -> std::result::Result<Receipt, Self::ReadError> {
            Ok(self.0.clone())
        }
    }

    struct BrokenReader;

    impl ReceiptReader for BrokenReader {
        type ReadError = std::io::Error;

        fn receipt(&self) -> std::result::Result<Receipt, Self::ReadError> {
            Err(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                "garbled receipt",
            ))
        }
    }

    #[test]
    fn old_build_grants_full_version() {
        let store = EntitlementStore::new();
        store
            .reload(&StaticReader(Receipt {
                original_build_number: Some(LAST_FULL_VERSION_BUILD),
                purchases: vec![],
            }))
            .unwrap();
        let snapshot = store.snapshot();
        assert!(snapshot.contains(&Product::FullVersion));
        assert_eq!(snapshot.purchased_build(), Some(LAST_FULL_VERSION_BUILD));
    }

    #[test]
    fn newer_build_grants_nothing() {
        let store = EntitlementStore::new();
        store
            .reload(&StaticReader(Receipt {
                original_build_number: Some(LAST_FULL_VERSION_BUILD + 1),
                purchases: vec![],
            }))
            .unwrap();
        assert!(!store.snapshot().contains(&Product::FullVersion));
    }

    #[test]
    fn cancelled_purchases_are_excluded() {
        let bought_on = Utc::now();
        let store = EntitlementStore::new();
        let cancelled = store
            .reload(&StaticReader(Receipt {
                original_build_number: None,
                purchases: vec![
                    PurchaseRecord::new(Product::UnlimitedHosts.id()).purchased_at(bought_on),
                    PurchaseRecord::new(Product::TrustedNetworks.id()).cancelled_at(Utc::now()),
                ],
            }))
            .unwrap();

        let snapshot = store.snapshot();
        assert!(snapshot.contains(&Product::UnlimitedHosts));
        assert_eq!(
            snapshot.purchase_date(&Product::UnlimitedHosts),
            Some(bought_on)
        );
        assert!(!snapshot.contains(&Product::TrustedNetworks));
        assert!(snapshot.is_cancelled(&Product::TrustedNetworks));
        assert_eq!(cancelled, vec![Product::TrustedNetworks]);
    }

    #[test]
    fn donations_never_become_entitlements() {
        let store = EntitlementStore::new();
        store
            .reload(&StaticReader(Receipt {
                original_build_number: None,
                purchases: vec![PurchaseRecord::new("passage.donations.huge")],
            }))
            .unwrap();
        assert_eq!(store.snapshot().products().count(), 0);
    }

    #[test]
    fn failed_reload_keeps_previous_snapshot() {
        let store = EntitlementStore::new();
        store
            .reload(&StaticReader(Receipt {
                original_build_number: None,
                purchases: vec![PurchaseRecord::new(Product::FullVersion.id())],
            }))
            .unwrap();

        let result = store.reload(&BrokenReader);
        assert!(matches!(
            result,
            Err(EntitlementError::ReceiptUnparseable { .. })
        ));
        assert!(store.snapshot().contains(&Product::FullVersion));
    }

    #[test]
    fn second_reload_reports_only_new_cancellations() {
        let receipt = Receipt {
            original_build_number: None,
            purchases: vec![PurchaseRecord::new(Product::TvSharing.id()).cancelled_at(Utc::now())],
        };
        let store = EntitlementStore::new();
        let first = store.reload(&StaticReader(receipt.clone())).unwrap();
        let second = store.reload(&StaticReader(receipt)).unwrap();
        assert_eq!(first, vec![Product::TvSharing]);
        assert!(second.is_empty());
    }
}
