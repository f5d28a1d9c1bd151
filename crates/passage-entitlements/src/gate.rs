// Copyright 2025 - Passage Contributors
// SPDX-License-Identifier: GPL-3.0-only

use passage_provider_directory::ProviderMetadata;

use crate::{product::Product, store::EntitlementStore};

/// Host profiles allowed without the unlimited-hosts purchase.
pub const MAX_FREE_HOSTS: usize = 2;

/// Pure eligibility checks over the last reloaded entitlement snapshot.
/// Denials mean "present the purchase flow", never a hard failure.
#[derive(Clone)]
pub struct EligibilityGate {
    store: EntitlementStore,
    /// Build-time override granting the full version to beta/TestFlight
    /// builds. Deliberately a configuration flag, not purchase state.
    is_beta_full_version: bool,
}

impl EligibilityGate {
    pub fn new(store: EntitlementStore) -> Self {
        EligibilityGate {
            store,
            is_beta_full_version: false,
        }
    }

    pub fn with_beta_full_version(mut self, enabled: bool) -> Self {
        self.is_beta_full_version = enabled;
        self
    }

    pub fn is_full_version(&self) -> bool {
        self.is_beta_full_version || self.store.snapshot().contains(&Product::FullVersion)
    }

    /// Feature eligibility. The full version implies every feature; provider
    /// access goes through [`EligibilityGate::is_eligible_for_provider`].
    pub fn is_eligible(&self, feature: &Product) -> bool {
        debug_assert!(feature.is_feature(), "not a feature product: {feature}");
        self.is_full_version() || self.store.snapshot().contains(feature)
    }

    /// Optimistic provider eligibility by name, for before the catalog
    /// metadata is fetched.
    pub fn is_eligible_for_provider(&self, provider_name: &str) -> bool {
        self.is_full_version()
            || self
                .store
                .snapshot()
                .contains(&Product::Provider(provider_name.to_owned()))
    }

    /// Authoritative provider eligibility once the catalog metadata is in
    /// hand. Delegates to the by-name check so the two call paths always
    /// agree for the same provider.
    pub fn is_eligible_for_provider_metadata(&self, metadata: &ProviderMetadata) -> bool {
        self.is_eligible_for_provider(&metadata.name)
    }

    /// Pre-check for host profile creation: the cap only binds while the
    /// unlimited-hosts purchase is ineligible.
    pub fn has_reached_maximum_number_of_hosts(&self, current_host_count: usize) -> bool {
        if self.is_eligible(&Product::UnlimitedHosts) {
            return false;
        }
        current_host_count >= MAX_FREE_HOSTS
    }
}
