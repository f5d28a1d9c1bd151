// Copyright 2025 - Passage Contributors
// SPDX-License-Identifier: GPL-3.0-only

use std::fmt;

use serde::{Deserialize, Serialize};

const ID_FULL_VERSION: &str = "passage.full_version";
const ID_FEATURE_PREFIX: &str = "passage.features.";
const ID_PROVIDER_PREFIX: &str = "passage.providers.";
const ID_DONATION_PREFIX: &str = "passage.donations.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DonationTier {
    Tiny,
    Small,
    Medium,
    Big,
    Huge,
    Maxi,
}

impl DonationTier {
    fn as_str(&self) -> &'static str {
        match self {
            DonationTier::Tiny => "tiny",
            DonationTier::Small => "small",
            DonationTier::Medium => "medium",
            DonationTier::Big => "big",
            DonationTier::Huge => "huge",
            DonationTier::Maxi => "maxi",
        }
    }

    fn from_str(s: &str) -> Option<Self> {
        Some(match s {
            "tiny" => DonationTier::Tiny,
            "small" => DonationTier::Small,
            "medium" => DonationTier::Medium,
            "big" => DonationTier::Big,
            "huge" => DonationTier::Huge,
            "maxi" => DonationTier::Maxi,
            _ => return None,
        })
    }
}

/// A purchasable product, identified on receipts by its string id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Product {
    FullVersion,
    UnlimitedHosts,
    TrustedNetworks,
    SiriShortcuts,
    TvSharing,
    NetworkSettings,
    Provider(String),
    Donation(DonationTier),
}

impl Product {
    pub fn id(&self) -> String {
        match self {
            Product::FullVersion => ID_FULL_VERSION.to_owned(),
            Product::UnlimitedHosts => format!("{ID_FEATURE_PREFIX}unlimited_hosts"),
            Product::TrustedNetworks => format!("{ID_FEATURE_PREFIX}trusted_networks"),
            Product::SiriShortcuts => format!("{ID_FEATURE_PREFIX}siri_shortcuts"),
            Product::TvSharing => format!("{ID_FEATURE_PREFIX}tv_sharing"),
            Product::NetworkSettings => format!("{ID_FEATURE_PREFIX}network_settings"),
            Product::Provider(name) => format!("{ID_PROVIDER_PREFIX}{name}"),
            Product::Donation(tier) => format!("{ID_DONATION_PREFIX}{}", tier.as_str()),
        }
    }

    /// Inverse of [`Product::id`]. Unrecognized ids yield `None` and are
    /// skipped on receipt parse, like unknown StoreKit identifiers.
    pub fn from_id(id: &str) -> Option<Self> {
        if id == ID_FULL_VERSION {
            return Some(Product::FullVersion);
        }
        if let Some(feature) = id.strip_prefix(ID_FEATURE_PREFIX) {
            return Some(match feature {
                "unlimited_hosts" => Product::UnlimitedHosts,
                "trusted_networks" => Product::TrustedNetworks,
                "siri_shortcuts" => Product::SiriShortcuts,
                "tv_sharing" => Product::TvSharing,
                "network_settings" => Product::NetworkSettings,
                _ => return None,
            });
        }
        if let Some(name) = id.strip_prefix(ID_PROVIDER_PREFIX) {
            if name.is_empty() {
                return None;
            }
            return Some(Product::Provider(name.to_owned()));
        }
        if let Some(tier) = id.strip_prefix(ID_DONATION_PREFIX) {
            return DonationTier::from_str(tier).map(Product::Donation);
        }
        None
    }

    pub fn is_donation(&self) -> bool {
        matches!(self, Product::Donation(_))
    }

    pub fn is_provider(&self) -> bool {
        matches!(self, Product::Provider(_))
    }

    pub fn is_feature(&self) -> bool {
        !self.is_donation() && !self.is_provider()
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}
