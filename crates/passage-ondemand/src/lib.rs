// Copyright 2025 - Passage Contributors
// SPDX-License-Identifier: GPL-3.0-only

//! Decides whether the tunnel should follow a network change.
//!
//! Evaluation is a pure function of the profile's on-demand settings
//! and a snapshot of the current network, so the platform layer that
//! watches interfaces stays trivial.

use serde::{Deserialize, Serialize};

use passage_profiles::{OnDemandPolicy, OnDemandSettings};

/// Snapshot of the network the device is currently on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NetworkObservation {
    WiFi { ssid: String },
    Cellular,
    Ethernet,
    /// No usable network. Nothing to connect over, nothing to trust.
    NoNetwork,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnDemandVerdict {
    Connect,
    Disconnect,
    NoChange,
}

/// Evaluates the on-demand rules against the observed network.
///
/// A wifi entry with a `false` flag is known but explicitly untrusted,
/// which under every policy behaves exactly like an unknown network.
pub fn evaluate(settings: &OnDemandSettings, network: &NetworkObservation) -> OnDemandVerdict {
    if !settings.enabled {
        return OnDemandVerdict::NoChange;
    }
    let trusted = match network {
        NetworkObservation::WiFi { ssid } => {
            settings.trusted_wifis.get(ssid).copied().unwrap_or(false)
        }
        NetworkObservation::Cellular => settings.trusts_cellular,
        NetworkObservation::Ethernet => settings.trusts_ethernet,
        NetworkObservation::NoNetwork => return OnDemandVerdict::NoChange,
    };

    let verdict = match settings.policy {
        OnDemandPolicy::Any => OnDemandVerdict::Connect,
        OnDemandPolicy::Including => {
            if trusted {
                OnDemandVerdict::Connect
            } else {
                OnDemandVerdict::Disconnect
            }
        }
        OnDemandPolicy::Excluding => {
            if trusted {
                OnDemandVerdict::Disconnect
            } else {
                OnDemandVerdict::Connect
            }
        }
    };
    tracing::debug!("On-demand verdict for {network:?}: {verdict:?}");
    verdict
}
