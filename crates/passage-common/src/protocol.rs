// Copyright 2025 - Passage Contributors
// SPDX-License-Identifier: GPL-3.0-only

use serde::{Deserialize, Serialize};

/// Tunneling protocol a profile or preset is configured for.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum_macros::Display,
    strum_macros::EnumString,
)]
#[serde(rename_all = "lowercase")]
pub enum VpnProtocol {
    #[strum(serialize = "openvpn")]
    #[serde(rename = "openvpn")]
    OpenVpn,
    #[strum(serialize = "wireguard")]
    #[serde(rename = "wireguard")]
    WireGuard,
}
