// Copyright 2025 - Passage Contributors
// SPDX-License-Identifier: GPL-3.0-only

use passage_common::VpnProtocol;
use passage_tunnel_config::{OpenVpnConfig, WireGuardConfig};
use serde::{Deserialize, Serialize};

/// Protocol-specific configuration template offered by a server, e.g. a
/// cipher/port combination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preset {
    pub id: String,
    pub name: String,
    pub protocol: VpnProtocol,
    pub openvpn: Option<OpenVpnConfig>,
    pub wireguard: Option<WireGuardConfig>,
}

impl Preset {
    pub fn openvpn_configuration(&self) -> Option<&OpenVpnConfig> {
        self.openvpn.as_ref()
    }

    pub fn wireguard_configuration(&self) -> Option<&WireGuardConfig> {
        self.wireguard.as_ref()
    }
}
