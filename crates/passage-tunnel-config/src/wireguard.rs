// Copyright 2025 - Passage Contributors
// SPDX-License-Identifier: GPL-3.0-only

use passage_common::Endpoint;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireGuardPeer {
    pub public_key: String,
    pub allowed_ips: Vec<String>,
    pub persistent_keepalive: Option<u16>,
}

/// Stored WireGuard configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct WireGuardConfig {
    pub remotes: Vec<Endpoint>,
    pub peers: Vec<WireGuardPeer>,
    pub addresses: Vec<String>,
    pub dns_servers: Vec<String>,
    pub mtu: Option<u16>,
}

impl WireGuardConfig {
    /// Owned, independent editing copy of this configuration.
    pub fn builder(&self) -> WireGuardBuilder {
        WireGuardBuilder {
            remotes: self.remotes.clone(),
            peers: self.peers.clone(),
            addresses: self.addresses.clone(),
            dns_servers: self.dns_servers.clone(),
            mtu: self.mtu,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct WireGuardBuilder {
    pub remotes: Vec<Endpoint>,
    pub peers: Vec<WireGuardPeer>,
    pub addresses: Vec<String>,
    pub dns_servers: Vec<String>,
    pub mtu: Option<u16>,
}

impl WireGuardBuilder {
    /// Fills unset optional fields with the documented defaults: allowed IPs
    /// covering the full v4/v6 space on every peer that declares none.
    pub fn with_fallbacks(mut self) -> Self {
        for peer in &mut self.peers {
            if peer.allowed_ips.is_empty() {
                peer.allowed_ips = vec!["0.0.0.0/0".to_owned(), "::/0".to_owned()];
            }
        }
        self
    }

    pub fn build(self) -> WireGuardConfig {
        WireGuardConfig {
            remotes: self.remotes,
            peers: self.peers,
            addresses: self.addresses,
            dns_servers: self.dns_servers,
            mtu: self.mtu,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallbacks_fill_empty_allowed_ips() {
        let builder = WireGuardBuilder {
            peers: vec![
                WireGuardPeer {
                    public_key: "pk1".to_owned(),
                    allowed_ips: vec![],
                    persistent_keepalive: None,
                },
                WireGuardPeer {
                    public_key: "pk2".to_owned(),
                    allowed_ips: vec!["10.0.0.0/8".to_owned()],
                    persistent_keepalive: None,
                },
            ],
            ..Default::default()
        }
        .with_fallbacks();

        assert_eq!(builder.peers[0].allowed_ips, ["0.0.0.0/0", "::/0"]);
        assert_eq!(builder.peers[1].allowed_ips, ["10.0.0.0/8"]);
    }
}
