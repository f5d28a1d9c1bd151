// Copyright 2025 - Passage Contributors
// SPDX-License-Identifier: GPL-3.0-only

//! Protocol-specific tunnel configuration types.
//!
//! A stored configuration ([`OpenVpnConfig`], [`WireGuardConfig`]) is
//! immutable; editing goes through an owned builder obtained with
//! `builder()`, so mutating a builder never touches catalog or profile
//! state until a caller explicitly commits it.

mod openvpn;
mod wireguard;

pub use crate::{
    openvpn::{
        Cipher, Compression, Digest, OpenVpnBuilder, OpenVpnConfig, ProxySettings, RoutingPolicy,
    },
    wireguard::{WireGuardBuilder, WireGuardConfig, WireGuardPeer},
};

use passage_common::Endpoint;

/// Builder for whichever protocol a resolution was requested for.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigurationBuilder {
    OpenVpn(OpenVpnBuilder),
    WireGuard(WireGuardBuilder),
}

impl ConfigurationBuilder {
    /// Remotes the tunnel would dial, in connection order.
    pub fn remotes(&self) -> &[Endpoint] {
        match self {
            ConfigurationBuilder::OpenVpn(builder) => &builder.remotes,
            ConfigurationBuilder::WireGuard(builder) => &builder.remotes,
        }
    }

    pub fn remotes_mut(&mut self) -> &mut Vec<Endpoint> {
        match self {
            ConfigurationBuilder::OpenVpn(builder) => &mut builder.remotes,
            ConfigurationBuilder::WireGuard(builder) => &mut builder.remotes,
        }
    }
}
