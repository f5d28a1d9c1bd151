// Copyright 2025 - Passage Contributors
// SPDX-License-Identifier: GPL-3.0-only

use passage_common::Endpoint;
use serde::{Deserialize, Serialize};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum_macros::Display, Default,
)]
pub enum Cipher {
    #[default]
    #[strum(serialize = "AES-128-GCM")]
    Aes128Gcm,
    #[strum(serialize = "AES-256-GCM")]
    Aes256Gcm,
    #[strum(serialize = "AES-128-CBC")]
    Aes128Cbc,
    #[strum(serialize = "AES-256-CBC")]
    Aes256Cbc,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum_macros::Display, Default,
)]
pub enum Digest {
    #[default]
    #[strum(serialize = "SHA1")]
    Sha1,
    #[strum(serialize = "SHA256")]
    Sha256,
    #[strum(serialize = "SHA512")]
    Sha512,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum_macros::Display, Default,
)]
pub enum Compression {
    #[default]
    #[strum(serialize = "disabled")]
    Disabled,
    #[strum(serialize = "lzo")]
    Lzo,
    #[strum(serialize = "lz4")]
    Lz4,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoutingPolicy {
    IPv4,
    IPv6,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxySettings {
    pub address: String,
    pub port: u16,
    pub bypass_domains: Vec<String>,
}

/// Stored OpenVPN configuration, either inlined in a host profile or
/// carried by a provider preset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct OpenVpnConfig {
    pub remotes: Vec<Endpoint>,
    pub cipher: Option<Cipher>,
    pub auth: Option<Digest>,
    pub compression: Option<Compression>,
    pub tls_security_level: Option<u8>,
    pub routing_policies: Vec<RoutingPolicy>,
    pub requires_credentials: bool,
    pub dns_servers: Vec<String>,
    pub proxy: Option<ProxySettings>,
    pub mtu: Option<u16>,
}

impl OpenVpnConfig {
    /// Owned, independent editing copy of this configuration.
    pub fn builder(&self) -> OpenVpnBuilder {
        OpenVpnBuilder {
            remotes: self.remotes.clone(),
            cipher: self.cipher,
            auth: self.auth,
            compression: self.compression,
            tls_security_level: self.tls_security_level,
            routing_policies: self.routing_policies.clone(),
            requires_credentials: self.requires_credentials,
            dns_servers: self.dns_servers.clone(),
            proxy: self.proxy.clone(),
            mtu: self.mtu,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct OpenVpnBuilder {
    pub remotes: Vec<Endpoint>,
    pub cipher: Option<Cipher>,
    pub auth: Option<Digest>,
    pub compression: Option<Compression>,
    pub tls_security_level: Option<u8>,
    pub routing_policies: Vec<RoutingPolicy>,
    pub requires_credentials: bool,
    pub dns_servers: Vec<String>,
    pub proxy: Option<ProxySettings>,
    pub mtu: Option<u16>,
}

impl OpenVpnBuilder {
    /// Fills unset optional fields with the documented defaults: AES-128-GCM,
    /// SHA1, compression disabled, TLS security level 0 (widest certificate
    /// tolerance).
    pub fn with_fallbacks(mut self) -> Self {
        self.cipher.get_or_insert(Cipher::Aes128Gcm);
        self.auth.get_or_insert(Digest::Sha1);
        self.compression.get_or_insert(Compression::Disabled);
        self.tls_security_level.get_or_insert(0);
        self
    }

    pub fn build(self) -> OpenVpnConfig {
        OpenVpnConfig {
            remotes: self.remotes,
            cipher: self.cipher,
            auth: self.auth,
            compression: self.compression,
            tls_security_level: self.tls_security_level,
            routing_policies: self.routing_policies,
            requires_credentials: self.requires_credentials,
            dns_servers: self.dns_servers,
            proxy: self.proxy,
            mtu: self.mtu,
        }
    }
}
