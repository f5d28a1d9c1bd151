// Copyright 2025 - Passage Contributors
// SPDX-License-Identifier: GPL-3.0-only

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use passage_common::{Endpoint, VpnProtocol};
use passage_tunnel_config::{OpenVpnConfig, ProxySettings, WireGuardConfig};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileHeader {
    pub name: String,
    pub provider_name: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AuthMethod {
    #[default]
    Credentials,
    Interactive,
    Totp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Account {
    pub username: String,
    pub password: String,
    pub auth_method: AuthMethod,
}

/// Inline configurations of a host-backed profile. A host profile may
/// legitimately carry settings for only one protocol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct HostSettings {
    pub openvpn: Option<OpenVpnConfig>,
    pub wireguard: Option<WireGuardConfig>,
}

/// Remote selection for a provider profile: either the preset's own remotes
/// or one endpoint the user pinned. The two are mutually exclusive by
/// construction; switching to one discards the other.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EndpointChoice {
    #[default]
    Automatic,
    Manual(Endpoint),
}

impl EndpointChoice {
    pub fn is_automatic(&self) -> bool {
        matches!(self, EndpointChoice::Automatic)
    }

    pub fn custom_endpoint(&self) -> Option<&Endpoint> {
        match self {
            EndpointChoice::Automatic => None,
            EndpointChoice::Manual(endpoint) => Some(endpoint),
        }
    }

    pub fn set_automatic(&mut self) {
        *self = EndpointChoice::Automatic;
    }

    pub fn set_custom_endpoint(&mut self, endpoint: Endpoint) {
        *self = EndpointChoice::Manual(endpoint);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderProtocolSettings {
    pub server_id: String,
    pub preset_id: String,
    #[serde(default)]
    pub endpoint: EndpointChoice,
    #[serde(default)]
    pub randomizes_server: bool,
    #[serde(default)]
    pub favorite_location_ids: HashSet<String>,
}

impl ProviderProtocolSettings {
    pub fn new(server_id: impl Into<String>, preset_id: impl Into<String>) -> Self {
        ProviderProtocolSettings {
            server_id: server_id.into(),
            preset_id: preset_id.into(),
            endpoint: EndpointChoice::Automatic,
            randomizes_server: false,
            favorite_location_ids: HashSet::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderSettings {
    pub name: String,
    pub vpn: HashMap<VpnProtocol, ProviderProtocolSettings>,
}

impl ProviderSettings {
    pub fn new(name: impl Into<String>) -> Self {
        ProviderSettings {
            name: name.into(),
            vpn: HashMap::new(),
        }
    }

    pub fn settings(&self, protocol: VpnProtocol) -> Option<&ProviderProtocolSettings> {
        self.vpn.get(&protocol)
    }

    pub fn settings_mut(&mut self, protocol: VpnProtocol) -> Option<&mut ProviderProtocolSettings> {
        self.vpn.get_mut(&protocol)
    }
}

/// A profile is host-backed or provider-backed, never both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileKind {
    Host(HostSettings),
    Provider(ProviderSettings),
}

/// Per-field network override: each setting is independently automatic
/// (pulled from the tunnel) or manually pinned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Choice<T> {
    Automatic,
    Manual(T),
}

impl<T> Default for Choice<T> {
    fn default() -> Self {
        Choice::Automatic
    }
}

impl<T> Choice<T> {
    pub fn is_automatic(&self) -> bool {
        matches!(self, Choice::Automatic)
    }

    pub fn manual(&self) -> Option<&T> {
        match self {
            Choice::Automatic => None,
            Choice::Manual(value) => Some(value),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewaySettings {
    pub is_default_ipv4: bool,
    pub is_default_ipv6: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct DnsSettings {
    pub servers: Vec<String>,
    pub search_domains: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct NetworkSettings {
    pub gateway: Choice<GatewaySettings>,
    pub dns: Choice<DnsSettings>,
    pub proxy: Choice<ProxySettings>,
    pub mtu: Choice<u16>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OnDemandPolicy {
    /// VPN desired on every network; the trust set is not consulted.
    #[default]
    Any,
    /// VPN desired only on networks in the active trust set.
    Including,
    /// VPN desired on all networks except the active trust set.
    Excluding,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct OnDemandSettings {
    pub enabled: bool,
    pub policy: OnDemandPolicy,
    /// SSID to trust flag. A `false` value is "known but not trusted",
    /// which is not the same as an absent key.
    pub trusted_wifis: HashMap<String, bool>,
    pub trusts_cellular: bool,
    pub trusts_ethernet: bool,
}

impl OnDemandSettings {
    /// Drops every trust customization while keeping the settings object,
    /// for entitlement revocation.
    pub fn reset_trust(&mut self) {
        self.trusted_wifis.clear();
        self.trusts_cellular = false;
        self.trusts_ethernet = false;
    }

    pub fn has_trust_customizations(&self) -> bool {
        !self.trusted_wifis.is_empty() || self.trusts_cellular || self.trusts_ethernet
    }
}

/// A user-level connection definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    pub header: ProfileHeader,
    pub account: Option<Account>,
    pub kind: ProfileKind,
    #[serde(default)]
    pub networks: NetworkSettings,
    #[serde(default)]
    pub on_demand: OnDemandSettings,
    pub created_at: DateTime<Utc>,
}

impl Profile {
    pub fn new(name: impl Into<String>, kind: ProfileKind) -> Self {
        let provider_name = match &kind {
            ProfileKind::Host(_) => None,
            ProfileKind::Provider(settings) => Some(settings.name.clone()),
        };
        Profile {
            id: Uuid::new_v4(),
            header: ProfileHeader {
                name: name.into(),
                provider_name,
            },
            account: None,
            kind,
            networks: NetworkSettings::default(),
            on_demand: OnDemandSettings::default(),
            created_at: Utc::now(),
        }
    }

    /// Wizard staging profile: carries no identity until committed through
    /// the manager, which assigns a fresh id.
    pub fn placeholder(kind: ProfileKind) -> Self {
        let mut profile = Profile::new(String::new(), kind);
        profile.id = Uuid::nil();
        profile
    }

    pub fn is_placeholder(&self) -> bool {
        self.id.is_nil()
    }

    pub fn is_provider(&self) -> bool {
        matches!(self.kind, ProfileKind::Provider(_))
    }

    pub fn is_host(&self) -> bool {
        matches!(self.kind, ProfileKind::Host(_))
    }

    pub fn host(&self) -> Option<&HostSettings> {
        match &self.kind {
            ProfileKind::Host(settings) => Some(settings),
            ProfileKind::Provider(_) => None,
        }
    }

    pub fn host_mut(&mut self) -> Option<&mut HostSettings> {
        match &mut self.kind {
            ProfileKind::Host(settings) => Some(settings),
            ProfileKind::Provider(_) => None,
        }
    }

    pub fn provider(&self) -> Option<&ProviderSettings> {
        match &self.kind {
            ProfileKind::Provider(settings) => Some(settings),
            ProfileKind::Host(_) => None,
        }
    }

    pub fn provider_mut(&mut self) -> Option<&mut ProviderSettings> {
        match &mut self.kind {
            ProfileKind::Provider(settings) => Some(settings),
            ProfileKind::Host(_) => None,
        }
    }

    /// Copy with a new identity, for the duplicate action.
    pub fn duplicate(&self) -> Self {
        let mut copy = self.clone();
        copy.id = Uuid::new_v4();
        copy.created_at = Utc::now();
        copy.header.name = format!("{} (copy)", self.header.name);
        copy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use passage_common::SocketType;

    #[test]
    fn set_automatic_clears_custom_endpoint() {
        let mut choice = EndpointChoice::Manual(Endpoint::new("1.2.3.4", 1194, SocketType::Udp));
        choice.set_automatic();
        assert!(choice.is_automatic());
        assert_eq!(choice.custom_endpoint(), None);
    }

    #[test]
    fn set_custom_endpoint_clears_automatic() {
        let mut choice = EndpointChoice::Automatic;
        choice.set_custom_endpoint(Endpoint::new("1.2.3.4", 443, SocketType::Tcp));
        assert!(!choice.is_automatic());
        assert!(choice.custom_endpoint().is_some());
    }

    #[test]
    fn placeholder_gains_no_identity_until_committed() {
        let profile = Profile::placeholder(ProfileKind::Host(HostSettings::default()));
        assert!(profile.is_placeholder());
    }

    #[test]
    fn duplicate_gets_a_new_identity() {
        let profile = Profile::new("office", ProfileKind::Host(HostSettings::default()));
        let copy = profile.duplicate();
        assert_ne!(copy.id, profile.id);
        assert_eq!(copy.header.name, "office (copy)");
    }

    #[test]
    fn reset_trust_keeps_policy() {
        let mut on_demand = OnDemandSettings {
            enabled: true,
            policy: OnDemandPolicy::Excluding,
            trusted_wifis: HashMap::from([("home".to_owned(), true)]),
            trusts_cellular: true,
            trusts_ethernet: false,
        };
        on_demand.reset_trust();
        assert!(!on_demand.has_trust_customizations());
        assert_eq!(on_demand.policy, OnDemandPolicy::Excluding);
        assert!(on_demand.enabled);
    }
}
