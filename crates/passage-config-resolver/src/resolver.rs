// Copyright 2025 - Passage Contributors
// SPDX-License-Identifier: GPL-3.0-only

use passage_common::{Endpoint, VpnProtocol};
use passage_profiles::{Profile, ProviderProtocolSettings};
use passage_provider_directory::{Preset, ProviderCatalog, Server};
use passage_tunnel_config::{ConfigurationBuilder, OpenVpnBuilder, RoutingPolicy, WireGuardBuilder};

use crate::error::{ResolutionError, Result};

#[derive(Debug, Clone, Copy)]
pub struct ResolveOptions {
    /// When false, the server hostname is left out of the inferred remotes
    /// and only resolved IP addresses are dialed.
    pub resolves_hostname: bool,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        ResolveOptions {
            resolves_hostname: true,
        }
    }
}

/// Computes the effective configuration builder for `profile` under
/// `protocol`. The result is an owned copy: mutating it never touches the
/// profile or the catalog.
///
/// Provider profiles require their referenced server, preset and protocol
/// configuration to be present in `catalog`; a miss is a hard
/// [`ResolutionError`], never a silent fallback to a wrong server. Host
/// profiles may legitimately lack one protocol's settings and resolve to an
/// empty default builder.
pub fn resolve(
    profile: &Profile,
    catalog: Option<&ProviderCatalog>,
    protocol: VpnProtocol,
    options: ResolveOptions,
) -> Result<ConfigurationBuilder> {
    match profile.provider() {
        Some(provider) => {
            let settings = provider
                .settings(protocol)
                .ok_or(ResolutionError::ProtocolUnavailable(protocol))?;
            resolve_provider(settings, catalog, protocol, options)
        }
        None => Ok(resolve_host(profile, protocol)),
    }
}

fn resolve_provider(
    settings: &ProviderProtocolSettings,
    catalog: Option<&ProviderCatalog>,
    protocol: VpnProtocol,
    options: ResolveOptions,
) -> Result<ConfigurationBuilder> {
    // A catalog that is not loaded yet behaves like one missing the server.
    let catalog = catalog.ok_or_else(|| {
        tracing::warn!("Resolving against an unloaded catalog");
        ResolutionError::ServerNotFound(settings.server_id.clone())
    })?;

    let server = if settings.randomizes_server {
        // only servers that carry the stored preset are eligible picks
        catalog
            .random_server_supporting(&settings.preset_id)
            .ok_or_else(|| ResolutionError::PresetNotFound(settings.preset_id.clone()))?
    } else {
        catalog
            .server_with_id(&settings.server_id)
            .ok_or_else(|| ResolutionError::ServerNotFound(settings.server_id.clone()))?
    };

    let preset = catalog
        .preset_with_id(&settings.preset_id)
        .filter(|preset| server.supports_preset(&preset.id))
        .ok_or_else(|| ResolutionError::PresetNotFound(settings.preset_id.clone()))?;

    let mut builder = builder_from_preset(preset, protocol)?;
    *builder.remotes_mut() = infer_remotes(preset, server, options.resolves_hostname, protocol);

    if let ConfigurationBuilder::OpenVpn(ovpn) = &mut builder {
        // providers always get the default gateway
        ovpn.routing_policies = vec![RoutingPolicy::IPv4, RoutingPolicy::IPv6];
    }

    // a pinned endpoint takes the place of the inferred remotes
    if let Some(endpoint) = settings.endpoint.custom_endpoint() {
        *builder.remotes_mut() = vec![endpoint.clone()];
    }
    Ok(builder)
}

fn builder_from_preset(preset: &Preset, protocol: VpnProtocol) -> Result<ConfigurationBuilder> {
    match protocol {
        VpnProtocol::OpenVpn => preset
            .openvpn_configuration()
            .map(|config| ConfigurationBuilder::OpenVpn(config.builder().with_fallbacks()))
            .ok_or(ResolutionError::ProtocolUnavailable(protocol)),
        VpnProtocol::WireGuard => preset
            .wireguard_configuration()
            .map(|config| ConfigurationBuilder::WireGuard(config.builder().with_fallbacks()))
            .ok_or(ResolutionError::ProtocolUnavailable(protocol)),
    }
}

/// Remotes are the preset's port/socket combinations applied to every
/// server address, hostname first when allowed.
fn infer_remotes(
    preset: &Preset,
    server: &Server,
    resolves_hostname: bool,
    protocol: VpnProtocol,
) -> Vec<Endpoint> {
    let templates: Vec<&Endpoint> = match protocol {
        VpnProtocol::OpenVpn => preset
            .openvpn_configuration()
            .map(|c| c.remotes.iter().collect())
            .unwrap_or_default(),
        VpnProtocol::WireGuard => preset
            .wireguard_configuration()
            .map(|c| c.remotes.iter().collect())
            .unwrap_or_default(),
    };

    let mut addresses: Vec<String> = Vec::new();
    if resolves_hostname {
        if let Some(hostname) = &server.hostname {
            addresses.push(hostname.clone());
        }
    }
    addresses.extend(server.ip_addresses.iter().map(|ip| ip.to_string()));

    addresses
        .iter()
        .flat_map(|address| {
            templates
                .iter()
                .map(|template| Endpoint::new(address.clone(), template.port, template.socket))
        })
        .collect()
}

fn resolve_host(profile: &Profile, protocol: VpnProtocol) -> ConfigurationBuilder {
    let host = profile.host();
    match protocol {
        VpnProtocol::OpenVpn => ConfigurationBuilder::OpenVpn(
            host.and_then(|h| h.openvpn.as_ref())
                .map(|config| config.builder())
                .unwrap_or_else(OpenVpnBuilder::default),
        ),
        VpnProtocol::WireGuard => ConfigurationBuilder::WireGuard(
            host.and_then(|h| h.wireguard.as_ref())
                .map(|config| config.builder())
                .unwrap_or_else(WireGuardBuilder::default),
        ),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    Committed,
    /// Provider profiles are read-only at this layer; the commit is a no-op
    /// and the UI is expected to disable editing.
    ReadOnly,
}

/// The only way a built configuration becomes persisted profile state.
pub fn commit(builder: ConfigurationBuilder, profile: &mut Profile) -> CommitOutcome {
    let Some(host) = profile.host_mut() else {
        tracing::warn!("Ignoring commit on a provider profile");
        return CommitOutcome::ReadOnly;
    };
    match builder {
        ConfigurationBuilder::OpenVpn(ovpn) => host.openvpn = Some(ovpn.build()),
        ConfigurationBuilder::WireGuard(wg) => host.wireguard = Some(wg.build()),
    }
    CommitOutcome::Committed
}
