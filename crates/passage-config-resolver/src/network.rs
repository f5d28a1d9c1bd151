// Copyright 2025 - Passage Contributors
// SPDX-License-Identifier: GPL-3.0-only

use passage_profiles::{Choice, NetworkSettings};
use passage_tunnel_config::{ConfigurationBuilder, RoutingPolicy};

/// Overlays the profile's network settings onto a resolved builder. Only
/// manually pinned choices override; automatic ones leave the builder as the
/// tunnel pulled it.
pub fn apply_network_settings(builder: &mut ConfigurationBuilder, settings: &NetworkSettings) {
    match builder {
        ConfigurationBuilder::OpenVpn(ovpn) => {
            if let Choice::Manual(gateway) = &settings.gateway {
                let mut policies = Vec::new();
                if gateway.is_default_ipv4 {
                    policies.push(RoutingPolicy::IPv4);
                }
                if gateway.is_default_ipv6 {
                    policies.push(RoutingPolicy::IPv6);
                }
                ovpn.routing_policies = policies;
            }
            if let Choice::Manual(dns) = &settings.dns {
                ovpn.dns_servers = dns.servers.clone();
            }
            if let Choice::Manual(proxy) = &settings.proxy {
                ovpn.proxy = Some(proxy.clone());
            }
            if let Choice::Manual(mtu) = &settings.mtu {
                ovpn.mtu = Some(*mtu);
            }
        }
        ConfigurationBuilder::WireGuard(wg) => {
            if let Choice::Manual(dns) = &settings.dns {
                wg.dns_servers = dns.servers.clone();
            }
            if let Choice::Manual(mtu) = &settings.mtu {
                wg.mtu = Some(*mtu);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use passage_profiles::{DnsSettings, GatewaySettings};
    use passage_tunnel_config::{OpenVpnBuilder, WireGuardBuilder};

    #[test]
    fn automatic_choices_leave_builder_untouched() {
        let mut builder = ConfigurationBuilder::OpenVpn(OpenVpnBuilder {
            dns_servers: vec!["10.0.0.53".to_owned()],
            mtu: Some(1400),
            ..Default::default()
        });
        apply_network_settings(&mut builder, &NetworkSettings::default());

        let ConfigurationBuilder::OpenVpn(ovpn) = builder else {
            unreachable!()
        };
        assert_eq!(ovpn.dns_servers, ["10.0.0.53"]);
        assert_eq!(ovpn.mtu, Some(1400));
    }

    #[test]
    fn manual_choices_override() {
        let mut builder = ConfigurationBuilder::OpenVpn(OpenVpnBuilder::default());
        let settings = NetworkSettings {
            gateway: Choice::Manual(GatewaySettings {
                is_default_ipv4: true,
                is_default_ipv6: false,
            }),
            dns: Choice::Manual(DnsSettings {
                servers: vec!["9.9.9.9".to_owned()],
                search_domains: vec![],
            }),
            proxy: Choice::Automatic,
            mtu: Choice::Manual(1280),
        };
        apply_network_settings(&mut builder, &settings);

        let ConfigurationBuilder::OpenVpn(ovpn) = builder else {
            unreachable!()
        };
        assert_eq!(ovpn.routing_policies, [RoutingPolicy::IPv4]);
        assert_eq!(ovpn.dns_servers, ["9.9.9.9"]);
        assert_eq!(ovpn.mtu, Some(1280));
    }

    #[test]
    fn wireguard_only_takes_dns_and_mtu() {
        let mut builder = ConfigurationBuilder::WireGuard(WireGuardBuilder::default());
        let settings = NetworkSettings {
            dns: Choice::Manual(DnsSettings {
                servers: vec!["1.1.1.1".to_owned()],
                search_domains: vec![],
            }),
            mtu: Choice::Manual(1380),
            ..Default::default()
        };
        apply_network_settings(&mut builder, &settings);

        let ConfigurationBuilder::WireGuard(wg) = builder else {
            unreachable!()
        };
        assert_eq!(wg.dns_servers, ["1.1.1.1"]);
        assert_eq!(wg.mtu, Some(1380));
    }
}
