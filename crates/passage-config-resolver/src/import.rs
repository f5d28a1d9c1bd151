// Copyright 2025 - Passage Contributors
// SPDX-License-Identifier: GPL-3.0-only

//! Host profile import from OpenVPN configuration text.
//!
//! Classification matters more than parsing depth here: malformed input,
//! missing required options and unsupported options are fatal; merely
//! questionable options produce an [`ImportWarning`] the user may accept;
//! an encrypted key without a passphrase asks for one instead of failing.

use passage_common::{Endpoint, SocketType};
use passage_tunnel_config::{Cipher, Compression, Digest, OpenVpnConfig};

const DEFAULT_PORT: u16 = 1194;

/// Options this import understands and carries into the configuration.
const SUPPORTED_OPTIONS: &[&str] = &[
    "auth",
    "auth-nocache",
    "auth-user-pass",
    "ca",
    "cert",
    "cipher",
    "client",
    "comp-lzo",
    "compress",
    "dev",
    "dhcp-option",
    "explicit-exit-notify",
    "ifconfig",
    "keepalive",
    "key",
    "key-direction",
    "mssfix",
    "mute",
    "nobind",
    "persist-key",
    "persist-tun",
    "ping",
    "ping-restart",
    "port",
    "proto",
    "pull",
    "redirect-gateway",
    "remote",
    "remote-cert-tls",
    "reneg-sec",
    "resolv-retry",
    "route",
    "route-ipv6",
    "tls-auth",
    "tls-client",
    "tls-crypt",
    "topology",
    "tun-mtu",
    "verb",
    "verify-x509-name",
];

/// Options the tunnel cannot honor at all. Importing them is fatal.
const UNSUPPORTED_OPTIONS: &[&str] = &["fragment", "secret", "socks-proxy"];

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ImportError {
    #[error("malformed configuration at line {line}: {reason}")]
    Malformed { line: usize, reason: String },

    #[error("required option missing: {0}")]
    MissingOption(&'static str),

    #[error("unsupported option: {0}")]
    UnsupportedOption(String),

    /// The embedded key is encrypted; callers prompt for a passphrase and
    /// retry rather than treating this as terminal.
    #[error("configuration is encrypted, passphrase required")]
    EncryptionPassphraseRequired,

    #[error("unable to decrypt embedded key")]
    UnableToDecrypt,
}

impl ImportError {
    /// True for the distinguished case that drives a passphrase-prompt
    /// retry loop instead of an error alert.
    pub fn prompts_for_passphrase(&self) -> bool {
        matches!(self, ImportError::EncryptionPassphraseRequired)
    }
}

/// Non-fatal finding: the user may continue the import anyway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportWarning {
    PotentiallyUnsupported(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImportResult {
    pub config: OpenVpnConfig,
    pub warning: Option<ImportWarning>,
}

/// Parses OpenVPN configuration text into a host-profile configuration.
pub fn parse_openvpn(text: &str, passphrase: Option<&str>) -> Result<ImportResult, ImportError> {
    let mut remotes: Vec<(String, Option<u16>, Option<SocketType>)> = Vec::new();
    let mut default_port: Option<u16> = None;
    let mut default_socket: Option<SocketType> = None;
    let mut cipher: Option<Cipher> = None;
    let mut auth: Option<Digest> = None;
    let mut compression: Option<Compression> = None;
    let mut requires_credentials = false;
    let mut mtu: Option<u16> = None;
    let mut warning: Option<ImportWarning> = None;

    let mut lines = text.lines().enumerate();
    while let Some((index, raw)) = lines.next() {
        let line_no = index + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        // inline blocks like <ca>...</ca>
        if let Some(tag) = line.strip_prefix('<').and_then(|l| l.strip_suffix('>')) {
            if tag.starts_with('/') {
                return Err(ImportError::Malformed {
                    line: line_no,
                    reason: format!("unexpected closing tag <{tag}>"),
                });
            }
            let block = read_block(&mut lines, tag).ok_or(ImportError::Malformed {
                line: line_no,
                reason: format!("unterminated block <{tag}>"),
            })?;
            if tag == "key" && block_is_encrypted(&block) {
                match passphrase {
                    None => return Err(ImportError::EncryptionPassphraseRequired),
                    Some(p) if p.is_empty() => return Err(ImportError::UnableToDecrypt),
                    // decryption itself happens in the tunnel layer
                    Some(_) => {}
                }
            }
            continue;
        }

        let mut tokens = line.split_whitespace();
        let option = tokens.next().unwrap_or_default();
        let args: Vec<&str> = tokens.collect();

        if UNSUPPORTED_OPTIONS.contains(&option) {
            return Err(ImportError::UnsupportedOption(option.to_owned()));
        }
        if !SUPPORTED_OPTIONS.contains(&option) {
            tracing::debug!("Potentially unsupported option: {option}");
            warning.get_or_insert(ImportWarning::PotentiallyUnsupported(option.to_owned()));
            continue;
        }

        match option {
            "remote" => {
                let host = args.first().ok_or(ImportError::Malformed {
                    line: line_no,
                    reason: "remote without a host".to_owned(),
                })?;
                let port = args
                    .get(1)
                    .map(|p| parse_port(p, line_no))
                    .transpose()?;
                let socket = args
                    .get(2)
                    .map(|p| parse_socket(p, line_no))
                    .transpose()?;
                remotes.push((host.to_string(), port, socket));
            }
            "port" => {
                default_port = Some(parse_port(
                    args.first().ok_or(ImportError::Malformed {
                        line: line_no,
                        reason: "port without a value".to_owned(),
                    })?,
                    line_no,
                )?);
            }
            "proto" => {
                default_socket = Some(parse_socket(
                    args.first().ok_or(ImportError::Malformed {
                        line: line_no,
                        reason: "proto without a value".to_owned(),
                    })?,
                    line_no,
                )?);
            }
            "cipher" => {
                cipher = match args.first().copied() {
                    Some("AES-128-GCM") => Some(Cipher::Aes128Gcm),
                    Some("AES-256-GCM") => Some(Cipher::Aes256Gcm),
                    Some("AES-128-CBC") => Some(Cipher::Aes128Cbc),
                    Some("AES-256-CBC") => Some(Cipher::Aes256Cbc),
                    Some(other) => {
                        warning.get_or_insert(ImportWarning::PotentiallyUnsupported(format!(
                            "cipher {other}"
                        )));
                        None
                    }
                    None => {
                        return Err(ImportError::Malformed {
                            line: line_no,
                            reason: "cipher without a value".to_owned(),
                        })
                    }
                };
            }
            "auth" => {
                auth = match args.first().copied() {
                    Some("SHA1") => Some(Digest::Sha1),
                    Some("SHA256") => Some(Digest::Sha256),
                    Some("SHA512") => Some(Digest::Sha512),
                    Some(other) => {
                        warning.get_or_insert(ImportWarning::PotentiallyUnsupported(format!(
                            "auth {other}"
                        )));
                        None
                    }
                    None => {
                        return Err(ImportError::Malformed {
                            line: line_no,
                            reason: "auth without a value".to_owned(),
                        })
                    }
                };
            }
            "comp-lzo" => compression = Some(Compression::Lzo),
            "compress" => {
                compression = Some(match args.first().copied() {
                    Some("lzo") => Compression::Lzo,
                    Some("lz4") | Some("lz4-v2") => Compression::Lz4,
                    _ => Compression::Disabled,
                });
            }
            "auth-user-pass" => requires_credentials = true,
            "tun-mtu" => {
                mtu = Some(args.first().and_then(|v| v.parse().ok()).ok_or(
                    ImportError::Malformed {
                        line: line_no,
                        reason: "tun-mtu without a numeric value".to_owned(),
                    },
                )?);
            }
            // recognized, no effect on the resolved configuration
            _ => {}
        }
    }

    if remotes.is_empty() {
        return Err(ImportError::MissingOption("remote"));
    }

    let config = OpenVpnConfig {
        remotes: remotes
            .into_iter()
            .map(|(host, port, socket)| {
                Endpoint::new(
                    host,
                    port.or(default_port).unwrap_or(DEFAULT_PORT),
                    socket.or(default_socket).unwrap_or(SocketType::Udp),
                )
            })
            .collect(),
        cipher,
        auth,
        compression,
        requires_credentials,
        mtu,
        ..Default::default()
    };
    Ok(ImportResult { config, warning })
}

fn read_block<'a>(
    lines: &mut impl Iterator<Item = (usize, &'a str)>,
    tag: &str,
) -> Option<Vec<String>> {
    let closing = format!("</{tag}>");
    let mut block = Vec::new();
    for (_, line) in lines {
        if line.trim() == closing {
            return Some(block);
        }
        block.push(line.to_owned());
    }
    None
}

fn block_is_encrypted(block: &[String]) -> bool {
    block.iter().any(|line| {
        line.contains("Proc-Type: 4,ENCRYPTED") || line.contains("BEGIN ENCRYPTED PRIVATE KEY")
    })
}

fn parse_port(value: &str, line: usize) -> Result<u16, ImportError> {
    value.parse().map_err(|_| ImportError::Malformed {
        line,
        reason: format!("invalid port: {value}"),
    })
}

fn parse_socket(value: &str, line: usize) -> Result<SocketType, ImportError> {
    match value {
        "udp" | "udp4" | "udp6" => Ok(SocketType::Udp),
        "tcp" | "tcp4" | "tcp6" | "tcp-client" => Ok(SocketType::Tcp),
        other => Err(ImportError::Malformed {
            line,
            reason: format!("unknown proto: {other}"),
        }),
    }
}
