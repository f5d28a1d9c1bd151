// Copyright 2025 - Passage Contributors
// SPDX-License-Identifier: GPL-3.0-only

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum EndpointParseError {
    #[error("endpoint is not formatted as address:port/proto: {0}")]
    MalformedEndpoint(String),

    #[error("invalid port in endpoint: {0}")]
    InvalidPort(String),

    #[error("unknown socket type: {0}")]
    UnknownSocketType(String),
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum SocketType {
    #[strum(serialize = "udp")]
    Udp,
    #[strum(serialize = "tcp")]
    Tcp,
}

/// A remote a tunnel can connect to, rendered as `address:port/proto`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Endpoint {
    pub address: String,
    pub port: u16,
    pub socket: SocketType,
}

impl Endpoint {
    pub fn new(address: impl Into<String>, port: u16, socket: SocketType) -> Self {
        Endpoint {
            address: address.into(),
            port,
            socket,
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}/{}", self.address, self.port, self.socket)
    }
}

impl FromStr for Endpoint {
    type Err = EndpointParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (address_port, proto) = s
            .rsplit_once('/')
            .ok_or_else(|| EndpointParseError::MalformedEndpoint(s.to_owned()))?;
        let (address, port) = address_port
            .rsplit_once(':')
            .ok_or_else(|| EndpointParseError::MalformedEndpoint(s.to_owned()))?;
        if address.is_empty() {
            return Err(EndpointParseError::MalformedEndpoint(s.to_owned()));
        }
        let port = port
            .parse()
            .map_err(|_| EndpointParseError::InvalidPort(port.to_owned()))?;
        let socket = match proto {
            "udp" => SocketType::Udp,
            "tcp" => SocketType::Tcp,
            other => return Err(EndpointParseError::UnknownSocketType(other.to_owned())),
        };
        Ok(Endpoint {
            address: address.to_owned(),
            port,
            socket,
        })
    }
}
