// Copyright 2025 - Passage Contributors
// SPDX-License-Identifier: GPL-3.0-only

mod endpoint;
mod protocol;

pub use crate::{
    endpoint::{Endpoint, EndpointParseError, SocketType},
    protocol::VpnProtocol,
};
