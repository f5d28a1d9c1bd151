// Copyright 2025 - Passage Contributors
// SPDX-License-Identifier: GPL-3.0-only

use std::net::IpAddr;

use serde::{Deserialize, Serialize};

/// One provider server. Belongs to exactly one location and exposes one or
/// more presets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Server {
    pub id: String,
    pub location_id: String,
    pub hostname: Option<String>,
    pub ip_addresses: Vec<IpAddr>,
    pub preset_ids: Vec<String>,
}

impl Server {
    pub fn supports_preset(&self, preset_id: &str) -> bool {
        self.preset_ids.iter().any(|id| id == preset_id)
    }
}
