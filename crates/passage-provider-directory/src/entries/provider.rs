// Copyright 2025 - Passage Contributors
// SPDX-License-Identifier: GPL-3.0-only

use passage_common::VpnProtocol;
use serde::{Deserialize, Serialize};

/// Identity card of a provider, as shipped in its catalog index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderMetadata {
    pub name: String,
    pub full_name: String,
    pub supported_protocols: Vec<VpnProtocol>,
}
