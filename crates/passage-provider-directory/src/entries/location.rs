// Copyright 2025 - Passage Contributors
// SPDX-License-Identifier: GPL-3.0-only

use serde::{Deserialize, Serialize};

/// Geographic grouping of one or more servers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub id: String,
    pub country_code: String,
    pub city: Option<String>,
}
