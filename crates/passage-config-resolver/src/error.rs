// Copyright 2025 - Passage Contributors
// SPDX-License-Identifier: GPL-3.0-only

use passage_common::VpnProtocol;

/// A profile referenced catalog data that is missing: stale reference or
/// corrupt store. Not retryable; surfaced to the caller, never a panic.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ResolutionError {
    #[error("profile references a server missing from the catalog: {0}")]
    ServerNotFound(String),

    #[error("profile references a preset missing from the catalog: {0}")]
    PresetNotFound(String),

    #[error("preset carries no configuration for {0}")]
    ProtocolUnavailable(VpnProtocol),
}

// Result type based on our error type
pub type Result<T> = std::result::Result<T, ResolutionError>;
