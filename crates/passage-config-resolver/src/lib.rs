// Copyright 2025 - Passage Contributors
// SPDX-License-Identifier: GPL-3.0-only

//! Computes the effective tunnel configuration for a profile.
//!
//! Resolution merges a profile with the provider catalog into an owned
//! [`passage_tunnel_config::ConfigurationBuilder`]; nothing is persisted
//! until [`commit`] writes the builder back into a host profile. Provider
//! profiles are read-only at this layer.

mod error;
mod import;
mod network;
mod resolver;

pub use crate::{
    error::{ResolutionError, Result},
    import::{parse_openvpn, ImportError, ImportResult, ImportWarning},
    network::apply_network_settings,
    resolver::{commit, resolve, CommitOutcome, ResolveOptions},
};
