// Copyright 2025 - Passage Contributors
// SPDX-License-Identifier: GPL-3.0-only

//! User connection profiles and their durable store.
//!
//! A [`Profile`] is either host-backed (inline configuration imported from a
//! file) or provider-backed (references into the provider catalog); the
//! either/or invariant is structural in [`ProfileKind`]. Persistence goes
//! through the [`ProfileStorage`] trait with on-disk and in-memory
//! implementations.

mod ephemeral;
mod manager;
mod on_disk;
mod profile;
mod staged;
mod storage;

pub use crate::{
    ephemeral::{InMemProfileStorage, InMemProfileStorageError},
    manager::{ProfileEvent, ProfileManager, ProfileStoreError},
    on_disk::{OnDiskProfileStorage, OnDiskProfileStorageError},
    profile::{
        Account, AuthMethod, Choice, DnsSettings, EndpointChoice, GatewaySettings, HostSettings,
        NetworkSettings, OnDemandPolicy, OnDemandSettings, Profile, ProfileHeader, ProfileKind,
        ProviderProtocolSettings, ProviderSettings,
    },
    staged::StagedEdit,
    storage::ProfileStorage,
};
