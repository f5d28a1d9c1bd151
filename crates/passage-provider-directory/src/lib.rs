// Copyright 2025 - Passage Contributors
// SPDX-License-Identifier: GPL-3.0-only

//! Read-only index of provider servers, locations and presets.
//!
//! The catalog is immutable once built and replaced wholesale on refresh;
//! profiles hold ids into it and the resolver treats missing references as
//! errors, never as silent fallbacks.

mod catalog;
mod entries;
mod error;
mod fetcher;

pub use crate::{
    catalog::ProviderCatalog,
    entries::{
        location::Location,
        preset::Preset,
        provider::ProviderMetadata,
        server::Server,
    },
    error::{Error, Result},
    fetcher::{refresh, CatalogFetcher, FetchPriority},
};
