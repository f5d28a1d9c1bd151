// Copyright 2025 - Passage Contributors
// SPDX-License-Identifier: GPL-3.0-only

use chrono::{DateTime, Utc};
use itertools::Itertools;
use rand::seq::IteratorRandom;
use serde::{Deserialize, Serialize};

use crate::entries::{location::Location, preset::Preset, provider::ProviderMetadata, server::Server};

/// Snapshot of one provider's servers, locations and presets. Immutable once
/// built; a refresh produces a whole new catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderCatalog {
    provider: ProviderMetadata,
    locations: Vec<Location>,
    servers: Vec<Server>,
    presets: Vec<Preset>,
    last_updated: Option<DateTime<Utc>>,
}

impl ProviderCatalog {
    pub fn new(
        provider: ProviderMetadata,
        locations: Vec<Location>,
        servers: Vec<Server>,
        presets: Vec<Preset>,
    ) -> Self {
        ProviderCatalog {
            provider,
            locations,
            servers,
            presets,
            last_updated: Some(Utc::now()),
        }
    }

    pub fn provider(&self) -> &ProviderMetadata {
        &self.provider
    }

    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.last_updated
    }

    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    pub fn all_country_codes(&self) -> Vec<String> {
        self.locations
            .iter()
            .map(|location| location.country_code.clone())
            .unique()
            .collect()
    }

    pub fn server_with_id(&self, server_id: &str) -> Option<&Server> {
        self.servers.iter().find(|server| server.id == server_id)
    }

    pub fn preset_with_id(&self, preset_id: &str) -> Option<&Preset> {
        self.presets.iter().find(|preset| preset.id == preset_id)
    }

    pub fn servers_located_at<'a>(
        &'a self,
        location_id: &'a str,
    ) -> impl Iterator<Item = &'a Server> {
        self.servers
            .iter()
            .filter(move |server| server.location_id == location_id)
    }

    pub fn random_server(&self) -> Option<&Server> {
        self.servers.iter().choose(&mut rand::thread_rng())
    }

    pub fn random_server_located_at(&self, location_id: &str) -> Option<&Server> {
        self.servers
            .iter()
            .filter(|server| server.location_id == location_id)
            .choose(&mut rand::thread_rng())
    }

    /// Random pick restricted to servers that carry `preset_id`, so a
    /// randomized profile never draws a server its preset cannot run on.
    pub fn random_server_supporting(&self, preset_id: &str) -> Option<&Server> {
        self.servers
            .iter()
            .filter(|server| server.supports_preset(preset_id))
            .choose(&mut rand::thread_rng())
    }
}
