// Copyright 2025 - Passage Contributors
// SPDX-License-Identifier: GPL-3.0-only

use std::collections::HashMap;

use tokio::sync::broadcast;
use uuid::Uuid;

use crate::{profile::Profile, storage::ProfileStorage};

const EVENT_CHANNEL_CAPACITY: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileEvent {
    Created(Uuid),
    Updated(Uuid),
    Removed(Uuid),
}

#[derive(Debug, thiserror::Error)]
pub enum ProfileStoreError {
    #[error("failed to load profiles")]
    FailedToLoadProfiles {
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },

    #[error("failed to store profile {id}")]
    FailedToStoreProfile {
        id: Uuid,
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },

    #[error("failed to remove profile {id}")]
    FailedToRemoveProfile {
        id: Uuid,
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },

    #[error("no profile with id {0}")]
    ProfileNotFound(Uuid),
}

/// In-memory index over a [`ProfileStorage`], with change events on a
/// broadcast channel. Observers subscribe explicitly and unsubscribe by
/// dropping the receiver.
pub struct ProfileManager<S>
where
    S: ProfileStorage,
{
    storage: S,
    profiles: HashMap<Uuid, Profile>,
    events: broadcast::Sender<ProfileEvent>,
}

impl<S> ProfileManager<S>
where
    S: ProfileStorage,
{
    pub fn new(storage: S) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        ProfileManager {
            storage,
            profiles: HashMap::new(),
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ProfileEvent> {
        self.events.subscribe()
    }

    pub async fn load_all(&mut self) -> Result<(), ProfileStoreError> {
        let profiles = self.storage.load_profiles().await.map_err(|err| {
            ProfileStoreError::FailedToLoadProfiles {
                source: Box::new(err),
            }
        })?;
        tracing::info!("Loaded {} profiles", profiles.len());
        self.profiles = profiles.into_iter().map(|p| (p.id, p)).collect();
        Ok(())
    }

    pub fn profile(&self, id: Uuid) -> Option<&Profile> {
        self.profiles.get(&id)
    }

    /// All profiles in the deterministic order: creation time ascending,
    /// ties broken by id.
    pub fn all_profiles(&self) -> Vec<&Profile> {
        let mut profiles: Vec<&Profile> = self.profiles.values().collect();
        profiles.sort_by_key(|p| (p.created_at, p.id));
        profiles
    }

    pub fn host_profile_count(&self) -> usize {
        self.profiles.values().filter(|p| p.is_host()).count()
    }

    /// Persists a profile, assigning an identity to placeholders. Returns
    /// the id the profile was stored under.
    pub async fn save_profile(&mut self, mut profile: Profile) -> Result<Uuid, ProfileStoreError> {
        let is_new = if profile.is_placeholder() {
            profile.id = Uuid::new_v4();
            true
        } else {
            !self.profiles.contains_key(&profile.id)
        };
        let id = profile.id;

        self.storage.store_profile(&profile).await.map_err(|err| {
            ProfileStoreError::FailedToStoreProfile {
                id,
                source: Box::new(err),
            }
        })?;
        self.profiles.insert(id, profile);

        let event = if is_new {
            tracing::debug!("Created profile {id}");
            ProfileEvent::Created(id)
        } else {
            tracing::debug!("Updated profile {id}");
            ProfileEvent::Updated(id)
        };
        let _ = self.events.send(event);
        Ok(id)
    }

    pub async fn remove_profile(&mut self, id: Uuid) -> Result<(), ProfileStoreError> {
        if !self.profiles.contains_key(&id) {
            return Err(ProfileStoreError::ProfileNotFound(id));
        }
        self.storage.remove_profile(id).await.map_err(|err| {
            ProfileStoreError::FailedToRemoveProfile {
                id,
                source: Box::new(err),
            }
        })?;
        self.profiles.remove(&id);
        tracing::debug!("Removed profile {id}");
        let _ = self.events.send(ProfileEvent::Removed(id));
        Ok(())
    }

    pub async fn duplicate_profile(&mut self, id: Uuid) -> Result<Profile, ProfileStoreError> {
        let copy = self
            .profiles
            .get(&id)
            .ok_or(ProfileStoreError::ProfileNotFound(id))?
            .duplicate();
        self.save_profile(copy.clone()).await?;
        Ok(copy)
    }
}
