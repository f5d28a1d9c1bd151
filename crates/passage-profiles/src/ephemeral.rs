// Copyright 2025 - Passage Contributors
// SPDX-License-Identifier: GPL-3.0-only

use std::collections::HashMap;

use tokio::sync::Mutex;
use uuid::Uuid;

use crate::{profile::Profile, storage::ProfileStorage};

#[derive(Debug, thiserror::Error)]
pub enum InMemProfileStorageError {
    #[error("no profile stored with id {0}")]
    NoSuchProfile(Uuid),
}

/// Non-durable storage for tests and wizard flows.
#[derive(Default)]
pub struct InMemProfileStorage {
    profiles: Mutex<HashMap<Uuid, Profile>>,
}

impl ProfileStorage for InMemProfileStorage {
    type StorageError = InMemProfileStorageError;

    async fn load_profiles(&self) -> Result<Vec<Profile>, InMemProfileStorageError> {
        Ok(self.profiles.lock().await.values().cloned().collect())
    }

    async fn store_profile(&self, profile: &Profile) -> Result<(), InMemProfileStorageError> {
        self.profiles
            .lock()
            .await
            .insert(profile.id, profile.clone());
        Ok(())
    }

    async fn remove_profile(&self, id: Uuid) -> Result<(), InMemProfileStorageError> {
        self.profiles
            .lock()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(InMemProfileStorageError::NoSuchProfile(id))
    }
}
