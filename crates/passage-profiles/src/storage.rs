// Copyright 2025 - Passage Contributors
// SPDX-License-Identifier: GPL-3.0-only

use uuid::Uuid;

use crate::profile::Profile;

/// Durable profile persistence, keyed by profile id. The storage format is
/// the implementation's concern.
pub trait ProfileStorage {
    type StorageError: std::error::Error + Send + Sync + 'static;

    #[allow(async_fn_in_trait)]
    async fn load_profiles(&self) -> Result<Vec<Profile>, Self::StorageError>;

    #[allow(async_fn_in_trait)]
    async fn store_profile(&self, profile: &Profile) -> Result<(), Self::StorageError>;

    #[allow(async_fn_in_trait)]
    async fn remove_profile(&self, id: Uuid) -> Result<(), Self::StorageError>;
}
