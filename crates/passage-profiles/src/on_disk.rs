// Copyright 2025 - Passage Contributors
// SPDX-License-Identifier: GPL-3.0-only

use std::{fs::File, path::PathBuf};

use uuid::Uuid;

use crate::{profile::Profile, storage::ProfileStorage};

#[derive(Debug, thiserror::Error)]
pub enum OnDiskProfileStorageError {
    #[error("failed to create profiles directory")]
    DirectoryCreateError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to list profiles directory")]
    DirectoryListError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to open profile file")]
    FileOpenError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to read profile from file")]
    ReadError(serde_json::Error),

    #[error("failed to write profile to file")]
    WriteError(serde_json::Error),

    #[error("failed to remove profile file")]
    FileRemoveError {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// One JSON file per profile id under a directory.
pub struct OnDiskProfileStorage {
    directory: PathBuf,
}

impl OnDiskProfileStorage {
    pub fn new(directory: PathBuf) -> Self {
        Self { directory }
    }

    fn path_for(&self, id: Uuid) -> PathBuf {
        self.directory.join(format!("{id}.json"))
    }

    fn ensure_directory(&self) -> Result<(), OnDiskProfileStorageError> {
        std::fs::create_dir_all(&self.directory).map_err(|err| {
            OnDiskProfileStorageError::DirectoryCreateError {
                path: self.directory.clone(),
                source: err,
            }
        })
    }
}

impl ProfileStorage for OnDiskProfileStorage {
    type StorageError = OnDiskProfileStorageError;

    async fn load_profiles(&self) -> Result<Vec<Profile>, OnDiskProfileStorageError> {
        if !self.directory.exists() {
            return Ok(vec![]);
        }
        let entries = std::fs::read_dir(&self.directory).map_err(|err| {
            OnDiskProfileStorageError::DirectoryListError {
                path: self.directory.clone(),
                source: err,
            }
        })?;

        let mut profiles = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            if !path.extension().map_or(false, |ext| ext == "json") {
                continue;
            }
            let file =
                File::open(&path).map_err(|err| OnDiskProfileStorageError::FileOpenError {
                    path: path.clone(),
                    source: err,
                })?;
            let profile: Profile =
                serde_json::from_reader(file).map_err(OnDiskProfileStorageError::ReadError)?;
            profiles.push(profile);
        }
        Ok(profiles)
    }

    async fn store_profile(&self, profile: &Profile) -> Result<(), OnDiskProfileStorageError> {
        self.ensure_directory()?;
        let path = self.path_for(profile.id);
        let file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)
            .map_err(|err| OnDiskProfileStorageError::FileOpenError {
                path: path.clone(),
                source: err,
            })?;
        serde_json::to_writer(file, profile).map_err(OnDiskProfileStorageError::WriteError)
    }

    async fn remove_profile(&self, id: Uuid) -> Result<(), OnDiskProfileStorageError> {
        let path = self.path_for(id);
        std::fs::remove_file(&path)
            .map_err(|err| OnDiskProfileStorageError::FileRemoveError { path, source: err })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{HostSettings, ProfileKind};

    fn host_profile(name: &str) -> Profile {
        Profile::new(name, ProfileKind::Host(HostSettings::default()))
    }

    #[tokio::test]
    async fn store_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = OnDiskProfileStorage::new(dir.path().join("profiles"));
        let profile = host_profile("office");

        storage.store_profile(&profile).await.unwrap();
        let loaded = storage.load_profiles().await.unwrap();
        assert_eq!(loaded, vec![profile]);
    }

    #[tokio::test]
    async fn load_from_missing_directory_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let storage = OnDiskProfileStorage::new(dir.path().join("nowhere"));
        assert!(storage.load_profiles().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn remove_missing_profile_fails() {
        let dir = tempfile::tempdir().unwrap();
        let storage = OnDiskProfileStorage::new(dir.path().to_path_buf());
        let result = storage.remove_profile(Uuid::new_v4()).await;
        assert!(matches!(
            result,
            Err(OnDiskProfileStorageError::FileRemoveError { .. })
        ));
    }

    #[tokio::test]
    async fn store_overwrites_existing_profile() {
        let dir = tempfile::tempdir().unwrap();
        let storage = OnDiskProfileStorage::new(dir.path().to_path_buf());
        let mut profile = host_profile("office");
        storage.store_profile(&profile).await.unwrap();

        profile.header.name = "office 2".to_owned();
        storage.store_profile(&profile).await.unwrap();

        let loaded = storage.load_profiles().await.unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].header.name, "office 2");
    }
}
