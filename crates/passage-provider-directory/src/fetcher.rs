// Copyright 2025 - Passage Contributors
// SPDX-License-Identifier: GPL-3.0-only

use crate::{catalog::ProviderCatalog, error::Result};

/// Where to look for catalog data first. The priority belongs to the caller,
/// not to this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchPriority {
    #[default]
    RemoteThenBundled,
    BundledThenRemote,
    RemoteOnly,
    BundledOnly,
}

/// Supplies catalog snapshots from a remote index or a bundled fallback.
/// Transport and format are the implementation's concern.
pub trait CatalogFetcher {
    #[allow(async_fn_in_trait)]
    async fn fetch_remote(&self) -> Result<ProviderCatalog>;

    #[allow(async_fn_in_trait)]
    async fn load_bundled(&self) -> Result<ProviderCatalog>;
}

/// Obtains a fresh catalog according to `priority`. The result replaces any
/// previous catalog wholesale; failures surface to the caller, which decides
/// whether to retry.
pub async fn refresh<F>(fetcher: &F, priority: FetchPriority) -> Result<ProviderCatalog>
where
    F: CatalogFetcher,
{
    match priority {
        FetchPriority::RemoteOnly => fetcher.fetch_remote().await,
        FetchPriority::BundledOnly => fetcher.load_bundled().await,
        FetchPriority::RemoteThenBundled => match fetcher.fetch_remote().await {
            Ok(catalog) => Ok(catalog),
            Err(err) => {
                tracing::warn!("Remote catalog fetch failed, using bundled snapshot: {err}");
                fetcher.load_bundled().await
            }
        },
        FetchPriority::BundledThenRemote => match fetcher.load_bundled().await {
            Ok(catalog) => Ok(catalog),
            Err(err) => {
                tracing::warn!("Bundled catalog missing, fetching remote: {err}");
                fetcher.fetch_remote().await
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{entries::provider::ProviderMetadata, error::Error};

    struct FakeFetcher {
        remote: Option<&'static str>,
        bundled: Option<&'static str>,
    }

    impl FakeFetcher {
        fn catalog(name: &str) -> ProviderCatalog {
            ProviderCatalog::new(
                ProviderMetadata {
                    name: name.to_owned(),
                    full_name: name.to_owned(),
                    supported_protocols: vec![],
                },
                vec![],
                vec![],
                vec![],
            )
        }
    }

    impl CatalogFetcher for FakeFetcher {
        async fn fetch_remote(&self) -> Result<ProviderCatalog> {
            self.remote
                .map(Self::catalog)
                .ok_or_else(|| Error::RemoteFetchFailed {
                    provider: "fake".to_owned(),
                    source: "offline".into(),
                })
        }

        async fn load_bundled(&self) -> Result<ProviderCatalog> {
            self.bundled
                .map(Self::catalog)
                .ok_or_else(|| Error::BundledLoadFailed {
                    provider: "fake".to_owned(),
                    source: "no snapshot".into(),
                })
        }
    }

    #[tokio::test]
    async fn remote_then_bundled_falls_back() {
        let fetcher = FakeFetcher {
            remote: None,
            bundled: Some("bundled"),
        };
        let catalog = refresh(&fetcher, FetchPriority::RemoteThenBundled)
            .await
            .unwrap();
        assert_eq!(catalog.provider().name, "bundled");
    }

    #[tokio::test]
    async fn remote_only_does_not_fall_back() {
        let fetcher = FakeFetcher {
            remote: None,
            bundled: Some("bundled"),
        };
        let result = refresh(&fetcher, FetchPriority::RemoteOnly).await;
        assert!(matches!(result, Err(Error::RemoteFetchFailed { .. })));
    }

    #[tokio::test]
    async fn bundled_then_remote_prefers_bundled() {
        let fetcher = FakeFetcher {
            remote: Some("remote"),
            bundled: Some("bundled"),
        };
        let catalog = refresh(&fetcher, FetchPriority::BundledThenRemote)
            .await
            .unwrap();
        assert_eq!(catalog.provider().name, "bundled");
    }
}
