// Copyright 2025 - Passage Contributors
// SPDX-License-Identifier: GPL-3.0-only

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to fetch remote catalog for {provider}")]
    RemoteFetchFailed {
        provider: String,
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },

    #[error("failed to load bundled catalog for {provider}")]
    BundledLoadFailed {
        provider: String,
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },
}

// Result type based on our error type
pub type Result<T> = std::result::Result<T, Error>;
