// Copyright 2025 - Passage Contributors
// SPDX-License-Identifier: GPL-3.0-only

use tokio::sync::mpsc::error::SendError;

use crate::controller::AccountCommand;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("free tier allows at most {limit} host profiles")]
    TooManyHostProfiles { limit: usize },

    #[error(transparent)]
    ProfileStore(#[from] passage_profiles::ProfileStoreError),

    #[error(transparent)]
    Entitlement(#[from] passage_entitlements::EntitlementError),

    #[error(transparent)]
    Purchase(#[from] passage_entitlements::PurchaseError),

    #[error("failed to send account controller command")]
    AccountCommandSend {
        #[from]
        source: SendError<AccountCommand>,
    },
}
