// Copyright 2025 - Passage Contributors
// SPDX-License-Identifier: GPL-3.0-only

// The account controller is responsible for
// 1. reloading purchase receipts into the entitlement store
// 2. enforcing the free-tier host profile cap at creation time
// 3. reviewing profiles after entitlement changes and revoking what the
//    user is no longer eligible for

mod controller;
mod error;

pub use controller::{
    AccountCommand, AccountController, AccountEvent, PurchaseBackend, ReviewSummary, TunnelControl,
};
pub use error::Error;
