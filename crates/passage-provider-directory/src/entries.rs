// Copyright 2025 - Passage Contributors
// SPDX-License-Identifier: GPL-3.0-only

pub(crate) mod location;
pub(crate) mod preset;
pub(crate) mod provider;
pub(crate) mod server;
