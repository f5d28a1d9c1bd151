// Copyright 2025 - Passage Contributors
// SPDX-License-Identifier: GPL-3.0-only

use std::ops::{Deref, DerefMut};

/// Staging copy for edit screens: mutate an owned draft, then either commit
/// it back onto the live value or discard it. The live value never changes
/// until [`StagedEdit::commit`].
#[derive(Debug, Clone)]
pub struct StagedEdit<T>
where
    T: Clone + PartialEq,
{
    original: T,
    draft: T,
}

impl<T> StagedEdit<T>
where
    T: Clone + PartialEq,
{
    pub fn begin(value: &T) -> Self {
        StagedEdit {
            original: value.clone(),
            draft: value.clone(),
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.draft != self.original
    }

    pub fn commit(self, target: &mut T) {
        *target = self.draft;
    }

    pub fn discard(self) {}
}

impl<T> Deref for StagedEdit<T>
where
    T: Clone + PartialEq,
{
    type Target = T;

    fn deref(&self) -> &T {
        &self.draft
    }
}

impl<T> DerefMut for StagedEdit<T>
where
    T: Clone + PartialEq,
{
    fn deref_mut(&mut self) -> &mut T {
        &mut self.draft
    }
}
