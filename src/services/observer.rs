// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Callbacks fired after tracker operations complete.

use crate::models::{ActivityKind, User};
use crate::repository::SaveReceipt;

/// Receives tracker events. Every method defaults to doing nothing.
pub trait ActivityObserver: Send + Sync {
    fn entry_saved(&self, _user_id: &str, _receipt: &SaveReceipt) {}

    fn profile_saved(&self, _user: &User) {}

    fn advice_ready(&self, _user_id: &str, _topic: ActivityKind, _advice: &str) {}
}

pub struct NoopObserver;

impl ActivityObserver for NoopObserver {}
