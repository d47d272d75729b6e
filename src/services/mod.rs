// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod advisor;
pub mod observer;
pub mod tracker;

pub use advisor::{Advisor, OpenAiAdvisor};
pub use observer::{ActivityObserver, NoopObserver};
pub use tracker::{ActivityTracker, SaveResponse};
