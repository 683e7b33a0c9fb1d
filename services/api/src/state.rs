//! Shared Application State
//!
//! This module defines the `AppState` struct, which holds all shared,
//! clonable resources created once at startup.

use reading_coach_core::ReadingCoach;
use std::sync::Arc;

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub coach: Arc<ReadingCoach>,
}
