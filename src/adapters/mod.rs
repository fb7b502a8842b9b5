//! External system adapters
//!
//! This module contains the registry gateway trait and its backends.

pub mod memory;
pub mod postgresql;
pub mod registry;
