//! Utility modules
//!
//! This module contains utility functions and common types

pub mod errors;
pub mod helpers;
pub mod logging;

pub use errors::{ZapOfertasError, Result};
