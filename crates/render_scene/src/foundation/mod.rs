//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the crate:
//! - Math types and operations
//! - Pooled collections
//! - Logging utilities

pub mod math;
pub mod collections;
pub mod logging;
