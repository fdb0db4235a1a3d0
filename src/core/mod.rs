//! Host-boundary plumbing
//!
//! This module contains configuration, environment values, logging,
//! plugin metadata, the output sink, and the external client boundaries.

pub mod client;
pub mod config;
pub mod constants;
pub mod device;
pub mod env;
pub mod logging;
pub mod plugin;
pub mod sink;
