//! # Common Components
//!
//! Shared data structures and configuration used by the catalog server.
//!
//! ## Modules
//!
//! - [`messages`]: JSON wire types and the stored image record
//! - [`config`]: Catalog constants and TOML configuration loading

pub mod messages;
pub mod config;
