//! Leadscan Core - Foundation crate for the leadscan contact extractor.
//!
//! This crate provides the shared data model, error handling and configuration
//! management that the browser, extractor and CLI crates depend on.
//!
//! # Modules
//!
//! - [`error`] - Configuration error types using thiserror
//! - [`config`] - TOML-based configuration with XDG paths
//! - [`types`] - Listing items, extraction jobs and extraction results
//!
//! # Example
//!
//! ```rust
//! use leadscan_core::{AppConfig, ListingItem};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::default();
//! config.validate()?;
//!
//! let item = ListingItem::new("Pizzaria Speranza", "https://www.google.com/maps/place/x");
//! assert_eq!(item.display_name, "Pizzaria Speranza");
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod config;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use config::{AppConfig, BrowserConfig, ExtractionConfig, ListingConfig, LocaleConfig};
pub use error::{ConfigError, ConfigResult};
pub use types::{ExtractionJob, ExtractionResult, ListingItem};
