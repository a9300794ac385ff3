//! Document view capability for JavaScript-rendered listing sites.
//!
//! The extractor only talks to [`DocumentView`] and [`ViewFactory`]; this crate
//! also provides the headless Chromium implementation of both.

pub mod engine;
pub mod error;
pub mod fingerprint;
pub mod page;
pub mod view;

pub use engine::BrowserEngine;
pub use error::{BrowserError, Result};
pub use fingerprint::FingerprintConfig;
pub use page::ChromiumView;
pub use view::{evaluate_as, DocumentView, ViewFactory};
