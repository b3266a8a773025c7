//! Browser session management and configuration
//!
//! Thin wrapper over `headless_chrome`: launching or connecting to a
//! Chrome/Chromium instance, picking the active tab, navigating, and lending
//! out short-lived [`crate::document::TabDocument`] views for resolution.
//! Process lifecycle beyond that is owned by `headless_chrome` itself.

pub mod config;
pub mod session;

pub use config::{ConnectionOptions, LaunchOptions};
pub use session::BrowserSession;
