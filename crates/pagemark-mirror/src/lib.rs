//! Document-database client.
//!
//! Write access to the mirrored pages: batched existence lookup keyed by
//! bookmark id, page create/update, delete-flag tracking, archival, and a
//! fully paginated enumeration of every live page.

pub mod client;
pub mod config;
pub mod error;
pub mod properties;
pub mod traits;

pub use client::MirrorClient;
pub use config::MirrorConfig;
pub use error::{MirrorError, MirrorResult};
pub use traits::MirrorStore;
