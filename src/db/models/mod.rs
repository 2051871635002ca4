// src/db/models/mod.rs

//! Row models for the OLM catalog index tables
//!
//! Each struct mirrors one table and provides lookups plus `insert` for
//! building fixtures.

mod bundle;
mod channel;
mod channel_entry;
mod package;

pub use bundle::BundleRow;
pub use channel::ChannelRow;
pub use channel_entry::ChannelEntryRow;
pub use package::PackageRow;
