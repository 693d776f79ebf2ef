//! Service lifecycle: loading, swapping, and reloading snapshots.
//!
//! The application's composition root builds one [`PropertiesService`] and
//! shares it; nothing in this crate keeps global state.

mod registry;
mod service;

pub use registry::{ReloadRegistry, Reloadable};
pub use service::PropertiesService;
