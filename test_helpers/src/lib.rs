//! Test fixtures shared across the workspace.
//!
//! - [`tree::OverlayTree`] lays out stacked resource roots in a temporary
//!   directory.
//! - [`fragment::FragmentBuilder`] renders configuration fragment XML.
//! - [`jail::with_env`] runs a closure with isolated environment variables.

pub mod fragment;
pub mod jail;
pub mod tree;

pub use fragment::{FragmentBuilder, SectionBuilder, meta_conf};
pub use jail::with_env;
pub use tree::OverlayTree;
