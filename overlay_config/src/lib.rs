//! Overlay resource resolution and layered XML property configuration.
//!
//! A deployment is a stack of directory roots, highest priority first. The
//! [`resource::OverlayResolver`] finds each resource in the first root that
//! provides it. Configuration fragments discovered by a [`plan::LoadPlan`]
//! are parsed into [`fragment::Fragment`]s and folded, lowest priority
//! first, into an immutable [`snapshot::PropertySnapshot`]. Values are read
//! through [`facade::SectionView`], which expands `%NAME%` alias tokens.
//!
//! [`lifecycle::PropertiesService`] ties these together and supports
//! reloading without disturbing readers of the previous snapshot.
//!
//! ```no_run
//! use std::sync::Arc;
//! use overlay_config::lifecycle::PropertiesService;
//! use overlay_config::plan::PlanSettings;
//! use overlay_config::resource::{OverlayResolver, ResourceRoots};
//!
//! # fn main() -> overlay_config::OverlayResult<()> {
//! let roots = ResourceRoots::new(["/srv/shop/overlay", "/srv/shop/base"])?;
//! let resolver = Arc::new(OverlayResolver::new(roots));
//! let service = PropertiesService::new(resolver, PlanSettings::default().with_context_path("/shop"));
//! service.start()?;
//! let snapshot = service.snapshot()?;
//! let pool: Option<u32> = snapshot.configuration("db").value_as("pool_size")?;
//! # let _ = pool;
//! # Ok(())
//! # }
//! ```

pub mod alias;
pub mod codec;
mod error;
pub mod facade;
pub mod fragment;
pub mod lifecycle;
pub mod plan;
pub mod resource;
mod result_ext;
pub mod snapshot;

pub use error::{AggregatedErrors, OverlayError, OverlayResult};
pub use result_ext::IoResultExt;
pub use snapshot::{PropertySnapshot, fold_fragments};
