//! Resource resolution across stacked directory roots.
//!
//! A deployment is described by an ordered list of roots, highest priority
//! first. Resource names use `/`-rooted syntax (`/WEB-INF/conf/app.xml`) and
//! resolve to the first root that contains them. Names carrying the
//! [`DIRECT_PREFIX`] bypass the search and name an OS path directly.

mod name;
mod resolver;
mod roots;

pub use name::{DIRECT_PREFIX, is_direct, mark_direct};
pub use resolver::{Layer, OverlayResolver, Resource};
pub use roots::ResourceRoots;

pub(crate) use name::{Lookup, child_name};
