//! Named components that can re-read their configuration on demand.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::{OverlayError, OverlayResult};

/// A component that can re-read its configuration.
pub trait Reloadable: Send + Sync {
    /// Registry key of the component.
    fn name(&self) -> &str;

    /// Re-read configuration.
    ///
    /// # Errors
    ///
    /// Returns the failure; implementations keep their previous state.
    fn reload(&self) -> OverlayResult<()>;
}

/// Components addressable by name for reloading, in registration order.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use overlay_config::lifecycle::{ReloadRegistry, Reloadable};
///
/// struct Cache;
///
/// impl Reloadable for Cache {
///     fn name(&self) -> &str { "cache" }
///     fn reload(&self) -> overlay_config::OverlayResult<()> { Ok(()) }
/// }
///
/// # fn run() -> overlay_config::OverlayResult<()> {
/// let mut registry = ReloadRegistry::new();
/// registry.register(Arc::new(Cache));
/// registry.reload("cache")?;
/// registry.reload_all()?;
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct ReloadRegistry {
    components: Vec<Arc<dyn Reloadable>>,
}

impl ReloadRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `component`, replacing one registered under the same name.
    pub fn register(&mut self, component: Arc<dyn Reloadable>) {
        let name = component.name().to_owned();
        if let Some(slot) = self.components.iter_mut().find(|c| c.name() == name) {
            *slot = component;
        } else {
            self.components.push(component);
        }
        debug!(component = %name, "registered reloadable component");
    }

    /// Names of the registered components in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.components.iter().map(|c| c.name())
    }

    /// Reload the component registered as `name`.
    ///
    /// # Errors
    ///
    /// Returns [`OverlayError::UnknownComponent`] when nothing is registered
    /// under `name`, otherwise the component's own failure.
    pub fn reload(&self, name: &str) -> OverlayResult<()> {
        self.components
            .iter()
            .find(|c| c.name() == name)
            .ok_or_else(|| Arc::new(OverlayError::UnknownComponent(name.to_owned())))?
            .reload()
    }

    /// Reload every component, continuing past failures.
    ///
    /// # Errors
    ///
    /// Returns the single failure, or an [`OverlayError::Aggregate`] of all
    /// failures when more than one component failed.
    pub fn reload_all(&self) -> OverlayResult<()> {
        let failures: Vec<Arc<OverlayError>> = self
            .components
            .iter()
            .filter_map(|c| c.reload().err())
            .collect();
        OverlayError::try_aggregate(failures).map_or(Ok(()), |err| Err(Arc::new(err)))
    }
}

impl fmt::Debug for ReloadRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReloadRegistry")
            .field("components", &self.names().collect::<Vec<_>>())
            .finish()
    }
}
