//! The properties service owning the current snapshot.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{info, warn};

use super::Reloadable;
use crate::codec::{CodecKind, SecretCodec};
use crate::plan::{LoadPlan, PlanSettings};
use crate::resource::OverlayResolver;
use crate::snapshot::PropertySnapshot;
use crate::{OverlayError, OverlayResult};

/// Loads fragments through a resolver and serves the folded snapshot.
///
/// The service starts unloaded. [`PropertiesService::start`] performs the
/// first load; [`PropertiesService::reset`] re-reads every fragment and
/// swaps the snapshot only when loading succeeds. Readers keep whichever
/// snapshot they obtained.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use overlay_config::lifecycle::PropertiesService;
/// use overlay_config::plan::PlanSettings;
/// use overlay_config::resource::{OverlayResolver, ResourceRoots};
///
/// # fn run() -> overlay_config::OverlayResult<()> {
/// let roots = ResourceRoots::new(["/srv/app/overlay", "/srv/app/base"])?;
/// let service = PropertiesService::new(Arc::new(OverlayResolver::new(roots)), PlanSettings::default());
/// service.start()?;
/// let snapshot = service.snapshot()?;
/// let url = snapshot.configuration("db").value_or("url", "jdbc://localhost/app");
/// assert!(!url.is_empty());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct PropertiesService {
    resolver: Arc<OverlayResolver>,
    settings: PlanSettings,
    codec: Arc<dyn SecretCodec>,
    current: RwLock<Option<Arc<PropertySnapshot>>>,
}

impl PropertiesService {
    /// Name under which the service registers for reloads.
    pub const NAME: &'static str = "properties";

    /// Create an unloaded service decoding values with [`CodecKind::Base64`].
    #[must_use]
    pub fn new(resolver: Arc<OverlayResolver>, settings: PlanSettings) -> Self {
        Self {
            resolver,
            settings,
            codec: CodecKind::default().build(),
            current: RwLock::new(None),
        }
    }

    /// Replace the codec used for `encrypt="true"` entries.
    #[must_use]
    pub fn with_codec(mut self, codec: Arc<dyn SecretCodec>) -> Self {
        self.codec = codec;
        self
    }

    /// Resolve the load plan and fold a fresh snapshot without installing it.
    ///
    /// # Errors
    ///
    /// Returns the first resolution, read, parse, or alias failure.
    pub fn load(&self) -> OverlayResult<PropertySnapshot> {
        let plan = LoadPlan::resolve(&self.resolver, &self.settings)?;
        let fragments = plan.load(&self.resolver, self.codec.as_ref())?;
        PropertySnapshot::build(&fragments)
    }

    /// Load and install the first snapshot.
    ///
    /// Starting an already started service reloads it.
    ///
    /// # Errors
    ///
    /// Returns the load failure; the service stays unloaded.
    pub fn start(&self) -> OverlayResult<()> {
        let snapshot = Arc::new(self.load()?);
        info!(
            sections = snapshot.section_names().count(),
            fragments = snapshot.sources().len(),
            "properties service started"
        );
        *self.current.write() = Some(snapshot);
        Ok(())
    }

    /// Re-read every fragment and swap in the new snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`OverlayError::NotStarted`] before [`Self::start`], or the
    /// load failure; in that case the previous snapshot stays in effect.
    pub fn reset(&self) -> OverlayResult<()> {
        if !self.is_active() {
            return Err(Arc::new(OverlayError::NotStarted));
        }
        match self.load() {
            Ok(snapshot) => {
                *self.current.write() = Some(Arc::new(snapshot));
                info!("properties reloaded");
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "reload failed; keeping previous properties");
                Err(err)
            }
        }
    }

    /// Drop the current snapshot.
    pub fn stop(&self) {
        *self.current.write() = None;
    }

    /// Whether a snapshot is installed.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.current.read().is_some()
    }

    /// The snapshot currently in effect.
    ///
    /// # Errors
    ///
    /// Returns [`OverlayError::NotStarted`] when no snapshot is installed.
    pub fn snapshot(&self) -> OverlayResult<Arc<PropertySnapshot>> {
        self.current
            .read()
            .clone()
            .ok_or_else(|| Arc::new(OverlayError::NotStarted))
    }

    /// Resolver the service reads fragments through.
    #[must_use]
    pub fn resolver(&self) -> &Arc<OverlayResolver> {
        &self.resolver
    }

    /// Plan settings the service was built with.
    #[must_use]
    pub const fn settings(&self) -> &PlanSettings {
        &self.settings
    }
}

impl Reloadable for PropertiesService {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn reload(&self) -> OverlayResult<()> {
        self.reset()
    }
}
