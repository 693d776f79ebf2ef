//! Discovery of the fragments that make up a deployment's configuration.
//!
//! Fragments are gathered, lowest priority first, from:
//!
//! 1. every overlay of the meta-conf listing, lowest priority root first,
//!    each line naming a fragment under the conf prefix;
//! 2. `*.config.xml` resources of the merged autoconf folder;
//! 3. `*.config.xml` files of the external autoconf directory named by the
//!    [`AUTO_CONF`] deployment setting;
//! 4. fragments pushed explicitly through [`PlanSettings::with_additional`].
//!
//! A resource name is only used the first time it is encountered.

mod setting;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

pub use setting::{AUTO_CONF, Setting};

use crate::OverlayResult;
use crate::codec::SecretCodec;
use crate::fragment::Fragment;
use crate::resource::{OverlayResolver, mark_direct};

/// Suffix identifying configuration fragments in autoconf folders.
pub const CONFIG_SUFFIX: &str = ".config.xml";

/// Where a deployment keeps its configuration fragments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanSettings {
    /// Resource listing fragment names, one per line.
    pub meta_conf: String,
    /// Resource folder the meta-conf names are relative to.
    pub conf_prefix: String,
    /// Resource folder scanned for `*.config.xml` fragments.
    pub autoconf_folder: String,
    /// Context path of the application, used to scope deployment settings.
    pub context_path: Option<String>,
    /// Fragments loaded after everything else.
    pub additional: Vec<String>,
}

impl Default for PlanSettings {
    fn default() -> Self {
        Self {
            meta_conf: "/WEB-INF/conf/metaConf.txt".to_owned(),
            conf_prefix: "/WEB-INF/conf".to_owned(),
            autoconf_folder: "/WEB-INF/autoconf".to_owned(),
            context_path: None,
            additional: Vec::new(),
        }
    }
}

impl PlanSettings {
    /// Use `resource` as the meta-conf listing.
    #[must_use]
    pub fn with_meta_conf(mut self, resource: impl Into<String>) -> Self {
        self.meta_conf = resource.into();
        self
    }

    /// Scope deployment settings to the application at `context_path`.
    #[must_use]
    pub fn with_context_path(mut self, context_path: impl Into<String>) -> Self {
        self.context_path = Some(context_path.into());
        self
    }

    /// Append a fragment resource loaded after every discovered one.
    #[must_use]
    pub fn with_additional(mut self, resource: impl Into<String>) -> Self {
        self.additional.push(resource.into());
        self
    }

    fn conf_resource(&self, line: &str) -> String {
        format!(
            "{}/{}",
            self.conf_prefix.trim_end_matches('/'),
            line.trim_start_matches('/')
        )
    }
}

/// Ordered, de-duplicated list of fragment resources.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadPlan {
    fragments: Vec<String>,
    seen: HashSet<String>,
    autoconf: Option<Setting>,
}

impl LoadPlan {
    /// Work out which fragments to load, lowest priority first.
    ///
    /// # Errors
    ///
    /// Returns [`crate::OverlayError::NotFound`] when the meta-conf names a
    /// fragment no root provides, and other resolver errors unchanged.
    pub fn resolve(resolver: &OverlayResolver, settings: &PlanSettings) -> OverlayResult<Self> {
        let mut plan = Self::default();
        plan.add_meta_conf(resolver, settings)?;
        plan.add_autoconf_folder(resolver, settings)?;
        plan.autoconf = Setting::lookup(settings.context_path.as_deref(), AUTO_CONF);
        if let Some(setting) = plan.autoconf.clone() {
            plan.add_external_autoconf(resolver, &setting)?;
        }
        for resource in &settings.additional {
            plan.push(resource.clone());
        }
        info!(fragments = plan.fragments.len(), "resolved load plan");
        Ok(plan)
    }

    /// Fragment resource names, lowest priority first.
    #[must_use]
    pub fn fragments(&self) -> &[String] {
        &self.fragments
    }

    /// External autoconf setting found while resolving, if any.
    #[must_use]
    pub const fn autoconf(&self) -> Option<&Setting> {
        self.autoconf.as_ref()
    }

    /// Read and parse every planned fragment.
    ///
    /// # Errors
    ///
    /// Returns the first read or parse failure.
    pub fn load(
        &self,
        resolver: &OverlayResolver,
        codec: &dyn SecretCodec,
    ) -> OverlayResult<Vec<Fragment>> {
        self.fragments
            .iter()
            .map(|name| {
                let text = resolver.read_to_string(name)?;
                let fragment = Fragment::parse(name.clone(), &text, codec)?;
                debug!(fragment = %name, sections = fragment.sections().len(), "loaded fragment");
                Ok(fragment)
            })
            .collect()
    }

    fn push(&mut self, resource: String) {
        if self.seen.insert(resource.clone()) {
            self.fragments.push(resource);
        } else {
            debug!(fragment = %resource, "fragment already planned");
        }
    }

    fn add_meta_conf(
        &mut self,
        resolver: &OverlayResolver,
        settings: &PlanSettings,
    ) -> OverlayResult<()> {
        let overlays = resolver.overlays(&settings.meta_conf)?;
        if overlays.is_empty() {
            info!(resource = %settings.meta_conf, "no meta-conf listing");
        }
        for listing in overlays.iter().rev() {
            debug!(path = %listing.path(), "reading meta-conf");
            let text = resolver.read_to_string(&mark_direct(listing.path()))?;
            for line in text.lines().map(str::trim).filter(|line| !line.is_empty()) {
                let resource = resolver.resolve(&settings.conf_resource(line))?;
                self.push(resource.name().to_owned());
            }
        }
        Ok(())
    }

    fn add_autoconf_folder(
        &mut self,
        resolver: &OverlayResolver,
        settings: &PlanSettings,
    ) -> OverlayResult<()> {
        for child in resolver.list(&settings.autoconf_folder)? {
            if child.ends_with(CONFIG_SUFFIX) {
                self.push(child);
            }
        }
        Ok(())
    }

    fn add_external_autoconf(
        &mut self,
        resolver: &OverlayResolver,
        setting: &Setting,
    ) -> OverlayResult<()> {
        info!(setting = %setting, "using deployment autoconf");
        let folder = mark_direct(setting.value());
        if resolver.find(&folder)?.is_none() {
            info!(folder = setting.value(), "no such autoconf folder");
            return Ok(());
        }
        for child in resolver.list(&folder)? {
            if child.ends_with(CONFIG_SUFFIX) {
                debug!(fragment = %child, "using autoconf");
                self.push(child);
            }
        }
        Ok(())
    }
}
