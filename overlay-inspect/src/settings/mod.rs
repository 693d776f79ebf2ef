//! Layered settings for `overlay-inspect`.
//!
//! Values are gathered, lowest precedence first, from built-in defaults, a
//! TOML settings file, `OVERLAY_INSPECT_*` environment variables, and the
//! command line. Nested keys in environment variables use `__`, for example
//! `OVERLAY_INSPECT_PLAN__CONTEXT_PATH=/shop`.

use camino::{Utf8Path, Utf8PathBuf};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use overlay_config::codec::CodecKind;
use overlay_config::plan::PlanSettings;
use serde::{Deserialize, Serialize};

use crate::cli::OverrideArgs;
use crate::error::{InspectError, Result};

/// Prefix of environment variables read as settings.
pub const ENV_PREFIX: &str = "OVERLAY_INSPECT_";

/// Settings file name inside the per-user configuration directory.
const SETTINGS_FILE: &str = "overlay-inspect/settings.toml";

/// Everything needed to build a resolver and a properties service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InspectSettings {
    /// Resource roots, highest priority first.
    pub roots: Vec<Utf8PathBuf>,
    /// Codec for entries marked `encrypt="true"`.
    pub codec: CodecKind,
    /// Where fragments are discovered.
    pub plan: PlanSettings,
}

#[derive(Debug, Default, Serialize)]
struct Overrides {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    roots: Vec<Utf8PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    codec: Option<CodecKind>,
    plan: PlanOverrides,
}

#[derive(Debug, Default, Serialize)]
struct PlanOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    meta_conf: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    context_path: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    additional: Vec<String>,
}

impl From<&OverrideArgs> for Overrides {
    fn from(args: &OverrideArgs) -> Self {
        Self {
            roots: args.roots.clone(),
            codec: args.codec,
            plan: PlanOverrides {
                meta_conf: args.meta_conf.clone(),
                context_path: args.context.clone(),
                additional: args.additional.clone(),
            },
        }
    }
}

impl InspectSettings {
    /// Gather settings from every layer.
    ///
    /// `file` names the settings file explicitly; without it the per-user
    /// default is read when present.
    ///
    /// # Errors
    ///
    /// Returns [`InspectError::MissingSettings`] when `file` does not exist
    /// and [`InspectError::Settings`] when a layer cannot be deserialized.
    pub fn load(file: Option<&Utf8Path>, overrides: &OverrideArgs) -> Result<Self> {
        let path = match file {
            Some(path) if !path.is_file() => {
                return Err(InspectError::MissingSettings(path.to_path_buf()));
            }
            Some(path) => Some(path.to_path_buf()),
            None => default_settings_file(),
        };
        Ok(layered(path.as_deref(), overrides).extract()?)
    }
}

/// Settings file in the per-user configuration directory, if one exists.
#[must_use]
pub fn default_settings_file() -> Option<Utf8PathBuf> {
    let dir = dirs::config_dir()?;
    let path = Utf8PathBuf::from_path_buf(dir).ok()?.join(SETTINGS_FILE);
    path.is_file().then_some(path)
}

fn layered(file: Option<&Utf8Path>, overrides: &OverrideArgs) -> Figment {
    let mut fig = Figment::from(Serialized::defaults(InspectSettings::default()));
    if let Some(path) = file {
        tracing::debug!(settings = %path, "reading settings file");
        fig = fig.merge(Toml::file(path));
    }
    fig.merge(Env::prefixed(ENV_PREFIX).split("__"))
        .merge(Serialized::defaults(Overrides::from(overrides)))
}
