//! Deployment settings read from the process environment.

use std::fmt;

use tracing::info;

/// Setting suffix naming an external autoconf directory.
pub const AUTO_CONF: &str = "autoconf_dir";

/// Prefix used for the empty (root) context path.
const ROOT_CONTEXT: &str = "ROOT";

/// A deployment setting together with the variable that provided it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Setting {
    property: String,
    value: String,
}

impl Setting {
    /// Create a setting.
    #[must_use]
    pub fn new(property: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            value: value.into(),
        }
    }

    /// Look up `suffix` for the application deployed at `context_path`.
    ///
    /// With a context path, `<CTX>_<suffix>` is consulted first, where `<CTX>`
    /// is the path without its leading `/` (or `ROOT` for the root context).
    /// Then `<suffix>` itself. Empty values count as missing.
    #[must_use]
    pub fn lookup(context_path: Option<&str>, suffix: &str) -> Option<Self> {
        for property in Self::candidates(context_path, suffix) {
            match std::env::var(&property) {
                Ok(value) if !value.is_empty() => return Some(Self { property, value }),
                _ => info!(property = %property, "no deployment setting"),
            }
        }
        None
    }

    /// Variable names consulted by [`Setting::lookup`], in order.
    ///
    /// # Examples
    ///
    /// ```
    /// use overlay_config::plan::Setting;
    ///
    /// assert_eq!(Setting::candidates(Some("/shop"), "autoconf_dir"), ["shop_autoconf_dir", "autoconf_dir"]);
    /// assert_eq!(Setting::candidates(Some(""), "autoconf_dir"), ["ROOT_autoconf_dir", "autoconf_dir"]);
    /// assert_eq!(Setting::candidates(None, "autoconf_dir"), ["autoconf_dir"]);
    /// ```
    #[must_use]
    pub fn candidates(context_path: Option<&str>, suffix: &str) -> Vec<String> {
        let mut names = Vec::with_capacity(2);
        if let Some(context) = context_path {
            let prefix = match context.strip_prefix('/').unwrap_or(context) {
                "" => ROOT_CONTEXT,
                trimmed => trimmed,
            };
            names.push(format!("{prefix}_{suffix}"));
        }
        names.push(suffix.to_owned());
        names
    }

    /// Variable that provided the value.
    #[must_use]
    pub fn property(&self) -> &str {
        &self.property
    }

    /// Setting value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for Setting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.property, self.value)
    }
}
