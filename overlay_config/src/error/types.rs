//! Primary error enum for overlay resolution and property loading.

use camino::Utf8PathBuf;
use thiserror::Error;

use super::aggregate::AggregatedErrors;

/// Errors that can occur while resolving resources or loading configuration.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum OverlayError {
    /// I/O failure tied to a concrete filesystem location.
    #[error("I/O error at '{path}': {source}")]
    File {
        /// Location that triggered the failure.
        path: Utf8PathBuf,
        /// Underlying error reported by the filesystem.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Resource name does not follow the `/`-rooted naming convention.
    #[error("invalid resource name '{name}': {reason}")]
    InvalidName {
        /// Offending resource name.
        name: String,
        /// Why the name was rejected.
        reason: &'static str,
    },

    /// A resolver was requested without any root directory.
    #[error("no resource roots configured")]
    NoRoots,

    /// No root contains the requested resource.
    #[error("resource '{name}' not found in any root")]
    NotFound {
        /// Resource name that was looked up.
        name: String,
    },

    /// Operation requires a file but the resource is a directory.
    #[error("resource '{name}' is a directory")]
    IsDirectory {
        /// Resource name that resolved to a directory.
        name: String,
    },

    /// Fragment does not follow the expected XML structure.
    #[error("invalid XML structure in '{fragment}': {}", .messages.join("; "))]
    Malformed {
        /// Fragment name.
        fragment: String,
        /// Every structural problem found while reading the fragment.
        messages: Vec<String>,
    },

    /// The same section is declared twice inside one fragment.
    #[error("the properties section '{section}' in '{fragment}' is duplicate")]
    DuplicateSection {
        /// Section name declared twice.
        section: String,
        /// Fragment name.
        fragment: String,
    },

    /// An encoded entry value could not be decoded.
    #[error("unable to decode the value for key '{key}' in '{fragment}': {source}")]
    Decode {
        /// Fragment name.
        fragment: String,
        /// Entry key whose value failed to decode.
        key: String,
        /// Failure reported by the codec.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A configuration value could not be converted to the requested type.
    #[error("invalid value for '{key}' in section '{section}': {source}")]
    InvalidValue {
        /// Section holding the value.
        section: String,
        /// Entry key.
        key: String,
        /// Conversion failure.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Alias definitions reference each other in a loop.
    #[error("cyclic alias definition: {cycle}")]
    CyclicAlias {
        /// Chain of alias names participating in the cycle.
        cycle: String,
    },

    /// The properties service was queried before it was started.
    #[error("the properties service is not started")]
    NotStarted,

    /// A codec tag in configuration does not name a known codec.
    #[error("unknown codec '{0}'")]
    UnknownCodec(String),

    /// A reload was requested for a component that is not registered.
    #[error("no reloadable component named '{0}'")]
    UnknownComponent(String),

    /// Multiple errors occurred during one operation.
    #[error("multiple overlay errors:\n{0}")]
    Aggregate(Box<AggregatedErrors>),
}
