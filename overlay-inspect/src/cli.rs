//! Command-line interface definitions for `overlay-inspect`.

use camino::Utf8PathBuf;
use clap::{Args as ClapArgs, Parser, Subcommand};
use overlay_config::codec::CodecKind;

/// Parsed CLI arguments for `overlay-inspect`.
#[derive(Debug, Parser)]
#[command(name = "overlay-inspect")]
#[command(about = "Inspect overlay resource resolution and folded properties")]
#[command(version)]
pub struct Args {
    /// Settings layered over the settings file and environment.
    #[command(flatten)]
    pub overrides: OverrideArgs,
    /// Settings file to read instead of the per-user default.
    #[arg(long, value_name = "path")]
    pub settings: Option<Utf8PathBuf>,
    /// Raise log verbosity (repeat for more detail).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
    /// Operation to perform.
    #[command(subcommand)]
    pub command: Command,
}

/// Options that override values from the settings file and environment.
#[derive(Debug, Clone, Default, ClapArgs)]
pub struct OverrideArgs {
    /// Resource root, highest priority first (repeat for each root).
    #[arg(long = "root", value_name = "dir")]
    pub roots: Vec<Utf8PathBuf>,
    /// Context path the application is deployed at, for example `/shop`.
    #[arg(long, value_name = "path")]
    pub context: Option<String>,
    /// Meta-conf resource listing the configuration fragments.
    #[arg(long, value_name = "resource")]
    pub meta_conf: Option<String>,
    /// Fragment resource loaded after all discovered ones (repeatable).
    #[arg(long, value_name = "resource")]
    pub additional: Vec<String>,
    /// Codec for entries marked `encrypt="true"`.
    #[arg(long, value_name = "kind")]
    pub codec: Option<CodecKind>,
}

/// Operations supported by `overlay-inspect`.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Show which root provides a resource.
    Resolve {
        /// Resource name, for example `/WEB-INF/conf/metaConf.txt`.
        name: String,
        /// Show every root providing the resource, highest priority first.
        #[arg(long)]
        all: bool,
    },
    /// List a directory resource merged across roots.
    List {
        /// Directory resource name.
        dir: String,
    },
    /// Show the fragments that would be loaded, lowest priority first.
    Plan,
    /// List the names of all folded sections.
    Sections,
    /// Show the entries of one section.
    Show {
        /// Section name.
        section: String,
        /// Print values without alias expansion.
        #[arg(long)]
        raw: bool,
    },
    /// Print one configuration value.
    Get {
        /// Section name.
        section: String,
        /// Entry key.
        key: String,
        /// Value printed (after alias expansion) when the key is missing.
        #[arg(long, value_name = "value")]
        default: Option<String>,
    },
    /// List the resolved aliases.
    Aliases,
    /// Print the folded snapshot as JSON.
    Dump,
}
