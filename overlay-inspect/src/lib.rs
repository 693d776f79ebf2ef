//! Library interface for the `overlay-inspect` tool.
//!
//! The binary gathers [`settings::InspectSettings`], builds a resolver and a
//! properties service from them, and renders the result of one
//! [`cli::Command`] through the [`report`] writers.

pub mod cli;
pub mod error;
pub mod report;
pub mod settings;

use std::io::Write;
use std::sync::Arc;

use overlay_config::PropertySnapshot;
use overlay_config::lifecycle::PropertiesService;
use overlay_config::plan::LoadPlan;
use overlay_config::resource::{OverlayResolver, ResourceRoots};

use crate::cli::{Args, Command};
use crate::error::Result;
use crate::settings::InspectSettings;

/// Gather settings for `args` and run its command, writing to `out`.
///
/// # Errors
///
/// Returns any settings, resolution, loading, or output failure.
pub fn run<W: Write>(args: &Args, out: &mut W) -> Result<()> {
    let settings = InspectSettings::load(args.settings.as_deref(), &args.overrides)?;
    execute(&settings, &args.command, out)
}

/// Run `command` against the deployment described by `settings`.
///
/// # Errors
///
/// Returns any resolution, loading, or output failure.
pub fn execute<W: Write>(settings: &InspectSettings, command: &Command, out: &mut W) -> Result<()> {
    let resolver = Arc::new(OverlayResolver::new(ResourceRoots::new(
        settings.roots.iter().cloned(),
    )?));
    match command {
        Command::Resolve { name, all: true } => {
            for resource in resolver.overlays(name)? {
                report::write_resource(out, &resource)?;
            }
        }
        Command::Resolve { name, all: false } => {
            report::write_resource(out, &resolver.resolve(name)?)?;
        }
        Command::List { dir } => report::write_lines(out, resolver.list(dir)?)?,
        Command::Plan => {
            let plan = LoadPlan::resolve(&resolver, &settings.plan)?;
            report::write_lines(out, plan.fragments())?;
        }
        Command::Sections => {
            let snapshot = load(resolver, settings)?;
            report::write_lines(out, snapshot.section_names())?;
        }
        Command::Show { section, raw } => {
            let snapshot = load(resolver, settings)?;
            report::write_section(out, &snapshot, section, *raw)?;
        }
        Command::Get {
            section,
            key,
            default,
        } => {
            let snapshot = load(resolver, settings)?;
            report::write_value(out, &snapshot, section, key, default.as_deref())?;
        }
        Command::Aliases => {
            let snapshot = load(resolver, settings)?;
            report::write_aliases(out, &snapshot)?;
        }
        Command::Dump => {
            let snapshot = load(resolver, settings)?;
            report::write_json(out, &snapshot)?;
        }
    }
    Ok(())
}

fn load(resolver: Arc<OverlayResolver>, settings: &InspectSettings) -> Result<Arc<PropertySnapshot>> {
    let service = PropertiesService::new(resolver, settings.plan.clone())
        .with_codec(settings.codec.build());
    service.start()?;
    Ok(service.snapshot()?)
}
