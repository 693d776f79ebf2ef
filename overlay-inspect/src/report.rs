//! Rendering of inspection results as plain text or JSON.

use std::io::Write;

use overlay_config::PropertySnapshot;
use overlay_config::resource::{Layer, Resource};

use crate::error::{InspectError, Result};

/// Writes one resolved resource as `<layer>\t<path>`.
///
/// # Errors
///
/// Returns [`InspectError::Io`] when writing fails.
pub fn write_resource<W: Write>(out: &mut W, resource: &Resource) -> Result<()> {
    match resource.layer() {
        Layer::Root(index) => writeln!(out, "root {index}\t{}", resource.path())?,
        Layer::Direct => writeln!(out, "direct\t{}", resource.path())?,
    }
    Ok(())
}

/// Writes each item on its own line.
///
/// # Errors
///
/// Returns [`InspectError::Io`] when writing fails.
pub fn write_lines<W, I, S>(out: &mut W, items: I) -> Result<()>
where
    W: Write,
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    for item in items {
        writeln!(out, "{}", item.as_ref())?;
    }
    Ok(())
}

/// Writes the entries of `section` as `key = value`, expanded unless `raw`.
///
/// Unknown sections print nothing.
///
/// # Errors
///
/// Returns [`InspectError::Io`] when writing fails.
pub fn write_section<W: Write>(
    out: &mut W,
    snapshot: &PropertySnapshot,
    section: &str,
    raw: bool,
) -> Result<()> {
    if raw {
        for (key, value) in snapshot.section(section).into_iter().flatten() {
            writeln!(out, "{key} = {value}")?;
        }
    } else {
        for (key, value) in snapshot.configuration(section).entries() {
            writeln!(out, "{key} = {value}")?;
        }
    }
    Ok(())
}

/// Writes one expanded value, falling back to the expanded `default`.
///
/// # Errors
///
/// Returns [`InspectError::MissingKey`] when the key is absent and no
/// default is given, or [`InspectError::Io`] when writing fails.
pub fn write_value<W: Write>(
    out: &mut W,
    snapshot: &PropertySnapshot,
    section: &str,
    key: &str,
    default: Option<&str>,
) -> Result<()> {
    let view = snapshot.configuration(section);
    let value = match (view.value(key), default) {
        (Some(value), _) => value.into_owned(),
        (None, Some(fallback)) => view.value_or(key, fallback),
        (None, None) => {
            return Err(InspectError::MissingKey {
                section: section.to_owned(),
                key: key.to_owned(),
            });
        }
    };
    writeln!(out, "{value}")?;
    Ok(())
}

/// Writes every alias as `%NAME% = value`.
///
/// # Errors
///
/// Returns [`InspectError::Io`] when writing fails.
pub fn write_aliases<W: Write>(out: &mut W, snapshot: &PropertySnapshot) -> Result<()> {
    for (name, value) in snapshot.aliases().iter() {
        writeln!(out, "%{name}% = {value}")?;
    }
    Ok(())
}

/// Writes the snapshot as pretty-printed JSON.
///
/// # Errors
///
/// Returns [`InspectError::Json`] when serialization fails or
/// [`InspectError::Io`] when writing fails.
pub fn write_json<W: Write>(out: &mut W, snapshot: &PropertySnapshot) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, snapshot)?;
    writeln!(out)?;
    Ok(())
}
