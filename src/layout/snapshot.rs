use std::fs;
use std::path::Path;

use anyhow::Context;
use tracing::debug;

use crate::layout::display::Display;

/// Serializes the full display state (forest, history, parked identities) so
/// a host can restore its layout across restarts.
pub fn save(display: &Display, path: &Path) -> anyhow::Result<()> {
    let raw = ron::ser::to_string_pretty(display, ron::ser::PrettyConfig::default())
        .context("serializing display snapshot")?;
    fs::write(path, raw).with_context(|| format!("writing snapshot to {}", path.display()))?;
    let display_id = display.id();
    debug!("saved display {:?} snapshot to {}", display_id, path.display());
    Ok(())
}

pub fn load(path: &Path) -> anyhow::Result<Display> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading snapshot from {}", path.display()))?;
    ron::from_str(&raw).with_context(|| format!("parsing snapshot from {}", path.display()))
}
