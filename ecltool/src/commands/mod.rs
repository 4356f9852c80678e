pub mod dump;
pub mod list;
pub mod summary;

use anyhow::{Context, Result};
use ecl_reader::EclFile;
use std::path::Path;
use tracing::info;

pub(crate) fn open(path: &Path) -> Result<EclFile> {
    let file = EclFile::open(path).with_context(|| format!("open {}", path.display()))?;
    info!(
        "opened {} ({} arrays{})",
        path.display(),
        file.count(),
        if file.is_formatted() { ", formatted" } else { "" }
    );
    Ok(file)
}
