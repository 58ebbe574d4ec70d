use anyhow::{bail, Context, Result};
use relia_io::settings::template;
use std::path::Path;
use tracing::info;

pub fn handle_init(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!(
            "{} already exists; pass --force to overwrite it",
            path.display()
        );
    }
    std::fs::write(path, template())
        .with_context(|| format!("writing settings template to {}", path.display()))?;
    info!(path = %path.display(), "settings template written");
    println!("Wrote {}", path.display());
    Ok(())
}
