use anyhow::Context;
use pkgdb_core::{config::Config, io, paths, repository::Database};
use std::path::Path;

pub fn run(root: &Path) -> anyhow::Result<()> {
    let project_name = root
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "pkgdb".to_string());

    println!("Initializing pkgdb in: {}", root.display());

    let dir = paths::pkgdb_dir(root);
    io::ensure_dir(&dir).with_context(|| format!("failed to create {}", dir.display()))?;

    if !paths::config_path(root).exists() {
        Config::new(&project_name)
            .save(root)
            .context("failed to write config.yaml")?;
        println!("  created: {}", paths::CONFIG_FILE);
    } else {
        println!("  exists:  {}", paths::CONFIG_FILE);
    }

    if !paths::db_path(root).exists() {
        Database::default()
            .save(root)
            .context("failed to write db.yaml")?;
        println!("  created: {}", paths::DB_FILE);
    } else {
        println!("  exists:  {}", paths::DB_FILE);
    }

    println!("\nAdd users and their groups to {}.", paths::CONFIG_FILE);
    Ok(())
}
