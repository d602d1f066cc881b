use anyhow::Context;
use std::fs;
use std::path::Path;
use thrustcore::table::{to_csv, to_json_rows};
use thrustcore::Record;

pub fn write_csv<P: AsRef<Path>>(path: P, records: &[Record]) -> anyhow::Result<()> {
    let path = path.as_ref();
    create_parent(path)?;
    fs::write(path, to_csv(records)).with_context(|| format!("writing csv {}", path.display()))
}

pub fn write_json<P: AsRef<Path>>(path: P, records: &[Record]) -> anyhow::Result<()> {
    let path = path.as_ref();
    create_parent(path)?;
    let json = to_json_rows(records).context("serializing records")?;
    fs::write(path, json).with_context(|| format!("writing json {}", path.display()))
}

fn create_parent(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating directory {}", parent.display()))?;
    }
    Ok(())
}
