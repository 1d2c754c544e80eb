use crate::error::RunError;
use serde_json::Value;
use std::io::Write;
use std::path::Path;

/// Write `value` as pretty JSON to `path`, replacing the file atomically.
///
/// The document is written to a temporary file in the target directory and
/// renamed over `path`, so readers never see a half-written file.
pub fn write_json_atomic(path: &Path, value: &Value) -> Result<(), RunError> {
    let output_err = |source: std::io::Error| RunError::Output {
        path: path.to_path_buf(),
        source,
    };

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent).map_err(output_err)?;

    let mut body = serde_json::to_string_pretty(value)?;
    body.push('\n');

    let mut file = tempfile::NamedTempFile::new_in(parent).map_err(output_err)?;
    file.write_all(body.as_bytes()).map_err(output_err)?;
    file.as_file().sync_all().map_err(output_err)?;
    file.persist(path).map_err(|e| output_err(e.error))?;

    tracing::info!("Wrote {}", path.display());
    Ok(())
}

/// Write the empty object `{}` that marks a failed run.
pub fn write_empty(path: &Path) -> Result<(), RunError> {
    write_json_atomic(path, &Value::Object(serde_json::Map::new()))
}
