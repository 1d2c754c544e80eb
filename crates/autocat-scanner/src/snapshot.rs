use autocat_browser::PageActions;
use std::path::PathBuf;

/// Writes a screenshot and the rendered markup of each fetched page.
///
/// Snapshot failures are logged and otherwise ignored.
#[derive(Debug, Clone)]
pub struct SnapshotWriter {
    dir: PathBuf,
}

impl SnapshotWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Write `<label>.png` and `<label>.html` into the snapshot directory.
    pub async fn capture<P>(&self, page: &P, label: &str, markup: &str)
    where
        P: PageActions + ?Sized,
    {
        if let Err(e) = tokio::fs::create_dir_all(&self.dir).await {
            tracing::warn!("Cannot create snapshot dir {}: {}", self.dir.display(), e);
            return;
        }

        let png = self.dir.join(format!("{label}.png"));
        if let Err(e) = page.screenshot(&png).await {
            tracing::warn!("Screenshot {} failed: {}", png.display(), e);
        }

        let html = self.dir.join(format!("{label}.html"));
        if let Err(e) = tokio::fs::write(&html, markup).await {
            tracing::warn!("Markup dump {} failed: {}", html.display(), e);
        }

        tracing::debug!("Saved snapshot '{}'", label);
    }
}
