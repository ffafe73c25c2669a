use std::path::{Path, PathBuf};

use crate::error::ProgressError;
use crate::progress::engine::{ProgressEngine, ProgressSnapshot};
use crate::state::app::AppState;

pub fn snapshot_path() -> PathBuf {
    snapshot_path_in(&crate::config::app_data_dir())
}

/// Snapshot location under a data directory.
pub fn snapshot_path_in(dir: &Path) -> PathBuf {
    dir.join("data").join("progress.json")
}

/// Save a snapshot asynchronously
pub async fn save_snapshot(path: &Path, snapshot: &ProgressSnapshot) -> Result<(), ProgressError> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| ProgressError::new(
                format!("Failed to create directory: {}", e),
                "io"
            ).with_context(format!("path: {:?}", parent)))?;
    }

    let json = serde_json::to_string_pretty(snapshot)
        .map_err(|e| ProgressError::new(
            format!("Failed to serialize progress snapshot: {}", e),
            "json_serialize"
        ))?;

    tokio::fs::write(path, json)
        .await
        .map_err(|e| ProgressError::new(
            format!("Failed to write progress snapshot: {}", e),
            "io"
        ).with_context(format!("path: {:?}", path)))?;

    Ok(())
}

/// Load a snapshot asynchronously. A missing file is not an error.
pub async fn load_snapshot(path: &Path) -> Result<Option<ProgressSnapshot>, ProgressError> {
    match tokio::fs::read_to_string(path).await {
        Ok(content) => {
            serde_json::from_str(&content)
                .map_err(|e| ProgressError::new(
                    format!("Failed to parse progress snapshot: {}", e),
                    "json_parse"
                ).with_context(format!("path: {:?}", path)))
                .map(Some)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Ok(None)
        }
        Err(e) => {
            Err(ProgressError::new(
                format!("Failed to read progress snapshot: {}", e),
                "io"
            ).with_context(format!("path: {:?}", path)))
        }
    }
}

/// Build an app state from the snapshot at `path`, or an empty one if there is none.
pub async fn hydrate(state: AppState, path: &Path) -> Result<AppState, ProgressError> {
    match load_snapshot(path).await? {
        Some(snapshot) => {
            tracing::info!(
                path = ?path,
                students = snapshot.students.len(),
                "Progress snapshot loaded"
            );
            let engine = ProgressEngine::from_snapshot(
                state.config.as_ref().clone(),
                state.metrics.clone(),
                snapshot,
            );
            Ok(state.with_engine(engine))
        }
        None => {
            tracing::debug!(path = ?path, "No progress snapshot, starting empty");
            Ok(state)
        }
    }
}

/// Write the engine held by `state` to `path`.
pub async fn persist(state: &AppState, path: &Path) -> Result<(), ProgressError> {
    let snapshot = state.engine.snapshot();
    save_snapshot(path, &snapshot).await?;
    tracing::info!(
        path = ?path,
        students = snapshot.students.len(),
        "Progress snapshot saved"
    );
    Ok(())
}
