use crate::domain::report::UsageSamples;
use anyhow::Context;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

mod render;

pub use render::{histogram_bins, HistogramBin};

pub const DAILY_GRAPH: &str = "daily_graph.svg";
pub const WEEKLY_GRAPH: &str = "weekly_graph.svg";
pub const MONTHLY_GRAPH: &str = "monthly_graph.svg";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartPaths {
    pub daily: PathBuf,
    pub weekly: PathBuf,
    pub monthly: PathBuf,
}

/// Renders the report charts into a fixed set of files under `dir`.
///
/// Every render overwrites the same three files, so renders are serialized and each file is
/// swapped into place with a rename.
#[derive(Debug)]
pub struct ChartWriter {
    dir: PathBuf,
    write_lock: Mutex<()>,
}

impl ChartWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn paths(&self) -> ChartPaths {
        ChartPaths {
            daily: self.dir.join(DAILY_GRAPH),
            weekly: self.dir.join(WEEKLY_GRAPH),
            monthly: self.dir.join(MONTHLY_GRAPH),
        }
    }

    pub fn render(&self, samples: &UsageSamples) -> anyhow::Result<ChartPaths> {
        // The guarded value is (), so a poisoned lock carries no broken state.
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("failed to create chart dir {}", self.dir.display()))?;

        let paths = self.paths();
        write_atomically(&paths.daily, &render::hourly_histogram(&samples.hourly)?)?;
        write_atomically(&paths.weekly, &render::daily_line(&samples.daily)?)?;
        write_atomically(&paths.monthly, &render::monthly_bars(&samples.monthly)?)?;

        tracing::debug!(dir = %self.dir.display(), "rendered report charts");
        Ok(paths)
    }
}

fn write_atomically(path: &Path, contents: &str) -> anyhow::Result<()> {
    let tmp = path.with_extension("svg.tmp");
    std::fs::write(&tmp, contents)
        .with_context(|| format!("failed to write chart {}", tmp.display()))?;
    std::fs::rename(&tmp, path)
        .with_context(|| format!("failed to move chart into place at {}", path.display()))?;
    Ok(())
}
