use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

use crate::model::VideoRecord;

/// Slot holding the JSON array of video records
pub const VIDEO_DATA_FILE: &str = "video-data.json";
/// Slot holding the raw `YYYY-MM-DD` exam date string
pub const EXAM_DATE_FILE: &str = "exam-date.txt";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Local key-value persistence for the video list and exam date.
///
/// The public accessors are lenient by contract: a missing or unreadable
/// slot loads as the empty default, and a failed write is logged and
/// swallowed. The store holds no authoritative copy; it only snapshots
/// whatever collection the caller hands it.
#[derive(Debug, Clone)]
pub struct LocalStore {
    dir: PathBuf,
}

impl LocalStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Load the tracked videos; absent or corrupt data is an empty list.
    pub fn load_videos(&self) -> Vec<VideoRecord> {
        match self.try_load_videos() {
            Ok(videos) => videos,
            Err(err) => {
                warn!("could not load video data, starting empty: {}", err);
                Vec::new()
            }
        }
    }

    /// Persist the full video snapshot. Failures are logged, not returned.
    pub fn save_videos(&self, videos: &[VideoRecord]) {
        if let Err(err) = self.try_save_videos(videos) {
            warn!("could not save video data: {}", err);
        }
    }

    /// Load the exam date; absent is the empty string (unset).
    pub fn load_exam_date(&self) -> String {
        let path = self.dir.join(EXAM_DATE_FILE);
        match fs::read_to_string(&path) {
            Ok(contents) => contents.trim().to_string(),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => String::new(),
            Err(err) => {
                warn!("could not load exam date: {}", err);
                String::new()
            }
        }
    }

    /// Persist the exam date string. Failures are logged, not returned.
    pub fn save_exam_date(&self, date: &str) {
        if let Err(err) = self.try_save_slot(EXAM_DATE_FILE, date.as_bytes()) {
            warn!("could not save exam date: {}", err);
        }
    }

    fn try_load_videos(&self) -> Result<Vec<VideoRecord>, StoreError> {
        let path = self.dir.join(VIDEO_DATA_FILE);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let contents = fs::read_to_string(&path)?;
        let videos = serde_json::from_str(&contents)?;
        Ok(videos)
    }

    fn try_save_videos(&self, videos: &[VideoRecord]) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(videos)?;
        self.try_save_slot(VIDEO_DATA_FILE, json.as_bytes())
    }

    // Write atomically through a temp file so a crash mid-write never
    // leaves a truncated slot behind.
    fn try_save_slot(&self, name: &str, bytes: &[u8]) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir)?;

        let final_path = self.dir.join(name);
        let temp_path = self.dir.join(format!("{}.tmp", name));

        let mut file = fs::File::create(&temp_path)?;
        file.write_all(bytes)?;
        file.sync_all()?;
        drop(file);

        fs::rename(&temp_path, &final_path)?;
        Ok(())
    }
}
