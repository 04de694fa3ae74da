use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::duration::is_valid_duration;

/// One tracked lesson segment.
///
/// `id` doubles as the creation-order sort key (millisecond-timestamp
/// string, assigned once at creation). Only `completed` is ever mutated
/// after construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoRecord {
    pub id: String,
    pub section: String,
    pub subsection: String,
    pub title: String,
    /// Canonical `m:ss` form, seconds always two digits
    pub duration: String,
    pub completed: bool,
}

/// Form payload for a new video, before an id is assigned.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VideoInput {
    pub section: String,
    pub subsection: String,
    pub title: String,
    pub duration: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("{0}を入力してください")]
    MissingField(&'static str),

    #[error("動画時間は m:ss 形式で入力してください (例: 5:30)")]
    InvalidDuration(String),
}

impl VideoInput {
    /// Validate the form boundary. This is the only gate that keeps
    /// malformed durations out of the model.
    pub fn validate(&self) -> Result<(), InputError> {
        if self.section.trim().is_empty() {
            return Err(InputError::MissingField("セクション"));
        }
        if self.subsection.trim().is_empty() {
            return Err(InputError::MissingField("サブセクション"));
        }
        if self.title.trim().is_empty() {
            return Err(InputError::MissingField("動画タイトル"));
        }
        if self.duration.trim().is_empty() {
            return Err(InputError::MissingField("動画時間"));
        }
        if !is_valid_duration(&self.duration) {
            return Err(InputError::InvalidDuration(self.duration.clone()));
        }
        Ok(())
    }

    /// Build the record once validation has passed. `completed` always
    /// starts false.
    pub fn into_record(self, id: String) -> VideoRecord {
        VideoRecord {
            id,
            section: self.section,
            subsection: self.subsection,
            title: self.title,
            duration: self.duration,
            completed: false,
        }
    }
}
