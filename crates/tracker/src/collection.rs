use chrono::Utc;

use crate::model::VideoRecord;

/// Allocate a creation-order id: the current millisecond timestamp as a
/// string, bumped past the numeric max of existing ids so two adds in the
/// same millisecond still order correctly.
pub fn next_video_id(videos: &[VideoRecord]) -> String {
    next_video_id_at(videos, Utc::now().timestamp_millis())
}

/// Id allocation with the clock injected.
pub fn next_video_id_at(videos: &[VideoRecord], now_ms: i64) -> String {
    let max_existing = videos
        .iter()
        .filter_map(|video| video.id.parse::<i64>().ok())
        .max();

    let id = match max_existing {
        Some(max) if max >= now_ms => max + 1,
        _ => now_ms,
    };

    id.to_string()
}

/// Append a record, returning the new collection.
pub fn add_video(mut videos: Vec<VideoRecord>, record: VideoRecord) -> Vec<VideoRecord> {
    videos.push(record);
    videos
}

/// Flip the completion flag of the record with `id`. Unknown ids leave the
/// collection unchanged.
pub fn toggle_completed(mut videos: Vec<VideoRecord>, id: &str) -> Vec<VideoRecord> {
    for video in &mut videos {
        if video.id == id {
            video.completed = !video.completed;
        }
    }
    videos
}

/// Remove the record with `id`. Unknown ids leave the collection unchanged.
pub fn delete_video(mut videos: Vec<VideoRecord>, id: &str) -> Vec<VideoRecord> {
    videos.retain(|video| video.id != id);
    videos
}
