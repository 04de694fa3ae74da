use proptest::prelude::*;
use tempfile::TempDir;
use vidpace_tracker::collection::{add_video, delete_video, next_video_id, toggle_completed};
use vidpace_tracker::pacing::compute_daily_budget;
use vidpace_tracker::view::{apply_filter, project, summarize};
use vidpace_tracker::{LocalStore, VideoFilter, VideoInput, ViewState};

fn input(section: &str, title: &str, duration: &str) -> VideoInput {
    VideoInput {
        section: section.to_string(),
        subsection: format!("{}-1", section),
        title: title.to_string(),
        duration: duration.to_string(),
    }
}

/// The add -> toggle -> delete sequence the shell drives: every mutation
/// persists the full snapshot, and a reload sees exactly what was saved.
#[test]
fn mutation_sequence_survives_reload() {
    let temp_dir = TempDir::new().unwrap();
    let store = LocalStore::new(temp_dir.path());

    let mut videos = store.load_videos();
    assert!(videos.is_empty());

    for (section, title, duration) in [
        ("第1章", "導入", "5:30"),
        ("第1章", "基礎", "10:00"),
        ("第2章", "応用", "7:45"),
    ] {
        let form = input(section, title, duration);
        form.validate().unwrap();
        let id = next_video_id(&videos);
        videos = add_video(videos, form.into_record(id));
        store.save_videos(&videos);
    }

    let reloaded = store.load_videos();
    assert_eq!(reloaded, videos);

    // Toggle the middle record and persist
    let target = videos[1].id.clone();
    videos = toggle_completed(videos, &target);
    store.save_videos(&videos);
    assert!(store.load_videos()[1].completed);

    // Delete it and persist
    videos = delete_video(videos, &target);
    store.save_videos(&videos);
    let after_delete = store.load_videos();
    assert_eq!(after_delete.len(), 2);
    assert!(after_delete.iter().all(|video| video.id != target));
}

/// The exam date slot is independent of the video slot.
#[test]
fn exam_date_slot_is_independent() {
    let temp_dir = TempDir::new().unwrap();
    let store = LocalStore::new(temp_dir.path());

    store.save_exam_date("2026-09-15");
    assert!(store.load_videos().is_empty());
    assert_eq!(store.load_exam_date(), "2026-09-15");

    store.save_videos(&[]);
    assert_eq!(store.load_exam_date(), "2026-09-15");
}

/// Rejected form input never creates a record: the shell only persists
/// after validate() passes.
#[test]
fn invalid_form_input_creates_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let store = LocalStore::new(temp_dir.path());
    let videos = store.load_videos();

    let bad_duration = input("第1章", "導入", "5:5");
    assert!(bad_duration.validate().is_err());

    let missing_title = input("第1章", "", "5:30");
    assert!(missing_title.validate().is_err());

    // Shell behavior: nothing saved, collection untouched
    assert!(videos.is_empty());
    assert!(store.load_videos().is_empty());
}

/// For any interleaving of adds and toggles, the projection the table
/// renders keeps every persisted record visible under the All filter, and
/// the pacing figure only ever reflects the incomplete subset.
#[test]
fn property_projection_tracks_persisted_state() {
    proptest!(|(
        minutes in prop::collection::vec(1u64..120, 1..12),
        toggle_mask in prop::collection::vec(any::<bool>(), 1..12),
    )| {
        let temp_dir = TempDir::new().unwrap();
        let store = LocalStore::new(temp_dir.path());

        let mut videos = store.load_videos();
        for (i, m) in minutes.iter().enumerate() {
            let form = input("第1章", &format!("video {}", i), &format!("{}:00", m));
            form.validate().unwrap();
            let id = next_video_id(&videos);
            videos = add_video(videos, form.into_record(id));
        }

        for (i, flip) in toggle_mask.iter().enumerate() {
            if *flip && i < videos.len() {
                let id = videos[i].id.clone();
                videos = toggle_completed(videos, &id);
            }
        }
        store.save_videos(&videos);

        let reloaded = store.load_videos();
        let view = project(&reloaded, &ViewState::default());
        prop_assert_eq!(view.record_count(), minutes.len());

        let incomplete = apply_filter(&reloaded, VideoFilter::Incomplete);
        let incomplete_minutes: u64 = incomplete
            .iter()
            .map(|video| video.duration.split(':').next().unwrap().parse::<u64>().unwrap())
            .sum();

        let summary = summarize(&reloaded);
        prop_assert_eq!(summary.incomplete_seconds, incomplete_minutes * 60);

        // Exam date unset: budget stays zero regardless of the backlog
        prop_assert_eq!(compute_daily_budget(&reloaded, ""), "0分 0秒");
    });
}
