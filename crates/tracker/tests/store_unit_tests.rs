use std::fs;
use tempfile::TempDir;
use vidpace_tracker::model::VideoRecord;
use vidpace_tracker::store::{LocalStore, EXAM_DATE_FILE, VIDEO_DATA_FILE};

fn video(id: &str, completed: bool) -> VideoRecord {
    VideoRecord {
        id: id.to_string(),
        section: "第1章".to_string(),
        subsection: "1-2".to_string(),
        title: "心電図の読み方".to_string(),
        duration: "12:05".to_string(),
        completed,
    }
}

#[test]
fn videos_round_trip_through_the_store() {
    let temp_dir = TempDir::new().unwrap();
    let store = LocalStore::new(temp_dir.path());

    let videos = vec![video("1700000000000", false), video("1700000000001", true)];
    store.save_videos(&videos);

    assert_eq!(store.load_videos(), videos);
}

#[test]
fn missing_slots_load_as_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let store = LocalStore::new(temp_dir.path().join("never-created"));

    assert!(store.load_videos().is_empty());
    assert_eq!(store.load_exam_date(), "");
}

#[test]
fn corrupt_video_data_loads_as_empty() {
    let temp_dir = TempDir::new().unwrap();
    let store = LocalStore::new(temp_dir.path());

    fs::write(temp_dir.path().join(VIDEO_DATA_FILE), "{not json]").unwrap();

    assert!(store.load_videos().is_empty());
}

#[test]
fn exam_date_round_trips_and_trims() {
    let temp_dir = TempDir::new().unwrap();
    let store = LocalStore::new(temp_dir.path());

    store.save_exam_date("2026-09-15");
    assert_eq!(store.load_exam_date(), "2026-09-15");

    // A trailing newline from hand-editing the slot is tolerated
    fs::write(temp_dir.path().join(EXAM_DATE_FILE), "2026-09-16\n").unwrap();
    assert_eq!(store.load_exam_date(), "2026-09-16");
}

#[test]
fn save_creates_the_data_dir() {
    let temp_dir = TempDir::new().unwrap();
    let nested = temp_dir.path().join("a").join("b");
    let store = LocalStore::new(&nested);

    store.save_videos(&[video("1", false)]);

    assert!(nested.join(VIDEO_DATA_FILE).exists());
    assert_eq!(store.load_videos().len(), 1);
}

#[test]
fn writes_leave_no_temp_files_behind() {
    let temp_dir = TempDir::new().unwrap();
    let store = LocalStore::new(temp_dir.path());

    store.save_videos(&[video("1", false)]);
    store.save_exam_date("2026-09-15");

    let leftovers: Vec<_> = fs::read_dir(temp_dir.path())
        .unwrap()
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry
                .path()
                .extension()
                .is_some_and(|ext| ext == "tmp")
        })
        .collect();
    assert!(leftovers.is_empty());
}

#[test]
fn persisted_field_names_match_the_original_schema() {
    let temp_dir = TempDir::new().unwrap();
    let store = LocalStore::new(temp_dir.path());

    store.save_videos(&[video("1700000000000", true)]);

    let raw = fs::read_to_string(temp_dir.path().join(VIDEO_DATA_FILE)).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let first = &parsed.as_array().unwrap()[0];

    for key in ["id", "section", "subsection", "title", "duration", "completed"] {
        assert!(first.get(key).is_some(), "missing key {:?}", key);
    }
}
