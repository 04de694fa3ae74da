use std::cmp::Ordering;

use crate::duration::{format_duration_clock, parse_duration};
use crate::model::VideoRecord;

/// Filter applied to the table before sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VideoFilter {
    #[default]
    All,
    Completed,
    Incomplete,
}

/// Sortable columns of the video table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    Title,
    Duration,
    Section,
    Subsection,
    Completed,
    /// Creation order via the timestamp id
    #[default]
    Created,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

/// Transient filter/sort selection. Never persisted; always recomputable
/// projections come from the stored collection plus this state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewState {
    pub filter: VideoFilter,
    pub sort_field: SortField,
    pub direction: SortDirection,
}

impl ViewState {
    /// Column-header toggle semantics: re-selecting the current field flips
    /// direction, selecting a new field resets to ascending.
    pub fn toggle_sort(&mut self, field: SortField) {
        if self.sort_field == field {
            self.direction = match self.direction {
                SortDirection::Ascending => SortDirection::Descending,
                SortDirection::Descending => SortDirection::Ascending,
            };
        } else {
            self.sort_field = field;
            self.direction = SortDirection::Ascending;
        }
    }
}

/// Videos of one subsection, in display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubsectionGroup {
    pub subsection: String,
    pub videos: Vec<VideoRecord>,
}

/// Subsections of one section, keyed by first occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionGroup {
    pub section: String,
    pub subsections: Vec<SubsectionGroup>,
}

/// Grouped, ordered projection of the collection for table display.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProjectedView {
    pub sections: Vec<SectionGroup>,
}

impl ProjectedView {
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Total number of leaf records across all groups.
    pub fn record_count(&self) -> usize {
        self.sections
            .iter()
            .flat_map(|section| &section.subsections)
            .map(|subsection| subsection.videos.len())
            .sum()
    }
}

/// Counts and duration sums over the unfiltered collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionSummary {
    pub total_count: usize,
    pub completed_count: usize,
    pub incomplete_count: usize,
    pub total_seconds: u64,
    pub completed_seconds: u64,
    pub incomplete_seconds: u64,
    pub total_clock: String,
    pub completed_clock: String,
    pub incomplete_clock: String,
}

/// Keep the records matching `filter`, preserving input order.
pub fn apply_filter(videos: &[VideoRecord], filter: VideoFilter) -> Vec<VideoRecord> {
    videos
        .iter()
        .filter(|video| match filter {
            VideoFilter::All => true,
            VideoFilter::Completed => video.completed,
            VideoFilter::Incomplete => !video.completed,
        })
        .cloned()
        .collect()
}

// localeCompare stand-in: case-folded first, byte order as a deterministic
// tiebreak so the ordering stays total.
fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

fn compare_by_field(a: &VideoRecord, b: &VideoRecord, field: SortField) -> Ordering {
    match field {
        SortField::Title => compare_text(&a.title, &b.title),
        SortField::Duration => parse_duration(&a.duration).cmp(&parse_duration(&b.duration)),
        SortField::Section => compare_text(&a.section, &b.section),
        SortField::Subsection => compare_text(&a.subsection, &b.subsection),
        // false sorts before true ascending
        SortField::Completed => a.completed.cmp(&b.completed),
        SortField::Created => a.id.cmp(&b.id),
    }
}

/// Stable sort by the chosen field. Descending is the exact reverse of the
/// ascending comparator output.
pub fn sort_videos(
    mut videos: Vec<VideoRecord>,
    field: SortField,
    direction: SortDirection,
) -> Vec<VideoRecord> {
    videos.sort_by(|a, b| {
        let ordering = compare_by_field(a, b, field);
        match direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });
    videos
}

/// Filter, stable-sort, then group into section -> subsection -> records.
///
/// Buckets are keyed by first occurrence in the sorted sequence: a later row
/// whose section appeared earlier joins that earlier bucket. Grouping only
/// shapes the display; it never reorders rows within a leaf list.
pub fn project(videos: &[VideoRecord], state: &ViewState) -> ProjectedView {
    let filtered = apply_filter(videos, state.filter);
    let sorted = sort_videos(filtered, state.sort_field, state.direction);

    let mut sections: Vec<SectionGroup> = Vec::new();
    for video in sorted {
        let section_idx = sections
            .iter()
            .position(|group| group.section == video.section)
            .unwrap_or_else(|| {
                sections.push(SectionGroup {
                    section: video.section.clone(),
                    subsections: Vec::new(),
                });
                sections.len() - 1
            });
        let section = &mut sections[section_idx];

        let subsection_idx = section
            .subsections
            .iter()
            .position(|group| group.subsection == video.subsection)
            .unwrap_or_else(|| {
                section.subsections.push(SubsectionGroup {
                    subsection: video.subsection.clone(),
                    videos: Vec::new(),
                });
                section.subsections.len() - 1
            });

        section.subsections[subsection_idx].videos.push(video);
    }

    ProjectedView { sections }
}

/// Aggregate over the full, unfiltered collection; independent of the
/// current filter and sort.
pub fn summarize(videos: &[VideoRecord]) -> CollectionSummary {
    let total_count = videos.len();
    let completed_count = videos.iter().filter(|video| video.completed).count();
    let incomplete_count = total_count - completed_count;

    let mut completed_seconds = 0u64;
    let mut incomplete_seconds = 0u64;
    for video in videos {
        let seconds = parse_duration(&video.duration);
        if video.completed {
            completed_seconds += seconds;
        } else {
            incomplete_seconds += seconds;
        }
    }
    let total_seconds = completed_seconds + incomplete_seconds;

    CollectionSummary {
        total_count,
        completed_count,
        incomplete_count,
        total_seconds,
        completed_seconds,
        incomplete_seconds,
        total_clock: format_duration_clock(total_seconds),
        completed_clock: format_duration_clock(completed_seconds),
        incomplete_clock: format_duration_clock(incomplete_seconds),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, section: &str, subsection: &str, title: &str, duration: &str) -> VideoRecord {
        VideoRecord {
            id: id.to_string(),
            section: section.to_string(),
            subsection: subsection.to_string(),
            title: title.to_string(),
            duration: duration.to_string(),
            completed: false,
        }
    }

    #[test]
    fn duration_sorts_numerically_not_lexically() {
        let videos = vec![
            record("1", "A", "a", "long", "10:00"),
            record("2", "A", "a", "short", "9:00"),
        ];
        let sorted = sort_videos(videos, SortField::Duration, SortDirection::Ascending);
        assert_eq!(sorted[0].title, "short");
        assert_eq!(sorted[1].title, "long");
    }

    #[test]
    fn toggle_sort_flips_then_resets() {
        let mut state = ViewState::default();
        state.toggle_sort(SortField::Title);
        assert_eq!(state.sort_field, SortField::Title);
        assert_eq!(state.direction, SortDirection::Ascending);

        state.toggle_sort(SortField::Title);
        assert_eq!(state.direction, SortDirection::Descending);

        state.toggle_sort(SortField::Duration);
        assert_eq!(state.sort_field, SortField::Duration);
        assert_eq!(state.direction, SortDirection::Ascending);
    }

    #[test]
    fn grouping_buckets_by_first_occurrence() {
        let videos = vec![
            record("1", "A", "a", "one", "1:00"),
            record("2", "B", "b", "two", "1:00"),
            record("3", "A", "a", "three", "1:00"),
        ];
        let view = project(&videos, &ViewState::default());

        assert_eq!(view.sections.len(), 2);
        assert_eq!(view.sections[0].section, "A");
        assert_eq!(view.sections[0].subsections[0].videos.len(), 2);
        assert_eq!(view.sections[1].section, "B");
        assert_eq!(view.record_count(), 3);
    }

    #[test]
    fn summary_splits_by_completion() {
        let mut videos = vec![
            record("1", "A", "a", "one", "5:30"),
            record("2", "A", "a", "two", "10:00"),
        ];
        videos[0].completed = true;

        let summary = summarize(&videos);
        assert_eq!(summary.total_count, 2);
        assert_eq!(summary.completed_count, 1);
        assert_eq!(summary.incomplete_count, 1);
        assert_eq!(summary.completed_seconds, 330);
        assert_eq!(summary.incomplete_seconds, 600);
        assert_eq!(summary.total_clock, "00:15:30");
    }
}
