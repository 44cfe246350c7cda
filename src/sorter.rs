//! Episode ordering for unordered directory listings.
//!
//! Server listings carry no trustworthy episode metadata, so playback order
//! is derived from file names alone, with tiered pattern matching: an
//! `SxxExx` tag wins over a `第N集` tag, which wins over the last number left
//! in the name after stripping years and resolution tags, which wins over a
//! plain lexicographic fallback.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::Entry;

static SEASON_EPISODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)S(\d+)E(\d+)").expect("valid pattern"));
static NUMBERED_EPISODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"第(\d+)集").expect("valid pattern"));
static YEAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"(19|20)\d{2}").expect("valid pattern"));
static RESOLUTION: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d{3,4}p").expect("valid pattern"));
static DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").expect("valid pattern"));

/// Composite ordering key. Variant declaration order is the tier order, so
/// the derived `Ord` guarantees an earlier tier always sorts first no matter
/// the numeric values inside.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum SortKey {
    SeasonEpisode(u64, u64),
    NumberedEpisode(u64),
    TrailingNumber(u64),
    Name(String),
}

fn sort_key(name: &str) -> SortKey {
    if let Some(caps) = SEASON_EPISODE.captures(name) {
        if let (Ok(season), Ok(episode)) = (caps[1].parse(), caps[2].parse()) {
            return SortKey::SeasonEpisode(season, episode);
        }
    }

    if let Some(caps) = NUMBERED_EPISODE.captures(name) {
        if let Ok(episode) = caps[1].parse() {
            return SortKey::NumberedEpisode(episode);
        }
    }

    // Work on the name without its extension, with year-like runs (19xx/20xx)
    // and resolution tags (720p, 1080p, ...) removed so they are not mistaken
    // for episode numbers.
    let base = name.rsplit_once('.').map(|(base, _)| base).unwrap_or(name);
    let cleaned = YEAR.replace_all(base, "");
    let cleaned = RESOLUTION.replace_all(&cleaned, "");
    if let Some(last) = DIGITS.find_iter(&cleaned).last() {
        if let Ok(number) = last.as_str().parse() {
            return SortKey::TrailingNumber(number);
        }
    }

    SortKey::Name(name.to_string())
}

/// Stable-sort file entries into playback order.
pub fn sort_files(mut files: Vec<Entry>) -> Vec<Entry> {
    files.sort_by_cached_key(|entry| sort_key(&entry.path));
    files
}

/// Split a raw listing into the order a directory view presents: directories
/// first, sorted by path, then playable video files in episode order.
/// Non-video files are dropped.
pub fn partition_listing(entries: Vec<Entry>) -> (Vec<Entry>, Vec<Entry>) {
    let (mut dirs, files): (Vec<_>, Vec<_>) =
        entries.into_iter().partition(|entry| entry.is_directory());
    dirs.sort_by(|a, b| a.path.cmp(&b.path));
    let files = sort_files(files.into_iter().filter(|f| f.is_video()).collect());
    (dirs, files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EntryKind;

    fn files(names: &[&str]) -> Vec<Entry> {
        names.iter().map(|name| Entry::file(*name)).collect()
    }

    fn paths(entries: &[Entry]) -> Vec<&str> {
        entries.iter().map(|e| e.path.as_str()).collect()
    }

    #[test]
    fn season_episode_orders_numerically() {
        let sorted = sort_files(files(&["ep.S01E10.mp4", "ep.S01E2.mp4", "ep.S01E1.mp4"]));
        assert_eq!(paths(&sorted), ["ep.S01E1.mp4", "ep.S01E2.mp4", "ep.S01E10.mp4"]);
    }

    #[test]
    fn season_takes_precedence_over_episode() {
        let sorted = sort_files(files(&["x.S02E01.mkv", "x.S01E99.mkv", "x.s01e03.mkv"]));
        assert_eq!(paths(&sorted), ["x.s01e03.mkv", "x.S01E99.mkv", "x.S02E01.mkv"]);
    }

    #[test]
    fn tier_precedence_is_absolute() {
        let sorted = sort_files(files(&["trailing 1.mp4", "第3集.mp4", "a.S01E02.mp4"]));
        assert_eq!(paths(&sorted), ["a.S01E02.mp4", "第3集.mp4", "trailing 1.mp4"]);
    }

    #[test]
    fn chinese_episode_numbers_order_numerically() {
        let sorted = sort_files(files(&["完美世界 第10集.mp4", "完美世界 第2集.mp4", "完美世界 第1集.mp4"]));
        assert_eq!(
            paths(&sorted),
            ["完美世界 第1集.mp4", "完美世界 第2集.mp4", "完美世界 第10集.mp4"]
        );
    }

    #[test]
    fn year_is_not_an_episode_number() {
        let sorted = sort_files(files(&["Movie 2021.mp4", "Show 11.mp4", "Show 2.mp4"]));
        // "Movie 2021" loses its only digits to year stripping and falls back
        // to the lexicographic tier, behind every numbered entry.
        assert_eq!(paths(&sorted), ["Show 2.mp4", "Show 11.mp4", "Movie 2021.mp4"]);
    }

    #[test]
    fn resolution_tags_are_ignored() {
        let sorted = sort_files(files(&["Show 1080p 11.mp4", "Show 720p 2.mp4"]));
        assert_eq!(paths(&sorted), ["Show 720p 2.mp4", "Show 1080p 11.mp4"]);
    }

    #[test]
    fn names_without_digits_sort_lexicographically() {
        let sorted = sort_files(files(&["beta.mp4", "alpha.mp4"]));
        assert_eq!(paths(&sorted), ["alpha.mp4", "beta.mp4"]);
    }

    #[test]
    fn sorting_is_idempotent() {
        let once = sort_files(files(&[
            "完美世界 - S01E100 - 第100集.mp4",
            "完美世界 - S01E2 - 第2集.mp4",
            "One Piece 11.mp4",
            "One Piece 2.mp4",
            "2021 Movie.mp4",
        ]));
        let twice = sort_files(once.clone());
        assert_eq!(paths(&once), paths(&twice));
    }

    #[test]
    fn huge_digit_runs_fall_back_instead_of_panicking() {
        let sorted = sort_files(files(&["x99999999999999999999999999999.mp4", "x1.mp4"]));
        assert_eq!(paths(&sorted), ["x1.mp4", "x99999999999999999999999999999.mp4"]);
    }

    #[test]
    fn partition_puts_sorted_directories_before_episodes() {
        let (dirs, files) = partition_listing(vec![
            Entry::file("/show/e2.mp4"),
            Entry::directory("/show/extras"),
            Entry::file("/show/notes.txt"),
            Entry::directory("/show/bonus"),
            Entry::file("/show/e10.mp4"),
        ]);
        assert_eq!(paths(&dirs), ["/show/bonus", "/show/extras"]);
        assert!(dirs.iter().all(|d| d.kind == EntryKind::Directory));
        assert_eq!(paths(&files), ["/show/e2.mp4", "/show/e10.mp4"]);
    }
}
