// Playback tuning constants in one place.

use std::time::Duration;

/// File extensions the player treats as playable video.
pub const VIDEO_EXTENSIONS: &[&str] = &[
    "mp4", "mkv", "avi", "mov", "wmv", "flv", "webm", "m4v", "mpg", "mpeg", "rmvb", "ts", "m2ts",
    "vob", "m3u8",
];

/// Period at which the embedding event loop is expected to call
/// [`PlaybackSession::tick`](crate::player::PlaybackSession::tick).
pub const TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Automatic intro skipping only fires within this window after playback
/// starts, so a manual rewind into the intro region is never overridden.
pub const INTRO_SKIP_WINDOW: Duration = Duration::from_secs(5);

/// Remaining time below which the video counts as ended.
pub const END_OF_MEDIA_THRESHOLD: Duration = Duration::from_millis(1000);

/// Delay between the end of a video being detected and the next episode
/// starting.
pub const ADVANCE_GRACE: Duration = Duration::from_millis(500);

/// Playback position is persisted once per this much media time.
pub const PROGRESS_SAVE_INTERVAL: Duration = Duration::from_secs(5);

/// Timeout for WebDAV listing requests.
pub const LISTING_TIMEOUT: Duration = Duration::from_secs(30);

/// Timeout for indexer search requests.
pub const SEARCH_TIMEOUT: Duration = Duration::from_secs(10);
