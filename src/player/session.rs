//! The playback session: playlist navigation, skip markers, auto-advance,
//! and resume, driven by a periodic tick against a polled media engine.

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::backends::traits::DirectoryLister;
use crate::backends::webdav::PathResolver;
use crate::config::Config;
use crate::constants::{
    ADVANCE_GRACE, END_OF_MEDIA_THRESHOLD, INTRO_SKIP_WINDOW, PROGRESS_SAVE_INTERVAL,
};
use crate::models::{Entry, Playlist, parent_directory};
use crate::player::traits::MediaPlayer;
use crate::sorter;

/// Transient flags for the currently loaded video, reset wholesale on every
/// load so nothing leaks from one episode into the next.
#[derive(Debug, Default)]
struct VideoRuntime {
    intro_skipped: bool,
    outro_skipped: bool,
    video_ended: bool,
    pending_resume: Option<Duration>,
    advance_at: Option<Instant>,
}

impl VideoRuntime {
    fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Stateful controller coordinating the playlist, the skip markers, and the
/// persisted resume state against an external media engine.
///
/// The session assumes single-writer access: the embedding event loop must
/// never run [`tick`](Self::tick) concurrently with itself or with a
/// navigation call. No collaborator failure inside a tick ever escapes it;
/// the polling loop cannot be halted by a flaky server or engine.
pub struct PlaybackSession {
    player: Arc<dyn MediaPlayer>,
    lister: Arc<dyn DirectoryLister>,
    resolver: PathResolver,
    config: Config,
    playlist: Playlist,
    runtime: VideoRuntime,
    restored: bool,
    progress_bucket: Option<u64>,
}

impl PlaybackSession {
    pub fn new(
        player: Arc<dyn MediaPlayer>,
        lister: Arc<dyn DirectoryLister>,
        resolver: PathResolver,
        config: Config,
    ) -> Self {
        Self {
            player,
            lister,
            resolver,
            config,
            playlist: Playlist::default(),
            runtime: VideoRuntime::default(),
            restored: false,
            progress_bucket: None,
        }
    }

    pub fn playlist(&self) -> &Playlist {
        &self.playlist
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Start playing an entry, optionally resuming at a saved position. The
    /// per-video runtime flags are reset and the entry becomes the persisted
    /// last-played path.
    pub async fn load_video(&mut self, entry: &Entry, resume: Option<Duration>) -> Result<()> {
        let url = self.resolver.stream_url(&entry.path)?;

        self.runtime.reset();
        self.progress_bucket = None;

        self.player
            .load_media(&url)
            .await
            .context("media engine refused the stream")?;
        self.player
            .play()
            .await
            .context("media engine failed to start playback")?;
        info!("Playing {}", entry.name());

        self.config.last_played_path = Some(entry.path.clone());
        if let Err(e) = self.config.save() {
            warn!("failed to persist last played path: {e:#}");
        }

        if let Some(resume) = resume.filter(|r| !r.is_zero()) {
            self.runtime.pending_resume = Some(resume);
            let intro = Duration::from_secs(self.config.skip_intro);
            if !intro.is_zero() && resume >= intro {
                // The restored position is already past the intro; skipping
                // now would yank the seek forward a second time.
                self.runtime.intro_skipped = true;
            }
            debug!("Pending resume at {}ms", resume.as_millis());
        }

        Ok(())
    }

    /// Build a playlist from a directory listing and play the selected file:
    /// video files in episode order, or the selection alone when it is not
    /// part of the listing (a search hit, say).
    pub async fn play_from_listing(&mut self, listing: Vec<Entry>, selected: &Entry) -> Result<()> {
        let files = sorter::sort_files(listing.into_iter().filter(|e| e.is_video()).collect());
        self.playlist = match files.iter().position(|f| f.path == selected.path) {
            Some(index) => Playlist::new(files, Some(index)),
            None => Playlist::new(vec![selected.clone()], Some(0)),
        };
        self.load_video(selected, None).await
    }

    /// Move to the next playlist entry; silently stays put at the end.
    pub async fn advance_to_next(&mut self) {
        let next = self.playlist.advance().cloned();
        if let Some(entry) = next {
            info!("Advancing to next episode");
            if let Err(e) = self.load_video(&entry, None).await {
                warn!("failed to start next episode {:?}: {e:#}", entry.path);
            }
        }
    }

    /// Move to the previous playlist entry; silently stays put at the start.
    pub async fn advance_to_previous(&mut self) {
        let previous = self.playlist.retreat().cloned();
        if let Some(entry) = previous {
            info!("Returning to previous episode");
            if let Err(e) = self.load_video(&entry, None).await {
                warn!("failed to start previous episode {:?}: {e:#}", entry.path);
            }
        }
    }

    /// Capture the current position as the global intro marker. Returns the
    /// captured seconds, or `None` when the engine's clock is not usable yet.
    pub async fn set_intro_marker(&mut self) -> Option<u64> {
        let position = self.player.position().await?;
        let seconds = position.as_secs();
        if seconds == 0 {
            return None;
        }
        self.config.skip_intro = seconds;
        self.persist_markers();
        info!("Intro marker set to {seconds}s");
        Some(seconds)
    }

    /// Capture the remaining time as the global outro marker. Returns the
    /// captured seconds, or `None` when position or duration are unknown.
    pub async fn set_outro_marker(&mut self) -> Option<u64> {
        let duration = self.player.duration().await.filter(|d| !d.is_zero())?;
        let position = self.player.position().await.filter(|p| !p.is_zero())?;
        let seconds = duration.saturating_sub(position).as_secs();
        if seconds == 0 {
            return None;
        }
        self.config.skip_outro = seconds;
        self.persist_markers();
        info!("Outro marker set to {seconds}s");
        Some(seconds)
    }

    pub fn clear_intro_marker(&mut self) {
        self.config.skip_intro = 0;
        self.persist_markers();
        info!("Intro marker cleared");
    }

    pub fn clear_outro_marker(&mut self) {
        self.config.skip_outro = 0;
        self.persist_markers();
        info!("Outro marker cleared");
    }

    fn persist_markers(&self) {
        if let Err(e) = self.config.save() {
            warn!("failed to persist skip markers: {e:#}");
        }
    }

    /// Pause when playing. When idle with nothing queued and history not yet
    /// restored, the first play request restores the previous session
    /// instead of resuming silence.
    pub async fn toggle_play(&mut self) {
        if self.player.is_playing().await {
            if let Err(e) = self.player.pause().await {
                warn!("pause failed: {e:#}");
            }
            return;
        }
        if !self.restored && self.playlist.is_empty() {
            self.restore_from_history().await;
            return;
        }
        if let Err(e) = self.player.play().await {
            warn!("play failed: {e:#}");
        }
    }

    pub async fn stop(&self) {
        if let Err(e) = self.player.stop().await {
            warn!("stop failed: {e:#}");
        }
    }

    /// Pick up where the previous process left off: rebuild the playlist
    /// from the last played file's directory and resume at the saved
    /// position. Runs at most once per session; a missing file or an
    /// unreachable directory is a silent no-op, since a fresh install has no
    /// history to restore.
    pub async fn restore_from_history(&mut self) {
        if self.restored {
            return;
        }
        self.restored = true;

        let Some(last_path) = self.config.last_played_path.clone() else {
            debug!("No playback history to restore");
            return;
        };
        let resume = Duration::from_millis(self.config.last_played_time);

        let parent = parent_directory(&last_path);
        let listing = self.lister.list(&parent).await;
        if listing.is_empty() {
            debug!("History directory {parent:?} is empty or gone, not restoring");
            return;
        }

        let files = sorter::sort_files(listing.into_iter().filter(|e| e.is_video()).collect());
        let Some(index) = files.iter().position(|f| f.path == last_path) else {
            debug!("Last played file {last_path:?} is no longer listed, not restoring");
            return;
        };

        self.playlist = Playlist::new(files, Some(index));
        let Some(entry) = self.playlist.current().cloned() else {
            return;
        };
        info!("Restoring {} at {}ms", entry.name(), resume.as_millis());
        if let Err(e) = self.load_video(&entry, Some(resume)).await {
            warn!("failed to restore playback history: {e:#}");
        }
    }

    /// Persist the final position on clean shutdown.
    pub async fn shutdown(&mut self) {
        if self.player.is_playing().await {
            if let Some(position) = self.player.position().await {
                self.config.last_played_time = position.as_millis() as u64;
            }
        }
        if let Err(e) = self.config.save() {
            warn!("failed to persist final playback state: {e:#}");
        }
    }

    /// One poll of the engine clock, expected every
    /// [`TICK_INTERVAL`](crate::constants::TICK_INTERVAL) while playing.
    /// Reads a single snapshot of the engine state, then applies, in order:
    /// the pending resume seek, the intro skip, the outro skip, end-of-media
    /// auto-advance, and the periodic position save. At most one advance can
    /// happen per loaded video: the method returns right after triggering
    /// one, so the remaining rules never act on a stale snapshot.
    pub async fn tick(&mut self) {
        if !self.player.is_playing().await {
            return;
        }
        let (Some(duration), Some(position)) =
            (self.player.duration().await, self.player.position().await)
        else {
            return;
        };
        if duration.is_zero() {
            // The engine has not worked the media out yet; retry next tick.
            return;
        }

        // Applied lazily here rather than at load time because seeking is
        // only reliable once the duration is known.
        if let Some(resume) = self.runtime.pending_resume.take() {
            debug!("Applying resume seek to {}ms", resume.as_millis());
            if let Err(e) = self.player.seek(resume).await {
                warn!("resume seek failed: {e:#}");
            }
        }

        let intro = Duration::from_secs(self.config.skip_intro);
        if !intro.is_zero()
            && !self.runtime.intro_skipped
            && position < INTRO_SKIP_WINDOW
            && position < intro
        {
            // Only during the opening seconds of playback; a later manual
            // rewind into the intro region stays where the user put it.
            info!("Skipping intro ({}s)", self.config.skip_intro);
            if let Err(e) = self.player.seek(intro).await {
                warn!("intro skip seek failed: {e:#}");
            }
            self.runtime.intro_skipped = true;
        }

        let remaining = duration.saturating_sub(position);

        let outro = Duration::from_secs(self.config.skip_outro);
        if !outro.is_zero() && !self.runtime.outro_skipped && remaining < outro {
            // Marked before acting so the window can never fire twice.
            self.runtime.outro_skipped = true;
            info!("Skipping outro ({}s)", self.config.skip_outro);
            self.advance_to_next().await;
            return;
        }

        if !self.runtime.video_ended && remaining < END_OF_MEDIA_THRESHOLD {
            self.runtime.video_ended = true;
            if self.playlist.has_next() {
                self.runtime.advance_at = Some(Instant::now() + ADVANCE_GRACE);
            }
        }
        if let Some(advance_at) = self.runtime.advance_at {
            if Instant::now() >= advance_at {
                self.runtime.advance_at = None;
                self.advance_to_next().await;
                return;
            }
        }

        let bucket = position.as_secs() / PROGRESS_SAVE_INTERVAL.as_secs();
        if self.progress_bucket != Some(bucket) {
            self.progress_bucket = Some(bucket);
            self.config.last_played_time = position.as_millis() as u64;
            if let Err(e) = self.config.save() {
                warn!("failed to persist playback position: {e:#}");
            }
        }
    }
}
