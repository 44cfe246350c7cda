use anyhow::Result;
use async_trait::async_trait;
use std::time::Duration;

/// The narrow contract the embedded media engine has to satisfy. The engine
/// offers no progress callbacks, so the session polls it; everything the
/// session ever reads or commands goes through these eight operations.
#[async_trait]
pub trait MediaPlayer: Send + Sync {
    /// Open a stream URL and begin buffering it.
    async fn load_media(&self, url: &str) -> Result<()>;

    async fn play(&self) -> Result<()>;

    async fn pause(&self) -> Result<()>;

    async fn stop(&self) -> Result<()>;

    async fn seek(&self, position: Duration) -> Result<()>;

    /// Current playback position, if the engine knows it yet.
    async fn position(&self) -> Option<Duration>;

    /// Total duration. `None` or zero means the media is still opening.
    async fn duration(&self) -> Option<Duration>;

    async fn is_playing(&self) -> bool;
}
