//! Core engine for a WebDAV binge-watching video player.
//!
//! The crate owns the decision logic of the player — episode ordering,
//! authenticated stream-URL construction, and the playback session with its
//! skip-intro/skip-outro, auto-advance and resume behavior — and talks to
//! the outside world through narrow seams: a [`MediaPlayer`] trait for the
//! embedded engine and listing/search traits for the server. A GUI (or the
//! bundled CLI) supplies the event loop and drives
//! [`PlaybackSession::tick`](player::PlaybackSession::tick).

pub mod backends;
pub mod config;
pub mod constants;
pub mod errors;
pub mod models;
pub mod player;
pub mod sorter;

pub use backends::webdav::PathResolver;
pub use backends::{DirectoryLister, SearchClient, SearchProvider, WebDavClient};
pub use config::Config;
pub use errors::ConfigurationError;
pub use models::{Entry, EntryKind, Playlist};
pub use player::{MediaPlayer, PlaybackSession};
