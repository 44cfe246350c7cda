use serde::{Deserialize, Serialize};

use crate::constants::VIDEO_EXTENSIONS;

/// Kind of filesystem node a WebDAV listing reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Directory,
}

/// One node from a directory listing. Paths are server-relative and stored
/// percent-decoded; size and modification time are passed through from the
/// server without interpretation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub path: String,
    pub kind: EntryKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified: Option<String>,
}

impl Entry {
    pub fn file(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: EntryKind::File,
            size: None,
            modified: None,
        }
    }

    pub fn directory(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: EntryKind::Directory,
            size: None,
            modified: None,
        }
    }

    pub fn is_directory(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    /// Final path component, with any trailing slash ignored.
    pub fn name(&self) -> &str {
        let trimmed = self.path.trim_end_matches('/');
        trimmed.rsplit('/').next().unwrap_or(trimmed)
    }

    /// Whether the entry is a file with a playable video extension.
    pub fn is_video(&self) -> bool {
        if self.kind != EntryKind::File {
            return false;
        }
        match self.name().rsplit_once('.') {
            Some((_, ext)) => {
                let ext = ext.to_ascii_lowercase();
                VIDEO_EXTENSIONS.iter().any(|v| *v == ext)
            }
            None => false,
        }
    }
}

/// Parent directory of a server-relative path, always rooted: the parent of
/// `/Movies/a.mp4` is `/Movies`, the parent of `/a.mp4` is `/`.
pub fn parent_directory(path: &str) -> String {
    let mut parts: Vec<&str> = path.trim_matches('/').split('/').collect();
    parts.pop();
    if parts.is_empty() {
        "/".to_string()
    } else {
        format!("/{}", parts.join("/"))
    }
}

/// Ordered sequence of playable entries plus a cursor. Rebuilt on every
/// navigation; never contains directory entries, and the cursor is either a
/// valid index or `None`.
#[derive(Debug, Clone, Default)]
pub struct Playlist {
    entries: Vec<Entry>,
    current: Option<usize>,
}

impl Playlist {
    /// Build a playlist from already-ordered file entries. Directory entries
    /// are discarded and an out-of-range selection becomes `None`.
    pub fn new(entries: Vec<Entry>, current: Option<usize>) -> Self {
        let entries: Vec<Entry> = entries.into_iter().filter(|e| !e.is_directory()).collect();
        let current = current.filter(|&i| i < entries.len());
        Self { entries, current }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current(&self) -> Option<&Entry> {
        self.current.and_then(|i| self.entries.get(i))
    }

    pub fn position_of(&self, path: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.path == path)
    }

    pub fn has_next(&self) -> bool {
        matches!(self.current, Some(i) if i + 1 < self.entries.len())
    }

    pub fn has_previous(&self) -> bool {
        matches!(self.current, Some(i) if i > 0)
    }

    /// Move the cursor forward and return the new current entry, or `None`
    /// without moving when already at the end (or empty).
    pub fn advance(&mut self) -> Option<&Entry> {
        match self.current {
            Some(i) if i + 1 < self.entries.len() => {
                self.current = Some(i + 1);
                self.entries.get(i + 1)
            }
            _ => None,
        }
    }

    /// Move the cursor back and return the new current entry, or `None`
    /// without moving when already at the start (or empty).
    pub fn retreat(&mut self) -> Option<&Entry> {
        match self.current {
            Some(i) if i > 0 => {
                self.current = Some(i - 1);
                self.entries.get(i - 1)
            }
            _ => None,
        }
    }
}
