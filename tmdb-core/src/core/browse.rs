use std::path::{Path, PathBuf};

/// Cursor over the pictures downloaded during this run.
///
/// Right after a download the cursor sits one past the end, so the first
/// `previous()` lands on the newest picture. Navigation keeps the cursor
/// within `[0, len - 1]` and recomputes both control states from that range.
#[derive(Debug, Clone, Default)]
pub struct BrowseState {
    pictures: Vec<PathBuf>,
    cursor: usize,
    displayed: Option<usize>,
    next_enabled: bool,
    previous_enabled: bool,
}

impl BrowseState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_download(&mut self, path: PathBuf) {
        self.pictures.push(path);
        self.cursor = self.pictures.len();
        if self.pictures.is_empty() {
            self.next_enabled = false;
            self.previous_enabled = false;
        } else {
            self.next_enabled = true;
            self.previous_enabled = true;
            self.displayed = Some(0);
        }
    }

    /// Moves forward; returns the newly displayed picture if the cursor moved.
    pub fn next(&mut self) -> Option<&Path> {
        let moved = if self.cursor + 1 < self.pictures.len() {
            self.cursor += 1;
            self.displayed = Some(self.cursor);
            true
        } else {
            false
        };
        self.refresh_controls();
        if moved {
            self.current()
        } else {
            None
        }
    }

    pub fn previous(&mut self) -> Option<&Path> {
        let moved = if self.cursor > 0 && !self.pictures.is_empty() {
            self.cursor = self.cursor.min(self.pictures.len()) - 1;
            self.displayed = Some(self.cursor);
            true
        } else {
            false
        };
        self.refresh_controls();
        if moved {
            self.current()
        } else {
            None
        }
    }

    fn refresh_controls(&mut self) {
        if self.pictures.is_empty() {
            self.next_enabled = false;
            self.previous_enabled = false;
            return;
        }
        let position = self.cursor.min(self.pictures.len() - 1);
        self.next_enabled = position + 1 < self.pictures.len();
        self.previous_enabled = position > 0 || self.cursor > position;
    }

    pub fn current(&self) -> Option<&Path> {
        self.displayed
            .and_then(|i| self.pictures.get(i))
            .map(PathBuf::as_path)
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.pictures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pictures.is_empty()
    }

    pub fn can_next(&self) -> bool {
        self.next_enabled
    }

    pub fn can_previous(&self) -> bool {
        self.previous_enabled
    }
}
