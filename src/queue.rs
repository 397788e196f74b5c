//! The pending-file queue and its cursor.
//!
//! The queue holds bare file names (not paths) from the input directory in
//! lexicographic order. Exactly one of them is "current": the one shown on
//! the page and the one the next rename, append or trash consumes.
//!
//! Cursor rules:
//! * non-empty queue: `cursor < len`
//! * empty queue: there is no position
//! * consuming the current item leaves the cursor on the item that followed
//!   it, or on the new last item when the consumed one was last

/// Ordered list of pending PDF file names with a cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingQueue {
    files: Vec<String>,
    cursor: usize,
}

impl PendingQueue {
    /// Build a queue positioned on the first file. Input is sorted and
    /// de-duplicated.
    pub fn new(mut files: Vec<String>) -> Self {
        files.sort();
        files.dedup();
        Self { files, cursor: 0 }
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn files(&self) -> &[String] {
        &self.files
    }

    /// The current file name, or `None` when the queue is empty.
    pub fn current(&self) -> Option<&str> {
        self.files.get(self.cursor).map(String::as_str)
    }

    /// Zero-based cursor position, or `None` when the queue is empty.
    pub fn position(&self) -> Option<usize> {
        if self.files.is_empty() {
            None
        } else {
            Some(self.cursor)
        }
    }

    /// Move to the next file. Returns `false` when already on the last one.
    pub fn advance(&mut self) -> bool {
        if self.cursor + 1 < self.files.len() {
            self.cursor += 1;
            true
        } else {
            false
        }
    }

    /// Move to the previous file. Returns `false` when already on the first.
    pub fn retreat(&mut self) -> bool {
        if self.cursor > 0 && !self.files.is_empty() {
            self.cursor -= 1;
            true
        } else {
            false
        }
    }

    /// Remove and return the current file.
    pub fn take_current(&mut self) -> Option<String> {
        if self.files.is_empty() {
            return None;
        }
        let taken = self.files.remove(self.cursor);
        if self.cursor >= self.files.len() && self.cursor > 0 {
            self.cursor -= 1;
        }
        Some(taken)
    }

    /// Swap in a fresh listing, staying on the same file when it survived.
    ///
    /// When the current file vanished, the cursor lands on the first file
    /// sorting after it (clamped to the end).
    pub fn replace(&mut self, files: Vec<String>) {
        let previous = self.current().map(str::to_owned);
        *self = Self::new(files);
        if let Some(prev) = previous {
            let idx = match self.files.binary_search(&prev) {
                Ok(i) | Err(i) => i,
            };
            self.cursor = idx.min(self.files.len().saturating_sub(1));
        }
    }
}
