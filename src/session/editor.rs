//! One open source buffer plus the bookkeeping around it.

use super::backend::FileEntry;
use super::buffer::{MemoryBuffer, TextBuffer};
use crate::error::UserInputError;

/// State of one editable (or read-only) source buffer.
///
/// Created once and re-initialized on every load; the buffer is replaced,
/// never merged.
#[derive(Debug)]
pub struct EditorSession<T = MemoryBuffer> {
    buffer: T,
    mro_path: String,
    fname: String,
    dirty: bool,
    read_only: bool,
    has_file: bool,
}

impl<T: TextBuffer> EditorSession<T> {
    /// Editable session showing `placeholder` until a file is loaded.
    pub fn editable(mro_path: &str, placeholder: &str) -> Self {
        EditorSession {
            buffer: T::with_text(""),
            mro_path: mro_path.to_string(),
            fname: placeholder.to_string(),
            dirty: false,
            read_only: false,
            has_file: false,
        }
    }

    /// Companion session: never dirty, never saved.
    pub fn read_only() -> Self {
        let mut buffer = T::with_text("");
        buffer.set_read_only(true);
        EditorSession {
            buffer,
            mro_path: String::new(),
            fname: String::new(),
            dirty: false,
            read_only: true,
            has_file: false,
        }
    }

    /// Swap in a fresh buffer holding `contents` and point the session at `mro_path/fname`.
    pub fn init(&mut self, mro_path: &str, fname: &str, contents: &str) {
        let mut buffer = T::with_text(contents);
        buffer.set_read_only(self.read_only);
        self.buffer = buffer;
        self.dirty = false;
        self.mro_path = mro_path.to_string();
        self.fname = fname.to_string();
        self.has_file = true;
    }

    /// Empty buffer, no file.
    pub fn reset(&mut self) {
        self.init("", "", "");
        self.has_file = false;
    }

    /// Content-change notification from the editing widget.
    pub fn content_changed(&mut self) {
        if !self.read_only {
            self.dirty = true;
        }
    }

    /// Apply a local edit to the buffer and mark the session dirty.
    pub fn edit<R>(&mut self, f: impl FnOnce(&mut T) -> R) -> Result<R, UserInputError> {
        if self.read_only {
            return Err(UserInputError::ReadOnly(self.fname.clone()));
        }
        let out = f(&mut self.buffer);
        self.content_changed();
        Ok(out)
    }

    pub fn undo(&mut self) -> bool {
        let undone = self.buffer.undo();
        if undone {
            self.content_changed();
        }
        undone
    }

    pub fn goto_line(&mut self, line: u32) {
        self.buffer.goto_line(line);
    }

    pub(crate) fn set_dirty(&mut self, dirty: bool) {
        self.dirty = dirty && !self.read_only;
    }

    pub fn text(&self) -> String {
        self.buffer.text()
    }

    pub fn buffer(&self) -> &T {
        &self.buffer
    }

    pub fn mro_path(&self) -> &str {
        &self.mro_path
    }

    pub fn fname(&self) -> &str {
        &self.fname
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// True once a real file (loaded or newly created) backs the session.
    pub fn has_file(&self) -> bool {
        self.has_file
    }

    pub fn can_save(&self) -> bool {
        self.has_file && !self.read_only
    }

    pub fn file(&self) -> Option<FileEntry> {
        self.has_file
            .then(|| FileEntry::new(self.mro_path.clone(), self.fname.clone()))
    }
}
