//! Text-buffer collaborator contract.
//!
//! The editing widget is external; `TextBuffer` is the slice of it the session
//! logic needs. `MemoryBuffer` backs headless hosts and tests.

pub trait TextBuffer {
    /// Fresh buffer holding `text`. Construction is not a content change.
    fn with_text(text: &str) -> Self
    where
        Self: Sized;

    fn text(&self) -> String;

    fn set_read_only(&mut self, read_only: bool);

    fn is_read_only(&self) -> bool;

    /// Move the cursor to the start of 1-based `line`.
    fn goto_line(&mut self, line: u32);

    /// 1-based line the cursor is on.
    fn cursor_line(&self) -> u32;

    /// Revert the last edit. Returns `false` when there was nothing to undo.
    fn undo(&mut self) -> bool;
}

#[derive(Debug, Clone, Default)]
pub struct MemoryBuffer {
    text: String,
    read_only: bool,
    cursor: usize,
    undo_stack: Vec<String>,
}

impl MemoryBuffer {
    /// Replace the whole text. No-op on read-only buffers.
    pub fn set_text(&mut self, text: &str) -> bool {
        if self.read_only {
            return false;
        }
        let previous = std::mem::replace(&mut self.text, text.to_string());
        self.undo_stack.push(previous);
        self.clamp_cursor();
        true
    }

    /// Insert at the cursor and move the cursor past the inserted text.
    pub fn insert_at_cursor(&mut self, text: &str) -> bool {
        if self.read_only {
            return false;
        }
        self.undo_stack.push(self.text.clone());
        self.text.insert_str(self.cursor, text);
        self.cursor += text.len();
        true
    }

    fn clamp_cursor(&mut self) {
        self.cursor = self.cursor.min(self.text.len());
        if !self.text.is_char_boundary(self.cursor) {
            self.cursor = 0;
        }
    }

    fn line_count(&self) -> u32 {
        let lines = self.text.split('\n').count();
        u32::try_from(lines).unwrap_or(u32::MAX)
    }

    /// Byte offset of the start of 1-based `line`, clamped to the last line.
    fn line_start(&self, line: u32) -> usize {
        let target = line.clamp(1, self.line_count()) as usize;
        if target == 1 {
            return 0;
        }
        self.text
            .match_indices('\n')
            .nth(target - 2)
            .map(|(i, _)| i + 1)
            .unwrap_or(0)
    }
}

impl TextBuffer for MemoryBuffer {
    fn with_text(text: &str) -> Self {
        MemoryBuffer {
            text: text.to_string(),
            ..Self::default()
        }
    }

    fn text(&self) -> String {
        self.text.clone()
    }

    fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    fn is_read_only(&self) -> bool {
        self.read_only
    }

    fn goto_line(&mut self, line: u32) {
        self.cursor = self.line_start(line);
    }

    fn cursor_line(&self) -> u32 {
        let before = &self.text[..self.cursor];
        let newlines = before.matches('\n').count() + 1;
        u32::try_from(newlines).unwrap_or(u32::MAX)
    }

    fn undo(&mut self) -> bool {
        if self.read_only {
            return false;
        }
        match self.undo_stack.pop() {
            Some(previous) => {
                self.text = previous;
                self.clamp_cursor();
                true
            }
            None => false,
        }
    }
}
