//! Session history.

/// The browser history API as seen by the navigator.
pub trait History {
    /// Href of the active entry.
    fn current(&self) -> Option<&str>;

    /// Add an entry after the active one, dropping any forward entries.
    fn push(&mut self, href: String);

    /// Overwrite the active entry.
    fn replace(&mut self, href: String);

    /// Move by `delta` entries. Returns the new active href, or `None`
    /// (without moving) when the move would leave the history.
    fn go(&mut self, delta: isize) -> Option<&str>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// In-process history backed by a vector and a cursor.
#[derive(Debug, Clone, Default)]
pub struct MemoryHistory {
    entries: Vec<String>,
    cursor: usize,
}

impl MemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// History already positioned on `href`, like a freshly opened tab.
    pub fn starting_at(href: impl Into<String>) -> Self {
        Self {
            entries: vec![href.into()],
            cursor: 0,
        }
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn position(&self) -> usize {
        self.cursor
    }
}

impl History for MemoryHistory {
    fn current(&self) -> Option<&str> {
        self.entries.get(self.cursor).map(String::as_str)
    }

    fn push(&mut self, href: String) {
        if self.entries.is_empty() {
            self.entries.push(href);
            self.cursor = 0;
            return;
        }
        self.entries.truncate(self.cursor + 1);
        self.entries.push(href);
        self.cursor = self.entries.len() - 1;
    }

    fn replace(&mut self, href: String) {
        match self.entries.get_mut(self.cursor) {
            Some(entry) => *entry = href,
            None => self.push(href),
        }
    }

    fn go(&mut self, delta: isize) -> Option<&str> {
        if delta == 0 {
            return None;
        }
        let target = self.cursor.checked_add_signed(delta)?;
        if target >= self.entries.len() {
            return None;
        }
        self.cursor = target;
        self.current()
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}
