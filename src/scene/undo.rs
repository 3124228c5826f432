use crate::push_pull::selection::Element;
use bevy::prelude::Vec3;

#[derive(Debug, Clone, PartialEq)]
pub enum UndoEntry {
    Position { element: Element, previous: Vec3 },
    Scale { object: String, previous: Vec3 },
}

impl UndoEntry {
    fn same_target(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Position { element: a, .. }, Self::Position { element: b, .. }) => a == b,
            (Self::Scale { object: a, .. }, Self::Scale { object: b, .. }) => a == b,
            _ => false,
        }
    }
}

/// Records the first previous value of everything written inside an open
/// chunk. Nested opens are counted and only the outermost close commits.
#[derive(Debug, Clone, Default)]
pub struct UndoJournal {
    depth: u32,
    pending: Vec<UndoEntry>,
    chunks: Vec<Vec<UndoEntry>>,
}

impl UndoJournal {
    pub fn open(&mut self) {
        self.depth += 1;
    }

    pub fn close(&mut self) {
        if self.depth == 0 {
            return;
        }
        self.depth -= 1;
        if self.depth == 0 && !self.pending.is_empty() {
            self.chunks.push(std::mem::take(&mut self.pending));
        }
    }

    pub fn is_recording(&self) -> bool {
        self.depth > 0
    }

    /// Writes outside a chunk become their own single-entry chunk.
    pub fn record(&mut self, entry: UndoEntry) {
        if !self.is_recording() {
            self.chunks.push(vec![entry]);
            return;
        }
        if !self.pending.iter().any(|e| e.same_target(&entry)) {
            self.pending.push(entry);
        }
    }

    /// Removes the newest committed chunk, newest entry first.
    pub fn pop(&mut self) -> Option<Vec<UndoEntry>> {
        let mut chunk = self.chunks.pop()?;
        chunk.reverse();
        Some(chunk)
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn pos(name: &str, previous: Vec3) -> UndoEntry {
        UndoEntry::Position {
            element: Element::Object(name.to_string()),
            previous,
        }
    }

    #[test]
    fn keeps_first_value_per_target_within_a_chunk() {
        let mut journal = UndoJournal::default();
        journal.open();
        journal.record(pos("a", Vec3::ZERO));
        journal.record(pos("a", Vec3::ONE));
        journal.record(pos("b", Vec3::X));
        journal.close();

        assert_eq!(journal.len(), 1);
        assert_eq!(
            journal.pop().unwrap(),
            vec![pos("b", Vec3::X), pos("a", Vec3::ZERO)]
        );
    }

    #[test]
    fn nested_chunks_commit_once() {
        let mut journal = UndoJournal::default();
        journal.open();
        journal.open();
        journal.record(pos("a", Vec3::ZERO));
        journal.close();
        assert!(journal.is_empty());
        journal.close();
        assert_eq!(journal.len(), 1);
    }

    #[test]
    fn empty_chunks_and_stray_closes_are_dropped() {
        let mut journal = UndoJournal::default();
        journal.close();
        journal.open();
        journal.close();
        assert!(journal.is_empty());
        assert!(journal.pop().is_none());
    }
}
