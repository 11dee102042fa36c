use crate::domain::PcmBuffer;

/// Linear undo stack of whole-buffer snapshots.
///
/// Unbounded: every entry is a full copy of the buffer taken before a
/// destructive edit.
#[derive(Debug, Clone, Default)]
pub struct EditHistory {
    snapshots: Vec<PcmBuffer>,
}

impl EditHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the buffer state before a destructive edit is committed.
    pub fn push(&mut self, buffer: PcmBuffer) {
        self.snapshots.push(buffer);
    }

    /// Pop the most recent snapshot.
    pub fn undo(&mut self) -> Option<PcmBuffer> {
        self.snapshots.pop()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn clear(&mut self) {
        self.snapshots.clear();
    }

    /// Bytes held by all snapshots.
    pub fn memory_bytes(&self) -> usize {
        self.snapshots.iter().map(PcmBuffer::len_bytes).sum()
    }
}
