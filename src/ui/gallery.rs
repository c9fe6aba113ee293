//! Bounded, newest-first snapshot gallery

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use crate::ui::capture::CaptureError;

/// One persisted surface image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    /// Monotonic counter, useful for telling snapshots apart
    pub sequence: u64,
    pub png: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct SnapshotGallery {
    capacity: usize,
    items: VecDeque<Snapshot>,
    next_sequence: u64,
}

impl SnapshotGallery {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            items: VecDeque::with_capacity(capacity),
            next_sequence: 0,
        }
    }

    /// Inserts at the front, evicting the oldest beyond capacity
    ///
    /// # Returns
    /// The evicted snapshot, if any
    pub fn push(&mut self, png: Vec<u8>) -> Option<Snapshot> {
        let snapshot = Snapshot {
            sequence: self.next_sequence,
            png,
        };
        self.next_sequence += 1;
        self.items.push_front(snapshot);

        if self.items.len() > self.capacity {
            self.items.pop_back()
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Snapshots, newest first
    pub fn iter(&self) -> impl Iterator<Item = &Snapshot> {
        self.items.iter()
    }

    pub fn newest(&self) -> Option<&Snapshot> {
        self.items.front()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Writes every snapshot as `snapshot-NN.png`, newest as `00`
    pub fn export_to(&self, dir: &Path) -> Result<Vec<PathBuf>, CaptureError> {
        std::fs::create_dir_all(dir).map_err(|source| CaptureError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut written = Vec::with_capacity(self.items.len());
        for (position, snapshot) in self.items.iter().enumerate() {
            let path = dir.join(format!("snapshot-{position:02}.png"));
            std::fs::write(&path, &snapshot.png).map_err(|source| CaptureError::Io {
                path: path.clone(),
                source,
            })?;
            written.push(path);
        }
        Ok(written)
    }
}
