use crate::{ChangeEvent, ChangeKind};

/// Ordered, duplicate-free selected data indexes. The last index is the current selection.
///
/// With `feature = "serde"`, this type implements `Serialize`/`Deserialize`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Selection {
    indices: Vec<usize>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keeps the first occurrence of each index.
    pub fn from_indices(indices: impl IntoIterator<Item = usize>) -> Self {
        let mut selection = Self::new();
        for index in indices {
            selection.insert(index);
        }
        selection
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn current(&self) -> Option<usize> {
        self.indices.last().copied()
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn contains(&self, index: usize) -> bool {
        self.indices.contains(&index)
    }

    /// Appends `index` unless it is already selected. Returns `true` if it was added.
    pub fn insert(&mut self, index: usize) -> bool {
        if self.contains(index) {
            return false;
        }
        self.indices.push(index);
        true
    }

    pub fn remove(&mut self, index: usize) -> bool {
        let before = self.indices.len();
        self.indices.retain(|&i| i != index);
        self.indices.len() != before
    }

    /// Makes `index` the only selected index.
    pub fn replace(&mut self, index: usize) {
        self.indices.clear();
        self.indices.push(index);
    }

    pub fn clear(&mut self) {
        self.indices.clear();
    }

    /// Drops every index `>= len`.
    pub fn truncate_to(&mut self, len: usize) {
        self.indices.retain(|&i| i < len);
    }

    /// Remaps the selected indexes so they keep pointing at the same items after `event`.
    ///
    /// Returns `true` if the selection changed.
    pub fn apply_change<T>(&mut self, event: &ChangeEvent<T>) -> bool {
        let before = self.indices.clone();
        match event.kind {
            ChangeKind::RemoveAll | ChangeKind::InvalidateAll => self.indices.clear(),
            ChangeKind::Add => {
                let (start, shift) = (event.start_index, event.span());
                for index in &mut self.indices {
                    if *index >= start {
                        *index += shift;
                    }
                }
            }
            ChangeKind::Remove => {
                let (start, end, shift) = (event.start_index, event.end_index, event.span());
                self.indices.retain(|&i| i < start || i > end);
                for index in &mut self.indices {
                    if *index > end {
                        *index -= shift;
                    }
                }
            }
            ChangeKind::Sort => match &event.permutation {
                Some(permutation) => {
                    let mut new_index_of = vec![usize::MAX; permutation.len()];
                    for (new, &old) in permutation.iter().enumerate() {
                        if let Some(slot) = new_index_of.get_mut(old) {
                            *slot = new;
                        }
                    }
                    let remapped = self
                        .indices
                        .iter()
                        .filter_map(|&i| new_index_of.get(i).copied())
                        .filter(|&i| i != usize::MAX);
                    self.indices = remapped.collect();
                }
                None => self.indices.clear(),
            },
            ChangeKind::Replace | ChangeKind::Invalidate => {}
        }
        let changed = self.indices != before;
        if changed {
            vtrace!(kind = ?event.kind, from = ?before, to = ?self.indices, "selection remap");
        }
        changed
    }
}
