//! Selection side-table for bulk operations.
//!
//! Selection is view state, not part of a task record, so it lives next to
//! the board instead of inside `Task`.

use std::collections::BTreeSet;

use crate::domain::TaskId;

#[derive(Debug, Default, Clone)]
pub struct Selection {
    ids: BTreeSet<TaskId>,
}

impl Selection {
    pub fn contains(&self, id: TaskId) -> bool {
        self.ids.contains(&id)
    }

    /// Flip one id. Returns the new state.
    pub fn toggle(&mut self, id: TaskId) -> bool {
        if self.ids.remove(&id) {
            false
        } else {
            self.ids.insert(id);
            true
        }
    }

    pub fn deselect(&mut self, id: TaskId) {
        self.ids.remove(&id);
    }

    pub fn select_all(&mut self, ids: impl IntoIterator<Item = TaskId>) {
        self.ids.extend(ids);
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_flips_state() {
        let mut selection = Selection::default();
        assert!(selection.toggle(TaskId::new(1)));
        assert!(selection.contains(TaskId::new(1)));
        assert!(!selection.toggle(TaskId::new(1)));
        assert!(selection.is_empty());
    }
}
