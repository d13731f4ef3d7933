use crate::task::{Filter, Stats, Task};
use chrono::Local;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    Updated,
    Unchanged,
    EmptyText,
}

#[derive(Debug, Default)]
pub struct TaskList {
    tasks: Vec<Task>,
    filter: Filter,
}

impl TaskList {
    pub fn new(tasks: Vec<Task>) -> Self {
        Self {
            tasks,
            filter: Filter::All,
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn filter(&self) -> Filter {
        self.filter
    }

    pub fn add(&mut self, text: &str) -> Option<i64> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        let task = Task {
            id: self.next_id(),
            text: text.to_string(),
            completed: false,
            created_at: Local::now().format("%H:%M").to_string(),
        };
        let id = task.id;
        self.tasks.insert(0, task); // newest first
        Some(id)
    }

    // Timestamp-derived, bumped until unique within the collection.
    fn next_id(&self) -> i64 {
        let mut id = Local::now().timestamp_millis();
        while self.tasks.iter().any(|t| t.id == id) {
            id += 1;
        }
        id
    }

    pub fn toggle(&mut self, id: i64) -> bool {
        if let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) {
            task.completed = !task.completed;
            true
        } else {
            false
        }
    }

    pub fn edit(&mut self, id: i64, new_text: &str) -> EditOutcome {
        let new_text = new_text.trim();
        if new_text.is_empty() {
            return EditOutcome::EmptyText;
        }
        match self.tasks.iter_mut().find(|t| t.id == id) {
            Some(task) if task.text != new_text => {
                task.text = new_text.to_string();
                EditOutcome::Updated
            }
            _ => EditOutcome::Unchanged,
        }
    }

    pub fn remove(&mut self, id: i64) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        self.tasks.len() != before
    }

    pub fn clear_completed(&mut self) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(|t| !t.completed);
        before - self.tasks.len()
    }

    pub fn clear_all(&mut self) -> usize {
        let count = self.tasks.len();
        self.tasks.clear();
        count
    }

    pub fn has_completed(&self) -> bool {
        self.tasks.iter().any(|t| t.completed)
    }

    pub fn set_filter(&mut self, filter: Filter) {
        self.filter = filter;
    }

    pub fn filtered(&self) -> Vec<&Task> {
        self.tasks.iter().filter(|t| self.filter.matches(t)).collect()
    }

    // Counters are always over the unfiltered collection.
    pub fn stats(&self) -> Stats {
        let total = self.tasks.len();
        let completed = self.tasks.iter().filter(|t| t.completed).count();
        Stats {
            total,
            completed,
            remaining: total - completed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_prepends_uncompleted_task() {
        let mut list = TaskList::default();
        list.add("Buy milk").unwrap();
        let id = list.add("Walk dog").unwrap();

        assert_eq!(list.tasks().len(), 2);
        assert_eq!(list.tasks()[0].id, id);
        assert_eq!(list.tasks()[0].text, "Walk dog");
        assert!(!list.tasks()[0].completed);
    }

    #[test]
    fn add_trims_text() {
        let mut list = TaskList::default();
        list.add("  Buy milk  ").unwrap();
        assert_eq!(list.tasks()[0].text, "Buy milk");
    }

    #[test]
    fn add_rejects_blank_text() {
        let mut list = TaskList::default();
        assert_eq!(list.add(""), None);
        assert_eq!(list.add("   "), None);
        assert!(list.tasks().is_empty());
    }

    #[test]
    fn ids_are_unique() {
        let mut list = TaskList::default();
        for i in 0..20 {
            list.add(&format!("task {i}")).unwrap();
        }
        for task in list.tasks() {
            let matching = list.tasks().iter().filter(|t| t.id == task.id).count();
            assert_eq!(matching, 1);
        }
    }

    #[test]
    fn toggle_twice_restores_state() {
        let mut list = TaskList::default();
        let id = list.add("Buy milk").unwrap();

        assert!(list.toggle(id));
        assert!(list.tasks()[0].completed);
        assert!(list.toggle(id));
        assert!(!list.tasks()[0].completed);
    }

    #[test]
    fn toggle_missing_id_is_noop() {
        let mut list = TaskList::default();
        list.add("Buy milk").unwrap();
        assert!(!list.toggle(12345));
        assert!(!list.tasks()[0].completed);
    }

    #[test]
    fn edit_replaces_text_in_place() {
        let mut list = TaskList::default();
        let first = list.add("Buy milk").unwrap();
        let second = list.add("Walk dog").unwrap();

        assert_eq!(list.edit(first, "Buy oat milk"), EditOutcome::Updated);
        // order unchanged
        assert_eq!(list.tasks()[0].id, second);
        assert_eq!(list.tasks()[1].text, "Buy oat milk");
    }

    #[test]
    fn edit_identical_text_is_unchanged() {
        let mut list = TaskList::default();
        let id = list.add("Buy milk").unwrap();
        assert_eq!(list.edit(id, "Buy milk"), EditOutcome::Unchanged);
        assert_eq!(list.edit(id, "  Buy milk  "), EditOutcome::Unchanged);
    }

    #[test]
    fn edit_empty_text_leaves_collection_unchanged() {
        let mut list = TaskList::default();
        let id = list.add("Buy milk").unwrap();
        assert_eq!(list.edit(id, "   "), EditOutcome::EmptyText);
        assert_eq!(list.tasks()[0].text, "Buy milk");
    }

    #[test]
    fn edit_missing_id_is_unchanged() {
        let mut list = TaskList::default();
        list.add("Buy milk").unwrap();
        assert_eq!(list.edit(999, "new text"), EditOutcome::Unchanged);
    }

    #[test]
    fn remove_deletes_only_matching_task() {
        let mut list = TaskList::default();
        let first = list.add("Buy milk").unwrap();
        list.add("Walk dog").unwrap();

        assert!(list.remove(first));
        assert_eq!(list.tasks().len(), 1);
        assert_eq!(list.tasks()[0].text, "Walk dog");
        assert!(!list.remove(first));
    }

    #[test]
    fn stats_remaining_is_total_minus_completed() {
        let mut list = TaskList::default();
        let a = list.add("a").unwrap();
        list.add("b").unwrap();
        list.add("c").unwrap();
        list.toggle(a);

        let stats = list.stats();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.remaining, stats.total - stats.completed);
    }

    #[test]
    fn filter_completed_preserves_order() {
        let mut list = TaskList::default();
        let a = list.add("a").unwrap();
        let b = list.add("b").unwrap();
        let c = list.add("c").unwrap();
        list.toggle(a);
        list.toggle(c);

        list.set_filter(Filter::Completed);
        let ids: Vec<i64> = list.filtered().iter().map(|t| t.id).collect();
        // insertion order is newest first: c, b, a
        assert_eq!(ids, vec![c, a]);

        list.set_filter(Filter::Active);
        let ids: Vec<i64> = list.filtered().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![b]);
    }

    #[test]
    fn clear_completed_keeps_active_tasks() {
        let mut list = TaskList::default();
        let a = list.add("a").unwrap();
        list.add("b").unwrap();
        list.toggle(a);

        assert_eq!(list.clear_completed(), 1);
        list.set_filter(Filter::Completed);
        assert!(list.filtered().is_empty());
        assert_eq!(list.tasks().len(), 1);
        assert_eq!(list.tasks()[0].text, "b");
    }

    #[test]
    fn clear_all_empties_collection() {
        let mut list = TaskList::default();
        list.add("a").unwrap();
        list.add("b").unwrap();
        assert_eq!(list.clear_all(), 2);
        assert!(list.tasks().is_empty());
        assert_eq!(list.stats().total, 0);
    }
}
