use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single to-do entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Stable identity, survives moves between lists
    pub id: Uuid,
    pub text: String,
    pub completed: bool,
    /// Sort key, unique within the owning list
    pub order: u32,
}

impl Task {
    pub fn new(text: String, order: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            text,
            completed: false,
            order,
        }
    }
}

/// An ordered collection of tasks (the active list or the backlog)
///
/// Tasks are kept sorted by `order`. Display order is a stable partition:
/// incomplete tasks first, completed tasks last, each group by `order`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskList {
    tasks: Vec<Task>,
}

impl TaskList {
    pub fn new() -> Self {
        Self { tasks: Vec::new() }
    }

    /// Build a list from loaded tasks
    ///
    /// Orders are renumbered 0..n in their stored sequence, which repairs
    /// duplicates and gaps left by hand-edited or older data.
    pub fn from_tasks(mut tasks: Vec<Task>) -> Self {
        tasks.sort_by_key(|t| t.order);
        let mut list = Self { tasks };
        list.renumber();
        list
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Tasks in storage order (by `order`)
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: Uuid) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    fn position(&self, id: Uuid) -> Option<usize> {
        self.tasks.iter().position(|t| t.id == id)
    }

    fn next_order(&self) -> u32 {
        self.tasks
            .iter()
            .map(|t| t.order.saturating_add(1))
            .max()
            .unwrap_or(0)
    }

    /// Add a task to the end of the list
    ///
    /// Blank or whitespace-only text is rejected and returns `None`.
    pub fn add(&mut self, text: &str) -> Option<Uuid> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        let task = Task::new(text.to_string(), self.next_order());
        let id = task.id;
        self.tasks.push(task);
        Some(id)
    }

    /// Flip the completed flag, returning the new value
    pub fn toggle_complete(&mut self, id: Uuid) -> Option<bool> {
        let task = self.tasks.iter_mut().find(|t| t.id == id)?;
        task.completed = !task.completed;
        Some(task.completed)
    }

    /// Replace a task's text (blank text is rejected)
    pub fn edit(&mut self, id: Uuid, text: &str) -> bool {
        let text = text.trim();
        if text.is_empty() {
            return false;
        }
        match self.tasks.iter_mut().find(|t| t.id == id) {
            Some(task) => {
                task.text = text.to_string();
                true
            }
            None => false,
        }
    }

    /// Remove a task and return it
    pub fn delete(&mut self, id: Uuid) -> Option<Task> {
        let pos = self.position(id)?;
        Some(self.tasks.remove(pos))
    }

    /// Tasks in display order: incomplete first, completed last
    pub fn sorted_for_display(&self) -> Vec<&Task> {
        let (mut open, done): (Vec<&Task>, Vec<&Task>) =
            self.tasks.iter().partition(|t| !t.completed);
        open.extend(done);
        open
    }

    /// Index of a task within the display order
    pub fn display_index(&self, id: Uuid) -> Option<usize> {
        self.sorted_for_display().iter().position(|t| t.id == id)
    }

    /// Move a task to `new_index` in display order
    ///
    /// The relative order of the other tasks is preserved and `order`
    /// values are renumbered to match the new sequence.
    pub fn reorder(&mut self, id: Uuid, new_index: usize) -> bool {
        let mut sequence: Vec<Uuid> = self.sorted_for_display().iter().map(|t| t.id).collect();
        let Some(from) = sequence.iter().position(|t| *t == id) else {
            return false;
        };
        let moved = sequence.remove(from);
        let to = new_index.min(sequence.len());
        sequence.insert(to, moved);
        self.apply_sequence(&sequence);
        from != to
    }

    /// Insert a task coming from another list
    ///
    /// Lands before `insert_before` (in display order) when that task exists
    /// here, otherwise at the end. The task keeps its id, text and completion.
    pub fn insert_before(&mut self, mut task: Task, insert_before: Option<Uuid>) {
        let target = insert_before.filter(|id| self.get(*id).is_some());
        match target {
            Some(before) => {
                let mut sequence: Vec<Uuid> =
                    self.sorted_for_display().iter().map(|t| t.id).collect();
                let at = sequence.iter().position(|t| *t == before).unwrap_or(sequence.len());
                sequence.insert(at, task.id);
                task.order = 0;
                self.tasks.push(task);
                self.apply_sequence(&sequence);
            }
            None => {
                task.order = self.next_order();
                self.tasks.push(task);
            }
        }
    }

    /// Assign order 0..n following `sequence`, then re-sort storage
    fn apply_sequence(&mut self, sequence: &[Uuid]) {
        for (order, id) in sequence.iter().enumerate() {
            if let Some(task) = self.tasks.iter_mut().find(|t| t.id == *id) {
                task.order = order as u32;
            }
        }
        self.tasks.sort_by_key(|t| t.order);
    }

    fn renumber(&mut self) {
        for (order, task) in self.tasks.iter_mut().enumerate() {
            task.order = order as u32;
        }
    }
}

/// Move a task between two lists, returning whether anything moved
pub fn move_across_lists(
    id: Uuid,
    from: &mut TaskList,
    to: &mut TaskList,
    insert_before: Option<Uuid>,
) -> bool {
    match from.delete(id) {
        Some(task) => {
            to.insert_before(task, insert_before);
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn texts(list: &TaskList) -> Vec<String> {
        list.sorted_for_display().iter().map(|t| t.text.clone()).collect()
    }

    fn list_of(items: &[&str]) -> (TaskList, Vec<Uuid>) {
        let mut list = TaskList::new();
        let ids = items.iter().map(|t| list.add(t).unwrap()).collect();
        (list, ids)
    }

    #[test]
    fn test_add_assigns_sequential_order() {
        let (list, _) = list_of(&["Task A", "Task B", "Task C"]);
        let orders: Vec<u32> = list.tasks().iter().map(|t| t.order).collect();
        assert_eq!(orders, vec![0, 1, 2]);
    }

    #[test]
    fn test_add_rejects_blank() {
        let mut list = TaskList::new();
        assert_eq!(list.add(""), None);
        assert_eq!(list.add("   \t "), None);
        assert!(list.is_empty());
    }

    #[test]
    fn test_add_trims_text() {
        let mut list = TaskList::new();
        let id = list.add("  write report ").unwrap();
        assert_eq!(list.get(id).unwrap().text, "write report");
    }

    #[test]
    fn test_completed_sorts_last() {
        let (mut list, ids) = list_of(&["Task A", "Task B", "Task C"]);
        list.toggle_complete(ids[1]);
        assert_eq!(texts(&list), vec!["Task A", "Task C", "Task B"]);
    }

    #[test]
    fn test_completed_groups_keep_insertion_order() {
        let (mut list, ids) = list_of(&["A", "B", "C", "D", "E"]);
        list.toggle_complete(ids[3]);
        list.toggle_complete(ids[0]);
        list.delete(ids[2]);
        list.add("F");
        list.toggle_complete(ids[4]);
        list.toggle_complete(ids[4]);
        assert_eq!(texts(&list), vec!["B", "E", "F", "A", "D"]);
    }

    #[test]
    fn test_toggle_unknown_id() {
        let (mut list, _) = list_of(&["A"]);
        assert_eq!(list.toggle_complete(Uuid::new_v4()), None);
    }

    #[test]
    fn test_delete_returns_task() {
        let (mut list, ids) = list_of(&["A", "B"]);
        let removed = list.delete(ids[0]).unwrap();
        assert_eq!(removed.text, "A");
        assert_eq!(texts(&list), vec!["B"]);
        assert!(list.delete(ids[0]).is_none());
    }

    #[test]
    fn test_reorder_moves_and_renumbers() {
        let (mut list, ids) = list_of(&["A", "B", "C", "D"]);
        assert!(list.reorder(ids[3], 1));
        assert_eq!(texts(&list), vec!["A", "D", "B", "C"]);

        let orders: Vec<u32> = list.tasks().iter().map(|t| t.order).collect();
        assert_eq!(orders, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_reorder_clamps_index() {
        let (mut list, ids) = list_of(&["A", "B", "C"]);
        list.reorder(ids[0], 99);
        assert_eq!(texts(&list), vec!["B", "C", "A"]);
    }

    #[test]
    fn test_reorder_same_position_is_noop() {
        let (mut list, ids) = list_of(&["A", "B", "C"]);
        assert!(!list.reorder(ids[1], 1));
        assert_eq!(texts(&list), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_reorder_respects_completed_partition() {
        let (mut list, ids) = list_of(&["A", "B", "C"]);
        list.toggle_complete(ids[0]);
        // Display is [B, C, A]; move C to the front
        list.reorder(ids[2], 0);
        assert_eq!(texts(&list), vec!["C", "B", "A"]);
    }

    #[test]
    fn test_move_across_lists_appends() {
        let (mut tasks, ids) = list_of(&["A", "B"]);
        let (mut backlog, _) = list_of(&["X"]);
        tasks.toggle_complete(ids[0]);

        assert!(move_across_lists(ids[0], &mut tasks, &mut backlog, None));

        assert_eq!(texts(&tasks), vec!["B"]);
        let moved = backlog.get(ids[0]).unwrap();
        assert!(moved.completed);
        assert_eq!(moved.text, "A");
        assert_eq!(tasks.len() + backlog.len(), 3);
        assert_eq!(backlog.tasks().last().unwrap().id, ids[0]);
    }

    #[test]
    fn test_move_across_lists_inserts_before_target() {
        let (mut tasks, ids) = list_of(&["A"]);
        let (mut backlog, backlog_ids) = list_of(&["X", "Y", "Z"]);

        move_across_lists(ids[0], &mut tasks, &mut backlog, Some(backlog_ids[1]));

        assert_eq!(texts(&backlog), vec!["X", "A", "Y", "Z"]);
        let orders: Vec<u32> = backlog.tasks().iter().map(|t| t.order).collect();
        assert_eq!(orders, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_move_across_lists_unknown_target_goes_to_end() {
        let (mut tasks, ids) = list_of(&["A"]);
        let (mut backlog, _) = list_of(&["X"]);
        move_across_lists(ids[0], &mut tasks, &mut backlog, Some(Uuid::new_v4()));
        assert_eq!(texts(&backlog), vec!["X", "A"]);
    }

    #[test]
    fn test_move_across_lists_missing_source() {
        let (mut tasks, _) = list_of(&["A"]);
        let (mut backlog, _) = list_of(&["X"]);
        assert!(!move_across_lists(Uuid::new_v4(), &mut tasks, &mut backlog, None));
        assert_eq!(tasks.len() + backlog.len(), 2);
    }

    #[test]
    fn test_from_tasks_repairs_duplicate_orders() {
        let a = Task::new("A".to_string(), 3);
        let b = Task::new("B".to_string(), 3);
        let c = Task::new("C".to_string(), 1);
        let list = TaskList::from_tasks(vec![a, b, c]);

        let orders: Vec<u32> = list.tasks().iter().map(|t| t.order).collect();
        assert_eq!(orders, vec![0, 1, 2]);
        assert_eq!(texts(&list), vec!["C", "A", "B"]);
    }

    #[test]
    fn test_add_after_loading_max_order() {
        let loaded = vec![
            Task::new("last".to_string(), u32::MAX),
            Task::new("first".to_string(), 7),
        ];
        let mut list = TaskList::from_tasks(loaded);
        let orders: Vec<u32> = list.tasks().iter().map(|t| t.order).collect();
        assert_eq!(orders, vec![0, 1]);

        list.add("new");
        assert_eq!(texts(&list), vec!["first", "last", "new"]);
    }

    #[test]
    fn test_serializes_as_plain_array() {
        let (list, _) = list_of(&["A"]);
        let json = serde_json::to_value(&list).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["text"], "A");
        assert_eq!(json[0]["completed"], false);
        assert_eq!(json[0]["order"], 0);
    }
}
