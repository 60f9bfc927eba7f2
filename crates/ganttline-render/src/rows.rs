//! Grouping and row flattening.
//!
//! Tasks are bucketed by every group they list, buckets keep first-seen
//! order, and the buckets are flattened into display rows honouring the
//! collapse map.

use ganttline_core::{CollapseMap, DedupPolicy, Task};
use indexmap::IndexMap;
use std::collections::HashSet;

/// Display text for the empty group key
pub const UNASSIGNED_LABEL: &str = "Not Assigned";

/// Human-readable name of a group key
pub fn group_label(key: &str) -> &str {
    if key.is_empty() {
        UNASSIGNED_LABEL
    } else {
        key
    }
}

/// Keep the first task seen for every id
pub fn dedup_by_id(tasks: &[Task]) -> Vec<Task> {
    let mut seen = HashSet::new();
    tasks
        .iter()
        .filter(|task| seen.insert(task.id.as_str()))
        .cloned()
        .collect()
}

/// The task list every component of one pass works from
pub fn task_view(tasks: &[Task], policy: DedupPolicy) -> Vec<Task> {
    match policy {
        DedupPolicy::ById => dedup_by_id(tasks),
        DedupPolicy::Raw => tasks.to_vec(),
    }
}

/// One line of the chart body
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Row {
    /// Group header, clickable to collapse
    Group { key: String, collapsed: bool },
    /// Task row; `task` indexes the task list of the pass
    Item { group: String, task: usize },
}

impl Row {
    pub fn is_group(&self) -> bool {
        matches!(self, Row::Group { .. })
    }

    /// Group key this row belongs to
    pub fn group_key(&self) -> &str {
        match self {
            Row::Group { key, .. } => key,
            Row::Item { group, .. } => group,
        }
    }

    pub fn task_index(&self) -> Option<usize> {
        match self {
            Row::Group { .. } => None,
            Row::Item { task, .. } => Some(*task),
        }
    }
}

/// Group key to member task indices, in first-seen order
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Grouping {
    groups: IndexMap<String, Vec<usize>>,
}

impl Grouping {
    pub fn build(tasks: &[Task]) -> Self {
        let mut groups: IndexMap<String, Vec<usize>> = IndexMap::new();
        for (index, task) in tasks.iter().enumerate() {
            for key in task.group_keys() {
                groups.entry(key.to_string()).or_default().push(index);
            }
        }
        Self { groups }
    }

    /// Number of distinct groups
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    pub fn members(&self, key: &str) -> &[usize] {
        self.groups.get(key).map_or(&[], Vec::as_slice)
    }

    /// Header per group, followed by its items unless collapsed
    pub fn flatten(&self, collapse: &CollapseMap) -> Vec<Row> {
        let mut rows = Vec::with_capacity(self.groups.len() + self.groups.values().map(Vec::len).sum::<usize>());
        for (key, members) in &self.groups {
            let collapsed = collapse.is_collapsed(key);
            rows.push(Row::Group {
                key: key.clone(),
                collapsed,
            });
            if collapsed {
                continue;
            }
            rows.extend(members.iter().map(|&task| Row::Item {
                group: key.clone(),
                task,
            }));
        }
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn item(group: &str, task: usize) -> Row {
        Row::Item {
            group: group.to_string(),
            task,
        }
    }

    fn header(key: &str, collapsed: bool) -> Row {
        Row::Group {
            key: key.to_string(),
            collapsed,
        }
    }

    #[test]
    fn groups_in_first_seen_order() {
        let tasks = vec![
            Task::new("1").group("B"),
            Task::new("2").group("A"),
            Task::new("3").group("B"),
        ];
        let grouping = Grouping::build(&tasks);
        assert_eq!(grouping.keys().collect::<Vec<_>>(), vec!["B", "A"]);
        assert_eq!(
            grouping.flatten(&CollapseMap::new()),
            vec![header("B", false), item("B", 0), item("B", 2), header("A", false), item("A", 1)]
        );
    }

    #[test]
    fn multi_group_task_appears_in_each() {
        let tasks = vec![Task::new("1").group("A, B")];
        let rows = Grouping::build(&tasks).flatten(&CollapseMap::new());
        assert_eq!(
            rows,
            vec![header("A", false), item("A", 0), header("B", false), item("B", 0)]
        );
    }

    #[test]
    fn blank_group_is_unassigned() {
        let tasks = vec![Task::new("1"), Task::new("2").group(" , X")];
        let grouping = Grouping::build(&tasks);
        assert_eq!(grouping.keys().collect::<Vec<_>>(), vec!["", "X"]);
        assert_eq!(grouping.members(""), &[0, 1]);
        assert_eq!(group_label(""), "Not Assigned");
        assert_eq!(group_label("X"), "X");
    }

    #[test]
    fn collapsed_group_keeps_only_header() {
        let tasks = vec![Task::new("1").group("A"), Task::new("2").group("B")];
        let mut collapse = CollapseMap::new();
        collapse.toggle("A");
        let rows = Grouping::build(&tasks).flatten(&collapse);
        assert_eq!(rows, vec![header("A", true), header("B", false), item("B", 1)]);
    }

    #[test]
    fn empty_task_list_has_no_rows() {
        let grouping = Grouping::build(&[]);
        assert!(grouping.is_empty());
        assert!(grouping.flatten(&CollapseMap::new()).is_empty());
    }

    #[test]
    fn dedup_keeps_first_occurrence() {
        let tasks = vec![
            Task::new("1").name("first"),
            Task::new("2"),
            Task::new("1").name("second"),
        ];
        let unique = dedup_by_id(&tasks);
        assert_eq!(unique.len(), 2);
        assert_eq!(unique[0].name, "first");
        assert_eq!(task_view(&tasks, DedupPolicy::Raw).len(), 3);
    }
}
