use super::store::KeyValueStore;
use crate::error::LabError;
use serde_json::{Map, Value};
use std::collections::BTreeSet;

pub const COMPLETED_TASKS_KEY: &str = "completedTasks";
/// Length of the practice checklist, in days.
pub const TOTAL_TASK_DAYS: usize = 90;

pub fn task_key(index: usize) -> String {
    format!("task-{index}")
}

fn parse_task_key(key: &str) -> Option<usize> {
    key.strip_prefix("task-")?
        .parse::<usize>()
        .ok()
        .filter(|i| *i < TOTAL_TASK_DAYS)
}

/// Which checklist days the owner has marked as practiced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletionState {
    done: BTreeSet<usize>,
}

impl CompletionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads the map from the store. A missing or unreadable entry yields an empty state.
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let Some(raw) = store.get(COMPLETED_TASKS_KEY) else {
            return Self::default();
        };
        let map: Map<String, Value> = match serde_json::from_str(&raw) {
            Ok(map) => map,
            Err(e) => {
                log::warn!("Ignoring unreadable {COMPLETED_TASKS_KEY}: {e}");
                return Self::default();
            }
        };
        let done = map
            .iter()
            .filter(|(_, v)| v.as_bool() == Some(true))
            .filter_map(|(k, _)| parse_task_key(k))
            .collect();
        Self { done }
    }

    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<(), LabError> {
        let map: Map<String, Value> = self
            .done
            .iter()
            .map(|i| (task_key(*i), Value::Bool(true)))
            .collect();
        store.set(COMPLETED_TASKS_KEY, &serde_json::to_string(&map)?);
        Ok(())
    }

    pub fn set(&mut self, index: usize, completed: bool) -> Result<(), LabError> {
        check_index(index)?;
        if completed {
            self.done.insert(index);
        } else {
            self.done.remove(&index);
        }
        Ok(())
    }

    /// Flips a day and returns its new state.
    pub fn toggle(&mut self, index: usize) -> Result<bool, LabError> {
        let now = !self.is_completed(index);
        self.set(index, now)?;
        Ok(now)
    }

    pub fn is_completed(&self, index: usize) -> bool {
        self.done.contains(&index)
    }

    pub fn completed_count(&self) -> usize {
        self.done.len()
    }

    pub fn progress_percent(&self) -> u32 {
        ((self.done.len() * 100 + TOTAL_TASK_DAYS / 2) / TOTAL_TASK_DAYS) as u32
    }
}

fn check_index(index: usize) -> Result<(), LabError> {
    if index < TOTAL_TASK_DAYS {
        Ok(())
    } else {
        Err(LabError::ValidationFailed(format!(
            "task index {index} outside 0..{TOTAL_TASK_DAYS}"
        )))
    }
}
