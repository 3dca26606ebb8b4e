//! In-memory task list

use chrono::Utc;

use crate::error::{Result, YtFocusError};
use crate::types::Task;

#[derive(Debug, Default)]
pub struct TaskList {
    tasks: Vec<Task>,
    next_id: u64,
}

impl TaskList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a task. Blank text is ignored and yields None.
    pub fn add(&mut self, text: &str) -> Option<u64> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        self.next_id += 1;
        self.tasks.push(Task {
            id: self.next_id,
            text: text.to_string(),
            completed: false,
            created_at: Utc::now(),
        });
        Some(self.next_id)
    }

    pub fn toggle(&mut self, id: u64) -> Result<bool> {
        let task = self
            .tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(YtFocusError::UnknownTask(id))?;
        task.completed = !task.completed;
        Ok(task.completed)
    }

    pub fn delete(&mut self, id: u64) -> Result<()> {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        if self.tasks.len() == before {
            return Err(YtFocusError::UnknownTask(id));
        }
        Ok(())
    }

    pub fn get_all(&self) -> &[Task] {
        &self.tasks
    }
}
