use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};

use super::forms::{EditTaskForm, TaskInputForm};
use super::percentage;
use super::suggestions::describe_ai_failure;
use crate::api::TaskApi;
use crate::error::AppError;
use crate::models::{
    AiSuggestRequest, AiSuggestion, ApplyScheduleRequest, DeleteTaskRequest, EditTaskRequest,
    Task, User, UserStats,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TaskStats {
    pub total: usize,
    pub completed: usize,
    pub completion_rate: u32,
}

impl TaskStats {
    pub fn from_tasks(tasks: &[Task]) -> Self {
        let total = tasks.len();
        let completed = tasks.iter().filter(|t| t.completed).count();
        Self {
            total,
            completed,
            completion_rate: percentage(completed, total),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Error,
}

/// One-shot message shown on the next render, in place of a browser alert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }
}

/// In-memory dashboard. The task list is a non-authoritative copy of the
/// backend's; stats are always derived from it. Once loaded, the local order
/// is kept until the next explicit reload.
#[derive(Debug, Default)]
pub struct DashboardState {
    loaded: bool,
    tasks: Vec<Task>,
    stats: TaskStats,
    notices: Vec<Notice>,
    suggestions: Option<AiSuggestion>,
    editing: Option<EditTaskForm>,
    pub input: TaskInputForm,
}

impl DashboardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn stats(&self) -> TaskStats {
        self.stats
    }

    pub fn suggestions(&self) -> Option<&AiSuggestion> {
        self.suggestions.as_ref()
    }

    pub fn editing(&self) -> Option<&EditTaskForm> {
        self.editing.as_ref()
    }

    pub fn notify(&mut self, notice: Notice) {
        self.notices.push(notice);
    }

    /// Drains pending notices; each is shown once.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    fn set_tasks(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;
        self.stats = TaskStats::from_tasks(&self.tasks);
    }

    fn replace(&mut self, updated: Task) {
        let mut tasks = std::mem::take(&mut self.tasks);
        for task in tasks.iter_mut().filter(|t| t.id == updated.id) {
            *task = updated.clone();
        }
        self.set_tasks(tasks);
    }

    fn fail(&mut self, message: &str, err: AppError) -> AppError {
        warn!("{}: {}", message, err);
        self.notify(Notice::error(message));
        err
    }

    pub async fn load(&mut self, api: &dyn TaskApi) -> Result<(), AppError> {
        match api.list_tasks().await {
            Ok(tasks) => {
                info!("loaded {} tasks", tasks.len());
                self.loaded = true;
                self.set_tasks(tasks);
                Ok(())
            }
            Err(e) => Err(self.fail("Could not load tasks. Is backend running?", e)),
        }
    }

    /// Submits the input form. A validation failure keeps the form contents.
    pub async fn add(&mut self, api: &dyn TaskApi, user_id: &str) -> Result<Task, AppError> {
        let req = match self.input.submit(user_id) {
            Ok(req) => req,
            Err(e) => {
                self.notify(Notice::error(e.detail()));
                return Err(e);
            }
        };

        match api.add_task(&req).await {
            Ok(created) => {
                let mut tasks = std::mem::take(&mut self.tasks);
                tasks.insert(0, created.clone());
                self.set_tasks(tasks);
                self.notify(Notice::info(TaskInputForm::success_notice(&req)));
                Ok(created)
            }
            Err(e) => Err(self.fail("Add task failed", e)),
        }
    }

    pub fn begin_edit(&mut self, task_id: &str) -> Result<&EditTaskForm, AppError> {
        let task = self
            .tasks
            .iter()
            .find(|t| t.id == task_id)
            .ok_or_else(|| AppError::NotFound(format!("Task {} is not loaded", task_id)))?;
        Ok(self.editing.insert(EditTaskForm::from_task(task)))
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    pub async fn update(
        &mut self,
        api: &dyn TaskApi,
        form: EditTaskForm,
        user_id: &str,
    ) -> Result<Task, AppError> {
        let req = match form.submit(user_id) {
            Ok(req) => req,
            Err(e) => {
                self.notify(Notice::error(e.detail()));
                self.editing = Some(form);
                return Err(e);
            }
        };

        match api.edit_task(&req).await {
            Ok(updated) => {
                self.editing = None;
                self.replace(updated.clone());
                self.notify(Notice::info("Task updated"));
                Ok(updated)
            }
            Err(e) => Err(self.fail("Update task failed", e)),
        }
    }

    pub async fn delete(&mut self, api: &dyn TaskApi, task_id: &str) -> Result<(), AppError> {
        let req = DeleteTaskRequest {
            id: task_id.to_string(),
        };
        match api.delete_task(&req).await {
            Ok(()) => {
                let mut tasks = std::mem::take(&mut self.tasks);
                tasks.retain(|t| t.id != task_id);
                self.set_tasks(tasks);
                if self.editing.as_ref().is_some_and(|f| f.id == task_id) {
                    self.editing = None;
                }
                self.notify(Notice::info("Task deleted"));
                Ok(())
            }
            Err(e) => Err(self.fail("Delete task failed", e)),
        }
    }

    pub async fn complete(
        &mut self,
        api: &dyn TaskApi,
        task_id: &str,
        user_id: &str,
    ) -> Result<Task, AppError> {
        let req = match self.tasks.iter().find(|t| t.id == task_id) {
            Some(task) => EditTaskRequest::completing(task, user_id),
            None => {
                let err = AppError::NotFound("Task not found".to_string());
                return Err(self.fail("Failed to mark task as completed", err));
            }
        };

        match api.edit_task(&req).await {
            Ok(updated) => {
                self.replace(updated.clone());
                self.notify(Notice::info("Task marked as completed!"));
                Ok(updated)
            }
            Err(e) => Err(self.fail("Failed to mark task as completed", e)),
        }
    }

    /// Asks the backend for suggestions over the current list, then reloads
    /// the list since the backend may have re-categorized tasks.
    pub async fn suggest(
        &mut self,
        api: &dyn TaskApi,
        user: Option<&User>,
        timezone: &str,
        user_input: &str,
    ) -> Result<(), AppError> {
        let req = AiSuggestRequest {
            tasks: self.tasks.clone(),
            user_stats: user
                .map(|u| UserStats::from_behavior(&u.behavior_stats))
                .unwrap_or_default(),
            now: Utc::now().to_rfc3339(),
            timezone: timezone.to_string(),
            user_input: user_input.to_string(),
        };

        match api.ai_suggest(&req).await {
            Ok(suggestion) => {
                info!(
                    "received {} categorized tasks, {} schedule items",
                    suggestion.categorized.len(),
                    suggestion.schedule_plan.len()
                );
                self.suggestions = Some(suggestion);
                self.load(api).await
            }
            Err(e) => {
                warn!("AI suggestion failed: {}", e);
                self.notify(Notice::error(describe_ai_failure(&e)));
                Err(e)
            }
        }
    }

    pub fn dismiss_suggestions(&mut self) {
        self.suggestions = None;
    }

    pub async fn apply_schedule(&mut self, api: &dyn TaskApi) -> Result<String, AppError> {
        let schedule_plan = self
            .suggestions
            .as_ref()
            .map(|s| s.schedule_plan.clone())
            .unwrap_or_default();
        if schedule_plan.is_empty() {
            let err = AppError::Validation("No schedule to apply".to_string());
            self.notify(Notice::error(err.detail()));
            return Err(err);
        }

        match api.apply_schedule(&ApplyScheduleRequest { schedule_plan }).await {
            Ok(message) => {
                self.notify(Notice::info(message.clone()));
                Ok(message)
            }
            Err(e) => Err(self.fail("Applying the schedule failed", e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: &str, completed: bool) -> Task {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "task": format!("task {}", id),
            "completed": completed
        }))
        .unwrap()
    }

    #[test]
    fn stats_follow_the_list() {
        let stats = TaskStats::from_tasks(&[task("1", true), task("2", false), task("3", false)]);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.completion_rate, 33);
        assert_eq!(TaskStats::from_tasks(&[]), TaskStats::default());
    }

    #[test]
    fn replace_recomputes_stats() {
        let mut state = DashboardState::new();
        state.set_tasks(vec![task("1", false), task("2", false)]);
        assert_eq!(state.stats().completion_rate, 0);

        state.replace(task("2", true));
        assert_eq!(state.stats().completed, 1);
        assert_eq!(state.stats().completion_rate, 50);
    }

    #[test]
    fn notices_are_taken_once() {
        let mut state = DashboardState::new();
        state.notify(Notice::info("hello"));
        state.notify(Notice::error("oops"));
        assert_eq!(state.take_notices(), vec![Notice::info("hello"), Notice::error("oops")]);
        assert!(state.take_notices().is_empty());
    }

    #[tokio::test]
    async fn load_marks_state_loaded() {
        let api = crate::api::InMemoryTaskApi::with_tasks(vec![task("1", false)]);
        let mut state = DashboardState::new();
        assert!(!state.is_loaded());

        api.set_offline(true);
        assert!(state.load(&api).await.is_err());
        assert!(!state.is_loaded());

        api.set_offline(false);
        state.load(&api).await.unwrap();
        assert!(state.is_loaded());
    }

    #[test]
    fn begin_edit_requires_a_loaded_task() {
        let mut state = DashboardState::new();
        state.set_tasks(vec![task("1", false)]);
        assert!(state.begin_edit("1").is_ok());
        assert!(state.editing().is_some());
        assert!(matches!(state.begin_edit("9"), Err(AppError::NotFound(_))));
    }
}
