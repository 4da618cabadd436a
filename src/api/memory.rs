use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;

use super::TaskApi;
use crate::error::AppError;
use crate::models::{
    AddTaskRequest, AiSuggestRequest, AiSuggestion, ApplyScheduleRequest, DeleteTaskRequest,
    EditTaskRequest, SchedulePlan, Task, TaskStatus, User,
};

#[derive(Default)]
struct Inner {
    tasks: Vec<Task>,
    users: HashMap<String, User>,
    next_id: u64,
    suggestion: AiSuggestion,
    suggestion_error: Option<(u16, String)>,
    offline: bool,
    applied: Vec<SchedulePlan>,
    last_suggest_request: Option<AiSuggestRequest>,
}

/// Process-local backend with the same request/response contract as the
/// HTTP one. Suggestions are canned via [`InMemoryTaskApi::set_suggestion`].
#[derive(Default)]
pub struct InMemoryTaskApi {
    inner: Mutex<Inner>,
}

impl InMemoryTaskApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        let next_id = tasks.len() as u64;
        Self {
            inner: Mutex::new(Inner {
                tasks,
                next_id,
                ..Inner::default()
            }),
        }
    }

    fn inner(&self) -> Result<MutexGuard<'_, Inner>, AppError> {
        let guard = self.inner.lock().map_err(|_| AppError::InternalServerError)?;
        if guard.offline {
            return Err(AppError::Api {
                status: 503,
                detail: "Service unavailable".to_string(),
            });
        }
        Ok(guard)
    }

    /// Makes every following call fail as if the backend were down.
    pub fn set_offline(&self, offline: bool) {
        if let Ok(mut guard) = self.inner.lock() {
            guard.offline = offline;
        }
    }

    pub fn set_suggestion(&self, suggestion: AiSuggestion) {
        if let Ok(mut guard) = self.inner.lock() {
            guard.suggestion = suggestion;
            guard.suggestion_error = None;
        }
    }

    pub fn set_suggestion_error(&self, status: u16, detail: &str) {
        if let Ok(mut guard) = self.inner.lock() {
            guard.suggestion_error = Some((status, detail.to_string()));
        }
    }

    pub fn insert_user(&self, user: User) {
        if let Ok(mut guard) = self.inner.lock() {
            guard.users.insert(user.id.clone(), user);
        }
    }

    pub fn applied_schedule(&self) -> Vec<SchedulePlan> {
        self.inner
            .lock()
            .map(|guard| guard.applied.clone())
            .unwrap_or_default()
    }

    pub fn last_suggest_request(&self) -> Option<AiSuggestRequest> {
        self.inner
            .lock()
            .ok()
            .and_then(|guard| guard.last_suggest_request.clone())
    }
}

fn validate_text(text: &str) -> Result<String, AppError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(AppError::Api {
            status: 422,
            detail: "Task cannot be empty".to_string(),
        });
    }
    Ok(trimmed.to_string())
}

fn task_not_found() -> AppError {
    AppError::Api {
        status: 404,
        detail: "Task not found".to_string(),
    }
}

fn user_not_found() -> AppError {
    AppError::Api {
        status: 404,
        detail: "User not found".to_string(),
    }
}

#[async_trait]
impl TaskApi for InMemoryTaskApi {
    async fn list_tasks(&self) -> Result<Vec<Task>, AppError> {
        Ok(self.inner()?.tasks.clone())
    }

    async fn add_task(&self, req: &AddTaskRequest) -> Result<Task, AppError> {
        let text = validate_text(&req.task)?;
        let mut inner = self.inner()?;
        inner.next_id += 1;
        let now = Utc::now().to_rfc3339();

        let task = Task {
            id: format!("task-{}", inner.next_id),
            task: text,
            category: None,
            priority: None,
            completed: false,
            due_date: req.due_date.clone(),
            user_id: Some(req.user_id.clone()),
            created_at: Some(now.clone()),
            updated_at: Some(now),
            reminders: req.reminders.clone(),
            recurrence: req.recurrence.clone(),
            estimated_minutes: req.estimated_minutes,
            status: TaskStatus::Pending,
            snooze_count: 0,
            last_ai_score: None,
        };
        inner.tasks.push(task.clone());
        Ok(task)
    }

    async fn edit_task(&self, req: &EditTaskRequest) -> Result<Task, AppError> {
        let text = validate_text(&req.task)?;
        let mut inner = self.inner()?;
        let task = inner
            .tasks
            .iter_mut()
            .find(|t| t.id == req.id)
            .ok_or_else(task_not_found)?;

        task.task = text;
        task.due_date = req.due_date.clone();
        task.reminders = req.reminders.clone();
        task.recurrence = req.recurrence.clone();
        task.estimated_minutes = req.estimated_minutes;
        task.completed = req.completed;
        task.updated_at = Some(Utc::now().to_rfc3339());
        if let Some(status) = &req.status {
            task.status = status.clone();
        }
        Ok(task.clone())
    }

    async fn delete_task(&self, req: &DeleteTaskRequest) -> Result<(), AppError> {
        let mut inner = self.inner()?;
        let before = inner.tasks.len();
        inner.tasks.retain(|t| t.id != req.id);
        if inner.tasks.len() == before {
            return Err(task_not_found());
        }
        Ok(())
    }

    async fn get_user(&self, user_id: &str) -> Result<User, AppError> {
        self.inner()?
            .users
            .get(user_id)
            .cloned()
            .ok_or_else(user_not_found)
    }

    async fn create_user(&self, user: &User) -> Result<User, AppError> {
        self.inner()?.users.insert(user.id.clone(), user.clone());
        Ok(user.clone())
    }

    async fn update_user(&self, user: &User) -> Result<User, AppError> {
        let mut inner = self.inner()?;
        let stored = inner.users.get_mut(&user.id).ok_or_else(user_not_found)?;
        *stored = user.clone();
        Ok(user.clone())
    }

    async fn ai_suggest(&self, req: &AiSuggestRequest) -> Result<AiSuggestion, AppError> {
        let mut inner = self.inner()?;
        inner.last_suggest_request = Some(req.clone());
        if let Some((status, detail)) = &inner.suggestion_error {
            return Err(AppError::Api {
                status: *status,
                detail: detail.clone(),
            });
        }

        let suggestion = inner.suggestion.clone();
        for item in &suggestion.categorized {
            if let Some(task) = inner.tasks.iter_mut().find(|t| t.task == item.task) {
                task.category = item.category.clone();
                task.priority = item.priority.clone();
                task.last_ai_score = item.score;
            }
        }
        Ok(suggestion)
    }

    async fn apply_schedule(&self, req: &ApplyScheduleRequest) -> Result<String, AppError> {
        let mut inner = self.inner()?;
        inner.applied.extend(req.schedule_plan.iter().cloned());
        Ok(format!("Applied schedule to {} tasks", req.schedule_plan.len()))
    }
}
