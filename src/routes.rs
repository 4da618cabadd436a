use axum::extract::{Form, Path, Query, State};
use axum::http::StatusCode;
use axum::response::{Html, Redirect};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::AppError;
use crate::models::suggestion::DEFAULT_USER_INPUT;
use crate::state::AppState;
use crate::views::forms::TaskFormFields;
use crate::views::html::{self, DashboardPage};
use crate::views::insights::InsightsReport;
use crate::views::profile::ProfileFields;
use crate::views::{DashboardState, EditTaskForm, Insights, Notice, ProfileState, TaskInputForm};

#[derive(Deserialize)]
struct PromptFields {
    #[serde(default)]
    user_input: Option<String>,
}

#[derive(Deserialize)]
struct DashboardQuery {
    #[serde(default)]
    refresh: bool,
}

#[derive(Deserialize)]
struct ProfileQuery {
    #[serde(default)]
    edit: bool,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/health", get(health))
        .route("/dashboard", get(dashboard))
        .route("/dashboard/tasks", post(add_task))
        .route("/dashboard/tasks/{id}", post(update_task))
        .route("/dashboard/tasks/{id}/edit", get(edit_task))
        .route("/dashboard/tasks/{id}/delete", post(delete_task))
        .route("/dashboard/tasks/{id}/complete", post(complete_task))
        .route("/dashboard/edit/cancel", post(cancel_edit))
        .route("/dashboard/ai", post(ai_suggest))
        .route("/dashboard/ai/dismiss", post(dismiss_suggestions))
        .route("/dashboard/ai/apply", post(apply_schedule))
        .route("/profile", get(profile).post(update_profile))
        .route("/profile/notifications", post(update_notifications))
        .route("/insights", get(insights))
        .route("/insights.json", get(insights_json))
        .with_state(state)
}

fn log_failure<T>(action: &str, result: Result<T, AppError>) {
    if let Err(e) = result {
        debug!("{} did not complete: {}", action, e);
    }
}

/// Fetches the list on first use only; later views keep the local order.
async fn ensure_loaded(state: &AppState, dashboard: &mut DashboardState) {
    if !dashboard.is_loaded() {
        let result = dashboard.load(state.api.as_ref()).await;
        log_failure("task load", result);
    }
}

async fn ensure_profile(state: &AppState, profile: &mut ProfileState) {
    if profile.user().is_none() {
        let result = profile
            .load(state.api.as_ref(), &state.config.user_id, &state.config.timezone)
            .await
            .map(|_| ());
        log_failure("profile load", result);
    }
}

async fn home() -> Html<String> {
    Html(html::home_page())
}

async fn health(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    state.api.list_tasks().await?;
    Ok(StatusCode::OK)
}

async fn dashboard(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> Html<String> {
    let mut dashboard = state.dashboard.lock().await;
    if query.refresh {
        let result = dashboard.load(state.api.as_ref()).await;
        log_failure("task load", result);
    } else {
        ensure_loaded(&state, &mut dashboard).await;
    }

    let mut profile = state.profile.lock().await;
    ensure_profile(&state, &mut profile).await;

    let mut notices = dashboard.take_notices();
    notices.extend(profile.take_notice());

    Html(html::dashboard_page(&DashboardPage {
        state: &*dashboard,
        user: profile.user(),
        notices: &notices,
    }))
}

async fn add_task(
    State(state): State<AppState>,
    Form(fields): Form<TaskFormFields>,
) -> Redirect {
    let mut dashboard = state.dashboard.lock().await;
    ensure_loaded(&state, &mut dashboard).await;
    dashboard.input = TaskInputForm::from(fields);
    let result = dashboard
        .add(state.api.as_ref(), &state.config.user_id)
        .await;
    log_failure("add task", result);
    Redirect::to("/dashboard")
}

async fn edit_task(State(state): State<AppState>, Path(id): Path<String>) -> Redirect {
    let mut dashboard = state.dashboard.lock().await;
    if dashboard.begin_edit(&id).is_err() {
        // The list may be stale; reload once before giving up.
        let reloaded = dashboard.load(state.api.as_ref()).await;
        log_failure("task load", reloaded);
        if let Err(e) = dashboard.begin_edit(&id) {
            warn!("cannot edit task {}: {}", id, e);
            dashboard.notify(Notice::error("Task not found"));
        }
    }
    Redirect::to("/dashboard")
}

async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(fields): Form<TaskFormFields>,
) -> Redirect {
    let form = EditTaskForm::from_fields(&id, fields);
    let mut dashboard = state.dashboard.lock().await;
    ensure_loaded(&state, &mut dashboard).await;
    let result = dashboard
        .update(state.api.as_ref(), form, &state.config.user_id)
        .await;
    log_failure("update task", result);
    Redirect::to("/dashboard")
}

async fn cancel_edit(State(state): State<AppState>) -> Redirect {
    state.dashboard.lock().await.cancel_edit();
    Redirect::to("/dashboard")
}

async fn delete_task(State(state): State<AppState>, Path(id): Path<String>) -> Redirect {
    let mut dashboard = state.dashboard.lock().await;
    ensure_loaded(&state, &mut dashboard).await;
    let result = dashboard.delete(state.api.as_ref(), &id).await;
    log_failure("delete task", result);
    Redirect::to("/dashboard")
}

async fn complete_task(State(state): State<AppState>, Path(id): Path<String>) -> Redirect {
    let mut dashboard = state.dashboard.lock().await;
    ensure_loaded(&state, &mut dashboard).await;
    let result = dashboard
        .complete(state.api.as_ref(), &id, &state.config.user_id)
        .await;
    log_failure("complete task", result);
    Redirect::to("/dashboard")
}

async fn ai_suggest(
    State(state): State<AppState>,
    Form(fields): Form<PromptFields>,
) -> Redirect {
    let user_input = fields
        .user_input
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_USER_INPUT.to_string());

    let mut dashboard = state.dashboard.lock().await;
    ensure_loaded(&state, &mut dashboard).await;
    let user = state.profile.lock().await.user().cloned();
    let result = dashboard
        .suggest(
            state.api.as_ref(),
            user.as_ref(),
            &state.config.timezone,
            &user_input,
        )
        .await;
    log_failure("AI suggestion", result);
    Redirect::to("/dashboard")
}

async fn dismiss_suggestions(State(state): State<AppState>) -> Redirect {
    state.dashboard.lock().await.dismiss_suggestions();
    Redirect::to("/dashboard")
}

async fn apply_schedule(State(state): State<AppState>) -> Redirect {
    let mut dashboard = state.dashboard.lock().await;
    let result = dashboard.apply_schedule(state.api.as_ref()).await;
    log_failure("apply schedule", result);
    Redirect::to("/dashboard")
}

async fn profile(
    State(state): State<AppState>,
    Query(query): Query<ProfileQuery>,
) -> Html<String> {
    let mut profile = state.profile.lock().await;
    ensure_profile(&state, &mut profile).await;
    profile.editing = query.edit;

    let notices: Vec<Notice> = profile.take_notice().into_iter().collect();
    Html(html::profile_page(profile.user(), profile.editing, &notices))
}

async fn update_profile(
    State(state): State<AppState>,
    Form(fields): Form<ProfileFields>,
) -> Redirect {
    let mut profile = state.profile.lock().await;
    ensure_profile(&state, &mut profile).await;
    let result = profile.update(state.api.as_ref(), &fields).await;
    log_failure("profile update", result);
    Redirect::to("/profile")
}

async fn update_notifications(
    State(state): State<AppState>,
    Form(fields): Form<ProfileFields>,
) -> Redirect {
    let mut profile = state.profile.lock().await;
    ensure_profile(&state, &mut profile).await;
    let result = profile
        .update_notifications(state.api.as_ref(), fields.notification_methods())
        .await;
    log_failure("notification update", result);
    Redirect::to(fields.return_page())
}

async fn insights(State(state): State<AppState>) -> Html<String> {
    let (tasks, notices) = match state.api.list_tasks().await {
        Ok(tasks) => (tasks, Vec::new()),
        Err(e) => {
            warn!("Error fetching tasks: {}", e);
            (Vec::new(), vec![Notice::error("Could not load tasks. Is backend running?")])
        }
    };
    Html(html::insights_page(&Insights::from_tasks(&tasks), &notices))
}

async fn insights_json(State(state): State<AppState>) -> Result<Json<InsightsReport>, AppError> {
    let tasks = state.api.list_tasks().await?;
    Ok(Json(Insights::from_tasks(&tasks).into()))
}
