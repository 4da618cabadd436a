use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use axum::Router;
use serde_json::{Value, json};
use tower::ServiceExt;

use taskflow::api::InMemoryTaskApi;
use taskflow::config::FrontendConfig;
use taskflow::models::Task;
use taskflow::routes::router;
use taskflow::state::AppState;

fn task(id: &str, text: &str, priority: Option<&str>, completed: bool) -> Task {
    serde_json::from_value(json!({
        "id": id,
        "task": text,
        "priority": priority,
        "completed": completed
    }))
    .expect("valid task")
}

fn app(api: Arc<InMemoryTaskApi>) -> (Router, AppState) {
    let state = AppState::new(api, FrontendConfig::default());
    (router(state.clone()), state)
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("readable body");
    String::from_utf8(bytes.to_vec()).expect("utf-8 body")
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).expect("request")
}

fn post_form(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .expect("request")
}

#[tokio::test]
async fn home_page_links_to_dashboard() {
    let (app, _) = app(Arc::new(InMemoryTaskApi::new()));

    let response = app.oneshot(get("/")).await.expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Smart Tasks. Smarter Decisions."));
    assert!(html.contains(r#"href="/dashboard""#));
}

#[tokio::test]
async fn dashboard_renders_tasks_and_stats() {
    let api = Arc::new(InMemoryTaskApi::with_tasks(vec![
        task("1", "Plan <sprint>", Some("High"), false),
        task("2", "Archive mail", None, true),
    ]));
    let (app, _) = app(api);

    let response = app.oneshot(get("/dashboard")).await.expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Plan &lt;sprint&gt;"));
    assert!(html.contains("<dt>Completion Rate</dt><dd>50%</dd>"));
    assert!(html.contains("Default User"));
    assert!(html.contains(r#"action="/dashboard/tasks/1/complete""#));
    assert!(!html.contains(r#"action="/dashboard/tasks/2/complete""#));
}

#[tokio::test]
async fn dashboard_links_tasks_to_calendar() {
    let mut due = task("1", "File taxes", None, false);
    due.due_date = Some("2025-04-15".to_string());
    let (app, _) = app(Arc::new(InMemoryTaskApi::with_tasks(vec![due])));

    let html = body_text(app.oneshot(get("/dashboard")).await.expect("response")).await;

    assert!(html.contains(r#"title="Add to Google Calendar""#));
    assert!(html.contains("action=TEMPLATE&amp;text=File+taxes"));
    assert!(html.contains("dates=20250415%2F20250416"));
}

#[tokio::test]
async fn dashboard_reports_unreachable_backend() {
    let api = Arc::new(InMemoryTaskApi::new());
    api.set_offline(true);
    let (app, _) = app(api);

    let html = body_text(app.oneshot(get("/dashboard")).await.expect("response")).await;

    assert!(html.contains(r#"<p role="alert">Could not load tasks. Is backend running?</p>"#));
}

#[tokio::test]
async fn add_task_redirects_and_shows_notice_once() {
    let api = Arc::new(InMemoryTaskApi::with_tasks(vec![task("1", "Old task", None, false)]));
    let (app, state) = app(api.clone());
    app.clone().oneshot(get("/dashboard")).await.expect("response");

    let response = app
        .clone()
        .oneshot(post_form(
            "/dashboard/tasks",
            "task=Call+mom&due_date=2025-11-20&estimated_minutes=15&recurrence=weekly&reminders=",
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/dashboard");

    let html = body_text(app.clone().oneshot(get("/dashboard")).await.expect("response")).await;
    assert!(html.contains("Call mom"));
    assert!(html.contains(r#"<p role="status">Task added successfully!</p>"#));
    let new_card = html.find("<h3>Call mom</h3>").expect("new card");
    let old_card = html.find("<h3>Old task</h3>").expect("old card");
    assert!(new_card < old_card);
    {
        let dashboard = state.dashboard.lock().await;
        let order: Vec<&str> = dashboard.tasks().iter().map(|t| t.task.as_str()).collect();
        assert_eq!(order, ["Call mom", "Old task"]);
    }

    let again = body_text(app.oneshot(get("/dashboard")).await.expect("response")).await;
    assert!(!again.contains("Task added successfully!"));
}

#[tokio::test]
async fn refresh_reloads_backend_order() {
    let api = Arc::new(InMemoryTaskApi::with_tasks(vec![task("1", "Old task", None, false)]));
    let (app, state) = app(api.clone());
    app.clone()
        .oneshot(post_form("/dashboard/tasks", "task=Brand+new&reminders="))
        .await
        .expect("response");
    assert_eq!(state.dashboard.lock().await.tasks()[0].task, "Brand new");

    app.oneshot(get("/dashboard?refresh=true")).await.expect("response");
    let dashboard = state.dashboard.lock().await;
    assert_eq!(dashboard.tasks().len(), 2);
    assert_eq!(dashboard.tasks()[0].task, "Old task");
}

#[tokio::test]
async fn edit_flow_updates_task() {
    let api = Arc::new(InMemoryTaskApi::with_tasks(vec![task("7", "Draft", None, false)]));
    let (app, state) = app(api);

    let response = app
        .clone()
        .oneshot(get("/dashboard/tasks/7/edit"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(state.dashboard.lock().await.editing().is_some());

    let response = app
        .clone()
        .oneshot(post_form(
            "/dashboard/tasks/7",
            "task=Final+draft&category=Work&priority=High&status=in-progress&completed=on&reminders=",
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let dashboard = state.dashboard.lock().await;
    assert!(dashboard.editing().is_none());
    assert_eq!(dashboard.tasks()[0].task, "Final draft");
    assert!(dashboard.tasks()[0].completed);
    assert_eq!(dashboard.stats().completion_rate, 100);
}

#[tokio::test]
async fn complete_and_delete_update_view_state() {
    let api = Arc::new(InMemoryTaskApi::with_tasks(vec![
        task("1", "One", None, false),
        task("2", "Two", None, false),
    ]));
    let (app, state) = app(api);
    app.clone().oneshot(get("/dashboard")).await.expect("response");

    app.clone()
        .oneshot(post_form("/dashboard/tasks/1/complete", ""))
        .await
        .expect("response");
    assert_eq!(state.dashboard.lock().await.stats().completed, 1);

    app.oneshot(post_form("/dashboard/tasks/2/delete", ""))
        .await
        .expect("response");
    let dashboard = state.dashboard.lock().await;
    assert_eq!(dashboard.stats().total, 1);
    assert_eq!(dashboard.stats().completion_rate, 100);
}

#[tokio::test]
async fn ai_panel_renders_and_dismisses() {
    let api = Arc::new(InMemoryTaskApi::with_tasks(vec![task("1", "Stretch", None, false)]));
    api.set_suggestion(
        serde_json::from_value(json!({
            "categorized": [{"task": "Stretch", "category": "Health", "priority": "Low", "score": 0.42}],
            "schedule_plan": [],
            "reminder_recs": [],
            "explanation": "Quick win."
        }))
        .expect("valid suggestion"),
    );
    let (app, _) = app(api);
    app.clone().oneshot(get("/dashboard")).await.expect("response");

    app.clone()
        .oneshot(post_form("/dashboard/ai", "user_input="))
        .await
        .expect("response");
    let html = body_text(app.clone().oneshot(get("/dashboard")).await.expect("response")).await;
    assert!(html.contains("AI Analysis"));
    assert!(html.contains("Stretch | Health | Low | Score: 0.42"));
    assert!(html.contains("Quick win."));

    app.clone()
        .oneshot(post_form("/dashboard/ai/dismiss", ""))
        .await
        .expect("response");
    let html = body_text(app.oneshot(get("/dashboard")).await.expect("response")).await;
    assert!(!html.contains("AI Analysis"));
}

#[tokio::test]
async fn insights_json_groups_tasks() {
    let api = Arc::new(InMemoryTaskApi::with_tasks(vec![
        task("1", "a", Some("High"), true),
        task("2", "b", Some("High"), false),
        task("3", "c", None, false),
    ]));
    let (app, _) = app(api);

    let response = app.oneshot(get("/insights.json")).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let report: Value = serde_json::from_str(&body_text(response).await).expect("json body");
    assert_eq!(report["totals"], 3);
    assert_eq!(report["pending"], 2);
    assert_eq!(report["completion_percentage"], 33);
    assert_eq!(report["priority_chart"]["labels"], json!(["High", "Unspecified"]));
    assert_eq!(report["priority_chart"]["data"], json!([2, 1]));
    assert_eq!(report["category_chart"]["labels"], json!(["Uncategorized"]));
}

#[tokio::test]
async fn insights_json_surfaces_backend_errors() {
    let api = Arc::new(InMemoryTaskApi::new());
    api.set_offline(true);
    let (app, _) = app(api);

    let response = app.oneshot(get("/insights.json")).await.expect("response");
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    let body: Value = serde_json::from_str(&body_text(response).await).expect("json body");
    assert_eq!(body["message"], "Service unavailable");
}

#[tokio::test]
async fn profile_edit_saves_changes() {
    let api = Arc::new(InMemoryTaskApi::new());
    let (app, _) = app(api.clone());

    let html = body_text(app.clone().oneshot(get("/profile?edit=true")).await.expect("response")).await;
    assert!(html.contains(r#"name="name" value="Default User""#));

    let response = app
        .clone()
        .oneshot(post_form("/profile", "name=Robin&timezone=Asia%2FTokyo&email=on"))
        .await
        .expect("response");
    assert_eq!(response.headers()[header::LOCATION], "/profile");

    let html = body_text(app.oneshot(get("/profile")).await.expect("response")).await;
    assert!(html.contains("Robin (Asia/Tokyo)"));
    assert!(html.contains("Profile updated successfully!"));

    use taskflow::api::TaskApi;
    let stored = api.get_user("default_user").await.expect("stored user");
    assert!(!stored.notification_methods.webpush);
    assert!(stored.notification_methods.email);
}

#[tokio::test]
async fn notification_form_returns_to_posting_page() {
    let api = Arc::new(InMemoryTaskApi::new());
    let (app, _) = app(api.clone());

    let html = body_text(app.clone().oneshot(get("/profile")).await.expect("response")).await;
    assert!(html.contains(r#"name="return_to" value="/profile""#));

    let response = app
        .clone()
        .oneshot(post_form("/profile/notifications", "email=on&return_to=%2Fprofile"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/profile");

    let html = body_text(app.clone().oneshot(get("/profile")).await.expect("response")).await;
    assert!(html.contains("Notification preferences updated!"));

    use taskflow::api::TaskApi;
    let stored = api.get_user("default_user").await.expect("stored user");
    assert!(!stored.notification_methods.webpush);
    assert!(stored.notification_methods.email);

    let response = app
        .oneshot(post_form(
            "/profile/notifications",
            "webpush=on&return_to=https%3A%2F%2Fexample.com",
        ))
        .await
        .expect("response");
    assert_eq!(response.headers()[header::LOCATION], "/dashboard");
}

#[tokio::test]
async fn health_follows_backend() {
    let api = Arc::new(InMemoryTaskApi::new());
    let (app, _) = app(api.clone());
    assert_eq!(
        app.clone().oneshot(get("/health")).await.expect("response").status(),
        StatusCode::OK
    );

    api.set_offline(true);
    assert_eq!(
        app.oneshot(get("/health")).await.expect("response").status(),
        StatusCode::BAD_GATEWAY
    );
}
