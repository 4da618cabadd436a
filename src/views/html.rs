//! Plain HTML rendering. Markup is semantic only; there is no styling.

use super::card::TaskCardView;
use super::dashboard::{DashboardState, Notice, NoticeKind};
use super::forms::{CATEGORIES, EditTaskForm, PRIORITIES, RECURRENCES, TaskInputForm};
use super::insights::{ChartData, Insights};
use super::profile::TIMEZONES;
use super::suggestions::SuggestionsView;
use crate::models::{TaskStatus, User};

const APP_NAME: &str = "TaskFlow AI";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Home,
    Dashboard,
    Insights,
    Profile,
}

const NAV: [(Page, &str, &str); 3] = [
    (Page::Home, "Home", "/"),
    (Page::Dashboard, "Dashboard", "/dashboard"),
    (Page::Insights, "Insights", "/insights"),
];

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, active: Page, notices: &[Notice], body: &str) -> String {
    let mut nav = String::new();
    for (page, name, path) in NAV {
        let current = if page == active { r#" aria-current="page""# } else { "" };
        nav.push_str(&format!(r#"<a href="{}"{}>{}</a> "#, path, current, name));
    }

    let mut flashes = String::new();
    for notice in notices {
        let role = match notice.kind {
            NoticeKind::Info => "status",
            NoticeKind::Error => "alert",
        };
        flashes.push_str(&format!(
            r#"<p role="{}">{}</p>"#,
            role,
            escape(&notice.message)
        ));
    }

    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head><meta charset=\"utf-8\"><title>{} | {}</title></head>\n<body>\n<nav><strong>{}</strong> {}</nav>\n{}\n<main>\n{}\n</main>\n</body>\n</html>\n",
        escape(title),
        APP_NAME,
        APP_NAME,
        nav,
        flashes,
        body
    )
}

fn options<'a>(values: impl IntoIterator<Item = (&'a str, &'a str)>, selected: &str) -> String {
    values
        .into_iter()
        .map(|(value, label)| {
            let sel = if value == selected { " selected" } else { "" };
            format!(
                r#"<option value="{}"{}>{}</option>"#,
                escape(value),
                sel,
                escape(label)
            )
        })
        .collect()
}

pub fn home_page() -> String {
    let body = r#"<h1>Smart Tasks. Smarter Decisions.</h1>
<p>Powered by AI. Designed for productivity. Built for the future.</p>
<p><a href="/dashboard">Get started</a></p>"#;
    layout("Home", Page::Home, &[], body)
}

fn input_form(form: &TaskInputForm) -> String {
    format!(
        r#"<section aria-label="New task">
<form method="post" action="/dashboard/tasks">
<input type="text" name="task" value="{}" placeholder="What do you need to do?" required>
<input type="date" name="due_date" value="{}">
<input type="number" name="estimated_minutes" value="{}" placeholder="Est. minutes" min="0">
<select name="recurrence">{}</select>
<label>Reminders (one per line)<textarea name="reminders">{}</textarea></label>
<button type="submit">Add Task</button>
</form>
</section>"#,
        escape(&form.task),
        escape(&form.due_date),
        escape(&form.estimated_minutes),
        options(
            std::iter::once(("", "No recurrence")).chain(RECURRENCES.iter().map(|r| (*r, *r))),
            &form.recurrence
        ),
        escape(&form.reminders.join("\n")),
    )
}

fn edit_form(form: &EditTaskForm) -> String {
    let all = TaskStatus::ALL;
    let statuses: Vec<(&str, &str)> = all.iter().map(|s| (s.as_str(), s.label())).collect();
    format!(
        r#"<section aria-label="Edit task">
<h2>Edit Task</h2>
<form method="post" action="/dashboard/tasks/{id}">
<input type="text" name="task" value="{task}" placeholder="What needs to be done?" required>
<select name="category">{categories}</select>
<select name="priority">{priorities}</select>
<input type="date" name="due_date" value="{due}">
<input type="number" name="estimated_minutes" value="{minutes}" placeholder="30" min="0">
<input type="hidden" name="recurrence" value="{recurrence}">
<label>Reminders (one per line)<textarea name="reminders">{reminders}</textarea></label>
<select name="status">{statuses}</select>
<label><input type="checkbox" name="completed"{checked}> Completed</label>
<button type="submit">Update Task</button>
<button type="submit" formaction="/dashboard/edit/cancel" formnovalidate>Cancel</button>
</form>
</section>"#,
        id = escape(&form.id),
        task = escape(&form.task),
        categories = options(CATEGORIES.iter().map(|c| (*c, *c)), &form.category),
        priorities = options(PRIORITIES.iter().map(|p| (*p, *p)), &form.priority),
        due = escape(&form.due_date),
        minutes = escape(&form.estimated_minutes),
        recurrence = escape(&form.recurrence),
        reminders = escape(&form.reminders.join("\n")),
        statuses = options(statuses, form.status.as_str()),
        checked = if form.completed { " checked" } else { "" },
    )
}

fn task_card(card: &TaskCardView) -> String {
    let mut meta = vec![
        format!(r#"<span class="category-tag">{}</span>"#, escape(&card.category)),
        format!(r#"<span class="{}">{}</span>"#, card.priority_class, escape(&card.priority)),
        format!(r#"<span class="status-{}">{}</span>"#, escape(&card.status), escape(&card.status_label)),
    ];
    if let Some(due) = &card.due_date {
        meta.push(format!("<span>Due: {}</span>", escape(due)));
    }
    if let Some(minutes) = card.estimated_minutes {
        meta.push(format!("<span>{} min</span>", minutes));
    }
    if let Some(score) = &card.score {
        meta.push(format!("<span>Score: {}</span>", score));
    }

    let reminders: String = card
        .reminders
        .iter()
        .map(|r| match &r.calendar_url {
            Some(url) => format!(
                r#"<li>{} <a href="{}" target="_blank" title="Add to Calendar">Add to Calendar</a></li>"#,
                escape(&r.label),
                escape(url)
            ),
            None => format!("<li>{}</li>", escape(&r.label)),
        })
        .collect();
    let reminders = if reminders.is_empty() {
        String::new()
    } else {
        format!("<ul>{}</ul>", reminders)
    };

    let calendar = card
        .calendar_url
        .as_ref()
        .map(|url| {
            format!(
                r#"<a href="{}" target="_blank" title="Add to Google Calendar">Add to Calendar</a>"#,
                escape(url)
            )
        })
        .unwrap_or_default();

    let id = escape(&card.id);
    let complete = if card.can_complete {
        format!(
            r#"<form method="post" action="/dashboard/tasks/{}/complete"><button aria-label="Complete task">Complete</button></form>"#,
            id
        )
    } else {
        String::new()
    };

    format!(
        r#"<li><article>
<h3>{title}</h3>
<p>{meta}</p>
{reminders}
{calendar}
{complete}
<a href="/dashboard/tasks/{id}/edit" aria-label="Edit task">Edit</a>
<form method="post" action="/dashboard/tasks/{id}/delete"><button aria-label="Delete task">Delete</button></form>
</article></li>"#,
        title = if card.completed {
            format!("<s>{}</s>", escape(&card.title))
        } else {
            escape(&card.title)
        },
        meta = meta.join(" "),
        reminders = reminders,
        calendar = calendar,
        complete = complete,
        id = id,
    )
}

fn task_list(state: &DashboardState) -> String {
    if state.tasks().is_empty() {
        return "<section aria-label=\"Tasks\"><p>No tasks yet. Add one to get started.</p></section>"
            .to_string();
    }
    let cards: String = state
        .tasks()
        .iter()
        .map(|t| task_card(&TaskCardView::new(t)))
        .collect();
    format!(r#"<section aria-label="Tasks"><ul>{}</ul></section>"#, cards)
}

fn suggestions_panel(view: &SuggestionsView) -> String {
    let mut body = String::from("<section aria-label=\"AI Analysis\">\n<h2>AI Analysis</h2>\n");

    body.push_str("<h3>Categorized Tasks</h3>");
    if view.categorized.is_empty() {
        body.push_str("<p>No categorized tasks.</p>");
    } else {
        body.push_str("<ul>");
        for row in &view.categorized {
            body.push_str(&format!(
                "<li>{} | {} | {}{}</li>",
                escape(&row.task),
                escape(&row.category),
                escape(&row.priority),
                row.score
                    .as_ref()
                    .map(|s| format!(" | Score: {}", s))
                    .unwrap_or_default()
            ));
        }
        body.push_str("</ul>");
    }

    if !view.schedule.is_empty() {
        body.push_str("<h3>Schedule Plan</h3><ul>");
        for row in &view.schedule {
            body.push_str(&format!(
                "<li>{}: {} to {} ({})</li>",
                escape(&row.task),
                escape(&row.start),
                escape(&row.end),
                escape(&row.reason)
            ));
        }
        body.push_str(
            "</ul><form method=\"post\" action=\"/dashboard/ai/apply\"><button>Apply Schedule</button></form>",
        );
    }

    if !view.reminders.is_empty() {
        body.push_str("<h3>Reminder Recommendations</h3><ul>");
        for row in &view.reminders {
            body.push_str(&format!(
                "<li>{}: {} via {}</li>",
                escape(&row.task),
                escape(&row.at),
                escape(&row.method)
            ));
        }
        body.push_str("</ul>");
    }

    body.push_str("<h3>Next Suggested Task</h3>");
    match &view.next_task {
        Some(next) => body.push_str(&format!("<p>{}</p>", escape(next))),
        None => body.push_str("<p>No specific task suggested.</p>"),
    }
    if let Some(explanation) = &view.explanation {
        body.push_str(&format!("<p>{}</p>", escape(explanation)));
    }

    body.push_str(
        "\n<form method=\"post\" action=\"/dashboard/ai/dismiss\"><button aria-label=\"Close\">Close</button></form>\n</section>",
    );
    body
}

fn profile_panel(user: Option<&User>, editing: bool, return_to: &str) -> String {
    let Some(user) = user else {
        return "<section aria-label=\"Profile\"><p>Profile unavailable.</p></section>".to_string();
    };
    let initial = user.initial().map(|c| c.to_string()).unwrap_or_default();
    let checked = |on: bool| if on { " checked" } else { "" };

    if editing {
        format!(
            r#"<section aria-label="Profile">
<h2>Profile</h2>
<form method="post" action="/profile">
<input type="text" name="name" value="{}" placeholder="Your name">
<select name="timezone">{}</select>
<label><input type="checkbox" name="webpush"{}> Web Push</label>
<label><input type="checkbox" name="email"{}> Email</label>
<button type="submit">Save</button>
</form>
<a href="/profile">Cancel</a>
</section>"#,
            escape(&user.name),
            options(TIMEZONES.iter().copied(), &user.timezone),
            checked(user.notification_methods.webpush),
            checked(user.notification_methods.email),
        )
    } else {
        format!(
            r#"<section aria-label="Profile">
<h2>Profile</h2>
<p><span aria-hidden="true">{}</span> {} ({})</p>
<form method="post" action="/profile/notifications">
<input type="hidden" name="return_to" value="{}">
<label><input type="checkbox" name="webpush"{}> Web Push</label>
<label><input type="checkbox" name="email"{}> Email</label>
<button type="submit">Update notifications</button>
</form>
<a href="/profile?edit=true">Edit</a>
</section>"#,
            escape(&initial),
            escape(&user.name),
            escape(&user.timezone),
            escape(return_to),
            checked(user.notification_methods.webpush),
            checked(user.notification_methods.email),
        )
    }
}

pub struct DashboardPage<'a> {
    pub state: &'a DashboardState,
    pub user: Option<&'a User>,
    pub notices: &'a [Notice],
}

pub fn dashboard_page(page: &DashboardPage<'_>) -> String {
    let state = page.state;
    let stats = state.stats();
    let mut body = String::from("<h1>Dashboard</h1>\n");

    body.push_str(&input_form(&state.input));
    body.push_str(
        r#"
<section aria-label="AI Assistant">
<p>Get smart suggestions for task prioritization and categorization</p>
<form method="post" action="/dashboard/ai">
<input type="text" name="user_input" placeholder="What should I do next?">
<button type="submit">Get AI Suggestions</button>
</form>
</section>
"#,
    );
    body.push_str(&profile_panel(page.user, false, "/dashboard"));
    body.push_str(&format!(
        r#"
<section aria-label="Stats">
<dl><dt>Total Tasks</dt><dd>{}</dd><dt>Completed</dt><dd>{}</dd><dt>Completion Rate</dt><dd>{}%</dd></dl>
<a href="/dashboard?refresh=true">Refresh</a>
</section>
"#,
        stats.total, stats.completed, stats.completion_rate
    ));
    if let Some(form) = state.editing() {
        body.push_str(&edit_form(form));
    }
    if let Some(suggestion) = state.suggestions() {
        body.push_str(&suggestions_panel(&SuggestionsView::new(suggestion)));
    }
    body.push_str(&task_list(state));

    layout("Dashboard", Page::Dashboard, page.notices, &body)
}

fn chart_table(title: &str, chart: Option<&ChartData>, empty: &str) -> String {
    let Some(chart) = chart else {
        return format!("<section aria-label=\"{0}\"><h2>{0}</h2><p>{1}</p></section>", title, empty);
    };
    let rows: String = chart
        .labels
        .iter()
        .zip(&chart.data)
        .map(|(label, n)| format!("<tr><th scope=\"row\">{}</th><td>{}</td></tr>", escape(label), n))
        .collect();
    format!(
        "<section aria-label=\"{0}\"><h2>{0}</h2><table><caption>{1}</caption>{2}</table></section>",
        title,
        escape(&chart.label),
        rows
    )
}

pub fn insights_page(insights: &Insights, notices: &[Notice]) -> String {
    let mut body = String::from("<h1>Insights</h1>\n");
    body.push_str(&format!(
        r#"<section aria-label="Summary">
<dl><dt>Total Tasks</dt><dd>{}</dd><dt>Completed</dt><dd>{}</dd><dt>Pending</dt><dd>{}</dd><dt>Completion</dt><dd>{}%</dd></dl>
</section>
"#,
        insights.totals, insights.completed, insights.pending, insights.completion_percentage
    ));
    body.push_str(&chart_table(
        "Category Distribution",
        insights.category_chart().as_ref(),
        "No category data available",
    ));
    body.push_str(&chart_table(
        "Priority Distribution",
        insights.priority_chart().as_ref(),
        "No priority data available",
    ));
    body.push_str(
        r#"
<section aria-label="Productivity Tips">
<h2>Productivity Tips</h2>
<ul>
<li>Tackle high-priority tasks when your energy is highest.</li>
<li>Break large tasks into pieces that fit your usual completion time.</li>
<li>Set reminders for tasks with a due date.</li>
</ul>
</section>"#,
    );
    layout("Insights", Page::Insights, notices, &body)
}

pub fn profile_page(user: Option<&User>, editing: bool, notices: &[Notice]) -> String {
    layout("Profile", Page::Profile, notices, &profile_panel(user, editing, "/profile"))
}
