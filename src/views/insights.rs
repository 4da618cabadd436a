//! Statistics and chart datasets for the insights page.

use serde::Serialize;

use super::percentage;
use crate::models::Task;

pub const UNSPECIFIED_PRIORITY: &str = "Unspecified";
pub const UNCATEGORIZED: &str = "Uncategorized";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub label: String,
    pub labels: Vec<String>,
    pub data: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insights {
    pub totals: usize,
    pub completed: usize,
    pub pending: usize,
    pub completion_percentage: u32,
    /// Counts in first-seen order.
    pub by_priority: Vec<(String, usize)>,
    pub by_category: Vec<(String, usize)>,
}

fn count_by<'a>(keys: impl Iterator<Item = &'a str>) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for key in keys {
        match counts.iter_mut().find(|(k, _)| k == key) {
            Some((_, n)) => *n += 1,
            None => counts.push((key.to_string(), 1)),
        }
    }
    counts
}

impl Insights {
    pub fn from_tasks(tasks: &[Task]) -> Self {
        let totals = tasks.len();
        let completed = tasks.iter().filter(|t| t.completed).count();

        Self {
            totals,
            completed,
            pending: totals - completed,
            completion_percentage: percentage(completed, totals),
            by_priority: count_by(tasks.iter().map(|t| {
                t.priority
                    .as_deref()
                    .filter(|p| !p.is_empty())
                    .unwrap_or(UNSPECIFIED_PRIORITY)
            })),
            by_category: count_by(tasks.iter().map(|t| {
                t.category
                    .as_deref()
                    .filter(|c| !c.is_empty())
                    .unwrap_or(UNCATEGORIZED)
            })),
        }
    }

    fn chart(label: &str, counts: &[(String, usize)]) -> Option<ChartData> {
        if counts.is_empty() {
            return None;
        }
        Some(ChartData {
            label: label.to_string(),
            labels: counts.iter().map(|(k, _)| k.clone()).collect(),
            data: counts.iter().map(|(_, n)| *n).collect(),
        })
    }

    pub fn category_chart(&self) -> Option<ChartData> {
        Self::chart("Tasks by Category", &self.by_category)
    }

    pub fn priority_chart(&self) -> Option<ChartData> {
        Self::chart("Tasks by Priority", &self.by_priority)
    }
}

/// Body of `GET /insights.json`.
#[derive(Debug, Serialize)]
pub struct InsightsReport {
    #[serde(flatten)]
    pub insights: Insights,
    pub category_chart: Option<ChartData>,
    pub priority_chart: Option<ChartData>,
}

impl From<Insights> for InsightsReport {
    fn from(insights: Insights) -> Self {
        Self {
            category_chart: insights.category_chart(),
            priority_chart: insights.priority_chart(),
            insights,
        }
    }
}
