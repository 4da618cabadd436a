pub mod calendar;
pub mod card;
pub mod dashboard;
pub mod forms;
pub mod html;
pub mod insights;
pub mod profile;
pub mod suggestions;

pub use dashboard::{DashboardState, Notice, NoticeKind, TaskStats};
pub use forms::{EditTaskForm, TaskInputForm};
pub use insights::Insights;
pub use profile::ProfileState;

/// Percentage of `part` in `total`, rounded half up; 0 for an empty total.
pub fn percentage(part: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((part * 200 + total) / (total * 2)) as u32
}

#[cfg(test)]
mod tests {
    use super::percentage;

    #[test]
    fn percentage_rounds_half_up() {
        assert_eq!(percentage(0, 0), 0);
        assert_eq!(percentage(1, 3), 33);
        assert_eq!(percentage(2, 3), 67);
        assert_eq!(percentage(1, 8), 13);
        assert_eq!(percentage(4, 4), 100);
    }
}
