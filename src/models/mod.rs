pub mod suggestion;
pub mod task;
pub mod user;

pub use suggestion::{
    AiSuggestRequest, AiSuggestion, ApplyScheduleRequest, CategorizedTask, ReminderRec,
    SchedulePlan, UserStats,
};
pub use task::{AddTaskRequest, DeleteTaskRequest, EditTaskRequest, Task, TaskStatus};
pub use user::{NotificationMethods, User};
