pub mod dashboard;
pub mod email_template;
pub mod notification;
pub mod project;
pub mod schedule;
pub mod user;
pub mod work_item;

pub use dashboard::{DashboardSnapshot, MonthlyCount, ProjectCountByStatus, StatusCount};
pub use email_template::EmailTemplate;
pub use notification::{DispatchOutcome, NotificationJob, OutgoingMail, Recipient, SendResult};
pub use project::{Project, ProjectWithMembers};
pub use schedule::{Announcement, Appointment, Meeting};
pub use user::{User, UserSummary};
pub use work_item::{WorkItem, WorkItemWithAssignee};
