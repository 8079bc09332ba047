pub mod dispatcher;
pub mod get_dashboard;
pub mod get_template;
pub mod list_templates;
pub mod notify;
pub mod send_account_email;
pub mod send_activity_notification;
pub mod send_schedule_notification;
pub mod update_template;

pub use dispatcher::{Dispatcher, DISPATCH_DELAY};
pub use get_dashboard::GetDashboardUseCase;
pub use get_template::GetTemplateUseCase;
pub use list_templates::ListTemplatesUseCase;
pub use notify::{Envelope, NotifyUseCase};
pub use send_account_email::{AccountEmail, SendAccountEmailUseCase};
pub use send_activity_notification::{ActivityEvent, SendActivityNotificationUseCase};
pub use send_schedule_notification::{ScheduleEvent, SendScheduleNotificationUseCase};
pub use update_template::UpdateTemplateUseCase;
