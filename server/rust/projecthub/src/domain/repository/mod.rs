pub mod dashboard_repository;
pub mod email_template_repository;
pub mod project_repository;
pub mod setting_repository;
pub mod user_repository;
pub mod work_item_repository;

pub use dashboard_repository::DashboardRepository;
pub use email_template_repository::EmailTemplateRepository;
pub use project_repository::ProjectRepository;
pub use setting_repository::SettingRepository;
pub use user_repository::UserRepository;
pub use work_item_repository::WorkItemRepository;
