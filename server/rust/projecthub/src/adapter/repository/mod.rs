pub mod dashboard_postgres;
pub mod in_memory;
pub mod project_postgres;
pub mod setting_postgres;
pub mod template_postgres;
pub mod user_postgres;
pub mod work_item_postgres;

pub use dashboard_postgres::DashboardPostgresRepository;
pub use in_memory::InMemoryStore;
pub use project_postgres::ProjectPostgresRepository;
pub use setting_postgres::SettingPostgresRepository;
pub use template_postgres::TemplatePostgresRepository;
pub use user_postgres::UserPostgresRepository;
pub use work_item_postgres::WorkItemPostgresRepository;
