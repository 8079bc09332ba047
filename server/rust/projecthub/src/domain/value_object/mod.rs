pub mod project_status;
pub mod site_config;
pub mod template_type;
pub mod visibility_scope;
pub mod work_item_kind;

pub use project_status::ProjectStatus;
pub use site_config::SiteConfig;
pub use template_type::{DispatchMode, TemplateType};
pub use visibility_scope::{DashboardScope, ProjectScope, WorkItemScope};
pub use work_item_kind::WorkItemKind;
