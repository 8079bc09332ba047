pub mod job_queue;
pub mod mail_transport;
pub mod template_renderer;

pub use job_queue::{JobQueue, QueueError};
pub use mail_transport::{DeliveryError, MailTransport};
pub use template_renderer::Substitutions;
