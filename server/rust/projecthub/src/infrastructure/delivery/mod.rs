pub mod log_client;
pub mod smtp_client;

pub use log_client::LogMailTransport;
pub use smtp_client::SmtpMailTransport;
