pub mod request_log;
pub mod session;

pub use request_log::log_request;
pub use session::RequireSession;
