pub mod automation_session;
pub mod registry;

pub use automation_session::{generate_session_id, AutomationSession, SessionStatus};
pub use registry::SessionRegistry;
