//! Daily study sessions: planning, in-flight state, and persistence.

mod plan;
mod progress;
mod queries;
mod service;
mod workflow;

pub use plan::{SessionBuilder, SessionPlan};
pub use progress::{SessionData, SessionStats, StudyProgress};
pub(crate) use queries::SessionQueries;
pub use service::StudySession;
pub use workflow::SessionManager;
