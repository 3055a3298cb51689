//! Application services: session planning, progress updates, and review
//! selection on top of the storage traits.

#![forbid(unsafe_code)]

pub mod app_services;
pub mod error;
pub mod progress_service;
pub mod review_service;
pub mod sessions;

pub use app_services::AppServices;
pub use error::{AppServicesError, ProgressServiceError, ReviewServiceError, SessionError};
pub use progress_service::ProgressService;
pub use review_service::ReviewService;
pub use sananki_core::Clock;
pub use sessions::{SessionData, SessionManager, SessionStats, StudySession};
