//! crates/instructor_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the dashboard's core logic.
//! The core never reaches for ambient state: the data source and the
//! notification channel are handed to it through these traits.

use crate::domain::{ActivityItem, Course, NotificationKind, Quiz, Student};
use async_trait::async_trait;
use uuid::Uuid;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// The data source behind the course, student and quiz screens.
///
/// Screens read a full collection and write back the full updated collection;
/// there is no partial update at this boundary.
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    // --- Courses ---
    async fn list_courses(&self) -> PortResult<Vec<Course>>;

    async fn replace_courses(&self, courses: Vec<Course>) -> PortResult<()>;

    // --- Students ---
    async fn list_students(&self) -> PortResult<Vec<Student>>;

    async fn replace_students(&self, students: Vec<Student>) -> PortResult<()>;

    // --- Quizzes ---
    async fn list_quizzes(&self) -> PortResult<Vec<Quiz>>;

    async fn save_quiz(&self, quiz: Quiz) -> PortResult<()>;

    // --- Activity feed ---
    async fn record_activity(&self, item: ActivityItem) -> PortResult<()>;

    /// Returns at most `limit` items, newest first.
    async fn recent_activity(&self, limit: usize) -> PortResult<Vec<ActivityItem>>;
}

/// A handle onto the user-facing notification channel.
pub trait Notifier: Send + Sync {
    /// Shows a notification and returns its id.
    fn notify(&self, kind: NotificationKind, title: &str, message: Option<&str>) -> Uuid;
}
