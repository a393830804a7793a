//! services/dashboard/src/adapters/memory.rs
//!
//! The in-memory adapter, the concrete implementation of the `CatalogRepository`
//! port. Collections live behind a tokio `RwLock` and are swapped wholesale on
//! every write.

use async_trait::async_trait;
use instructor_core::domain::{ActivityItem, Course, Quiz, Student};
use instructor_core::ports::{CatalogRepository, PortResult};
use tokio::sync::RwLock;
use tracing::debug;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

#[derive(Default)]
struct Collections {
    courses: Vec<Course>,
    students: Vec<Student>,
    quizzes: Vec<Quiz>,
    /// Oldest first; reads reverse it.
    activity: Vec<ActivityItem>,
}

/// An in-memory adapter that implements the `CatalogRepository` port.
#[derive(Default)]
pub struct InMemoryCatalog {
    inner: RwLock<Collections>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a catalog pre-filled with the given collections.
    pub fn seeded(courses: Vec<Course>, students: Vec<Student>, activity: Vec<ActivityItem>) -> Self {
        Self {
            inner: RwLock::new(Collections {
                courses,
                students,
                quizzes: Vec::new(),
                activity,
            }),
        }
    }
}

//=========================================================================================
// `CatalogRepository` Trait Implementation
//=========================================================================================

#[async_trait]
impl CatalogRepository for InMemoryCatalog {
    async fn list_courses(&self) -> PortResult<Vec<Course>> {
        Ok(self.inner.read().await.courses.clone())
    }

    async fn replace_courses(&self, courses: Vec<Course>) -> PortResult<()> {
        debug!("Replacing course collection ({} records).", courses.len());
        self.inner.write().await.courses = courses;
        Ok(())
    }

    async fn list_students(&self) -> PortResult<Vec<Student>> {
        Ok(self.inner.read().await.students.clone())
    }

    async fn replace_students(&self, students: Vec<Student>) -> PortResult<()> {
        debug!("Replacing student collection ({} records).", students.len());
        self.inner.write().await.students = students;
        Ok(())
    }

    async fn list_quizzes(&self) -> PortResult<Vec<Quiz>> {
        Ok(self.inner.read().await.quizzes.clone())
    }

    async fn save_quiz(&self, quiz: Quiz) -> PortResult<()> {
        let mut inner = self.inner.write().await;
        match inner.quizzes.iter_mut().find(|q| q.id == quiz.id) {
            Some(existing) => *existing = quiz,
            None => inner.quizzes.push(quiz),
        }
        Ok(())
    }

    async fn record_activity(&self, item: ActivityItem) -> PortResult<()> {
        self.inner.write().await.activity.push(item);
        Ok(())
    }

    async fn recent_activity(&self, limit: usize) -> PortResult<Vec<ActivityItem>> {
        let inner = self.inner.read().await;
        Ok(inner.activity.iter().rev().take(limit).cloned().collect())
    }
}
