//! services/dashboard/src/app/dashboard.rs
//!
//! Builds the landing-page summary.

use crate::app::protocol::DashboardSummary;
use instructor_core::domain::Session;
use instructor_core::ports::{CatalogRepository, PortResult};

const RECENT_ACTIVITY_LIMIT: usize = 4;

pub fn greeting(session: &Session) -> String {
    match session.user() {
        Some(user) => format!("Welcome back, {}!", user.first_name()),
        None => "Welcome!".to_string(),
    }
}

pub async fn summary(repo: &dyn CatalogRepository, session: &Session) -> PortResult<DashboardSummary> {
    Ok(DashboardSummary {
        greeting: greeting(session),
        course_count: repo.list_courses().await?.len(),
        student_count: repo.list_students().await?.len(),
        quiz_count: repo.list_quizzes().await?.len(),
        recent_activity: repo.recent_activity(RECENT_ACTIVITY_LIMIT).await?,
    })
}
