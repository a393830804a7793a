//! services/dashboard/src/app/catalog_ops.rs
//!
//! Course and student operations on top of the `CatalogRepository` port:
//! read the whole collection, apply a pure `catalog` operation, write the
//! whole collection back.

use async_trait::async_trait;
use instructor_core::catalog::{self, Record};
use instructor_core::domain::{ActivityItem, ActivityKind, Course, Student};
use instructor_core::forms::Submission;
use instructor_core::ports::{CatalogRepository, Notifier, PortResult};
use tracing::{debug, info};
use uuid::Uuid;

/// A record kind with its own collection in the repository.
#[async_trait]
pub trait Stored: Record + Send + Sync + 'static {
    async fn load(repo: &dyn CatalogRepository) -> PortResult<Vec<Self>>;

    async fn store(repo: &dyn CatalogRepository, records: Vec<Self>) -> PortResult<()>;

    /// The display name used in activity descriptions.
    fn display_name(&self) -> &str;

    fn activity_kind() -> ActivityKind;

    fn announce(submission: &Submission<Self>, notifier: &dyn Notifier);
}

#[async_trait]
impl Stored for Course {
    async fn load(repo: &dyn CatalogRepository) -> PortResult<Vec<Self>> {
        repo.list_courses().await
    }

    async fn store(repo: &dyn CatalogRepository, records: Vec<Self>) -> PortResult<()> {
        repo.replace_courses(records).await
    }

    fn display_name(&self) -> &str {
        &self.title
    }

    fn activity_kind() -> ActivityKind {
        ActivityKind::Course
    }

    fn announce(submission: &Submission<Self>, notifier: &dyn Notifier) {
        submission.announce(notifier);
    }
}

#[async_trait]
impl Stored for Student {
    async fn load(repo: &dyn CatalogRepository) -> PortResult<Vec<Self>> {
        repo.list_students().await
    }

    async fn store(repo: &dyn CatalogRepository, records: Vec<Self>) -> PortResult<()> {
        repo.replace_students(records).await
    }

    fn display_name(&self) -> &str {
        &self.name
    }

    fn activity_kind() -> ActivityKind {
        ActivityKind::Student
    }

    fn announce(submission: &Submission<Self>, notifier: &dyn Notifier) {
        submission.announce(notifier);
    }
}

/// The records matching `query`, in collection order.
pub async fn search<T: Stored>(repo: &dyn CatalogRepository, query: &str) -> PortResult<Vec<T>> {
    let records = T::load(repo).await?;
    Ok(catalog::search(&records, query).into_iter().cloned().collect())
}

/// Stores a validated form submission and announces it.
///
/// Returns false when an update targeted an id that no longer exists; the
/// collection is left as it was and nothing is announced.
pub async fn save<T: Stored>(
    repo: &dyn CatalogRepository,
    notifier: &dyn Notifier,
    submission: Submission<T>,
) -> PortResult<bool> {
    let records = T::load(repo).await?;
    let (next, verb) = if submission.is_new {
        (catalog::create(&records, submission.record.clone()), "created")
    } else {
        let (next, found) = catalog::update(&records, submission.record.clone());
        if !found {
            debug!("Update for missing {} {} ignored.", T::KIND, submission.record.id());
            return Ok(false);
        }
        (next, "updated")
    };
    T::store(repo, next).await?;
    info!("{} {} {}.", T::KIND, submission.record.id(), verb);

    repo.record_activity(ActivityItem::new(
        T::activity_kind(),
        format!("{} {}", T::KIND, capitalize(verb)),
        format!("You {} \"{}\"", verb, submission.record.display_name()),
    ))
    .await?;
    T::announce(&submission, notifier);
    Ok(true)
}

/// Removes a record after the user confirmed. Absent ids are ignored.
pub async fn delete<T: Stored>(repo: &dyn CatalogRepository, id: Uuid) -> PortResult<bool> {
    let records = T::load(repo).await?;
    let Some(existing) = catalog::find(&records, id).cloned() else {
        debug!("Delete for missing {} {} ignored.", T::KIND, id);
        return Ok(false);
    };
    T::store(repo, catalog::delete(&records, id)).await?;
    info!("{} {} deleted.", T::KIND, id);
    repo.record_activity(ActivityItem::new(
        T::activity_kind(),
        format!("{} Deleted", T::KIND),
        format!("You deleted \"{}\"", existing.display_name()),
    ))
    .await?;
    Ok(true)
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
