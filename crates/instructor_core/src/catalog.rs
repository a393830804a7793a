//! crates/instructor_core/src/catalog.rs
//!
//! Create/update/delete and search over flat entity collections. Every mutation
//! takes the current collection and returns a new one; callers write the
//! result back through the `CatalogRepository` port.

use crate::domain::{Course, Student};
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A record managed by the catalog screens.
pub trait Record: Clone {
    /// Used in feedback messages ("Course", "Student").
    const KIND: &'static str;
    /// Asked before a record of this kind is deleted.
    const DELETE_PROMPT: &'static str;

    fn id(&self) -> Uuid;

    /// The text fields a search query is matched against.
    fn search_fields(&self) -> Vec<&str>;

    /// Called on every mutation.
    fn touch(&mut self, _now: DateTime<Utc>) {}

    /// Copies the fields an edit must never change from the stored version.
    fn keep_origin(&mut self, _stored: &Self) {}
}

impl Record for Course {
    const KIND: &'static str = "Course";
    const DELETE_PROMPT: &'static str = "Are you sure you want to delete this course?";

    fn id(&self) -> Uuid {
        self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.title.as_str(), self.short_description.as_str()]
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }

    fn keep_origin(&mut self, stored: &Self) {
        self.created_at = stored.created_at;
    }
}

impl Record for Student {
    const KIND: &'static str = "Student";
    const DELETE_PROMPT: &'static str = "Are you sure you want to delete this student profile?";

    fn id(&self) -> Uuid {
        self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str()]
    }
}

/// Case-insensitive substring match over the record's search fields.
/// An empty query matches everything.
pub fn matches<T: Record>(record: &T, query: &str) -> bool {
    let needle = query.to_lowercase();
    record
        .search_fields()
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
}

pub fn search<'a, T: Record>(records: &'a [T], query: &str) -> Vec<&'a T> {
    records.iter().filter(|r| matches(*r, query)).collect()
}

pub fn find<T: Record>(records: &[T], id: Uuid) -> Option<&T> {
    records.iter().find(|r| r.id() == id)
}

/// Appends `record`.
pub fn create<T: Record>(records: &[T], record: T) -> Vec<T> {
    let mut next = records.to_vec();
    next.push(record);
    next
}

/// Replaces the record with the same id, stamping it as modified. The
/// stored creation time wins over whatever the caller sent.
///
/// A missing id is not an error: the collection comes back unchanged and the
/// flag is false.
pub fn update<T: Record>(records: &[T], mut record: T) -> (Vec<T>, bool) {
    let Some(stored) = find(records, record.id()) else {
        return (records.to_vec(), false);
    };
    record.keep_origin(stored);
    record.touch(Utc::now());
    let id = record.id();
    let next = records
        .iter()
        .map(|r| if r.id() == id { record.clone() } else { r.clone() })
        .collect();
    (next, true)
}

/// Removes the record with `id`, if present.
pub fn delete<T: Record>(records: &[T], id: Uuid) -> Vec<T> {
    records.iter().filter(|r| r.id() != id).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DeliveryMethod, StudentLevel};

    fn course(title: &str, short: &str) -> Course {
        let now = Utc::now();
        Course {
            id: Uuid::new_v4(),
            title: title.to_string(),
            short_description: short.to_string(),
            long_description: "Long".to_string(),
            objectives: vec!["Objective".to_string()],
            delivery_method: DeliveryMethod::Hybrid,
            created_at: now,
            updated_at: now,
        }
    }

    fn student(name: &str) -> Student {
        Student {
            id: Uuid::new_v4(),
            name: name.to_string(),
            level: StudentLevel::Undergraduate,
            prerequisites: vec!["None".to_string()],
            prior_knowledge: String::new(),
            learning_challenges: String::new(),
        }
    }

    #[test]
    fn create_then_delete_round_trips() {
        let courses = vec![course("Intro to CS", "Basics"), course("Literature", "Novels")];
        let algebra = course("Algebra", "Equations");
        let id = algebra.id;

        let grown = create(&courses, algebra);
        assert_eq!(grown.len(), 3);
        assert_eq!(delete(&grown, id), courses);
    }

    #[test]
    fn student_search_is_case_insensitive() {
        let students = vec![
            student("Emma Wilson"),
            student("Michael Johnson"),
            student("GEMMA Stone"),
        ];
        let names: Vec<&str> = search(&students, "emma")
            .into_iter()
            .map(|s| s.name.as_str())
            .collect();
        assert_eq!(names, vec!["Emma Wilson", "GEMMA Stone"]);
    }

    #[test]
    fn course_search_covers_title_and_short_description() {
        let courses = vec![
            course("Advanced Mathematics", "Calculus and algebra"),
            course("Modern Literature", "Twentieth century novels"),
        ];
        assert_eq!(search(&courses, "CALCULUS").len(), 1);
        assert_eq!(search(&courses, "modern").len(), 1);
        assert_eq!(search(&courses, "").len(), 2);
        assert!(search(&courses, "chemistry").is_empty());
    }

    #[test]
    fn update_replaces_matching_record_and_refreshes_timestamp() {
        let original = course("Algebra", "Equations");
        let courses = vec![original.clone()];
        let mut edited = original.clone();
        edited.title = "Linear Algebra".to_string();

        let (next, found) = update(&courses, edited);
        assert!(found);
        assert_eq!(next[0].title, "Linear Algebra");
        assert!(next[0].updated_at >= original.updated_at);
        assert_eq!(next[0].created_at, original.created_at);
    }

    #[test]
    fn update_keeps_stored_creation_time() {
        let original = course("Algebra", "Equations");
        let courses = vec![original.clone()];
        let mut edited = original.clone();
        edited.created_at = Utc::now() + chrono::Duration::days(30);

        let (next, found) = update(&courses, edited);
        assert!(found);
        assert_eq!(next[0].created_at, original.created_at);
    }

    #[test]
    fn update_of_missing_id_is_a_silent_no_op() {
        let courses = vec![course("Algebra", "Equations")];
        let stranger = course("Ghost", "Not stored");
        let (next, found) = update(&courses, stranger);
        assert!(!found);
        assert_eq!(next, courses);
    }

    #[test]
    fn delete_of_missing_id_keeps_collection() {
        let students = vec![student("Emma Wilson")];
        assert_eq!(delete(&students, Uuid::new_v4()), students);
    }
}
