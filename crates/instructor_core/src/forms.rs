//! crates/instructor_core/src/forms.rs
//!
//! Editable course and student forms with field-level validation.
//!
//! A form is either blank (create) or seeded from an existing record (edit).
//! `submit` validates and produces the record to store; nothing is stored here.

use crate::domain::{Course, DeliveryMethod, NotificationKind, Student, StudentLevel};
use crate::ports::Notifier;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

pub const MAX_OBJECTIVES: usize = 5;
pub const SHORT_DESCRIPTION_MAX: usize = 150;
pub const LONG_DESCRIPTION_MAX: usize = 1000;

//=========================================================================================
// Errors
//=========================================================================================

/// Field name -> message, in a stable order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldErrors(BTreeMap<&'static str, String>);

impl FieldErrors {
    fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("{} field(s) failed validation", .0.len())]
    Invalid(FieldErrors),
    #[error("You can add up to 5 learning objectives.")]
    TooManyObjectives,
}

pub type FormResult<T> = Result<T, FormError>;

/// A validated record plus whether it is new.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission<T> {
    pub record: T,
    pub is_new: bool,
}

impl Submission<Course> {
    /// Reports the stored course. Call once the write went through.
    pub fn announce(&self, notifier: &dyn Notifier) {
        let (title, verb) = if self.is_new {
            ("Course Created", "created")
        } else {
            ("Course Updated", "updated")
        };
        let message = format!("\"{}\" has been {} successfully.", self.record.title, verb);
        notifier.notify(NotificationKind::Success, title, Some(&message));
    }
}

impl Submission<Student> {
    pub fn announce(&self, notifier: &dyn Notifier) {
        let (title, verb) = if self.is_new {
            ("Student Added", "added")
        } else {
            ("Student Updated", "updated")
        };
        let message = format!("\"{}\" has been {} successfully.", self.record.name, verb);
        notifier.notify(NotificationKind::Success, title, Some(&message));
    }
}

/// Drops blank entries; the rest are kept as typed.
fn non_blank(entries: &[String]) -> Vec<String> {
    entries
        .iter()
        .filter(|e| !e.trim().is_empty())
        .cloned()
        .collect()
}

//=========================================================================================
// Course form
//=========================================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CourseForm {
    /// Set when editing an existing course.
    pub id: Option<Uuid>,
    pub title: String,
    pub short_description: String,
    pub long_description: String,
    pub objectives: Vec<String>,
    pub delivery_method: DeliveryMethod,
}

impl Default for CourseForm {
    fn default() -> Self {
        Self {
            id: None,
            title: String::new(),
            short_description: String::new(),
            long_description: String::new(),
            objectives: vec![String::new()],
            delivery_method: DeliveryMethod::InPerson,
        }
    }
}

impl CourseForm {
    pub fn edit(course: &Course) -> Self {
        Self {
            id: Some(course.id),
            title: course.title.clone(),
            short_description: course.short_description.clone(),
            long_description: course.long_description.clone(),
            objectives: course.objectives.clone(),
            delivery_method: course.delivery_method,
        }
    }

    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::default();

        if self.title.trim().is_empty() {
            errors.add("title", "Course title is required");
        }

        if self.short_description.trim().is_empty() {
            errors.add("short_description", "Short description is required");
        } else if self.short_description.chars().count() > SHORT_DESCRIPTION_MAX {
            errors.add(
                "short_description",
                format!("Short description must be {} characters or less", SHORT_DESCRIPTION_MAX),
            );
        }

        if self.long_description.trim().is_empty() {
            errors.add("long_description", "Long description is required");
        } else if self.long_description.chars().count() > LONG_DESCRIPTION_MAX {
            errors.add(
                "long_description",
                format!("Long description must be {} characters or less", LONG_DESCRIPTION_MAX),
            );
        }

        if non_blank(&self.objectives).is_empty() {
            errors.add("objectives", "At least one learning objective is required");
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Validates and builds the course to store. Blank objectives are dropped.
    ///
    /// More than `MAX_OBJECTIVES` entries is refused with a warning before any
    /// field is checked. On update the catalog restores the stored creation time.
    pub fn submit(&self, notifier: &dyn Notifier) -> FormResult<Submission<Course>> {
        if self.objectives.len() > MAX_OBJECTIVES {
            notifier.notify(
                NotificationKind::Warning,
                "Maximum Objectives Reached",
                Some("You can add up to 5 learning objectives."),
            );
            return Err(FormError::TooManyObjectives);
        }
        if let Err(errors) = self.validate() {
            notifier.notify(
                NotificationKind::Error,
                "Invalid Course",
                Some("Please correct the highlighted fields."),
            );
            return Err(FormError::Invalid(errors));
        }
        let now = Utc::now();
        let record = Course {
            id: self.id.unwrap_or_else(Uuid::new_v4),
            title: self.title.clone(),
            short_description: self.short_description.clone(),
            long_description: self.long_description.clone(),
            objectives: non_blank(&self.objectives),
            delivery_method: self.delivery_method,
            created_at: now,
            updated_at: now,
        };
        Ok(Submission {
            record,
            is_new: self.id.is_none(),
        })
    }
}

//=========================================================================================
// Student form
//=========================================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StudentForm {
    pub id: Option<Uuid>,
    pub name: String,
    pub level: StudentLevel,
    pub prerequisites: Vec<String>,
    pub prior_knowledge: String,
    pub learning_challenges: String,
}

impl Default for StudentForm {
    fn default() -> Self {
        Self {
            id: None,
            name: String::new(),
            level: StudentLevel::Undergraduate,
            prerequisites: vec![String::new()],
            prior_knowledge: String::new(),
            learning_challenges: String::new(),
        }
    }
}

impl StudentForm {
    pub fn edit(student: &Student) -> Self {
        Self {
            id: Some(student.id),
            name: student.name.clone(),
            level: student.level,
            prerequisites: student.prerequisites.clone(),
            prior_knowledge: student.prior_knowledge.clone(),
            learning_challenges: student.learning_challenges.clone(),
        }
    }

    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::default();
        if self.name.trim().is_empty() {
            errors.add("name", "Student name is required");
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Validates and builds the profile. No prerequisites at all reads as "None".
    pub fn submit(&self, notifier: &dyn Notifier) -> FormResult<Submission<Student>> {
        if let Err(errors) = self.validate() {
            notifier.notify(
                NotificationKind::Error,
                "Invalid Student Profile",
                Some("Please correct the highlighted fields."),
            );
            return Err(FormError::Invalid(errors));
        }
        let mut prerequisites = non_blank(&self.prerequisites);
        if prerequisites.is_empty() {
            prerequisites.push("None".to_string());
        }
        let record = Student {
            id: self.id.unwrap_or_else(Uuid::new_v4),
            name: self.name.clone(),
            level: self.level,
            prerequisites,
            prior_knowledge: self.prior_knowledge.clone(),
            learning_challenges: self.learning_challenges.clone(),
        };
        Ok(Submission {
            record,
            is_new: self.id.is_none(),
        })
    }
}
