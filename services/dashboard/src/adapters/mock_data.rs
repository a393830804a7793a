//! services/dashboard/src/adapters/mock_data.rs
//!
//! The sample courses, students and activity the dashboard starts with when
//! `SEED_MOCK_DATA` is on.

use chrono::{DateTime, TimeZone, Utc};
use instructor_core::domain::{
    ActivityItem, ActivityKind, Course, DeliveryMethod, Student, StudentLevel,
};
use uuid::Uuid;

fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0)
        .single()
        .unwrap_or_default()
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

pub fn courses() -> Vec<Course> {
    vec![
        Course {
            id: Uuid::new_v4(),
            title: "Introduction to Computer Science".to_string(),
            short_description: "Foundational concepts in computer science including algorithms, data structures, and programming basics.".to_string(),
            long_description: "This course provides students with a comprehensive introduction to the field of computer science. Topics covered include algorithms, data structures, programming fundamentals, and an overview of computer systems. Students will gain hands-on experience through programming assignments and projects.".to_string(),
            objectives: strings(&[
                "Understand basic programming concepts",
                "Implement simple algorithms",
                "Design and use data structures",
                "Analyze program efficiency",
                "Build small applications",
            ]),
            delivery_method: DeliveryMethod::Hybrid,
            created_at: at(2023, 9, 15, 10, 30),
            updated_at: at(2024, 5, 10, 14, 45),
        },
        Course {
            id: Uuid::new_v4(),
            title: "Advanced Mathematics".to_string(),
            short_description: "Deep dive into calculus, linear algebra, and differential equations for science and engineering students.".to_string(),
            long_description: "An in-depth exploration of advanced mathematical concepts essential for students in science and engineering fields. The course covers calculus, linear algebra, differential equations, and their applications to real-world problems. Strong emphasis on both theoretical understanding and practical problem-solving.".to_string(),
            objectives: strings(&[
                "Master calculus concepts and applications",
                "Develop proficiency in linear algebra",
                "Solve differential equations",
                "Apply mathematical methods to real problems",
                "Enhance mathematical reasoning",
            ]),
            delivery_method: DeliveryMethod::InPerson,
            created_at: at(2023, 10, 5, 9, 15),
            updated_at: at(2024, 4, 20, 16, 30),
        },
        Course {
            id: Uuid::new_v4(),
            title: "Modern Literature Studies".to_string(),
            short_description: "Analysis of 20th and 21st century literature across various genres and cultural contexts.".to_string(),
            long_description: "This course examines significant works of literature from the 20th and 21st centuries, focusing on how they reflect and influence society and culture. Students will analyze texts across multiple genres, including novels, short stories, poetry, and drama, with consideration for historical context and critical theory.".to_string(),
            objectives: strings(&[
                "Analyze modern literary works",
                "Apply critical theory to textual analysis",
                "Understand literature in historical context",
                "Develop advanced writing skills",
                "Engage in literary discourse",
            ]),
            delivery_method: DeliveryMethod::FullyOnline,
            created_at: at(2024, 1, 20, 13, 45),
            updated_at: at(2024, 5, 5, 11, 20),
        },
    ]
}

pub fn students() -> Vec<Student> {
    vec![
        Student {
            id: Uuid::new_v4(),
            name: "Emma Wilson".to_string(),
            level: StudentLevel::Undergraduate,
            prerequisites: strings(&["High School Algebra", "Basic Computer Skills"]),
            prior_knowledge: "Has experience with basic programming concepts and mathematics.".to_string(),
            learning_challenges: "Needs additional time for complex problem-solving tasks.".to_string(),
        },
        Student {
            id: Uuid::new_v4(),
            name: "Michael Johnson".to_string(),
            level: StudentLevel::Graduate,
            prerequisites: strings(&["Bachelor in Computer Science", "Programming Experience"]),
            prior_knowledge: "Strong foundation in algorithms and data structures. Experience with Python and Java.".to_string(),
            learning_challenges: "Prefers practical applications over theoretical discussions.".to_string(),
        },
        Student {
            id: Uuid::new_v4(),
            name: "Sophia Rodriguez".to_string(),
            level: StudentLevel::HighSchool,
            prerequisites: strings(&["Algebra I", "Introduction to Physics"]),
            prior_knowledge: "Basic understanding of scientific principles and mathematical concepts.".to_string(),
            learning_challenges: "Visual learner who benefits from diagrams and demonstrations.".to_string(),
        },
    ]
}

/// Oldest first, the order the catalog stores them in.
pub fn activity() -> Vec<ActivityItem> {
    let item = |kind, title: &str, description: &str, timestamp| ActivityItem {
        id: Uuid::new_v4(),
        title: title.to_string(),
        description: description.to_string(),
        timestamp,
        kind,
    };
    vec![
        item(
            ActivityKind::System,
            "System Update",
            "New features added to the quiz creation tool",
            at(2024, 5, 12, 9, 20),
        ),
        item(
            ActivityKind::Student,
            "New Student Enrolled",
            "Emma Wilson enrolled in \"Advanced Mathematics\"",
            at(2024, 5, 13, 16, 45),
        ),
        item(
            ActivityKind::Quiz,
            "Quiz Completed",
            "15 students completed \"Programming Fundamentals Quiz\"",
            at(2024, 5, 14, 10, 15),
        ),
        item(
            ActivityKind::Course,
            "New Course Created",
            "You created \"Introduction to Computer Science\"",
            at(2024, 5, 15, 14, 30),
        ),
    ]
}
