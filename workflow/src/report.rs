//! Display text for each workflow step.
//!
//! Everything here is a pure function of already-validated data, so the
//! engine decides *what* happened and these decide how it reads.

use crate::model::Assignment;
use crate::model::Classroom;
use crate::model::ClonedRepo;
use crate::model::PullRequest;
use crate::remote::RemoteLookupError;
const HINT_WIDTH: usize = 100;

pub const NO_CLASSROOMS: &str = "No classrooms found. Please check your GitHub Classroom access.";

pub fn classroom_menu(classrooms: &[Classroom]) -> String {
    let mut out = heading("🏫 Available Classrooms:");
    for (i, classroom) in classrooms.iter().enumerate() {
        out.push_str(&format!("{}. {} (ID: {})\n", i + 1, classroom.title, classroom.id));
    }
    out.push('\n');
    out.push_str(&hint(
        "🏫 Call 'select_classroom' with the number to view assignments.",
    ));
    out
}

pub fn no_assignments(classroom: &Classroom) -> String {
    format!("No assignments found for classroom: {}", classroom.title)
}

pub fn assignment_menu(classroom: &Classroom, assignments: &[Assignment]) -> String {
    let mut out = format!("✅ Selected Classroom: {}\n\n", classroom.title);
    out.push_str(&heading("📚 Available Assignments:"));
    for (i, assignment) in assignments.iter().enumerate() {
        let deadline = assignment.deadline.as_deref().unwrap_or("No deadline");
        out.push_str(&format!(
            "{}. {} (ID: {})\n   📅 Deadline: {deadline}\n\n",
            i + 1,
            assignment.title,
            assignment.id
        ));
    }
    out.push_str(&hint(
        "🚀 Call 'select_assignment' with the number to clone student repositories.",
    ));
    out
}

pub fn clone_summary(assignment: &Assignment, repos: &[ClonedRepo]) -> String {
    let mut out = format!("✅ Selected Assignment: {}\n\n", assignment.title);
    out.push_str("📥 Cloning student repositories...\n");
    out.push_str(&format!("✅ Successfully cloned {} repositories!\n\n", repos.len()));
    out.push_str(&heading("👥 Student Repositories:"));
    for (i, repo) in repos.iter().enumerate() {
        out.push_str(&format!("{}. {}\n", i + 1, repo.name));
    }
    out.push('\n');
    out.push_str(&hint(
        "🔍 Call 'select_student' with the number to view their pull requests.",
    ));
    out
}

pub fn student_review(
    repo: &ClonedRepo,
    pull_requests: &Result<Vec<PullRequest>, RemoteLookupError>,
) -> String {
    let mut out = format!(
        "✅ Selected Student: {name}\n\n🔍 Checking for pull requests...\n\n📁 Repository: {name}\n📂 Path: {path}\n\n",
        name = repo.name,
        path = repo.path.display()
    );

    match pull_requests {
        Ok(prs) if prs.is_empty() => {
            out.push_str("📋 No pull requests found for this repository.\n");
        }
        Ok(prs) => {
            out.push_str(&heading("🔀 Pull Requests:"));
            for pr in prs {
                out.push_str(&format!(
                    "#{}: {}\n   👤 Author: {}\n   📊 State: {}\n   📅 Created: {}\n\n",
                    pr.number, pr.title, pr.author.login, pr.state, pr.created_at
                ));
            }
        }
        Err(err) => {
            out.push_str(&format!("📋 {err}\n"));
        }
    }

    out.push('\n');
    out.push_str(&hint(
        "🔄 Call 'reset_session' to start over with a new workflow.",
    ));
    out
}

pub fn session_reset() -> String {
    let mut out = String::from("🔄 Session reset successfully!\n\n");
    out.push_str(&hint(
        "🏫 Call 'start_classroom_workflow' to begin a new workflow.",
    ));
    out
}

fn heading(title: &str) -> String {
    let underline = "=".repeat(title.chars().count());
    format!("{title}\n{underline}\n\n")
}

fn hint(text: &str) -> String {
    textwrap::fill(text, HINT_WIDTH)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::EntityId;
    use crate::model::PullRequestAuthor;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    fn repo() -> ClonedRepo {
        ClonedRepo {
            name: "student1-repo".into(),
            path: PathBuf::from("/work/student1-repo"),
        }
    }

    #[test]
    fn classroom_menu_is_one_indexed() {
        let text = classroom_menu(&[
            Classroom {
                id: EntityId::from(123),
                title: "Python Programming 2025".into(),
                name: None,
            },
            Classroom {
                id: EntityId::from(456),
                title: "Java Programming 2025".into(),
                name: None,
            },
        ]);
        assert!(text.starts_with("🏫 Available Classrooms:\n"));
        assert!(text.contains("1. Python Programming 2025 (ID: 123)\n"));
        assert!(text.contains("2. Java Programming 2025 (ID: 456)\n"));
        assert!(text.ends_with("'select_classroom' with the number to view assignments."));
    }

    #[test]
    fn missing_deadline_reads_as_none() {
        let classroom = Classroom {
            id: EntityId::from(123),
            title: "Python Programming 2025".into(),
            name: None,
        };
        let text = assignment_menu(
            &classroom,
            &[Assignment {
                id: EntityId::from(101),
                title: "API Exercise".into(),
                name: None,
                deadline: None,
            }],
        );
        assert!(text.contains("1. API Exercise (ID: 101)\n   📅 Deadline: No deadline\n"));
    }

    #[test]
    fn student_review_lists_pull_requests() {
        let prs = Ok(vec![PullRequest {
            number: 1,
            title: "Add Docker support".into(),
            author: PullRequestAuthor {
                login: "student1".into(),
            },
            state: "OPEN".into(),
            created_at: "2024-01-10T10:00:00Z".into(),
        }]);
        let text = student_review(&repo(), &prs);
        assert!(text.contains("Selected Student: student1-repo"));
        assert!(text.contains("Path: /work/student1-repo"));
        assert!(text.contains("#1: Add Docker support\n   👤 Author: student1\n"));
    }

    #[test]
    fn student_review_shows_degraded_lookup() {
        let text = student_review(&repo(), &Err(RemoteLookupError::NoRemote));
        assert!(text.contains("📋 Could not get git remote information.\n"));
        assert!(text.ends_with("Call 'reset_session' to start over with a new workflow."));
    }

    #[test]
    fn clone_summary_lists_repositories_in_order() {
        let assignment = Assignment {
            id: EntityId::from(789),
            title: "Docker Exercise".into(),
            name: None,
            deadline: None,
        };
        let text = clone_summary(&assignment, &[repo()]);
        assert_eq!(
            text,
            "✅ Selected Assignment: Docker Exercise\n\n\
             📥 Cloning student repositories...\n\
             ✅ Successfully cloned 1 repositories!\n\n\
             👥 Student Repositories:\n\
             =======================\n\n\
             1. student1-repo\n\n\
             🔍 Call 'select_student' with the number to view their pull requests."
        );
    }

    #[test]
    fn heading_underlines_by_character_count() {
        assert_eq!(heading("ab"), "ab\n==\n\n");
    }
}
