use crate::model::Assignment;
use crate::model::Classroom;
use crate::model::ClonedRepo;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    SelectingClassroom,
    SelectingAssignment,
    Cloning,
    SelectingStudent,
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            StepKind::SelectingClassroom => "selecting a classroom",
            StepKind::SelectingAssignment => "selecting an assignment",
            StepKind::Cloning => "cloning student repositories",
            StepKind::SelectingStudent => "selecting a student",
        };
        f.write_str(text)
    }
}

/// Where a session is in the classroom walk, with the data that is valid at
/// that point.
///
/// An empty candidate list means it has not been fetched yet (or the fetch
/// came back empty, which is treated the same way).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowStep {
    SelectingClassroom {
        classrooms: Vec<Classroom>,
    },
    SelectingAssignment {
        classrooms: Vec<Classroom>,
        classroom: Classroom,
        assignments: Vec<Assignment>,
    },
    /// The assignment is chosen but the clone has not completed.
    Cloning {
        classroom: Classroom,
        assignments: Vec<Assignment>,
        assignment: Assignment,
    },
    SelectingStudent {
        classroom: Classroom,
        assignment: Assignment,
        cloned_repos: Vec<ClonedRepo>,
    },
}

impl Default for WorkflowStep {
    fn default() -> Self {
        WorkflowStep::SelectingClassroom {
            classrooms: Vec::new(),
        }
    }
}

impl WorkflowStep {
    pub fn kind(&self) -> StepKind {
        match self {
            WorkflowStep::SelectingClassroom { .. } => StepKind::SelectingClassroom,
            WorkflowStep::SelectingAssignment { .. } => StepKind::SelectingAssignment,
            WorkflowStep::Cloning { .. } => StepKind::Cloning,
            WorkflowStep::SelectingStudent { .. } => StepKind::SelectingStudent,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    id: String,
    pub(crate) step: WorkflowStep,
    created_at: DateTime<Utc>,
}

impl Session {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            step: WorkflowStep::default(),
            created_at: Utc::now(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn step(&self) -> &WorkflowStep {
        &self.step
    }

    pub fn current_step(&self) -> StepKind {
        self.step.kind()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn classrooms(&self) -> &[Classroom] {
        match &self.step {
            WorkflowStep::SelectingClassroom { classrooms }
            | WorkflowStep::SelectingAssignment { classrooms, .. } => classrooms.as_slice(),
            WorkflowStep::Cloning { .. } | WorkflowStep::SelectingStudent { .. } => &[],
        }
    }

    pub fn selected_classroom(&self) -> Option<&Classroom> {
        match &self.step {
            WorkflowStep::SelectingClassroom { .. } => None,
            WorkflowStep::SelectingAssignment { classroom, .. }
            | WorkflowStep::Cloning { classroom, .. }
            | WorkflowStep::SelectingStudent { classroom, .. } => Some(classroom),
        }
    }

    pub fn assignments(&self) -> &[Assignment] {
        match &self.step {
            WorkflowStep::SelectingAssignment { assignments, .. }
            | WorkflowStep::Cloning { assignments, .. } => assignments.as_slice(),
            WorkflowStep::SelectingClassroom { .. } | WorkflowStep::SelectingStudent { .. } => &[],
        }
    }

    pub fn selected_assignment(&self) -> Option<&Assignment> {
        match &self.step {
            WorkflowStep::Cloning { assignment, .. }
            | WorkflowStep::SelectingStudent { assignment, .. } => Some(assignment),
            WorkflowStep::SelectingClassroom { .. } | WorkflowStep::SelectingAssignment { .. } => {
                None
            }
        }
    }

    pub fn cloned_repos(&self) -> &[ClonedRepo] {
        match &self.step {
            WorkflowStep::SelectingStudent { cloned_repos, .. } => cloned_repos.as_slice(),
            _ => &[],
        }
    }
}
