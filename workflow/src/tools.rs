use serde::Serialize;
use serde_json::Value;
use serde_json::json;
use thiserror::Error;

pub const DEFAULT_SESSION_ID: &str = "default";

pub const START_CLASSROOM_WORKFLOW: &str = "start_classroom_workflow";
pub const SELECT_CLASSROOM: &str = "select_classroom";
pub const SELECT_ASSIGNMENT: &str = "select_assignment";
pub const SELECT_STUDENT: &str = "select_student";
pub const RESET_SESSION: &str = "reset_session";

/// Contract violations by the caller of [`ToolCall::parse`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),
    #[error("{tool}: missing required argument '{argument}'")]
    MissingArgument {
        tool: &'static str,
        argument: &'static str,
    },
    #[error("{tool}: argument '{argument}' must be {expected}")]
    InvalidArgument {
        tool: &'static str,
        argument: &'static str,
        expected: &'static str,
    },
}

/// A validated tool invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolCall {
    StartClassroomWorkflow { session_id: String },
    SelectClassroom { session_id: String, number: i64 },
    SelectAssignment { session_id: String, number: i64 },
    SelectStudent { session_id: String, number: i64 },
    ResetSession { session_id: String },
}

impl ToolCall {
    /// Parses the loosely typed argument bag of tool `name`.
    ///
    /// `arguments` may be `null` or an object. `session_id` falls back to
    /// [`DEFAULT_SESSION_ID`] when missing or null.
    pub fn parse(name: &str, arguments: &Value) -> Result<Self, DispatchError> {
        let call = match name {
            START_CLASSROOM_WORKFLOW => ToolCall::StartClassroomWorkflow {
                session_id: session_arg(START_CLASSROOM_WORKFLOW, arguments)?,
            },
            SELECT_CLASSROOM => ToolCall::SelectClassroom {
                number: number_arg(SELECT_CLASSROOM, "classroom_number", arguments)?,
                session_id: session_arg(SELECT_CLASSROOM, arguments)?,
            },
            SELECT_ASSIGNMENT => ToolCall::SelectAssignment {
                number: number_arg(SELECT_ASSIGNMENT, "assignment_number", arguments)?,
                session_id: session_arg(SELECT_ASSIGNMENT, arguments)?,
            },
            SELECT_STUDENT => ToolCall::SelectStudent {
                number: number_arg(SELECT_STUDENT, "student_number", arguments)?,
                session_id: session_arg(SELECT_STUDENT, arguments)?,
            },
            RESET_SESSION => ToolCall::ResetSession {
                session_id: session_arg(RESET_SESSION, arguments)?,
            },
            other => return Err(DispatchError::UnknownTool(other.to_string())),
        };
        Ok(call)
    }

    pub fn session_id(&self) -> &str {
        match self {
            ToolCall::StartClassroomWorkflow { session_id }
            | ToolCall::SelectClassroom { session_id, .. }
            | ToolCall::SelectAssignment { session_id, .. }
            | ToolCall::SelectStudent { session_id, .. }
            | ToolCall::ResetSession { session_id } => session_id,
        }
    }
}

fn session_arg(tool: &'static str, arguments: &Value) -> Result<String, DispatchError> {
    match arguments.get("session_id") {
        None | Some(Value::Null) => Ok(DEFAULT_SESSION_ID.to_string()),
        Some(Value::String(id)) => Ok(id.clone()),
        Some(_) => Err(DispatchError::InvalidArgument {
            tool,
            argument: "session_id",
            expected: "a string",
        }),
    }
}

fn number_arg(
    tool: &'static str,
    argument: &'static str,
    arguments: &Value,
) -> Result<i64, DispatchError> {
    let value = arguments
        .get(argument)
        .filter(|value| !value.is_null())
        .ok_or(DispatchError::MissingArgument { tool, argument })?;
    value.as_i64().ok_or(DispatchError::InvalidArgument {
        tool,
        argument,
        expected: "an integer",
    })
}

/// Name, description and JSON input schema of one tool.
#[derive(Debug, Clone, Serialize)]
pub struct ToolSpec {
    pub name: &'static str,
    pub description: &'static str,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

pub fn tool_specs() -> Vec<ToolSpec> {
    vec![
        ToolSpec {
            name: START_CLASSROOM_WORKFLOW,
            description: "Start the interactive classroom workflow - lists classrooms and guides through the process",
            input_schema: schema(None, "Session ID (optional, defaults to 'default')"),
        },
        ToolSpec {
            name: SELECT_CLASSROOM,
            description: "Select a classroom by number from the list",
            input_schema: schema(
                Some(("classroom_number", "The number of the classroom to select")),
                "Session ID (optional, defaults to 'default')",
            ),
        },
        ToolSpec {
            name: SELECT_ASSIGNMENT,
            description: "Select an assignment by number from the list",
            input_schema: schema(
                Some(("assignment_number", "The number of the assignment to select")),
                "Session ID (optional, defaults to 'default')",
            ),
        },
        ToolSpec {
            name: SELECT_STUDENT,
            description: "Select a student by number to view their pull requests",
            input_schema: schema(
                Some(("student_number", "The number of the student to select")),
                "Session ID (optional, defaults to 'default')",
            ),
        },
        ToolSpec {
            name: RESET_SESSION,
            description: "Reset the current session and start over",
            input_schema: schema(None, "Session ID to reset (optional, defaults to 'default')"),
        },
    ]
}

fn schema(number: Option<(&str, &str)>, session_description: &str) -> Value {
    let mut properties = serde_json::Map::new();
    let mut required = Vec::new();
    if let Some((name, description)) = number {
        properties.insert(
            name.to_string(),
            json!({ "type": "integer", "description": description }),
        );
        required.push(Value::String(name.to_string()));
    }
    properties.insert(
        "session_id".to_string(),
        json!({ "type": "string", "description": session_description }),
    );
    json!({
        "type": "object",
        "properties": properties,
        "required": required,
    })
}
