use serde::Deserialize;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// Identifier assigned by the classroom platform.
///
/// `gh classroom` reports ids as JSON numbers, but nothing downstream does
/// arithmetic on them, so strings are accepted as well and the value is kept
/// verbatim for display and for passing back on the command line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawId", into = "String")]
pub struct EntityId(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Number(i64),
    Text(String),
}

impl From<RawId> for EntityId {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Number(n) => Self(n.to_string()),
            RawId::Text(s) => Self(s),
        }
    }
}

impl From<EntityId> for String {
    fn from(id: EntityId) -> Self {
        id.0
    }
}

impl From<i64> for EntityId {
    fn from(n: i64) -> Self {
        Self(n.to_string())
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl EntityId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classroom {
    pub id: EntityId,
    pub title: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub id: EntityId,
    pub title: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub deadline: Option<String>,
}

/// A student repository directory found in the workspace after a clone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClonedRepo {
    pub name: String,
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PullRequest {
    pub number: u64,
    pub title: String,
    pub author: PullRequestAuthor,
    pub state: String,
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PullRequestAuthor {
    pub login: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn ids_accept_numbers_and_strings() {
        let classrooms: Vec<Classroom> = serde_json::from_str(
            r#"[
                {"id": 123, "name": "python-2025", "title": "Python Programming 2025"},
                {"id": "abc", "title": "Untitled"}
            ]"#,
        )
        .expect("parse classrooms");
        assert_eq!(classrooms[0].id, EntityId::from(123));
        assert_eq!(classrooms[0].name.as_deref(), Some("python-2025"));
        assert_eq!(classrooms[1].id.as_str(), "abc");
        assert_eq!(classrooms[1].name, None);
    }

    #[test]
    fn null_deadline_is_absent() {
        let assignments: Vec<Assignment> = serde_json::from_str(
            r#"[{"id": 101, "title": "API Exercise", "name": "api-exercise", "deadline": null}]"#,
        )
        .expect("parse assignments");
        assert_eq!(assignments[0].deadline, None);
    }

    #[test]
    fn pull_requests_read_camel_case_timestamp() {
        let prs: Vec<PullRequest> = serde_json::from_str(
            r#"[{
                "number": 1,
                "title": "Add Docker support",
                "author": {"login": "student1"},
                "state": "OPEN",
                "createdAt": "2024-01-10T10:00:00Z"
            }]"#,
        )
        .expect("parse pull requests");
        assert_eq!(prs[0].author.login, "student1");
        assert_eq!(prs[0].created_at, "2024-01-10T10:00:00Z");
    }
}
