use std::fmt;
use thiserror::Error;

const GITHUB_HOST: &str = "github.com";

/// `owner/name` identifier of a GitHub repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoSlug {
    pub owner: String,
    pub name: String,
}

impl fmt::Display for RepoSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Why a student's pull requests could not be listed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteLookupError {
    #[error("Repository directory not found.")]
    RepoMissing,
    #[error("Could not get git remote information.")]
    NoRemote,
    #[error("Could not determine GitHub repository name (remote {url} is not on github.com).")]
    UnsupportedHost { url: String },
    #[error("Could not determine GitHub repository name from {url}.")]
    MalformedIdentifier { url: String },
    #[error("Error fetching pull requests: {0}")]
    QueryFailed(String),
    #[error("Error parsing pull request data.")]
    MalformedResponse,
}

/// Extracts `owner/name` from an `origin` URL.
///
/// Handles scp-style (`git@github.com:owner/repo.git`), `ssh://` and
/// `https://` remotes.
pub fn repo_slug_from_remote(url: &str) -> Result<RepoSlug, RemoteLookupError> {
    let url = url.trim();
    let host_at = url
        .find(GITHUB_HOST)
        .ok_or_else(|| RemoteLookupError::UnsupportedHost {
            url: url.to_string(),
        })?;
    let rest = &url[host_at + GITHUB_HOST.len()..];
    let path = rest
        .strip_prefix('/')
        .or_else(|| rest.strip_prefix(':'))
        .ok_or_else(|| RemoteLookupError::MalformedIdentifier {
            url: url.to_string(),
        })?;
    let path = path.trim_end_matches('/');
    let path = path.strip_suffix(".git").unwrap_or(path);

    let mut parts = path.split('/');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(owner), Some(name), None) if !owner.is_empty() && !name.is_empty() => Ok(RepoSlug {
            owner: owner.to_string(),
            name: name.to_string(),
        }),
        _ => Err(RemoteLookupError::MalformedIdentifier {
            url: url.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn ssh_and_https_remotes_agree() {
        let ssh = repo_slug_from_remote("git@github.com:classroom/student1-repo.git").expect("ssh");
        let https =
            repo_slug_from_remote("https://github.com/classroom/student1-repo.git").expect("https");
        assert_eq!(ssh.to_string(), "classroom/student1-repo");
        assert_eq!(ssh, https);
    }

    #[test]
    fn accepts_ssh_scheme_and_missing_suffix() {
        let slug = repo_slug_from_remote("ssh://git@github.com/classroom/student2-repo\n")
            .expect("ssh scheme");
        assert_eq!(slug.to_string(), "classroom/student2-repo");

        let slug = repo_slug_from_remote("https://github.com/classroom/repo/").expect("trailing");
        assert_eq!(slug.name, "repo");
    }

    #[test]
    fn only_strips_the_trailing_suffix() {
        let slug = repo_slug_from_remote("https://github.com/classroom/my.github.io.git")
            .expect("dotted name");
        assert_eq!(slug.name, "my.github.io");
    }

    #[test]
    fn rejects_other_hosts() {
        let err = repo_slug_from_remote("https://gitlab.com/classroom/student1-repo.git")
            .expect_err("gitlab");
        assert!(matches!(err, RemoteLookupError::UnsupportedHost { .. }));
    }

    #[test]
    fn rejects_paths_that_are_not_owner_and_name() {
        for url in [
            "https://github.com/classroom",
            "https://github.com/classroom/repo/tree/main",
            "git@github.com:/repo.git",
            "https://github.company.com/classroom/repo.git",
        ] {
            let err = repo_slug_from_remote(url).expect_err(url);
            assert!(
                matches!(err, RemoteLookupError::MalformedIdentifier { .. }),
                "{url}: {err:?}"
            );
        }
    }
}
