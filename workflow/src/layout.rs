use crate::model::ClonedRepo;
use anyhow::Context;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

/// The directory student repositories are cloned into.
#[derive(Debug, Clone)]
pub struct WorkspaceLayout {
    root: PathBuf,
}

impl WorkspaceLayout {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Lists the non-hidden directories directly under the root, sorted by
    /// name, with absolute paths.
    pub fn cloned_repos(&self) -> anyhow::Result<Vec<ClonedRepo>> {
        let root = std::path::absolute(&self.root)
            .with_context(|| format!("failed to resolve {}", self.root.display()))?;
        let entries =
            fs::read_dir(&root).with_context(|| format!("failed to read {}", root.display()))?;

        let mut repos = Vec::new();
        for entry in entries {
            let entry = entry.with_context(|| format!("failed to read {}", root.display()))?;
            let name = entry.file_name().to_string_lossy().to_string();
            if is_hidden(&name) {
                continue;
            }
            // Follows symlinks, so a linked checkout still counts.
            let path = entry.path();
            if !path.is_dir() {
                continue;
            }
            repos.push(ClonedRepo { name, path });
        }
        repos.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(repos)
    }
}

fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn lists_visible_directories_sorted() {
        let dir = tempfile::tempdir().expect("tempdir");
        for name in ["student2-repo", "student1-repo", ".git", ".cache"] {
            fs::create_dir(dir.path().join(name)).expect("mkdir");
        }
        fs::write(dir.path().join("notes.txt"), "not a repo").expect("write file");

        let layout = WorkspaceLayout::new(dir.path().to_path_buf());
        let repos = layout.cloned_repos().expect("list");

        assert_eq!(
            repos,
            vec![
                ClonedRepo {
                    name: "student1-repo".into(),
                    path: dir.path().join("student1-repo"),
                },
                ClonedRepo {
                    name: "student2-repo".into(),
                    path: dir.path().join("student2-repo"),
                },
            ]
        );
        assert!(repos.iter().all(|repo| repo.path.is_absolute()));
    }

    #[test]
    fn missing_root_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let layout = WorkspaceLayout::new(dir.path().join("gone"));
        let err = layout.cloned_repos().expect_err("missing root");
        assert!(err.to_string().contains("failed to read"), "{err}");
    }
}
