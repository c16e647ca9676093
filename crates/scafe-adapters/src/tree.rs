//! `tree`-style rendering of a project layout.
//!
//! Works either from a [`ScaffoldPlan`] (for dry runs) or from what is
//! actually on disk (after a run).

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use scafe_core::{
    domain::ScaffoldPlan,
    error::{ScafeError, ScafeResult},
};

/// Directories never descended into when walking the disk.
const SKIPPED: [&str; 2] = ["node_modules", ".git"];

#[derive(Debug, Default)]
struct Node {
    children: BTreeMap<String, Node>,
    is_dir: bool,
}

impl Node {
    fn insert(&mut self, rel: &Path, is_dir: bool) {
        let mut node = self;
        let mut components = rel.components().peekable();
        while let Some(component) = components.next() {
            let key = component.as_os_str().to_string_lossy().into_owned();
            let last = components.peek().is_none();
            node = node.children.entry(key).or_default();
            node.is_dir |= !last || is_dir;
        }
    }

    fn render(&self, prefix: &str, out: &mut String) {
        // Directories first, then files, each alphabetically.
        let mut entries: Vec<_> = self.children.iter().collect();
        entries.sort_by_key(|(name, node)| (!node.is_dir, name.to_string()));

        let count = entries.len();
        for (i, (name, node)) in entries.into_iter().enumerate() {
            let last = i + 1 == count;
            let (branch, indent) = if last {
                ("└── ", "    ")
            } else {
                ("├── ", "│   ")
            };
            out.push_str(prefix);
            out.push_str(branch);
            out.push_str(name);
            if node.is_dir {
                out.push('/');
            }
            out.push('\n');
            node.render(&format!("{prefix}{indent}"), out);
        }
    }
}

/// Render the entries a plan would produce.
pub fn render_plan(plan: &ScaffoldPlan) -> String {
    let mut root = Node::default();
    for service in plan.services() {
        let base = PathBuf::from(service.name().as_str());
        root.insert(&base, true);
        for folder in service.folders() {
            root.insert(&base.join(folder), true);
        }
        for file in service.files() {
            root.insert(&base.join(file.path.as_path()), false);
        }
    }
    for file in plan.manifest().into_iter().chain(plan.root_files()) {
        root.insert(file.path.as_path(), false);
    }
    finish(plan.root(), &root)
}

/// Render what exists under `dir`, up to `max_depth` levels deep.
pub fn render_dir(dir: &Path, max_depth: usize) -> ScafeResult<String> {
    let mut root = Node::default();
    let walker = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(max_depth)
        .into_iter()
        .filter_entry(|e| {
            !(e.file_type().is_dir()
                && SKIPPED.iter().any(|s| e.file_name() == std::ffi::OsStr::new(s)))
        });

    for entry in walker {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(dir).to_path_buf();
            ScafeError::filesystem(&path, format!("directory walk error: {e}"))
        })?;
        let rel = entry
            .path()
            .strip_prefix(dir)
            .map_err(|_| ScafeError::Internal {
                message: format!(
                    "failed to relativise '{}' against '{}'",
                    entry.path().display(),
                    dir.display()
                ),
            })?;
        root.insert(rel, entry.file_type().is_dir());
    }
    Ok(finish(dir, &root))
}

fn finish(dir: &Path, root: &Node) -> String {
    let label = dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| dir.display().to_string());
    let mut out = format!("{label}/\n");
    root.render("", &mut out);
    out
}

#[cfg(test)]
mod tests {
    use std::fs;

    use scafe_core::domain::{FileSpec, ServiceName, ServiceSpec};
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn plan_tree_lists_dirs_before_files() {
        let plan = ScaffoldPlan::builder("/work/shop")
            .service(
                ServiceSpec::new(ServiceName::new("auth").unwrap())
                    .with_folder("utils")
                    .unwrap()
                    .with_file("utils/jwt.js", "")
                    .unwrap()
                    .with_file("README.md", "")
                    .unwrap(),
            )
            .root_file(FileSpec::at(".gitignore", "").unwrap())
            .build()
            .unwrap();

        let tree = render_plan(&plan);
        assert_eq!(
            tree,
            "shop/\n\
             ├── auth/\n\
             │   ├── utils/\n\
             │   │   └── jwt.js\n\
             │   └── README.md\n\
             └── .gitignore\n"
        );
    }

    #[test]
    fn disk_tree_skips_node_modules() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("gateway/config")).unwrap();
        fs::create_dir_all(tmp.path().join("node_modules/express")).unwrap();
        fs::write(tmp.path().join("gateway/config/app.js"), "").unwrap();
        fs::write(tmp.path().join("package.json"), "{}").unwrap();

        let tree = render_dir(tmp.path(), 4).unwrap();
        assert!(tree.contains("gateway/"));
        assert!(tree.contains("app.js"));
        assert!(tree.contains("package.json"));
        assert!(!tree.contains("node_modules"));
    }
}
