//! Shared integration-test fixtures: a temporary content tree with a few
//! components and both global catalogs.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

/// A content tree on disk, removed on drop.
pub struct Site {
    dir: TempDir,
}

impl Site {
    /// Creates an empty site with `components/` and `catalogs/` directories.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        std::fs::create_dir_all(dir.path().join("components")).unwrap();
        std::fs::create_dir_all(dir.path().join("catalogs")).unwrap();
        Self { dir }
    }

    /// The standard fixture: `button`, `icon-button`, and `tabs`.
    pub fn fixture() -> Self {
        Self::new()
            .component(
                "button",
                &[
                    ("overview.yml", "summary: Triggers an action\naliases: [cta]\n"),
                    (
                        "anatomy.yml",
                        "parts:\n  - name: Container\n    required: true\n  - name: Label\n",
                    ),
                    (
                        "code-props.yml",
                        "- name: variant\n  type: \"'primary' | 'secondary'\"\n  default: primary\n",
                    ),
                    (
                        "implementations.yml",
                        "- slug: carbon\n  docs: https://carbon.example/button\n- slug: retired-system\n",
                    ),
                    ("figma.yml", "- slug: material-kit\n  page: Buttons\n"),
                    (
                        "index.mdx",
                        "---\ntitle: Button\n---\n\n# Button\n\n## When to use\n",
                    ),
                ],
            )
            .component(
                "icon-button",
                &[("overview.yml", "summary: A button with only an icon\n")],
            )
            .component(
                "tabs",
                &[
                    ("overview.yml", "summary: Switches between views\n"),
                    ("anatomy.yml", "parts: [oops\n"),
                    ("sections.yml", "- overview\n- anatomy\n- kpis\n"),
                    ("kpis.yml", "adoption: 7\n"),
                ],
            )
            .catalog(
                "systems.yml",
                "- slug: carbon\n  name: Carbon\n  url: https://carbon.example\n- slug: material\n  name: Material\n",
            )
            .catalog(
                "figma-kits.yml",
                "- slug: material-kit\n  name: Material 3 Kit\n",
            )
    }

    /// Adds files for one component.
    pub fn component(self, slug: &str, files: &[(&str, &str)]) -> Self {
        let dir = self.content_root().join(slug);
        std::fs::create_dir_all(&dir).unwrap();
        for (name, text) in files {
            std::fs::write(dir.join(name), text).unwrap();
        }
        self
    }

    /// Adds a catalog file.
    pub fn catalog(self, name: &str, text: &str) -> Self {
        std::fs::write(self.catalog_root().join(name), text).unwrap();
        self
    }

    pub fn content_root(&self) -> PathBuf {
        self.dir.path().join("components")
    }

    pub fn catalog_root(&self) -> PathBuf {
        self.dir.path().join("catalogs")
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Runs the `compdocs` binary against this site.
    pub fn run(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_compdocs"))
            .arg("--content-root")
            .arg(self.content_root())
            .arg("--catalog-root")
            .arg(self.catalog_root())
            .args(args)
            .env_remove("COMPDOCS_DEBUG")
            .env_remove("COMPDOCS_ENV")
            .env_remove("COMPDOCS_LOG_LEVEL")
            .output()
            .expect("failed to run compdocs")
    }
}
