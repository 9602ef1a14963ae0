//! Project profile detection
//!
//! Lightweight heuristics over a tree snapshot: what kind of project this
//! is, which frameworks it uses, and a few presence signals rules can key
//! off. The engine only consumes the resulting [`ProjectProfile`]; callers
//! embedding the engine can construct one directly.

use serde::{Deserialize, Serialize};

use crate::scanner::FileTree;

/// Broad project classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectType {
    /// JavaScript/TypeScript (package.json present).
    Node,
    /// Rust (Cargo.toml present).
    Rust,
    /// Python (pyproject/requirements present).
    Python,
    /// Go (go.mod present).
    Go,
    /// More than one ecosystem detected.
    Mixed,
    /// No recognizable manifest.
    Unknown,
}

impl std::fmt::Display for ProjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ProjectType::Node => "node",
            ProjectType::Rust => "rust",
            ProjectType::Python => "python",
            ProjectType::Go => "go",
            ProjectType::Mixed => "mixed",
            ProjectType::Unknown => "unknown",
        })
    }
}

/// Detected characteristics of the project under audit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectProfile {
    /// Broad classification.
    pub project_type: ProjectType,
    /// Detected framework names, lowercase.
    pub frameworks: Vec<String>,
    /// Architecture hint, when one is recognizable (e.g. "monorepo").
    pub architecture: Option<String>,
    /// Test files are present.
    pub has_tests: bool,
    /// TypeScript sources or tsconfig present.
    pub has_typescript: bool,
    /// A build configuration file is present.
    pub has_build_config: bool,
    /// Detected package manager.
    pub package_manager: Option<String>,
    /// How confident the detection is, 0.0 to 1.0.
    pub confidence: f32,
}

impl Default for ProjectProfile {
    fn default() -> Self {
        Self {
            project_type: ProjectType::Unknown,
            frameworks: Vec::new(),
            architecture: None,
            has_tests: false,
            has_typescript: false,
            has_build_config: false,
            package_manager: None,
            confidence: 0.0,
        }
    }
}

impl ProjectProfile {
    /// True when the given framework was detected.
    pub fn uses_framework(&self, framework: &str) -> bool {
        self.frameworks
            .iter()
            .any(|f| f.eq_ignore_ascii_case(framework))
    }
}

/// Framework names recognized in package.json dependency tables.
const KNOWN_JS_FRAMEWORKS: &[&str] = &[
    "react", "vue", "angular", "svelte", "next", "nuxt", "express", "fastify", "nest",
];

/// Detect a project profile from a tree snapshot.
pub fn detect(tree: &FileTree) -> ProjectProfile {
    let mut profile = ProjectProfile::default();
    let mut signals = 0u32;

    let mut ecosystems = Vec::new();

    if tree.has_file("package.json") {
        ecosystems.push(ProjectType::Node);
        signals += 1;
        detect_node(tree, &mut profile);
    }
    if tree.has_file("Cargo.toml") {
        ecosystems.push(ProjectType::Rust);
        signals += 1;
        profile.has_build_config = true;
        profile.package_manager.get_or_insert("cargo".to_string());
    }
    if tree.has_file("pyproject.toml") || tree.has_file("requirements.txt") {
        ecosystems.push(ProjectType::Python);
        signals += 1;
        profile.package_manager.get_or_insert("pip".to_string());
    }
    if tree.has_file("go.mod") {
        ecosystems.push(ProjectType::Go);
        signals += 1;
        profile.package_manager.get_or_insert("go".to_string());
    }

    profile.project_type = match ecosystems.len() {
        0 => ProjectType::Unknown,
        1 => ecosystems[0],
        _ => ProjectType::Mixed,
    };

    let files = tree.file_paths();

    profile.has_tests = files.iter().any(|p| is_test_path(p));
    if profile.has_tests {
        signals += 1;
    }

    if !profile.has_typescript {
        profile.has_typescript = tree.has_file("tsconfig.json")
            || files
                .iter()
                .any(|p| p.ends_with(".ts") || p.ends_with(".tsx"));
    }

    if !profile.has_build_config {
        profile.has_build_config = tree.has_file("Makefile")
            || tree.has_file("webpack.config.js")
            || tree.has_file("vite.config.ts")
            || tree.has_file("vite.config.js")
            || tree.has_file("build.gradle");
    }
    if profile.has_build_config {
        signals += 1;
    }

    if files.iter().any(|p| {
        p.starts_with("packages/") && (p.ends_with("package.json") || p.ends_with("Cargo.toml"))
    }) {
        profile.architecture = Some("monorepo".to_string());
    }

    // Rough confidence: each positive signal adds a quarter, capped at 1.
    profile.confidence = (signals as f32 * 0.25).min(1.0);

    profile
}

fn detect_node(tree: &FileTree, profile: &mut ProjectProfile) {
    profile.package_manager = Some(
        if tree.has_file("pnpm-lock.yaml") {
            "pnpm"
        } else if tree.has_file("yarn.lock") {
            "yarn"
        } else {
            "npm"
        }
        .to_string(),
    );

    let manifest_path = tree.root.join("package.json");
    let Ok(content) = std::fs::read_to_string(&manifest_path) else {
        return;
    };
    let Ok(manifest) = serde_json::from_str::<serde_json::Value>(&content) else {
        return;
    };

    for table in ["dependencies", "devDependencies"] {
        if let Some(deps) = manifest.get(table).and_then(|d| d.as_object()) {
            for name in deps.keys() {
                let name = name.to_lowercase();
                if KNOWN_JS_FRAMEWORKS.contains(&name.as_str())
                    && !profile.frameworks.contains(&name)
                {
                    profile.frameworks.push(name);
                }
            }
        }
        if let Some(deps) = manifest.get(table).and_then(|d| d.as_object()) {
            if deps.contains_key("typescript") {
                profile.has_typescript = true;
            }
        }
    }

    profile.frameworks.sort();
}

fn is_test_path(path: &str) -> bool {
    let lowered = path.to_lowercase();
    lowered.split(['/', '\\']).any(|segment| {
        segment == "tests" || segment == "test" || segment == "__tests__" || segment == "spec"
    }) || lowered.contains(".test.")
        || lowered.contains(".spec.")
        || lowered.ends_with("_test.go")
        || lowered.ends_with("_test.py")
}
