use serde::{Deserialize, Serialize};
use std::fmt;

use crate::manifest::Manifest;
use crate::signal::{classify, SignalCategory, TechnologySignal};
use crate::types::{EntryKind, FileEntry};

/// One boolean per known technology. The set is closed: every recognized
/// technology is a compile-time-checked field, never a free-form key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechFlags {
    pub react: bool,
    pub vue: bool,
    pub angular: bool,
    pub svelte: bool,
    pub next_js: bool,
    pub typescript: bool,
    pub javascript: bool,
    pub python: bool,
    pub vite: bool,
    pub webpack: bool,
    pub tailwind: bool,
    pub sass: bool,
    pub css: bool,
    pub postcss: bool,
    pub styled_components: bool,
    pub express: bool,
    pub flask: bool,
    pub django: bool,
    pub fastapi: bool,
    pub database: bool,
    pub supabase: bool,
    pub prisma: bool,
    pub drizzle: bool,
    pub mongoose: bool,
    pub rest_api: bool,
    pub graphql: bool,
    pub redux: bool,
    pub zustand: bool,
    pub jest: bool,
    pub vitest: bool,
    pub cypress: bool,
    pub playwright: bool,
    pub ci: bool,
    pub docker: bool,
    pub eslint: bool,
    pub prettier: bool,
    pub storybook: bool,
    pub markdown: bool,
}

impl TechFlags {
    /// Fold one classifier signal into the flag set. Setting is monotonic:
    /// a flag once true stays true.
    pub fn apply(&mut self, signal: &TechnologySignal) {
        use SignalCategory::*;
        match (signal.category, signal.value) {
            (FrontendFramework, "React") => self.react = true,
            (FrontendFramework, "Vue") => self.vue = true,
            (FrontendFramework, "Angular") => self.angular = true,
            (FrontendFramework, "Svelte") => self.svelte = true,
            (FrontendFramework, "Next.js") => self.next_js = true,
            (Language, "TypeScript") => self.typescript = true,
            (Language, "JavaScript") => self.javascript = true,
            (Language, "Python") => self.python = true,
            (BuildTool, "Vite") => self.vite = true,
            (BuildTool, "Webpack") => self.webpack = true,
            (Styling, "Tailwind CSS") => self.tailwind = true,
            (Styling, "Sass/SCSS") => self.sass = true,
            (Styling, "CSS") => self.css = true,
            (Styling, "PostCSS") => self.postcss = true,
            (BackendRuntime, "Express") => self.express = true,
            (BackendRuntime, "Flask") => self.flask = true,
            (BackendRuntime, "Django") => self.django = true,
            (BackendRuntime, "FastAPI") => self.fastapi = true,
            (Orm, "Prisma") => {
                self.prisma = true;
                self.database = true;
            }
            (Orm, "Drizzle") => {
                self.drizzle = true;
                self.database = true;
            }
            (Database, "SQL") => self.database = true,
            (Database, "Supabase") => {
                self.supabase = true;
                self.database = true;
            }
            (ApiStyle, "REST") => self.rest_api = true,
            (ApiStyle, "GraphQL") => self.graphql = true,
            (StateManagement, "Redux") => self.redux = true,
            (StateManagement, "Zustand") => self.zustand = true,
            (Testing, "Jest") => self.jest = true,
            (Testing, "Vitest") => self.vitest = true,
            (Testing, "Cypress") => self.cypress = true,
            (Testing, "Playwright") => self.playwright = true,
            (Ci, _) => self.ci = true,
            (Containerization, "Docker") => self.docker = true,
            (LintFormat, "ESLint") => self.eslint = true,
            (LintFormat, "Prettier") => self.prettier = true,
            (DocsTool, "Storybook") => self.storybook = true,
            (DocsTool, "Markdown") => self.markdown = true,
            _ => {}
        }
    }

    /// Force flags from a declared manifest dependency. Manifest evidence
    /// supersedes weaker path inference: a declared `react` sets the flag
    /// even when no `.tsx` file exists yet.
    pub fn apply_dependency(&mut self, name: &str) {
        match name {
            "react" | "react-dom" => self.react = true,
            "vue" => self.vue = true,
            "@angular/core" => self.angular = true,
            "svelte" => self.svelte = true,
            "next" => self.next_js = true,
            "typescript" => self.typescript = true,
            "vite" => self.vite = true,
            "webpack" => self.webpack = true,
            "tailwindcss" => self.tailwind = true,
            "sass" | "node-sass" => self.sass = true,
            "postcss" => self.postcss = true,
            "styled-components" => self.styled_components = true,
            "express" => self.express = true,
            "prisma" | "@prisma/client" => {
                self.prisma = true;
                self.database = true;
            }
            "drizzle-orm" => {
                self.drizzle = true;
                self.database = true;
            }
            "mongoose" => {
                self.mongoose = true;
                self.database = true;
            }
            "pg" | "mysql2" | "sqlite3" | "better-sqlite3" => self.database = true,
            "@supabase/supabase-js" => {
                self.supabase = true;
                self.database = true;
            }
            "graphql" | "@apollo/client" | "apollo-server" => self.graphql = true,
            "redux" | "@reduxjs/toolkit" | "react-redux" => self.redux = true,
            "zustand" => self.zustand = true,
            "jest" => self.jest = true,
            "vitest" => self.vitest = true,
            "cypress" => self.cypress = true,
            "playwright" | "@playwright/test" => self.playwright = true,
            "eslint" => self.eslint = true,
            "prettier" => self.prettier = true,
            "storybook" | "@storybook/react" => self.storybook = true,
            _ => {}
        }
    }

    /// Highest-priority detected front-end framework, or "unknown".
    pub fn framework(&self) -> &'static str {
        if self.next_js {
            "Next.js"
        } else if self.react {
            "React"
        } else if self.vue {
            "Vue"
        } else if self.angular {
            "Angular"
        } else if self.svelte {
            "Svelte"
        } else {
            "unknown"
        }
    }

    pub fn any_frontend(&self) -> bool {
        self.react || self.vue || self.angular || self.svelte || self.next_js
    }

    pub fn any_backend(&self) -> bool {
        self.express || self.flask || self.django || self.fastapi
    }

    pub fn any_testing(&self) -> bool {
        self.jest || self.vitest || self.cypress || self.playwright
    }

    pub fn any_state_management(&self) -> bool {
        self.redux || self.zustand
    }

    /// Display names of every set flag, in declaration order.
    pub fn technologies(&self) -> Vec<&'static str> {
        let pairs: [(bool, &'static str); 36] = [
            (self.react, "React"),
            (self.vue, "Vue"),
            (self.angular, "Angular"),
            (self.svelte, "Svelte"),
            (self.next_js, "Next.js"),
            (self.typescript, "TypeScript"),
            (self.javascript, "JavaScript"),
            (self.python, "Python"),
            (self.vite, "Vite"),
            (self.webpack, "Webpack"),
            (self.tailwind, "Tailwind CSS"),
            (self.sass, "Sass/SCSS"),
            (self.css, "CSS"),
            (self.postcss, "PostCSS"),
            (self.styled_components, "styled-components"),
            (self.express, "Express"),
            (self.flask, "Flask"),
            (self.django, "Django"),
            (self.fastapi, "FastAPI"),
            (self.supabase, "Supabase"),
            (self.prisma, "Prisma"),
            (self.drizzle, "Drizzle"),
            (self.mongoose, "Mongoose"),
            (self.rest_api, "REST"),
            (self.graphql, "GraphQL"),
            (self.redux, "Redux"),
            (self.zustand, "Zustand"),
            (self.jest, "Jest"),
            (self.vitest, "Vitest"),
            (self.cypress, "Cypress"),
            (self.playwright, "Playwright"),
            (self.docker, "Docker"),
            (self.eslint, "ESLint"),
            (self.prettier, "Prettier"),
            (self.storybook, "Storybook"),
            (self.markdown, "Markdown"),
        ];
        pairs
            .into_iter()
            .filter_map(|(set, name)| set.then_some(name))
            .collect()
    }
}

/// Per-category file counts. A file may count in zero or several categories;
/// overlaps are intentional and not deduplicated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileCounts {
    pub total: usize,
    pub components: usize,
    pub services: usize,
    pub configs: usize,
    pub styles: usize,
    pub assets: usize,
    pub docs: usize,
}

impl FileCounts {
    fn record(&mut self, entry: &FileEntry) {
        let path = entry.path.to_lowercase();
        let name = entry.file_name().to_lowercase();
        let ext = entry.extension().map(|e| e.to_lowercase());
        let ext = ext.as_deref();

        self.total += 1;
        if in_dir(&path, "components") || matches!(ext, Some("tsx" | "jsx" | "vue" | "svelte")) {
            self.components += 1;
        }
        if in_dir(&path, "services") || in_dir(&path, "api") || in_dir(&path, "routes") {
            self.services += 1;
        }
        if is_config_name(&name) || path.contains(".github/workflows/") {
            self.configs += 1;
        }
        if matches!(ext, Some("css" | "scss" | "sass" | "less" | "styl")) {
            self.styles += 1;
        }
        if in_dir(&path, "assets")
            || in_dir(&path, "public")
            || in_dir(&path, "static")
            || matches!(
                ext,
                Some(
                    "png" | "jpg" | "jpeg" | "gif" | "svg" | "ico" | "webp" | "woff" | "woff2"
                        | "ttf"
                )
            )
        {
            self.assets += 1;
        }
        if matches!(ext, Some("md" | "mdx" | "rst")) || in_dir(&path, "docs") {
            self.docs += 1;
        }
    }
}

fn in_dir(path: &str, dir: &str) -> bool {
    path.starts_with(&format!("{dir}/")) || path.contains(&format!("/{dir}/"))
}

fn is_config_name(name: &str) -> bool {
    name.ends_with(".config.js")
        || name.ends_with(".config.ts")
        || name.ends_with(".config.mjs")
        || name.ends_with(".config.cjs")
        || name.starts_with(".env")
        || name.starts_with(".eslintrc")
        || name.starts_with(".prettierrc")
        || matches!(
            name,
            "package.json"
                | "package-lock.json"
                | "tsconfig.json"
                | "angular.json"
                | "components.json"
                | "dockerfile"
                | "docker-compose.yml"
                | "docker-compose.yaml"
                | ".dockerignore"
                | ".gitlab-ci.yml"
                | "schema.prisma"
                | "requirements.txt"
                | "pyproject.toml"
        )
}

/// Overall shape of the codebase, derived from flag combinations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArchitectureStyle {
    SinglePageApp,
    FullStack,
    Microservices,
    Layered,
}

impl fmt::Display for ArchitectureStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArchitectureStyle::SinglePageApp => write!(f, "single-page-app"),
            ArchitectureStyle::FullStack => write!(f, "full-stack"),
            ArchitectureStyle::Microservices => write!(f, "microservices"),
            ArchitectureStyle::Layered => write!(f, "layered"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    Simple,
    Moderate,
    Complex,
}

impl fmt::Display for Complexity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Complexity::Simple => write!(f, "simple"),
            Complexity::Moderate => write!(f, "moderate"),
            Complexity::Complex => write!(f, "complex"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scale {
    Small,
    Medium,
    Large,
}

impl fmt::Display for Scale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scale::Small => write!(f, "small"),
            Scale::Medium => write!(f, "medium"),
            Scale::Large => write!(f, "large"),
        }
    }
}

/// The aggregate, whole-repository technology and architecture summary.
/// Built once per analysis invocation; entirely derived, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepositoryProfile {
    pub flags: TechFlags,
    pub framework: String,
    pub counts: FileCounts,
    pub architecture_style: ArchitectureStyle,
    pub complexity: Complexity,
    pub scale: Scale,
    pub patterns: Vec<String>,
}

/// Fold the classifier over every entry, apply manifest overrides, and
/// derive the aggregate metrics.
///
/// Flag accumulation is a monotonic, order-independent union: a flag set by
/// any file stays set. An empty listing yields an all-false profile with
/// zero counts; that is a legitimate result, not an error.
pub fn aggregate(entries: &[FileEntry], manifest: Option<&Manifest>) -> RepositoryProfile {
    let mut flags = TechFlags::default();
    let mut counts = FileCounts::default();

    for entry in entries {
        for signal in classify(entry) {
            flags.apply(&signal);
        }
        if entry.kind == EntryKind::Blob {
            counts.record(entry);
        }
    }

    // Manifest evidence lands after the path fold so it can only add.
    if let Some(manifest) = manifest {
        for name in manifest.dependencies.keys() {
            flags.apply_dependency(name);
        }
    }

    RepositoryProfile {
        framework: flags.framework().to_string(),
        architecture_style: derive_style(&flags),
        complexity: derive_complexity(&counts),
        scale: derive_scale(&counts),
        patterns: derive_patterns(&flags),
        flags,
        counts,
    }
}

/// First matching rule wins. Repositories with a detected framework and
/// repositories with no signals at all both land on single-page-app.
fn derive_style(flags: &TechFlags) -> ArchitectureStyle {
    if (flags.rest_api || flags.graphql) && flags.database {
        ArchitectureStyle::FullStack
    } else {
        ArchitectureStyle::SinglePageApp
    }
}

fn derive_complexity(counts: &FileCounts) -> Complexity {
    if counts.total > 100 || counts.components > 20 {
        Complexity::Complex
    } else if counts.total > 50 || counts.components > 10 {
        Complexity::Moderate
    } else {
        Complexity::Simple
    }
}

fn derive_scale(counts: &FileCounts) -> Scale {
    if counts.total > 100 || counts.components > 20 {
        Scale::Large
    } else if counts.total > 50 || counts.components > 10 {
        Scale::Medium
    } else {
        Scale::Small
    }
}

/// Pattern labels in a fixed declaration order, each at most once.
fn derive_patterns(flags: &TechFlags) -> Vec<String> {
    let mut patterns = Vec::new();
    if flags.any_state_management() {
        patterns.push("State Management".to_string());
    }
    if flags.graphql {
        patterns.push("GraphQL API".to_string());
    } else if flags.rest_api {
        patterns.push("REST API".to_string());
    }
    if flags.any_testing() {
        patterns.push("Automated Testing".to_string());
    }
    if flags.docker {
        patterns.push("Containerization".to_string());
    }
    if flags.ci {
        patterns.push("Continuous Integration".to_string());
    }
    patterns
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::resolve_manifest;

    #[test]
    fn test_empty_input_baseline() {
        let profile = aggregate(&[], None);
        assert_eq!(profile.flags, TechFlags::default());
        assert_eq!(profile.framework, "unknown");
        assert_eq!(profile.counts, FileCounts::default());
        assert_eq!(profile.complexity, Complexity::Simple);
        assert_eq!(profile.scale, Scale::Small);
        assert!(profile.patterns.is_empty());
    }

    #[test]
    fn test_flags_accumulate_monotonically() {
        let mut entries = vec![FileEntry::file("src/App.tsx")];
        let before = aggregate(&entries, None);
        assert!(before.flags.react);

        entries.push(FileEntry::file("README.md"));
        entries.push(FileEntry::file("backend/main.py"));
        let after = aggregate(&entries, None);
        assert!(after.flags.react, "adding files never unsets a flag");
        assert!(after.flags.python);
    }

    #[test]
    fn test_fold_is_order_independent() {
        let mut entries = vec![
            FileEntry::file("src/App.tsx"),
            FileEntry::file("tailwind.config.js"),
            FileEntry::file("src/api/users.ts"),
        ];
        let forward = aggregate(&entries, None);
        entries.reverse();
        let reversed = aggregate(&entries, None);
        assert_eq!(forward.flags, reversed.flags);
    }

    #[test]
    fn test_manifest_dependency_forces_flag() {
        let entries = vec![FileEntry::file_with_content(
            "package.json",
            r#"{"dependencies":{"react":"^18.0.0"}}"#,
        )];
        let manifest = resolve_manifest(&entries);
        let profile = aggregate(&entries, manifest.as_ref());
        assert!(profile.flags.react, "manifest react forces the flag without any .tsx");
        assert_eq!(profile.framework, "React");
    }

    #[test]
    fn test_framework_priority_prefers_next_over_react() {
        let entries = vec![
            FileEntry::file("next.config.js"),
            FileEntry::file("src/App.tsx"),
        ];
        let profile = aggregate(&entries, None);
        assert!(profile.flags.next_js);
        assert!(profile.flags.react);
        assert_eq!(profile.framework, "Next.js");
    }

    #[test]
    fn test_full_stack_style() {
        let entries = vec![
            FileEntry::file("src/api/users.ts"),
            FileEntry::file("prisma/schema.prisma"),
        ];
        let profile = aggregate(&entries, None);
        assert!(profile.flags.rest_api);
        assert!(profile.flags.prisma);
        assert!(profile.flags.database);
        assert_eq!(profile.architecture_style, ArchitectureStyle::FullStack);
    }

    #[test]
    fn test_spa_style_default() {
        let entries = vec![FileEntry::file("src/App.tsx")];
        let profile = aggregate(&entries, None);
        assert_eq!(profile.architecture_style, ArchitectureStyle::SinglePageApp);

        // No framework at all still falls back to single-page-app.
        let profile = aggregate(&[FileEntry::file("main.py")], None);
        assert_eq!(profile.architecture_style, ArchitectureStyle::SinglePageApp);
    }

    #[test]
    fn test_counts_allow_overlap() {
        // A component test file counts as a component and a style file
        // stays independent of it.
        let entries = vec![
            FileEntry::file("src/components/Button.test.tsx"),
            FileEntry::file("src/components/button.css"),
        ];
        let profile = aggregate(&entries, None);
        assert_eq!(profile.counts.total, 2);
        assert_eq!(profile.counts.components, 2);
        assert_eq!(profile.counts.styles, 1);
    }

    #[test]
    fn test_complexity_thresholds() {
        let small: Vec<FileEntry> = (0..10).map(|i| FileEntry::file(format!("f{i}.txt"))).collect();
        assert_eq!(aggregate(&small, None).complexity, Complexity::Simple);

        let medium: Vec<FileEntry> = (0..60).map(|i| FileEntry::file(format!("f{i}.txt"))).collect();
        let profile = aggregate(&medium, None);
        assert_eq!(profile.complexity, Complexity::Moderate);
        assert_eq!(profile.scale, Scale::Medium);

        let large: Vec<FileEntry> = (0..150).map(|i| FileEntry::file(format!("f{i}.txt"))).collect();
        let profile = aggregate(&large, None);
        assert_eq!(profile.complexity, Complexity::Complex);
        assert_eq!(profile.scale, Scale::Large);
    }

    #[test]
    fn test_component_count_alone_raises_complexity() {
        let entries: Vec<FileEntry> = (0..25)
            .map(|i| FileEntry::file(format!("src/components/C{i}.tsx")))
            .collect();
        let profile = aggregate(&entries, None);
        assert_eq!(profile.complexity, Complexity::Complex);
    }

    #[test]
    fn test_patterns_fixed_order_and_graphql_preference() {
        let entries = vec![FileEntry::file_with_content(
            "package.json",
            r#"{"dependencies":{"zustand":"^4.0.0","graphql":"^16.0.0","vitest":"^1.0.0"}}"#,
        ), FileEntry::file("Dockerfile"), FileEntry::file(".github/workflows/ci.yml"),
        FileEntry::file("src/api/users.ts")];
        let manifest = resolve_manifest(&entries);
        let profile = aggregate(&entries, manifest.as_ref());
        assert_eq!(
            profile.patterns,
            vec![
                "State Management",
                "GraphQL API",
                "Automated Testing",
                "Containerization",
                "Continuous Integration",
            ]
        );
    }

    #[test]
    fn test_determinism() {
        let entries = vec![
            FileEntry::file("src/App.tsx"),
            FileEntry::file("prisma/schema.prisma"),
            FileEntry::file("src/api/users.ts"),
        ];
        let a = aggregate(&entries, None);
        let b = aggregate(&entries, None);
        assert_eq!(a, b);
    }

    #[test]
    fn test_technologies_listing() {
        let entries = vec![FileEntry::file("src/App.tsx"), FileEntry::file("Dockerfile")];
        let profile = aggregate(&entries, None);
        let techs = profile.flags.technologies();
        assert!(techs.contains(&"React"));
        assert!(techs.contains(&"TypeScript"));
        assert!(techs.contains(&"Docker"));
        assert!(!techs.contains(&"Vue"));
    }
}
