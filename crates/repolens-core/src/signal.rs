use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::{EntryKind, FileEntry};

/// Closed set of detection categories. A single file may emit signals in
/// several categories at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SignalCategory {
    FrontendFramework,
    Language,
    BuildTool,
    Styling,
    BackendRuntime,
    Database,
    Orm,
    ApiStyle,
    StateManagement,
    Testing,
    Ci,
    Containerization,
    LintFormat,
    DocsTool,
}

impl fmt::Display for SignalCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SignalCategory::FrontendFramework => "frontend-framework",
            SignalCategory::Language => "language",
            SignalCategory::BuildTool => "build-tool",
            SignalCategory::Styling => "styling",
            SignalCategory::BackendRuntime => "backend-runtime",
            SignalCategory::Database => "database",
            SignalCategory::Orm => "orm",
            SignalCategory::ApiStyle => "api-style",
            SignalCategory::StateManagement => "state-management",
            SignalCategory::Testing => "testing",
            SignalCategory::Ci => "ci",
            SignalCategory::Containerization => "containerization",
            SignalCategory::LintFormat => "lint-format",
            SignalCategory::DocsTool => "docs-tool",
        };
        write!(f, "{s}")
    }
}

/// One atomic piece of technology evidence produced from a single file.
/// Signals are ephemeral: produced per entry and folded immediately.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TechnologySignal {
    pub category: SignalCategory,
    pub value: &'static str,
}

use SignalCategory::*;

/// Extension rules. Weakest evidence tier: suppressed per category when a
/// filename or content rule already fired for the same category on the file.
const EXTENSION_RULES: &[(&str, SignalCategory, &str)] = &[
    ("tsx", FrontendFramework, "React"),
    ("jsx", FrontendFramework, "React"),
    ("vue", FrontendFramework, "Vue"),
    ("svelte", FrontendFramework, "Svelte"),
    ("ts", Language, "TypeScript"),
    ("tsx", Language, "TypeScript"),
    ("js", Language, "JavaScript"),
    ("jsx", Language, "JavaScript"),
    ("py", Language, "Python"),
    ("css", Styling, "CSS"),
    ("scss", Styling, "Sass/SCSS"),
    ("sass", Styling, "Sass/SCSS"),
    ("less", Styling, "Less"),
    ("graphql", ApiStyle, "GraphQL"),
    ("gql", ApiStyle, "GraphQL"),
    ("sql", Database, "SQL"),
    ("md", DocsTool, "Markdown"),
    ("mdx", DocsTool, "Markdown"),
];

/// Exact-match rules on the final path segment, compared case-insensitively.
const FILENAME_RULES: &[(&str, SignalCategory, &str)] = &[
    ("vite.config.ts", BuildTool, "Vite"),
    ("vite.config.js", BuildTool, "Vite"),
    ("vite.config.mjs", BuildTool, "Vite"),
    ("webpack.config.js", BuildTool, "Webpack"),
    ("webpack.config.ts", BuildTool, "Webpack"),
    ("next.config.js", FrontendFramework, "Next.js"),
    ("next.config.mjs", FrontendFramework, "Next.js"),
    ("next.config.ts", FrontendFramework, "Next.js"),
    ("angular.json", FrontendFramework, "Angular"),
    ("svelte.config.js", FrontendFramework, "Svelte"),
    ("tailwind.config.js", Styling, "Tailwind CSS"),
    ("tailwind.config.ts", Styling, "Tailwind CSS"),
    ("tailwind.config.cjs", Styling, "Tailwind CSS"),
    ("postcss.config.js", Styling, "PostCSS"),
    ("tsconfig.json", Language, "TypeScript"),
    ("requirements.txt", Language, "Python"),
    ("manage.py", BackendRuntime, "Django"),
    ("schema.prisma", Orm, "Prisma"),
    ("drizzle.config.ts", Orm, "Drizzle"),
    ("dockerfile", Containerization, "Docker"),
    ("docker-compose.yml", Containerization, "Docker"),
    ("docker-compose.yaml", Containerization, "Docker"),
    (".dockerignore", Containerization, "Docker"),
    ("jest.config.js", Testing, "Jest"),
    ("jest.config.ts", Testing, "Jest"),
    ("vitest.config.ts", Testing, "Vitest"),
    ("vitest.config.js", Testing, "Vitest"),
    ("cypress.config.ts", Testing, "Cypress"),
    ("cypress.config.js", Testing, "Cypress"),
    ("playwright.config.ts", Testing, "Playwright"),
    (".eslintrc", LintFormat, "ESLint"),
    (".eslintrc.json", LintFormat, "ESLint"),
    (".eslintrc.js", LintFormat, "ESLint"),
    (".eslintrc.cjs", LintFormat, "ESLint"),
    ("eslint.config.js", LintFormat, "ESLint"),
    (".prettierrc", LintFormat, "Prettier"),
    (".prettierrc.json", LintFormat, "Prettier"),
    ("prettier.config.js", LintFormat, "Prettier"),
    (".gitlab-ci.yml", Ci, "GitLab CI"),
];

/// Case-insensitive substring checks against the full path, for directory
/// naming conventions.
const PATH_RULES: &[(&str, SignalCategory, &str)] = &[
    (".github/workflows/", Ci, "GitHub Actions"),
    ("/cypress/", Testing, "Cypress"),
    ("/api/", ApiStyle, "REST"),
    ("/routes/", ApiStyle, "REST"),
    ("/graphql/", ApiStyle, "GraphQL"),
    ("/supabase/", Database, "Supabase"),
    ("/.storybook/", DocsTool, "Storybook"),
];

/// Keyword checks on file text. Content is only ever present for the small
/// allow-listed set of manifest/config entries, where it disambiguates
/// generic filenames like `app.py` or `server.js`.
const CONTENT_RULES: &[(&str, SignalCategory, &str)] = &[
    ("from flask import", BackendRuntime, "Flask"),
    ("from fastapi", BackendRuntime, "FastAPI"),
    ("from django", BackendRuntime, "Django"),
    ("require('express')", BackendRuntime, "Express"),
    ("require(\"express\")", BackendRuntime, "Express"),
    ("from 'express'", BackendRuntime, "Express"),
    ("from \"express\"", BackendRuntime, "Express"),
];

/// Classify a single listing entry into technology signals.
///
/// Pure and deterministic: no I/O, no shared state. Unrecognized entries
/// emit no signal rather than erroring. Filename and content matches take
/// precedence over extension-only matches within the same category.
pub fn classify(entry: &FileEntry) -> Vec<TechnologySignal> {
    let mut signals: Vec<TechnologySignal> = Vec::new();
    let path_lower = entry.path.to_lowercase();

    // Directories only participate in path-convention checks.
    if entry.kind == EntryKind::Tree {
        for &(needle, category, value) in PATH_RULES {
            if path_lower.contains(needle) {
                push_unique(&mut signals, TechnologySignal { category, value });
            }
        }
        return signals;
    }

    let name_lower = entry.file_name().to_lowercase();

    // Specific tiers first: filename, then content.
    for &(filename, category, value) in FILENAME_RULES {
        if name_lower == filename {
            push_unique(&mut signals, TechnologySignal { category, value });
        }
    }
    if let Some(content) = entry.content.as_deref() {
        for &(needle, category, value) in CONTENT_RULES {
            if content.contains(needle) {
                push_unique(&mut signals, TechnologySignal { category, value });
            }
        }
    }

    let specific: Vec<SignalCategory> = signals.iter().map(|s| s.category).collect();

    for &(needle, category, value) in PATH_RULES {
        if path_lower.contains(needle) {
            push_unique(&mut signals, TechnologySignal { category, value });
        }
    }

    if let Some(ext) = entry.extension() {
        let ext_lower = ext.to_lowercase();
        for &(rule_ext, category, value) in EXTENSION_RULES {
            if ext_lower == rule_ext && !specific.contains(&category) {
                push_unique(&mut signals, TechnologySignal { category, value });
            }
        }
    }

    signals
}

fn push_unique(signals: &mut Vec<TechnologySignal>, signal: TechnologySignal) {
    if !signals.contains(&signal) {
        signals.push(signal);
    }
}
