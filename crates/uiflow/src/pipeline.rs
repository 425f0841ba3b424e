//! Per-app pipeline stages over the workspace layout.
//!
//! `convert` reads `input/`, writes `extracted_tests/` and `va_methods/`;
//! `plan` reads `va_methods/` and writes the app's action plan document.

use std::path::{Path, PathBuf};

use uiflow_actionplan::{AppActionPlans, StoreError, merge_plan, parse_action_plan, save_app_plans};
use uiflow_espresso::{Language, dialect_for_extension};
use walkdir::WalkDir;

use crate::config::DuplicatePolicy;
use crate::paths::{APP_INTRODUCTION, AppLayout};

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("input directory not found: {}", .0.display())]
    MissingInput(PathBuf),

    #[error("synthesized methods directory not found: {}", .0.display())]
    MissingMethods(PathBuf),

    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to list {}: {source}", path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("method `{method}` is defined more than once (again in {})", path.display())]
    DuplicateMethod { method: String, path: PathBuf },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Outcome of [`convert_app`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConvertReport {
    /// Source files read from `input/`.
    pub files: usize,
    /// Synthesized method names, in the order they were written.
    pub methods: Vec<String>,
    /// Test methods that could not be synthesized.
    pub failed: Vec<String>,
    /// Body statements dropped across all methods.
    pub skipped_statements: usize,
}

/// Outcome of [`plan_app`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanReport {
    pub path: PathBuf,
    pub document: AppActionPlans,
    /// Method names whose earlier plan was replaced.
    pub overwritten: Vec<String>,
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> PipelineError + '_ {
    move |source| PipelineError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Regular files directly inside `dir`, sorted by file name.
fn sorted_files(dir: &Path) -> Result<Vec<PathBuf>, PipelineError> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|source| PipelineError::Walk {
            path: dir.to_path_buf(),
            source,
        })?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

fn extension(path: &Path) -> &str {
    path.extension().and_then(|e| e.to_str()).unwrap_or_default()
}

/// Empty `dir`, creating it if needed.
fn reset_dir(dir: &Path) -> Result<(), PipelineError> {
    if dir.exists() {
        std::fs::remove_dir_all(dir).map_err(io_error(dir))?;
    }
    std::fs::create_dir_all(dir).map_err(io_error(dir))
}

fn write_text(path: &Path, text: &str) -> Result<(), PipelineError> {
    std::fs::write(path, format!("{text}\n")).map_err(io_error(path))
}

/// Split every test class of an app and write raw slices plus synthesized
/// methods. Both output directories are emptied first, so they only ever
/// hold the results of this run.
pub fn convert_app(layout: &AppLayout) -> Result<ConvertReport, PipelineError> {
    let input_dir = layout.input_dir();
    if !input_dir.is_dir() {
        return Err(PipelineError::MissingInput(input_dir));
    }

    let extracted_dir = layout.extracted_dir();
    let methods_dir = layout.methods_dir();
    reset_dir(&extracted_dir)?;
    reset_dir(&methods_dir)?;

    let mut report = ConvertReport::default();
    for path in sorted_files(&input_dir)? {
        if path.file_name().is_some_and(|name| name == APP_INTRODUCTION) {
            continue;
        }
        let Some(dialect) = dialect_for_extension(extension(&path)) else {
            tracing::warn!(path = %path.display(), "skipping file with unsupported extension");
            continue;
        };

        let source = std::fs::read_to_string(&path).map_err(io_error(&path))?;
        report.files += 1;

        let blocks = dialect.split_tests(&source);
        tracing::info!(
            path = %path.display(),
            language = %dialect.language(),
            tests = blocks.len(),
            "split test class"
        );

        for block in &blocks {
            write_text(&layout.extracted_path(&block.name, block.language), &block.source())?;

            let method = match dialect.assemble(block) {
                Ok(method) => method,
                Err(err) => {
                    tracing::warn!(test = %block.name, error = %err, "cannot synthesize method");
                    report.failed.push(block.name.clone());
                    continue;
                }
            };

            for skipped in &method.skipped {
                tracing::debug!(
                    method = %method.name,
                    statement = %skipped.statement,
                    reason = %skipped.reason,
                    "dropped statement"
                );
            }
            report.skipped_statements += method.skipped.len();

            write_text(&layout.method_path(&method.name, method.language), &method.source)?;
            report.methods.push(method.name);
        }
    }

    tracing::info!(
        app = layout.app_id(),
        files = report.files,
        methods = report.methods.len(),
        failed = report.failed.len(),
        "converted app"
    );
    Ok(report)
}

/// Parse every synthesized method of an app and save the plan document.
pub fn plan_app(layout: &AppLayout, policy: DuplicatePolicy) -> Result<PlanReport, PipelineError> {
    let methods_dir = layout.methods_dir();
    if !methods_dir.is_dir() {
        return Err(PipelineError::MissingMethods(methods_dir));
    }

    let mut document = AppActionPlans::new(layout.app_id());
    let mut overwritten = Vec::new();

    for path in sorted_files(&methods_dir)? {
        if Language::from_extension(extension(&path)).is_none() {
            tracing::debug!(path = %path.display(), "skipping non-method file");
            continue;
        }

        let source = std::fs::read_to_string(&path).map_err(io_error(&path))?;
        let plan = parse_action_plan(&source);
        tracing::debug!(method = %plan.method_name, steps = plan.steps.len(), "parsed plan");

        let method = plan.method_name.clone();
        if merge_plan(&mut document.action_plans, plan).is_some() {
            match policy {
                DuplicatePolicy::Overwrite => {
                    tracing::warn!(method = %method, path = %path.display(), "overwriting earlier plan");
                    overwritten.push(method);
                }
                DuplicatePolicy::Fail => {
                    return Err(PipelineError::DuplicateMethod { method, path });
                }
            }
        }
    }

    let path = save_app_plans(layout.root(), &document)?;
    tracing::info!(
        app = layout.app_id(),
        plans = document.action_plans.len(),
        path = %path.display(),
        "saved action plans"
    );

    Ok(PlanReport {
        path,
        document,
        overwritten,
    })
}

/// [`convert_app`] followed by [`plan_app`].
pub fn run_app(
    layout: &AppLayout,
    policy: DuplicatePolicy,
) -> Result<(ConvertReport, PlanReport), PipelineError> {
    let converted = convert_app(layout)?;
    let planned = plan_app(layout, policy)?;
    Ok((converted, planned))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(path: &Path, text: &str) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, text).unwrap();
    }

    #[test]
    fn test_missing_input_dir() {
        let dir = TempDir::new().unwrap();
        let layout = AppLayout::new(dir.path(), "ghost");
        let err = convert_app(&layout).unwrap_err();
        assert!(matches!(err, PipelineError::MissingInput(ref p) if *p == layout.input_dir()));
    }

    #[test]
    fn test_missing_methods_dir() {
        let dir = TempDir::new().unwrap();
        let layout = AppLayout::new(dir.path(), "ghost");
        let err = plan_app(&layout, DuplicatePolicy::Overwrite).unwrap_err();
        assert!(matches!(err, PipelineError::MissingMethods(_)));
    }

    #[test]
    fn test_skips_introduction_and_unknown_files() {
        let dir = TempDir::new().unwrap();
        let layout = AppLayout::new(dir.path(), "app");
        write(&layout.input_dir().join(APP_INTRODUCTION), "An expense tracker.");
        write(&layout.input_dir().join("notes.md"), "@Test\nvoid a() {\n}");

        let report = convert_app(&layout).unwrap();
        assert_eq!(report, ConvertReport::default());
        assert!(layout.methods_dir().is_dir());
    }

    #[test]
    fn test_convert_clears_previous_outputs() {
        let dir = TempDir::new().unwrap();
        let layout = AppLayout::new(dir.path(), "app");
        write(
            &layout.input_dir().join("LoginTest.java"),
            "class LoginTest {\n    @Test\n    public void loginTest() {\n        pressBack();\n    }\n}\n",
        );
        let stale_method = layout.methods_dir().join("removedFlow.java");
        let stale_slice = layout.extracted_dir().join("removedFlowTest.java");
        write(&stale_method, "public void removedFlow() {\n    pressBack();\n}\n");
        write(&stale_slice, "@Test\npublic void removedFlowTest() {\n}\n");

        let report = convert_app(&layout).unwrap();
        assert_eq!(report.methods, vec!["login".to_string()]);
        assert!(!stale_method.exists());
        assert!(!stale_slice.exists());
        assert!(layout.methods_dir().join("login.java").is_file());

        let plan = plan_app(&layout, DuplicatePolicy::Fail).unwrap();
        let names: Vec<&str> = plan.document.action_plans.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["login"]);
    }

    #[test]
    fn test_duplicate_policy() {
        let dir = TempDir::new().unwrap();
        let layout = AppLayout::new(dir.path(), "app");
        write(
            &layout.methods_dir().join("a.java"),
            "public void save() {\n    pressBack();\n}\n",
        );
        write(
            &layout.methods_dir().join("b.kt"),
            "fun save() {\n    closeSoftKeyboard()\n}\n",
        );

        let report = plan_app(&layout, DuplicatePolicy::Overwrite).unwrap();
        assert_eq!(report.overwritten, vec!["save".to_string()]);
        let steps = &report.document.action_plans["save"].steps;
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].action, uiflow_actionplan::Action::CloseSoftKeyboard);

        let err = plan_app(&layout, DuplicatePolicy::Fail).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::DuplicateMethod { ref method, ref path }
                if method == "save" && path.ends_with("b.kt")
        ));
    }
}
