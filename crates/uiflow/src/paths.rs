//! Workspace layout.
//!
//! ```text
//! <workspace>/<app_id>/input/*.java|*.kt
//! <workspace>/<app_id>/extracted_tests/<name>.<ext>
//! <workspace>/<app_id>/va_methods/<name>.<ext>
//! <workspace>/actionplan/<app_id>_actionplan.json
//! ```

use std::path::{Path, PathBuf};

use uiflow_espresso::Language;

use crate::config::UiflowConfig;

/// Environment variable overriding the configured workspace root.
pub const WORKSPACE_ENV: &str = "UIFLOW_WORKSPACE_ROOT";

/// Workspace root used when nothing else names one.
pub const DEFAULT_WORKSPACE: &str = "workspace";

/// Free-form app description kept next to the test sources.
pub const APP_INTRODUCTION: &str = "app_introduction.txt";

/// Resolve the workspace root.
///
/// Resolution order:
/// 1. `cli_root` (the `--workspace` flag)
/// 2. UIFLOW_WORKSPACE_ROOT, if set and non-empty
/// 3. `[workspace] root` from config
/// 4. `./workspace`
pub fn workspace_root(cli_root: Option<&Path>, config: &UiflowConfig) -> PathBuf {
    if let Some(root) = cli_root {
        return root.to_path_buf();
    }
    if let Ok(root) = std::env::var(WORKSPACE_ENV) {
        if !root.is_empty() {
            return PathBuf::from(root);
        }
    }
    config
        .workspace
        .root
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_WORKSPACE))
}

/// Directories and files of one app inside the workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppLayout {
    root: PathBuf,
    app_id: String,
}

impl AppLayout {
    pub fn new(root: impl Into<PathBuf>, app_id: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            app_id: app_id.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    pub fn app_dir(&self) -> PathBuf {
        self.root.join(&self.app_id)
    }

    /// Raw test classes.
    pub fn input_dir(&self) -> PathBuf {
        self.app_dir().join("input")
    }

    /// One raw slice per `@Test` method.
    pub fn extracted_dir(&self) -> PathBuf {
        self.app_dir().join("extracted_tests")
    }

    /// One synthesized method per test.
    pub fn methods_dir(&self) -> PathBuf {
        self.app_dir().join("va_methods")
    }

    pub fn extracted_path(&self, method: &str, language: Language) -> PathBuf {
        self.extracted_dir()
            .join(format!("{method}.{}", language.extension()))
    }

    pub fn method_path(&self, method: &str, language: Language) -> PathBuf {
        self.methods_dir()
            .join(format!("{method}.{}", language.extension()))
    }

    pub fn action_plan_path(&self) -> PathBuf {
        uiflow_actionplan::action_plan_path(&self.root, &self.app_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // set_var/remove_var are unsafe in edition 2024; serialize the tests that
    // touch the environment.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn config_with_root(root: &str) -> UiflowConfig {
        let mut config = UiflowConfig::default();
        config.workspace.root = Some(PathBuf::from(root));
        config
    }

    #[test]
    fn test_default_workspace_root() {
        let _guard = ENV_LOCK.lock().unwrap();
        unsafe { env::remove_var(WORKSPACE_ENV) };
        assert_eq!(
            workspace_root(None, &UiflowConfig::default()),
            PathBuf::from("workspace")
        );
        assert_eq!(
            workspace_root(None, &config_with_root("/from/config")),
            PathBuf::from("/from/config")
        );
    }

    #[test]
    fn test_env_overrides_config() {
        let _guard = ENV_LOCK.lock().unwrap();
        unsafe { env::set_var(WORKSPACE_ENV, "/from/env") };
        assert_eq!(
            workspace_root(None, &config_with_root("/from/config")),
            PathBuf::from("/from/env")
        );
        assert_eq!(
            workspace_root(Some(Path::new("/from/cli")), &config_with_root("/from/config")),
            PathBuf::from("/from/cli")
        );
        unsafe { env::remove_var(WORKSPACE_ENV) };
    }

    #[test]
    fn test_app_layout() {
        let layout = AppLayout::new("/ws", "com.example.expenses");
        assert_eq!(layout.input_dir(), PathBuf::from("/ws/com.example.expenses/input"));
        assert_eq!(
            layout.extracted_path("addExpenseTest", Language::Java),
            PathBuf::from("/ws/com.example.expenses/extracted_tests/addExpenseTest.java")
        );
        assert_eq!(
            layout.method_path("addExpense", Language::Kotlin),
            PathBuf::from("/ws/com.example.expenses/va_methods/addExpense.kt")
        );
        assert_eq!(
            layout.action_plan_path(),
            PathBuf::from("/ws/actionplan/com.example.expenses_actionplan.json")
        );
    }
}
