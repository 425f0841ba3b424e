//! Reading and writing per-app action plan documents.
//!
//! Layout: `<workspace>/actionplan/<app_id>_actionplan.json`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::model::{ActionPlan, ActionPlans, AppActionPlans};

/// Directory under the workspace root holding plan documents.
pub const ACTION_PLAN_DIR: &str = "actionplan";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("action plan file not found for app `{app_id}`: {}", path.display())]
    NotFound { app_id: String, path: PathBuf },

    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid action plan document {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("app id mismatch: requested `{requested}`, file has `{found}`")]
    AppIdMismatch { requested: String, found: String },

    #[error("missing `action_plans` in document for app `{app_id}`")]
    MissingPlans { app_id: String },
}

/// Path of the plan document for `app_id`.
pub fn action_plan_path(workspace_root: &Path, app_id: &str) -> PathBuf {
    workspace_root
        .join(ACTION_PLAN_DIR)
        .join(format!("{app_id}_actionplan.json"))
}

/// Write `plans` as pretty JSON, creating the plan directory if needed.
pub fn save_app_plans(workspace_root: &Path, plans: &AppActionPlans) -> Result<PathBuf, StoreError> {
    let path = action_plan_path(workspace_root, &plans.app_id);
    let io_err = |source| StoreError::Io {
        path: path.clone(),
        source,
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }
    let json = serde_json::to_string_pretty(plans).map_err(|source| StoreError::Json {
        path: path.clone(),
        source,
    })?;
    std::fs::write(&path, json).map_err(io_err)?;
    Ok(path)
}

/// Document shape accepted on load: `app_id` may be absent.
#[derive(Deserialize)]
struct StoredDocument {
    app_id: Option<String>,
    action_plans: Option<ActionPlans>,
}

/// Load and verify the plan document for `app_id`.
pub fn load_app_plans(workspace_root: &Path, app_id: &str) -> Result<AppActionPlans, StoreError> {
    let path = action_plan_path(workspace_root, app_id);
    if !path.is_file() {
        return Err(StoreError::NotFound {
            app_id: app_id.to_string(),
            path,
        });
    }

    let content = std::fs::read_to_string(&path).map_err(|source| StoreError::Io {
        path: path.clone(),
        source,
    })?;
    let doc: StoredDocument =
        serde_json::from_str(&content).map_err(|source| StoreError::Json { path, source })?;

    match doc.app_id {
        Some(found) if found != app_id => {
            return Err(StoreError::AppIdMismatch {
                requested: app_id.to_string(),
                found,
            });
        }
        _ => {}
    }

    let action_plans = doc.action_plans.ok_or_else(|| StoreError::MissingPlans {
        app_id: app_id.to_string(),
    })?;

    Ok(AppActionPlans {
        app_id: app_id.to_string(),
        action_plans,
    })
}

/// Read access to plan documents, caching each app after first load.
pub struct ActionPlanStore {
    workspace_root: PathBuf,
    cache: HashMap<String, ActionPlans>,
}

impl ActionPlanStore {
    pub fn new(workspace_root: impl Into<PathBuf>) -> Self {
        Self {
            workspace_root: workspace_root.into(),
            cache: HashMap::new(),
        }
    }

    pub fn plans(&mut self, app_id: &str) -> Result<&ActionPlans, StoreError> {
        if !self.cache.contains_key(app_id) {
            let loaded = load_app_plans(&self.workspace_root, app_id)?;
            self.cache.insert(app_id.to_string(), loaded.action_plans);
        }
        self.cache
            .get(app_id)
            .ok_or_else(|| StoreError::MissingPlans {
                app_id: app_id.to_string(),
            })
    }

    /// The plan for one method, or `None` if the app has no such method.
    pub fn plan(&mut self, app_id: &str, method_name: &str) -> Result<Option<&ActionPlan>, StoreError> {
        Ok(self.plans(app_id)?.get(method_name))
    }

    /// Forget cached documents so the next lookup rereads from disk.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }
}
