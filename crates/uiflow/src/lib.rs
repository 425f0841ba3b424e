//! uiflow: Espresso UI tests to replayable action plans.
//!
//! The workspace driver over [`uiflow_espresso`] and [`uiflow_actionplan`].
//! Each app id owns a directory of test classes; [`convert_app`] synthesizes
//! internal methods from them and [`plan_app`] turns those methods into the
//! app's action plan document.

pub mod config;
pub mod paths;
pub mod pipeline;

pub use config::{ConfigError, DuplicatePolicy, UiflowConfig};
pub use paths::{AppLayout, workspace_root};
pub use pipeline::{ConvertReport, PipelineError, PlanReport, convert_app, plan_app, run_app};
