//! Action plans: replayable step sequences for device-side UI automation.
//!
//! A synthesized method such as
//!
//! ```text
//! public void addExpense() {
//!     performClick(findNode(withId("fab")));
//!     performInput(findNode(withId("amount")), "20");
//!     Thread.sleep(1500);
//! }
//! ```
//!
//! parses into an [`ActionPlan`] of typed [`ActionStep`]s. Plans of one app
//! are collected by method name and persisted as a single JSON document
//! (see [`store`]).

pub mod model;
pub mod parse;
pub mod store;

pub use model::{
    Action, ActionPlan, ActionPlans, ActionStep, AppActionPlans, MatchMode, Matcher, MatcherType,
    merge_plan,
};
pub use parse::{
    UNKNOWN_METHOD, method_body_lines, method_name, parse_action_line, parse_action_plan,
    parse_node_lookup, parse_string_expr,
};
pub use store::{
    ACTION_PLAN_DIR, ActionPlanStore, StoreError, action_plan_path, load_app_plans, save_app_plans,
};
