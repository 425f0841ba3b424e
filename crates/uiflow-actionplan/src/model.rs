//! Action plan data model.
//!
//! These types serialize to the JSON document consumed by the device-side
//! runner. Every step field is always present; absent values are `null`.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Property of a UI node a [`Matcher`] compares against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MatcherType {
    Id,
    Text,
    ContentDescription,
    ClassName,
}

impl MatcherType {
    /// The view matcher call that produces this type.
    pub fn from_matcher_call(name: &str) -> Option<Self> {
        match name {
            "withId" => Some(MatcherType::Id),
            "withText" => Some(MatcherType::Text),
            "withContentDescription" => Some(MatcherType::ContentDescription),
            "withClassName" => Some(MatcherType::ClassName),
            _ => None,
        }
    }

    /// Mode used when the matcher argument is a bare literal. Resource ids
    /// are exact names; everything else matches loosely.
    pub fn default_mode(&self) -> MatchMode {
        match self {
            MatcherType::Id => MatchMode::EqualsIgnoreCase,
            _ => MatchMode::ContainsIgnoreCase,
        }
    }
}

/// String comparison performed by a [`Matcher`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MatchMode {
    EqualsIgnoreCase,
    ContainsIgnoreCase,
    Contains,
    StartsWithIgnoreCase,
    EndsWithIgnoreCase,
    Equals,
}

impl MatchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchMode::EqualsIgnoreCase => "equalsIgnoreCase",
            MatchMode::ContainsIgnoreCase => "containsIgnoreCase",
            MatchMode::Contains => "contains",
            MatchMode::StartsWithIgnoreCase => "startsWithIgnoreCase",
            MatchMode::EndsWithIgnoreCase => "endsWithIgnoreCase",
            MatchMode::Equals => "equals",
        }
    }

    /// Mode named by a string-helper call such as `containsStringIgnoringCase`.
    pub fn from_helper(name: &str) -> Option<Self> {
        uiflow_espresso::vocab::helper_mode(name).and_then(|mode| mode.parse().ok())
    }
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MatchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "equalsIgnoreCase" => Ok(MatchMode::EqualsIgnoreCase),
            "containsIgnoreCase" => Ok(MatchMode::ContainsIgnoreCase),
            "contains" => Ok(MatchMode::Contains),
            "startsWithIgnoreCase" => Ok(MatchMode::StartsWithIgnoreCase),
            "endsWithIgnoreCase" => Ok(MatchMode::EndsWithIgnoreCase),
            "equals" => Ok(MatchMode::Equals),
            other => Err(format!("unknown match mode: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Matcher {
    #[serde(rename = "type")]
    pub kind: MatcherType,
    pub value: String,
    pub mode: MatchMode,
}

/// Kind of a single plan step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Action {
    Click,
    Input,
    SwipeLeft,
    SwipeRight,
    SwipeLeftOnNode,
    SwipeRightOnNode,
    ScrollDown,
    ScrollUp,
    #[serde(rename = "swipeLeft50Percent")]
    SwipeLeft50Percent,
    #[serde(rename = "swipeRight50Percent")]
    SwipeRight50Percent,
    PressBack,
    CloseSoftKeyboard,
    Sleep,
}

/// One step of an [`ActionPlan`].
///
/// `matchers` is empty whenever `node_query` encodes a structural
/// relationship (parent, child or descendant); the runner then resolves the
/// node from `node_query` alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionStep {
    pub action: Action,
    #[serde(default)]
    pub matchers: Vec<Matcher>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub millis: Option<u64>,
    #[serde(default)]
    pub node_query: Option<String>,
}

impl ActionStep {
    /// A step with no target and no payload.
    pub fn new(action: Action) -> Self {
        Self {
            action,
            matchers: Vec::new(),
            text: None,
            millis: None,
            node_query: None,
        }
    }

    pub fn sleep(millis: u64) -> Self {
        Self {
            millis: Some(millis),
            ..Self::new(Action::Sleep)
        }
    }
}

/// Ordered steps replaying one synthesized method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionPlan {
    pub method_name: String,
    pub steps: Vec<ActionStep>,
}

/// Plans of one app keyed by method name.
pub type ActionPlans = BTreeMap<String, ActionPlan>;

/// The persisted per-app document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppActionPlans {
    pub app_id: String,
    pub action_plans: ActionPlans,
}

impl AppActionPlans {
    pub fn new(app_id: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            action_plans: ActionPlans::new(),
        }
    }
}

/// Insert `plan` under its method name, returning the plan it displaced.
pub fn merge_plan(plans: &mut ActionPlans, plan: ActionPlan) -> Option<ActionPlan> {
    plans.insert(plan.method_name.clone(), plan)
}
