//! Closed vocabularies of the supported Espresso subset.

/// Tokens that open a UI interaction statement.
pub const ENTRY_TOKENS: &[&str] = &["onView(", "onData(", "onWebView("];

/// View matchers a statement may use.
pub const SUPPORTED_MATCHERS: &[&str] = &[
    "onView",
    "allOf",
    "withId",
    "withText",
    "withContentDescription",
    "withClassName",
    "withParent",
    "withParentIndex",
    "hasDescendant",
    "isRoot",
    "containsStringIgnoringCase",
];

/// Matchers accepted but removed during rewriting when called without arguments.
pub const IGNORABLE_MATCHERS: &[&str] = &[
    "isDisplayed",
    "isNotChecked",
    "isChecked",
    "isEnabled",
    "isNotEnabled",
    "containsString",
];

/// String helpers nested inside view matchers, with the match mode each
/// one stands for.
pub const STRING_HELPER_MODES: &[(&str, &str)] = &[
    ("equalsIgnoreCase", "equalsIgnoreCase"),
    ("equals", "equals"),
    ("containsIgnoreCase", "containsIgnoreCase"),
    ("containsStringIgnoringCase", "containsIgnoreCase"),
    ("contains", "contains"),
    ("startsWithIgnoreCase", "startsWithIgnoreCase"),
    ("endsWithIgnoreCase", "endsWithIgnoreCase"),
];

/// View actions a statement may perform.
pub const SUPPORTED_ACTIONS: &[&str] = &[
    "click",
    "swipeLeft",
    "swipeRight",
    "replaceText",
    "typeText",
    "longClick",
    "scrollTo",
];

/// Non-interactive helper lines copied into synthesized methods as-is.
pub const HELPER_STATEMENTS: &[&str] = &[
    "closeSoftKeyboard();",
    "closeSoftKeyboard()",
    "pressBack();",
    "pressBack()",
];

/// Qualifiers removed from matcher and action calls.
pub const NAMESPACE_PREFIXES: &[&str] = &[
    "ViewMatchers.",
    "ViewActions.",
    "CoreMatchers.",
    "Matchers.",
    "Espresso.",
];

/// Substrings marking a line as an assertion.
pub const ASSERTION_MARKERS: &[&str] = &["check(", "matches("];

/// The four view matchers that carry a comparable string value.
pub const VALUE_MATCHERS: &[&str] = &["withId", "withText", "withContentDescription", "withClassName"];

pub fn is_entry_line(line: &str) -> bool {
    ENTRY_TOKENS.iter().any(|t| line.contains(t))
}

pub fn is_supported_matcher(name: &str) -> bool {
    SUPPORTED_MATCHERS.contains(&name) || IGNORABLE_MATCHERS.contains(&name)
}

pub fn is_ignorable_matcher(name: &str) -> bool {
    IGNORABLE_MATCHERS.contains(&name)
}

pub fn is_string_helper(name: &str) -> bool {
    helper_mode(name).is_some()
}

pub fn is_supported_action(name: &str) -> bool {
    SUPPORTED_ACTIONS.contains(&name)
}

/// Match-mode name a string helper normalizes to.
pub fn helper_mode(name: &str) -> Option<&'static str> {
    STRING_HELPER_MODES
        .iter()
        .find(|(helper, _)| *helper == name)
        .map(|(_, mode)| *mode)
}

pub fn is_assertion_line(line: &str) -> bool {
    ASSERTION_MARKERS.iter().any(|m| line.contains(m))
}

/// Drop a known namespace qualifier, including fully qualified forms such as
/// `androidx.test.espresso.matcher.ViewMatchers.withId`.
pub fn strip_namespace(name: &str) -> &str {
    let Some(dot) = name.rfind('.') else {
        return name;
    };
    let (qualifier, rest) = name.split_at(dot + 1);
    if NAMESPACE_PREFIXES.iter().any(|p| {
        qualifier == *p || qualifier.ends_with(&format!(".{p}"))
    }) {
        rest
    } else {
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_helper_mode_aliases() {
        assert_eq!(helper_mode("containsStringIgnoringCase"), Some("containsIgnoreCase"));
        assert_eq!(helper_mode("equals"), Some("equals"));
        assert_eq!(helper_mode("withText"), None);
    }

    #[test]
    fn test_strip_namespace() {
        assert_eq!(strip_namespace("ViewMatchers.withId"), "withId");
        assert_eq!(strip_namespace("Matchers.allOf"), "allOf");
        assert_eq!(
            strip_namespace("androidx.test.espresso.action.ViewActions.click"),
            "click"
        );
        assert_eq!(strip_namespace("Thread.sleep"), "Thread.sleep");
        assert_eq!(strip_namespace("MyMatchers.withId"), "MyMatchers.withId");
        assert_eq!(strip_namespace("withText"), "withText");
    }

    #[test]
    fn test_containment() {
        assert!(is_supported_matcher("isDisplayed"));
        assert!(!is_supported_matcher("withHint"));
        assert!(is_supported_action("scrollTo"));
        assert!(!is_supported_action("doubleClick"));
        assert!(is_entry_line("    onData(anything()).perform(click());"));
    }
}
