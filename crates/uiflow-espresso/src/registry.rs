//! Registry of test dialects.

use std::sync::{OnceLock, RwLock};

use crate::traits::{Dialect, Language};

static DIALECTS: RwLock<Vec<&'static dyn Dialect>> = RwLock::new(Vec::new());
static DIALECTS_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Register a custom dialect. Later registrations do not shadow earlier ones.
pub fn register_dialect(dialect: &'static dyn Dialect) {
    DIALECTS.write().unwrap().push(dialect);
}

fn init_dialects() {
    DIALECTS_INITIALIZED.get_or_init(|| {
        register_dialect(&crate::input::java::JAVA_DIALECT);
        register_dialect(&crate::input::kotlin::KOTLIN_DIALECT);
    });
}

pub fn dialect_for_language(language: Language) -> Option<&'static dyn Dialect> {
    init_dialects();
    DIALECTS
        .read()
        .unwrap()
        .iter()
        .find(|d| d.language() == language)
        .copied()
}

/// Get a dialect by file extension (without the dot).
pub fn dialect_for_extension(ext: &str) -> Option<&'static dyn Dialect> {
    init_dialects();
    DIALECTS
        .read()
        .unwrap()
        .iter()
        .find(|d| d.extensions().contains(&ext))
        .copied()
}

pub fn dialects() -> Vec<&'static dyn Dialect> {
    init_dialects();
    DIALECTS.read().unwrap().clone()
}
