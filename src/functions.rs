//! Process-wide table of named free functions.
//!
//! A [`Callback::Function`](crate::Callback::Function) names an entry in this
//! table. Functions are defined once during bootstrap and read many times, the
//! same way free functions exist for the whole life of the process.
//!
//! # Examples
//!
//! ```
//! use serde_json::{json, Value};
//! use widget_registry::{define_function, function_exists, get_function};
//!
//! define_function("shout", |args: &[Value]| {
//!     json!(args[0].as_str().unwrap_or_default().to_uppercase())
//! });
//!
//! assert!(function_exists("shout"));
//! let shout = get_function("shout").unwrap();
//! assert_eq!(shout(&[json!("hi")]), json!("HI"));
//! ```

use std::{
    collections::HashMap,
    sync::{Arc, LazyLock, Mutex},
};

use serde_json::Value;

use crate::callback::WidgetFn;

/// Global table mapping function names to their implementation.
static FUNCTIONS: LazyLock<Mutex<HashMap<String, Arc<WidgetFn>>>> =
    LazyLock::new(|| Mutex::new(HashMap::new()));

/// Defines (or redefines) a named free function.
///
/// # Lock Poisoning Recovery
///
/// The table is written during bootstrap and read afterwards, so a poisoned
/// lock is recovered and the insert goes ahead.
pub fn define_function(
    name: impl Into<String>,
    function: impl Fn(&[Value]) -> Value + Send + Sync + 'static,
) {
    let name = name.into();
    tracing::debug!("defining function '{}'", name);

    FUNCTIONS
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .insert(name, Arc::new(function));
}

/// Checks whether a function with this name has been defined.
pub fn function_exists(name: &str) -> bool {
    FUNCTIONS
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .contains_key(name)
}

/// Returns the function defined under `name`, if any.
///
/// The lock is released before the function is returned, so calling it may
/// define further functions.
pub fn get_function(name: &str) -> Option<Arc<WidgetFn>> {
    FUNCTIONS
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .get(name)
        .cloned()
}

#[doc(hidden)]
pub fn clear_functions() {
    FUNCTIONS
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .clear();
}
