//! Widget callbacks.
//!
//! A widget is backed by one of three callback shapes: an inline closure, the
//! name of a free function, or a `Class@method` reference resolved through the
//! container when the widget is invoked.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

/// Signature shared by inline widget closures and free functions.
pub type WidgetFn = dyn Fn(&[Value]) -> Value + Send + Sync;

/// Method used when a class reference used as a widget names no method.
pub const DEFAULT_WIDGET_METHOD: &str = "register";

/// Method used when a subscriber reference names no method.
pub const DEFAULT_SUBSCRIBER_METHOD: &str = "subscribe";

/// The callable stored for a widget.
///
/// Strings convert with [`From`]: a string containing `@` becomes a
/// [`Callback::Method`], anything else a [`Callback::Function`].
///
/// ```
/// use widget_registry::Callback;
///
/// assert_eq!(
///     Callback::from("Clock@render"),
///     Callback::Method { class: "Clock".into(), method: "render".into() }
/// );
/// assert_eq!(Callback::from("greet"), Callback::Function("greet".into()));
/// ```
#[derive(Clone)]
pub enum Callback {
    Inline(Arc<WidgetFn>),
    /// Name of a function in the process-wide function table. When no such
    /// function exists the name is treated as a class with the default method.
    Function(String),
    Method { class: String, method: String },
}

impl Callback {
    /// Wraps a closure as an inline callback.
    pub fn inline(function: impl Fn(&[Value]) -> Value + Send + Sync + 'static) -> Self {
        Callback::Inline(Arc::new(function))
    }

    /// Builds a class reference from `Class@method`, falling back to `default_method`.
    pub fn method(reference: &str, default_method: &str) -> Self {
        let (class, method) = parse_callback(reference, default_method);
        Callback::Method {
            class: class.to_string(),
            method: method.to_string(),
        }
    }
}

impl From<&str> for Callback {
    fn from(reference: &str) -> Self {
        if reference.contains('@') {
            Callback::method(reference, DEFAULT_WIDGET_METHOD)
        } else {
            Callback::Function(reference.to_string())
        }
    }
}

impl From<String> for Callback {
    fn from(reference: String) -> Self {
        Callback::from(reference.as_str())
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Callback::Inline(_) => f.write_str("Inline(<closure>)"),
            Callback::Function(name) => f.debug_tuple("Function").field(name).finish(),
            Callback::Method { class, method } => f
                .debug_struct("Method")
                .field("class", class)
                .field("method", method)
                .finish(),
        }
    }
}

impl PartialEq for Callback {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Callback::Inline(a), Callback::Inline(b)) => Arc::ptr_eq(a, b),
            (Callback::Function(a), Callback::Function(b)) => a == b,
            (
                Callback::Method { class, method },
                Callback::Method {
                    class: other_class,
                    method: other_method,
                },
            ) => class == other_class && method == other_method,
            _ => false,
        }
    }
}

/// Splits `Class@method` at the first `@`.
///
/// Without an `@` the whole string is the class and `default_method` is used.
pub fn parse_callback<'a>(reference: &'a str, default_method: &'a str) -> (&'a str, &'a str) {
    reference.split_once('@').unwrap_or((reference, default_method))
}

/// Converts a widget result to the text written into the page.
///
/// Null and `false` render as nothing, `true` as `1`, strings verbatim.
/// Floats with no fractional part drop the fraction (`1.0` renders as `1`).
/// Arrays and objects render as compact JSON.
pub fn render_value(value: &Value) -> String {
    match value {
        Value::Null | Value::Bool(false) => String::new(),
        Value::Bool(true) => "1".to_string(),
        Value::Number(number) => match number.as_f64() {
            Some(float) if number.is_f64() => float.to_string(),
            _ => number.to_string(),
        },
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
