//! Integration tests for the three callback shapes.
//!
//! A closure, a free function name and a `Class@method` reference holding the
//! same logic must render the same output.
//!
//! NOTE: Tests defining free functions use #[serial] because the function table
//! is shared by the whole process.

use serde_json::{json, Value};
use serial_test::serial;
use std::sync::Arc;
use widget_registry::{
    define_function, Callback, ContainerError, DirectiveCompiler, Service, ServiceContainer,
    WidgetError, WidgetRegistry,
};

fn greet(args: &[Value]) -> Value {
    json!(format!("Hello, {}", args[0].as_str().unwrap_or_default()))
}

struct Greeter;

impl Service for Greeter {
    fn class_name(&self) -> &str {
        "Greeter"
    }

    fn call(&self, method: &str, args: &[Value]) -> Result<Value, WidgetError> {
        match method {
            "greet" | "register" => Ok(greet(args)),
            _ => Err(WidgetError::undefined_method(self.class_name(), method)),
        }
    }
}

fn setup() -> WidgetRegistry {
    let container = Arc::new(ServiceContainer::new());
    container.bind("Greeter", |_| Ok(Arc::new(Greeter)));
    WidgetRegistry::new(container, Arc::new(DirectiveCompiler::new()))
}

#[test]
#[serial]
fn test_all_shapes_render_the_same() {
    define_function("shape_greet", greet);

    let mut widgets = setup();
    widgets.register_fn("closure", greet);
    widgets.register("function", "shape_greet");
    widgets.register("method", "Greeter@greet");

    let args = [json!("World")];
    for name in ["closure", "function", "method"] {
        assert_eq!(
            widgets.get(name, &args).unwrap(),
            Some(json!("Hello, World")),
            "shape '{}'",
            name
        );
    }
}

#[test]
fn test_class_without_method_uses_register() {
    let mut widgets = setup();
    widgets.register("default", Callback::method("Greeter", "register"));
    widgets.register("bare", "Greeter");

    assert_eq!(widgets.render("default", &[json!("A")]).unwrap(), "Hello, A");
    assert_eq!(widgets.render("bare", &[json!("B")]).unwrap(), "Hello, B");
}

#[test]
#[serial]
fn test_function_defined_after_registration() {
    let mut widgets = setup();
    widgets.register("late", "late_bound_widget");

    define_function("late_bound_widget", |_: &[Value]| json!("bound late"));

    assert_eq!(widgets.render("late", &[]).unwrap(), "bound late");
}

#[test]
fn test_missing_function_and_class_is_container_error() {
    let mut widgets = setup();
    widgets.register("ghost", "no_such_function_or_class");

    let err = widgets.get("ghost", &[]).unwrap_err();
    assert_eq!(
        err,
        WidgetError::Container(ContainerError::BindingNotFound {
            class: "no_such_function_or_class".into()
        })
    );
}

#[test]
fn test_closure_captures_state() {
    let mut widgets = setup();
    let site = String::from("example.org");
    widgets.register_fn("footer", move |_: &[Value]| json!(format!("© {}", site)));

    assert_eq!(widgets.render("footer", &[]).unwrap(), "© example.org");
}

#[test]
fn test_non_string_results_render_as_text() {
    let mut widgets = setup();
    widgets.register_fn("count", |args: &[Value]| json!(args.len()));
    widgets.register_fn("flag", |_: &[Value]| json!(true));
    widgets.register_fn("nothing", |_: &[Value]| Value::Null);

    assert_eq!(widgets.render("count", &[json!(1), json!(2)]).unwrap(), "2");
    assert_eq!(widgets.render("flag", &[]).unwrap(), "1");
    assert_eq!(widgets.render("nothing", &[]).unwrap(), "");
}

#[test]
fn test_factory_error_propagates_through_get() {
    let container = Arc::new(ServiceContainer::new());
    container.bind("Broken", |_| {
        Err(ContainerError::Resolution {
            class: "Broken".into(),
            reason: "constructor failed".into(),
        })
    });
    let mut widgets = WidgetRegistry::new(container, Arc::new(DirectiveCompiler::new()));
    widgets.register("broken", "Broken@render");

    let err = widgets.render("broken", &[]).unwrap_err();
    assert_eq!(
        err.to_string(),
        "failed to resolve class 'Broken': constructor failed"
    );
}
