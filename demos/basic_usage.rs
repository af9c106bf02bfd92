//! Basic usage example for widget-registry.
//!
//! Demonstrates:
//! - Registering widgets as closures, free functions and `Class@method` references
//! - Grouping widgets and rendering a group with per-member arguments
//! - Rewriting template source through the installed directives
//! - Handling unknown widgets and container errors
//!
//! Run with: `cargo run --example basic_usage`

use serde_json::{json, Value};
use std::sync::Arc;
use widget_registry::{
    define_function, DirectiveCompiler, GroupArgs, Service, ServiceContainer, WidgetError,
    WidgetRegistry,
};

struct Clock;

impl Service for Clock {
    fn call(&self, method: &str, args: &[Value]) -> Result<Value, WidgetError> {
        match method {
            "render" => Ok(json!(format!(
                "<time>{}</time>",
                args.first().and_then(Value::as_str).unwrap_or("12:00")
            ))),
            _ => Err(WidgetError::undefined_method("Clock", method)),
        }
    }
}

fn main() {
    println!("=== widget-registry: Basic Usage ===\n");

    let container = Arc::new(ServiceContainer::new());
    container.singleton("Clock", |_| Ok(Arc::new(Clock)));

    let compiler = Arc::new(DirectiveCompiler::new());
    let mut widgets = WidgetRegistry::new(container, compiler.clone());

    // -------------------------------------------------------------------------
    // 1. Register widgets of every shape
    // -------------------------------------------------------------------------
    println!("1. Registering widgets...");

    widgets.register_fn("greet", |args: &[Value]| {
        json!(format!(
            "Hello, {}",
            args.first().and_then(Value::as_str).unwrap_or("stranger")
        ))
    });

    define_function("year", |_: &[Value]| json!(2024));
    widgets.register("year", "year");

    widgets.register("clock", "Clock@render");

    println!("   Registered: {:?}", widgets.widget_names().collect::<Vec<_>>());

    // -------------------------------------------------------------------------
    // 2. Call widgets by name
    // -------------------------------------------------------------------------
    println!("\n2. Calling widgets...");

    println!("   greet  = {}", widgets.render("greet", &[json!("World")]).unwrap());
    println!("   year   = {}", widgets.render("year", &[]).unwrap());
    println!("   clock  = {}", widgets.render("clock", &[json!("09:30")]).unwrap());

    // -------------------------------------------------------------------------
    // 3. Group widgets
    // -------------------------------------------------------------------------
    println!("\n3. Rendering a group...");

    widgets.group("sidebar", ["greet", "clock"]);
    widgets.merge_group("sidebar", [("footer", "year")]);

    let args = GroupArgs::new().with(0usize, vec![json!("Ada")]);
    let sidebar = widgets.render("sidebar", &[]).unwrap();
    println!("   sidebar (no args)  = {}", sidebar);
    println!(
        "   sidebar (with args) = {:?}",
        widgets.call_group("sidebar", &args).unwrap()
    );

    // -------------------------------------------------------------------------
    // 4. Compile a template
    // -------------------------------------------------------------------------
    println!("\n4. Compiling a template...");

    let view = "<aside>\n    @sidebar([['Ada']])\n</aside>\n<footer>@year()</footer>";
    println!("{}", compiler.compile(view));

    // -------------------------------------------------------------------------
    // 5. Unknown names and failures
    // -------------------------------------------------------------------------
    println!("\n5. Handling unknown widgets and errors...");

    println!("   missing = {:?}", widgets.get("missing", &[]).unwrap());

    widgets.register("calendar", "Calendar@render");
    match widgets.get("calendar", &[]) {
        Ok(value) => println!("   calendar: {:?}", value),
        Err(e) => println!("   Error (expected): {}", e),
    }

    println!("\n=== Example Complete ===");
}
