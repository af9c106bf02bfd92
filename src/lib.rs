//! # Widget Registry
//!
//! A registry of named widgets for a templating layer. Widgets are callbacks
//! invoked by name, groups are ordered lists of widgets whose output is
//! concatenated, and every declared name becomes a template directive:
//! `@name(args)` in template source is rewritten into a call to the registry.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use serde_json::{json, Value};
//! use widget_registry::{DirectiveCompiler, ServiceContainer, WidgetRegistry};
//!
//! let compiler = Arc::new(DirectiveCompiler::new());
//! let mut widgets = WidgetRegistry::new(Arc::new(ServiceContainer::new()), compiler.clone());
//!
//! widgets.register_fn("greet", |args: &[Value]| {
//!     json!(format!("Hello, {}", args[0].as_str().unwrap_or_default()))
//! });
//!
//! assert_eq!(widgets.render("greet", &[json!("World")]).unwrap(), "Hello, World");
//! assert_eq!(
//!     compiler.compile("<p>@greet('World')</p>"),
//!     "<p><?php echo Widget::greet('World'); ?></p>"
//! );
//! ```
//!
//! ## Callback shapes
//!
//! - an inline closure ([`Callback::Inline`])
//! - the name of a free function defined with [`define_function`] ([`Callback::Function`])
//! - a `Class@method` reference resolved through a [`Container`] ([`Callback::Method`])
//!
//! ## Main Types
//!
//! - [`WidgetRegistry`] - register, group and invoke widgets
//! - [`Container`] / [`Service`] - the dependency-injection seam, with [`ServiceContainer`]
//! - [`TemplateCompiler`] / [`Directive`] - the directive seam, with [`DirectiveCompiler`]
//! - [`Declarations`] / [`boot`] - load a `widgets.toml` while booting

mod callback;
mod compiler;
mod container;
mod declarations;
mod functions;
mod group;
mod registry;
mod widget_error;
mod widget_event;

pub use callback::{
    parse_callback, render_value, Callback, WidgetFn, DEFAULT_SUBSCRIBER_METHOD,
    DEFAULT_WIDGET_METHOD,
};
pub use compiler::{Directive, DirectiveCompiler, TemplateCompiler, DEFAULT_FACADE};
pub use container::{Container, Factory, Service, ServiceContainer};
pub use declarations::{boot, boot_from_dir, Declarations, MemberDecl, DECLARATIONS_FILE};
pub use functions::{clear_functions, define_function, function_exists, get_function};
pub use group::{Group, GroupArgs, GroupKey, Member};
pub use registry::{TraceCallback, WidgetRegistry};
pub use widget_error::{ConfigError, ContainerError, WidgetError};
pub use widget_event::WidgetEvent;
