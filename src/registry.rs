//! The widget registry.
//!
//! Widgets are named callbacks, groups are ordered lists of widget names. Both
//! are invoked by name and both install a template directive under their name
//! when declared.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use serde_json::{json, Value};
//! use widget_registry::{DirectiveCompiler, GroupArgs, ServiceContainer, WidgetRegistry};
//!
//! let compiler = Arc::new(DirectiveCompiler::new());
//! let mut widgets = WidgetRegistry::new(Arc::new(ServiceContainer::new()), compiler.clone());
//!
//! widgets.register_fn("greet", |args: &[Value]| {
//!     json!(format!("Hello, {}", args[0].as_str().unwrap_or_default()))
//! });
//! assert_eq!(widgets.get("greet", &[json!("World")]).unwrap(), Some(json!("Hello, World")));
//!
//! widgets.group("sidebar", ["greet", "greet"]);
//! let args = GroupArgs::new().with(0usize, vec![json!("A")]).with(1usize, vec![json!("B")]);
//! assert_eq!(widgets.call_group("sidebar", &args).unwrap(), Some(json!("Hello, AHello, B")));
//!
//! assert_eq!(compiler.compile("@greet('x')"), "<?php echo Widget::greet('x'); ?>");
//! ```

use std::{fmt, sync::Arc};

use indexmap::IndexMap;
use serde_json::Value;

use crate::{
    callback::{
        parse_callback, render_value, Callback, DEFAULT_SUBSCRIBER_METHOD, DEFAULT_WIDGET_METHOD,
    },
    functions, Container, Directive, Group, GroupArgs, GroupKey, Member, TemplateCompiler,
    WidgetError, WidgetEvent,
};

/// Type alias for the user-supplied tracing callback.
///
/// The callback receives every [`WidgetEvent`] the registry emits.
pub type TraceCallback = dyn Fn(&WidgetEvent) + Send + Sync + 'static;

/// Stores widgets and groups and invokes them by name.
///
/// The registry is built once during bootstrap and handed to whatever renders
/// templates. Registration takes `&mut self`; lookups and calls take `&self`.
pub struct WidgetRegistry {
    widgets: IndexMap<String, Callback>,
    groups: IndexMap<String, Group>,
    container: Arc<dyn Container>,
    compiler: Arc<dyn TemplateCompiler>,
    trace: Option<Arc<TraceCallback>>,
}

impl WidgetRegistry {
    /// Creates an empty registry resolving classes through `container` and
    /// installing directives into `compiler`.
    pub fn new(container: Arc<dyn Container>, compiler: Arc<dyn TemplateCompiler>) -> Self {
        Self {
            widgets: IndexMap::new(),
            groups: IndexMap::new(),
            container,
            compiler,
            trace: None,
        }
    }

    // ---------------------------------------------------------------------------------------------
    // Tracing
    // ---------------------------------------------------------------------------------------------

    /// Sets a callback invoked with every event this registry emits.
    pub fn set_trace_callback(&mut self, callback: impl Fn(&WidgetEvent) + Send + Sync + 'static) {
        self.trace = Some(Arc::new(callback));
    }

    /// Clears the tracing callback (disables event delivery).
    pub fn clear_trace_callback(&mut self) {
        self.trace = None;
    }

    fn emit_event(&self, event: WidgetEvent) {
        tracing::trace!("{}", event);
        if let Some(callback) = self.trace.as_ref() {
            callback(&event);
        }
    }

    // ---------------------------------------------------------------------------------------------
    // Registration
    // ---------------------------------------------------------------------------------------------

    /// Stores `callback` under `name` and installs the `@name(...)` directive.
    ///
    /// Registering an existing name replaces its callback.
    pub fn register(&mut self, name: impl Into<String>, callback: impl Into<Callback>) {
        let name = name.into();
        let callback = callback.into();
        tracing::debug!("registering widget '{}' as {:?}", name, callback);

        self.install_directive(&name);
        self.widgets.insert(name.clone(), callback);
        self.emit_event(WidgetEvent::Register { name });
    }

    /// Registers a closure as a widget.
    pub fn register_fn(
        &mut self,
        name: impl Into<String>,
        function: impl Fn(&[Value]) -> Value + Send + Sync + 'static,
    ) {
        self.register(name, Callback::inline(function));
    }

    /// Resolves `Class@method` (method defaults to `subscribe`) through the
    /// container and lets the instance register widgets on this registry.
    ///
    /// # Errors
    ///
    /// Container failures propagate; an instance without the method yields
    /// [`WidgetError::UndefinedMethod`].
    pub fn subscribe(&mut self, subscriber: &str) -> Result<(), WidgetError> {
        let (class, method) = parse_callback(subscriber, DEFAULT_SUBSCRIBER_METHOD);
        let instance = self.container.make(class)?;

        self.emit_event(WidgetEvent::Subscribe {
            class: class.to_string(),
            method: method.to_string(),
        });

        instance.subscribe(method, self)
    }

    /// Replaces the members of group `name` and installs its directive.
    pub fn group<M: Into<Member>>(
        &mut self,
        name: impl Into<String>,
        members: impl IntoIterator<Item = M>,
    ) {
        let name = name.into();
        self.store_group(name, Group::from_members(members));
    }

    /// Overlays `members` onto group `name` by key, starting from an empty
    /// group when it does not exist yet.
    ///
    /// Index keys overwrite the member at that position, other keys are set
    /// or appended.
    pub fn merge_group<K, M>(
        &mut self,
        name: impl Into<String>,
        members: impl IntoIterator<Item = (K, M)>,
    ) where
        K: Into<GroupKey>,
        M: Into<Member>,
    {
        let name = name.into();
        let mut group = self.groups.get(&name).cloned().unwrap_or_default();
        group.merge(
            members
                .into_iter()
                .map(|(key, member)| (key.into(), member.into())),
        );
        self.store_group(name, group);
    }

    fn store_group(&mut self, name: String, group: Group) {
        tracing::debug!("declaring group '{}' with {} members", name, group.len());

        let members = group.len();
        self.install_directive(&name);
        self.groups.insert(name.clone(), group);
        self.emit_event(WidgetEvent::Group { name, members });
    }

    fn install_directive(&self, name: &str) {
        let directive = Directive::widget(name, self.compiler.facade());
        self.compiler.extend(name, directive);
    }

    // ---------------------------------------------------------------------------------------------
    // Lookup
    // ---------------------------------------------------------------------------------------------

    /// Checks whether a widget is registered under `name`.
    pub fn has(&self, name: &str) -> bool {
        let found = self.widgets.contains_key(name);
        self.emit_event(WidgetEvent::Has {
            name: name.to_string(),
            found,
        });
        found
    }

    /// Checks whether a group is declared under `name`.
    pub fn has_group(&self, name: &str) -> bool {
        let found = self.groups.contains_key(name);
        self.emit_event(WidgetEvent::HasGroup {
            name: name.to_string(),
            found,
        });
        found
    }

    /// Returns the members of group `name`.
    pub fn get_group(&self, name: &str) -> Option<&Group> {
        self.groups.get(name)
    }

    /// Returns the members of group `name` as an iterator, in order.
    pub fn collect_group(&self, name: &str) -> Option<impl Iterator<Item = &Member> + '_> {
        self.groups.get(name).map(Group::members)
    }

    /// Names of the registered widgets, in registration order.
    pub fn widget_names(&self) -> impl Iterator<Item = &str> {
        self.widgets.keys().map(String::as_str)
    }

    /// Names of the declared groups, in declaration order.
    pub fn group_names(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    /// Container used to resolve `Class@method` callbacks and subscribers.
    pub fn container(&self) -> &Arc<dyn Container> {
        &self.container
    }

    /// Compiler receiving a directive for every declared name.
    pub fn compiler(&self) -> &Arc<dyn TemplateCompiler> {
        &self.compiler
    }

    // ---------------------------------------------------------------------------------------------
    // Invocation
    // ---------------------------------------------------------------------------------------------

    /// Invokes the widget or group `name`.
    ///
    /// Groups take precedence over widgets of the same name. For a group,
    /// `params[i]` holds the arguments of member `i` (see
    /// [`GroupArgs::from_positional`]).
    ///
    /// Returns `Ok(None)` when nothing is registered under `name`.
    ///
    /// # Errors
    ///
    /// Errors only come from resolving `Class@method` callbacks: container
    /// failures and undefined methods.
    pub fn get(&self, name: &str, params: &[Value]) -> Result<Option<Value>, WidgetError> {
        self.get_expanding(name, params, &mut Vec::new())
    }

    /// `get` with the stack of groups currently being rendered.
    fn get_expanding(
        &self,
        name: &str,
        params: &[Value],
        expanding: &mut Vec<String>,
    ) -> Result<Option<Value>, WidgetError> {
        if self.groups.contains_key(name) {
            self.emit_event(WidgetEvent::Call {
                name: name.to_string(),
                found: true,
            });
            let args = GroupArgs::from_positional(params);
            return self.call_group_expanding(name, &args, expanding);
        }

        let callback = self.widgets.get(name);
        self.emit_event(WidgetEvent::Call {
            name: name.to_string(),
            found: callback.is_some(),
        });

        match callback {
            Some(callback) => self.invoke(callback, params).map(Some),
            None => Ok(None),
        }
    }

    /// Alias of [`get`](Self::get).
    pub fn call(&self, name: &str, params: &[Value]) -> Result<Option<Value>, WidgetError> {
        self.get(name, params)
    }

    /// Invokes `name` and converts the result to page text. Unknown names
    /// render as an empty string.
    pub fn render(&self, name: &str, params: &[Value]) -> Result<String, WidgetError> {
        Ok(self
            .get(name, params)?
            .map(|value| render_value(&value))
            .unwrap_or_default())
    }

    /// Renders every member of group `name` in order and concatenates the output.
    ///
    /// Each member receives the arguments stored under its key in `args`, or
    /// none. Returns `Ok(None)` for an unknown group.
    ///
    /// A member naming a group that is already being rendered (the group
    /// itself, or one that led to it) renders as nothing, like an unknown
    /// member.
    pub fn call_group(&self, name: &str, args: &GroupArgs) -> Result<Option<Value>, WidgetError> {
        self.call_group_expanding(name, args, &mut Vec::new())
    }

    fn call_group_expanding(
        &self,
        name: &str,
        args: &GroupArgs,
        expanding: &mut Vec<String>,
    ) -> Result<Option<Value>, WidgetError> {
        let Some(group) = self.groups.get(name) else {
            return Ok(None);
        };

        expanding.push(name.to_string());
        let output = self.render_members(name, group, args, expanding);
        expanding.pop();

        output.map(|output| Some(Value::String(output)))
    }

    fn render_members(
        &self,
        name: &str,
        group: &Group,
        args: &GroupArgs,
        expanding: &mut Vec<String>,
    ) -> Result<String, WidgetError> {
        let mut output = String::new();
        for (key, member) in group.iter() {
            if expanding.iter().any(|open| open == member.name()) {
                tracing::warn!(
                    "group '{}' member {} refers back to group '{}' ({})",
                    name,
                    key,
                    member.name(),
                    expanding.join(" -> ")
                );
                continue;
            }

            match self.get_expanding(member.name(), args.get(key), expanding)? {
                Some(value) => output.push_str(&render_value(&value)),
                None => tracing::warn!(
                    "group '{}' member {} refers to unknown widget '{}'",
                    name,
                    key,
                    member.name()
                ),
            }
        }

        Ok(output)
    }

    fn invoke(&self, callback: &Callback, params: &[Value]) -> Result<Value, WidgetError> {
        match callback {
            Callback::Inline(function) => Ok(function(params)),
            Callback::Function(name) => match functions::get_function(name) {
                Some(function) => Ok(function(params)),
                None => self.invoke_method(name, DEFAULT_WIDGET_METHOD, params),
            },
            Callback::Method { class, method } => self.invoke_method(class, method, params),
        }
    }

    fn invoke_method(
        &self,
        class: &str,
        method: &str,
        params: &[Value],
    ) -> Result<Value, WidgetError> {
        let instance = self.container.make(class)?;
        instance.call(method, params)
    }
}

impl fmt::Debug for WidgetRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WidgetRegistry")
            .field("widgets", &self.widgets)
            .field("groups", &self.groups)
            .field("facade", &self.compiler.facade())
            .finish_non_exhaustive()
    }
}

// -------------------------------------------------------------------------------------------------
// Tests
// -------------------------------------------------------------------------------------------------
