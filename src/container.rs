//! The dependency-injection seam.
//!
//! The registry only needs one thing from a container: turn a class name into
//! an instance. [`Container`] is that contract and [`Service`] describes what a
//! resolved instance can do. [`ServiceContainer`] is a small binding table for
//! hosts without a container of their own.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use serde_json::Value;

use crate::{ContainerError, WidgetError, WidgetRegistry};

/// Resolves class names to instances.
pub trait Container: Send + Sync {
    /// Instantiates `class`.
    ///
    /// # Errors
    ///
    /// Any resolution failure is returned unchanged to the caller of the
    /// registry operation that needed the instance.
    fn make(&self, class: &str) -> Result<Arc<dyn Service>, ContainerError>;
}

/// An instance produced by a [`Container`].
///
/// Both methods default to [`WidgetError::UndefinedMethod`], so an
/// implementor only overrides the role it plays.
pub trait Service: Send + Sync {
    /// Name reported in errors.
    fn class_name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Invokes `method` as a widget with `args`.
    fn call(&self, method: &str, args: &[Value]) -> Result<Value, WidgetError> {
        let _ = args;
        Err(WidgetError::undefined_method(self.class_name(), method))
    }

    /// Invokes `method` as a subscriber, letting it register widgets.
    fn subscribe(&self, method: &str, widgets: &mut WidgetRegistry) -> Result<(), WidgetError> {
        let _ = widgets;
        Err(WidgetError::undefined_method(self.class_name(), method))
    }
}

/// Factory building a service, given the container for nested resolution.
pub type Factory =
    dyn Fn(&ServiceContainer) -> Result<Arc<dyn Service>, ContainerError> + Send + Sync;

#[derive(Clone)]
enum Binding {
    /// Built on every `make`.
    Transient(Arc<Factory>),
    /// Built on first `make`, shared afterwards.
    Singleton(Arc<Factory>),
    Instance(Arc<dyn Service>),
}

/// A binding table implementing [`Container`].
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use serde_json::{json, Value};
/// use widget_registry::{Container, Service, ServiceContainer, WidgetError};
///
/// struct Clock;
///
/// impl Service for Clock {
///     fn call(&self, method: &str, _args: &[Value]) -> Result<Value, WidgetError> {
///         match method {
///             "render" => Ok(json!("12:00")),
///             _ => Err(WidgetError::undefined_method("Clock", method)),
///         }
///     }
/// }
///
/// let container = ServiceContainer::new();
/// container.bind("Clock", |_| Ok(Arc::new(Clock)));
///
/// let clock = container.make("Clock").unwrap();
/// assert_eq!(clock.call("render", &[]).unwrap(), json!("12:00"));
/// assert!(container.make("Calendar").is_err());
/// ```
#[derive(Default)]
pub struct ServiceContainer {
    bindings: Mutex<HashMap<String, Binding>>,
}

impl ServiceContainer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `class` to a factory run on every resolution.
    pub fn bind(
        &self,
        class: impl Into<String>,
        factory: impl Fn(&ServiceContainer) -> Result<Arc<dyn Service>, ContainerError>
            + Send
            + Sync
            + 'static,
    ) {
        self.insert(class.into(), Binding::Transient(Arc::new(factory)));
    }

    /// Binds `class` to a factory run once; later resolutions share the instance.
    pub fn singleton(
        &self,
        class: impl Into<String>,
        factory: impl Fn(&ServiceContainer) -> Result<Arc<dyn Service>, ContainerError>
            + Send
            + Sync
            + 'static,
    ) {
        self.insert(class.into(), Binding::Singleton(Arc::new(factory)));
    }

    /// Binds `class` to an existing instance.
    pub fn instance(&self, class: impl Into<String>, service: Arc<dyn Service>) {
        self.insert(class.into(), Binding::Instance(service));
    }

    /// Checks whether anything is bound under `class`.
    pub fn bound(&self, class: &str) -> bool {
        self.bindings
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .contains_key(class)
    }

    fn insert(&self, class: String, binding: Binding) {
        tracing::debug!("binding class '{}'", class);
        self.bindings
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .insert(class, binding);
    }
}

impl Container for ServiceContainer {
    fn make(&self, class: &str) -> Result<Arc<dyn Service>, ContainerError> {
        // The lock is released before any factory runs so factories may resolve
        // their own dependencies through the same container.
        let binding = self
            .bindings
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .get(class)
            .cloned();

        tracing::trace!("resolving class '{}' (bound: {})", class, binding.is_some());

        match binding {
            None => Err(ContainerError::BindingNotFound {
                class: class.to_string(),
            }),
            Some(Binding::Instance(service)) => Ok(service),
            Some(Binding::Transient(factory)) => factory(self),
            Some(Binding::Singleton(factory)) => {
                let service = factory(self)?;
                let mut bindings = self.bindings.lock().unwrap_or_else(|p| p.into_inner());
                // Keep whichever instance got cached first.
                match bindings.get(class) {
                    Some(Binding::Instance(existing)) => Ok(existing.clone()),
                    _ => {
                        bindings.insert(class.to_string(), Binding::Instance(service.clone()));
                        Ok(service)
                    }
                }
            }
        }
    }
}
