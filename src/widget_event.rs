/// Events emitted by a [`WidgetRegistry`](crate::WidgetRegistry) during operations.
///
/// These events are passed to the tracing callback set via `set_trace_callback`
/// and logged through `tracing` at `trace` level.
///
/// # Examples
///
/// ```rust
/// use widget_registry::WidgetEvent;
///
/// let event = WidgetEvent::Register { name: "greet".into() };
/// assert_eq!(event.to_string(), "register { name: greet }");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetEvent {
    /// A widget callback was stored.
    Register { name: String },

    /// A group was declared or merged.
    Group {
        name: String,
        /// Number of members after the operation
        members: usize,
    },

    /// A subscriber was resolved and run.
    Subscribe { class: String, method: String },

    /// A widget or group was requested with `get`/`call`.
    Call {
        name: String,
        /// Whether the name was a known widget or group
        found: bool,
    },

    /// A `has` check was performed.
    Has { name: String, found: bool },

    /// A `has_group` check was performed.
    HasGroup { name: String, found: bool },
}

impl std::fmt::Display for WidgetEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WidgetEvent::Register { name } => write!(f, "register {{ name: {name} }}"),
            WidgetEvent::Group { name, members } => {
                write!(f, "group {{ name: {name}, members: {members} }}")
            }
            WidgetEvent::Subscribe { class, method } => {
                write!(f, "subscribe {{ subscriber: {class}@{method} }}")
            }
            WidgetEvent::Call { name, found } => {
                write!(f, "call {{ name: {name}, found: {found} }}")
            }
            WidgetEvent::Has { name, found } => {
                write!(f, "has {{ name: {name}, found: {found} }}")
            }
            WidgetEvent::HasGroup { name, found } => {
                write!(f, "has_group {{ name: {name}, found: {found} }}")
            }
        }
    }
}
