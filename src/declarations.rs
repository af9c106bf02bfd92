//! Declarations file and bootstrap.
//!
//! Applications declare their widgets in a TOML file (`widgets.toml` by
//! convention) that is applied once while booting:
//!
//! ```toml
//! facade = "Widget"
//! subscribers = ["SidebarWidgets@subscribe"]
//!
//! [widgets]
//! greet = "greet"
//! clock = "Clock@render"
//!
//! [groups]
//! sidebar = ["greet", ["clock", 2]]
//! ```
//!
//! Inline closures cannot be declared in a file; register those in code.

use std::path::Path;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{
    compiler::DEFAULT_FACADE, ConfigError, Container, DirectiveCompiler, Member, WidgetRegistry,
};

/// File name looked up by [`boot_from_dir`].
pub const DECLARATIONS_FILE: &str = "widgets.toml";

/// Contents of a declarations file.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Declarations {
    /// Facade name written into rewritten templates
    #[serde(default = "default_facade")]
    pub facade: String,

    /// `Class@method` subscribers, run after widgets and groups
    #[serde(default)]
    pub subscribers: Vec<String>,

    /// Widget name to callback (`function` or `Class@method`)
    #[serde(default)]
    pub widgets: IndexMap<String, String>,

    #[serde(default)]
    pub groups: IndexMap<String, Vec<MemberDecl>>,
}

impl Default for Declarations {
    fn default() -> Self {
        Self {
            facade: default_facade(),
            subscribers: Vec::new(),
            widgets: IndexMap::new(),
            groups: IndexMap::new(),
        }
    }
}

fn default_facade() -> String {
    DEFAULT_FACADE.to_string()
}

/// A group member as written in the file: `"name"` or `["name", order]`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum MemberDecl {
    Name(String),
    Ordered(String, i64),
}

impl From<MemberDecl> for Member {
    fn from(decl: MemberDecl) -> Self {
        match decl {
            MemberDecl::Name(name) => Member::Name(name),
            MemberDecl::Ordered(name, order) => Member::Ordered { name, order },
        }
    }
}

impl Declarations {
    /// Parses declarations from TOML text.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Loads declarations from `path`.
    ///
    /// A missing file is not an error: it yields `Ok(None)`.
    pub fn load(path: impl AsRef<Path>) -> Result<Option<Self>, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!("no widget declarations at {}", path.display());
            return Ok(None);
        }

        let content = std::fs::read_to_string(path)?;
        let declarations = Self::parse(&content)?;
        tracing::info!(
            "loaded {} widgets and {} groups from {}",
            declarations.widgets.len(),
            declarations.groups.len(),
            path.display()
        );
        Ok(Some(declarations))
    }

    /// Registers widgets, then groups, then runs subscribers, each in file order.
    pub fn apply(&self, widgets: &mut WidgetRegistry) -> Result<(), ConfigError> {
        for (name, callback) in &self.widgets {
            widgets.register(name.as_str(), callback.as_str());
        }

        for (name, members) in &self.groups {
            widgets.group(name.as_str(), members.iter().cloned().map(Member::from));
        }

        for subscriber in &self.subscribers {
            widgets.subscribe(subscriber)?;
        }

        Ok(())
    }
}

/// Builds a registry for `container`, applying the declarations at `path`
/// when the file exists.
///
/// Returns the registry together with the compiler its directives were
/// installed into.
pub fn boot(
    container: Arc<dyn Container>,
    path: impl AsRef<Path>,
) -> Result<(WidgetRegistry, Arc<DirectiveCompiler>), ConfigError> {
    let declarations = Declarations::load(path)?;
    let facade = declarations
        .as_ref()
        .map(|d| d.facade.clone())
        .unwrap_or_else(default_facade);

    let compiler = Arc::new(DirectiveCompiler::with_facade(facade));
    let mut widgets = WidgetRegistry::new(container, compiler.clone());

    if let Some(declarations) = declarations {
        declarations.apply(&mut widgets)?;
    }

    Ok((widgets, compiler))
}

/// [`boot`] with `widgets.toml` inside `dir`.
pub fn boot_from_dir(
    container: Arc<dyn Container>,
    dir: impl AsRef<Path>,
) -> Result<(WidgetRegistry, Arc<DirectiveCompiler>), ConfigError> {
    boot(container, dir.as_ref().join(DECLARATIONS_FILE))
}
