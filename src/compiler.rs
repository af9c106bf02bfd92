//! Template directives.
//!
//! Every widget and group name gets a directive: template source containing
//! `@name(args)` is rewritten into an echo of the registry call before the host
//! compiles the template. [`TemplateCompiler`] is the seam the registry installs
//! directives through; [`DirectiveCompiler`] is a keyed, ordered preprocessing
//! stage implementing it.

use std::sync::Mutex;

use indexmap::IndexMap;
use regex::Regex;

/// Facade name used in rewritten templates unless configured otherwise.
pub const DEFAULT_FACADE: &str = "Widget";

/// Accepts directives from the registry.
pub trait TemplateCompiler: Send + Sync {
    /// Installs `directive` under `name`, replacing any directive already
    /// installed under that name.
    fn extend(&self, name: &str, directive: Directive);

    /// Facade the rewritten templates call the registry through.
    fn facade(&self) -> &str {
        DEFAULT_FACADE
    }
}

/// A single pattern/rewrite rule.
#[derive(Debug, Clone)]
pub struct Directive {
    pattern: Regex,
    replacement: String,
}

impl Directive {
    /// Builds the rule for `@name(args)`.
    ///
    /// The match must not follow a word character. Whitespace before the
    /// directive is kept, and everything from the opening parenthesis to the
    /// last closing parenthesis on the line becomes the call arguments.
    ///
    /// ```
    /// use widget_registry::Directive;
    ///
    /// let directive = Directive::widget("greet", "Widget");
    /// assert_eq!(
    ///     directive.apply("  @greet('World')"),
    ///     "  <?php echo Widget::greet('World'); ?>"
    /// );
    /// assert_eq!(directive.apply("mail@greet(x)"), "mail@greet(x)");
    /// ```
    ///
    /// # Panics
    ///
    /// The name is escaped with `regex::escape`, so the pattern is always
    /// well-formed. Compilation can only fail when the compiled program
    /// exceeds the `regex` size limit (10 MiB), which takes a name hundreds of
    /// kilobytes long.
    pub fn widget(name: &str, facade: &str) -> Self {
        // No look-behind in `regex`: the preceding non-word character (or the
        // start of input) is captured and written back instead.
        let pattern = format!(
            r"(^|[^0-9A-Za-z_])(\s*)@{}(\s*\(.*\))",
            regex::escape(name)
        );
        let pattern = Regex::new(&pattern).expect("escaped directive pattern is valid");

        // `$` is a group reference in the replacement; `$$` is a literal one.
        let (facade, name) = (facade.replace('$', "$$"), name.replace('$', "$$"));

        Self {
            pattern,
            replacement: format!("${{1}}${{2}}<?php echo {facade}::{name}${{3}}; ?>"),
        }
    }

    /// Rewrites every occurrence in `source`.
    pub fn apply(&self, source: &str) -> String {
        self.pattern
            .replace_all(source, self.replacement.as_str())
            .into_owned()
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }
}

/// Ordered set of directives keyed by name.
///
/// Re-installing a name replaces its rule in place, so the rule list never
/// grows past the number of distinct names.
#[derive(Debug)]
pub struct DirectiveCompiler {
    facade: String,
    directives: Mutex<IndexMap<String, Directive>>,
}

impl Default for DirectiveCompiler {
    fn default() -> Self {
        Self::with_facade(DEFAULT_FACADE)
    }
}

impl DirectiveCompiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_facade(facade: impl Into<String>) -> Self {
        Self {
            facade: facade.into(),
            directives: Mutex::new(IndexMap::new()),
        }
    }

    /// Applies every directive, in installation order, to `source`.
    pub fn compile(&self, source: &str) -> String {
        let directives = self.directives.lock().unwrap_or_else(|p| p.into_inner());
        directives
            .values()
            .fold(source.to_string(), |view, directive| directive.apply(&view))
    }

    /// Names of the installed directives, in installation order.
    pub fn directives(&self) -> Vec<String> {
        self.directives
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .keys()
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.directives
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TemplateCompiler for DirectiveCompiler {
    fn extend(&self, name: &str, directive: Directive) {
        let mut directives = self.directives.lock().unwrap_or_else(|p| p.into_inner());
        let replaced = directives.insert(name.to_string(), directive).is_some();
        tracing::debug!("directive '@{}' installed (replaced: {})", name, replaced);
    }

    fn facade(&self) -> &str {
        &self.facade
    }
}
