//! Integration tests for booting a registry from a declarations file.
//!
//! NOTE: Tests defining free functions use #[serial] because the function table
//! is shared by the whole process.

use serde_json::{json, Value};
use serial_test::serial;
use std::fs;
use std::sync::Arc;
use widget_registry::{
    boot, boot_from_dir, define_function, ConfigError, Declarations, GroupArgs, Member, Service,
    ServiceContainer, WidgetError, WidgetRegistry, DECLARATIONS_FILE,
};

struct Clock;

impl Service for Clock {
    fn call(&self, method: &str, _args: &[Value]) -> Result<Value, WidgetError> {
        match method {
            "render" => Ok(json!("12:00")),
            _ => Err(WidgetError::undefined_method("Clock", method)),
        }
    }
}

struct Footer;

impl Service for Footer {
    fn subscribe(&self, method: &str, widgets: &mut WidgetRegistry) -> Result<(), WidgetError> {
        match method {
            "subscribe" => {
                widgets.register_fn("copyright", |_: &[Value]| json!("(c)"));
                widgets.merge_group("sidebar", [("footer", "copyright")]);
                Ok(())
            }
            _ => Err(WidgetError::undefined_method("Footer", method)),
        }
    }
}

fn container() -> Arc<ServiceContainer> {
    let container = Arc::new(ServiceContainer::new());
    container.instance("Clock", Arc::new(Clock));
    container.instance("Footer", Arc::new(Footer));
    container
}

const DECLARATIONS: &str = r#"
facade = "Widgets"
subscribers = ["Footer"]

[widgets]
greet = "declared_greet"
clock = "Clock@render"

[groups]
sidebar = ["greet", ["clock", 2]]
"#;

#[test]
#[serial]
fn test_boot_applies_declarations() {
    define_function("declared_greet", |args: &[Value]| {
        json!(format!("Hello, {}", args[0].as_str().unwrap_or_default()))
    });

    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join(DECLARATIONS_FILE), DECLARATIONS).unwrap();

    let (widgets, compiler) = boot_from_dir(container(), dir.path()).unwrap();

    assert!(widgets.has("greet"));
    assert!(widgets.has("clock"));
    assert!(widgets.has("copyright"));

    let group = widgets.get_group("sidebar").unwrap();
    assert_eq!(group.len(), 3);
    assert_eq!(group.get(&1usize.into()), Some(&Member::from(("clock", 2))));

    let args = GroupArgs::new().with(0usize, vec![json!("Ada")]);
    assert_eq!(
        widgets.call_group("sidebar", &args).unwrap(),
        Some(json!("Hello, Ada12:00(c)"))
    );

    assert_eq!(
        compiler.compile("@clock()"),
        "<?php echo Widgets::clock(); ?>"
    );
    assert_eq!(compiler.directives(), vec!["greet", "clock", "sidebar", "copyright"]);
}

#[test]
fn test_missing_file_boots_empty_registry() {
    let dir = tempfile::tempdir().unwrap();

    assert!(Declarations::load(dir.path().join(DECLARATIONS_FILE))
        .unwrap()
        .is_none());

    let (widgets, compiler) = boot_from_dir(container(), dir.path()).unwrap();
    assert_eq!(widgets.widget_names().count(), 0);
    assert!(compiler.is_empty());
    assert_eq!(
        compiler.compile("@x()"),
        "@x()",
        "no directive should be installed"
    );
}

#[test]
fn test_invalid_file_is_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.toml");
    fs::write(&path, "[widgets]\ngreet = 42\n").unwrap();

    let err = boot(container(), &path).err().unwrap();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn test_failing_subscriber_aborts_boot() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(DECLARATIONS_FILE);
    fs::write(&path, "subscribers = [\"Footer@install\", \"Nowhere\"]\n").unwrap();

    let err = boot(container(), &path).err().unwrap();
    match err {
        ConfigError::Apply(WidgetError::UndefinedMethod { class, method }) => {
            assert_eq!(class, "Footer");
            assert_eq!(method, "install");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_apply_onto_existing_registry() {
    let declarations = Declarations::parse("[widgets]\nclock = \"Clock@render\"\n").unwrap();

    let (mut widgets, _) = boot(container(), "does/not/exist.toml").unwrap();
    widgets.register_fn("greet", |_: &[Value]| json!("hi"));
    declarations.apply(&mut widgets).unwrap();

    assert_eq!(widgets.widget_names().collect::<Vec<_>>(), vec!["greet", "clock"]);
    assert_eq!(widgets.render("clock", &[]).unwrap(), "12:00");
}

#[test]
fn test_declared_self_referencing_group_renders_without_recursing() {
    let declarations = Declarations::parse(
        "[widgets]\nclock = \"Clock@render\"\n\n[groups]\nsidebar = [\"sidebar\"]\nheader = [\"clock\", \"header\", \"clock\"]\n",
    )
    .unwrap();

    let (mut widgets, _) = boot(container(), "does/not/exist.toml").unwrap();
    declarations.apply(&mut widgets).unwrap();

    assert_eq!(widgets.render("sidebar", &[]).unwrap(), "");
    assert_eq!(widgets.render("header", &[]).unwrap(), "12:0012:00");
}
