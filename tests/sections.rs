//! End-to-end composition: features register into sections, a layout
//! mounts them, navigation swaps what is rendered.

use std::cell::RefCell;
use std::rc::Rc;

use pretty_assertions::assert_eq;
use spark_host::{
    combine, feature, Cleanup, Feature, Host, HostConfig, RouteProps, SectionMode, SectionName, View,
};

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
enum Region {
    Root,
    Nav,
    Main,
}

impl SectionName for Region {
    fn as_str(&self) -> &str {
        match self {
            Region::Root => "root",
            Region::Nav => "nav",
            Region::Main => "main",
        }
    }

    fn default_section() -> Self {
        Region::Main
    }

    fn from_name(name: &str) -> Option<Self> {
        match name {
            "root" => Some(Region::Root),
            "nav" => Some(Region::Nav),
            "main" => Some(Region::Main),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Default)]
struct AppState {
    visits: u32,
}

enum Action {
    Visit,
}

type AppHost = Host<Region, AppState, Action>;
type Log = Rc<RefCell<Vec<String>>>;

fn take(log: &Log) -> Vec<String> {
    log.borrow_mut().drain(..).collect()
}

fn label(log: &Log, name: &'static str) -> impl View<Region> + 'static {
    let log = log.clone();
    move |props: &RouteProps<Region>| -> Cleanup {
        let text = match props.matched.params.values().next() {
            Some(param) => format!("{name}({param})"),
            None => name.to_string(),
        };
        log.borrow_mut().push(format!("+{text}"));
        let log = log.clone();
        Box::new(move || log.borrow_mut().push(format!("-{text}")))
    }
}

/// Renders nav (every match) and main (first match) side by side.
struct Layout;

impl View<Region> for Layout {
    fn render(&self, props: &RouteProps<Region>) -> Cleanup {
        let nav = props.context.mount_section(Region::Nav, SectionMode::NonExclusive);
        let main = props.context.mount_section(Region::Main, SectionMode::Exclusive);
        combine(vec![nav, main])
    }
}

/// Nav and main are mounted by separate effects, so each gets its own log.
struct Logs {
    nav: Log,
    main: Log,
}

impl Logs {
    fn new() -> Self {
        Self {
            nav: Rc::new(RefCell::new(Vec::new())),
            main: Rc::new(RefCell::new(Vec::new())),
        }
    }
}

fn features(logs: &Logs) -> Vec<Box<dyn Feature<Region, AppState, Action>>> {
    let shell = feature("shell", |host: &mut AppHost| {
        host.add_part_to(Region::Root, "/", Layout, false);
    });

    let home = {
        let (nav, main) = (logs.nav.clone(), logs.main.clone());
        feature("home", move |host: &mut AppHost| {
            host.add_part_to(Region::Nav, "/", label(&nav, "home-link"), false)
                .add_part("/", label(&main, "home"));
        })
    };

    let users = {
        let (nav, main) = (logs.nav.clone(), logs.main.clone());
        feature("users", move |host: &mut AppHost| {
            host.add_part_to(Region::Nav, "/users", label(&nav, "users-link"), false)
                .add_part("/users/:id", label(&main, "user"))
                .add_reducer("visits", |state: &mut AppState, action: &Action| match action {
                    Action::Visit => state.visits += 1,
                });
        })
    };

    // Registered last so every other main part wins first
    let fallback = {
        let main = logs.main.clone();
        feature("not-found", move |host: &mut AppHost| {
            host.add_part_to(Region::Main, "", label(&main, "not-found"), true);
        })
    };

    vec![
        Box::new(shell) as Box<dyn Feature<_, _, _>>,
        Box::new(home),
        Box::new(users),
        Box::new(fallback),
    ]
}

fn config() -> HostConfig {
    HostConfig::from_toml_str(
        r#"
        root_section = "root"
        default_section = "main"
        "#,
    )
    .unwrap()
}

#[test]
fn test_layout_composes_sections_across_navigation() {
    let logs = Logs::new();
    let mut host = AppHost::with_config(config()).unwrap();
    host.install_all(features(&logs));

    let app = host.start(AppState::default());
    let handle = app.mount();
    assert_eq!(handle.section(), "root");
    assert_eq!(take(&logs.nav), vec!["+home-link"]);
    assert_eq!(take(&logs.main), vec!["+home"]);

    app.navigate("/users/7");
    assert_eq!(take(&logs.nav), vec!["-home-link", "+home-link", "+users-link"]);
    assert_eq!(take(&logs.main), vec!["-home", "+user(7)"]);

    // Same nav urls, nav stays mounted
    app.navigate("/users/8");
    assert!(take(&logs.nav).is_empty());
    assert_eq!(take(&logs.main), vec!["-user(7)", "+user(8)"]);

    app.navigate("/missing");
    assert_eq!(take(&logs.nav), vec!["-users-link", "-home-link", "+home-link"]);
    assert_eq!(take(&logs.main), vec!["-user(8)", "+not-found"]);

    handle.unmount();
    assert_eq!(take(&logs.nav), vec!["-home-link"]);
    assert_eq!(take(&logs.main), vec!["-not-found"]);

    // Unmounted sections no longer follow navigation
    app.navigate("/users/9");
    assert!(take(&logs.nav).is_empty());
    assert!(take(&logs.main).is_empty());
}

#[test]
fn test_history_back_restores_previous_views() {
    let logs = Logs::new();
    let mut host = AppHost::with_config(config()).unwrap();
    host.install_all(features(&logs));

    let app = host.start(AppState::default());
    let _handle = app.mount_section(Region::Main, true);
    app.navigate("/users/1");
    take(&logs.main);

    app.history().back();
    assert_eq!(take(&logs.main), vec!["-user(1)", "+home"]);

    app.history().forward();
    assert_eq!(take(&logs.main), vec!["-home", "+user(1)"]);
    assert!(take(&logs.nav).is_empty());
}

#[test]
fn test_sections_resolve_in_registration_order() {
    let mut host = AppHost::with_config(config()).unwrap();
    host.install_all(features(&Logs::new()));

    let paths = |mode: bool| -> Vec<String> {
        host.get_section(&Region::Main, mode)
            .resolve("/users/3")
            .iter()
            .map(|r| r.part.path().to_string())
            .collect()
    };
    assert_eq!(paths(true), vec!["/users/:id"]);
    assert_eq!(paths(false), vec!["/users/:id", ""]);
}

#[test]
fn test_section_without_parts_is_empty() {
    let host = AppHost::new();
    let nav = host.get_section(&Region::Nav, false);
    assert!(nav.is_empty());
    assert!(nav.resolve("/anything").is_empty());

    let app = host.start(AppState::default());
    let handle = app.mount_section(Region::Nav, SectionMode::NonExclusive);
    app.navigate("/elsewhere");
    handle.unmount();
}

#[test]
fn test_feature_reducers_feed_the_store() {
    let mut host = AppHost::with_config(config()).unwrap();
    host.install_all(features(&Logs::new()));
    assert_eq!(host.installed(), ["shell", "home", "users", "not-found"]);

    let app = host.start(AppState::default());
    app.store().dispatch(Action::Visit);
    app.store().dispatch(Action::Visit);
    assert_eq!(app.store().get_state(), AppState { visits: 2 });
}
