//! Sections Example - Features, sections and navigation
//!
//! This example demonstrates composing an application from features:
//! - A shell feature registers the layout in the root section
//! - Feature modules add nav links and pages to their sections
//! - Navigation swaps what each section renders
//!
//! Run with: cargo run --example sections
//! Set RUST_LOG=spark_host=debug to watch sections mount.

use spark_host::{
    combine, feature, noop, Cleanup, Feature, Host, HostConfig, RouteProps, SectionMode,
    SectionName, Store, View,
};
use tracing_subscriber::EnvFilter;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
enum Region {
    Shell,
    Nav,
    Body,
}

impl SectionName for Region {
    fn as_str(&self) -> &str {
        match self {
            Region::Shell => "shell",
            Region::Nav => "nav",
            Region::Body => "body",
        }
    }

    fn default_section() -> Self {
        Region::Body
    }

    fn from_name(name: &str) -> Option<Self> {
        match name {
            "shell" => Some(Region::Shell),
            "nav" => Some(Region::Nav),
            "body" => Some(Region::Body),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Default)]
struct AppState {
    page_views: u32,
}

enum Action {
    Viewed(String),
}

type AppHost = Host<Region, AppState, Action>;

struct Layout;

impl View<Region> for Layout {
    fn render(&self, props: &RouteProps<Region>) -> Cleanup {
        println!("  [layout] mounted");
        let nav = props.context.mount_section(Region::Nav, SectionMode::NonExclusive);
        let body = props.context.mount_section(Region::Body, SectionMode::Exclusive);
        let layout: Cleanup = Box::new(|| println!("  [layout] unmounted"));
        combine(vec![layout, nav, body])
    }
}

fn link(text: &'static str) -> impl View<Region> {
    move |_props: &RouteProps<Region>| -> Cleanup {
        println!("  [nav]  {text}");
        noop()
    }
}

fn page(title: &'static str) -> impl View<Region> {
    move |props: &RouteProps<Region>| -> Cleanup {
        let detail = props
            .matched
            .params
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect::<Vec<_>>()
            .join(", ");
        println!("  [body] {title} {detail}");

        if let Some(store) = props.context.store::<AppState, Action>() {
            store.dispatch(Action::Viewed(props.location.pathname.clone()));
        }
        Box::new(move || println!("  [body] leaving {title}"))
    }
}

fn features() -> Vec<Box<dyn Feature<Region, AppState, Action>>> {
    let shell = feature("shell", |host: &mut AppHost| {
        host.add_part_to(Region::Shell, "/", Layout, false);
    });

    let home = feature("home", |host: &mut AppHost| {
        host.add_part_to(Region::Nav, "/", link("Home"), false)
            .add_part("/", page("Welcome"));
    });

    let users = feature("users", |host: &mut AppHost| {
        host.add_part_to(Region::Nav, "/users", link("Users"), false)
            .add_part("/users", page("All users"))
            .add_part("/users/:id", page("User"))
            .add_reducer("page-views", |state: &mut AppState, action: &Action| match action {
                Action::Viewed(_) => state.page_views += 1,
            })
            .add_effect(|_store: &Store<AppState, Action>, action: &Action| match action {
                Action::Viewed(path) => tracing::info!(%path, "page viewed"),
            });
    });

    let not_found = feature("not-found", |host: &mut AppHost| {
        host.add_part_to(Region::Body, "", page("Not found"), true);
    });

    vec![
        Box::new(shell) as Box<dyn Feature<_, _, _>>,
        Box::new(home),
        Box::new(users),
        Box::new(not_found),
    ]
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== spark-host Sections Example ===\n");

    let config = HostConfig::from_toml_str(
        r#"
        root_section = "shell"
        default_section = "body"
        initial_path = "/"
        "#,
    )?;

    let mut host = AppHost::with_config(config)?;
    host.install_all(features());
    println!("Installed features: {:?}", host.installed());

    let app = host.start(AppState::default());

    println!("\n/ :");
    let handle = app.mount();

    for path in ["/users", "/users/42", "/users/7", "/nowhere"] {
        println!("\n{path} :");
        app.navigate(path);
    }

    println!("\nback :");
    app.history().back();

    println!("\nunmount :");
    handle.unmount();

    println!("\nPage views: {}", app.store().get_state().page_views);
    Ok(())
}
