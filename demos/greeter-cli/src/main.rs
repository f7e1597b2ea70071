//! Extension Runtime Greeter Example
//!
//! A small demonstration of ordinary, wrapper, adaptive, and activated
//! lookups against a single capability contract.
//!
//! # Running the Example
//!
//! ```bash
//! cargo run --package greeter-cli -- --name world
//! cargo run --package greeter-cli -- --name world --locale formal
//! ```

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use ext::prelude::*;
use tracing::info;

#[derive(Parser, Debug)]
struct Args {
    /// Who to greet.
    #[arg(long, default_value = "world")]
    name: String,

    /// Selects the adaptively-dispatched greeter via `greeter.locale`.
    #[arg(long)]
    locale: Option<String>,

    /// Group used when listing activated greeters.
    #[arg(long, default_value = "consumer")]
    group: String,
}

#[extension_point(name = "greeter", default = "plain")]
pub trait Greeter: Send + Sync {
    #[adaptive(keys("greeter.locale"))]
    fn greet(&self, url: &Url, subject: &str) -> ExtensionResult<String>;

    fn locale(&self) -> ExtensionResult<&'static str>;
}

#[derive(Default)]
struct PlainGreeter;
impl Injectable for PlainGreeter {}
impl Greeter for PlainGreeter {
    fn greet(&self, _url: &Url, subject: &str) -> ExtensionResult<String> {
        Ok(format!("Hi, {subject}!"))
    }
    fn locale(&self) -> ExtensionResult<&'static str> {
        Ok("plain")
    }
}
extension_impl!(
    contract = GREETER_REGISTRY,
    dyn_ty = dyn Greeter,
    impl_id = "greeter_cli::PlainGreeter",
    names = ["plain"],
    ty = PlainGreeter,
);

#[derive(Default)]
struct FormalGreeter;
impl Injectable for FormalGreeter {}
impl Greeter for FormalGreeter {
    fn greet(&self, _url: &Url, subject: &str) -> ExtensionResult<String> {
        Ok(format!("Good day, {subject}."))
    }
    fn locale(&self) -> ExtensionResult<&'static str> {
        Ok("formal")
    }
}
extension_impl!(
    contract = GREETER_REGISTRY,
    dyn_ty = dyn Greeter,
    impl_id = "greeter_cli::FormalGreeter",
    names = ["formal"],
    ty = FormalGreeter,
    activate = { groups = ["consumer"], keys = [], order = 10 },
);

struct PunctuatingGreeter {
    inner: Arc<dyn Greeter>,
}
impl PunctuatingGreeter {
    fn new(inner: Arc<dyn Greeter>) -> Self {
        Self { inner }
    }
}
impl Injectable for PunctuatingGreeter {}
impl Greeter for PunctuatingGreeter {
    fn greet(&self, url: &Url, subject: &str) -> ExtensionResult<String> {
        self.inner.greet(url, subject).map(|greeting| format!("{greeting} 👋"))
    }
    fn locale(&self) -> ExtensionResult<&'static str> {
        self.inner.locale()
    }
}
extension_wrapper!(
    contract = GREETER_REGISTRY,
    dyn_ty = dyn Greeter,
    impl_id = "greeter_cli::PunctuatingGreeter",
    ty = PunctuatingGreeter,
    ctor = PunctuatingGreeter::new,
);

fn main() -> Result<()> {
    LoggingBuilder::new().with_default_filter("info").init().ok();

    let args = Args::parse();
    let loader = loader_for::<GreeterPoint>();

    let mut url = Url::new("greeter");
    if let Some(locale) = &args.locale {
        url = url.with_parameter("greeter.locale", locale.clone());
    }

    let greeting = loader.get_adaptive()?.greet(&url, &args.name)?;
    println!("{greeting}");

    info!(group = %args.group, "listing activated greeters");
    for greeter in loader.get_activated(&url, &[], &args.group)? {
        println!("- [{}] {}", greeter.locale()?, greeter.greet(&url, &args.name)?);
    }

    let diagnostics = loader.diagnostics();
    if !diagnostics.is_empty() {
        println!("\ndiagnostics:");
        for diagnostic in diagnostics {
            println!("- {diagnostic}");
        }
    }

    Ok(())
}
