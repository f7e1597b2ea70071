//! End-to-end coverage for the Loader façade: named resolution, caching,
//! wrapping, adaptive dispatch, activation, and the administrative API.

use std::sync::Arc;

use ext_core::{extension_impl, extension_wrapper, ExtensionError, Injectable, Url};
use ext_macros::extension_point;
use ext_runtime::loader_for;

#[extension_point(name = "greeter", default = "plain")]
pub trait Greeter: Send + Sync {
    #[adaptive(keys("greeter.type"))]
    fn greet(&self, url: &Url, subject: &str) -> Result<String, ExtensionError>;

    fn label(&self) -> Result<&'static str, ExtensionError>;
}

#[derive(Default)]
struct PlainGreeter;
impl Injectable for PlainGreeter {}
impl Greeter for PlainGreeter {
    fn greet(&self, _url: &Url, subject: &str) -> Result<String, ExtensionError> {
        Ok(format!("Hello, {subject}!"))
    }
    fn label(&self) -> Result<&'static str, ExtensionError> {
        Ok("plain")
    }
}
extension_impl!(
    contract = GREETER_REGISTRY,
    dyn_ty = dyn Greeter,
    impl_id = "ext_runtime::tests::greeter::PlainGreeter",
    names = ["plain"],
    ty = PlainGreeter,
);

#[derive(Default)]
struct LoudGreeter;
impl Injectable for LoudGreeter {}
impl Greeter for LoudGreeter {
    fn greet(&self, _url: &Url, subject: &str) -> Result<String, ExtensionError> {
        Ok(format!("HELLO, {}!!!", subject.to_uppercase()))
    }
    fn label(&self) -> Result<&'static str, ExtensionError> {
        Ok("loud")
    }
}
extension_impl!(
    contract = GREETER_REGISTRY,
    dyn_ty = dyn Greeter,
    impl_id = "ext_runtime::tests::greeter::LoudGreeter",
    names = ["loud"],
    ty = LoudGreeter,
    activate = { groups = ["consumer"], keys = [], order = 0 },
);

struct ExclaimingGreeter {
    inner: Arc<dyn Greeter>,
}

impl ExclaimingGreeter {
    fn new(inner: Arc<dyn Greeter>) -> Self {
        Self { inner }
    }
}

impl Injectable for ExclaimingGreeter {}
impl Greeter for ExclaimingGreeter {
    fn greet(&self, url: &Url, subject: &str) -> Result<String, ExtensionError> {
        self.inner.greet(url, subject).map(|greeting| format!("{greeting} (wrapped)"))
    }
    fn label(&self) -> Result<&'static str, ExtensionError> {
        self.inner.label()
    }
}
extension_wrapper!(
    contract = GREETER_REGISTRY,
    dyn_ty = dyn Greeter,
    impl_id = "ext_runtime::tests::greeter::ExclaimingGreeter",
    ty = ExclaimingGreeter,
    ctor = ExclaimingGreeter::new,
);

#[test]
fn resolves_named_extension_through_the_registered_wrapper() {
    let loader = loader_for::<GreeterPoint>();
    let greeting = loader.get("plain").unwrap().greet(&Url::new("test"), "world").unwrap();
    assert_eq!(greeting, "Hello, world! (wrapped)");
}

#[test]
fn get_default_resolves_the_declared_default_name() {
    let loader = loader_for::<GreeterPoint>();
    let instance = loader.get_default().unwrap().expect("greeter declares a default");
    assert_eq!(instance.label().unwrap(), "plain");
}

#[test]
fn blank_name_reports_usage_error() {
    let loader = loader_for::<GreeterPoint>();
    let err = loader.get("  ").unwrap_err();
    assert!(matches!(err, ExtensionError::Usage(_)));
}

#[test]
fn unknown_name_reports_no_such_extension() {
    let loader = loader_for::<GreeterPoint>();
    let err = loader.get("does-not-exist").unwrap_err();
    assert!(matches!(err, ExtensionError::NoSuchExtension { .. }));
}

#[test]
fn repeated_lookups_return_the_same_cached_instance() {
    let loader = loader_for::<GreeterPoint>();
    let first = loader.get("loud").unwrap();
    let second = loader.get("loud").unwrap();
    assert!(Arc::ptr_eq(&first, &second));
}

#[test]
fn has_is_true_before_construction_loaded_is_true_only_after() {
    let loader = loader_for::<GreeterPoint>();
    assert!(loader.has("plain"));
    assert!(!loader.has("never-registered"));

    // "plain" may already be loaded by an earlier test in this binary; use a
    // name nothing else in this file resolves to avoid depending on order.
    loader.add("fresh-probe", "ext_runtime::tests::greeter::PlainGreeter", || Box::new(PlainGreeter)).ok();
    assert!(loader.has("fresh-probe"));
    assert!(!loader.loaded("fresh-probe"));
    loader.get("fresh-probe").unwrap();
    assert!(loader.loaded("fresh-probe"));
}

#[test]
fn adaptive_dispatch_routes_by_url_parameter() {
    let loader = loader_for::<GreeterPoint>();
    let adaptive = loader.get_adaptive().unwrap();
    let url = Url::new("test").with_parameter("greeter.type", "loud");
    let greeting = adaptive.greet(&url, "team").unwrap();
    assert!(greeting.contains("TEAM"));
}

#[test]
fn adaptive_dispatch_falls_back_to_default_name_with_no_parameter() {
    let loader = loader_for::<GreeterPoint>();
    let adaptive = loader.get_adaptive().unwrap();
    let greeting = adaptive.greet(&Url::new("test"), "world").unwrap();
    assert_eq!(greeting, "Hello, world! (wrapped)");
}

#[test]
fn adaptive_dispatch_propagates_no_such_extension_instead_of_panicking() {
    let loader = loader_for::<GreeterPoint>();
    let adaptive = loader.get_adaptive().unwrap();
    let url = Url::new("test").with_parameter("greeter.type", "does-not-exist");
    let err = adaptive.greet(&url, "world").unwrap_err();
    assert!(matches!(err, ExtensionError::NoSuchExtension { .. }));
}

#[test]
fn activated_extensions_respect_group_filtering() {
    let loader = loader_for::<GreeterPoint>();
    let url = Url::new("test");
    let activated = loader.get_activated(&url, &[], "consumer").unwrap();
    assert!(activated.iter().any(|g| g.label().unwrap() == "loud"));

    let activated_provider = loader.get_activated(&url, &[], "provider").unwrap();
    assert!(activated_provider.iter().all(|g| g.label().unwrap() != "loud"));
}

#[extension_point(name = "announcer", default = "standard")]
pub trait Announcer: Send + Sync {
    #[adaptive(keys("protocol"))]
    fn announce(&self, url: &Url) -> Result<&'static str, ExtensionError>;
}

#[derive(Default)]
struct StandardAnnouncer;
impl Injectable for StandardAnnouncer {}
impl Announcer for StandardAnnouncer {
    fn announce(&self, _url: &Url) -> Result<&'static str, ExtensionError> {
        Ok("standard")
    }
}
extension_impl!(
    contract = ANNOUNCER_REGISTRY,
    dyn_ty = dyn Announcer,
    impl_id = "ext_runtime::tests::greeter::StandardAnnouncer",
    names = ["standard"],
    ty = StandardAnnouncer,
);

#[derive(Default)]
struct DubboAnnouncer;
impl Injectable for DubboAnnouncer {}
impl Announcer for DubboAnnouncer {
    fn announce(&self, _url: &Url) -> Result<&'static str, ExtensionError> {
        Ok("dubbo")
    }
}
extension_impl!(
    contract = ANNOUNCER_REGISTRY,
    dyn_ty = dyn Announcer,
    impl_id = "ext_runtime::tests::greeter::DubboAnnouncer",
    names = ["dubbo"],
    ty = DubboAnnouncer,
);

#[test]
fn adaptive_dispatch_reads_reserved_protocol_key_from_url_scheme() {
    let loader = loader_for::<AnnouncerPoint>();
    let adaptive = loader.get_adaptive().unwrap();

    let dubbo_url = Url::new("dubbo");
    assert_eq!(adaptive.announce(&dubbo_url).unwrap(), "dubbo");

    let fallback_url = Url::new("");
    assert_eq!(adaptive.announce(&fallback_url).unwrap(), "standard");
}

#[test]
fn administrative_add_rejects_duplicates_then_replace_swaps_the_class() {
    let loader = loader_for::<GreeterPoint>();
    loader
        .add("extra", "ext_runtime::tests::greeter::PlainGreeter", || Box::new(PlainGreeter))
        .unwrap();
    assert!(loader.has("extra"));
    assert!(loader
        .add("extra", "ext_runtime::tests::greeter::PlainGreeter", || Box::new(PlainGreeter))
        .is_err());

    loader
        .replace("extra", "ext_runtime::tests::greeter::LoudGreeter", || Box::new(LoudGreeter))
        .unwrap();
    assert_eq!(loader.get("extra").unwrap().label().unwrap(), "loud");
}
