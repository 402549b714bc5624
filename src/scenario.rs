// Copyright 2025 Cowboy AI, LLC.

//! Scenario bootstrap
//!
//! Opens a scenario transcript with the title of the calling test and the
//! business value it delivers, then hands back a fresh [`Behaviour`]:
//!
//! ```text
//! I Want To Log In
//!   So that users can access their account
//!        As Customer
//!     Given submit Credentials credentials
//! ```
//!
//! The title comes from an explicit name when one is given, else from a
//! [`TestContext`]. The default context reads the test harness's thread name,
//! which the harness sets to the path of the running `#[test]` (also under
//! `#[tokio::test]`, which runs on the harness thread).

use std::sync::Arc;

use tracing::{debug, trace};

use crate::behaviour::Behaviour;
use crate::config::ScenarioConfig;
use crate::dispatch::TRANSCRIPT_TARGET;
use crate::errors::{NarrativeError, NarrativeResult};
use crate::narration::{ConsoleNarrator, Narrator};
use crate::readable::{expand_to_readable, pad_label, to_pascal_case};
use crate::registry::PersonaRegistry;

/// Test markers whose functions the default context can discover
pub const TEST_MARKERS: [&str; 2] = ["#[test]", "#[tokio::test]"];

/// Leading words removed from test names
pub const DISALLOWED_PREFIXES: [&str; 1] = ["Should"];

/// Title prefixes stating the intent of a scenario
pub const INTENT_PREFIXES: [&str; 4] = ["IWantTo", "IWant", "InOrderTo", "InOrder"];

/// Finds the name of the test a scenario runs in
pub trait TestContext {
    /// Name of the nearest function carrying a test marker
    fn test_name(&self) -> Option<String>;
}

/// Discovers the running test from the harness thread name
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadTestContext;

impl TestContext for ThreadTestContext {
    fn test_name(&self) -> Option<String> {
        let thread = std::thread::current();
        let name = thread.name()?;
        if name == "main" || !name.split("::").all(is_identifier) {
            return None;
        }
        name.rsplit("::").next().map(str::to_string)
    }
}

/// Test paths are `::`-separated Rust identifiers; worker threads are not
fn is_identifier(segment: &str) -> bool {
    let mut chars = segment.chars();
    chars
        .next()
        .is_some_and(|first| first.is_ascii_alphabetic() || first == '_')
        && chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
}

/// A test name passed explicitly by the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplicitTestName(pub String);

impl TestContext for ExplicitTestName {
    fn test_name(&self) -> Option<String> {
        let name = self.0.trim();
        (!name.is_empty()).then(|| name.to_string())
    }
}

/// Readable scenario title derived from a test name
///
/// ```rust
/// use cim_narrative::scenario_title;
///
/// assert_eq!(scenario_title("ShouldIWantToLogIn"), "I Want To Log In");
/// assert_eq!(scenario_title("should_log_in"), "I Want To Log In");
/// assert_eq!(scenario_title("in_order_to_ship_faster"), "In Order To Ship Faster");
/// ```
pub fn scenario_title(test_name: &str) -> String {
    let mut reason = to_pascal_case(test_name);
    for prefix in DISALLOWED_PREFIXES {
        if let Some(rest) = reason.strip_prefix(prefix) {
            if rest.is_empty() || rest.starts_with(|ch: char| ch.is_uppercase() || ch.is_ascii_digit()) {
                reason = rest.to_string();
            }
        }
    }

    let lowered = reason.to_lowercase();
    let has_intent = INTENT_PREFIXES
        .iter()
        .any(|prefix| lowered.starts_with(&prefix.to_lowercase()));
    if !has_intent {
        reason = format!("{}{reason}", INTENT_PREFIXES[0]);
    }
    expand_to_readable(&reason)
}

/// Builder for a narrated scenario
pub struct Scenario {
    registry: Arc<PersonaRegistry>,
    narrator: Arc<dyn Narrator>,
    config: ScenarioConfig,
    title: Option<String>,
}

impl Scenario {
    /// Scenario over `registry`, narrating to the console with default settings
    pub fn new(registry: Arc<PersonaRegistry>) -> Self {
        Self {
            registry,
            narrator: Arc::new(ConsoleNarrator),
            config: ScenarioConfig::default(),
            title: None,
        }
    }

    /// Narrate to `narrator` instead of the console
    pub fn narrator(mut self, narrator: impl Narrator + 'static) -> Self {
        self.narrator = Arc::new(narrator);
        self
    }

    /// Narrate to a shared narrator
    pub fn shared_narrator(mut self, narrator: Arc<dyn Narrator>) -> Self {
        self.narrator = narrator;
        self
    }

    /// Replace the whole configuration
    pub fn config(mut self, config: ScenarioConfig) -> Self {
        self.config = config;
        self
    }

    /// Target an alternate implementation layer
    pub fn target_layer(mut self, layer: impl Into<String>) -> Self {
        self.config.target_layer = Some(layer.into());
        self
    }

    /// Use `test_name` for the title instead of discovering it
    pub fn titled(mut self, test_name: impl Into<String>) -> Self {
        self.title = Some(test_name.into());
        self
    }

    /// Open the scenario, discovering the test name from the harness thread
    pub fn so_that(self, business_value: &str) -> NarrativeResult<Behaviour> {
        self.so_that_in(business_value, &ThreadTestContext)
    }

    /// Open the scenario, discovering the test name through `context`
    pub fn so_that_in(self, business_value: &str, context: &dyn TestContext) -> NarrativeResult<Behaviour> {
        self.config.validate()?;

        let test_name = match &self.title {
            Some(title) => ExplicitTestName(title.clone()).test_name(),
            None => context.test_name(),
        }
        .ok_or_else(|| NarrativeError::NoTestContextFound {
            markers: TEST_MARKERS.join(" or "),
        })?;

        let title = scenario_title(&test_name);
        let value_line = expand_to_readable(&format!("{}{business_value}", pad_label("So that")));
        debug!(test = %test_name, layer = ?self.config.target_layer, "Scenario started");
        for line in [&title, &value_line] {
            trace!(target: TRANSCRIPT_TARGET, "{line}");
            self.narrator.write_line(line);
        }

        Ok(Behaviour::new(self.registry, self.narrator, self.config))
    }
}

/// Name of the enclosing function, with closure frames skipped
///
/// ```rust
/// fn should_log_in() -> &'static str {
///     cim_narrative::function_name!()
/// }
///
/// assert_eq!(should_log_in(), "should_log_in");
/// ```
#[macro_export]
macro_rules! function_name {
    () => {{
        fn __marker() {}
        $crate::scenario::enclosing_function($crate::scenario::type_name_of(&__marker))
    }};
}

/// Narrate the enclosing function's name on a behaviour
///
/// Typically the first call in a setter block, completing its label column.
#[macro_export]
macro_rules! perform {
    ($behaviour:expr) => {
        $behaviour.perform($crate::function_name!())
    };
}

#[doc(hidden)]
pub fn type_name_of<T>(_: &T) -> &'static str {
    std::any::type_name::<T>()
}

#[doc(hidden)]
pub fn enclosing_function(marker_path: &'static str) -> &'static str {
    let mut path = marker_path.strip_suffix("::__marker").unwrap_or(marker_path);
    while let Some(outer) = path.strip_suffix("::{{closure}}") {
        path = outer;
    }
    path.rsplit("::").next().unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::narration::TranscriptRecorder;
    use test_case::test_case;

    #[test_case("ShouldIWantToLogIn", "I Want To Log In")]
    #[test_case("should_i_want_to_log_in", "I Want To Log In")]
    #[test_case("ShouldLogIn", "I Want To Log In")]
    #[test_case("IWantAReceipt", "I Want A Receipt")]
    #[test_case("InOrderToPayIWantACard", "In Order To Pay I Want A Card")]
    #[test_case("ShoulderTheLoad", "I Want To Shoulder The Load")]
    #[test_case("iwanttoshout", "Iwanttoshout")]
    #[test_case("checkout", "I Want To Checkout")]
    #[test_case("should", "I Want To")]
    fn titles(test_name: &str, expected: &str) {
        assert_eq!(scenario_title(test_name), expected);
    }

    #[test]
    fn opening_lines() {
        let recorder = TranscriptRecorder::new();
        let behaviour = Scenario::new(Arc::new(PersonaRegistry::new()))
            .narrator(recorder.clone())
            .titled("ShouldIWantToLogIn")
            .so_that("users can access their account")
            .unwrap();

        assert_eq!(
            recorder.lines(),
            vec!["I Want To Log In", "  So that users can access their account"]
        );
        assert!(behaviour.current_persona().is_none());
        assert!(behaviour.target_layer().is_none());
    }

    #[test]
    fn layer_is_carried_into_the_session() {
        let behaviour = Scenario::new(Arc::new(PersonaRegistry::new()))
            .narrator(TranscriptRecorder::new())
            .target_layer("service")
            .titled("should_pay")
            .so_that("orders are paid")
            .unwrap();
        assert_eq!(behaviour.target_layer(), Some("service"));
    }

    struct NoTest;
    impl TestContext for NoTest {
        fn test_name(&self) -> Option<String> {
            None
        }
    }

    #[test]
    fn missing_test_context_is_fatal() {
        let recorder = TranscriptRecorder::new();
        let err = Scenario::new(Arc::new(PersonaRegistry::new()))
            .narrator(recorder.clone())
            .so_that_in("anything", &NoTest)
            .unwrap_err();

        assert!(matches!(err, NarrativeError::NoTestContextFound { ref markers } if markers.contains("#[test]")));
        assert!(recorder.lines().is_empty());
    }

    #[test]
    fn blank_explicit_names_are_not_test_names() {
        assert_eq!(ExplicitTestName("  ".into()).test_name(), None);
        assert_eq!(ExplicitTestName("should_x".into()).test_name(), Some("should_x".into()));
    }

    #[test]
    fn should_discover_the_running_test() {
        assert_eq!(
            ThreadTestContext.test_name().as_deref(),
            Some("should_discover_the_running_test")
        );
    }

    #[test]
    fn named_worker_threads_are_not_tests() {
        for name in ["tokio-runtime-worker", "pool 1", "worker::"] {
            let found = std::thread::Builder::new()
                .name(name.to_string())
                .spawn(|| ThreadTestContext.test_name())
                .unwrap()
                .join()
                .unwrap();
            assert_eq!(found, None, "thread {name:?}");
        }

        let found = std::thread::Builder::new()
            .name("checkout::should_pay".to_string())
            .spawn(|| ThreadTestContext.test_name())
            .unwrap()
            .join()
            .unwrap();
        assert_eq!(found.as_deref(), Some("should_pay"));
    }

    #[test]
    fn function_name_skips_closures() {
        let from_closure = (|| crate::function_name!())();
        assert_eq!(from_closure, "function_name_skips_closures");
        assert_eq!(crate::function_name!(), "function_name_skips_closures");
    }

    #[test]
    fn enclosing_function_handles_bare_paths() {
        assert_eq!(enclosing_function("setup::__marker"), "setup");
        assert_eq!(enclosing_function("plain"), "plain");
    }
}
