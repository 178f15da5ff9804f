//!
//! [`Loader`] loads external script resources at most once per URL and
//! resolves every requester with the global symbol the script publishes.
//!
//! Resolution happens either when the [`ScriptInjector`] reports the script
//! as loaded or, if the [`Sdk`] names a ready signal, when the script itself
//! invokes that signal. Any handler already installed under the signal name
//! keeps working: the loader wraps it and calls it first.
//!

use crate::environment::{Environment, ReadyHandler};
use crate::error::Error;
use crate::injector::ScriptInjector;
use crate::pending::{PendingRequests, RequestType};
use crate::result::Result;
use crate::sdk::Sdk;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use workflow_log::*;

pub type Pending<V> = PendingRequests<String, V, Error>;

pub struct Loader<E: Environment> {
    environment: Arc<E>,
    injector: Arc<dyn ScriptInjector>,
    pending: Arc<Pending<E::Value>>,
    injections: AtomicUsize,
}

impl<E: Environment> Loader<E> {
    pub fn new(environment: Arc<E>, injector: Arc<dyn ScriptInjector>) -> Self {
        Loader {
            environment,
            injector,
            pending: Arc::new(Pending::new()),
            injections: AtomicUsize::new(0),
        }
    }

    pub fn environment(&self) -> &Arc<E> {
        &self.environment
    }

    /// Number of URLs with a load in flight
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn is_pending(&self, url: &str) -> bool {
        self.pending.contains(&url.to_string())
    }

    /// Total number of script insertions issued by this loader
    pub fn injections(&self) -> usize {
        self.injections.load(Ordering::SeqCst)
    }

    /// Load `sdk`, treating any existing global symbol as fully loaded.
    pub async fn load(&self, sdk: &Sdk) -> Result<E::Value> {
        self.load_with(sdk, |_| true).await
    }

    /// Load `sdk`. If the global symbol already exists and `is_loaded`
    /// accepts it, it is returned without inserting the script.
    pub async fn load_with<F>(&self, sdk: &Sdk, is_loaded: F) -> Result<E::Value>
    where
        F: Fn(&E::Value) -> bool,
    {
        if let Some(existing) = self.environment.lookup(&sdk.global) {
            if self.environment.is_present(&existing) && is_loaded(&existing) {
                log_trace!("sdk `{}` is already available", sdk.global);
                return Ok(existing);
            }
        }

        match self.pending.queue(&sdk.url) {
            RequestType::New(receiver) => {
                log_trace!("loading sdk `{}` from {}", sdk.global, sdk.url);
                let mut guard = AbandonGuard::new(self.pending.as_ref(), &sdk.url);
                let injected = self.inject(sdk).await;
                guard.disarm();
                if let Err(err) = injected {
                    log_error!("{}", err);
                    self.pending.complete(&sdk.url, Err(err));
                }
                receiver.recv().await?
            }
            RequestType::Pending(receiver) => {
                log_trace!("waiting for pending load of {}", sdk.url);
                receiver.recv().await?
            }
        }
    }

    async fn inject(&self, sdk: &Sdk) -> Result<()> {
        if let Some(signal) = &sdk.ready {
            self.install_ready_handler(sdk, signal)?;
        }

        self.injections.fetch_add(1, Ordering::SeqCst);
        self.injector.inject(&sdk.url).await?;

        if sdk.ready.is_none() {
            resolve(self.environment.as_ref(), self.pending.as_ref(), sdk);
        }

        Ok(())
    }

    fn install_ready_handler(&self, sdk: &Sdk, signal: &str) -> Result<()> {
        let previous = self.environment.ready_handler(signal);
        let environment = self.environment.clone();
        let pending = self.pending.clone();
        let sdk = sdk.clone();

        let handler: ReadyHandler = Arc::new(move || {
            if let Some(previous) = &previous {
                previous();
            }
            resolve(environment.as_ref(), pending.as_ref(), &sdk);
        });

        self.environment.set_ready_handler(signal, handler)
    }
}

/// Resolve every request pending on `sdk.url` with the current
/// value of the sdk's global symbol.
fn resolve<E: Environment>(environment: &E, pending: &Pending<E::Value>, sdk: &Sdk) {
    let result = environment
        .lookup(&sdk.global)
        .ok_or_else(|| Error::MissingGlobal(sdk.global.clone()));

    if let Err(err) = &result {
        log_error!("{} after loading {}", err, sdk.url);
    }

    if pending.complete(&sdk.url, result) == 0 {
        log_warn!("{} resolved with no pending requests", sdk.url);
    }
}

/// Rejects the requests pending on `url` if the future driving the
/// injection is dropped before the injection settles.
struct AbandonGuard<'a, V: Clone> {
    pending: &'a Pending<V>,
    url: &'a str,
    armed: bool,
}

impl<'a, V: Clone> AbandonGuard<'a, V> {
    fn new(pending: &'a Pending<V>, url: &'a str) -> Self {
        AbandonGuard {
            pending,
            url,
            armed: true,
        }
    }

    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl<V: Clone> Drop for AbandonGuard<'_, V> {
    fn drop(&mut self) {
        if self.armed {
            log_warn!("load of {} abandoned by its caller", self.url);
            self.pending
                .complete(&self.url.to_string(), Err(Error::load(self.url, "load abandoned")));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::Globals;
    use async_trait::async_trait;
    use futures::{join, poll};
    use std::sync::atomic::AtomicBool;
    use std::sync::Mutex;

    const URL: &str = "https://example.com/sdk.js";

    #[derive(Clone, Copy)]
    enum Outcome {
        /// define the global and report success
        Define(u32),
        /// define the global, invoke the ready signal, report success
        Signal(u32, &'static str),
        /// report success without publishing anything
        Silent,
        /// report a load error
        Fail,
    }

    struct FakeInjector {
        globals: Arc<Globals<u32>>,
        outcome: Mutex<Outcome>,
        urls: Mutex<Vec<String>>,
    }

    impl FakeInjector {
        fn new(globals: &Arc<Globals<u32>>, outcome: Outcome) -> Arc<Self> {
            Arc::new(FakeInjector {
                globals: globals.clone(),
                outcome: Mutex::new(outcome),
                urls: Mutex::new(Vec::new()),
            })
        }

        fn set_outcome(&self, outcome: Outcome) {
            *self.outcome.lock().unwrap() = outcome;
        }

        fn urls(&self) -> Vec<String> {
            self.urls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ScriptInjector for FakeInjector {
        async fn inject(&self, url: &str) -> Result<()> {
            self.urls.lock().unwrap().push(url.to_string());
            // let concurrent requests queue up before the script "loads"
            tokio::task::yield_now().await;

            let outcome = *self.outcome.lock().unwrap();
            match outcome {
                Outcome::Define(value) => {
                    self.globals.define("ExampleSDK", value);
                    Ok(())
                }
                Outcome::Signal(value, signal) => {
                    self.globals.define("ExampleSDK", value);
                    self.globals.signal(signal);
                    Ok(())
                }
                Outcome::Silent => Ok(()),
                Outcome::Fail => Err(Error::load(url, "network error")),
            }
        }
    }

    type Setup = (Arc<Globals<u32>>, Arc<FakeInjector>, Loader<Globals<u32>>);

    fn setup(outcome: Outcome) -> Setup {
        let globals = Arc::new(Globals::new());
        let injector = FakeInjector::new(&globals, outcome);
        let loader = Loader::new(globals.clone(), injector.clone());
        (globals, injector, loader)
    }

    fn sdk() -> Sdk {
        Sdk::new(URL, "ExampleSDK")
    }

    #[tokio::test]
    async fn concurrent_loads_insert_once() {
        let (_globals, injector, loader) = setup(Outcome::Define(42));
        let sdk = sdk();

        let (a, b, c) = join!(loader.load(&sdk), loader.load(&sdk), loader.load(&sdk));

        assert_eq!((a, b, c), (Ok(42), Ok(42), Ok(42)));
        assert_eq!(injector.urls(), vec![URL.to_string()]);
        assert_eq!(loader.injections(), 1);
        assert!(!loader.is_pending(URL));
    }

    #[tokio::test]
    async fn existing_global_short_circuits() {
        let (globals, injector, loader) = setup(Outcome::Fail);
        globals.define("ExampleSDK", 7);

        assert_eq!(loader.load(&sdk()).await, Ok(7));
        assert!(injector.urls().is_empty());
        assert_eq!(loader.pending(), 0);
    }

    #[tokio::test]
    async fn existing_global_rejected_by_predicate_is_reloaded() {
        let (globals, injector, loader) = setup(Outcome::Define(8));
        globals.define("ExampleSDK", 0);

        let value = loader.load_with(&sdk(), |value| *value > 0).await;

        assert_eq!(value, Ok(8));
        assert_eq!(injector.urls().len(), 1);
    }

    #[tokio::test]
    async fn later_loads_are_served_from_environment() {
        let (_globals, injector, loader) = setup(Outcome::Define(5));

        assert_eq!(loader.load(&sdk()).await, Ok(5));
        assert_eq!(loader.load(&sdk()).await, Ok(5));
        assert_eq!(injector.urls().len(), 1);
        assert_eq!(loader.pending(), 0);
    }

    #[tokio::test]
    async fn failure_rejects_all_and_allows_retry() {
        let (_globals, injector, loader) = setup(Outcome::Fail);
        let sdk = sdk();

        let (a, b) = join!(loader.load(&sdk), loader.load(&sdk));

        let expected = Err(Error::load(URL, "network error"));
        assert_eq!(a, expected);
        assert_eq!(b, expected);
        assert_eq!(injector.urls().len(), 1);
        assert!(!loader.is_pending(URL));

        injector.set_outcome(Outcome::Define(9));
        assert_eq!(loader.load(&sdk).await, Ok(9));
        assert_eq!(injector.urls().len(), 2);
    }

    #[tokio::test]
    async fn missing_global_after_load_is_an_error() {
        let (_globals, _injector, loader) = setup(Outcome::Silent);

        let result = loader.load(&sdk()).await;

        assert_eq!(result, Err(Error::MissingGlobal("ExampleSDK".to_string())));
        assert_eq!(loader.pending(), 0);
    }

    #[tokio::test]
    async fn ready_signal_resolves_and_chains_previous_handler() {
        let (globals, injector, loader) = setup(Outcome::Signal(11, "onExampleReady"));
        let sdk = sdk().with_ready("onExampleReady");

        let previous_called = Arc::new(AtomicBool::new(false));
        let flag = previous_called.clone();
        globals
            .set_ready_handler(
                "onExampleReady",
                Arc::new(move || {
                    flag.store(true, Ordering::SeqCst);
                }),
            )
            .unwrap();

        let (a, b) = join!(loader.load(&sdk), loader.load(&sdk));

        assert_eq!((a, b), (Ok(11), Ok(11)));
        assert!(previous_called.load(Ordering::SeqCst));
        assert_eq!(injector.urls().len(), 1);
        assert!(!loader.is_pending(URL));
    }

    #[tokio::test]
    async fn ready_signal_waits_for_script_call() {
        let (globals, _injector, loader) = setup(Outcome::Define(3));
        let sdk = sdk().with_ready("onExampleReady");

        let signal = async {
            // the script is loaded but has not announced readiness yet
            while loader.injections() == 0 || globals.lookup("ExampleSDK").is_none() {
                tokio::task::yield_now().await;
            }
            assert!(loader.is_pending(URL));
            assert!(globals.signal("onExampleReady"));
        };

        let (value, _) = join!(loader.load(&sdk), signal);

        assert_eq!(value, Ok(3));
        assert!(!loader.is_pending(URL));
    }

    #[tokio::test]
    async fn late_ready_signal_is_ignored() {
        let (globals, _injector, loader) = setup(Outcome::Signal(4, "onExampleReady"));
        let sdk = sdk().with_ready("onExampleReady");

        assert_eq!(loader.load(&sdk).await, Ok(4));
        // the wrapper stays installed; firing it again has nothing to resolve
        assert!(globals.signal("onExampleReady"));
        assert_eq!(loader.pending(), 0);
    }

    #[tokio::test]
    async fn falsy_global_is_treated_as_absent() {
        let globals = Arc::new(Globals::with_presence(|value: &u32| *value != 0));
        let injector = FakeInjector::new(&globals, Outcome::Define(6));
        let loader = Loader::new(globals.clone(), injector.clone());
        globals.define("ExampleSDK", 0);

        assert_eq!(loader.load(&sdk()).await, Ok(6));
        assert_eq!(injector.urls().len(), 1);
        assert!(!loader.is_pending(URL));
    }

    #[tokio::test]
    async fn dropped_first_caller_rejects_waiters_and_allows_reload() {
        let (_globals, injector, loader) = setup(Outcome::Define(2));
        let sdk = sdk();

        let mut first = Box::pin(loader.load(&sdk));
        assert!(poll!(&mut first).is_pending());
        let mut second = Box::pin(loader.load(&sdk));
        assert!(poll!(&mut second).is_pending());
        assert!(loader.is_pending(URL));

        drop(first);

        assert!(!loader.is_pending(URL));
        assert_eq!(second.await, Err(Error::load(URL, "load abandoned")));

        assert_eq!(loader.load(&sdk).await, Ok(2));
        assert_eq!(injector.urls().len(), 2);
        assert!(!loader.is_pending(URL));
    }

    #[tokio::test]
    async fn ready_signal_with_script_error_rejects_all_and_allows_retry() {
        let (_globals, injector, loader) = setup(Outcome::Fail);
        let sdk = sdk().with_ready("onExampleReady");

        let (a, b) = join!(loader.load(&sdk), loader.load(&sdk));

        let expected = Err(Error::load(URL, "network error"));
        assert_eq!((a, b), (expected.clone(), expected));
        assert!(!loader.is_pending(URL));

        // the retry's wrapper chains the one left behind by the failed attempt
        injector.set_outcome(Outcome::Signal(12, "onExampleReady"));
        assert_eq!(loader.load(&sdk).await, Ok(12));
        assert_eq!(injector.urls().len(), 2);
        assert!(!loader.is_pending(URL));
    }

    #[tokio::test]
    async fn distinct_urls_load_independently() {
        let (_globals, injector, loader) = setup(Outcome::Define(1));
        let first = sdk();
        let second = Sdk::new("https://example.com/other.js", "ExampleSDK");

        let (a, b) = join!(loader.load(&first), loader.load(&second));

        assert_eq!((a, b), (Ok(1), Ok(1)));
        assert_eq!(injector.urls().len(), 2);
    }
}
