use std::cell::RefCell;
use std::rc::Rc;

use futures::channel::oneshot;
use futures::future::{self, Either, LocalBoxFuture};
use futures::FutureExt;
use gloo_timers::future::TimeoutFuture;
use log::{info, warn};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{window, HtmlScriptElement};

use crate::config;
use crate::maps::bindings;

pub const READY_POLL_MS: u32 = 100;
pub const READY_DEADLINE_MS: u32 = 12_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Unloaded,
    Loading,
    Ready,
}

/// Puts the maps script on the page.
pub trait ScriptInjector {
    /// True when `google.maps` is already usable, whoever loaded it.
    fn library_present(&self) -> bool;
    /// Injects the script unless the loader marker is already there and
    /// arranges for `on_ready` to run once the library calls back.
    fn inject(&self, on_ready: Box<dyn FnOnce()>) -> Result<(), String>;
}

pub trait Timer {
    fn sleep(&self, ms: u32) -> LocalBoxFuture<'static, ()>;
}

pub struct GlooTimer;

impl Timer for GlooTimer {
    fn sleep(&self, ms: u32) -> LocalBoxFuture<'static, ()> {
        TimeoutFuture::new(ms).boxed_local()
    }
}

pub struct DomScriptInjector;

impl ScriptInjector for DomScriptInjector {
    fn library_present(&self) -> bool {
        bindings::maps_loaded()
    }

    fn inject(&self, on_ready: Box<dyn FnOnce()>) -> Result<(), String> {
        inject_script(on_ready).map_err(|e| format!("{:?}", e))
    }
}

fn inject_script(on_ready: Box<dyn FnOnce()>) -> Result<(), JsValue> {
    let window = window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window.document().ok_or_else(|| JsValue::from_str("no document"))?;

    let callback = Closure::once_into_js(move || on_ready());
    set_global(&window, config::MAPS_READY_CALLBACK, &callback)?;

    if document.get_element_by_id(config::MAPS_LOADER_ID).is_some() {
        return Ok(());
    }

    let script: HtmlScriptElement = document.create_element("script")?.dyn_into()?;
    script.set_id(config::MAPS_LOADER_ID);
    script.set_src(&config::maps_script_url());
    script.set_async(true);
    script.set_defer(true);

    let head = document.head().ok_or_else(|| JsValue::from_str("no <head>"))?;
    head.append_child(&script)?;
    info!("Injected maps script");
    Ok(())
}

fn set_global(target: &JsValue, key: &str, value: &JsValue) -> Result<(), JsValue> {
    web_sys::js_sys::Reflect::set(target, &JsValue::from_str(key), value).map(|_| ())
}

struct Inner {
    state: LoadState,
    waiters: Vec<oneshot::Sender<()>>,
    ready_hooks: Vec<Box<dyn FnOnce()>>,
}

/// Shared handle on the maps library. Cloning is cheap; all clones see the
/// same state, so whoever asks first triggers the load and everyone else
/// just waits.
#[derive(Clone)]
pub struct MapsHandle {
    inner: Rc<RefCell<Inner>>,
    injector: Rc<dyn ScriptInjector>,
    timer: Rc<dyn Timer>,
}

impl PartialEq for MapsHandle {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl MapsHandle {
    pub fn new(injector: Rc<dyn ScriptInjector>, timer: Rc<dyn Timer>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                state: LoadState::Unloaded,
                waiters: Vec::new(),
                ready_hooks: Vec::new(),
            })),
            injector,
            timer,
        }
    }

    pub fn browser() -> Self {
        Self::new(Rc::new(DomScriptInjector), Rc::new(GlooTimer))
    }

    pub fn state(&self) -> LoadState {
        self.inner.borrow().state
    }

    pub fn is_ready(&self) -> bool {
        self.state() == LoadState::Ready
    }

    /// Starts loading if nobody has yet. Safe to call from every trigger.
    pub fn load(&self) {
        if self.refresh() || self.state() == LoadState::Loading {
            return;
        }
        self.inner.borrow_mut().state = LoadState::Loading;

        let handle = self.clone();
        if let Err(e) = self.injector.inject(Box::new(move || handle.mark_ready())) {
            warn!("Could not inject maps script: {}", e);
            self.inner.borrow_mut().state = LoadState::Unloaded;
        }
    }

    /// Runs `hook` once the library is ready, right away if it already is.
    pub fn on_ready(&self, hook: impl FnOnce() + 'static) {
        if self.refresh() {
            hook();
        } else {
            self.inner.borrow_mut().ready_hooks.push(Box::new(hook));
        }
    }

    pub fn mark_ready(&self) {
        let (waiters, hooks) = {
            let mut inner = self.inner.borrow_mut();
            if inner.state == LoadState::Ready {
                return;
            }
            inner.state = LoadState::Ready;
            (
                std::mem::take(&mut inner.waiters),
                std::mem::take(&mut inner.ready_hooks),
            )
        };
        info!("Maps library ready");
        for waiter in waiters {
            let _ = waiter.send(());
        }
        for hook in hooks {
            hook();
        }
    }

    fn refresh(&self) -> bool {
        if !self.is_ready() && self.injector.library_present() {
            self.mark_ready();
        }
        self.is_ready()
    }

    /// Waits for the library, giving up quietly after the deadline. The
    /// caller finds out through the return value and carries on either way.
    pub async fn wait_ready(&self) -> bool {
        if self.refresh() {
            return true;
        }
        self.load();

        let (tx, mut rx) = oneshot::channel();
        self.inner.borrow_mut().waiters.push(tx);

        let mut waited = 0;
        while waited < READY_DEADLINE_MS {
            match future::select(&mut rx, self.timer.sleep(READY_POLL_MS)).await {
                Either::Left(_) => return self.is_ready(),
                Either::Right(_) => {
                    waited += READY_POLL_MS;
                    if self.refresh() {
                        return true;
                    }
                }
            }
        }
        warn!("Maps library not ready after {} ms, continuing without it", READY_DEADLINE_MS);
        drop(rx);
        self.inner.borrow_mut().waiters.retain(|tx| !tx.is_canceled());
        self.is_ready()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use std::cell::Cell;

    #[derive(Default)]
    struct FakeInjector {
        present: Cell<bool>,
        injections: Cell<usize>,
        fail: Cell<bool>,
        pending: RefCell<Option<Box<dyn FnOnce()>>>,
    }

    impl FakeInjector {
        fn fire(&self) {
            let pending = self.pending.borrow_mut().take();
            if let Some(on_ready) = pending {
                on_ready();
            }
        }
    }

    impl ScriptInjector for FakeInjector {
        fn library_present(&self) -> bool {
            self.present.get()
        }

        fn inject(&self, on_ready: Box<dyn FnOnce()>) -> Result<(), String> {
            if self.fail.get() {
                return Err("blocked".to_string());
            }
            self.injections.set(self.injections.get() + 1);
            *self.pending.borrow_mut() = Some(on_ready);
            Ok(())
        }
    }

    /// Resolves immediately; optionally fires the script callback on the
    /// n-th tick to simulate the network.
    struct TickTimer {
        ticks: Cell<u32>,
        fire_at: Option<u32>,
        injector: Rc<FakeInjector>,
    }

    impl Timer for TickTimer {
        fn sleep(&self, _ms: u32) -> LocalBoxFuture<'static, ()> {
            let tick = self.ticks.get() + 1;
            self.ticks.set(tick);
            if self.fire_at == Some(tick) {
                self.injector.fire();
            }
            future::ready(()).boxed_local()
        }
    }

    fn handle(fire_at: Option<u32>) -> (MapsHandle, Rc<FakeInjector>, Rc<TickTimer>) {
        let injector = Rc::new(FakeInjector::default());
        let timer = Rc::new(TickTimer {
            ticks: Cell::new(0),
            fire_at,
            injector: injector.clone(),
        });
        (MapsHandle::new(injector.clone(), timer.clone()), injector, timer)
    }

    #[test]
    fn load_injects_only_once() {
        let (maps, injector, _) = handle(None);
        maps.load();
        maps.load();
        maps.clone().load();
        assert_eq!(injector.injections.get(), 1);
        assert_eq!(maps.state(), LoadState::Loading);
    }

    #[test]
    fn callback_marks_ready_and_runs_hooks() {
        let (maps, injector, _) = handle(None);
        let hooked = Rc::new(Cell::new(0));
        {
            let hooked = hooked.clone();
            maps.on_ready(move || hooked.set(hooked.get() + 1));
        }
        maps.load();
        assert_eq!(hooked.get(), 0);

        injector.fire();
        assert!(maps.is_ready());
        assert_eq!(hooked.get(), 1);

        let hooked_late = Rc::new(Cell::new(false));
        {
            let hooked_late = hooked_late.clone();
            maps.on_ready(move || hooked_late.set(true));
        }
        assert!(hooked_late.get());
    }

    #[test]
    fn already_present_library_skips_injection() {
        let (maps, injector, _) = handle(None);
        injector.present.set(true);
        assert!(block_on(maps.wait_ready()));
        assert_eq!(injector.injections.get(), 0);
    }

    #[test]
    fn waiter_resolves_when_the_script_reports_in() {
        let (maps, _, timer) = handle(Some(3));
        assert!(block_on(maps.wait_ready()));
        assert_eq!(timer.ticks.get(), 3);
    }

    #[test]
    fn gives_up_softly_at_the_deadline() {
        let (maps, _, timer) = handle(None);
        assert!(!block_on(maps.wait_ready()));
        assert_eq!(timer.ticks.get(), READY_DEADLINE_MS / READY_POLL_MS);
        assert_eq!(maps.state(), LoadState::Loading);
    }

    #[test]
    fn timed_out_waiters_do_not_pile_up() {
        let (maps, _, _) = handle(None);
        for _ in 0..3 {
            assert!(!block_on(maps.wait_ready()));
        }
        assert!(maps.inner.borrow().waiters.is_empty());
    }

    #[test]
    fn failed_injection_allows_a_later_retry() {
        let (maps, injector, _) = handle(None);
        injector.fail.set(true);
        maps.load();
        assert_eq!(maps.state(), LoadState::Unloaded);

        injector.fail.set(false);
        maps.load();
        assert_eq!(injector.injections.get(), 1);
    }
}
