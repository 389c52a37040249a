//! Browser timers and session storage

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use crate::persistence::{KeyValueStore, PersistenceError};

fn js_error(err: JsValue) -> PersistenceError {
    PersistenceError::Backend(format!("{:?}", err))
}

/// `window.sessionStorage` as a key-value backend
#[derive(Debug, Clone)]
pub struct SessionStorage {
    storage: Option<web_sys::Storage>,
}

impl SessionStorage {
    pub fn new() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.session_storage().ok())
            .flatten();
        if storage.is_none() {
            log::warn!("sessionStorage unavailable, settings will not persist");
        }
        Self { storage }
    }

    fn storage(&self) -> Result<&web_sys::Storage, PersistenceError> {
        self.storage.as_ref().ok_or(PersistenceError::Unavailable)
    }
}

impl Default for SessionStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueStore for SessionStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        self.storage()?.get_item(key).map_err(js_error)
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), PersistenceError> {
        self.storage()?.set_item(key, value).map_err(js_error)
    }

    fn remove_item(&mut self, key: &str) -> Result<(), PersistenceError> {
        self.storage()?.remove_item(key).map_err(js_error)
    }
}

/// Repeating `setInterval` callback, cleared on drop
pub struct Interval {
    handle: i32,
    closure: Option<Closure<dyn FnMut()>>,
}

impl Interval {
    pub fn start(period_ms: i32, callback: impl FnMut() + 'static) -> Option<Self> {
        let window = web_sys::window()?;
        let closure = Closure::<dyn FnMut()>::new(callback);
        let handle = window
            .set_interval_with_callback_and_timeout_and_arguments_0(
                closure.as_ref().unchecked_ref(),
                period_ms,
            )
            .ok()?;
        Some(Self {
            handle,
            closure: Some(closure),
        })
    }
}

impl Drop for Interval {
    fn drop(&mut self) {
        if let Some(window) = web_sys::window() {
            window.clear_interval_with_handle(self.handle);
        }
        // The interval may be dropped from inside its own callback, so the
        // closure is released on a later turn of the event loop.
        if let Some(closure) = self.closure.take() {
            set_timeout(0, move || drop(closure));
        }
    }
}

/// One-shot `setTimeout` callback; there is no way to cancel it
pub fn set_timeout(delay_ms: i32, callback: impl FnOnce() + 'static) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let closure = Closure::once_into_js(callback);
    if window
        .set_timeout_with_callback_and_timeout_and_arguments_0(closure.unchecked_ref(), delay_ms)
        .is_err()
    {
        log::warn!("setTimeout failed");
    }
}
