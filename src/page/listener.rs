use crate::error::{NavError, NavResult};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};

/// A DOM event listener that remembers its callback so it can be removed again.
///
/// The callback is handed to the JS GC (`into_js_value`), so detaching from
/// inside the listener itself is fine.
pub(crate) struct ListenerHandle {
    target: web_sys::EventTarget,
    event: &'static str,
    callback: JsValue,
}

impl ListenerHandle {
    pub(crate) fn attach<E, F>(
        target: &web_sys::EventTarget,
        event: &'static str,
        mut handler: F,
    ) -> NavResult<Self>
    where
        E: JsCast + 'static,
        F: FnMut(E) + 'static,
    {
        let callback = Closure::<dyn FnMut(web_sys::Event)>::new(move |ev: web_sys::Event| {
            handler(ev.unchecked_into::<E>());
        })
        .into_js_value();

        target
            .add_event_listener_with_callback(event, callback.unchecked_ref())
            .map_err(|e| NavError::dom_js("add listener", e))?;

        Ok(Self {
            target: target.clone(),
            event,
            callback,
        })
    }

    pub(crate) fn detach(self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.event, self.callback.unchecked_ref());
    }
}
