use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{Element, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};

use crate::frontend::dom::DomError;

pub struct Crossing {
    pub target: Element,
    pub intersecting: bool,
}

/// `IntersectionObserver` bundled with the closure it calls back into.
/// Dropping it disconnects the observer before the closure is released.
pub struct VisibilityObserver {
    observer: IntersectionObserver,
    _callback: Closure<dyn FnMut(js_sys::Array, IntersectionObserver)>,
}

impl VisibilityObserver {
    pub fn new(
        threshold: f64,
        root_margin: Option<&str>,
        mut on_crossings: impl FnMut(Vec<Crossing>, &IntersectionObserver) + 'static,
    ) -> Result<Self, DomError> {
        let callback = Closure::<dyn FnMut(js_sys::Array, IntersectionObserver)>::new(
            move |entries: js_sys::Array, observer: IntersectionObserver| {
                let crossings = entries
                    .iter()
                    .filter_map(|entry| entry.dyn_into::<IntersectionObserverEntry>().ok())
                    .map(|entry| Crossing {
                        target: entry.target(),
                        intersecting: entry.is_intersecting(),
                    })
                    .collect();
                on_crossings(crossings, &observer);
            },
        );

        let options = IntersectionObserverInit::new();
        options.set_threshold(&JsValue::from_f64(threshold));
        if let Some(margin) = root_margin {
            options.set_root_margin(margin);
        }

        let observer =
            IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options)?;

        Ok(Self {
            observer,
            _callback: callback,
        })
    }

    pub fn observe(&self, target: &Element) {
        self.observer.observe(target);
    }
}

impl Drop for VisibilityObserver {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}
