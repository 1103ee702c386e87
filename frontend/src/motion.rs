//! Reduced-motion preference shared by every animated component.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use gloo_events::EventListener;
use log::{debug, info};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::js_sys::Reflect;
use web_sys::{MediaQueryList, Window};

use crate::config::REDUCED_MOTION_QUERY;

pub type MotionCallback = Rc<dyn Fn(bool)>;

/// How preference flips reach us.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeSource {
    /// `addEventListener("change")` on the media query.
    EventTarget,
    /// Older engines where the media query is not an event target and only
    /// offers `addListener`.
    LegacyListener,
    /// No media query, or no way to subscribe: flips are never seen.
    Unavailable,
}

pub fn pick_change_source(
    has_query: bool,
    has_add_event_listener: bool,
    has_add_listener: bool,
) -> ChangeSource {
    match (has_query, has_add_event_listener, has_add_listener) {
        (false, _, _) => ChangeSource::Unavailable,
        (true, true, _) => ChangeSource::EventTarget,
        (true, false, true) => ChangeSource::LegacyListener,
        (true, false, false) => ChangeSource::Unavailable,
    }
}

enum ChangeSubscription {
    Event(EventListener),
    Legacy {
        query: MediaQueryList,
        callback: Closure<dyn FnMut(JsValue)>,
    },
}

impl Drop for ChangeSubscription {
    fn drop(&mut self) {
        if let ChangeSubscription::Legacy { query, callback } = self {
            let _ = query.remove_listener_with_opt_callback(Some(callback.as_ref().unchecked_ref()));
        }
    }
}

fn has_method(target: &JsValue, name: &str) -> bool {
    Reflect::get(target, &JsValue::from_str(name))
        .map(|value| value.is_function())
        .unwrap_or(false)
}

/// Owns the `prefers-reduced-motion` media query and the list of components
/// that want to hear about flips. Dropping it detaches the change listener.
pub struct MotionPreference {
    query: Option<MediaQueryList>,
    emulated: Cell<Option<bool>>,
    subscribers: RefCell<Vec<MotionCallback>>,
    subscription: RefCell<Option<ChangeSubscription>>,
    source: Cell<ChangeSource>,
}

impl MotionPreference {
    pub fn from_window(window: &Window) -> Rc<Self> {
        let query = window.match_media(REDUCED_MOTION_QUERY).ok().flatten();
        if query.is_none() {
            info!("matchMedia unavailable, motion preference fixed to full motion");
        }

        let preference = Rc::new(Self::with_query(query));
        let Some(query) = preference.query.clone() else {
            return preference;
        };

        let source = pick_change_source(
            true,
            has_method(&query, "addEventListener"),
            has_method(&query, "addListener"),
        );
        let subscription = match source {
            ChangeSource::EventTarget => {
                let weak = Rc::downgrade(&preference);
                Some(ChangeSubscription::Event(EventListener::new(&query, "change", move |_| {
                    if let Some(preference) = weak.upgrade() {
                        preference.on_platform_change();
                    }
                })))
            }
            ChangeSource::LegacyListener => {
                let weak = Rc::downgrade(&preference);
                let callback = Closure::wrap(Box::new(move |_: JsValue| {
                    if let Some(preference) = weak.upgrade() {
                        preference.on_platform_change();
                    }
                }) as Box<dyn FnMut(JsValue)>);
                let _ = query.add_listener_with_opt_callback(Some(callback.as_ref().unchecked_ref()));
                Some(ChangeSubscription::Legacy { query, callback })
            }
            ChangeSource::Unavailable => {
                info!("media query cannot be watched, motion preference read once");
                None
            }
        };
        *preference.subscription.borrow_mut() = subscription;
        preference.source.set(source);
        preference
    }

    fn on_platform_change(&self) {
        self.emulated.set(None);
        let reduced = self.is_reduced();
        debug!("motion preference changed, reduced = {}", reduced);
        self.dispatch(reduced);
    }

    /// A preference with no platform signal behind it. Always reports full
    /// motion until [`MotionPreference::emulate`] says otherwise.
    pub fn detached() -> Rc<Self> {
        Rc::new(Self::with_query(None))
    }

    fn with_query(query: Option<MediaQueryList>) -> Self {
        Self {
            query,
            emulated: Cell::new(None),
            subscribers: RefCell::new(Vec::new()),
            subscription: RefCell::new(None),
            source: Cell::new(ChangeSource::Unavailable),
        }
    }

    pub fn change_source(&self) -> ChangeSource {
        self.source.get()
    }

    pub fn is_reduced(&self) -> bool {
        if let Some(reduced) = self.emulated.get() {
            return reduced;
        }
        self.query.as_ref().map(|q| q.matches()).unwrap_or(false)
    }

    pub fn watch<F>(&self, callback: F)
    where
        F: Fn(bool) + 'static,
    {
        self.subscribers.borrow_mut().push(Rc::new(callback));
    }

    /// Overrides the platform value and notifies subscribers as if the
    /// preference had flipped. The next real `change` event clears it.
    pub fn emulate(&self, reduced: bool) {
        self.emulated.set(Some(reduced));
        self.dispatch(reduced);
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.borrow().len()
    }

    fn dispatch(&self, reduced: bool) {
        // Snapshot so a subscriber may call `watch` while being notified.
        let subscribers: Vec<MotionCallback> = self.subscribers.borrow().clone();
        for subscriber in subscribers {
            subscriber(reduced);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detached_preference_defaults_to_full_motion() {
        let preference = MotionPreference::detached();
        assert!(!preference.is_reduced());
        assert_eq!(preference.subscriber_count(), 0);
    }

    #[test]
    fn event_target_is_preferred_over_legacy_listener() {
        assert_eq!(pick_change_source(true, true, true), ChangeSource::EventTarget);
        assert_eq!(pick_change_source(true, true, false), ChangeSource::EventTarget);
    }

    #[test]
    fn legacy_listener_covers_older_engines() {
        assert_eq!(pick_change_source(true, false, true), ChangeSource::LegacyListener);
    }

    #[test]
    fn nothing_to_watch_without_query_or_methods() {
        assert_eq!(pick_change_source(false, true, true), ChangeSource::Unavailable);
        assert_eq!(pick_change_source(true, false, false), ChangeSource::Unavailable);
        assert_eq!(MotionPreference::detached().change_source(), ChangeSource::Unavailable);
    }

    #[test]
    fn emulated_flip_reaches_subscribers_in_order() {
        let preference = MotionPreference::detached();
        let seen = Rc::new(RefCell::new(Vec::new()));
        for id in 0..2 {
            let seen = seen.clone();
            preference.watch(move |reduced| seen.borrow_mut().push((id, reduced)));
        }

        preference.emulate(true);
        assert!(preference.is_reduced());
        preference.emulate(false);
        assert!(!preference.is_reduced());

        assert_eq!(
            *seen.borrow(),
            vec![(0, true), (1, true), (0, false), (1, false)]
        );
    }

    #[test]
    fn subscriber_may_register_during_dispatch() {
        let preference = MotionPreference::detached();
        let late_calls = Rc::new(Cell::new(0));
        {
            let preference_for_cb = Rc::downgrade(&preference);
            let late_calls = late_calls.clone();
            preference.watch(move |_| {
                if let Some(preference) = preference_for_cb.upgrade() {
                    let late_calls = late_calls.clone();
                    preference.watch(move |_| late_calls.set(late_calls.get() + 1));
                }
            });
        }

        preference.emulate(true);
        assert_eq!(late_calls.get(), 0);
        assert_eq!(preference.subscriber_count(), 2);
        preference.emulate(false);
        assert_eq!(late_calls.get(), 1);
    }
}
