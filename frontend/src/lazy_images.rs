use gloo_events::EventListener;
use gloo_timers::callback::Timeout;
use log::{debug, info};
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlImageElement};

use crate::config::lazy_images::{
    DEFERRED_SRC_ATTR, FALLBACK_DELAY_MS, INITIAL_SWEEP_DELAY_MS, LOADED_CLASS, OBSERVER, SELECTOR,
};
use crate::dom;
use crate::error::BehaviorError;
use crate::observer::VisibilityObserver;

/// What to do with an image the first time it comes near the viewport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadPlan {
    /// Already decoded; only the marker class is missing.
    MarkLoaded,
    /// No active source yet: move the deferred source into `src`.
    Promote(String),
    /// A source is already in flight; mark after a short fallback delay
    /// in case the `load` event was missed.
    AwaitWithFallback,
    /// Nothing to trigger, wait for `load`.
    Await,
}

pub fn plan_load(complete: bool, active_src: &str, deferred_src: Option<&str>) -> LoadPlan {
    if complete {
        return LoadPlan::MarkLoaded;
    }
    if active_src.is_empty() {
        match deferred_src {
            Some(src) if !src.is_empty() => LoadPlan::Promote(src.to_string()),
            _ => LoadPlan::Await,
        }
    } else {
        LoadPlan::AwaitWithFallback
    }
}

pub struct LazyImageLoader {
    _observer: VisibilityObserver,
    _sweep: Timeout,
}

impl LazyImageLoader {
    pub fn attach(document: &Document) -> Result<Option<Self>, BehaviorError> {
        let images: Vec<HtmlImageElement> = dom::query_all(document, SELECTOR)?;
        if images.is_empty() {
            debug!("no {} images, lazy loader skipped", SELECTOR);
            return Ok(None);
        }

        let observer = VisibilityObserver::new(OBSERVER, |entries, observer| {
            for entry in entries.iter().filter(|entry| entry.is_intersecting()) {
                let target = entry.target();
                if let Some(img) = target.dyn_ref::<HtmlImageElement>() {
                    start_loading(img);
                }
                observer.unobserve(&target);
            }
        })?;
        for img in &images {
            observer.observe(img);
        }

        // Images that finished before the observer fired still get the marker.
        let sweep_images = images.clone();
        let sweep = Timeout::new(INITIAL_SWEEP_DELAY_MS, move || {
            for img in sweep_images.iter().filter(|img| img.complete()) {
                mark_loaded(img);
            }
        });

        info!("Lazy loader observing {} images", images.len());
        Ok(Some(Self {
            _observer: observer,
            _sweep: sweep,
        }))
    }
}

fn start_loading(img: &HtmlImageElement) {
    let deferred = img.get_attribute(DEFERRED_SRC_ATTR);
    let plan = plan_load(img.complete(), &img.src(), deferred.as_deref());
    debug!("lazy image plan: {:?}", plan);

    if plan == LoadPlan::MarkLoaded {
        mark_loaded(img);
        return;
    }

    let loaded_img = img.clone();
    EventListener::once(img, "load", move |_| mark_loaded(&loaded_img)).forget();

    match plan {
        LoadPlan::Promote(src) => img.set_src(&src),
        LoadPlan::AwaitWithFallback => {
            let img = img.clone();
            Timeout::new(FALLBACK_DELAY_MS, move || mark_loaded(&img)).forget();
        }
        LoadPlan::Await | LoadPlan::MarkLoaded => {}
    }
}

fn mark_loaded(img: &HtmlImageElement) {
    let _ = img.class_list().add_1(LOADED_CLASS);
}
