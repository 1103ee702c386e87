use gloo_events::EventListener;
use log::{debug, info};
use web_sys::{Document, Element, Window};

use crate::config::header::{SCROLLED_ATTR, SCROLL_THRESHOLD, SELECTOR};
use crate::dom;

pub fn is_scrolled(offset: f64) -> bool {
    offset > SCROLL_THRESHOLD
}

/// Keeps `data-scrolled` on `.site-header` in sync with the scroll offset.
pub struct HeaderScrollState {
    _listener: EventListener,
}

impl HeaderScrollState {
    pub fn attach(document: &Document, window: &Window) -> Option<Self> {
        let Some(header) = dom::query_first::<Element>(document, SELECTOR) else {
            debug!("no {} on page, header scroll state skipped", SELECTOR);
            return None;
        };

        sync(&header, window);
        let window_for_offset = window.clone();
        let listener = EventListener::new(window, "scroll", move |_| {
            sync(&header, &window_for_offset);
        });

        info!("Header scroll state attached");
        Some(Self { _listener: listener })
    }
}

fn sync(header: &Element, window: &Window) {
    if is_scrolled(dom::scroll_y(window)) {
        let _ = header.set_attribute(SCROLLED_ATTR, "true");
    } else {
        let _ = header.remove_attribute(SCROLLED_ATTR);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_is_exclusive() {
        assert!(!is_scrolled(0.0));
        assert!(!is_scrolled(16.0));
        assert!(is_scrolled(16.5));
        assert!(is_scrolled(900.0));
    }
}
