use std::rc::Rc;

use gloo_events::{EventListener, EventListenerOptions};
use log::{debug, info};
use web_sys::{Document, Element, ScrollBehavior, ScrollIntoViewOptions, ScrollLogicalPosition};

use crate::config::smooth_scroll::ANCHOR_SELECTOR;
use crate::dom;
use crate::error::BehaviorError;
use crate::motion::MotionPreference;

/// Fragment id an in-page link points at. A bare `#` points nowhere.
pub fn fragment_target(href: &str) -> Option<&str> {
    href.strip_prefix('#').filter(|id| !id.is_empty())
}

pub fn scroll_behavior(reduced_motion: bool) -> ScrollBehavior {
    if reduced_motion {
        ScrollBehavior::Auto
    } else {
        ScrollBehavior::Smooth
    }
}

pub struct SmoothScrollRouter {
    _listeners: Vec<EventListener>,
}

impl SmoothScrollRouter {
    pub fn attach(document: &Document, motion: &Rc<MotionPreference>) -> Result<Self, BehaviorError> {
        let anchors: Vec<Element> = dom::query_all(document, ANCHOR_SELECTOR)?;
        let listeners = anchors
            .iter()
            .map(|anchor| {
                let anchor_for_click = anchor.clone();
                let document = document.clone();
                let motion = motion.clone();
                EventListener::new_with_options(
                    anchor,
                    "click",
                    EventListenerOptions::enable_prevent_default(),
                    move |event| {
                        let Some(href) = anchor_for_click.get_attribute("href") else {
                            return;
                        };
                        let Some(id) = fragment_target(&href) else {
                            return;
                        };
                        let Some(target) = document.get_element_by_id(id) else {
                            debug!("no element with id {}, leaving navigation alone", id);
                            return;
                        };
                        event.prevent_default();
                        let options = ScrollIntoViewOptions::new();
                        options.set_behavior(scroll_behavior(motion.is_reduced()));
                        options.set_block(ScrollLogicalPosition::Start);
                        target.scroll_into_view_with_scroll_into_view_options(&options);
                    },
                )
            })
            .collect();

        info!("Smooth scroll attached to {} anchors", anchors.len());
        Ok(Self {
            _listeners: listeners,
        })
    }
}
