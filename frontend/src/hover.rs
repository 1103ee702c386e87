use gloo_events::EventListener;
use log::info;
use web_sys::{Document, Element, HtmlElement};

use crate::config::hover::{SCALE_HOVERED, SCALE_REST, SELECTOR};
use crate::dom;
use crate::error::BehaviorError;

pub fn hover_transform(hovered: bool) -> &'static str {
    if hovered {
        SCALE_HOVERED
    } else {
        SCALE_REST
    }
}

/// Scales the image inside a container while the pointer is over it.
pub struct HoverEffect {
    _listeners: Vec<EventListener>,
}

impl HoverEffect {
    pub fn attach(document: &Document) -> Result<Self, BehaviorError> {
        let containers: Vec<Element> = dom::query_all(document, SELECTOR)?;
        let mut listeners = Vec::with_capacity(containers.len() * 2);
        for container in &containers {
            for (event, hovered) in [("mouseenter", true), ("mouseleave", false)] {
                let container_for_img = container.clone();
                listeners.push(EventListener::new(container, event, move |_| {
                    if let Some(img) = dom::query_within::<HtmlElement>(&container_for_img, "img") {
                        dom::set_style(&img, "transform", hover_transform(hovered));
                    }
                }));
            }
        }

        info!("Hover effect attached to {} containers", containers.len());
        Ok(Self {
            _listeners: listeners,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enter_scales_up_and_leave_restores() {
        assert_eq!(hover_transform(true), "scale(1.05)");
        assert_eq!(hover_transform(false), "scale(1)");
    }
}
