use std::cell::RefCell;
use std::rc::Rc;

use gloo_events::EventListener;
use gloo_render::{request_animation_frame, AnimationFrame};
use log::{debug, info};
use web_sys::{Document, Element, HtmlElement, Window};

use crate::config::parallax::{MEDIA_SELECTOR, SECTION_SELECTOR, SPEED};
use crate::dom;
use crate::error::BehaviorError;
use crate::motion::MotionPreference;

pub fn parallax_offset(scroll_y: f64) -> f64 {
    let offset = -(scroll_y * SPEED);
    if offset == 0.0 {
        0.0 // avoid "-0px"
    } else {
        offset
    }
}

pub fn intersects_viewport(top: f64, bottom: f64, viewport_height: f64) -> bool {
    top < viewport_height && bottom > 0.0
}

pub fn translate_y(offset: f64) -> String {
    format!("translateY({}px)", offset)
}

struct ParallaxSection {
    section: Element,
    media: Option<HtmlElement>,
}

/// Scroll-linked vertical offset for `[data-parallax="true"]` sections.
///
/// Scroll events only ever queue one animation frame at a time; the frame
/// slot is emptied when the frame runs, so bursts of scroll events collapse
/// into a single recomputation per rendered frame.
pub struct ParallaxController {
    window: Window,
    sections: Vec<ParallaxSection>,
    motion: Rc<MotionPreference>,
    scroll_listener: RefCell<Option<EventListener>>,
    pending_frame: RefCell<Option<AnimationFrame>>,
}

impl ParallaxController {
    pub fn attach(
        document: &Document,
        window: &Window,
        motion: &Rc<MotionPreference>,
    ) -> Result<Rc<Self>, BehaviorError> {
        let sections: Vec<ParallaxSection> = dom::query_all::<Element>(document, SECTION_SELECTOR)?
            .into_iter()
            .map(|section| ParallaxSection {
                media: dom::query_within(&section, MEDIA_SELECTOR),
                section,
            })
            .collect();

        let controller = Rc::new(Self {
            window: window.clone(),
            sections,
            motion: motion.clone(),
            scroll_listener: RefCell::new(None),
            pending_frame: RefCell::new(None),
        });
        controller.setup();

        let weak = Rc::downgrade(&controller);
        motion.watch(move |reduced| {
            if let Some(controller) = weak.upgrade() {
                if reduced {
                    controller.teardown();
                } else {
                    controller.setup();
                }
            }
        });

        info!("Parallax attached ({} sections)", controller.sections.len());
        Ok(controller)
    }

    pub fn setup(self: &Rc<Self>) {
        self.teardown();
        if self.sections.is_empty() || self.motion.is_reduced() {
            debug!("parallax disabled");
            return;
        }

        let weak = Rc::downgrade(self);
        let listener = EventListener::new(&self.window, "scroll", move |_| {
            if let Some(controller) = weak.upgrade() {
                controller.schedule();
            }
        });
        *self.scroll_listener.borrow_mut() = Some(listener);
        self.schedule();
    }

    pub fn teardown(&self) {
        self.scroll_listener.borrow_mut().take();
        self.pending_frame.borrow_mut().take();
        for media in self.sections.iter().filter_map(|s| s.media.as_ref()) {
            dom::clear_style(media, "transform");
        }
    }

    pub fn is_listening(&self) -> bool {
        self.scroll_listener.borrow().is_some()
    }

    fn schedule(self: &Rc<Self>) {
        if self.pending_frame.borrow().is_some() {
            return;
        }
        let weak = Rc::downgrade(self);
        let frame = request_animation_frame(move |_| {
            if let Some(controller) = weak.upgrade() {
                controller.pending_frame.borrow_mut().take();
                controller.step();
            }
        });
        *self.pending_frame.borrow_mut() = Some(frame);
    }

    fn step(&self) {
        let offset = parallax_offset(dom::scroll_y(&self.window));
        let viewport_height = dom::inner_height(&self.window);
        for ParallaxSection { section, media } in &self.sections {
            let rect = section.get_bounding_client_rect();
            if !intersects_viewport(rect.top(), rect.bottom(), viewport_height) {
                continue;
            }
            if let Some(media) = media {
                dom::set_style(media, "transform", &translate_y(offset));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_moves_at_half_speed_upwards() {
        assert_eq!(parallax_offset(200.0), -100.0);
        assert_eq!(parallax_offset(123.0), -61.5);
    }

    #[test]
    fn top_of_page_has_no_negative_zero() {
        assert_eq!(translate_y(parallax_offset(0.0)), "translateY(0px)");
        assert_eq!(translate_y(parallax_offset(300.0)), "translateY(-150px)");
    }

    #[test]
    fn viewport_check_excludes_edges() {
        let height = 800.0;
        assert!(intersects_viewport(-100.0, 200.0, height));
        assert!(intersects_viewport(799.0, 1400.0, height));
        assert!(!intersects_viewport(800.0, 1400.0, height));
        assert!(!intersects_viewport(-600.0, 0.0, height));
    }
}
