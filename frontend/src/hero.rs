use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use log::{debug, info};
use web_sys::{Document, HtmlElement};

use crate::config::hero::{HIDDEN_OFFSET, REVEAL_DELAY_MS, SELECTOR, TRANSITION};
use crate::dom;
use crate::motion::MotionPreference;

pub struct HeroRevealer {
    overlay: HtmlElement,
    motion: Rc<MotionPreference>,
    pending: RefCell<Option<Timeout>>,
}

impl HeroRevealer {
    pub fn attach(document: &Document, motion: &Rc<MotionPreference>) -> Option<Rc<Self>> {
        let Some(overlay) = dom::query_first::<HtmlElement>(document, SELECTOR) else {
            debug!("no {} on page", SELECTOR);
            return None;
        };

        let revealer = Rc::new(Self {
            overlay,
            motion: motion.clone(),
            pending: RefCell::new(None),
        });
        revealer.reveal();

        let weak = Rc::downgrade(&revealer);
        motion.watch(move |_| {
            if let Some(revealer) = weak.upgrade() {
                revealer.reveal();
            }
        });

        info!("Hero revealer attached");
        Some(revealer)
    }

    /// Fades the overlay in, or shows it at once under reduced motion.
    /// Calling it again cancels a reveal that has not landed yet.
    pub fn reveal(&self) {
        self.pending.borrow_mut().take();
        let overlay = &self.overlay;

        if self.motion.is_reduced() {
            dom::set_style(overlay, "opacity", "1");
            dom::set_style(overlay, "transform", "none");
            dom::set_style(overlay, "transition", "none");
            return;
        }

        dom::set_style(overlay, "opacity", "0");
        dom::set_style(overlay, "transform", HIDDEN_OFFSET);
        dom::set_style(overlay, "transition", TRANSITION);

        let overlay = overlay.clone();
        let timeout = Timeout::new(REVEAL_DELAY_MS, move || {
            dom::set_style(&overlay, "opacity", "1");
            dom::set_style(&overlay, "transform", "translateY(0)");
        });
        *self.pending.borrow_mut() = Some(timeout);
    }
}
