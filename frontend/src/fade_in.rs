use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use log::{debug, info, warn};
use web_sys::{Document, HtmlElement};

use crate::config::fade_in::{HIDDEN_OFFSET, OBSERVER, SELECTOR, STAGGER_MS, TRANSITION};
use crate::dom;
use crate::error::BehaviorError;
use crate::motion::MotionPreference;
use crate::observer::VisibilityObserver;

/// `(entry index, delay in ms)` for every intersecting entry of one observer
/// batch. The delay follows the entry's position in the batch, so cards that
/// appear together cascade instead of popping in at once.
pub fn reveal_schedule(intersecting: &[bool]) -> Vec<(usize, u32)> {
    intersecting
        .iter()
        .enumerate()
        .filter(|(_, hit)| **hit)
        .map(|(index, _)| (index, index as u32 * STAGGER_MS))
        .collect()
}

pub struct FadeInRevealer {
    elements: Vec<HtmlElement>,
    motion: Rc<MotionPreference>,
    observer: RefCell<Option<VisibilityObserver>>,
    /// One reveal timer slot per card, in `elements` order.
    pending: Rc<RefCell<Vec<Option<Timeout>>>>,
}

impl FadeInRevealer {
    pub fn attach(document: &Document, motion: &Rc<MotionPreference>) -> Result<Rc<Self>, BehaviorError> {
        let elements: Vec<HtmlElement> = dom::query_all(document, SELECTOR)?;
        let pending = (0..elements.len()).map(|_| None).collect();
        let revealer = Rc::new(Self {
            elements,
            motion: motion.clone(),
            observer: RefCell::new(None),
            pending: Rc::new(RefCell::new(pending)),
        });
        revealer.setup()?;

        let weak = Rc::downgrade(&revealer);
        motion.watch(move |reduced| {
            let Some(revealer) = weak.upgrade() else {
                return;
            };
            if reduced {
                revealer.teardown();
            } else if let Err(e) = revealer.setup() {
                warn!("fade-in setup failed: {}", e);
            }
        });

        info!("Fade-in attached ({} cards)", revealer.elements.len());
        Ok(revealer)
    }

    /// Rebuilds the whole reveal from scratch: hides every card and starts
    /// a fresh observer.
    pub fn setup(&self) -> Result<(), BehaviorError> {
        self.teardown();
        if self.elements.is_empty() || self.motion.is_reduced() {
            debug!("fade-in disabled");
            return Ok(());
        }

        let pending = self.pending.clone();
        let elements = self.elements.clone();
        let observer = VisibilityObserver::new(OBSERVER, move |entries, observer| {
            let hits: Vec<bool> = entries.iter().map(|e| e.is_intersecting()).collect();
            for (index, delay) in reveal_schedule(&hits) {
                let target = entries[index].target();
                let slot = elements.iter().position(|el| **el == target);
                if let Some(slot) = slot {
                    let el = elements[slot].clone();
                    pending.borrow_mut()[slot] = Some(Timeout::new(delay, move || {
                        dom::set_style(&el, "opacity", "1");
                        dom::set_style(&el, "transform", "translateY(0)");
                    }));
                }
                observer.unobserve(&target);
            }
        })?;

        for el in &self.elements {
            dom::set_style(el, "opacity", "0");
            dom::set_style(el, "transform", HIDDEN_OFFSET);
            dom::set_style(el, "transition", TRANSITION);
            observer.observe(el);
        }
        *self.observer.borrow_mut() = Some(observer);
        Ok(())
    }

    /// Stops observing and leaves every card in its final, visible state.
    pub fn teardown(&self) {
        self.observer.borrow_mut().take();
        for slot in self.pending.borrow_mut().iter_mut() {
            slot.take();
        }
        for el in &self.elements {
            dom::set_style(el, "opacity", "1");
            dom::set_style(el, "transform", "none");
            dom::clear_style(el, "transition");
        }
    }

    pub fn is_observing(&self) -> bool {
        self.observer.borrow().is_some()
    }

    /// Reveal timers currently held, fired or not. Never more than the
    /// number of cards.
    pub fn scheduled_reveals(&self) -> usize {
        self.pending.borrow().iter().filter(|slot| slot.is_some()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_reveals_cascade_in_order() {
        assert_eq!(
            reveal_schedule(&[true, true, true]),
            vec![(0, 0), (1, 100), (2, 200)]
        );
    }

    #[test]
    fn delay_counts_position_in_batch_not_hits() {
        assert_eq!(reveal_schedule(&[false, true, false, true]), vec![(1, 100), (3, 300)]);
    }

    #[test]
    fn empty_batch_schedules_nothing() {
        assert!(reveal_schedule(&[]).is_empty());
        assert!(reveal_schedule(&[false, false]).is_empty());
    }
}
