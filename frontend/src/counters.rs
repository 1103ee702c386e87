//! Count-up animation for the numbers in `.stat-card strong`.
//!
//! Each counter is parsed once from its original text into a
//! [`CounterSpec`]; the animator keeps that record, the original text and
//! the completion flag in its own registry instead of on the element.

use std::cell::RefCell;
use std::rc::Rc;

use gloo_render::{request_animation_frame, AnimationFrame};
use log::{debug, info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use web_sys::{Document, Element, Window};

use crate::config::counters::{DURATION_MS, OBSERVER, SELECTOR};
use crate::dom;
use crate::error::BehaviorError;
use crate::motion::MotionPreference;
use crate::observer::VisibilityObserver;

static NUMERIC_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9,.]+").unwrap());

#[derive(Debug, Clone, PartialEq)]
pub struct CounterSpec {
    pub prefix: String,
    pub suffix: String,
    pub target: f64,
    pub decimals: usize,
}

impl CounterSpec {
    /// Text shown at `progress` (0.0..=1.0) through the animation.
    pub fn render(&self, progress: f64) -> String {
        let eased = ease_out_cubic(progress.clamp(0.0, 1.0));
        let current = self.target * eased;
        let value = if self.decimals == 0 {
            (current + 0.5).floor()
        } else {
            current
        };
        format!("{}{}{}", self.prefix, format_grouped(value, self.decimals), self.suffix)
    }

    pub fn zero_text(&self) -> String {
        self.render(0.0)
    }
}

/// `None` when the text has no number worth animating (no digits, or a
/// value of zero).
pub fn parse_counter(text: &str) -> Option<CounterSpec> {
    let found = NUMERIC_RUN.find(text)?;
    let literal = found.as_str();
    let target = parse_float_prefix(&literal.replace(',', ""))?;
    if target == 0.0 {
        return None;
    }
    let decimals = literal.split('.').nth(1).map(str::len).unwrap_or(0);

    Some(CounterSpec {
        prefix: text[..found.start()].to_string(),
        suffix: text[found.end()..].to_string(),
        target,
        decimals,
    })
}

/// Longest leading `digits[.digits]` run, parsed leniently the way browsers
/// parse numbers out of text ("1.2.3" reads as 1.2).
fn parse_float_prefix(s: &str) -> Option<f64> {
    let mut end = 0;
    let mut seen_digit = false;
    let mut seen_dot = false;
    for (i, c) in s.char_indices() {
        match c {
            '0'..='9' => seen_digit = true,
            '.' if !seen_dot => seen_dot = true,
            _ => break,
        }
        end = i + c.len_utf8();
    }
    if !seen_digit {
        return None;
    }
    s[..end].parse().ok()
}

pub fn ease_out_cubic(progress: f64) -> f64 {
    1.0 - (1.0 - progress).powi(3)
}

/// en-US style: comma thousands separators and exactly `decimals` fraction
/// digits. Halfway values round up, as `toFixed` and `Intl` do.
pub fn format_grouped(value: f64, decimals: usize) -> String {
    let factor = 10f64.powi(decimals as i32);
    let rounded = (value.abs() * factor + 0.5).floor() / factor;
    let fixed = format!("{:.*}", decimals, rounded);
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (fixed.as_str(), None),
    };

    let mut grouped = String::with_capacity(fixed.len() + int_part.len() / 3);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    if let Some(frac_part) = frac_part {
        grouped.push('.');
        grouped.push_str(frac_part);
    }

    let is_zero = fixed.chars().all(|c| c == '0' || c == '.');
    if value < 0.0 && !is_zero {
        grouped.insert(0, '-');
    }
    grouped
}

#[derive(Debug, Clone, PartialEq)]
enum Parsed {
    Pending,
    Static,
    Numeric(CounterSpec),
}

struct CounterSlot {
    element: Element,
    original: Option<String>,
    parsed: Parsed,
    animated: bool,
    frame: Option<AnimationFrame>,
}

pub struct CounterAnimator {
    window: Window,
    motion: Rc<MotionPreference>,
    slots: RefCell<Vec<CounterSlot>>,
    observer: RefCell<Option<VisibilityObserver>>,
}

impl CounterAnimator {
    pub fn attach(
        document: &Document,
        window: &Window,
        motion: &Rc<MotionPreference>,
    ) -> Result<Option<Rc<Self>>, BehaviorError> {
        let elements: Vec<Element> = dom::query_all(document, SELECTOR)?;
        if elements.is_empty() {
            debug!("no counters on page");
            return Ok(None);
        }

        let animator = Rc::new(Self {
            window: window.clone(),
            motion: motion.clone(),
            slots: RefCell::new(
                elements
                    .into_iter()
                    .map(|element| CounterSlot {
                        element,
                        original: None,
                        parsed: Parsed::Pending,
                        animated: false,
                        frame: None,
                    })
                    .collect(),
            ),
            observer: RefCell::new(None),
        });

        let weak = Rc::downgrade(&animator);
        let observer = VisibilityObserver::new(OBSERVER, move |entries, observer| {
            for entry in entries.iter().filter(|entry| entry.is_intersecting()) {
                let target = entry.target();
                if let Some(animator) = weak.upgrade() {
                    animator.animate(&target);
                }
                observer.unobserve(&target);
            }
        })?;
        *animator.observer.borrow_mut() = Some(observer);

        animator.start();

        let weak = Rc::downgrade(&animator);
        motion.watch(move |reduced| {
            if let Some(animator) = weak.upgrade() {
                if reduced {
                    animator.reset();
                } else {
                    animator.start();
                }
            }
        });

        info!("Counter animator attached ({} counters)", animator.slots.borrow().len());
        Ok(Some(animator))
    }

    /// Arms every counter that has not finished yet. With reduced motion it
    /// only records the original text.
    pub fn start(&self) {
        let count = self.slots.borrow().len();
        if self.motion.is_reduced() {
            let mut slots = self.slots.borrow_mut();
            for slot in slots.iter_mut() {
                snapshot(slot);
            }
            return;
        }
        for index in 0..count {
            self.prepare(index);
        }
    }

    /// Stops observing, cancels running animations and puts every counter
    /// back to its original text so a later `start` re-arms it.
    pub fn reset(&self) {
        if let Some(observer) = self.observer.borrow().as_ref() {
            observer.disconnect();
        }
        let mut slots = self.slots.borrow_mut();
        for slot in slots.iter_mut() {
            snapshot(slot);
            slot.frame.take();
            slot.element.set_text_content(slot.original.as_deref());
            slot.animated = false;
        }
    }

    /// Starts the count-up for `element`; no-op once it has finished.
    pub fn animate(self: &Rc<Self>, element: &Element) {
        let Some(index) = self.index_of(element) else {
            return;
        };
        let spec = {
            let slots = self.slots.borrow();
            let slot = &slots[index];
            if slot.animated || slot.frame.is_some() {
                return;
            }
            match &slot.parsed {
                Parsed::Numeric(spec) => spec.clone(),
                Parsed::Pending | Parsed::Static => return,
            }
        };
        let started_at = self.now();
        self.request_frame(index, Rc::new(spec), started_at);
    }

    pub fn is_animated(&self, element: &Element) -> bool {
        self.index_of(element)
            .map(|index| self.slots.borrow()[index].animated)
            .unwrap_or(false)
    }

    pub fn spec_of(&self, element: &Element) -> Option<CounterSpec> {
        let index = self.index_of(element)?;
        match &self.slots.borrow()[index].parsed {
            Parsed::Numeric(spec) => Some(spec.clone()),
            Parsed::Pending | Parsed::Static => None,
        }
    }

    fn prepare(&self, index: usize) {
        let mut slots = self.slots.borrow_mut();
        let slot = &mut slots[index];
        snapshot(slot);
        if slot.animated {
            return;
        }

        if slot.parsed == Parsed::Pending {
            let original = slot.original.as_deref().unwrap_or_default();
            slot.parsed = match parse_counter(original) {
                Some(spec) => Parsed::Numeric(spec),
                None => Parsed::Static,
            };
        }

        match &slot.parsed {
            Parsed::Numeric(spec) => {
                slot.element.set_text_content(Some(&spec.zero_text()));
                match self.observer.borrow().as_ref() {
                    Some(observer) => observer.observe(&slot.element),
                    None => warn!("counter observer missing, counter left at zero"),
                }
            }
            Parsed::Static | Parsed::Pending => {
                slot.animated = true;
            }
        }
    }

    fn request_frame(self: &Rc<Self>, index: usize, spec: Rc<CounterSpec>, started_at: f64) {
        let weak = Rc::downgrade(self);
        let frame = request_animation_frame(move |now| {
            let Some(animator) = weak.upgrade() else {
                return;
            };
            let progress = ((now - started_at) / DURATION_MS).clamp(0.0, 1.0);
            {
                let mut slots = animator.slots.borrow_mut();
                let slot = &mut slots[index];
                slot.frame.take();
                slot.element.set_text_content(Some(&spec.render(progress)));
                if progress >= 1.0 {
                    slot.animated = true;
                    return;
                }
            }
            animator.request_frame(index, spec, started_at);
        });
        self.slots.borrow_mut()[index].frame = Some(frame);
    }

    fn index_of(&self, element: &Element) -> Option<usize> {
        self.slots
            .borrow()
            .iter()
            .position(|slot| &slot.element == element)
    }

    fn now(&self) -> f64 {
        self.window
            .performance()
            .map(|performance| performance.now())
            .unwrap_or(0.0)
    }
}

fn snapshot(slot: &mut CounterSlot) {
    if slot.original.is_none() {
        let text = slot.element.text_content().unwrap_or_default();
        slot.original = Some(text.trim().to_string());
    }
}
