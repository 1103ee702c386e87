use std::cell::{Cell, RefCell};
use std::rc::Rc;

use gloo_events::EventListener;
use log::{debug, info};
use web_sys::{Document, Element, Window};

use crate::config::nav::{ACTIVE_CLASS, DESKTOP_MIN_WIDTH, LINK_SELECTOR, MENU_ID, TOGGLE_ID};
use crate::dom;
use crate::error::BehaviorError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NavState {
    #[default]
    Closed,
    Open,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NavEvent {
    ToggleActivated,
    LinkActivated,
    Resized { width: f64 },
}

impl NavState {
    pub fn apply(self, event: NavEvent) -> NavState {
        match event {
            NavEvent::ToggleActivated => match self {
                NavState::Closed => NavState::Open,
                NavState::Open => NavState::Closed,
            },
            NavEvent::LinkActivated => NavState::Closed,
            NavEvent::Resized { width } if width >= DESKTOP_MIN_WIDTH => NavState::Closed,
            NavEvent::Resized { .. } => self,
        }
    }

    pub fn is_open(self) -> bool {
        self == NavState::Open
    }

    pub fn aria_expanded(self) -> &'static str {
        if self.is_open() {
            "true"
        } else {
            "false"
        }
    }
}

/// Mobile menu toggle bound to `#hamburger` and `#nav-menu`.
pub struct NavToggle {
    toggle: Element,
    menu: Element,
    state: Cell<NavState>,
    listeners: RefCell<Vec<EventListener>>,
}

impl NavToggle {
    pub fn attach(document: &Document, window: &Window) -> Result<Option<Rc<Self>>, BehaviorError> {
        let (Some(toggle), Some(menu)) = (
            document.get_element_by_id(TOGGLE_ID),
            document.get_element_by_id(MENU_ID),
        ) else {
            debug!("no #{} / #{} pair, navigation toggle skipped", TOGGLE_ID, MENU_ID);
            return Ok(None);
        };

        let links: Vec<Element> = dom::collect(menu.query_selector_all(LINK_SELECTOR)?);
        toggle.set_attribute("aria-expanded", NavState::Closed.aria_expanded())?;

        let nav = Rc::new(Self {
            toggle,
            menu,
            state: Cell::new(NavState::Closed),
            listeners: RefCell::new(Vec::new()),
        });

        let mut listeners = Vec::with_capacity(links.len() + 2);
        {
            let weak = Rc::downgrade(&nav);
            listeners.push(EventListener::new(&nav.toggle, "click", move |_| {
                if let Some(nav) = weak.upgrade() {
                    nav.dispatch(NavEvent::ToggleActivated);
                }
            }));
        }
        for link in &links {
            let weak = Rc::downgrade(&nav);
            listeners.push(EventListener::new(link, "click", move |_| {
                if let Some(nav) = weak.upgrade() {
                    nav.dispatch(NavEvent::LinkActivated);
                }
            }));
        }
        {
            let weak = Rc::downgrade(&nav);
            let window_for_width = window.clone();
            listeners.push(EventListener::new(window, "resize", move |_| {
                if let Some(nav) = weak.upgrade() {
                    let width = dom::inner_width(&window_for_width);
                    nav.dispatch(NavEvent::Resized { width });
                }
            }));
        }
        *nav.listeners.borrow_mut() = listeners;

        info!("Navigation toggle attached ({} links)", links.len());
        Ok(Some(nav))
    }

    pub fn state(&self) -> NavState {
        self.state.get()
    }

    pub fn dispatch(&self, event: NavEvent) {
        let next = self.state.get().apply(event);
        self.state.set(next);
        self.render(next);
    }

    fn render(&self, state: NavState) {
        let _ = self.toggle.class_list().toggle_with_force(ACTIVE_CLASS, state.is_open());
        let _ = self.menu.class_list().toggle_with_force(ACTIVE_CLASS, state.is_open());
        let _ = self.toggle.set_attribute("aria-expanded", state.aria_expanded());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_alternates_between_open_and_closed() {
        let state = NavState::default();
        assert_eq!(state, NavState::Closed);

        let state = state.apply(NavEvent::ToggleActivated);
        assert_eq!(state, NavState::Open);
        assert_eq!(state.aria_expanded(), "true");

        let state = state.apply(NavEvent::ToggleActivated);
        assert_eq!(state, NavState::Closed);
        assert_eq!(state.aria_expanded(), "false");
    }

    #[test]
    fn link_activation_always_closes() {
        assert_eq!(NavState::Open.apply(NavEvent::LinkActivated), NavState::Closed);
        assert_eq!(NavState::Closed.apply(NavEvent::LinkActivated), NavState::Closed);
    }

    #[test]
    fn only_desktop_widths_close_on_resize() {
        let open = NavState::Open;
        assert_eq!(open.apply(NavEvent::Resized { width: 1023.0 }), NavState::Open);
        assert_eq!(open.apply(NavEvent::Resized { width: 1024.0 }), NavState::Closed);
        assert_eq!(open.apply(NavEvent::Resized { width: 1440.0 }), NavState::Closed);
        assert_eq!(
            NavState::Closed.apply(NavEvent::Resized { width: 375.0 }),
            NavState::Closed
        );
    }
}
