//! Page behaviors for the marketing site: navigation, scrolling, reveal
//! animations, lazy images and the contact form, attached to the static
//! markup once the document is ready.

use std::cell::RefCell;
use std::rc::Rc;

use gloo_events::EventListener;
use log::{info, warn};

pub mod config;
pub mod contact_form;
pub mod counters;
pub mod dom;
pub mod error;
pub mod fade_in;
pub mod header;
pub mod hero;
pub mod hover;
pub mod lazy_images;
pub mod motion;
pub mod nav;
pub mod observer;
pub mod parallax;
pub mod smooth_scroll;

use contact_form::ContactFormHandler;
use counters::CounterAnimator;
use error::BehaviorError;
use fade_in::FadeInRevealer;
use header::HeaderScrollState;
use hero::HeroRevealer;
use hover::HoverEffect;
use lazy_images::LazyImageLoader;
use motion::MotionPreference;
use nav::NavToggle;
use parallax::ParallaxController;
use smooth_scroll::SmoothScrollRouter;

/// Everything attached to the current page. Dropping it removes every
/// listener, observer, timer and pending frame.
pub struct Behaviors {
    pub motion: Rc<MotionPreference>,
    pub nav: Option<Rc<NavToggle>>,
    pub smooth_scroll: Option<SmoothScrollRouter>,
    pub header: Option<HeaderScrollState>,
    pub lazy_images: Option<LazyImageLoader>,
    pub parallax: Option<Rc<ParallaxController>>,
    pub fade_in: Option<Rc<FadeInRevealer>>,
    pub counters: Option<Rc<CounterAnimator>>,
    pub hover: Option<HoverEffect>,
    pub contact_form: Option<ContactFormHandler>,
    pub hero: Option<Rc<HeroRevealer>>,
}

thread_local! {
    static ATTACHED: RefCell<Option<Behaviors>> = RefCell::new(None);
}

/// Attaches every component to the current document. A component that
/// fails to attach is logged and skipped; the others still run.
pub fn attach_all() -> Result<Behaviors, BehaviorError> {
    let window = dom::window()?;
    let document = dom::document()?;
    let motion = MotionPreference::from_window(&window);

    Ok(Behaviors {
        nav: report("navigation toggle", NavToggle::attach(&document, &window)).flatten(),
        smooth_scroll: report("smooth scroll", SmoothScrollRouter::attach(&document, &motion)),
        header: HeaderScrollState::attach(&document, &window),
        lazy_images: report("lazy images", LazyImageLoader::attach(&document)).flatten(),
        parallax: report("parallax", ParallaxController::attach(&document, &window, &motion)),
        fade_in: report("fade-in", FadeInRevealer::attach(&document, &motion)),
        counters: report("counters", CounterAnimator::attach(&document, &window, &motion)).flatten(),
        hover: report("hover effect", HoverEffect::attach(&document)),
        contact_form: ContactFormHandler::attach(&document, &window),
        hero: HeroRevealer::attach(&document, &motion),
        motion,
    })
}

fn report<T>(component: &str, result: Result<T, BehaviorError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("{} not attached: {}", component, e);
            None
        }
    }
}

/// Attaches once the DOM is parsed and keeps the result for the page's lifetime.
pub fn start() {
    let document = match dom::document() {
        Ok(document) => document,
        Err(e) => {
            warn!("site behaviors not started: {}", e);
            return;
        }
    };

    if document.ready_state() == "loading" {
        EventListener::once(&document, "DOMContentLoaded", |_| install()).forget();
    } else {
        install();
    }
}

/// Tears down everything `start` attached.
pub fn stop() {
    ATTACHED.with(|attached| attached.borrow_mut().take());
    info!("Site behaviors detached");
}

fn install() {
    match attach_all() {
        Ok(behaviors) => {
            info!("Site behaviors attached");
            ATTACHED.with(|attached| *attached.borrow_mut() = Some(behaviors));
        }
        Err(e) => warn!("site behaviors not attached: {}", e),
    }
}
