#![cfg(target_arch = "wasm32")]

use gloo_timers::future::TimeoutFuture;
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use std::cell::RefCell;
use std::rc::Rc;

use web_sys::{Document, Element, Event, EventInit, HtmlElement, HtmlInputElement, Window};

use site_behaviors::contact_form::{ContactFormHandler, ContactSubmission};
use site_behaviors::counters::CounterAnimator;
use site_behaviors::fade_in::FadeInRevealer;
use site_behaviors::header::HeaderScrollState;
use site_behaviors::hero::HeroRevealer;
use site_behaviors::hover::HoverEffect;
use site_behaviors::lazy_images::LazyImageLoader;
use site_behaviors::motion::{ChangeSource, MotionPreference};
use site_behaviors::nav::{NavEvent, NavState, NavToggle};
use site_behaviors::parallax::ParallaxController;
use site_behaviors::smooth_scroll::SmoothScrollRouter;

wasm_bindgen_test_configure!(run_in_browser);

fn window() -> Window {
    web_sys::window().unwrap()
}

fn page(markup: &str) -> Document {
    let document = window().document().unwrap();
    document.body().unwrap().set_inner_html(markup);
    document
}

/// Scrolls the page and gives the scroll event plus one animation frame
/// time to run.
async fn scroll_and_settle(y: f64) {
    window().scroll_to_with_x_and_y(0.0, y);
    TimeoutFuture::new(150).await;
}

fn by_id(document: &Document, id: &str) -> Element {
    document.get_element_by_id(id).unwrap()
}

fn style(el: &Element, property: &str) -> String {
    el.dyn_ref::<HtmlElement>()
        .unwrap()
        .style()
        .get_property_value(property)
        .unwrap()
}

/// Dispatches a cancelable event and reports whether a handler cancelled it.
fn fire(el: &Element, event_type: &str) -> bool {
    let init = EventInit::new();
    init.set_cancelable(true);
    init.set_bubbles(true);
    let event = Event::new_with_event_init_dict(event_type, &init).unwrap();
    el.dispatch_event(&event).unwrap();
    event.default_prevented()
}

#[wasm_bindgen_test]
fn nav_toggle_opens_closes_and_reflects_aria() {
    let document = page(
        r##"<button id="hamburger"></button>
            <div id="nav-menu"><a class="nav-link" href="#about" id="about-link">About</a></div>"##,
    );
    let nav = NavToggle::attach(&document, &window()).unwrap().unwrap();
    let toggle = by_id(&document, "hamburger");
    let menu = by_id(&document, "nav-menu");
    assert_eq!(toggle.get_attribute("aria-expanded").as_deref(), Some("false"));

    fire(&toggle, "click");
    assert_eq!(nav.state(), NavState::Open);
    assert_eq!(toggle.get_attribute("aria-expanded").as_deref(), Some("true"));
    assert!(menu.class_list().contains("active"));

    fire(&toggle, "click");
    assert_eq!(nav.state(), NavState::Closed);
    assert_eq!(toggle.get_attribute("aria-expanded").as_deref(), Some("false"));

    fire(&toggle, "click");
    fire(&by_id(&document, "about-link"), "click");
    assert_eq!(nav.state(), NavState::Closed);
    assert!(!toggle.class_list().contains("active"));

    fire(&toggle, "click");
    nav.dispatch(NavEvent::Resized { width: 1280.0 });
    assert_eq!(nav.state(), NavState::Closed);
    assert!(!menu.class_list().contains("active"));
}

#[wasm_bindgen_test]
fn nav_toggle_skips_page_without_menu() {
    let document = page(r#"<button id="hamburger"></button>"#);
    assert!(NavToggle::attach(&document, &window()).unwrap().is_none());
}

#[wasm_bindgen_test]
fn smooth_scroll_only_intercepts_existing_targets() {
    let document = page(
        r##"<a id="top" href="#">Top</a>
            <a id="missing" href="#nowhere">Nowhere</a>
            <a id="present" href="#pricing">Pricing</a>
            <section id="pricing"></section>"##,
    );
    let _router = SmoothScrollRouter::attach(&document, &MotionPreference::detached()).unwrap();

    assert!(!fire(&by_id(&document, "top"), "click"));
    assert!(!fire(&by_id(&document, "missing"), "click"));
    assert!(fire(&by_id(&document, "present"), "click"));
}

#[wasm_bindgen_test]
fn header_is_not_marked_at_top_of_page() {
    let document = page(r#"<header class="site-header" data-scrolled="true"></header>"#);
    window().scroll_to_with_x_and_y(0.0, 0.0);
    let _header = HeaderScrollState::attach(&document, &window()).unwrap();
    assert!(document
        .query_selector(".site-header")
        .unwrap()
        .unwrap()
        .get_attribute("data-scrolled")
        .is_none());
}

#[wasm_bindgen_test(async)]
async fn complete_image_is_marked_without_touching_src() {
    let document = page(r#"<img id="img" class="lazy-load" style="display:block;width:20px;height:20px">"#);
    let _loader = LazyImageLoader::attach(&document).unwrap().unwrap();
    TimeoutFuture::new(300).await;

    let img = by_id(&document, "img");
    assert!(img.class_list().contains("loaded"));
    assert!(img.get_attribute("src").is_none());
}

#[wasm_bindgen_test]
fn parallax_without_sections_never_listens() {
    let document = page("<section></section>");
    let parallax = ParallaxController::attach(&document, &window(), &MotionPreference::detached()).unwrap();
    assert!(!parallax.is_listening());
}

#[wasm_bindgen_test]
fn reduced_motion_clears_parallax() {
    let document = page(
        r#"<section data-parallax="true"><div id="media" class="hero-image" style="transform: translateY(-40px)"></div></section>"#,
    );
    let motion = MotionPreference::detached();
    let parallax = ParallaxController::attach(&document, &window(), &motion).unwrap();
    assert!(parallax.is_listening());

    motion.emulate(true);
    assert!(!parallax.is_listening());
    assert_eq!(style(&by_id(&document, "media"), "transform"), "");

    window().dispatch_event(&Event::new("scroll").unwrap()).unwrap();
    assert_eq!(style(&by_id(&document, "media"), "transform"), "");
}

#[wasm_bindgen_test]
fn fade_in_hides_cards_until_motion_is_reduced() {
    let document = page(r#"<div id="card" class="service-card">Card</div>"#);
    let motion = MotionPreference::detached();
    let fade = FadeInRevealer::attach(&document, &motion).unwrap();
    let card = by_id(&document, "card");
    assert!(fade.is_observing());
    assert_eq!(style(&card, "opacity"), "0");
    assert_eq!(style(&card, "transform"), "translateY(40px)");

    motion.emulate(true);
    assert!(!fade.is_observing());
    assert_eq!(style(&card, "opacity"), "1");
    assert_eq!(style(&card, "transform"), "none");
    assert_eq!(style(&card, "transition"), "");

    motion.emulate(false);
    assert!(fade.is_observing());
    assert_eq!(style(&card, "opacity"), "0");
}

#[wasm_bindgen_test(async)]
async fn counter_counts_up_to_its_original_text() {
    let document = page(
        r#"<div class="stat-card"><strong id="money">$1,234.50</strong></div>
           <div class="stat-card"><strong id="na">N/A</strong></div>"#,
    );
    let counters = CounterAnimator::attach(&document, &window(), &MotionPreference::detached())
        .unwrap()
        .unwrap();
    let money = by_id(&document, "money");
    let na = by_id(&document, "na");

    assert_eq!(money.text_content().as_deref(), Some("$0.00"));
    assert_eq!(na.text_content().as_deref(), Some("N/A"));
    assert!(counters.is_animated(&na));

    counters.animate(&money);
    TimeoutFuture::new(2000).await;
    assert_eq!(money.text_content().as_deref(), Some("$1,234.50"));
    assert!(counters.is_animated(&money));
}

#[wasm_bindgen_test(async)]
async fn reduced_motion_mid_flight_restores_and_rearms_counter() {
    let document = page(r#"<div class="stat-card"><strong id="users">12,000+</strong></div>"#);
    let motion = MotionPreference::detached();
    let counters = CounterAnimator::attach(&document, &window(), &motion).unwrap().unwrap();
    let users = by_id(&document, "users");

    counters.animate(&users);
    TimeoutFuture::new(100).await;
    motion.emulate(true);
    assert_eq!(users.text_content().as_deref(), Some("12,000+"));
    assert!(!counters.is_animated(&users));

    // No frame may overwrite the restored text after the reset.
    TimeoutFuture::new(100).await;
    assert_eq!(users.text_content().as_deref(), Some("12,000+"));

    motion.emulate(false);
    assert_eq!(users.text_content().as_deref(), Some("0+"));
    assert_eq!(counters.spec_of(&users).unwrap().target, 12000.0);
}

#[wasm_bindgen_test]
fn counters_stay_literal_under_reduced_motion() {
    let document = page(r#"<div class="stat-card"><strong id="pct"> 98% </strong></div>"#);
    let motion = MotionPreference::detached();
    motion.emulate(true);
    let _counters = CounterAnimator::attach(&document, &window(), &motion).unwrap().unwrap();
    assert_eq!(by_id(&document, "pct").text_content().as_deref(), Some(" 98% "));
}

#[wasm_bindgen_test]
fn hover_scales_nested_image() {
    let document = page(r#"<div id="box" class="story-image"><img id="pic"></div>"#);
    let _hover = HoverEffect::attach(&document).unwrap();
    let container = by_id(&document, "box");
    let pic = by_id(&document, "pic");

    fire(&container, "mouseenter");
    assert_eq!(style(&pic, "transform"), "scale(1.05)");
    fire(&container, "mouseleave");
    assert_eq!(style(&pic, "transform"), "scale(1)");
}

#[wasm_bindgen_test(async)]
async fn hero_fades_in_after_delay() {
    let document = page(r#"<div id="hero" class="hero-content-overlay"></div>"#);
    let motion = MotionPreference::detached();
    let _hero = HeroRevealer::attach(&document, &motion).unwrap();
    let hero = by_id(&document, "hero");
    assert_eq!(style(&hero, "opacity"), "0");

    TimeoutFuture::new(400).await;
    assert_eq!(style(&hero, "opacity"), "1");

    motion.emulate(true);
    assert_eq!(style(&hero, "transition"), "none");
    assert_eq!(style(&hero, "transform"), "none");
}

#[wasm_bindgen_test(async)]
async fn header_is_marked_once_scrolled_past_threshold() {
    let document = page(
        r#"<header id="header" class="site-header"></header><div style="height:4000px"></div>"#,
    );
    scroll_and_settle(0.0).await;
    let _header = HeaderScrollState::attach(&document, &window()).unwrap();
    let header = by_id(&document, "header");

    scroll_and_settle(40.0).await;
    assert_eq!(header.get_attribute("data-scrolled").as_deref(), Some("true"));

    scroll_and_settle(10.0).await;
    assert!(header.get_attribute("data-scrolled").is_none());
    scroll_and_settle(0.0).await;
}

#[wasm_bindgen_test(async)]
async fn parallax_offsets_visible_media_and_skips_offscreen_sections() {
    let document = page(
        r#"<section data-parallax="true" style="height:600px">
               <div id="near" class="hero__media"></div>
           </section>
           <div style="height:5000px"></div>
           <section data-parallax="true" style="height:600px">
               <div id="far" class="hero-image-container"></div>
           </section>"#,
    );
    scroll_and_settle(0.0).await;
    let parallax =
        ParallaxController::attach(&document, &window(), &MotionPreference::detached()).unwrap();
    assert!(parallax.is_listening());

    let far = by_id(&document, "far");
    far.dyn_ref::<HtmlElement>()
        .unwrap()
        .style()
        .set_property("transform", "translateY(7px)")
        .unwrap();

    scroll_and_settle(120.0).await;
    assert_eq!(style(&by_id(&document, "near"), "transform"), "translateY(-60px)");
    assert_eq!(style(&far, "transform"), "translateY(7px)");

    drop(parallax);
    scroll_and_settle(0.0).await;
}

#[wasm_bindgen_test]
fn contact_form_submission_is_collected_confirmed_and_cleared() {
    let document = page(
        r#"<form id="contact-form">
               <input id="name" name="name">
               <input id="email" name="email">
               <input id="unnamed">
           </form>"#,
    );
    let confirmed: Rc<RefCell<Option<ContactSubmission>>> = Rc::new(RefCell::new(None));
    let sink = confirmed.clone();
    let _form = ContactFormHandler::attach_with(&document, move |submission| {
        *sink.borrow_mut() = Some(submission.clone());
    })
    .unwrap();

    let input = |id: &str| by_id(&document, id).dyn_into::<HtmlInputElement>().unwrap();
    input("name").set_value("Ada");
    input("email").set_value("ada@example.com");
    input("unnamed").set_value("ignored");

    assert!(fire(&by_id(&document, "contact-form"), "submit"));

    let submission = confirmed.borrow().clone().unwrap();
    assert_eq!(submission.fields.len(), 2);
    assert_eq!(submission.fields["name"], "Ada");
    assert_eq!(submission.fields["email"], "ada@example.com");
    assert_eq!(input("name").value(), "");
    assert_eq!(input("email").value(), "");
    assert_eq!(input("unnamed").value(), "");
}

#[wasm_bindgen_test]
fn contact_form_is_skipped_without_form() {
    let document = page("<form id=\"newsletter\"></form>");
    assert!(ContactFormHandler::attach_with(&document, |_| {}).is_none());
}

#[wasm_bindgen_test(async)]
async fn fade_in_keeps_one_timer_per_card() {
    let document = page(
        r#"<div id="a" class="feature-card-modern">A</div>
           <div id="b" class="benefit-item">B</div>"#,
    );
    let fade = FadeInRevealer::attach(&document, &MotionPreference::detached()).unwrap();
    TimeoutFuture::new(600).await;

    assert_eq!(style(&by_id(&document, "a"), "opacity"), "1");
    assert_eq!(style(&by_id(&document, "b"), "opacity"), "1");
    assert!(fade.scheduled_reveals() <= 2);

    fade.setup().unwrap();
    assert_eq!(fade.scheduled_reveals(), 0);
}

#[wasm_bindgen_test]
fn browser_media_query_reports_change_events() {
    let motion = MotionPreference::from_window(&window());
    assert_eq!(motion.change_source(), ChangeSource::EventTarget);
}
