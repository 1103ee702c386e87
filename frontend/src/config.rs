use log::Level;

#[cfg(debug_assertions)]
pub fn log_level() -> Level {
    Level::Debug // Verbose while developing locally
}

#[cfg(not(debug_assertions))]
pub fn log_level() -> Level {
    Level::Info
}

pub const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";

/// Options handed to an `IntersectionObserver`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObserverConfig {
    pub threshold: f64,
    pub root_margin: &'static str,
}

pub mod nav {
    pub const TOGGLE_ID: &str = "hamburger";
    pub const MENU_ID: &str = "nav-menu";
    pub const LINK_SELECTOR: &str = ".nav-link";
    pub const ACTIVE_CLASS: &str = "active";
    pub const DESKTOP_MIN_WIDTH: f64 = 1024.0;
}

pub mod smooth_scroll {
    pub const ANCHOR_SELECTOR: &str = "a[href^=\"#\"]";
}

pub mod header {
    pub const SELECTOR: &str = ".site-header";
    pub const SCROLLED_ATTR: &str = "data-scrolled";
    pub const SCROLL_THRESHOLD: f64 = 16.0;
}

pub mod lazy_images {
    use super::ObserverConfig;

    pub const SELECTOR: &str = ".lazy-load";
    pub const DEFERRED_SRC_ATTR: &str = "data-src";
    pub const LOADED_CLASS: &str = "loaded";
    pub const FALLBACK_DELAY_MS: u32 = 100;
    pub const INITIAL_SWEEP_DELAY_MS: u32 = 100;
    pub const OBSERVER: ObserverConfig = ObserverConfig {
        threshold: 0.01,
        root_margin: "50px 0px",
    };
}

pub mod parallax {
    pub const SECTION_SELECTOR: &str = "[data-parallax=\"true\"]";
    pub const MEDIA_SELECTOR: &str = ".hero__media, .hero-image-container, .hero-image";
    pub const SPEED: f64 = 0.5;
}

pub mod fade_in {
    use super::ObserverConfig;

    pub const SELECTOR: &str = ".feature-card-modern, .service-card, .marketing-card, \
        .solution-card, .challenge-item, .value-card-modern, \
        .benefit-item, .contact-info-card";
    pub const HIDDEN_OFFSET: &str = "translateY(40px)";
    pub const TRANSITION: &str = "opacity 0.8s cubic-bezier(0.4, 0, 0.2, 1), \
        transform 0.8s cubic-bezier(0.4, 0, 0.2, 1)";
    pub const STAGGER_MS: u32 = 100;
    pub const OBSERVER: ObserverConfig = ObserverConfig {
        threshold: 0.15,
        root_margin: "0px 0px -80px 0px",
    };
}

pub mod counters {
    use super::ObserverConfig;

    pub const SELECTOR: &str = ".stat-card strong";
    pub const DURATION_MS: f64 = 1600.0;
    pub const OBSERVER: ObserverConfig = ObserverConfig {
        threshold: 0.55,
        root_margin: "0px 0px -15% 0px",
    };
}

pub mod hover {
    pub const SELECTOR: &str = ".service-image, .solution-image-half, .story-image";
    pub const SCALE_HOVERED: &str = "scale(1.05)";
    pub const SCALE_REST: &str = "scale(1)";
}

pub mod contact_form {
    pub const FORM_ID: &str = "contact-form";
    pub const CONFIRMATION: &str = "Thank you for your message! We will get back to you soon.";
}

pub mod hero {
    pub const SELECTOR: &str = ".hero-content-overlay";
    pub const HIDDEN_OFFSET: &str = "translateY(20px)";
    pub const TRANSITION: &str = "opacity 1s ease, transform 1s ease";
    pub const REVEAL_DELAY_MS: u32 = 300;
}
