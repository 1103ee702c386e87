use log::info;

fn main() {
    // Initialize console error panic hook for better error messages
    console_error_panic_hook::set_once();

    // Initialize logging
    console_log::init_with_level(site_behaviors::config::log_level()).expect("error initializing log");

    info!("Starting site behaviors");
    site_behaviors::start();
}
