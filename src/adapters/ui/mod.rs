pub mod banner;

/// Prints the welcome banner. Call once at startup, after the listener is bound.
pub fn init_ui(address: &str) {
    banner::print_welcome(address);
}
