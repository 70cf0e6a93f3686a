//! Browser entry point.

use graph_lens::{App, init_logging};

fn main() {
	init_logging();
	leptos::mount::mount_to_body(App);
}
