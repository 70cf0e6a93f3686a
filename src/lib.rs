//! Case graph explorer: a Leptos client-side app over an in-memory graph engine.
//!
//! The [`graph`] module holds the engine (visibility, traversal, timeline
//! unfolding, validation). Components and pages only wire it to the canvas.

use leptos::prelude::*;
use leptos_meta::*;
use leptos_router::components::*;
use leptos_router::path;
use log::{Level, info};

mod components;
pub mod graph;
mod pages;

use crate::pages::home::Home;
use crate::pages::not_found::NotFound;

/// Console log level: engine transitions are only traced in debug builds.
fn log_level() -> Level {
	if cfg!(debug_assertions) {
		Level::Debug
	} else {
		Level::Info
	}
}

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let level = log_level();
	let _ = console_log::init_with_level(level);
	console_error_panic_hook::set_once();
	info!("Logging initialized at {level}");
}

/// Routes `/` and `/case/:scenario` to the explorer; anything else is a 404.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />
		<Title text="Case Graph Explorer" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<Router>
			<Routes fallback=|| view! { <NotFound /> }>
				<Route path=path!("/") view=Home />
				<Route path=path!("/case/:scenario") view=Home />
			</Routes>
		</Router>
	}
}
