use leptos::prelude::*;
use leptos_router::hooks::{use_navigate, use_params_map};

use crate::components::force_graph::{CanvasData, ForceGraphCanvas};
use crate::components::format::format_instant;
use crate::graph::scenarios::SCENARIOS;
use crate::graph::{Action, Explorer, GraphNode, NodeType};

/// Log line for a node the user dropped somewhere on the canvas.
fn pin_note(id: &str, x: f64, y: f64) -> String {
	format!("node {id} pinned at ({x:.1}, {y:.1})")
}

/// Detail card for the selected node.
fn node_details(node: GraphNode, explorer: RwSignal<Explorer>) -> impl IntoView {
	let dispatch = move |action: Action| explorer.update(|e| e.dispatch(action));
	let expand_id = node.id.clone();
	let risk = node
		.risk_score
		.map(|r| r.to_string())
		.unwrap_or_else(|| "–".into());
	let last_seen = node
		.time()
		.map(|t| format!("Last seen: {}", format_instant(t)));
	let attributes = node
		.attributes
		.iter()
		.map(|(key, value)| {
			view! {
				<div class="details__item">
					<p class="muted">{key.clone()}</p>
					<p class="strong">{value.to_string()}</p>
				</div>
			}
		})
		.collect_view();

	view! {
		<div class="details__panel">
			<div class="details__title">
				<p class="eyebrow">{node.kind.label()}</p>
				<h3>{node.label.clone()}</h3>
				<p class="muted">"Risk score " {risk}</p>
			</div>
			<div class="details__grid">{attributes}</div>
			{last_seen.map(|text| view! { <div class="muted">{text}</div> })}
			<div class="details__actions">
				<button
					class="btn btn--ghost"
					on:click=move |_| dispatch(Action::Expand(expand_id.clone()))
				>
					"Expand neighbors"
				</button>
				<button class="btn" on:click=move |_| dispatch(Action::ClearSelection)>
					"Clear selection"
				</button>
			</div>
		</div>
	}
}

/// Case explorer page
#[component]
pub fn Home() -> impl IntoView {
	let params = use_params_map();
	let requested = move || params.with(|p| p.get("scenario"));
	let initial = params
		.with_untracked(|p| p.get("scenario"))
		.unwrap_or_else(|| SCENARIOS[0].id.to_string());
	let explorer = RwSignal::new(Explorer::from_scenario(&initial));

	// Follow `/case/:scenario` when the route changes under a mounted page.
	Effect::new(move |_| {
		let Some(id) = requested() else {
			return;
		};
		let known = SCENARIOS.iter().any(|s| s.id == id);
		if known && explorer.with_untracked(|e| e.scenario() != id) {
			explorer.update(|e| e.switch_scenario(&id));
		}
	});
	let navigate = use_navigate();

	let dispatch = move |action: Action| explorer.update(|e| e.dispatch(action));
	let frame = Memo::new(move |_| explorer.with(Explorer::view));
	let canvas_data = Signal::derive(move || frame.with(|v| CanvasData::from(v)));

	let scenario_options = SCENARIOS
		.iter()
		.map(|s| view! { <option value=s.id>{s.title}</option> })
		.collect_view();

	let filter_pills = NodeType::ALL
		.into_iter()
		.map(|kind| {
			let enabled = move || explorer.with(|e| e.state().filters.is_enabled(kind));
			view! {
				<button
					class=move || if enabled() { "pill pill--active" } else { "pill pill--ghost" }
					on:click=move |_| dispatch(Action::ToggleFilter(kind))
				>
					{kind.label()}
				</button>
			}
		})
		.collect_view();

	view! {
		<div class="explorer">
			<header class="explorer__header">
				<h1>"Case Graph"</h1>
				<select
					prop:value=move || explorer.with(|e| e.scenario())
					on:change=move |ev| {
						let id = event_target_value(&ev);
						navigate(&format!("/case/{id}"), Default::default());
					}
				>
					{scenario_options}
				</select>
				<button class="btn" on:click=move |_| dispatch(Action::ResetView)>
					"Event Overview"
				</button>
			</header>

			{move || {
				frame
					.with(|v| v.issue.clone())
					.map(|issue| {
						view! {
							<div class="banner banner--warn">
								<strong>{issue.code()}</strong>
								" "
								{issue.to_string()}
							</div>
						}
					})
			}}

			<div class="card">
				<div class="card__controls">
					<div class="filters">{filter_pills}</div>
					<div class="controls__right">
						<div class="search">
							<input
								type="search"
								placeholder="Search nodes..."
								prop:value=move || explorer.with(|e| e.state().search.clone())
								on:input=move |ev| dispatch(Action::Search(event_target_value(&ev)))
							/>
						</div>
						<div class="timeline">
							<label>"Over time"</label>
							<input
								type="range"
								min=move || frame.with(|v| v.bounds.min.to_string())
								max=move || frame.with(|v| v.bounds.max.to_string())
								step="60000"
								prop:value=move || frame.with(|v| v.bounds.clamp(v.cursor).to_string())
								on:input=move |ev| {
									if let Ok(t) = event_target_value(&ev).parse::<f64>() {
										dispatch(Action::SetCursor(t as i64));
									}
								}
							/>
							<div class="timeline__ticks">
								<span>{move || frame.with(|v| format_instant(v.bounds.min))}</span>
								<span>{move || frame.with(|v| format_instant(v.bounds.clamp(v.cursor)))}</span>
								<span>{move || frame.with(|v| format_instant(v.bounds.max))}</span>
							</div>
						</div>
					</div>
				</div>

				<div class="graph-container">
					<ForceGraphCanvas
						data=canvas_data
						on_node_click={move |id: String| dispatch(Action::Select(id))}
						on_node_hover={move |id: Option<String>| dispatch(Action::Hover(id))}
						on_node_double_click={move |id: String| dispatch(Action::Expand(id))}
						on_background_context={move |_: ()| dispatch(Action::ClearSelection)}
						on_node_drag_end={move |(id, x, y): (String, f64, f64)| {
							log::debug!("{}", pin_note(&id, x, y));
						}}
					/>
				</div>
			</div>

			<section class="details">
				<div class="details__header">
					<h2>"Node Details"</h2>
					<p>"Click a node to inspect attributes, risk, and timeline context."</p>
				</div>
				{move || match explorer.with(|e| e.selected_node().cloned()) {
					Some(node) => node_details(node, explorer).into_any(),
					None => {
						view! {
							<div class="details__empty">
								"Select any node to view contextual metadata."
							</div>
						}
							.into_any()
					}
				}}
			</section>
		</div>
	}
}
