use std::sync::Arc;

use leptos::prelude::*;
use log::error;

use crate::components::org_chart::{OrgChartViewer, bundled_document};

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	match bundled_document() {
		Ok((data, config)) => view! {
			<div class="fullscreen-chart">
				<OrgChartViewer data=Arc::new(data) config=config />
			</div>
		}
		.into_any(),
		Err(err) => {
			error!("org chart data rejected: {err}");
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>
				<p>"The org chart could not be loaded: " {err.to_string()}</p>
			}
			.into_any()
		}
	}
}
