use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use leptos::prelude::*;
use log::info;
use web_sys::KeyboardEvent;

use super::component::OrgChartCanvas;
use super::config::ViewerConfig;
use super::controller::ViewController;
use super::data::OrgData;
use super::panel::DetailPanel;
use super::types::truncate;
use super::view_state::{ALL_FILTER, Filter};

const TAB_LABEL_LIMIT: usize = 20;
const TAB_LABEL_KEEP: usize = 17;

/// Runs the current query through the controller and mirrors the resulting filter into
/// the tab strip.
fn run_search(controller: &Rc<RefCell<ViewController>>, active_tab: RwSignal<String>) {
	let mut ctl = controller.borrow_mut();
	if let Some(target) = ctl.focus_search() {
		info!("focused `{}`", target.unit_id);
	}
	active_tab.set(ctl.view().active_filter.key().to_owned());
}

/// Full org chart screen: filter tabs, search, layout switch, canvas and detail panel.
#[component]
pub fn OrgChartViewer(data: Arc<OrgData>, config: ViewerConfig) -> impl IntoView {
	let controller = Rc::new(RefCell::new(ViewController::new(
		data.clone(),
		config.clone(),
	)));
	let active_tab = RwSignal::new(ALL_FILTER.to_owned());
	let query = RwSignal::new(String::new());
	let selected = RwSignal::new(None::<String>);
	let layout = RwSignal::new(config.layout);

	let tabs: Vec<(String, String)> = std::iter::once((ALL_FILTER.to_owned(), "All".to_owned()))
		.chain(data.filter_tabs().into_iter().map(|unit| {
			(
				unit.id.clone(),
				truncate(&unit.name, TAB_LABEL_LIMIT, TAB_LABEL_KEEP).into_owned(),
			)
		}))
		.collect();
	let tab_buttons = tabs
		.into_iter()
		.map(|(key, label)| {
			let ctl = controller.clone();
			let key_active = key.clone();
			let on_click = move |_| {
				ctl.borrow_mut().set_filter(Filter::from_key(&key));
				active_tab.set(key.clone());
			};
			view! {
				<button
					class="org-tab"
					class:active=move || active_tab.get() == key_active
					on:click=on_click
				>
					{label}
				</button>
			}
		})
		.collect_view();

	let ctl_input = controller.clone();
	let on_input = move |ev: web_sys::Event| {
		let text = event_target_value(&ev);
		ctl_input.borrow_mut().set_search_query(&text);
		query.set(text);
	};
	let ctl_key = controller.clone();
	let on_keydown = move |ev: KeyboardEvent| {
		if ev.key() == "Enter" {
			run_search(&ctl_key, active_tab);
		}
	};
	let ctl_go = controller.clone();
	let on_go = move |_| run_search(&ctl_go, active_tab);
	let ctl_reset = controller.clone();
	let on_reset = move |_| ctl_reset.borrow_mut().fit_view();
	let ctl_layout = controller.clone();
	let on_layout = move |_| {
		let next = layout.get_untracked().toggled();
		ctl_layout.borrow_mut().set_layout(next);
		layout.set(next);
	};

	let pending_members = (data.member_total() == 0).then(|| {
		view! { <p class="org-notice">"Member rosters have not been published yet."</p> }
	});

	view! {
		<div class="org-viewer">
			<header class="org-toolbar">
				<nav class="org-tabs">{tab_buttons}</nav>
				<div class="org-search">
					<input
						type="search"
						placeholder="Search units, people or roles"
						prop:value=move || query.get()
						on:input=on_input
						on:keydown=on_keydown
					/>
					<button on:click=on_go>"Go"</button>
					<button on:click=on_reset>"Reset"</button>
					<button class="org-layout-toggle" on:click=on_layout>
						{move || format!("Layout: {}", layout.get().label())}
					</button>
				</div>
			</header>
			{pending_members}
			<div class="org-stage">
				<OrgChartCanvas controller=controller.clone() selected=selected />
				<DetailPanel
					data=data.clone()
					selected=selected
					query=query
					controller=controller
				/>
			</div>
		</div>
	}
}
