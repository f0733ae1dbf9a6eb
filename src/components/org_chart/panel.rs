use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use leptos::prelude::*;

use super::controller::ViewController;
use super::data::OrgData;
use super::search::{highlight_segments, member_matches};
use super::types::{OrgMember, OrgUnit, member_count_label};

/// One line of a unit's roster.
struct RosterEntry<'a> {
	member: &'a OrgMember,
	/// The member's name or role contains the current query.
	matched: bool,
}

/// Every member of `unit` in source order, flagging those the query hits.
fn roster<'a>(unit: &'a OrgUnit, query: &str) -> Vec<RosterEntry<'a>> {
	let searching = !query.trim().is_empty();
	unit.members
		.iter()
		.map(|member| RosterEntry {
			member,
			matched: searching && member_matches(&member.name, member.role.as_deref(), query),
		})
		.collect()
}

fn highlighted(text: &str, query: &str) -> impl IntoView {
	highlight_segments(text, query)
		.into_iter()
		.map(|segment| {
			let text = segment.text.to_owned();
			if segment.matched {
				view! { <mark>{text}</mark> }.into_any()
			} else {
				text.into_any()
			}
		})
		.collect_view()
}

/// Side panel describing the selected unit. The whole roster is listed; text matching the
/// current search query is marked.
#[component]
pub fn DetailPanel(
	data: Arc<OrgData>,
	selected: RwSignal<Option<String>>,
	query: RwSignal<String>,
	controller: Rc<RefCell<ViewController>>,
) -> impl IntoView {
	let on_close = move |_| {
		controller.borrow_mut().select_node(None);
		selected.set(None);
	};

	let body = move || {
		let id = selected.get()?;
		let unit = data.unit(&id)?;
		let query = query.get();
		let style = unit.kind.style();

		let entries = roster(unit, &query);
		let roster_view = if entries.is_empty() {
			view! { <p class="org-empty">"No members listed."</p> }.into_any()
		} else {
			let rows = entries
				.into_iter()
				.map(|entry| {
					let role = entry.member.role.as_deref().map(|role| {
						view! { <span class="org-member-role">{highlighted(role, &query)}</span> }
					});
					view! {
						<li class:matched=entry.matched>
							<span class="org-member-name">
								{highlighted(&entry.member.name, &query)}
							</span>
							{role}
						</li>
					}
				})
				.collect_view();
			view! { <ul class="org-members">{rows}</ul> }.into_any()
		};

		Some(view! {
			<h2>{unit.name.clone()}</h2>
			<span class="org-badge">{style.badge}</span>
			<p class="org-description">{unit.description.clone()}</p>
			<p class="org-count">{member_count_label(unit.members.len())}</p>
			{roster_view}
		})
	};

	view! {
		<aside class="org-detail" class:hidden=move || selected.with(Option::is_none)>
			<button class="org-detail-close" on:click=on_close>
				"\u{00D7}"
			</button>
			{body}
		</aside>
	}
}
