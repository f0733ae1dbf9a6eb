//! Turns units plus view state into the visible node and edge lists.

use super::data::OrgData;
use super::icons::IconKey;
use super::types::{GraphData, GraphEdge, GraphNode, NodeDisplay};
use super::view_state::{Filter, ViewState};

/// Visible nodes and edges for `view`, in source order.
pub fn build(data: &OrgData, view: &ViewState) -> GraphData {
	let visible: Vec<bool> = (0..data.len())
		.map(|idx| is_visible_at(data, view, idx))
		.collect();

	let mut graph = GraphData::default();
	for idx in (0..data.len()).filter(|&idx| visible[idx]) {
		let unit = data.unit_at(idx);
		let expandable = data.is_collapsible_at(idx);
		graph.nodes.push(GraphNode {
			id: unit.id.clone(),
			depth: data.depth_at(idx),
			display: NodeDisplay {
				name: unit.name.clone(),
				kind: unit.kind,
				icon: IconKey::resolve(&unit.icon),
				member_count: unit.members.len(),
				team_count: data.team_count_at(idx),
				expandable,
				expanded: expandable && view.is_expanded(&unit.id),
				description: unit.description.clone(),
			},
		});
		if let Some(parent) = data.parent_index(idx).filter(|&p| visible[p]) {
			graph.edges.push(GraphEdge {
				source: data.unit_at(parent).id.clone(),
				target: unit.id.clone(),
			});
		}
	}
	graph
}

pub(crate) fn is_visible_at(data: &OrgData, view: &ViewState, idx: usize) -> bool {
	let parent = data.parent_index(idx);
	match &view.active_filter {
		Filter::All => match parent {
			Some(p) if data.is_collapsible_at(p) => view.is_expanded(&data.unit_at(p).id),
			_ => true,
		},
		Filter::Unit(id) => {
			data.unit_at(idx).id == *id || parent.is_some_and(|p| data.unit_at(p).id == *id)
		}
	}
}

#[cfg(test)]
mod tests {
	use std::collections::HashSet;

	use super::*;
	use crate::components::org_chart::types::{OrgUnit, UnitKind};

	fn ids(graph: &GraphData) -> Vec<&str> {
		graph.nodes.iter().map(|n| n.id.as_str()).collect()
	}

	fn edges(graph: &GraphData) -> Vec<(&str, &str)> {
		graph
			.edges
			.iter()
			.map(|e| (e.source.as_str(), e.target.as_str()))
			.collect()
	}

	fn org() -> OrgData {
		OrgData::new(vec![
			OrgUnit::new("dir", "Founders", UnitKind::Director).with_icon("Crown"),
			OrgUnit::new("eng", "Engineering", UnitKind::Pillar).with_parent("dir"),
			OrgUnit::new("plat", "Platform", UnitKind::Team).with_parent("eng"),
			OrgUnit::new("sec", "Security", UnitKind::Pillar).with_parent("dir"),
			OrgUnit::new("red", "Red Team", UnitKind::Team)
				.with_parent("sec")
				.with_icon("Nope"),
			OrgUnit::new("stray", "Stray", UnitKind::Team).with_parent("ghost"),
		])
		.unwrap()
	}

	#[test]
	fn collapsed_pillars_hide_their_teams() {
		let graph = build(&org(), &ViewState::default());
		assert_eq!(ids(&graph), ["dir", "eng", "sec", "stray"]);
		assert_eq!(edges(&graph), [("dir", "eng"), ("dir", "sec")]);
	}

	#[test]
	fn expand_collapse_roundtrip() {
		let data = OrgData::new(vec![
			OrgUnit::new("A", "A", UnitKind::Pillar),
			OrgUnit::new("B", "B", UnitKind::Team).with_parent("A"),
		])
		.unwrap();
		let mut view = ViewState::default();
		let graph = build(&data, &view);
		assert_eq!(ids(&graph), ["A"]);
		assert!(graph.edges.is_empty());

		view.toggle_expanded("A");
		let graph = build(&data, &view);
		assert_eq!(ids(&graph), ["A", "B"]);
		assert_eq!(edges(&graph), [("A", "B")]);
		assert!(graph.nodes[0].display.expanded);
	}

	#[test]
	fn filter_shows_unit_and_direct_children_regardless_of_expansion() {
		let data = OrgData::new(vec![
			OrgUnit::new("A", "A", UnitKind::Pillar),
			OrgUnit::new("B", "B", UnitKind::Team).with_parent("A"),
			OrgUnit::new("C", "C", UnitKind::Pillar),
		])
		.unwrap();
		let mut view = ViewState {
			active_filter: Filter::Unit("A".into()),
			..ViewState::default()
		};
		assert_eq!(ids(&build(&data, &view)), ["A", "B"]);
		view.expanded_units.insert("C".into());
		assert_eq!(ids(&build(&data, &view)), ["A", "B"]);
	}

	#[test]
	fn filtered_view_drops_grandchildren() {
		let view = ViewState {
			active_filter: Filter::Unit("dir".into()),
			..ViewState::default()
		};
		let graph = build(&org(), &view);
		assert_eq!(ids(&graph), ["dir", "eng", "sec"]);
	}

	#[test]
	fn every_edge_has_both_endpoints() {
		let data = org();
		let mut view = ViewState::default();
		view.toggle_expanded("sec");
		for filter in ["all", "dir", "eng", "sec", "plat", "missing"] {
			view.active_filter = Filter::from_key(filter);
			let graph = build(&data, &view);
			let present: HashSet<&str> = graph.nodes.iter().map(|n| n.id.as_str()).collect();
			for edge in &graph.edges {
				assert!(present.contains(edge.source.as_str()), "{filter}");
				assert!(present.contains(edge.target.as_str()), "{filter}");
			}
		}
	}

	#[test]
	fn build_is_deterministic() {
		let data = org();
		let mut view = ViewState::default();
		view.toggle_expanded("eng");
		assert_eq!(build(&data, &view), build(&data, &view));
	}

	#[test]
	fn display_data_resolves_icons_and_counts() {
		let mut view = ViewState::default();
		view.toggle_expanded("sec");
		let graph = build(&org(), &view);
		let dir = graph.node("dir").unwrap();
		assert_eq!(dir.display.icon, IconKey::Crown);
		assert_eq!(dir.display.team_count, 0);
		assert!(dir.display.team_label().is_none());
		assert!(!dir.display.expandable);
		let sec = graph.node("sec").unwrap();
		assert_eq!(sec.display.team_count, 1);
		assert_eq!(sec.display.team_label().as_deref(), Some("1 team"));
		let red = graph.node("red").unwrap();
		assert_eq!(red.display.icon, IconKey::default());
		assert_eq!(red.depth, 2);
		assert_eq!(graph.node("stray").unwrap().depth, 0);
	}
}
