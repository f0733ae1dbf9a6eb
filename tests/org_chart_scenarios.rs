use std::collections::HashSet;
use std::sync::Arc;

use org_chart_canvas::{
	Filter, LayoutKind, OrgDataError, ViewController, ViewerConfig, ViewportCommand,
	bundled_document, parse_document,
};

fn controller() -> ViewController {
	let (data, config) = bundled_document().expect("bundled document is valid");
	let mut ctl = ViewController::new(Arc::new(data), config);
	ctl.resize(1280.0, 800.0);
	ctl.take_command();
	ctl
}

fn visible(ctl: &ViewController) -> HashSet<&str> {
	ctl.graph().nodes.iter().map(|n| n.id.as_str()).collect()
}

#[test]
fn bundled_chart_starts_with_director_and_pillars() {
	let ctl = controller();
	let ids = visible(&ctl);
	assert_eq!(ids.len(), 8);
	assert!(ids.contains("founders"));
	assert!(!ids.contains("agent-platform"));
	assert_eq!(ctl.graph().edges.len(), 7);
	assert!(
		ctl.graph()
			.edges
			.iter()
			.all(|e| e.source == "founders")
	);
	assert_eq!(ctl.positions().len(), 8);
}

#[test]
fn team_counts_ignore_pillars() {
	let ctl = controller();
	let display = |id: &str| {
		let node = ctl.graph().nodes.iter().find(|n| n.id == id);
		node.map(|n| n.display.clone()).expect("visible node")
	};
	let founders = display("founders");
	assert_eq!(founders.team_count, 0);
	assert_eq!(founders.team_label(), None);
	assert_eq!(display("engineering").team_label().as_deref(), Some("2 teams"));
}

#[test]
fn opening_a_pillar_closes_the_previous_one() {
	let mut ctl = controller();
	assert!(ctl.toggle_expand("engineering"));
	assert!(visible(&ctl).contains("evaluation"));
	assert!(matches!(
		ctl.take_command(),
		Some(ViewportCommand::FitAll { .. })
	));

	assert!(ctl.toggle_expand("security"));
	let ids = visible(&ctl);
	assert!(ids.contains("red-team"));
	assert!(!ids.contains("evaluation"));
	assert_eq!(ids.len(), 10);

	assert!(!ctl.toggle_expand("webdev"), "pillar without teams");
	assert!(!ctl.toggle_expand("red-team"));
}

#[test]
fn pillar_filter_shows_pillar_and_its_teams() {
	let mut ctl = controller();
	ctl.set_filter(Filter::from_key("cloud"));
	let ids = visible(&ctl);
	assert_eq!(ids, HashSet::from(["cloud", "network", "it"]));
	assert_eq!(ctl.graph().edges.len(), 2);
}

#[test]
fn member_search_reveals_team_and_centers_it() {
	let mut ctl = controller();
	ctl.set_search_query("osei");
	let target = ctl.focus_search().expect("member match");
	assert_eq!(target.unit_id, "evaluation");
	assert!(ctl.view().is_expanded("engineering"));
	assert!(visible(&ctl).contains("evaluation"));
	assert_eq!(ctl.focused(), Some("evaluation"));
	match ctl.take_command() {
		Some(ViewportCommand::Center { zoom, .. }) => assert_eq!(zoom, 1.1),
		other => panic!("expected a center command, got {other:?}"),
	}
}

#[test]
fn search_under_another_filter_moves_the_filter() {
	let mut ctl = controller();
	ctl.set_filter(Filter::from_key("cloud"));
	ctl.set_search_query("Lucas");
	let target = ctl.focus_search().expect("member match");
	assert_eq!(target.unit_id, "onboarding");
	assert_eq!(ctl.view().active_filter, Filter::Unit("community".into()));
	assert!(visible(&ctl).contains("onboarding"));
}

#[test]
fn unmatched_search_changes_nothing() {
	let mut ctl = controller();
	let before = ctl.graph().clone();
	ctl.set_search_query("nobody by this name");
	assert!(ctl.focus_search().is_none());
	assert_eq!(ctl.graph(), &before);
	assert!(ctl.take_command().is_none());
}

#[test]
fn tree_layout_stacks_depths_downward() {
	let mut ctl = controller();
	ctl.toggle_expand("community");
	ctl.set_layout(LayoutKind::Layered);
	let y = |id: &str| ctl.positions()[id].y;
	assert!(y("founders") < y("community"));
	assert!(y("community") < y("onboarding"));
	assert_eq!(ctl.positions().len(), ctl.graph().nodes.len());
}

#[test]
fn documents_override_viewer_settings() {
	let json = r#"{
		"version": 1,
		"viewer": { "layout": "tree", "focusZoom": 1.5 },
		"units": [{ "id": "root", "name": "Root", "type": "director" }]
	}"#;
	let (data, config) = parse_document(json).unwrap();
	assert_eq!(data.len(), 1);
	assert_eq!(config.layout, LayoutKind::Layered);
	assert_eq!(config.focus_zoom, 1.5);
	assert_eq!(config.max_zoom, ViewerConfig::default().max_zoom);
}

#[test]
fn malformed_documents_are_rejected() {
	let cycle = r#"{"version": 1, "units": [
		{ "id": "a", "name": "A", "type": "pillar", "parentId": "b" },
		{ "id": "b", "name": "B", "type": "pillar", "parentId": "a" }
	]}"#;
	assert!(matches!(parse_document(cycle), Err(OrgDataError::Cycle(_))));

	let future = r#"{"version": 2, "units": []}"#;
	assert!(matches!(
		parse_document(future),
		Err(OrgDataError::UnsupportedVersion { found: 2, .. })
	));

	assert!(matches!(
		parse_document("{ not json"),
		Err(OrgDataError::Parse(_))
	));
}
