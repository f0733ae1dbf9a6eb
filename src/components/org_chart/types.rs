use std::borrow::Cow;

use serde::Deserialize;

use super::icons::IconKey;

/// Role of a unit in the hierarchy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitKind {
	/// Top of the organization.
	Director,
	/// Mid-level grouping that may contain teams.
	Pillar,
	/// Leaf working group.
	Team,
}

/// Drawing style and behavior for one [`UnitKind`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KindStyle {
	/// Border stroke width.
	pub border_width: f64,
	/// Border color.
	pub border: &'static str,
	/// Card background.
	pub fill: &'static str,
	/// Title and icon color.
	pub text: &'static str,
	/// CSS font weight of the title.
	pub font_weight: &'static str,
	/// Label shown in the detail panel.
	pub badge: &'static str,
	/// Units of this kind may collapse their children.
	pub expandable: bool,
}

const DIRECTOR_STYLE: KindStyle = KindStyle {
	border_width: 2.0,
	border: "#7dd3fc",
	fill: "rgba(125, 211, 252, 0.10)",
	text: "#7dd3fc",
	font_weight: "bold",
	badge: "Director",
	expandable: false,
};

const PILLAR_STYLE: KindStyle = KindStyle {
	border_width: 2.0,
	border: "#94a3b8",
	fill: "rgba(148, 163, 184, 0.14)",
	text: "#f1f5f9",
	font_weight: "600",
	badge: "Pillar",
	expandable: true,
};

const TEAM_STYLE: KindStyle = KindStyle {
	border_width: 1.0,
	border: "rgba(148, 163, 184, 0.5)",
	fill: "rgba(15, 23, 42, 0.85)",
	text: "#e2e8f0",
	font_weight: "normal",
	badge: "Team",
	expandable: false,
};

impl UnitKind {
	/// Drawing style for this kind.
	pub fn style(self) -> &'static KindStyle {
		match self {
			UnitKind::Director => &DIRECTOR_STYLE,
			UnitKind::Pillar => &PILLAR_STYLE,
			UnitKind::Team => &TEAM_STYLE,
		}
	}

	/// Whether units of this kind may show and hide their children.
	pub fn expandable(self) -> bool {
		self.style().expandable
	}
}

/// A person listed under a unit.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct OrgMember {
	/// Display name.
	pub name: String,
	/// Job title, when known.
	#[serde(default)]
	pub role: Option<String>,
}

/// A node of the organization as described by the org document.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrgUnit {
	/// Unique unit id.
	pub id: String,
	/// Display name.
	pub name: String,
	/// Role of the unit in the hierarchy.
	#[serde(rename = "type")]
	pub kind: UnitKind,
	/// Absent for roots.
	#[serde(default)]
	pub parent_id: Option<String>,
	/// Icon registry key; unknown keys fall back to the default icon.
	#[serde(default)]
	pub icon: String,
	/// One-line summary.
	#[serde(default)]
	pub description: Option<String>,
	/// People in the unit, in listed order.
	#[serde(default)]
	pub members: Vec<OrgMember>,
}

impl OrgUnit {
	/// Creates a unit with no parent, icon, description or members.
	pub fn new(id: impl Into<String>, name: impl Into<String>, kind: UnitKind) -> Self {
		Self {
			id: id.into(),
			name: name.into(),
			kind,
			parent_id: None,
			icon: String::new(),
			description: None,
			members: Vec::new(),
		}
	}

	/// Sets the parent id.
	pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
		self.parent_id = Some(parent_id.into());
		self
	}

	/// Sets the icon key.
	pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
		self.icon = icon.into();
		self
	}

	/// Appends a member.
	pub fn with_member(mut self, name: impl Into<String>, role: Option<&str>) -> Self {
		self.members.push(OrgMember {
			name: name.into(),
			role: role.map(str::to_owned),
		});
		self
	}
}

/// What a graph node shows on the canvas.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeDisplay {
	/// Display name.
	pub name: String,
	/// Role of the unit in the hierarchy.
	pub kind: UnitKind,
	/// Resolved icon.
	pub icon: IconKey,
	/// Number of members listed.
	pub member_count: usize,
	/// Direct children that are teams.
	pub team_count: usize,
	/// Has teams to show; the card draws an expand toggle.
	pub expandable: bool,
	/// The unit is currently expanded.
	pub expanded: bool,
	/// One-line summary.
	pub description: Option<String>,
}

impl NodeDisplay {
	/// Name shortened to fit the card.
	pub fn title(&self) -> Cow<'_, str> {
		truncate(&self.name, 38, 35)
	}

	/// "N members" with singular for one.
	pub fn member_label(&self) -> String {
		member_count_label(self.member_count)
	}

	/// `None` when the unit has no teams.
	pub fn team_label(&self) -> Option<String> {
		match self.team_count {
			0 => None,
			1 => Some("1 team".into()),
			n => Some(format!("{n} teams")),
		}
	}
}

/// One visible unit, recomputed on every view change.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphNode {
	/// Unique unit id.
	pub id: String,
	/// Distance from the root in the full hierarchy.
	pub depth: usize,
	/// What the card shows.
	pub display: NodeDisplay,
}

/// Parent to child link between two visible units.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GraphEdge {
	/// Parent id.
	pub source: String,
	/// Child id.
	pub target: String,
}

/// The visible part of the hierarchy.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GraphData {
	/// Visible units in source order.
	pub nodes: Vec<GraphNode>,
	/// Links whose endpoints are both visible.
	pub edges: Vec<GraphEdge>,
}

impl GraphData {
	/// Looks up a visible node.
	pub fn node(&self, id: &str) -> Option<&GraphNode> {
		self.nodes.iter().find(|n| n.id == id)
	}
}

/// Shortens `text` to `keep` characters plus an ellipsis when it is longer than `limit`.
pub fn truncate(text: &str, limit: usize, keep: usize) -> Cow<'_, str> {
	if text.chars().count() <= limit {
		return Cow::Borrowed(text);
	}
	let head: String = text.chars().take(keep).collect();
	Cow::Owned(format!("{head}..."))
}

pub fn member_count_label(count: usize) -> String {
	if count == 1 {
		"1 member".into()
	} else {
		format!("{count} members")
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn truncates_long_names_only() {
		assert_eq!(truncate("Cybersecurity", 38, 35), "Cybersecurity");
		let long = "Marketing & Communications (Content) and Events";
		let short = truncate(long, 38, 35);
		assert_eq!(short.chars().count(), 38);
		assert!(short.ends_with("..."));
	}

	#[test]
	fn member_labels_pluralize() {
		assert_eq!(member_count_label(0), "0 members");
		assert_eq!(member_count_label(1), "1 member");
		assert_eq!(member_count_label(4), "4 members");
	}

	#[test]
	fn only_pillars_expand() {
		assert!(UnitKind::Pillar.expandable());
		assert!(!UnitKind::Director.expandable());
		assert!(!UnitKind::Team.expandable());
	}

	#[test]
	fn deserializes_flat_unit() {
		let unit: OrgUnit = serde_json::from_str(
			r#"{"id":"ops","name":"Ops","type":"team","parentId":"eng","icon":"Bot",
			"members":[{"name":"Jane Doe","role":"Lead"},{"name":"Sam"}]}"#,
		)
		.unwrap();
		assert_eq!(unit.kind, UnitKind::Team);
		assert_eq!(unit.parent_id.as_deref(), Some("eng"));
		assert_eq!(unit.members[1].role, None);
		assert_eq!(unit.description, None);
	}
}
