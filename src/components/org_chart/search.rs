//! Search-to-focus: query resolution, the view changes that reveal a match, and
//! match highlighting for the detail panel.

use super::builder;
use super::data::OrgData;
use super::types::OrgUnit;
use super::view_state::{Filter, ViewState};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MatchKind {
	/// Matched the unit's own name.
	UnitName,
	/// Matched the name or role of the member at `index`.
	Member { index: usize },
}

/// The unit a query resolved to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FocusTarget {
	/// Id of the matched unit.
	pub unit_id: String,
	/// What the query hit.
	pub matched: MatchKind,
}

/// Resolves `query` against unit names first, then member names and roles. First match
/// in source order wins; a blank query resolves to nothing.
pub fn resolve(query: &str, units: &[OrgUnit]) -> Option<FocusTarget> {
	let needle = query.trim().to_lowercase();
	if needle.is_empty() {
		return None;
	}

	if let Some(unit) = units.iter().find(|u| u.name.to_lowercase().contains(&needle)) {
		return Some(FocusTarget {
			unit_id: unit.id.clone(),
			matched: MatchKind::UnitName,
		});
	}

	units.iter().find_map(|unit| {
		let index = unit.members.iter().position(|m| {
			m.name.to_lowercase().contains(&needle)
				|| m
					.role
					.as_deref()
					.is_some_and(|role| role.to_lowercase().contains(&needle))
		})?;
		Some(FocusTarget {
			unit_id: unit.id.clone(),
			matched: MatchKind::Member { index },
		})
	})
}

/// View changes that make a unit visible.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FocusPlan {
	pub filter: Option<Filter>,
	pub expand: Option<String>,
}

impl FocusPlan {
	pub fn is_empty(&self) -> bool {
		self.filter.is_none() && self.expand.is_none()
	}
}

/// Plans the first phase of a focus: under "all" the unit's collapsible parent is
/// expanded, under a unit filter the filter moves to that parent, and a unit with no
/// collapsible parent is revealed by returning to "all".
pub fn plan_focus(unit_id: &str, data: &OrgData, view: &ViewState) -> FocusPlan {
	let Some(idx) = data.index_of(unit_id) else {
		return FocusPlan::default();
	};
	if builder::is_visible_at(data, view, idx) {
		return FocusPlan::default();
	}

	let parent = data
		.parent_index(idx)
		.filter(|&p| data.is_collapsible_at(p))
		.map(|p| data.unit_at(p).id.clone());
	match (&view.active_filter, parent) {
		(Filter::All, Some(parent)) => FocusPlan {
			expand: Some(parent),
			..FocusPlan::default()
		},
		(Filter::Unit(_), Some(parent)) => FocusPlan {
			filter: Some(Filter::Unit(parent)),
			..FocusPlan::default()
		},
		(_, None) => FocusPlan {
			filter: Some(Filter::All),
			..FocusPlan::default()
		},
	}
}

/// A run of text that does or does not match the query.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Segment<'a> {
	pub text: &'a str,
	pub matched: bool,
}

/// Splits `text` into alternating runs around case-insensitive occurrences of `query`.
pub fn highlight_segments<'a>(text: &'a str, query: &str) -> Vec<Segment<'a>> {
	let query = query.trim();
	if query.is_empty() {
		return vec![Segment {
			text,
			matched: false,
		}];
	}

	let mut segments = Vec::new();
	let mut plain_start = 0;
	let mut pos = 0;
	while pos < text.len() {
		match match_len_at(&text[pos..], query) {
			Some(len) => {
				if plain_start < pos {
					segments.push(Segment {
						text: &text[plain_start..pos],
						matched: false,
					});
				}
				segments.push(Segment {
					text: &text[pos..pos + len],
					matched: true,
				});
				pos += len;
				plain_start = pos;
			}
			None => {
				pos += text[pos..].chars().next().map_or(1, char::len_utf8);
			}
		}
	}
	if plain_start < text.len() {
		segments.push(Segment {
			text: &text[plain_start..],
			matched: false,
		});
	}
	segments
}

/// Byte length of the prefix of `text` equal to `query` ignoring case.
fn match_len_at(text: &str, query: &str) -> Option<usize> {
	let mut consumed = 0;
	let mut chars = text.chars();
	for q in query.chars() {
		let t = chars.next()?;
		if !t.to_lowercase().eq(q.to_lowercase()) {
			return None;
		}
		consumed += t.len_utf8();
	}
	Some(consumed)
}

pub fn member_matches(name: &str, role: Option<&str>, query: &str) -> bool {
	let needle = query.trim().to_lowercase();
	needle.is_empty()
		|| name.to_lowercase().contains(&needle)
		|| role.is_some_and(|r| r.to_lowercase().contains(&needle))
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::org_chart::types::UnitKind;

	fn units() -> Vec<OrgUnit> {
		vec![
			OrgUnit::new("u2", "Operations", UnitKind::Pillar)
				.with_member("Research Lead", None)
				.with_member("Jane Doe", Some("Lead")),
			OrgUnit::new("u1", "Research", UnitKind::Pillar),
		]
	}

	#[test]
	fn unit_names_win_over_members() {
		let target = resolve("research", &units()).unwrap();
		assert_eq!(target.unit_id, "u1");
		assert_eq!(target.matched, MatchKind::UnitName);
	}

	#[test]
	fn members_match_by_name_or_role() {
		let target = resolve("  JANE ", &units()).unwrap();
		assert_eq!(
			target,
			FocusTarget {
				unit_id: "u2".into(),
				matched: MatchKind::Member { index: 1 },
			}
		);
		let by_role = resolve("lead", &units()).unwrap();
		assert_eq!(by_role.matched, MatchKind::Member { index: 0 });
	}

	#[test]
	fn blank_or_missing_queries_resolve_to_none() {
		assert!(resolve("", &units()).is_none());
		assert!(resolve("   ", &units()).is_none());
		assert!(resolve("zzz", &units()).is_none());
	}

	#[test]
	fn first_match_in_source_order_wins() {
		let units = vec![
			OrgUnit::new("a", "Cloud Ops", UnitKind::Team),
			OrgUnit::new("b", "Cloud Infrastructure", UnitKind::Pillar),
		];
		assert_eq!(resolve("cloud", &units).unwrap().unit_id, "a");
	}

	fn hierarchy() -> OrgData {
		OrgData::new(vec![
			OrgUnit::new("dir", "Founders", UnitKind::Director),
			OrgUnit::new("A", "A", UnitKind::Pillar).with_parent("dir"),
			OrgUnit::new("team", "Team", UnitKind::Team)
				.with_parent("A")
				.with_member("Jane Doe", Some("Lead")),
			OrgUnit::new("B", "B", UnitKind::Pillar).with_parent("dir"),
			OrgUnit::new("b-team", "B Team", UnitKind::Team).with_parent("B"),
		])
		.unwrap()
	}

	#[test]
	fn visible_target_needs_no_changes() {
		let plan = plan_focus("A", &hierarchy(), &ViewState::default());
		assert!(plan.is_empty());
	}

	#[test]
	fn collapsed_target_expands_parent_under_all() {
		let plan = plan_focus("team", &hierarchy(), &ViewState::default());
		assert_eq!(plan.expand.as_deref(), Some("A"));
		assert!(plan.filter.is_none());
	}

	#[test]
	fn filtered_out_target_moves_filter_to_parent() {
		let view = ViewState {
			active_filter: Filter::Unit("B".into()),
			..ViewState::default()
		};
		let plan = plan_focus("team", &hierarchy(), &view);
		assert_eq!(plan.filter, Some(Filter::Unit("A".into())));
		assert!(plan.expand.is_none());

		let plan = plan_focus("dir", &hierarchy(), &view);
		assert_eq!(plan.filter, Some(Filter::All));
	}

	#[test]
	fn highlight_splits_case_insensitively() {
		let segments = highlight_segments("Lead Engineer, team lead", "LEAD");
		let marked: Vec<_> = segments.iter().filter(|s| s.matched).map(|s| s.text).collect();
		assert_eq!(marked, ["Lead", "lead"]);
		let joined: String = segments.iter().map(|s| s.text).collect();
		assert_eq!(joined, "Lead Engineer, team lead");
	}

	#[test]
	fn highlight_without_query_is_one_plain_segment() {
		assert_eq!(
			highlight_segments("Zoë", ""),
			[Segment {
				text: "Zoë",
				matched: false
			}]
		);
		assert_eq!(highlight_segments("Zoë", "ë")[1].text, "ë");
	}

	#[test]
	fn member_filter_accepts_blank_query() {
		assert!(member_matches("Jane", None, " "));
		assert!(member_matches("Jane", Some("Lead"), "lea"));
		assert!(!member_matches("Jane", Some("Lead"), "ops"));
	}
}
