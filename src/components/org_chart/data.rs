//! Static organization data, loaded once and never mutated.

use std::collections::HashMap;

use log::{info, warn};
use serde::Deserialize;
use thiserror::Error;

use super::config::ViewerConfig;
use super::types::{OrgUnit, UnitKind};

const BUNDLED_DOCUMENT: &str = include_str!("../../../data/org_chart.json");
const SUPPORTED_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum OrgDataError {
	/// Not valid JSON, or not shaped like an org document.
	#[error("failed to parse org document: {0}")]
	Parse(#[from] serde_json::Error),
	/// The document declares a version this build cannot read.
	#[error("unsupported org document version {found} (expected {expected})")]
	UnsupportedVersion { found: u32, expected: u32 },
	/// A unit has an empty id.
	#[error("unit at position {index} has an empty id")]
	EmptyId { index: usize },
	/// Two units share an id.
	#[error("duplicate unit id `{0}`")]
	DuplicateId(String),
	/// A unit is its own ancestor.
	#[error("parent chain of unit `{0}` contains a cycle")]
	Cycle(String),
}

#[derive(Deserialize)]
struct OrgDocument {
	version: u32,
	#[serde(default)]
	viewer: ViewerConfig,
	units: Vec<OrgUnit>,
}

/// Parses an org document into validated data plus the viewer settings it carries.
pub fn parse_document(json: &str) -> Result<(OrgData, ViewerConfig), OrgDataError> {
	let doc: OrgDocument = serde_json::from_str(json)?;
	if doc.version != SUPPORTED_VERSION {
		return Err(OrgDataError::UnsupportedVersion {
			found: doc.version,
			expected: SUPPORTED_VERSION,
		});
	}
	let data = OrgData::new(doc.units)?;
	info!(
		"loaded org chart: {} units, {} members",
		data.len(),
		data.member_total()
	);
	Ok((data, doc.viewer))
}

/// The document shipped with the site.
pub fn bundled_document() -> Result<(OrgData, ViewerConfig), OrgDataError> {
	parse_document(BUNDLED_DOCUMENT)
}

/// Validated forest of units, in source order, with precomputed parent/child/depth tables.
#[derive(Clone, Debug)]
pub struct OrgData {
	units: Vec<OrgUnit>,
	index: HashMap<String, usize>,
	parents: Vec<Option<usize>>,
	children: Vec<Vec<usize>>,
	depths: Vec<usize>,
}

impl OrgData {
	/// Validates ids and parent links. Units with a missing parent become roots.
	pub fn new(units: Vec<OrgUnit>) -> Result<Self, OrgDataError> {
		let mut index = HashMap::with_capacity(units.len());
		for (i, unit) in units.iter().enumerate() {
			if unit.id.is_empty() {
				return Err(OrgDataError::EmptyId { index: i });
			}
			if index.insert(unit.id.clone(), i).is_some() {
				return Err(OrgDataError::DuplicateId(unit.id.clone()));
			}
		}

		let parents: Vec<Option<usize>> = units
			.iter()
			.map(|unit| {
				let parent_id = unit.parent_id.as_deref()?;
				let parent = index.get(parent_id).copied();
				if parent.is_none() {
					warn!(
						"unit `{}` references missing parent `{parent_id}`, treating it as a root",
						unit.id
					);
				}
				parent
			})
			.collect();

		let mut depths = Vec::with_capacity(units.len());
		for (i, unit) in units.iter().enumerate() {
			let mut depth = 0;
			let mut cursor = parents[i];
			while let Some(p) = cursor {
				depth += 1;
				if depth > units.len() {
					return Err(OrgDataError::Cycle(unit.id.clone()));
				}
				cursor = parents[p];
			}
			depths.push(depth);
		}

		let mut children = vec![Vec::new(); units.len()];
		for (i, parent) in parents.iter().enumerate() {
			if let Some(p) = parent {
				children[*p].push(i);
			}
		}

		Ok(Self {
			units,
			index,
			parents,
			children,
			depths,
		})
	}

	/// Number of units.
	pub fn len(&self) -> usize {
		self.units.len()
	}

	/// True when the document lists no units.
	pub fn is_empty(&self) -> bool {
		self.units.is_empty()
	}

	/// All units in source order.
	pub fn get_all_units(&self) -> &[OrgUnit] {
		&self.units
	}

	/// Direct children in source order; empty for unknown ids.
	pub fn get_children(&self, unit_id: &str) -> Vec<&OrgUnit> {
		self.index_of(unit_id)
			.map(|i| self.children[i].iter().map(|&c| &self.units[c]).collect())
			.unwrap_or_default()
	}

	/// Units without a (resolvable) parent.
	pub fn get_roots(&self) -> Vec<&OrgUnit> {
		self.units
			.iter()
			.zip(&self.parents)
			.filter(|(_, parent)| parent.is_none())
			.map(|(unit, _)| unit)
			.collect()
	}

	/// Looks up a unit by id.
	pub fn unit(&self, id: &str) -> Option<&OrgUnit> {
		self.index_of(id).map(|i| &self.units[i])
	}

	/// Parent unit, only when the referenced parent exists.
	pub fn parent(&self, id: &str) -> Option<&OrgUnit> {
		let i = self.index_of(id)?;
		self.parents[i].map(|p| &self.units[p])
	}

	/// Distance from the unit's root; roots are 0.
	pub fn depth(&self, id: &str) -> Option<usize> {
		self.index_of(id).map(|i| self.depths[i])
	}

	/// True when the unit's kind permits expansion and it has children to show.
	pub fn is_collapsible(&self, id: &str) -> bool {
		self.index_of(id).is_some_and(|i| self.is_collapsible_at(i))
	}

	/// Pillars, offered as filter tabs next to "All".
	pub fn filter_tabs(&self) -> Vec<&OrgUnit> {
		self.units
			.iter()
			.filter(|unit| unit.kind.expandable())
			.collect()
	}

	/// Members across every unit.
	pub fn member_total(&self) -> usize {
		self.units.iter().map(|unit| unit.members.len()).sum()
	}

	pub(crate) fn index_of(&self, id: &str) -> Option<usize> {
		self.index.get(id).copied()
	}

	pub(crate) fn unit_at(&self, idx: usize) -> &OrgUnit {
		&self.units[idx]
	}

	pub(crate) fn parent_index(&self, idx: usize) -> Option<usize> {
		self.parents[idx]
	}

	pub(crate) fn depth_at(&self, idx: usize) -> usize {
		self.depths[idx]
	}

	/// Direct children of kind `team`; pillars under a director are not teams.
	pub(crate) fn team_count_at(&self, idx: usize) -> usize {
		self.children[idx]
			.iter()
			.filter(|&&child| self.units[child].kind == UnitKind::Team)
			.count()
	}

	pub(crate) fn is_collapsible_at(&self, idx: usize) -> bool {
		self.units[idx].kind.expandable() && !self.children[idx].is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn sample() -> OrgData {
		OrgData::new(vec![
			OrgUnit::new("dir", "Director", UnitKind::Director),
			OrgUnit::new("p1", "Pillar One", UnitKind::Pillar).with_parent("dir"),
			OrgUnit::new("t1", "Team One", UnitKind::Team).with_parent("p1"),
			OrgUnit::new("p2", "Pillar Two", UnitKind::Pillar).with_parent("dir"),
			OrgUnit::new("lost", "Orphan", UnitKind::Team).with_parent("nowhere"),
		])
		.unwrap()
	}

	#[test]
	fn tables_follow_source_order() {
		let data = sample();
		let roots: Vec<_> = data.get_roots().iter().map(|u| u.id.as_str()).collect();
		assert_eq!(roots, ["dir", "lost"]);
		let children: Vec<_> = data.get_children("dir").iter().map(|u| u.id.as_str()).collect();
		assert_eq!(children, ["p1", "p2"]);
		assert!(data.get_children("missing").is_empty());
		assert_eq!(data.depth("t1"), Some(2));
	}

	#[test]
	fn dangling_parent_becomes_root() {
		let data = sample();
		assert_eq!(data.depth("lost"), Some(0));
		assert!(data.parent("lost").is_none());
	}

	#[test]
	fn collapsible_needs_kind_and_children() {
		let data = sample();
		assert!(data.is_collapsible("p1"));
		assert!(!data.is_collapsible("p2"));
		assert!(!data.is_collapsible("dir"));
		assert_eq!(data.filter_tabs().len(), 2);
	}

	#[test]
	fn rejects_duplicates_and_cycles() {
		let dup = OrgData::new(vec![
			OrgUnit::new("a", "A", UnitKind::Pillar),
			OrgUnit::new("a", "A again", UnitKind::Team),
		]);
		assert!(matches!(dup, Err(OrgDataError::DuplicateId(id)) if id == "a"));

		let cycle = OrgData::new(vec![
			OrgUnit::new("a", "A", UnitKind::Pillar).with_parent("b"),
			OrgUnit::new("b", "B", UnitKind::Pillar).with_parent("a"),
		]);
		assert!(matches!(cycle, Err(OrgDataError::Cycle(_))));

		let empty = OrgData::new(vec![OrgUnit::new("", "Nameless", UnitKind::Team)]);
		assert!(matches!(empty, Err(OrgDataError::EmptyId { index: 0 })));
	}

	#[test]
	fn document_version_is_checked() {
		let err = parse_document(r#"{"version":2,"units":[]}"#).unwrap_err();
		assert!(matches!(
			err,
			OrgDataError::UnsupportedVersion { found: 2, expected: 1 }
		));
		assert!(matches!(
			parse_document("{not json"),
			Err(OrgDataError::Parse(_))
		));
	}

	#[test]
	fn bundled_document_loads() {
		let (data, _) = bundled_document().unwrap();
		assert_eq!(data.get_roots().len(), 1);
		assert!(data.filter_tabs().iter().any(|u| u.id == "engineering"));
	}
}
