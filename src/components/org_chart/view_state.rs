use std::collections::BTreeSet;

use super::viewport::ViewportTransform;

pub const ALL_FILTER: &str = "all";

/// Active filter tab.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Filter {
	/// Every unit, subject to expansion.
	#[default]
	All,
	/// One unit and its direct children.
	Unit(String),
}

impl Filter {
	/// Parses a tab key; `"all"` is the unfiltered view.
	pub fn from_key(key: &str) -> Self {
		if key == ALL_FILTER {
			Filter::All
		} else {
			Filter::Unit(key.to_owned())
		}
	}

	/// Tab key of this filter.
	pub fn key(&self) -> &str {
		match self {
			Filter::All => ALL_FILTER,
			Filter::Unit(id) => id,
		}
	}
}

/// Transient UI state of one viewer session.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ViewState {
	/// Selected filter tab.
	pub active_filter: Filter,
	/// Collapsible units whose teams are shown under the `all` filter.
	pub expanded_units: BTreeSet<String>,
	/// Unit shown in the detail panel.
	pub selected_unit: Option<String>,
	/// Text in the search box.
	pub search_query: String,
	/// Pan and zoom of the canvas.
	pub viewport: ViewportTransform,
}

impl ViewState {
	/// Whether `id` is expanded.
	pub fn is_expanded(&self, id: &str) -> bool {
		self.expanded_units.contains(id)
	}

	/// Collapses `id` if open. Otherwise opens it, first closing every other subtree when
	/// the "all" filter is active.
	pub(crate) fn toggle_expanded(&mut self, id: &str) {
		if self.expanded_units.remove(id) {
			return;
		}
		if self.active_filter == Filter::All {
			self.expanded_units.clear();
		}
		self.expanded_units.insert(id.to_owned());
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn starts_at_identity() {
		let view = ViewState::default();
		assert_eq!(view.active_filter, Filter::All);
		assert!(view.expanded_units.is_empty());
		assert!(view.selected_unit.is_none());
		assert!(view.search_query.is_empty());
		assert_eq!(view.viewport, ViewportTransform::default());
	}

	#[test]
	fn filter_keys_roundtrip() {
		assert_eq!(Filter::from_key("all"), Filter::All);
		assert_eq!(Filter::from_key("security"), Filter::Unit("security".into()));
		assert_eq!(Filter::from_key("security").key(), "security");
	}

	#[test]
	fn single_open_only_under_all() {
		let mut view = ViewState::default();
		view.toggle_expanded("a");
		view.toggle_expanded("b");
		assert_eq!(view.expanded_units, BTreeSet::from(["b".to_owned()]));

		view.active_filter = Filter::Unit("x".into());
		view.toggle_expanded("a");
		assert_eq!(view.expanded_units.len(), 2);
	}
}
