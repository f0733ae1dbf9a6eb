//! Single owner of the view state. Every mutation rebuilds the graph and layout in the
//! same call and leaves a viewport command for the render surface.

use std::sync::Arc;

use log::debug;

use super::builder;
use super::config::ViewerConfig;
use super::data::OrgData;
use super::layout::{self, Extent, LayoutKind, Positions};
use super::search::{self, FocusTarget};
use super::types::{GraphData, GraphNode, OrgUnit};
use super::view_state::{Filter, ViewState};
use super::viewport::{Bounds, Rect, ViewportCommand, ViewportTransform};

/// Single owner of the view state. Each mutation rebuilds the visible graph and its
/// layout, then leaves a viewport command for the render surface.
pub struct ViewController {
	data: Arc<OrgData>,
	config: ViewerConfig,
	view: ViewState,
	graph: GraphData,
	positions: Positions,
	viewport_size: Extent,
	pending_focus: Option<String>,
	focused: Option<String>,
	command: Option<ViewportCommand>,
}

impl ViewController {
	/// Starts from the initial view: all units, nothing expanded or selected.
	pub fn new(data: Arc<OrgData>, config: ViewerConfig) -> Self {
		let mut controller = Self {
			data,
			config,
			view: ViewState::default(),
			graph: GraphData::default(),
			positions: Positions::new(),
			viewport_size: Extent::default(),
			pending_focus: None,
			focused: None,
			command: None,
		};
		controller.rebuild();
		controller
	}

	/// Org data the view is built from.
	pub fn data(&self) -> &OrgData {
		&self.data
	}

	/// Settings in effect, including the current layout.
	pub fn config(&self) -> &ViewerConfig {
		&self.config
	}

	/// Current view state.
	pub fn view(&self) -> &ViewState {
		&self.view
	}

	/// Visible nodes and edges for the current view.
	pub fn graph(&self) -> &GraphData {
		&self.graph
	}

	/// Top-left corner of every visible node.
	pub fn positions(&self) -> &Positions {
		&self.positions
	}

	/// Layout strategy in use.
	pub fn layout_kind(&self) -> LayoutKind {
		self.config.layout
	}

	/// Unit most recently centered by a search.
	pub fn focused(&self) -> Option<&str> {
		self.focused.as_deref()
	}

	/// Switches the filter tab; expansion is kept.
	pub fn set_filter(&mut self, filter: Filter) {
		debug!("filter -> {}", filter.key());
		self.view.active_filter = filter;
		self.rebuild();
	}

	/// Toggles a collapsible unit. Returns false, changing nothing, for any other id.
	pub fn toggle_expand(&mut self, unit_id: &str) -> bool {
		if !self.data.is_collapsible(unit_id) {
			debug!("ignoring toggle of non-expandable unit `{unit_id}`");
			return false;
		}
		self.view.toggle_expanded(unit_id);
		debug!("expanded units: {:?}", self.view.expanded_units);
		self.rebuild();
		true
	}

	/// Selects a unit, or clears the selection. Unknown ids clear it.
	pub fn select_node(&mut self, unit_id: Option<&str>) {
		self.view.selected_unit = unit_id
			.filter(|id| self.data.unit(id).is_some())
			.map(str::to_owned);
		self.rebuild();
	}

	/// The selected unit, if any.
	pub fn selected_unit(&self) -> Option<&OrgUnit> {
		self.data.unit(self.view.selected_unit.as_deref()?)
	}

	/// Stores the query; focusing is a separate step.
	pub fn set_search_query(&mut self, text: &str) {
		self.view.search_query = text.to_owned();
		self.rebuild();
	}

	/// Resolves the current query and brings the match into view. A blank query fits
	/// the whole chart instead; a query without a match changes nothing.
	pub fn focus_search(&mut self) -> Option<FocusTarget> {
		let query = self.view.search_query.trim().to_owned();
		if query.is_empty() {
			self.fit_view();
			return None;
		}
		let Some(target) = search::resolve(&query, self.data.get_all_units()) else {
			debug!("search {query:?}: no match");
			return None;
		};

		let plan = search::plan_focus(&target.unit_id, &self.data, &self.view);
		debug!("search {query:?} -> `{}` ({plan:?})", target.unit_id);
		if let Some(filter) = plan.filter {
			self.view.active_filter = filter;
		}
		if let Some(parent) = plan.expand {
			if !self.view.is_expanded(&parent) {
				self.view.toggle_expanded(&parent);
			}
		}
		self.pending_focus = Some(target.unit_id.clone());
		self.rebuild();
		Some(target)
	}

	/// Switches the layout strategy and re-fits.
	pub fn set_layout(&mut self, kind: LayoutKind) {
		self.config.layout = kind;
		self.rebuild();
	}

	/// The render surface was measured at a new size.
	pub fn resize(&mut self, width: f64, height: f64) {
		self.viewport_size = Extent::new(width, height);
		self.rebuild();
	}

	/// Requests a fit of every visible node.
	pub fn fit_view(&mut self) {
		self.issue(ViewportCommand::FitAll {
			padding: self.config.fit_padding,
			duration_ms: self.config.fit_duration_ms,
		});
	}

	/// Latest pending command; older ones were superseded.
	pub fn take_command(&mut self) -> Option<ViewportCommand> {
		self.command.take()
	}

	/// Current pan and zoom.
	pub fn viewport(&self) -> ViewportTransform {
		self.view.viewport
	}

	/// Written by the render surface while panning, zooming and animating.
	pub fn set_viewport(&mut self, transform: ViewportTransform) {
		self.view.viewport = transform;
	}

	/// World rectangle of a visible node.
	pub fn node_rect(&self, unit_id: &str) -> Option<Rect> {
		let node = self.graph.node(unit_id)?;
		self.rect_of(node)
	}

	fn rect_of(&self, node: &GraphNode) -> Option<Rect> {
		let pos = self.positions.get(&node.id)?;
		let (width, height) = self.config.layout_options.node_size(node.display.kind);
		Some(Rect {
			x: pos.x,
			y: pos.y,
			width,
			height,
		})
	}

	/// Top-most node under the world point, if any.
	pub fn node_at(&self, wx: f64, wy: f64) -> Option<(&GraphNode, Rect)> {
		self.graph.nodes.iter().rev().find_map(|node| {
			let rect = self.rect_of(node)?;
			rect.contains(wx, wy).then_some((node, rect))
		})
	}

	/// Box around all visible nodes; `None` when nothing is visible.
	pub fn content_bounds(&self) -> Option<Bounds> {
		Bounds::enclosing(self.graph.nodes.iter().filter_map(|n| self.rect_of(n)))
	}

	fn issue(&mut self, command: ViewportCommand) {
		debug!("viewport command: {command:?}");
		self.command = Some(command);
	}

	fn rebuild(&mut self) {
		let graph = builder::build(&self.data, &self.view);
		let mut options = self.config.layout_options.clone();
		options.viewport = self.viewport_size;
		let positions = layout::layout(self.config.layout, &graph.nodes, &graph.edges, &options);
		let changed = graph != self.graph || positions != self.positions;
		debug!(
			"rebuilt graph: {} nodes, {} edges{}",
			graph.nodes.len(),
			graph.edges.len(),
			if changed { "" } else { " (unchanged)" }
		);
		self.graph = graph;
		self.positions = positions;

		if let Some(id) = self.pending_focus.take() {
			if let Some(rect) = self.node_rect(&id) {
				let (x, y) = rect.center();
				self.focused = Some(id);
				self.issue(ViewportCommand::Center {
					x,
					y,
					zoom: self.config.focus_zoom,
					duration_ms: self.config.focus_duration_ms,
				});
				return;
			}
			debug!("focus target `{id}` still hidden after rebuild");
		}
		if changed {
			self.fit_view();
		}
	}
}
