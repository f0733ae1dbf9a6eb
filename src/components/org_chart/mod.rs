//! Org chart viewer: org data, visible-graph derivation, layout, view control and the
//! canvas surface that draws it.

mod builder;
mod component;
mod config;
mod controller;
mod data;
mod icons;
mod layout;
mod panel;
mod render;
mod search;
mod state;
mod types;
mod view_state;
mod viewer;
mod viewport;

pub use config::ViewerConfig;
pub use controller::ViewController;
pub use data::{OrgData, OrgDataError, bundled_document, parse_document};
pub use icons::IconKey;
pub use layout::{Extent, LayoutKind, LayoutOptions, LayoutStrategy, Point, Positions};
pub use search::{FocusTarget, MatchKind};
pub use types::{
	GraphData, GraphEdge, GraphNode, KindStyle, NodeDisplay, OrgMember, OrgUnit, UnitKind,
};
pub use view_state::{Filter, ViewState};
pub use viewer::OrgChartViewer;
pub use viewport::{Bounds, Rect, ViewportCommand, ViewportTransform};
