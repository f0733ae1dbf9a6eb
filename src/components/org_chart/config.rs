use serde::Deserialize;

use super::layout::{LayoutKind, LayoutOptions};

/// Viewer settings. Every field has a default; an org document may override any subset
/// through its `viewer` section.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ViewerConfig {
	/// Strategy used for node positions.
	pub layout: LayoutKind,
	/// Node sizes and spacing.
	pub layout_options: LayoutOptions,
	/// Fraction of the content extent kept free around it on fit.
	pub fit_padding: f64,
	/// Length of the fit-all transition.
	pub fit_duration_ms: f64,
	/// Zoom applied when a search centers a unit.
	pub focus_zoom: f64,
	/// Length of the search-focus transition.
	pub focus_duration_ms: f64,
	/// Lower zoom bound for wheel, pinch and buttons.
	pub min_zoom: f64,
	/// Upper zoom bound for wheel, pinch and buttons.
	pub max_zoom: f64,
}

impl Default for ViewerConfig {
	fn default() -> Self {
		Self {
			layout: LayoutKind::default(),
			layout_options: LayoutOptions::default(),
			fit_padding: 0.15,
			fit_duration_ms: 400.0,
			focus_zoom: 1.1,
			focus_duration_ms: 400.0,
			min_zoom: 0.7,
			max_zoom: 2.0,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn partial_sections_keep_defaults() {
		let config: ViewerConfig = serde_json::from_str(
			r#"{"layout":"tree","focusZoom":1.4,"layoutOptions":{"rankSep":120}}"#,
		)
		.unwrap();
		assert_eq!(config.layout, LayoutKind::Layered);
		assert_eq!(config.focus_zoom, 1.4);
		assert_eq!(config.layout_options.rank_sep, 120.0);
		assert_eq!(config.layout_options.node_width, 220.0);
		assert_eq!(config.fit_padding, 0.15);
	}

	#[test]
	fn empty_section_is_default() {
		let config: ViewerConfig = serde_json::from_str("{}").unwrap();
		assert_eq!(config, ViewerConfig::default());
	}
}
