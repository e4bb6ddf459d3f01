//! Inserting library assets by drag-and-drop or double-click.

use cineflow_core::{snap_to_grid, CanvasTransform, EditorConfig, Size, Vec2};
use cineflow_timeline::{Asset, CanvasElement};
use tracing::warn;

use crate::input::Viewport;

/// Parse the JSON asset descriptor carried by a drag.
///
/// Malformed payloads are logged and dropped.
pub fn parse_asset_payload(payload: &str) -> Option<Asset> {
    match serde_json::from_str::<Asset>(payload) {
        Ok(asset) => Some(asset),
        Err(e) => {
            warn!(error = %e, "Ignoring malformed asset payload");
            None
        }
    }
}

/// Where an element of `element_size` lands for a drop at `logical`.
///
/// Snaps to the grid when enabled, then clamps so the element stays inside
/// the logical canvas.
pub fn drop_position(
    logical: Vec2,
    element_size: Size,
    canvas: Size,
    grid_size: f32,
    grid_enabled: bool,
) -> Vec2 {
    let snapped = Vec2::new(
        snap_to_grid(logical.x, grid_size, grid_enabled),
        snap_to_grid(logical.y, grid_size, grid_enabled),
    );
    let max_x = (canvas.width - element_size.width).max(0.0);
    let max_y = (canvas.height - element_size.height).max(0.0);
    Vec2::new(snapped.x.clamp(0.0, max_x), snapped.y.clamp(0.0, max_y))
}

/// Element for an asset dropped at screen position `screen`, starting at `current_time`.
pub fn element_for_drop(
    asset: &Asset,
    screen: Vec2,
    viewport: &Viewport,
    transform: &CanvasTransform,
    config: &EditorConfig,
    current_time: f64,
) -> CanvasElement {
    let size = config.default_element_size();
    let logical = viewport.to_logical(screen, transform);
    let position = drop_position(
        logical,
        size,
        config.logical_size(),
        config.grid_size,
        config.grid_enabled,
    );
    asset.to_element(position, size, current_time, config.default_element_duration)
}

/// Element for a double-clicked asset, placed at the default insert position.
pub fn element_for_double_click(
    asset: &Asset,
    config: &EditorConfig,
    current_time: f64,
) -> CanvasElement {
    asset.to_element(
        config.default_insert_position(),
        config.default_element_size(),
        current_time,
        config.default_element_duration,
    )
}
