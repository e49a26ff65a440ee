//! Web Mercator projection for a fixed-size map view at fractional zoom.

use std::f64::consts::PI;

use crate::models::{CameraPose, LatLng};

pub const TILE_SIZE: f64 = 256.0;
/// Latitude at which the Mercator square ends.
pub const MAX_LATITUDE: f64 = 85.051_128_78;
pub const MIN_ZOOM: f64 = 1.0;
pub const MAX_ZOOM: f64 = 19.0;
const EARTH_CIRCUMFERENCE_M: f64 = 40_075_016.686;

/// Width of the whole world in pixels at `zoom`.
pub fn world_size(zoom: f64) -> f64 {
    TILE_SIZE * 2f64.powf(zoom)
}

/// Lat/lng to world pixels at `zoom`. Latitude is clamped to the Mercator square.
pub fn project(p: LatLng, zoom: f64) -> (f64, f64) {
    let size = world_size(zoom);
    let lat = p.lat.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
    let x = (p.lng + 180.0) / 360.0 * size;
    let y = (1.0 - (lat.tan() + 1.0 / lat.cos()).ln() / PI) / 2.0 * size;
    (x, y)
}

pub fn unproject(x: f64, y: f64, zoom: f64) -> LatLng {
    let size = world_size(zoom);
    let lng = x / size * 360.0 - 180.0;
    let n = PI * (1.0 - 2.0 * y / size);
    let lat = n.sinh().atan().to_degrees();
    LatLng::new(lat, lng)
}

/// Ground distance covered by one screen pixel.
pub fn meters_per_pixel(lat: f64, zoom: f64) -> f64 {
    EARTH_CIRCUMFERENCE_M * lat.to_radians().cos().abs() / world_size(zoom)
}

/// Pick a round scale-bar length no wider than `max_px`. Returns (meters, pixels).
pub fn scale_bar(lat: f64, zoom: f64, max_px: f64) -> (f64, f64) {
    let mpp = meters_per_pixel(lat, zoom);
    let max_m = mpp * max_px;
    if !(max_m.is_finite() && max_m > 0.0) {
        return (0.0, 0.0);
    }
    let magnitude = 10f64.powf(max_m.log10().floor());
    let meters = [5.0, 2.0, 1.0]
        .iter()
        .map(|f| f * magnitude)
        .find(|m| *m <= max_m)
        .unwrap_or(magnitude);
    (meters, meters / mpp)
}

pub fn format_distance(meters: f64) -> String {
    if meters >= 1000.0 {
        format!("{} km", meters / 1000.0)
    } else {
        format!("{meters} m")
    }
}

/// One raster tile placed on screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TilePlacement {
    pub x: u32,
    pub y: u32,
    pub z: u32,
    pub left: f64,
    pub top: f64,
    pub size: f64,
}

impl TilePlacement {
    /// Fill an `{z}/{x}/{y}` URL template.
    pub fn url(&self, template: &str) -> String {
        template
            .replace("{z}", &self.z.to_string())
            .replace("{x}", &self.x.to_string())
            .replace("{y}", &self.y.to_string())
    }
}

/// A camera pose seen through a screen of `width` x `height` pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenView {
    pub pose: CameraPose,
    pub width: f64,
    pub height: f64,
}

impl ScreenView {
    pub fn new(pose: CameraPose, width: f64, height: f64) -> Self {
        Self { pose, width, height }
    }

    pub fn project_to_screen(&self, p: LatLng) -> (f64, f64) {
        let (cx, cy) = project(self.pose.center, self.pose.zoom);
        let (x, y) = project(p, self.pose.zoom);
        (x - cx + self.width / 2.0, y - cy + self.height / 2.0)
    }

    pub fn unproject_from_screen(&self, sx: f64, sy: f64) -> LatLng {
        let (cx, cy) = project(self.pose.center, self.pose.zoom);
        unproject(
            cx + sx - self.width / 2.0,
            cy + sy - self.height / 2.0,
            self.pose.zoom,
        )
    }

    /// Pose after dragging the map content by (dx, dy) screen pixels.
    pub fn pan_by_pixels(&self, dx: f64, dy: f64) -> CameraPose {
        let center = self
            .unproject_from_screen(self.width / 2.0 - dx, self.height / 2.0 - dy)
            .clamped();
        CameraPose::new(center, self.pose.zoom)
    }

    /// Pose after changing zoom by `delta` while keeping the point under
    /// (sx, sy) fixed on screen.
    pub fn zoom_around(&self, delta: f64, sx: f64, sy: f64) -> CameraPose {
        let zoom = (self.pose.zoom + delta).clamp(MIN_ZOOM, MAX_ZOOM);
        let anchor = self.unproject_from_screen(sx, sy);
        let (ax, ay) = project(anchor, zoom);
        let center = unproject(
            ax - (sx - self.width / 2.0),
            ay - (sy - self.height / 2.0),
            zoom,
        )
        .clamped();
        CameraPose::new(center, zoom)
    }

    /// Raster tiles covering the screen. Columns wrap around the antimeridian,
    /// rows past the poles are skipped.
    pub fn visible_tiles(&self) -> Vec<TilePlacement> {
        if !(self.width > 0.0 && self.height > 0.0 && self.pose.is_finite()) {
            return Vec::new();
        }
        let z = self.pose.zoom.floor().clamp(0.0, MAX_ZOOM);
        let scale = 2f64.powf(self.pose.zoom - z);
        let size = TILE_SIZE * scale;
        let count = 2f64.powf(z);

        let (cx, cy) = project(self.pose.center, z);
        let origin_x = cx - self.width / 2.0 / scale;
        let origin_y = cy - self.height / 2.0 / scale;
        let first_col = (origin_x / TILE_SIZE).floor() as i64;
        let last_col = ((origin_x + self.width / scale) / TILE_SIZE).floor() as i64;
        let first_row = (origin_y / TILE_SIZE).floor() as i64;
        let last_row = ((origin_y + self.height / scale) / TILE_SIZE).floor() as i64;

        let n = count as i64;
        let mut tiles = Vec::new();
        for row in first_row.max(0)..=last_row.min(n - 1) {
            for col in first_col..=last_col {
                tiles.push(TilePlacement {
                    x: col.rem_euclid(n) as u32,
                    y: row as u32,
                    z: z as u32,
                    left: (col as f64 * TILE_SIZE - origin_x) * scale,
                    top: (row as f64 * TILE_SIZE - origin_y) * scale,
                    size,
                });
            }
        }
        tiles
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paris_view() -> ScreenView {
        ScreenView::new(CameraPose::new(LatLng::new(48.8566, 2.3522), 12.0), 800.0, 600.0)
    }

    #[test]
    fn test_project_origin() {
        let (x, y) = project(LatLng::new(0.0, 0.0), 0.0);
        assert!((x - 128.0).abs() < 1e-9);
        assert!((y - 128.0).abs() < 1e-9);
    }

    #[test]
    fn test_project_unproject_inverse() {
        let p = LatLng::new(51.2093, 3.2247);
        let (x, y) = project(p, 7.5);
        let q = unproject(x, y, 7.5);
        assert!((p.lat - q.lat).abs() < 1e-9);
        assert!((p.lng - q.lng).abs() < 1e-9);
    }

    #[test]
    fn test_center_projects_to_screen_middle() {
        let view = paris_view();
        let (x, y) = view.project_to_screen(view.pose.center);
        assert!((x - 400.0).abs() < 1e-6);
        assert!((y - 300.0).abs() < 1e-6);
    }

    #[test]
    fn test_north_is_up() {
        let view = paris_view();
        let (_, y) = view.project_to_screen(LatLng::new(48.9, 2.3522));
        assert!(y < 300.0);
    }

    #[test]
    fn test_pan_moves_center_opposite_to_drag() {
        let view = paris_view();
        let pose = view.pan_by_pixels(100.0, 0.0);
        assert!(pose.center.lng < view.pose.center.lng);
        assert_eq!(pose.zoom, view.pose.zoom);
    }

    #[test]
    fn test_zoom_around_keeps_anchor() {
        let view = paris_view();
        let anchor = view.unproject_from_screen(600.0, 150.0);
        let zoomed = ScreenView::new(view.zoom_around(1.0, 600.0, 150.0), 800.0, 600.0);
        let (x, y) = zoomed.project_to_screen(anchor);
        assert!((x - 600.0).abs() < 1e-6);
        assert!((y - 150.0).abs() < 1e-6);
    }

    #[test]
    fn test_zoom_around_clamps() {
        let view = paris_view();
        assert_eq!(view.zoom_around(20.0, 400.0, 300.0).zoom, MAX_ZOOM);
    }

    #[test]
    fn test_visible_tiles_cover_screen() {
        let tiles = paris_view().visible_tiles();
        assert!(!tiles.is_empty());
        assert!(tiles.iter().all(|t| t.z == 12 && (t.size - 256.0).abs() < 1e-9));
        assert!(tiles.iter().any(|t| t.left <= 0.0 && t.top <= 0.0));
        assert!(tiles.iter().any(|t| t.left + t.size >= 800.0 && t.top + t.size >= 600.0));
    }

    #[test]
    fn test_visible_tiles_fractional_zoom_scales() {
        let view = ScreenView::new(CameraPose::new(LatLng::new(48.5, 4.0), 4.5), 800.0, 600.0);
        let tiles = view.visible_tiles();
        assert!(tiles.iter().all(|t| t.z == 4));
        assert!((tiles[0].size - 256.0 * 2f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn test_visible_tiles_wrap_columns() {
        let view = ScreenView::new(CameraPose::new(LatLng::new(0.0, 179.9), 2.0), 800.0, 400.0);
        let tiles = view.visible_tiles();
        assert!(tiles.iter().all(|t| t.x < 4 && t.y < 4));
        assert!(tiles.iter().any(|t| t.x == 0));
    }

    #[test]
    fn test_tile_url() {
        let tile = TilePlacement {
            x: 3,
            y: 5,
            z: 4,
            left: 0.0,
            top: 0.0,
            size: 256.0,
        };
        assert_eq!(
            tile.url("https://tile.openstreetmap.org/{z}/{x}/{y}.png"),
            "https://tile.openstreetmap.org/4/3/5.png"
        );
    }

    #[test]
    fn test_meters_per_pixel_equator() {
        let mpp = meters_per_pixel(0.0, 0.0);
        assert!((mpp - 156_543.03).abs() < 1.0);
    }

    #[test]
    fn test_scale_bar_round_number() {
        let (meters, px) = scale_bar(48.8566, 12.0, 100.0);
        assert!(px <= 100.0 && px > 0.0);
        let leading = meters / 10f64.powf(meters.log10().floor());
        assert!([1.0, 2.0, 5.0].iter().any(|f| (leading - f).abs() < 1e-9));
    }

    #[test]
    fn test_format_distance() {
        assert_eq!(format_distance(500.0), "500 m");
        assert_eq!(format_distance(2000.0), "2 km");
    }
}
