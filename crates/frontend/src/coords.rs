use storymap_shared::models::{CameraPose, LatLng};
use storymap_shared::projection::ScreenView;

/// Used when the map container has not been laid out yet.
pub const FALLBACK_SIZE: (f64, f64) = (960.0, 640.0);

/// Convert client (viewport) coordinates to container-relative pixel coordinates.
pub fn client_to_container(
    client_x: f64,
    client_y: f64,
    rect_left: f64,
    rect_top: f64,
) -> (f64, f64) {
    (client_x - rect_left, client_y - rect_top)
}

/// Bounding rect of an element by id.
pub fn element_rect(id: &str) -> Option<web_sys::DomRect> {
    let document = web_sys::window()?.document()?;
    let element = document.get_element_by_id(id)?;
    Some(element.get_bounding_client_rect())
}

/// Rendered size of the map container, falling back before first layout.
pub fn container_size(container_id: &str) -> (f64, f64) {
    element_rect(container_id)
        .map(|r| (r.width(), r.height()))
        .filter(|(w, h)| *w > 0.0 && *h > 0.0)
        .unwrap_or(FALLBACK_SIZE)
}

/// Client coordinates to container-relative screen pixels.
pub fn client_to_screen(client_x: f64, client_y: f64, container_id: &str) -> Option<(f64, f64)> {
    let rect = element_rect(container_id)?;
    Some(client_to_container(client_x, client_y, rect.left(), rect.top()))
}

/// Geographic position under a container-relative screen point.
pub fn screen_to_lat_lng(pose: CameraPose, size: (f64, f64), sx: f64, sy: f64) -> LatLng {
    ScreenView::new(pose, size.0, size.1).unproject_from_screen(sx, sy)
}

/// Format a position for the explore-mode readout.
pub fn format_lat_lng(p: LatLng) -> String {
    let ns = if p.lat >= 0.0 { 'N' } else { 'S' };
    let ew = if p.lng >= 0.0 { 'E' } else { 'W' };
    format!("{:.4}°{} {:.4}°{}", p.lat.abs(), ns, p.lng.abs(), ew)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_to_container_origin() {
        let (x, y) = client_to_container(100.0, 200.0, 100.0, 200.0);
        assert!((x - 0.0).abs() < 1e-9);
        assert!((y - 0.0).abs() < 1e-9);
    }

    #[test]
    fn test_client_to_container_offset() {
        let (x, y) = client_to_container(450.0, 350.0, 320.0, 50.0);
        assert!((x - 130.0).abs() < 1e-9);
        assert!((y - 300.0).abs() < 1e-9);
    }

    #[test]
    fn test_screen_center_is_pose_center() {
        let pose = CameraPose::new(LatLng::new(50.6292, 3.0573), 12.0);
        let p = screen_to_lat_lng(pose, (800.0, 600.0), 400.0, 300.0);
        assert!((p.lat - 50.6292).abs() < 1e-9);
        assert!((p.lng - 3.0573).abs() < 1e-9);
    }

    #[test]
    fn test_format_lat_lng() {
        assert_eq!(format_lat_lng(LatLng::new(48.85661, 2.35222)), "48.8566°N 2.3522°E");
        assert_eq!(format_lat_lng(LatLng::new(-33.8688, -70.0)), "33.8688°S 70.0000°W");
    }
}
