use crate::models::LatLng;

/// Arc height as a fraction of the start-to-end distance.
pub const DEFAULT_ARC_HEIGHT_RATIO: f64 = 0.3;

/// Zoom thresholds on the larger of |Δlat| and |Δlng|, checked from the largest
/// extent downward. Anything at or below the last threshold gets `CLOSE_ZOOM`.
const ZOOM_STEPS: [(f64, u8); 7] = [
    (60.0, 2),
    (30.0, 3),
    (15.0, 4),
    (8.0, 5),
    (4.0, 6),
    (2.0, 7),
    (1.0, 8),
];
const CLOSE_ZOOM: u8 = 9;

/// Cubic ease-in-out. Input is clamped to [0, 1].
pub fn ease(t: f64) -> f64 {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

pub fn lerp_lat_lng(a: LatLng, b: LatLng, t: f64) -> LatLng {
    LatLng::new(lerp(a.lat, b.lat, t), lerp(a.lng, b.lng, t))
}

/// Planar lat/lng distance. Not geodesic; good enough at city-to-city scale.
pub fn planar_distance(a: LatLng, b: LatLng) -> f64 {
    let dlat = b.lat - a.lat;
    let dlng = b.lng - a.lng;
    (dlat * dlat + dlng * dlng).sqrt()
}

/// Sample a curved path from `start` to `end` as a quadratic Bézier whose
/// control point sits off the midpoint, perpendicular to the travel direction,
/// at `height_ratio` times the distance.
///
/// Always returns `num_points + 1` points (`num_points` of 0 is treated as 1).
/// Coincident or non-finite endpoints give a degenerate path repeating the
/// sanitized start point.
pub fn arc_path(start: LatLng, end: LatLng, num_points: usize, height_ratio: f64) -> Vec<LatLng> {
    let n = num_points.max(1);

    if !start.is_finite() || !end.is_finite() || !height_ratio.is_finite() {
        return vec![start.clamped(); n + 1];
    }

    let dist = planar_distance(start, end);
    if dist == 0.0 || !dist.is_finite() {
        return vec![start; n + 1];
    }

    let mid = lerp_lat_lng(start, end, 0.5);
    // Unit perpendicular to the start->end direction, in (lat, lng) space.
    let perp_lat = -(end.lng - start.lng) / dist;
    let perp_lng = (end.lat - start.lat) / dist;
    let height = height_ratio * dist;
    let control = LatLng::new(mid.lat + perp_lat * height, mid.lng + perp_lng * height);

    (0..=n)
        .map(|i| {
            let t = i as f64 / n as f64;
            let u = 1.0 - t;
            let a = u * u;
            let b = 2.0 * u * t;
            let c = t * t;
            LatLng::new(
                a * start.lat + b * control.lat + c * end.lat,
                a * start.lng + b * control.lng + c * end.lng,
            )
        })
        .collect()
}

/// Coarse zoom level that keeps both endpoints in view.
pub fn fit_zoom_for_extent(start: LatLng, end: LatLng) -> u8 {
    let extent = (end.lat - start.lat).abs().max((end.lng - start.lng).abs());
    if extent.is_nan() {
        return ZOOM_STEPS[0].1;
    }
    ZOOM_STEPS
        .iter()
        .find(|(threshold, _)| extent > *threshold)
        .map(|(_, zoom)| *zoom)
        .unwrap_or(CLOSE_ZOOM)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn close(a: LatLng, b: LatLng) -> bool {
        (a.lat - b.lat).abs() < EPS && (a.lng - b.lng).abs() < EPS
    }

    #[test]
    fn test_ease_boundaries() {
        assert_eq!(ease(0.0), 0.0);
        assert_eq!(ease(1.0), 1.0);
        assert!((ease(0.5) - 0.5).abs() < EPS);
    }

    #[test]
    fn test_ease_clamps_input() {
        assert_eq!(ease(-0.5), 0.0);
        assert_eq!(ease(3.0), 1.0);
        assert_eq!(ease(f64::NAN), 0.0);
    }

    #[test]
    fn test_ease_monotonic() {
        let mut prev = ease(0.0);
        for i in 1..=1000 {
            let cur = ease(i as f64 / 1000.0);
            assert!(cur >= prev, "ease decreased at step {i}");
            prev = cur;
        }
    }

    #[test]
    fn test_ease_symmetric() {
        for i in 0..=100 {
            let t = i as f64 / 100.0;
            assert!((ease(t) - (1.0 - ease(1.0 - t))).abs() < 1e-12, "asymmetric at {t}");
        }
    }

    #[test]
    fn test_arc_endpoints_match() {
        let start = LatLng::new(50.6292, 3.0573);
        let end = LatLng::new(51.2093, 3.2247);
        let path = arc_path(start, end, 50, DEFAULT_ARC_HEIGHT_RATIO);
        assert!(close(path[0], start));
        assert!(close(path[50], end));
    }

    #[test]
    fn test_arc_point_count() {
        let start = LatLng::new(0.0, 0.0);
        let end = LatLng::new(10.0, 20.0);
        for n in [1, 2, 7, 50, 128] {
            assert_eq!(arc_path(start, end, n, 0.3).len(), n + 1);
        }
    }

    #[test]
    fn test_arc_zero_samples_treated_as_one() {
        let path = arc_path(LatLng::new(0.0, 0.0), LatLng::new(1.0, 1.0), 0, 0.3);
        assert_eq!(path.len(), 2);
    }

    #[test]
    fn test_arc_bows_off_straight_line() {
        let start = LatLng::new(0.0, 0.0);
        let end = LatLng::new(0.0, 10.0);
        let path = arc_path(start, end, 50, 0.3);
        let mid = path[25];
        assert!((mid.lng - 5.0).abs() < EPS);
        // Bézier midpoint sits half way to the control point: 0.5 * 0.3 * 10.
        assert!((mid.lat.abs() - 1.5).abs() < EPS);
    }

    #[test]
    fn test_arc_degenerate_for_coincident_points() {
        let p = LatLng::new(48.8566, 2.3522);
        let path = arc_path(p, p, 50, 0.3);
        assert_eq!(path.len(), 51);
        assert!(path.iter().all(|q| *q == p));
    }

    #[test]
    fn test_arc_never_emits_nan() {
        let path = arc_path(LatLng::new(f64::NAN, 2.0), LatLng::new(10.0, 10.0), 10, 0.3);
        assert_eq!(path.len(), 11);
        assert!(path.iter().all(|q| q.is_finite()));
    }

    #[test]
    fn test_fit_zoom_thresholds() {
        let origin = LatLng::new(0.0, 0.0);
        let cases = [
            (61.0, 2),
            (60.0, 3),
            (31.0, 3),
            (16.0, 4),
            (9.0, 5),
            (5.0, 6),
            (3.0, 7),
            (1.5, 8),
            (1.0, 9),
            (0.0, 9),
        ];
        for (extent, expected) in cases {
            assert_eq!(
                fit_zoom_for_extent(origin, LatLng::new(0.0, extent)),
                expected,
                "extent {extent}"
            );
        }
    }

    #[test]
    fn test_fit_zoom_uses_larger_axis() {
        let z = fit_zoom_for_extent(LatLng::new(0.0, 0.0), LatLng::new(-20.0, 3.0));
        assert_eq!(z, 4);
    }

    #[test]
    fn test_fit_zoom_non_increasing_with_extent() {
        let origin = LatLng::new(0.0, 0.0);
        let mut prev = u8::MAX;
        for i in 0..=900 {
            let extent = i as f64 * 0.1;
            let z = fit_zoom_for_extent(origin, LatLng::new(extent, 0.0));
            assert!(z <= prev, "zoom increased at extent {extent}");
            prev = z;
        }
    }

    #[test]
    fn test_planar_distance() {
        let d = planar_distance(LatLng::new(0.0, 0.0), LatLng::new(3.0, 4.0));
        assert!((d - 5.0).abs() < EPS);
    }
}
