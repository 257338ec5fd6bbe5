use super::*;
use crate::polyline::RoutePolyline;
use crate::quality::QualityPreset;
use crate::route::GeoBounds;
use crate::sculpture::{RouteStyle, SculptureConfig};
use approx::assert_relative_eq;

fn dims(shape: Shape, style: RouteStyle, resolution: u32) -> Dimensions {
    let config = SculptureConfig {
        shape,
        route_style: style,
        terrain_resolution: Some(resolution),
        ..Default::default()
    };
    Dimensions::resolve(&config, QualityPreset::Preview).unwrap()
}

fn bounds() -> GeoBounds {
    GeoBounds {
        min_lat: 0.0,
        max_lat: 0.01,
        min_lon: 0.0,
        max_lon: 0.01,
    }
}

/// A single sharp peak in the middle of a flat grid.
fn peak_grid() -> ElevationGrid {
    let size = 9;
    let mut samples = vec![0.0; size * size];
    samples[4 * size + 4] = 1000.0;
    ElevationGrid::new(size, size, samples).unwrap()
}

fn ramp_grid() -> ElevationGrid {
    let size = 16;
    let samples = (0..size * size).map(|i| ((i % size) * 40) as f64).collect();
    ElevationGrid::new(size, size, samples).unwrap()
}

#[test]
fn test_smooth_leaves_borders() {
    let mut heights = vec![0.0; 25];
    heights[12] = 16.0;
    heights[4] = 5.0;
    smooth(&mut heights, 5, 1);
    assert_eq!(heights[4], 5.0);
    assert_relative_eq!(heights[12], 4.0, epsilon = 1e-12);
    assert_relative_eq!(heights[7], 2.0, epsilon = 1e-12);
    assert_relative_eq!(heights[6], 1.0, epsilon = 1e-12);
}

#[test]
fn test_smooth_zero_passes_is_noop() {
    let mut heights: Vec<f64> = (0..16).map(f64::from).collect();
    let before = heights.clone();
    smooth(&mut heights, 4, 0);
    assert_eq!(heights, before);
}

#[test]
fn test_groove_profile_ends() {
    assert_relative_eq!(groove_profile(0.0), 1.0, epsilon = 1e-12);
    assert_relative_eq!(groove_profile(1.0), 0.0, epsilon = 1e-12);
    assert_relative_eq!(groove_profile(0.5), 0.5, epsilon = 1e-12);
}

#[test]
fn test_heights_within_bounds() {
    let d = dims(Shape::Rectangular, RouteStyle::Raised, 32);
    let projection = Projection::new(bounds(), (0.0, 1000.0), &d);
    let grid = peak_grid();
    let source = TerrainSource {
        projection: &projection,
        elevation: Some(&grid),
        route_points: &[],
    };
    let terrain = build_terrain(&source, &RouteInfluence::None, &d).unwrap();
    for v in terrain.surface.vertices() {
        assert!(v.y >= d.min_terrain_height && v.y <= d.max_height, "{}", v.y);
    }
    assert_eq!(terrain.surface_triangle_count(), 32 * 32 * 2);
}

#[test]
fn test_ramp_rises_eastward() {
    let d = dims(Shape::Rectangular, RouteStyle::Raised, 16);
    let projection = Projection::new(bounds(), (0.0, 600.0), &d);
    let grid = ramp_grid();
    let source = TerrainSource {
        projection: &projection,
        elevation: Some(&grid),
        route_points: &[],
    };
    let terrain = build_terrain(&source, &RouteInfluence::None, &d).unwrap();
    let row = 8 * 17;
    let west = terrain.surface.vertex(row + 2).y;
    let east = terrain.surface.vertex(row + 14).y;
    assert!(east > west);
}

#[test]
fn test_raised_clearance_below_tube() {
    let d = dims(Shape::Circular, RouteStyle::Raised, 64);
    let projection = Projection::new(bounds(), (0.0, 100.0), &d);
    let grid = ElevationGrid::new(2, 2, vec![100.0; 4]).unwrap();
    let samples: Vec<DVec3> = (0..=20)
        .map(|i| DVec3::new(-0.4 + 0.04 * i as f64, d.min_terrain_height, 0.0))
        .collect();
    let line = RoutePolyline::new(&samples);
    let source = TerrainSource {
        projection: &projection,
        elevation: Some(&grid),
        route_points: &[],
    };
    let terrain = build_terrain(&source, &RouteInfluence::Raised(line.clone()), &d).unwrap();

    let mut checked = 0;
    for v in terrain.surface.vertices() {
        if let Some(n) = line.nearest_within(v.x, v.z, d.clearance_radius) {
            let bottom = d.tube_center_height(n.height) - d.tube_radius;
            assert!(v.y <= bottom + 1e-12, "terrain {} above tube bottom {}", v.y, bottom);
            checked += 1;
        }
    }
    assert!(checked > 0);
    // Far from the route the flat grid sits at the ceiling.
    let corner_free = terrain
        .surface
        .vertices()
        .iter()
        .filter(|v| v.z.abs() > 0.2 && v.z.abs() < 0.5 && v.x.abs() < 0.2)
        .all(|v| (v.y - d.max_height).abs() < 1e-12);
    assert!(corner_free);
}

#[test]
fn test_clearance_takes_lowest_crossing_segment() {
    let d = dims(Shape::Circular, RouteStyle::Raised, 16);
    let (high, low) = (d.max_height, d.min_terrain_height);
    // A high pass over the origin along z, then a low pass under it along x.
    let samples = [
        DVec3::new(0.0, high, -0.3),
        DVec3::new(0.0, high, 0.3),
        DVec3::new(-0.3, low, 0.0),
        DVec3::new(0.3, low, 0.0),
    ];
    let line = RoutePolyline::new(&samples);
    let height = shape_height(d.max_height, 0.0, 0.0, &RouteInfluence::Raised(line), &d);
    assert_relative_eq!(height, d.clearance_ceiling(low).max(low), epsilon = 1e-12);
    assert!(height < d.clearance_ceiling(high));
}

#[test]
fn test_clearance_drops_under_steep_segment() {
    let d = dims(Shape::Circular, RouteStyle::Raised, 16);
    let floor = d.min_terrain_height;
    let samples = [DVec3::new(-0.02, floor, 0.0), DVec3::new(0.02, floor + 0.04, 0.0)];
    let line = RoutePolyline::new(&samples);
    let height = shape_height(d.max_height, 0.0, 0.0, &RouteInfluence::Raised(line), &d);

    let mid = floor + 0.02;
    assert!(height < d.clearance_ceiling(mid));
    // At slope 1 the tube hangs r * sqrt(2) below its centreline.
    let lowest_tube = d.tube_center_height(mid) - d.tube_radius * 2f64.sqrt();
    assert!(height + d.safety_margin <= lowest_tube + 1e-12);
    assert!(height >= floor);
}

#[test]
fn test_engraved_groove_dips_on_route() {
    let d = dims(Shape::Rectangular, RouteStyle::Engraved, 64);
    let projection = Projection::new(bounds(), (0.0, 100.0), &d);
    let grid = ElevationGrid::new(2, 2, vec![100.0; 4]).unwrap();
    let route = vec![
        DVec3::new(-0.5, d.max_height * 0.5, 0.0),
        DVec3::new(0.5, d.max_height * 0.5, 0.0),
    ];
    let source = TerrainSource {
        projection: &projection,
        elevation: Some(&grid),
        route_points: &route,
    };
    let influence = RouteInfluence::Engraved(RoutePolyline::new(&route));
    let terrain = build_terrain(&source, &influence, &d).unwrap();

    // Grid row at z = 0 lies on the route.
    let size = 65;
    let on_route = terrain.surface.vertex((32 * size + 32) as u32).y;
    assert_relative_eq!(on_route, d.max_height * 0.5 - d.groove_depth, epsilon = 1e-6);
    let away = terrain.surface.vertex((60 * size + 32) as u32).y;
    assert_relative_eq!(away, d.max_height, epsilon = 1e-12);
}

#[test]
fn test_route_fallback_sampling() {
    let config = SculptureConfig {
        shape: Shape::Rectangular,
        terrain_resolution: Some(8),
        terrain_smoothing: Some(0),
        ..Default::default()
    };
    let d = Dimensions::resolve(&config, QualityPreset::Preview).unwrap();
    let projection = Projection::new(bounds(), (0.0, 100.0), &d);
    let route = vec![DVec3::new(-0.5, 0.02, 0.0), DVec3::new(0.5, 0.08, 0.0)];
    let source = TerrainSource {
        projection: &projection,
        elevation: None,
        route_points: &route,
    };
    let terrain = build_terrain(&source, &RouteInfluence::None, &d).unwrap();
    let west = terrain.surface.vertex(4 * 9 + 1).y;
    let east = terrain.surface.vertex(4 * 9 + 7).y;
    assert_relative_eq!(west, 0.02, epsilon = 1e-12);
    assert_relative_eq!(east, 0.08, epsilon = 1e-12);
}

#[test]
fn test_circular_trim_footprint() {
    let d = dims(Shape::Circular, RouteStyle::Raised, 48);
    let projection = Projection::new(bounds(), (0.0, 1000.0), &d);
    let grid = peak_grid();
    let source = TerrainSource {
        projection: &projection,
        elevation: Some(&grid),
        route_points: &[],
    };
    let terrain = build_terrain(&source, &RouteInfluence::None, &d).unwrap();
    assert!(terrain.trimmed > 0);
    assert!(terrain.collapsed > 0);
    assert!(terrain.surface_triangle_count() < 48 * 48 * 2);
    let limit = d.radius * config::constants::TERRAIN_TRIM_FRACTION + 1e-12;
    for v in terrain.surface.vertices() {
        let r = DVec2::new(v.x, v.z).length();
        assert!(r <= limit);
        if r > limit - 1e-9 {
            assert_eq!(v.y, 0.0);
        }
    }
}

#[test]
fn test_solid_is_closed() {
    for shape in [Shape::Rectangular, Shape::Circular] {
        let d = dims(shape, RouteStyle::Raised, 24);
        let projection = Projection::new(bounds(), (0.0, 1000.0), &d);
        let grid = peak_grid();
        let source = TerrainSource {
            projection: &projection,
            elevation: Some(&grid),
            route_points: &[],
        };
        let terrain = build_terrain(&source, &RouteInfluence::None, &d).unwrap();
        assert!(terrain.surface.open_edge_count() > 0);
        let solid = terrain.solid();
        assert_eq!(solid.open_edge_count(), 0, "{shape:?}");
        let (min, _) = solid.bounding_box();
        assert_eq!(min.y, 0.0);
    }
}

#[test]
fn test_deterministic() {
    let d = dims(Shape::Circular, RouteStyle::Engraved, 32);
    let projection = Projection::new(bounds(), (0.0, 1000.0), &d);
    let grid = peak_grid();
    let route = vec![DVec3::new(-0.3, 0.05, 0.1), DVec3::new(0.3, 0.1, -0.1)];
    let source = TerrainSource {
        projection: &projection,
        elevation: Some(&grid),
        route_points: &route,
    };
    let influence = RouteInfluence::Engraved(RoutePolyline::new(&route));
    let a = build_terrain(&source, &influence, &d).unwrap();
    let b = build_terrain(&source, &influence, &d).unwrap();
    assert_eq!(a.surface, b.surface);
}

#[test]
fn test_surface_uvs_span_unit_square() {
    let d = dims(Shape::Rectangular, RouteStyle::Raised, 8);
    let projection = Projection::new(bounds(), (0.0, 1000.0), &d);
    let source = TerrainSource {
        projection: &projection,
        elevation: None,
        route_points: &[],
    };
    let terrain = build_terrain(&source, &RouteInfluence::None, &d).unwrap();
    let uvs = terrain.surface.uvs().unwrap();
    assert_eq!(uvs.len(), terrain.surface.vertex_count());
    assert_eq!(uvs[0], DVec2::ZERO);
    assert_eq!(uvs[uvs.len() - 1], DVec2::ONE);
}
