use ridgeline::cut::{CutOptions, FeatureCutter, FittedPlane, FixedZSource, ZSource};
use ridgeline::na::Point3;
use ridgeline::shape::{Geometry, Path, Polygon, Polyline, SpatialReference};

fn ring(points: &[(f64, f64, f64)]) -> Path {
    Path::new_ring(points.iter().map(|&(x, y, z)| Point3::new(x, y, z)).collect())
}

fn open_path(points: &[(f64, f64, f64)]) -> Path {
    Path::new_open(points.iter().map(|&(x, y, z)| Point3::new(x, y, z)).collect())
}

fn square(size: f64, z: f64) -> Polygon {
    Polygon::new(vec![ring(&[
        (0.0, 0.0, z),
        (size, 0.0, z),
        (size, size, z),
        (0.0, size, z),
    ])])
}

fn square_with_hole() -> Polygon {
    // 100 x 100 square with a 10 x 10 hole in the middle (hole clockwise).
    Polygon::new(vec![
        ring(&[
            (0.0, 0.0, 0.0),
            (100.0, 0.0, 0.0),
            (100.0, 100.0, 0.0),
            (0.0, 100.0, 0.0),
        ]),
        ring(&[
            (45.0, 45.0, 0.0),
            (45.0, 55.0, 0.0),
            (55.0, 55.0, 0.0),
            (55.0, 45.0, 0.0),
        ]),
    ])
}

fn cutter(z_source: ZSource) -> FeatureCutter {
    FeatureCutter::with_z_sources(CutOptions::default(), FixedZSource(z_source))
}

fn polygons(results: &[Geometry]) -> Vec<&Polygon> {
    results
        .iter()
        .map(|g| match g {
            Geometry::Polygon(p) => p,
            other => panic!("expected a polygon result, got {other:?}"),
        })
        .collect()
}

#[test]
fn square_cut_produces_two_polygons_conserving_area() {
    let polygon = square(10.0, 5.0);
    let cut_line = Polyline::single(open_path(&[(4.0, -5.0, 0.0), (4.0, 15.0, 0.0)]));

    let results = cutter(ZSource::InterpolatedSource)
        .cut_polygon(&polygon, &cut_line, ZSource::InterpolatedSource, &SpatialReference::default())
        .unwrap();

    assert_eq!(results.len(), 2);
    let polys = polygons(&results);

    // Largest piece first.
    assert_relative_eq!(polys[0].area_xy(), 60.0, epsilon = 1.0e-9);
    assert_relative_eq!(polys[1].area_xy(), 40.0, epsilon = 1.0e-9);

    // All vertices keep the source elevation; no NaN appears.
    for poly in &polys {
        for ring in poly.rings() {
            for pt in ring.points() {
                assert_relative_eq!(pt.z, 5.0, epsilon = 1.0e-9);
            }
        }
    }
}

#[test]
fn disjoint_cut_line_yields_no_result() {
    let polygon = square(10.0, 0.0);
    let cut_line = Polyline::single(open_path(&[(20.0, -5.0, 0.0), (20.0, 15.0, 0.0)]));

    let results = cutter(ZSource::InterpolatedSource)
        .cut_polygon(&polygon, &cut_line, ZSource::InterpolatedSource, &SpatialReference::default())
        .unwrap();

    assert!(results.is_empty());
}

#[test]
fn boundary_coincident_cut_line_yields_no_result() {
    let polygon = square(10.0, 0.0);
    let cut_line = Polyline::single(open_path(&[(-5.0, 0.0, 0.0), (15.0, 0.0, 0.0)]));

    let results = cutter(ZSource::InterpolatedSource)
        .cut_polygon(&polygon, &cut_line, ZSource::InterpolatedSource, &SpatialReference::default())
        .unwrap();

    assert!(results.is_empty());
}

#[test]
fn hole_stays_with_the_containing_result() {
    // Cut passes 20 units north of the hole: exactly 2 results, 3 rings in
    // total, and the hole belongs to the southern (larger) result.
    let polygon = square_with_hole();
    let cut_line = Polyline::single(open_path(&[(-10.0, 75.0, 0.0), (110.0, 75.0, 0.0)]));

    let results = cutter(ZSource::InterpolatedSource)
        .cut_polygon(&polygon, &cut_line, ZSource::InterpolatedSource, &SpatialReference::default())
        .unwrap();

    assert_eq!(results.len(), 2);
    let polys = polygons(&results);

    let total_rings: usize = polys.iter().map(|p| p.ring_count()).sum();
    assert_eq!(total_rings, 3);

    // The southern piece is the larger one and comes first.
    assert_eq!(polys[0].ring_count(), 2);
    assert!(polys[0].rings()[0].points().iter().any(|p| p.y < 1.0));
    assert_eq!(polys[1].ring_count(), 1);

    let total_area: f64 = polys.iter().map(|p| p.area_xy()).sum();
    assert_relative_eq!(total_area, 100.0 * 100.0 - 100.0, epsilon = 1.0e-6);
}

#[test]
fn inner_ring_assignment_is_deterministic() {
    let polygon = square_with_hole();
    let cut_line = Polyline::single(open_path(&[(-10.0, 75.0, 0.0), (110.0, 75.0, 0.0)]));
    let cutter = cutter(ZSource::InterpolatedSource);

    for _ in 0..20 {
        let results = cutter
            .cut_polygon(
                &polygon,
                &cut_line,
                ZSource::InterpolatedSource,
                &SpatialReference::default(),
            )
            .unwrap();

        let polys = polygons(&results);
        assert_eq!(polys[0].ring_count(), 2);
        assert_eq!(polys[1].ring_count(), 1);
    }
}

#[test]
fn source_plane_z_round_trip() {
    // A sloped planar ring: z = 2 + 0.5 * x.
    let polygon = Polygon::new(vec![ring(&[
        (0.0, 0.0, 2.0),
        (10.0, 0.0, 7.0),
        (10.0, 10.0, 7.0),
        (0.0, 10.0, 2.0),
    ])]);
    let cut_line = Polyline::single(open_path(&[(6.0, -5.0, 0.0), (6.0, 15.0, 0.0)]));

    let results = cutter(ZSource::SourcePlane)
        .cut_polygon(&polygon, &cut_line, ZSource::SourcePlane, &SpatialReference::default())
        .unwrap();

    assert_eq!(results.len(), 2);

    let source_points: Vec<Point3<f64>> = polygon.rings()[0].points().to_vec();
    let fitted = FittedPlane::fit(&source_points, 0.001);
    let plane = fitted.as_defined().expect("planar ring must fit");

    for poly in polygons(&results) {
        for ring in poly.rings() {
            for pt in ring.points() {
                assert!(!pt.z.is_nan());
                let expected = plane.z_at(pt.x, pt.y).unwrap();
                assert_relative_eq!(pt.z, expected, epsilon = 1.0e-3);
            }
        }
    }
}

#[test]
fn interpolated_z_at_crossings() {
    // Bottom edge climbs from z = 0 to z = 10; a cut at x = 4 must
    // interpolate z = 4 on that edge.
    let polygon = Polygon::new(vec![ring(&[
        (0.0, 0.0, 0.0),
        (10.0, 0.0, 10.0),
        (10.0, 10.0, 10.0),
        (0.0, 10.0, 0.0),
    ])]);
    let cut_line = Polyline::single(open_path(&[(4.0, -5.0, 0.0), (4.0, 15.0, 0.0)]));

    let results = cutter(ZSource::InterpolatedSource)
        .cut_polygon(&polygon, &cut_line, ZSource::InterpolatedSource, &SpatialReference::default())
        .unwrap();

    let polys = polygons(&results);
    let mut found_bottom_crossing = false;

    for poly in &polys {
        for ring in poly.rings() {
            for pt in ring.points() {
                assert!(!pt.z.is_nan());
                if (pt.x - 4.0).abs() < 1.0e-9 && pt.y.abs() < 1.0e-9 {
                    assert_relative_eq!(pt.z, 4.0, epsilon = 1.0e-9);
                    found_bottom_crossing = true;
                }
            }
        }
    }

    assert!(found_bottom_crossing);
}

#[test]
fn multi_component_polygon_keeps_uncut_component_with_the_first_result() {
    // Two disjoint squares; the cut only hits the western one.
    let polygon = Polygon::new(vec![
        ring(&[
            (0.0, 0.0, 0.0),
            (10.0, 0.0, 0.0),
            (10.0, 10.0, 0.0),
            (0.0, 10.0, 0.0),
        ]),
        ring(&[
            (20.0, 0.0, 0.0),
            (26.0, 0.0, 0.0),
            (26.0, 6.0, 0.0),
            (20.0, 6.0, 0.0),
        ]),
    ]);
    let cut_line = Polyline::single(open_path(&[(4.0, -5.0, 0.0), (4.0, 15.0, 0.0)]));

    let results = cutter(ZSource::InterpolatedSource)
        .cut_polygon(&polygon, &cut_line, ZSource::InterpolatedSource, &SpatialReference::default())
        .unwrap();

    assert_eq!(results.len(), 2);
    let polys = polygons(&results);

    // Result 0: the larger western piece plus the untouched eastern square.
    assert_eq!(polys[0].ring_count(), 2);
    assert_relative_eq!(polys[0].area_xy(), 60.0 + 36.0, epsilon = 1.0e-9);
    assert_relative_eq!(polys[1].area_xy(), 40.0, epsilon = 1.0e-9);
}

#[test]
fn cut_through_feature_map_keyed_by_oid() {
    use ridgeline::shape::Feature;

    let feature = Feature {
        oid: 42,
        dataset: "parcels".to_string(),
        srs: SpatialReference::default(),
        geometry: Geometry::Polygon(square(10.0, 0.0)),
    };
    let cut_line = Polyline::single(open_path(&[(5.0, -5.0, 0.0), (5.0, 15.0, 0.0)]));

    let results = cutter(ZSource::InterpolatedSource)
        .cut(&[feature], &cut_line)
        .unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[&42].len(), 2);
}
