use ridgeline::cut::{CutOptions, FeatureCutter, FixedZSource, ZSource};
use ridgeline::na::Point3;
use ridgeline::shape::{Geometry, Path, Polyline, SpatialReference};

fn open_path(points: &[(f64, f64, f64)]) -> Path {
    Path::new_open(points.iter().map(|&(x, y, z)| Point3::new(x, y, z)).collect())
}

fn cutter() -> FeatureCutter {
    FeatureCutter::with_z_sources(
        CutOptions::default(),
        FixedZSource(ZSource::InterpolatedSource),
    )
}

fn polylines(results: &[Geometry]) -> Vec<&Polyline> {
    results
        .iter()
        .map(|g| match g {
            Geometry::Polyline(p) => p,
            other => panic!("expected a polyline result, got {other:?}"),
        })
        .collect()
}

#[test]
fn single_part_explodes_largest_first() {
    let polyline = Polyline::single(open_path(&[(0.0, 0.0, 0.0), (10.0, 0.0, 10.0)]));
    let cut_line = Polyline::new(vec![
        open_path(&[(3.0, -5.0, 0.0), (3.0, 5.0, 0.0)]),
        open_path(&[(7.0, -5.0, 0.0), (7.0, 5.0, 0.0)]),
    ]);

    let results = cutter()
        .cut_polyline(
            &polyline,
            &cut_line,
            ZSource::InterpolatedSource,
            &SpatialReference::default(),
        )
        .unwrap();

    assert_eq!(results.len(), 3);
    let lines = polylines(&results);

    assert_relative_eq!(lines[0].length_xy(), 4.0, epsilon = 1.0e-9);
    assert_relative_eq!(lines[1].length_xy(), 3.0, epsilon = 1.0e-9);
    assert_relative_eq!(lines[2].length_xy(), 3.0, epsilon = 1.0e-9);

    let total: f64 = lines.iter().map(|l| l.length_xy()).sum();
    assert_relative_eq!(total, 10.0, epsilon = 1.0e-9);

    // Split vertices interpolate Z along the source path.
    let middle = &lines[0];
    let pts = middle.paths()[0].points();
    assert_relative_eq!(pts[0].z, 3.0, epsilon = 1.0e-9);
    assert_relative_eq!(pts[pts.len() - 1].z, 7.0, epsilon = 1.0e-9);
}

#[test]
fn multipart_groups_by_side_and_keeps_uncut_paths() {
    let polyline = Polyline::new(vec![
        open_path(&[(0.0, 1.0, 0.0), (10.0, 1.0, 0.0)]),
        open_path(&[(0.0, 3.0, 0.0), (10.0, 3.0, 0.0)]),
        // Out of the cut line's reach.
        open_path(&[(0.0, 20.0, 0.0), (10.0, 20.0, 0.0)]),
    ]);
    let cut_line = Polyline::single(open_path(&[(5.0, -1.0, 0.0), (5.0, 5.0, 0.0)]));

    let results = cutter()
        .cut_polyline(
            &polyline,
            &cut_line,
            ZSource::InterpolatedSource,
            &SpatialReference::default(),
        )
        .unwrap();

    assert_eq!(results.len(), 2);
    let lines = polylines(&results);

    // The uncut path is attached to the first (largest) result.
    assert_eq!(lines[0].part_count(), 3);
    assert_eq!(lines[1].part_count(), 2);

    let total: f64 = lines.iter().map(|l| l.length_xy()).sum();
    assert_relative_eq!(total, 30.0, epsilon = 1.0e-9);

    // Pieces of one group lie on one side of the cut line.
    for line in &lines {
        let sides: Vec<bool> = line
            .paths()
            .iter()
            .filter(|p| p.points().iter().all(|q| q.y < 10.0))
            .map(|p| p.points().iter().map(|q| q.x).sum::<f64>() / p.points().len() as f64 > 5.0)
            .collect();
        assert!(sides.windows(2).all(|w| w[0] == w[1]));
    }
}

#[test]
fn disjoint_line_leaves_polyline_uncut() {
    let polyline = Polyline::single(open_path(&[(0.0, 0.0, 0.0), (10.0, 0.0, 0.0)]));
    let cut_line = Polyline::single(open_path(&[(20.0, -5.0, 0.0), (20.0, 5.0, 0.0)]));

    let results = cutter()
        .cut_polyline(
            &polyline,
            &cut_line,
            ZSource::InterpolatedSource,
            &SpatialReference::default(),
        )
        .unwrap();

    assert!(results.is_empty());
}

#[test]
fn touch_without_crossing_at_endpoint_does_not_split() {
    // The cut line only touches the very start of the path.
    let polyline = Polyline::single(open_path(&[(0.0, 0.0, 0.0), (10.0, 0.0, 0.0)]));
    let cut_line = Polyline::single(open_path(&[(0.0, -5.0, 0.0), (0.0, 5.0, 0.0)]));

    let results = cutter()
        .cut_polyline(
            &polyline,
            &cut_line,
            ZSource::InterpolatedSource,
            &SpatialReference::default(),
        )
        .unwrap();

    assert!(results.is_empty());
}
