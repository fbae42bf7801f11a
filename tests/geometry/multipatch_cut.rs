use ridgeline::cut::{
    CutError, CutOptions, DegenerateFootprintPolicy, FeatureCutter, FittedPlane, FixedZSource,
    ProjectedExtent, ZSource,
};
use ridgeline::na::Point3;
use ridgeline::shape::{
    Geometry, Multipatch, Patch, PatchKind, PatchRing, Path, Polyline, RingRole, SpatialReference,
};

fn pts(raw: &[(f64, f64, f64)]) -> Vec<Point3<f64>> {
    raw.iter().map(|&(x, y, z)| Point3::new(x, y, z)).collect()
}

/// A 10 x 10 x 10 box: a roof footprint at z = 10 and four vertical walls.
fn box_building() -> Multipatch {
    let roof = PatchRing::new(
        RingRole::Footprint,
        pts(&[
            (0.0, 0.0, 10.0),
            (10.0, 0.0, 10.0),
            (10.0, 10.0, 10.0),
            (0.0, 10.0, 10.0),
        ]),
    );
    let south = PatchRing::new(
        RingRole::Wall,
        pts(&[
            (0.0, 0.0, 0.0),
            (10.0, 0.0, 0.0),
            (10.0, 0.0, 10.0),
            (0.0, 0.0, 10.0),
        ]),
    );
    let east = PatchRing::new(
        RingRole::Wall,
        pts(&[
            (10.0, 0.0, 0.0),
            (10.0, 10.0, 0.0),
            (10.0, 10.0, 10.0),
            (10.0, 0.0, 10.0),
        ]),
    );
    let north = PatchRing::new(
        RingRole::Wall,
        pts(&[
            (10.0, 10.0, 0.0),
            (0.0, 10.0, 0.0),
            (0.0, 10.0, 10.0),
            (10.0, 10.0, 10.0),
        ]),
    );
    let west = PatchRing::new(
        RingRole::Wall,
        pts(&[
            (0.0, 10.0, 0.0),
            (0.0, 0.0, 0.0),
            (0.0, 0.0, 10.0),
            (0.0, 10.0, 10.0),
        ]),
    );

    Multipatch::new(vec![Patch::new(vec![roof, south, east, north, west])])
}

fn cut_line_at(x: f64) -> Polyline {
    Polyline::single(Path::new_open(pts(&[(x, -5.0, 0.0), (x, 15.0, 0.0)])))
}

fn cutter(policy: DegenerateFootprintPolicy) -> FeatureCutter {
    let options = CutOptions {
        footprint_policy: policy,
        ..CutOptions::default()
    };
    FeatureCutter::with_z_sources(options, FixedZSource(ZSource::SourcePlane))
}

fn multipatches(results: &[Geometry]) -> Vec<&Multipatch> {
    results
        .iter()
        .map(|g| match g {
            Geometry::Multipatch(m) => m,
            other => panic!("expected a multipatch result, got {other:?}"),
        })
        .collect()
}

fn surface_area_3d(multipatch: &Multipatch) -> f64 {
    let mut total = 0.0;
    for patch in multipatch.patches() {
        for ring in patch.rings() {
            let fitted = FittedPlane::fit(ring.points(), 0.001);
            if let ProjectedExtent::Planar { area, .. } = fitted.projected_extent(ring.points()) {
                match ring.role() {
                    RingRole::Hole => total -= area,
                    _ => total += area,
                }
            }
        }
    }
    total
}

#[test]
fn box_cut_through_walls_yields_two_buildings() {
    let building = box_building();
    let results = cutter(DegenerateFootprintPolicy::Throw)
        .cut_multipatch(
            &building,
            &cut_line_at(4.0),
            ZSource::SourcePlane,
            &SpatialReference::default(),
        )
        .unwrap();

    assert_eq!(results.len(), 2);
    let parts = multipatches(&results);

    // 2 roof pieces + 2 x 2 cut wall pieces + 2 whole walls.
    let total_rings: usize = parts
        .iter()
        .flat_map(|m| m.patches())
        .map(|p| p.rings().len())
        .sum();
    assert_eq!(total_rings, 8);

    for part in &parts {
        let walls = part
            .patches()
            .iter()
            .flat_map(|p| p.rings())
            .filter(|r| r.role() == RingRole::Wall)
            .count();
        assert_eq!(walls, 3);
    }

    // The larger (eastern) part comes first.
    let roof_area = |m: &Multipatch| -> f64 {
        m.patches()
            .iter()
            .flat_map(|p| p.rings())
            .filter(|r| r.role() == RingRole::Footprint)
            .map(|r| {
                let fitted = FittedPlane::fit(r.points(), 0.001);
                match fitted.projected_extent(r.points()) {
                    ProjectedExtent::Planar { area, .. } => area,
                    ProjectedExtent::Linear { .. } => 0.0,
                }
            })
            .sum()
    };
    assert_relative_eq!(roof_area(parts[0]), 60.0, epsilon = 1.0e-6);
    assert_relative_eq!(roof_area(parts[1]), 40.0, epsilon = 1.0e-6);

    // The combined 3D surface equals the original within 0.01.
    let original = surface_area_3d(&building);
    let combined: f64 = parts.iter().map(|m| surface_area_3d(m)).sum();
    assert_relative_eq!(original, 500.0, epsilon = 1.0e-9);
    assert!((combined - original).abs() < 0.01);

    // No vertex lost its elevation.
    for part in &parts {
        for patch in part.patches() {
            for ring in patch.rings() {
                assert!(ring.points().iter().all(|p| !p.z.is_nan()));
            }
        }
    }
}

#[test]
fn disjoint_cut_line_leaves_multipatch_uncut() {
    let building = box_building();
    let results = cutter(DegenerateFootprintPolicy::Throw)
        .cut_multipatch(
            &building,
            &cut_line_at(25.0),
            ZSource::SourcePlane,
            &SpatialReference::default(),
        )
        .unwrap();

    assert!(results.is_empty());
}

#[test]
fn triangle_strip_patches_are_rejected() {
    let strip = Patch::with_kind(
        PatchKind::TriangleStrip,
        vec![PatchRing::new(
            RingRole::Footprint,
            pts(&[(0.0, 0.0, 0.0), (10.0, 0.0, 0.0), (0.0, 10.0, 0.0)]),
        )],
    );
    let multipatch = Multipatch::new(vec![strip]);

    let err = cutter(DegenerateFootprintPolicy::Throw)
        .cut_multipatch(
            &multipatch,
            &cut_line_at(4.0),
            ZSource::SourcePlane,
            &SpatialReference::default(),
        )
        .unwrap_err();

    assert!(matches!(err, CutError::UnsupportedGeometry { patch: 0, .. }));
}

/// A building plus a second patch whose footprint is a self-intersecting
/// bowtie, out of the cut line's reach.
fn building_with_bowtie() -> Multipatch {
    let bowtie = Patch::new(vec![PatchRing::new(
        RingRole::Footprint,
        pts(&[
            (20.0, 0.0, 5.0),
            (22.0, 2.0, 5.0),
            (22.0, 0.0, 5.0),
            (20.0, 2.0, 5.0),
        ]),
    )]);

    let mut patches = box_building().patches().to_vec();
    patches.push(bowtie);
    Multipatch::new(patches)
}

#[test]
fn degenerate_footprint_policy_throw() {
    let err = cutter(DegenerateFootprintPolicy::Throw)
        .cut_multipatch(
            &building_with_bowtie(),
            &cut_line_at(4.0),
            ZSource::SourcePlane,
            &SpatialReference::default(),
        )
        .unwrap_err();

    assert!(matches!(err, CutError::DegenerateResultGeometry { .. }));
}

#[test]
fn degenerate_footprint_policy_discard() {
    let results = cutter(DegenerateFootprintPolicy::Discard)
        .cut_multipatch(
            &building_with_bowtie(),
            &cut_line_at(4.0),
            ZSource::SourcePlane,
            &SpatialReference::default(),
        )
        .unwrap();

    // Only the two pieces of the proper building survive.
    assert_eq!(results.len(), 2);
}

#[test]
fn degenerate_footprint_policy_keep() {
    let results = cutter(DegenerateFootprintPolicy::Keep)
        .cut_multipatch(
            &building_with_bowtie(),
            &cut_line_at(4.0),
            ZSource::SourcePlane,
            &SpatialReference::default(),
        )
        .unwrap();

    assert_eq!(results.len(), 3);
}
