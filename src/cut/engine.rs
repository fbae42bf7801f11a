//! The feature cutter: orchestrates validation, intersection, partition,
//! reconstruction, Z assignment and result classification for all three
//! geometry families.

use crate::cut::part_list::SegmentPartList;
use crate::cut::plane_fit::{FittedPlane, ProjectedExtent};
use crate::cut::ring_cutter::{self, CutPiece, PreparedLine, RingDraft, Side};
use crate::cut::wall;
use crate::cut::zsource::{interpolate_undefined_zs, FixedZSource, ZSource, ZSourceProvider};
use crate::cut::CutError;
use crate::math::{Point, Real};
use crate::proxy::IndexedMultipatch;
use crate::shape::{
    Feature, Geometry, Multipatch, Patch, PatchRing, Path, Polygon, Polyline, RingRole,
    SpatialReference,
};
use crate::utils;
use log::{debug, warn};
use ordered_float::OrderedFloat;
use smallvec::SmallVec;
use std::collections::{BTreeMap, HashMap};

/// What to do when a multipatch cut result's footprint collapses to a
/// non-simple or near-zero-area polygon.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum DegenerateFootprintPolicy {
    /// Return the degenerate result anyway.
    Keep,
    /// Silently drop the degenerate result from the output list.
    Discard,
    /// Raise [`CutError::DegenerateResultGeometry`].
    #[default]
    Throw,
}

/// Configuration of one cut invocation.
#[derive(Copy, Clone, Debug)]
pub struct CutOptions {
    /// Relative tolerance for the size-conservation check: the summed size
    /// of the results may deviate from the original area/length by at most
    /// this fraction. Feature-size-relative on purpose; there is no
    /// meaningful absolute constant across datasets.
    pub size_tolerance: Real,
    /// Policy for degenerate multipatch footprints.
    pub footprint_policy: DegenerateFootprintPolicy,
}

impl Default for CutOptions {
    fn default() -> Self {
        CutOptions {
            size_tolerance: 1.0e-3,
            footprint_policy: DegenerateFootprintPolicy::default(),
        }
    }
}

/// Splits feature geometries along a cut line.
///
/// All state is per-invocation; a cutter value can be shared freely across
/// threads processing different features.
#[derive(Clone, Debug, Default)]
pub struct FeatureCutter<P: ZSourceProvider = FixedZSource> {
    options: CutOptions,
    z_sources: P,
}

impl FeatureCutter<FixedZSource> {
    /// Creates a cutter with the given options and a single Z-source
    /// strategy for every dataset.
    pub fn new(options: CutOptions) -> Self {
        FeatureCutter {
            options,
            z_sources: FixedZSource::default(),
        }
    }
}

impl<P: ZSourceProvider> FeatureCutter<P> {
    /// Creates a cutter resolving the Z-source per dataset through
    /// `z_sources`.
    pub fn with_z_sources(options: CutOptions, z_sources: P) -> Self {
        FeatureCutter { options, z_sources }
    }

    /// Cuts every feature along `cut_line`.
    ///
    /// Returns a map from feature oid to its ordered result list. An empty
    /// list means the feature could not be cut (disjoint or boundary-
    /// coincident cut line); that is an expected outcome, not an error.
    pub fn cut(
        &self,
        features: &[Feature],
        cut_line: &Polyline,
    ) -> Result<HashMap<u64, Vec<Geometry>>, CutError> {
        let mut results = HashMap::new();

        for feature in features {
            let z_source = self.z_sources.z_source(&feature.dataset);

            let cut = match &feature.geometry {
                Geometry::Polygon(polygon) => {
                    self.cut_polygon(polygon, cut_line, z_source, &feature.srs)?
                }
                Geometry::Polyline(polyline) => {
                    self.cut_polyline(polyline, cut_line, z_source, &feature.srs)?
                }
                Geometry::Multipatch(multipatch) => {
                    self.cut_multipatch(multipatch, cut_line, z_source, &feature.srs)?
                }
            };

            let _ = results.insert(feature.oid, cut);
        }

        Ok(results)
    }

    /// Cuts a polygon. The first result keeps the largest piece of every
    /// connected component plus all uncut components; every further piece
    /// becomes its own result, largest first.
    pub fn cut_polygon(
        &self,
        polygon: &Polygon,
        cut_line: &Polyline,
        z_source: ZSource,
        srs: &SpatialReference,
    ) -> Result<Vec<Geometry>, CutError> {
        let line = PreparedLine::new(cut_line, z_source != ZSource::Target, srs.xy_tolerance);

        if line.paths.is_empty()
            || !polygon
                .aabb()
                .loosened_xy(srs.xy_tolerance)
                .intersects_xy(&line.aabb())
        {
            debug!("cut line is disjoint from the polygon");
            return Ok(Vec::new());
        }

        let original_area = polygon.area_xy();

        let mut existing_rings: Vec<Path> = Vec::new();
        let mut new_polygons: Vec<Polygon> = Vec::new();
        let mut any_cut = false;

        for component in polygon.components() {
            let rings = component_ring_group(polygon, &component);

            let pieces = ring_cutter::cut_ring_group(&rings, &line, srs);
            let pieces = match pieces {
                Some(pieces) if pieces.len() >= 2 => pieces,
                _ => {
                    existing_rings.push(polygon.rings()[component.exterior].clone());
                    existing_rings
                        .extend(component.holes.iter().map(|&h| polygon.rings()[h].clone()));
                    continue;
                }
            };

            any_cut = true;

            // The source plane spans the whole connected component, holes
            // included.
            let plane = match z_source {
                ZSource::SourcePlane => FittedPlane::fit(&rings.concat(), srs.z_tolerance),
                _ => FittedPlane::Undefined,
            };

            let mut polygons: Vec<Polygon> = Vec::with_capacity(pieces.len());
            for (pi, piece) in pieces.into_iter().enumerate() {
                polygons.push(finish_piece(piece, &plane, z_source, pi)?);
            }

            let largest = polygons
                .iter()
                .enumerate()
                .max_by_key(|(_, p)| OrderedFloat(p.area_xy()))
                .map(|(i, _)| i)
                .unwrap_or(0);

            for (i, piece) in polygons.into_iter().enumerate() {
                if i == largest {
                    existing_rings.extend(piece.rings().iter().cloned());
                } else {
                    new_polygons.push(piece);
                }
            }
        }

        if !any_cut {
            debug!("no connected component was cut");
            return Ok(Vec::new());
        }

        let result_area = existing_rings
            .iter()
            .map(|r| r.signed_area_xy())
            .sum::<Real>()
            + new_polygons.iter().map(|p| p.area_xy()).sum::<Real>();
        self.check_conserved(original_area, result_area)?;

        new_polygons.sort_by_key(|p| std::cmp::Reverse(OrderedFloat(p.area_xy())));

        let mut out = vec![Geometry::Polygon(Polygon::new(existing_rings))];
        out.extend(new_polygons.into_iter().map(Geometry::Polygon));
        Ok(out)
    }

    /// Cuts a polyline at its crossings with the cut line.
    ///
    /// A single-part polyline explodes into one single-part result per
    /// piece. A multipart polyline groups its pieces by side (left / right /
    /// touching both) into at most three results, and paths the line never
    /// crossed stay with the largest result.
    pub fn cut_polyline(
        &self,
        polyline: &Polyline,
        cut_line: &Polyline,
        z_source: ZSource,
        srs: &SpatialReference,
    ) -> Result<Vec<Geometry>, CutError> {
        let line = PreparedLine::new(cut_line, z_source != ZSource::Target, srs.xy_tolerance);

        if line.paths.is_empty()
            || !polyline
                .aabb()
                .loosened_xy(srs.xy_tolerance)
                .intersects_xy(&line.aabb())
        {
            return Ok(Vec::new());
        }

        let original_length = polyline.length_xy();
        let tol = srs.xy_tolerance;

        let mut split_any = false;
        let mut uncut_paths: Vec<Path> = Vec::new();
        let mut pieces_by_side: [Vec<Path>; 3] = [Vec::new(), Vec::new(), Vec::new()];
        let mut exploded: Vec<Path> = Vec::new();

        for (part, path) in polyline.paths().iter().enumerate() {
            let positions = path_split_positions(path, &line, tol);

            if positions.is_empty() {
                uncut_paths.push(path.clone());
                continue;
            }

            split_any = true;
            let pieces = split_path(polyline, part, path, &positions, srs);
            let piece_count = pieces.len();

            if polyline.part_count() == 1 {
                exploded = pieces;
            } else {
                for (k, piece) in pieces.into_iter().enumerate() {
                    // Only ends created by the split sit on the cut line
                    // and are meaningful side probes.
                    let split_start = k > 0;
                    let split_end = k + 1 < piece_count;
                    let side = piece_side(&piece, &line, tol, split_start, split_end);
                    pieces_by_side[side].push(piece);
                }
            }
        }

        if !split_any {
            return Ok(Vec::new());
        }

        let mut results: Vec<Polyline> = if polyline.part_count() == 1 {
            exploded.sort_by_key(|p| std::cmp::Reverse(OrderedFloat(p.length_xy())));
            exploded.into_iter().map(Polyline::single).collect()
        } else {
            let mut groups: Vec<Polyline> = pieces_by_side
                .into_iter()
                .filter(|g| !g.is_empty())
                .map(Polyline::new)
                .collect();
            groups.sort_by_key(|p| std::cmp::Reverse(OrderedFloat(p.length_xy())));
            groups
        };

        if results.len() < 2 {
            return Ok(Vec::new());
        }

        // The non-split paths stay with the largest result.
        if !uncut_paths.is_empty() {
            let mut paths = results[0].paths().to_vec();
            paths.extend(uncut_paths);
            results[0] = Polyline::new(paths);
        }

        let result_length = results.iter().map(|p| p.length_xy()).sum::<Real>();
        self.check_conserved(original_length, result_length)?;

        Ok(results.into_iter().map(Geometry::Polyline).collect())
    }

    /// Cuts a ring-based multipatch: the footprint is cut first, every
    /// patch's pieces (horizontal rings and vertical walls) are assigned to
    /// the footprint part they cover, and one result multipatch is built
    /// per footprint part.
    pub fn cut_multipatch(
        &self,
        multipatch: &Multipatch,
        cut_line: &Polyline,
        z_source: ZSource,
        srs: &SpatialReference,
    ) -> Result<Vec<Geometry>, CutError> {
        let indexed = IndexedMultipatch::new(multipatch)?;
        let tol = srs.xy_tolerance;

        let footprint_line = PreparedLine::new(cut_line, true, tol);
        let footprint = indexed.footprint();

        if footprint_line.paths.is_empty()
            || !footprint
                .aabb()
                .loosened_xy(tol)
                .intersects_xy(&footprint_line.aabb())
        {
            return Ok(Vec::new());
        }

        // Cut the footprint; its parts decide how result multipatches are
        // grouped.
        let mut footprint_parts: Vec<Polygon> = Vec::new();
        let mut any_cut = false;

        for component in footprint.components() {
            let rings = component_ring_group(&footprint, &component);

            match ring_cutter::cut_ring_group(&rings, &footprint_line, srs) {
                Some(pieces) if pieces.len() >= 2 => {
                    any_cut = true;
                    for (pi, piece) in pieces.into_iter().enumerate() {
                        footprint_parts.push(finish_piece(
                            piece,
                            &FittedPlane::Undefined,
                            ZSource::InterpolatedSource,
                            pi,
                        )?);
                    }
                }
                _ => {
                    let mut rings: Vec<Path> =
                        vec![footprint.rings()[component.exterior].clone()];
                    rings.extend(component.holes.iter().map(|&h| footprint.rings()[h].clone()));
                    footprint_parts.push(Polygon::new(rings));
                }
            }
        }

        if !any_cut {
            debug!("not even the footprint could be cut; no multipatch cutting performed");
            return Ok(Vec::new());
        }

        let original_area = multipatch_area_3d(multipatch, srs.z_tolerance);
        let cut_line_prepared = PreparedLine::new(cut_line, z_source != ZSource::Target, tol);

        let mut buckets: Vec<Vec<Patch>> = vec![Vec::new(); footprint_parts.len()];

        for (patch_index, patch) in multipatch.patches().iter().enumerate() {
            self.cut_patch(
                patch_index,
                patch,
                &cut_line_prepared,
                z_source,
                srs,
                &footprint_parts,
                &mut buckets,
            )?;
        }

        // Build one multipatch per footprint part, applying the degenerate
        // footprint policy.
        let mut keyed: Vec<(Real, Multipatch)> = Vec::new();
        let mut discarded = false;

        for (pi, patches) in buckets.into_iter().enumerate() {
            if patches.is_empty() {
                debug!("footprint part {pi} received no patch; skipped");
                continue;
            }

            let part_footprint = &footprint_parts[pi];
            if is_degenerate_footprint(part_footprint, tol) {
                match self.options.footprint_policy {
                    DegenerateFootprintPolicy::Throw => {
                        return Err(CutError::DegenerateResultGeometry { part: pi });
                    }
                    DegenerateFootprintPolicy::Discard => {
                        debug!("discarding result multipatch {pi} with degenerate footprint");
                        discarded = true;
                        continue;
                    }
                    DegenerateFootprintPolicy::Keep => {
                        debug!("keeping result multipatch {pi} despite degenerate footprint");
                    }
                }
            }

            keyed.push((part_footprint.area_xy(), Multipatch::new(patches)));
        }

        if keyed.len() < 2 {
            return Ok(keyed.into_iter().map(|(_, mp)| Geometry::Multipatch(mp)).collect());
        }

        if !discarded {
            let result_area = keyed
                .iter()
                .map(|(_, mp)| multipatch_area_3d(mp, srs.z_tolerance))
                .sum::<Real>();
            self.check_conserved(original_area, result_area)?;
        }

        keyed.sort_by_key(|(area, _)| std::cmp::Reverse(OrderedFloat(*area)));

        Ok(keyed
            .into_iter()
            .map(|(_, mp)| Geometry::Multipatch(mp))
            .collect())
    }

    fn cut_patch(
        &self,
        patch_index: usize,
        patch: &Patch,
        line: &PreparedLine,
        z_source: ZSource,
        srs: &SpatialReference,
        footprint_parts: &[Polygon],
        buckets: &mut [Vec<Patch>],
    ) -> Result<(), CutError> {
        let tol = srs.xy_tolerance;

        // Split the patch rings into the horizontal group and the walls.
        let mut exterior: Option<Vec<Point<Real>>> = None;
        let mut holes: Vec<Vec<Point<Real>>> = Vec::new();
        let mut walls: Vec<&PatchRing> = Vec::new();

        for ring in patch.rings() {
            match ring.role() {
                // A sliver ring standing upright cuts like a wall, whatever
                // its marker claims.
                RingRole::Footprint if wall::is_vertical_ring(ring.points(), tol) => {
                    walls.push(ring)
                }
                RingRole::Footprint => exterior = Some(ring.points().to_vec()),
                RingRole::Hole => holes.push(ring.points().to_vec()),
                RingRole::Wall => walls.push(ring),
            }
        }

        // Ring lists per footprint part, merged into patches at the end.
        // Ordered map: the result patch order must not vary across runs.
        let mut rings_by_part: BTreeMap<usize, Vec<PatchRing>> = BTreeMap::new();

        if let Some(mut ext) = exterior {
            let inverted = utils::signed_area_xy(&ext) < 0.0;
            if inverted {
                ext.reverse();
            }
            for hole in &mut holes {
                if utils::signed_area_xy(hole) > 0.0 {
                    hole.reverse();
                }
            }

            let plane = match z_source {
                ZSource::SourcePlane => FittedPlane::fit(&ext, srs.z_tolerance),
                _ => FittedPlane::Undefined,
            };

            let mut group = vec![ext];
            group.extend(holes);

            let pieces = match ring_cutter::cut_ring_group(&group, line, srs) {
                Some(pieces) if pieces.len() >= 2 => pieces,
                _ => vec![CutPiece {
                    exterior: RingDraft::from_ring(&group[0]),
                    holes: group[1..].iter().map(|h| RingDraft::from_ring(h)).collect(),
                }],
            };

            for (pi, mut piece) in pieces.into_iter().enumerate() {
                assign_draft_z(&mut piece.exterior, &plane, z_source, pi)?;
                for hole in &mut piece.holes {
                    assign_draft_z(hole, &plane, z_source, pi)?;
                }

                let probe = utils::interior_point_xy(
                    &piece.exterior.points,
                    &piece
                        .holes
                        .iter()
                        .map(|h| h.points.as_slice())
                        .collect::<Vec<_>>(),
                    tol,
                )
                .unwrap_or_else(|| piece.exterior.points[0].xy());

                let matches = locate_footprint_part(footprint_parts, &probe);
                if matches.len() != 1 {
                    debug!(
                        "piece of patch {patch_index} matched {} footprint parts",
                        matches.len()
                    );
                }
                let part = *matches.first().ok_or(CutError::AmbiguousFootprintAssignment {
                    patch: patch_index,
                    count: 0,
                })?;

                if inverted {
                    piece.exterior.reverse();
                    for hole in &mut piece.holes {
                        hole.reverse();
                    }
                }

                let rings = rings_by_part.entry(part).or_default();
                rings.push(PatchRing::new(RingRole::Footprint, piece.exterior.points));
                for hole in piece.holes {
                    rings.push(PatchRing::new(RingRole::Hole, hole.points));
                }
            }
        }

        for wall_ring in walls {
            match wall::cut_wall_ring(wall_ring.points(), line, srs) {
                Some(wall_pieces) => {
                    for piece in wall_pieces {
                        let part =
                            locate_wall_part(footprint_parts, &piece.baseline_mid, tol);
                        rings_by_part
                            .entry(part)
                            .or_default()
                            .push(PatchRing::new(RingRole::Wall, piece.ring.points));
                    }
                }
                None => {
                    let mid = wall::fit_baseline(wall_ring.points())
                        .map(|(origin, _)| origin)
                        .unwrap_or_else(|| wall_ring.points()[0].xy());
                    let part = locate_wall_part(footprint_parts, &mid, tol);
                    rings_by_part
                        .entry(part)
                        .or_default()
                        .push(PatchRing::new(RingRole::Wall, wall_ring.points().to_vec()));
                }
            }
        }

        for (part, rings) in rings_by_part {
            let mut result = Patch::new(rings);
            if let Some(id) = patch.point_id() {
                result = result.with_point_id(id);
            }
            buckets[part].push(result);
        }

        Ok(())
    }

    fn check_conserved(&self, original: Real, result: Real) -> Result<(), CutError> {
        let tolerance = self.options.size_tolerance;

        if (result - original).abs() > original.abs() * tolerance {
            warn!(
                "cut changed the feature size from {original} to {result}; \
                 please report this geometry and the cut line"
            );
            return Err(CutError::SizeNotConserved {
                original,
                result,
                tolerance,
            });
        }

        Ok(())
    }
}

/// The ring group of one polygon component, orientation-normalized:
/// exterior counter-clockwise first, clockwise holes after it.
fn component_ring_group(
    polygon: &Polygon,
    component: &crate::shape::PolygonComponent,
) -> Vec<Vec<Point<Real>>> {
    let mut rings = Vec::with_capacity(1 + component.holes.len());

    let mut exterior = polygon.rings()[component.exterior].points().to_vec();
    if utils::signed_area_xy(&exterior) < 0.0 {
        exterior.reverse();
    }
    rings.push(exterior);

    for &hi in &component.holes {
        let mut hole = polygon.rings()[hi].points().to_vec();
        if utils::signed_area_xy(&hole) > 0.0 {
            hole.reverse();
        }
        rings.push(hole);
    }

    rings
}

/// Builds a polygon out of one cut piece, assigning Z to its new vertices.
fn finish_piece(
    mut piece: CutPiece,
    plane: &FittedPlane,
    z_source: ZSource,
    part: usize,
) -> Result<Polygon, CutError> {
    assign_draft_z(&mut piece.exterior, plane, z_source, part)?;

    let mut rings = vec![Path::new_ring(piece.exterior.points)];

    for mut hole in piece.holes {
        assign_draft_z(&mut hole, plane, z_source, part)?;
        rings.push(Path::new_ring(hole.points));
    }

    Ok(Polygon::new(rings))
}

/// Applies the Z-source strategy to the new vertices of a ring draft, then
/// resolves any remaining undefined Z by interpolation along the ring.
fn assign_draft_z(
    draft: &mut RingDraft,
    plane: &FittedPlane,
    z_source: ZSource,
    part: usize,
) -> Result<(), CutError> {
    if z_source == ZSource::SourcePlane {
        if let Some(plane) = plane.as_defined() {
            for (i, pt) in draft.points.iter_mut().enumerate() {
                if draft.new_mask[i] {
                    if let Some(z) = plane.z_at(pt.x, pt.y) {
                        pt.z = z;
                    }
                }
            }
        }
    }

    if let Some(vertex) = interpolate_undefined_zs(&mut draft.points, true) {
        return Err(CutError::UndefinedResultZ { part, vertex });
    }

    Ok(())
}

/// Split positions (part-position units) of one polyline path, deduplicated
/// and excluding the path endpoints.
fn path_split_positions(path: &Path, line: &PreparedLine, tol: Real) -> Vec<Real> {
    let mut hits: SmallVec<[(Real, Real); 4]> = SmallVec::new();

    let mut walked = 0.0;
    for si in 0..path.segment_count() {
        let seg = path.segment(si);
        let seg_len = seg.length_xy();

        for lpath in &line.paths {
            for li in 0..lpath.segment_count() {
                let lseg = lpath.segment(li);
                let eps = 1.0e-10 * seg_len.max(1.0) * lseg.length_xy().max(1.0);

                match utils::segments_intersection_xy(
                    &seg.a.xy(),
                    &seg.b.xy(),
                    &lseg.a.xy(),
                    &lseg.b.xy(),
                    eps,
                ) {
                    Some(utils::SegmentCrossing::Point { s, .. }) => {
                        hits.push((si as Real + s, walked + s * seg_len));
                    }
                    Some(utils::SegmentCrossing::Overlap { .. }) | None => {}
                }
            }
        }

        walked += seg_len;
    }

    let total = walked;
    hits.sort_by_key(|&(_, d)| OrderedFloat(d));

    let mut positions = Vec::new();
    let mut last_dist = Real::MIN;

    for (pos, dist) in hits {
        if dist < tol || dist > total - tol || dist - last_dist < tol {
            continue;
        }
        positions.push(pos);
        last_dist = dist;
    }

    positions
}

/// Splits one path at the given positions, reconstructing each piece
/// through a segment part list (fractional endpoints interpolate X, Y and
/// Z from the source).
fn split_path(
    source: &Polyline,
    part: usize,
    path: &Path,
    positions: &[Real],
    srs: &SpatialReference,
) -> Vec<Path> {
    let mut bounds = vec![0.0];
    bounds.extend_from_slice(positions);
    bounds.push(path.segment_count() as Real);

    let mut pieces = Vec::with_capacity(bounds.len() - 1);

    for pair in bounds.windows(2) {
        let mut list = SegmentPartList::new();
        let (from, to) = (pair[0], pair[1]);

        let first_seg = (from.floor() as usize).min(path.segment_count() - 1);
        let last_seg = (to.ceil() as usize - 1).min(path.segment_count() - 1);

        for seg in first_seg..=last_seg {
            let lo = if seg == first_seg { from - seg as Real } else { 0.0 };
            let hi = if seg == last_seg { to - seg as Real } else { 1.0 };
            list.add(part, seg, lo.clamp(0.0, 1.0), hi.clamp(0.0, 1.0));
        }

        for rec in list.get_parts(source, srs) {
            if rec.points.len() >= 2 {
                pieces.push(Path::new_open(rec.points));
            }
        }
    }

    pieces
}

/// The side bucket of one split piece: 0 = left, 1 = right, 2 = both.
///
/// The probes sit a tolerance-length inside the piece from its split ends;
/// an end that is an original path endpoint says nothing about the side.
fn piece_side(
    piece: &Path,
    line: &PreparedLine,
    tol: Real,
    split_start: bool,
    split_end: bool,
) -> usize {
    let probe_at = |from_start: bool| -> Option<Side> {
        let pts = piece.points();
        let (a, b) = if from_start {
            (pts[0], pts[1])
        } else {
            (pts[pts.len() - 1], pts[pts.len() - 2])
        };
        let dir = b.xy() - a.xy();
        let len = dir.norm();
        if len == 0.0 {
            return None;
        }
        let probe = a.xy() + dir * (tol / len).min(0.5);
        line.side_of(&probe, tol * 0.5)
    };

    let start = if split_start { probe_at(true) } else { None };
    let end = if split_end { probe_at(false) } else { None };

    match (start, end) {
        (Some(a), Some(b)) if a != b => 2,
        (Some(Side::Left), _) | (_, Some(Side::Left)) => 0,
        (Some(Side::Right), _) | (_, Some(Side::Right)) => 1,
        (None, None) => 2,
    }
}

/// The footprint parts whose region contains the probe point.
fn locate_footprint_part(
    parts: &[Polygon],
    probe: &crate::math::Point2<Real>,
) -> SmallVec<[usize; 2]> {
    let mut matches: SmallVec<[usize; 2]> = SmallVec::new();

    for (pi, part) in parts.iter().enumerate() {
        for component in part.components() {
            let exterior = part.rings()[component.exterior].points();
            let holes: Vec<&[Point<Real>]> = component
                .holes
                .iter()
                .map(|&h| part.rings()[h].points())
                .collect();

            if utils::point_in_rings_xy(probe, exterior, &holes) {
                matches.push(pi);
                break;
            }
        }
    }

    matches
}

/// The footprint part a wall piece belongs to: the one whose boundary the
/// wall baseline runs along (or, failing that, whose region contains it).
fn locate_wall_part(parts: &[Polygon], probe: &crate::math::Point2<Real>, tol: Real) -> usize {
    let mut best = 0;
    let mut best_dist = Real::MAX;

    for (pi, part) in parts.iter().enumerate() {
        for ring in part.rings() {
            let d = utils::distance_to_ring_xy(probe, ring.points());
            if d < best_dist {
                best_dist = d;
                best = pi;
            }
        }
    }

    if best_dist > tol * 2.0 {
        // Not on any boundary: fall back to containment.
        if let Some(&pi) = locate_footprint_part(parts, probe).first() {
            return pi;
        }
    }

    best
}

/// Whether a (single-component) result footprint is degenerate: near-zero
/// XY area for its boundary length, or a self-intersecting outer ring.
fn is_degenerate_footprint(footprint: &Polygon, tol: Real) -> bool {
    let Some(component) = footprint.components().into_iter().next() else {
        return true;
    };

    let exterior = &footprint.rings()[component.exterior];
    let perimeter = utils::perimeter_xy(exterior.points());
    let threshold = 1.5 * tol / 2.0 * perimeter / 2.0;

    if exterior.signed_area_xy().abs() <= threshold {
        return true;
    }

    exterior.is_self_intersecting_xy(1.0e-12)
}

/// The 3D surface area of a multipatch: every ring measured on its own
/// best-fit plane; hole rings subtract.
fn multipatch_area_3d(multipatch: &Multipatch, z_tolerance: Real) -> Real {
    let mut total = 0.0;

    for patch in multipatch.patches() {
        for ring in patch.rings() {
            let fitted = FittedPlane::fit(ring.points(), z_tolerance);
            let area = match fitted.projected_extent(ring.points()) {
                ProjectedExtent::Planar { area, .. } => area,
                ProjectedExtent::Linear { .. } => 0.0,
            };

            match ring.role() {
                RingRole::Hole => total -= area,
                RingRole::Footprint | RingRole::Wall => total += area,
            }
        }
    }

    total
}
