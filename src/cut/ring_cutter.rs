//! Planar cutting of one ring group (an exterior ring and its holes) along
//! a prepared cut line.
//!
//! The cut works on the XY projection: crossings are collected per segment,
//! the boundary is partitioned into runs that alternate sides at every
//! crossing and are accumulated in [`SegmentPartList`]s, cut-line chords are
//! extracted where the line runs through the interior, and result rings are
//! traced from the run/chord graph.

use crate::bounding_volume::Aabb;
use crate::cut::part_list::{ReconstructedPath, SegmentPartList};
use crate::math::{Point, Point2, Real};
use crate::proxy::SegmentSource;
use crate::shape::{Polyline, Segment, SpatialReference};
use crate::utils::{self, SegmentCrossing};
use log::{debug, warn};
use ordered_float::OrderedFloat;
use std::collections::HashMap;

/// Which side of the cut line a boundary run lies on.
///
/// Sides alternate at every crossing while walking a ring; the label of the
/// first run is anchored geometrically so that single-path cut lines get
/// true left/right semantics.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Side {
    Left,
    Right,
}

impl Side {
    fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// One path of a cut line prepared for intersection: deduplicated vertices
/// and cumulative XY distances.
#[derive(Clone, Debug)]
pub(crate) struct LinePath {
    pub points: Vec<Point<Real>>,
    cum: Vec<Real>,
}

impl LinePath {
    fn from_points(raw: &[Point<Real>], drop_z: bool, tol: Real) -> Option<LinePath> {
        let mut points: Vec<Point<Real>> = Vec::with_capacity(raw.len());

        for p in raw {
            let p = if drop_z {
                Point::new(p.x, p.y, Real::NAN)
            } else {
                *p
            };
            let distinct = points
                .last()
                .map_or(true, |last: &Point<Real>| (last.xy() - p.xy()).norm() > tol);
            if distinct {
                points.push(p);
            }
        }

        if points.len() < 2 {
            return None;
        }

        let mut cum = Vec::with_capacity(points.len());
        cum.push(0.0);
        for i in 1..points.len() {
            let prev = cum[i - 1];
            cum.push(prev + (points[i].xy() - points[i - 1].xy()).norm());
        }

        Some(LinePath { points, cum })
    }

    /// A straight two-point path (used for synthetic cut lines, e.g. in
    /// unrolled wall space).
    pub fn from_two_points(a: Point<Real>, b: Point<Real>) -> LinePath {
        let len = (b.xy() - a.xy()).norm();
        LinePath {
            points: vec![a, b],
            cum: vec![0.0, len],
        }
    }

    pub fn segment_count(&self) -> usize {
        self.points.len() - 1
    }

    pub fn segment(&self, i: usize) -> Segment {
        Segment::new(self.points[i], self.points[i + 1])
    }

    pub fn dist_at(&self, seg: usize, frac: Real) -> Real {
        self.cum[seg] + frac * (self.cum[seg + 1] - self.cum[seg])
    }

    /// The point at the given distance along this path.
    pub fn point_at(&self, dist: Real) -> Point<Real> {
        let i = self
            .cum
            .partition_point(|&c| c <= dist)
            .clamp(1, self.points.len() - 1);
        let span = self.cum[i] - self.cum[i - 1];
        let frac = if span == 0.0 {
            0.0
        } else {
            ((dist - self.cum[i - 1]) / span).clamp(0.0, 1.0)
        };
        utils::lerp(&self.points[i - 1], &self.points[i], frac)
    }

    /// The sub-path between two distances, including the intermediate
    /// vertices of this path.
    pub fn sub_path(&self, d0: Real, d1: Real) -> Vec<Point<Real>> {
        let mut pts = vec![self.point_at(d0)];

        for i in 0..self.points.len() {
            if self.cum[i] > d0 && self.cum[i] < d1 {
                pts.push(self.points[i]);
            }
        }

        pts.push(self.point_at(d1));
        pts
    }
}

/// A cut line prepared for intersection.
#[derive(Clone, Debug)]
pub(crate) struct PreparedLine {
    pub paths: Vec<LinePath>,
}

impl PreparedLine {
    /// Simplifies the cut line: duplicate vertices collapse, zero-length
    /// segments vanish, Zs are dropped unless the Z-source strategy uses
    /// them.
    pub fn new(line: &Polyline, drop_z: bool, tol: Real) -> PreparedLine {
        let paths = line
            .paths()
            .iter()
            .filter_map(|p| LinePath::from_points(p.points(), drop_z, tol))
            .collect();

        PreparedLine { paths }
    }

    pub fn aabb(&self) -> Aabb {
        let mut aabb = Aabb::new_invalid();
        for path in &self.paths {
            for pt in &path.points {
                aabb.take_point(Point::new(pt.x, pt.y, 0.0));
            }
        }
        aabb
    }

    /// The side of the cut line the given point lies on, decided against the
    /// nearest line segment. `None` when the point is on the line (within
    /// `tol`).
    pub fn side_of(&self, pt: &Point2<Real>, tol: Real) -> Option<Side> {
        let mut best: Option<(Real, Real)> = None;

        for path in &self.paths {
            for i in 0..path.segment_count() {
                let proj = path.segment(i).project_xy(pt);
                let dist = (pt - proj.closest).norm();
                if best.map_or(true, |(d, _)| dist < d) {
                    best = Some((dist, proj.offset));
                }
            }
        }

        let (dist, offset) = best?;
        if dist < tol {
            None
        } else if offset >= 0.0 {
            Some(Side::Left)
        } else {
            Some(Side::Right)
        }
    }
}

/// One transversal crossing between a ring segment and the cut line.
#[derive(Clone, Debug)]
pub(crate) struct Crossing {
    pub ring: usize,
    pub seg: usize,
    pub frac: Real,
    pub ring_dist: Real,
    pub path: usize,
    pub line_dist: Real,
    pub point: Point<Real>,
}

/// One ring of the group with its cumulative segment lengths.
struct RingData<'a> {
    points: &'a [Point<Real>],
    cum: Vec<Real>,
}

impl<'a> RingData<'a> {
    fn new(points: &'a [Point<Real>]) -> Self {
        let n = points.len();
        let mut cum = Vec::with_capacity(n + 1);
        cum.push(0.0);
        for i in 0..n {
            let prev = cum[i];
            let next = points[(i + 1) % n];
            cum.push(prev + (next.xy() - points[i].xy()).norm());
        }
        RingData { points, cum }
    }

    fn seg_count(&self) -> usize {
        self.points.len()
    }

    fn seg(&self, i: usize) -> Segment {
        Segment::new(self.points[i], self.points[(i + 1) % self.points.len()])
    }

    fn total(&self) -> Real {
        *self.cum.last().unwrap()
    }

    fn dist_of(&self, seg: usize, frac: Real) -> Real {
        self.cum[seg] + frac * (self.cum[seg + 1] - self.cum[seg])
    }

    fn point_at(&self, dist: Real) -> Point<Real> {
        let total = self.total();
        let dist = dist.rem_euclid(total.max(1.0e-300));
        let i = self
            .cum
            .partition_point(|&c| c <= dist)
            .clamp(1, self.cum.len() - 1);
        let span = self.cum[i] - self.cum[i - 1];
        let frac = if span == 0.0 {
            0.0
        } else {
            (dist - self.cum[i - 1]) / span
        };
        self.seg(i - 1).point_at(frac)
    }
}

/// `SegmentSource` view over the rings of one ring group.
struct RingGroupSource<'a> {
    rings: &'a [Vec<Point<Real>>],
}

impl SegmentSource for RingGroupSource<'_> {
    fn part_count(&self) -> usize {
        self.rings.len()
    }

    fn is_closed(&self, _part: usize) -> bool {
        true
    }

    fn segment_count(&self, part: usize) -> usize {
        self.rings[part].len()
    }

    fn segment_points(&self, part: usize, seg: usize) -> (Point<Real>, Point<Real>) {
        let ring = &self.rings[part];
        (ring[seg], ring[(seg + 1) % ring.len()])
    }
}

/// One reconstructed result ring, with per-vertex newness flags.
#[derive(Clone, Debug)]
pub(crate) struct RingDraft {
    pub points: Vec<Point<Real>>,
    pub new_mask: Vec<bool>,
}

impl RingDraft {
    pub fn from_ring(points: &[Point<Real>]) -> Self {
        RingDraft {
            points: points.to_vec(),
            new_mask: vec![false; points.len()],
        }
    }

    pub fn signed_area_xy(&self) -> Real {
        utils::signed_area_xy(&self.points)
    }

    pub fn reverse(&mut self) {
        self.points.reverse();
        self.new_mask.reverse();
    }
}

/// One piece of a cut ring group: an exterior ring and the holes that ended
/// up inside it.
#[derive(Clone, Debug)]
pub(crate) struct CutPiece {
    pub exterior: RingDraft,
    pub holes: Vec<RingDraft>,
}

/// A boundary run between two consecutive crossings of one ring, walking
/// the ring forward from crossing `a` to crossing `b`.
struct RunEdge {
    a: usize,
    b: usize,
    points: Vec<Point<Real>>,
    new_mask: Vec<bool>,
}

type ChordRaw = (usize, usize, Vec<Point<Real>>, Vec<bool>);

/// Cuts one ring group along the prepared line.
///
/// `rings[0]` is the counter-clockwise exterior; the rest are clockwise
/// holes. Returns `None` when the line does not produce a cut (disjoint,
/// dangling into the interior, or running along a boundary within
/// tolerance).
pub(crate) fn cut_ring_group(
    rings: &[Vec<Point<Real>>],
    line: &PreparedLine,
    srs: &SpatialReference,
) -> Option<Vec<CutPiece>> {
    let tol = srs.xy_tolerance;
    let datas: Vec<RingData> = rings.iter().map(|r| RingData::new(r)).collect();

    let mut crossings = collect_crossings(&datas, line);
    dedup_crossings(&mut crossings, &datas, tol);
    retain_transversal(&mut crossings, &datas, line, tol);

    if crossings.len() < 2 {
        return None;
    }

    let chords = build_chords(&crossings, rings, line, tol);
    if chords.is_empty() {
        debug!("no cut-line chord crosses the interior; nothing to cut");
        return None;
    }

    // Crossings that bound no chord do not take part in the cut (the line
    // dangles into the interior there); they must not flip sides either.
    let mut referenced = vec![false; crossings.len()];
    for &(a, b, _, _) in &chords {
        referenced[a] = true;
        referenced[b] = true;
    }

    let kept: Vec<usize> = (0..crossings.len()).filter(|&i| referenced[i]).collect();
    let remap: HashMap<usize, usize> = kept.iter().enumerate().map(|(n, &o)| (o, n)).collect();
    let crossings: Vec<Crossing> = kept.iter().map(|&i| crossings[i].clone()).collect();
    let chords: Vec<ChordRaw> = chords
        .into_iter()
        .map(|(a, b, pts, mask)| (remap[&a], remap[&b], pts, mask))
        .collect();

    // A coherent cut crosses every ring an even number of times.
    for ri in 0..rings.len() {
        let count = crossings.iter().filter(|c| c.ring == ri).count();
        if count % 2 != 0 {
            debug!("ring {ri} is crossed {count} times; the cut does not separate the geometry");
            return None;
        }
    }

    let run_edges = build_runs(&crossings, &datas, rings, line, srs)?;
    let loops = trace_loops(&run_edges, &chords);

    assemble_pieces(loops, rings, &crossings, tol)
}

fn collect_crossings(datas: &[RingData], line: &PreparedLine) -> Vec<Crossing> {
    let mut crossings = Vec::new();

    for (ri, ring) in datas.iter().enumerate() {
        for si in 0..ring.seg_count() {
            let rseg = ring.seg(si);

            for (pi, path) in line.paths.iter().enumerate() {
                for li in 0..path.segment_count() {
                    let lseg = path.segment(li);
                    let eps = 1.0e-10 * rseg.length_xy().max(1.0) * lseg.length_xy().max(1.0);

                    match utils::segments_intersection_xy(
                        &rseg.a.xy(),
                        &rseg.b.xy(),
                        &lseg.a.xy(),
                        &lseg.b.xy(),
                        eps,
                    ) {
                        Some(SegmentCrossing::Point { s, t }) => crossings.push(Crossing {
                            ring: ri,
                            seg: si,
                            frac: s,
                            ring_dist: ring.dist_of(si, s),
                            path: pi,
                            line_dist: path.dist_at(li, t),
                            point: rseg.point_at(s),
                        }),
                        // Collinear overlaps are tangential contact, not
                        // crossings; their endpoints show up as ordinary
                        // vertex hits and fail the transversality probe.
                        Some(SegmentCrossing::Overlap { .. }) | None => {}
                    }
                }
            }
        }
    }

    crossings
}

fn dedup_crossings(crossings: &mut Vec<Crossing>, datas: &[RingData], tol: Real) {
    crossings.sort_by(|a, b| {
        (a.ring, OrderedFloat(a.ring_dist)).cmp(&(b.ring, OrderedFloat(b.ring_dist)))
    });

    let mut result: Vec<Crossing> = Vec::with_capacity(crossings.len());
    for c in crossings.drain(..) {
        let duplicate = result
            .last()
            .map_or(false, |prev| prev.ring == c.ring && c.ring_dist - prev.ring_dist < tol);
        if !duplicate {
            result.push(c);
        }
    }

    // The ring is cyclic: the first and last crossing of a ring can be the
    // same point split across the ring start.
    let mut start = 0;
    while start < result.len() {
        let ring = result[start].ring;
        let end = result
            .iter()
            .rposition(|c| c.ring == ring)
            .unwrap_or(start);

        if end > start {
            let total = datas[ring].total();
            if total - result[end].ring_dist + result[start].ring_dist < tol {
                let _ = result.remove(end);
            }
        }

        start = result
            .iter()
            .rposition(|c| c.ring == ring)
            .unwrap_or(start)
            + 1;
    }

    *crossings = result;
}

fn retain_transversal(
    crossings: &mut Vec<Crossing>,
    datas: &[RingData],
    line: &PreparedLine,
    tol: Real,
) {
    let mut kept = Vec::with_capacity(crossings.len());

    for (i, c) in crossings.iter().enumerate() {
        let ring = &datas[c.ring];
        let total = ring.total();

        // Keep the probes between the neighboring crossings of the ring.
        let mut gap = total;
        for (j, other) in crossings.iter().enumerate() {
            if i == j || other.ring != c.ring {
                continue;
            }
            let d = (other.ring_dist - c.ring_dist).rem_euclid(total);
            gap = gap.min(d).min(total - d);
        }

        let max_delta = (gap * 0.5).min(total * 0.25);
        let mut transversal = false;

        // Shallow crossings leave the near probes within tolerance of the
        // line; widen until both probes are clearly off it.
        let mut delta = (tol * 2.0).min(max_delta);
        while delta <= max_delta && delta > 0.0 {
            let before = ring.point_at(c.ring_dist - delta).xy();
            let after = ring.point_at(c.ring_dist + delta).xy();

            match (line.side_of(&before, tol), line.side_of(&after, tol)) {
                (Some(sb), Some(sa)) => {
                    transversal = sb != sa;
                    break;
                }
                _ => delta *= 4.0,
            }
        }

        if transversal {
            kept.push(c.clone());
        }
    }

    *crossings = kept;
}

fn build_chords(
    crossings: &[Crossing],
    rings: &[Vec<Point<Real>>],
    line: &PreparedLine,
    tol: Real,
) -> Vec<ChordRaw> {
    let holes: Vec<&[Point<Real>]> = rings[1..].iter().map(|r| r.as_slice()).collect();
    let mut chords = Vec::new();

    for pi in 0..line.paths.len() {
        let mut on_path: Vec<usize> = (0..crossings.len())
            .filter(|&i| crossings[i].path == pi)
            .collect();
        on_path.sort_by_key(|&i| OrderedFloat(crossings[i].line_dist));

        for w in on_path.windows(2) {
            let (ca, cb) = (&crossings[w[0]], &crossings[w[1]]);
            if cb.line_dist - ca.line_dist < tol {
                continue;
            }

            let mid = line.paths[pi]
                .point_at((ca.line_dist + cb.line_dist) * 0.5)
                .xy();
            if !utils::point_in_rings_xy(&mid, &rings[0], &holes) {
                continue;
            }

            let mut points = line.paths[pi].sub_path(ca.line_dist, cb.line_dist);
            // The chord endpoints are the crossing points themselves, whose
            // Z comes from the ring they cross.
            points[0] = ca.point;
            let last = points.len() - 1;
            points[last] = cb.point;

            let mask = vec![true; points.len()];
            chords.push((w[0], w[1], points, mask));
        }
    }

    chords
}

fn build_runs(
    crossings: &[Crossing],
    datas: &[RingData],
    rings: &[Vec<Point<Real>>],
    line: &PreparedLine,
    srs: &SpatialReference,
) -> Option<Vec<RunEdge>> {
    let tol = srs.xy_tolerance;
    let source = RingGroupSource { rings };

    // One part list per side; the side flips at every crossing while
    // walking a ring, anchored geometrically on the first run.
    let mut lists = [SegmentPartList::new(), SegmentPartList::new()];

    for ri in 0..rings.len() {
        let mut ring_crossings: Vec<usize> = (0..crossings.len())
            .filter(|&i| crossings[i].ring == ri)
            .collect();
        ring_crossings.sort_by_key(|&i| OrderedFloat(crossings[i].ring_dist));

        if ring_crossings.is_empty() {
            continue;
        }

        let ring = &datas[ri];
        let n = ring.seg_count();
        let mut side: Option<Side> = None;

        for (k, &ci) in ring_crossings.iter().enumerate() {
            let cj = ring_crossings[(k + 1) % ring_crossings.len()];
            let (from, to) = (&crossings[ci], &crossings[cj]);

            let span = (to.ring_dist - from.ring_dist).rem_euclid(ring.total());
            let span = if span == 0.0 { ring.total() } else { span };

            let side_now = match side {
                Some(prev) => prev.opposite(),
                None => {
                    // Anchor the first run geometrically; retry along the
                    // run when the probe sits on the line.
                    let mut probed = None;
                    for frac in [0.5, 0.25, 0.75] {
                        let probe = ring.point_at(from.ring_dist + span * frac).xy();
                        probed = line.side_of(&probe, tol);
                        if probed.is_some() {
                            break;
                        }
                    }
                    probed.unwrap_or_else(|| {
                        debug!("first run of ring {ri} is ambiguous; anchoring on the left");
                        Side::Left
                    })
                }
            };
            side = Some(side_now);

            let list = &mut lists[(side_now == Side::Right) as usize];
            add_run(list, ri, n, (from.seg, from.frac), (to.seg, to.frac));
        }
    }

    let mut edges = Vec::new();

    for list in &lists {
        let mut paths = list.get_parts(&source, srs);
        join_wrapped_paths(&mut paths, rings, srs);

        for path in paths {
            let first = path.points.first()?.xy();
            let last = path.points.last()?.xy();

            let a = match_crossing(crossings, path.part, &first, tol)?;
            let b = match_crossing(crossings, path.part, &last, tol)?;

            edges.push(RunEdge {
                a,
                b,
                points: path.points,
                new_mask: path.new_mask,
            });
        }
    }

    Some(edges)
}

fn join_wrapped_paths(
    paths: &mut Vec<ReconstructedPath>,
    rings: &[Vec<Point<Real>>],
    srs: &SpatialReference,
) {
    let eps = srs.xy_tolerance * 0.5;

    for (ri, ring) in rings.iter().enumerate() {
        let start_vertex = ring[0].xy();

        let ends_at_start = paths.iter().position(|p| {
            p.part == ri && (p.points.last().unwrap().xy() - start_vertex).norm() < eps
        });
        let begins_at_start = paths.iter().position(|p| {
            p.part == ri && (p.points.first().unwrap().xy() - start_vertex).norm() < eps
        });

        if let (Some(e), Some(b)) = (ends_at_start, begins_at_start) {
            if e != b {
                let mut tail = paths.remove(b);
                let head = &mut paths[if b < e { e - 1 } else { e }];
                head.points.extend(tail.points.drain(1..));
                head.new_mask.extend(tail.new_mask.drain(1..));
            }
        }
    }
}

fn match_crossing(
    crossings: &[Crossing],
    ring: usize,
    pt: &Point2<Real>,
    tol: Real,
) -> Option<usize> {
    let mut best: Option<(usize, Real)> = None;

    for (i, c) in crossings.iter().enumerate() {
        if c.ring != ring {
            continue;
        }
        let d = (c.point.xy() - pt).norm();
        if d < tol * 2.0 && best.map_or(true, |(_, bd)| d < bd) {
            best = Some((i, d));
        }
    }

    if best.is_none() {
        warn!("a reconstructed boundary run does not end on a cut-line crossing");
    }

    best.map(|(i, _)| i)
}

fn add_run(
    list: &mut SegmentPartList,
    ring: usize,
    seg_count: usize,
    from: (usize, Real),
    to: (usize, Real),
) {
    if from.0 == to.0 && from.1 <= to.1 {
        list.add(ring, from.0, from.1, to.1);
        return;
    }

    if from.1 < 1.0 {
        list.add(ring, from.0, from.1, 1.0);
    }

    let mut s = (from.0 + 1) % seg_count;
    while s != to.0 {
        list.add_full(ring, s);
        s = (s + 1) % seg_count;
    }

    if to.1 > 0.0 {
        list.add(ring, to.0, 0.0, to.1);
    }
}

/// Traces the closed result rings out of the run/chord graph.
///
/// Runs are traversed once, forward (the region they bound lies on their
/// left); chords border two regions and are traversed once per direction.
/// Arriving at a crossing along the ring leaves through its chord; arriving
/// through a chord continues with the run that starts at that crossing.
fn trace_loops(run_edges: &[RunEdge], chords: &[ChordRaw]) -> Vec<RingDraft> {
    let mut run_starting_at: HashMap<usize, usize> = HashMap::new();
    for (i, edge) in run_edges.iter().enumerate() {
        let _ = run_starting_at.insert(edge.a, i);
    }

    let mut chord_at: HashMap<usize, usize> = HashMap::new();
    for (ci, &(a, b, _, _)) in chords.iter().enumerate() {
        let _ = chord_at.insert(a, ci);
        let _ = chord_at.insert(b, ci);
    }

    let mut run_used = vec![false; run_edges.len()];
    let mut chord_used = vec![[false; 2]; chords.len()];
    let mut loops = Vec::new();

    'outer: for start in 0..run_edges.len() {
        if run_used[start] {
            continue;
        }

        run_used[start] = true;
        let begin = run_edges[start].a;
        let mut cur = run_edges[start].b;
        let mut points = run_edges[start].points.clone();
        let mut mask = run_edges[start].new_mask.clone();
        let mut via_run = true;

        let mut guard = 0;
        while cur != begin {
            guard += 1;
            if guard > run_edges.len() + chords.len() + 1 {
                warn!("cut result tracing did not close; piece dropped");
                continue 'outer;
            }

            if via_run {
                let Some(&ci) = chord_at.get(&cur) else {
                    warn!("dangling crossing while tracing a cut result ring; piece dropped");
                    continue 'outer;
                };
                let (a, b, pts, m) = &chords[ci];
                let dir = usize::from(*a != cur);
                if chord_used[ci][dir] {
                    warn!("chord traversed twice in the same direction; piece dropped");
                    continue 'outer;
                }
                chord_used[ci][dir] = true;

                if dir == 0 {
                    points.extend(pts.iter().skip(1).copied());
                    mask.extend(m.iter().skip(1).copied());
                    cur = *b;
                } else {
                    points.extend(pts.iter().rev().skip(1).copied());
                    mask.extend(m.iter().rev().skip(1).copied());
                    cur = *a;
                }
                via_run = false;
            } else {
                let Some(&ri) = run_starting_at.get(&cur) else {
                    warn!("no boundary run continues the trace; piece dropped");
                    continue 'outer;
                };
                if run_used[ri] {
                    warn!("boundary run traversed twice; piece dropped");
                    continue 'outer;
                }
                run_used[ri] = true;

                points.extend(run_edges[ri].points.iter().skip(1).copied());
                mask.extend(run_edges[ri].new_mask.iter().skip(1).copied());
                cur = run_edges[ri].b;
                via_run = true;
            }
        }

        // The walk closed: the last vertex duplicates the first.
        let _ = points.pop();
        let _ = mask.pop();

        if points.len() >= 3 {
            loops.push(RingDraft {
                points,
                new_mask: mask,
            });
        }
    }

    loops
}

fn assemble_pieces(
    loops: Vec<RingDraft>,
    rings: &[Vec<Point<Real>>],
    crossings: &[Crossing],
    tol: Real,
) -> Option<Vec<CutPiece>> {
    let mut pieces: Vec<CutPiece> = Vec::new();
    let mut pending_holes: Vec<RingDraft> = Vec::new();

    for ring_loop in loops {
        if ring_loop.signed_area_xy() >= 0.0 {
            pieces.push(CutPiece {
                exterior: ring_loop,
                holes: Vec::new(),
            });
        } else {
            pending_holes.push(ring_loop);
        }
    }

    // An exterior the line never crossed still bounds a piece when the cut
    // carved pockets out of its holes.
    let exterior_crossed = crossings.iter().any(|c| c.ring == 0);
    if !exterior_crossed {
        pieces.push(CutPiece {
            exterior: RingDraft::from_ring(&rings[0]),
            holes: Vec::new(),
        });
    }

    if pieces.is_empty() {
        return None;
    }

    // Traced holes first, then the untouched input holes.
    for hole in pending_holes {
        let probe = probe_outside_loop(&hole, tol);
        assign_hole(&mut pieces, hole, &probe);
    }

    for (ri, ring) in rings.iter().enumerate().skip(1) {
        if crossings.iter().any(|c| c.ring == ri) {
            continue;
        }
        let draft = RingDraft::from_ring(ring);
        let probe = ring[0].xy();
        assign_hole(&mut pieces, draft, &probe);
    }

    Some(pieces)
}

/// A point just outside a clockwise hole loop (i.e. inside the region the
/// loop is a hole of), taken beside an original-geometry edge of the loop.
fn probe_outside_loop(hole: &RingDraft, tol: Real) -> Point2<Real> {
    let n = hole.points.len();

    for i in 0..n {
        let j = (i + 1) % n;
        if hole.new_mask[i] && hole.new_mask[j] {
            continue;
        }

        let a = hole.points[i].xy();
        let b = hole.points[j].xy();
        let dir = b - a;
        if dir.norm() < tol {
            continue;
        }

        // The surrounding region lies left of a clockwise hole boundary.
        let normal = na::Vector2::new(-dir.y, dir.x).normalize();
        return (a + b.coords) * 0.5 + normal * (tol * 2.0);
    }

    hole.points[0].xy()
}

fn assign_hole(pieces: &mut [CutPiece], hole: RingDraft, probe: &Point2<Real>) {
    let mut best: Option<(usize, Real)> = None;

    for (pi, piece) in pieces.iter().enumerate() {
        if utils::point_in_ring_xy(probe, &piece.exterior.points) {
            let area = piece.exterior.signed_area_xy();
            if best.map_or(true, |(_, a)| area < a) {
                best = Some((pi, area));
            }
        }
    }

    match best {
        Some((pi, _)) => pieces[pi].holes.push(hole),
        None => debug!("a hole ring ended up outside every cut piece; dropped"),
    }
}
