//! Delaunay triangulation of a planar point set (Bowyer-Watson).
//!
//! Points are expected in a unit-scale space; the scattered interpolator
//! normalizes both axes to `[0, 1]` before triangulating so that diameters
//! (hundreds) and speeds (thousands) carry equal weight.

/// A planar point.
pub type Point = [f64; 2];

/// Half-width of the super-triangle. Input points are assumed to lie in the
/// unit square.
const SUPER_SCALE: f64 = 1000.0;

/// Barycentric tolerance for points on a triangle edge.
pub const EDGE_EPSILON: f64 = 1e-9;

/// A triangle as three indices into the point list, counter-clockwise.
pub type Triangle = [usize; 3];

/// Twice the signed area of `(a, b, c)`; positive when counter-clockwise.
pub fn orient(a: Point, b: Point, c: Point) -> f64 {
    (b[0] - a[0]) * (c[1] - a[1]) - (b[1] - a[1]) * (c[0] - a[0])
}

/// Positive when `d` lies strictly inside the circumcircle of the
/// counter-clockwise triangle `(a, b, c)`.
pub fn in_circle(a: Point, b: Point, c: Point, d: Point) -> f64 {
    let (adx, ady) = (a[0] - d[0], a[1] - d[1]);
    let (bdx, bdy) = (b[0] - d[0], b[1] - d[1]);
    let (cdx, cdy) = (c[0] - d[0], c[1] - d[1]);
    let ad = adx * adx + ady * ady;
    let bd = bdx * bdx + bdy * bdy;
    let cd = cdx * cdx + cdy * cdy;
    adx * (bdy * cd - bd * cdy) - ady * (bdx * cd - bd * cdx) + ad * (bdx * cdy - bdy * cdx)
}

/// Barycentric weights of `p` in triangle `(a, b, c)`.
///
/// `None` for a degenerate triangle.
pub fn barycentric(a: Point, b: Point, c: Point, p: Point) -> Option<[f64; 3]> {
    let area = orient(a, b, c);
    if area.abs() < f64::EPSILON {
        return None;
    }
    let wa = orient(b, c, p) / area;
    let wb = orient(c, a, p) / area;
    Some([wa, wb, 1.0 - wa - wb])
}

/// Triangulate `points`.
///
/// Returns counter-clockwise triangles indexing into `points`. Fewer than
/// three points, or all points collinear, yield no triangles.
pub fn triangulate(points: &[Point]) -> Vec<Triangle> {
    let n = points.len();
    if n < 3 {
        return Vec::new();
    }

    let mut verts: Vec<Point> = points.to_vec();
    verts.push([-SUPER_SCALE, -SUPER_SCALE]);
    verts.push([3.0 * SUPER_SCALE, -SUPER_SCALE]);
    verts.push([-SUPER_SCALE, 3.0 * SUPER_SCALE]);
    let mut triangles: Vec<Triangle> = vec![[n, n + 1, n + 2]];

    for (pi, &p) in points.iter().enumerate() {
        let mut bad = Vec::new();
        let mut keep = Vec::with_capacity(triangles.len());
        for tri in triangles.drain(..) {
            let [a, b, c] = tri;
            if in_circle(verts[a], verts[b], verts[c], p) > 0.0 {
                bad.push(tri);
            } else {
                keep.push(tri);
            }
        }
        triangles = keep;

        // Cavity boundary: edges of bad triangles not shared with another bad triangle.
        let mut edges: Vec<[usize; 2]> = Vec::with_capacity(bad.len() * 3);
        for [a, b, c] in &bad {
            for edge in [[*a, *b], [*b, *c], [*c, *a]] {
                if let Some(pos) = edges
                    .iter()
                    .position(|e| e[0] == edge[1] && e[1] == edge[0])
                {
                    edges.swap_remove(pos);
                } else {
                    edges.push(edge);
                }
            }
        }

        for [a, b] in edges {
            let tri = if orient(verts[a], verts[b], p) >= 0.0 {
                [a, b, pi]
            } else {
                [b, a, pi]
            };
            triangles.push(tri);
        }
    }

    triangles.retain(|t| {
        t.iter().all(|&v| v < n) && orient(verts[t[0]], verts[t[1]], verts[t[2]]).abs() > f64::EPSILON
    });
    triangles
}
