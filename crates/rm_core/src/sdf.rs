//! Signed distance field graph.
//!
//! Nodes are stored in an arena and refer to their children by `NodeId`.
//! A node may be shared by any number of parents, which is how instancing
//! works: build a shape once, reference it from several combinators.
//!
//! Combinator constructors only accept ids that already exist in the arena,
//! so a child always has a lower index than its parent and the graph cannot
//! contain cycles.
//!
//! Queries are pure. `sample` returns the distance together with the node
//! whose material applies at the query point, so material lookup never
//! depends on the order of previous queries and the arena can be shared
//! freely between marching threads.

use rm_math::{Vec2, Vec3};
use thiserror::Error;

use crate::Material;

/// Finite-difference step for gradient (normal) estimation.
pub const NORMAL_EPSILON: f32 = 1e-4;

/// Handle to a node inside an `SdfArena`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    /// Position of the node in its arena.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Errors raised while building an SDF graph.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SdfError {
    #[error("Unknown SDF node: {0:?}")]
    UnknownNode(NodeId),
}

/// The shape or operation a node evaluates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SdfKind {
    Sphere {
        center: Vec3,
        radius: f32,
    },
    /// Axis-aligned box. `size` is the full edge length along each axis.
    Box {
        center: Vec3,
        size: Vec3,
    },
    /// Torus lying in the XZ plane.
    Torus {
        center: Vec3,
        major_radius: f32,
        minor_radius: f32,
    },
    /// Infinite plane `dot(normal, p) + offset = 0` with a unit normal.
    Plane {
        normal: Vec3,
        offset: f32,
    },
    /// Y-aligned capped cylinder.
    ///
    /// Built as the max of the radial and cap distances, which is not an
    /// exact distance near the rim. Marching still converges, just with
    /// smaller steps close to the edges.
    Cylinder {
        center: Vec3,
        radius: f32,
        height: f32,
    },
    Union {
        a: NodeId,
        b: NodeId,
    },
    /// `a` with `b` carved out.
    Subtraction {
        a: NodeId,
        b: NodeId,
    },
    Intersection {
        a: NodeId,
        b: NodeId,
    },
    /// Polynomial smooth-min blend with radius `k`.
    SmoothUnion {
        a: NodeId,
        b: NodeId,
        k: f32,
    },
    /// Infinite copies of `shape` every `spacing` units. A non-positive
    /// spacing disables repetition on that axis.
    Repetition {
        shape: NodeId,
        spacing: Vec3,
    },
}

impl SdfKind {
    /// Child nodes referenced by this node.
    pub fn children(&self) -> [Option<NodeId>; 2] {
        match *self {
            SdfKind::Union { a, b }
            | SdfKind::Subtraction { a, b }
            | SdfKind::Intersection { a, b }
            | SdfKind::SmoothUnion { a, b, .. } => [Some(a), Some(b)],
            SdfKind::Repetition { shape, .. } => [Some(shape), None],
            _ => [None, None],
        }
    }
}

/// A node of the graph: its kind plus an optional material.
///
/// Primitives always carry a material. Combinators carry one only when it
/// was assigned explicitly, in which case it overrides whatever the
/// children would report.
#[derive(Debug, Clone, PartialEq)]
pub struct SdfNode {
    pub kind: SdfKind,
    material: Option<Material>,
}

impl SdfNode {
    /// Explicitly assigned material, if any.
    pub fn material(&self) -> Option<Material> {
        self.material
    }
}

/// Result of a distance query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SdfSample {
    /// Signed distance: negative inside, zero on the surface, positive outside
    pub distance: f32,
    /// Node whose material applies at the query point
    pub leaf: NodeId,
}

/// Arena holding every node of a scene's distance field.
#[derive(Debug, Clone, Default)]
pub struct SdfArena {
    nodes: Vec<SdfNode>,
}

impl SdfArena {
    /// Create an empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the arena is empty.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns true if `id` refers to a node of this arena.
    pub fn contains(&self, id: NodeId) -> bool {
        id.index() < self.nodes.len()
    }

    /// Get a node by id.
    pub fn get(&self, id: NodeId) -> Option<&SdfNode> {
        self.nodes.get(id.index())
    }

    // =========================================================================
    // Construction
    // =========================================================================

    fn push(&mut self, kind: SdfKind, material: Option<Material>) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(SdfNode { kind, material });
        id
    }

    fn push_primitive(&mut self, kind: SdfKind) -> NodeId {
        self.push(kind, Some(Material::default()))
    }

    fn push_combinator(&mut self, kind: SdfKind) -> Result<NodeId, SdfError> {
        for child in kind.children().into_iter().flatten() {
            if !self.contains(child) {
                log::debug!("Rejected combinator with unknown child {:?}", child);
                return Err(SdfError::UnknownNode(child));
            }
        }
        Ok(self.push(kind, None))
    }

    /// Add a sphere.
    pub fn sphere(&mut self, center: Vec3, radius: f32) -> NodeId {
        self.push_primitive(SdfKind::Sphere { center, radius })
    }

    /// Add an axis-aligned box with full edge lengths `size`.
    pub fn cuboid(&mut self, center: Vec3, size: Vec3) -> NodeId {
        self.push_primitive(SdfKind::Box { center, size })
    }

    /// Add a torus in the XZ plane.
    pub fn torus(&mut self, center: Vec3, major_radius: f32, minor_radius: f32) -> NodeId {
        self.push_primitive(SdfKind::Torus {
            center,
            major_radius,
            minor_radius,
        })
    }

    /// Add an infinite plane. `normal` must be non-zero; it is normalized here.
    pub fn plane(&mut self, normal: Vec3, offset: f32) -> NodeId {
        debug_assert!(normal.length_squared() > 0.0, "plane normal must be non-zero");
        self.push_primitive(SdfKind::Plane {
            normal: normal.normalize(),
            offset,
        })
    }

    /// Add a Y-aligned capped cylinder.
    pub fn cylinder(&mut self, center: Vec3, radius: f32, height: f32) -> NodeId {
        self.push_primitive(SdfKind::Cylinder {
            center,
            radius,
            height,
        })
    }

    pub fn union(&mut self, a: NodeId, b: NodeId) -> Result<NodeId, SdfError> {
        self.push_combinator(SdfKind::Union { a, b })
    }

    pub fn subtraction(&mut self, a: NodeId, b: NodeId) -> Result<NodeId, SdfError> {
        self.push_combinator(SdfKind::Subtraction { a, b })
    }

    pub fn intersection(&mut self, a: NodeId, b: NodeId) -> Result<NodeId, SdfError> {
        self.push_combinator(SdfKind::Intersection { a, b })
    }

    /// Blend two shapes with smoothing radius `k`. `k <= 0` behaves as a
    /// hard union.
    pub fn smooth_union(&mut self, a: NodeId, b: NodeId, k: f32) -> Result<NodeId, SdfError> {
        self.push_combinator(SdfKind::SmoothUnion { a, b, k })
    }

    pub fn repetition(&mut self, shape: NodeId, spacing: Vec3) -> Result<NodeId, SdfError> {
        self.push_combinator(SdfKind::Repetition { shape, spacing })
    }

    /// Assign a material to a node.
    ///
    /// On a combinator the material overrides the children's materials for
    /// every point attributed to that subtree.
    pub fn set_material(&mut self, id: NodeId, material: Material) -> Result<(), SdfError> {
        let node = self
            .nodes
            .get_mut(id.index())
            .ok_or(SdfError::UnknownNode(id))?;
        node.material = Some(material);
        Ok(())
    }

    /// Material of a node, falling back to the default material for
    /// combinators without an explicit one.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not belong to this arena.
    pub fn material(&self, id: NodeId) -> Material {
        self.nodes[id.index()].material().unwrap_or_default()
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Evaluate the distance field of `id` at `p`.
    ///
    /// Queries take ids on trust: every id handed out by this arena is valid
    /// forever, and combinators only reference existing nodes. Use
    /// `contains` to check ids of unknown origin.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not belong to this arena. `distance`,
    /// `material_at` and `normal` share this contract.
    pub fn sample(&self, id: NodeId, p: Vec3) -> SdfSample {
        debug_assert!(!p.is_nan(), "SDF queried at NaN point");

        let node = &self.nodes[id.index()];
        let mut sample = match node.kind {
            SdfKind::Sphere { center, radius } => SdfSample {
                distance: (p - center).length() - radius,
                leaf: id,
            },
            SdfKind::Box { center, size } => {
                let q = (p - center).abs() - size * 0.5;
                SdfSample {
                    distance: q.max_element().min(0.0) + q.max(Vec3::ZERO).length(),
                    leaf: id,
                }
            }
            SdfKind::Torus {
                center,
                major_radius,
                minor_radius,
            } => {
                let p = p - center;
                let q = Vec2::new(Vec2::new(p.x, p.z).length() - major_radius, p.y);
                SdfSample {
                    distance: q.length() - minor_radius,
                    leaf: id,
                }
            }
            SdfKind::Plane { normal, offset } => SdfSample {
                distance: normal.dot(p) + offset,
                leaf: id,
            },
            SdfKind::Cylinder {
                center,
                radius,
                height,
            } => {
                let p = p - center;
                let radial = Vec2::new(p.x, p.z).length() - radius;
                let cap = p.y.abs() - height * 0.5;
                SdfSample {
                    distance: radial.max(cap),
                    leaf: id,
                }
            }
            SdfKind::Union { a, b } => {
                let sa = self.sample(a, p);
                let sb = self.sample(b, p);
                if sa.distance < sb.distance {
                    sa
                } else {
                    sb
                }
            }
            SdfKind::Subtraction { a, b } => {
                let sa = self.sample(a, p);
                let sb = self.sample(b, p);
                if sa.distance >= -sb.distance {
                    sa
                } else {
                    SdfSample {
                        distance: -sb.distance,
                        leaf: sb.leaf,
                    }
                }
            }
            SdfKind::Intersection { a, b } => {
                let sa = self.sample(a, p);
                let sb = self.sample(b, p);
                if sa.distance >= sb.distance {
                    sa
                } else {
                    sb
                }
            }
            SdfKind::SmoothUnion { a, b, k } => {
                let sa = self.sample(a, p);
                let sb = self.sample(b, p);
                if k <= 0.0 {
                    if sa.distance < sb.distance {
                        sa
                    } else {
                        sb
                    }
                } else {
                    let h = (0.5 + 0.5 * (sb.distance - sa.distance) / k).clamp(0.0, 1.0);
                    let distance =
                        sb.distance * (1.0 - h) + sa.distance * h - k * h * (1.0 - h);
                    SdfSample {
                        distance,
                        leaf: if h > 0.5 { sa.leaf } else { sb.leaf },
                    }
                }
            }
            SdfKind::Repetition { shape, spacing } => {
                let local = Vec3::new(
                    repeat_axis(p.x, spacing.x),
                    repeat_axis(p.y, spacing.y),
                    repeat_axis(p.z, spacing.z),
                );
                self.sample(shape, local)
            }
        };

        // An explicit material on a combinator claims the whole subtree
        if node.material.is_some() {
            sample.leaf = id;
        }
        sample
    }

    /// Signed distance from `p` to the surface of `id`.
    #[inline]
    pub fn distance(&self, id: NodeId, p: Vec3) -> f32 {
        self.sample(id, p).distance
    }

    /// Material of the surface of `id` closest to `p`.
    ///
    /// Re-queries the field, so the answer only depends on `p`.
    pub fn material_at(&self, id: NodeId, p: Vec3) -> Material {
        self.material(self.sample(id, p).leaf)
    }

    /// Unit surface normal from the central-difference gradient of the field.
    ///
    /// Exact for true distance fields, an approximation for box corners,
    /// cylinder rims and smooth blends.
    pub fn normal(&self, id: NodeId, p: Vec3) -> Vec3 {
        let h = NORMAL_EPSILON;
        let dx = Vec3::new(h, 0.0, 0.0);
        let dy = Vec3::new(0.0, h, 0.0);
        let dz = Vec3::new(0.0, 0.0, h);

        Vec3::new(
            self.distance(id, p + dx) - self.distance(id, p - dx),
            self.distance(id, p + dy) - self.distance(id, p - dy),
            self.distance(id, p + dz) - self.distance(id, p - dz),
        )
        .normalize()
    }
}

/// Map a coordinate into the cell `[-spacing/2, spacing/2)`.
#[inline]
fn repeat_axis(x: f32, spacing: f32) -> f32 {
    if spacing > 0.0 {
        (x + 0.5 * spacing).rem_euclid(spacing) - 0.5 * spacing
    } else {
        x
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Color;

    const TOLERANCE: f32 = 1e-5;

    fn sample_points() -> Vec<Vec3> {
        let mut points = Vec::new();
        for x in -3..=3 {
            for y in -3..=3 {
                for z in -3..=3 {
                    points.push(Vec3::new(x as f32 * 0.7, y as f32 * 0.6 + 0.1, z as f32 * 0.8));
                }
            }
        }
        points
    }

    #[test]
    fn test_sphere_distance() {
        let mut arena = SdfArena::new();
        let center = Vec3::new(1.0, -2.0, 0.5);
        let sphere = arena.sphere(center, 1.5);

        for dir in [Vec3::X, -Vec3::Y, Vec3::new(1.0, 1.0, 1.0).normalize()] {
            for d in [0.25, 1.0, 10.0] {
                let p = center + dir * (1.5 + d);
                assert!((arena.distance(sphere, p) - d).abs() < 1e-4);
            }
        }

        // Negative inside
        assert!((arena.distance(sphere, center) + 1.5).abs() < TOLERANCE);
    }

    #[test]
    fn test_box_distance() {
        let mut arena = SdfArena::new();
        let cube = arena.cuboid(Vec3::ZERO, Vec3::splat(2.0));

        assert!((arena.distance(cube, Vec3::new(2.0, 0.0, 0.0)) - 1.0).abs() < TOLERANCE);
        assert!((arena.distance(cube, Vec3::new(0.0, 0.0, -4.0)) - 3.0).abs() < TOLERANCE);
        // Edge region measures to the edge, not the face
        let corner = arena.distance(cube, Vec3::new(2.0, 2.0, 0.0));
        assert!((corner - 2.0_f32.sqrt()).abs() < TOLERANCE);
        assert!((arena.distance(cube, Vec3::ZERO) + 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn test_torus_distance() {
        let mut arena = SdfArena::new();
        let torus = arena.torus(Vec3::ZERO, 1.0, 0.25);

        assert!((arena.distance(torus, Vec3::new(1.0, 1.0, 0.0)) - 0.75).abs() < TOLERANCE);
        assert!((arena.distance(torus, Vec3::new(0.0, 0.0, 3.0)) - 1.75).abs() < TOLERANCE);
        // The hole in the middle is outside the surface
        assert!((arena.distance(torus, Vec3::ZERO) - 0.75).abs() < TOLERANCE);
    }

    #[test]
    fn test_plane_distance() {
        let mut arena = SdfArena::new();
        let ground = arena.plane(Vec3::new(0.0, 2.0, 0.0), 1.0);

        assert!((arena.distance(ground, Vec3::new(5.0, 3.0, -2.0)) - 4.0).abs() < TOLERANCE);
        assert!((arena.distance(ground, Vec3::new(0.0, -1.0, 0.0))).abs() < TOLERANCE);
        assert!(arena.distance(ground, Vec3::new(0.0, -3.0, 0.0)) < 0.0);
    }

    #[test]
    fn test_cylinder_distance() {
        let mut arena = SdfArena::new();
        let pillar = arena.cylinder(Vec3::ZERO, 0.5, 3.0);

        assert!((arena.distance(pillar, Vec3::new(2.0, 0.0, 0.0)) - 1.5).abs() < TOLERANCE);
        assert!((arena.distance(pillar, Vec3::new(0.0, 3.0, 0.0)) - 1.5).abs() < TOLERANCE);
        // Past the rim the caps and side are combined with max, not measured
        // to the rim circle
        assert!((arena.distance(pillar, Vec3::new(2.0, 3.0, 0.0)) - 1.5).abs() < TOLERANCE);
    }

    #[test]
    fn test_boolean_operations() {
        let mut arena = SdfArena::new();
        let a = arena.sphere(Vec3::new(-0.5, 0.0, 0.0), 1.0);
        let b = arena.cuboid(Vec3::new(0.5, 0.2, 0.0), Vec3::new(1.5, 1.0, 2.0));
        let union = arena.union(a, b).unwrap();
        let subtraction = arena.subtraction(a, b).unwrap();
        let intersection = arena.intersection(a, b).unwrap();

        for p in sample_points() {
            let da = arena.distance(a, p);
            let db = arena.distance(b, p);
            assert_eq!(arena.distance(union, p), da.min(db));
            assert_eq!(arena.distance(intersection, p), da.max(db));
            assert_eq!(arena.distance(subtraction, p), da.max(-db));
        }
    }

    #[test]
    fn test_smooth_union_never_exceeds_union() {
        let mut arena = SdfArena::new();
        let a = arena.sphere(Vec3::new(-0.6, 0.0, 0.0), 0.8);
        let b = arena.torus(Vec3::new(0.6, 0.0, 0.0), 0.8, 0.3);

        for k in [0.05, 0.3, 1.0, 4.0] {
            let blend = arena.smooth_union(a, b, k).unwrap();
            for p in sample_points() {
                let hard = arena.distance(a, p).min(arena.distance(b, p));
                assert!(arena.distance(blend, p) <= hard + TOLERANCE);
            }
        }
    }

    #[test]
    fn test_smooth_union_zero_k_is_hard_union() {
        let mut arena = SdfArena::new();
        let a = arena.sphere(Vec3::ZERO, 1.0);
        let b = arena.sphere(Vec3::new(1.5, 0.0, 0.0), 1.0);
        let blend = arena.smooth_union(a, b, 0.0).unwrap();
        let union = arena.union(a, b).unwrap();

        for p in sample_points() {
            assert_eq!(arena.sample(blend, p), arena.sample(union, p));
        }
    }

    #[test]
    fn test_repetition() {
        let mut arena = SdfArena::new();
        let ball = arena.sphere(Vec3::ZERO, 1.0);
        let row = arena.repetition(ball, Vec3::new(4.0, 0.0, 0.0)).unwrap();

        // Copies at every multiple of 4 along X, on both sides of the origin
        assert!((arena.distance(row, Vec3::new(8.0, 0.0, 0.0)) + 1.0).abs() < TOLERANCE);
        assert!((arena.distance(row, Vec3::new(-8.0, 0.0, 0.0)) + 1.0).abs() < TOLERANCE);
        assert!((arena.distance(row, Vec3::new(-6.0, 0.0, 0.0)) - 1.0).abs() < TOLERANCE);
        assert!((arena.distance(row, Vec3::new(8.5, 0.0, 0.0)) + 0.5).abs() < TOLERANCE);

        // Zero spacing leaves Y untouched
        assert!((arena.distance(row, Vec3::new(0.0, 8.0, 0.0)) - 7.0).abs() < TOLERANCE);
    }

    #[test]
    fn test_union_material_follows_closest_child() {
        let red = Material::new(Color::new(1.0, 0.0, 0.0));
        let blue = Material::new(Color::new(0.0, 0.0, 1.0));

        let mut arena = SdfArena::new();
        let a = arena.sphere(Vec3::new(-2.0, 0.0, 0.0), 1.0);
        let b = arena.sphere(Vec3::new(2.0, 0.0, 0.0), 1.0);
        arena.set_material(a, red).unwrap();
        arena.set_material(b, blue).unwrap();
        let union = arena.union(a, b).unwrap();

        let near_b = Vec3::new(3.0, 0.0, 0.0);
        let near_a = Vec3::new(-3.0, 0.0, 0.0);

        // Queries in any order give the same answer
        assert_eq!(arena.material_at(union, near_b), blue);
        assert_eq!(arena.material_at(union, near_a), red);
        assert_eq!(arena.material_at(union, near_b), blue);
        assert_eq!(arena.sample(union, near_a).leaf, a);
    }

    #[test]
    fn test_smooth_union_material_attribution() {
        let mut arena = SdfArena::new();
        let a = arena.sphere(Vec3::new(-1.0, 0.0, 0.0), 1.0);
        let b = arena.sphere(Vec3::new(1.0, 0.0, 0.0), 1.0);
        let blend = arena.smooth_union(a, b, 0.5).unwrap();

        assert_eq!(arena.sample(blend, Vec3::new(-1.5, 0.0, 0.0)).leaf, a);
        assert_eq!(arena.sample(blend, Vec3::new(1.5, 0.0, 0.0)).leaf, b);
    }

    #[test]
    fn test_subtraction_material_on_carved_wall() {
        let mut arena = SdfArena::new();
        let block = arena.cuboid(Vec3::ZERO, Vec3::splat(2.0));
        let hole = arena.sphere(Vec3::ZERO, 0.5);
        let carved = arena.subtraction(block, hole).unwrap();

        // Inside the hole the carving sphere defines the surface
        assert_eq!(arena.sample(carved, Vec3::new(0.1, 0.0, 0.0)).leaf, hole);
        // Outside the block the block defines it
        assert_eq!(arena.sample(carved, Vec3::new(3.0, 0.0, 0.0)).leaf, block);
    }

    #[test]
    fn test_combinator_material_override() {
        let gold = Material::new(Color::new(0.95, 0.9, 0.1)).with_metal(0.9, 0.05);

        let mut arena = SdfArena::new();
        let cube = arena.cuboid(Vec3::ZERO, Vec3::splat(2.0));
        let ball = arena.sphere(Vec3::ZERO, 1.4);
        let csg = arena.intersection(cube, ball).unwrap();
        assert_eq!(arena.material_at(csg, Vec3::new(3.0, 0.0, 0.0)), Material::default());

        arena.set_material(csg, gold).unwrap();
        assert_eq!(arena.material_at(csg, Vec3::new(3.0, 0.0, 0.0)), gold);
        assert_eq!(arena.sample(csg, Vec3::new(0.0, 3.0, 0.0)).leaf, csg);
    }

    #[test]
    fn test_shared_child_instancing() {
        let mut arena = SdfArena::new();
        let ball = arena.sphere(Vec3::ZERO, 0.5);
        let row = arena.repetition(ball, Vec3::new(2.0, 0.0, 0.0)).unwrap();
        let column = arena.repetition(ball, Vec3::new(0.0, 2.0, 0.0)).unwrap();
        let grid = arena.union(row, column).unwrap();

        assert_eq!(arena.len(), 4);
        assert!((arena.distance(grid, Vec3::new(4.0, 0.0, 0.0)) + 0.5).abs() < TOLERANCE);
        assert!((arena.distance(grid, Vec3::new(0.0, 4.0, 0.0)) + 0.5).abs() < TOLERANCE);
        assert_eq!(arena.sample(grid, Vec3::new(0.0, 4.0, 0.0)).leaf, ball);
    }

    #[test]
    fn test_unknown_child_rejected() {
        let mut big = SdfArena::new();
        big.sphere(Vec3::ZERO, 1.0);
        big.sphere(Vec3::ZERO, 2.0);
        let foreign = big.sphere(Vec3::ZERO, 3.0);

        let mut small = SdfArena::new();
        let local = small.sphere(Vec3::ZERO, 1.0);

        assert_eq!(small.union(local, foreign), Err(SdfError::UnknownNode(foreign)));
        assert_eq!(
            small.set_material(foreign, Material::default()),
            Err(SdfError::UnknownNode(foreign))
        );
        assert_eq!(small.len(), 1);
    }

    #[test]
    fn test_sphere_normal() {
        let mut arena = SdfArena::new();
        let sphere = arena.sphere(Vec3::ZERO, 1.0);

        let n = arena.normal(sphere, Vec3::new(0.0, 0.0, 1.0));
        assert!((n - Vec3::Z).length() < 1e-3);

        let diagonal = Vec3::new(1.0, 1.0, 0.0).normalize();
        let n = arena.normal(sphere, diagonal);
        assert!((n - diagonal).length() < 1e-3);
        assert!((n.length() - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_box_face_normal() {
        let mut arena = SdfArena::new();
        let cube = arena.cuboid(Vec3::ZERO, Vec3::splat(2.0));

        let n = arena.normal(cube, Vec3::new(0.2, 1.0, -0.3));
        assert!((n - Vec3::Y).length() < 1e-3);
    }

    #[test]
    fn test_children() {
        let mut arena = SdfArena::new();
        let a = arena.sphere(Vec3::ZERO, 1.0);
        let u = arena.union(a, a).unwrap();
        let r = arena.repetition(u, Vec3::ONE).unwrap();

        assert_eq!(arena.get(a).unwrap().kind.children(), [None, None]);
        assert_eq!(arena.get(u).unwrap().kind.children(), [Some(a), Some(a)]);
        assert_eq!(arena.get(r).unwrap().kind.children(), [Some(u), None]);
    }

    #[test]
    #[should_panic]
    fn test_distance_with_foreign_id_panics() {
        let mut big = SdfArena::new();
        big.sphere(Vec3::ZERO, 1.0);
        let foreign = big.sphere(Vec3::ZERO, 2.0);

        let mut small = SdfArena::new();
        small.sphere(Vec3::ZERO, 1.0);
        assert!(!small.contains(foreign));
        small.distance(foreign, Vec3::ZERO);
    }

    #[test]
    #[should_panic]
    fn test_material_with_foreign_id_panics() {
        let mut big = SdfArena::new();
        big.sphere(Vec3::ZERO, 1.0);
        let foreign = big.sphere(Vec3::ZERO, 2.0);

        let small = SdfArena::new();
        small.material(foreign);
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "NaN")]
    fn test_nan_query_asserts() {
        let mut arena = SdfArena::new();
        let sphere = arena.sphere(Vec3::ZERO, 1.0);
        arena.distance(sphere, Vec3::new(f32::NAN, 0.0, 0.0));
    }
}
