//! Internal tree elements and tree construction.
//!
//! Each node splits its triangle range by the plane through the middle of its
//! bounding box along one axis. Triangles entirely on the lower side go to the
//! left child, triangles entirely on the upper side go to the right child and
//! triangles touching or crossing the plane go to the middle child, so every
//! triangle ends up in exactly one subtree.

use lux_math::{BoundingBox, Ray};

use super::arena::{Handle, Pool};
use super::buffer::TriangleBuffer;
use super::leaf::{Candidate, Leaf};
use super::Traversal;

const AXES: usize = 3;

/// Axes along which a node's triangles are known to be inseparable.
///
/// Bit `i` is set once a middle child has been split along axis `i`:
/// every triangle of that child straddles the plane, so splitting it along
/// the same axis again cannot separate anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct AxisMask(u8);

impl AxisMask {
    pub const NONE: AxisMask = AxisMask(0);
    pub const ALL: AxisMask = AxisMask(0b111);

    pub fn contains(self, axis: usize) -> bool {
        self.0 & (1 << axis) != 0
    }

    pub fn with(self, axis: usize) -> AxisMask {
        AxisMask(self.0 | (1 << axis))
    }

    pub fn is_exhausted(self) -> bool {
        self == Self::ALL
    }

    /// The first axis at or after `axis` (cyclically) that is not forbidden.
    pub fn next_allowed(self, mut axis: usize) -> usize {
        debug_assert!(!self.is_exhausted(), "no axis left to split along");
        while self.contains(axis) {
            axis = (axis + 1) % AXES;
        }
        axis
    }
}

/// Reference to a child element in one of the tree's pools.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Child {
    Node(Handle<Node>),
    Leaf(Handle<Leaf>),
}

/// A tree element with one to three children (left, middle, right).
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Node {
    pub bbox: BoundingBox,
    pub begin: usize,
    pub end: usize,
    pub axis: u8,
    pub children: [Option<Child>; 3],
}

impl Node {
    /// Visit the children left to right unless the ray misses the node's box
    /// within its live range. Children may shrink `ray.max_t`.
    pub fn intersect(
        &self,
        traversal: &Traversal<'_>,
        ray: &mut Ray,
        best: &mut Option<Candidate>,
    ) {
        if self.bbox.intersect_inv(ray, traversal.inv_direction).is_none() {
            return;
        }
        for &child in self.children.iter().flatten() {
            traversal.nearest(child, ray, best);
        }
    }

    pub fn intersect_test(&self, traversal: &Traversal<'_>, ray: &Ray) -> bool {
        if self.bbox.intersect_inv(ray, traversal.inv_direction).is_none() {
            return false;
        }
        self.children
            .iter()
            .flatten()
            .any(|&child| traversal.any_hit(child, ray))
    }

    pub fn child_count(&self) -> usize {
        self.children.iter().flatten().count()
    }
}

/// Recursive construction over a triangle buffer.
pub(crate) struct Builder<'a> {
    pub buffer: &'a mut TriangleBuffer,
    pub nodes: &'a mut Pool<Node>,
    pub leaves: &'a mut Pool<Leaf>,
    pub leaf_threshold: usize,
}

impl Builder<'_> {
    /// Build the whole tree and return its root, or `None` for an empty buffer.
    pub fn build_root(&mut self) -> Option<Child> {
        let count = self.buffer.len();
        if count == 0 {
            return None;
        }
        if count <= self.leaf_threshold {
            return Some(Child::Leaf(self.leaf(0, count)));
        }
        Some(Child::Node(self.node(0, count, 0, AxisMask::NONE)))
    }

    fn leaf(&mut self, begin: usize, end: usize) -> Handle<Leaf> {
        let leaf = Leaf::new(self.buffer, begin, end);
        self.leaves.alloc(leaf)
    }

    fn node(
        &mut self,
        begin: usize,
        end: usize,
        axis: usize,
        forbidden: AxisMask,
    ) -> Handle<Node> {
        let axis = forbidden.next_allowed(axis);
        let bbox = self.buffer.bounds(begin, end);
        let divider = bbox.split_plane(axis);

        let (l1, r1) = self.buffer.partition(begin, end, axis, divider);
        let next = (axis + 1) % AXES;

        let mut children = [None; 3];
        if begin < l1 {
            children[0] = Some(self.subtree(begin, l1, next, forbidden, false));
        }
        if l1 < r1 {
            children[1] = Some(self.subtree(l1, r1, next, forbidden.with(axis), true));
        }
        if r1 < end {
            children[2] = Some(self.subtree(r1, end, next, forbidden, false));
        }
        debug_assert!(children.iter().any(Option::is_some));

        self.nodes.alloc(Node {
            bbox,
            begin,
            end,
            axis: axis as u8,
            children,
        })
    }

    /// A straddling range whose mask covers every axis cannot be split any
    /// further, whatever its size: its triangles share one extent on all axes.
    fn subtree(
        &mut self,
        begin: usize,
        end: usize,
        axis: usize,
        forbidden: AxisMask,
        straddling: bool,
    ) -> Child {
        if end - begin <= self.leaf_threshold || (straddling && forbidden.is_exhausted()) {
            Child::Leaf(self.leaf(begin, end))
        } else {
            Child::Node(self.node(begin, end, axis, forbidden))
        }
    }
}
