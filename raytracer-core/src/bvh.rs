use arrayvec::ArrayVec;

use crate::aabb::Aabb;
use crate::types::{Ray, V3};
use crate::util::partition_by_key;

/// Maximum depth of the tree (prevents runaway recursion on pathological inputs).
const MAX_DEPTH: u32 = 20;

/// Maximum objects held in a leaf before attempting to subdivide further.
const MAX_LEAF_OBJECTS: usize = 4;

/// Anything the Bvh can index must expose a world-space bounding box.
/// Implemented for `&Primitive` by `Scene`.
pub trait BvhObject {
    fn aabb(&self) -> Aabb;

    fn centroid(&self) -> V3 {
        self.aabb().centroid()
    }
}

struct BvhBranch {
    left_index: usize,
    right_index: usize,
}

struct BvhLeaf {
    first_index: usize,
    length: usize,
}

enum BvhNodeData {
    Branch(BvhBranch),
    Leaf(BvhLeaf),
}

struct BvhNode {
    aabb: Aabb,
    data: BvhNodeData,
}

impl BvhNode {
    fn leaf_data(&self) -> &BvhLeaf {
        match self.data {
            BvhNodeData::Leaf(ref leaf) => leaf,
            _ => panic!("Not a leaf node"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Axis {
    X,
    Y,
    Z,
}

fn axis_value(v: V3, axis: Axis) -> f32 {
    match axis {
        Axis::X => v.x(),
        Axis::Y => v.y(),
        Axis::Z => v.z(),
    }
}

/// Largest-extent axis of `aabb`, ties broken X > Y > Z.
fn largest_extent_axis(aabb: &Aabb) -> Axis {
    let extent = aabb.max - aabb.min;
    let (x, y, z) = (extent.x(), extent.y(), extent.z());
    if x >= y && x >= z {
        Axis::X
    } else if y >= z {
        Axis::Y
    } else {
        Axis::Z
    }
}

/// A spatial index over a fixed object set. Holds non-owning indices into
/// the caller's object slice; the caller (`Scene`) retains ownership.
pub struct Bvh {
    object_indices: Vec<usize>,
    nodes: Vec<BvhNode>,
}

impl Bvh {
    pub fn build<T: BvhObject>(objects: &[T]) -> Bvh {
        let mut object_indices = (0..objects.len()).collect::<Vec<usize>>();
        let mut nodes = Vec::with_capacity(objects.len() * 2);

        let root = BvhLeaf {
            first_index: 0,
            length: objects.len(),
        };
        let root = create_leaf_node(root, &object_indices, objects);
        nodes.push(root);

        subdivide(&mut nodes, 0, 0, &mut object_indices, objects);
        nodes.shrink_to_fit();

        log::debug!(
            "Generated {}-node tree for {}-object set",
            nodes.len(),
            objects.len()
        );

        Bvh {
            object_indices,
            nodes,
        }
    }

    pub fn aabb(&self) -> &Aabb {
        &self.nodes[0].aabb
    }

    /// Iterates candidate object indices that the ray's path through the
    /// tree may intersect. Candidates are not guaranteed to actually be
    /// hit, nor returned in any particular distance order.
    pub fn candidates<'a>(&'a self, ray: &'a Ray) -> BvhCandidateIter<'a> {
        let mut stack = ArrayVec::new();
        stack.push(0usize);
        BvhCandidateIter {
            bvh: self,
            stack,
            pending: Vec::new(),
            ray,
        }
    }
}

fn create_leaf_node<T: BvhObject>(leaf: BvhLeaf, object_indices: &[usize], objects: &[T]) -> BvhNode {
    let mut aabb = objects[object_indices[leaf.first_index]].aabb();
    for &i in &object_indices[leaf.first_index + 1..(leaf.first_index + leaf.length)] {
        aabb.subsume(&objects[i].aabb());
    }
    BvhNode {
        aabb,
        data: BvhNodeData::Leaf(leaf),
    }
}

fn median_of(values: &mut [f32]) -> f32 {
    values.sort_by(|a, b| a.partial_cmp(b).unwrap());
    values[values.len() / 2]
}

fn subdivide<T: BvhObject>(
    nodes: &mut Vec<BvhNode>,
    node_index: usize,
    depth: u32,
    object_indices: &mut [usize],
    objects: &[T],
) {
    let node = &nodes[node_index];
    let leaf = node.leaf_data();

    if leaf.length <= MAX_LEAF_OBJECTS || depth >= MAX_DEPTH {
        return;
    }

    let axis = largest_extent_axis(&node.aabb);
    let first = leaf.first_index;
    let length = leaf.length;

    let mut centers: Vec<f32> = object_indices[first..first + length]
        .iter()
        .map(|&i| axis_value(objects[i].centroid(), axis))
        .collect();
    let split_value = median_of(&mut centers);

    let slice = &mut object_indices[first..first + length];
    let (left_slice, right_slice) =
        partition_by_key(slice, split_value, |&i| axis_value(objects[i].centroid(), axis));

    let left_len = left_slice.len();
    let right_len = right_slice.len();

    if left_len == 0 || right_len == 0 {
        // All centers landed on one side of the median: can't split further.
        return;
    }

    let left = BvhLeaf {
        first_index: first,
        length: left_len,
    };
    let right = BvhLeaf {
        first_index: first + left_len,
        length: right_len,
    };

    let left_index = nodes.len();
    nodes.push(create_leaf_node(left, object_indices, objects));
    let right_index = nodes.len();
    nodes.push(create_leaf_node(right, object_indices, objects));

    nodes[node_index].data = BvhNodeData::Branch(BvhBranch {
        left_index,
        right_index,
    });

    subdivide(nodes, left_index, depth + 1, object_indices, objects);
    subdivide(nodes, right_index, depth + 1, object_indices, objects);
}

pub struct BvhCandidate {
    pub object_index: usize,
}

/// Depth-first search over the tree. `stack` holds unvisited node indices;
/// `pending` holds object indices from the most recently visited leaf that
/// haven't been yielded yet (a leaf's objects are not guaranteed to fit in
/// the `ArrayVec` node stack, so they're buffered separately).
pub struct BvhCandidateIter<'a> {
    bvh: &'a Bvh,
    stack: ArrayVec<usize, 30>,
    pending: Vec<usize>,
    ray: &'a Ray,
}

impl<'a> Iterator for BvhCandidateIter<'a> {
    type Item = BvhCandidate;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(object_index) = self.pending.pop() {
            return Some(BvhCandidate { object_index });
        }
        loop {
            let node_index = self.stack.pop()?;
            let node = &self.bvh.nodes[node_index];
            if !node.aabb.intersects(self.ray) {
                continue;
            }
            match node.data {
                BvhNodeData::Branch(ref branch) => {
                    self.stack.push(branch.left_index);
                    self.stack.push(branch.right_index);
                }
                BvhNodeData::Leaf(ref leaf) => {
                    self.pending.extend(
                        &self.bvh.object_indices[leaf.first_index..leaf.first_index + leaf.length],
                    );
                    if let Some(object_index) = self.pending.pop() {
                        return Some(BvhCandidate { object_index });
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    struct TestSphere {
        center: V3,
    }

    impl BvhObject for TestSphere {
        fn aabb(&self) -> Aabb {
            let r = V3(0.5, 0.5, 0.5);
            Aabb::from_min_max(self.center - r, self.center + r)
        }
    }

    fn grid(n: i32) -> Vec<TestSphere> {
        let mut objects = Vec::new();
        for x in 0..n {
            for y in 0..n {
                objects.push(TestSphere {
                    center: V3(x as f32 * 2.0, y as f32 * 2.0, 0.0),
                });
            }
        }
        objects
    }

    #[test]
    fn build_partitions_every_object_exactly_once() {
        let objects = grid(6);
        let bvh = Bvh::build(&objects);
        let mut seen = vec![0usize; objects.len()];
        for &i in &bvh.object_indices {
            seen[i] += 1;
        }
        assert!(seen.iter().all(|&c| c == 1));
    }

    #[test]
    fn candidates_match_brute_force() {
        let objects = grid(6);
        let bvh = Bvh::build(&objects);
        let ray = Ray::new(V3(-5.0, 0.0, -5.0), V3(1.0, 0.0, 1.0));

        let mut tree_hits: Vec<usize> = bvh
            .candidates(&ray)
            .map(|c| c.object_index)
            .filter(|&i| objects[i].aabb().intersects(&ray))
            .collect();
        tree_hits.sort();

        let mut brute_hits: Vec<usize> = (0..objects.len())
            .filter(|&i| objects[i].aabb().intersects(&ray))
            .collect();
        brute_hits.sort();

        assert_eq!(tree_hits, brute_hits);
    }

    #[test]
    fn single_object_tree_is_a_leaf() {
        let objects = vec![TestSphere { center: V3::ZERO }];
        let bvh = Bvh::build(&objects);
        assert_eq!(bvh.nodes.len(), 1);
    }
}
