//! Integration tests for the transform node hierarchy.
//!
//! Tests are organized by concern: local/world views, reparenting, cycle
//! rejection, destruction, and randomized invariant checks.
//!
//! # Usage
//!
//! ```sh
//! cargo test --test hierarchy_integration
//! ```

use nalgebra::Vector2;

use scenenode2d::components::transform2d::Transform2D;
use scenenode2d::resources::transformtree::{HierarchyError, NodeId, TransformTree};

const EPSILON: f32 = 1e-4;

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn assert_vec(actual: Vector2<f32>, x: f32, y: f32) {
    assert!(
        approx_eq(actual.x, x) && approx_eq(actual.y, y),
        "expected ({}, {}), got ({}, {})",
        x,
        y,
        actual.x,
        actual.y
    );
}

fn world_pos(tree: &TransformTree, id: NodeId) -> Vector2<f32> {
    tree.world(id).unwrap().position()
}

fn local_pos(tree: &TransformTree, id: NodeId) -> Vector2<f32> {
    tree.local(id).unwrap().position()
}

fn set_world_pos(tree: &mut TransformTree, id: NodeId, x: f32, y: f32) {
    tree.world_mut(id)
        .unwrap()
        .position()
        .set(Vector2::new(x, y));
}

// =============================================================================
// Local / world views
// =============================================================================

#[test]
fn moving_parent_in_world_space_moves_child() {
    let mut tree = TransformTree::new();
    let t1 = tree.create_node();
    let t2 = tree.create_node();
    tree.set_parent(t2, Some(t1)).unwrap();

    set_world_pos(&mut tree, t1, 10.0, 10.0);

    assert_vec(world_pos(&tree, t1), 10.0, 10.0);
    assert_vec(world_pos(&tree, t2), 10.0, 10.0);
    assert_vec(local_pos(&tree, t1), 10.0, 10.0);
    assert_vec(local_pos(&tree, t2), 0.0, 0.0);
}

#[test]
fn moving_child_in_world_space_leaves_parent() {
    let mut tree = TransformTree::new();
    let t1 = tree.create_node();
    let t2 = tree.create_node();
    tree.set_parent(t2, Some(t1)).unwrap();

    set_world_pos(&mut tree, t2, 10.0, 10.0);

    assert_vec(world_pos(&tree, t1), 0.0, 0.0);
    assert_vec(world_pos(&tree, t2), 10.0, 10.0);
    assert_vec(local_pos(&tree, t1), 0.0, 0.0);
    assert_vec(local_pos(&tree, t2), 10.0, 10.0);
}

#[test]
fn world_rotation_accumulates_without_revolving_offset() {
    let mut tree = TransformTree::new();
    let parent = tree.create_node_with(Transform2D::new(100.0, 100.0, 90.0));
    let child = tree
        .create_child(parent, Transform2D::new(40.0, 0.0, 10.0))
        .unwrap();

    let world = tree.world(child).unwrap();
    assert_vec(world.position(), 140.0, 100.0);
    assert!(approx_eq(world.rotation(), 100.0));
}

#[test]
fn world_position_shift_on_grandchild() {
    let mut tree = TransformTree::new();
    let root = tree.create_node_with(Transform2D::from_position(Vector2::new(100.0, 0.0)));
    let child = tree
        .create_child(root, Transform2D::from_position(Vector2::new(50.0, 0.0)))
        .unwrap();
    let grandchild = tree
        .create_child(child, Transform2D::from_position(Vector2::new(0.0, 25.0)))
        .unwrap();

    {
        let mut world = tree.world_mut(grandchild).unwrap();
        let mut pos = world.position();
        pos += Vector2::new(-150.0, 0.0);
    }

    assert_vec(world_pos(&tree, grandchild), 0.0, 25.0);
    assert_vec(local_pos(&tree, grandchild), -150.0, 25.0);
    assert_vec(world_pos(&tree, child), 150.0, 0.0);
}

#[test]
fn rotation_only_chain_leaves_positions_at_origin() {
    let mut tree = TransformTree::new();
    let root = tree.create_node_with(Transform2D::from_rotation(90.0));
    let child = tree
        .create_child(root, Transform2D::from_rotation(-30.0))
        .unwrap();

    let world = tree.world(child).unwrap();
    assert_vec(world.position(), 0.0, 0.0);
    assert!(approx_eq(world.rotation(), 60.0));
}

#[test]
fn roots_report_local_as_world() {
    let mut tree = TransformTree::new();
    let root = tree.create_node_with(Transform2D::new(-3.0, 7.0, 33.0));
    let local = tree.local(root).unwrap().transform();
    let world = tree.world(root).unwrap().transform();
    assert!(local.approx_eq(&world, EPSILON));
}

// =============================================================================
// Cycle rejection
// =============================================================================

#[test]
fn reparent_under_descendant_is_rejected() {
    let mut tree = TransformTree::new();
    let t1 = tree.create_node();
    let t2 = tree.create_node();
    let t3 = tree.create_node();
    tree.set_parent(t2, Some(t1)).unwrap();
    tree.set_parent(t3, Some(t2)).unwrap();

    assert_eq!(
        tree.set_parent(t2, Some(t3)),
        Err(HierarchyError::CyclicParent {
            node: t2,
            parent: t3
        })
    );
    assert_eq!(
        tree.set_parent(t1, Some(t3)),
        Err(HierarchyError::CyclicParent {
            node: t1,
            parent: t3
        })
    );
    assert_eq!(
        tree.set_parent_keep_world_transform(t1, Some(t2)),
        Err(HierarchyError::CyclicParent {
            node: t1,
            parent: t2
        })
    );

    // Tree unchanged.
    assert_eq!(tree.parent(t1), None);
    assert_eq!(tree.parent(t2), Some(t1));
    assert_eq!(tree.parent(t3), Some(t2));
    assert_eq!(tree.children(t1), &[t2]);
    assert_eq!(tree.children(t2), &[t3]);
    assert!(tree.children(t3).is_empty());
}

#[test]
fn self_parenting_is_rejected() {
    let mut tree = TransformTree::new();
    let t1 = tree.create_node();

    assert_eq!(
        tree.set_parent(t1, Some(t1)),
        Err(HierarchyError::CyclicParent {
            node: t1,
            parent: t1
        })
    );
    assert_eq!(
        tree.set_parent_keep_world_transform(t1, Some(t1)),
        Err(HierarchyError::CyclicParent {
            node: t1,
            parent: t1
        })
    );
    assert_eq!(tree.parent(t1), None);
    assert!(tree.children(t1).is_empty());
}

#[test]
fn rejected_keep_world_reparent_leaves_transforms() {
    let mut tree = TransformTree::new();
    let a = tree.create_node_with(Transform2D::new(5.0, 5.0, 10.0));
    let b = tree
        .create_child(a, Transform2D::new(1.0, 2.0, 3.0))
        .unwrap();

    assert!(tree.set_parent_keep_world_transform(a, Some(b)).is_err());
    assert!(
        tree.local(a)
            .unwrap()
            .transform()
            .approx_eq(&Transform2D::new(5.0, 5.0, 10.0), EPSILON)
    );
    assert!(
        tree.local(b)
            .unwrap()
            .transform()
            .approx_eq(&Transform2D::new(1.0, 2.0, 3.0), EPSILON)
    );
}

// =============================================================================
// Reparenting policies
// =============================================================================

#[test]
fn keep_world_reparent_preserves_world_position() {
    let mut tree = TransformTree::new();
    let t1 = tree.create_node();
    let t2 = tree.create_node();
    let t3 = tree.create_node();
    tree.set_parent(t2, Some(t1)).unwrap();
    set_world_pos(&mut tree, t1, 10.0, 10.0);
    set_world_pos(&mut tree, t3, -40.0, 100.0);

    tree.set_parent_keep_world_transform(t2, Some(t3)).unwrap();

    assert_vec(world_pos(&tree, t2), 10.0, 10.0);
    assert_vec(local_pos(&tree, t2), 50.0, -90.0);
    assert_eq!(tree.parent(t2), Some(t3));
    assert!(tree.children(t1).is_empty());
    assert_eq!(tree.children(t3), &[t2]);
}

#[test]
fn keep_local_reparent_moves_world_position() {
    let mut tree = TransformTree::new();
    let a = tree.create_node_with(Transform2D::new(10.0, 0.0, 0.0));
    let b = tree.create_node_with(Transform2D::new(0.0, 20.0, 45.0));
    let child = tree
        .create_child(a, Transform2D::new(1.0, 1.0, 5.0))
        .unwrap();

    tree.set_parent(child, Some(b)).unwrap();

    assert_vec(local_pos(&tree, child), 1.0, 1.0);
    assert_vec(world_pos(&tree, child), 1.0, 21.0);
    assert!(approx_eq(tree.world(child).unwrap().rotation(), 50.0));
}

#[test]
fn keep_world_detach_copies_world_into_local() {
    let mut tree = TransformTree::new();
    let a = tree.create_node_with(Transform2D::new(10.0, 10.0, 30.0));
    let child = tree
        .create_child(a, Transform2D::new(5.0, -5.0, 15.0))
        .unwrap();

    tree.set_parent_keep_world_transform(child, None).unwrap();

    assert_eq!(tree.parent(child), None);
    assert!(tree.children(a).is_empty());
    assert!(
        tree.local(child)
            .unwrap()
            .transform()
            .approx_eq(&Transform2D::new(15.0, 5.0, 45.0), EPSILON)
    );
}

#[test]
fn plain_detach_keeps_local() {
    let mut tree = TransformTree::new();
    let a = tree.create_node_with(Transform2D::new(10.0, 10.0, 0.0));
    let child = tree
        .create_child(a, Transform2D::new(5.0, -5.0, 0.0))
        .unwrap();

    tree.set_parent(child, None).unwrap();
    assert_vec(world_pos(&tree, child), 5.0, -5.0);
}

// =============================================================================
// Destruction
// =============================================================================

#[test]
fn destroying_parent_orphans_children() {
    let mut tree = TransformTree::new();
    let t1 = tree.create_node();
    let t2 = tree.create_node();
    tree.set_parent(t2, Some(t1)).unwrap();

    assert!(tree.destroy(t1));
    assert_eq!(tree.parent(t2), None);
    assert!(tree.contains(t2));
}

#[test]
fn destroying_middle_node_does_not_reattach_to_grandparent() {
    let mut tree = TransformTree::new();
    let root = tree.create_node_with(Transform2D::new(100.0, 0.0, 0.0));
    let middle = tree
        .create_child(root, Transform2D::new(10.0, 0.0, 0.0))
        .unwrap();
    let sibling = tree.create_child(root, Transform2D::identity()).unwrap();
    let leaf_a = tree
        .create_child(middle, Transform2D::new(1.0, 0.0, 0.0))
        .unwrap();
    let leaf_b = tree.create_child(middle, Transform2D::identity()).unwrap();

    tree.destroy(middle);

    assert_eq!(tree.children(root), &[sibling]);
    assert_eq!(tree.parent(leaf_a), None);
    assert_eq!(tree.parent(leaf_b), None);
    // Locals are untouched, so orphaned leaves now sit at their local values.
    assert_vec(world_pos(&tree, leaf_a), 1.0, 0.0);
    assert_eq!(tree.roots().count(), 3);
}

#[test]
fn destroyed_handle_is_rejected_by_reparenting() {
    let mut tree = TransformTree::new();
    let a = tree.create_node();
    let b = tree.create_node();
    tree.destroy(b);

    assert_eq!(tree.set_parent(a, Some(b)), Err(HierarchyError::StaleNode(b)));
    assert!(tree.local(b).is_none());
    assert!(tree.children(b).is_empty());
}

// =============================================================================
// Randomized invariant checks
// =============================================================================

/// Tolerance scaled by magnitude, since random chains accumulate large values.
fn close(a: &Transform2D, b: &Transform2D) -> bool {
    let scale = [
        a.position.x,
        a.position.y,
        a.rotation_degrees,
        b.position.x,
        b.position.y,
        b.rotation_degrees,
    ]
    .iter()
    .fold(1.0_f32, |m, v| m.max(v.abs()));
    a.approx_eq(b, 1e-4 * scale)
}

fn check_invariants(tree: &TransformTree) {
    for id in tree.iter() {
        // Acyclicity: walking up terminates without meeting the node.
        let mut steps = 0;
        for ancestor in tree.ancestors(id) {
            assert_ne!(ancestor, id, "{} is its own ancestor", id);
            steps += 1;
            assert!(steps <= tree.len(), "ancestor walk did not terminate");
        }

        // Back-references.
        match tree.parent(id) {
            Some(parent) => {
                let count = tree.children(parent).iter().filter(|c| **c == id).count();
                assert_eq!(count, 1, "{} listed {} times under {}", id, count, parent);
            }
            None => {
                for other in tree.iter() {
                    assert!(!tree.children(other).contains(&id));
                }
            }
        }
        for child in tree.children(id) {
            assert_eq!(tree.parent(*child), Some(id));
        }

        // Composition.
        let local = tree.local(id).unwrap().transform();
        let world = tree.world(id).unwrap().transform();
        let expected = match tree.parent(id) {
            Some(parent) => local.compose(tree.world(parent).unwrap().transform()),
            None => local,
        };
        assert!(close(&world, &expected), "{:?} != {:?}", world, expected);
    }
}

fn random_transform(rng: &mut fastrand::Rng) -> Transform2D {
    Transform2D::new(
        rng.f32() * 200.0 - 100.0,
        rng.f32() * 200.0 - 100.0,
        rng.f32() * 360.0 - 180.0,
    )
}

#[test]
fn random_reparenting_keeps_invariants() {
    let mut rng = fastrand::Rng::with_seed(0x5eed);
    let mut tree = TransformTree::new();
    let nodes: Vec<NodeId> = (0..24)
        .map(|_| tree.create_node_with(random_transform(&mut rng)))
        .collect();

    for _ in 0..2_000 {
        let node = nodes[rng.usize(..nodes.len())];
        let parent = if rng.u8(..8) == 0 {
            None
        } else {
            Some(nodes[rng.usize(..nodes.len())])
        };

        let parent_before = tree.parent(node);
        let world_before = tree.world(node).unwrap().transform();
        let keep_world = rng.bool();
        let result = if keep_world {
            tree.set_parent_keep_world_transform(node, parent)
        } else {
            tree.set_parent(node, parent)
        };

        match result {
            Ok(()) => {
                assert_eq!(tree.parent(node), parent);
                if keep_world {
                    let world_after = tree.world(node).unwrap().transform();
                    assert!(close(&world_after, &world_before));
                }
            }
            Err(HierarchyError::CyclicParent { .. }) => {
                assert_eq!(tree.parent(node), parent_before);
            }
            Err(e) => panic!("unexpected error: {}", e),
        }
        check_invariants(&tree);
    }
}

#[test]
fn random_destruction_keeps_invariants() {
    let mut rng = fastrand::Rng::with_seed(42);
    let mut tree = TransformTree::new();
    let mut nodes: Vec<NodeId> = (0..32)
        .map(|_| tree.create_node_with(random_transform(&mut rng)))
        .collect();
    for i in 1..nodes.len() {
        let parent = nodes[rng.usize(..i)];
        tree.set_parent(nodes[i], Some(parent)).unwrap();
    }
    check_invariants(&tree);

    while !nodes.is_empty() {
        let victim = nodes.swap_remove(rng.usize(..nodes.len()));
        let parent = tree.parent(victim);
        let children = tree.children(victim).to_vec();

        assert!(tree.destroy(victim));

        for child in children {
            assert_eq!(tree.parent(child), None);
        }
        if let Some(parent) = parent {
            assert!(!tree.children(parent).contains(&victim));
        }
        check_invariants(&tree);
    }
    assert!(tree.is_empty());
}
