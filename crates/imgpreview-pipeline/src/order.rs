//! Draw-order computation for extracted regions.
//!
//! Later-drawn shapes overlay earlier ones, so every region must be
//! emitted before all of its overlay children. Children of one parent
//! keep no particular relative order among themselves; they only all
//! follow the parent. Discovery order breaks ties so output is
//! deterministic.

use std::collections::HashMap;

use crate::contour::Region;

/// Sort regions so every parent precedes all of its overlay children.
///
/// Kahn-style topological pass over the parent-to-child edges, visiting
/// ready regions in discovery order. Mutual containment (both regions
/// inside each other's footprint) forms a cycle; those leftovers are
/// appended in discovery order rather than looping.
#[must_use]
pub fn draw_order(regions: Vec<Region>) -> Vec<Region> {
    let index_of: HashMap<u32, usize> = regions
        .iter()
        .enumerate()
        .map(|(i, r)| (r.id, i))
        .collect();

    // Count how many parents claim each region as a child.
    let mut pending_parents = vec![0usize; regions.len()];
    for region in &regions {
        for child in &region.children {
            if let Some(&i) = index_of.get(child) {
                pending_parents[i] += 1;
            }
        }
    }

    let mut emitted = vec![false; regions.len()];
    let mut order: Vec<usize> = Vec::with_capacity(regions.len());
    loop {
        let mut progressed = false;
        for i in 0..regions.len() {
            if !emitted[i] && pending_parents[i] == 0 {
                emitted[i] = true;
                order.push(i);
                progressed = true;
                for child in &regions[i].children {
                    if let Some(&c) = index_of.get(child) {
                        pending_parents[c] = pending_parents[c].saturating_sub(1);
                    }
                }
            }
        }
        if !progressed {
            break;
        }
    }

    // Cycle leftovers, discovery order.
    for i in 0..regions.len() {
        if !emitted[i] {
            order.push(i);
        }
    }

    let mut slots: Vec<Option<Region>> = regions.into_iter().map(Some).collect();
    order.into_iter().filter_map(|i| slots[i].take()).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::contour::{Bounds, Geometry};
    use std::collections::BTreeSet;

    fn region(id: u32, children: &[u32]) -> Region {
        Region {
            id,
            fill: 0,
            bounds: Bounds {
                x1: 0,
                y1: 0,
                x2: 0,
                y2: 0,
            },
            children: children.iter().copied().collect::<BTreeSet<_>>(),
            geometry: Geometry::Rect {
                x: 0.0,
                y: 0.0,
                width: 1.0,
                height: 1.0,
            },
        }
    }

    fn ids(regions: &[Region]) -> Vec<u32> {
        regions.iter().map(|r| r.id).collect()
    }

    #[test]
    fn no_children_keeps_discovery_order() {
        let ordered = draw_order(vec![region(3, &[]), region(1, &[]), region(7, &[])]);
        assert_eq!(ids(&ordered), vec![3, 1, 7]);
    }

    #[test]
    fn parent_precedes_child() {
        // Child discovered before parent must still follow it.
        let ordered = draw_order(vec![region(5, &[]), region(2, &[5])]);
        assert_eq!(ids(&ordered), vec![2, 5]);
    }

    #[test]
    fn all_children_follow_shared_parent() {
        let ordered = draw_order(vec![region(4, &[]), region(9, &[]), region(1, &[4, 9])]);
        let pos = |id: u32| ids(&ordered).iter().position(|&i| i == id).unwrap();
        assert!(pos(1) < pos(4));
        assert!(pos(1) < pos(9));
    }

    #[test]
    fn grandchildren_follow_transitively() {
        let ordered = draw_order(vec![
            region(3, &[]),
            region(2, &[3]),
            region(1, &[2]),
        ]);
        assert_eq!(ids(&ordered), vec![1, 2, 3]);
    }

    #[test]
    fn mutual_containment_does_not_loop() {
        let ordered = draw_order(vec![region(1, &[2]), region(2, &[1])]);
        assert_eq!(ordered.len(), 2);
        assert_eq!(ids(&ordered), vec![1, 2]);
    }

    #[test]
    fn child_id_not_in_region_set_is_ignored() {
        // Children record raw mask ids; a parent may reference an id
        // that was merged away before extraction in pathological inputs.
        let ordered = draw_order(vec![region(1, &[42]), region(2, &[])]);
        assert_eq!(ids(&ordered), vec![1, 2]);
    }
}
