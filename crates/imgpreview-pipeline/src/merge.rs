//! Merge resolution: collapse provisional region ids into canonical ones.
//!
//! Region growing records id conflicts as an ordered list of
//! [`MergeInstruction`]s. Applying each instruction to every pixel
//! independently, first match only, leaves residual un-merged ids when
//! instructions chain (A folded into B while B was already folded into
//! C). This module resolves each equivalence class to a single canonical
//! id with a path-compressed union-find, so transitively connected ids
//! always collapse. The canonical id is the dominant side's root at the
//! time each instruction is applied.

use crate::grow::{Growth, LabelGrid, MergeInstruction};

/// The fully resolved multi-label mask.
#[derive(Debug, Clone)]
pub struct Resolved {
    /// Final per-pixel region ids. Id space is sparse after merging;
    /// gaps are acceptable downstream.
    pub mask: LabelGrid,
    /// Representative color per id, still indexed by provisional id.
    /// Canonical ids are always drawn from the provisional id space, so
    /// this table stays valid.
    pub colors: Vec<u32>,
    /// Distinct surviving ids in first-seen row-major scan order.
    pub ids: Vec<u32>,
}

/// Disjoint-set forest over provisional region ids.
struct UnionFind {
    parent: Vec<u32>,
}

impl UnionFind {
    fn new(count: usize) -> Self {
        Self {
            parent: (0..u32::try_from(count).unwrap_or(u32::MAX)).collect(),
        }
    }

    /// Canonical representative of `id`, with path compression.
    fn find(&mut self, id: u32) -> u32 {
        let mut root = id;
        while self.parent[root as usize] != root {
            root = self.parent[root as usize];
        }
        let mut cur = id;
        while self.parent[cur as usize] != root {
            let next = self.parent[cur as usize];
            self.parent[cur as usize] = root;
            cur = next;
        }
        root
    }

    /// Fold `weak`'s class into `dominant`'s class.
    fn union(&mut self, dominant: u32, weak: u32) {
        let dominant_root = self.find(dominant);
        let weak_root = self.find(weak);
        if dominant_root != weak_root {
            self.parent[weak_root as usize] = dominant_root;
        }
    }
}

/// Apply the ordered merge instructions and rewrite every pixel's label
/// to its canonical id.
///
/// Consumes the [`Growth`] since the label grid is rewritten in place.
#[must_use]
pub fn resolve(growth: Growth) -> Resolved {
    let Growth {
        mut labels,
        colors,
        merges,
    } = growth;

    let mut forest = UnionFind::new(colors.len());
    for MergeInstruction { dominant, weak } in &merges {
        forest.union(*dominant, *weak);
    }

    let mut seen = vec![false; colors.len()];
    let mut ids = Vec::new();
    for label in labels.labels_mut() {
        let canonical = forest.find(*label);
        *label = canonical;
        if !seen[canonical as usize] {
            seen[canonical as usize] = true;
            ids.push(canonical);
        }
    }

    Resolved {
        mask: labels,
        colors,
        ids,
    }
}
