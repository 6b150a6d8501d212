// Cycle detector - finds groups of dead packages that only import each other
//
// For example:
// - package a imports b
// - package b imports a
// - no command reaches either
//
// Both are dead, and deleting only one of them breaks the other's build, so
// they are worth reporting as a unit.

use super::LivenessSet;
use crate::graph::ImportGraph;
use petgraph::algo::tarjan_scc;
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use serde::Serialize;
use std::collections::HashSet;
use tracing::debug;

/// A strongly connected set of dead packages
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeadCycle {
    /// Import paths of the members, sorted
    pub members: Vec<String>,
    /// Whether some package outside the cycle imports a member
    pub has_external_importers: bool,
}

impl DeadCycle {
    pub fn size(&self) -> usize {
        self.members.len()
    }
}

/// Detector for dead import cycles
pub struct CycleDetector;

impl CycleDetector {
    pub fn new() -> Self {
        Self
    }

    /// Find every import cycle whose members are all dead.
    ///
    /// Returns cycles sorted by size (largest first), ties by first member.
    pub fn find_dead_cycles(&self, graph: &ImportGraph, live: &LivenessSet) -> Vec<DeadCycle> {
        let inner = graph.inner();
        let mut dead_cycles = Vec::new();

        for scc in tarjan_scc(inner) {
            // Go rejects self-imports, so only multi-package components count
            if scc.len() < 2 {
                continue;
            }

            let mut members: Vec<String> = scc
                .iter()
                .filter_map(|&idx| graph.import_path(idx))
                .map(str::to_string)
                .collect();

            if members.iter().any(|m| live.contains(m)) {
                continue;
            }
            members.sort();

            let member_set: HashSet<_> = scc.iter().copied().collect();
            let has_external_importers = scc.iter().any(|&idx| {
                inner
                    .edges_directed(idx, Direction::Incoming)
                    .any(|edge| !member_set.contains(&edge.source()))
            });

            debug!("Found dead cycle with {} members: {:?}", members.len(), members);

            dead_cycles.push(DeadCycle {
                members,
                has_external_importers,
            });
        }

        dead_cycles.sort_by(|a, b| {
            b.size()
                .cmp(&a.size())
                .then_with(|| a.members.first().cmp(&b.members.first()))
        });

        dead_cycles
    }
}

impl Default for CycleDetector {
    fn default() -> Self {
        Self::new()
    }
}
