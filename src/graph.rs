//! Conflict graph over a request set.
//!
//! One node per request; an undirected edge per conflict. Nodes reference
//! each other by index, so the graph is plain owned data.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::models::{BurnRequest, Conflict, Severity};
use crate::priority::PriorityScorer;

/// Half of an undirected conflict edge, stored on each endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConflictEdge {
    /// Index of the other request.
    pub neighbor: usize,
    /// Conflict severity.
    pub severity: Severity,
    /// Estimated combined PM2.5 (µg/m³).
    pub combined_pm25: f64,
}

/// A request as the optimizer sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    /// Request id.
    pub request_id: String,
    /// Preferred date; `None` never accrues delay.
    pub requested_date: Option<NaiveDate>,
    /// Priority in `[0, 100]`.
    pub priority: f64,
    /// Conflicts with other requests.
    pub conflicts: Vec<ConflictEdge>,
}

/// Undirected, self-loop-free conflict graph.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScheduleGraph {
    nodes: Vec<GraphNode>,
    index: HashMap<String, usize>,
}

impl ScheduleGraph {
    /// Builds the graph, scoring unscored requests with default weights.
    pub fn build(requests: &[BurnRequest], conflicts: &[Conflict]) -> Self {
        Self::build_with_scorer(requests, conflicts, &PriorityScorer::default())
    }

    /// Builds the graph with an explicit scorer.
    ///
    /// Requests keep their `priority_score` when set. Duplicate request ids
    /// keep the first occurrence. Conflicts naming unknown requests and
    /// self-pairs are skipped; a repeated pair keeps its most severe record.
    pub fn build_with_scorer(
        requests: &[BurnRequest],
        conflicts: &[Conflict],
        scorer: &PriorityScorer,
    ) -> Self {
        let mut graph = Self::default();
        for request in requests {
            if graph.index.contains_key(&request.id) {
                warn!(request = %request.id, "duplicate request id skipped");
                continue;
            }
            let priority = request
                .priority_score
                .filter(|p| p.is_finite())
                .map_or_else(|| scorer.score(request), |p| p.clamp(0.0, 100.0));
            graph.index.insert(request.id.clone(), graph.nodes.len());
            graph.nodes.push(GraphNode {
                request_id: request.id.clone(),
                requested_date: request.requested_date,
                priority,
                conflicts: Vec::new(),
            });
        }

        for conflict in conflicts {
            if conflict.is_self_pair() {
                warn!(request = %conflict.request_a, "self conflict skipped");
                continue;
            }
            let (Some(a), Some(b)) = (
                graph.index_of(&conflict.request_a),
                graph.index_of(&conflict.request_b),
            ) else {
                warn!(
                    a = %conflict.request_a,
                    b = %conflict.request_b,
                    "conflict references unknown request"
                );
                continue;
            };
            graph.upsert_edge(a, b, conflict.severity, conflict.combined_pm25);
            graph.upsert_edge(b, a, conflict.severity, conflict.combined_pm25);
        }
        graph
    }

    fn upsert_edge(&mut self, from: usize, to: usize, severity: Severity, combined_pm25: f64) {
        let edges = &mut self.nodes[from].conflicts;
        match edges.iter_mut().find(|e| e.neighbor == to) {
            Some(existing) if severity > existing.severity => {
                existing.severity = severity;
                existing.combined_pm25 = combined_pm25;
            }
            Some(_) => {}
            None => edges.push(ConflictEdge {
                neighbor: to,
                severity,
                combined_pm25,
            }),
        }
    }

    /// Number of requests.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the graph has no requests.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All nodes in input order.
    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    /// Node at an index.
    pub fn node(&self, idx: usize) -> Option<&GraphNode> {
        self.nodes.get(idx)
    }

    /// Index of a request id.
    pub fn index_of(&self, request_id: &str) -> Option<usize> {
        self.index.get(request_id).copied()
    }

    /// Each undirected edge once, as `(lower index, edge)`.
    pub fn conflict_pairs(&self) -> impl Iterator<Item = (usize, &ConflictEdge)> {
        self.nodes.iter().enumerate().flat_map(|(i, node)| {
            node.conflicts
                .iter()
                .filter(move |e| e.neighbor > i)
                .map(move |e| (i, e))
        })
    }

    /// Number of undirected edges.
    pub fn edge_count(&self) -> usize {
        self.conflict_pairs().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn requests() -> Vec<BurnRequest> {
        ["R1", "R2", "R3"]
            .iter()
            .map(|id| BurnRequest::new(*id).with_priority(50.0))
            .collect()
    }

    #[test]
    fn test_build_is_symmetric() {
        let conflicts = vec![
            Conflict::new("R1", "R2", Severity::High, 60.0),
            Conflict::new("R2", "R3", Severity::Low, 20.0),
        ];
        let g = ScheduleGraph::build(&requests(), &conflicts);
        assert_eq!(g.len(), 3);
        assert_eq!(g.edge_count(), 2);

        for (i, node) in g.nodes().iter().enumerate() {
            for e in &node.conflicts {
                assert_ne!(e.neighbor, i);
                let back = g.nodes()[e.neighbor]
                    .conflicts
                    .iter()
                    .find(|b| b.neighbor == i)
                    .unwrap();
                assert_eq!(back.severity, e.severity);
            }
        }
    }

    #[test]
    fn test_build_skips_unknown_and_self() {
        let conflicts = vec![
            Conflict::new("R1", "R9", Severity::High, 60.0),
            Conflict::new("R2", "R2", Severity::Critical, 90.0),
        ];
        let g = ScheduleGraph::build(&requests(), &conflicts);
        assert_eq!(g.edge_count(), 0);
    }

    #[test]
    fn test_duplicate_pair_keeps_most_severe() {
        let conflicts = vec![
            Conflict::new("R1", "R2", Severity::Low, 10.0),
            Conflict::new("R2", "R1", Severity::Critical, 90.0),
            Conflict::new("R1", "R2", Severity::Medium, 30.0),
        ];
        let g = ScheduleGraph::build(&requests(), &conflicts);
        assert_eq!(g.edge_count(), 1);
        let (_, edge) = g.conflict_pairs().next().unwrap();
        assert_eq!(edge.severity, Severity::Critical);
        assert_eq!(edge.combined_pm25, 90.0);
    }

    #[test]
    fn test_priority_from_scorer_when_unset() {
        let reqs = vec![BurnRequest::new("R1"), BurnRequest::new("R2").with_priority(140.0)];
        let g = ScheduleGraph::build(&reqs, &[]);
        assert!((g.node(0).unwrap().priority - 42.5).abs() < 1e-9);
        assert_eq!(g.node(1).unwrap().priority, 100.0);
        assert_eq!(g.index_of("R2"), Some(1));
    }
}
