//! Schedule improvement metrics.
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Conflicts Resolved | Conflicting pairs placed in non-overlapping slots |
//! | Requests Rescheduled | Requests assigned a date other than the one requested |
//! | Average Delay | Mean of max(0, assigned − requested) days |
//! | Total Requests | Requests in the problem |

use serde::{Deserialize, Serialize};

use crate::graph::ScheduleGraph;
use crate::models::ScheduleAssignment;

/// What a schedule achieved relative to the raw requests.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ImprovementMetrics {
    /// Conflicting pairs kept apart.
    pub conflicts_resolved: usize,
    /// Conflicting pairs in the problem.
    pub total_conflicts: usize,
    /// Requests moved off their requested date.
    pub requests_rescheduled: usize,
    /// Mean lateness over assigned requests (days).
    pub average_delay_days: f64,
    /// Requests in the problem.
    pub total_requests: usize,
}

impl ImprovementMetrics {
    /// Computes metrics for a schedule over a conflict graph.
    ///
    /// A pair with an unassigned side does not count as resolved. Requests
    /// without a requested date are never late or rescheduled.
    pub fn calculate(schedule: &ScheduleAssignment, graph: &ScheduleGraph) -> Self {
        let mut requests_rescheduled = 0;
        let mut total_delay = 0.0;
        let mut counted = 0usize;

        for node in graph.nodes() {
            let Some(slot) = schedule.slot_for(&node.request_id) else {
                continue;
            };
            counted += 1;
            if let Some(requested) = node.requested_date {
                if slot.date != requested {
                    requests_rescheduled += 1;
                }
                total_delay += slot.days_after(requested).max(0) as f64;
            }
        }

        let mut conflicts_resolved = 0;
        let mut total_conflicts = 0;
        for (a, edge) in graph.conflict_pairs() {
            total_conflicts += 1;
            let slots = (
                graph.node(a).and_then(|n| schedule.slot_for(&n.request_id)),
                graph
                    .node(edge.neighbor)
                    .and_then(|n| schedule.slot_for(&n.request_id)),
            );
            if let (Some(sa), Some(sb)) = slots {
                if !sa.overlaps(sb) {
                    conflicts_resolved += 1;
                }
            }
        }

        let average_delay_days = if counted == 0 {
            0.0
        } else {
            total_delay / counted as f64
        };

        Self {
            conflicts_resolved,
            total_conflicts,
            requests_rescheduled,
            average_delay_days,
            total_requests: graph.len(),
        }
    }

    /// Whether every conflict is resolved.
    pub fn all_conflicts_resolved(&self) -> bool {
        self.conflicts_resolved == self.total_conflicts
    }
}
