//! Dependency scheduling for sub-questions.
//!
//! Orders nodes so that every node comes after all nodes it depends on,
//! using Kahn's algorithm with a FIFO queue seeded in input order.

use super::node::{NodeId, SubQuestionNode};
use std::collections::{HashMap, VecDeque};
use thiserror::Error;

/// Errors that make a sub-question set unschedulable. Always fatal to a run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("invalid dependency: sub-question {node} depends on unknown sub-question {missing}")]
    InvalidDependency { node: NodeId, missing: NodeId },

    #[error("cycle detected: only {ordered} of {total} sub-questions could be ordered")]
    CycleDetected { ordered: usize, total: usize },

    #[error("duplicate sub-question id {0}")]
    DuplicateId(NodeId),
}

impl GraphError {
    /// Short machine-readable kind, used in logs and error events
    pub fn kind(&self) -> &'static str {
        match self {
            GraphError::InvalidDependency { .. } => "invalid-dependency",
            GraphError::CycleDetected { .. } => "cycle-detected",
            GraphError::DuplicateId(_) => "duplicate-id",
        }
    }
}

/// Topologically order `nodes`.
///
/// Among nodes that become ready at the same time, input order is kept.
pub fn schedule(nodes: &[SubQuestionNode]) -> Result<Vec<SubQuestionNode>, GraphError> {
    let mut index: HashMap<NodeId, usize> = HashMap::with_capacity(nodes.len());
    for (pos, node) in nodes.iter().enumerate() {
        if index.insert(node.id, pos).is_some() {
            return Err(GraphError::DuplicateId(node.id));
        }
    }

    let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); nodes.len()];
    let mut indegree: Vec<usize> = vec![0; nodes.len()];

    for (pos, node) in nodes.iter().enumerate() {
        let mut seen: Vec<NodeId> = Vec::with_capacity(node.depends_on.len());
        for dep in &node.depends_on {
            if seen.contains(dep) {
                continue;
            }
            seen.push(*dep);
            let Some(&dep_pos) = index.get(dep) else {
                return Err(GraphError::InvalidDependency {
                    node: node.id,
                    missing: *dep,
                });
            };
            dependents[dep_pos].push(pos);
            indegree[pos] += 1;
        }
    }

    let mut queue: VecDeque<usize> = (0..nodes.len()).filter(|&i| indegree[i] == 0).collect();
    let mut ordered = Vec::with_capacity(nodes.len());

    while let Some(pos) = queue.pop_front() {
        ordered.push(nodes[pos].clone());
        for &next in &dependents[pos] {
            indegree[next] -= 1;
            if indegree[next] == 0 {
                queue.push_back(next);
            }
        }
    }

    if ordered.len() < nodes.len() {
        return Err(GraphError::CycleDetected {
            ordered: ordered.len(),
            total: nodes.len(),
        });
    }

    Ok(ordered)
}
