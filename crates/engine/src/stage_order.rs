// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Leaf-first deletion order of the stages of one pipeline.

use crate::error::StructuralError;
use dvo_core::Summary;
use std::collections::{HashMap, VecDeque};

/// Order `stages` so that every stage comes before all of its predecessors.
///
/// Each stage counts how many other stages name it as a predecessor. Stages
/// with a zero count are emitted in input order; emitting one decrements the
/// counts of its predecessors. Self references and references to the owning
/// pipeline are ignored. A reference to an unknown stage, or a set of stages
/// that never reach zero, is a [`StructuralError`].
pub fn deletion_order<'a>(
    pipeline_id: &str,
    stages: &'a [Summary],
) -> Result<Vec<&'a Summary>, StructuralError> {
    let index: HashMap<&str, usize> =
        stages.iter().enumerate().map(|(i, s)| (s.id.as_str(), i)).collect();
    let edges = |stage: &'a Summary| {
        stage
            .predecessors
            .iter()
            .map(String::as_str)
            .filter(move |p| *p != stage.id && *p != pipeline_id)
    };

    let mut dependents = vec![0usize; stages.len()];
    for stage in stages {
        for predecessor in edges(stage) {
            let Some(&i) = index.get(predecessor) else {
                return Err(StructuralError::DanglingPredecessor {
                    pipeline: pipeline_id.to_string(),
                    stage: stage.id.clone(),
                    predecessor: predecessor.to_string(),
                });
            };
            dependents[i] += 1;
        }
    }

    let mut ready: VecDeque<usize> = (0..stages.len()).filter(|&i| dependents[i] == 0).collect();
    let mut order = Vec::with_capacity(stages.len());
    while let Some(i) = ready.pop_front() {
        let stage = &stages[i];
        order.push(stage);
        for predecessor in edges(stage) {
            if let Some(&p) = index.get(predecessor) {
                dependents[p] -= 1;
                if dependents[p] == 0 {
                    ready.push_back(p);
                }
            }
        }
    }

    if order.len() < stages.len() {
        let stuck = (0..stages.len())
            .filter(|&i| dependents[i] > 0)
            .map(|i| stages[i].id.clone())
            .collect();
        return Err(StructuralError::Cycle { pipeline: pipeline_id.to_string(), stages: stuck });
    }
    Ok(order)
}

#[cfg(test)]
#[path = "stage_order_tests.rs"]
mod tests;
