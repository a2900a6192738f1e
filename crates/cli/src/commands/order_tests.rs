// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use dvo_core::test_support::{full_record, single_repository_record};

#[test]
fn plan_follows_the_tiers() {
    let planned = plan(&single_repository_record());

    assert_eq!(
        planned,
        vec![
            PlannedTier {
                tier: 4,
                name: "build pipelines".into(),
                slots: vec![PlannedSlot { slot: "docker_native build pipeline of svc".into(), id: "p1".into() }],
            },
            PlannedTier {
                tier: 6,
                name: "source code repositories".into(),
                slots: vec![PlannedSlot { slot: "code repository of svc".into(), id: "r1".into() }],
            },
        ]
    );
}

#[test]
fn project_is_planned_last() {
    let planned = plan(&full_record());

    let last = planned.last().unwrap();
    assert_eq!(last.tier, 7);
    assert_eq!(last.slots.last().unwrap().slot, "devops project");
    assert_eq!(last.slots.last().unwrap().id, "proj1");
}
