// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Interrupted teardowns resume from their checkpoint.

use super::*;
use dvo_core::test_support::full_record;
use dvo_core::test_support::strategies::arb_record;
use proptest::prelude::*;

#[tokio::test]
async fn second_run_after_success_finds_nothing() {
    let h = Harness::new(full_record(), fast());
    h.run().await.unwrap();
    let calls = h.provider.calls().len();

    let report = h.run().await.unwrap();

    assert!(!report.found);
    assert_eq!(h.provider.calls().len(), calls);
}

#[tokio::test]
async fn resume_sweeps_resources_deleted_before_the_crash() {
    let h = Harness::new(full_record(), fast());
    h.store.fail_after(4);
    h.run().await.unwrap_err();
    h.store.heal();

    h.run().await.unwrap();

    // as1 was deleted but not saved; the retry is refused and left to the sweep
    assert_eq!(h.provider.deleted_ids().iter().filter(|id| *id == "as1").count(), 2);
    assert!(h.provider.swept_kinds().contains(&ResourceKind::BuildStage));
    assert_eq!(h.checkpoint(), None);
    assert!(h.provider.inventory().live_ids().is_empty());
}

/// Run once with saves failing after `crash_after`, then again with a healthy store.
fn interrupted_then_resumed(record: ProgressRecord, crash_after: usize) -> (Option<ProgressRecord>, Vec<String>) {
    tokio::runtime::Runtime::new().unwrap().block_on(async {
        let h = Harness::new(record, fast());
        h.store.fail_after(crash_after);
        let _ = h.run().await;
        h.store.heal();
        h.run().await.unwrap();
        (h.checkpoint(), h.provider.inventory().live_ids())
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn interrupted_teardown_converges(record in arb_record(), crash_after in 0usize..40) {
        let (checkpoint, live) = interrupted_then_resumed(record, crash_after);
        prop_assert_eq!(checkpoint, None);
        prop_assert!(live.is_empty(), "left behind: {:?}", live);
    }

    #[test]
    fn folded_policy_converges_too(record in arb_record()) {
        let (checkpoint, live) = tokio::runtime::Runtime::new().unwrap().block_on(async {
            let h = Harness::new(record, fast().stage_sweep(StageSweep::Folded));
            h.run().await.unwrap();
            (h.checkpoint(), h.provider.inventory().live_ids())
        });
        prop_assert_eq!(checkpoint, None);
        prop_assert!(live.is_empty(), "left behind: {:?}", live);
    }
}
