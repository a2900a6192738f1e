// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn removed_ids_do_not_alias_reused_slots() {
    let mut arena = Arena::default();
    let a = arena.insert("a");
    arena.remove(a);
    let b = arena.insert("b");

    assert_eq!(arena.get(a), None);
    assert_eq!(arena.get(b), Some(&"b"));
    assert_ne!(a, b);
    assert_eq!(arena.len(), 1);
}

#[test]
fn double_remove_is_a_no_op() {
    let mut arena = Arena::default();
    let a = arena.insert(1);

    assert_eq!(arena.remove(a), Some(1));
    assert_eq!(arena.remove(a), None);
    assert_eq!(arena.len(), 0);
}

#[test]
fn retain_removes_the_rest() {
    let mut arena = Arena::default();
    let keep = arena.insert("keep");
    let gone = arena.insert("gone");
    let freed = arena.insert("freed");
    arena.remove(freed);

    arena.retain(|id| id == keep);

    assert_eq!(arena.get(keep), Some(&"keep"));
    assert_eq!(arena.get(gone), None);
    assert_eq!(arena.len(), 1);
}
