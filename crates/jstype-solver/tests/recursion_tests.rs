use super::*;

#[test]
fn test_enter_and_leave() {
    let mut guard: CycleGuard<u32> = CycleGuard::new();
    assert!(!guard.is_active());

    assert_eq!(guard.enter(1), CycleResult::Entered);
    assert!(guard.is_visiting(&1));
    assert!(guard.is_active());
    assert_eq!(guard.depth(), 1);

    guard.leave(1);
    assert!(!guard.is_visiting(&1));
    assert_eq!(guard.depth(), 0);
}

#[test]
fn test_reentry_is_a_cycle() {
    let mut guard: CycleGuard<u32> = CycleGuard::new();
    assert!(guard.enter(7).is_entered());
    assert!(guard.enter(7).is_cycle());
    // The failed enter did not add a second entry.
    assert_eq!(guard.depth(), 1);
    guard.leave(7);
    assert!(!guard.is_active());
}

#[test]
fn test_max_depth_tracks_nesting() {
    let mut guard: CycleGuard<u32> = CycleGuard::new();
    for key in 0..4 {
        assert!(guard.enter(key).is_entered());
    }
    for key in (0..4).rev() {
        guard.leave(key);
    }
    assert!(guard.enter(10).is_entered());
    guard.leave(10);

    assert_eq!(guard.max_depth_reached(), 4);
    guard.reset();
    assert_eq!(guard.max_depth_reached(), 0);
}

#[test]
fn test_scope_runs_closure_once() {
    let mut guard: CycleGuard<u32> = CycleGuard::new();
    let mut calls = 0;
    assert_eq!(
        guard.scope(3, || {
            calls += 1;
            "done"
        }),
        Some("done")
    );
    assert_eq!(calls, 1);
    assert!(!guard.is_visiting(&3));
}

#[test]
fn test_scope_on_cycle_returns_none() {
    let mut guard: CycleGuard<u32> = CycleGuard::new();
    assert!(guard.enter(3).is_entered());
    assert_eq!(guard.scope(3, || 1), None);
    assert!(guard.is_visiting(&3));
    guard.leave(3);
}

#[test]
fn test_reset_clears_visiting() {
    let mut guard: CycleGuard<u32> = CycleGuard::new();
    assert!(guard.enter(1).is_entered());
    assert!(guard.enter(2).is_entered());
    guard.reset();
    assert!(!guard.is_active());
    assert!(guard.enter(1).is_entered());
    guard.leave(1);
}

#[cfg(debug_assertions)]
#[test]
#[should_panic(expected = "not being visited")]
fn test_double_leave_panics_in_debug() {
    let mut guard: CycleGuard<u32> = CycleGuard::new();
    assert!(guard.enter(1).is_entered());
    guard.leave(1);
    guard.leave(1);
}

#[cfg(debug_assertions)]
#[test]
#[should_panic(expected = "still being visited")]
fn test_leaked_entry_panics_on_drop() {
    let mut guard: CycleGuard<u32> = CycleGuard::new();
    assert!(guard.enter(1).is_entered());
    drop(guard);
}
