//! Focus tests - rotation and partition invariants through SceneManager

use proptest::prelude::*;
use tui_scene::core::{Entity, Focusable, Scene, SceneError, SceneManager};
use tui_scene::types::{EntityId, FocusType};

fn manager_with(kinds: &[FocusType]) -> (SceneManager, Vec<EntityId>) {
    let mut sm = SceneManager::new();
    sm.add_scene(Scene::new("ui")).unwrap();
    let ids = kinds
        .iter()
        .enumerate()
        .map(|(i, kind)| {
            sm.add_entity("ui", Entity::builder("widget", format!("entity{}", i + 1)).focus(*kind).build())
                .unwrap()
        })
        .collect();
    (sm, ids)
}

fn focused(sm: &SceneManager) -> Vec<EntityId> {
    sm.focus().with_focus("ui").to_vec()
}

fn single_holders(sm: &SceneManager) -> usize {
    focused(sm)
        .iter()
        .filter(|id| sm.entity("ui", **id).unwrap().focus_type() == FocusType::Single)
        .count()
}

fn assert_partition(sm: &SceneManager, registered: &[EntityId]) {
    let eligible = sm.focus().eligible("ui");
    let holders = sm.focus().with_focus("ui");
    assert!(eligible.iter().all(|id| !holders.contains(id)));

    let mut union: Vec<EntityId> = eligible.iter().chain(holders).copied().collect();
    union.sort_unstable();
    let mut expected = registered.to_vec();
    expected.sort_unstable();
    assert_eq!(union, expected);

    for id in registered {
        assert_eq!(
            sm.entity("ui", *id).unwrap().has_focus(),
            holders.contains(id),
            "held flag out of sync for {id}"
        );
    }
}

#[test]
fn test_single_focus_round_robin_scenario() {
    let (mut sm, ids) = manager_with(&[FocusType::Single; 3]);

    let mut seen = Vec::new();
    for _ in 0..4 {
        sm.update_focus("ui").unwrap();
        seen.push(focused(&sm));
        assert_partition(&sm, &ids);
    }
    assert_eq!(seen, vec![vec![ids[0]], vec![ids[1]], vec![ids[2]], vec![ids[0]]]);
}

#[test]
fn test_multi_set_stable_while_single_rotates() {
    let kinds = [
        FocusType::Multi,
        FocusType::Single,
        FocusType::Multi,
        FocusType::Single,
        FocusType::Single,
    ];
    let (mut sm, ids) = manager_with(&kinds);

    sm.update_focus("ui").unwrap();
    let multi = |sm: &SceneManager| -> Vec<EntityId> {
        focused(sm)
            .into_iter()
            .filter(|id| sm.entity("ui", *id).unwrap().focus_type() == FocusType::Multi)
            .collect()
    };
    let multi_before = multi(&sm);
    assert_eq!(multi_before, vec![ids[0], ids[2]]);

    let mut singles = Vec::new();
    for _ in 0..3 {
        assert_eq!(single_holders(&sm), 1);
        singles.extend(focused(&sm).into_iter().filter(|id| !multi_before.contains(id)));
        sm.update_focus("ui").unwrap();
        assert_eq!(multi(&sm), multi_before);
        assert_partition(&sm, &ids);
    }
    assert_eq!(singles, vec![ids[1], ids[3], ids[4]]);
}

#[test]
fn test_acquire_and_release() {
    let (mut sm, ids) = manager_with(&[FocusType::Single; 3]);
    sm.update_focus("ui").unwrap();

    sm.acquire_focus("ui", ids[2]).unwrap();
    assert_eq!(focused(&sm), vec![ids[2]]);
    assert_eq!(single_holders(&sm), 1);
    assert_partition(&sm, &ids);

    // Already focused: no-op.
    sm.acquire_focus("ui", ids[2]).unwrap();
    assert_eq!(focused(&sm), vec![ids[2]]);

    sm.release_focus("ui", ids[2]).unwrap();
    assert!(focused(&sm).is_empty());
    assert_eq!(sm.focus().eligible("ui").last(), Some(&ids[2]));
    assert_partition(&sm, &ids);
}

#[test]
fn test_lock_turns_transitions_into_noops() {
    let (mut sm, ids) = manager_with(&[FocusType::Single; 2]);
    sm.update_focus("ui").unwrap();

    sm.focus_mut().lock();
    sm.update_focus("ui").unwrap();
    sm.acquire_focus("ui", ids[1]).unwrap();
    sm.release_focus("ui", ids[0]).unwrap();
    assert_eq!(focused(&sm), vec![ids[0]]);

    sm.focus_mut().unlock();
    sm.update_focus("ui").unwrap();
    assert_eq!(focused(&sm), vec![ids[1]]);
}

#[test]
fn test_focus_errors_are_returned() {
    let (mut sm, _ids) = manager_with(&[FocusType::Single]);
    let stranger = sm
        .add_entity("ui", Entity::builder("widget", "plain").build())
        .unwrap();

    assert!(matches!(
        sm.acquire_focus("ui", stranger),
        Err(SceneError::Focus(_))
    ));
    assert!(matches!(
        sm.update_focus("missing"),
        Err(SceneError::SceneNotFound(_))
    ));
}

#[test]
fn test_removing_holder_passes_focus_on() {
    let (mut sm, ids) = manager_with(&[FocusType::Single; 3]);
    sm.update_focus("ui").unwrap();

    let removed = sm.remove_entity("ui", ids[0]).unwrap();
    assert!(!removed.has_focus());
    assert_eq!(focused(&sm), vec![ids[1]]);
    assert_partition(&sm, &ids[1..]);
}

#[derive(Debug, Clone)]
enum FocusOp {
    Update,
    Acquire(usize),
    Release(usize),
    Remove(usize),
    Add(FocusType),
}

fn kind() -> impl Strategy<Value = FocusType> {
    prop_oneof![Just(FocusType::Single), Just(FocusType::Multi)]
}

fn focus_op() -> impl Strategy<Value = FocusOp> {
    prop_oneof![
        3 => Just(FocusOp::Update),
        2 => any::<usize>().prop_map(FocusOp::Acquire),
        1 => any::<usize>().prop_map(FocusOp::Release),
        1 => any::<usize>().prop_map(FocusOp::Remove),
        1 => kind().prop_map(FocusOp::Add),
    ]
}

/// Every registered entity is in exactly one list, held flags agree, and at
/// most one `Single` entity holds focus.
fn check_focus(sm: &SceneManager, registered: &[EntityId]) -> Result<(), TestCaseError> {
    let eligible = sm.focus().eligible("ui");
    let holders = sm.focus().with_focus("ui");
    for id in registered {
        prop_assert!(eligible.contains(id) != holders.contains(id), "{} in both or neither", id);
        prop_assert_eq!(sm.entity("ui", *id).unwrap().has_focus(), holders.contains(id));
    }
    prop_assert_eq!(eligible.len() + holders.len(), registered.len());
    prop_assert!(single_holders(sm) <= 1);
    Ok(())
}

proptest! {
    #[test]
    fn test_focus_partition_holds_under_any_sequence(
        kinds in prop::collection::vec(kind(), 1..8),
        ops in prop::collection::vec(focus_op(), 1..40),
    ) {
        let (mut sm, mut ids) = manager_with(&kinds);

        for (i, op) in ops.into_iter().enumerate() {
            let pick = |k: usize| ids.get(k % ids.len().max(1)).copied();
            match op {
                FocusOp::Update => {
                    prop_assert!(sm.update_focus("ui").is_ok());
                }
                FocusOp::Acquire(k) => {
                    if let Some(id) = pick(k) {
                        prop_assert!(sm.acquire_focus("ui", id).is_ok());
                        prop_assert!(sm.focus().has_focus("ui", id));
                    }
                }
                FocusOp::Release(k) => {
                    if let Some(id) = pick(k) {
                        prop_assert!(sm.release_focus("ui", id).is_ok());
                        prop_assert!(!sm.focus().has_focus("ui", id));
                    }
                }
                FocusOp::Remove(k) => {
                    if let Some(id) = pick(k) {
                        prop_assert!(sm.remove_entity("ui", id).is_ok());
                        ids.retain(|e| *e != id);
                    }
                }
                FocusOp::Add(kind) => {
                    let e = Entity::builder("widget", format!("extra{i}")).focus(kind).build();
                    ids.push(sm.add_entity("ui", e).unwrap());
                }
            }
            check_focus(&sm, &ids)?;
        }
    }
}
