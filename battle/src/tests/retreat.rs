use super::*;
use crate::battle::{resolve_combat, start_combat, CombatOutcome};
use crate::config::CombatConfig;
use crate::rng::XorShiftRng;

fn with_morale(mut unit: Combatant, morale: i32) -> Combatant {
    unit.stats.morale = morale;
    unit
}

fn morale_of(heroes: &[Combatant], id: u32) -> Option<i32> {
    heroes
        .iter()
        .find(|u| u.id == CombatantId(id))
        .map(|u| u.stat(StatKind::Morale))
}

#[test]
fn test_morale_above_threshold_holds() {
    let mut session = start_combat(
        vec![with_morale(hero(1, 50, 5, 0, 5), 25)],
        vec![monster(11, 50, 5, 0, 5)],
        catalog(vec![]),
        CombatConfig::default(),
        XorShiftRng::seed_from_u64(4),
    )
    .expect("valid combat");
    let mut events = Vec::new();
    session.step(&mut events);
    session.step(&mut events);

    assert!(!events.iter().any(|e| matches!(e, CombatEvent::UnitRetreated { .. })));
    assert_eq!(session.roster().get(CombatantId(1)).map(|u| u.retreated), Some(false));
}

#[test]
fn test_low_morale_retreats_and_shakes_team() {
    let report = resolve_combat(
        vec![with_morale(hero(1, 50, 5, 0, 5), 18), with_morale(hero(2, 200, 30, 0, 5), 60)],
        vec![monster(11, 40, 1, 0, 4)],
        catalog(vec![]),
        CombatConfig::default(),
        XorShiftRng::seed_from_u64(8),
    );

    assert!(report
        .events
        .iter()
        .any(|e| matches!(e, CombatEvent::UnitRetreated { unit } if *unit == CombatantId(1))));
    assert!(!actors(&report.events).contains(&CombatantId(1)));

    let retreated = report.heroes.iter().find(|u| u.id == CombatantId(1));
    assert_eq!(retreated.map(|u| u.retreated), Some(true));
    assert_eq!(morale_of(&report.heroes, 1), Some(28));
    assert_eq!(morale_of(&report.heroes, 2), Some(50));
    assert_eq!(report.outcome, CombatOutcome::Victory);
}

#[test]
fn test_retreated_hero_stays_on_roster_behind_the_line() {
    let mut session = start_combat(
        vec![with_morale(hero(1, 50, 5, 0, 5), 5), hero(2, 50, 5, 0, 5)],
        vec![monster(11, 50, 5, 0, 5)],
        catalog(vec![]),
        CombatConfig::default(),
        XorShiftRng::seed_from_u64(4),
    )
    .expect("valid combat");
    let mut events = Vec::new();
    session.step(&mut events);
    session.step(&mut events);

    let heroes = &session.roster().heroes;
    assert_eq!(heroes.len(), 2);
    let positions: Vec<(CombatantId, u8)> = heroes.iter().map(|u| (u.id, u.position)).collect();
    assert_eq!(positions, vec![(CombatantId(2), 1), (CombatantId(1), 2)]);
}

#[test]
fn test_routed_party_loses() {
    let report = resolve_combat(
        vec![with_morale(hero(1, 50, 5, 0, 5), 10)],
        vec![monster(11, 50, 5, 0, 5)],
        catalog(vec![]),
        CombatConfig::default(),
        XorShiftRng::seed_from_u64(1),
    );
    assert_eq!(report.outcome, CombatOutcome::Defeat);
    assert!(actors(&report.events).is_empty());
}

#[test]
fn test_retreat_checked_before_hero_action() {
    let terrify = AbilityDefinition::new(
        "Terrify",
        "Terrify",
        vec![EffectDefinition::new(
            TargetScope::Enemy,
            TargetingRule::Random,
            EffectKind::Strike(StrikeParams {
                multiplier_bp: 10_000,
                morale_damage: 30,
            }),
        )],
    );
    let terror = monster(11, 50, 1, 0, 10).with_abilities(vec![AbilityId::new("Terrify")]);
    let report = resolve_combat(
        vec![with_morale(hero(1, 50, 5, 0, 5), 40)],
        vec![terror],
        catalog(vec![terrify]),
        CombatConfig::default(),
        XorShiftRng::seed_from_u64(1),
    );

    assert_eq!(actors(&report.events), vec![CombatantId(11)]);
    assert_eq!(report.outcome, CombatOutcome::Defeat);
    assert_eq!(morale_of(&report.heroes, 1), Some(20));
}
