use super::*;
use crate::battle::{resolve_combat, CombatOutcome};
use crate::config::CombatConfig;
use crate::error::AbortReason;
use crate::rng::XorShiftRng;
use crate::starter;

fn fight(heroes: Vec<Combatant>, monsters: Vec<Combatant>, abilities: Vec<AbilityDefinition>, seed: u64) -> Vec<CombatEvent> {
    resolve_combat(
        heroes,
        monsters,
        catalog(abilities),
        CombatConfig::default(),
        XorShiftRng::seed_from_u64(seed),
    )
    .events
}

#[test]
fn test_quick_hero_acts_twice_before_sluggish_monster() {
    let events = fight(vec![hero(1, 100, 1, 0, 8)], vec![monster(11, 100, 1, 0, 3)], vec![], 5);

    let first = actors(&round_events(&events, 1));
    assert_eq!(first, vec![CombatantId(1), CombatantId(1), CombatantId(11)]);

    // Even round: one tier turn plus the bonus action, the sluggish monster rests
    let second = actors(&round_events(&events, 2));
    assert_eq!(second, vec![CombatantId(1), CombatantId(1)]);
}

#[test]
fn test_swift_unit_gets_bonus_action() {
    let events = fight(vec![hero(1, 100, 1, 0, 10)], vec![monster(11, 100, 1, 0, 5)], vec![], 5);
    let first = actors(&round_events(&events, 1));
    assert_eq!(first, vec![CombatantId(1), CombatantId(11), CombatantId(1)]);
}

#[test]
fn test_interrupt_consumes_turn_and_bonus() {
    let stun = AbilityDefinition::new(
        "Stun",
        "Stun",
        vec![EffectDefinition::new(TargetScope::Enemy, TargetingRule::Random, EffectKind::Interrupt)],
    );
    let stunner = hero(1, 100, 1, 0, 10).with_abilities(vec![AbilityId::new("Stun")]);
    let events = fight(vec![stunner], vec![monster(11, 100, 1, 0, 8)], vec![stun], 11);

    let first = actors(&round_events(&events, 1));
    assert_eq!(first.iter().filter(|id| **id == CombatantId(11)).count(), 1);
    assert_eq!(first.iter().filter(|id| **id == CombatantId(1)).count(), 2);
}

#[test]
fn test_dead_units_never_act_or_get_targeted() {
    let events = fight(
        vec![hero(1, 100, 40, 0, 10)],
        vec![monster(11, 10, 1, 0, 3), monster(12, 200, 1, 0, 3)],
        vec![],
        3,
    );

    let mut dead: Vec<CombatantId> = Vec::new();
    for event in &events {
        match event {
            CombatEvent::UnitDied { unit } => dead.push(*unit),
            CombatEvent::AbilityUsed { unit, targets, .. } => {
                assert!(!dead.contains(unit));
                assert!(targets.iter().all(|t| !dead.contains(t)));
            }
            _ => {}
        }
    }
    assert_eq!(outcome_of(&events), Some(CombatOutcome::Victory));
}

#[test]
fn test_round_limit_aborts() {
    let report = resolve_combat(
        vec![hero(1, 50, 0, 0, 5)],
        vec![monster(11, 50, 0, 0, 5)],
        catalog(vec![]),
        CombatConfig {
            max_rounds: 5,
            ..Default::default()
        },
        XorShiftRng::seed_from_u64(1),
    );
    assert_eq!(report.outcome, CombatOutcome::Aborted(AbortReason::RoundLimit { rounds: 5 }));
    assert_eq!(report.rounds, 5);
    assert_eq!(outcome_of(&report.events), Some(report.outcome.clone()));
}

#[test]
fn test_double_wipe_is_defeat() {
    let martyrdom = AbilityDefinition::new(
        "Martyrdom",
        "Martyrdom",
        vec![
            EffectDefinition::new(
                TargetScope::User,
                TargetingRule::Random,
                EffectKind::SelfSacrifice(SelfSacrificeParams {
                    min_health_percent: 0,
                    cost_percent: 100,
                    can_kill: true,
                }),
            ),
            EffectDefinition::new(
                TargetScope::Enemy,
                TargetingRule::Random,
                EffectKind::Strike(StrikeParams {
                    multiplier_bp: 10_000,
                    morale_damage: 0,
                }),
            )
            .defense(DefenseCheck::None),
        ],
    );
    let martyr = hero(1, 10, 50, 0, 10).with_abilities(vec![AbilityId::new("Martyrdom")]);
    let events = fight(vec![martyr], vec![monster(11, 10, 1, 0, 1)], vec![martyrdom], 2);
    assert_eq!(outcome_of(&events), Some(CombatOutcome::Defeat));
}

#[test]
fn test_vitals_stay_in_range_across_starter_fights() {
    for seed in 0..25u64 {
        let catalog = starter::starter_catalog().expect("starter catalog is valid");
        let heroes = vec![
            starter::warden(1).at_position(1),
            starter::duelist(2).at_position(2),
            starter::chaplain(3).at_position(3),
        ];
        let monsters = vec![
            starter::plague_hound(11).at_position(1),
            starter::plague_hound(12).at_position(2),
            starter::bone_priest(13).at_position(3).at_rank(2),
        ];
        let report = resolve_combat(heroes, monsters, catalog, CombatConfig::default(), XorShiftRng::seed_from_u64(seed));

        assert!(outcome_of(&report.events).is_some());
        for event in &report.events {
            if let CombatEvent::UnitUpdated { unit } = event {
                assert!(unit.health >= 0 && unit.health <= unit.max_health, "{:?}", unit);
                assert!(unit.morale >= 0 && unit.morale <= unit.max_morale, "{:?}", unit);
            }
        }
    }
}

#[test]
fn test_same_seed_same_fight() {
    let run = || {
        resolve_combat(
            vec![starter::warden(1), starter::duelist(2).at_position(2)],
            vec![starter::plague_hound(11), starter::bone_priest(12).at_position(2)],
            starter::starter_catalog().expect("starter catalog is valid"),
            CombatConfig::default(),
            XorShiftRng::seed_from_u64(99),
        )
    };
    assert_eq!(run(), run());
}
