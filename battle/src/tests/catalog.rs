use super::*;
use crate::battle::{resolve_combat, start_combat, CombatOutcome};
use crate::config::CombatConfig;
use crate::error::{AbortReason, CatalogError, CombatError};
use crate::limits::Team;
use crate::rng::XorShiftRng;
use crate::starter;
use parity_scale_codec::{Decode, Encode};

fn start(heroes: Vec<Combatant>, monsters: Vec<Combatant>) -> Result<(), CombatError> {
    start_combat(heroes, monsters, catalog(vec![]), CombatConfig::default(), XorShiftRng::seed_from_u64(1)).map(|_| ())
}

#[test]
fn test_starter_catalog_is_valid() {
    let catalog = starter::starter_catalog().expect("starter catalog is valid");
    assert!(catalog.basic_attack().is_some());
    assert_eq!(catalog.order_of(&AbilityId::new("LastRites")), Some(0));
}

#[test]
fn test_duplicate_ids_rejected() {
    let err = AbilityCatalog::new(vec![basic_attack(), basic_attack()]);
    assert_eq!(
        err,
        Err(CatalogError::DuplicateAbility {
            ability: AbilityId::basic_attack()
        })
    );
}

#[test]
fn test_malformed_definitions_rejected() {
    let no_effects = AbilityDefinition::new("Empty", "Empty", vec![]);
    assert!(matches!(AbilityCatalog::new(vec![no_effects]), Err(CatalogError::NoEffects { .. })));

    let zero = AbilityDefinition::new("Zero", "Zero", vec![EffectDefinition::strike(10_000).targets(0)]);
    assert!(matches!(AbilityCatalog::new(vec![zero]), Err(CatalogError::ZeroTargets { .. })));

    let far = AbilityDefinition::new("Far", "Far", vec![EffectDefinition::strike(10_000).positions(Some(5), None)]);
    assert!(matches!(AbilityCatalog::new(vec![far]), Err(CatalogError::InvalidPosition { .. })));

    let forever = AbilityDefinition::new(
        "Forever",
        "Forever",
        vec![EffectDefinition::new(
            TargetScope::User,
            TargetingRule::Random,
            EffectKind::StatModifier(StatModifierParams {
                stat: StatKind::Attack,
                delta: 1,
                duration: 0,
            }),
        )],
    );
    assert!(matches!(
        AbilityCatalog::new(vec![forever]),
        Err(CatalogError::InvalidDuration { duration: 0, .. })
    ));
}

#[test]
fn test_catalog_parses_from_json() {
    let json = r#"[
        {
            "id": "Smite",
            "name": "Smite",
            "cooldown": 2,
            "cooldown_kind": "Uses",
            "effects": [
                {
                    "scope": "Enemy",
                    "rule": { "type": "WeightedRandom", "stat": "Attack", "weight_factor": 10000 },
                    "kind": { "type": "Strike", "params": { "multiplier_bp": 15000 } },
                    "defense_check": "Partial"
                }
            ]
        },
        {
            "id": "BasicAttack",
            "name": "Attack",
            "effects": [
                {
                    "scope": "Enemy",
                    "rule": { "type": "Random" },
                    "melee_only": true,
                    "dodgeable": true,
                    "kind": { "type": "Strike", "params": { "multiplier_bp": 10000 } }
                }
            ]
        }
    ]"#;
    let catalog: AbilityCatalog = serde_json::from_str(json).expect("catalog parses");
    let smite = catalog.get(&AbilityId::new("Smite")).expect("smite present");
    assert_eq!(smite.cooldown_kind, CooldownKind::Uses);
    assert_eq!(smite.effects[0].target_count, 1);
    assert_eq!(smite.effects[0].partial_defense_bp, 250);
    assert!(catalog.basic_attack().is_some());

    let unknown = r#"[{ "id": "X", "name": "X", "effects": [
        { "scope": "Enemy", "rule": { "type": "Random" }, "kind": { "type": "Teleport" } }
    ] }]"#;
    assert!(serde_json::from_str::<AbilityCatalog>(unknown).is_err());

    let duplicated = format!("[{0},{0}]", serde_json::to_string(&basic_attack()).expect("encodes"));
    assert!(serde_json::from_str::<AbilityCatalog>(&duplicated).is_err());
}

#[test]
fn test_roster_preconditions() {
    assert_eq!(
        start(vec![], vec![monster(11, 10, 1, 0, 3)]),
        Err(CombatError::EmptyRoster { team: Team::Hero })
    );

    let crowd: Vec<Combatant> = (11..=15).map(|id| monster(id, 10, 1, 0, 3)).collect();
    assert_eq!(
        start(vec![hero(1, 10, 1, 0, 3)], crowd),
        Err(CombatError::RosterTooLarge {
            team: Team::Monster,
            size: 5
        })
    );

    let twin = monster(11, 10, 1, 0, 3);
    assert_eq!(
        start(vec![hero(1, 10, 1, 0, 3)], vec![twin.clone(), twin.at_position(2)]),
        Err(CombatError::DuplicateCombatant { id: CombatantId(11) })
    );

    assert_eq!(
        start(vec![hero(1, 10, 1, 0, 3).at_position(0)], vec![monster(11, 10, 1, 0, 3)]),
        Err(CombatError::InvalidPosition {
            id: CombatantId(1),
            position: 0
        })
    );

    let mut broken = hero(1, 10, 1, 0, 3);
    broken.stats.health = 15;
    assert_eq!(
        start(vec![broken], vec![monster(11, 10, 1, 0, 3)]),
        Err(CombatError::MalformedCombatant { id: CombatantId(1) })
    );

    let unknown = hero(1, 10, 1, 0, 3).with_abilities(vec![AbilityId::new("Meteor")]);
    assert_eq!(
        start(vec![unknown], vec![monster(11, 10, 1, 0, 3)]),
        Err(CombatError::MissingAbility {
            id: CombatantId(1),
            ability: AbilityId::new("Meteor")
        })
    );
}

#[test]
fn test_failed_start_reports_abort() {
    let report = resolve_combat(
        vec![],
        vec![monster(11, 10, 1, 0, 3)],
        catalog(vec![]),
        CombatConfig::default(),
        XorShiftRng::seed_from_u64(1),
    );
    let expected = CombatOutcome::Aborted(AbortReason::CouldNotStart(CombatError::EmptyRoster { team: Team::Hero }));
    assert_eq!(report.outcome, expected);
    assert_eq!(report.events, vec![CombatEvent::CombatEnded { outcome: expected }]);
}

#[test]
fn test_first_ready_ability_in_catalog_order() {
    let heavy = AbilityDefinition::new("Heavy", "Heavy", vec![EffectDefinition::strike(20_000)])
        .with_cooldown(1, CooldownKind::Uses);
    let guarded = AbilityDefinition::new("Guarded", "Guarded", vec![EffectDefinition::strike(5_000)])
        .with_condition(AbilityCondition::user(StatKind::Health, CompareOp::Lesser, 50).as_percentage());
    let fighter = hero(1, 100, 1, 0, 5).with_abilities(vec![
        AbilityId::basic_attack(),
        AbilityId::new("Guarded"),
        AbilityId::new("Heavy"),
    ]);
    let report = resolve_combat(
        vec![fighter],
        vec![monster(11, 100, 0, 0, 1)],
        catalog(vec![heavy, guarded]),
        CombatConfig {
            max_rounds: 3,
            ..Default::default()
        },
        XorShiftRng::seed_from_u64(5),
    );

    let used: Vec<AbilityId> = report
        .events
        .iter()
        .filter_map(|e| match e {
            CombatEvent::AbilityUsed { unit, ability, .. } if *unit == CombatantId(1) => Some(ability.clone()),
            _ => None,
        })
        .collect();
    // Heavy comes first in the catalog; its one-use cooldown alternates it with BasicAttack
    assert_eq!(
        used,
        vec![AbilityId::new("Heavy"), AbilityId::basic_attack(), AbilityId::new("Heavy")]
    );
}

#[test]
fn test_scale_decode_revalidates_catalog() {
    let catalog = starter::starter_catalog().expect("starter catalog is valid");
    let bytes = catalog.encode();
    assert_eq!(bytes, starter::starter_abilities().encode());
    assert_eq!(AbilityCatalog::decode(&mut &bytes[..]).ok(), Some(catalog));

    let duplicated = vec![basic_attack(), basic_attack()].encode();
    assert!(AbilityCatalog::decode(&mut &duplicated[..]).is_err());

    let empty = AbilityCatalog::decode(&mut &Vec::<AbilityDefinition>::new().encode()[..]).expect("empty list decodes");
    assert!(empty.is_empty());
    assert!(empty.basic_attack().is_none());
}

