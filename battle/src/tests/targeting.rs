use super::*;
use crate::rng::XorShiftRng;
use crate::targeting::resolve;

fn enemy_effect(rule: TargetingRule, count: u8) -> EffectDefinition {
    EffectDefinition::new(
        TargetScope::Enemy,
        rule,
        EffectKind::Strike(StrikeParams {
            multiplier_bp: 10_000,
            morale_damage: 0,
        }),
    )
    .targets(count)
}

fn four_monsters() -> Vec<Combatant> {
    (11..=14).map(|id| monster(id, 20, 5, 0, 3)).collect()
}

#[test]
fn test_dead_and_retreated_units_are_never_targeted() {
    let user = hero(1, 20, 5, 0, 5);
    let mut gone = hero(2, 20, 5, 0, 5);
    gone.retreated = true;
    let mut enemies = four_monsters();
    enemies[0].stats.health = 0;
    enemies[2].stats.health = 0;
    let allies = vec![user.clone(), gone];

    let mut rng = XorShiftRng::seed_from_u64(9);
    for _ in 0..20 {
        let targets = resolve(&user, &enemy_effect(TargetingRule::Random, 4), &allies, &enemies, &mut rng);
        assert_eq!(targets.len(), 2);
        assert!(!targets.contains(&CombatantId(11)));
        assert!(!targets.contains(&CombatantId(13)));

        let heal = EffectDefinition::new(TargetScope::Ally, TargetingRule::AllAllies, EffectKind::Interrupt);
        assert_eq!(resolve(&user, &heal, &allies, &enemies, &mut rng), vec![CombatantId(1)]);
    }
}

#[test]
fn test_melee_reaches_first_two_living() {
    let user = hero(1, 20, 5, 0, 5);
    let mut enemies = four_monsters();
    enemies[0].stats.health = 0;
    let effect = enemy_effect(TargetingRule::HighestHealth, 4).melee(true);

    let mut rng = XorShiftRng::seed_from_u64(1);
    let targets = resolve(&user, &effect, &[user.clone()], &enemies, &mut rng);
    assert_eq!(targets, vec![CombatantId(12), CombatantId(13)]);
}

#[test]
fn test_ranged_output_capped_at_party_size() {
    let user = hero(1, 20, 5, 0, 5);
    let effect = enemy_effect(TargetingRule::LowestAttack, 9);
    let mut rng = XorShiftRng::seed_from_u64(1);
    assert_eq!(resolve(&user, &effect, &[user.clone()], &four_monsters(), &mut rng).len(), 4);
}

#[test]
fn test_lowest_health_uses_ratio() {
    let user = hero(1, 20, 5, 0, 5);
    let mut big = monster(11, 40, 5, 0, 3);
    big.stats.health = 10;
    let mut small = monster(12, 10, 5, 0, 3);
    small.stats.health = 8;

    let mut rng = XorShiftRng::seed_from_u64(1);
    let targets = resolve(&user, &enemy_effect(TargetingRule::LowestHealth, 1), &[user.clone()], &[big, small], &mut rng);
    assert_eq!(targets, vec![CombatantId(11)]);
}

#[test]
fn test_ties_keep_position_order() {
    let user = hero(1, 20, 5, 0, 5);
    let mut rng = XorShiftRng::seed_from_u64(1);
    let targets = resolve(
        &user,
        &enemy_effect(TargetingRule::HighestAttack, 3),
        &[user.clone()],
        &four_monsters(),
        &mut rng,
    );
    assert_eq!(targets, vec![CombatantId(11), CombatantId(12), CombatantId(13)]);
}

#[test]
fn test_all_allies_ignores_target_count() {
    let user = hero(1, 20, 5, 0, 5);
    let allies: Vec<Combatant> = (1..=3).map(|id| hero(id, 20, 5, 0, 5)).collect();
    let effect = EffectDefinition::new(TargetScope::Enemy, TargetingRule::AllAllies, EffectKind::Interrupt);

    let mut rng = XorShiftRng::seed_from_u64(1);
    let targets = resolve(&user, &effect, &allies, &four_monsters(), &mut rng);
    assert_eq!(targets, vec![CombatantId(1), CombatantId(2), CombatantId(3)]);
}

#[test]
fn test_position_bounds_filter_pool() {
    let user = hero(1, 20, 5, 0, 5);
    let effect = enemy_effect(TargetingRule::LowestAttack, 4).positions(Some(3), None);
    let mut rng = XorShiftRng::seed_from_u64(1);
    let targets = resolve(&user, &effect, &[user.clone()], &four_monsters(), &mut rng);
    assert_eq!(targets, vec![CombatantId(13), CombatantId(14)]);
}

#[test]
fn test_user_scope_targets_self() {
    let user = hero(1, 20, 5, 0, 5);
    let effect = EffectDefinition::new(TargetScope::User, TargetingRule::Random, EffectKind::Interrupt);
    let mut rng = XorShiftRng::seed_from_u64(1);
    assert_eq!(resolve(&user, &effect, &[user.clone()], &four_monsters(), &mut rng), vec![CombatantId(1)]);
}

#[test]
fn test_weighted_random_without_replacement() {
    let user = hero(1, 20, 5, 0, 5);
    let mut enemies = four_monsters();
    for e in enemies.iter_mut() {
        e.stats.attack = 0;
    }
    let effect = enemy_effect(
        TargetingRule::WeightedRandom {
            stat: Some(StatKind::Attack),
            weight_factor: 10_000,
        },
        3,
    );
    let mut rng = XorShiftRng::seed_from_u64(77);
    let mut targets = resolve(&user, &effect, &[user.clone()], &enemies, &mut rng);
    assert_eq!(targets.len(), 3);
    targets.sort();
    targets.dedup();
    assert_eq!(targets.len(), 3);
}

#[test]
fn test_weight_factor_sets_bias_strength() {
    let user = hero(1, 20, 5, 0, 5);
    let mut enemies = four_monsters();
    for e in enemies.iter_mut() {
        e.stats.attack = 0;
    }
    enemies[3].stats.attack = 9;
    let rule = |weight_factor| {
        enemy_effect(
            TargetingRule::WeightedRandom {
                stat: Some(StatKind::Attack),
                weight_factor,
            },
            1,
        )
    };

    // Same roll of 45_000: uniform weights 4 x 10_000 wrap to the front,
    // a factor of 1.0 gives the last member 100_000 of 130_000.
    let mut flat = ScriptedRng::new(&[0, 45_000]);
    assert_eq!(resolve(&user, &rule(0), &[user.clone()], &enemies, &mut flat), vec![CombatantId(11)]);
    let mut biased = ScriptedRng::new(&[0, 45_000]);
    assert_eq!(resolve(&user, &rule(10_000), &[user.clone()], &enemies, &mut biased), vec![CombatantId(14)]);

    let mut rng = XorShiftRng::seed_from_u64(3);
    let heavy = (0..200)
        .filter(|_| resolve(&user, &rule(50_000), &[user.clone()], &enemies, &mut rng) == vec![CombatantId(14)])
        .count();
    assert!(heavy > 150, "heavy member picked {} of 200", heavy);
}

#[test]
fn test_empty_pool_returns_nothing() {
    let user = hero(1, 20, 5, 0, 5);
    let mut enemies = four_monsters();
    for e in enemies.iter_mut() {
        e.stats.health = 0;
    }
    let mut rng = XorShiftRng::seed_from_u64(1);
    assert!(resolve(&user, &enemy_effect(TargetingRule::Random, 1), &[user.clone()], &enemies, &mut rng).is_empty());
}
