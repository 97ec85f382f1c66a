//! Built-in starter content.
//!
//! A small catalog and a handful of combatant templates, enough to run a fight
//! without any external data.

use alloc::vec;
use alloc::vec::Vec;

use crate::abilities::*;
use crate::error::CatalogError;
use crate::types::{Combatant, Infection, StatBlock, StatKind, TransmissionVector, VirusId};

pub const ROT_FEVER: VirusId = VirusId(1);
pub const DREAD: VirusId = VirusId(2);

/// Abilities in selection-priority order. BasicAttack comes last.
pub fn starter_abilities() -> Vec<AbilityDefinition> {
    vec![
        AbilityDefinition::new(
            "LastRites",
            "Last Rites",
            vec![EffectDefinition::new(
                TargetScope::Enemy,
                TargetingRule::LowestHealth,
                EffectKind::InstantKill(InstantKillParams { threshold_percent: 25 }),
            )
            .melee(true)],
        )
        .with_cooldown(3, CooldownKind::Rounds)
        .with_condition(
            AbilityCondition::team(ConditionTarget::Enemy, StatKind::Health, CompareOp::Lesser, 25).as_percentage(),
        )
        .with_animation("execute"),
        AbilityDefinition::new(
            "FieldDressing",
            "Field Dressing",
            vec![EffectDefinition::new(
                TargetScope::Ally,
                TargetingRule::LowestHealth,
                EffectKind::Heal(HealParams {
                    stat: HealStat::Health,
                    amount: HealAmount::PercentOfMax(30),
                    threshold_percent: 60,
                }),
            )],
        )
        .with_cooldown(2, CooldownKind::Rounds)
        .with_condition(
            AbilityCondition::team(ConditionTarget::Ally, StatKind::Health, CompareOp::Lesser, 50).as_percentage(),
        )
        .with_animation("heal"),
        AbilityDefinition::new(
            "RallyingCry",
            "Rallying Cry",
            vec![
                EffectDefinition::new(
                    TargetScope::Ally,
                    TargetingRule::AllAllies,
                    EffectKind::Heal(HealParams {
                        stat: HealStat::Morale,
                        amount: HealAmount::Flat(15),
                        threshold_percent: 90,
                    }),
                ),
                EffectDefinition::new(
                    TargetScope::User,
                    TargetingRule::Random,
                    EffectKind::StatModifier(StatModifierParams {
                        stat: StatKind::Defense,
                        delta: 2,
                        duration: 2,
                    }),
                ),
            ],
        )
        .with_cooldown(3, CooldownKind::Rounds)
        .with_condition(
            AbilityCondition::team(ConditionTarget::Ally, StatKind::Morale, CompareOp::Lesser, 40)
                .aggregate(TeamCondition::AverageStat),
        )
        .with_animation("shout"),
        AbilityDefinition::new(
            "BloodOffering",
            "Blood Offering",
            vec![
                EffectDefinition::new(
                    TargetScope::User,
                    TargetingRule::Random,
                    EffectKind::SelfSacrifice(SelfSacrificeParams {
                        min_health_percent: 50,
                        cost_percent: 20,
                        can_kill: false,
                    }),
                ),
                EffectDefinition::new(
                    TargetScope::Enemy,
                    TargetingRule::HighestAttack,
                    EffectKind::Strike(StrikeParams {
                        multiplier_bp: 20_000,
                        morale_damage: 0,
                    }),
                )
                .defense(DefenseCheck::None),
            ],
        )
        .with_cooldown(2, CooldownKind::Uses)
        .with_animation("ritual"),
        AbilityDefinition::new(
            "ShieldBash",
            "Shield Bash",
            vec![
                EffectDefinition::strike(6_000),
                EffectDefinition::new(TargetScope::Enemy, TargetingRule::HighestAttack, EffectKind::Interrupt)
                    .melee(true)
                    .dodgeable(true),
            ],
        )
        .with_cooldown(2, CooldownKind::Rounds)
        .with_animation("bash"),
        AbilityDefinition::new(
            "Howl",
            "Howl",
            vec![EffectDefinition::new(
                TargetScope::Enemy,
                TargetingRule::WeightedRandom {
                    stat: Some(StatKind::Morale),
                    weight_factor: 10_000,
                },
                EffectKind::Strike(StrikeParams {
                    multiplier_bp: 3_000,
                    morale_damage: 12,
                }),
            )
            .targets(2)
            .defense(DefenseCheck::Partial)],
        )
        .with_cooldown(2, CooldownKind::Rounds)
        .with_animation("howl"),
        AbilityDefinition::new(
            "Cripple",
            "Cripple",
            vec![EffectDefinition::new(
                TargetScope::Enemy,
                TargetingRule::HighestAttack,
                EffectKind::StatModifier(StatModifierParams {
                    stat: StatKind::Speed,
                    delta: -3,
                    duration: 2,
                }),
            )
            .dodgeable(true)],
        )
        .with_cooldown(3, CooldownKind::Rounds)
        .with_animation("hex"),
        AbilityDefinition::new(BASIC_ATTACK, "Attack", vec![EffectDefinition::strike(10_000)]).with_animation("attack"),
    ]
}

pub fn starter_catalog() -> Result<AbilityCatalog, CatalogError> {
    AbilityCatalog::new(starter_abilities())
}

// ==========================================
// TEMPLATES
// ==========================================

fn loadout(ids: &[&str]) -> Vec<AbilityId> {
    ids.iter().map(|id| AbilityId::new(id)).collect()
}

pub fn rot_fever() -> Infection {
    Infection {
        virus: ROT_FEVER,
        name: "Rot Fever".into(),
        vector: TransmissionVector::Health,
        infectivity_modifier: 10,
    }
}

pub fn dread() -> Infection {
    Infection {
        virus: DREAD,
        name: "Dread".into(),
        vector: TransmissionVector::Morale,
        infectivity_modifier: 20,
    }
}

pub fn warden(id: u32) -> Combatant {
    Combatant::hero(
        id,
        "Warden",
        StatBlock {
            health: 40,
            max_health: 40,
            morale: 70,
            max_morale: 100,
            attack: 9,
            defense: 4,
            speed: 5,
            evasion: 5,
            infectivity: 0,
            immunity: 40,
        },
    )
    .with_abilities(loadout(&["ShieldBash", "RallyingCry", BASIC_ATTACK]))
}

pub fn duelist(id: u32) -> Combatant {
    Combatant::hero(
        id,
        "Duelist",
        StatBlock {
            health: 28,
            max_health: 28,
            morale: 60,
            max_morale: 100,
            attack: 12,
            defense: 1,
            speed: 8,
            evasion: 20,
            infectivity: 0,
            immunity: 30,
        },
    )
    .with_abilities(loadout(&["LastRites", BASIC_ATTACK]))
}

pub fn chaplain(id: u32) -> Combatant {
    Combatant::hero(
        id,
        "Chaplain",
        StatBlock {
            health: 26,
            max_health: 26,
            morale: 80,
            max_morale: 100,
            attack: 6,
            defense: 2,
            speed: 4,
            evasion: 10,
            infectivity: 0,
            immunity: 60,
        },
    )
    .with_abilities(loadout(&["FieldDressing", "RallyingCry", BASIC_ATTACK]))
}

pub fn plague_hound(id: u32) -> Combatant {
    Combatant::monster(
        id,
        "Plague Hound",
        StatBlock {
            health: 22,
            max_health: 22,
            attack: 8,
            defense: 1,
            speed: 7,
            evasion: 15,
            infectivity: 30,
            immunity: 20,
            ..Default::default()
        },
    )
    .with_abilities(loadout(&["Howl", BASIC_ATTACK]))
    .with_infection(rot_fever())
}

pub fn bone_priest(id: u32) -> Combatant {
    Combatant::monster(
        id,
        "Bone Priest",
        StatBlock {
            health: 30,
            max_health: 30,
            attack: 7,
            defense: 3,
            speed: 3,
            evasion: 0,
            infectivity: 10,
            immunity: 50,
            ..Default::default()
        },
    )
    .with_abilities(loadout(&["Cripple", "BloodOffering", BASIC_ATTACK]))
}
