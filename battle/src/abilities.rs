//! Ability and effect definitions, and the immutable catalog that holds them.
//!
//! Abilities are data. A unit's loadout names abilities by [`AbilityId`]; the
//! session looks them up in the [`AbilityCatalog`] it was started with.

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;
use parity_scale_codec::{Decode, Encode, Input, Output};
use scale_info::{Type, TypeInfo};
use serde::{Deserialize, Serialize};

use crate::error::CatalogError;
use crate::types::{StatKind, MAX_PARTY_SIZE};

/// Name of the ability used when nothing else qualifies.
pub const BASIC_ATTACK: &str = "BasicAttack";

/// Catalog key of an ability.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Encode, Decode, TypeInfo, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AbilityId(pub String);

impl AbilityId {
    pub fn new(id: &str) -> Self {
        Self(id.into())
    }

    pub fn basic_attack() -> Self {
        Self::new(BASIC_ATTACK)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for AbilityId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// What a cooldown counts down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Encode, Decode, TypeInfo, Serialize, Deserialize)]
pub enum CooldownKind {
    /// Ticks down once per action the owner takes.
    Uses,
    /// Ticks down once at the start of every round.
    #[default]
    Rounds,
}

// ==========================================
// CONDITIONS
// ==========================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Encode, Decode, TypeInfo, Serialize, Deserialize)]
pub enum CompareOp {
    Greater,
    Lesser,
    Equal,
}

/// Whose stats a condition inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Encode, Decode, TypeInfo, Serialize, Deserialize)]
pub enum ConditionTarget {
    #[default]
    User,
    Ally,
    Enemy,
}

/// How a team-scoped condition aggregates the stat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Encode, Decode, TypeInfo, Serialize, Deserialize)]
pub enum TeamCondition {
    /// Any single member must satisfy the comparison.
    #[default]
    None,
    AverageStat,
    TotalStat,
}

/// A predicate that must hold for an ability to be selected.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode, TypeInfo, Serialize, Deserialize)]
pub struct AbilityCondition {
    pub stat: StatKind,
    pub op: CompareOp,
    pub threshold: i32,
    /// Compare `stat` as a percentage of its cap (MaxHealth or MaxMorale).
    #[serde(default)]
    pub percentage: bool,
    #[serde(default)]
    pub target: ConditionTarget,
    #[serde(default)]
    pub team_condition: TeamCondition,
    #[serde(default)]
    pub min_target_count: Option<u8>,
    #[serde(default)]
    pub max_target_count: Option<u8>,
    #[serde(default)]
    pub min_position: Option<u8>,
    #[serde(default)]
    pub max_position: Option<u8>,
}

impl AbilityCondition {
    /// A condition on the acting unit's own stat.
    pub fn user(stat: StatKind, op: CompareOp, threshold: i32) -> Self {
        Self {
            stat,
            op,
            threshold,
            percentage: false,
            target: ConditionTarget::User,
            team_condition: TeamCondition::None,
            min_target_count: None,
            max_target_count: None,
            min_position: None,
            max_position: None,
        }
    }

    /// A condition on any member (or an aggregate) of a team.
    pub fn team(target: ConditionTarget, stat: StatKind, op: CompareOp, threshold: i32) -> Self {
        Self {
            target,
            ..Self::user(stat, op, threshold)
        }
    }

    pub fn as_percentage(mut self) -> Self {
        self.percentage = true;
        self
    }

    pub fn aggregate(mut self, team_condition: TeamCondition) -> Self {
        self.team_condition = team_condition;
        self
    }

    pub fn counts(mut self, min: Option<u8>, max: Option<u8>) -> Self {
        self.min_target_count = min;
        self.max_target_count = max;
        self
    }

    pub fn positions(mut self, min: Option<u8>, max: Option<u8>) -> Self {
        self.min_position = min;
        self.max_position = max;
        self
    }
}

// ==========================================
// EFFECTS
// ==========================================

/// Which side an effect lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Encode, Decode, TypeInfo, Serialize, Deserialize)]
pub enum TargetScope {
    User,
    Ally,
    Enemy,
}

/// Selection policy applied to the filtered candidate pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Encode, Decode, TypeInfo, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TargetingRule {
    Random,
    LowestHealth,
    HighestHealth,
    LowestMorale,
    HighestMorale,
    LowestAttack,
    HighestAttack,
    AllAllies,
    /// Samples with weight `10_000 + stat * weight_factor` per member, so the
    /// factor (basis points per stat point) sets how strongly the stat biases
    /// the draw. Falls back to Health when no stat is configured.
    WeightedRandom {
        stat: Option<StatKind>,
        weight_factor: u32,
    },
}

/// How much of the target's defense applies to a strike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Encode, Decode, TypeInfo, Serialize, Deserialize)]
pub enum DefenseCheck {
    #[default]
    Standard,
    Partial,
    None,
}

/// Lifetime of a timed stat modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Encode, Decode, TypeInfo, Serialize, Deserialize)]
pub enum ModifierDuration {
    Rounds(u32),
    UntilCombatEnd,
}

impl ModifierDuration {
    /// Catalog data encodes "until combat ends" as -1.
    pub fn from_raw(raw: i32) -> Option<Self> {
        match raw {
            -1 => Some(ModifierDuration::UntilCombatEnd),
            n if n > 0 => Some(ModifierDuration::Rounds(n as u32)),
            _ => None,
        }
    }
}

/// Vital targeted by a heal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Encode, Decode, TypeInfo, Serialize, Deserialize)]
pub enum HealStat {
    Health,
    Morale,
}

impl HealStat {
    pub fn stat(self) -> StatKind {
        match self {
            HealStat::Health => StatKind::Health,
            HealStat::Morale => StatKind::Morale,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Encode, Decode, TypeInfo, Serialize, Deserialize)]
pub enum HealAmount {
    Flat(i32),
    /// Percent of the target's cap for the healed stat.
    PercentOfMax(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Encode, Decode, TypeInfo, Serialize, Deserialize)]
pub struct StrikeParams {
    /// Attack multiplier in basis points (10_000 = 1.0).
    pub multiplier_bp: u32,
    /// Morale lost by hero targets on a hit.
    #[serde(default)]
    pub morale_damage: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Encode, Decode, TypeInfo, Serialize, Deserialize)]
pub struct HealParams {
    pub stat: HealStat,
    pub amount: HealAmount,
    /// No heal if the target is already at or above this percent of its cap.
    pub threshold_percent: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Encode, Decode, TypeInfo, Serialize, Deserialize)]
pub struct SelfSacrificeParams {
    /// Refused when the user's health is at or below this percent of max.
    pub min_health_percent: u32,
    /// Health paid, as a percent of max health.
    pub cost_percent: u32,
    /// Whether the payment may take the user to 0.
    #[serde(default)]
    pub can_kill: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Encode, Decode, TypeInfo, Serialize, Deserialize)]
pub struct InstantKillParams {
    /// Refused when the target's health is at or above this percent of max.
    pub threshold_percent: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Encode, Decode, TypeInfo, Serialize, Deserialize)]
pub struct StatModifierParams {
    pub stat: StatKind,
    pub delta: i32,
    /// Rounds the modifier lasts; -1 keeps it until the combat ends.
    pub duration: i32,
}

/// Closed set of effect kinds, each with typed parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Encode, Decode, TypeInfo, Serialize, Deserialize)]
#[serde(tag = "type", content = "params")]
pub enum EffectKind {
    Strike(StrikeParams),
    Heal(HealParams),
    Interrupt,
    SelfSacrifice(SelfSacrificeParams),
    InstantKill(InstantKillParams),
    StatModifier(StatModifierParams),
}

impl EffectKind {
    pub fn name(&self) -> &'static str {
        match self {
            EffectKind::Strike(_) => "Strike",
            EffectKind::Heal(_) => "Heal",
            EffectKind::Interrupt => "Interrupt",
            EffectKind::SelfSacrifice(_) => "SelfSacrifice",
            EffectKind::InstantKill(_) => "InstantKill",
            EffectKind::StatModifier(_) => "StatModifier",
        }
    }
}

fn default_target_count() -> u8 {
    1
}

fn default_partial_multiplier() -> u32 {
    250
}

/// One effect of an ability together with its targeting.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode, TypeInfo, Serialize, Deserialize)]
pub struct EffectDefinition {
    pub scope: TargetScope,
    pub rule: TargetingRule,
    #[serde(default)]
    pub melee_only: bool,
    #[serde(default = "default_target_count")]
    pub target_count: u8,
    #[serde(default)]
    pub min_position: Option<u8>,
    #[serde(default)]
    pub max_position: Option<u8>,
    pub kind: EffectKind,
    #[serde(default)]
    pub defense_check: DefenseCheck,
    #[serde(default)]
    pub dodgeable: bool,
    /// Defense factor per point for `DefenseCheck::Partial`, in basis points.
    #[serde(default = "default_partial_multiplier")]
    pub partial_defense_bp: u32,
}

impl EffectDefinition {
    pub fn new(scope: TargetScope, rule: TargetingRule, kind: EffectKind) -> Self {
        Self {
            scope,
            rule,
            melee_only: false,
            target_count: 1,
            min_position: None,
            max_position: None,
            kind,
            defense_check: DefenseCheck::Standard,
            dodgeable: false,
            partial_defense_bp: default_partial_multiplier(),
        }
    }

    /// A single-target melee strike at `multiplier_bp` of attack.
    pub fn strike(multiplier_bp: u32) -> Self {
        Self {
            melee_only: true,
            dodgeable: true,
            ..Self::new(
                TargetScope::Enemy,
                TargetingRule::Random,
                EffectKind::Strike(StrikeParams {
                    multiplier_bp,
                    morale_damage: 0,
                }),
            )
        }
    }

    pub fn melee(mut self, melee_only: bool) -> Self {
        self.melee_only = melee_only;
        self
    }

    pub fn targets(mut self, count: u8) -> Self {
        self.target_count = count;
        self
    }

    pub fn positions(mut self, min: Option<u8>, max: Option<u8>) -> Self {
        self.min_position = min;
        self.max_position = max;
        self
    }

    pub fn defense(mut self, check: DefenseCheck) -> Self {
        self.defense_check = check;
        self
    }

    pub fn dodgeable(mut self, dodgeable: bool) -> Self {
        self.dodgeable = dodgeable;
        self
    }

    /// Duration of a stat modifier effect; `None` for other kinds.
    pub fn modifier_duration(&self) -> Option<ModifierDuration> {
        match self.kind {
            EffectKind::StatModifier(p) => ModifierDuration::from_raw(p.duration),
            _ => None,
        }
    }
}

/// Static description of an ability.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode, TypeInfo, Serialize, Deserialize)]
pub struct AbilityDefinition {
    pub id: AbilityId,
    pub name: String,
    #[serde(default)]
    pub cooldown: u32,
    #[serde(default)]
    pub cooldown_kind: CooldownKind,
    #[serde(default)]
    pub rank: u8,
    /// Opaque tag handed to the presentation layer.
    #[serde(default)]
    pub animation: String,
    #[serde(default)]
    pub conditions: Vec<AbilityCondition>,
    pub effects: Vec<EffectDefinition>,
}

impl AbilityDefinition {
    pub fn new(id: &str, name: &str, effects: Vec<EffectDefinition>) -> Self {
        Self {
            id: AbilityId::new(id),
            name: name.into(),
            cooldown: 0,
            cooldown_kind: CooldownKind::Rounds,
            rank: 1,
            animation: String::new(),
            conditions: Vec::new(),
            effects,
        }
    }

    pub fn with_cooldown(mut self, cooldown: u32, kind: CooldownKind) -> Self {
        self.cooldown = cooldown;
        self.cooldown_kind = kind;
        self
    }

    pub fn with_condition(mut self, condition: AbilityCondition) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn with_animation(mut self, animation: &str) -> Self {
        self.animation = animation.into();
        self
    }

    /// The self-sacrifice precondition carried by this ability, if any.
    pub fn sacrifice(&self) -> Option<SelfSacrificeParams> {
        self.effects.iter().find_map(|e| match e.kind {
            EffectKind::SelfSacrifice(p) => Some(p),
            _ => None,
        })
    }

    fn validate(&self) -> Result<(), CatalogError> {
        if self.effects.is_empty() {
            return Err(CatalogError::NoEffects { ability: self.id.clone() });
        }
        let party = MAX_PARTY_SIZE as u8;
        let bad_position = |p: Option<u8>| p.is_some_and(|p| p == 0 || p > party);
        for condition in &self.conditions {
            if bad_position(condition.min_position) || bad_position(condition.max_position) {
                return Err(CatalogError::InvalidPosition { ability: self.id.clone() });
            }
        }
        for effect in &self.effects {
            if effect.target_count == 0 {
                return Err(CatalogError::ZeroTargets { ability: self.id.clone() });
            }
            if bad_position(effect.min_position) || bad_position(effect.max_position) {
                return Err(CatalogError::InvalidPosition { ability: self.id.clone() });
            }
            if let EffectKind::StatModifier(p) = effect.kind {
                if ModifierDuration::from_raw(p.duration).is_none() {
                    return Err(CatalogError::InvalidDuration {
                        ability: self.id.clone(),
                        duration: p.duration,
                    });
                }
            }
        }
        Ok(())
    }
}

/// Immutable, validated collection of abilities in catalog order.
///
/// Both SCALE and serde encode the catalog as its definition list and decode
/// it through [`AbilityCatalog::new`], so a decoded catalog is always valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<AbilityDefinition>", into = "Vec<AbilityDefinition>")]
pub struct AbilityCatalog {
    abilities: Vec<AbilityDefinition>,
    index: BTreeMap<AbilityId, u32>,
}

impl AbilityCatalog {
    /// Validates every definition eagerly; a bad entry rejects the whole catalog.
    pub fn new(abilities: Vec<AbilityDefinition>) -> Result<Self, CatalogError> {
        let mut index = BTreeMap::new();
        for (i, ability) in abilities.iter().enumerate() {
            ability.validate()?;
            if index.insert(ability.id.clone(), i as u32).is_some() {
                return Err(CatalogError::DuplicateAbility { ability: ability.id.clone() });
            }
        }
        Ok(Self { abilities, index })
    }

    pub fn get(&self, id: &AbilityId) -> Option<&AbilityDefinition> {
        self.index.get(id).and_then(|&i| self.abilities.get(i as usize))
    }

    pub fn contains(&self, id: &AbilityId) -> bool {
        self.index.contains_key(id)
    }

    /// Position of an ability in catalog order.
    pub fn order_of(&self, id: &AbilityId) -> Option<usize> {
        self.index.get(id).map(|&i| i as usize)
    }

    pub fn basic_attack(&self) -> Option<&AbilityDefinition> {
        self.get(&AbilityId::basic_attack())
    }

    pub fn iter(&self) -> impl Iterator<Item = &AbilityDefinition> {
        self.abilities.iter()
    }

    pub fn len(&self) -> usize {
        self.abilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.abilities.is_empty()
    }
}

impl TryFrom<Vec<AbilityDefinition>> for AbilityCatalog {
    type Error = CatalogError;

    fn try_from(abilities: Vec<AbilityDefinition>) -> Result<Self, Self::Error> {
        Self::new(abilities)
    }
}

impl From<AbilityCatalog> for Vec<AbilityDefinition> {
    fn from(catalog: AbilityCatalog) -> Self {
        catalog.abilities
    }
}

impl Encode for AbilityCatalog {
    fn size_hint(&self) -> usize {
        self.abilities.size_hint()
    }

    fn encode_to<T: Output + ?Sized>(&self, dest: &mut T) {
        self.abilities.encode_to(dest)
    }
}

impl Decode for AbilityCatalog {
    fn decode<I: Input>(input: &mut I) -> Result<Self, parity_scale_codec::Error> {
        let abilities = Vec::<AbilityDefinition>::decode(input)?;
        Self::new(abilities).map_err(|_| "invalid ability catalog".into())
    }
}

impl TypeInfo for AbilityCatalog {
    type Identity = Vec<AbilityDefinition>;

    fn type_info() -> Type {
        <Vec<AbilityDefinition> as TypeInfo>::type_info()
    }
}
