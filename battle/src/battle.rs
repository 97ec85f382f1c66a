use alloc::collections::{BTreeMap, VecDeque};
use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use parity_scale_codec::{Decode, Encode};
use scale_info::TypeInfo;
use serde::{Deserialize, Serialize};

use crate::abilities::{AbilityCatalog, AbilityDefinition, AbilityId, EffectKind, BASIC_ATTACK};
use crate::attack_state::UnitAttackState;
use crate::config::CombatConfig;
use crate::error::{AbortReason, CombatError, CombatResult};
use crate::limits::{CombatLimits, Team};
use crate::pacing::{PaceKind, Pacing};
use crate::rng::BattleRng;
use crate::roster::Roster;
use crate::types::{Combatant, CombatantId, StatBlock, StatKind, VirusId};
use crate::view::UnitView;
use crate::{conditions, contagion, effects, targeting};

/// Colour hint for a combat log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Encode, Decode, TypeInfo, Serialize, Deserialize)]
pub enum LogTone {
    Neutral,
    Damage,
    Heal,
    Miss,
    Death,
    Retreat,
    Infection,
    Buff,
    Debuff,
}

/// How a combat session ended.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode, TypeInfo, Serialize, Deserialize)]
#[serde(tag = "type", content = "reason")]
pub enum CombatOutcome {
    Victory,
    Defeat,
    Aborted(AbortReason),
}

impl CombatOutcome {
    pub fn winner(&self) -> Option<Team> {
        match self {
            CombatOutcome::Victory => Some(Team::Hero),
            CombatOutcome::Defeat => Some(Team::Monster),
            CombatOutcome::Aborted(_) => None,
        }
    }
}

/// Events generated during combat for UI playback.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode, TypeInfo, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum CombatEvent {
    RoundStarted {
        round: u32,
    },
    Log {
        text: String,
        tone: LogTone,
    },
    AbilityUsed {
        unit: CombatantId,
        ability: AbilityId,
        animation: String,
        targets: Vec<CombatantId>,
    },
    Dodged {
        attacker: CombatantId,
        target: CombatantId,
    },
    UnitUpdated {
        unit: UnitView,
    },
    UnitDied {
        unit: CombatantId,
    },
    UnitRetreated {
        unit: CombatantId,
    },
    InfectionSpread {
        source: CombatantId,
        target: CombatantId,
        virus: VirusId,
    },
    RoundEnded {
        round: u32,
    },
    CombatEnded {
        outcome: CombatOutcome,
    },
}

/// Receiver of combat events.
pub trait EventSink {
    fn emit(&mut self, event: CombatEvent);
}

impl EventSink for Vec<CombatEvent> {
    fn emit(&mut self, event: CombatEvent) {
        self.push(event);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CombatPhase {
    NotStarted,
    /// Between rounds.
    Active,
    RoundInProgress,
    Ended(CombatOutcome),
}

/// Result of one [`CombatSession::step`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepResult {
    /// A transition was resolved; hosts that animate may wait `delay_ms`.
    Continue { delay_ms: u32 },
    Paused,
    Ended(CombatOutcome),
}

/// Final state of a resolved combat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatReport {
    pub outcome: CombatOutcome,
    pub rounds: u32,
    pub heroes: Vec<Combatant>,
    pub monsters: Vec<Combatant>,
    pub events: Vec<CombatEvent>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Turn {
    unit: CombatantId,
    bonus: bool,
}

// ==========================================
// SESSION
// ==========================================

/// A steppable combat between a hero party and a monster party.
///
/// The session owns both rosters and every unit's attack state. Each call to
/// [`step`](Self::step) resolves exactly one transition: combat start, round
/// start, one unit turn, or round end.
pub struct CombatSession<R: BattleRng> {
    roster: Roster,
    catalog: AbilityCatalog,
    config: CombatConfig,
    rng: R,
    states: BTreeMap<CombatantId, UnitAttackState>,
    /// Stat blocks at combat start, for the end-of-combat rollback.
    snapshot: BTreeMap<CombatantId, StatBlock>,
    limits: CombatLimits,
    phase: CombatPhase,
    queue: VecDeque<Turn>,
    initiative: Vec<CombatantId>,
    bonus_pass_done: bool,
    pacing: Pacing,
    pending_abort: Option<AbortReason>,
}

/// Validates the rosters and config and creates a session ready to step.
pub fn start_combat<R: BattleRng>(
    heroes: Vec<Combatant>,
    monsters: Vec<Combatant>,
    catalog: AbilityCatalog,
    config: CombatConfig,
    rng: R,
) -> CombatResult<CombatSession<R>> {
    config.validate().map_err(|reason| CombatError::InvalidConfig {
        reason: reason.to_string(),
    })?;
    let roster = Roster::new(heroes, monsters, &catalog)?;
    Ok(CombatSession {
        limits: CombatLimits::new(config.max_rounds),
        roster,
        catalog,
        config,
        rng,
        states: BTreeMap::new(),
        snapshot: BTreeMap::new(),
        phase: CombatPhase::NotStarted,
        queue: VecDeque::new(),
        initiative: Vec::new(),
        bonus_pass_done: false,
        pacing: Pacing::default(),
        pending_abort: None,
    })
}

/// Runs a whole combat, ignoring pacing, and collects every event.
///
/// A combat that cannot start is reported as `Aborted(CouldNotStart)` with the
/// rosters returned untouched.
pub fn resolve_combat<R: BattleRng>(
    heroes: Vec<Combatant>,
    monsters: Vec<Combatant>,
    catalog: AbilityCatalog,
    config: CombatConfig,
    rng: R,
) -> CombatReport {
    let mut events = Vec::new();
    let (heroes_in, monsters_in) = (heroes.clone(), monsters.clone());
    match start_combat(heroes, monsters, catalog, config, rng) {
        Ok(mut session) => {
            session.run(&mut events);
            let mut report = session.finish(&mut events);
            report.events = events;
            report
        }
        Err(err) => {
            crate::log::warn(&format!("combat could not start: {}", err));
            let outcome = CombatOutcome::Aborted(AbortReason::CouldNotStart(err));
            events.push(CombatEvent::CombatEnded {
                outcome: outcome.clone(),
            });
            CombatReport {
                outcome,
                rounds: 0,
                heroes: heroes_in,
                monsters: monsters_in,
                events,
            }
        }
    }
}

impl<R: BattleRng> CombatSession<R> {
    pub fn phase(&self) -> &CombatPhase {
        &self.phase
    }

    pub fn round(&self) -> u32 {
        self.limits.rounds
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn config(&self) -> &CombatConfig {
        &self.config
    }

    pub fn attack_state(&self, id: CombatantId) -> Option<&UnitAttackState> {
        self.states.get(&id)
    }

    /// Snapshots of every combatant, heroes first.
    pub fn views(&self) -> Vec<UnitView> {
        self.roster.all().map(UnitView::from).collect()
    }

    pub fn outcome(&self) -> Option<&CombatOutcome> {
        match &self.phase {
            CombatPhase::Ended(outcome) => Some(outcome),
            _ => None,
        }
    }

    // ==========================================
    // PACING & CONTROL
    // ==========================================

    /// Playback multiplier in percent (100 = 1x).
    pub fn set_combat_speed(&mut self, speed_percent: u32) {
        self.pacing.set_speed(speed_percent);
    }

    pub fn pause(&mut self) {
        self.pacing.pause();
    }

    pub fn resume(&mut self) {
        self.pacing.resume();
    }

    pub fn is_paused(&self) -> bool {
        self.pacing.is_paused()
    }

    /// Ends the combat as `Aborted(reason)` on the next step.
    pub fn abort(&mut self, reason: AbortReason) {
        if self.outcome().is_none() {
            self.pending_abort = Some(reason);
        }
    }

    /// Resolves one transition.
    pub fn step<S: EventSink + ?Sized>(&mut self, sink: &mut S) -> StepResult {
        if let Some(outcome) = self.outcome() {
            return StepResult::Ended(outcome.clone());
        }
        if let Some(reason) = self.pending_abort.take() {
            return self.end(CombatOutcome::Aborted(reason), sink);
        }
        if self.pacing.is_paused() {
            return StepResult::Paused;
        }
        match self.phase {
            CombatPhase::NotStarted => self.begin(sink),
            CombatPhase::Active => self.start_round(sink),
            CombatPhase::RoundInProgress => self.advance_round(sink),
            CombatPhase::Ended(ref outcome) => StepResult::Ended(outcome.clone()),
        }
    }

    /// Steps until the combat ends. Pausing does not stop a run.
    pub fn run<S: EventSink + ?Sized>(&mut self, sink: &mut S) -> CombatOutcome {
        loop {
            match self.step(sink) {
                StepResult::Ended(outcome) => return outcome,
                StepResult::Paused => self.pacing.resume(),
                StepResult::Continue { .. } => {}
            }
        }
    }

    /// Consumes the session. A combat still running is cancelled first.
    pub fn finish<S: EventSink + ?Sized>(mut self, sink: &mut S) -> CombatReport {
        let outcome = match self.outcome() {
            Some(outcome) => outcome.clone(),
            None => {
                self.end(CombatOutcome::Aborted(AbortReason::Cancelled), sink);
                CombatOutcome::Aborted(AbortReason::Cancelled)
            }
        };
        CombatReport {
            outcome,
            rounds: self.limits.rounds,
            heroes: self.roster.heroes,
            monsters: self.roster.monsters,
            events: Vec::new(),
        }
    }

    // ==========================================
    // TRANSITIONS
    // ==========================================

    fn begin<S: EventSink + ?Sized>(&mut self, sink: &mut S) -> StepResult {
        for unit in self.roster.all() {
            self.snapshot.insert(unit.id, unit.stats.clone());
            if unit.is_alive() {
                self.states.insert(unit.id, UnitAttackState::new());
            }
            sink.emit(CombatEvent::UnitUpdated {
                unit: UnitView::from(unit),
            });
        }
        let heroes = self.roster.active_count(Team::Hero);
        let monsters = self.roster.active_count(Team::Monster);
        sink.emit(CombatEvent::Log {
            text: format!("Combat begins: {} heroes against {} monsters", heroes, monsters),
            tone: LogTone::Neutral,
        });
        crate::log::info(&format!("combat started ({} vs {})", heroes, monsters));
        self.phase = CombatPhase::Active;
        StepResult::Continue {
            delay_ms: self.pacing.delay_ms(PaceKind::Round),
        }
    }

    fn start_round<S: EventSink + ?Sized>(&mut self, sink: &mut S) -> StepResult {
        let round = match self.limits.record_round() {
            Ok(round) => round,
            Err(reason) => return self.end(CombatOutcome::Aborted(reason), sink),
        };
        sink.emit(CombatEvent::RoundStarted { round });

        let active: Vec<CombatantId> = self.roster.all().filter(|u| u.is_active()).map(|u| u.id).collect();
        for &id in &active {
            let (Some(unit), Some(state)) = (self.roster.get_mut(id), self.states.get_mut(&id)) else {
                continue;
            };
            for stat in state.begin_round(unit) {
                sink.emit(CombatEvent::Log {
                    text: format!("{}'s {} returns to {}", unit.name, stat.name(), unit.stat(stat)),
                    tone: LogTone::Neutral,
                });
                sink.emit(CombatEvent::UnitUpdated {
                    unit: UnitView::from(&*unit),
                });
            }
        }

        let heroes: Vec<CombatantId> = self.roster.active(Team::Hero).map(|u| u.id).collect();
        for id in heroes {
            self.check_retreat(id, sink);
        }
        if let Some(outcome) = self.decided() {
            return self.end(outcome, sink);
        }

        self.build_initiative(round);
        self.bonus_pass_done = false;
        self.phase = CombatPhase::RoundInProgress;
        crate::log::round_summary(
            round,
            self.roster.active_count(Team::Hero),
            self.roster.active_count(Team::Monster),
        );
        StepResult::Continue {
            delay_ms: self.pacing.delay_ms(PaceKind::Round),
        }
    }

    /// Orders active units by effective speed, ties broken by a per-round
    /// jitter, and queues the turns each speed tier grants back to back.
    fn build_initiative(&mut self, round: u32) {
        let mut order: Vec<(i32, u32, CombatantId)> = Vec::new();
        for unit in self.roster.heroes.iter().chain(self.roster.monsters.iter()) {
            if unit.is_active() {
                order.push((unit.stat(StatKind::Speed), self.rng.next_u32(), unit.id));
            }
        }
        order.sort_by(|a, b| b.0.cmp(&a.0).then(b.1.cmp(&a.1)).then(a.2.cmp(&b.2)));

        self.queue.clear();
        self.initiative.clear();
        for (speed, _, id) in order {
            self.initiative.push(id);
            for _ in 0..self.config.turns_for(speed, round) {
                self.queue.push_back(Turn { unit: id, bonus: false });
            }
        }
    }

    /// Units above the two-attack threshold that have not acted twice and were
    /// not interrupted this round get one more action.
    fn queue_bonus_pass(&mut self) {
        for &id in &self.initiative {
            let (Some(unit), Some(state)) = (self.roster.get(id), self.states.get(&id)) else {
                continue;
            };
            if unit.is_active()
                && unit.stat(StatKind::Speed) > self.config.two_attacks_threshold
                && state.attacks_this_round < 2
                && !state.interrupted_this_round
            {
                self.queue.push_back(Turn { unit: id, bonus: true });
            }
        }
    }

    fn advance_round<S: EventSink + ?Sized>(&mut self, sink: &mut S) -> StepResult {
        loop {
            let Some(turn) = self.queue.pop_front() else {
                if !self.bonus_pass_done {
                    self.bonus_pass_done = true;
                    self.queue_bonus_pass();
                    continue;
                }
                return self.end_round(sink);
            };
            if !self.roster.get(turn.unit).is_some_and(|u| u.is_active()) {
                continue;
            }
            if !self.limits.record_action() {
                crate::log::warn("action cap reached, closing round");
                self.queue.clear();
                self.bonus_pass_done = true;
                continue;
            }
            return self.take_turn(turn, sink);
        }
    }

    fn take_turn<S: EventSink + ?Sized>(&mut self, turn: Turn, sink: &mut S) -> StepResult {
        let id = turn.unit;
        let Some(name) = self.roster.get(id).map(|u| u.name.clone()) else {
            return self.after_action(sink);
        };

        if self.check_retreat(id, sink) {
            return self.after_action(sink);
        }

        if self.states.get_mut(&id).is_some_and(|s| s.consume_skip()) {
            sink.emit(CombatEvent::Log {
                text: format!("{} is reeling and loses the turn", name),
                tone: LogTone::Neutral,
            });
            return self.after_action(sink);
        }

        let Some(ability) = self.select_ability(id) else {
            sink.emit(CombatEvent::Log {
                text: format!("{} finds nothing to do", name),
                tone: LogTone::Neutral,
            });
            if let Some(state) = self.states.get_mut(&id) {
                state.finish_action(None);
            }
            return self.after_action(sink);
        };

        if turn.bonus {
            crate::log::debug("bonus", &name);
        }
        self.perform(id, &name, &ability, sink);
        if let Some(state) = self.states.get_mut(&id) {
            state.finish_action(Some(&ability));
        }
        self.after_action(sink)
    }

    /// First loadout ability in catalog order that is ready, whose conditions
    /// hold and whose sacrifice can be paid; BasicAttack otherwise.
    fn select_ability(&self, id: CombatantId) -> Option<AbilityDefinition> {
        let unit = self.roster.get(id)?;
        let team = self.roster.team_of(id)?;
        let state = self.states.get(&id)?;
        let party = self.roster.side(team);
        let opponents = self.roster.side(team.opponent());

        let usable = |ability: &&AbilityDefinition| {
            state.is_ready(&ability.id)
                && conditions::all_hold(&ability.conditions, unit, party, opponents)
                && ability
                    .sacrifice()
                    .map_or(true, |p| effects::can_pay_sacrifice(unit, &p))
        };

        let mut loadout: Vec<&AbilityDefinition> = unit
            .abilities
            .iter()
            .filter(|a| a.as_str() != BASIC_ATTACK)
            .filter_map(|a| self.catalog.get(a))
            .collect();
        loadout.sort_by_key(|a| self.catalog.order_of(&a.id));
        loadout.dedup_by(|a, b| a.id == b.id);

        loadout
            .into_iter()
            .find(usable)
            .or_else(|| self.catalog.basic_attack().filter(usable))
            .cloned()
    }

    fn perform<S: EventSink + ?Sized>(
        &mut self,
        id: CombatantId,
        name: &str,
        ability: &AbilityDefinition,
        sink: &mut S,
    ) {
        let Some(team) = self.roster.team_of(id) else {
            return;
        };

        let mut plan: Vec<Vec<CombatantId>> = Vec::with_capacity(ability.effects.len());
        if let Some(user) = self.roster.get(id) {
            let allies = self.roster.side(team);
            let enemies = self.roster.side(team.opponent());
            for effect in &ability.effects {
                plan.push(targeting::resolve(user, effect, allies, enemies, &mut self.rng));
            }
        }

        let mut all_targets: Vec<CombatantId> = Vec::new();
        for target in plan.iter().flatten() {
            if !all_targets.contains(target) {
                all_targets.push(*target);
            }
        }
        crate::log::action(name, ability.id.as_str(), all_targets.len());
        sink.emit(CombatEvent::AbilityUsed {
            unit: id,
            ability: ability.id.clone(),
            animation: ability.animation.clone(),
            targets: all_targets,
        });
        sink.emit(CombatEvent::Log {
            text: format!("{} uses {}", name, ability.name),
            tone: LogTone::Neutral,
        });

        for (effect, targets) in ability.effects.iter().zip(plan) {
            if targets.is_empty() && !matches!(effect.kind, EffectKind::SelfSacrifice(_)) {
                sink.emit(CombatEvent::Log {
                    text: format!("{}'s {} finds no target", name, effect.kind.name()),
                    tone: LogTone::Miss,
                });
                continue;
            }
            let output = effects::execute(
                effect,
                id,
                &targets,
                &mut self.roster,
                &mut self.states,
                &self.config,
                &mut self.rng,
            );
            for event in output.events {
                sink.emit(event);
            }
            for change in &output.vital_changes {
                for event in contagion::spread(change, &mut self.roster, &self.config, &mut self.rng) {
                    sink.emit(event);
                }
            }
            if output.cancel_rest {
                break;
            }
        }
    }

    fn after_action<S: EventSink + ?Sized>(&mut self, sink: &mut S) -> StepResult {
        self.close_ranks(sink);
        if let Some(outcome) = self.decided() {
            return self.end(outcome, sink);
        }
        StepResult::Continue {
            delay_ms: self.pacing.delay_ms(PaceKind::Action),
        }
    }

    fn end_round<S: EventSink + ?Sized>(&mut self, sink: &mut S) -> StepResult {
        let round = self.limits.rounds;
        sink.emit(CombatEvent::RoundEnded { round });
        self.phase = CombatPhase::Active;
        if let Some(outcome) = self.decided() {
            return self.end(outcome, sink);
        }
        StepResult::Continue {
            delay_ms: self.pacing.delay_ms(PaceKind::Round),
        }
    }

    fn end<S: EventSink + ?Sized>(&mut self, outcome: CombatOutcome, sink: &mut S) -> StepResult {
        for unit in self.roster.all_mut() {
            if let Some(base) = self.snapshot.get(&unit.id) {
                for stat in StatKind::ALL.into_iter().filter(|s| !s.is_vital()) {
                    unit.set_stat(stat, base.get(stat));
                }
            }
        }
        self.states.clear();
        self.queue.clear();

        for unit in self.roster.all() {
            sink.emit(CombatEvent::UnitUpdated {
                unit: UnitView::from(unit),
            });
        }
        sink.emit(CombatEvent::CombatEnded {
            outcome: outcome.clone(),
        });
        crate::log::outcome(outcome.winner(), self.limits.rounds);
        self.phase = CombatPhase::Ended(outcome.clone());
        StepResult::Ended(outcome)
    }

    // ==========================================
    // MORALE & FORMATION
    // ==========================================

    /// Retreats a hero whose morale fell to the threshold. The hero gets the
    /// rebate and every remaining teammate pays the penalty.
    fn check_retreat<S: EventSink + ?Sized>(&mut self, id: CombatantId, sink: &mut S) -> bool {
        let threshold = self.config.retreat_threshold;
        let Some(hero) = self.roster.get_mut(id) else {
            return false;
        };
        if !hero.is_hero || !hero.is_active() || hero.stat(StatKind::Morale) > threshold {
            return false;
        }

        hero.retreated = true;
        hero.adjust(StatKind::Morale, self.config.retreat_morale_rebate);
        sink.emit(CombatEvent::UnitRetreated { unit: id });
        sink.emit(CombatEvent::Log {
            text: format!("{} loses heart and retreats!", hero.name),
            tone: LogTone::Retreat,
        });
        sink.emit(CombatEvent::UnitUpdated {
            unit: UnitView::from(&*hero),
        });

        let penalty = self.config.retreat_team_penalty;
        for mate in self.roster.heroes.iter_mut().filter(|u| u.is_active()) {
            let lost = -mate.adjust(StatKind::Morale, -penalty);
            if lost > 0 {
                sink.emit(CombatEvent::Log {
                    text: format!("{} is shaken and loses {} morale", mate.name, lost),
                    tone: LogTone::Debuff,
                });
            }
            sink.emit(CombatEvent::UnitUpdated {
                unit: UnitView::from(&*mate),
            });
        }
        self.close_ranks(sink);
        true
    }

    fn close_ranks<S: EventSink + ?Sized>(&mut self, sink: &mut S) {
        for team in [Team::Hero, Team::Monster] {
            if self.roster.compact_positions(team) {
                for unit in self.roster.active(team) {
                    sink.emit(CombatEvent::UnitUpdated {
                        unit: UnitView::from(unit),
                    });
                }
            }
        }
    }

    /// A side without active members has lost; a double wipe counts as defeat.
    fn decided(&self) -> Option<CombatOutcome> {
        if self.roster.active_count(Team::Hero) == 0 {
            Some(CombatOutcome::Defeat)
        } else if self.roster.active_count(Team::Monster) == 0 {
            Some(CombatOutcome::Victory)
        } else {
            None
        }
    }
}
