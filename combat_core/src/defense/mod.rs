//! Defense resolution - the TV an attack must beat
//!
//! Passive defense costs nothing and rolls nothing. Dodge and Parry roll
//! against the defender's AS and cost an action. A shield block is always a
//! free extra: it never changes TV, and its RV on success feeds the shield's
//! absorption bonus during damage resolution.

mod concentration;

pub use concentration::{
    damage_penalty, Concentration, ConcentrationCheck, ConcentrationState, IncomingAttack,
};

use crate::config::{constants, CombatConstants};
use crate::dice::{RandomSource, RngDice};
use concentration::check_concentration;
use serde::{Deserialize, Serialize};
use std::fmt;

const BROKEN_ACTIVE_DEFENSE: &str = "Active defense";
const PARRY_RANGED: &str = "Cannot parry ranged attacks";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefenseType {
    #[default]
    Passive,
    Dodge,
    Parry,
    ShieldBlock,
}

impl DefenseType {
    /// Whether this defense rolls a check for its TV
    pub fn is_active(self) -> bool {
        matches!(self, DefenseType::Dodge | DefenseType::Parry)
    }
}

impl fmt::Display for DefenseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefenseType::Passive => write!(f, "Passive"),
            DefenseType::Dodge => write!(f, "Dodge"),
            DefenseType::Parry => write!(f, "Parry"),
            DefenseType::ShieldBlock => write!(f, "Shield Block"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefenseRequest {
    pub defense_type: DefenseType,
    /// AS of the chosen defense: Dodge, the parrying weapon, or the shield
    pub ability_score: i32,
    /// Dodge AS backing the passive TV when the chosen defense leaves TV alone
    pub dodge_as: i32,
    #[serde(default)]
    pub is_ranged_attack: bool,
    /// Already parrying this round; further parries are free
    #[serde(default)]
    pub in_parry_mode: bool,
    /// Known attack, for a concentration check under passive defense
    #[serde(default)]
    pub incoming: Option<IncomingAttack>,
}

impl DefenseRequest {
    fn new(defense_type: DefenseType, ability_score: i32, dodge_as: i32) -> Self {
        DefenseRequest {
            defense_type,
            ability_score,
            dodge_as,
            is_ranged_attack: false,
            in_parry_mode: false,
            incoming: None,
        }
    }

    pub fn passive(dodge_as: i32) -> Self {
        Self::new(DefenseType::Passive, dodge_as, dodge_as)
    }

    pub fn dodge(dodge_as: i32) -> Self {
        Self::new(DefenseType::Dodge, dodge_as, dodge_as)
    }

    pub fn parry(parry_as: i32) -> Self {
        Self::new(DefenseType::Parry, parry_as, parry_as)
    }

    /// A shield block on its own; TV stays passive
    pub fn shield_block(shield_as: i32, dodge_as: i32) -> Self {
        Self::new(DefenseType::ShieldBlock, shield_as, dodge_as)
    }

    pub fn against_ranged(mut self) -> Self {
        self.is_ranged_attack = true;
        self
    }

    pub fn in_parry_mode(mut self) -> Self {
        self.in_parry_mode = true;
        self
    }

    pub fn with_incoming(mut self, av: i32, damage: i32) -> Self {
        self.incoming = Some(IncomingAttack::new(av, damage));
        self
    }
}

/// A shield-block check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShieldBlock {
    pub ability_score: i32,
    pub roll: i32,
    pub total: i32,
    pub succeeded: bool,
    /// total - block TV, only on success
    pub rv: Option<i32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefenseOutcome {
    pub defense_type: DefenseType,
    pub ability_score: i32,
    /// Roll of an active defense
    pub roll: Option<i32>,
    /// TV the attacker must meet
    pub tv: i32,
    pub costs_action: bool,
    pub concentration: Option<ConcentrationCheck>,
    pub concentration_broken: bool,
    pub shield_block: Option<ShieldBlock>,
}

impl DefenseOutcome {
    /// RV a successful shield block hands to damage resolution
    pub fn shield_block_rv(&self) -> Option<i32> {
        self.shield_block.and_then(|block| block.rv)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DefenseResult {
    Resolved(DefenseOutcome),
    /// The defense is not allowed here; nothing was rolled or changed
    Invalid {
        defense_type: DefenseType,
        reason: String,
    },
}

impl DefenseResult {
    pub fn outcome(&self) -> Option<&DefenseOutcome> {
        match self {
            DefenseResult::Resolved(outcome) => Some(outcome),
            DefenseResult::Invalid { .. } => None,
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, DefenseResult::Resolved(_))
    }

    pub fn tv(&self) -> Option<i32> {
        self.outcome().map(|o| o.tv)
    }

    pub fn shield_block_rv(&self) -> Option<i32> {
        self.outcome().and_then(DefenseOutcome::shield_block_rv)
    }

    pub fn summary(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for DefenseResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let o = match self {
            DefenseResult::Invalid {
                defense_type,
                reason,
            } => return write!(f, "Invalid {}: {}", defense_type, reason),
            DefenseResult::Resolved(o) => o,
        };

        match o.roll {
            Some(roll) => write!(f, "{}: TV {} (AS {} + roll {})", o.defense_type, o.tv, o.ability_score, roll)?,
            None => write!(f, "{}: TV {}", o.defense_type, o.tv)?,
        }
        if let Some(block) = o.shield_block {
            match block.rv {
                Some(rv) => write!(f, ". Shield block succeeded (RV {})", rv)?,
                None => write!(f, ". Shield block failed")?,
            }
        }
        if o.concentration_broken {
            write!(f, ". Concentration broken")?;
        } else if o.concentration.is_some() {
            write!(f, ". Concentration held")?;
        }
        Ok(())
    }
}

/// Resolves defenses
#[derive(Debug, Clone)]
pub struct DefenseResolver {
    constants: CombatConstants,
}

impl Default for DefenseResolver {
    fn default() -> Self {
        Self::with_constants(constants().clone())
    }
}

impl DefenseResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_constants(constants: CombatConstants) -> Self {
        DefenseResolver { constants }
    }

    pub fn passive_tv(&self, dodge_as: i32) -> i32 {
        dodge_as - self.constants.defense.passive_offset
    }

    /// Resolve a defense for a defender who is not concentrating
    pub fn resolve(&self, request: &DefenseRequest, dice: &mut impl RandomSource) -> DefenseResult {
        self.resolve_inner(request, None, dice)
    }

    /// Resolve a defense, checking or breaking the defender's concentration
    pub fn resolve_concentrating(
        &self,
        request: &DefenseRequest,
        defender: &mut dyn Concentration,
        dice: &mut impl RandomSource,
    ) -> DefenseResult {
        self.resolve_inner(request, Some(defender), dice)
    }

    /// Resolve the primary defense, then a shield block at the same TV when a
    /// shield AS is given
    pub fn resolve_with_shield(
        &self,
        primary: &DefenseRequest,
        shield_as: Option<i32>,
        dice: &mut impl RandomSource,
    ) -> DefenseResult {
        let mut result = self.resolve(primary, dice);
        if let (DefenseResult::Resolved(outcome), Some(shield_as)) = (&mut result, shield_as) {
            if outcome.shield_block.is_none() {
                outcome.shield_block = Some(self.roll_shield_block(shield_as, dice));
            }
        }
        result
    }

    pub fn roll_shield_block(&self, shield_as: i32, dice: &mut impl RandomSource) -> ShieldBlock {
        let roll = dice.roll_open_ended();
        let total = shield_as + roll;
        let block_tv = self.constants.checks.shield_block_tv;
        let succeeded = total >= block_tv;
        tracing::debug!(shield_as, roll, total, succeeded, "shield block");
        ShieldBlock {
            ability_score: shield_as,
            roll,
            total,
            succeeded,
            rv: succeeded.then_some(total - block_tv),
        }
    }

    fn resolve_inner(
        &self,
        request: &DefenseRequest,
        mut defender: Option<&mut dyn Concentration>,
        dice: &mut impl RandomSource,
    ) -> DefenseResult {
        if request.defense_type == DefenseType::Parry && request.is_ranged_attack {
            tracing::debug!("parry rejected against ranged attack");
            return DefenseResult::Invalid {
                defense_type: DefenseType::Parry,
                reason: PARRY_RANGED.to_string(),
            };
        }

        let concentrating = defender.as_ref().is_some_and(|d| d.is_concentrating());
        let mut outcome = DefenseOutcome {
            defense_type: request.defense_type,
            ability_score: request.ability_score,
            roll: None,
            tv: self.passive_tv(request.dodge_as),
            costs_action: false,
            concentration: None,
            concentration_broken: false,
            shield_block: None,
        };

        match request.defense_type {
            DefenseType::Passive => {
                if let (true, Some(incoming), Some(d)) = (concentrating, request.incoming, defender.as_mut()) {
                    let check = check_concentration(incoming, &mut **d, &self.constants.concentration, dice);
                    outcome.concentration_broken = check.concentration_broken;
                    outcome.concentration = Some(check);
                }
            }
            DefenseType::Dodge | DefenseType::Parry => {
                if let (true, Some(d)) = (concentrating, defender.as_mut()) {
                    d.break_concentration(BROKEN_ACTIVE_DEFENSE);
                    outcome.concentration_broken = true;
                }
                let roll = dice.roll_open_ended();
                outcome.roll = Some(roll);
                outcome.tv = request.ability_score + roll;
                outcome.costs_action = !(request.defense_type == DefenseType::Parry && request.in_parry_mode);
            }
            DefenseType::ShieldBlock => {
                outcome.shield_block = Some(self.roll_shield_block(request.ability_score, dice));
            }
        }

        tracing::debug!(
            defense = %outcome.defense_type,
            tv = outcome.tv,
            costs_action = outcome.costs_action,
            concentration_broken = outcome.concentration_broken,
            "defense resolved"
        );
        DefenseResult::Resolved(outcome)
    }
}

/// Resolve a defense using thread-local dice
pub fn resolve_defense(request: &DefenseRequest) -> DefenseResult {
    let mut dice = RngDice::thread_local();
    resolve_defense_with_dice(request, &mut dice)
}

pub fn resolve_defense_with_dice(request: &DefenseRequest, dice: &mut impl RandomSource) -> DefenseResult {
    DefenseResolver::new().resolve(request, dice)
}

/// Resolve a defense plus an optional shield block using thread-local dice
pub fn resolve_defense_with_shield(primary: &DefenseRequest, shield_as: Option<i32>) -> DefenseResult {
    let mut dice = RngDice::thread_local();
    resolve_defense_with_shield_and_dice(primary, shield_as, &mut dice)
}

pub fn resolve_defense_with_shield_and_dice(
    primary: &DefenseRequest,
    shield_as: Option<i32>,
    dice: &mut impl RandomSource,
) -> DefenseResult {
    DefenseResolver::new().resolve_with_shield(primary, shield_as, dice)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ensure_constants_initialized;
    use crate::dice::ScriptedDice;

    fn setup() -> DefenseResolver {
        ensure_constants_initialized();
        DefenseResolver::new()
    }

    fn resolved(result: DefenseResult) -> DefenseOutcome {
        match result {
            DefenseResult::Resolved(outcome) => outcome,
            other => panic!("expected resolved defense, got {other:?}"),
        }
    }

    #[test]
    fn test_passive_has_no_roll_or_cost() {
        let resolver = setup();
        let mut dice = ScriptedDice::new();
        let outcome = resolved(resolver.resolve(&DefenseRequest::passive(11), &mut dice));
        assert_eq!(outcome.tv, 10);
        assert_eq!(outcome.roll, None);
        assert!(!outcome.costs_action);
        assert_eq!(dice.open_ended_calls(), 0);
    }

    #[test]
    fn test_dodge_rolls_and_costs_action() {
        let resolver = setup();
        let mut dice = ScriptedDice::new().with_open_ended([3]);
        let outcome = resolved(resolver.resolve(&DefenseRequest::dodge(9), &mut dice));
        assert_eq!(outcome.tv, 12);
        assert_eq!(outcome.roll, Some(3));
        assert!(outcome.costs_action);
    }

    #[test]
    fn test_parry_free_in_parry_mode() {
        let resolver = setup();
        let mut dice = ScriptedDice::new().with_open_ended([0, 0]);
        let first = resolved(resolver.resolve(&DefenseRequest::parry(10), &mut dice));
        assert!(first.costs_action);
        let again = resolved(resolver.resolve(&DefenseRequest::parry(10).in_parry_mode(), &mut dice));
        assert!(!again.costs_action);
        assert_eq!(again.tv, 10);
    }

    #[test]
    fn test_parry_against_ranged_is_invalid() {
        let resolver = setup();
        let mut state = ConcentrationState::concentrating(Some(10));
        let mut dice = ScriptedDice::new();
        let result = resolver.resolve_concentrating(
            &DefenseRequest::parry(12).against_ranged(),
            &mut state,
            &mut dice,
        );
        assert_eq!(
            result,
            DefenseResult::Invalid {
                defense_type: DefenseType::Parry,
                reason: "Cannot parry ranged attacks".to_string(),
            }
        );
        assert!(result.tv().is_none());
        // Untouched
        assert!(state.concentrating);
        assert_eq!(dice.open_ended_calls(), 0);
    }

    #[test]
    fn test_dodge_against_ranged_is_allowed() {
        let resolver = setup();
        let mut dice = ScriptedDice::new().with_open_ended([0]);
        assert!(resolver
            .resolve(&DefenseRequest::dodge(8).against_ranged(), &mut dice)
            .is_valid());
    }

    #[test]
    fn test_shield_block_keeps_passive_tv() {
        let resolver = setup();
        let mut dice = ScriptedDice::new().with_open_ended([2]);
        let outcome = resolved(resolver.resolve(&DefenseRequest::shield_block(9, 10), &mut dice));
        assert_eq!(outcome.tv, 9);
        assert!(!outcome.costs_action);
        // 9 + 2 = 11 >= 8
        assert_eq!(outcome.shield_block_rv(), Some(3));
    }

    #[test]
    fn test_failed_shield_block_reports_no_rv() {
        let resolver = setup();
        let mut dice = ScriptedDice::new().with_open_ended([-2]);
        let block = resolver.roll_shield_block(9, &mut dice);
        assert!(!block.succeeded);
        assert_eq!(block.total, 7);
        assert_eq!(block.rv, None);
    }

    #[test]
    fn test_shield_block_at_exact_baseline() {
        let resolver = setup();
        let mut dice = ScriptedDice::new().with_open_ended([0]);
        assert_eq!(resolver.roll_shield_block(8, &mut dice).rv, Some(0));
    }

    #[test]
    fn test_resolve_with_shield_keeps_primary_tv() {
        let resolver = setup();
        // Dodge roll 1, shield roll 1
        let mut dice = ScriptedDice::new().with_open_ended([1, 1]);
        let result = resolver.resolve_with_shield(&DefenseRequest::dodge(10), Some(12), &mut dice);
        assert_eq!(result.tv(), Some(11));
        assert_eq!(result.shield_block_rv(), Some(5));
        assert!(result.summary().contains("Shield block succeeded"));
    }

    #[test]
    fn test_resolve_with_shield_skips_invalid_primary() {
        let resolver = setup();
        let mut dice = ScriptedDice::new();
        let result =
            resolver.resolve_with_shield(&DefenseRequest::parry(10).against_ranged(), Some(12), &mut dice);
        assert!(!result.is_valid());
        assert_eq!(dice.open_ended_calls(), 0);
    }

    #[test]
    fn test_resolve_with_shield_without_shield() {
        let resolver = setup();
        let mut dice = ScriptedDice::new();
        let result = resolver.resolve_with_shield(&DefenseRequest::passive(10), None, &mut dice);
        assert_eq!(result.shield_block_rv(), None);
        assert_eq!(result.outcome().and_then(|o| o.shield_block), None);
    }

    #[test]
    fn test_passive_concentration_check_held() {
        let resolver = setup();
        let mut state = ConcentrationState::concentrating(Some(14));
        let mut dice = ScriptedDice::new().with_open_ended([0]);
        // Focus 14 - 3 = 11 vs AV 11
        let request = DefenseRequest::passive(10).with_incoming(11, 6);
        let outcome = resolved(resolver.resolve_concentrating(&request, &mut state, &mut dice));
        let check = outcome.concentration.expect("check ran");
        assert_eq!(check.penalty, -3);
        assert!(check.succeeded);
        assert!(!outcome.concentration_broken);
        assert!(state.concentrating);
        assert_eq!(outcome.tv, 9);
    }

    #[test]
    fn test_passive_concentration_check_failed() {
        let resolver = setup();
        let mut state = ConcentrationState::concentrating(Some(8));
        let mut dice = ScriptedDice::new().with_open_ended([-1]);
        let request = DefenseRequest::passive(10).with_incoming(12, 2);
        let outcome = resolved(resolver.resolve_concentrating(&request, &mut state, &mut dice));
        assert!(outcome.concentration_broken);
        assert!(!state.concentrating);
        assert!(DefenseResult::Resolved(outcome).summary().contains("Concentration broken"));
    }

    #[test]
    fn test_passive_without_incoming_runs_no_check() {
        let resolver = setup();
        let mut state = ConcentrationState::concentrating(Some(8));
        let mut dice = ScriptedDice::new();
        let outcome = resolved(resolver.resolve_concentrating(&DefenseRequest::passive(10), &mut state, &mut dice));
        assert_eq!(outcome.concentration, None);
        assert!(state.concentrating);
    }

    #[test]
    fn test_not_concentrating_runs_no_check() {
        let resolver = setup();
        let mut state = ConcentrationState::default();
        let mut dice = ScriptedDice::new();
        let request = DefenseRequest::passive(10).with_incoming(20, 10);
        let outcome = resolved(resolver.resolve_concentrating(&request, &mut state, &mut dice));
        assert_eq!(outcome.concentration, None);
        assert_eq!(dice.open_ended_calls(), 0);
    }

    #[test]
    fn test_dodge_breaks_concentration_without_check() {
        let resolver = setup();
        let mut state = ConcentrationState::concentrating(Some(20));
        let mut dice = ScriptedDice::new().with_open_ended([0]);
        let request = DefenseRequest::dodge(10).with_incoming(5, 0);
        let outcome = resolved(resolver.resolve_concentrating(&request, &mut state, &mut dice));
        assert!(outcome.concentration_broken);
        assert_eq!(outcome.concentration, None);
        assert_eq!(state.broken_reason.as_deref(), Some("Active defense"));
        // Only the dodge roll
        assert_eq!(dice.open_ended_calls(), 1);
    }

    #[test]
    fn test_free_functions() {
        setup();
        let mut dice = ScriptedDice::new().with_open_ended([0, 4]);
        let result = resolve_defense_with_shield_and_dice(&DefenseRequest::dodge(7), Some(6), &mut dice);
        assert_eq!(result.tv(), Some(7));
        assert_eq!(result.shield_block_rv(), Some(2));

        let result = resolve_defense(&DefenseRequest::passive(6));
        assert_eq!(result.tv(), Some(5));
    }
}
