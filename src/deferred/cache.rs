//! Deferred per-player modifiers and the hooks that consume them.
//!
//! Effects write promises into the cache ("next question is skipped",
//! "next damage is doubled"). The outer game loop calls one hook at each
//! integration point and every hook removes what it applies, so a promise
//! is fulfilled exactly once.

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::PlayerId;

/// Question type a card can force for a player's next question.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuestionType {
    /// Idiom chain: continue the chain from the previous idiom.
    IdiomChain,
    /// True/false judgement.
    TrueFalse,
}

impl QuestionType {
    /// Stable tag used by question generators.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            QuestionType::IdiomChain => "IdiomChain",
            QuestionType::TrueFalse => "TrueFalse",
        }
    }
}

impl std::fmt::Display for QuestionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

/// Outcome of the question-start hook.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuestionStart {
    /// Skip this question: show nothing, consume no time.
    Skip,
    /// Ask the question; `answerer` is who actually answers it.
    Answer { answerer: PlayerId },
}

/// One-shot modifiers waiting for their hook.
///
/// ## Example
///
/// ```
/// use quiz_cards::core::PlayerId;
/// use quiz_cards::deferred::DeferredStateCache;
///
/// let mut cache = DeferredStateCache::new();
/// cache.set_damage_multiplier(2.0);
///
/// assert_eq!(cache.on_damage_calculating(10), 20);
/// assert_eq!(cache.on_damage_calculating(10), 10);
///
/// let p = PlayerId::new(1);
/// cache.set_time_bonus(p, 5.0);
/// assert_eq!(cache.on_timer_starting(p, 30.0), 35.0);
/// assert_eq!(cache.on_timer_starting(p, 30.0), 30.0);
/// ```
#[derive(Clone, Debug)]
pub struct DeferredStateCache {
    time_bonus: FxHashMap<PlayerId, f32>,
    time_penalty: FxHashMap<PlayerId, f32>,
    skip: FxHashSet<PlayerId>,
    forced_type: FxHashMap<PlayerId, QuestionType>,
    answer_delegate: FxHashMap<PlayerId, PlayerId>,
    extra_hint: FxHashSet<PlayerId>,
    damage_multiplier: f32,
}

impl Default for DeferredStateCache {
    fn default() -> Self {
        Self {
            time_bonus: FxHashMap::default(),
            time_penalty: FxHashMap::default(),
            skip: FxHashSet::default(),
            forced_type: FxHashMap::default(),
            answer_delegate: FxHashMap::default(),
            extra_hint: FxHashSet::default(),
            damage_multiplier: 1.0,
        }
    }
}

impl DeferredStateCache {
    /// Create an empty cache with a neutral damage multiplier.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // === Writers (used by effects) ===

    /// Extra seconds for the player's next timer. Overwrites.
    pub fn set_time_bonus(&mut self, player: PlayerId, seconds: f32) {
        debug!(%player, seconds, "time bonus pending");
        self.time_bonus.insert(player, seconds);
    }

    /// Seconds removed from the player's next timer. Overwrites.
    pub fn set_time_penalty(&mut self, player: PlayerId, seconds: f32) {
        debug!(%player, seconds, "time penalty pending");
        self.time_penalty.insert(player, seconds);
    }

    /// Skip the player's next question.
    pub fn set_skip(&mut self, player: PlayerId) {
        debug!(%player, "skip pending");
        self.skip.insert(player);
    }

    /// Force the type of the player's next question. Overwrites.
    pub fn force_question_type(&mut self, player: PlayerId, question_type: QuestionType) {
        debug!(%player, %question_type, "question type forced");
        self.forced_type.insert(player, question_type);
    }

    /// Let `delegate` answer the player's next question. Overwrites.
    pub fn set_answer_delegate(&mut self, player: PlayerId, delegate: PlayerId) {
        debug!(%player, %delegate, "answer delegate pending");
        self.answer_delegate.insert(player, delegate);
    }

    /// Flag the player for an extra hint.
    ///
    /// No hook consumes this flag; question UIs may consult it through
    /// `has_extra_hint`.
    pub fn grant_extra_hint(&mut self, player: PlayerId) {
        debug!(%player, "extra hint granted");
        self.extra_hint.insert(player);
    }

    /// Multiplier for the next damage calculation. Overwrites, does not stack.
    pub fn set_damage_multiplier(&mut self, multiplier: f32) {
        debug!(multiplier, "damage multiplier pending");
        self.damage_multiplier = multiplier;
    }

    // === Read-only queries ===

    /// Pending time bonus.
    #[must_use]
    pub fn time_bonus(&self, player: PlayerId) -> Option<f32> {
        self.time_bonus.get(&player).copied()
    }

    /// Pending time penalty.
    #[must_use]
    pub fn time_penalty(&self, player: PlayerId) -> Option<f32> {
        self.time_penalty.get(&player).copied()
    }

    /// Is a skip pending?
    #[must_use]
    pub fn is_skip_pending(&self, player: PlayerId) -> bool {
        self.skip.contains(&player)
    }

    /// Pending forced question type.
    #[must_use]
    pub fn forced_question_type(&self, player: PlayerId) -> Option<QuestionType> {
        self.forced_type.get(&player).copied()
    }

    /// Pending answer delegate.
    #[must_use]
    pub fn answer_delegate(&self, player: PlayerId) -> Option<PlayerId> {
        self.answer_delegate.get(&player).copied()
    }

    /// Does the player hold an extra hint?
    #[must_use]
    pub fn has_extra_hint(&self, player: PlayerId) -> bool {
        self.extra_hint.contains(&player)
    }

    /// Current damage multiplier (1.0 when none is pending).
    #[must_use]
    pub fn damage_multiplier(&self) -> f32 {
        self.damage_multiplier
    }

    // === Hooks (called by the game loop) ===

    /// Before a question timer starts: `base + bonus - penalty`.
    ///
    /// Both entries are removed. With neither present `base` is returned
    /// unchanged.
    pub fn on_timer_starting(&mut self, player: PlayerId, base: f32) -> f32 {
        let bonus = self.time_bonus.remove(&player);
        let penalty = self.time_penalty.remove(&player);
        if bonus.is_none() && penalty.is_none() {
            return base;
        }

        let limit = base + bonus.unwrap_or(0.0) - penalty.unwrap_or(0.0);
        debug!(%player, base, limit, "time adjustment applied");
        limit
    }

    /// Before a question begins.
    ///
    /// A pending skip wins and is removed; the delegate (if any) is left for
    /// the next question. Otherwise a pending delegate is removed and becomes
    /// the answerer.
    pub fn on_question_starting(&mut self, player: PlayerId) -> QuestionStart {
        if self.skip.remove(&player) {
            debug!(%player, "question skipped");
            return QuestionStart::Skip;
        }

        match self.answer_delegate.remove(&player) {
            Some(answerer) => {
                debug!(%player, %answerer, "question delegated");
                QuestionStart::Answer { answerer }
            }
            None => QuestionStart::Answer { answerer: player },
        }
    }

    /// Before the question type is chosen. `None` means choose normally.
    pub fn on_question_type_selecting(&mut self, player: PlayerId) -> Option<QuestionType> {
        let forced = self.forced_type.remove(&player)?;
        debug!(%player, question_type = %forced, "forced question type applied");
        Some(forced)
    }

    /// Before damage is finalized: apply and reset a pending multiplier.
    pub fn on_damage_calculating(&mut self, raw: i32) -> i32 {
        if self.damage_multiplier == 1.0 {
            return raw;
        }

        let multiplier = std::mem::replace(&mut self.damage_multiplier, 1.0);
        let damage = (raw as f32 * multiplier).round() as i32;
        debug!(raw, multiplier, damage, "damage multiplier applied");
        damage
    }

    // === Maintenance ===

    /// Drop every pending entry for one player.
    pub fn clear_player(&mut self, player: PlayerId) {
        self.time_bonus.remove(&player);
        self.time_penalty.remove(&player);
        self.skip.remove(&player);
        self.forced_type.remove(&player);
        self.answer_delegate.remove(&player);
        self.extra_hint.remove(&player);
        debug!(%player, "deferred state cleared");
    }

    /// Drop everything and reset the multiplier.
    pub fn clear_all(&mut self) {
        *self = Self::default();
        debug!("all deferred state cleared");
    }

    /// Is nothing pending?
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.summary().pending() == 0 && self.damage_multiplier == 1.0
    }

    /// Entry counts for status output.
    #[must_use]
    pub fn summary(&self) -> DeferredSummary {
        DeferredSummary {
            time_bonuses: self.time_bonus.len(),
            time_penalties: self.time_penalty.len(),
            skips: self.skip.len(),
            forced_types: self.forced_type.len(),
            answer_delegates: self.answer_delegate.len(),
            extra_hints: self.extra_hint.len(),
            damage_multiplier: self.damage_multiplier,
        }
    }
}

/// Counts of pending deferred entries.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DeferredSummary {
    pub time_bonuses: usize,
    pub time_penalties: usize,
    pub skips: usize,
    pub forced_types: usize,
    pub answer_delegates: usize,
    pub extra_hints: usize,
    pub damage_multiplier: f32,
}

impl DeferredSummary {
    /// Total per-player entries.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.time_bonuses
            + self.time_penalties
            + self.skips
            + self.forced_types
            + self.answer_delegates
            + self.extra_hints
    }
}

impl std::fmt::Display for DeferredSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "time bonuses: {}", self.time_bonuses)?;
        writeln!(f, "time penalties: {}", self.time_penalties)?;
        writeln!(f, "skips: {}", self.skips)?;
        writeln!(f, "forced question types: {}", self.forced_types)?;
        writeln!(f, "answer delegates: {}", self.answer_delegates)?;
        writeln!(f, "extra hints: {}", self.extra_hints)?;
        write!(f, "damage multiplier: {}", self.damage_multiplier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(n: u32) -> PlayerId {
        PlayerId::new(n)
    }

    #[test]
    fn test_timer_bonus_and_penalty() {
        let mut cache = DeferredStateCache::new();
        cache.set_time_bonus(p(1), 5.0);
        cache.set_time_penalty(p(1), 3.0);

        assert_eq!(cache.on_timer_starting(p(1), 20.0), 22.0);
        assert_eq!(cache.time_bonus(p(1)), None);
        assert_eq!(cache.time_penalty(p(1)), None);
        assert_eq!(cache.on_timer_starting(p(1), 20.0), 20.0);
    }

    #[test]
    fn test_timer_entries_cancel_out_still_consumed() {
        let mut cache = DeferredStateCache::new();
        cache.set_time_bonus(p(1), 3.0);
        cache.set_time_penalty(p(1), 3.0);

        assert_eq!(cache.on_timer_starting(p(1), 10.0), 10.0);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_time_writes_overwrite() {
        let mut cache = DeferredStateCache::new();
        cache.set_time_bonus(p(1), 5.0);
        cache.set_time_bonus(p(1), 5.0);
        assert_eq!(cache.on_timer_starting(p(1), 10.0), 15.0);
    }

    #[test]
    fn test_timer_is_per_player() {
        let mut cache = DeferredStateCache::new();
        cache.set_time_penalty(p(2), 3.0);

        assert_eq!(cache.on_timer_starting(p(1), 10.0), 10.0);
        assert_eq!(cache.time_penalty(p(2)), Some(3.0));
        assert_eq!(cache.on_timer_starting(p(2), 10.0), 7.0);
    }

    #[test]
    fn test_skip_takes_priority_over_delegate() {
        let mut cache = DeferredStateCache::new();
        cache.set_skip(p(1));
        cache.set_answer_delegate(p(1), p(2));

        assert_eq!(cache.on_question_starting(p(1)), QuestionStart::Skip);
        assert_eq!(
            cache.on_question_starting(p(1)),
            QuestionStart::Answer { answerer: p(2) }
        );
        assert_eq!(
            cache.on_question_starting(p(1)),
            QuestionStart::Answer { answerer: p(1) }
        );
    }

    #[test]
    fn test_forced_question_type_consumed_once() {
        let mut cache = DeferredStateCache::new();
        cache.force_question_type(p(1), QuestionType::IdiomChain);
        cache.force_question_type(p(1), QuestionType::TrueFalse);

        assert_eq!(cache.on_question_type_selecting(p(1)), Some(QuestionType::TrueFalse));
        assert_eq!(cache.on_question_type_selecting(p(1)), None);
    }

    #[test]
    fn test_damage_multiplier_consumed_once() {
        let mut cache = DeferredStateCache::new();
        assert_eq!(cache.on_damage_calculating(10), 10);

        cache.set_damage_multiplier(2.0);
        assert_eq!(cache.on_damage_calculating(10), 20);
        assert_eq!(cache.damage_multiplier(), 1.0);
        assert_eq!(cache.on_damage_calculating(10), 10);
    }

    #[test]
    fn test_damage_multiplier_rounds() {
        let mut cache = DeferredStateCache::new();
        cache.set_damage_multiplier(1.5);
        assert_eq!(cache.on_damage_calculating(3), 5);

        cache.set_damage_multiplier(0.5);
        assert_eq!(cache.on_damage_calculating(3), 2);
    }

    #[test]
    fn test_damage_multiplier_overwrites() {
        let mut cache = DeferredStateCache::new();
        cache.set_damage_multiplier(2.0);
        cache.set_damage_multiplier(3.0);
        assert_eq!(cache.on_damage_calculating(10), 30);
    }

    #[test]
    fn test_extra_hint_not_consumed() {
        let mut cache = DeferredStateCache::new();
        cache.grant_extra_hint(p(1));

        cache.on_question_starting(p(1));
        assert!(cache.has_extra_hint(p(1)));
        assert!(!cache.has_extra_hint(p(2)));
    }

    #[test]
    fn test_clear_player() {
        let mut cache = DeferredStateCache::new();
        cache.set_skip(p(1));
        cache.set_time_bonus(p(1), 5.0);
        cache.grant_extra_hint(p(1));
        cache.set_skip(p(2));

        cache.clear_player(p(1));
        assert!(!cache.is_skip_pending(p(1)));
        assert!(!cache.has_extra_hint(p(1)));
        assert!(cache.is_skip_pending(p(2)));
        assert_eq!(cache.summary().pending(), 1);
    }

    #[test]
    fn test_clear_all() {
        let mut cache = DeferredStateCache::new();
        cache.set_skip(p(1));
        cache.set_damage_multiplier(2.0);

        cache.clear_all();
        assert!(cache.is_empty());
        assert_eq!(cache.damage_multiplier(), 1.0);
    }

    #[test]
    fn test_summary() {
        let mut cache = DeferredStateCache::new();
        cache.set_time_bonus(p(1), 5.0);
        cache.set_time_penalty(p(2), 3.0);
        cache.force_question_type(p(1), QuestionType::IdiomChain);
        cache.set_damage_multiplier(2.0);

        let summary = cache.summary();
        assert_eq!(summary.time_bonuses, 1);
        assert_eq!(summary.time_penalties, 1);
        assert_eq!(summary.forced_types, 1);
        assert_eq!(summary.pending(), 3);

        let text = summary.to_string();
        assert!(text.contains("time bonuses: 1"));
        assert!(text.ends_with("damage multiplier: 2"));
    }

    #[test]
    fn test_question_type_tags() {
        assert_eq!(QuestionType::IdiomChain.to_string(), "IdiomChain");
        assert_eq!(QuestionType::TrueFalse.tag(), "TrueFalse");
    }
}
