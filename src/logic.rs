//! Rainfall economy: drop collection, bowl conversion, auto-rain and passive
//! income. Pure functions over [`GameState`] and [`Rainfall`], fully testable.

use crate::state::GameState;

/// Slack when deciding whether a fractional carry has reached a whole unit.
/// Absorbs float error from summing many small deltas (ten 0.1s frames must
/// add up to a full second).
const CARRY_EPSILON: f64 = 1e-9;

/// Transient per-session accumulators. Not persisted; a fresh session starts
/// with an empty bowl.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Rainfall {
    /// Drops sitting in the bowl, always below `drops_to_fill` after a collect.
    pub drops_collected: u32,
    /// Fractional auto-rain drops not yet produced.
    auto_carry: f64,
    /// Fractional passive currency not yet paid out.
    passive_carry: f64,
}

impl Rainfall {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep the bowl consistent after `drops_to_fill` shrinks: overflowing
    /// drops are dropped so the next collected drop completes the bowl.
    pub fn sync_bowl(&mut self, state: &GameState) {
        let cap = state.drops_to_fill.max(1) - 1;
        if self.drops_collected > cap {
            self.drops_collected = cap;
        }
    }

    pub fn auto_carry(&self) -> f64 {
        self.auto_carry
    }
}

/// What a single [`tick`] produced.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TickOutcome {
    /// Auto-rain drops generated this tick.
    pub drops: u64,
    /// Bowl conversions those drops completed.
    pub conversions: u64,
    /// Currency paid by passive income.
    pub passive_earned: u64,
}

/// Take the whole units out of `carry`, leaving the fraction behind.
fn drain_whole(carry: &mut f64) -> u64 {
    let whole = (*carry + CARRY_EPSILON).floor();
    if whole < 1.0 {
        return 0;
    }
    *carry -= whole;
    whole as u64
}

/// A drop reached the bowl. Returns true if it completed a conversion.
pub fn collect_drop(rain: &mut Rainfall, state: &mut GameState) -> bool {
    collect_drops(rain, state, 1) > 0
}

/// Pour `count` drops into the bowl. Returns how many conversions happened.
pub fn collect_drops(rain: &mut Rainfall, state: &mut GameState, count: u64) -> u64 {
    if count == 0 {
        return 0;
    }
    rain.sync_bowl(state);
    let fill = u64::from(state.drops_to_fill.max(1));
    let total = u64::from(rain.drops_collected).saturating_add(count);
    let conversions = total / fill;
    rain.drops_collected = (total % fill) as u32;
    state.earn(conversions.saturating_mul(state.currency_per_conversion));
    conversions
}

/// Advance auto-rain and passive income by `delta_secs` of real time.
///
/// Fractions carry across calls, so the same total time yields the same
/// drops and currency however it is chunked.
pub fn tick(rain: &mut Rainfall, state: &mut GameState, delta_secs: f64) -> TickOutcome {
    let mut outcome = TickOutcome::default();
    if !delta_secs.is_finite() || delta_secs <= 0.0 {
        return outcome;
    }

    if state.rps > 0.0 {
        rain.auto_carry += state.rps * delta_secs;
        outcome.drops = drain_whole(&mut rain.auto_carry);
        outcome.conversions = collect_drops(rain, state, outcome.drops);
    }

    if state.cps > 0.0 {
        rain.passive_carry += state.cps * delta_secs;
        outcome.passive_earned = drain_whole(&mut rain.passive_carry);
        state.earn(outcome.passive_earned);
    }

    outcome
}

/// Currency earned while away, as `(from_conversion, from_passive)`.
///
/// Uses the rates in `state` for the whole window; upgrades bought partway
/// through a previous session are not tracked historically.
pub fn offline_earnings(state: &GameState, seconds_away: u64) -> (u64, u64) {
    let secs = seconds_away as f64;

    let from_conversion = if state.rps > 0.0 {
        let total_drops = state.rps * secs;
        let conversions = (total_drops / f64::from(state.drops_to_fill.max(1)) + CARRY_EPSILON)
            .floor() as u64;
        conversions.saturating_mul(state.currency_per_conversion)
    } else {
        0
    };

    let from_passive = if state.cps > 0.0 {
        (state.cps * secs + CARRY_EPSILON).floor() as u64
    } else {
        0
    };

    (from_conversion, from_passive)
}
