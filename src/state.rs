//! Economic model: the mutable numeric state every other module reads or mutates.

/// Starting fall speed of a raindrop (pixels per second in the host renderer).
pub const BASE_FALL_SPEED: f64 = 300.0;

/// Drops the bowl needs before it converts into currency.
pub const BASE_DROPS_TO_FILL: u32 = 50;

/// Currency paid out per bowl conversion before any upgrade.
pub const BASE_CURRENCY_PER_CONVERSION: u64 = 1;

/// Full economic state of a Storm Idle session.
///
/// Created with defaults at session start, or overwritten wholesale by
/// [`crate::save::load`]. Upgrade effects are the only other writers besides
/// the accumulation tick.
#[derive(Clone, Debug, PartialEq)]
pub struct GameState {
    /// Spendable currency.
    pub currency: u64,
    /// Speed raindrops fall at. Purely visual, but persisted.
    pub fall_speed: f64,
    /// Drops required per bowl conversion. Never below 1.
    pub drops_to_fill: u32,
    /// Auto-generated drops per second.
    pub rps: f64,
    /// Passive currency per second.
    pub cps: f64,
    /// Currency earned per bowl conversion. Never below 1.
    pub currency_per_conversion: u64,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    pub fn new() -> Self {
        Self {
            currency: 0,
            fall_speed: BASE_FALL_SPEED,
            drops_to_fill: BASE_DROPS_TO_FILL,
            rps: 0.0,
            cps: 0.0,
            currency_per_conversion: BASE_CURRENCY_PER_CONVERSION,
        }
    }

    /// Deduct `cost` if affordable. Returns false and leaves currency untouched otherwise.
    pub fn try_spend(&mut self, cost: u64) -> bool {
        if self.currency < cost {
            return false;
        }
        self.currency -= cost;
        true
    }

    /// Add currency, saturating instead of wrapping.
    pub fn earn(&mut self, amount: u64) {
        self.currency = self.currency.saturating_add(amount);
    }

    /// Pull every field back inside its valid range.
    ///
    /// Returns the names of the fields that had to be corrected so callers can
    /// report them. Corrections are a sign of corrupt data or a bug upstream.
    pub fn sanitize(&mut self) -> Vec<&'static str> {
        let mut fixed = Vec::new();
        if !self.fall_speed.is_finite() || self.fall_speed <= 0.0 {
            self.fall_speed = BASE_FALL_SPEED;
            fixed.push("fallSpeed");
        }
        if self.drops_to_fill == 0 {
            self.drops_to_fill = 1;
            fixed.push("dropsToFill");
        }
        if !self.rps.is_finite() || self.rps < 0.0 {
            self.rps = 0.0;
            fixed.push("rps");
        }
        if !self.cps.is_finite() || self.cps < 0.0 {
            self.cps = 0.0;
            fixed.push("cps");
        }
        if self.currency_per_conversion == 0 {
            self.currency_per_conversion = 1;
            fixed.push("currencyEarned");
        }
        fixed
    }
}
