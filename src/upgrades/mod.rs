//! Upgrade trees: tier definitions, gating, and the purchase state machine.
//!
//! Trees are strictly linear. Tier 1 is always unlocked; tier N unlocks once
//! tier N-1 has been purchased. Purchases only ever flip `purchased` from
//! false to true; [`manager::UpgradeManager::reset_purchases`] is the single
//! way back.

pub mod catalog;
pub mod manager;

use crate::state::GameState;

/// Identifies one upgrade tree. The string form is part of the save format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TreeId {
    Speed,
    Value,
    Auto,
    Conversion,
    Condensation,
}

impl TreeId {
    /// All trees in display order.
    pub fn all() -> &'static [TreeId] {
        &[
            TreeId::Speed,
            TreeId::Value,
            TreeId::Auto,
            TreeId::Conversion,
            TreeId::Condensation,
        ]
    }

    /// Identifier used in persisted upgrade ids (`"speed_1"` etc).
    pub fn as_str(&self) -> &'static str {
        match self {
            TreeId::Speed => "speed",
            TreeId::Value => "value",
            TreeId::Auto => "auto",
            TreeId::Conversion => "conversion",
            TreeId::Condensation => "condensation",
        }
    }

    pub fn parse(s: &str) -> Option<TreeId> {
        TreeId::all().iter().copied().find(|t| t.as_str() == s)
    }

    pub fn category(&self) -> Category {
        match self {
            TreeId::Speed | TreeId::Value => Category::Rain,
            TreeId::Auto => Category::Auto,
            TreeId::Conversion | TreeId::Condensation => Category::Econ,
        }
    }
}

impl std::fmt::Display for TreeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Menu grouping of trees.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    Rain,
    Auto,
    Econ,
}

impl Category {
    pub fn all() -> &'static [Category] {
        &[Category::Rain, Category::Auto, Category::Econ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Category::Rain => "Rain",
            Category::Auto => "Auto",
            Category::Econ => "Econ",
        }
    }
}

/// What buying a tier does to the game state.
///
/// Values are fixed when the catalog is authored. `Add*` effects stack,
/// `Set*` effects overwrite with the tier's absolute value.
#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    AddFallSpeed(f64),
    SetDropsToFill(u32),
    AddRps(f64),
    SetCurrencyPerConversion(u64),
    AddCps(f64),
}

impl Effect {
    pub fn apply(&self, state: &mut GameState) {
        match self {
            Effect::AddFallSpeed(delta) => state.fall_speed += delta,
            Effect::SetDropsToFill(value) => state.drops_to_fill = (*value).max(1),
            Effect::AddRps(delta) => state.rps += delta,
            Effect::SetCurrencyPerConversion(value) => {
                state.currency_per_conversion = (*value).max(1)
            }
            Effect::AddCps(delta) => state.cps += delta,
        }
    }
}

/// A single purchasable step in a tree.
#[derive(Clone, Debug)]
pub struct UpgradeTier {
    pub tree: TreeId,
    /// 1-based position within the tree.
    pub tier: u32,
    pub name: String,
    pub description: String,
    pub cost: u64,
    pub effect: Effect,
    pub purchased: bool,
}

impl UpgradeTier {
    pub fn new(
        tree: TreeId,
        tier: u32,
        name: &str,
        description: &str,
        cost: u64,
        effect: Effect,
    ) -> Self {
        Self {
            tree,
            tier,
            name: name.into(),
            description: description.into(),
            cost,
            effect,
            purchased: false,
        }
    }

    /// Persistence id, e.g. `"auto_3"`.
    pub fn id(&self) -> String {
        format!("{}_{}", self.tree.as_str(), self.tier)
    }

    /// Tier 1 is always unlocked; later tiers need the previous one purchased.
    pub fn is_unlocked(&self, previous: Option<&UpgradeTier>) -> bool {
        if self.tier == 1 {
            return true;
        }
        previous.is_some_and(|p| p.purchased)
    }
}

/// Where a tier stands from the player's point of view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TierStatus {
    Purchased,
    Locked,
    Unaffordable,
    Available,
}

/// Ordered tiers of one tree, `tier` ascending from 1 with no gaps.
#[derive(Clone, Debug)]
pub struct UpgradeTree {
    pub id: TreeId,
    tiers: Vec<UpgradeTier>,
}

impl UpgradeTree {
    pub fn new(id: TreeId, tiers: Vec<UpgradeTier>) -> Self {
        debug_assert!(
            tiers
                .iter()
                .enumerate()
                .all(|(i, t)| t.tree == id && t.tier as usize == i + 1),
            "tree {id} must hold its own tiers numbered 1..=n"
        );
        Self { id, tiers }
    }

    pub fn tiers(&self) -> &[UpgradeTier] {
        &self.tiers
    }

    pub fn get(&self, index: usize) -> Option<&UpgradeTier> {
        self.tiers.get(index)
    }

    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }

    /// Tier before `index`, or None for the first tier.
    pub fn previous(&self, index: usize) -> Option<&UpgradeTier> {
        if index == 0 {
            return None;
        }
        self.tiers.get(index - 1)
    }

    pub fn is_unlocked(&self, index: usize) -> bool {
        self.tiers
            .get(index)
            .is_some_and(|t| t.is_unlocked(self.previous(index)))
    }

    /// Status of the tier at `index`, None when out of range.
    pub fn status(&self, index: usize, state: &GameState) -> Option<TierStatus> {
        let tier = self.tiers.get(index)?;
        let status = if tier.purchased {
            TierStatus::Purchased
        } else if !tier.is_unlocked(self.previous(index)) {
            TierStatus::Locked
        } else if state.currency < tier.cost {
            TierStatus::Unaffordable
        } else {
            TierStatus::Available
        };
        Some(status)
    }

    /// First tier not yet purchased, with its index.
    pub fn next_available(&self) -> Option<(usize, &UpgradeTier)> {
        self.tiers.iter().enumerate().find(|(_, t)| !t.purchased)
    }

    pub fn can_afford_next(&self, state: &GameState) -> bool {
        self.next_available()
            .and_then(|(i, _)| self.status(i, state))
            .is_some_and(|s| s == TierStatus::Available)
    }

    pub fn purchased_count(&self) -> usize {
        self.tiers.iter().filter(|t| t.purchased).count()
    }

    pub(crate) fn tiers_mut(&mut self) -> &mut [UpgradeTier] {
        &mut self.tiers
    }
}

/// Try to buy the tier at `index` (0-based). Returns true if successful.
///
/// Rejects out-of-range indices, tiers already owned, locked tiers and
/// unaffordable tiers without touching anything. On success the cost is
/// deducted, the tier is marked purchased, then its effect is applied.
pub fn try_purchase(tree: &mut UpgradeTree, index: usize, state: &mut GameState) -> bool {
    if tree.status(index, state) != Some(TierStatus::Available) {
        return false;
    }
    let tier = &mut tree.tiers[index];
    if !state.try_spend(tier.cost) {
        return false;
    }
    tier.purchased = true;
    tier.effect.apply(state);
    log::debug!("purchased {} for {}", tier.id(), tier.cost);
    true
}
