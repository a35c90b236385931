//! One addressable namespace over every upgrade tree.

use std::collections::HashSet;

use super::{catalog, try_purchase, Category, TreeId, UpgradeTier, UpgradeTree};
use crate::state::GameState;

/// Owns all upgrade trees. Save/load walks [`UpgradeManager::trees`] without
/// knowing about individual categories.
#[derive(Clone, Debug)]
pub struct UpgradeManager {
    trees: Vec<UpgradeTree>,
}

impl Default for UpgradeManager {
    fn default() -> Self {
        Self::new()
    }
}

impl UpgradeManager {
    /// Manager holding the full catalog, nothing purchased.
    pub fn new() -> Self {
        Self::with_trees(catalog::build_all())
    }

    pub fn with_trees(trees: Vec<UpgradeTree>) -> Self {
        Self { trees }
    }

    pub fn trees(&self) -> &[UpgradeTree] {
        &self.trees
    }

    pub fn tree(&self, id: TreeId) -> Option<&UpgradeTree> {
        self.trees.iter().find(|t| t.id == id)
    }

    pub fn tree_mut(&mut self, id: TreeId) -> Option<&mut UpgradeTree> {
        self.trees.iter_mut().find(|t| t.id == id)
    }

    pub fn by_category(&self, category: Category) -> impl Iterator<Item = &UpgradeTree> {
        self.trees
            .iter()
            .filter(move |t| t.id.category() == category)
    }

    /// Look a tier up by its persistence id, e.g. `"value_2"`.
    pub fn find(&self, id: &str) -> Option<&UpgradeTier> {
        let (tree, tier) = id.rsplit_once('_')?;
        let tree = TreeId::parse(tree)?;
        let tier: u32 = tier.parse().ok()?;
        self.tree(tree)?.tiers().iter().find(|t| t.tier == tier)
    }

    /// Buy tier `index` of `tree`. Unknown trees are rejected like bad indices.
    pub fn try_purchase(&mut self, tree: TreeId, index: usize, state: &mut GameState) -> bool {
        match self.tree_mut(tree) {
            Some(t) => try_purchase(t, index, state),
            None => false,
        }
    }

    /// Ids of every purchased tier, tree by tree in tier order.
    pub fn purchased_ids(&self) -> Vec<String> {
        self.trees
            .iter()
            .flat_map(|t| t.tiers().iter())
            .filter(|u| u.purchased)
            .map(|u| u.id())
            .collect()
    }

    /// Flag every tier whose id is in `ids` as purchased. Effects are not
    /// applied. Returns how many tiers were flagged.
    pub fn restore_purchased(&mut self, ids: &HashSet<String>) -> usize {
        let mut restored = 0;
        for tree in &mut self.trees {
            for tier in tree.tiers_mut() {
                if ids.contains(&tier.id()) {
                    tier.purchased = true;
                    restored += 1;
                }
            }
        }
        restored
    }

    /// Prestige hook: clear every purchased flag.
    pub fn reset_purchases(&mut self) {
        for tree in &mut self.trees {
            for tier in tree.tiers_mut() {
                tier.purchased = false;
            }
        }
    }

    pub fn purchased_count(&self) -> usize {
        self.trees.iter().map(|t| t.purchased_count()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn holds_every_tree() {
        let m = UpgradeManager::new();
        for id in TreeId::all() {
            assert!(m.tree(*id).is_some(), "missing {id}");
        }
        assert_eq!(m.trees().len(), TreeId::all().len());
    }

    #[test]
    fn category_grouping() {
        let m = UpgradeManager::new();
        let rain: Vec<TreeId> = m.by_category(Category::Rain).map(|t| t.id).collect();
        assert_eq!(rain, vec![TreeId::Speed, TreeId::Value]);
        let econ: Vec<TreeId> = m.by_category(Category::Econ).map(|t| t.id).collect();
        assert_eq!(econ, vec![TreeId::Conversion, TreeId::Condensation]);
    }

    #[test]
    fn find_by_id() {
        let m = UpgradeManager::new();
        assert_eq!(m.find("auto_3").map(|t| t.name.as_str()), Some("Rain Generation III"));
        assert!(m.find("auto_9").is_none());
        assert!(m.find("nope_1").is_none());
        assert!(m.find("auto").is_none());
    }

    #[test]
    fn purchase_through_manager() {
        let mut m = UpgradeManager::new();
        let mut state = GameState::new();
        state.currency = 5;
        assert!(m.try_purchase(TreeId::Auto, 0, &mut state));
        assert_eq!(state.currency, 0);
        assert!((state.rps - 0.5).abs() < f64::EPSILON);
        assert_eq!(m.purchased_ids(), vec!["auto_1".to_string()]);
    }

    #[test]
    fn restore_flags_without_effects() {
        let mut m = UpgradeManager::new();
        let ids: HashSet<String> = ["speed_1", "speed_2", "bogus_1"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(m.restore_purchased(&ids), 2);
        let speed = m.tree(TreeId::Speed).unwrap();
        assert!(speed.tiers()[0].purchased);
        assert!(speed.tiers()[1].purchased);
        assert!(!speed.tiers()[2].purchased);
    }

    #[test]
    fn reset_clears_everything() {
        let mut m = UpgradeManager::new();
        let mut state = GameState::new();
        state.currency = 1_000;
        assert!(m.try_purchase(TreeId::Speed, 0, &mut state));
        assert!(m.try_purchase(TreeId::Value, 0, &mut state));
        assert_eq!(m.purchased_count(), 2);
        m.reset_purchases();
        assert_eq!(m.purchased_count(), 0);
        assert!(m.purchased_ids().is_empty());
    }
}
