//! Final utility per portfolio and selection of the optimal portfolio

use serde::{Deserialize, Serialize};

/// Terminal cumulative utility per portfolio, in first-declared order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinalUtilityMap {
    entries: Vec<(String, f64)>,
}

impl FinalUtilityMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a portfolio's score. Re-inserting an id overwrites its score but
    /// keeps its original position.
    pub fn insert(&mut self, portfolio_id: impl Into<String>, utility: f64) {
        let portfolio_id = portfolio_id.into();
        match self.entries.iter_mut().find(|(id, _)| *id == portfolio_id) {
            Some((_, existing)) => *existing = utility,
            None => self.entries.push((portfolio_id, utility)),
        }
    }

    pub fn get(&self, portfolio_id: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(id, _)| id == portfolio_id)
            .map(|&(_, utility)| utility)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(id, utility)| (id.as_str(), *utility))
    }
}

impl FromIterator<(String, f64)> for FinalUtilityMap {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (id, utility) in iter {
            map.insert(id, utility);
        }
        map
    }
}

/// Portfolio with the highest final utility.
///
/// Ties go to the portfolio declared first; `None` only for an empty map.
pub fn select_optimal(final_utilities: &FinalUtilityMap) -> Option<&str> {
    let mut best: Option<(&str, f64)> = None;
    for (id, utility) in final_utilities.iter() {
        match best {
            Some((_, incumbent)) if utility.total_cmp(&incumbent).is_le() => {}
            _ => best = Some((id, utility)),
        }
    }
    best.map(|(id, _)| id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::RUIN_UTILITY;

    #[test]
    fn test_selects_highest_utility() {
        let map: FinalUtilityMap = vec![
            ("A".to_string(), -2.0e-7),
            ("B".to_string(), -1.0e-7),
            ("C".to_string(), -3.0e-7),
        ]
        .into_iter()
        .collect();
        assert_eq!(select_optimal(&map), Some("B"));
    }

    #[test]
    fn test_tie_goes_to_first_declared() {
        let mut map = FinalUtilityMap::new();
        map.insert("Second", -1.0);
        map.insert("First", -1.0);
        map.insert("Third", -5.0);
        assert_eq!(select_optimal(&map), Some("Second"));
    }

    #[test]
    fn test_ruined_portfolio_never_selected_over_solvent_one() {
        let mut map = FinalUtilityMap::new();
        map.insert("Ruined", RUIN_UTILITY);
        map.insert("Solvent", -1.0e6);
        assert_eq!(select_optimal(&map), Some("Solvent"));
    }

    #[test]
    fn test_empty_map() {
        assert_eq!(select_optimal(&FinalUtilityMap::new()), None);
    }

    #[test]
    fn test_reinsert_keeps_position() {
        let mut map = FinalUtilityMap::new();
        map.insert("A", 1.0);
        map.insert("B", 2.0);
        map.insert("A", 3.0);
        assert_eq!(map.len(), 2);
        assert_eq!(map.iter().next(), Some(("A", 3.0)));
        assert_eq!(map.get("B"), Some(2.0));
    }
}
