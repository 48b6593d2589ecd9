//! Team synergy table.
//!
//! | contributing djinn | ATK | DEF | SPD |
//! |--------------------|-----|-----|-----|
//! | 1                  | +4  | +3  |     |
//! | 2 mixed            | +5  | +5  |     |
//! | 2 same             | +8  | +5  |     |
//! | 3 distinct         | +4  | +4  | +4  |
//! | 2 + 1              | +8  | +6  |     |
//! | 3 same             | +12 | +8  |     |
//!
//! For a fixed count, ATK and DEF never decrease as same-element
//! concentration rises.

use std::collections::BTreeMap;

use crate::config::BattleConfig;
use crate::state::{DjinnTracker, Element};
use crate::stats::Stats;

/// Synergy granted by the team's contributing djinn.
///
/// At most [`BattleConfig::MAX_EQUIPPED_DJINN`] djinn count, taken in id order.
pub fn synergy_bonus<'a>(trackers: impl IntoIterator<Item = &'a DjinnTracker>) -> Stats {
    let mut histogram: BTreeMap<Element, usize> = BTreeMap::new();
    for tracker in trackers
        .into_iter()
        .filter(|t| t.state.contributes_synergy())
        .take(BattleConfig::MAX_EQUIPPED_DJINN)
    {
        *histogram.entry(tracker.element).or_default() += 1;
    }
    synergy_for_histogram(&histogram)
}

/// Bonus for an element histogram, as a pure function of its shape.
pub fn synergy_for_histogram(histogram: &BTreeMap<Element, usize>) -> Stats {
    let mut counts: Vec<usize> = histogram.values().copied().filter(|c| *c > 0).collect();
    counts.sort_unstable_by(|a, b| b.cmp(a));

    let (atk, def, spd) = match counts.as_slice() {
        [] => (0, 0, 0),
        [1] => (4, 3, 0),
        [1, 1] => (5, 5, 0),
        [2] => (8, 5, 0),
        [1, 1, 1] => (4, 4, 4),
        [2, 1] => (8, 6, 0),
        [3] => (12, 8, 0),
        _ => (0, 0, 0),
    };
    Stats::new(0, 0, atk, def, 0, spd)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::DjinnState;

    fn tracker(id: &str, element: Element, state: DjinnState) -> DjinnTracker {
        let mut t = DjinnTracker::new(id, element);
        t.state = state;
        t
    }

    #[test]
    fn recovering_djinn_do_not_count() {
        let trackers = [
            tracker("a", Element::Venus, DjinnState::Set),
            tracker("b", Element::Venus, DjinnState::Recovery),
        ];
        assert_eq!(synergy_bonus(&trackers), Stats::new(0, 0, 4, 3, 0, 0));
    }

    #[test]
    fn standby_still_counts() {
        let trackers = [
            tracker("a", Element::Mars, DjinnState::Standby),
            tracker("b", Element::Mars, DjinnState::Set),
        ];
        assert_eq!(synergy_bonus(&trackers), Stats::new(0, 0, 8, 5, 0, 0));
    }

    #[test]
    fn same_element_concentration_never_lowers_atk_or_def() {
        let mixed3 = [
            tracker("a", Element::Venus, DjinnState::Set),
            tracker("b", Element::Mars, DjinnState::Set),
            tracker("c", Element::Jupiter, DjinnState::Set),
        ];
        let pair3 = [
            tracker("a", Element::Venus, DjinnState::Set),
            tracker("b", Element::Venus, DjinnState::Set),
            tracker("c", Element::Jupiter, DjinnState::Set),
        ];
        let same3 = [
            tracker("a", Element::Venus, DjinnState::Set),
            tracker("b", Element::Venus, DjinnState::Set),
            tracker("c", Element::Venus, DjinnState::Set),
        ];
        let bonuses = [
            synergy_bonus(&mixed3),
            synergy_bonus(&pair3),
            synergy_bonus(&same3),
        ];
        assert_eq!(bonuses[0].spd, 4);
        for pair in bonuses.windows(2) {
            assert!(pair[0].atk <= pair[1].atk);
            assert!(pair[0].def <= pair[1].def);
        }
    }

    #[test]
    fn empty_team_has_no_synergy() {
        assert_eq!(synergy_bonus(std::iter::empty()), Stats::ZERO);
    }
}
