//! Speed-ordered turn resolution.

use std::cmp::Reverse;

use crate::env::RandomSource;

/// One actor waiting for its turn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TurnSlot {
    pub unit_id: String,
    pub speed: i32,
}

/// Orders actors by speed, fastest first.
///
/// Every actor draws a tie-break key from `rng` in input order, so equal
/// speeds resolve by the seeded stream rather than by roster position.
pub fn speed_order<R: RandomSource + ?Sized>(slots: Vec<TurnSlot>, rng: &mut R) -> Vec<String> {
    let mut keyed: Vec<(TurnSlot, u32, usize)> = slots
        .into_iter()
        .enumerate()
        .map(|(index, slot)| (slot, rng.next_u32(), index))
        .collect();
    keyed.sort_by_key(|(slot, key, index)| (Reverse(slot.speed), Reverse(*key), *index));
    keyed.into_iter().map(|(slot, _, _)| slot.unit_id).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::SeededRng;

    fn slot(id: &str, speed: i32) -> TurnSlot {
        TurnSlot {
            unit_id: id.to_string(),
            speed,
        }
    }

    #[test]
    fn faster_units_act_first() {
        let mut rng = SeededRng::new(1);
        let order = speed_order(vec![slot("slow", 3), slot("fast", 20), slot("mid", 9)], &mut rng);
        assert_eq!(order, vec!["fast", "mid", "slow"]);
    }

    #[test]
    fn ties_follow_the_seed_not_the_roster() {
        let roster = || (0..8).map(|i| slot(&format!("u{i}"), 10)).collect::<Vec<_>>();
        let orders: Vec<Vec<String>> = (0..16)
            .map(|seed| speed_order(roster(), &mut SeededRng::new(seed)))
            .collect();

        assert_eq!(orders[3], speed_order(roster(), &mut SeededRng::new(3)));
        let roster_order: Vec<String> = roster().into_iter().map(|s| s.unit_id).collect();
        assert!(orders.iter().any(|o| *o != roster_order));
        assert!(orders.iter().any(|o| *o != orders[0]));
    }
}
