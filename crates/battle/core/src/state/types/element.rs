//! Elemental affinities and the advantage cycle.

/// One of the five symbolic elements carried by units, abilities and djinn.
///
/// The four primary elements form an advantage cycle
/// `Venus → Jupiter → Mercury → Mars → Venus`: each element deals bonus
/// psynergy damage to the next one. `Neutral` sits outside the cycle.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::AsRefStr,
)]
#[strum(ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Element {
    Venus,
    Mars,
    Mercury,
    Jupiter,
    #[default]
    Neutral,
}

impl Element {
    /// Psynergy multiplier when attacking with an advantaged element.
    pub const ADVANTAGE_MULTIPLIER: f64 = 1.5;
    /// Psynergy multiplier when attacking into a resisting element.
    pub const DISADVANTAGE_MULTIPLIER: f64 = 0.67;

    /// The element this one deals bonus damage to.
    pub const fn strong_against(self) -> Option<Element> {
        match self {
            Element::Venus => Some(Element::Jupiter),
            Element::Mars => Some(Element::Venus),
            Element::Mercury => Some(Element::Mars),
            Element::Jupiter => Some(Element::Mercury),
            Element::Neutral => None,
        }
    }

    /// Damage multiplier for an attack of this element against `defender`.
    ///
    /// # Formula
    ///
    /// ```text
    /// 1.5  if self is strong against defender
    /// 0.67 if defender is strong against self
    /// 1.0  otherwise
    /// ```
    pub fn damage_modifier(self, defender: Element) -> f64 {
        if self.strong_against() == Some(defender) {
            Self::ADVANTAGE_MULTIPLIER
        } else if defender.strong_against() == Some(self) {
            Self::DISADVANTAGE_MULTIPLIER
        } else {
            1.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn advantage_cycle_is_symmetric() {
        assert_eq!(Element::Venus.damage_modifier(Element::Jupiter), 1.5);
        assert_eq!(Element::Jupiter.damage_modifier(Element::Venus), 0.67);
        assert_eq!(Element::Mercury.damage_modifier(Element::Mars), 1.5);
        assert_eq!(Element::Mars.damage_modifier(Element::Mercury), 0.67);
        assert_eq!(Element::Venus.damage_modifier(Element::Mercury), 1.0);
        for element in Element::iter() {
            assert_eq!(Element::Neutral.damage_modifier(element), 1.0);
        }
    }

    #[test]
    fn parses_case_insensitively() {
        assert_eq!(Element::from_str("jupiter").unwrap(), Element::Jupiter);
        assert_eq!(Element::Mars.to_string(), "Mars");
    }
}
