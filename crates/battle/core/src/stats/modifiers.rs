//! Multiplicative buff/debuff stacking.

/// Ordered list of signed percentage modifiers applied to a single stat.
///
/// Each modifier multiplies the running value by `(100 + m) / 100`, so `+25`
/// is ×1.25 and `-20` is ×0.80. The product is carried in fixed point and
/// floored only once at the end.
///
/// # Example
/// ```
/// # use battle_core::stats::ModifierStack;
/// let mut stack = ModifierStack::new();
/// stack.push(25);
/// stack.push(-20);
/// // 37 × 1.25 × 0.8 = 37
/// assert_eq!(stack.apply(37), 37);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ModifierStack {
    modifiers: Vec<i32>,
}

impl ModifierStack {
    /// Fixed-point scale for the running product.
    const SCALE: i128 = 1_000_000_000;

    pub fn new() -> Self {
        Self {
            modifiers: Vec::new(),
        }
    }

    pub fn push(&mut self, percent: i32) {
        self.modifiers.push(percent);
    }

    pub fn is_empty(&self) -> bool {
        self.modifiers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.modifiers.len()
    }

    /// Applies every modifier to `base`.
    ///
    /// # Formula
    /// ```text
    /// result = floor(base × Π (100 + mᵢ) / 100)
    /// ```
    /// A modifier at or below −100 drives the product to zero.
    pub fn apply(&self, base: i32) -> i32 {
        if self.modifiers.is_empty() {
            return base;
        }
        let scaled = self
            .modifiers
            .iter()
            .fold(base as i128 * Self::SCALE, |acc, m| {
                let factor = (100 + *m as i128).max(0);
                acc * factor / 100
            });
        scaled
            .div_euclid(Self::SCALE)
            .clamp(i32::MIN as i128, i32::MAX as i128) as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_stack_is_identity() {
        assert_eq!(ModifierStack::new().apply(42), 42);
    }

    #[test]
    fn modifiers_multiply_not_add() {
        let mut stack = ModifierStack::new();
        stack.push(50);
        stack.push(50);
        // additive would be 200, multiplicative is 225
        assert_eq!(stack.apply(100), 225);
    }

    #[test]
    fn floors_after_all_modifiers() {
        let mut stack = ModifierStack::new();
        stack.push(50);
        stack.push(50);
        // 5 × 1.5 × 1.5 = 11.25; flooring each step would give 10
        assert_eq!(stack.apply(5), 11);

        let mut stack = ModifierStack::new();
        stack.push(-10);
        stack.push(-10);
        assert_eq!(stack.apply(11), 8);
    }

    #[test]
    fn total_debuff_zeroes_stat() {
        let mut stack = ModifierStack::new();
        stack.push(-100);
        assert_eq!(stack.apply(80), 0);
    }
}
