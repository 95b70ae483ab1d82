//! Logarithmic Market Scoring Rule (LMSR) for a binary market.
//!
//! Pure pricing math over an inventory `(q_yes, q_no)`; the model itself
//! holds only the liquidity parameter `b` and never mutates anything.
//! Reference: Hanson (2003) "Combinatorial Information Market Design"
//!
//! All exponentials are shifted by the largest exponent argument before
//! evaluation (log-sum-exp), so inventories with `q / b` in the hundreds
//! stay finite.

use serde::Serialize;

use super::error::MarketError;
use super::outcome::Outcome;

/// LMSR pricing model for binary outcome markets.
///
/// The liquidity parameter `b` controls market depth:
/// - Higher `b` = more liquidity, slower price movement
/// - Lower `b` = less liquidity, faster price movement
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LmsrModel {
    /// Liquidity parameter (b > 0)
    b: f64,
}

impl LmsrModel {
    /// Creates a new LMSR model with the given liquidity parameter.
    ///
    /// # Errors
    /// `InvalidParameter` if `b` is not a positive finite number.
    pub fn new(b: f64) -> Result<Self, MarketError> {
        if !b.is_finite() || b <= 0.0 {
            return Err(MarketError::invalid(
                "b",
                b,
                "liquidity must be a positive finite number",
            ));
        }
        Ok(Self { b })
    }

    /// Returns the liquidity parameter.
    pub const fn liquidity(&self) -> f64 {
        self.b
    }

    /// Computes the LMSR cost function: C(q) = b * ln(exp(q_yes/b) + exp(q_no/b)).
    pub fn cost(&self, q_yes: f64, q_no: f64) -> f64 {
        self.b * log_sum_exp(q_yes / self.b, q_no / self.b)
    }

    /// Marginal price of `outcome`, the partial derivative of [`Self::cost`].
    ///
    /// price_yes = exp(q_yes/b) / (exp(q_yes/b) + exp(q_no/b))
    pub fn price(&self, outcome: Outcome, q_yes: f64, q_no: f64) -> f64 {
        let x_yes = q_yes / self.b;
        let x_no = q_no / self.b;
        let shift = x_yes.max(x_no);
        let e_yes = (x_yes - shift).exp();
        let e_no = (x_no - shift).exp();

        match outcome {
            Outcome::Yes => e_yes / (e_yes + e_no),
            Outcome::No => e_no / (e_yes + e_no),
        }
    }

    /// Cost of buying `delta` contracts of `outcome` from `(q_yes, q_no)`.
    pub fn cost_to_buy(
        &self,
        outcome: Outcome,
        q_yes: f64,
        q_no: f64,
        delta: f64,
    ) -> f64 {
        let (new_yes, new_no) = apply(outcome, q_yes, q_no, delta);
        self.cost(new_yes, new_no) - self.cost(q_yes, q_no)
    }

    /// Inventory with one side at zero whose YES price is `price_yes`.
    ///
    /// Inverts the price formula: `q_yes - q_no = b * ln(p / (1 - p))`.
    ///
    /// # Errors
    /// `InvalidParameter` unless `price_yes` lies strictly inside (0, 1)
    /// and the resulting inventory is finite.
    pub fn inventory_for_price(
        &self,
        price_yes: f64,
    ) -> Result<(f64, f64), MarketError> {
        if !(price_yes > 0.0 && price_yes < 1.0) {
            return Err(MarketError::invalid(
                "target_price_yes",
                price_yes,
                "must lie strictly between 0 and 1",
            ));
        }

        let delta = self.b * (price_yes / (1.0 - price_yes)).ln();
        if !delta.is_finite() {
            return Err(MarketError::invalid(
                "target_price_yes",
                price_yes,
                "seeded inventory is not representable",
            ));
        }
        let inventory = if delta > 0.0 {
            (delta, 0.0)
        } else if delta < 0.0 {
            (0.0, delta.abs())
        } else {
            (0.0, 0.0)
        };
        Ok(inventory)
    }
}

/// `ln(exp(a) + exp(b))` evaluated without overflow.
pub fn log_sum_exp(a: f64, b: f64) -> f64 {
    let shift = a.max(b);
    shift + ((a - shift).exp() + (b - shift).exp()).ln()
}

/// Inventory after adding `delta` contracts to `outcome`.
pub(crate) fn apply(
    outcome: Outcome,
    q_yes: f64,
    q_no: f64,
    delta: f64,
) -> (f64, f64) {
    match outcome {
        Outcome::Yes => (q_yes + delta, q_no),
        Outcome::No => (q_yes, q_no + delta),
    }
}
