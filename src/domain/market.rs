//! Binary LMSR market: liquidity plus the inventory issued so far.
//!
//! `Market` is the stateful engine. Reads (`price`, `quote`,
//! `inventory`) borrow it shared; `buy` and `seed_price` need `&mut`,
//! which gives every trade exclusive access for its whole
//! read-compute-commit sequence.

use serde::Serialize;

use super::error::MarketError;
use super::lmsr::{LmsrModel, apply};
use super::outcome::Outcome;

/// A two-outcome market maker priced by LMSR.
///
/// Serialize-only: every instance comes through [`Market::new`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Market {
    model: LmsrModel,
    /// YES contracts issued (>= 0).
    q_yes: f64,
    /// NO contracts issued (>= 0).
    q_no: f64,
    /// Set by the first committed trade; seeding is refused afterwards.
    traded: bool,
}

impl Market {
    /// Open an empty market (50/50) with liquidity `b`.
    ///
    /// # Errors
    /// `InvalidParameter` when `b <= 0` or not finite.
    pub fn new(b: f64) -> Result<Self, MarketError> {
        Ok(Self {
            model: LmsrModel::new(b)?,
            q_yes: 0.0,
            q_no: 0.0,
            traded: false,
        })
    }

    /// Open a market whose YES price starts at `price_yes`.
    ///
    /// # Errors
    /// `InvalidParameter` for a bad `b` or a price outside (0, 1).
    pub fn with_price(b: f64, price_yes: f64) -> Result<Self, MarketError> {
        let mut market = Self::new(b)?;
        market.seed_price(price_yes)?;
        Ok(market)
    }

    /// Overwrite the inventory so that `price(Yes) == price_yes`.
    ///
    /// Only one side ends up non-zero. Allowed only before the first trade.
    ///
    /// # Errors
    /// `InvalidParameter` for a price outside (0, 1) or one whose seeded
    /// inventory overflows, `SeedAfterTrade` once a trade has been
    /// committed.
    pub fn seed_price(&mut self, price_yes: f64) -> Result<(), MarketError> {
        if self.traded {
            return Err(MarketError::SeedAfterTrade);
        }
        let (q_yes, q_no) = self.model.inventory_for_price(price_yes)?;
        self.q_yes = q_yes;
        self.q_no = q_no;
        Ok(())
    }

    /// Current marginal price of `outcome`, in (0, 1).
    pub fn price(&self, outcome: Outcome) -> f64 {
        self.model.price(outcome, self.q_yes, self.q_no)
    }

    /// Cost `buy(outcome, quantity)` would charge right now.
    ///
    /// # Errors
    /// `InvalidParameter` for an infinite quantity.
    pub fn quote(&self, outcome: Outcome, quantity: f64) -> Result<f64, MarketError> {
        Ok(self.plan(outcome, quantity)?.map_or(0.0, |fill| fill.cost))
    }

    /// Buy `quantity` contracts of `outcome`, returning the cost owed.
    ///
    /// Non-positive (or NaN) quantities are a zero-cost no-op. The new
    /// inventory is committed only after both cost evaluations succeed.
    ///
    /// # Errors
    /// `InvalidParameter` for an infinite quantity or a trade whose cost
    /// is not representable; the market is left unchanged.
    pub fn buy(&mut self, outcome: Outcome, quantity: f64) -> Result<f64, MarketError> {
        let Some(fill) = self.plan(outcome, quantity)? else {
            return Ok(0.0);
        };

        self.q_yes = fill.q_yes;
        self.q_no = fill.q_no;
        self.traded = true;
        Ok(fill.cost)
    }

    /// `(q_yes, q_no)` issued so far.
    pub const fn inventory(&self) -> (f64, f64) {
        (self.q_yes, self.q_no)
    }

    /// Liquidity parameter `b`.
    pub const fn liquidity(&self) -> f64 {
        self.model.liquidity()
    }

    /// Cost function value `C(q_yes, q_no)` at the current inventory.
    pub fn cost(&self) -> f64 {
        self.model.cost(self.q_yes, self.q_no)
    }

    /// Whether at least one trade has been committed.
    pub const fn has_traded(&self) -> bool {
        self.traded
    }

    /// Price both sides of a prospective trade from the current snapshot.
    fn plan(&self, outcome: Outcome, quantity: f64) -> Result<Option<Fill>, MarketError> {
        if quantity.is_infinite() {
            return Err(MarketError::invalid(
                "quantity",
                quantity,
                "must be finite",
            ));
        }
        if quantity.is_nan() || quantity <= 0.0 {
            return Ok(None);
        }

        let cost_before = self.model.cost(self.q_yes, self.q_no);
        let (q_yes, q_no) = apply(outcome, self.q_yes, self.q_no, quantity);
        let cost_after = self.model.cost(q_yes, q_no);
        let cost = cost_after - cost_before;

        if !cost.is_finite() {
            return Err(MarketError::invalid(
                "quantity",
                quantity,
                "trade cost is not representable",
            ));
        }

        Ok(Some(Fill {
            q_yes,
            q_no,
            // Rounding can push a tiny trade a hair below zero.
            cost: cost.max(0.0),
        }))
    }
}

/// Candidate post-trade state.
struct Fill {
    q_yes: f64,
    q_no: f64,
    cost: f64,
}
