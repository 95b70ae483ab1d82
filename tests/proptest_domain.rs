//! Property-Based Tests — Market Engine Invariants
//!
//! Uses `proptest` to verify that the LMSR engine maintains its
//! mathematical invariants across random inputs.

use proptest::prelude::*;

use lmsr_market_maker::domain::{LmsrModel, Market, Outcome};

fn outcome() -> impl Strategy<Value = Outcome> {
    prop_oneof![Just(Outcome::Yes), Just(Outcome::No)]
}

// ── Price Properties ────────────────────────────────────────

proptest! {
    /// YES and NO prices always sum to one.
    #[test]
    fn prices_sum_to_one(
        b in 0.5f64..1000.0,
        q_yes in 0.0f64..5000.0,
        q_no in 0.0f64..5000.0,
    ) {
        let model = LmsrModel::new(b).unwrap();
        let sum = model.price(Outcome::Yes, q_yes, q_no)
            + model.price(Outcome::No, q_yes, q_no);
        prop_assert!((sum - 1.0).abs() < 1e-9, "sum = {sum}");
    }

    /// Prices stay strictly inside (0, 1) while the inventory gap is
    /// within double-precision resolution.
    #[test]
    fn prices_strictly_inside_unit_interval(
        b in 1.0f64..500.0,
        q_yes in 0.0f64..1000.0,
        gap in -20.0f64..20.0,
    ) {
        let q_no = (q_yes - gap * b).max(0.0);
        let model = LmsrModel::new(b).unwrap();
        for side in Outcome::ALL {
            let p = model.price(side, q_yes, q_no);
            prop_assert!(p > 0.0 && p < 1.0, "{side} price {p} out of (0, 1)");
        }
    }

    /// Seeding reproduces the requested YES price.
    #[test]
    fn seed_round_trip(b in 0.5f64..1000.0, p in 0.01f64..0.99) {
        let market = Market::with_price(b, p).unwrap();
        let (q_yes, q_no) = market.inventory();
        prop_assert!(q_yes >= 0.0 && q_no >= 0.0);
        prop_assert!(q_yes == 0.0 || q_no == 0.0);
        let price = market.price(Outcome::Yes);
        prop_assert!((price - p).abs() < 1e-6, "seeded {p}, got {price}");
    }
}

// ── Trade Properties ────────────────────────────────────────

proptest! {
    /// Buying never costs a negative amount and only moves the traded side.
    #[test]
    fn trade_cost_non_negative(
        b in 1.0f64..500.0,
        p in 0.01f64..0.99,
        side in outcome(),
        quantity in 0.001f64..1000.0,
    ) {
        let mut market = Market::with_price(b, p).unwrap();
        let (before_yes, before_no) = market.inventory();
        let cost = market.buy(side, quantity).unwrap();
        prop_assert!(cost >= 0.0, "cost {cost} < 0");

        let (after_yes, after_no) = market.inventory();
        match side {
            Outcome::Yes => {
                prop_assert!((after_yes - (before_yes + quantity)).abs() < 1e-9);
                prop_assert_eq!(after_no, before_no);
            }
            Outcome::No => {
                prop_assert!((after_no - (before_no + quantity)).abs() < 1e-9);
                prop_assert_eq!(after_yes, before_yes);
            }
        }
    }

    /// Buying an outcome raises its price, and an identical follow-up
    /// purchase costs strictly more.
    #[test]
    fn successive_purchases_cost_more(
        b in 1.0f64..200.0,
        side in outcome(),
        quantity in 0.1f64..20.0,
    ) {
        let mut market = Market::new(b).unwrap();
        let p0 = market.price(side);
        let first = market.buy(side, quantity).unwrap();
        let p1 = market.price(side);
        let second = market.buy(side, quantity).unwrap();
        let p2 = market.price(side);

        prop_assert!(p1 > p0 && p2 > p1, "prices {p0} {p1} {p2} not rising");
        prop_assert!(second > first, "second {second} <= first {first}");
    }

    /// Cost equals the cost-function difference (path independence).
    #[test]
    fn split_purchase_costs_the_same(
        b in 1.0f64..200.0,
        side in outcome(),
        a in 0.1f64..50.0,
        c in 0.1f64..50.0,
    ) {
        let mut split = Market::new(b).unwrap();
        let split_cost = split.buy(side, a).unwrap() + split.buy(side, c).unwrap();

        let mut whole = Market::new(b).unwrap();
        let whole_cost = whole.buy(side, a + c).unwrap();

        prop_assert!((split_cost - whole_cost).abs() < 1e-7);
    }

    /// Non-positive quantities leave everything untouched.
    #[test]
    fn non_positive_quantity_is_noop(
        p in 0.05f64..0.95,
        side in outcome(),
        quantity in -1000.0f64..=0.0,
    ) {
        let mut market = Market::with_price(10.0, p).unwrap();
        let before = market.clone();
        prop_assert_eq!(market.buy(side, quantity).unwrap(), 0.0);
        prop_assert_eq!(market, before);
    }

    /// Inventories up to q/b = 700 never yield non-finite results.
    #[test]
    fn stable_at_large_inventory(
        b in 0.5f64..100.0,
        x_yes in 0.0f64..700.0,
        x_no in 0.0f64..700.0,
        side in outcome(),
    ) {
        let model = LmsrModel::new(b).unwrap();
        let (q_yes, q_no) = (x_yes * b, x_no * b);
        prop_assert!(model.cost(q_yes, q_no).is_finite());
        prop_assert!(model.price(side, q_yes, q_no).is_finite());
        prop_assert!(model.cost_to_buy(side, q_yes, q_no, b).is_finite());
    }
}
