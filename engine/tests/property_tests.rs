use proptest::prelude::*;

use aria_engine::calc;
use aria_engine::intent::{IntentRouter, Utterance};
use aria_engine::units;

// The evaluator must agree with plain f64 arithmetic on simple forms and
// never panic on arbitrary input.
proptest! {
    #[test]
    fn test_evaluator_addition_matches_f64(a in -10_000i32..10_000, b in -10_000i32..10_000) {
        let expr = format!("{} + {}", a, b);
        let result = calc::evaluate(&expr).expect("simple sums always evaluate");
        prop_assert!((result - f64::from(a + b)).abs() < 1e-9);
    }

    #[test]
    fn test_evaluator_multiplication_binds_tighter(a in 1i32..100, b in 1i32..100, c in 1i32..100) {
        let expr = format!("{} + {} * {}", a, b, c);
        let result = calc::evaluate(&expr).expect("should evaluate");
        let expected = f64::from(a) + f64::from(b) * f64::from(c);
        prop_assert!((result - expected).abs() < 1e-6);
    }

    #[test]
    fn test_evaluator_never_panics(input in ".*") {
        // Any outcome is fine as long as it is a Result, not a panic.
        let _ = calc::evaluate(&input);
    }

    #[test]
    fn test_word_operators_equal_symbols(a in 1i32..1000, b in 1i32..1000) {
        let words = format!("{} plus {}", a, b);
        let symbols = format!("{} + {}", a, b);
        prop_assert_eq!(
            calc::evaluate(&words).expect("word form evaluates"),
            calc::evaluate(&symbols).expect("symbol form evaluates")
        );
    }
}

// Linear unit conversions must invert cleanly and scale linearly.
proptest! {
    #[test]
    fn test_length_round_trip(value in -1.0e6f64..1.0e6) {
        let feet = units::convert(value, "meters", "feet").expect("length pair");
        let back = units::convert(feet, "feet", "meters").expect("length pair");
        prop_assert!((back - value).abs() < 1e-6 * value.abs().max(1.0));
    }

    #[test]
    fn test_weight_round_trip(value in 0.0f64..1.0e6) {
        let pounds = units::convert(value, "kg", "lbs").expect("weight pair");
        let back = units::convert(pounds, "lbs", "kg").expect("weight pair");
        prop_assert!((back - value).abs() < 1e-6 * value.max(1.0));
    }

    #[test]
    fn test_temperature_round_trip(value in -200.0f64..1000.0) {
        let f = units::convert(value, "celsius", "fahrenheit").expect("temp pair");
        let back = units::convert(f, "fahrenheit", "celsius").expect("temp pair");
        prop_assert!((back - value).abs() < 1e-6);
    }

    #[test]
    fn test_linear_conversion_is_homogeneous(value in 0.1f64..1.0e4) {
        // Doubling the input doubles the output for linear categories.
        let one = units::convert(value, "km", "miles").expect("length pair");
        let two = units::convert(2.0 * value, "km", "miles").expect("length pair");
        prop_assert!((two - 2.0 * one).abs() < 1e-6 * two.abs().max(1.0));
    }
}

// The router is a pure function of the utterance text.
proptest! {
    #[test]
    fn test_router_never_panics(input in ".*") {
        let router = IntentRouter::new();
        let _ = router.route(&Utterance::new(&input));
    }

    #[test]
    fn test_router_is_deterministic(input in "[a-z ]{0,60}") {
        let router = IntentRouter::new();
        let utterance = Utterance::new(&input);
        prop_assert_eq!(router.route(&utterance), router.route(&utterance));
    }
}
