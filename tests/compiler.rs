use std::sync::Arc;

use mathtree::{Expression, Parser, RuntimeError, symbols::function::Function};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

const SAMPLES: &[&str] = &["x^2 + 2x + 1",
                           "sin(x) * cos(y) - atan2(y, x)",
                           "x > y ? x - y : y - x",
                           "!(x < 0) & y ≠ 0",
                           "max[x, y] / (1 + abs(x))",
                           "summ{i=1..4}{i * x}",
                           "summ{k=1..3}{summ{j=1..k}{j*y}}",
                           "int{t=0..1}{t * x}",
                           "∫(t=0..y, dt=0.25){t^2}",
                           "x, y, x + y",
                           "-x^2 + pi",
                           "x > y ? 1 : y > 0 ? 2 : x < 0 ? 3 : 4"];

fn both(source: &str, x: f64, y: f64) -> (f64, f64) {
    let _ = env_logger::builder().is_test(true).try_init();
    let expr = Expression::parse(source).unwrap();
    let compiled = expr.compile(&["x", "y"]).unwrap();
    let interpreted = expr.evaluate_with(&[("x", x), ("y", y)]
                                          .into_iter()
                                          .filter(|(name, _)| expr.variables().contains(name))
                                          .collect::<Vec<_>>())
                          .unwrap();
    (interpreted, compiled.call(&[x, y]).unwrap())
}

fn same(a: f64, b: f64) -> bool {
    a.to_bits() == b.to_bits() || (a.is_nan() && b.is_nan())
}

#[test]
fn backends_agree_on_samples() {
    for source in SAMPLES {
        let (interpreted, compiled) = both(source, 1.25, -0.5);
        assert!(same(interpreted, compiled),
                "{source}: interpreted {interpreted}, compiled {compiled}");
    }
}

#[test]
fn chained_conditionals_pick_the_first_true_branch() {
    let source = "x > 0 ? 1 : x < 0 ? -1 : 0";
    let expr = Expression::parse(source).unwrap();
    let f = expr.compile(&["x"]).unwrap();

    for (x, expected) in [(5.0, 1.0), (-5.0, -1.0), (0.0, 0.0)] {
        assert_eq!(expr.evaluate_with(&[("x", x)]), Ok(expected), "{source} at {x}");
        assert_eq!(f.call(&[x]), Ok(expected), "{source} at {x}");
    }
}

#[test]
fn parameters_follow_the_given_order() {
    let f = Expression::parse("a - b").unwrap().compile(&["b", "a"]).unwrap();

    assert_eq!(f.call(&[1.0, 5.0]), Ok(4.0));
    assert_eq!(f.parameters(), ["b", "a"]);
}

#[test]
fn unused_parameters_are_allowed() {
    let f = Expression::parse("2pi").unwrap().compile(&["x"]).unwrap();

    assert_eq!(f.call(&[7.0]), Ok(2.0 * std::f64::consts::PI));
}

#[test]
fn unlisted_variables_are_unbound() {
    let expr = Expression::parse("x + y").unwrap();

    assert!(matches!(expr.compile(&["x"]),
                     Err(RuntimeError::UnboundParameter { ref name }) if name == "y"));
}

#[test]
fn external_sources_must_become_parameters() {
    let mut expr = Expression::parse("t + 1").unwrap();
    expr.bind_external("t", || 5.0).unwrap();

    assert!(expr.compile(&[]).is_err());
    assert_eq!(expr.compile(&["t"]).unwrap().call(&[1.0]), Ok(2.0));
}

#[test]
fn native_functions_are_carried_along() {
    let parser = Parser::new().on_function_lookup(|name, arity| {
                                  (name == "sq" && arity == 1).then(|| {
                                      Function::native("sq",
                                                       1,
                                                       Arc::new(|args: &[f64]| args[0] * args[0]))
                                  })
                              });
    let f = parser.parse("sq(x) + sq(2)").unwrap().compile(&["x"]).unwrap();

    assert_eq!(f.call(&[3.0]), Ok(13.0));
}

#[test]
fn compiled_functions_are_independent_of_the_expression() {
    let f = {
        let expr = Expression::parse("x * 2").unwrap();
        expr.set("x", 100.0).unwrap();
        expr.compile(&["x"]).unwrap()
    };

    assert_eq!(f.call(&[4.0]), Ok(8.0));
}

proptest! {
    #[test]
    fn backends_agree_everywhere(x in -10.0f64..10.0, y in -10.0f64..10.0, index in 0..SAMPLES.len()) {
        let (interpreted, compiled) = both(SAMPLES[index], x, y);
        prop_assert!(same(interpreted, compiled),
                     "{}: interpreted {}, compiled {}", SAMPLES[index], interpreted, compiled);
    }

    #[test]
    fn sums_match_the_closed_form(n in 1u32..200) {
        let f = Expression::parse("summ{i=1..n}{i}").unwrap().compile(&["n"]).unwrap();
        let n = f64::from(n);

        prop_assert_eq!(f.call(&[n]).unwrap(), n * (n + 1.0) / 2.0);
    }
}
