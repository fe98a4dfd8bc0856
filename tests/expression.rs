use std::thread;

use mathtree::{Expression, Parser, ParserConfig, RuntimeError};
use pretty_assertions::assert_eq;

fn parse(input: &str) -> Expression {
    Expression::parse(input).unwrap()
}

#[test]
fn every_reference_shares_one_slot() {
    let expr = parse("x*x + x");
    expr.set("x", 3.0).unwrap();

    assert_eq!(expr.evaluate(), 12.0);
    assert_eq!(expr.variables(), ["x"]);
}

#[test]
fn clones_never_alias() {
    let original = parse("x + 1");
    original.set("x", 1.0).unwrap();
    let copy = original.clone();
    copy.set("x", 10.0).unwrap();

    assert_eq!(original.evaluate(), 2.0);
    assert_eq!(copy.evaluate(), 11.0);
}

#[test]
fn clones_evaluate_on_other_threads() {
    let expr = parse("summ{i=1..n}{i}");
    let handles: Vec<_> = (1..=4).map(|n| {
                                     let copy = expr.clone();
                                     thread::spawn(move || {
                                         copy.set("n", f64::from(n)).unwrap();
                                         copy.evaluate()
                                     })
                                 })
                                 .collect();
    let sums: Vec<f64> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert_eq!(sums, [1.0, 3.0, 6.0, 10.0]);
}

#[test]
fn symbol_views_are_separated() {
    let expr = parse("2pi + e*x + sin(y) + summ{i=1..3}{i}");

    assert_eq!(expr.variables(), ["x", "y"]);
    assert_eq!(expr.constants(), ["pi", "e"]);
    assert_eq!(expr.functions(), ["sin"]);
    assert_eq!(expr.functionals(), ["summ"]);
}

#[test]
fn assignment_errors() {
    let expr = parse("x + pi");

    assert_eq!(expr.set("y", 1.0),
               Err(RuntimeError::UnknownVariable { name: "y".to_string() }));
    assert_eq!(expr.set("pi", 3.0),
               Err(RuntimeError::ConstantAssignment { name: "pi".to_string() }));
    assert_eq!(expr.variable("pi").map(mathtree::symbols::variable::Variable::value),
               Some(std::f64::consts::PI));
}

#[test]
fn evaluate_with_assigns_first() {
    let expr = parse("a - b");

    assert_eq!(expr.evaluate_with(&[("a", 5.0), ("b", 2.0)]), Ok(3.0));
    assert!(expr.evaluate_with(&[("c", 1.0)]).is_err());
}

#[test]
fn external_sources_are_read_on_every_evaluation() {
    use std::sync::{
        Arc,
        atomic::{AtomicU32, Ordering},
    };

    let ticks = Arc::new(AtomicU32::new(0));
    let clock = Arc::clone(&ticks);
    let mut expr = parse("t * 10");
    expr.bind_external("t", move || f64::from(clock.fetch_add(1, Ordering::Relaxed)))
        .unwrap();

    assert_eq!(expr.evaluate(), 0.0);
    assert_eq!(expr.evaluate(), 10.0);
    assert!(matches!(expr.bind_external("pi", || 0.0),
                     Err(RuntimeError::ConstantAssignment { .. })));
}

#[test]
fn composition_merges_variables() {
    let sum = parse("x") + parse("y");

    assert_eq!(sum.variables(), ["x", "y"]);
    assert_eq!(sum.evaluate_with(&[("x", 2.0), ("y", 3.0)]), Ok(5.0));
}

#[test]
fn composition_brackets_looser_sides() {
    let a = parse("x + 1");
    let b = parse("x - 1");

    assert_eq!((&a * &b).to_string(), "(x+1)*(x-1)");
    assert_eq!((&a - &b).to_string(), "x+1-(x-1)");
    assert_eq!((&a / &b).evaluate_with(&[("x", 3.0)]), Ok(2.0));
    assert_eq!(a.to_string(), "x+1");
}

#[test]
fn composition_keeps_the_left_configuration() {
    let config = ParserConfig { decimal_separator: ',',
                                argument_separator: ';',
                                ..ParserConfig::default() };
    let left = Parser::with_config(config).unwrap().parse("0,5").unwrap();
    let joined = left + parse("x");

    assert_eq!(joined.to_string(), "0,5+x");
    assert_eq!(joined.config().decimal_separator, ',');
}

#[test]
fn printed_expressions_read_back_identically() {
    let inputs = ["-x^2 + 3(x-1)",
                  "summ{i=1..n:2}{i*x}",
                  "x > 1 ? x : -x",
                  "max(x, 2) / (1 + x)",
                  "2^3^2",
                  "1-(2-3)",
                  "∫(t=0..x, dt=0.5){t}",
                  "!(x < 1) & x ≠ 2"];

    for input in inputs {
        let first = parse(input);
        let second = parse(&first.to_string());
        let bindings: Vec<(&str, f64)> = [("x", 1.5), ("n", 4.0)].into_iter()
                                                                   .filter(|(name, _)| {
                                                                       first.variables()
                                                                            .contains(name)
                                                                   })
                                                                   .collect();

        let a = first.evaluate_with(&bindings).unwrap();
        let b = second.evaluate_with(&bindings).unwrap();
        assert_eq!(a.to_bits(), b.to_bits(), "{input} printed as {first}");
    }
}

#[test]
fn folding_preserves_values() {
    let mut expr = parse("x * (2 + 3) + 2pi");
    expr.set("x", 2.0).unwrap();
    let before = expr.evaluate();
    expr.fold_constants();

    assert_eq!(expr.evaluate(), before);
    assert_eq!(expr.to_string(), format!("x*5+{}", 2.0 * std::f64::consts::PI));
    assert!(expr.constants().is_empty());
}

#[test]
fn folding_keeps_conditionals_whole() {
    let mut expr = parse("1 > 0 ? 5 : x");
    expr.set("x", 9.0).unwrap();
    expr.fold_constants();

    assert_eq!(expr.evaluate(), 5.0);
    assert_eq!(expr.to_string(), "1?5:x");

    let mut chain = parse("0 ? 1 : 2 > 1 ? 2 : 3");
    chain.fold_constants();

    assert_eq!(chain.evaluate(), 2.0);
    assert_eq!(chain.to_string(), "2");
}

#[test]
fn long_flat_sums_are_handled_without_deep_recursion() {
    let source = vec!["1"; 200_000].join("+");
    let mut expr = parse(&source);

    assert_eq!(expr.evaluate(), 200_000.0);
    assert_eq!(expr.compile(&[]).unwrap().call(&[]), Ok(200_000.0));
    assert_eq!(expr.to_string(), source);

    expr.fold_constants();
    assert_eq!(expr.to_string(), "200000");
}

#[test]
fn folding_stops_at_variables_and_functionals() {
    let mut expr = parse("summ{i=1..2}{i} + sqrt(x)");
    expr.fold_constants();

    assert_eq!(expr.to_string(), "summ{i=1..2}{i}+sqrt(x)");
}
