use std::sync::{Arc, Mutex};

use mathtree::{
    Expression, ParseError, Parser, ParserConfig,
    symbols::function::Function,
    syntax::term::tokenize,
    tree::{NodeKind, Operator},
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn value(input: &str) -> f64 {
    Expression::parse(input).unwrap().evaluate()
}

#[test]
fn parsed_trees_have_one_root() {
    for input in ["1+2*3", "-x^2", "max(1, 2)", "summ{i=1..3}{i}", "a ? b : c"] {
        let expr = Expression::parse(input).unwrap();
        assert_eq!(expr.tree().root_count(), 1, "{input}");
        assert!(expr.tree().is_well_linked(expr.root()), "{input}");
    }
}

#[test]
fn top_level_groups_yield_the_last_value() {
    assert_eq!(value("1, 2, 3"), 3.0);
}

#[test]
fn named_arguments_yield_their_value() {
    assert_eq!(value("a: 5"), 5.0);
}

#[test]
fn standalone_intervals_are_nan() {
    assert!(value("1..2").is_nan());
}

#[test]
fn bracket_errors_carry_their_position() {
    assert_eq!(Expression::parse("(1+2").unwrap_err(),
               ParseError::UnmatchedBracket { bracket:  '(',
                                              position: 0, });
    assert_eq!(Expression::parse("1+2)").unwrap_err(),
               ParseError::UnexpectedClosingBracket { bracket:  ')',
                                                      position: 3, });
}

#[test]
fn unknown_functions_name_their_arity() {
    assert!(matches!(Expression::parse("foo(1, 2)"),
                     Err(ParseError::UnknownFunction { ref name, arity: 2, .. }) if name == "foo"));
}

#[test]
fn builtin_arity_is_part_of_the_lookup() {
    assert!(matches!(Expression::parse("sin(1, 2)"),
                     Err(ParseError::UnknownFunction { arity: 2, .. })));
}

#[test]
fn unknown_characters_need_a_hook() {
    assert!(matches!(Expression::parse("2 % 3"),
                     Err(ParseError::UnexpectedCharacter { ch: '%', .. })));
}

#[test]
fn missing_operands_name_the_operator() {
    assert_eq!(Expression::parse("2*").unwrap_err(),
               ParseError::MissingOperand { operator: "*".to_string() });
}

#[test]
fn preprocess_hook_rewrites_input() {
    let parser = Parser::new().on_preprocess(|input| Some(input.replace("times", "*")));

    assert_eq!(parser.parse("6 times 7").unwrap().evaluate(), 42.0);
}

#[test]
fn node_added_hook_can_rewrite_known_nodes() {
    let parser = Parser::new().on_node_added(|kind| {
                                  (kind == &NodeKind::Operator(Operator::Add))
                                      .then_some(NodeKind::Operator(Operator::Sub))
                              });

    assert_eq!(parser.parse("5 + 3").unwrap().evaluate(), 2.0);
}

#[test]
fn function_lookup_hook_supplies_missing_functions() {
    let parser = Parser::new().on_function_lookup(|name, arity| {
                                  (name == "double" && arity == 1).then(|| {
                                      Function::native("double",
                                                       1,
                                                       Arc::new(|args: &[f64]| args[0] * 2.0))
                                  })
                              });
    let expr = parser.parse("double(x) + double(1)").unwrap();
    expr.set("x", 4.0).unwrap();

    assert_eq!(expr.evaluate(), 10.0);
    assert_eq!(expr.functions(), ["double"]);
}

#[test]
fn builtins_win_over_the_lookup_hook() {
    let parser = Parser::new().on_function_lookup(|name, arity| {
                                  Some(Function::native(name, arity, Arc::new(|_: &[f64]| 99.0)))
                              });

    assert_eq!(parser.parse("sqrt(9)").unwrap().evaluate(), 3.0);
    assert_eq!(parser.parse("mystery(9)").unwrap().evaluate(), 99.0);
}

#[test]
fn variable_discovered_hook_sees_public_variables() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let parser =
        Parser::new().on_variable_discovered(move |name| sink.lock().unwrap().push(name.to_string()));

    parser.parse("a*b + summ{i=1..a}{i} + pi").unwrap();

    assert_eq!(*seen.lock().unwrap(), ["a", "b"]);
}

#[test]
fn custom_separators_change_the_grammar() {
    let config = ParserConfig { decimal_separator: ',',
                                argument_separator: ';',
                                ..ParserConfig::default() };
    let parser = Parser::with_config(config).unwrap();

    assert_eq!(parser.parse("max(1,5; 2)").unwrap().evaluate(), 2.0);
    assert_eq!(parser.parse("2,5 * 2").unwrap().evaluate(), 5.0);
}

#[test]
fn conflicting_separators_are_rejected() {
    let config = ParserConfig { decimal_separator: ',',
                                ..ParserConfig::default() };

    assert!(matches!(Parser::with_config(config), Err(ParseError::InvalidConfig { .. })));
}

proptest! {
    #[test]
    fn tokenizing_preserves_the_text(a in "[a-z0-9+*^.,=]{0,12}",
                                     b in "[a-zπΣ0-9+*^.,=]{0,12}",
                                     c in "[a-z0-9√∫+*^.,:]{0,12}") {
        let input = format!("{a}({b}[{c}]){{{a}}}{c}");
        let terms = tokenize(&input).unwrap();
        let text: String = terms.iter().map(|term| term.text()).collect();

        prop_assert_eq!(text, input);
    }

    #[test]
    fn sums_of_integers_evaluate_exactly(values in prop::collection::vec(0u16..1000, 1..12)) {
        let source = values.iter().map(ToString::to_string).collect::<Vec<_>>().join(" + ");
        let expected: f64 = values.iter().map(|v| f64::from(*v)).sum();

        prop_assert_eq!(value(&source), expected);
    }

    #[test]
    fn whitespace_never_changes_the_value(a in 0u8..100, b in 1u8..100, spaces in 0usize..4) {
        let pad = " ".repeat(spaces);
        let tight = format!("{a}*{b}-{a}/{b}");
        let loose = format!("{a}{pad}*{pad}{b}{pad}-{pad}{a}{pad}/{pad}{b}");

        prop_assert_eq!(value(&tight), value(&loose));
    }
}
