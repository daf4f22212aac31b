//! Left recursion, indirect recursion and the recursion guard.

use descent_core::CharSet;

use super::fixtures::{Ast, expr_grammar};
use crate::engine::{Error, Limits, Parser, parse};
use crate::grammar::{Element, Grammar, Rule};

#[test]
fn direct_left_recursion_terminates_and_associates_left() {
    // expr <- expr '(' args ')' is the canonical consuming recursive rule.
    let (grammar, expr) = expr_grammar();

    let value = parse(&grammar, expr, "f(1)(2)(3)").unwrap();
    assert_eq!(
        value,
        Ast::call(
            Ast::call(
                Ast::call(Ast::ident("f"), vec![Ast::Num(1)]),
                vec![Ast::Num(2)]
            ),
            vec![Ast::Num(3)]
        )
    );
}

#[test]
fn recursive_rules_try_in_declared_order() {
    // Two recursive suffixes; each application picks the first that
    // parses at the current point.
    let mut grammar: Grammar<String> = Grammar::new();
    let item = grammar.nonterminal("item");
    grammar.add_rule(
        item,
        Rule::new().elem(Element::ch(b'x').on_char(|_, _| Some("x".to_owned()))),
    );
    grammar.add_recursive_rule(
        item,
        Rule::new()
            .on_rec_start(|prefix: &String| Some(prefix.clone()))
            .elem(Element::ch(b'+').on_char(|acc, _| Some(format!("plus({acc})")))),
    );
    grammar.add_recursive_rule(
        item,
        Rule::new()
            .on_rec_start(|prefix: &String| Some(prefix.clone()))
            .elem(Element::ch(b'-').on_char(|acc, _| Some(format!("minus({acc})")))),
    );

    assert_eq!(parse(&grammar, item, "x+-+").unwrap(), "plus(minus(plus(x)))");
}

#[test]
fn refusing_start_hook_skips_that_recursive_rule() {
    let mut grammar: Grammar<String> = Grammar::new();
    let item = grammar.nonterminal("item");
    grammar.add_rule(
        item,
        Rule::new().elem(Element::ch(b'x').on_char(|_, _| Some("x".to_owned()))),
    );
    // The first recursive rule refuses every seed; the second must still
    // get its chance instead of the iteration failing.
    grammar.add_recursive_rule(
        item,
        Rule::new()
            .on_rec_start(|_: &String| None)
            .elem(Element::ch(b'!').on_char(|_, _| Some("refused".to_owned()))),
    );
    grammar.add_recursive_rule(
        item,
        Rule::new()
            .on_rec_start(|prefix: &String| Some(prefix.clone()))
            .elem(Element::ch(b'!').on_char(|acc, _| Some(format!("bang({acc})")))),
    );

    assert_eq!(parse(&grammar, item, "x!").unwrap(), "bang(x)");
}

#[test]
fn missing_start_hook_discards_the_prefix() {
    let mut grammar: Grammar<String> = Grammar::new();
    let item = grammar.nonterminal("item");
    grammar.add_rule(
        item,
        Rule::new().elem(Element::ch(b'x').on_char(|_, _| Some("x".to_owned()))),
    );
    grammar.add_recursive_rule(
        item,
        Rule::new().elem(Element::ch(b'!').on_char(|acc, _| Some(format!("got({acc})")))),
    );

    // Without a start hook the accumulator seeds empty, not from "x".
    assert_eq!(parse(&grammar, item, "x!").unwrap(), "got()");
}

#[test]
fn indirect_left_recursion_fails_cleanly_with_a_cache() {
    // a <- b 'z' ; b <- a | 'x'. The inner a-at-the-same-position must
    // see the pre-marked failing cache entry and give up.
    let mut grammar: Grammar<()> = Grammar::new();
    let a = grammar.nonterminal("a");
    let b = grammar.nonterminal("b");
    grammar.add_rule(a, Rule::new().elem(Element::nt(b)).elem(Element::ch(b'z')));
    grammar.add_rule(b, Rule::new().elem(Element::nt(a)));
    grammar.add_rule(b, Rule::new().elem(Element::ch(b'x')));

    let result = Parser::new(&grammar, "xz").packrat().parse(a);
    assert!(result.is_ok());

    let result = Parser::new(&grammar, "yz").packrat().parse(a);
    assert!(matches!(result, Err(Error::Parse(_))));
}

#[test]
fn uncached_indirect_recursion_hits_the_recursion_guard() {
    let mut grammar: Grammar<()> = Grammar::new();
    let a = grammar.nonterminal("a");
    let b = grammar.nonterminal("b");
    grammar.add_rule(a, Rule::new().elem(Element::nt(b)).elem(Element::ch(b'z')));
    grammar.add_rule(b, Rule::new().elem(Element::nt(a)));
    grammar.add_rule(b, Rule::new().elem(Element::ch(b'x')));

    let result = Parser::new(&grammar, "xz")
        .limits(Limits::new().recursion_limit(64))
        .parse(a);
    assert!(matches!(result, Err(Error::RecursionLimitExceeded(64))));
}

#[test]
fn nested_nonterminals_within_the_limit_parse_fine() {
    // digits <- digit digits | digit; each input byte costs two
    // activations, well inside the default limit.
    let mut grammar: Grammar<()> = Grammar::new();
    let digits = grammar.nonterminal("digits");
    let digit = grammar.nonterminal("digit");
    grammar.add_rule(digit, Rule::new().elem(Element::set(CharSet::range(b'0', b'9'))));
    grammar.add_rule(
        digits,
        Rule::new().elem(Element::nt(digit)).elem(Element::nt(digits)),
    );
    grammar.add_rule(digits, Rule::new().elem(Element::nt(digit)));

    let input = "9".repeat(200);
    assert!(parse(&grammar, digits, &input).is_ok());
}

#[test]
fn non_consuming_recursive_rule_does_not_spin() {
    // A recursive rule with no elements succeeds without consuming;
    // the growing loop must not apply it forever.
    let mut grammar: Grammar<()> = Grammar::new();
    let item = grammar.nonterminal("item");
    grammar.add_rule(item, Rule::new().elem(Element::ch(b'x')));
    grammar.add_recursive_rule(item, Rule::new());

    assert!(parse(&grammar, item, "x").is_ok());
}
