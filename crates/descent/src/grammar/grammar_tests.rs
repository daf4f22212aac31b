use descent_core::CharSet;

use super::{Element, Grammar, Rule};

#[test]
fn nonterminal_is_find_or_add() {
    let mut grammar: Grammar<()> = Grammar::new();
    let a = grammar.nonterminal("a");
    let b = grammar.nonterminal("b");
    let a_again = grammar.nonterminal("a");

    assert_eq!(a, a_again);
    assert_ne!(a, b);
    assert_eq!(grammar.len(), 2);
    assert_eq!(grammar.name(a), "a");
    assert_eq!(grammar.name(b), "b");
}

#[test]
fn lookup_does_not_add() {
    let mut grammar: Grammar<()> = Grammar::new();
    assert_eq!(grammar.lookup("missing"), None);

    let a = grammar.nonterminal("a");
    assert_eq!(grammar.lookup("a"), Some(a));
    assert_eq!(grammar.len(), 1);
}

#[test]
fn iter_follows_insertion_order() {
    let mut grammar: Grammar<()> = Grammar::new();
    let z = grammar.nonterminal("zeta");
    let a = grammar.nonterminal("alpha");

    let names: Vec<&str> = grammar.iter().map(|nt| grammar.name(nt)).collect();
    assert_eq!(names, ["zeta", "alpha"]);
    assert_eq!(grammar.iter().collect::<Vec<_>>(), vec![z, a]);
}

#[test]
fn chain_implies_sequence() {
    let element: Element<()> = Element::ch(b'a').chain(Rule::new().elem(Element::ch(b',')));
    assert!(element.sequence);
    assert!(element.chain.is_some());
}

#[test]
fn dump_renders_sequence_markers() {
    let mut grammar: Grammar<()> = Grammar::new();
    let number = grammar.nonterminal("number");
    grammar.add_rule(
        number,
        Rule::new().elem(Element::set(CharSet::range(b'0', b'9')).sequence()),
    );
    let committed = grammar.nonterminal("committed");
    grammar.add_rule(
        committed,
        Rule::new().elem(Element::set(CharSet::range(b'0', b'9')).sequence().greedy()),
    );

    insta::assert_snapshot!(grammar.dump(), @r"
    number:
      [0-9] SEQ BACK_TRACKING
    committed:
      [0-9] SEQ
    ");
}

#[test]
fn dump_renders_groupings_literals_and_modifiers() {
    let mut grammar: Grammar<()> = Grammar::new();
    let ws = grammar.nonterminal("white_space");

    let mut blank = CharSet::new();
    blank.add(b' ');
    blank.add(b'\t');
    blank.add(b'\n');
    let mut body = CharSet::range(b' ', 255);
    body.add(b'\t');
    body.add(b'\n');

    grammar.add_rule(
        ws,
        Rule::new().elem(
            Element::group([
                Rule::new().elem(Element::set(blank)),
                Rule::new()
                    .elem(Element::ch(b'/'))
                    .elem(Element::ch(b'*'))
                    .elem(Element::set(body).sequence().optional().avoid())
                    .elem(Element::ch(b'*'))
                    .elem(Element::ch(b'/')),
            ])
            .sequence()
            .optional(),
        ),
    );

    insta::assert_snapshot!(grammar.dump(), @r"
    white_space:
      ([\t\n ] | '/' '*' [\t\n -\xff] SEQ BACK_TRACKING OPT AVOID '*' '/') SEQ BACK_TRACKING OPT
    ");
}

#[test]
fn dump_renders_recursive_rules_chains_and_specials() {
    let mut grammar: Grammar<()> = Grammar::new();
    let expr = grammar.nonterminal("expr");
    let args = grammar.nonterminal("args");
    let root = grammar.nonterminal("root");

    grammar.add_rule(expr, Rule::new().elem(Element::ch(b'x')));
    grammar.add_recursive_rule(
        expr,
        Rule::new()
            .elem(Element::ch(b'('))
            .elem(Element::nt(args).optional())
            .elem(Element::ch(b')')),
    );
    grammar.add_rule(
        args,
        Rule::new().elem(Element::nt(expr).chain(Rule::new().elem(Element::ch(b',')))),
    );
    grammar.add_rule(
        root,
        Rule::new()
            .elem(Element::terminal(|_| None))
            .elem(Element::nt(expr))
            .elem(Element::end()),
    );
    grammar.add_rule(root, Rule::new());

    insta::assert_snapshot!(grammar.dump(), @r"
    expr:
      'x'
      rec: '(' args OPT ')'
    args:
      expr CHAIN(',') BACK_TRACKING
    root:
      <term> expr <eof>
      <empty>
    ");
}

#[test]
fn dump_escapes_character_literals() {
    let mut grammar: Grammar<()> = Grammar::new();
    let s = grammar.nonterminal("s");
    grammar.add_rule(
        s,
        Rule::new()
            .elem(Element::ch(b'\n'))
            .elem(Element::ch(b'\t'))
            .elem(Element::ch(b'\''))
            .elem(Element::ch(b'\\'))
            .elem(Element::ch(0x01)),
    );

    insta::assert_snapshot!(grammar.dump(), @r#"
    s:
      '\n' '\t' '\'' '\\' '\x01'
    "#);
}
