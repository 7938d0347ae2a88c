//! Integration tests for short-cluster unbundling and related token shapes.

use argbind::{BindError, Flag, Opt, Strictness};

fn tokens(args: Vec<&str>) -> Vec<String> {
    args.into_iter().map(String::from).collect()
}

// =============================================================================
// UNBUNDLING
// =============================================================================

#[test]
fn cluster_of_flags_with_a_trailing_integer_option() {
    let grammar = Flag::new(&["a"])
        .unwrap()
        .single()
        .zip(Flag::new(&["b"]).unwrap().single())
        .zip(Flag::new(&["c"]).unwrap().single())
        .zip(Opt::integer(&["d"]).unwrap().default_value(0));

    let bound = grammar
        .bind(tokens(vec!["-acd", "42"]), Strictness::Strict)
        .unwrap();
    let (((a, b), c), d) = bound.value;
    assert!(a);
    assert!(!b);
    assert!(c);
    assert_eq!(d, 42);
    assert!(bound.tail.is_empty());
}

#[test]
fn value_bearing_option_swallows_the_cluster_remainder() {
    let grammar = Flag::new(&["a"])
        .unwrap()
        .single()
        .zip(Opt::<String>::new(&["x"]).unwrap().nullable());

    // Everything after `x` is its attached value, even option-like text.
    let bound = grammar
        .bind(tokens(vec!["-axab"]), Strictness::Strict)
        .unwrap();
    assert_eq!(bound.value, (true, Some("ab".to_string())));
}

#[test]
fn flags_inside_a_cluster_take_signs() {
    let grammar = Flag::new(&["f"])
        .unwrap()
        .list()
        .zip(Flag::new(&["v"]).unwrap().counted());

    let bound = grammar
        .bind(tokens(vec!["-f+vf-"]), Strictness::Strict)
        .unwrap();
    assert_eq!(bound.value, (vec![true, false], 1));
}

#[test]
fn unknown_character_invalidates_the_whole_cluster() {
    let grammar = Flag::new(&["a"])
        .unwrap()
        .single()
        .zip(Flag::new(&["b"]).unwrap().single());

    for strictness in [Strictness::Strict, Strictness::Tolerant] {
        let err = grammar.bind(tokens(vec!["-azb"]), strictness).unwrap_err();
        assert!(matches!(
            err,
            BindError::InvalidOption { ref token, unbundled }
            if token == "-azb" && unbundled == 'z'
        ));
    }
}

#[test]
fn rejected_cluster_has_no_partial_effect() {
    let grammar = Flag::new(&["a"]).unwrap().counted();
    let err = grammar.bind(tokens(vec!["-aaz"]), Strictness::Tolerant).unwrap_err();
    assert!(matches!(err, BindError::InvalidOption { .. }));
}

#[test]
fn cluster_final_option_reads_the_following_token() {
    let grammar = Flag::new(&["a"])
        .unwrap()
        .single()
        .zip(Opt::<i64>::new(&["x"]).unwrap().nullable());

    let bound = grammar
        .bind(tokens(vec!["-ax", "9"]), Strictness::Strict)
        .unwrap();
    assert_eq!(bound.value, (true, Some(9)));
}

// =============================================================================
// NEGATIVE NUMBERS
// =============================================================================

#[test]
fn negative_number_binds_the_integer_option_digits() {
    let grammar = Opt::integer(&["int"]).unwrap().default_value(0);
    let bound = grammar.bind(tokens(vec!["-42"]), Strictness::Strict).unwrap();
    assert_eq!(bound.value, 42);
}

#[test]
fn negative_number_without_an_integer_option_tails_in_both_modes() {
    let grammar = Flag::new(&["a"]).unwrap().single();
    for strictness in [Strictness::Strict, Strictness::Tolerant] {
        let bound = grammar.bind(tokens(vec!["-42"]), strictness).unwrap();
        assert!(!bound.value);
        assert_eq!(bound.tail, vec!["-42".to_string()]);
    }
}

#[test]
fn integer_option_still_binds_named_forms() {
    let grammar = Opt::integer(&["d", "digits"]).unwrap().list();
    let bound = grammar
        .bind(
            tokens(vec!["-d", "1", "--digits=2", "-d3", "-4"]),
            Strictness::Strict,
        )
        .unwrap();
    assert_eq!(bound.value, vec![1, 2, 3, 4]);
}

#[test]
fn out_of_range_digits_are_an_invalid_value() {
    let grammar = Opt::integer(&["int"]).unwrap().default_value(0);
    let err = grammar
        .bind(
            tokens(vec!["-99999999999999999999999999"]),
            Strictness::Strict,
        )
        .unwrap_err();
    assert!(matches!(
        err,
        BindError::InvalidValue { option, .. } if option == "--int"
    ));
}

// =============================================================================
// SINGLE DASH
// =============================================================================

#[test]
fn single_dash_is_a_bare_token() {
    let grammar = Flag::new(&["a"]).unwrap().single();
    let bound = grammar.bind(tokens(vec!["-"]), Strictness::Tolerant).unwrap();
    assert_eq!(bound.tail, vec!["-".to_string()]);
}
