// [tests/mirror/libs/core/generators/wildcard_expansion.test.rs]
/**
 * =================================================================
 * APARATO: WILDCARD EXPANSION CERTIFIER (V1.1 - SOBERANO)
 * CLASIFICACIÓN: TRINITY EVIDENCE
 * RESPONSABILIDAD: SECUENCIAS EXACTAS DE EXPANSIÓN Y FALLOS DE SINTAXIS
 * =================================================================
 */

use lazarus_core_generators::{
    candidate_stream, parse_token_specification, CandidateSource, GeneratorSettings, ParseFault,
    WildcardContext, WildcardFault,
};

fn settings_with(custom_wild: Option<&str>, dedup_disable_level: u8) -> GeneratorSettings {
    GeneratorSettings {
        wildcards: match custom_wild {
            Some(specification) => {
                WildcardContext::with_custom(specification).expect("custom set must parse")
            }
            None => WildcardContext::default(),
        },
        dedup_disable_level,
        ..GeneratorSettings::default()
    }
}

fn generate(tokenlist: &str, settings: &GeneratorSettings) -> Vec<String> {
    let source =
        CandidateSource::parse_token_list(tokenlist, settings).expect("tokenlist must parse");
    candidate_stream(&source, settings).collect()
}

fn generate_default(tokenlist: &str) -> Vec<String> {
    generate(tokenlist, &settings_with(None, 0))
}

fn expect_wildcard_fault(tokenlist: &str, custom_wild: Option<&str>) -> WildcardFault {
    let context = match custom_wild {
        Some(specification) => WildcardContext::with_custom(specification).unwrap(),
        None => WildcardContext::default(),
    };
    match parse_token_specification(tokenlist, None, &context) {
        Err(ParseFault::Wildcard { fault, .. }) => fault,
        other => panic!("expected a wildcard fault, got {other:?}"),
    }
}

#[test]
fn certify_digit_wildcard_positions() {
    let digits: Vec<String> = (0..10).map(|d| d.to_string()).collect();
    assert_eq!(generate_default("%d"), digits);
    assert_eq!(
        generate_default("%dtest"),
        (0..10).map(|d| format!("{d}test")).collect::<Vec<_>>()
    );
    assert_eq!(
        generate_default("te%dst"),
        (0..10).map(|d| format!("te{d}st")).collect::<Vec<_>>()
    );
    assert_eq!(
        generate_default("test%d"),
        (0..10).map(|d| format!("test{d}")).collect::<Vec<_>>()
    );
}

#[test]
fn certify_custom_wildcard_requires_configuration() {
    assert!(matches!(
        expect_wildcard_fault("%c", None),
        WildcardFault::NoCustom
    ));
    assert!(matches!(
        expect_wildcard_fault("%C", None),
        WildcardFault::NoCustom
    ));
}

#[test]
fn certify_truncated_wildcard_is_invalid() {
    assert!(matches!(
        expect_wildcard_fault("test%", None),
        WildcardFault::Invalid
    ));
}

#[test]
fn certify_adjacent_wildcards_form_a_product() {
    let expected: Vec<String> = (0..100).map(|n| format!("{n:02}")).collect();
    assert_eq!(generate_default("%d%d"), expected);
}

#[test]
fn certify_fixed_length_two() {
    let expected: Vec<String> = (0..100).map(|n| format!("{n:02}")).collect();
    assert_eq!(generate_default("%2d"), expected);
}

#[test]
fn certify_ranged_length_ascends() {
    let mut expected: Vec<String> = vec![String::new()];
    expected.extend((0..10).map(|d| d.to_string()));
    expected.extend((0..100).map(|n| format!("{n:02}")));
    assert_eq!(generate_default("%0,2d"), expected);
}

#[test]
fn certify_length_order_fault() {
    assert!(matches!(
        expect_wildcard_fault("%2,1d", None),
        WildcardFault::LengthOrder { min: 2, max: 1 }
    ));
}

#[test]
fn certify_dangling_length_forms_are_invalid() {
    assert!(matches!(
        expect_wildcard_fault("%2,d", None),
        WildcardFault::Invalid
    ));
    assert!(matches!(
        expect_wildcard_fault("%,2d", None),
        WildcardFault::Invalid
    ));
}

#[test]
fn certify_alphabet_wildcards() {
    let lower: Vec<String> = ('a'..='z').map(String::from).collect();
    let upper: Vec<String> = ('A'..='Z').map(String::from).collect();
    assert_eq!(generate_default("%a"), lower);
    assert_eq!(generate_default("%A"), upper);

    let mut lower_first = lower.clone();
    lower_first.extend(upper.clone());
    assert_eq!(generate_default("%ia"), lower_first);

    let mut upper_first = upper;
    upper_first.extend(lower);
    assert_eq!(generate_default("%iA"), upper_first);
}

#[test]
fn certify_custom_set_with_ranges() {
    let settings = settings_with(Some("a-cD2"), 0);
    assert_eq!(generate("%c", &settings), vec!["a", "b", "c", "D", "2"]);
    assert_eq!(generate("%C", &settings), vec!["A", "B", "C", "D", "2"]);
}

#[test]
fn certify_custom_set_case_insensitive_orders() {
    let settings = settings_with(Some("a-cD2"), 1);
    assert_eq!(
        generate("%ic", &settings),
        vec!["a", "b", "c", "D", "2", "A", "B", "C", "d"]
    );
    assert_eq!(
        generate("%iC", &settings),
        vec!["A", "B", "C", "d", "2", "a", "b", "c", "D"]
    );
}

#[test]
fn certify_inline_sets_dedup_and_literal_dash() {
    let settings = settings_with(None, 1);
    assert_eq!(generate("%[abcc-]", &settings), vec!["a", "b", "c", "-"]);
    assert_eq!(
        generate("%i[abcc-]", &settings),
        vec!["a", "b", "c", "-", "A", "B", "C"]
    );
}

#[test]
fn certify_escaped_percent_is_literal() {
    assert_eq!(generate_default("%%[not-a-range]"), vec!["%[not-a-range]"]);
}

#[test]
fn certify_inline_ranges() {
    let settings = settings_with(None, 1);
    assert_eq!(generate("%[1dc-f]", &settings), vec!["1", "d", "c", "e", "f"]);
    assert_eq!(generate_default("%[a-c-e]"), vec!["a", "b", "c", "-", "e"]);
    assert_eq!(
        generate("%i[1dc-f]", &settings),
        vec!["1", "d", "c", "e", "f", "D", "C", "E", "F"]
    );
}

#[test]
fn certify_inverted_range_fault() {
    assert!(matches!(
        expect_wildcard_fault("%[c-a]", None),
        WildcardFault::RangeOrder {
            first: 'c',
            last: 'a'
        }
    ));
}

#[test]
fn certify_contracting_both_directions() {
    let settings = settings_with(None, 1);
    assert_eq!(
        generate("a%0,2-bcd", &settings),
        vec!["abcd", "bcd", "acd", "cd", "ad"]
    );
    assert_eq!(generate("abcd%1,2-", &settings), vec!["abc", "ab"]);
}

#[test]
fn certify_contracting_single_directions() {
    let settings = settings_with(None, 1);
    assert_eq!(generate("ab%0,1>cd", &settings), vec!["abcd", "abd"]);
    assert_eq!(generate("ab%0,3<cd", &settings), vec!["abcd", "acd", "cd"]);
}

#[test]
fn certify_multiple_contractions_compose() {
    let settings = settings_with(None, 1);
    assert_eq!(
        generate("%0,2-ab%[X]cd%0,2-", &settings),
        vec!["abXcd", "abXc", "abX", "bXcd", "bXc", "bX", "Xcd", "Xc", "X"]
    );
}
