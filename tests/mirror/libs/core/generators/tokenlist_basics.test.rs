// [tests/mirror/libs/core/generators/tokenlist_basics.test.rs]
/**
 * =================================================================
 * APARATO: TOKENLIST COMBINATORICS CERTIFIER (V1.0 - SOBERANO)
 * CLASIFICACIÓN: TRINITY EVIDENCE
 * RESPONSABILIDAD: VALIDACIÓN DE SECUENCIAS EXACTAS DEL GENERADOR
 * =================================================================
 */

use lazarus_core_generators::{
    candidate_stream, CandidateSource, GeneratorSettings, TokenCountBounds,
};

fn generate(tokenlist: &str, settings: &GeneratorSettings) -> Vec<String> {
    let source =
        CandidateSource::parse_token_list(tokenlist, settings).expect("tokenlist must parse");
    candidate_stream(&source, settings).collect()
}

fn generate_default(tokenlist: &str) -> Vec<String> {
    generate(tokenlist, &GeneratorSettings::default())
}

fn with_bounds(min_tokens: usize, max_tokens: usize) -> GeneratorSettings {
    GeneratorSettings {
        bounds: TokenCountBounds {
            min_tokens,
            max_tokens,
        },
        ..GeneratorSettings::default()
    }
}

#[test]
fn certify_two_optional_sections() {
    assert_eq!(
        generate_default("one\ntwo"),
        vec!["one", "two", "twoone", "onetwo"]
    );
}

#[test]
fn certify_mutually_exclusive_alternatives() {
    assert_eq!(generate_default("one two three"), vec!["one", "two", "three"]);
}

#[test]
fn certify_required_sections() {
    assert_eq!(
        generate_default("one\n+ two\n+ three"),
        vec![
            "threetwo",
            "twothree",
            "threetwoone",
            "threeonetwo",
            "twothreeone",
            "twoonethree",
            "onethreetwo",
            "onetwothree"
        ]
    );
}

#[test]
fn certify_min_tokens_zero_admits_empty_candidate() {
    assert_eq!(generate("one", &with_bounds(0, usize::MAX)), vec!["", "one"]);
}

#[test]
fn certify_min_tokens_two() {
    assert_eq!(
        generate("one\ntwo\nthree", &with_bounds(2, usize::MAX)),
        vec![
            "twoone",
            "onetwo",
            "threeone",
            "onethree",
            "threetwo",
            "twothree",
            "threetwoone",
            "threeonetwo",
            "twothreeone",
            "twoonethree",
            "onethreetwo",
            "onetwothree"
        ]
    );
}

#[test]
fn certify_max_tokens_two() {
    assert_eq!(
        generate("one\ntwo\nthree", &with_bounds(1, 2)),
        vec![
            "one",
            "two",
            "twoone",
            "onetwo",
            "three",
            "threeone",
            "onethree",
            "threetwo",
            "twothree"
        ]
    );
}

#[test]
fn certify_min_and_max_tokens_two() {
    assert_eq!(
        generate("one\ntwo\nthree", &with_bounds(2, 2)),
        vec!["twoone", "onetwo", "threeone", "onethree", "threetwo", "twothree"]
    );
}

#[test]
fn certify_mixed_sections_full_product() {
    let expected: Vec<String> = [
        4, 41, 14, 42, 24, 421, 412, 241, 214, 142, 124, 43, 34, 431, 413, 341, 314, 143, 134,
        5, 51, 15, 52, 25, 521, 512, 251, 215, 152, 125, 53, 35, 531, 513, 351, 315, 153, 135,
    ]
    .iter()
    .map(|number| number.to_string())
    .collect();
    assert_eq!(generate_default("1\n2 3\n+ 4 5"), expected);
}
