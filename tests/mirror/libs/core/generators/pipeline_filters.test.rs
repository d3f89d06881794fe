// [tests/mirror/libs/core/generators/pipeline_filters.test.rs]
/**
 * =================================================================
 * APARATO: PIPELINE FILTER CERTIFIER (V1.1 - SOBERANO)
 * CLASIFICACIÓN: TRINITY EVIDENCE
 * RESPONSABILIDAD: FILTROS REGEX, DELIMITADOR, PARTICIÓN, DEDUP Y
 *                  PROPIEDADES UNIVERSALES DEL STREAM
 * =================================================================
 */

use proptest::prelude::*;

use lazarus_core_generators::{
    candidate_stream, CandidateSource, GeneratorSettings, TypoSettings, WorkerSlice,
};

fn generate(tokenlist: &str, settings: &GeneratorSettings) -> Vec<String> {
    let source =
        CandidateSource::parse_token_list(tokenlist, settings).expect("tokenlist must parse");
    candidate_stream(&source, settings).collect()
}

#[test]
fn certify_regex_only_keeps_matches() {
    let settings = GeneratorSettings {
        regex_only: Some(GeneratorSettings::compile_filter("o.e").unwrap()),
        ..GeneratorSettings::default()
    };
    assert_eq!(
        generate("one\ntwo", &settings),
        vec!["one", "twoone", "onetwo"]
    );
}

#[test]
fn certify_regex_never_drops_matches() {
    let settings = GeneratorSettings {
        regex_never: Some(GeneratorSettings::compile_filter("o.e").unwrap()),
        ..GeneratorSettings::default()
    };
    assert_eq!(generate("one\ntwo", &settings), vec!["two"]);
}

#[test]
fn certify_literal_delimiter_preserves_whitespace_and_empties() {
    let settings = GeneratorSettings {
        delimiter: Some("**".to_string()),
        ..GeneratorSettings::default()
    };
    assert_eq!(
        generate(" one ** two **** ", &settings),
        vec![" one ", " two ", "", " "]
    );
}

#[test]
fn certify_literal_delimiter_in_typo_maps() {
    let settings = GeneratorSettings {
        delimiter: Some("**".to_string()),
        dedup_disable_level: 1,
        typos: TypoSettings {
            max_typos: 2,
            map_table: TypoSettings::parse_map_file(" ab **A \n x **x", Some("**"))
                .expect("map must parse"),
            ..TypoSettings::default()
        },
        ..GeneratorSettings::default()
    };
    assert_eq!(
        generate("axb", &settings),
        vec!["axb", "Axb", " xb", "axA", "ax ", "AxA", "Ax ", " xA", " x "]
    );
}

#[test]
fn certify_worker_partitions_are_exact() {
    let tokenlist = "one two three four five six seven eight";
    let expectations = [
        (1, vec!["one", "four", "seven"]),
        (2, vec!["two", "five", "eight"]),
        (3, vec!["three", "six"]),
    ];
    for (index, expected) in expectations {
        let settings = GeneratorSettings {
            worker: Some(WorkerSlice { index, total: 3 }),
            ..GeneratorSettings::default()
        };
        assert_eq!(generate(tokenlist, &settings), expected, "worker {index}/3");
    }
}

#[test]
fn certify_progressive_dedup_disabling() {
    let level = |dedup_disable_level: u8| GeneratorSettings {
        dedup_disable_level,
        ..GeneratorSettings::default()
    };

    assert_eq!(
        generate("one\none", &level(3)),
        vec!["one", "one", "oneone", "oneone"]
    );
    assert_eq!(generate("one\none", &level(2)), vec!["one", "one", "oneone"]);
    assert_eq!(generate("one\none", &level(1)), vec!["one", "oneone"]);
    assert_eq!(generate("one\none", &level(0)), vec!["one", "oneone"]);
}

#[test]
fn certify_expansion_level_duplicates() {
    let with_level = |dedup_disable_level: u8| GeneratorSettings {
        dedup_disable_level,
        ..GeneratorSettings::default()
    };
    // Dos alternativas textualmente distintas con la misma expansión:
    // solo la deduplicación final las colapsa.
    assert_eq!(
        generate("%[ab] %[a-b]", &with_level(1)),
        vec!["a", "b", "a", "b"]
    );
    assert_eq!(generate("%[ab] %[a-b]", &with_level(0)), vec!["a", "b"]);
}

// =================================================================
// PROPIEDADES UNIVERSALES (PROVING GROUNDS)
// =================================================================

fn arbitrary_tokenlist() -> impl Strategy<Value = String> {
    let line = prop::sample::select(vec![
        "one",
        "two",
        "three",
        "^one",
        "two$",
        "%d",
        "+ four five",
        "one two",
    ]);
    prop::collection::vec(line, 1..4).prop_map(|lines| lines.join("\n"))
}

proptest! {
    /// Determinismo: la secuencia es función pura de los insumos.
    #[test]
    fn certify_enumeration_is_deterministic(tokenlist in arbitrary_tokenlist()) {
        let settings = GeneratorSettings::default();
        prop_assert_eq!(generate(&tokenlist, &settings), generate(&tokenlist, &settings));
    }

    /// Idempotencia del dedup: la secuencia deduplicada es la secuencia
    /// cruda con los repetidos removidos en orden de primera aparición.
    #[test]
    fn certify_dedup_is_first_occurrence_filter(tokenlist in arbitrary_tokenlist()) {
        let raw = generate(&tokenlist, &GeneratorSettings {
            dedup_disable_level: 3,
            ..GeneratorSettings::default()
        });
        let deduped = generate(&tokenlist, &GeneratorSettings::default());

        let mut seen = std::collections::HashSet::new();
        let expected: Vec<String> = raw
            .into_iter()
            .filter(|candidate| seen.insert(candidate.clone()))
            .collect();
        prop_assert_eq!(deduped, expected);
    }

    /// Partición: la unión de los workers reconstruye la secuencia
    /// completa y las porciones son disjuntas por ordinal.
    #[test]
    fn certify_worker_partition_reassembles(
        tokenlist in arbitrary_tokenlist(),
        total in 1usize..5,
    ) {
        let full = generate(&tokenlist, &GeneratorSettings::default());
        let mut reassembled: Vec<Option<String>> = vec![None; full.len()];

        for index in 1..=total {
            let settings = GeneratorSettings {
                worker: Some(WorkerSlice { index, total }),
                ..GeneratorSettings::default()
            };
            let slice_candidates = generate(&tokenlist, &settings);
            let expected_ordinals: Vec<usize> =
                (0..full.len()).filter(|o| o % total == index - 1).collect();
            prop_assert_eq!(slice_candidates.len(), expected_ordinals.len());
            for (ordinal, candidate) in expected_ordinals.into_iter().zip(slice_candidates) {
                prop_assert!(reassembled[ordinal].is_none(), "overlapping partitions");
                reassembled[ordinal] = Some(candidate);
            }
        }

        let reunited: Vec<String> = reassembled.into_iter().map(Option::unwrap).collect();
        prop_assert_eq!(reunited, full);
    }
}
