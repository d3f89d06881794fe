// [libs/core/generators/src/pipeline.rs]
/*!
 * =================================================================
 * APARATO: CANDIDATE PIPELINE COMPOSER (V2.0 - FULL STACK)
 * CLASIFICACIÓN: CORE PIPELINE (ESTRATO L1)
 * RESPONSABILIDAD: COMPOSICIÓN PEREZOSA DE TODAS LAS ETAPAS
 *
 * VISION HIPER-HOLÍSTICA:
 * 1. STAGE STACK: fuente -> mutador de typos -> filtros regex ->
 *    deduplicación final -> partición de worker. El skip lo administra la
 *    sesión consumiendo el stream, para poder contabilizarlo.
 * 2. SINGLE PRODUCER: El stream es un productor único, finito y no
 *    reiniciable por corrida; no acumula buffers intermedios.
 * 3. DETERMINISM: Toda la secuencia es función pura del modelo y de la
 *    configuración; dos corridas idénticas emiten lo mismo.
 * =================================================================
 */

use regex::Regex;
use serde::Serialize;
use std::str::FromStr;
use tracing::warn;

use crate::combinatorics::{TokenCountBounds, TokenPermutations};
use crate::dedup::{BoundedSeenSet, DedupPolicy};
use crate::errors::ParseFault;
use crate::tokenlist::{parse_token_specification, Token, TokenListModel};
use crate::typos::{TypoMutator, TypoSettings};
use crate::wildcards::{ContractPolicy, TemplateExpansion, WildcardContext, WildcardTemplate};

/// Porción de búsqueda asignada a un worker ('i/N', 1-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WorkerSlice {
    pub index: usize,
    pub total: usize,
}

impl WorkerSlice {
    /// Cierto si el ordinal post-deduplicación pertenece a esta porción.
    pub fn owns_ordinal(&self, ordinal: u64) -> bool {
        ordinal % (self.total as u64) == (self.index as u64) - 1
    }
}

impl FromStr for WorkerSlice {
    type Err = ParseFault;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let malformed = || ParseFault::WorkerSlice {
            detail: format!("'{raw}' is not of the form i/N with 1 <= i <= N"),
        };
        let (index_text, total_text) = raw.split_once('/').ok_or_else(malformed)?;
        let index: usize = index_text.trim().parse().map_err(|_| malformed())?;
        let total: usize = total_text.trim().parse().map_err(|_| malformed())?;
        if index < 1 || total < 1 || index > total {
            return Err(malformed());
        }
        Ok(Self { index, total })
    }
}

/// Configuración completa del generador de candidatos.
#[derive(Debug, Clone, Default)]
pub struct GeneratorSettings {
    pub bounds: TokenCountBounds,
    /// Conteo de banderas '-d' (0 a 3).
    pub dedup_disable_level: u8,
    pub regex_only: Option<Regex>,
    pub regex_never: Option<Regex>,
    pub worker: Option<WorkerSlice>,
    pub typos: TypoSettings,
    pub wildcards: WildcardContext,
    /// Delimitador literal para tokenlist y mapa de typos; None = espacios.
    pub delimiter: Option<String>,
}

impl GeneratorSettings {
    pub fn compile_filter(pattern: &str) -> Result<Regex, ParseFault> {
        Regex::new(pattern).map_err(|error| ParseFault::FilterSyntax {
            detail: error.to_string(),
        })
    }
}

/// Fuente de candidatos base.
#[derive(Debug, Clone)]
pub enum CandidateSource {
    /// Tokenlist parseado: combinatoria + wildcards + typos.
    TokenList(TokenListModel),
    /// Passwordlist: una base literal por línea; solo typos.
    PasswordList(Vec<String>),
}

impl CandidateSource {
    pub fn parse_token_list(
        raw_specification: &str,
        settings: &GeneratorSettings,
    ) -> Result<Self, ParseFault> {
        let model = parse_token_specification(
            raw_specification,
            settings.delimiter.as_deref(),
            &settings.wildcards,
        )?;
        Ok(Self::TokenList(model))
    }

    pub fn from_password_lines(raw_list: &str) -> Self {
        let lines = raw_list
            .lines()
            .filter(|line| !line.is_empty())
            .map(str::to_owned)
            .collect();
        Self::PasswordList(lines)
    }
}

/// Stream perezoso de candidatos finales (post-partición, pre-skip).
pub struct CandidateStream<'a> {
    inner: Box<dyn Iterator<Item = String> + 'a>,
}

impl Iterator for CandidateStream<'_> {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }
}

/// Compone el pipeline completo sobre la fuente dada.
pub fn candidate_stream<'a>(
    source: &'a CandidateSource,
    settings: &'a GeneratorSettings,
) -> CandidateStream<'a> {
    let policy = DedupPolicy::from_disable_level(settings.dedup_disable_level);

    // 1. FUENTE DE BASES
    let bases: Box<dyn Iterator<Item = String> + 'a> = match source {
        CandidateSource::TokenList(model) => Box::new(AssembledBases::new(
            TokenPermutations::new(model, settings.bounds, policy),
            &settings.wildcards,
        )),
        CandidateSource::PasswordList(lines) => Box::new(lines.iter().cloned()),
    };

    // 2. MUTACIÓN DE TYPOS
    let mutated = TypoMutator::new(bases, &settings.typos);

    // 3. FILTROS REGEX (búsqueda por substring, no match total)
    let regex_only = settings.regex_only.clone();
    let regex_never = settings.regex_never.clone();
    let filtered = mutated.filter(move |candidate| {
        if let Some(pattern) = &regex_only {
            if !pattern.is_match(candidate) {
                return false;
            }
        }
        if let Some(pattern) = &regex_never {
            if pattern.is_match(candidate) {
                return false;
            }
        }
        true
    });

    // 4. DEDUPLICACIÓN FINAL (global, acotada)
    let deduped: Box<dyn Iterator<Item = String> + 'a> = if policy.final_candidates {
        let mut seen_candidates = BoundedSeenSet::with_default_capacity("final-candidates");
        Box::new(filtered.filter(move |candidate| seen_candidates.record(candidate.clone())))
    } else {
        Box::new(filtered)
    };

    // 5. PARTICIÓN DE WORKER (ordinal post-deduplicación)
    let partitioned: Box<dyn Iterator<Item = String> + 'a> = match settings.worker {
        Some(slice) => Box::new(
            deduped
                .enumerate()
                .filter(move |(ordinal, _)| slice.owns_ordinal(*ordinal as u64))
                .map(|(_, candidate)| candidate),
        ),
        None => deduped,
    };

    CandidateStream { inner: partitioned }
}

/// Ensambla cada permutación legal en su template conjunto y lo expande.
struct AssembledBases<'a> {
    permutations: TokenPermutations<'a>,
    context: &'a WildcardContext,
    active_expansion: Option<TemplateExpansion>,
}

impl<'a> AssembledBases<'a> {
    fn new(permutations: TokenPermutations<'a>, context: &'a WildcardContext) -> Self {
        Self {
            permutations,
            context,
            active_expansion: None,
        }
    }

    fn join_permutation(permutation: &[&Token]) -> String {
        let mut joined = String::new();
        for token in permutation {
            joined.push_str(&token.text);
        }
        joined
    }
}

impl Iterator for AssembledBases<'_> {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(expansion) = self.active_expansion.as_mut() {
                if let Some(base) = expansion.next() {
                    return Some(base);
                }
                self.active_expansion = None;
            }

            let permutation = self.permutations.next()?;
            let joined = Self::join_permutation(&permutation);
            // Cada token fue validado en el parseo; la concatenación de
            // programas válidos sigue siendo válida.
            match WildcardTemplate::parse(&joined, self.context, ContractPolicy::Allowed) {
                Ok(template) => self.active_expansion = Some(template.into_expansions()),
                Err(fault) => {
                    warn!(
                        "⚠️ [TEMPLATE_FAULT]: Joined template '{}' rejected after token-level validation: {}",
                        joined, fault
                    );
                }
            }
        }
    }
}
