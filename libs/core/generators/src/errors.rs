// [libs/core/generators/src/errors.rs]
/*!
 * =================================================================
 * APARATO: GENERATOR FAULT CATALOG (V1.2 - SOBERANO)
 * CLASIFICACIÓN: CORE PIPELINE (ESTRATO L1)
 * RESPONSABILIDAD: CATALOGACIÓN SEMÁNTICA DE FALLOS DE PARSEO
 *
 * VISION HIPER-HOLÍSTICA:
 * 1. LINE AWARENESS: Todo fallo originado en el tokenlist porta el número
 *    de línea para que el operador lo localice sin re-leer el archivo.
 * 2. CONTEXT SPLIT: Los fallos de sintaxis wildcard viven en su propio
 *    catálogo sin línea, porque las plantillas de typos llegan por CLI.
 * 3. ZERO ABBREVIATIONS: Nomenclatura nominal absoluta.
 * =================================================================
 */

use thiserror::Error;

/// Fallo de sintaxis dentro de un programa wildcard aislado.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WildcardFault {
    /// Metasintaxis irreconocible o truncada tras el marcador '%'.
    #[error("invalid wildcard")]
    Invalid,

    /// Se usó '%c' o '%C' sin un conjunto personalizado configurado.
    #[error("invalid wildcard (%c requires a custom character set)")]
    NoCustom,

    /// El largo mínimo declarado excede al máximo.
    #[error("min wildcard length ({min}) > max length ({max})")]
    LengthOrder { min: usize, max: usize },

    /// Un rango interno 'x-y' está invertido según el orden de los códigos.
    #[error("first character in wildcard range '{first}' > last '{last}'")]
    RangeOrder { first: char, last: char },

    /// Wildcard de contracción en un contexto que lo prohíbe.
    #[error("contracting wildcards are not permitted here")]
    ContractForbidden,
}

/// Catálogo de fallos del estrato de parseo del generador.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseFault {
    /// El token porta un ancla '^' al inicio y un '$' al final.
    #[error("[L1_TOKEN_FAULT]: ANCHOR_CONFLICT -> token on line {line} is anchored with both ^ at the beginning and $ at the end")]
    AnchorConflict { line: usize },

    /// Ancla posicional fuera del dominio 1-based.
    #[error("[L1_TOKEN_FAULT]: ANCHOR_POSITION -> anchor position of token on line {line} must be 1 or greater")]
    AnchorPosition { line: usize },

    /// El inicio de un ancla de rango es menor que 2.
    #[error("[L1_TOKEN_FAULT]: ANCHOR_RANGE_BEGIN -> anchor range of token on line {line} must begin with 2 or greater")]
    AnchorRangeBegin { line: usize },

    /// El inicio de un ancla de rango excede a su final.
    #[error("[L1_TOKEN_FAULT]: ANCHOR_RANGE_ORDER -> anchor range of token on line {line} is invalid")]
    AnchorRangeOrder { line: usize },

    /// Programa wildcard inválido dentro de un token del tokenlist.
    #[error("[L1_WILDCARD_FAULT]: on line {line}: {fault}")]
    Wildcard { line: usize, fault: WildcardFault },

    /// Programa wildcard inválido en una plantilla de typos (CLI).
    #[error("[L1_TYPO_TEMPLATE_FAULT]: {fault}")]
    TypoTemplate { fault: WildcardFault },

    /// Conjunto personalizado (--custom-wild) sintácticamente inválido.
    #[error("[L1_CUSTOM_SET_FAULT]: {fault}")]
    CustomSet { fault: WildcardFault },

    /// Entrada malformada en el archivo de mapa de typos.
    #[error("[L1_TYPO_MAP_FAULT]: BAD_MAP -> malformed typos-map entry on line {line}: {detail}")]
    BadMap { line: usize, detail: String },

    /// Expresión regular de filtrado inaceptable.
    #[error("[L1_FILTER_FAULT]: REGEX_SYNTAX -> {detail}")]
    FilterSyntax { detail: String },

    /// Partición de worker sintácticamente inválida (se espera 'i/N', 1 <= i <= N).
    #[error("[L1_PARTITION_FAULT]: WORKER_SLICE -> {detail}")]
    WorkerSlice { detail: String },
}

impl ParseFault {
    /// Adjunta el número de línea a un fallo wildcard surgido en el tokenlist.
    pub fn wildcard_at_line(line: usize, fault: WildcardFault) -> Self {
        ParseFault::Wildcard { line, fault }
    }
}
