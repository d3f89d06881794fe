// [libs/core/generators/src/lib.rs]
/*!
 * =================================================================
 * APARATO: CANDIDATE GENERATOR CORE (V2.0 - HUB SOBERANO)
 * CLASIFICACIÓN: CORE PIPELINE (ESTRATO L1)
 * RESPONSABILIDAD: EXPOSICIÓN DEL NÚCLEO DE GENERACIÓN DE CANDIDATOS
 *
 * El núcleo transforma una especificación compacta de tokens en la
 * secuencia perezosa, finita, deduplicada y determinista de contraseñas
 * candidatas que alimenta al verificador de carteras.
 * =================================================================
 */

pub mod combinatorics;
pub mod dedup;
pub mod errors;
pub mod pipeline;
pub mod tokenlist;
pub mod typos;
pub mod wildcards;

pub use combinatorics::{TokenCountBounds, TokenPermutations};
pub use dedup::{BoundedSeenSet, DedupPolicy, DEDUP_STORE_CAPACITY};
pub use errors::{ParseFault, WildcardFault};
pub use pipeline::{
    candidate_stream, CandidateSource, CandidateStream, GeneratorSettings, WorkerSlice,
};
pub use tokenlist::{parse_token_specification, AnchorKind, Section, Token, TokenListModel};
pub use typos::{TypoMutator, TypoSettings};
pub use wildcards::{
    ContractDirection, ContractPolicy, TemplateNode, WildcardContext, WildcardTemplate,
};
