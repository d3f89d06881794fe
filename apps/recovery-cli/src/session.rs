// [apps/recovery-cli/src/session.rs]
/*!
 * =================================================================
 * APARATO: RECOVERY SESSION ENGINE (V3.0 - MAGAZINE AUDIT)
 * CLASIFICACIÓN: APPLICATION LAYER (ESTRATO L4)
 * RESPONSABILIDAD: ORQUESTACIÓN DE LA CAMPAÑA DE RECUPERACIÓN
 *
 * VISION HIPER-HOLÍSTICA:
 * 1. SESSION VALUE: Configuración, stream, bóveda y autosave viajan
 *    empaquetados en un único valor; cero estado global de proceso.
 * 2. MAGAZINE AUDIT: El productor único carga cargadores acotados y el
 *    pool de rayon los verifica; dentro del cargador gana el hit de
 *    ordinal más bajo, así el ordinal reportado es determinista.
 * 3. SEALED PROGRESS: Autosave al inicio, por cadencia temporal y al
 *    terminar; al hallar la contraseña se sella su ordinal global, de
 *    modo que una reanudación vuelve a verificar el hallazgo.
 * =================================================================
 */

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use anyhow::{anyhow, bail, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use tracing::{info, instrument, warn};

use lazarus_core_generators::{
    candidate_stream, CandidateSource, GeneratorSettings, TokenCountBounds, TypoSettings,
    WildcardContext,
};
use lazarus_domain_wallets::WalletVault;
use lazarus_infra_checkpoint::{AutosaveVault, InputFingerprints};

use crate::cli::{EnumerationSignature, RecoveryDirectives};

/// Tamaño del cargador de candidatos por ráfaga de verificación.
const BATCH_MAGAZINE_SIZE: usize = 4096;
/// Cadencia de autosave durante la campaña.
const AUTOSAVE_CADENCE: Duration = Duration::from_secs(300);

/// Veredicto final de una campaña de recuperación.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchVerdict {
    /// La contraseña verificó en el ordinal global indicado (0-based).
    Found { password: String, ordinal: u64 },
    /// El espacio de búsqueda se agotó sin hallazgos.
    Exhausted { tested: u64, skipped: u64 },
    /// El skip restaurado cubre la secuencia completa.
    SkippedAll { total: u64 },
    /// Modo listado: candidatos impresos sin verificación.
    Listed { printed: u64, skipped: u64 },
    /// Terminación por señal externa; el progreso quedó sellado.
    Interrupted { resume_skip: u64 },
}

impl std::fmt::Display for SearchVerdict {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Found { password, .. } => write!(formatter, "Password found: '{password}'"),
            Self::Exhausted { .. } => write!(formatter, "Password search exhausted"),
            Self::SkippedAll { total } => {
                write!(formatter, "Skipped all {total} passwords, exiting")
            }
            Self::Listed { printed, skipped } => {
                if *skipped > 0 {
                    write!(
                        formatter,
                        "{printed} password combinations (plus {skipped} skipped)"
                    )
                } else {
                    write!(formatter, "{printed} password combinations")
                }
            }
            Self::Interrupted { resume_skip } => {
                write!(formatter, "Interrupted by signal; progress sealed at {resume_skip}")
            }
        }
    }
}

/// Sesión de recuperación completamente ensamblada.
#[derive(Debug)]
pub struct RecoverySession {
    settings: GeneratorSettings,
    source: CandidateSource,
    vault: Option<WalletVault>,
    autosave: Option<AutosaveVault>,
    skip: u64,
    listpass: bool,
    threads: usize,
    show_progress: bool,
}

impl RecoverySession {
    /// Ensambla la sesión: lee insumos, parsea, despacha la bóveda,
    /// engancha el autosave y restaura el skip si corresponde.
    #[instrument(skip_all)]
    pub fn assemble(directives: RecoveryDirectives) -> Result<Self> {
        // 1. FUENTE DE CANDIDATOS
        let (source_kind, raw_source): (&'static str, String) =
            match (&directives.tokenlist, &directives.passwordlist) {
                (Some(path), None) => (
                    "tokenlist",
                    std::fs::read_to_string(path)
                        .with_context(|| format!("reading tokenlist {path:?}"))?,
                ),
                (None, Some(path)) => (
                    "passwordlist",
                    std::fs::read_to_string(path)
                        .with_context(|| format!("reading passwordlist {path:?}"))?,
                ),
                _ => bail!("exactly one of --tokenlist or --passwordlist must be supplied"),
            };

        // 2. CONTEXTO WILDCARD
        let wildcards = match &directives.custom_wild {
            Some(specification) => WildcardContext::with_custom(specification)
                .map_err(|fault| anyhow!(lazarus_core_generators::ParseFault::CustomSet { fault }))?,
            None => WildcardContext::default(),
        };

        // 3. CONFIGURACIÓN DE TYPOS
        let typos_map_content = match &directives.typos_map {
            Some(path) => Some(
                std::fs::read_to_string(path)
                    .with_context(|| format!("reading typos-map {path:?}"))?,
            ),
            None => None,
        };
        let typos = build_typo_settings(&directives, typos_map_content.as_deref(), &wildcards)?;

        // 4. CONFIGURACIÓN DEL GENERADOR
        let settings = GeneratorSettings {
            bounds: TokenCountBounds {
                min_tokens: directives.min_tokens,
                max_tokens: directives.max_tokens.unwrap_or(usize::MAX),
            },
            dedup_disable_level: directives.disable_dup_checks,
            regex_only: directives
                .regex_only
                .as_deref()
                .map(GeneratorSettings::compile_filter)
                .transpose()?,
            regex_never: directives
                .regex_never
                .as_deref()
                .map(GeneratorSettings::compile_filter)
                .transpose()?,
            worker: directives.worker,
            typos,
            wildcards,
            delimiter: directives.delimiter.clone(),
        };

        let source = match source_kind {
            "tokenlist" => CandidateSource::parse_token_list(&raw_source, &settings)?,
            _ => CandidateSource::from_password_lines(&raw_source),
        };

        // 5. BÓVEDA DE VERIFICACIÓN
        let vault = match (&directives.wallet, &directives.privkey) {
            (Some(path), _) => Some(WalletVault::load_wallet(path)?),
            (None, Some(blob)) => Some(WalletVault::load_from_base64_key(blob)?),
            (None, None) => None,
        };
        if vault.is_none() && !directives.listpass {
            bail!("supply a wallet file or --privkey, or use --listpass");
        }

        // 6. FINGERPRINTS Y AUTOSAVE
        let signature =
            EnumerationSignature::from_directives(&directives, source_kind, typos_map_content.as_deref());
        let fingerprints = InputFingerprints {
            argv: InputFingerprints::digest_canonical(&signature)?,
            tokenlist: InputFingerprints::digest_bytes(raw_source.as_bytes()),
            key: InputFingerprints::digest_bytes(
                vault.as_ref().map(WalletVault::key_material).unwrap_or(&[]),
            ),
        };

        let autosave_path: Option<PathBuf> =
            directives.autosave.clone().or_else(|| directives.restore.clone());
        let (autosave, restored_skip) = match autosave_path {
            Some(path) => {
                let engaged = AutosaveVault::engage(&path, fingerprints)?;
                (Some(engaged.vault), engaged.restored_skip)
            }
            None => (None, None),
        };

        let skip = restored_skip.unwrap_or(directives.skip);
        if restored_skip.is_some() {
            info!("📼 [SESSION]: Resuming campaign with {} candidates already covered.", skip);
        }

        Ok(Self {
            settings,
            source,
            vault,
            autosave,
            skip,
            listpass: directives.listpass,
            threads: directives.threads.unwrap_or_else(num_cpus::get).max(1),
            show_progress: !directives.no_progress && !directives.listpass,
        })
    }

    /// Ejecuta la campaña hasta hallazgo, agotamiento o señal de corte.
    #[instrument(skip_all, fields(threads = self.threads, skip = self.skip))]
    pub fn execute(&mut self, stop_signal: &AtomicBool) -> Result<SearchVerdict> {
        let mut stream = candidate_stream(&self.source, &self.settings);

        // 1. COMPUERTA DE SKIP
        let mut drained = 0u64;
        while drained < self.skip {
            if stream.next().is_none() {
                let verdict = SearchVerdict::SkippedAll { total: drained };
                info!("🏁 [SESSION]: {}", verdict);
                return Ok(verdict);
            }
            drained += 1;
        }

        // 2. SELLO INICIAL (posición de arranque, antes de verificar nada)
        if let Some(vault) = self.autosave.as_mut() {
            vault.seal(self.skip)?;
        }

        // 3. MODO LISTADO
        if self.listpass {
            let mut printed = 0u64;
            for candidate in stream.by_ref() {
                println!("{candidate}");
                printed += 1;
            }
            return Ok(SearchVerdict::Listed {
                printed,
                skipped: self.skip,
            });
        }

        let wallet_vault = self
            .vault
            .as_ref()
            .expect("assemble guarantees a vault outside listpass mode");

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.threads)
            .build()
            .context("building the verification pool")?;

        let progress = self.show_progress.then(|| {
            let bar = ProgressBar::new_spinner();
            bar.set_style(
                ProgressStyle::with_template("{spinner} {pos} candidates audited ({per_sec})")
                    .expect("static template"),
            );
            bar
        });

        // 4. BUCLE MAESTRO DE RÁFAGAS
        let mut audited = 0u64;
        let mut last_seal = Instant::now();
        let mut magazine: Vec<String> = Vec::with_capacity(BATCH_MAGAZINE_SIZE);

        loop {
            if stop_signal.load(Ordering::Relaxed) {
                let resume_skip = self.skip + audited;
                seal_best_effort(&mut self.autosave, resume_skip);
                if let Some(bar) = &progress {
                    bar.finish_and_clear();
                }
                warn!("⚠️ [SESSION]: Interrupted; campaign sealed at {}.", resume_skip);
                return Ok(SearchVerdict::Interrupted { resume_skip });
            }

            magazine.clear();
            while magazine.len() < BATCH_MAGAZINE_SIZE {
                match stream.next() {
                    Some(candidate) => magazine.push(candidate),
                    None => break,
                }
            }

            if magazine.is_empty() {
                let total = self.skip + audited;
                if audited == 0 && self.skip > 0 {
                    let verdict = SearchVerdict::SkippedAll { total: self.skip };
                    info!("🏁 [SESSION]: {}", verdict);
                    return Ok(verdict);
                }
                if let Some(vault) = self.autosave.as_mut() {
                    vault.seal(total)?;
                }
                if let Some(bar) = &progress {
                    bar.finish_and_clear();
                }
                info!("🏁 [SESSION]: Search exhausted after {} candidates.", total);
                return Ok(SearchVerdict::Exhausted {
                    tested: audited,
                    skipped: self.skip,
                });
            }

            // Dentro del cargador gana el ordinal más bajo: determinismo.
            let magazine_hit = pool.install(|| {
                magazine
                    .par_iter()
                    .enumerate()
                    .filter_map(|(offset, candidate)| {
                        wallet_vault
                            .verify_candidate(candidate)
                            .map(|password| (offset, password))
                    })
                    .min_by_key(|(offset, _)| *offset)
            });

            if let Some((offset, password)) = magazine_hit {
                let ordinal = self.skip + audited + offset as u64;
                if let Some(vault) = self.autosave.as_mut() {
                    vault.seal(ordinal)?;
                }
                if let Some(bar) = &progress {
                    bar.finish_and_clear();
                }
                info!("🎯 [SESSION]: Password verified at ordinal {}.", ordinal);
                return Ok(SearchVerdict::Found { password, ordinal });
            }

            audited += magazine.len() as u64;
            if let Some(bar) = &progress {
                bar.set_position(audited);
            }

            if last_seal.elapsed() >= AUTOSAVE_CADENCE {
                if let Some(vault) = self.autosave.as_mut() {
                    vault.seal(self.skip + audited)?;
                }
                last_seal = Instant::now();
            }
        }
    }

}

/// Sellado final de cortesía; el fallo degrada al checkpoint previo.
fn seal_best_effort(autosave: &mut Option<AutosaveVault>, skip: u64) {
    if let Some(vault) = autosave.as_mut() {
        if let Err(fault) = vault.seal(skip) {
            warn!("⚠️ [SESSION]: Final autosave failed ({fault}); previous checkpoint stands.");
        }
    }
}

/// Traduce las directivas de typos a la configuración del mutador.
fn build_typo_settings(
    directives: &RecoveryDirectives,
    typos_map_content: Option<&str>,
    wildcards: &WildcardContext,
) -> Result<TypoSettings> {
    let insert_expansions = match &directives.typos_insert {
        Some(template) => TypoSettings::expand_typo_template(template, wildcards)?,
        None => Vec::new(),
    };
    let replace_expansions = match &directives.typos_replace {
        Some(template) => TypoSettings::expand_typo_template(template, wildcards)?,
        None => Vec::new(),
    };
    let map_table = match typos_map_content {
        Some(content) => TypoSettings::parse_map_file(content, directives.delimiter.as_deref())?,
        None => Default::default(),
    };

    Ok(TypoSettings {
        max_typos: directives.max_typos,
        min_typos: directives.min_typos,
        capslock: directives.typos_capslock,
        swap: directives.typos_swap,
        repeat: directives.typos_repeat,
        delete: directives.typos_delete,
        case_flip: directives.typos_case,
        close_case_flip: directives.typos_closecase,
        insert_expansions,
        replace_expansions,
        map_table,
    })
}
