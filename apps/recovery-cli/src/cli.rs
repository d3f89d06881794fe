// [apps/recovery-cli/src/cli.rs]
/*!
 * =================================================================
 * APARATO: RECOVERY COMMAND DIRECTIVES (V2.0 - ZENITH SHELL)
 * CLASIFICACIÓN: APPLICATION LAYER (ESTRATO L4)
 * RESPONSABILIDAD: SUPERFICIE DE MANDO DE LA CAMPAÑA DE RECUPERACIÓN
 *
 * VISION HIPER-HOLÍSTICA:
 * 1. SEMANTIC SURFACE: Cada opción mapea uno a uno con la configuración
 *    del pipeline; la validación semántica vive en la sesión.
 * 2. ENUMERATION SIGNATURE: El subconjunto de opciones que altera la
 *    secuencia de candidatos se serializa de forma canónica para el
 *    fingerprint de restauración.
 * =================================================================
 */

use clap::{ArgAction, Parser};
use serde::Serialize;
use std::path::PathBuf;

use lazarus_core_generators::WorkerSlice;

/// Directivas de mando del motor de recuperación.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "lazarus-recover",
    version,
    about = "Lazarus // Wallet password recovery engine",
    long_about = "Enumera contraseñas candidatas desde una especificación de tokens y las \
                  verifica contra una cartera cifrada, con particionado de búsqueda y \
                  checkpoints a prueba de caídas."
)]
pub struct RecoveryDirectives {
    /// Archivo de cartera a auditar (Armory, Bitcoin Core, MultiBit, Electrum).
    pub wallet: Option<PathBuf>,

    /// Especificación de tokens: una sección por línea.
    #[arg(long, value_name = "FILE", conflicts_with = "passwordlist")]
    pub tokenlist: Option<PathBuf>,

    /// Lista literal de contraseñas, una por línea (sin combinatoria).
    #[arg(long, value_name = "FILE")]
    pub passwordlist: Option<PathBuf>,

    /// Lista los candidatos en stdout en lugar de verificarlos.
    #[arg(long)]
    pub listpass: bool,

    /// Mínimo de tokens por candidato.
    #[arg(long, default_value_t = 1, value_name = "N")]
    pub min_tokens: usize,

    /// Máximo de tokens por candidato (sin límite por defecto).
    #[arg(long, value_name = "N")]
    pub max_tokens: Option<usize>,

    /// Conjunto personalizado para los wildcards %c/%C (admite rangos x-y).
    #[arg(long, value_name = "CHARS")]
    pub custom_wild: Option<String>,

    /// Delimitador literal de tokens (por defecto, corridas de espacios).
    #[arg(long, value_name = "STR")]
    pub delimiter: Option<String>,

    /// Deshabilita etapas de deduplicación (-d, -dd, -ddd progresivo).
    #[arg(short = 'd', action = ArgAction::Count)]
    pub disable_dup_checks: u8,

    /// Solo emite candidatos que contengan este patrón.
    #[arg(long, value_name = "REGEX")]
    pub regex_only: Option<String>,

    /// Suprime candidatos que contengan este patrón.
    #[arg(long, value_name = "REGEX")]
    pub regex_never: Option<String>,

    /// Omite los primeros N candidatos de la secuencia.
    #[arg(long, default_value_t = 0, value_name = "N")]
    pub skip: u64,

    /// Porción de búsqueda de este worker, como 'i/N' (1-based).
    #[arg(long, value_name = "I/N")]
    pub worker: Option<WorkerSlice>,

    /// Presupuesto total de typos por candidato.
    #[arg(long = "typos", default_value_t = 1, value_name = "N")]
    pub max_typos: usize,

    /// Mínimo de typos aplicados por candidato emitido.
    #[arg(long, default_value_t = 0, value_name = "N")]
    pub min_typos: usize,

    /// Typo: invierte la caja de todas las letras.
    #[arg(long)]
    pub typos_capslock: bool,

    /// Typo: intercambia caracteres adyacentes distintos.
    #[arg(long)]
    pub typos_swap: bool,

    /// Typo: duplica un carácter.
    #[arg(long)]
    pub typos_repeat: bool,

    /// Typo: elimina un carácter.
    #[arg(long)]
    pub typos_delete: bool,

    /// Typo: invierte la caja de una letra.
    #[arg(long)]
    pub typos_case: bool,

    /// Typo: invierte la caja de una letra junto a un cambio de caja.
    #[arg(long)]
    pub typos_closecase: bool,

    /// Typo: inserta una expansión del wildcard dado tras un carácter.
    #[arg(long, value_name = "WILDCARD")]
    pub typos_insert: Option<String>,

    /// Typo: reemplaza un carácter por una expansión del wildcard dado.
    #[arg(long, value_name = "WILDCARD")]
    pub typos_replace: Option<String>,

    /// Typo: reemplaza caracteres según la tabla del archivo dado.
    #[arg(long, value_name = "FILE")]
    pub typos_map: Option<PathBuf>,

    /// Archivo de autosave (dos ranuras alternadas de 4096 bytes).
    #[arg(long, value_name = "FILE")]
    pub autosave: Option<PathBuf>,

    /// Restaura una sesión interrumpida desde este archivo de autosave.
    #[arg(long, value_name = "FILE")]
    pub restore: Option<PathBuf>,

    /// Extracto de clave cifrada en base64 (tag de formato + CRC).
    #[arg(long, value_name = "BASE64", env = "LAZARUS_PRIVKEY")]
    pub privkey: Option<String>,

    /// Suprime la línea de progreso.
    #[arg(long)]
    pub no_progress: bool,

    /// Hilos del pool de verificación (por defecto, los núcleos del host).
    #[arg(long, value_name = "N")]
    pub threads: Option<usize>,
}

impl Default for RecoveryDirectives {
    fn default() -> Self {
        Self {
            wallet: None,
            tokenlist: None,
            passwordlist: None,
            listpass: false,
            min_tokens: 1,
            max_tokens: None,
            custom_wild: None,
            delimiter: None,
            disable_dup_checks: 0,
            regex_only: None,
            regex_never: None,
            skip: 0,
            worker: None,
            max_typos: 1,
            min_typos: 0,
            typos_capslock: false,
            typos_swap: false,
            typos_repeat: false,
            typos_delete: false,
            typos_case: false,
            typos_closecase: false,
            typos_insert: None,
            typos_replace: None,
            typos_map: None,
            autosave: None,
            restore: None,
            privkey: None,
            no_progress: false,
            threads: None,
        }
    }
}

/// Subconjunto canónico de opciones que determinan la secuencia de
/// candidatos; su JSON alimenta el fingerprint de argv.
#[derive(Debug, Serialize)]
pub struct EnumerationSignature<'a> {
    pub source_kind: &'static str,
    pub min_tokens: usize,
    pub max_tokens: Option<usize>,
    pub custom_wild: Option<&'a str>,
    pub delimiter: Option<&'a str>,
    pub disable_dup_checks: u8,
    pub regex_only: Option<&'a str>,
    pub regex_never: Option<&'a str>,
    pub worker: Option<WorkerSlice>,
    pub max_typos: usize,
    pub min_typos: usize,
    pub typos_capslock: bool,
    pub typos_swap: bool,
    pub typos_repeat: bool,
    pub typos_delete: bool,
    pub typos_case: bool,
    pub typos_closecase: bool,
    pub typos_insert: Option<&'a str>,
    pub typos_replace: Option<&'a str>,
    /// Contenido crudo del mapa de typos, no su ruta.
    pub typos_map_content: Option<&'a str>,
}

impl<'a> EnumerationSignature<'a> {
    pub fn from_directives(
        directives: &'a RecoveryDirectives,
        source_kind: &'static str,
        typos_map_content: Option<&'a str>,
    ) -> Self {
        Self {
            source_kind,
            min_tokens: directives.min_tokens,
            max_tokens: directives.max_tokens,
            custom_wild: directives.custom_wild.as_deref(),
            delimiter: directives.delimiter.as_deref(),
            disable_dup_checks: directives.disable_dup_checks,
            regex_only: directives.regex_only.as_deref(),
            regex_never: directives.regex_never.as_deref(),
            worker: directives.worker,
            max_typos: directives.max_typos,
            min_typos: directives.min_typos,
            typos_capslock: directives.typos_capslock,
            typos_swap: directives.typos_swap,
            typos_repeat: directives.typos_repeat,
            typos_delete: directives.typos_delete,
            typos_case: directives.typos_case,
            typos_closecase: directives.typos_closecase,
            typos_insert: directives.typos_insert.as_deref(),
            typos_replace: directives.typos_replace.as_deref(),
            typos_map_content,
        }
    }
}
