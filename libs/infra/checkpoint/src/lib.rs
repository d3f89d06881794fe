// [libs/infra/checkpoint/src/lib.rs]
/*!
 * =================================================================
 * APARATO: AUTOSAVE VAULT (V2.1 - DOUBLE BUFFER SEAL)
 * CLASIFICACIÓN: INFRASTRUCTURE CORE (ESTRATO L3)
 * RESPONSABILIDAD: CHECKPOINTS A PRUEBA DE CAÍDAS Y RESTAURACIÓN VALIDADA
 *
 * VISION HIPER-HOLÍSTICA:
 * 1. DOUBLE BUFFER: El archivo contiene dos ranuras fijas de 4096 bytes;
 *    las escrituras alternan, de modo que un colapso deja la otra ranura
 *    intacta.
 * 2. NEUTRAL SCHEMA: El registro es JSON versionado con prefijo de largo
 *    LE, jamás un formato nativo del lenguaje.
 * 3. FINGERPRINT GATE: Restaurar exige que los fingerprints de argv,
 *    tokenlist y clave coincidan; un desacuerdo es fatal con su causa.
 *
 * # Mathematical Proof (Crash Safety):
 * En todo instante a lo sumo una ranura está parcialmente escrita; el
 * cargador elige la ranura válida de mayor 'skip', por lo que el progreso
 * restaurado nunca excede al progreso realmente sellado.
 * =================================================================
 */

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Tamaño fijo de cada ranura de checkpoint.
pub const SAVESLOT_SIZE: usize = 4096;
/// Cantidad de ranuras del archivo de autosave.
pub const SLOT_COUNT: usize = 2;
/// Versión del esquema del registro serializado.
pub const SCHEMA_VERSION: u32 = 1;

const LENGTH_PREFIX_SIZE: usize = 4;

/// Catálogo de fallos de persistencia y restauración.
#[derive(Error, Debug)]
pub enum CheckpointFault {
    /// Los parámetros que afectan la enumeración difieren del sellado.
    #[error("[L3_RESTORE_FAULT]: ARGS_CHANGED -> can't restore previous session: the command line options have changed")]
    ArgsChanged,

    /// El contenido del tokenlist difiere del sellado.
    #[error("[L3_RESTORE_FAULT]: TOKENLIST_CHANGED -> can't restore previous session: the tokenlist file has changed")]
    TokenlistChanged,

    /// El material de clave difiere del sellado.
    #[error("[L3_RESTORE_FAULT]: KEY_CHANGED -> can't restore previous session: the encrypted key entered is not the same")]
    KeyChanged,

    /// El registro serializado no cabe en una ranura.
    #[error("[L3_CHECKPOINT_FAULT]: RECORD_OVERFLOW -> serialized record exceeds the 4096-byte slot capacity")]
    RecordOverflow,

    #[error("[L3_CHECKPOINT_FAULT]: IO -> {0}")]
    Io(#[from] std::io::Error),

    #[error("[L3_CHECKPOINT_FAULT]: ENCODING -> {0}")]
    Encoding(#[from] serde_json::Error),
}

/// Registro de checkpoint sellado en una ranura.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckpointRecord {
    pub schema_version: u32,
    /// Candidatos ya cubiertos por la búsqueda al momento del sellado.
    pub skip: u64,
    pub argv_fingerprint: String,
    pub tokenlist_fingerprint: String,
    pub key_fingerprint: String,
    /// Marca temporal informativa; nunca participa de un fingerprint.
    pub sealed_at: String,
}

/// Fingerprints que atan un checkpoint a los insumos que lo produjeron.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputFingerprints {
    pub argv: String,
    pub tokenlist: String,
    pub key: String,
}

impl InputFingerprints {
    /// Digest SHA-256 en hexadecimal de un bloque de bytes crudo.
    pub fn digest_bytes(payload: &[u8]) -> String {
        let mut hasher = Sha256::new();
        hasher.update(payload);
        hex::encode(hasher.finalize())
    }

    /// Digest SHA-256 de la forma JSON canónica de un valor serializable.
    pub fn digest_canonical<T: Serialize>(value: &T) -> Result<String, CheckpointFault> {
        let canonical = serde_json::to_vec(value)?;
        Ok(Self::digest_bytes(&canonical))
    }
}

/// Resultado del enganche del vault a un archivo de autosave.
pub struct EngagedVault {
    pub vault: AutosaveVault,
    /// 'skip' restaurado desde una ranura válida, si existía.
    pub restored_skip: Option<u64>,
}

/// Escritor de checkpoints con doble búfer y validación de restauración.
#[derive(Debug)]
pub struct AutosaveVault {
    file: File,
    fingerprints: InputFingerprints,
    next_slot: usize,
}

impl AutosaveVault {
    /// Abre (o crea) el archivo de autosave y restaura la mejor ranura.
    ///
    /// La primera escritura posterior apunta a la ranura no elegida por el
    /// cargador, para sobreescribir primero la más vieja o inválida.
    pub fn engage(
        path: &Path,
        fingerprints: InputFingerprints,
    ) -> Result<EngagedVault, CheckpointFault> {
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)?;

        let mut raw_content = Vec::new();
        file.read_to_end(&mut raw_content)?;

        let parsed_slots: Vec<Option<CheckpointRecord>> = (0..SLOT_COUNT)
            .map(|slot_index| parse_slot(&raw_content, slot_index))
            .collect();

        let chosen = parsed_slots
            .iter()
            .enumerate()
            .filter_map(|(slot_index, record)| record.as_ref().map(|r| (slot_index, r)))
            .max_by_key(|(slot_index, record)| (record.skip, *slot_index));

        let (restored_skip, next_slot) = match chosen {
            Some((slot_index, record)) => {
                validate_fingerprints(record, &fingerprints)?;
                info!(
                    "📼 [RESTORE]: Slot {} accepted with skip={} (sealed at {}).",
                    slot_index, record.skip, record.sealed_at
                );
                (Some(record.skip), (slot_index + 1) % SLOT_COUNT)
            }
            None => {
                debug!("📼 [RESTORE]: No structurally valid slot; starting a fresh campaign.");
                (None, 0)
            }
        };

        Ok(EngagedVault {
            vault: Self {
                file,
                fingerprints,
                next_slot,
            },
            restored_skip,
        })
    }

    /// Sella el progreso actual en la próxima ranura y alterna el búfer.
    pub fn seal(&mut self, skip: u64) -> Result<(), CheckpointFault> {
        let record = CheckpointRecord {
            schema_version: SCHEMA_VERSION,
            skip,
            argv_fingerprint: self.fingerprints.argv.clone(),
            tokenlist_fingerprint: self.fingerprints.tokenlist.clone(),
            key_fingerprint: self.fingerprints.key.clone(),
            sealed_at: Utc::now().to_rfc3339(),
        };

        let serialized = serde_json::to_vec(&record)?;
        if serialized.len() > SAVESLOT_SIZE - LENGTH_PREFIX_SIZE {
            return Err(CheckpointFault::RecordOverflow);
        }

        let mut slot_buffer = vec![0u8; SAVESLOT_SIZE];
        slot_buffer[..LENGTH_PREFIX_SIZE]
            .copy_from_slice(&(serialized.len() as u32).to_le_bytes());
        slot_buffer[LENGTH_PREFIX_SIZE..LENGTH_PREFIX_SIZE + serialized.len()]
            .copy_from_slice(&serialized);

        let offset = (self.next_slot * SAVESLOT_SIZE) as u64;
        self.file.seek(SeekFrom::Start(offset))?;
        self.file.write_all(&slot_buffer)?;
        self.file.flush()?;
        self.file.sync_data()?;

        debug!(
            "💾 [AUTOSAVE]: Slot {} sealed with skip={}.",
            self.next_slot, skip
        );
        self.next_slot = (self.next_slot + 1) % SLOT_COUNT;
        Ok(())
    }

    pub fn fingerprints(&self) -> &InputFingerprints {
        &self.fingerprints
    }
}

/// Parsea una ranura; `None` si es estructuralmente inválida.
///
/// Una ranura truncada (el archivo termina antes de su frontera) es
/// inválida aunque su JSON inicial parezca íntegro.
fn parse_slot(raw_content: &[u8], slot_index: usize) -> Option<CheckpointRecord> {
    let start = slot_index * SAVESLOT_SIZE;
    let end = start + SAVESLOT_SIZE;
    if raw_content.len() < end {
        if raw_content.len() > start {
            warn!(
                "⚠️ [SLOT_FAULT]: Slot {} is truncated ({} of {} bytes); ignoring it.",
                slot_index,
                raw_content.len() - start,
                SAVESLOT_SIZE
            );
        }
        return None;
    }

    let slot = &raw_content[start..end];
    let declared_length =
        u32::from_le_bytes([slot[0], slot[1], slot[2], slot[3]]) as usize;
    if declared_length == 0 || declared_length > SAVESLOT_SIZE - LENGTH_PREFIX_SIZE {
        return None;
    }

    let record: CheckpointRecord =
        serde_json::from_slice(&slot[LENGTH_PREFIX_SIZE..LENGTH_PREFIX_SIZE + declared_length])
            .ok()?;
    if record.schema_version != SCHEMA_VERSION {
        return None;
    }
    Some(record)
}

/// Compara fingerprints con precedencia argv -> tokenlist -> clave.
fn validate_fingerprints(
    record: &CheckpointRecord,
    current: &InputFingerprints,
) -> Result<(), CheckpointFault> {
    if record.argv_fingerprint != current.argv {
        return Err(CheckpointFault::ArgsChanged);
    }
    if record.tokenlist_fingerprint != current.tokenlist {
        return Err(CheckpointFault::TokenlistChanged);
    }
    if record.key_fingerprint != current.key {
        return Err(CheckpointFault::KeyChanged);
    }
    Ok(())
}
