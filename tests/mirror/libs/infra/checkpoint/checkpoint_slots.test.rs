// [tests/mirror/libs/infra/checkpoint/checkpoint_slots.test.rs]
/**
 * =================================================================
 * APARATO: CHECKPOINT SLOT CERTIFIER (V1.1 - SOBERANO)
 * CLASIFICACIÓN: TRINITY EVIDENCE
 * RESPONSABILIDAD: RANURAS DOBLES, FINGERPRINTS Y RESTAURACIÓN
 * =================================================================
 */

use std::fs;
use std::path::Path;

use lazarus_infra_checkpoint::{
    AutosaveVault, CheckpointFault, CheckpointRecord, InputFingerprints, SAVESLOT_SIZE,
};

fn sample_fingerprints() -> InputFingerprints {
    InputFingerprints {
        argv: InputFingerprints::digest_bytes(b"argv-signature"),
        tokenlist: InputFingerprints::digest_bytes(b"tokenlist-bytes"),
        key: InputFingerprints::digest_bytes(b"key-material"),
    }
}

/// Lee el registro de una ranura directamente del layout del archivo.
fn read_slot_record(path: &Path, slot_index: usize) -> Option<CheckpointRecord> {
    let raw = fs::read(path).ok()?;
    let start = slot_index * SAVESLOT_SIZE;
    if raw.len() < start + SAVESLOT_SIZE {
        return None;
    }
    let declared =
        u32::from_le_bytes([raw[start], raw[start + 1], raw[start + 2], raw[start + 3]]) as usize;
    serde_json::from_slice(&raw[start + 4..start + 4 + declared]).ok()
}

#[test]
fn certify_alternating_slots_and_restore() {
    let autosave_file = tempfile::NamedTempFile::new().unwrap();
    let path = autosave_file.path().to_path_buf();

    let engaged = AutosaveVault::engage(&path, sample_fingerprints()).unwrap();
    assert_eq!(engaged.restored_skip, None);
    let mut vault = engaged.vault;

    vault.seal(0).unwrap();
    vault.seal(9).unwrap();

    assert_eq!(read_slot_record(&path, 0).unwrap().skip, 0);
    assert_eq!(read_slot_record(&path, 1).unwrap().skip, 9);
    assert_eq!(fs::metadata(&path).unwrap().len(), 2 * SAVESLOT_SIZE as u64);

    // La reapertura elige la ranura válida de mayor skip.
    let reopened = AutosaveVault::engage(&path, sample_fingerprints()).unwrap();
    assert_eq!(reopened.restored_skip, Some(9));
}

#[test]
fn certify_truncated_slot_falls_back() {
    let autosave_file = tempfile::NamedTempFile::new().unwrap();
    let path = autosave_file.path().to_path_buf();

    let mut vault = AutosaveVault::engage(&path, sample_fingerprints())
        .unwrap()
        .vault;
    vault.seal(0).unwrap();
    vault.seal(9).unwrap();
    drop(vault);

    // Truncar el último byte invalida la ranura 1 completa.
    let file = fs::OpenOptions::new().write(true).open(&path).unwrap();
    file.set_len(2 * SAVESLOT_SIZE as u64 - 1).unwrap();
    drop(file);

    let engaged = AutosaveVault::engage(&path, sample_fingerprints()).unwrap();
    assert_eq!(engaged.restored_skip, Some(0));

    // La primera escritura posterior sobreescribe la ranura inválida.
    let mut vault = engaged.vault;
    vault.seal(5).unwrap();
    assert_eq!(read_slot_record(&path, 0).unwrap().skip, 0);
    assert_eq!(read_slot_record(&path, 1).unwrap().skip, 5);
}

#[test]
fn certify_fresh_start_when_no_slot_is_valid() {
    let autosave_file = tempfile::NamedTempFile::new().unwrap();
    let path = autosave_file.path().to_path_buf();
    fs::write(&path, vec![0u8; 2 * SAVESLOT_SIZE]).unwrap();

    let engaged = AutosaveVault::engage(&path, sample_fingerprints()).unwrap();
    assert_eq!(engaged.restored_skip, None);
}

#[test]
fn certify_fingerprint_mismatch_precedence() {
    let autosave_file = tempfile::NamedTempFile::new().unwrap();
    let path = autosave_file.path().to_path_buf();

    let mut vault = AutosaveVault::engage(&path, sample_fingerprints())
        .unwrap()
        .vault;
    vault.seal(3).unwrap();
    drop(vault);

    let mut changed_argv = sample_fingerprints();
    changed_argv.argv = InputFingerprints::digest_bytes(b"other-argv");
    assert!(matches!(
        AutosaveVault::engage(&path, changed_argv),
        Err(CheckpointFault::ArgsChanged)
    ));

    let mut changed_tokenlist = sample_fingerprints();
    changed_tokenlist.tokenlist = InputFingerprints::digest_bytes(b"other-tokens");
    assert!(matches!(
        AutosaveVault::engage(&path, changed_tokenlist),
        Err(CheckpointFault::TokenlistChanged)
    ));

    let mut changed_key = sample_fingerprints();
    changed_key.key = InputFingerprints::digest_bytes(b"other-key");
    assert!(matches!(
        AutosaveVault::engage(&path, changed_key),
        Err(CheckpointFault::KeyChanged)
    ));
}

#[test]
fn certify_record_roundtrip_preserves_fields() {
    let autosave_file = tempfile::NamedTempFile::new().unwrap();
    let path = autosave_file.path().to_path_buf();

    let fingerprints = sample_fingerprints();
    let mut vault = AutosaveVault::engage(&path, fingerprints.clone())
        .unwrap()
        .vault;
    vault.seal(42).unwrap();

    let record = read_slot_record(&path, 0).unwrap();
    assert_eq!(record.skip, 42);
    assert_eq!(record.argv_fingerprint, fingerprints.argv);
    assert_eq!(record.tokenlist_fingerprint, fingerprints.tokenlist);
    assert_eq!(record.key_fingerprint, fingerprints.key);
}

#[test]
fn certify_canonical_digest_distinguishes_values() {
    #[derive(serde::Serialize)]
    struct Signature<'a> {
        max_tokens: Option<usize>,
        delimiter: Option<&'a str>,
    }

    let baseline = InputFingerprints::digest_canonical(&Signature {
        max_tokens: None,
        delimiter: None,
    })
    .unwrap();
    let changed = InputFingerprints::digest_canonical(&Signature {
        max_tokens: Some(1),
        delimiter: None,
    })
    .unwrap();
    assert_ne!(baseline, changed);
}
