// [tests/mirror/apps/recovery_cli/end_to_end_recovery.test.rs]
/**
 * =================================================================
 * APARATO: END-TO-END RECOVERY CERTIFIER (V1.0 - GOLD MASTER)
 * CLASIFICACIÓN: TRINITY EVIDENCE
 * RESPONSABILIDAD: CAMPAÑA COMPLETA CON ANCLAS, CONTRACCIONES, TYPOS
 *                  Y SELLADO EXACTO DEL ORDINAL DE HALLAZGO
 * =================================================================
 */

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;

use lazarus_domain_wallets::FixtureForge;
use lazarus_infra_checkpoint::{CheckpointRecord, SAVESLOT_SIZE};
use lazarus_recovery_lib::{RecoveryDirectives, RecoverySession, SearchVerdict};

const TEST_PASSWORD: &str = "btcr-test-password";
/// El hallazgo ocurre exactamente en el ordinal post-deduplicación 103764.
const EXPECTED_ORDINAL: u64 = 103_764;

const RECOVERY_TOKENLIST: &str =
    "+ ^%0,1[b-c]tcr--\n+ ^,$%0,1<Test-\n^3$pas\n+ wrod$";

fn read_slot_skip(path: &Path, slot_index: usize) -> Option<u64> {
    let raw = fs::read(path).ok()?;
    let start = slot_index * SAVESLOT_SIZE;
    if raw.len() < start + SAVESLOT_SIZE {
        return None;
    }
    let declared =
        u32::from_le_bytes([raw[start], raw[start + 1], raw[start + 2], raw[start + 3]]) as usize;
    let record: CheckpointRecord =
        serde_json::from_slice(&raw[start + 4..start + 4 + declared]).ok()?;
    Some(record.skip)
}

fn campaign_directives(tokenlist: &Path, autosave: &Path) -> RecoveryDirectives {
    RecoveryDirectives {
        tokenlist: Some(tokenlist.to_path_buf()),
        privkey: Some(FixtureForge::forge_multibit_blob(TEST_PASSWORD).unwrap()),
        autosave: Some(autosave.to_path_buf()),
        max_typos: 3,
        typos_case: true,
        typos_repeat: true,
        typos_swap: true,
        no_progress: true,
        ..RecoveryDirectives::default()
    }
}

fn execute(directives: RecoveryDirectives) -> SearchVerdict {
    let stop_signal = AtomicBool::new(false);
    RecoverySession::assemble(directives)
        .expect("session must assemble")
        .execute(&stop_signal)
        .expect("campaign must run to a verdict")
}

#[test]
fn certify_end_to_end_recovery_and_resume() {
    let dir = tempfile::tempdir().unwrap();
    let tokenlist: PathBuf = dir.path().join("tokenlist.txt");
    fs::write(&tokenlist, RECOVERY_TOKENLIST).unwrap();
    let autosave = dir.path().join("autosave.bin");

    // 1. CAMPAÑA COMPLETA: la contraseña emerge de la combinación de
    //    contracción entre tokens, ancla posicional y tres typos.
    let verdict = execute(campaign_directives(&tokenlist, &autosave));
    assert_eq!(
        verdict,
        SearchVerdict::Found {
            password: TEST_PASSWORD.to_string(),
            ordinal: EXPECTED_ORDINAL,
        }
    );
    assert_eq!(
        verdict.to_string(),
        format!("Password found: '{TEST_PASSWORD}'")
    );

    // Sello inicial en ranura 0, ordinal del hallazgo en ranura 1.
    assert_eq!(read_slot_skip(&autosave, 0), Some(0));
    assert_eq!(read_slot_skip(&autosave, 1), Some(EXPECTED_ORDINAL));

    // 2. REANUDACIÓN: el skip restaurado apunta al hallazgo y la campaña
    //    vuelve a verificarlo de inmediato.
    let verdict = execute(campaign_directives(&tokenlist, &autosave));
    assert_eq!(
        verdict,
        SearchVerdict::Found {
            password: TEST_PASSWORD.to_string(),
            ordinal: EXPECTED_ORDINAL,
        }
    );
    assert_eq!(read_slot_skip(&autosave, 0), Some(EXPECTED_ORDINAL));
}
