// [tests/mirror/libs/domain/wallets/wallet_files.test.rs]
/**
 * =================================================================
 * APARATO: WALLET FILE CERTIFIER (V1.1 - SOBERANO)
 * CLASIFICACIÓN: TRINITY EVIDENCE
 * RESPONSABILIDAD: SONDEO POR MAGIA, VERIFICACIÓN Y NO-MUTACIÓN
 * =================================================================
 */

use std::fs;
use std::path::{Path, PathBuf};

use lazarus_domain_wallets::{FixtureForge, WalletFault, WalletVault};

const TEST_PASSWORD: &str = "btcr-test-password";
const WRONG_PASSWORD: &str = "btcr-wrong-password";

/// Verifica un wallet contra la contraseña conocida y certifica que el
/// sondeo no altera ni un byte del archivo.
fn wallet_tester(path: &Path, expected_format: &str, force_portable: bool) {
    let bytes_before = fs::read(path).unwrap();

    let mut vault = WalletVault::load_wallet(path).expect("wallet must load");
    assert_eq!(vault.format_name(), expected_format);
    if force_portable {
        vault.select_aes_backend(true);
    }

    assert!(vault.verify_candidate(WRONG_PASSWORD).is_none());
    assert_eq!(
        vault.verify_candidate(TEST_PASSWORD).as_deref(),
        Some(TEST_PASSWORD)
    );
    drop(vault);

    let bytes_after = fs::read(path).unwrap();
    assert_eq!(bytes_before, bytes_after, "wallet file was mutated");
}

fn forge_in(dir: &tempfile::TempDir, name: &str) -> PathBuf {
    dir.path().join(name)
}

#[test]
fn certify_armory_wallet_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = forge_in(&dir, "armory-wallet.wallet");
    FixtureForge::forge_armory_wallet(TEST_PASSWORD, &path).unwrap();
    wallet_tester(&path, "armory", false);
    wallet_tester(&path, "armory", true);
}

#[test]
fn certify_bitcoin_core_wallet_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = forge_in(&dir, "bitcoincore-wallet.dat");
    FixtureForge::forge_bitcoin_core_wallet(TEST_PASSWORD, &path).unwrap();
    wallet_tester(&path, "bitcoin-core", false);
    wallet_tester(&path, "bitcoin-core", true);
}

#[test]
fn certify_multibit_wallet_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = forge_in(&dir, "multibit-wallet.key");
    FixtureForge::forge_multibit_wallet(TEST_PASSWORD, &path).unwrap();
    wallet_tester(&path, "multibit", false);
    wallet_tester(&path, "multibit", true);
}

#[test]
fn certify_electrum_wallet_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = forge_in(&dir, "electrum-wallet");
    FixtureForge::forge_electrum_wallet(TEST_PASSWORD, &path).unwrap();
    wallet_tester(&path, "electrum", false);
    wallet_tester(&path, "electrum", true);
}

#[test]
fn certify_unrecognized_wallet_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = forge_in(&dir, "not-a-wallet.txt");
    fs::write(&path, b"this file is definitely not a wallet").unwrap();
    assert!(matches!(
        WalletVault::load_wallet(&path),
        Err(WalletFault::UnrecognizedWalletFormat)
    ));
}
