// [tests/mirror/libs/domain/wallets/key_decryption.test.rs]
/**
 * =================================================================
 * APARATO: KEY DECRYPTION CERTIFIER (V1.1 - SOBERANO)
 * CLASIFICACIÓN: TRINITY EVIDENCE
 * RESPONSABILIDAD: CRC, KDF Y MARCADORES POR FORMATO DE BLOB
 * =================================================================
 */

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use proptest::prelude::*;

use lazarus_domain_wallets::{seal_key_blob, FixtureForge, WalletFault, WalletVault};

const TEST_PASSWORD: &str = "btcr-test-password";
const WRONG_PASSWORD: &str = "btcr-wrong-password";

fn key_tester(blob: &str, force_portable: bool) {
    let mut vault = WalletVault::load_from_base64_key(blob).expect("blob must load");
    if force_portable {
        vault.select_aes_backend(true);
    }
    assert!(vault.verify_candidate(WRONG_PASSWORD).is_none());
    assert_eq!(
        vault.verify_candidate(TEST_PASSWORD).as_deref(),
        Some(TEST_PASSWORD)
    );
}

#[test]
fn certify_armory_key_decryption() {
    key_tester(&FixtureForge::forge_armory_blob(TEST_PASSWORD).unwrap(), false);
}

#[test]
fn certify_bitcoin_core_key_decryption() {
    key_tester(
        &FixtureForge::forge_bitcoin_core_blob(TEST_PASSWORD).unwrap(),
        false,
    );
}

#[test]
fn certify_multibit_key_decryption() {
    key_tester(&FixtureForge::forge_multibit_blob(TEST_PASSWORD).unwrap(), false);
}

#[test]
fn certify_electrum_key_decryption() {
    key_tester(&FixtureForge::forge_electrum_blob(TEST_PASSWORD).unwrap(), false);
}

#[test]
fn certify_portable_backend_parity() {
    key_tester(
        &FixtureForge::forge_bitcoin_core_blob(TEST_PASSWORD).unwrap(),
        true,
    );
    key_tester(&FixtureForge::forge_multibit_blob(TEST_PASSWORD).unwrap(), true);
    key_tester(&FixtureForge::forge_electrum_blob(TEST_PASSWORD).unwrap(), true);
    key_tester(&FixtureForge::forge_armory_blob(TEST_PASSWORD).unwrap(), true);
}

#[test]
fn certify_unknown_format_tag_is_rejected() {
    let blob = seal_key_blob(b"zz:1", b"opaque-payload-bytes");
    assert!(matches!(
        WalletVault::load_from_base64_key(&blob),
        Err(WalletFault::UnrecognizedWalletFormat)
    ));
}

#[test]
fn certify_single_byte_corruption_fails_crc() {
    let blob = FixtureForge::forge_multibit_blob(TEST_PASSWORD).unwrap();
    let mut raw = BASE64.decode(&blob).unwrap();
    raw[0] ^= 0x20;
    let corrupted = BASE64.encode(raw);
    assert!(matches!(
        WalletVault::load_from_base64_key(&corrupted),
        Err(WalletFault::KeyCrcCheck)
    ));
}

proptest! {
    /// Todo flip de un bit del blob decodificado debe caer en el CRC.
    #[test]
    fn certify_any_bit_flip_fails_crc(bit_seed in 0usize..4096) {
        let blob = FixtureForge::forge_multibit_blob(TEST_PASSWORD).unwrap();
        let mut raw = BASE64.decode(&blob).unwrap();
        let bit_index = bit_seed % (raw.len() * 8);
        raw[bit_index / 8] ^= 1 << (bit_index % 8);
        let corrupted = BASE64.encode(raw);
        prop_assert!(matches!(
            WalletVault::load_from_base64_key(&corrupted),
            Err(WalletFault::KeyCrcCheck)
        ));
    }
}
