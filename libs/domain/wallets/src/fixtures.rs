// [libs/domain/wallets/src/fixtures.rs]
/*!
 * =================================================================
 * APARATO: SYNTHETIC WALLET FORGE (V1.1 - GOLD MASTER)
 * CLASIFICACIÓN: DOMAIN UTILITY (ESTRATO L2)
 * RESPONSABILIDAD: SÍNTESIS DETERMINISTA DE ARTEFACTOS DE PRUEBA
 *
 * La fragua produce blobs de clave y archivos de cartera cifrados para
 * una contraseña conocida, con sales e IVs fijos, de modo que el
 * proving grounds derive sus propios vectores en lugar de incrustar
 * ciphertexts opacos.
 * =================================================================
 */

use std::fs::File;
use std::io::Write;
use std::path::Path;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use sha2::{Digest, Sha256};

use crate::blob::{seal_key_blob, ARMORY_TAG, BITCOIN_CORE_TAG, ELECTRUM_TAG, MULTIBIT_TAG};
use crate::cipher::Aes256CbcEngine;
use crate::errors::WalletFault;
use crate::formats::armory::ARMORY_FILE_MAGIC;
use crate::formats::multibit::OPENSSL_SALTED_MAGIC;
use crate::kdf;

/// Sal fija de la fragua para los formatos con sal de 8 bytes.
const FORGE_SALT_8: [u8; 8] = *b"lzforge8";
/// Sal fija de 32 bytes para Armory.
const FORGE_SALT_32: [u8; 32] = *b"lazarus-forge-armory-salt-32byte";
/// IV fijo para los formatos que lo portan explícito.
const FORGE_IV: [u8; 16] = *b"lazarus-forge-iv";

/// Iteraciones moderadas: suficientes para ser reales, baratas de testear.
const FORGE_BC_ITERATIONS: u32 = 25_000;
const FORGE_AR_ITERATIONS: u32 = 4;
const FORGE_AR_MEMORY_BYTES: u32 = 1_024;

/// Primer bloque plano de un export MultiBit: clave privada en Base58.
const MULTIBIT_PLAINTEXT_HEAD: &[u8; 16] = b"L4rGbiBZVH9SAbcd";

/// Fragua de artefactos sintéticos de cartera.
pub struct FixtureForge;

impl FixtureForge {
    /// Blob 'bc:1' cuya master key verifica contra la contraseña dada.
    pub fn forge_bitcoin_core_blob(password: &str) -> Result<String, WalletFault> {
        Ok(seal_key_blob(
            BITCOIN_CORE_TAG,
            &Self::bitcoin_core_payload(password)?,
        ))
    }

    /// Blob 'mb:1' cuyo primer bloque descifra a texto Base58.
    pub fn forge_multibit_blob(password: &str) -> Result<String, WalletFault> {
        Ok(seal_key_blob(MULTIBIT_TAG, &Self::multibit_payload(password)?))
    }

    /// Blob 'el:1' cuya semilla descifra a 32 hexadecimales en minúscula.
    pub fn forge_electrum_blob(password: &str) -> Result<String, WalletFault> {
        Ok(seal_key_blob(ELECTRUM_TAG, &Self::electrum_payload(password)?))
    }

    /// Blob 'ar:1' cuya root key valida su digest de verificación.
    pub fn forge_armory_blob(password: &str) -> Result<String, WalletFault> {
        Ok(seal_key_blob(ARMORY_TAG, &Self::armory_payload(password)?))
    }

    /// Archivo wallet.dat mínimo: página con magia BDB + registro mkey.
    pub fn forge_bitcoin_core_wallet(password: &str, path: &Path) -> Result<(), WalletFault> {
        let payload = Self::bitcoin_core_payload(password)?;
        let (iterations_bytes, rest) = payload.split_at(4);
        let (salt, encrypted_master_key) = rest.split_at(8);

        let mut wallet_bytes = vec![0u8; 12];
        wallet_bytes.extend_from_slice(&0x0006_1561u32.to_le_bytes());
        wallet_bytes.resize(64, 0);
        wallet_bytes.extend_from_slice(b"\x04mkey");
        wallet_bytes.push(48);
        wallet_bytes.extend_from_slice(encrypted_master_key);
        wallet_bytes.push(8);
        wallet_bytes.extend_from_slice(salt);
        wallet_bytes.extend_from_slice(&0u32.to_le_bytes());
        wallet_bytes.extend_from_slice(iterations_bytes);
        wallet_bytes.resize(512, 0);

        Self::write_file(path, &wallet_bytes)
    }

    /// Export .key de MultiBit: cabecera OpenSSL 'Salted__' + ciphertext.
    pub fn forge_multibit_wallet(password: &str, path: &Path) -> Result<(), WalletFault> {
        let payload = Self::multibit_payload(password)?;
        let (salt, first_block) = payload.split_at(8);

        let mut wallet_bytes = Vec::new();
        wallet_bytes.extend_from_slice(OPENSSL_SALTED_MAGIC);
        wallet_bytes.extend_from_slice(salt);
        wallet_bytes.extend_from_slice(first_block);
        Self::write_file(path, &wallet_bytes)
    }

    /// Wallet Electrum 1.x: diccionario textual con la semilla en base64.
    pub fn forge_electrum_wallet(password: &str, path: &Path) -> Result<(), WalletFault> {
        let payload = Self::electrum_payload(password)?;
        let wallet_text = format!(
            "{{'seed_version': 4, 'use_encryption': True, 'seed': '{}', 'accounts': {{}}}}",
            BASE64.encode(payload)
        );
        Self::write_file(path, wallet_text.as_bytes())
    }

    /// Wallet Armory: magia de archivo + bloque de parámetros de clave.
    pub fn forge_armory_wallet(password: &str, path: &Path) -> Result<(), WalletFault> {
        let payload = Self::armory_payload(password)?;
        let mut wallet_bytes = Vec::new();
        wallet_bytes.extend_from_slice(ARMORY_FILE_MAGIC);
        wallet_bytes.extend_from_slice(&payload);
        Self::write_file(path, &wallet_bytes)
    }

    fn bitcoin_core_payload(password: &str) -> Result<Vec<u8>, WalletFault> {
        let (key, iv) =
            kdf::iterated_sha512(password.as_bytes(), &FORGE_SALT_8, FORGE_BC_ITERATIONS);

        // Master key de 32 bytes + bloque completo de padding PKCS#7.
        let mut master_key_plain = vec![0u8; 48];
        master_key_plain[..32].copy_from_slice(&Sha256::digest(b"lazarus-forge-master-key"));
        for byte in master_key_plain[32..].iter_mut() {
            *byte = 0x10;
        }
        let encrypted = Aes256CbcEngine::Pipelined.encrypt(&key, &iv, &master_key_plain)?;

        let mut payload = Vec::new();
        payload.extend_from_slice(&FORGE_BC_ITERATIONS.to_le_bytes());
        payload.extend_from_slice(&FORGE_SALT_8);
        payload.extend_from_slice(&encrypted);
        Ok(payload)
    }

    fn multibit_payload(password: &str) -> Result<Vec<u8>, WalletFault> {
        let (key, iv) = kdf::evp_md5_key_iv(password.as_bytes(), &FORGE_SALT_8);
        let encrypted = Aes256CbcEngine::Pipelined.encrypt(&key, &iv, MULTIBIT_PLAINTEXT_HEAD)?;

        let mut payload = Vec::new();
        payload.extend_from_slice(&FORGE_SALT_8);
        payload.extend_from_slice(&encrypted);
        Ok(payload)
    }

    fn electrum_payload(password: &str) -> Result<Vec<u8>, WalletFault> {
        let key = kdf::double_sha256(password.as_bytes());
        let seed_plain: String = hex::encode(&Sha256::digest(b"lazarus-forge-seed")[..16]);
        let encrypted = Aes256CbcEngine::Pipelined.encrypt(&key, &FORGE_IV, seed_plain.as_bytes())?;

        let mut payload = Vec::new();
        payload.extend_from_slice(&FORGE_IV);
        payload.extend_from_slice(&encrypted);
        Ok(payload)
    }

    fn armory_payload(password: &str) -> Result<Vec<u8>, WalletFault> {
        let key = kdf::romix_sha512(
            password.as_bytes(),
            &FORGE_SALT_32,
            FORGE_AR_ITERATIONS,
            FORGE_AR_MEMORY_BYTES,
        );
        let root_key_plain: [u8; 32] = Sha256::digest(b"lazarus-forge-root-key").into();
        let encrypted = Aes256CbcEngine::Pipelined.encrypt(&key, &FORGE_IV, &root_key_plain)?;
        let root_digest = Sha256::digest(root_key_plain);

        let mut payload = Vec::new();
        payload.extend_from_slice(&FORGE_AR_ITERATIONS.to_le_bytes());
        payload.extend_from_slice(&FORGE_AR_MEMORY_BYTES.to_le_bytes());
        payload.extend_from_slice(&FORGE_SALT_32);
        payload.extend_from_slice(&FORGE_IV);
        payload.extend_from_slice(&encrypted);
        payload.extend_from_slice(&root_digest[..16]);
        Ok(payload)
    }

    fn write_file(path: &Path, content: &[u8]) -> Result<(), WalletFault> {
        let mut file = File::create(path)?;
        file.write_all(content)?;
        Ok(())
    }
}
