// [libs/domain/wallets/src/formats/multibit.rs]
/*!
 * =================================================================
 * APARATO: MULTIBIT PROBE (V1.2 - EVP CLASSIC)
 * CLASIFICACIÓN: DOMAIN STRATEGY (ESTRATO L2)
 * RESPONSABILIDAD: VERIFICACIÓN CONTRA EXPORTS DE CLAVE MULTIBIT
 *
 * Los exports .key de MultiBit son archivos OpenSSL 'enc': cabecera
 * "Salted__", sal de 8 bytes y texto cifrado. La clave se deriva con el
 * EVP_BytesToKey clásico (MD5) y el primer bloque descifrado debe ser
 * texto Base58, porque el archivo plano arranca con la clave privada
 * exportada en Base58.
 * =================================================================
 */

use crate::cipher::{Aes256CbcEngine, AES_BLOCK_SIZE};
use crate::errors::WalletFault;
use crate::kdf;
use crate::probe::WalletProbe;

/// Cabecera de archivo OpenSSL 'enc' con sal.
pub const OPENSSL_SALTED_MAGIC: &[u8] = b"Salted__";

const SALT_SIZE: usize = 8;
const PAYLOAD_SIZE: usize = SALT_SIZE + AES_BLOCK_SIZE;

const BASE58_ALPHABET: &[u8] = b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// Sonda del formato MultiBit.
pub struct MultiBitProbe {
    salt: [u8; SALT_SIZE],
    first_encrypted_block: [u8; AES_BLOCK_SIZE],
}

impl MultiBitProbe {
    /// Layout del payload del blob: sal 8, primer bloque cifrado 16.
    pub fn from_payload(payload: &[u8]) -> Result<Self, WalletFault> {
        if payload.len() != PAYLOAD_SIZE {
            return Err(WalletFault::MalformedKey(format!(
                "multibit key payload must be {PAYLOAD_SIZE} bytes, found {}",
                payload.len()
            )));
        }
        let mut salt = [0u8; SALT_SIZE];
        salt.copy_from_slice(&payload[..SALT_SIZE]);
        let mut first_encrypted_block = [0u8; AES_BLOCK_SIZE];
        first_encrypted_block.copy_from_slice(&payload[SALT_SIZE..]);
        Ok(Self {
            salt,
            first_encrypted_block,
        })
    }

    pub fn matches_magic(wallet_bytes: &[u8]) -> bool {
        wallet_bytes.starts_with(OPENSSL_SALTED_MAGIC)
    }

    pub fn from_wallet_bytes(wallet_bytes: &[u8]) -> Result<Self, WalletFault> {
        if !Self::matches_magic(wallet_bytes) {
            return Err(WalletFault::UnrecognizedWalletFormat);
        }
        let after_magic = &wallet_bytes[OPENSSL_SALTED_MAGIC.len()..];
        if after_magic.len() < SALT_SIZE + AES_BLOCK_SIZE {
            return Err(WalletFault::MalformedKey(
                "multibit key file is too short for salt and one cipher block".into(),
            ));
        }
        let mut payload = Vec::with_capacity(PAYLOAD_SIZE);
        payload.extend_from_slice(&after_magic[..SALT_SIZE]);
        payload.extend_from_slice(&after_magic[SALT_SIZE..SALT_SIZE + AES_BLOCK_SIZE]);
        Self::from_payload(&payload)
    }

    pub fn payload(&self) -> Vec<u8> {
        let mut payload = Vec::with_capacity(PAYLOAD_SIZE);
        payload.extend_from_slice(&self.salt);
        payload.extend_from_slice(&self.first_encrypted_block);
        payload
    }
}

impl WalletProbe for MultiBitProbe {
    fn format_name(&self) -> &'static str {
        "multibit"
    }

    fn accepts_password(&self, candidate: &str, engine: &Aes256CbcEngine) -> bool {
        let (key, iv) = kdf::evp_md5_key_iv(candidate.as_bytes(), &self.salt);
        match engine.decrypt(&key, &iv, &self.first_encrypted_block) {
            Ok(plaintext) => plaintext
                .iter()
                .all(|byte| BASE58_ALPHABET.contains(byte)),
            Err(_) => false,
        }
    }
}
