// [libs/domain/wallets/src/formats/armory.rs]
/*!
 * =================================================================
 * APARATO: ARMORY PROBE (V1.2 - ROMIX STRATA)
 * CLASIFICACIÓN: DOMAIN STRATEGY (ESTRATO L2)
 * RESPONSABILIDAD: VERIFICACIÓN CONTRA LA ROOT KEY CIFRADA DE ARMORY
 *
 * Armory deriva con un KDF secuencial dependiente de memoria (ROMix
 * sobre SHA-512) parametrizado por iteraciones y bytes de tabla. El
 * extracto porta esos parámetros, la sal, el IV, la root key cifrada y
 * el digest de verificación del texto plano.
 * =================================================================
 */

use crate::cipher::Aes256CbcEngine;
use crate::errors::WalletFault;
use crate::kdf;
use crate::probe::WalletProbe;
use sha2::{Digest, Sha256};

/// Identificador de archivo de las carteras Armory.
pub const ARMORY_FILE_MAGIC: &[u8] = b"\xbaWALLET\x00";

const SALT_SIZE: usize = 32;
const IV_SIZE: usize = 16;
const ENCRYPTED_ROOT_KEY_SIZE: usize = 32;
const VERIFY_DIGEST_SIZE: usize = 16;
const PAYLOAD_SIZE: usize = 4 + 4 + SALT_SIZE + IV_SIZE + ENCRYPTED_ROOT_KEY_SIZE + VERIFY_DIGEST_SIZE;

/// Cota superior de memoria del KDF admitida en un extracto.
const KDF_MEMORY_CEILING_BYTES: u32 = 64 * 1024 * 1024;

/// Sonda del formato Armory.
pub struct ArmoryProbe {
    kdf_iterations: u32,
    kdf_memory_bytes: u32,
    salt: [u8; SALT_SIZE],
    iv: [u8; IV_SIZE],
    encrypted_root_key: [u8; ENCRYPTED_ROOT_KEY_SIZE],
    verify_digest: [u8; VERIFY_DIGEST_SIZE],
}

impl ArmoryProbe {
    /// Layout del payload: iteraciones u32 LE, memoria u32 LE, sal 32,
    /// IV 16, root key cifrada 32, digest de verificación 16.
    pub fn from_payload(payload: &[u8]) -> Result<Self, WalletFault> {
        if payload.len() != PAYLOAD_SIZE {
            return Err(WalletFault::MalformedKey(format!(
                "armory key payload must be {PAYLOAD_SIZE} bytes, found {}",
                payload.len()
            )));
        }
        let kdf_iterations = u32::from_le_bytes([payload[0], payload[1], payload[2], payload[3]]);
        let kdf_memory_bytes = u32::from_le_bytes([payload[4], payload[5], payload[6], payload[7]]);
        if kdf_iterations == 0 {
            return Err(WalletFault::MalformedKey(
                "armory kdf iteration count must be at least 1".into(),
            ));
        }
        if kdf_memory_bytes < 64 || kdf_memory_bytes > KDF_MEMORY_CEILING_BYTES {
            return Err(WalletFault::MalformedKey(format!(
                "armory kdf memory of {kdf_memory_bytes} bytes is outside the accepted window"
            )));
        }

        let mut cursor = 8usize;
        let mut salt = [0u8; SALT_SIZE];
        salt.copy_from_slice(&payload[cursor..cursor + SALT_SIZE]);
        cursor += SALT_SIZE;
        let mut iv = [0u8; IV_SIZE];
        iv.copy_from_slice(&payload[cursor..cursor + IV_SIZE]);
        cursor += IV_SIZE;
        let mut encrypted_root_key = [0u8; ENCRYPTED_ROOT_KEY_SIZE];
        encrypted_root_key.copy_from_slice(&payload[cursor..cursor + ENCRYPTED_ROOT_KEY_SIZE]);
        cursor += ENCRYPTED_ROOT_KEY_SIZE;
        let mut verify_digest = [0u8; VERIFY_DIGEST_SIZE];
        verify_digest.copy_from_slice(&payload[cursor..cursor + VERIFY_DIGEST_SIZE]);

        Ok(Self {
            kdf_iterations,
            kdf_memory_bytes,
            salt,
            iv,
            encrypted_root_key,
            verify_digest,
        })
    }

    pub fn matches_magic(wallet_bytes: &[u8]) -> bool {
        wallet_bytes.starts_with(ARMORY_FILE_MAGIC)
    }

    /// El archivo porta la magia seguida del mismo bloque de parámetros
    /// que el payload del blob.
    pub fn from_wallet_bytes(wallet_bytes: &[u8]) -> Result<Self, WalletFault> {
        if !Self::matches_magic(wallet_bytes) {
            return Err(WalletFault::UnrecognizedWalletFormat);
        }
        let after_magic = &wallet_bytes[ARMORY_FILE_MAGIC.len()..];
        if after_magic.len() < PAYLOAD_SIZE {
            return Err(WalletFault::MalformedKey(
                "armory wallet is too short for its key parameter block".into(),
            ));
        }
        Self::from_payload(&after_magic[..PAYLOAD_SIZE])
    }

    pub fn payload(&self) -> Vec<u8> {
        let mut payload = Vec::with_capacity(PAYLOAD_SIZE);
        payload.extend_from_slice(&self.kdf_iterations.to_le_bytes());
        payload.extend_from_slice(&self.kdf_memory_bytes.to_le_bytes());
        payload.extend_from_slice(&self.salt);
        payload.extend_from_slice(&self.iv);
        payload.extend_from_slice(&self.encrypted_root_key);
        payload.extend_from_slice(&self.verify_digest);
        payload
    }
}

impl WalletProbe for ArmoryProbe {
    fn format_name(&self) -> &'static str {
        "armory"
    }

    fn accepts_password(&self, candidate: &str, engine: &Aes256CbcEngine) -> bool {
        let key = kdf::romix_sha512(
            candidate.as_bytes(),
            &self.salt,
            self.kdf_iterations,
            self.kdf_memory_bytes,
        );
        match engine.decrypt(&key, &self.iv, &self.encrypted_root_key) {
            Ok(plaintext) => {
                let digest = Sha256::digest(&plaintext);
                digest[..VERIFY_DIGEST_SIZE] == self.verify_digest
            }
            Err(_) => false,
        }
    }
}
