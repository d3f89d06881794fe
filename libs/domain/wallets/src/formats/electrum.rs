// [libs/domain/wallets/src/formats/electrum.rs]
/*!
 * =================================================================
 * APARATO: ELECTRUM PROBE (V1.2 - SEED DICTIONARY)
 * CLASIFICACIÓN: DOMAIN STRATEGY (ESTRATO L2)
 * RESPONSABILIDAD: VERIFICACIÓN CONTRA LA SEMILLA CIFRADA ELECTRUM 1.x
 *
 * La cartera Electrum 1.x es un diccionario Python serializado como
 * texto; la entrada 'seed' guarda base64(IV de 16 + semilla cifrada de
 * 32). La clave es SHA-256 doble del password y la semilla descifrada
 * son 32 caracteres hexadecimales en minúscula.
 * =================================================================
 */

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use crate::cipher::Aes256CbcEngine;
use crate::errors::WalletFault;
use crate::kdf;
use crate::probe::WalletProbe;

const IV_SIZE: usize = 16;
const ENCRYPTED_SEED_SIZE: usize = 32;
const PAYLOAD_SIZE: usize = IV_SIZE + ENCRYPTED_SEED_SIZE;

const SEED_ENTRY_MARKER: &str = "'seed':";

/// Sonda del formato Electrum 1.x.
pub struct ElectrumProbe {
    iv: [u8; IV_SIZE],
    encrypted_seed: [u8; ENCRYPTED_SEED_SIZE],
}

impl ElectrumProbe {
    /// Layout del payload del blob: IV 16, semilla cifrada 32.
    pub fn from_payload(payload: &[u8]) -> Result<Self, WalletFault> {
        if payload.len() != PAYLOAD_SIZE {
            return Err(WalletFault::MalformedKey(format!(
                "electrum key payload must be {PAYLOAD_SIZE} bytes, found {}",
                payload.len()
            )));
        }
        let mut iv = [0u8; IV_SIZE];
        iv.copy_from_slice(&payload[..IV_SIZE]);
        let mut encrypted_seed = [0u8; ENCRYPTED_SEED_SIZE];
        encrypted_seed.copy_from_slice(&payload[IV_SIZE..]);
        Ok(Self { iv, encrypted_seed })
    }

    /// Un wallet Electrum 1.x es un diccionario textual con entrada 'seed'.
    pub fn matches_magic(wallet_bytes: &[u8]) -> bool {
        let Ok(text) = std::str::from_utf8(wallet_bytes) else {
            return false;
        };
        text.trim_start().starts_with('{') && text.contains(SEED_ENTRY_MARKER)
    }

    pub fn from_wallet_bytes(wallet_bytes: &[u8]) -> Result<Self, WalletFault> {
        let text = std::str::from_utf8(wallet_bytes)
            .map_err(|_| WalletFault::UnrecognizedWalletFormat)?;
        let seed_start = text
            .find(SEED_ENTRY_MARKER)
            .ok_or(WalletFault::UnrecognizedWalletFormat)?;
        let after_marker = &text[seed_start + SEED_ENTRY_MARKER.len()..];

        let opening_quote = after_marker
            .find('\'')
            .ok_or_else(|| WalletFault::MalformedKey("seed entry has no opening quote".into()))?;
        let value_and_rest = &after_marker[opening_quote + 1..];
        let closing_quote = value_and_rest
            .find('\'')
            .ok_or_else(|| WalletFault::MalformedKey("seed entry has no closing quote".into()))?;
        let encoded_seed = &value_and_rest[..closing_quote];

        let decoded = BASE64
            .decode(encoded_seed)
            .map_err(|_| WalletFault::MalformedKey("seed entry is not valid base64".into()))?;
        Self::from_payload(&decoded)
    }

    pub fn payload(&self) -> Vec<u8> {
        let mut payload = Vec::with_capacity(PAYLOAD_SIZE);
        payload.extend_from_slice(&self.iv);
        payload.extend_from_slice(&self.encrypted_seed);
        payload
    }
}

impl WalletProbe for ElectrumProbe {
    fn format_name(&self) -> &'static str {
        "electrum"
    }

    fn accepts_password(&self, candidate: &str, engine: &Aes256CbcEngine) -> bool {
        let key = kdf::double_sha256(candidate.as_bytes());
        match engine.decrypt(&key, &self.iv, &self.encrypted_seed) {
            Ok(plaintext) => plaintext
                .iter()
                .all(|byte| byte.is_ascii_digit() || (b'a'..=b'f').contains(byte)),
            Err(_) => false,
        }
    }
}
