// [libs/domain/wallets/src/formats/bitcoin_core.rs]
/*!
 * =================================================================
 * APARATO: BITCOIN CORE PROBE (V1.3 - MKEY SCAN)
 * CLASIFICACIÓN: DOMAIN STRATEGY (ESTRATO L2)
 * RESPONSABILIDAD: VERIFICACIÓN CONTRA LA MASTER KEY DE wallet.dat
 *
 * El wallet.dat es un archivo Berkeley DB; en lugar de montar un motor
 * de base de datos, el sondeo valida la magia BDB y escanea el registro
 * 'mkey' para leer la CMasterKey serializada: clave maestra cifrada de
 * 48 bytes, sal de 8, método de derivación y conteo de iteraciones.
 *
 * Verificación: SHA-512 iterado sobre password+salt produce clave e IV;
 * la master key descifrada de 32 bytes cierra con un bloque completo de
 * padding PKCS#7 (16 x 0x10).
 * =================================================================
 */

use crate::cipher::Aes256CbcEngine;
use crate::errors::WalletFault;
use crate::kdf;
use crate::probe::WalletProbe;

/// Magia de Berkeley DB (btree) en el offset 12, little-endian.
pub const BDB_BTREE_MAGIC: u32 = 0x0006_1561;
const BDB_MAGIC_OFFSET: usize = 12;

/// Marcador del registro de master key dentro del wallet.dat.
const MASTER_KEY_RECORD_MARKER: &[u8] = b"\x04mkey";

const ENCRYPTED_MASTER_KEY_SIZE: usize = 48;
const SALT_SIZE: usize = 8;
const PAYLOAD_SIZE: usize = 4 + SALT_SIZE + ENCRYPTED_MASTER_KEY_SIZE;

/// Sonda del formato Bitcoin Core.
pub struct BitcoinCoreProbe {
    derive_iterations: u32,
    salt: [u8; SALT_SIZE],
    encrypted_master_key: [u8; ENCRYPTED_MASTER_KEY_SIZE],
}

impl BitcoinCoreProbe {
    /// Layout del payload del blob: iteraciones u32 LE, sal 8, mkey 48.
    pub fn from_payload(payload: &[u8]) -> Result<Self, WalletFault> {
        if payload.len() != PAYLOAD_SIZE {
            return Err(WalletFault::MalformedKey(format!(
                "bitcoin core key payload must be {PAYLOAD_SIZE} bytes, found {}",
                payload.len()
            )));
        }
        let derive_iterations = u32::from_le_bytes([payload[0], payload[1], payload[2], payload[3]]);
        if derive_iterations == 0 {
            return Err(WalletFault::MalformedKey(
                "bitcoin core derivation count must be at least 1".into(),
            ));
        }
        let mut salt = [0u8; SALT_SIZE];
        salt.copy_from_slice(&payload[4..4 + SALT_SIZE]);
        let mut encrypted_master_key = [0u8; ENCRYPTED_MASTER_KEY_SIZE];
        encrypted_master_key.copy_from_slice(&payload[4 + SALT_SIZE..PAYLOAD_SIZE]);
        Ok(Self {
            derive_iterations,
            salt,
            encrypted_master_key,
        })
    }

    /// Cierto si los bytes portan la magia btree de Berkeley DB.
    pub fn matches_magic(wallet_bytes: &[u8]) -> bool {
        if wallet_bytes.len() < BDB_MAGIC_OFFSET + 4 {
            return false;
        }
        let magic = u32::from_le_bytes([
            wallet_bytes[BDB_MAGIC_OFFSET],
            wallet_bytes[BDB_MAGIC_OFFSET + 1],
            wallet_bytes[BDB_MAGIC_OFFSET + 2],
            wallet_bytes[BDB_MAGIC_OFFSET + 3],
        ]);
        magic == BDB_BTREE_MAGIC || magic.swap_bytes() == BDB_BTREE_MAGIC
    }

    /// Escanea el registro 'mkey' y parsea la CMasterKey serializada:
    /// vchCryptedKey (0x30 + 48), vchSalt (0x08 + 8), método u32,
    /// iteraciones u32.
    pub fn from_wallet_bytes(wallet_bytes: &[u8]) -> Result<Self, WalletFault> {
        let marker_offset = find_subsequence(wallet_bytes, MASTER_KEY_RECORD_MARKER)
            .ok_or(WalletFault::UnrecognizedWalletFormat)?;
        let record = &wallet_bytes[marker_offset + MASTER_KEY_RECORD_MARKER.len()..];

        // vchCryptedKey con prefijo compact-size.
        let mut cursor = 0usize;
        let malformed =
            |detail: &str| WalletFault::MalformedKey(format!("mkey record: {detail}"));

        if record.len() < cursor + 1 + ENCRYPTED_MASTER_KEY_SIZE {
            return Err(malformed("truncated encrypted master key"));
        }
        if record[cursor] as usize != ENCRYPTED_MASTER_KEY_SIZE {
            return Err(malformed("unexpected master key length prefix"));
        }
        cursor += 1;
        let mut encrypted_master_key = [0u8; ENCRYPTED_MASTER_KEY_SIZE];
        encrypted_master_key
            .copy_from_slice(&record[cursor..cursor + ENCRYPTED_MASTER_KEY_SIZE]);
        cursor += ENCRYPTED_MASTER_KEY_SIZE;

        // vchSalt con prefijo compact-size.
        if record.len() < cursor + 1 + SALT_SIZE {
            return Err(malformed("truncated salt"));
        }
        if record[cursor] as usize != SALT_SIZE {
            return Err(malformed("unexpected salt length prefix"));
        }
        cursor += 1;
        let mut salt = [0u8; SALT_SIZE];
        salt.copy_from_slice(&record[cursor..cursor + SALT_SIZE]);
        cursor += SALT_SIZE;

        // nDerivationMethod + nDeriveIterations.
        if record.len() < cursor + 8 {
            return Err(malformed("truncated derivation parameters"));
        }
        let derivation_method = u32::from_le_bytes([
            record[cursor],
            record[cursor + 1],
            record[cursor + 2],
            record[cursor + 3],
        ]);
        if derivation_method != 0 {
            return Err(malformed("unsupported derivation method"));
        }
        cursor += 4;
        let derive_iterations = u32::from_le_bytes([
            record[cursor],
            record[cursor + 1],
            record[cursor + 2],
            record[cursor + 3],
        ]);
        if derive_iterations == 0 {
            return Err(malformed("derivation count must be at least 1"));
        }

        Ok(Self {
            derive_iterations,
            salt,
            encrypted_master_key,
        })
    }

    /// Serializa los parámetros al layout del payload del blob.
    pub fn payload(&self) -> Vec<u8> {
        let mut payload = Vec::with_capacity(PAYLOAD_SIZE);
        payload.extend_from_slice(&self.derive_iterations.to_le_bytes());
        payload.extend_from_slice(&self.salt);
        payload.extend_from_slice(&self.encrypted_master_key);
        payload
    }
}

impl WalletProbe for BitcoinCoreProbe {
    fn format_name(&self) -> &'static str {
        "bitcoin-core"
    }

    fn accepts_password(&self, candidate: &str, engine: &Aes256CbcEngine) -> bool {
        let (key, iv) =
            kdf::iterated_sha512(candidate.as_bytes(), &self.salt, self.derive_iterations);
        match engine.decrypt(&key, &iv, &self.encrypted_master_key) {
            Ok(plaintext) => plaintext[32..].iter().all(|&byte| byte == 0x10),
            Err(_) => false,
        }
    }
}

/// Búsqueda de subsecuencia simple (los wallets caben en memoria).
pub(crate) fn find_subsequence(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
