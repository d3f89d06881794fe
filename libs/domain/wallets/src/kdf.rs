// [libs/domain/wallets/src/kdf.rs]
/*!
 * =================================================================
 * APARATO: KEY DERIVATION STRATA (V1.3 - MULTI-ERA)
 * CLASIFICACIÓN: DOMAIN CORE (ESTRATO L2)
 * RESPONSABILIDAD: DERIVACIÓN DE CLAVES POR ERA DE CARTERA
 *
 * Cada era de cartera Bitcoin trajo su propio KDF:
 * - Bitcoin Core: SHA-512 iterado sobre password+salt (EVP con SHA512).
 * - MultiBit: EVP_BytesToKey clásico de OpenSSL con MD5.
 * - Electrum 1.x: doble SHA-256 del password, sin sal.
 * - Armory: ROMix secuencial con SHA-512 y tabla dependiente de memoria.
 * =================================================================
 */

use md5::Md5;
use sha2::{Digest, Sha256, Sha512};

/// Deriva (clave, IV) al estilo Bitcoin Core: SHA-512 iterado.
pub fn iterated_sha512(password: &[u8], salt: &[u8], iterations: u32) -> ([u8; 32], [u8; 16]) {
    let mut digest = {
        let mut hasher = Sha512::new();
        hasher.update(password);
        hasher.update(salt);
        hasher.finalize()
    };

    for _ in 1..iterations {
        let mut hasher = Sha512::new();
        hasher.update(digest);
        digest = hasher.finalize();
    }

    let mut key = [0u8; 32];
    let mut iv = [0u8; 16];
    key.copy_from_slice(&digest[..32]);
    iv.copy_from_slice(&digest[32..48]);
    (key, iv)
}

/// Deriva (clave, IV) al estilo OpenSSL EVP_BytesToKey con MD5 (MultiBit).
pub fn evp_md5_key_iv(password: &[u8], salt: &[u8]) -> ([u8; 32], [u8; 16]) {
    let round = |previous: &[u8]| -> [u8; 16] {
        let mut hasher = Md5::new();
        hasher.update(previous);
        hasher.update(password);
        hasher.update(salt);
        hasher.finalize().into()
    };

    let key_head = round(&[]);
    let key_tail = round(&key_head);
    let iv = round(&key_tail);

    let mut key = [0u8; 32];
    key[..16].copy_from_slice(&key_head);
    key[16..].copy_from_slice(&key_tail);
    (key, iv)
}

/// Deriva la clave al estilo Electrum 1.x: SHA-256 doble del password.
pub fn double_sha256(password: &[u8]) -> [u8; 32] {
    let first = Sha256::digest(password);
    let second = Sha256::digest(first);
    second.into()
}

/// Deriva la clave al estilo Armory: ROMix secuencial sobre SHA-512.
///
/// La tabla ocupa `memory_bytes` en digests encadenados de 64 bytes;
/// luego `iterations` rondas de lookup dependiente de datos, XOR y hash.
pub fn romix_sha512(
    password: &[u8],
    salt: &[u8],
    iterations: u32,
    memory_bytes: u32,
) -> [u8; 32] {
    let lookup_count = ((memory_bytes as usize) / 64).max(1);

    let mut table: Vec<[u8; 64]> = Vec::with_capacity(lookup_count);
    let seed: [u8; 64] = {
        let mut hasher = Sha512::new();
        hasher.update(password);
        hasher.update(salt);
        hasher.finalize().into()
    };
    table.push(seed);
    for index in 1..lookup_count {
        let next: [u8; 64] = Sha512::digest(table[index - 1]).into();
        table.push(next);
    }

    let mut state = table[lookup_count - 1];
    for _ in 0..iterations.max(1) {
        let selector =
            u32::from_le_bytes([state[0], state[1], state[2], state[3]]) as usize % lookup_count;
        for (byte, mixed) in state.iter_mut().zip(table[selector].iter()) {
            *byte ^= mixed;
        }
        state = Sha512::digest(state).into();
    }

    let mut key = [0u8; 32];
    key.copy_from_slice(&state[..32]);
    key
}
