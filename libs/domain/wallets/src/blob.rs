// [libs/domain/wallets/src/blob.rs]
/*!
 * =================================================================
 * APARATO: ENCRYPTED KEY BLOB CODEC (V1.2 - CRC GATE)
 * CLASIFICACIÓN: DOMAIN CORE (ESTRATO L2)
 * RESPONSABILIDAD: CODIFICACIÓN Y VALIDACIÓN DE EXTRACTOS DE CLAVE
 *
 * Layout del blob (antes de base64):
 *   <tag de formato, 4 bytes> <payload> <CRC32 LE, 4 bytes>
 * El CRC cubre tag + payload. Los tags llevan el código de era de dos
 * letras, dos puntos y el dígito de esquema: "ar:1", "bc:1", "mb:1",
 * "el:1".
 * =================================================================
 */

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use crate::errors::WalletFault;

/// Largo del tag de formato.
pub const FORMAT_TAG_SIZE: usize = 4;
/// Largo del trailer CRC32.
pub const CRC_TRAILER_SIZE: usize = 4;

pub const ARMORY_TAG: &[u8; 4] = b"ar:1";
pub const BITCOIN_CORE_TAG: &[u8; 4] = b"bc:1";
pub const MULTIBIT_TAG: &[u8; 4] = b"mb:1";
pub const ELECTRUM_TAG: &[u8; 4] = b"el:1";

/// Decodifica y valida un blob base64; retorna (tag, payload).
pub fn open_key_blob(encoded_blob: &str) -> Result<([u8; 4], Vec<u8>), WalletFault> {
    let decoded = BASE64.decode(encoded_blob.trim())?;

    if decoded.len() < FORMAT_TAG_SIZE + CRC_TRAILER_SIZE + 1 {
        return Err(WalletFault::MalformedKey(format!(
            "decoded key blob of {} bytes is too short",
            decoded.len()
        )));
    }

    let (body, crc_trailer) = decoded.split_at(decoded.len() - CRC_TRAILER_SIZE);
    let declared_crc = u32::from_le_bytes([
        crc_trailer[0],
        crc_trailer[1],
        crc_trailer[2],
        crc_trailer[3],
    ]);
    if crc32fast::hash(body) != declared_crc {
        return Err(WalletFault::KeyCrcCheck);
    }

    let mut tag = [0u8; FORMAT_TAG_SIZE];
    tag.copy_from_slice(&body[..FORMAT_TAG_SIZE]);
    Ok((tag, body[FORMAT_TAG_SIZE..].to_vec()))
}

/// Sella tag + payload con su CRC y lo codifica en base64.
pub fn seal_key_blob(tag: &[u8; 4], payload: &[u8]) -> String {
    let mut body = Vec::with_capacity(FORMAT_TAG_SIZE + payload.len() + CRC_TRAILER_SIZE);
    body.extend_from_slice(tag);
    body.extend_from_slice(payload);
    let crc = crc32fast::hash(&body);
    body.extend_from_slice(&crc.to_le_bytes());
    BASE64.encode(body)
}
