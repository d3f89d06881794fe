// [libs/domain/wallets/src/errors.rs]
/*!
 * =================================================================
 * APARATO: WALLET FAULT CATALOG (V1.1 - SOBERANO)
 * CLASIFICACIÓN: DOMAIN CORE (ESTRATO L2)
 * RESPONSABILIDAD: CATALOGACIÓN SEMÁNTICA DE FALLOS DE SONDEO
 * =================================================================
 */

use thiserror::Error;

/// Catálogo de fallos del estrato de carteras.
#[derive(Error, Debug)]
pub enum WalletFault {
    /// Ningún manejador reconoce los marcadores estructurales del archivo.
    #[error("[L2_WALLET_FAULT]: UNRECOGNIZED_FORMAT -> unrecognized wallet format")]
    UnrecognizedWalletFormat,

    /// El CRC32 del blob de clave no coincide con el trailer declarado.
    #[error("[L2_KEY_FAULT]: CRC_CHECK -> encrypted key data is corrupted (failed CRC check)")]
    KeyCrcCheck,

    /// El blob decodificado no respeta el layout del formato declarado.
    #[error("[L2_KEY_FAULT]: MALFORMED_KEY -> {0}")]
    MalformedKey(String),

    #[error("[L2_KEY_FAULT]: ENCODING -> {0}")]
    Encoding(#[from] base64::DecodeError),

    #[error("[L2_WALLET_FAULT]: IO -> {0}")]
    Io(#[from] std::io::Error),
}
