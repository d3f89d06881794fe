// [libs/domain/wallets/src/cipher.rs]
/*!
 * =================================================================
 * APARATO: AES-256-CBC DUAL BACKEND (V1.2 - PARITY SEAL)
 * CLASIFICACIÓN: DOMAIN CORE (ESTRATO L2)
 * RESPONSABILIDAD: DESCIFRADO SIMÉTRICO CON BACKEND SELECCIONABLE
 *
 * VISION HIPER-HOLÍSTICA:
 * 1. DUAL PATH: Un backend 'Pipelined' sobre el modo de bloque de la
 *    crate cbc y un backend 'Scalar' que encadena el XOR de CBC a mano
 *    sobre el cifrador de bloque crudo. Ambos deben producir bytes
 *    idénticos; el proving grounds certifica la paridad.
 * 2. NO PADDING POLICY: Los manejadores de formato validan sus propios
 *    marcadores de texto plano; el motor no impone padding.
 * =================================================================
 */

use aes::cipher::{
    block_padding::NoPadding, generic_array::GenericArray, BlockDecrypt, BlockDecryptMut,
    BlockEncrypt, BlockEncryptMut, KeyInit, KeyIvInit,
};
use aes::Aes256;

use crate::errors::WalletFault;

/// Tamaño de bloque AES en bytes.
pub const AES_BLOCK_SIZE: usize = 16;

type PipelinedDecryptor = cbc::Decryptor<Aes256>;
type PipelinedEncryptor = cbc::Encryptor<Aes256>;

/// Backend de descifrado AES-256-CBC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aes256CbcEngine {
    /// Modo de bloque de la crate cbc (ruta por defecto).
    Pipelined,
    /// Cadena CBC escalar y portable sobre el cifrador de bloque.
    Scalar,
}

impl Aes256CbcEngine {
    /// Selección de backend; `force_portable` impone la ruta escalar.
    pub fn select(force_portable: bool) -> Self {
        if force_portable {
            Self::Scalar
        } else {
            Self::Pipelined
        }
    }

    /// Descifra un flujo alineado a bloque; el largo se preserva.
    pub fn decrypt(
        &self,
        key: &[u8; 32],
        iv: &[u8; 16],
        ciphertext: &[u8],
    ) -> Result<Vec<u8>, WalletFault> {
        if ciphertext.is_empty() || ciphertext.len() % AES_BLOCK_SIZE != 0 {
            return Err(WalletFault::MalformedKey(format!(
                "ciphertext length {} is not a positive multiple of the AES block size",
                ciphertext.len()
            )));
        }

        match self {
            Self::Pipelined => PipelinedDecryptor::new(key.into(), iv.into())
                .decrypt_padded_vec_mut::<NoPadding>(ciphertext)
                .map_err(|_| {
                    WalletFault::MalformedKey("cipher stream rejected by block mode".into())
                }),
            Self::Scalar => {
                let block_cipher = Aes256::new(GenericArray::from_slice(key));
                let mut plaintext = Vec::with_capacity(ciphertext.len());
                let mut previous_block = *iv;

                for block in ciphertext.chunks_exact(AES_BLOCK_SIZE) {
                    let mut working = GenericArray::clone_from_slice(block);
                    block_cipher.decrypt_block(&mut working);
                    for (byte, chained) in working.iter_mut().zip(previous_block.iter()) {
                        *byte ^= chained;
                    }
                    plaintext.extend_from_slice(&working);
                    previous_block.copy_from_slice(block);
                }
                Ok(plaintext)
            }
        }
    }

    /// Cifra un flujo alineado a bloque (usado por la fragua de fixtures).
    pub fn encrypt(
        &self,
        key: &[u8; 32],
        iv: &[u8; 16],
        plaintext: &[u8],
    ) -> Result<Vec<u8>, WalletFault> {
        if plaintext.is_empty() || plaintext.len() % AES_BLOCK_SIZE != 0 {
            return Err(WalletFault::MalformedKey(format!(
                "plaintext length {} is not a positive multiple of the AES block size",
                plaintext.len()
            )));
        }

        match self {
            Self::Pipelined => Ok(PipelinedEncryptor::new(key.into(), iv.into())
                .encrypt_padded_vec_mut::<NoPadding>(plaintext)),
            Self::Scalar => {
                let block_cipher = Aes256::new(GenericArray::from_slice(key));
                let mut ciphertext = Vec::with_capacity(plaintext.len());
                let mut previous_block = *iv;

                for block in plaintext.chunks_exact(AES_BLOCK_SIZE) {
                    let mut working = GenericArray::clone_from_slice(block);
                    for (byte, chained) in working.iter_mut().zip(previous_block.iter()) {
                        *byte ^= chained;
                    }
                    block_cipher.encrypt_block(&mut working);
                    ciphertext.extend_from_slice(&working);
                    previous_block.copy_from_slice(&working);
                }
                Ok(ciphertext)
            }
        }
    }
}
