// [libs/domain/wallets/src/probe.rs]
/*!
 * =================================================================
 * APARATO: WALLET VAULT DISPATCHER (V2.0 - FORMAT SNIFFER)
 * CLASIFICACIÓN: DOMAIN CORE (ESTRATO L2)
 * RESPONSABILIDAD: DESPACHO POR FORMATO Y CONTRATO DE VERIFICACIÓN
 *
 * VISION HIPER-HOLÍSTICA:
 * 1. NARROW CONTRACT: El núcleo solo conoce 'accepts_password'; la
 *    detección de formato y la derivación viven tras el trait.
 * 2. READ ONLY: La carga de un wallet lee los bytes una vez y jamás
 *    muta el archivo; el material queda en memoria para el fingerprint.
 * 3. BACKEND SWITCH: El motor AES es intercambiable en caliente para
 *    certificar la paridad del camino portable.
 * =================================================================
 */

use std::fmt;
use std::fs;
use std::path::Path;

use tracing::info;

use crate::blob::{
    open_key_blob, ARMORY_TAG, BITCOIN_CORE_TAG, ELECTRUM_TAG, MULTIBIT_TAG,
};
use crate::cipher::Aes256CbcEngine;
use crate::errors::WalletFault;
use crate::formats::{ArmoryProbe, BitcoinCoreProbe, ElectrumProbe, MultiBitProbe};

/// Contrato uniforme de verificación de contraseñas por formato.
pub trait WalletProbe: Send + Sync {
    fn format_name(&self) -> &'static str;

    /// Deriva, descifra y valida el marcador de texto plano del formato.
    /// Pura: no muta estado en el fallo ni en el éxito.
    fn accepts_password(&self, candidate: &str, engine: &Aes256CbcEngine) -> bool;
}

/// Bóveda de verificación: manejador despachado + backend AES + material.
pub struct WalletVault {
    probe: Box<dyn WalletProbe>,
    engine: Aes256CbcEngine,
    key_material: Vec<u8>,
}

impl fmt::Debug for WalletVault {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("WalletVault")
            .field("probe", &self.probe.format_name())
            .field("engine", &self.engine)
            .field("key_material_len", &self.key_material.len())
            .finish()
    }
}

impl WalletVault {
    /// Inspecciona marcadores estructurales y despacha al manejador.
    /// El archivo se abre en modo lectura y no se modifica.
    pub fn load_wallet(path: &Path) -> Result<Self, WalletFault> {
        let wallet_bytes = fs::read(path)?;
        let probe: Box<dyn WalletProbe> = if ArmoryProbe::matches_magic(&wallet_bytes) {
            Box::new(ArmoryProbe::from_wallet_bytes(&wallet_bytes)?)
        } else if BitcoinCoreProbe::matches_magic(&wallet_bytes) {
            Box::new(BitcoinCoreProbe::from_wallet_bytes(&wallet_bytes)?)
        } else if MultiBitProbe::matches_magic(&wallet_bytes) {
            Box::new(MultiBitProbe::from_wallet_bytes(&wallet_bytes)?)
        } else if ElectrumProbe::matches_magic(&wallet_bytes) {
            Box::new(ElectrumProbe::from_wallet_bytes(&wallet_bytes)?)
        } else {
            return Err(WalletFault::UnrecognizedWalletFormat);
        };

        info!(
            "🔐 [VAULT]: Wallet format '{}' engaged from {:?}.",
            probe.format_name(),
            path
        );
        Ok(Self {
            probe,
            engine: Aes256CbcEngine::select(false),
            key_material: wallet_bytes,
        })
    }

    /// Abre un extracto de clave base64 con tag de formato y CRC.
    pub fn load_from_base64_key(encoded_blob: &str) -> Result<Self, WalletFault> {
        let (tag, payload) = open_key_blob(encoded_blob)?;
        let probe: Box<dyn WalletProbe> = match &tag {
            tag if tag == ARMORY_TAG => Box::new(ArmoryProbe::from_payload(&payload)?),
            tag if tag == BITCOIN_CORE_TAG => Box::new(BitcoinCoreProbe::from_payload(&payload)?),
            tag if tag == MULTIBIT_TAG => Box::new(MultiBitProbe::from_payload(&payload)?),
            tag if tag == ELECTRUM_TAG => Box::new(ElectrumProbe::from_payload(&payload)?),
            _ => return Err(WalletFault::UnrecognizedWalletFormat),
        };

        info!(
            "🔐 [VAULT]: Key extract format '{}' engaged.",
            probe.format_name()
        );
        let mut key_material = tag.to_vec();
        key_material.extend_from_slice(&payload);
        Ok(Self {
            probe,
            engine: Aes256CbcEngine::select(false),
            key_material,
        })
    }

    /// Selecciona el backend AES (portable para certificar paridad).
    pub fn select_aes_backend(&mut self, force_portable: bool) {
        self.engine = Aes256CbcEngine::select(force_portable);
    }

    pub fn aes_backend(&self) -> Aes256CbcEngine {
        self.engine
    }

    pub fn format_name(&self) -> &'static str {
        self.probe.format_name()
    }

    /// Material de clave crudo, insumo del fingerprint de sesión.
    pub fn key_material(&self) -> &[u8] {
        &self.key_material
    }

    /// Contrato central: retorna el candidato si verifica, nada si no.
    pub fn verify_candidate(&self, candidate: &str) -> Option<String> {
        if self.probe.accepts_password(candidate, &self.engine) {
            Some(candidate.to_owned())
        } else {
            None
        }
    }
}
