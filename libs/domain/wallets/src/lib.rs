// [libs/domain/wallets/src/lib.rs]
/*!
 * =================================================================
 * APARATO: WALLET DOMAIN HUB (V2.0 - SOBERANO)
 * CLASIFICACIÓN: DOMAIN CORE (ESTRATO L2)
 * RESPONSABILIDAD: EXPOSICIÓN DEL CONTRATO DE SONDEO DE CARTERAS
 *
 * El dominio recibe un candidato y responde si abre la cartera. Todo lo
 * demás (formatos, KDFs, backends AES, codec de blobs, fragua de
 * fixtures) son detalles internos expuestos para composición y pruebas.
 * =================================================================
 */

pub mod blob;
pub mod cipher;
pub mod errors;
pub mod fixtures;
pub mod formats;
pub mod kdf;
pub mod probe;

pub use blob::{open_key_blob, seal_key_blob};
pub use cipher::{Aes256CbcEngine, AES_BLOCK_SIZE};
pub use errors::WalletFault;
pub use fixtures::FixtureForge;
pub use probe::{WalletProbe, WalletVault};
