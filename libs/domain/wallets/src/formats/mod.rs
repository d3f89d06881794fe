// [libs/domain/wallets/src/formats/mod.rs]
/*!
 * =================================================================
 * APARATO: WALLET FORMAT REGISTRY (V1.0)
 * CLASIFICACIÓN: DOMAIN CORE (ESTRATO L2)
 * RESPONSABILIDAD: REGISTRO DE MANEJADORES POR ERA DE CARTERA
 * =================================================================
 */

pub mod armory;
pub mod bitcoin_core;
pub mod electrum;
pub mod multibit;

pub use armory::ArmoryProbe;
pub use bitcoin_core::BitcoinCoreProbe;
pub use electrum::ElectrumProbe;
pub use multibit::MultiBitProbe;
