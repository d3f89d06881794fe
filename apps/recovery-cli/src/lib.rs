// [apps/recovery-cli/src/lib.rs]
/*!
 * =================================================================
 * APARATO: RECOVERY APPLICATION LIBRARY (V1.0)
 * CLASIFICACIÓN: APPLICATION LAYER (ESTRATO L4)
 * RESPONSABILIDAD: EXPOSICIÓN DE DIRECTIVAS Y SESIÓN PARA EL BINARIO
 *                  Y EL PROVING GROUNDS
 * =================================================================
 */

pub mod cli;
pub mod session;

pub use cli::{EnumerationSignature, RecoveryDirectives};
pub use session::{RecoverySession, SearchVerdict};
