// [apps/recovery-cli/src/main.rs]
/*!
 * =================================================================
 * APARATO: RECOVERY SHELL (V2.0 - ZENITH SHELL)
 * CLASIFICACIÓN: APPLICATION LAYER (ENTRY POINT)
 * RESPONSABILIDAD: BOOTSTRAP DE ENTORNO E IGNICIÓN DE LA SESIÓN
 *
 * VISION HIPER-HOLÍSTICA:
 * 1. PURE SWITCHBOARD: El binario solo configura observabilidad,
 *    señales y directivas; toda la operación vive en RecoverySession.
 * 2. SIGNAL DISCIPLINE: Ctrl-C levanta una bandera atómica; el pool
 *    drena, se sella el progreso y el proceso cierra ordenado.
 * 3. EXIT CONTRACT: 0 en terminación normal (hallazgo o agotamiento),
 *    distinto de cero con diagnóstico ante insumos inválidos.
 * =================================================================
 */

use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use clap::Parser;
use tracing::{info, warn};

use lazarus_recovery_lib::{RecoveryDirectives, RecoverySession};

fn main() -> ExitCode {
    // 1. INICIALIZACIÓN DEL SISTEMA DE OBSERVABILIDAD
    lazarus_shared_argos::init_observability("lazarus_recovery");

    // 2. PARSEO DE DIRECTIVAS ESTRATÉGICAS
    let directives = RecoveryDirectives::parse();

    // 3. PROTOCOLO DE SEÑALES (Terminación Ordenada)
    let stop_signal = Arc::new(AtomicBool::new(false));
    let signal_flag_reference = Arc::clone(&stop_signal);
    if let Err(fault) = ctrlc::set_handler(move || {
        warn!("⚠️ [SIGNAL]: Termination requested by host. Sealing current progress...");
        signal_flag_reference.store(true, Ordering::SeqCst);
    }) {
        warn!("⚠️ [SIGNAL]: Could not install the Ctrl-C handler: {fault}");
    }

    // 4. ENSAMBLADO E IGNICIÓN DE LA SESIÓN
    info!("💠 [SHELL]: Lazarus recovery campaign starting...");
    let outcome = RecoverySession::assemble(directives)
        .and_then(|mut session| session.execute(&stop_signal));

    match outcome {
        Ok(verdict) => {
            println!("{verdict}");
            ExitCode::SUCCESS
        }
        Err(fault) => {
            eprintln!("{fault:#}");
            ExitCode::from(2)
        }
    }
}
