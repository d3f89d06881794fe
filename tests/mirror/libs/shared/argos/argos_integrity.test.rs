// [tests/mirror/libs/shared/argos/argos_integrity.test.rs]
/**
 * =================================================================
 * APARATO: ARGOS INTEGRITY CERTIFIER (V1.0 - SOBERANO)
 * CLASIFICACIÓN: TRINITY EVIDENCE
 * RESPONSABILIDAD: IGNICIÓN ÚNICA DEL OBSERVADOR Y EMISIÓN DE TRAZAS
 * =================================================================
 */

use lazarus_shared_argos::init_observability;

#[test]
fn certify_observability_ignition() {
    // La ignición debe ser estable y dejar el suscriptor global activo.
    init_observability("argos_proving_grounds");

    tracing::info!("🧪 [PROVING_GROUNDS]: Argos strata levelized for testing.");
    tracing::debug!(component = "argos", "structured fields flow through the subscriber");

    // Un pánico capturado no debe tumbar el hook global.
    let caught = std::panic::catch_unwind(|| panic!("controlled collapse"));
    assert!(caught.is_err());
}
