// [libs/core/generators/src/dedup.rs]
/*!
 * =================================================================
 * APARATO: BOUNDED DEDUPLICATION STORE (V1.1 - SOBERANO)
 * CLASIFICACIÓN: CORE PIPELINE (ESTRATO L1)
 * RESPONSABILIDAD: SUPRESIÓN DE REPETIDOS CON MEMORIA ACOTADA
 *
 * VISION HIPER-HOLÍSTICA:
 * 1. STAGE SCOPED: Cada etapa del pipeline posee su propio almacén; el
 *    estado no se comparte entre etapas ni entre workers.
 * 2. SATURATION POLICY: Al alcanzar la capacidad el almacén deja de
 *    registrar y lo anuncia una sola vez; a partir de ahí pueden pasar
 *    repetidos, intercambiando memoria por trabajo repetido.
 * =================================================================
 */

use std::collections::HashSet;
use std::hash::Hash;
use tracing::warn;

/// Capacidad por defecto de cada almacén de deduplicación.
pub const DEDUP_STORE_CAPACITY: usize = 8 * 1024 * 1024;

/// Niveles de supresión progresivamente deshabilitados por -d/-dd/-ddd.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DedupPolicy {
    /// Supresión global de candidatos finales repetidos.
    pub final_candidates: bool,
    /// Supresión global de combinaciones de tokens repetidas.
    pub combinations: bool,
    /// Supresión de permutaciones idénticas dentro de una combinación.
    pub permutations: bool,
}

impl DedupPolicy {
    /// Traduce el conteo de banderas '-d' a la política efectiva.
    pub fn from_disable_level(level: u8) -> Self {
        Self {
            final_candidates: level < 1,
            combinations: level < 2,
            permutations: level < 3,
        }
    }
}

impl Default for DedupPolicy {
    fn default() -> Self {
        Self::from_disable_level(0)
    }
}

/// Conjunto de vistos con capacidad dura y política de saturación.
#[derive(Debug)]
pub struct BoundedSeenSet<T: Hash + Eq> {
    seen: HashSet<T>,
    capacity: usize,
    saturated: bool,
    stage_label: &'static str,
}

impl<T: Hash + Eq> BoundedSeenSet<T> {
    pub fn new(capacity: usize, stage_label: &'static str) -> Self {
        Self {
            seen: HashSet::new(),
            capacity,
            saturated: false,
            stage_label,
        }
    }

    pub fn with_default_capacity(stage_label: &'static str) -> Self {
        Self::new(DEDUP_STORE_CAPACITY, stage_label)
    }

    /// Registra el valor; cierto si no había sido visto.
    ///
    /// Tras la saturación todo valor se considera nuevo.
    pub fn record(&mut self, value: T) -> bool {
        if self.saturated {
            return true;
        }
        if self.seen.len() >= self.capacity {
            self.saturated = true;
            warn!(
                "⚠️ [DEDUP_SATURATED]: Store '{}' reached {} entries; duplicates may pass from here on.",
                self.stage_label, self.capacity
            );
            return true;
        }
        self.seen.insert(value)
    }

    pub fn is_saturated(&self) -> bool {
        self.saturated
    }
}
