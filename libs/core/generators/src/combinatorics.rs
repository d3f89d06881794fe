// [libs/core/generators/src/combinatorics.rs]
/*!
 * =================================================================
 * APARATO: COMBINATORIAL PERMUTATION ENGINE (V3.0 - CANONICAL ORDER)
 * CLASIFICACIÓN: CORE PIPELINE (ESTRATO L1)
 * RESPONSABILIDAD: ENUMERACIÓN DE COMBINACIONES Y PERMUTACIONES LEGALES
 *
 * VISION HIPER-HOLÍSTICA:
 * 1. REVERSED PRODUCT: Las elecciones por sección se recorren sobre la
 *    lista de secciones invertida, con la primera línea del archivo
 *    girando más rápido. Ese es el orden canónico observable del motor.
 * 2. LEXICOGRAPHIC PERMUTATIONS: Dentro de una combinación, las
 *    permutaciones se enumeran en orden lexicográfico de índices y se
 *    filtran por legalidad de anclas.
 * 3. DEDUP HOOKS: La supresión de combinaciones repetidas es global; la
 *    de permutaciones idénticas es local a cada combinación.
 *
 * # Mathematical Proof (Total Coverage):
 * El odómetro de elecciones recorre el producto de los dominios por
 * sección exactamente una vez, y el avance lexicográfico de permutaciones
 * parte del arreglo identidad ordenado, por lo que toda permutación de
 * cada combinación admisible se visita una única vez.
 * =================================================================
 */

use crate::dedup::{BoundedSeenSet, DedupPolicy};
use crate::tokenlist::{Section, Token, TokenListModel};

/// Límites de participación de tokens por candidato.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenCountBounds {
    pub min_tokens: usize,
    pub max_tokens: usize,
}

impl Default for TokenCountBounds {
    fn default() -> Self {
        Self {
            min_tokens: 1,
            max_tokens: usize::MAX,
        }
    }
}

/// Iterador sobre las permutaciones de tokens legales del modelo.
///
/// Emite, para cada combinación admisible de alternativas, toda
/// permutación que satisface las anclas, como vector de tokens en orden
/// de ensamblado.
pub struct TokenPermutations<'a> {
    reversed_sections: Vec<&'a Section>,
    bounds: TokenCountBounds,
    policy: DedupPolicy,
    choice_cursor: Vec<usize>,
    outer_exhausted: bool,
    outer_primed: bool,
    seen_combinations: BoundedSeenSet<Vec<Token>>,
    active: Option<PermutationCursor<'a>>,
}

impl<'a> TokenPermutations<'a> {
    pub fn new(model: &'a TokenListModel, bounds: TokenCountBounds, policy: DedupPolicy) -> Self {
        let reversed_sections: Vec<&Section> = model.sections.iter().rev().collect();
        let choice_cursor = vec![0usize; reversed_sections.len()];
        Self {
            reversed_sections,
            bounds,
            policy,
            choice_cursor,
            outer_exhausted: false,
            outer_primed: false,
            seen_combinations: BoundedSeenSet::with_default_capacity("token-combinations"),
            active: None,
        }
    }

    /// Dominio de elección de una sección: la opción vacía primero para
    /// las opcionales, luego las alternativas en orden de línea.
    fn choice_token(&self, section_index: usize, choice: usize) -> Option<&'a Token> {
        let section = self.reversed_sections[section_index];
        if section.required {
            Some(&section.alternatives[choice])
        } else if choice == 0 {
            None
        } else {
            Some(&section.alternatives[choice - 1])
        }
    }

    fn choice_domain_size(&self, section_index: usize) -> usize {
        let section = self.reversed_sections[section_index];
        if section.required {
            section.alternatives.len()
        } else {
            section.alternatives.len() + 1
        }
    }

    /// Avanza el odómetro de elecciones; la sección más a la derecha
    /// (primera línea del archivo) gira más rápido.
    fn advance_choices(&mut self) -> bool {
        for index in (0..self.choice_cursor.len()).rev() {
            if self.choice_cursor[index] + 1 < self.choice_domain_size(index) {
                self.choice_cursor[index] += 1;
                for later in self.choice_cursor[index + 1..].iter_mut() {
                    *later = 0;
                }
                return true;
            }
        }
        false
    }

    /// Materializa la combinación actual en orden de lista invertida.
    fn assemble_combination(&self) -> Vec<&'a Token> {
        let mut combination = Vec::new();
        for section_index in 0..self.reversed_sections.len() {
            if let Some(token) = self.choice_token(section_index, self.choice_cursor[section_index])
            {
                combination.push(token);
            }
        }
        combination
    }

    /// Busca la próxima combinación admisible y arma su cursor de
    /// permutaciones.
    fn advance_to_next_combination(&mut self) -> bool {
        loop {
            if self.outer_exhausted {
                return false;
            }
            if self.outer_primed {
                if !self.advance_choices() {
                    self.outer_exhausted = true;
                    return false;
                }
            } else {
                self.outer_primed = true;
            }

            let combination = self.assemble_combination();
            if combination.len() < self.bounds.min_tokens
                || combination.len() > self.bounds.max_tokens
            {
                continue;
            }

            if self.policy.combinations {
                let key: Vec<Token> = combination.iter().map(|&t| t.clone()).collect();
                if !self.seen_combinations.record(key) {
                    continue;
                }
            }

            self.active = Some(PermutationCursor::new(combination, self.policy.permutations));
            return true;
        }
    }
}

impl<'a> Iterator for TokenPermutations<'a> {
    type Item = Vec<&'a Token>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(cursor) = self.active.as_mut() {
                if let Some(permutation) = cursor.next_legal() {
                    return Some(permutation);
                }
                self.active = None;
            }
            if !self.advance_to_next_combination() {
                return None;
            }
        }
    }
}

/// Cursor de permutaciones lexicográficas de una combinación fija.
struct PermutationCursor<'a> {
    tokens: Vec<&'a Token>,
    index_order: Vec<usize>,
    /// Identificador canónico por posición para detectar permutaciones
    /// idénticas cuando la combinación trae tokens repetidos.
    canonical_ids: Vec<usize>,
    dedup_identical: bool,
    seen_orders: Option<BoundedSeenSet<Vec<usize>>>,
    primed: bool,
    exhausted: bool,
}

impl<'a> PermutationCursor<'a> {
    fn new(tokens: Vec<&'a Token>, dedup_identical: bool) -> Self {
        let canonical_ids: Vec<usize> = tokens
            .iter()
            .enumerate()
            .map(|(index, token)| {
                tokens[..index]
                    .iter()
                    .position(|earlier| earlier == token)
                    .unwrap_or(index)
            })
            .collect();
        let has_duplicates = canonical_ids
            .iter()
            .enumerate()
            .any(|(index, &id)| id != index);
        let index_order: Vec<usize> = (0..tokens.len()).collect();
        let seen_orders = if dedup_identical && has_duplicates {
            Some(BoundedSeenSet::with_default_capacity("token-permutations"))
        } else {
            None
        };
        Self {
            tokens,
            index_order,
            canonical_ids,
            dedup_identical,
            seen_orders,
            primed: false,
            exhausted: false,
        }
    }

    fn next_legal(&mut self) -> Option<Vec<&'a Token>> {
        loop {
            if self.exhausted {
                return None;
            }
            if self.primed {
                if !advance_lexicographic(&mut self.index_order) {
                    self.exhausted = true;
                    return None;
                }
            } else {
                self.primed = true;
            }

            let length = self.index_order.len();
            let anchors_satisfied = self
                .index_order
                .iter()
                .enumerate()
                .all(|(slot, &token_index)| {
                    self.tokens[token_index].position_is_legal(slot + 1, length)
                });
            if !anchors_satisfied {
                continue;
            }

            if self.dedup_identical {
                if let Some(store) = self.seen_orders.as_mut() {
                    let canonical_order: Vec<usize> = self
                        .index_order
                        .iter()
                        .map(|&token_index| self.canonical_ids[token_index])
                        .collect();
                    if !store.record(canonical_order) {
                        continue;
                    }
                }
            }

            return Some(
                self.index_order
                    .iter()
                    .map(|&token_index| self.tokens[token_index])
                    .collect(),
            );
        }
    }
}

/// Avance lexicográfico estándar sobre un arreglo de índices.
fn advance_lexicographic(indices: &mut [usize]) -> bool {
    if indices.len() < 2 {
        return false;
    }
    let mut pivot = indices.len() - 1;
    while pivot > 0 && indices[pivot - 1] >= indices[pivot] {
        pivot -= 1;
    }
    if pivot == 0 {
        return false;
    }
    let mut successor = indices.len() - 1;
    while indices[successor] <= indices[pivot - 1] {
        successor -= 1;
    }
    indices.swap(pivot - 1, successor);
    indices[pivot..].reverse();
    true
}
