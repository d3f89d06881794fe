// [libs/core/generators/src/typos.rs]
/*!
 * =================================================================
 * APARATO: TYPO MUTATION ENGINE (V2.2 - STAGED COMPOSITION)
 * CLASIFICACIÓN: CORE PIPELINE (ESTRATO L1)
 * RESPONSABILIDAD: COMPOSICIÓN DE MUTACIONES SOBRE CANDIDATOS BASE
 *
 * VISION HIPER-HOLÍSTICA:
 * 1. THREE STAGES: capslock, luego swaps adyacentes, luego typos simples
 *    por posición. Cada etapa emite primero su identidad, de modo que la
 *    composición cubre todo el presupuesto sin repetir estructura.
 * 2. DISJOINT POSITIONS: Las operaciones de una misma emisión actúan
 *    sobre conjuntos de índices disjuntos del string de entrada; la
 *    aplicación va de derecha a izquierda para no invalidar índices.
 * 3. CANONICAL ORDER: Combinaciones de posiciones en orden lexicográfico
 *    y producto de elecciones con la posición más a la izquierda girando
 *    más lento. El presupuesto [min_typos, max_typos] filtra al final
 *    sin alterar la estructura de enumeración.
 * =================================================================
 */

use std::collections::HashMap;

use crate::errors::ParseFault;
use crate::wildcards::{ContractPolicy, WildcardContext, WildcardTemplate};

/// Configuración completa del mutador de typos.
#[derive(Debug, Clone, Default)]
pub struct TypoSettings {
    pub max_typos: usize,
    pub min_typos: usize,
    pub capslock: bool,
    pub swap: bool,
    pub repeat: bool,
    pub delete: bool,
    pub case_flip: bool,
    pub close_case_flip: bool,
    /// Expansiones precomputadas de la plantilla --typos-insert.
    pub insert_expansions: Vec<String>,
    /// Expansiones precomputadas de la plantilla --typos-replace.
    pub replace_expansions: Vec<String>,
    /// Tabla acumulada del archivo --typos-map, ya filtrada de identidades
    /// y duplicados.
    pub map_table: HashMap<char, Vec<char>>,
}

impl TypoSettings {
    /// Cierto si alguna clase de typo está habilitada con presupuesto.
    pub fn any_enabled(&self) -> bool {
        self.max_typos > 0
            && (self.capslock
                || self.swap
                || self.repeat
                || self.delete
                || self.case_flip
                || self.close_case_flip
                || !self.insert_expansions.is_empty()
                || !self.replace_expansions.is_empty()
                || !self.map_table.is_empty())
    }

    /// Expande una plantilla de typos (insert/replace); las contracciones
    /// están prohibidas en este contexto.
    pub fn expand_typo_template(
        template_text: &str,
        context: &WildcardContext,
    ) -> Result<Vec<String>, ParseFault> {
        let template = WildcardTemplate::parse(template_text, context, ContractPolicy::Forbidden)
            .map_err(|fault| ParseFault::TypoTemplate { fault })?;
        Ok(template.expansions().collect())
    }

    /// Parsea el archivo de mapa de typos.
    ///
    /// Cada línea aporta '<orígenes><separador><reemplazos>'; múltiples
    /// líneas para un mismo carácter acumulan reemplazos en orden de
    /// archivo. Las identidades y duplicados se descartan al acumular.
    pub fn parse_map_file(
        raw_map: &str,
        delimiter: Option<&str>,
    ) -> Result<HashMap<char, Vec<char>>, ParseFault> {
        let mut table: HashMap<char, Vec<char>> = HashMap::new();

        for (line_index, line) in raw_map.lines().enumerate() {
            let line_number = line_index + 1;
            let fields: Vec<String> = match delimiter {
                None => line.split_whitespace().map(str::to_owned).collect(),
                Some(separator) => {
                    if line.is_empty() {
                        Vec::new()
                    } else {
                        line.split(separator).map(str::to_owned).collect()
                    }
                }
            };

            if fields.is_empty() {
                continue;
            }
            if fields.len() != 2 {
                return Err(ParseFault::BadMap {
                    line: line_number,
                    detail: format!("expected 2 fields, found {}", fields.len()),
                });
            }

            for source_character in fields[0].chars() {
                let replacements = table.entry(source_character).or_default();
                for replacement in fields[1].chars() {
                    if replacement != source_character && !replacements.contains(&replacement) {
                        replacements.push(replacement);
                    }
                }
            }
        }

        Ok(table)
    }
}

/// Mutador perezoso: envuelve un stream de bases y emite cada base con
/// todas sus mutaciones dentro del presupuesto.
pub struct TypoMutator<'a, I: Iterator<Item = String>> {
    base_stream: I,
    settings: &'a TypoSettings,
    active: Option<BaseExpansion<'a>>,
}

impl<'a, I: Iterator<Item = String>> TypoMutator<'a, I> {
    pub fn new(base_stream: I, settings: &'a TypoSettings) -> Self {
        Self {
            base_stream,
            settings,
            active: None,
        }
    }
}

impl<I: Iterator<Item = String>> Iterator for TypoMutator<'_, I> {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(expansion) = self.active.as_mut() {
                if let Some(candidate) = expansion.next() {
                    return Some(candidate);
                }
                self.active = None;
            }
            let base = self.base_stream.next()?;
            self.active = Some(BaseExpansion::new(base, self.settings));
        }
    }
}

// =================================================================
// ETAPA 0: CAPSLOCK
// =================================================================

/// Expansión completa de una base: capslock x swap x simples.
struct BaseExpansion<'a> {
    settings: &'a TypoSettings,
    capslock_variants: Vec<(String, usize)>,
    capslock_index: usize,
    swap_stage: Option<SwapStage>,
    simple_stage: Option<SimpleStage<'a>>,
}

impl<'a> BaseExpansion<'a> {
    fn new(base: String, settings: &'a TypoSettings) -> Self {
        let mut capslock_variants = vec![(base.clone(), 0usize)];
        if settings.capslock && settings.max_typos >= 1 {
            let flipped = swapcase_whole(&base);
            if flipped != base {
                capslock_variants.push((flipped, 1));
            }
        }
        Self {
            settings,
            capslock_variants,
            capslock_index: 0,
            swap_stage: None,
            simple_stage: None,
        }
    }
}

impl Iterator for BaseExpansion<'_> {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(simple) = self.simple_stage.as_mut() {
                if let Some((candidate, typos_used)) = simple.next() {
                    if typos_used >= self.settings.min_typos {
                        return Some(candidate);
                    }
                    continue;
                }
                self.simple_stage = None;
            }

            if let Some(swap) = self.swap_stage.as_mut() {
                if let Some((variant, typos_used)) = swap.next() {
                    self.simple_stage =
                        Some(SimpleStage::new(variant, typos_used, self.settings));
                    continue;
                }
                self.swap_stage = None;
            }

            if self.capslock_index >= self.capslock_variants.len() {
                return None;
            }
            let (variant, typos_used) = self.capslock_variants[self.capslock_index].clone();
            self.capslock_index += 1;
            self.swap_stage = Some(SwapStage::new(variant, typos_used, self.settings));
        }
    }
}

fn swapcase_whole(text: &str) -> String {
    text.chars()
        .map(|c| {
            if c.is_ascii_lowercase() {
                c.to_ascii_uppercase()
            } else if c.is_ascii_uppercase() {
                c.to_ascii_lowercase()
            } else {
                c
            }
        })
        .collect()
}

// =================================================================
// ETAPA 1: SWAPS ADYACENTES
// =================================================================

/// Enumera la identidad y luego toda combinación de swaps adyacentes
/// disjuntos, con k ascendente.
struct SwapStage {
    input: String,
    input_characters: Vec<char>,
    typos_used: usize,
    budget: usize,
    eligible_positions: Vec<usize>,
    identity_emitted: bool,
    current_k: usize,
    combination: Vec<usize>,
    combination_primed: bool,
}

impl SwapStage {
    fn new(input: String, typos_used: usize, settings: &TypoSettings) -> Self {
        let input_characters: Vec<char> = input.chars().collect();
        let budget = settings.max_typos.saturating_sub(typos_used);
        let eligible_positions: Vec<usize> = if settings.swap && budget > 0 {
            (0..input_characters.len().saturating_sub(1))
                .filter(|&i| input_characters[i] != input_characters[i + 1])
                .collect()
        } else {
            Vec::new()
        };
        Self {
            input,
            input_characters,
            typos_used,
            budget,
            eligible_positions,
            identity_emitted: false,
            current_k: 1,
            combination: Vec::new(),
            combination_primed: false,
        }
    }

    fn apply_swaps(&self, chosen: &[usize]) -> String {
        let mut characters = self.input_characters.clone();
        for &pool_index in chosen {
            let position = self.eligible_positions[pool_index];
            characters.swap(position, position + 1);
        }
        characters.into_iter().collect()
    }
}

impl Iterator for SwapStage {
    type Item = (String, usize);

    fn next(&mut self) -> Option<Self::Item> {
        if !self.identity_emitted {
            self.identity_emitted = true;
            return Some((self.input.clone(), self.typos_used));
        }

        loop {
            if self.current_k > self.budget || self.current_k > self.eligible_positions.len() {
                return None;
            }

            if !self.combination_primed {
                self.combination = (0..self.current_k).collect();
                self.combination_primed = true;
            } else if !advance_combination(&mut self.combination, self.eligible_positions.len()) {
                self.current_k += 1;
                self.combination_primed = false;
                continue;
            }

            // Dos swaps sobre posiciones consecutivas comparten un índice.
            let overlapping = self.combination.windows(2).any(|pair| {
                self.eligible_positions[pair[1]] - self.eligible_positions[pair[0]] < 2
            });
            if overlapping {
                continue;
            }

            let swapped = self.apply_swaps(&self.combination);
            return Some((swapped, self.typos_used + self.current_k));
        }
    }
}

// =================================================================
// ETAPA 2: TYPOS SIMPLES POR POSICIÓN
// =================================================================

/// Elección aplicable a una posición concreta del string de entrada.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SimpleChoice {
    Repeat,
    Delete,
    CaseFlip,
    CloseCaseFlip,
    Insert(usize),
    Replace(usize),
    MapTo(char),
}

/// Enumera la identidad y luego todo producto de typos simples sobre
/// posiciones disjuntas, con k ascendente.
struct SimpleStage<'a> {
    settings: &'a TypoSettings,
    input: String,
    input_characters: Vec<char>,
    typos_used: usize,
    /// (posición, elecciones) solo para posiciones con elecciones.
    position_choices: Vec<(usize, Vec<SimpleChoice>)>,
    identity_emitted: bool,
    current_k: usize,
    combination: Vec<usize>,
    combination_primed: bool,
    product_digits: Vec<usize>,
    product_primed: bool,
}

impl<'a> SimpleStage<'a> {
    fn new(input: String, typos_used: usize, settings: &'a TypoSettings) -> Self {
        let input_characters: Vec<char> = input.chars().collect();
        let budget = settings.max_typos.saturating_sub(typos_used);
        let position_choices = if budget > 0 {
            build_position_choices(&input_characters, settings)
        } else {
            Vec::new()
        };
        Self {
            settings,
            input,
            input_characters,
            typos_used,
            position_choices,
            identity_emitted: false,
            current_k: 1,
            combination: Vec::new(),
            combination_primed: false,
            product_digits: Vec::new(),
            product_primed: false,
        }
    }

    fn budget(&self) -> usize {
        self.settings.max_typos.saturating_sub(self.typos_used)
    }

    /// Aplica las elecciones actuales de derecha a izquierda.
    fn apply_current(&self) -> String {
        let mut characters = self.input_characters.clone();
        for slot in (0..self.combination.len()).rev() {
            let (position, choices) = &self.position_choices[self.combination[slot]];
            let choice = choices[self.product_digits[slot]];
            apply_choice(&mut characters, *position, choice, self.settings);
        }
        characters.into_iter().collect()
    }

    /// Avanza el producto de elecciones; la posición más a la izquierda
    /// gira más lento.
    fn advance_product(&mut self) -> bool {
        for slot in (0..self.product_digits.len()).rev() {
            let (_, choices) = &self.position_choices[self.combination[slot]];
            if self.product_digits[slot] + 1 < choices.len() {
                self.product_digits[slot] += 1;
                for later in self.product_digits[slot + 1..].iter_mut() {
                    *later = 0;
                }
                return true;
            }
        }
        false
    }
}

impl Iterator for SimpleStage<'_> {
    type Item = (String, usize);

    fn next(&mut self) -> Option<Self::Item> {
        if !self.identity_emitted {
            self.identity_emitted = true;
            return Some((self.input.clone(), self.typos_used));
        }

        loop {
            if self.current_k > self.budget() || self.current_k > self.position_choices.len() {
                return None;
            }

            if !self.combination_primed {
                self.combination = (0..self.current_k).collect();
                self.combination_primed = true;
                self.product_primed = false;
            }

            if !self.product_primed {
                self.product_digits = vec![0; self.current_k];
                self.product_primed = true;
            } else if !self.advance_product() {
                if !advance_combination(&mut self.combination, self.position_choices.len()) {
                    self.current_k += 1;
                    self.combination_primed = false;
                    continue;
                }
                self.product_digits = vec![0; self.current_k];
            }

            let mutated = self.apply_current();
            return Some((mutated, self.typos_used + self.current_k));
        }
    }
}

/// Construye la lista de elecciones por posición, en el orden canónico de
/// clases: repeat, delete, case, closecase, insert, replace, map.
fn build_position_choices(
    characters: &[char],
    settings: &TypoSettings,
) -> Vec<(usize, Vec<SimpleChoice>)> {
    let length = characters.len();
    let mut all_choices = Vec::new();

    for (position, &character) in characters.iter().enumerate() {
        let mut choices: Vec<SimpleChoice> = Vec::new();

        if settings.repeat {
            choices.push(SimpleChoice::Repeat);
        }
        if settings.delete {
            choices.push(SimpleChoice::Delete);
        }
        if settings.case_flip && character.is_ascii_alphabetic() {
            choices.push(SimpleChoice::CaseFlip);
        }
        if settings.close_case_flip
            && character.is_ascii_alphabetic()
            && close_case_qualifies(characters, position, length)
        {
            choices.push(SimpleChoice::CloseCaseFlip);
        }
        for insert_index in 0..settings.insert_expansions.len() {
            choices.push(SimpleChoice::Insert(insert_index));
        }
        for replace_index in 0..settings.replace_expansions.len() {
            choices.push(SimpleChoice::Replace(replace_index));
        }
        if let Some(replacements) = settings.map_table.get(&character) {
            for &replacement in replacements {
                choices.push(SimpleChoice::MapTo(replacement));
            }
        }

        if !choices.is_empty() {
            all_choices.push((position, choices));
        }
    }

    all_choices
}

/// Heurística closecase: la letra califica en los bordes del string o
/// junto a una letra de caja opuesta.
fn close_case_qualifies(characters: &[char], position: usize, length: usize) -> bool {
    if position == 0 || position + 1 == length {
        return true;
    }
    let current_is_upper = characters[position].is_ascii_uppercase();
    let opposite_neighbor = |neighbor: char| {
        neighbor.is_ascii_alphabetic() && neighbor.is_ascii_uppercase() != current_is_upper
    };
    opposite_neighbor(characters[position - 1]) || opposite_neighbor(characters[position + 1])
}

fn apply_choice(
    characters: &mut Vec<char>,
    position: usize,
    choice: SimpleChoice,
    settings: &TypoSettings,
) {
    match choice {
        SimpleChoice::Repeat => {
            let duplicated = characters[position];
            characters.insert(position, duplicated);
        }
        SimpleChoice::Delete => {
            characters.remove(position);
        }
        SimpleChoice::CaseFlip | SimpleChoice::CloseCaseFlip => {
            let current = characters[position];
            characters[position] = if current.is_ascii_lowercase() {
                current.to_ascii_uppercase()
            } else {
                current.to_ascii_lowercase()
            };
        }
        SimpleChoice::Insert(expansion_index) => {
            let expansion = &settings.insert_expansions[expansion_index];
            for (offset, inserted) in expansion.chars().enumerate() {
                characters.insert(position + 1 + offset, inserted);
            }
        }
        SimpleChoice::Replace(expansion_index) => {
            let expansion = &settings.replace_expansions[expansion_index];
            characters.remove(position);
            for (offset, inserted) in expansion.chars().enumerate() {
                characters.insert(position + offset, inserted);
            }
        }
        SimpleChoice::MapTo(replacement) => {
            characters[position] = replacement;
        }
    }
}

/// Avance lexicográfico estándar de una k-combinación sobre un pool.
fn advance_combination(combination: &mut [usize], pool_size: usize) -> bool {
    let k = combination.len();
    if k == 0 {
        return false;
    }
    let mut slot = k;
    while slot > 0 {
        slot -= 1;
        if combination[slot] < pool_size - k + slot {
            combination[slot] += 1;
            for later in slot + 1..k {
                combination[later] = combination[later - 1] + 1;
            }
            return true;
        }
    }
    false
}
