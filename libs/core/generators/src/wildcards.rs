// [libs/core/generators/src/wildcards.rs]
/*!
 * =================================================================
 * APARATO: WILDCARD TEMPLATE ENGINE (V2.1 - ODOMETER SEAL)
 * CLASIFICACIÓN: CORE PIPELINE (ESTRATO L1)
 * RESPONSABILIDAD: PARSEO Y EXPANSIÓN PEREZOSA DE METASINTAXIS '%'
 *
 * VISION HIPER-HOLÍSTICA:
 * 1. CLOSED KINDS: El programa se modela como variantes etiquetadas
 *    sobre un conjunto cerrado (literal, clase, contracción). Nada de
 *    herencia abierta.
 * 2. ODOMETER DISCIPLINE: La expansión es el producto cartesiano con el
 *    nodo más a la derecha girando más rápido, largos ascendentes dentro
 *    de cada clase y el orden del charset intacto.
 * 3. CONTRACTION ACROSS BORDERS: Un wildcard de contracción borra
 *    caracteres del prefijo ya ensamblado o retiene caracteres del texto
 *    que aún no se produjo, cruzando fronteras de token si hace falta.
 *
 * # Mathematical Proof (Deterministic Expansion):
 * El conjunto de elecciones de cada nodo es finito y totalmente ordenado;
 * el odómetro global recorre su producto lexicográfico exactamente una
 * vez, por lo que la secuencia emitida es una función pura del template.
 * =================================================================
 */

use crate::errors::WildcardFault;

/// Contexto de expansión compartido por todos los templates de una sesión.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WildcardContext {
    /// Conjunto personalizado para '%c' / '%C', ya expandido y sin duplicados.
    pub custom_charset: Option<Vec<char>>,
}

impl WildcardContext {
    /// Construye el contexto parseando la especificación de --custom-wild.
    ///
    /// El conjunto admite rangos 'x-y' con la misma gramática que los
    /// conjuntos inline '%[...]'.
    pub fn with_custom(specification: &str) -> Result<Self, WildcardFault> {
        let characters: Vec<char> = specification.chars().collect();
        Ok(Self {
            custom_charset: Some(parse_character_set(&characters)?),
        })
    }
}

/// Política de admisión de wildcards de contracción.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContractPolicy {
    Allowed,
    Forbidden,
}

/// Dirección de borrado de un wildcard de contracción.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContractDirection {
    /// '-': reparte el borrado entre el prefijo y el texto siguiente.
    Both,
    /// '<': borra únicamente hacia la izquierda.
    Left,
    /// '>': borra únicamente hacia la derecha.
    Right,
}

/// Nodo de un programa wildcard (conjunto cerrado de variantes).
#[derive(Debug, Clone, PartialEq)]
pub enum TemplateNode {
    /// Texto literal, con '%%' ya colapsado a '%'.
    Literal(String),
    /// Clase generadora: emite entre `min` y `max` caracteres del charset.
    Class {
        charset: Vec<char>,
        min: usize,
        max: usize,
    },
    /// Contracción: borra entre `min` y `max` caracteres del contexto.
    Contract {
        direction: ContractDirection,
        min: usize,
        max: usize,
    },
}

/// Programa wildcard parseado e inmutable.
#[derive(Debug, Clone, PartialEq)]
pub struct WildcardTemplate {
    nodes: Vec<TemplateNode>,
}

impl WildcardTemplate {
    /// Parsea un texto con metasintaxis '%' contra el contexto dado.
    pub fn parse(
        text: &str,
        context: &WildcardContext,
        policy: ContractPolicy,
    ) -> Result<Self, WildcardFault> {
        let characters: Vec<char> = text.chars().collect();
        let mut nodes: Vec<TemplateNode> = Vec::new();
        let mut literal_buffer = String::new();
        let mut cursor = 0usize;

        while cursor < characters.len() {
            let current = characters[cursor];
            if current != '%' {
                literal_buffer.push(current);
                cursor += 1;
                continue;
            }

            // '%%' es un '%' literal.
            if characters.get(cursor + 1) == Some(&'%') {
                literal_buffer.push('%');
                cursor += 2;
                continue;
            }

            if !literal_buffer.is_empty() {
                nodes.push(TemplateNode::Literal(std::mem::take(&mut literal_buffer)));
            }

            cursor += 1;
            let node = parse_wildcard_body(&characters, &mut cursor, context, policy)?;
            nodes.push(node);
        }

        if !literal_buffer.is_empty() {
            nodes.push(TemplateNode::Literal(literal_buffer));
        }

        Ok(Self { nodes })
    }

    /// Cierto si el programa no contiene nodos generadores ni contracciones.
    pub fn is_pure_literal(&self) -> bool {
        self.nodes
            .iter()
            .all(|node| matches!(node, TemplateNode::Literal(_)))
    }

    pub fn nodes(&self) -> &[TemplateNode] {
        &self.nodes
    }

    /// Iterador perezoso sobre todas las expansiones concretas del programa.
    pub fn expansions(&self) -> TemplateExpansion {
        TemplateExpansion::new(self.nodes.clone())
    }

    /// Variante consumidora, para encadenar sin retener el template.
    pub fn into_expansions(self) -> TemplateExpansion {
        TemplateExpansion::new(self.nodes)
    }
}

/// Valida la sintaxis de un token sin retener el programa parseado.
pub fn validate_wildcard_syntax(
    text: &str,
    context: &WildcardContext,
    policy: ContractPolicy,
) -> Result<(), WildcardFault> {
    WildcardTemplate::parse(text, context, policy).map(|_| ())
}

// =================================================================
// PARSEO
// =================================================================

/// Parsea el cuerpo de un wildcard tras consumir el marcador '%'.
fn parse_wildcard_body(
    characters: &[char],
    cursor: &mut usize,
    context: &WildcardContext,
    policy: ContractPolicy,
) -> Result<TemplateNode, WildcardFault> {
    // 1. LARGO OPCIONAL: 'L' o 'L,H' (runs de dígitos planos).
    let mut min_length = 1usize;
    let mut max_length = 1usize;

    if characters.get(*cursor).is_some_and(|c| c.is_ascii_digit()) {
        let low = consume_digit_run(characters, cursor);
        if characters.get(*cursor) == Some(&',') {
            *cursor += 1;
            if !characters.get(*cursor).is_some_and(|c| c.is_ascii_digit()) {
                return Err(WildcardFault::Invalid);
            }
            let high = consume_digit_run(characters, cursor);
            min_length = low;
            max_length = high;
        } else {
            min_length = low;
            max_length = low;
        }
        if min_length > max_length {
            return Err(WildcardFault::LengthOrder {
                min: min_length,
                max: max_length,
            });
        }
    } else if characters.get(*cursor) == Some(&',') {
        // Forma '%,2d': el largo mínimo no puede omitirse.
        return Err(WildcardFault::Invalid);
    }

    // 2. BANDERA DE INSENSIBILIDAD DE CAJA
    let mut case_insensitive = false;
    if characters.get(*cursor) == Some(&'i') {
        case_insensitive = true;
        *cursor += 1;
    }

    // 3. SELECTOR DE CLASE
    let selector = *characters.get(*cursor).ok_or(WildcardFault::Invalid)?;
    *cursor += 1;

    let (base_charset, uppercase_selector): (Vec<char>, bool) = match selector {
        'd' => (('0'..='9').collect(), false),
        'a' => (('a'..='z').collect(), false),
        'A' => (('a'..='z').collect(), true),
        'c' | 'C' => {
            let custom = context
                .custom_charset
                .as_ref()
                .ok_or(WildcardFault::NoCustom)?;
            (custom.clone(), selector == 'C')
        }
        '[' => {
            let closing = characters[*cursor..]
                .iter()
                .position(|&c| c == ']')
                .ok_or(WildcardFault::Invalid)?;
            let body = &characters[*cursor..*cursor + closing];
            if body.is_empty() {
                return Err(WildcardFault::Invalid);
            }
            *cursor += closing + 1;
            (parse_character_set(body)?, false)
        }
        '-' | '<' | '>' => {
            if case_insensitive {
                return Err(WildcardFault::Invalid);
            }
            if policy == ContractPolicy::Forbidden {
                return Err(WildcardFault::ContractForbidden);
            }
            let direction = match selector {
                '-' => ContractDirection::Both,
                '<' => ContractDirection::Left,
                _ => ContractDirection::Right,
            };
            return Ok(TemplateNode::Contract {
                direction,
                min: min_length,
                max: max_length,
            });
        }
        _ => return Err(WildcardFault::Invalid),
    };

    let charset = materialize_charset(base_charset, uppercase_selector, case_insensitive);
    Ok(TemplateNode::Class {
        charset,
        min: min_length,
        max: max_length,
    })
}

fn consume_digit_run(characters: &[char], cursor: &mut usize) -> usize {
    let mut value = 0usize;
    while let Some(c) = characters.get(*cursor) {
        if let Some(digit) = c.to_digit(10) {
            value = value.saturating_mul(10).saturating_add(digit as usize);
            *cursor += 1;
        } else {
            break;
        }
    }
    value
}

/// Parsea el cuerpo de un conjunto '[...]' con rangos y deduplicación.
///
/// Un '-' que no forma rango (inicial, final o pegado al cierre de un
/// rango anterior) se conserva literal.
pub fn parse_character_set(body: &[char]) -> Result<Vec<char>, WildcardFault> {
    let mut raw: Vec<char> = Vec::new();
    let mut index = 0usize;

    while index < body.len() {
        if body.get(index + 1) == Some(&'-') && index + 2 < body.len() {
            let first = body[index];
            let last = body[index + 2];
            if first > last {
                return Err(WildcardFault::RangeOrder { first, last });
            }
            for c in first..=last {
                raw.push(c);
            }
            index += 3;
        } else {
            raw.push(body[index]);
            index += 1;
        }
    }

    Ok(dedup_keep_first(raw))
}

/// Resuelve el charset final según selector mayúsculo y bandera 'i'.
///
/// Con 'i', el selector minúsculo emite primero el conjunto base y luego
/// su swapcase; el mayúsculo invierte ese orden.
fn materialize_charset(base: Vec<char>, uppercase_selector: bool, insensitive: bool) -> Vec<char> {
    let swapped: Vec<char> = base.iter().map(|&c| swap_ascii_case(c)).collect();
    let combined: Vec<char> = if insensitive {
        if uppercase_selector {
            swapped.into_iter().chain(base).collect()
        } else {
            base.into_iter().chain(swapped).collect()
        }
    } else if uppercase_selector {
        base.iter().map(|c| c.to_ascii_uppercase()).collect()
    } else {
        base
    };
    dedup_keep_first(combined)
}

fn swap_ascii_case(c: char) -> char {
    if c.is_ascii_lowercase() {
        c.to_ascii_uppercase()
    } else if c.is_ascii_uppercase() {
        c.to_ascii_lowercase()
    } else {
        c
    }
}

fn dedup_keep_first(characters: Vec<char>) -> Vec<char> {
    let mut seen: Vec<char> = Vec::with_capacity(characters.len());
    for c in characters {
        if !seen.contains(&c) {
            seen.push(c);
        }
    }
    seen
}

// =================================================================
// EXPANSIÓN (ODÓMETRO)
// =================================================================

/// Cursor de elección por nodo.
#[derive(Debug, Clone)]
enum NodeCursor {
    Literal,
    Class { length: usize, digits: Vec<usize> },
    Contract { amount: usize, left: usize },
}

/// Iterador perezoso sobre las expansiones concretas de un template.
pub struct TemplateExpansion {
    nodes: Vec<TemplateNode>,
    cursors: Vec<NodeCursor>,
    primed: bool,
    exhausted: bool,
}

impl TemplateExpansion {
    fn new(nodes: Vec<TemplateNode>) -> Self {
        let cursors = nodes.iter().map(initial_cursor).collect();
        Self {
            nodes,
            cursors,
            primed: false,
            exhausted: false,
        }
    }

    /// Avanza el odómetro global; falso cuando el espacio quedó agotado.
    fn advance(&mut self) -> bool {
        for index in (0..self.cursors.len()).rev() {
            if advance_cursor(&mut self.cursors[index], &self.nodes[index]) {
                return true;
            }
        }
        false
    }

    /// Ensambla la elección actual; `None` si la combinación es infactible
    /// (presupuesto de contracción imposible de consumir).
    fn assemble(&self) -> Option<String> {
        let mut assembled = String::new();
        let mut withheld = 0usize;

        for (node, cursor) in self.nodes.iter().zip(self.cursors.iter()) {
            match (node, cursor) {
                (TemplateNode::Literal(text), NodeCursor::Literal) => {
                    append_with_withhold(&mut assembled, text.chars(), &mut withheld);
                }
                (TemplateNode::Class { charset, .. }, NodeCursor::Class { digits, .. }) => {
                    let produced = digits.iter().map(|&d| charset[d]);
                    append_with_withhold(&mut assembled, produced, &mut withheld);
                }
                (TemplateNode::Contract { .. }, NodeCursor::Contract { amount, left }) => {
                    for _ in 0..*left {
                        assembled.pop()?;
                    }
                    withheld += amount - left;
                }
                _ => unreachable!("cursor kind diverged from node kind"),
            }
        }

        if withheld > 0 {
            return None;
        }
        Some(assembled)
    }
}

impl Iterator for TemplateExpansion {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }
        loop {
            if self.primed {
                if !self.advance() {
                    self.exhausted = true;
                    return None;
                }
            } else {
                self.primed = true;
            }
            if let Some(candidate) = self.assemble() {
                return Some(candidate);
            }
        }
    }
}

fn initial_cursor(node: &TemplateNode) -> NodeCursor {
    match node {
        TemplateNode::Literal(_) => NodeCursor::Literal,
        TemplateNode::Class { min, .. } => NodeCursor::Class {
            length: *min,
            digits: vec![0; *min],
        },
        TemplateNode::Contract { direction, min, .. } => NodeCursor::Contract {
            amount: *min,
            left: match direction {
                ContractDirection::Both | ContractDirection::Left => *min,
                ContractDirection::Right => 0,
            },
        },
    }
}

/// Avanza el cursor de un nodo; falso cuando dio la vuelta completa.
fn advance_cursor(cursor: &mut NodeCursor, node: &TemplateNode) -> bool {
    match (cursor, node) {
        (NodeCursor::Literal, _) => false,
        (
            NodeCursor::Class { length, digits },
            TemplateNode::Class { charset, min, max },
        ) => {
            // Dígito más a la derecha primero, luego acarreo hacia la izquierda.
            for position in (0..*length).rev() {
                if digits[position] + 1 < charset.len() {
                    digits[position] += 1;
                    for later in digits[position + 1..].iter_mut() {
                        *later = 0;
                    }
                    return true;
                }
            }
            if *length < *max {
                *length += 1;
                *digits = vec![0; *length];
                return true;
            }
            *length = *min;
            *digits = vec![0; *min];
            false
        }
        (
            NodeCursor::Contract { amount, left },
            TemplateNode::Contract { direction, min, max },
        ) => {
            match direction {
                ContractDirection::Both => {
                    if *left > 0 {
                        *left -= 1;
                        return true;
                    }
                }
                ContractDirection::Left | ContractDirection::Right => {}
            }
            if *amount < *max {
                *amount += 1;
                *left = match direction {
                    ContractDirection::Both | ContractDirection::Left => *amount,
                    ContractDirection::Right => 0,
                };
                return true;
            }
            *amount = *min;
            *left = match direction {
                ContractDirection::Both | ContractDirection::Left => *min,
                ContractDirection::Right => 0,
            };
            false
        }
        _ => unreachable!("cursor kind diverged from node kind"),
    }
}

/// Anexa caracteres consumiendo primero la deuda de borrado hacia la derecha.
fn append_with_withhold(
    assembled: &mut String,
    produced: impl Iterator<Item = char>,
    withheld: &mut usize,
) {
    for character in produced {
        if *withheld > 0 {
            *withheld -= 1;
        } else {
            assembled.push(character);
        }
    }
}
