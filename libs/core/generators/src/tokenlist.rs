// [libs/core/generators/src/tokenlist.rs]
/*!
 * =================================================================
 * APARATO: TOKEN SPECIFICATION PARSER (V2.0 - ANCHOR SEAL)
 * CLASIFICACIÓN: CORE PIPELINE (ESTRATO L1)
 * RESPONSABILIDAD: TRANSFORMACIÓN DEL TOKENLIST EN MODELO INMUTABLE
 *
 * VISION HIPER-HOLÍSTICA:
 * 1. LINE ORIENTED: Una línea es una sección; sus tokens son alternativas
 *    mutuamente excluyentes. El marcador '+' inicial la vuelve requerida.
 * 2. ANCHOR GRAMMAR: '^tok', 'tok$', '^N$tok', '^M,N$tok' y sus formas
 *    semiabiertas se resuelven aquí, con exclusión mutua verificada.
 * 3. EARLY VALIDATION: Cada token valida su sintaxis wildcard en el
 *    momento del parseo, con número de línea en el fallo.
 *
 * # Lifecycle:
 * El modelo se construye una vez por corrida y es inmutable después;
 * los candidatos derivados de él son transitorios.
 * =================================================================
 */

use crate::errors::ParseFault;
use crate::wildcards::{validate_wildcard_syntax, ContractPolicy, WildcardContext};

/// Marcador de sección requerida al inicio de línea.
const REQUIRED_SECTION_MARKER: &str = "+";

/// Restricción de posición de un token dentro del candidato ensamblado.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AnchorKind {
    /// Sin restricción.
    Free,
    /// Debe ocupar la primera posición.
    Begin,
    /// Debe ocupar la última posición.
    End,
    /// Debe ocupar exactamente la posición 1-based indicada.
    Positional(usize),
    /// Debe ocupar una posición interior dentro de [lo, hi].
    Middle { lo: usize, hi: Option<usize> },
}

/// Alternativa textual de una sección, con su ancla y su programa wildcard
/// retenido como texto ya validado.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token {
    pub anchor: AnchorKind,
    pub text: String,
}

impl Token {
    /// Cierto si el token puede ocupar la posición 1-based dada en una
    /// permutación del largo dado.
    ///
    /// Las anclas de rango son interiores: nunca la primera ni la última
    /// posición.
    pub fn position_is_legal(&self, position: usize, permutation_length: usize) -> bool {
        match &self.anchor {
            AnchorKind::Free => true,
            AnchorKind::Begin => position == 1,
            AnchorKind::End => position == permutation_length,
            AnchorKind::Positional(required) => position == *required,
            AnchorKind::Middle { lo, hi } => {
                if permutation_length < 2 {
                    return false;
                }
                let ceiling = hi
                    .unwrap_or(usize::MAX)
                    .min(permutation_length - 1);
                position >= *lo && position <= ceiling
            }
        }
    }
}

/// Sección parseada desde una línea del tokenlist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub required: bool,
    pub alternatives: Vec<Token>,
}

/// Modelo inmutable del tokenlist completo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenListModel {
    pub sections: Vec<Section>,
}

/// Parsea la especificación de tokens completa.
///
/// Con delimitador por defecto, los tokens se separan por corridas de
/// espacios y quedan recortados; con delimitador explícito la línea se
/// corta por la cadena literal, conservando espacios y tokens vacíos.
pub fn parse_token_specification(
    raw_specification: &str,
    delimiter: Option<&str>,
    context: &WildcardContext,
) -> Result<TokenListModel, ParseFault> {
    let mut sections: Vec<Section> = Vec::new();

    for (line_index, line) in raw_specification.lines().enumerate() {
        let line_number = line_index + 1;
        let mut fields = split_line(line, delimiter);

        if fields.is_empty() {
            continue;
        }

        let required = fields[0] == REQUIRED_SECTION_MARKER;
        if required {
            fields.remove(0);
        }
        if fields.is_empty() {
            continue;
        }

        let mut alternatives = Vec::with_capacity(fields.len());
        for field in fields {
            let token = parse_token(&field, line_number)?;
            validate_wildcard_syntax(&token.text, context, ContractPolicy::Allowed)
                .map_err(|fault| ParseFault::wildcard_at_line(line_number, fault))?;
            alternatives.push(token);
        }

        sections.push(Section {
            required,
            alternatives,
        });
    }

    Ok(TokenListModel { sections })
}

fn split_line(line: &str, delimiter: Option<&str>) -> Vec<String> {
    match delimiter {
        None => line.split_whitespace().map(str::to_owned).collect(),
        Some(separator) => {
            if line.is_empty() {
                return Vec::new();
            }
            line.split(separator).map(str::to_owned).collect()
        }
    }
}

/// Resuelve la gramática de anclas de un token individual.
fn parse_token(field: &str, line_number: usize) -> Result<Token, ParseFault> {
    if let Some(after_caret) = field.strip_prefix('^') {
        // Forma numérica '^N$...' o '^M,N$...' solo si el tramo previo al
        // primer '$' se compone de dígitos y a lo sumo una coma.
        if let Some(dollar_index) = after_caret.find('$') {
            let head = &after_caret[..dollar_index];
            let tail = &after_caret[dollar_index + 1..];

            if is_numeric_anchor_head(head) {
                if tail.ends_with('$') {
                    return Err(ParseFault::AnchorConflict { line: line_number });
                }
                let anchor = parse_numeric_anchor(head, line_number)?;
                return Ok(Token {
                    anchor,
                    text: tail.to_owned(),
                });
            }
        }

        // Ancla de inicio simple: el resto del token es el texto.
        if after_caret.ends_with('$') {
            return Err(ParseFault::AnchorConflict { line: line_number });
        }
        return Ok(Token {
            anchor: AnchorKind::Begin,
            text: after_caret.to_owned(),
        });
    }

    if let Some(body) = field.strip_suffix('$') {
        return Ok(Token {
            anchor: AnchorKind::End,
            text: body.to_owned(),
        });
    }

    Ok(Token {
        anchor: AnchorKind::Free,
        text: field.to_owned(),
    })
}

fn is_numeric_anchor_head(head: &str) -> bool {
    if head.is_empty() {
        return false;
    }
    let comma_count = head.chars().filter(|&c| c == ',').count();
    comma_count <= 1 && head.chars().all(|c| c.is_ascii_digit() || c == ',')
}

fn parse_numeric_anchor(head: &str, line_number: usize) -> Result<AnchorKind, ParseFault> {
    match head.split_once(',') {
        None => {
            let position: usize = head
                .parse()
                .map_err(|_| ParseFault::AnchorPosition { line: line_number })?;
            if position < 1 {
                return Err(ParseFault::AnchorPosition { line: line_number });
            }
            Ok(AnchorKind::Positional(position))
        }
        Some((low_text, high_text)) => {
            let lo = if low_text.is_empty() {
                2
            } else {
                low_text
                    .parse()
                    .map_err(|_| ParseFault::AnchorRangeBegin { line: line_number })?
            };
            let hi = if high_text.is_empty() {
                None
            } else {
                Some(
                    high_text
                        .parse::<usize>()
                        .map_err(|_| ParseFault::AnchorRangeOrder { line: line_number })?,
                )
            };
            if lo < 2 {
                return Err(ParseFault::AnchorRangeBegin { line: line_number });
            }
            if let Some(high) = hi {
                if lo > high {
                    return Err(ParseFault::AnchorRangeOrder { line: line_number });
                }
            }
            Ok(AnchorKind::Middle { lo, hi })
        }
    }
}
