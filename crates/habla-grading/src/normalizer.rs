//! Answer normalization for free-text grading.
//!
//! Raw answers are folded into two views: a `folded` form that keeps accents so
//! the matcher can tell which positions carry diacritics, and a fully
//! deaccented form used for the base equality test.

use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

/// Characters removed from every answer before comparison.
pub const STRIPPED_PUNCTUATION: [char; 9] = ['.', ',', ';', '!', '¡', '¿', '?', '-', ' '];

/// Both views of a normalized answer.
///
/// Only lives for the duration of one comparison; nothing persists it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedForm {
    folded: String,
    deaccented: String,
}

impl NormalizedForm {
    pub fn new(raw: &str) -> Self {
        let folded = fold(raw);
        let deaccented = strip_accents(&folded);
        Self { folded, deaccented }
    }

    /// Lowercased and punctuation-stripped, accents retained.
    pub fn folded(&self) -> &str {
        &self.folded
    }

    /// `folded` with every diacritic removed.
    pub fn deaccented_folded(&self) -> &str {
        &self.deaccented
    }

    /// The positions of `folded`, one per base character.
    pub fn positions(&self) -> Vec<&str> {
        positions(&self.folded)
    }

    /// Whether each position of `folded` carries a diacritic.
    pub fn accent_marks(&self) -> Vec<bool> {
        self.positions().into_iter().map(has_diacritic).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.folded.is_empty()
    }
}

/// Normalize a raw answer.
///
/// Applies the following transformations in order:
/// 1. Lowercase (locale independent)
/// 2. Strip `. , ; ! ¡ ¿ ? -` and plain spaces, including canonical equivalents
/// 3. Recompose to NFC so `e` + U+0301 lines up with a precomposed `é`
/// 4. For the deaccented view: NFD decomposition, drop U+0300–U+036F, then
///    `ñ -> n` and `ü -> u`
///
/// `"¡Hola, Señor!"` folds to `"holaseñor"` and deaccents to `"holasenor"`.
pub fn normalize(raw: &str) -> NormalizedForm {
    NormalizedForm::new(raw)
}

/// Lowercase, strip punctuation, recompose.
///
/// Composing before the filter catches singletons that normalize into
/// stripped punctuation (U+037E becomes `;`). Composing again afterwards joins
/// marks that the removed punctuation used to separate from their base.
pub fn fold(raw: &str) -> String {
    raw.to_lowercase()
        .nfc()
        .filter(|c| !STRIPPED_PUNCTUATION.contains(c))
        .nfc()
        .collect()
}

/// Remove combining diacritical marks from `s`.
pub fn strip_accents(s: &str) -> String {
    s.nfd()
        .filter(|c| !is_diacritic(*c))
        .map(|c| match c {
            // NFD already splits these; kept for input that bypassed decomposition.
            'ñ' => 'n',
            'ü' => 'u',
            other => other,
        })
        .collect()
}

/// Split a folded string into positions: a base character followed by any
/// combining marks attached to it.
pub fn positions(folded: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start: Option<usize> = None;

    for (i, c) in folded.char_indices() {
        if is_combining_mark(c) && start.is_some() {
            continue;
        }
        if let Some(s) = start {
            out.push(&folded[s..i]);
        }
        start = Some(i);
    }
    if let Some(s) = start {
        out.push(&folded[s..]);
    }

    out
}

/// True if the position carries a diacritic that accent stripping removes.
pub fn has_diacritic(position: &str) -> bool {
    position.nfd().any(|c| is_diacritic(c) || matches!(c, 'ñ' | 'ü'))
}

const fn is_diacritic(c: char) -> bool {
    matches!(c, '\u{0300}'..='\u{036F}')
}
