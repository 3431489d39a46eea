use std::collections::{HashMap, HashSet};
use unicode_normalization::UnicodeNormalization;

/// Per-document slug generator.
///
/// The first heading with a given base slug keeps it; later ones get `-1`,
/// `-2`, ... in order of appearance. Candidates already handed out are
/// skipped so every slug in a document is unique.
#[derive(Debug, Default)]
pub struct Slugger {
    counts: HashMap<String, usize>,
    taken: HashSet<String>,
}

impl Slugger {
    /// Creates a new slugger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Generates the next slug for the given heading text.
    pub fn next_slug(&mut self, text: &str) -> String {
        let base = slugify(text);
        let count = self.counts.entry(base.clone()).or_insert(0);
        loop {
            let candidate = if *count == 0 {
                base.clone()
            } else {
                format!("{}-{}", base, count)
            };
            *count += 1;
            if self.taken.insert(candidate.clone()) {
                return candidate;
            }
        }
    }

    /// Forgets every slug handed out so far.
    pub fn reset(&mut self) {
        self.counts.clear();
        self.taken.clear();
    }
}

/// Returns true for the combining diacritic blocks.
///
/// Text is decomposed before slugging, so every accent of every script ends
/// up as one of these marks and is dropped.
fn is_diacritic(ch: char) -> bool {
    matches!(ch as u32, 0x0300..=0x036F | 0x1AB0..=0x1AFF | 0x1DC0..=0x1DFF | 0x20D0..=0x20FF)
}

/// Returns true if the character is a combining mark of a non-Latin script.
///
/// Vowel signs, viramas and nuktas belong to the word they modify, so they are
/// kept instead of being treated as separators.
fn is_script_mark(ch: char) -> bool {
    use std::ops::RangeInclusive;

    const RANGES: &[RangeInclusive<u32>] = &[
        // Devanagari
        0x0900..=0x0903,
        0x093A..=0x094F,
        0x0951..=0x0957,
        0x0962..=0x0963,
        // Bengali
        0x0980..=0x0983,
        0x09BC..=0x09CD,
        // Gurmukhi
        0x0A01..=0x0A03,
        0x0A3C..=0x0A4D,
        // Gujarati
        0x0A81..=0x0A83,
        0x0ABC..=0x0ACD,
        // Tamil
        0x0B01..=0x0B03,
        0x0BBE..=0x0BCD,
        // Thai
        0x0E31..=0x0E3A,
        0x0E47..=0x0E4E,
        // Arabic
        0x0610..=0x061A,
        0x064B..=0x065F,
        0x0670..=0x0670,
        // Hebrew
        0x0591..=0x05BD,
        0x05BF..=0x05BF,
        0x05C1..=0x05C2,
        0x05C4..=0x05C5,
        0x05C7..=0x05C7,
        // Hangul tone marks
        0x302A..=0x302F,
        // Kana voicing marks
        0x3099..=0x309A,
        0xFE20..=0xFE2F,
    ];

    let cp = ch as u32;
    RANGES.iter().any(|r| r.contains(&cp))
}

/// Folds Latin letters to their unaccented lowercase base.
///
/// Only letters without a canonical decomposition (`ø`, `ł`, `ß`, ...) still
/// reach this after decomposition.
fn fold_latin(ch: char) -> Option<&'static str> {
    let folded = match ch as u32 {
        0x00C0..=0x00C5 | 0x00E0..=0x00E5 | 0x0100..=0x0105 => "a",
        0x00C6 | 0x00E6 => "ae",
        0x00C7 | 0x00E7 | 0x0106..=0x010D => "c",
        0x00D0 | 0x00F0 | 0x010E..=0x0111 => "d",
        0x00C8..=0x00CB | 0x00E8..=0x00EB | 0x0112..=0x011B => "e",
        0x011C..=0x0123 => "g",
        0x0124..=0x0127 => "h",
        0x00CC..=0x00CF | 0x00EC..=0x00EF | 0x0128..=0x0131 => "i",
        0x0132..=0x0133 => "ij",
        0x0134..=0x0135 => "j",
        0x0136..=0x0138 => "k",
        0x0139..=0x0142 => "l",
        0x00D1 | 0x00F1 | 0x0143..=0x014B => "n",
        0x00D2..=0x00D6 | 0x00D8 | 0x00F2..=0x00F6 | 0x00F8 | 0x014C..=0x0151 => "o",
        0x0152..=0x0153 => "oe",
        0x0154..=0x0159 => "r",
        0x00DF => "ss",
        0x015A..=0x0161 | 0x017F => "s",
        0x0162..=0x0167 => "t",
        0x00DE | 0x00FE => "th",
        0x00D9..=0x00DC | 0x00F9..=0x00FC | 0x0168..=0x0173 => "u",
        0x0174..=0x0175 => "w",
        0x00DD | 0x00FD | 0x00FF | 0x0176..=0x0178 => "y",
        0x0179..=0x017E => "z",
        _ => return None,
    };
    Some(folded)
}

fn push_piece(slug: &mut String, separator: &mut bool, piece: impl Iterator<Item = char>) {
    if *separator && !slug.is_empty() {
        slug.push('-');
    }
    *separator = false;
    slug.extend(piece);
}

/// Slugify heading text without any collision handling.
///
/// 1. Decompose, drop diacritics, recompose what is left (kana voicing,
///    Hangul syllables), then lowercase
/// 2. Keep letters and digits of every script
/// 3. Collapse each run of anything else into a single hyphen
/// 4. Trim hyphens from both ends (`heading` if nothing is left)
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut separator = false;

    let stripped = text
        .nfd()
        .filter(|ch| !is_diacritic(*ch))
        .nfc();

    for ch in stripped {
        if let Some(base) = fold_latin(ch) {
            push_piece(&mut slug, &mut separator, base.chars());
        } else if ch.is_alphanumeric() || (is_script_mark(ch) && !slug.is_empty()) {
            push_piece(&mut slug, &mut separator, ch.to_lowercase());
        } else {
            separator = true;
        }
    }

    if slug.is_empty() {
        slug.push_str("heading");
    }

    slug
}
