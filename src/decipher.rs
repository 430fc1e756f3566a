//! Recovery of menu text whose character codes were shifted by a broken PDF
//! font encoding.
//!
//! Some menus come out of `pdf-extract` with every letter moved one code point
//! forward ("qbtub" instead of "pasta"), sometimes with the first letter of a
//! word left intact. Each token is decided on its own: the unchanged token and
//! two shifted readings are scored and the best one is kept.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::{Captures, Regex};

/// Score given to a candidate that is a known menu term.
pub const DICTIONARY_MATCH_SCORE: i32 = 1000;

const ARTIFACT_PENALTY: i32 = 40;
const RARE_LETTER_PENALTY: i32 = 8;
const CONSONANT_RUN_PENALTY: i32 = 25;
const CONSONANT_RUN_LENGTH: usize = 4;
const VOWEL_REWARD: i32 = 3;

// Characters that show up when a letter is pushed just outside the alphabet.
const SHIFT_ARTIFACTS: &[char] = &['`', '@', '[', '\\', ']', '^', '_', '{', '|', '}', '~'];
const RARE_LETTERS: &[char] = &['j', 'k', 'w', 'x', 'y'];
const VOWELS: &[char] = &[
    'a', 'e', 'i', 'o', 'u', 'à', 'è', 'é', 'ì', 'í', 'ò', 'ó', 'ù', 'ú',
];

const MENU_TERMS: &[&str] = &[
    // sections
    "antipasti", "antipasto", "primi", "primo", "secondi", "secondo", "contorni", "contorno",
    "dolci", "dolce", "dessert", "pizze", "pizza", "bevande", "vini", "vino", "birre", "birra",
    "caffè", "caffetteria", "insalate", "insalata", "zuppe", "zuppa", "piatti", "piatto", "menu",
    "carne", "pesce", "verdure", "formaggi", "formaggio", "frutta", "gelato", "gelati", "bianco",
    "rosso", "rosato", "bollicine", "spumante", "champagne", "acqua", "coperto", "degustazione",
    // pasta and staples
    "pasta", "spaghetti", "linguine", "tagliatelle", "pappardelle", "fettuccine", "penne",
    "rigatoni", "gnocchi", "ravioli", "tortellini", "lasagne", "risotto", "riso", "pane", "olio",
    "aglio", "cipolla", "pomodoro", "pomodori", "basilico", "prezzemolo", "rosmarino", "salvia",
    "origano", "peperoncino", "pepe", "sale", "burro", "panna", "uova", "uovo",
    // cheese and cured meat
    "mozzarella", "burrata", "parmigiano", "pecorino", "gorgonzola", "ricotta", "stracciatella",
    "prosciutto", "crudo", "cotto", "salame", "speck", "guanciale", "pancetta", "salsiccia",
    // meat and fish
    "manzo", "vitello", "maiale", "agnello", "pollo", "tacchino", "anatra", "coniglio",
    "cinghiale", "tonno", "salmone", "baccalà", "merluzzo", "orata", "branzino", "spigola",
    "polpo", "calamari", "gamberi", "gamberetti", "scampi", "cozze", "vongole", "frutti", "mare",
    // vegetables and fruit
    "funghi", "porcini", "tartufo", "melanzane", "zucchine", "zucca", "carciofi", "spinaci",
    "rucola", "patate", "patatine", "piselli", "fagioli", "ceci", "lenticchie", "olive",
    "capperi", "limone", "arancia", "fragole",
    // sweets
    "cioccolato", "pistacchio", "nocciola", "mandorle", "miele", "zucchero", "crema", "tiramisù",
    "cannoli", "sorbetto", "torta", "crostata", "semifreddo",
    // preparations
    "fritto", "fritti", "frittura", "griglia", "grigliata", "arrosto", "brasato", "bollito",
    "marinato", "affumicato", "fresco", "fresca", "freschi", "misto", "mista", "carbonara",
    "amatriciana", "bolognese", "pesto", "ragù", "sugo", "margherita", "marinara", "diavola",
    "capricciosa", "quattro", "stagioni", "tartare", "carpaccio", "bruschetta", "bruschette",
    "tagliere", "fiorentina", "tagliata", "cotoletta", "milanese", "scaloppine", "saltimbocca",
    "parmigiana", "casa", "nostra",
    // origin labels
    "dop", "igp", "doc", "docg", "stg", "bio",
    // connectives
    "e", "di", "al", "alla", "con", "del", "della", "ai", "in",
];

static DICTIONARY: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| MENU_TERMS.iter().copied().collect());

static TOKEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\S+").expect("valid token regex"));

/// Deciphers every line of `text`, keeping line structure.
pub fn decipher_text(text: &str) -> String {
    text.lines().map(decipher_line).collect::<Vec<_>>().join("\n")
}

/// Deciphers each whitespace-delimited token of a line. Whitespace is kept verbatim.
pub fn decipher_line(line: &str) -> String {
    TOKEN
        .replace_all(line, |caps: &Captures| decipher_token(&caps[0]))
        .into_owned()
}

/// Picks the best reading of a single token.
///
/// Candidates are compared in the order unchanged, fully shifted, shifted after
/// the first letter; a later candidate only wins with a strictly higher score.
pub fn decipher_token(token: &str) -> String {
    let candidates = [
        token.to_string(),
        shift_all(token),
        shift_after_first_letter(token),
    ];

    let mut best = 0;
    let mut best_score = score_candidate(&candidates[0]);
    for (index, candidate) in candidates.iter().enumerate().skip(1) {
        let score = score_candidate(candidate);
        if score > best_score {
            best = index;
            best_score = score;
        }
    }

    let [unchanged, full, partial] = candidates;
    match best {
        1 => full,
        2 => partial,
        _ => unchanged,
    }
}

/// Scores how plausible `candidate` is as Italian menu text.
pub fn score_candidate(candidate: &str) -> i32 {
    if is_menu_term(candidate) {
        return DICTIONARY_MATCH_SCORE;
    }

    let lower = candidate.to_lowercase();
    let mut score = 0;
    let mut consonant_run = 0;

    for c in lower.chars() {
        if SHIFT_ARTIFACTS.contains(&c) {
            score -= ARTIFACT_PENALTY;
        }
        if RARE_LETTERS.contains(&c) {
            score -= RARE_LETTER_PENALTY;
        }

        if VOWELS.contains(&c) {
            score += VOWEL_REWARD;
            consonant_run = 0;
        } else if c.is_alphabetic() {
            consonant_run += 1;
            if consonant_run == CONSONANT_RUN_LENGTH {
                score -= CONSONANT_RUN_PENALTY;
            }
        } else {
            consonant_run = 0;
        }
    }

    score
}

/// Whether the token, ignoring case and surrounding punctuation, is a known term.
pub fn is_menu_term(token: &str) -> bool {
    let normalized = token
        .trim_matches(|c: char| !c.is_alphanumeric())
        .to_lowercase();
    !normalized.is_empty() && DICTIONARY.contains(normalized.as_str())
}

fn shift_back(c: char) -> char {
    match (c as u32).checked_sub(1).and_then(char::from_u32) {
        Some(shifted) => shifted,
        None => c,
    }
}

fn shift_all(token: &str) -> String {
    token.chars().map(shift_back).collect()
}

fn shift_after_first_letter(token: &str) -> String {
    let mut out = String::with_capacity(token.len());
    let mut seen_letter = false;
    for c in token.chars() {
        if seen_letter {
            out.push(shift_back(c));
        } else {
            out.push(c);
            seen_letter = c.is_alphabetic();
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shift_forward(text: &str) -> String {
        text.chars()
            .map(|c| char::from_u32(c as u32 + 1).unwrap())
            .collect()
    }

    #[test]
    fn recovers_uniformly_shifted_menu_terms() {
        let samples = [
            "Antipasti", "PRIMI", "secondi", "dolci", "pizza", "risotto", "tiramisù", "Salmone",
            "carbonara", "mozzarella", "gamberi", "funghi", "contorni", "bevande", "vongole",
        ];
        for word in samples {
            let shifted = shift_forward(word);
            assert_eq!(decipher_token(&shifted), word, "shifted form {shifted:?}");
        }
    }

    #[test]
    fn recovers_token_with_intact_first_letter() {
        // "Salmone" with only the tail encoded.
        assert_eq!(decipher_token("Sbmnpof"), "Salmone");
        assert_eq!(decipher_token("(Sbmnpof"), "(Salmone");
    }

    #[test]
    fn leaves_legible_words_alone() {
        for word in ["fagottini", "Pasta", "con", "12,50", "€", "-", "Gorgonzola,"] {
            assert_eq!(decipher_token(word), word);
        }
    }

    #[test]
    fn dictionary_match_ignores_case_and_punctuation() {
        assert!(is_menu_term("Pasta,"));
        assert!(is_menu_term("(RISOTTO)"));
        assert!(!is_menu_term("..."));
        assert_eq!(score_candidate("Pomodoro."), DICTIONARY_MATCH_SCORE);
    }

    #[test]
    fn scoring_penalizes_shift_noise() {
        assert!(score_candidate("fagottini") > 0);
        assert!(score_candidate("e`fnsshmh") < score_candidate("fagottini"));
        assert!(score_candidate("xkwj") < 0);
    }

    #[test]
    fn decipher_line_keeps_spacing() {
        let line = format!("{}  al {}   14", shift_forward("Risotto"), shift_forward("tartufo"));
        assert_eq!(decipher_line(&line), "Risotto  al tartufo   14");
    }

    #[test]
    fn decipher_text_keeps_lines() {
        let text = format!("{}\n\nPasta e fagioli 9", shift_forward("PRIMI"));
        assert_eq!(decipher_text(&text), "PRIMI\n\nPasta e fagioli 9");
    }

    #[test]
    fn null_character_is_never_shifted() {
        assert_eq!(shift_back('\0'), '\0');
        assert_eq!(shift_all("\0a"), "\0`");
    }

    #[test]
    fn characters_after_surrogate_gap_are_never_shifted() {
        // U+DFFF is a surrogate, so U+E000 has no valid predecessor.
        assert_eq!(shift_back('\u{E000}'), '\u{E000}');
        assert_eq!(shift_back('\u{E001}'), '\u{E000}');
        assert_eq!(shift_all("\u{E000}b"), "\u{E000}a");
    }

    #[test]
    fn origin_labels_stay_legible() {
        for label in ["IGP", "DOP", "DOC", "DOCG", "(IGP)"] {
            assert_eq!(decipher_token(label), label);
        }
    }
}
