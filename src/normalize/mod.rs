//! Text normalization for obfuscation-resistant matching
//!
//! Produces a canonical, deobfuscated form of a chat message so the pattern
//! library can match contact information that was spaced out, spelled out, or
//! padded with invisible characters. Every normalized byte keeps a span back
//! into the original text, which lets the masker redact obfuscated matches in
//! the text the user actually typed.
//!
//! Normalization is pure and never fails; empty input yields empty output.

use std::ops::Range;
use unicode_normalization::UnicodeNormalization;

/// Characters that render as nothing and are stripped before matching
const ZERO_WIDTH_CHARS: &[char] = &[
    '\u{200b}', // zero-width space
    '\u{200c}', // zero-width non-joiner
    '\u{200d}', // zero-width joiner
    '\u{200e}', // left-to-right mark
    '\u{200f}', // right-to-left mark
    '\u{2060}', // word joiner
    '\u{feff}', // zero-width no-break space
];

/// Spelled-out digits rewritten to numeric form
const DIGIT_WORDS: &[(&str, char)] = &[
    ("zero", '0'),
    ("one", '1'),
    ("two", '2'),
    ("three", '3'),
    ("four", '4'),
    ("five", '5'),
    ("six", '6'),
    ("seven", '7'),
    ("eight", '8'),
    ("nine", '9'),
];

/// Final labels accepted when deciding a worded "at"/"dot" sequence is
/// shaped like an email
const KNOWN_TLDS: &[&str] = &[
    "com", "net", "org", "in", "edu", "gov", "co", "io", "me", "us", "info", "biz", "live", "pro",
];

/// Digit runs with at least this many digits have their separators collapsed
const MIN_RUN_DIGITS: usize = 5;

/// A normalized character and the byte range of the original it came from
#[derive(Debug, Clone, Copy)]
struct Piece {
    ch: char,
    start: u32,
    end: u32,
}

/// Canonical form of an input text plus a per-byte map into the original
#[derive(Debug, Clone)]
pub struct NormalizedText {
    text: String,
    spans: Vec<(u32, u32)>,
}

impl NormalizedText {
    /// The normalized string
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Number of characters in the normalized text
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    /// Map a byte range of the normalized text back to a byte range of the
    /// original text. Returns `None` for empty or out-of-bounds ranges.
    pub fn map_span(&self, span: Range<usize>) -> Option<Range<usize>> {
        if span.start >= span.end || span.end > self.spans.len() {
            return None;
        }
        let start = self.spans[span.start].0 as usize;
        let end = self.spans[span.end - 1].1 as usize;
        Some(start..end)
    }
}

/// Normalize a message into its canonical, deobfuscated form
pub fn normalize(original: &str) -> NormalizedText {
    let mut pieces = fold_chars(original);
    rewrite_digit_words(&mut pieces);
    rewrite_email_words(&mut pieces);
    collapse_digit_separators(&mut pieces);
    collapse_repeated_punct(&mut pieces);

    let mut text = String::with_capacity(pieces.len());
    let mut spans = Vec::with_capacity(pieces.len());
    for p in &pieces {
        text.push(p.ch);
        for _ in 0..p.ch.len_utf8() {
            spans.push((p.start, p.end));
        }
    }
    NormalizedText { text, spans }
}

/// Strip invisible characters, NFKC-fold, and lowercase
fn fold_chars(original: &str) -> Vec<Piece> {
    let mut pieces = Vec::with_capacity(original.len());
    for (idx, ch) in original.char_indices() {
        let start = idx as u32;
        let end = (idx + ch.len_utf8()) as u32;

        if matches!(ch, '\n' | '\r' | '\t') {
            pieces.push(Piece { ch: ' ', start, end });
            continue;
        }
        if ch.is_control() || ZERO_WIDTH_CHARS.contains(&ch) {
            continue;
        }
        for folded in std::iter::once(ch).nfkc() {
            if folded.is_control() {
                continue;
            }
            for lower in folded.to_lowercase() {
                pieces.push(Piece { ch: lower, start, end });
            }
        }
    }
    pieces
}

/// Rewrite spelled-out digits ("nine" -> '9'); "oh" becomes '0' only when it
/// sits between characters that already normalized to digits
fn rewrite_digit_words(pieces: &mut Vec<Piece>) {
    let mut out: Vec<Piece> = Vec::with_capacity(pieces.len());
    let mut i = 0;
    while i < pieces.len() {
        if !pieces[i].ch.is_ascii_alphabetic() {
            out.push(pieces[i]);
            i += 1;
            continue;
        }
        let mut j = i;
        while j < pieces.len() && pieces[j].ch.is_ascii_alphabetic() {
            j += 1;
        }
        let word: String = pieces[i..j].iter().map(|p| p.ch).collect();
        match DIGIT_WORDS.iter().find(|(w, _)| *w == word) {
            Some(&(_, digit)) => out.push(Piece {
                ch: digit,
                start: pieces[i].start,
                end: pieces[j - 1].end,
            }),
            None => out.extend_from_slice(&pieces[i..j]),
        }
        i = j;
    }

    // Second scan for "oh": only a digit stand-in when flanked by digits
    let mut result: Vec<Piece> = Vec::with_capacity(out.len());
    let mut i = 0;
    while i < out.len() {
        let is_oh = out[i].ch == 'o'
            && i + 1 < out.len()
            && out[i + 1].ch == 'h'
            && (i == 0 || !out[i - 1].ch.is_ascii_alphanumeric())
            && (i + 2 >= out.len() || !out[i + 2].ch.is_ascii_alphanumeric());
        if is_oh {
            let prev_digit = result
                .iter()
                .rev()
                .find(|p| p.ch != ' ')
                .is_some_and(|p| p.ch.is_ascii_digit());
            let next_digit = out[i + 2..]
                .iter()
                .find(|p| p.ch != ' ')
                .is_some_and(|p| p.ch.is_ascii_digit());
            if prev_digit && next_digit {
                result.push(Piece {
                    ch: '0',
                    start: out[i].start,
                    end: out[i + 1].end,
                });
                i += 2;
                continue;
            }
        }
        result.push(out[i]);
        i += 1;
    }
    *pieces = result;
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum TokKind {
    Word,
    Sym(char),
}

/// A token over the piece buffer: a run of alphanumerics or a single symbol
#[derive(Debug, Clone, Copy)]
struct Tok {
    kind: TokKind,
    a: usize,
    b: usize,
}

fn tokenize(pieces: &[Piece]) -> Vec<Tok> {
    let mut toks = Vec::new();
    let mut i = 0;
    while i < pieces.len() {
        if pieces[i].ch.is_ascii_alphanumeric() {
            let mut j = i;
            while j < pieces.len() && pieces[j].ch.is_ascii_alphanumeric() {
                j += 1;
            }
            toks.push(Tok {
                kind: TokKind::Word,
                a: i,
                b: j,
            });
            i = j;
        } else {
            toks.push(Tok {
                kind: TokKind::Sym(pieces[i].ch),
                a: i,
                b: i + 1,
            });
            i += 1;
        }
    }
    toks
}

fn word_text(pieces: &[Piece], tok: &Tok) -> String {
    pieces[tok.a..tok.b].iter().map(|p| p.ch).collect()
}

/// Skip spaces and brackets, the separators tolerated inside an email shape
fn next_component(toks: &[Tok], mut i: usize) -> Option<usize> {
    while i < toks.len() {
        match toks[i].kind {
            TokKind::Sym(' ') | TokKind::Sym('(') | TokKind::Sym(')') | TokKind::Sym('[')
            | TokKind::Sym(']') => i += 1,
            _ => return Some(i),
        }
    }
    None
}

/// Rewrite "at"/"dot" words into '@'/'.' when the surrounding tokens are
/// shaped like an email address (local, at, domain, dot, known tld)
fn rewrite_email_words(pieces: &mut Vec<Piece>) {
    let toks = tokenize(pieces);
    // piece index -> replacement char for the first piece of a word token;
    // remaining pieces of that token are dropped
    let mut rewrites: Vec<(usize, usize, char)> = Vec::new();

    let is_word = |t: &Tok| t.kind == TokKind::Word;
    let mut i = 0;
    while i < toks.len() {
        let local = &toks[i];
        if !is_word(local) || local.b - local.a < 2 {
            i += 1;
            continue;
        }
        let Some(at_i) = next_component(&toks, i + 1) else {
            break;
        };
        let at_word = is_word(&toks[at_i]) && word_text(pieces, &toks[at_i]) == "at";
        let at_sym = toks[at_i].kind == TokKind::Sym('@');
        if !at_word && !at_sym {
            i += 1;
            continue;
        }
        let Some(dom_i) = next_component(&toks, at_i + 1) else {
            break;
        };
        if !is_word(&toks[dom_i]) {
            i = at_i + 1;
            continue;
        }

        // Collect (dot, label) pairs after the domain
        let mut segments: Vec<(usize, usize)> = Vec::new();
        let mut tail = dom_i;
        while let Some(dot_i) = next_component(&toks, tail + 1) {
            let dot_word = is_word(&toks[dot_i]) && word_text(pieces, &toks[dot_i]) == "dot";
            let dot_sym = toks[dot_i].kind == TokKind::Sym('.');
            if !dot_word && !dot_sym {
                break;
            }
            let Some(lab_i) = next_component(&toks, dot_i + 1) else {
                break;
            };
            if !is_word(&toks[lab_i]) {
                break;
            }
            segments.push((dot_i, lab_i));
            tail = lab_i;
        }

        let shaped = segments.last().is_some_and(|&(_, lab_i)| {
            KNOWN_TLDS.contains(&word_text(pieces, &toks[lab_i]).as_str())
        });
        let any_worded = at_word
            || segments
                .iter()
                .any(|&(dot_i, _)| matches!(toks[dot_i].kind, TokKind::Word));
        if shaped && any_worded {
            if at_word {
                rewrites.push((toks[at_i].a, toks[at_i].b, '@'));
            }
            for &(dot_i, _) in &segments {
                if matches!(toks[dot_i].kind, TokKind::Word) {
                    rewrites.push((toks[dot_i].a, toks[dot_i].b, '.'));
                }
            }
            i = tail + 1;
        } else {
            i = at_i + 1;
        }
    }

    if rewrites.is_empty() {
        return;
    }
    let mut out: Vec<Piece> = Vec::with_capacity(pieces.len());
    let mut r = 0;
    let mut i = 0;
    while i < pieces.len() {
        if r < rewrites.len() && rewrites[r].0 == i {
            let (a, b, ch) = rewrites[r];
            out.push(Piece {
                ch,
                start: pieces[a].start,
                end: pieces[b - 1].end,
            });
            i = b;
            r += 1;
        } else {
            out.push(pieces[i]);
            i += 1;
        }
    }
    *pieces = out;
}

fn is_run_separator(c: char) -> bool {
    matches!(
        c,
        ' ' | '-' | '.' | '_' | '(' | ')' | '*' | '#' | '/' | ',' | '+' | ':' | ';' | '–' | '—'
            | '·' | '•'
    )
}

/// Collapse separators inside digit runs of MIN_RUN_DIGITS or more digits,
/// so "9 8 7-6.5 4 3 2 1 0" matches as one run
fn collapse_digit_separators(pieces: &mut Vec<Piece>) {
    let mut out: Vec<Piece> = Vec::with_capacity(pieces.len());
    let mut i = 0;
    while i < pieces.len() {
        if !pieces[i].ch.is_ascii_digit() {
            out.push(pieces[i]);
            i += 1;
            continue;
        }
        let run_start = i;
        let mut j = i;
        let mut last_digit_end = i;
        let mut digits = 0usize;
        let mut seps_since_digit = 0usize;
        while j < pieces.len() {
            let c = pieces[j].ch;
            if c.is_ascii_digit() {
                digits += 1;
                seps_since_digit = 0;
                j += 1;
                last_digit_end = j;
            } else if is_run_separator(c) && seps_since_digit < 3 {
                seps_since_digit += 1;
                j += 1;
            } else {
                break;
            }
        }
        if digits >= MIN_RUN_DIGITS {
            out.extend(
                pieces[run_start..last_digit_end]
                    .iter()
                    .filter(|p| p.ch.is_ascii_digit()),
            );
        } else {
            out.extend_from_slice(&pieces[run_start..last_digit_end]);
        }
        i = last_digit_end;
    }
    *pieces = out;
}

/// Collapse immediately-repeated punctuation ("!!!" -> "!")
fn collapse_repeated_punct(pieces: &mut Vec<Piece>) {
    let mut out: Vec<Piece> = Vec::with_capacity(pieces.len());
    for p in pieces.iter() {
        if let Some(last) = out.last_mut() {
            if last.ch == p.ch && p.ch.is_ascii_punctuation() {
                last.end = p.end;
                continue;
            }
        }
        out.push(*p);
    }
    *pieces = out;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        let n = normalize("");
        assert!(n.is_empty());
        assert_eq!(n.as_str(), "");
    }

    #[test]
    fn test_lowercase_and_passthrough() {
        let n = normalize("Hello World");
        assert_eq!(n.as_str(), "hello world");
    }

    #[test]
    fn test_zero_width_stripped() {
        let n = normalize("98\u{200b}76\u{200d}54321");
        assert_eq!(n.as_str(), "987654321");
    }

    #[test]
    fn test_spaced_digits_collapse() {
        let n = normalize("9 8 7 6 5 4 3 2 1 0");
        assert_eq!(n.as_str(), "9876543210");
    }

    #[test]
    fn test_dashed_digits_collapse() {
        let n = normalize("987-654-3210");
        assert_eq!(n.as_str(), "9876543210");
    }

    #[test]
    fn test_short_digit_groups_untouched() {
        let n = normalize("room 12-b at 3:45");
        assert_eq!(n.as_str(), "room 12-b at 3:45");
    }

    #[test]
    fn test_digit_words_rewritten() {
        let n = normalize("nine eight seven six five four three two one zero");
        assert_eq!(n.as_str(), "9876543210");
    }

    #[test]
    fn test_oh_between_digits() {
        let n = normalize("nine oh two four five five five");
        assert_eq!(n.as_str(), "9024555");
    }

    #[test]
    fn test_oh_in_prose_untouched() {
        let n = normalize("oh no, we are late");
        assert_eq!(n.as_str(), "oh no, we are late");
    }

    #[test]
    fn test_email_at_dot_rewritten() {
        let n = normalize("john at gmail dot com");
        assert_eq!(n.as_str(), "john @ gmail . com");
    }

    #[test]
    fn test_email_bracketed_at_dot() {
        let n = normalize("john [at] gmail [dot] com");
        assert_eq!(n.as_str(), "john [@] gmail [.] com");
    }

    #[test]
    fn test_at_in_prose_untouched() {
        let n = normalize("see you at noon");
        assert_eq!(n.as_str(), "see you at noon");
    }

    #[test]
    fn test_repeated_punct_collapsed() {
        let n = normalize("wow!!! really???");
        assert_eq!(n.as_str(), "wow! really?");
    }

    #[test]
    fn test_fullwidth_folds_to_ascii() {
        let n = normalize("ｊｏｈｎ＠ｇｍａｉｌ．ｃｏｍ");
        assert_eq!(n.as_str(), "john@gmail.com");
    }

    #[test]
    fn test_map_span_round_trip() {
        let original = "call 9 8 7 6 5 4 3 2 1 0 now";
        let n = normalize(original);
        let pos = n.as_str().find("9876543210").unwrap();
        let span = n.map_span(pos..pos + 10).unwrap();
        assert_eq!(&original[span], "9 8 7 6 5 4 3 2 1 0");
    }

    #[test]
    fn test_map_span_rejects_empty_and_oob() {
        let n = normalize("abc");
        assert!(n.map_span(1..1).is_none());
        assert!(n.map_span(0..99).is_none());
    }

    #[test]
    fn test_deterministic() {
        let a = normalize("Call me: 5 5 5 one two three FOUR");
        let b = normalize("Call me: 5 5 5 one two three FOUR");
        assert_eq!(a.as_str(), b.as_str());
    }
}
