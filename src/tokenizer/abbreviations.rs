//! Abbreviation sets and the compiled rules that hide their periods.
//!
//! The boundary detector treats a period followed by whitespace as a likely
//! sentence end. Before detection, every known abbreviation has its period
//! swapped for `_`, which keeps the character count intact so detected spans
//! can be mapped back onto the original text.

use std::collections::BTreeSet;

use regex::Regex;
use tracing::debug;

use crate::error::Result;

/// General English abbreviations that rarely end a sentence.
pub const BASE_ABBREVIATIONS: &[&str] = &[
    // Titles
    "mr", "mrs", "ms", "messrs", "mme", "prof", "rev", "hon", "jr", "sr",
    // Military and government ranks
    "gen", "gov", "sen", "rep", "lt", "col", "sgt", "capt", "cmdr", "adm", "maj", "pres",
    // Months
    "jan", "feb", "mar", "apr", "jun", "jul", "aug", "sep", "sept", "oct", "nov", "dec",
    // Business
    "co", "corp", "ltd", "llc", "bros", "dept", "assn", "univ",
    // Reference
    "e.g", "i.e", "cf", "vs", "al", "vol", "ch", "pp", "para", "art", "approx",
    // Places
    "mt", "ft", "rd", "ln", "pl", "sq",
    // States and countries
    "u.k", "calif", "conn", "fla", "ill", "mass", "mich", "minn", "penn", "tex", "va", "wash",
];

/// Abbreviations common in legal and business documents.
pub const DOMAIN_ABBREVIATIONS: &[&str] = &[
    "u.s", "u.s.a", "n.w", "p.o", "po", "st", "ave", "blvd", "ctr", "cir", "ct", "dr", "mtn",
    "apt", "hwy", "esq", "fig", "no", "sec", "n.a", "s.a.b", "non-u.s", "cap", "u.s.c", "ste",
];

/// Abbreviations whose period is hidden wherever it appears.
pub const STRONG_ABBREVIATIONS: &[&str] = &["inc"];

/// The abbreviations a tokenizer protects.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AbbreviationSet {
    /// Protected when followed by whitespace
    pub regular: BTreeSet<String>,
    /// Protected unconditionally
    pub strong: BTreeSet<String>,
}

impl AbbreviationSet {
    /// The built-in English set: base, domain and strong abbreviations.
    pub fn english() -> Self {
        Self {
            regular: BASE_ABBREVIATIONS
                .iter()
                .chain(DOMAIN_ABBREVIATIONS)
                .map(|s| s.to_string())
                .collect(),
            strong: STRONG_ABBREVIATIONS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Add regular abbreviations. Input is lowercased and trailing periods dropped.
    pub fn with_extra<I, S>(mut self, extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for abbr in extra {
            let abbr = abbr.as_ref().trim().trim_end_matches('.').to_lowercase();
            if !abbr.is_empty() {
                self.regular.insert(abbr);
            }
        }
        self
    }
}

/// Compiled abbreviation rules, built once and shared read-only.
#[derive(Debug, Clone)]
pub struct AbbreviationRules {
    /// `<abbr>.` preceded by line start or whitespace and followed by whitespace
    regular: Option<Regex>,
    /// `<abbr>.` anywhere
    strong: Option<Regex>,
}

impl AbbreviationRules {
    /// Compile the rules for an abbreviation set.
    pub fn compile(set: &AbbreviationSet) -> Result<Self> {
        let regular = match alternation(&set.regular) {
            Some(alt) => Some(Regex::new(&format!(r"(?i)(?:^|\s)(?:{alt})(?P<dot>\.)\s"))?),
            None => None,
        };
        let strong = match alternation(&set.strong) {
            Some(alt) => Some(Regex::new(&format!(r"(?i)(?:{alt})(?P<dot>\.)"))?),
            None => None,
        };

        debug!(
            regular = set.regular.len(),
            strong = set.strong.len(),
            "Compiled abbreviation rules"
        );

        Ok(Self { regular, strong })
    }

    /// Replace the period of every protected abbreviation with `_`.
    ///
    /// The output has exactly as many characters as the input.
    pub fn protect(&self, text: &str) -> String {
        let mut dots = Vec::new();

        if let Some(re) = &self.regular {
            // Resume at the whitespace after each period so that adjacent
            // abbreviations ("St. Apt. 4B") can share it.
            let mut pos = 0;
            while pos < text.len() {
                let Some(dot) = re.captures_at(text, pos).and_then(|c| c.name("dot")) else {
                    break;
                };
                dots.push(dot.start());
                pos = dot.end();
            }
        }

        if let Some(re) = &self.strong {
            dots.extend(
                re.captures_iter(text)
                    .filter_map(|c| c.name("dot"))
                    .map(|m| m.start()),
            );
        }

        if dots.is_empty() {
            return text.to_string();
        }

        dots.sort_unstable();
        dots.dedup();

        let mut out = String::with_capacity(text.len());
        let mut last = 0;
        for dot in dots {
            out.push_str(&text[last..dot]);
            out.push('_');
            last = dot + 1;
        }
        out.push_str(&text[last..]);
        out
    }
}

/// Build a regex alternation, longest abbreviations first.
fn alternation(abbreviations: &BTreeSet<String>) -> Option<String> {
    if abbreviations.is_empty() {
        return None;
    }

    let mut sorted: Vec<&String> = abbreviations.iter().collect();
    sorted.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

    Some(
        sorted
            .into_iter()
            .map(|a| regex::escape(a))
            .collect::<Vec<_>>()
            .join("|"),
    )
}
