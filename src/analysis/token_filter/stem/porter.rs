//! Porter stemming algorithm implementation.
//!
//! This is the original 1980 algorithm with the two revisions found in
//! Martin Porter's reference implementation (`bli → ble`, `logi → log`).
//! It is the stemmer lunr/elasticlunr indexes are built with, so stems match
//! theirs: `easy → easi`, `libraries → librari`, `caching → cach`.
//!
//! The algorithm applies five steps of suffix rewrite rules:
//! 1. Plurals, `-ed`/`-ing`, and terminal `y → i`
//! 2. Double suffixes: `-ational → -ate`, `-tional → -tion`, …
//! 3. `-icate → -ic`, `-ative → ""`, …
//! 4. Remove `-al`, `-ance`, `-ence`, … when the stem is long enough
//! 5. Remove a final `-e` and reduce `-ll`
//!
//! # Examples
//!
//! ```
//! use glaive::analysis::token_filter::stem::Stemmer;
//! use glaive::analysis::token_filter::stem::porter::PorterStemmer;
//!
//! let stemmer = PorterStemmer::new();
//!
//! assert_eq!(stemmer.stem("running"), "run");
//! assert_eq!(stemmer.stem("building"), "build");
//! assert_eq!(stemmer.stem("efficiently"), "effici");
//! ```

use crate::analysis::token_filter::stem::Stemmer;

const STEP2_SUFFIXES: &[(&str, &str)] = &[
    ("ational", "ate"),
    ("tional", "tion"),
    ("enci", "ence"),
    ("anci", "ance"),
    ("izer", "ize"),
    ("bli", "ble"),
    ("alli", "al"),
    ("entli", "ent"),
    ("eli", "e"),
    ("ousli", "ous"),
    ("ization", "ize"),
    ("ation", "ate"),
    ("ator", "ate"),
    ("alism", "al"),
    ("iveness", "ive"),
    ("fulness", "ful"),
    ("ousness", "ous"),
    ("aliti", "al"),
    ("iviti", "ive"),
    ("biliti", "ble"),
    ("logi", "log"),
];

const STEP3_SUFFIXES: &[(&str, &str)] = &[
    ("icate", "ic"),
    ("ative", ""),
    ("alize", "al"),
    ("iciti", "ic"),
    ("ical", "ic"),
    ("ful", ""),
    ("ness", ""),
];

const STEP4_SUFFIXES: &[&str] = &[
    "al", "ance", "ence", "er", "ic", "able", "ible", "ant", "ement", "ment", "ent", "ion", "ou",
    "ism", "ate", "iti", "ous", "ive", "ize",
];

/// Porter stemming algorithm implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct PorterStemmer;

impl PorterStemmer {
    /// Create a new Porter stemmer.
    pub fn new() -> Self {
        PorterStemmer
    }
}

impl Stemmer for PorterStemmer {
    fn stem(&self, word: &str) -> String {
        let chars: Vec<char> = word.chars().collect();
        if chars.len() <= 2 {
            return word.to_string();
        }

        let mut word = Word::new(chars);
        word.step1ab();
        word.step1c();
        word.step2();
        word.step3();
        word.step4();
        word.step5();
        word.chars.into_iter().collect()
    }

    fn name(&self) -> &'static str {
        "porter"
    }
}

/// A word being stemmed. `stem_len` marks the end of the stem left in front
/// of the suffix matched by the last successful [`Word::ends`] call.
struct Word {
    chars: Vec<char>,
    stem_len: usize,
}

impl Word {
    fn new(chars: Vec<char>) -> Self {
        let stem_len = chars.len();
        Word { chars, stem_len }
    }

    fn len(&self) -> usize {
        self.chars.len()
    }

    /// Whether the character at `i` is a consonant. `y` is a consonant at the
    /// start of a word and after a vowel.
    fn is_consonant(&self, i: usize) -> bool {
        match self.chars[i] {
            'a' | 'e' | 'i' | 'o' | 'u' => false,
            'y' => i == 0 || !self.is_consonant(i - 1),
            _ => true,
        }
    }

    /// Number of vowel-consonant sequences in the stem, the `m` of
    /// `[C](VC){m}[V]`.
    fn measure(&self) -> usize {
        let mut m = 0;
        let mut i = 0;

        while i < self.stem_len && self.is_consonant(i) {
            i += 1;
        }

        while i < self.stem_len {
            while i < self.stem_len && !self.is_consonant(i) {
                i += 1;
            }
            if i >= self.stem_len {
                break;
            }
            m += 1;
            while i < self.stem_len && self.is_consonant(i) {
                i += 1;
            }
        }

        m
    }

    fn vowel_in_stem(&self) -> bool {
        (0..self.stem_len).any(|i| !self.is_consonant(i))
    }

    fn double_consonant(&self, i: usize) -> bool {
        i >= 1 && self.chars[i] == self.chars[i - 1] && self.is_consonant(i)
    }

    /// consonant-vowel-consonant ending at `i`, where the last consonant is
    /// not `w`, `x` or `y`.
    fn cvc(&self, i: usize) -> bool {
        if i < 2 || !self.is_consonant(i) || self.is_consonant(i - 1) || !self.is_consonant(i - 2)
        {
            return false;
        }
        !matches!(self.chars[i], 'w' | 'x' | 'y')
    }

    /// Check the suffix; on success the stem ends where the suffix starts.
    fn ends(&mut self, suffix: &str) -> bool {
        let suffix_len = suffix.chars().count();
        if suffix_len > self.len() {
            return false;
        }
        let start = self.len() - suffix_len;
        if self.chars[start..].iter().copied().eq(suffix.chars()) {
            self.stem_len = start;
            true
        } else {
            false
        }
    }

    fn last(&self) -> Option<char> {
        self.chars.last().copied()
    }

    fn truncate(&mut self, len: usize) {
        self.chars.truncate(len);
        self.stem_len = self.stem_len.min(len);
    }

    /// Replace everything after the stem with `replacement`.
    fn set_to(&mut self, replacement: &str) {
        self.chars.truncate(self.stem_len);
        self.chars.extend(replacement.chars());
    }

    /// `set_to` when the stem measure is positive.
    fn replace_if_measured(&mut self, replacement: &str) {
        if self.measure() > 0 {
            self.set_to(replacement);
        }
    }

    fn step1ab(&mut self) {
        if self.last() == Some('s') {
            if self.ends("sses") {
                self.truncate(self.len() - 2);
            } else if self.ends("ies") {
                self.set_to("i");
            } else if self.len() >= 2 && self.chars[self.len() - 2] != 's' {
                self.truncate(self.len() - 1);
            }
        }

        if self.ends("eed") {
            if self.measure() > 0 {
                self.truncate(self.len() - 1);
            }
        } else if (self.ends("ed") || self.ends("ing")) && self.vowel_in_stem() {
            self.truncate(self.stem_len);
            self.stem_len = self.len();

            if self.ends("at") {
                self.set_to("ate");
            } else if self.ends("bl") {
                self.set_to("ble");
            } else if self.ends("iz") {
                self.set_to("ize");
            } else if self.double_consonant(self.len() - 1) {
                if !matches!(self.last(), Some('l' | 's' | 'z')) {
                    self.truncate(self.len() - 1);
                }
            } else if self.measure() == 1 && self.cvc(self.len() - 1) {
                self.set_to("e");
            }
        }
    }

    fn step1c(&mut self) {
        if self.ends("y") && self.vowel_in_stem() {
            let last = self.len() - 1;
            self.chars[last] = 'i';
        }
    }

    fn step2(&mut self) {
        for (suffix, replacement) in STEP2_SUFFIXES {
            if self.ends(suffix) {
                self.replace_if_measured(replacement);
                return;
            }
        }
    }

    fn step3(&mut self) {
        for (suffix, replacement) in STEP3_SUFFIXES {
            if self.ends(suffix) {
                self.replace_if_measured(replacement);
                return;
            }
        }
    }

    fn step4(&mut self) {
        for suffix in STEP4_SUFFIXES {
            if !self.ends(suffix) {
                continue;
            }
            // -ion only goes when preceded by s or t
            if *suffix == "ion"
                && !(self.stem_len > 0 && matches!(self.chars[self.stem_len - 1], 's' | 't'))
            {
                continue;
            }
            if self.measure() > 1 {
                self.truncate(self.stem_len);
            }
            return;
        }
    }

    fn step5(&mut self) {
        self.stem_len = self.len();
        if self.last() == Some('e') {
            let m = self.measure();
            if m > 1 || (m == 1 && !(self.len() >= 2 && self.cvc(self.len() - 2))) {
                self.truncate(self.len() - 1);
            }
        }

        self.stem_len = self.len();
        if self.last() == Some('l') && self.double_consonant(self.len() - 1) && self.measure() > 1
        {
            self.truncate(self.len() - 1);
        }
    }
}
