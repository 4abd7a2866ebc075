//! Porter stemming algorithm implementation.
//!
//! The Porter stemmer applies a series of rewrite rules in five steps:
//! 1. Plurals and -ed/-ing suffixes
//! 2. -ational → -ate, -tional → -tion, etc.
//! 3. -icate → -ic, -ative → "", etc.
//! 4. Remove -al, -ance, -ence, etc.
//! 5. Remove final -e and -ll
//!
//! Only lower-case ASCII words are stemmed; anything else is returned
//! unchanged, so case-sensitive matching never sees a case change introduced
//! by the stemmer.
//!
//! # Examples
//!
//! ```
//! use xmlft::analysis::stemmer::Stemmer;
//! use xmlft::analysis::stemmer::porter::PorterStemmer;
//!
//! let stemmer = PorterStemmer::new();
//!
//! assert_eq!(stemmer.stem("running"), "run");
//! assert_eq!(stemmer.stem("caresses"), "caress");
//! ```

use crate::analysis::stemmer::Stemmer;

/// Porter stemming algorithm implementation.
#[derive(Debug, Clone, Default)]
pub struct PorterStemmer;

impl PorterStemmer {
    /// Create a new Porter stemmer.
    pub fn new() -> Self {
        PorterStemmer
    }

    /// Check if the byte at `pos` is a vowel ('y' after a consonant counts).
    fn is_vowel(word: &[u8], pos: usize) -> bool {
        match word[pos] {
            b'a' | b'e' | b'i' | b'o' | b'u' => true,
            b'y' => pos > 0 && !Self::is_vowel(word, pos - 1),
            _ => false,
        }
    }

    /// Number of vowel-consonant sequences in the word.
    fn measure(word: &[u8]) -> usize {
        let n = word.len();
        let mut m = 0;
        let mut i = 0;

        while i < n && !Self::is_vowel(word, i) {
            i += 1;
        }
        while i < n {
            while i < n && Self::is_vowel(word, i) {
                i += 1;
            }
            if i >= n {
                break;
            }
            m += 1;
            while i < n && !Self::is_vowel(word, i) {
                i += 1;
            }
        }

        m
    }

    fn contains_vowel(word: &[u8]) -> bool {
        (0..word.len()).any(|i| Self::is_vowel(word, i))
    }

    fn ends_with_double_consonant(word: &[u8]) -> bool {
        let n = word.len();
        n >= 2 && word[n - 1] == word[n - 2] && !Self::is_vowel(word, n - 1)
    }

    /// Consonant-vowel-consonant ending, where the last consonant is not w, x or y.
    fn ends_cvc(word: &[u8]) -> bool {
        let n = word.len();
        n >= 3
            && !Self::is_vowel(word, n - 3)
            && Self::is_vowel(word, n - 2)
            && !Self::is_vowel(word, n - 1)
            && !matches!(word[n - 1], b'w' | b'x' | b'y')
    }

    /// Replace `suffix` by `replacement` if the remaining stem has measure > `min_measure`.
    fn replace(word: &mut Vec<u8>, suffix: &[u8], replacement: &[u8], min_measure: usize) -> bool {
        if !word.ends_with(suffix) {
            return false;
        }
        let stem_len = word.len() - suffix.len();
        if Self::measure(&word[..stem_len]) > min_measure {
            word.truncate(stem_len);
            word.extend_from_slice(replacement);
        }
        true
    }

    fn step1a(word: &mut Vec<u8>) {
        if word.ends_with(b"sses") || word.ends_with(b"ies") {
            word.truncate(word.len() - 2);
        } else if word.ends_with(b"s") && !word.ends_with(b"ss") && word.len() > 1 {
            word.truncate(word.len() - 1);
        }
    }

    fn step1b(word: &mut Vec<u8>) {
        if word.ends_with(b"eed") {
            Self::replace(word, b"eed", b"ee", 0);
            return;
        }

        let suffix_len = if word.ends_with(b"ed") {
            2
        } else if word.ends_with(b"ing") {
            3
        } else {
            return;
        };
        let stem_len = word.len() - suffix_len;
        if !Self::contains_vowel(&word[..stem_len]) {
            return;
        }
        word.truncate(stem_len);

        if word.ends_with(b"at") || word.ends_with(b"bl") || word.ends_with(b"iz") {
            word.push(b'e');
        } else if Self::ends_with_double_consonant(word)
            && !matches!(word.last(), Some(b'l' | b's' | b'z'))
        {
            word.pop();
        } else if Self::measure(word) == 1 && Self::ends_cvc(word) {
            word.push(b'e');
        }
    }

    fn step1c(word: &mut Vec<u8>) {
        let n = word.len();
        if n > 1 && word[n - 1] == b'y' && Self::contains_vowel(&word[..n - 1]) {
            word[n - 1] = b'i';
        }
    }

    fn step2(word: &mut Vec<u8>) {
        const RULES: &[(&[u8], &[u8])] = &[
            (b"ational", b"ate"),
            (b"tional", b"tion"),
            (b"enci", b"ence"),
            (b"anci", b"ance"),
            (b"izer", b"ize"),
            (b"abli", b"able"),
            (b"alli", b"al"),
            (b"entli", b"ent"),
            (b"eli", b"e"),
            (b"ousli", b"ous"),
            (b"ization", b"ize"),
            (b"ation", b"ate"),
            (b"ator", b"ate"),
            (b"alism", b"al"),
            (b"iveness", b"ive"),
            (b"fulness", b"ful"),
            (b"ousness", b"ous"),
            (b"aliti", b"al"),
            (b"iviti", b"ive"),
            (b"biliti", b"ble"),
        ];
        for (suffix, replacement) in RULES {
            if Self::replace(word, suffix, replacement, 0) {
                return;
            }
        }
    }

    fn step3(word: &mut Vec<u8>) {
        const RULES: &[(&[u8], &[u8])] = &[
            (b"icate", b"ic"),
            (b"ative", b""),
            (b"alize", b"al"),
            (b"iciti", b"ic"),
            (b"ical", b"ic"),
            (b"ful", b""),
            (b"ness", b""),
        ];
        for (suffix, replacement) in RULES {
            if Self::replace(word, suffix, replacement, 0) {
                return;
            }
        }
    }

    fn step4(word: &mut Vec<u8>) {
        const SUFFIXES: &[&[u8]] = &[
            b"al", b"ance", b"ence", b"er", b"ic", b"able", b"ible", b"ant", b"ement", b"ment",
            b"ent", b"ion", b"ou", b"ism", b"ate", b"iti", b"ous", b"ive", b"ize",
        ];
        for suffix in SUFFIXES {
            if !word.ends_with(suffix) {
                continue;
            }
            let stem = &word[..word.len() - suffix.len()];
            if Self::measure(stem) > 1
                && (*suffix != b"ion" || matches!(stem.last(), Some(b's' | b't')))
            {
                let stem_len = stem.len();
                word.truncate(stem_len);
            }
            return;
        }
    }

    fn step5(word: &mut Vec<u8>) {
        if word.ends_with(b"e") {
            let stem = &word[..word.len() - 1];
            let m = Self::measure(stem);
            if m > 1 || (m == 1 && !Self::ends_cvc(stem)) {
                word.pop();
            }
        }
        if word.ends_with(b"ll") && Self::measure(word) > 1 {
            word.pop();
        }
    }
}

impl Stemmer for PorterStemmer {
    fn stem(&self, word: &str) -> String {
        if word.len() <= 2 || !word.bytes().all(|b| b.is_ascii_lowercase()) {
            return word.to_string();
        }

        let mut bytes = word.as_bytes().to_vec();
        Self::step1a(&mut bytes);
        Self::step1b(&mut bytes);
        Self::step1c(&mut bytes);
        Self::step2(&mut bytes);
        Self::step3(&mut bytes);
        Self::step4(&mut bytes);
        Self::step5(&mut bytes);

        // Only ASCII bytes were removed or appended.
        String::from_utf8(bytes).unwrap_or_else(|_| word.to_string())
    }

    fn name(&self) -> &'static str {
        "porter"
    }
}
