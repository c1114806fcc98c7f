//! Normalizer and tokenizer.
//!
//! Word characters are ASCII alphanumerics plus the Cyrillic block
//! U+0400..U+04FF. Lowercasing maps A-Z, the Cyrillic capital range
//! А-Я, and Ё; everything else passes through unchanged. There is no
//! stopword filtering and no minimum token length.

use crate::utf8;

/// Lowercase a single code point.
pub fn char_to_lower(codepoint: u32) -> u32 {
    if (0x41..=0x5A).contains(&codepoint) {
        // A-Z
        return codepoint + 0x20;
    }
    if (0x0410..=0x042F).contains(&codepoint) {
        // А-Я
        return codepoint + 0x20;
    }
    if codepoint == 0x0401 {
        // Ё -> ё
        return 0x0451;
    }
    codepoint
}

/// True for characters that may appear inside a token.
pub fn is_word_char(codepoint: u32) -> bool {
    (0x30..=0x39).contains(&codepoint)
        || (0x41..=0x5A).contains(&codepoint)
        || (0x61..=0x7A).contains(&codepoint)
        || (0x0400..=0x04FF).contains(&codepoint)
}

/// Split a byte string into lowercased word tokens.
///
/// Every non-word code point is a separator; consecutive separators
/// produce no empty tokens.
pub fn tokenize(text: &[u8]) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();

    for codepoint in utf8::decode(text) {
        if is_word_char(codepoint) {
            if let Some(c) = char::from_u32(char_to_lower(codepoint)) {
                current.push(c);
            }
        } else if !current.is_empty() {
            tokens.push(std::mem::take(&mut current));
        }
    }

    if !current.is_empty() {
        tokens.push(current);
    }

    tokens
}

/// Lowercase an entire byte string without splitting it.
///
/// Used for the whole-document substring checks of boolean search. The
/// result is raw bytes: the input may contain sequences that decode to
/// code points outside what `String` accepts.
pub fn to_lower_case(text: &[u8]) -> Vec<u8> {
    let lowered: Vec<u32> = utf8::decode(text).into_iter().map(char_to_lower).collect();
    utf8::encode(&lowered)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mixed_latin_cyrillic_and_digits() {
        let tokens = tokenize("Привет, мир! Hello 42".as_bytes());
        assert_eq!(tokens, vec!["привет", "мир", "hello", "42"]);
    }

    #[test]
    fn punctuation_only_yields_nothing() {
        assert_eq!(tokenize(b"!@#$%^"), Vec::<String>::new());
        assert_eq!(tokenize(b""), Vec::<String>::new());
        assert_eq!(tokenize(b" \t\r\n"), Vec::<String>::new());
    }

    #[test]
    fn yo_lowercases() {
        assert_eq!(tokenize("Ёлка ЁЖ".as_bytes()), vec!["ёлка", "ёж"]);
    }

    #[test]
    fn digits_stick_to_words() {
        assert_eq!(tokenize(b"test123 abc456"), vec!["test123", "abc456"]);
    }

    #[test]
    fn separators_collapse() {
        assert_eq!(tokenize(b"a--b  ,, c"), vec!["a", "b", "c"]);
    }

    #[test]
    fn tokenize_is_idempotent() {
        let text = "Кошка и Dog-42, ёж; END.".as_bytes();
        let once = tokenize(text);
        let rejoined = once.join(" ");
        assert_eq!(tokenize(rejoined.as_bytes()), once);
    }

    #[test]
    fn lowercase_is_idempotent() {
        let text = "ПрИвЕт MiXeD Ёж".as_bytes();
        let once = to_lower_case(text);
        assert_eq!(to_lower_case(&once), once);
    }

    #[test]
    fn lowercase_preserves_non_letters() {
        assert_eq!(to_lower_case(b"A-B c!"), b"a-b c!".to_vec());
    }

    #[test]
    fn malformed_bytes_are_skipped() {
        // the invalid byte disappears from the decoded stream, so the
        // surrounding word characters join into one token
        assert_eq!(tokenize(&[0x61, 0xFF, 0x62]), vec!["ab"]);
    }
}
