//! Substitution table
//!
//! Maps a plain letter as recognized by OCR to the letter it stands for.
//! Lookups are exact: only the characters present in the table are mapped.

use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

/// Al Bhed to Latin, lowercase only
#[rustfmt::skip]
const AL_BHED: [(char, char); 26] = [
    ('a', 'e'), ('b', 'p'), ('c', 's'), ('d', 't'), ('e', 'i'), ('f', 'w'),
    ('g', 'k'), ('h', 'n'), ('i', 'u'), ('j', 'v'), ('k', 'g'), ('l', 'c'),
    ('m', 'l'), ('n', 'r'), ('o', 'y'), ('p', 'b'), ('q', 'x'), ('r', 'h'),
    ('s', 'm'), ('t', 'd'), ('u', 'o'), ('v', 'f'), ('w', 'z'), ('x', 'q'),
    ('y', 'a'), ('z', 'j'),
];

static AL_BHED_MAP: OnceLock<CipherMap> = OnceLock::new();

/// Immutable letter substitution table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CipherMap {
    table: HashMap<char, char>,
}

impl CipherMap {
    /// Build a table from `(from, to)` pairs. Later pairs win.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (char, char)>,
    {
        Self {
            table: pairs.into_iter().collect(),
        }
    }

    /// The process-wide Al Bhed table
    pub fn al_bhed() -> &'static CipherMap {
        AL_BHED_MAP.get_or_init(|| Self::from_pairs(AL_BHED))
    }

    /// Mapped letter, if `c` is in the table
    pub fn get(&self, c: char) -> Option<char> {
        self.table.get(&c).copied()
    }

    /// Mapped letter, or `c` itself on a miss
    pub fn apply(&self, c: char) -> char {
        self.get(c).unwrap_or(c)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Entries sorted by source letter
    pub fn entries(&self) -> Vec<(char, char)> {
        let mut entries: Vec<_> = self.table.iter().map(|(&k, &v)| (k, v)).collect();
        entries.sort_unstable();
        entries
    }
}

impl fmt::Display for CipherMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries = self.entries();
        for (i, (from, to)) in entries.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{from}→{to}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_al_bhed_is_a_permutation() {
        let map = CipherMap::al_bhed();
        assert_eq!(map.len(), 26);

        let mut targets: Vec<char> = map.entries().into_iter().map(|(_, to)| to).collect();
        targets.sort_unstable();
        assert_eq!(targets, ('a'..='z').collect::<Vec<_>>());
    }

    #[test]
    fn test_known_words() {
        let map = CipherMap::al_bhed();
        let decode = |s: &str| s.chars().map(|c| map.apply(c)).collect::<String>();
        // "Ruf yna oui?" -> "How are you?" (lowercase only)
        assert_eq!(decode("ruf yna oui"), "how are you");
        assert_eq!(decode("rammu"), "hello");
    }

    #[test]
    fn test_lookup_is_exact() {
        let map = CipherMap::al_bhed();
        assert_eq!(map.get('R'), None);
        assert_eq!(map.apply('R'), 'R');
        assert_eq!(map.apply('!'), '!');
        assert_eq!(map.apply(' '), ' ');
    }

    #[test]
    fn test_same_instance() {
        assert!(std::ptr::eq(CipherMap::al_bhed(), CipherMap::al_bhed()));
    }

    #[test]
    fn test_display() {
        let map = CipherMap::from_pairs([('b', 'f'), ('a', 'e')]);
        assert_eq!(map.to_string(), "a→e b→f");
    }
}
