//! CRC32 name dictionary
//!
//! User data headers are identified by the CRC32 of their name. The names are
//! only used to make output readable, so an unknown hash falls back to its
//! decimal string.

use std::collections::HashMap;
use std::sync::OnceLock;

/// Embedded seed word list, one name per line
const EMBEDDED_NAMES: &str = include_str!("../../../data/xlink_names.txt");

static DICTIONARY: OnceLock<NameDictionary> = OnceLock::new();

/// CRC32 of a name as stored in the user data table.
#[must_use]
pub fn hash_name(name: &str) -> u32 {
    crc32fast::hash(name.as_bytes())
}

/// Hash → name lookup built from a newline-delimited word list.
#[derive(Debug, Clone, Default)]
pub struct NameDictionary {
    names: HashMap<u32, String>,
}

impl NameDictionary {
    /// Build from a word list. Blank lines are skipped; on a hash collision
    /// the first word wins.
    #[must_use]
    pub fn from_word_list(words: &str) -> Self {
        let mut names = HashMap::new();
        for word in words.lines().map(|line| line.trim_end_matches('\r')) {
            if word.is_empty() {
                continue;
            }
            names.entry(hash_name(word)).or_insert_with(|| word.to_string());
        }
        Self { names }
    }

    #[must_use]
    pub fn lookup(&self, hash: u32) -> Option<&str> {
        self.names.get(&hash).map(String::as_str)
    }

    /// The known name, or the hash in decimal.
    #[must_use]
    pub fn name_or_hash(&self, hash: u32) -> String {
        self.lookup(hash)
            .map_or_else(|| hash.to_string(), ToString::to_string)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// The process-wide dictionary, built from the embedded list on first use
/// unless [`init_name_dictionary`] ran first.
pub fn name_dictionary() -> &'static NameDictionary {
    DICTIONARY.get_or_init(|| NameDictionary::from_word_list(EMBEDDED_NAMES))
}

/// Install a custom word list as the process-wide dictionary.
///
/// Returns `false` if a dictionary was already built; the first one stays.
pub fn init_name_dictionary(words: &str) -> bool {
    DICTIONARY.set(NameDictionary::from_word_list(words)).is_ok()
}

/// Look up a hash in the process-wide dictionary.
pub fn lookup_name(hash: u32) -> Option<&'static str> {
    name_dictionary().lookup(hash)
}
