//! Deterministic short-name assignment.
//!
//! Uses bijective base-N numbering: `encode(0)` is the alphabet's first
//! symbol, and the carry rule (`n / base - 1`) means every non-negative
//! integer maps to a unique finite string with no leading-zero ambiguity.
//! This is NOT positional base-N: positional encoding would make e.g.
//! `encode(0)` and `encode(base)` both start with the zero digit and
//! collide once strings grow a digit.

use indexmap::IndexMap;

/// Alphabet for CSS-embeddable names (classes, custom properties).
pub const NAME_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz-_";

/// Alphabet for filenames: lowercase + digits, valid on any filesystem.
pub const FILE_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Encode `n` over `alphabet` using bijective base-N numbering.
pub fn encode(mut n: u64, alphabet: &[u8]) -> String {
    let base = alphabet.len() as u64;
    let mut out = Vec::new();
    loop {
        out.push(alphabet[(n % base) as usize]);
        if n < base {
            break;
        }
        n = n / base - 1;
    }
    out.reverse();
    // SAFETY: alphabets only contain ASCII characters
    unsafe { String::from_utf8_unchecked(out) }
}

/// Per-symbol-class encoder state: an alphabet, a first-seen counter, and
/// the raw-name → code mapping in assignment order.
///
/// Each symbol class (scoped classes, CSS variables, filenames) owns its
/// own instance; counters are never shared across classes.
pub struct ShortNamer {
    alphabet: &'static [u8],
    prefix: &'static str,
    next: u64,
    map: IndexMap<String, String>,
}

impl ShortNamer {
    pub fn new(alphabet: &'static [u8], prefix: &'static str) -> Self {
        Self {
            alphabet,
            prefix,
            next: 0,
            map: IndexMap::new(),
        }
    }

    /// Assign the next code to `raw` if it has not been seen yet.
    pub fn assign(&mut self, raw: &str) {
        if !self.map.contains_key(raw) {
            let code = format!("{}{}", self.prefix, encode(self.next, self.alphabet));
            self.next += 1;
            self.map.insert(raw.to_string(), code);
        }
    }

    /// The code assigned to `raw`, if any.
    pub fn get(&self, raw: &str) -> Option<&str> {
        self.map.get(raw).map(String::as_str)
    }

    /// Raw-name → code mapping, in first-seen order.
    pub fn mapping(&self) -> &IndexMap<String, String> {
        &self.map
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }
}
