//! Dictionary module for word validation
//!
//! Embeds a prefix-reuse encoded word list at build time. Each token in the
//! encoding is a single digit N ("keep the first N letters of the previous
//! word") followed by the literal suffix, which runs up to the next digit.
//!
//! The list is decoded into a trie on first use, exactly once, behind a
//! `OnceCell`. Lookups accept `*` as a wildcard matching any single letter.

use derive_more::{Display, Error};
use once_cell::sync::OnceCell;
use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Embedded wordlist, prefix-reuse encoded, uppercase A-Z only
static BUNDLED_WORDS: &str = include_str!("../../data/words.enc");

/// Query character that matches any single letter.
pub const WILDCARD: char = '*';

/// Maximum number of wildcards a single query may contain.
/// Each wildcard multiplies the search by up to 26 branches.
pub const MAX_WILDCARDS: usize = 3;

/// A reuse count is a single digit, so at most 9 letters carry over.
const MAX_REUSE: usize = 9;

const ALPHABET: usize = 26;

/// Root is node 0 and is never anyone's child, so 0 doubles as "no child".
const NO_CHILD: u32 = 0;

/// Errors raised while loading a word list.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum DictionaryError {
    /// The encoded stream could not be decoded
    #[display("malformed word list at byte {offset}: {reason}")]
    Malformed { offset: usize, reason: String },
    /// The word list file could not be read
    #[display("failed to read word list {path}: {message}")]
    Read { path: String, message: String },
}

fn malformed(offset: usize, reason: impl Into<String>) -> DictionaryError {
    DictionaryError::Malformed {
        offset,
        reason: reason.into(),
    }
}

#[derive(Debug, Clone)]
struct Node {
    children: [u32; ALPHABET],
    terminal: bool,
}

impl Node {
    fn new() -> Self {
        Self {
            children: [NO_CHILD; ALPHABET],
            terminal: false,
        }
    }
}

/// Prefix tree over A-Z. Nodes live in one arena; children are indices.
#[derive(Debug, Clone)]
pub struct Trie {
    nodes: Vec<Node>,
    words: usize,
}

impl Default for Trie {
    fn default() -> Self {
        Self::new()
    }
}

impl Trie {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new()],
            words: 0,
        }
    }

    /// Decode an encoded word stream into a new trie.
    pub fn from_encoded(encoded: &str) -> Result<Self, DictionaryError> {
        let mut trie = Trie::new();
        decode_with(encoded, |word| {
            trie.insert(word);
        })?;
        Ok(trie)
    }

    /// Insert an uppercase word. Returns false if it was already present
    /// or contains anything other than A-Z.
    pub fn insert(&mut self, word: &str) -> bool {
        if word.is_empty() || !word.bytes().all(|b| b.is_ascii_uppercase()) {
            return false;
        }
        let mut node = 0usize;
        for b in word.bytes() {
            let slot = (b - b'A') as usize;
            let child = self.nodes[node].children[slot];
            node = if child == NO_CHILD {
                let id = self.nodes.len();
                self.nodes.push(Node::new());
                self.nodes[node].children[slot] = id as u32;
                id
            } else {
                child as usize
            };
        }
        if self.nodes[node].terminal {
            return false;
        }
        self.nodes[node].terminal = true;
        self.words += 1;
        true
    }

    /// Find the first word matching `pattern`, trying children in
    /// alphabetical order at each wildcard.
    pub fn find(&self, pattern: &str) -> Option<String> {
        let mut matched = Vec::with_capacity(pattern.len());
        if self.search(0, pattern.as_bytes(), &mut matched) {
            // Only A-Z is ever pushed
            String::from_utf8(matched).ok()
        } else {
            None
        }
    }

    pub fn contains(&self, pattern: &str) -> bool {
        self.find(pattern).is_some()
    }

    /// Number of distinct words.
    pub fn len(&self) -> usize {
        self.words
    }

    pub fn is_empty(&self) -> bool {
        self.words == 0
    }

    fn search(&self, node: usize, rest: &[u8], matched: &mut Vec<u8>) -> bool {
        let Some((&first, tail)) = rest.split_first() else {
            return self.nodes[node].terminal;
        };

        if first == WILDCARD as u8 {
            for (slot, &child) in self.nodes[node].children.iter().enumerate() {
                if child == NO_CHILD {
                    continue;
                }
                matched.push(b'A' + slot as u8);
                if self.search(child as usize, tail, matched) {
                    return true;
                }
                matched.pop();
            }
            return false;
        }

        if !first.is_ascii_uppercase() {
            return false;
        }
        let child = self.nodes[node].children[(first - b'A') as usize];
        if child == NO_CHILD {
            return false;
        }
        matched.push(first);
        if self.search(child as usize, tail, matched) {
            return true;
        }
        matched.pop();
        false
    }
}

/// Decode the whole stream into a list of words.
pub fn decode(encoded: &str) -> Result<Vec<String>, DictionaryError> {
    let mut words = Vec::new();
    decode_with(encoded, |word| words.push(word.to_string()))?;
    Ok(words)
}

/// Walk the encoded stream, handing each decoded word to `emit`.
/// Every iteration consumes at least one byte, so the loop always ends.
fn decode_with(encoded: &str, mut emit: impl FnMut(&str)) -> Result<usize, DictionaryError> {
    let encoded = encoded.trim_end();
    let bytes = encoded.as_bytes();
    let mut word = String::new();
    let mut count = 0;
    let mut pos = 0;

    while pos < bytes.len() {
        let token_start = pos;
        let digit = bytes[pos];
        if !digit.is_ascii_digit() {
            return Err(malformed(
                pos,
                format!("expected reuse digit, found {:?}", digit as char),
            ));
        }
        let reuse = (digit - b'0') as usize;
        if reuse > word.len() {
            return Err(malformed(
                pos,
                format!("reuse of {} exceeds previous word {:?}", reuse, word),
            ));
        }
        pos += 1;

        let suffix_start = pos;
        while pos < bytes.len() && !bytes[pos].is_ascii_digit() {
            if !bytes[pos].is_ascii_uppercase() {
                return Err(malformed(pos, "expected letter A-Z"));
            }
            pos += 1;
        }
        if pos == suffix_start {
            return Err(malformed(token_start, "token has no letters"));
        }

        word.truncate(reuse);
        word.push_str(&encoded[suffix_start..pos]);
        emit(&word);
        count += 1;
    }

    Ok(count)
}

/// Encode a word list. Words are upper-cased, sorted and de-duplicated;
/// anything containing characters outside A-Z is skipped.
pub fn encode<I, S>(words: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let sorted: BTreeSet<String> = words
        .into_iter()
        .map(|w| w.as_ref().trim().to_ascii_uppercase())
        .filter(|w| !w.is_empty() && w.bytes().all(|b| b.is_ascii_uppercase()))
        .collect();

    let mut out = String::new();
    let mut prev = "";
    for word in &sorted {
        let shared = prev
            .bytes()
            .zip(word.bytes())
            .take(MAX_REUSE)
            .take_while(|(a, b)| a == b)
            .count();
        // Sorted and unique, so the suffix is never empty
        out.push(char::from(b'0' + shared as u8));
        out.push_str(&word[shared..]);
        prev = word;
    }
    out
}

/// Where a dictionary gets its encoded word list from.
#[derive(Debug, Clone)]
enum WordSource {
    Bundled,
    Encoded(String),
}

impl WordSource {
    fn label(&self) -> &'static str {
        match self {
            WordSource::Bundled => "bundled",
            WordSource::Encoded(_) => "encoded",
        }
    }

    fn text(&self) -> &str {
        match self {
            WordSource::Bundled => BUNDLED_WORDS,
            WordSource::Encoded(text) => text,
        }
    }
}

/// A word list that builds its trie once, on first use.
///
/// Share one instance per process with `Arc<Dictionary>`; the build is
/// guarded by a one-time initialization cell so concurrent first lookups
/// never race to rebuild it.
pub struct Dictionary {
    source: WordSource,
    trie: OnceCell<Result<Trie, DictionaryError>>,
}

impl fmt::Debug for Dictionary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match self.trie.get() {
            None => "unloaded".to_string(),
            Some(Ok(trie)) => format!("{} words", trie.len()),
            Some(Err(e)) => format!("failed: {}", e),
        };
        f.debug_struct("Dictionary")
            .field("source", &self.source.label())
            .field("state", &state)
            .finish()
    }
}

impl Default for Dictionary {
    fn default() -> Self {
        Self::bundled()
    }
}

impl Dictionary {
    /// The word list compiled into the binary.
    pub fn bundled() -> Self {
        Self::with_source(WordSource::Bundled)
    }

    /// A dictionary over an already encoded word stream.
    pub fn from_encoded(encoded: impl Into<String>) -> Self {
        Self::with_source(WordSource::Encoded(encoded.into()))
    }

    /// A dictionary over a plain word list.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::from_encoded(encode(words))
    }

    /// Read an encoded word list from disk. The file is read now; decoding
    /// still waits for the first lookup.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, DictionaryError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| DictionaryError::Read {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        debug!(path = %path.display(), bytes = text.len(), "read encoded word list");
        Ok(Self::from_encoded(text))
    }

    fn with_source(source: WordSource) -> Self {
        Self {
            source,
            trie: OnceCell::new(),
        }
    }

    /// Build the trie if it has not been built yet and report whether the
    /// word list decoded cleanly.
    pub fn ensure_loaded(&self) -> Result<&Trie, DictionaryError> {
        self.trie
            .get_or_init(|| {
                let started = Instant::now();
                let result = Trie::from_encoded(self.source.text());
                match &result {
                    Ok(trie) => info!(
                        words = trie.len(),
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        "dictionary built"
                    ),
                    Err(e) => error!(error = %e, "dictionary build failed"),
                }
                result
            })
            .as_ref()
            .map_err(Clone::clone)
    }

    /// Whether the one-time build has already happened.
    pub fn is_loaded(&self) -> bool {
        self.trie.get().is_some()
    }

    /// Check if a word is in the dictionary. Case-insensitive; `*` matches
    /// any letter.
    pub fn check_word(&self, word: &str) -> bool {
        self.find_word(word).is_some()
    }

    /// Like [`Dictionary::check_word`], but returns the concrete word that
    /// matched, with each wildcard replaced by its letter. When several words
    /// match, the alphabetically first one is returned.
    pub fn find_word(&self, word: &str) -> Option<String> {
        let query = word.to_ascii_uppercase();
        let wildcards = query.chars().filter(|&c| c == WILDCARD).count();
        if wildcards > MAX_WILDCARDS {
            warn!(word = %query, wildcards, "too many wildcards in query");
            return None;
        }
        match self.ensure_loaded() {
            Ok(trie) => trie.find(&query),
            Err(_) => None,
        }
    }

    /// Returns the total number of words in the dictionary, building it if
    /// needed. A list that failed to decode counts as empty.
    pub fn len(&self) -> usize {
        self.ensure_loaded().map(Trie::len).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
