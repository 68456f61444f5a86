//! Prefix tree used to recognize keyword operators by longest match.

use std::collections::HashMap;
use std::hash::Hash;

/// A multi-way prefix tree mapping key sequences to values.
///
/// Every node owns its children, so the structure is a strict tree. A node
/// whose value equals `V::default()` marks a prefix that is not a complete key.
#[derive(Debug, Clone)]
pub struct Trie<K, V> {
    children: HashMap<K, Trie<K, V>>,
    value: V,
}

impl<K: Eq + Hash, V: Default> Trie<K, V> {
    /// Creates an empty root node.
    #[must_use]
    pub fn new() -> Self {
        Self {
            children: HashMap::new(),
            value: V::default(),
        }
    }

    /// Inserts `value` at the end of `key`, overwriting any previous value and
    /// creating intermediate nodes as needed. Returns the updated root.
    #[must_use]
    pub fn insert(mut self, key: impl IntoIterator<Item = K>, value: V) -> Self {
        let mut node = &mut self;
        for symbol in key {
            node = node.children.entry(symbol).or_insert_with(Self::new);
        }
        node.value = value;
        self
    }
}

impl<K: Eq + Hash, V> Trie<K, V> {
    /// Descends one step along `symbol`.
    #[must_use]
    pub fn node_for(&self, symbol: &K) -> Option<&Self> {
        self.children.get(symbol)
    }

    /// Returns the value stored at this node.
    #[must_use]
    pub const fn value(&self) -> &V {
        &self.value
    }
}

impl<K: Eq + Hash, V: Default> Default for Trie<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

/// A keyword table for the lexer.
///
/// Each keyword is stored with its list index plus one, so a node value of `0`
/// means the path is only a prefix of some keyword.
#[derive(Debug, Clone, Default)]
pub struct Keywords {
    root: Trie<char, usize>,
}

impl Keywords {
    /// Builds the table from keywords in index order.
    #[must_use]
    pub fn new<S: AsRef<str>>(words: &[S]) -> Self {
        let root = words
            .iter()
            .enumerate()
            .fold(Trie::new(), |root, (index, word)| {
                root.insert(word.as_ref().chars(), index + 1)
            });
        Self { root }
    }

    /// Returns the root node.
    #[must_use]
    pub const fn root(&self) -> &Trie<char, usize> {
        &self.root
    }

    /// Returns the keyword index stored at `node`, if the node ends a keyword.
    #[must_use]
    pub const fn index_at(node: &Trie<char, usize>) -> Option<usize> {
        match *node.value() {
            0 => None,
            n => Some(n - 1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_descend() {
        let trie = Trie::new().insert("abc".chars(), 1);
        let a = trie.node_for(&'a').expect("a");
        let b = a.node_for(&'b').expect("b");
        let c = b.node_for(&'c').expect("c");
        assert_eq!(*a.value(), 0);
        assert_eq!(*b.value(), 0);
        assert_eq!(*c.value(), 1);
        assert!(c.node_for(&'d').is_none());
    }

    #[test]
    fn test_insert_overwrites() {
        let trie = Trie::new().insert("ab".chars(), 1).insert("ab".chars(), 7);
        let b = trie.node_for(&'a').and_then(|n| n.node_for(&'b')).expect("b");
        assert_eq!(*b.value(), 7);
    }

    #[test]
    fn test_shared_prefix() {
        let trie = Trie::new().insert("as".chars(), 1).insert("assert".chars(), 2);
        let s = trie.node_for(&'a').and_then(|n| n.node_for(&'s')).expect("s");
        assert_eq!(*s.value(), 1);
        assert!(s.node_for(&'s').is_some());
    }

    #[test]
    fn test_empty_key_sets_root() {
        let trie = Trie::new().insert(std::iter::empty::<char>(), 3);
        assert_eq!(*trie.value(), 3);
    }

    #[test]
    fn test_keywords_index() {
        let keywords = Keywords::new(&["GT", "GTE"]);
        let g = keywords.root().node_for(&'G').expect("G");
        assert_eq!(Keywords::index_at(g), None);
        let t = g.node_for(&'T').expect("T");
        assert_eq!(Keywords::index_at(t), Some(0));
        let e = t.node_for(&'E').expect("E");
        assert_eq!(Keywords::index_at(e), Some(1));
    }
}
