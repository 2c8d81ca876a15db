use alloc::string::String;
use alloc::vec::Vec;

/// Insertion-ordered text annotations carried alongside an image.
///
/// The buffer logic never reads these. Codecs that support text (PNM
/// comments) write them out and read them back.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TextMetadata {
    entries: Vec<(String, String)>,
}

impl TextMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key` to `value`, keeping the key's original position if present.
    /// Returns the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, v)) => Some(core::mem::replace(v, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Mutable access to `key`'s value, inserting an empty value if absent.
    pub fn entry(&mut self, key: &str) -> &mut String {
        let idx = match self.entries.iter().position(|(k, _)| k == key) {
            Some(idx) => idx,
            None => {
                self.entries.push((key.into(), String::new()));
                self.entries.len() - 1
            }
        };
        &mut self.entries[idx].1
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        let idx = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(idx).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for TextMetadata {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut meta = TextMetadata::new();
        for (k, v) in iter {
            meta.insert(k, v);
        }
        meta
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_insertion_order() {
        let mut meta = TextMetadata::new();
        meta.insert("Title", "a");
        meta.insert("Author", "b");
        assert_eq!(meta.insert("Title", "c"), Some("a".into()));
        let keys: Vec<_> = meta.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["Title", "Author"]);
        assert_eq!(meta.get("Title"), Some("c"));
    }

    #[test]
    fn entry_inserts_empty() {
        let mut meta = TextMetadata::new();
        meta.entry("Comment").push_str("hello");
        assert_eq!(meta.get("Comment"), Some("hello"));
        assert_eq!(meta.remove("Comment"), Some("hello".into()));
        assert!(meta.is_empty());
    }
}
