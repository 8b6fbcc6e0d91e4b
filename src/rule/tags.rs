use serde::{Deserialize, Serialize};

/// Tags tie a rule to external taxonomies, e.g. `attack.t1059.001` for a
/// MITRE ATT&CK technique
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Tags(pub Vec<String>);

impl Tags {
    /// Create new empty tags collection
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Whether `tag` is present
    pub fn contains(&self, tag: &str) -> bool {
        self.0.iter().any(|t| t == tag)
    }

    /// Check if all provided tags are present in this collection
    pub fn has_all<S: AsRef<str>>(&self, tags: &[S]) -> bool {
        tags.iter().all(|tag| self.contains(tag.as_ref()))
    }

    /// Check if any of the provided tags are present in this collection
    pub fn has_any<S: AsRef<str>>(&self, tags: &[S]) -> bool {
        tags.iter().any(|tag| self.contains(tag.as_ref()))
    }

    /// Tags under a namespace such as `attack` or `cve`
    pub fn in_namespace<'a>(&'a self, namespace: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.0.iter().map(String::as_str).filter(move |tag| {
            tag.split_once('.')
                .is_some_and(|(prefix, _)| prefix == namespace)
        })
    }

    /// Iterate over the tags
    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    /// Number of tags
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when there are no tags
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a Tags {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl From<Vec<String>> for Tags {
    fn from(tags: Vec<String>) -> Self {
        Self(tags)
    }
}

impl From<&[&str]> for Tags {
    fn from(tags: &[&str]) -> Self {
        Self(tags.iter().map(|s| s.to_string()).collect())
    }
}
