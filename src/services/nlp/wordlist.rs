use std::collections::HashMap;
use std::fs;

use anyhow::Context;

use super::Lemmatizer;

/// Lemmatizer backed by a flat `inflected lemma` word list.
///
/// Lines are whitespace-separated pairs; blank lines and `#` comments are
/// ignored. Tokens absent from the list are returned unchanged, so the list
/// only needs to cover the inflections we care about.
pub struct WordlistLemmatizer {
    lemmas: HashMap<String, String>,
}

impl WordlistLemmatizer {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read lemma list: {path}"))?;
        Ok(Self::parse(&text))
    }

    pub(crate) fn parse(text: &str) -> Self {
        let mut lemmas = HashMap::new();
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut parts = line.split_whitespace();
            if let (Some(word), Some(lemma)) = (parts.next(), parts.next()) {
                lemmas.insert(word.to_lowercase(), lemma.to_lowercase());
            }
        }
        Self { lemmas }
    }

    pub fn len(&self) -> usize {
        self.lemmas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lemmas.is_empty()
    }
}

impl Lemmatizer for WordlistLemmatizer {
    fn reduce(&self, token: &str) -> String {
        match self.lemmas.get(token) {
            Some(lemma) => lemma.clone(),
            None => token.to_string(),
        }
    }
}
