use std::collections::BTreeSet;

use crate::services::nlp::Lemmatizer;

/// Token -> candidate conditions. A lookup table, not a classifier: no
/// ranking, no severity weighting.
const SYMPTOM_CONDITIONS: [(&str, &[&str]); 20] = [
    ("fever", &["Viral Infection", "Bacterial Infection", "Flu"]),
    ("headache", &["Migraine", "Tension Headache", "Sinusitis"]),
    ("cough", &["Common Cold", "Bronchitis", "Pneumonia"]),
    ("blocked", &["Common Cold", "Allergic Rhinitis", "Sinusitis"]),
    ("nose", &["Common Cold", "Allergic Rhinitis", "Sinusitis"]),
    ("sore", &["Viral Pharyngitis", "Strep Throat", "Common Cold"]),
    ("throat", &["Viral Pharyngitis", "Strep Throat", "Common Cold"]),
    ("body", &["Flu", "Viral Infection", "Muscle Strain"]),
    ("pain", &["Flu", "Viral Infection", "Muscle Strain"]),
    ("nausea", &["Food Poisoning", "Gastroenteritis", "Migraine"]),
    ("vomiting", &["Food Poisoning", "Gastroenteritis", "Viral Infection"]),
    ("diarrhea", &["Food Poisoning", "Gastroenteritis", "IBS"]),
    ("fatigue", &["Viral Infection", "Anemia", "Chronic Fatigue"]),
    ("chest", &["Acid Reflux", "Muscle Strain", "Anxiety"]),
    ("shortness", &["Asthma", "Anxiety", "Respiratory Infection"]),
    ("breath", &["Asthma", "Anxiety", "Respiratory Infection"]),
    ("cold", &["Common Cold", "Viral Infection"]),
    ("runny", &["Common Cold", "Allergic Rhinitis"]),
    ("sneezing", &["Common Cold", "Allergic Rhinitis"]),
    ("weakness", &["Viral Infection", "Anemia", "Dehydration"]),
];

/// Multi-word phrases matched against the raw blob, independently of the
/// tokenizer. Each entry: (tag, trigger phrases, conditions).
const PHRASE_CONDITIONS: [(&str, &[&str], &[&str]); 3] = [
    (
        "blocked_nose",
        &["blocked nose", "stuffy nose"],
        &["Common Cold", "Allergic Rhinitis", "Sinusitis"],
    ),
    (
        "sore_throat",
        &["sore throat"],
        &["Viral Pharyngitis", "Strep Throat", "Common Cold"],
    ),
    (
        "body_pain",
        &["body pain", "body ache"],
        &["Flu", "Viral Infection", "Muscle Strain"],
    ),
];

const STOPWORDS: [&str; 70] = [
    "i", "me", "my", "myself", "we", "our", "ours", "you", "your", "yours", "he", "him", "his",
    "she", "her", "hers", "it", "its", "they", "them", "their", "theirs", "what", "which", "who",
    "whom", "this", "that", "these", "those", "am", "is", "are", "was", "were", "be", "been",
    "being", "have", "has", "had", "having", "do", "does", "did", "doing", "a", "an", "the",
    "and", "but", "if", "or", "because", "as", "until", "while", "of", "at", "by", "for", "with",
    "in", "out", "on", "off", "over", "under", "then", "once",
];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymptomReport {
    /// De-duplicated matched symptom tags, in first-seen order.
    pub matched: Vec<String>,
    /// De-duplicated candidate conditions, sorted (order is not significant).
    pub conditions: Vec<String>,
}

impl SymptomReport {
    pub fn conditions_label(&self) -> String {
        self.conditions.join(", ")
    }
}

/// Matches the accumulated symptom phrases against the token and phrase
/// tables. Tokenization drops stopwords and non-alphabetic tokens; each
/// survivor is reduced through the lemmatizer before lookup.
pub fn analyze(symptoms: &[String], lemmatizer: &dyn Lemmatizer) -> SymptomReport {
    let blob = symptoms.join(" ").to_lowercase();

    let mut matched: Vec<String> = vec![];
    let mut conditions: BTreeSet<String> = BTreeSet::new();

    for token in tokenize(&blob) {
        let lemma = lemmatizer.reduce(&token);
        if let Some((tag, found)) = SYMPTOM_CONDITIONS.iter().find(|(t, _)| *t == lemma) {
            if !matched.iter().any(|m| m == tag) {
                matched.push(tag.to_string());
            }
            conditions.extend(found.iter().map(|c| c.to_string()));
        }
    }

    // Phrase matches fire on the raw blob regardless of tokenization.
    for (tag, phrases, found) in PHRASE_CONDITIONS.iter() {
        if phrases.iter().any(|p| blob.contains(p)) {
            if !matched.iter().any(|m| m == tag) {
                matched.push(tag.to_string());
            }
            conditions.extend(found.iter().map(|c| c.to_string()));
        }
    }

    SymptomReport {
        matched,
        conditions: conditions.into_iter().collect(),
    }
}

fn tokenize(blob: &str) -> impl Iterator<Item = String> + '_ {
    blob.split(|c: char| !c.is_alphabetic())
        .filter(|t| !t.is_empty() && !STOPWORDS.contains(t))
        .map(|t| t.to_string())
}
