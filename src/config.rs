use std::env;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: String,
    /// Word list backing the full lemmatizer; a missing file switches the
    /// symptom matcher to passthrough mode.
    pub lexicon_path: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| "medibook.db".to_string()),
            lexicon_path: env::var("LEXICON_PATH")
                .unwrap_or_else(|_| "data/lemmas.txt".to_string()),
        }
    }
}
