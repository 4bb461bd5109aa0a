//! `KEY=VALUE` file loader with environment fallback

use std::collections::HashMap;
use std::io;
use std::path::Path;

/// Default file read by [`DotEnv::load`]
pub const DEFAULT_FILE: &str = ".env.local";

/// Values read from an env file
///
/// Lookups that miss the file fall back to the process environment and are
/// cached, so a variable read once keeps its value.
#[derive(Debug, Default)]
pub struct DotEnv {
    values: HashMap<String, String>,
}

impl DotEnv {
    /// Read `.env.local` from the current directory
    pub fn load() -> io::Result<Self> {
        Self::load_from(DEFAULT_FILE)
    }

    /// Read the given file; a missing file yields an empty set
    pub fn load_from(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(contents) => {
                let env = Self::parse(&contents);
                tracing::debug!(path = %path.display(), entries = env.values.len(), "loaded env file");
                Ok(env)
            }
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "env file not found");
                Ok(Self::default())
            }
            Err(error) => Err(error),
        }
    }

    /// Parse file contents
    ///
    /// Each line is split on `=` with empty pieces dropped. Lines that do not
    /// split into exactly a key and a value are skipped, so values cannot
    /// contain `=`.
    pub fn parse(contents: &str) -> Self {
        let values = contents
            .lines()
            .filter_map(|line| {
                let mut parts = line.split('=').filter(|part| !part.is_empty());
                match (parts.next(), parts.next(), parts.next()) {
                    (Some(key), Some(value), None) => Some((key.to_owned(), value.to_owned())),
                    _ => None,
                }
            })
            .collect();

        Self { values }
    }

    /// Value for `key`, or an empty string when neither the file nor the
    /// environment has it
    pub fn get(&mut self, key: &str) -> String {
        if let Some(value) = self.values.get(key) {
            return value.clone();
        }

        match std::env::var(key) {
            Ok(value) => {
                self.values.insert(key.to_owned(), value.clone());
                value
            }
            Err(_) => String::new(),
        }
    }
}
