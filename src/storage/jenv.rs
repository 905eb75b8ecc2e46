use std::env;

#[derive(Debug)]
pub enum EnvError {
    Empty(String),
}

impl std::fmt::Display for EnvError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EnvError::Empty(key) => write!(f, "Environment variable '{}' is empty", key),
        }
    }
}

impl std::error::Error for EnvError {}

pub fn get_env_var(key: &str, required_non_empty: bool) -> Result<Option<String>, EnvError> {
    match env::var(key) {
        Ok(value) => {
            if required_non_empty && value.trim().is_empty() {
                Err(EnvError::Empty(key.to_string()))
            } else {
                Ok(Some(value))
            }
        }
        Err(_) => Ok(None),
    }
}

/// First non-blank value among `keys`, in order, returned untrimmed. Used where a legacy name is
/// still honoured next to the prefixed one.
pub fn first_non_empty_env_var(keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match get_env_var(key, false) {
        Ok(Some(value)) if !value.trim().is_empty() => Some(value),
        _ => None,
    })
}
