use crate::error::{AppError, Result};

/// The longest chirp accepted, in characters.
pub const MAX_CHIRP_LENGTH: usize = 140;

/// Words replaced by the censor.
const PROFANE_WORDS: [&str; 3] = ["kerfuffle", "sharbert", "fornax"];
const CENSORED: &str = "****";

/// Validates a chirp's length and returns its censored text.
///
/// Length is counted in characters rather than bytes, so multi-byte text is not
/// penalised.
pub fn clean_chirp(body: &str) -> Result<String> {
    if body.chars().count() > MAX_CHIRP_LENGTH {
        return Err(AppError::Validation("Chirp is too long".to_string()));
    }

    Ok(censor(body))
}

/// Replaces profane words with `****`.
///
/// Matching is case-insensitive on whole space-separated words, so `Fornax!` is
/// left alone.
pub fn censor(body: &str) -> String {
    body.split(' ')
        .map(|word| {
            let lowered = word.to_lowercase();
            if PROFANE_WORDS.contains(&lowered.as_str()) {
                CENSORED
            } else {
                word
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
