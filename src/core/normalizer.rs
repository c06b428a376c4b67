use crate::domain::model::{Token, User, UserProfile};

/// Split a comma-separated user field into tokens, in the order they were entered.
///
/// Pieces that are blank after trimming are dropped. Duplicates are kept; each one
/// is matched independently.
pub fn normalize_tokens(field: &str) -> Vec<Token> {
    field
        .split(',')
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .map(|piece| Token {
            display: piece.to_string(),
            normalized: piece.to_lowercase(),
        })
        .collect()
}

pub fn profile_from_fields(allergies: &str, conditions: &str) -> UserProfile {
    UserProfile {
        allergies: normalize_tokens(allergies),
        conditions: normalize_tokens(conditions),
    }
}

pub fn profile_for(user: &User) -> UserProfile {
    profile_from_fields(&user.allergies, &user.health_conditions)
}
