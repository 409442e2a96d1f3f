//! Persistence-side rules shared by every game store backend.

use crate::dao::storage::{StorageError, StorageResult};

/// Name of the single table holding games.
pub const GAME_TABLE_NAME: &str = "game";
/// Secondary lookup index on the title column.
pub const GAME_TITLE_INDEX_NAME: &str = "idx_game_title";

/// Lowest score a game may carry.
pub const MIN_SCORE: i64 = 0;
/// Highest score a game may carry.
pub const MAX_SCORE: i64 = 10;

/// Reject empty titles before any statement reaches the database.
pub fn ensure_title(title: &str) -> StorageResult<()> {
    if title.is_empty() {
        return Err(StorageError::InvalidInput(
            "game title must not be empty".into(),
        ));
    }
    Ok(())
}

/// Reject scores outside `MIN_SCORE..=MAX_SCORE`; the table has no check constraint.
pub fn ensure_score(score: i64) -> StorageResult<()> {
    if !(MIN_SCORE..=MAX_SCORE).contains(&score) {
        return Err(StorageError::InvalidInput(format!(
            "game score must be between {MIN_SCORE} and {MAX_SCORE} (got {score})"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_title_is_rejected() {
        assert!(matches!(
            ensure_title(""),
            Err(StorageError::InvalidInput(_))
        ));
        assert!(ensure_title("Chess").is_ok());
    }

    #[test]
    fn score_bounds_are_inclusive() {
        assert!(ensure_score(0).is_ok());
        assert!(ensure_score(10).is_ok());
        assert!(ensure_score(-1).is_err());
        assert!(ensure_score(11).is_err());
    }
}
