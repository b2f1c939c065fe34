/// Errors surfaced by the engine's public API.
///
/// Degraded game outcomes (a lost position, no principal variation found)
/// are not errors; those resolve through the search fallback policy.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("no possible AI moves")]
    NoAvailableMoves,

    #[error("illegal move in column {0}")]
    IllegalMove(usize),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_available_moves_display() {
        assert_eq!(
            EngineError::NoAvailableMoves.to_string(),
            "no possible AI moves"
        );
    }

    #[test]
    fn test_illegal_move_display() {
        assert_eq!(
            EngineError::IllegalMove(9).to_string(),
            "illegal move in column 9"
        );
    }
}
