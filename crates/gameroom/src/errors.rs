use engine::EngineError;

/// Wire-facing error taxonomy (§7 classes 1–4). `Turn`/`State` wraps an
/// [`EngineError`] so its wire code is reused rather than duplicated.
#[derive(Debug, Clone)]
pub enum RoomError {
    InvalidFormat(String),
    NotAuthorized,
    Turn(EngineError),
    GameNotFound,
    PlayerNotFound,
}

impl RoomError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidFormat(_) => "invalid_format",
            Self::NotAuthorized => "not_authorized",
            Self::Turn(e) => e.code(),
            Self::GameNotFound => "game_not_found",
            Self::PlayerNotFound => "player_not_found",
        }
    }

    pub fn message(&self) -> String {
        match self {
            Self::InvalidFormat(reason) => reason.clone(),
            Self::NotAuthorized => "observers cannot act".to_string(),
            Self::Turn(e) => e.to_string(),
            Self::GameNotFound => "game not found".to_string(),
            Self::PlayerNotFound => "player not found".to_string(),
        }
    }
}

impl From<EngineError> for RoomError {
    fn from(e: EngineError) -> Self {
        Self::Turn(e)
    }
}

impl std::fmt::Display for RoomError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}: {}", self.code(), self.message())
    }
}

impl std::error::Error for RoomError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_error_carries_its_own_wire_code() {
        let err = RoomError::from(EngineError::NotYourTurn);
        assert_eq!(err.code(), "not_your_turn");
    }
}
