//! Request and response types for the REST API.
//!
//! Field names follow the original HTTP contract (`player1_name` is X,
//! `player2_name` is O), so existing clients keep working.

use serde::{Deserialize, Serialize};
use tictactoe_core::{Game, Symbol, DEFAULT_O_NAME, DEFAULT_X_NAME};
use uuid::Uuid;

/// Body for `POST /games`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateGameRequest {
    /// Name for player 1 (plays as X)
    pub player1_name: Option<String>,
    /// Name for player 2 (plays as O)
    pub player2_name: Option<String>,
}

impl CreateGameRequest {
    /// Player names with defaults applied.
    pub fn into_names(self) -> (String, String) {
        (
            self.player1_name
                .unwrap_or_else(|| DEFAULT_X_NAME.to_string()),
            self.player2_name
                .unwrap_or_else(|| DEFAULT_O_NAME.to_string()),
        )
    }
}

/// Body for `POST /games/{id}/moves`.
///
/// `player` and `player_name` are optional turn assertions; when both
/// are omitted the move is attributed to whoever is on turn. Row and
/// column must land in `[0, 2]`.
#[derive(Debug, Clone, Deserialize)]
pub struct MoveRequest {
    pub row: u8,
    pub col: u8,
    /// Symbol the caller claims is moving
    pub player: Option<Symbol>,
    /// Registered player name the caller claims is moving
    pub player_name: Option<String>,
}

impl MoveRequest {
    /// Whether the coordinates fall inside the 3x3 grid.
    pub fn in_bounds(&self) -> bool {
        self.row <= 2 && self.col <= 2
    }
}

/// Full game state as sent to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameResponse {
    pub game_id: Uuid,
    pub player1_name: String,
    pub player2_name: String,
    pub current_player: Symbol,
    pub current_player_name: String,
    /// 3x3 array of "X"/"O"/null
    pub board: serde_json::Value,
    pub winner: Option<Symbol>,
    pub winner_name: Option<String>,
    pub is_draw: bool,
    pub is_game_over: bool,
}

impl From<&Game> for GameResponse {
    fn from(game: &Game) -> Self {
        Self {
            game_id: game.id(),
            player1_name: game.player_x_name().to_string(),
            player2_name: game.player_o_name().to_string(),
            current_player: game.current_player(),
            current_player_name: game.current_player_name().to_string(),
            board: serde_json::to_value(game.board()).unwrap_or_default(),
            winner: game.winner(),
            winner_name: game.winner_name().map(str::to_string),
            is_draw: game.is_draw(),
            is_game_over: game.is_over(),
        }
    }
}

/// Result of a move attempt plus the updated state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveResponse {
    pub success: bool,
    pub message: String,
    pub game_state: GameResponse,
}

/// Summary for `GET /games/{id}/status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameStatusResponse {
    pub game_id: Uuid,
    /// Display name of the player on turn
    pub current_player: String,
    /// Display name of the winner, if any
    pub winner: Option<String>,
    pub is_draw: bool,
    pub is_game_over: bool,
    pub moves_made: usize,
}

impl From<&Game> for GameStatusResponse {
    fn from(game: &Game) -> Self {
        Self {
            game_id: game.id(),
            current_player: game.current_player_name().to_string(),
            winner: game.winner_name().map(str::to_string),
            is_draw: game.is_draw(),
            is_game_over: game.is_over(),
            moves_made: game.moves_made(),
        }
    }
}

/// Structured error body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_defaults() {
        let request: CreateGameRequest = serde_json::from_str("{}").unwrap();
        let (x, o) = request.into_names();
        assert_eq!(x, "Player X");
        assert_eq!(o, "Player O");
    }

    #[test]
    fn test_move_request_bounds() {
        let request: MoveRequest = serde_json::from_str(r#"{"row": 2, "col": 0}"#).unwrap();
        assert!(request.in_bounds());
        assert!(request.player.is_none());
        assert!(request.player_name.is_none());

        let request: MoveRequest = serde_json::from_str(r#"{"row": 5, "col": 0}"#).unwrap();
        assert!(!request.in_bounds());
    }

    #[test]
    fn test_game_response_shape() {
        let mut game = Game::with_players("Alice", "Bob");
        game.make_move(1, 1);

        let response = GameResponse::from(&game);
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["player1_name"], "Alice");
        assert_eq!(value["current_player"], "O");
        assert_eq!(value["current_player_name"], "Bob");
        assert_eq!(value["board"][1][1], "X");
        assert_eq!(value["winner"], serde_json::Value::Null);
        assert_eq!(value["is_game_over"], false);
    }
}
