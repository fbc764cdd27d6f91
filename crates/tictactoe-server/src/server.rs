//! REST server and request handling.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tictactoe_core::Game;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;
use uuid::Uuid;

use crate::protocol::{
    CreateGameRequest, ErrorResponse, GameResponse, GameStatusResponse, MoveRequest, MoveResponse,
};
use crate::store::GameStore;

/// Server state shared across all requests.
pub struct AppState {
    /// All live games
    pub store: GameStore,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            store: GameStore::new(),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

/// Error shape returned by every handler: status code plus a structured body.
type ApiError = (StatusCode, Json<ErrorResponse>);

fn not_found(id: Uuid) -> ApiError {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse::new(
            "NotFound",
            format!("Game with ID {id} not found"),
        )),
    )
}

/// Build the application router.
///
/// Separated from [`run_server`] so tests can drive the router
/// in-process without binding a socket.
pub fn create_app(state: Arc<AppState>) -> Router {
    // Permissive CORS for the browser frontend
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(health))
        .route("/games", post(create_game).get(list_games))
        .route("/games/:id", get(get_game).delete(delete_game))
        .route("/games/:id/moves", post(make_move))
        .route("/games/:id/reset", post(reset_game))
        .route("/games/:id/board", get(get_board))
        .route("/games/:id/status", get(get_status))
        .layer(cors)
        .with_state(state)
}

/// Bind and serve until the process is stopped.
pub async fn run_server(addr: SocketAddr, state: Arc<AppState>) -> anyhow::Result<()> {
    let app = create_app(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Tic-tac-toe server listening on {}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}

// ==================== Handlers ====================

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "message": "Tic-Tac-Toe Game API is running!",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn create_game(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateGameRequest>,
) -> (StatusCode, Json<GameResponse>) {
    let (player_x_name, player_o_name) = request.into_names();
    let game = state.store.create(player_x_name, player_o_name);
    info!("Created game {}", game.id());
    (StatusCode::CREATED, Json(GameResponse::from(&game)))
}

async fn list_games(State(state): State<Arc<AppState>>) -> Json<Vec<GameResponse>> {
    let games: Vec<GameResponse> = state
        .store
        .list()
        .iter()
        .map(GameResponse::from)
        .collect();
    Json(games)
}

async fn get_game(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<GameResponse>, ApiError> {
    let game = state.store.snapshot(id).map_err(|_| not_found(id))?;
    Ok(Json(GameResponse::from(&game)))
}

async fn make_move(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(request): Json<MoveRequest>,
) -> Result<Json<MoveResponse>, ApiError> {
    if !request.in_bounds() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new(
                "ValidationError",
                "row and col must be between 0 and 2",
            )),
        ));
    }

    let row = request.row as usize;
    let col = request.col as usize;

    let ((success, message), game) = state
        .store
        .with_game_mut(id, |game| {
            let success = if let Some(symbol) = request.player {
                game.make_move_as(row, col, symbol)
            } else if let Some(ref name) = request.player_name {
                game.make_move_by_name(row, col, name)
            } else {
                game.make_move(row, col)
            };
            let message = move_message(game, &request, success);
            (success, message)
        })
        .map_err(|_| not_found(id))?;

    Ok(Json(MoveResponse {
        success,
        message,
        game_state: GameResponse::from(&game),
    }))
}

/// Human-readable outcome of a move attempt.
///
/// The engine only reports success or rejection; the reason is
/// re-derived here by inspecting state in the same order the engine
/// checks its preconditions.
fn move_message(game: &Game, request: &MoveRequest, success: bool) -> String {
    let (row, col) = (request.row as usize, request.col as usize);

    if success {
        let mut message = format!("Move successful at position ({row}, {col})");
        if let Some(winner_name) = game.winner_name() {
            message.push_str(&format!(". {winner_name} wins!"));
        } else if game.is_draw() {
            message.push_str(". Game ends in a draw!");
        }
        return message;
    }

    if game.is_over() {
        "Game is already over".to_string()
    } else if game.cell(row, col).is_some() {
        format!("Position ({row}, {col}) is already occupied")
    } else if let Some(ref name) = request.player_name {
        if name != game.player_x_name() && name != game.player_o_name() {
            format!("No player named '{name}' in this game")
        } else {
            "It's not your turn".to_string()
        }
    } else if request.player.is_some_and(|symbol| symbol != game.current_player()) {
        "It's not your turn".to_string()
    } else {
        "Invalid move".to_string()
    }
}

async fn reset_game(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<GameResponse>, ApiError> {
    let (_, game) = state
        .store
        .with_game_mut(id, |game| game.reset())
        .map_err(|_| not_found(id))?;
    Ok(Json(GameResponse::from(&game)))
}

async fn delete_game(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.store.remove(id).map_err(|_| not_found(id))?;
    info!("Deleted game {}", id);
    Ok(StatusCode::NO_CONTENT)
}

async fn get_board(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let game = state.store.snapshot(id).map_err(|_| not_found(id))?;
    let board = serde_json::to_value(game.board()).map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new("SerializationError", e.to_string())),
        )
    })?;
    Ok(Json(board))
}

async fn get_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<GameStatusResponse>, ApiError> {
    let game = state.store.snapshot(id).map_err(|_| not_found(id))?;
    Ok(Json(GameStatusResponse::from(&game)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Method, Request};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn app() -> Router {
        create_app(Arc::new(AppState::new()))
    }

    fn empty_board() -> Value {
        json!([
            [null, null, null],
            [null, null, null],
            [null, null, null]
        ])
    }

    async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let request = match body {
            Some(body) => Request::builder()
                .method(method)
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn create(app: &Router, body: Value) -> Value {
        let (status, game) = send(app, Method::POST, "/games", Some(body)).await;
        assert_eq!(status, StatusCode::CREATED);
        game
    }

    async fn play(app: &Router, game_id: &str, row: u8, col: u8) -> Value {
        let uri = format!("/games/{game_id}/moves");
        let (status, response) =
            send(app, Method::POST, &uri, Some(json!({"row": row, "col": col}))).await;
        assert_eq!(status, StatusCode::OK);
        response
    }

    #[tokio::test]
    async fn test_health() {
        let app = app();
        let (status, body) = send(&app, Method::GET, "/", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["message"].as_str().unwrap().contains("running"));
    }

    #[tokio::test]
    async fn test_create_game_with_defaults() {
        let app = app();
        let game = create(&app, json!({})).await;

        assert_eq!(game["player1_name"], "Player X");
        assert_eq!(game["player2_name"], "Player O");
        assert_eq!(game["current_player"], "X");
        assert_eq!(game["current_player_name"], "Player X");
        assert_eq!(game["winner"], Value::Null);
        assert_eq!(game["is_game_over"], false);
        assert_eq!(game["board"], empty_board());
    }

    #[tokio::test]
    async fn test_create_and_fetch_game() {
        let app = app();
        let game = create(&app, json!({"player1_name": "Alice", "player2_name": "Bob"})).await;
        let id = game["game_id"].as_str().unwrap();

        let (status, fetched) = send(&app, Method::GET, &format!("/games/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched["player1_name"], "Alice");
        assert_eq!(fetched["game_id"], game["game_id"]);

        let (status, listed) = send(&app, Method::GET, "/games", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(listed.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_game_is_404() {
        let app = app();
        let id = Uuid::new_v4();

        for (method, uri) in [
            (Method::GET, format!("/games/{id}")),
            (Method::DELETE, format!("/games/{id}")),
            (Method::GET, format!("/games/{id}/board")),
            (Method::GET, format!("/games/{id}/status")),
        ] {
            let (status, body) = send(&app, method, &uri, None).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
            assert_eq!(body["error"], "NotFound");
        }

        let (status, _) = send(
            &app,
            Method::POST,
            &format!("/games/{id}/moves"),
            Some(json!({"row": 0, "col": 0})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&app, Method::POST, &format!("/games/{id}/reset"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_move_updates_state() {
        let app = app();
        let game = create(&app, json!({})).await;
        let id = game["game_id"].as_str().unwrap();

        let response = play(&app, id, 0, 0).await;
        assert_eq!(response["success"], true);
        assert!(response["message"]
            .as_str()
            .unwrap()
            .contains("Move successful"));
        assert_eq!(response["game_state"]["board"][0][0], "X");
        assert_eq!(response["game_state"]["current_player"], "O");
    }

    #[tokio::test]
    async fn test_out_of_range_move_is_rejected_at_boundary() {
        let app = app();
        let game = create(&app, json!({})).await;
        let id = game["game_id"].as_str().unwrap();

        let (status, body) = send(
            &app,
            Method::POST,
            &format!("/games/{id}/moves"),
            Some(json!({"row": 5, "col": 5})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "ValidationError");

        // Board untouched
        let (_, board) = send(&app, Method::GET, &format!("/games/{id}/board"), None).await;
        assert_eq!(board, empty_board());
    }

    #[tokio::test]
    async fn test_occupied_cell_message() {
        let app = app();
        let game = create(&app, json!({})).await;
        let id = game["game_id"].as_str().unwrap();

        play(&app, id, 1, 1).await;
        let response = play(&app, id, 1, 1).await;
        assert_eq!(response["success"], false);
        assert!(response["message"]
            .as_str()
            .unwrap()
            .contains("already occupied"));
        assert_eq!(response["game_state"]["board"][1][1], "X");
    }

    #[tokio::test]
    async fn test_wrong_turn_assertion() {
        let app = app();
        let game = create(&app, json!({})).await;
        let id = game["game_id"].as_str().unwrap();

        let (status, response) = send(
            &app,
            Method::POST,
            &format!("/games/{id}/moves"),
            Some(json!({"row": 0, "col": 0, "player": "O"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(response["success"], false);
        assert_eq!(response["message"], "It's not your turn");
        assert_eq!(response["game_state"]["board"][0][0], Value::Null);
    }

    #[tokio::test]
    async fn test_moves_by_player_name() {
        let app = app();
        let game = create(&app, json!({"player1_name": "Alice", "player2_name": "Bob"})).await;
        let id = game["game_id"].as_str().unwrap();
        let uri = format!("/games/{id}/moves");

        let (_, response) = send(
            &app,
            Method::POST,
            &uri,
            Some(json!({"row": 0, "col": 0, "player_name": "Alice"})),
        )
        .await;
        assert_eq!(response["success"], true);
        assert_eq!(response["game_state"]["board"][0][0], "X");

        let (_, response) = send(
            &app,
            Method::POST,
            &uri,
            Some(json!({"row": 1, "col": 1, "player_name": "Carol"})),
        )
        .await;
        assert_eq!(response["success"], false);
        assert!(response["message"].as_str().unwrap().contains("Carol"));
        assert_eq!(response["game_state"]["board"][1][1], Value::Null);
    }

    #[tokio::test]
    async fn test_full_game_to_win() {
        let app = app();
        let game = create(&app, json!({"player1_name": "Alice", "player2_name": "Bob"})).await;
        let id = game["game_id"].as_str().unwrap();

        // X takes the top row, O fills the middle row
        play(&app, id, 0, 0).await;
        play(&app, id, 1, 0).await;
        play(&app, id, 0, 1).await;
        play(&app, id, 1, 1).await;
        let response = play(&app, id, 0, 2).await;

        assert_eq!(response["success"], true);
        assert!(response["message"].as_str().unwrap().contains("Alice wins!"));
        assert_eq!(response["game_state"]["winner"], "X");
        assert_eq!(response["game_state"]["winner_name"], "Alice");
        assert_eq!(response["game_state"]["is_game_over"], true);
        assert_eq!(response["game_state"]["is_draw"], false);

        // Any further move is refused
        let response = play(&app, id, 2, 2).await;
        assert_eq!(response["success"], false);
        assert_eq!(response["message"], "Game is already over");

        // Status endpoint reflects the result
        let (_, status_body) =
            send(&app, Method::GET, &format!("/games/{id}/status"), None).await;
        assert_eq!(status_body["winner"], "Alice");
        assert_eq!(status_body["is_game_over"], true);
        assert_eq!(status_body["moves_made"], 5);
    }

    #[tokio::test]
    async fn test_reset_keeps_names_and_clears_board() {
        let app = app();
        let game = create(&app, json!({"player1_name": "Alice", "player2_name": "Bob"})).await;
        let id = game["game_id"].as_str().unwrap();

        play(&app, id, 0, 0).await;
        play(&app, id, 1, 1).await;

        let (status, reset) = send(&app, Method::POST, &format!("/games/{id}/reset"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(reset["game_id"], game["game_id"]);
        assert_eq!(reset["player1_name"], "Alice");
        assert_eq!(reset["player2_name"], "Bob");
        assert_eq!(reset["current_player"], "X");
        assert_eq!(reset["board"], empty_board());
        assert_eq!(reset["is_game_over"], false);
    }

    #[tokio::test]
    async fn test_delete_game() {
        let app = app();
        let game = create(&app, json!({})).await;
        let id = game["game_id"].as_str().unwrap();

        let (status, _) = send(&app, Method::DELETE, &format!("/games/{id}"), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = send(&app, Method::GET, &format!("/games/{id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (_, listed) = send(&app, Method::GET, "/games", None).await;
        assert_eq!(listed.as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_board_endpoint() {
        let app = app();
        let game = create(&app, json!({})).await;
        let id = game["game_id"].as_str().unwrap();

        play(&app, id, 2, 0).await;
        let (status, board) = send(&app, Method::GET, &format!("/games/{id}/board"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(board[2][0], "X");
        assert_eq!(board[0][0], Value::Null);
    }
}
