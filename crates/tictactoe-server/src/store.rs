//! In-memory game store.
//!
//! Maps game ids to live [`Game`] instances. The map itself is
//! concurrency-safe; each game is mutated under the map's per-entry
//! guard, so the engine never needs internal locking.

use dashmap::DashMap;
use thiserror::Error;
use tictactoe_core::Game;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Game with ID {0} not found")]
    NotFound(Uuid),
}

/// All games currently held in memory.
///
/// Games live for the process lifetime unless deleted; there is no
/// persistence layer behind this.
#[derive(Default)]
pub struct GameStore {
    games: DashMap<Uuid, Game>,
}

impl GameStore {
    pub fn new() -> Self {
        Self {
            games: DashMap::new(),
        }
    }

    /// Create a game with the given player names and return a snapshot.
    pub fn create(&self, player_x_name: String, player_o_name: String) -> Game {
        let game = Game::with_players(player_x_name, player_o_name);
        let snapshot = game.clone();
        self.games.insert(game.id(), game);
        snapshot
    }

    /// Snapshot of a single game.
    pub fn snapshot(&self, id: Uuid) -> Result<Game, StoreError> {
        self.games
            .get(&id)
            .map(|game| game.value().clone())
            .ok_or(StoreError::NotFound(id))
    }

    /// Run a mutation against a game while holding its entry guard,
    /// returning the closure's result plus a post-mutation snapshot.
    pub fn with_game_mut<T>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut Game) -> T,
    ) -> Result<(T, Game), StoreError> {
        let mut game = self.games.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        let result = f(&mut game);
        Ok((result, game.clone()))
    }

    /// Remove a game. Errors if the id is unknown.
    pub fn remove(&self, id: Uuid) -> Result<(), StoreError> {
        self.games
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound(id))
    }

    /// Snapshots of every live game.
    pub fn list(&self) -> Vec<Game> {
        self.games.iter().map(|entry| entry.value().clone()).collect()
    }

    /// Number of live games.
    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }
}
