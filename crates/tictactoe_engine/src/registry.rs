//! In-memory registry of live games.

use crate::game::{GameId, GameState};
use crate::types::Mark;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, instrument, warn};

/// Errors returned by registry lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum RegistryError {
    /// No live game has this identifier.
    #[display("Game {} not found", _0)]
    NotFound(GameId),
}

impl std::error::Error for RegistryError {}

/// Exclusive-access handle to one game.
///
/// Every operation on a game goes through [`GameHandle::with`], which holds
/// the game's own lock for the duration of the closure. Operations on
/// different games never contend.
#[derive(Debug, Clone)]
pub struct GameHandle {
    id: GameId,
    state: Arc<Mutex<GameState>>,
}

impl GameHandle {
    fn new(state: GameState) -> Self {
        Self {
            id: state.id(),
            state: Arc::new(Mutex::new(state)),
        }
    }

    /// Returns the game identifier.
    pub fn id(&self) -> GameId {
        self.id
    }

    /// Runs `f` with exclusive access to the game state.
    #[instrument(skip(self, f), fields(game_id = %self.id))]
    pub fn with<T>(&self, f: impl FnOnce(&mut GameState) -> T) -> T {
        let mut guard = lock(&self.state);
        f(&mut guard)
    }

    /// Returns a copy of the current state.
    pub fn snapshot(&self) -> GameState {
        self.with(|state| state.clone())
    }
}

/// Owns every live game, keyed by identifier.
#[derive(Debug)]
pub struct GameRegistry {
    games: Mutex<HashMap<GameId, GameHandle>>,
    next_id: AtomicU64,
}

impl GameRegistry {
    /// Creates an empty registry. Identifiers start at 1.
    #[instrument]
    pub fn new() -> Self {
        info!("Creating game registry");
        Self {
            games: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Creates and stores a new game.
    ///
    /// When `first_player` is `None` the first mover is picked by coin flip.
    #[instrument(skip(self))]
    pub fn create_game(&self, first_player: Option<Mark>) -> GameHandle {
        let id = GameId::new(self.next_id.fetch_add(1, Ordering::Relaxed));
        let first_player = first_player.unwrap_or_else(Mark::coin_flip);
        let handle = GameHandle::new(GameState::new(id, first_player));

        lock(&self.games).insert(id, handle.clone());
        info!(game_id = %id, %first_player, "Created new game");
        handle
    }

    /// Looks up a game by identifier.
    #[instrument(skip(self))]
    pub fn find(&self, id: GameId) -> Result<GameHandle, RegistryError> {
        lock(&self.games).get(&id).cloned().ok_or_else(|| {
            debug!(game_id = %id, "Game not found");
            RegistryError::NotFound(id)
        })
    }

    /// Removes a game, returning its final state.
    #[instrument(skip(self))]
    pub fn remove(&self, id: GameId) -> Result<GameState, RegistryError> {
        let handle = lock(&self.games).remove(&id).ok_or_else(|| {
            warn!(game_id = %id, "Attempted to remove unknown game");
            RegistryError::NotFound(id)
        })?;
        info!(game_id = %id, "Removed game");
        Ok(handle.snapshot())
    }

    /// Number of live games.
    pub fn len(&self) -> usize {
        lock(&self.games).len()
    }

    /// True when no games are live.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Identifiers of all live games, ascending.
    pub fn ids(&self) -> Vec<GameId> {
        let mut ids: Vec<_> = lock(&self.games).keys().copied().collect();
        ids.sort();
        ids
    }
}

impl Default for GameRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// A panic while holding a lock cannot leave a game half-updated: every
// mutation validates before it writes.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::GameStatus;

    #[test]
    fn test_ids_are_sequential() {
        let registry = GameRegistry::new();
        let a = registry.create_game(Some(Mark::X));
        let b = registry.create_game(Some(Mark::O));
        assert_eq!(a.id(), GameId::new(1));
        assert_eq!(b.id(), GameId::new(2));
        assert_eq!(registry.ids(), vec![a.id(), b.id()]);
    }

    #[test]
    fn test_handle_shares_state_with_registry() {
        let registry = GameRegistry::new();
        let handle = registry.create_game(Some(Mark::X));
        handle.with(|game| game.apply_move(4).map(|_| ())).unwrap();

        let found = registry.find(handle.id()).unwrap();
        assert_eq!(found.snapshot().board().occupied_count(), 1);
    }

    #[test]
    fn test_remove_returns_final_state() {
        let registry = GameRegistry::new();
        let handle = registry.create_game(None);
        handle.with(|game| {
            game.end();
        });

        let removed = registry.remove(handle.id()).unwrap();
        assert_eq!(removed.status(), &GameStatus::Ended);
        assert!(registry.is_empty());
        assert_eq!(
            registry.remove(handle.id()).unwrap_err(),
            RegistryError::NotFound(handle.id())
        );
    }
}
