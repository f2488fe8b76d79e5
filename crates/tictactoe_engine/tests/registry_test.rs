//! Tests for the in-memory game registry.

use std::collections::HashSet;
use std::sync::Arc;
use std::thread;
use tictactoe_engine::{GameId, GameRegistry, GameStatus, Mark, RegistryError};

#[test]
fn test_find_unknown_game() {
    let registry = GameRegistry::new();
    assert_eq!(
        registry.find(GameId::new(42)).unwrap_err(),
        RegistryError::NotFound(GameId::new(42))
    );
}

#[test]
fn test_two_games_are_independent() {
    let registry = GameRegistry::new();
    let a = registry.create_game(None);
    let b = registry.create_game(None);
    assert_ne!(a.id(), b.id());

    assert_eq!(registry.find(a.id()).unwrap().id(), a.id());
    assert_eq!(registry.find(b.id()).unwrap().id(), b.id());

    registry.remove(a.id()).unwrap();
    assert!(registry.find(a.id()).is_err());

    let b_state = registry.find(b.id()).unwrap().snapshot();
    assert_eq!(b_state.status(), &GameStatus::InProgress);
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_explicit_first_player() {
    let registry = GameRegistry::new();
    let game = registry.create_game(Some(Mark::O)).snapshot();
    assert_eq!(game.first_player(), Mark::O);
    assert_eq!(game.second_player(), Mark::X);
    assert_eq!(game.current_turn(), Mark::O);
}

#[test]
fn test_coin_flip_produces_both_marks() {
    let registry = GameRegistry::new();
    let firsts: HashSet<Mark> = (0..200)
        .map(|_| registry.create_game(None).snapshot().first_player())
        .collect();
    assert_eq!(firsts.len(), 2);
}

#[test]
fn test_concurrent_creation_yields_unique_ids() {
    let registry = Arc::new(GameRegistry::new());

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let registry = Arc::clone(&registry);
            thread::spawn(move || {
                (0..50)
                    .map(|_| registry.create_game(None).id())
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let mut ids = HashSet::new();
    for handle in handles {
        for id in handle.join().unwrap() {
            assert!(ids.insert(id), "duplicate id {id}");
        }
    }
    assert_eq!(ids.len(), 400);
    assert_eq!(registry.len(), 400);
}

#[test]
fn test_concurrent_moves_on_one_game_are_serialized() {
    let registry = Arc::new(GameRegistry::new());
    let game = registry.create_game(Some(Mark::X));

    // Every thread races for the same square; exactly one may win it.
    let winners: usize = (0..8)
        .map(|_| {
            let game = game.clone();
            thread::spawn(move || game.with(|state| state.apply_move(4).is_ok()))
        })
        .collect::<Vec<_>>()
        .into_iter()
        .map(|h| usize::from(h.join().unwrap()))
        .sum();

    assert_eq!(winners, 1);
    assert_eq!(game.snapshot().board().occupied_count(), 1);
}
