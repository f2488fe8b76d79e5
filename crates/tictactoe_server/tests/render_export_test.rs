//! Tests for exporting rendered boards to disk.

use tictactoe_engine::{GameId, GameState, Mark};
use tictactoe_server::{BoardRenderer, BoardSnapshot, SvgRenderer};

fn won_game() -> GameState {
    let mut state = GameState::new(GameId::new(5), Mark::O);
    for idx in [2, 0, 4, 1, 6] {
        state.apply_move(idx).unwrap();
    }
    state
}

#[tokio::test]
async fn test_export_writes_game_file() {
    let dir = tempfile::tempdir().unwrap();
    let renderer = SvgRenderer::new(50).with_export_dir(dir.path().join("public"));

    let image = renderer.render(&BoardSnapshot::of(&won_game())).await.unwrap();

    let path = dir.path().join("public").join("game_5.svg");
    assert_eq!(renderer.export_path(GameId::new(5)), Some(path.clone()));
    let written = std::fs::read(&path).unwrap();
    assert_eq!(written, image.bytes());
    assert!(String::from_utf8(written).unwrap().contains("class=\"win diag-anti\""));
}

#[tokio::test]
async fn test_export_failure_is_a_render_error() {
    // A regular file cannot be used as the export directory.
    let file = tempfile::NamedTempFile::new().unwrap();
    let renderer = SvgRenderer::default().with_export_dir(file.path());

    let err = renderer
        .render(&BoardSnapshot::of(&won_game()))
        .await
        .unwrap_err();
    assert!(err.message.contains("Failed to"));
}

#[tokio::test]
async fn test_no_export_by_default() {
    let renderer = SvgRenderer::default();
    assert_eq!(renderer.export_path(GameId::new(1)), None);
    let image = renderer.render(&BoardSnapshot::of(&won_game())).await.unwrap();
    assert_eq!(image.mime(), "image/svg+xml");
}
