//! Board image rendering.
//!
//! Rendering is a reporting side effect: it runs on a [`BoardSnapshot`]
//! taken after the game lock is released, and a failure never touches the
//! game itself.

use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use derive_more::{Display, Error};
use std::path::PathBuf;
use tictactoe_engine::{Board, GameId, GameState, Line, Mark, Position, Square};
use tracing::{debug, info, instrument, warn};

/// Everything a renderer needs to draw one board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardSnapshot {
    /// Game the board belongs to.
    pub game_id: GameId,
    /// Board contents.
    pub board: Board,
    /// Line to strike through, if the game was won.
    pub winning_line: Option<Line>,
}

impl BoardSnapshot {
    /// Captures the renderable parts of a game.
    pub fn of(state: &GameState) -> Self {
        Self {
            game_id: state.id(),
            board: state.board().clone(),
            winning_line: state.status().win().map(|win| win.line),
        }
    }
}

/// Encoded image of a board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedBoard {
    mime: &'static str,
    bytes: Vec<u8>,
}

impl RenderedBoard {
    /// Wraps encoded image bytes.
    pub fn new(mime: &'static str, bytes: Vec<u8>) -> Self {
        Self { mime, bytes }
    }

    /// MIME type of the encoded image.
    pub fn mime(&self) -> &'static str {
        self.mime
    }

    /// Encoded image bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consumes the image, returning its bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Formats the image as a `data:` URL with a base64 payload.
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime, STANDARD.encode(&self.bytes))
    }
}

/// Image generation or export failure.
#[derive(Debug, Clone, Display, Error)]
#[display("Render error: {} at {}:{}", message, file, line)]
pub struct RenderError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl RenderError {
    /// Creates a new render error with caller location tracking.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

impl From<std::io::Error> for RenderError {
    #[track_caller]
    fn from(err: std::io::Error) -> Self {
        Self::new(format!("I/O error: {}", err))
    }
}

/// Produces an image of a board.
#[async_trait]
pub trait BoardRenderer: Send + Sync {
    /// Renders the snapshot.
    async fn render(&self, snapshot: &BoardSnapshot) -> Result<RenderedBoard, RenderError>;
}

/// Renders boards as SVG documents.
#[derive(Debug, Clone)]
pub struct SvgRenderer {
    cell_size: u32,
    export_dir: Option<PathBuf>,
}

impl SvgRenderer {
    /// MIME type of the produced images.
    pub const MIME: &'static str = "image/svg+xml";

    /// Smallest supported cell size, in pixels.
    pub const MIN_CELL_SIZE: u32 = 10;

    /// Largest supported cell size, in pixels.
    pub const MAX_CELL_SIZE: u32 = 4096;

    /// Creates a renderer drawing cells `cell_size` pixels wide.
    ///
    /// The size is clamped to `MIN_CELL_SIZE..=MAX_CELL_SIZE`.
    pub fn new(cell_size: u32) -> Self {
        Self {
            cell_size: cell_size.clamp(Self::MIN_CELL_SIZE, Self::MAX_CELL_SIZE),
            export_dir: None,
        }
    }

    /// Also writes every render to `<dir>/game_<id>.svg`.
    pub fn with_export_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.export_dir = Some(dir.into());
        self
    }

    /// Path a game's image is exported to, if exporting is enabled.
    pub fn export_path(&self, game_id: GameId) -> Option<PathBuf> {
        self.export_dir
            .as_ref()
            .map(|dir| dir.join(format!("game_{}.svg", game_id)))
    }

    /// Builds the SVG document for a board.
    pub fn to_svg(&self, snapshot: &BoardSnapshot) -> String {
        let cell = self.cell_size;
        let size = cell * 3;
        let pad = cell / 5;
        let stroke = (cell / 12).max(2);

        let mut svg = format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{size}\" height=\"{size}\" viewBox=\"0 0 {size} {size}\">\n"
        );
        svg.push_str(&format!(
            "<rect width=\"{size}\" height=\"{size}\" fill=\"#ffffff\"/>\n"
        ));

        for i in 1..3 {
            let at = cell * i;
            svg.push_str(&format!(
                "<line x1=\"{at}\" y1=\"0\" x2=\"{at}\" y2=\"{size}\" stroke=\"#222222\" stroke-width=\"{stroke}\"/>\n"
            ));
            svg.push_str(&format!(
                "<line x1=\"0\" y1=\"{at}\" x2=\"{size}\" y2=\"{at}\" stroke=\"#222222\" stroke-width=\"{stroke}\"/>\n"
            ));
        }

        for pos in Position::ALL {
            let x = pos.col() as u32 * cell;
            let y = pos.row() as u32 * cell;
            match snapshot.board.get(pos) {
                Square::Empty => {}
                Square::Occupied(Mark::X) => {
                    let (x1, y1, x2, y2) = (x + pad, y + pad, x + cell - pad, y + cell - pad);
                    svg.push_str(&format!(
                        "<line x1=\"{x1}\" y1=\"{y1}\" x2=\"{x2}\" y2=\"{y2}\" stroke=\"#c0392b\" stroke-width=\"{stroke}\" stroke-linecap=\"round\"/>\n"
                    ));
                    svg.push_str(&format!(
                        "<line x1=\"{x2}\" y1=\"{y1}\" x2=\"{x1}\" y2=\"{y2}\" stroke=\"#c0392b\" stroke-width=\"{stroke}\" stroke-linecap=\"round\"/>\n"
                    ));
                }
                Square::Occupied(Mark::O) => {
                    let (cx, cy, r) = (x + cell / 2, y + cell / 2, cell / 2 - pad);
                    svg.push_str(&format!(
                        "<circle cx=\"{cx}\" cy=\"{cy}\" r=\"{r}\" fill=\"none\" stroke=\"#2471a3\" stroke-width=\"{stroke}\"/>\n"
                    ));
                }
            }
        }

        if let Some(line) = snapshot.winning_line {
            let [start, _, end] = line.positions();
            let center = |pos: Position| {
                (
                    pos.col() as u32 * cell + cell / 2,
                    pos.row() as u32 * cell + cell / 2,
                )
            };
            let ((x1, y1), (x2, y2)) = (center(start), center(end));
            svg.push_str(&format!(
                "<line class=\"win {line}\" x1=\"{x1}\" y1=\"{y1}\" x2=\"{x2}\" y2=\"{y2}\" stroke=\"#27ae60\" stroke-width=\"{}\" stroke-linecap=\"round\" opacity=\"0.8\"/>\n",
                stroke * 2
            ));
        }

        svg.push_str("</svg>\n");
        svg
    }
}

impl Default for SvgRenderer {
    fn default() -> Self {
        Self::new(100)
    }
}

#[async_trait]
impl BoardRenderer for SvgRenderer {
    #[instrument(skip(self, snapshot), fields(game_id = %snapshot.game_id))]
    async fn render(&self, snapshot: &BoardSnapshot) -> Result<RenderedBoard, RenderError> {
        let svg = self.to_svg(snapshot);
        debug!(bytes = svg.len(), "Rendered board");

        if let Some(path) = self.export_path(snapshot.game_id) {
            if let Some(dir) = path.parent() {
                tokio::fs::create_dir_all(dir).await.map_err(|e| {
                    warn!(dir = %dir.display(), error = %e, "Failed to create export directory");
                    RenderError::new(format!("Failed to create {}: {}", dir.display(), e))
                })?;
            }
            tokio::fs::write(&path, svg.as_bytes()).await.map_err(|e| {
                warn!(path = %path.display(), error = %e, "Failed to export board image");
                RenderError::new(format!("Failed to write {}: {}", path.display(), e))
            })?;
            info!(path = %path.display(), "Exported board image");
        }

        Ok(RenderedBoard::new(Self::MIME, svg.into_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(moves: &[usize]) -> BoardSnapshot {
        let mut state = GameState::new(GameId::new(3), Mark::X);
        for &idx in moves {
            state.apply_move(idx).unwrap();
        }
        BoardSnapshot::of(&state)
    }

    #[test]
    fn test_empty_board_has_grid_only() {
        let svg = SvgRenderer::default().to_svg(&snapshot(&[]));
        assert!(svg.starts_with("<svg"));
        assert_eq!(svg.matches("<line").count(), 4);
        assert!(!svg.contains("<circle"));
    }

    #[test]
    fn test_marks_are_drawn() {
        let svg = SvgRenderer::new(60).to_svg(&snapshot(&[4, 0]));
        // grid + two strokes for the X
        assert_eq!(svg.matches("<line").count(), 6);
        assert_eq!(svg.matches("<circle").count(), 1);
        assert!(svg.contains("width=\"180\""));
    }

    #[test]
    fn test_winning_line_is_struck() {
        let snap = snapshot(&[0, 3, 1, 4, 2]);
        assert_eq!(snap.winning_line, Some(Line::Row0));
        let svg = SvgRenderer::new(100).to_svg(&snap);
        assert!(svg.contains("class=\"win row0\" x1=\"50\" y1=\"50\" x2=\"250\" y2=\"50\""));
    }

    #[test]
    fn test_cell_size_is_clamped() {
        let svg = SvgRenderer::new(2_000_000_000).to_svg(&snapshot(&[4]));
        let side = SvgRenderer::MAX_CELL_SIZE * 3;
        assert!(svg.contains(&format!("width=\"{side}\"")));

        let svg = SvgRenderer::new(1).to_svg(&snapshot(&[]));
        assert!(svg.contains("width=\"30\""));
    }

    #[test]
    fn test_data_url() {
        let image = RenderedBoard::new("image/svg+xml", b"<svg/>".to_vec());
        assert_eq!(image.to_data_url(), "data:image/svg+xml;base64,PHN2Zy8+");
    }
}
