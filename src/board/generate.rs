//! Puzzle generation
//!
//! Builds the piece set for a grid and picks a fresh picture for the session.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::piece::{GridConfig, Piece};
use crate::catalog::Theme;
use crate::consts::{IMAGE_BASE_SIZE, IMAGE_BASE_URL, IMAGE_SEED_LEN};

const SEED_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Addressable picture for one puzzle session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef {
    pub seed: String,
    pub width: u32,
    pub height: u32,
    pub url: String,
}

impl ImageRef {
    /// Derive a picture reference from a random seed, the theme and the grid aspect
    pub fn new(theme: Theme, grid: &GridConfig, seed: String) -> Self {
        let (width, height) = image_dimensions(grid);
        let url = format!(
            "{IMAGE_BASE_URL}/seed/{seed}{}/{width}/{height}",
            theme.as_str()
        );
        Self {
            seed,
            width,
            height,
            url,
        }
    }

    pub fn random(theme: Theme, grid: &GridConfig, rng: &mut impl Rng) -> Self {
        Self::new(theme, grid, random_seed(rng))
    }
}

/// Pixel size of the picture, long side fixed at the base size
pub fn image_dimensions(grid: &GridConfig) -> (u32, u32) {
    let aspect = grid.aspect();
    let base = IMAGE_BASE_SIZE as f32;
    if aspect >= 1.0 {
        (IMAGE_BASE_SIZE, (base / aspect).round() as u32)
    } else {
        ((base * aspect).round() as u32, IMAGE_BASE_SIZE)
    }
}

fn random_seed(rng: &mut impl Rng) -> String {
    (0..IMAGE_SEED_LEN)
        .map(|_| SEED_ALPHABET[rng.random_range(0..SEED_ALPHABET.len())] as char)
        .collect()
}

/// Create every piece of the grid in row-major order.
///
/// Start positions are uniform over the area that keeps each piece fully on
/// the board. Pieces may overlap.
pub fn generate_pieces(grid: &GridConfig, rng: &mut impl Rng) -> Vec<Piece> {
    let size = grid.piece_size();
    let max = grid.max_position();

    let mut pieces = Vec::with_capacity(grid.total_pieces() as usize);
    for row in 0..grid.rows {
        for col in 0..grid.cols {
            let id = row * grid.cols + col;
            let correct = Vec2::new(col as f32 * size.x, row as f32 * size.y);
            let start = Vec2::new(rng.random::<f32>() * max.x, rng.random::<f32>() * max.y);
            pieces.push(Piece::new(id, correct, start));
        }
    }
    pieces
}
