//! # Procedural Image Generation
//!
//! Produces the random content the catalog is seeded with: rectangles that stay
//! inside a given area, hex fill colors, and tag subsets drawn from the vocabulary.
//!
//! Every function takes the random source explicitly so callers can use
//! `rand::thread_rng()` in the server and a seeded `StdRng` in tests.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::common::messages::{Image, Rectangle};

/// Generate a rectangle that lies fully inside a `max_width` × `max_height` area.
///
/// Width and height are drawn first (each at least 1), then the position is
/// drawn from the range that keeps the far edges inside the area.
///
/// # Arguments
/// - `rng`: Random source
/// - `max_width`: Width of the drawing area (values below 1 are treated as 1)
/// - `max_height`: Height of the drawing area (values below 1 are treated as 1)
///
/// # Example
/// ```ignore
/// let rect = random_rectangle(&mut rand::thread_rng(), 120, 120);
/// assert!(rect.fits_within(120, 120));
/// ```
pub fn random_rectangle<R: Rng + ?Sized>(rng: &mut R, max_width: i64, max_height: i64) -> Rectangle {
    let max_width = max_width.max(1);
    let max_height = max_height.max(1);

    let width = rng.gen_range(1..=max_width);
    let height = rng.gen_range(1..=max_height);
    let x = rng.gen_range(0..=max_width - width);
    let y = rng.gen_range(0..=max_height - height);

    Rectangle {
        x,
        y,
        width,
        height,
        fill: random_fill(rng),
    }
}

/// Uniform 24-bit RGB color as `#rrggbb` (lowercase).
pub fn random_fill<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!("#{:06x}", rng.gen_range(0..=0xFF_FFFFu32))
}

/// Pick `count` distinct tags uniformly at random, without replacement.
///
/// Returns fewer than `count` tags only if the vocabulary itself is smaller.
pub fn random_tags<R: Rng + ?Sized>(rng: &mut R, vocabulary: &[String], count: usize) -> Vec<String> {
    vocabulary.choose_multiple(rng, count).cloned().collect()
}

/// Generate a full-area image with `n_rectangles` random rectangles on it.
pub fn random_image<R: Rng + ?Sized>(rng: &mut R, width: i64, height: i64, n_rectangles: usize) -> Image {
    let rectangles = (0..n_rectangles)
        .map(|_| random_rectangle(rng, width, height))
        .collect();

    Image {
        width,
        height,
        rectangles,
    }
}
