//! Sparse neighborhoods used as feature vectors when matching patches.

use crate::img_pyramid::{wrapped_pixel, ColorImage};
use std::ops::Sub;

/// Color channels per sample
pub const CHANNELS: usize = 3;
/// Number of samples in a neighborhood
pub const VN: usize = 12;
/// Length of the flattened feature vector
pub const DIMENSIONS: usize = CHANNELS * VN;

const D_NUM: usize = 4;
const M_NUM: usize = 3;

/// The four diagonal directions the stencil is built from.
const DELTAS: [(i32, i32); D_NUM] = [(-1, -1), (1, -1), (-1, 1), (1, 1)];

/// Rows of a 2x2 matrix applied to each delta, the result being added to the
/// delta itself: identity (no extension), then extension along x, then along y.
const MULTIPLIERS: [[(i32, i32); 2]; M_NUM] = [
    [(0, 0), (0, 0)],
    [(1, 0), (0, 0)],
    [(0, 0), (0, 1)],
];

/// Sample offsets of a neighborhood, in units of the level spacing.
///
/// Entry `j + M_NUM * i` is `DELTAS[i] + MULTIPLIERS[j] * DELTAS[i]`.
pub const STENCIL: [(i32, i32); VN] = [
    (-1, -1),
    (-2, -1),
    (-1, -2),
    (1, -1),
    (2, -1),
    (1, -2),
    (-1, 1),
    (-2, 1),
    (-1, 2),
    (1, 1),
    (2, 1),
    (1, 2),
];

/// A fixed size feature vector of `VN` colors gathered around a pixel.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Neighborhood {
    pixels: [f32; DIMENSIONS],
}

impl Default for Neighborhood {
    fn default() -> Self {
        Self {
            pixels: [0.0; DIMENSIONS],
        }
    }
}

impl Neighborhood {
    /// Builds a neighborhood by calling `sample` with every stencil offset.
    #[inline]
    pub fn gather<F: FnMut(i32, i32) -> [f32; CHANNELS]>(mut sample: F) -> Self {
        let mut n = Self::default();
        for (index, &(dx, dy)) in STENCIL.iter().enumerate() {
            n.set_pixel(index, sample(dx, dy));
        }
        n
    }

    /// Gathers the neighborhood of `(x, y)` in an exemplar stack level, with
    /// stencil offsets scaled by `spacing`.
    pub fn from_image(img: &ColorImage, spacing: i32, x: i32, y: i32) -> Self {
        Self::gather(|dx, dy| wrapped_pixel(img, x + dx * spacing, y + dy * spacing))
    }

    #[inline]
    pub fn pixel(&self, index: usize) -> [f32; CHANNELS] {
        let i = index * CHANNELS;
        [self.pixels[i], self.pixels[i + 1], self.pixels[i + 2]]
    }

    #[inline]
    pub fn set_pixel(&mut self, index: usize, color: [f32; CHANNELS]) {
        let i = index * CHANNELS;
        self.pixels[i..i + CHANNELS].copy_from_slice(&color);
    }

    pub fn sq_length(&self) -> f32 {
        self.pixels.iter().map(|v| v * v).sum()
    }

    /// Squared euclidean distance, same as `(*self - *other).sq_length()`
    /// without the temporary.
    #[inline]
    pub fn distance_sq(&self, other: &Self) -> f32 {
        self.pixels
            .iter()
            .zip(other.pixels.iter())
            .map(|(a, b)| (a - b) * (a - b))
            .sum()
    }

    pub(crate) fn is_finite(&self) -> bool {
        self.pixels.iter().all(|v| v.is_finite())
    }

    #[inline]
    pub(crate) fn component(&self, index: usize) -> f32 {
        self.pixels[index]
    }

    #[inline]
    pub(crate) fn component_mut(&mut self, index: usize) -> &mut f32 {
        &mut self.pixels[index]
    }
}

impl Sub for Neighborhood {
    type Output = Self;

    fn sub(mut self, rhs: Self) -> Self {
        for (a, b) in self.pixels.iter_mut().zip(rhs.pixels.iter()) {
            *a -= b;
        }
        self
    }
}
