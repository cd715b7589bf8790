// BEGIN - Embark standard lints v0.4
// do not change or add/remove here, but one can add exceptions after this section
// for more info see: <https://github.com/EmbarkStudios/rust-ecosystem/issues/59>
#![deny(unsafe_code)]
#![warn(
    clippy::all,
    clippy::await_holding_lock,
    clippy::char_lit_as_u8,
    clippy::checked_conversions,
    clippy::dbg_macro,
    clippy::debug_assert_with_mut_call,
    clippy::doc_markdown,
    clippy::empty_enum,
    clippy::enum_glob_use,
    clippy::exit,
    clippy::expl_impl_clone_on_copy,
    clippy::explicit_deref_methods,
    clippy::explicit_into_iter_loop,
    clippy::fallible_impl_from,
    clippy::filter_map_next,
    clippy::float_cmp_const,
    clippy::fn_params_excessive_bools,
    clippy::if_let_mutex,
    clippy::implicit_clone,
    clippy::imprecise_flops,
    clippy::inefficient_to_string,
    clippy::invalid_upcast_comparisons,
    clippy::large_types_passed_by_value,
    clippy::let_unit_value,
    clippy::linkedlist,
    clippy::lossy_float_literal,
    clippy::macro_use_imports,
    clippy::manual_ok_or,
    clippy::map_err_ignore,
    clippy::map_flatten,
    clippy::map_unwrap_or,
    clippy::match_on_vec_items,
    clippy::match_same_arms,
    clippy::match_wildcard_for_single_variants,
    clippy::mem_forget,
    clippy::mismatched_target_os,
    clippy::mut_mut,
    clippy::mutex_integer,
    clippy::needless_borrow,
    clippy::needless_continue,
    clippy::option_option,
    clippy::path_buf_push_overwrite,
    clippy::ptr_as_ptr,
    clippy::ref_option_ref,
    clippy::rest_pat_in_fully_bound_structs,
    clippy::same_functions_in_if_condition,
    clippy::semicolon_if_nothing_returned,
    clippy::string_add_assign,
    clippy::string_add,
    clippy::string_lit_as_bytes,
    clippy::string_to_string,
    clippy::todo,
    clippy::trait_duplication_in_bounds,
    clippy::unimplemented,
    clippy::unnested_or_patterns,
    clippy::unused_self,
    clippy::useless_transmute,
    clippy::verbose_file_reads,
    clippy::zero_sized_map_values,
    future_incompatible,
    nonstandard_style,
    rust_2018_idioms
)]
// END - Embark standard lints v0.4

//! `parallel-texture-synthesis` generates textures from a single exemplar
//! with parallel controllable texture synthesis: a field of exemplar
//! coordinates is grown coarse to fine over an exemplar stack, being upsampled,
//! jittered and corrected against precomputed neighborhood matches at every
//! level.
//!
//! First, you build a `Session` via a `SessionBuilder`, which follows the
//! builder pattern. Calling `build` on the `SessionBuilder` loads the exemplar
//! and checks the parameters.
//!
//! `Session` has a `run()` method that analyzes the exemplar and synthesizes
//! a new image, which is returned as a `GeneratedImage`.
//!
//! ## Usage
//!
//! ```no_run
//! let session = parallel_texture_synthesis::Session::builder()
//!     .seed(10)
//!     .kappa(0.5)
//!     .add_example(&"imgs/1.jpg")
//!     .build().expect("failed to build session");
//!
//! let generated = session.run(None).expect("failed to synthesize");
//! generated.save("my_generated_img.png").expect("failed to save generated image");
//! ```
//!
//! The lower level [`Analyzer`] and [`Synthesizer`] can be driven directly to
//! inspect every synthesis step.
mod analyzer;
mod colorize;
mod errors;
mod img_pyramid;
mod neighborhood;
mod patch_index;
pub mod session;
mod synthesizer;
mod utils;

pub use image;
use std::ops::{Add, Mul, Sub};
use std::path::Path;

pub use analyzer::{gather_neighborhoods, Analysis, Analyzer, KNearest, K};
pub use colorize::{colorize, patch_map};
pub use errors::Error;
pub use img_pyramid::{wrapped_pixel, ColorImage, ExemplarStack, ImagePyramid};
pub use neighborhood::{Neighborhood, DIMENSIONS, STENCIL, VN};
pub use session::{GeneratorProgress, ProgressStat, ProgressUpdate, Session, SessionBuilder};
pub use synthesizer::{JitterPolicy, SynthesisField, SynthesisParams, Synthesizer};
pub use utils::{load_dynamic_image, to_color_image, to_rgb8, ImageSource};

/// Simple dimensions struct
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Dims {
    pub width: u32,
    pub height: u32,
}

impl Dims {
    pub fn square(size: u32) -> Self {
        Self {
            width: size,
            height: size,
        }
    }
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// A coordinate into the exemplar stack.
///
/// Field coordinates are never wrapped when they are offset, every lookup
/// wraps them around the exemplar instead.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    /// Marks an unused k-nearest slot
    pub const SENTINEL: Self = Self { x: -1, y: -1 };

    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn is_sentinel(self) -> bool {
        self == Self::SENTINEL
    }

    /// Wraps the coordinate into `0..width, 0..height`
    #[inline]
    pub fn wrap(self, dims: Dims) -> Self {
        Self {
            x: modulo(self.x, dims.width as i32),
            y: modulo(self.y, dims.height as i32),
        }
    }
}

impl Add for Coord {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Coord {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<i32> for Coord {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: i32) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

/// Euclidean modulo, the result is always in `0..b`
#[inline]
pub fn modulo(a: i32, b: i32) -> i32 {
    let result = a % b;
    if result < 0 {
        result + b
    } else {
        result
    }
}

struct Parameters {
    resize_input: Option<Dims>,
    output_size: Dims,
    jitter_strength: f32,
    jitter_policy: JitterPolicy,
    kappa: f32,
    subpass_grid: u32,
    correction_passes: u32,
    seed: u64,
    max_thread_count: Option<usize>,
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            resize_input: None,
            output_size: Dims::square(512),
            jitter_strength: 25.0,
            jitter_policy: JitterPolicy::default(),
            kappa: 0.2,
            subpass_grid: 2,
            correction_passes: 2,
            seed: 0,
            max_thread_count: None,
        }
    }
}

impl Parameters {
    fn to_synthesis_params(&self) -> SynthesisParams {
        SynthesisParams {
            output_size: self.output_size,
            jitter_strength: self.jitter_strength,
            jitter_policy: self.jitter_policy,
            kappa: self.kappa,
            subpass_grid: self.subpass_grid,
            correction_passes: self.correction_passes,
            seed: self.seed,
            max_thread_count: self.max_thread_count.unwrap_or_else(num_cpus::get),
        }
    }
}

/// An image generated by a `Session::run()`
pub struct GeneratedImage {
    result: image::RgbImage,
    patches: image::RgbImage,
    // (exemplar level, colorized field) of every synthesis step
    steps: Vec<(usize, image::RgbImage)>,
}

impl GeneratedImage {
    pub(crate) fn from_synthesizer(synth: &Synthesizer<'_>) -> Result<Self, Error> {
        let output_size = synth.params().output_size;
        let start_level = synth.start_level();

        let steps = (0..synth.fields().len())
            .map(|step| Ok((start_level - step, to_rgb8(&synth.colorize(step)?))))
            .collect::<Result<Vec<_>, Error>>()?;

        Ok(Self {
            result: crop(&to_rgb8(&synth.result()), output_size),
            patches: crop(&to_rgb8(&synth.result_patches()), output_size),
            steps,
        })
    }

    /// Saves the generated image to the specified path
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        save_image(&self.result, path.as_ref())
    }

    /// Saves the patch map, where the red and green channels hold the
    /// normalized exemplar coordinate each output pixel was copied from
    pub fn save_patches<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        save_image(&self.patches, path.as_ref())
    }

    /// Writes the generated image to the specified stream
    pub fn write<W: std::io::Write>(
        self,
        writer: &mut W,
        fmt: image::ImageOutputFormat,
    ) -> Result<(), Error> {
        let dyn_img = self.into_image();
        Ok(dyn_img.write_to(writer, fmt)?)
    }

    /// Saves debug information: the patch map, and the colorized field of
    /// every synthesis step from the coarsest level to the finest.
    pub fn save_debug<P: AsRef<Path>>(&self, dir: P) -> Result<(), Error> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(&dir)?;

        self.patches.save(&dir.join("patches.png"))?;
        for (step, (level, img)) in self.steps.iter().enumerate() {
            img.save(&dir.join(format!("step_{}_level_{}.png", step, level)))?;
        }

        Ok(())
    }

    /// The patch map of the generated image
    pub fn patches(&self) -> &image::RgbImage {
        &self.patches
    }

    /// The colorized field of every synthesis step, along with the exemplar
    /// level it was synthesized at
    pub fn steps(&self) -> &[(usize, image::RgbImage)] {
        &self.steps
    }

    /// Returns the generated output image
    pub fn into_image(self) -> image::DynamicImage {
        image::DynamicImage::ImageRgb8(self.result)
    }
}

impl AsRef<image::RgbImage> for GeneratedImage {
    fn as_ref(&self) -> &image::RgbImage {
        &self.result
    }
}

fn save_image(img: &image::RgbImage, path: &Path) -> Result<(), Error> {
    if let Some(parent_path) = path.parent() {
        std::fs::create_dir_all(&parent_path)?;
    }

    img.save(&path)?;
    Ok(())
}

// fields are rounded up to whole exemplar tiles, so they can be larger than
// the requested output
fn crop(img: &image::RgbImage, dims: Dims) -> image::RgbImage {
    let width = dims.width.min(img.width());
    let height = dims.height.min(img.height());
    image::RgbImage::from_fn(width, height, |x, y| *img.get_pixel(x, y))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn modulo_is_never_negative() {
        assert_eq!(modulo(-1, 8), 7);
        assert_eq!(modulo(-8, 8), 0);
        assert_eq!(modulo(-17, 8), 7);
        assert_eq!(modulo(9, 8), 1);

        for k in -4..4 {
            assert_eq!(modulo(5 + k * 16, 16), 5);
        }
    }

    #[test]
    fn coord_math() {
        let c = Coord::new(3, -2);
        assert_eq!(c + Coord::new(1, 1), Coord::new(4, -1));
        assert_eq!(c - Coord::new(1, 1), Coord::new(2, -3));
        assert_eq!(c * 4, Coord::new(12, -8));
        assert_eq!(c.wrap(Dims::new(2, 5)), Coord::new(1, 3));

        assert!(Coord::SENTINEL.is_sentinel());
        assert!(!Coord::new(0, -1).is_sentinel());
    }

    #[test]
    fn crop_keeps_top_left() {
        let img = image::RgbImage::from_fn(8, 8, |x, y| image::Rgb([x as u8, y as u8, 0]));

        let cropped = crop(&img, Dims::new(5, 3));
        assert_eq!(cropped.dimensions(), (5, 3));
        assert_eq!(cropped.get_pixel(4, 2), img.get_pixel(4, 2));

        // never grows
        assert_eq!(crop(&img, Dims::square(20)).dimensions(), (8, 8));
    }
}
