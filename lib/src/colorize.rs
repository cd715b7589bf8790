//! Turns synthesis fields back into images.

use crate::img_pyramid::{wrapped_pixel, ColorImage};
use crate::synthesizer::{SynthesisField, Synthesizer};
use crate::{modulo, Dims, Error};

/// Looks up the color of every field coordinate in `source`, with wraparound.
pub fn colorize(field: &SynthesisField, source: &ColorImage) -> ColorImage {
    ColorImage::from_fn(field.width(), field.height(), |x, y| {
        let coord = field.get(x, y);
        image::Rgb(wrapped_pixel(source, coord.x, coord.y))
    })
}

/// Encodes every field coordinate as a color: red and green hold the wrapped
/// exemplar x and y, normalized by the exemplar's dimensions.
pub fn patch_map(field: &SynthesisField, exemplar: Dims) -> ColorImage {
    let (width, height) = (exemplar.width as i32, exemplar.height as i32);

    ColorImage::from_fn(field.width(), field.height(), |x, y| {
        let coord = field.get(x, y);
        image::Rgb([
            modulo(coord.x, width) as f32 / width as f32,
            modulo(coord.y, height) as f32 / height as f32,
            0.0,
        ])
    })
}

impl<'a> Synthesizer<'a> {
    /// Colorizes the field of synthesis step `step`, 0 being the initial
    /// field. Fields are colorized with the exemplar stack level they were
    /// synthesized at, the finest one with the exemplar itself.
    pub fn colorize(&self, step: usize) -> Result<ColorImage, Error> {
        let fields = self.fields();
        let field = fields
            .get(step)
            .ok_or_else(|| Error::StepOutOfRange(step, fields.len()))?;

        Ok(colorize(field, self.color_source(self.start_level() - step)))
    }

    /// The colorized latest field
    pub fn result(&self) -> ColorImage {
        colorize(
            self.current_field(),
            self.color_source(self.current_exemplar_level()),
        )
    }

    /// The patch map of the latest field
    pub fn result_patches(&self) -> ColorImage {
        patch_map(self.current_field(), self.analysis().stack().dims())
    }

    fn color_source(&self, level: usize) -> &'a ColorImage {
        let analysis = self.analysis();
        if level == 0 {
            analysis.exemplar()
        } else {
            analysis.stack().level(level)
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::Coord;

    #[test]
    fn colorize_wraps_coordinates() {
        let source = ColorImage::from_fn(4, 4, |x, y| image::Rgb([x as f32, y as f32, 1.0]));

        let mut field = SynthesisField::new(2, 2, Coord::new(1, 2));
        field.set(1, 0, Coord::new(-1, 5));
        field.set(0, 1, Coord::new(9, -4));

        let img = colorize(&field, &source);
        assert_eq!(img.dimensions(), (2, 2));
        assert_eq!(img.get_pixel(0, 0).0, [1.0, 2.0, 1.0]);
        assert_eq!(img.get_pixel(1, 0).0, [3.0, 1.0, 1.0]);
        assert_eq!(img.get_pixel(0, 1).0, [1.0, 0.0, 1.0]);
    }

    #[test]
    fn patch_map_normalizes_coordinates() {
        let mut field = SynthesisField::new(2, 1, Coord::new(0, 0));
        field.set(1, 0, Coord::new(6, -2));

        let map = patch_map(&field, Dims::new(8, 4));
        assert_eq!(map.get_pixel(0, 0).0, [0.0, 0.0, 0.0]);
        assert_eq!(map.get_pixel(1, 0).0, [0.75, 0.5, 0.0]);
    }
}
