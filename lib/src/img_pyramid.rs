use crate::{errors::InvalidExemplarSize, modulo, Dims, Error};

/// A 3 channel floating point image, the in-memory form of every exemplar
/// level and of the colorized synthesis results.
pub type ColorImage = image::ImageBuffer<image::Rgb<f32>, Vec<f32>>;

/// Reads a pixel with toroidal wraparound, so any integer coordinate is valid.
#[inline]
pub fn wrapped_pixel(img: &ColorImage, x: i32, y: i32) -> [f32; 3] {
    let (width, height) = img.dimensions();
    let x = modulo(x, width as i32) as u32;
    let y = modulo(y, height as i32) as u32;
    img.get_pixel(x, y).0
}

fn is_pow2(v: u32) -> bool {
    v != 0 && v & (v - 1) == 0
}

/// The exemplar and its successively halved versions, level 0 being the
/// exemplar itself.
#[derive(Clone)]
pub struct ImagePyramid {
    pub pyramid: Vec<ColorImage>,
}

impl ImagePyramid {
    pub fn new(exemplar: ColorImage) -> Result<Self, Error> {
        let (dimx, dimy) = exemplar.dimensions();

        if dimx == 0 || dimy == 0 || !(is_pow2(dimx) || dimx == dimy) {
            return Err(Error::InvalidExemplarSize(InvalidExemplarSize {
                width: dimx,
                height: dimy,
            }));
        }

        // pow(2, x) ~ img => x ~ log2(img)
        let lvls = 31 - dimx.leading_zeros();

        Ok(Self {
            pyramid: Self::build(lvls, exemplar),
        })
    }

    // area-filtered downsampling by 2, from the finest to the coarsest level
    fn build(in_lvls: u32, in_img: ColorImage) -> Vec<ColorImage> {
        let mut imgs = Vec::with_capacity(in_lvls as usize + 1);
        imgs.push(in_img);

        for _ in 0..in_lvls {
            let prev = &imgs[imgs.len() - 1];
            let (dimx, dimy) = prev.dimensions();
            let next = image::imageops::resize(
                prev,
                (dimx / 2).max(1),
                (dimy / 2).max(1),
                image::imageops::FilterType::Triangle,
            );
            imgs.push(next);
        }

        imgs
    }

    pub fn levels(&self) -> usize {
        self.pyramid.len()
    }

    pub fn level(&self, level: usize) -> &ColorImage {
        &self.pyramid[level]
    }

    /// The full resolution exemplar
    pub fn bottom(&self) -> &ColorImage {
        &self.pyramid[0]
    }
}

/// Every pyramid level resampled back to the exemplar's resolution.
///
/// Synthesis works in the coordinate space of the full resolution exemplar at
/// every level, neighbors at level `l` being `2^l` pixels apart.
pub struct ExemplarStack {
    levels: Vec<ColorImage>,
    dims: Dims,
}

impl ExemplarStack {
    pub fn from_pyramid(pyramid: &ImagePyramid) -> Self {
        let (width, height) = pyramid.bottom().dimensions();

        let levels = pyramid
            .pyramid
            .iter()
            .map(|level| {
                ColorImage::from_fn(width, height, |i, j| {
                    let u = (i as f32 + 0.5) / width as f32;
                    let v = (j as f32 + 0.5) / height as f32;
                    image::Rgb(bilinear(level, u, v))
                })
            })
            .collect();

        Self {
            levels,
            dims: Dims::new(width, height),
        }
    }

    pub fn num_levels(&self) -> usize {
        self.levels.len()
    }

    pub fn level(&self, level: usize) -> &ColorImage {
        &self.levels[level]
    }

    pub fn dims(&self) -> Dims {
        self.dims
    }
}

// u, v are normalized texture coordinates, lookups wrap around the borders
fn bilinear(img: &ColorImage, u: f32, v: f32) -> [f32; 3] {
    let (width, height) = img.dimensions();

    // translate into "array coordinate space"
    let i = u * width as f32 - 0.5;
    let j = v * height as f32 - 0.5;

    let i0 = i.floor() as i32;
    let j0 = j.floor() as i32;

    let fi = i - i.floor();
    let fj = j - j.floor();

    let ij00 = wrapped_pixel(img, i0, j0);
    let ij01 = wrapped_pixel(img, i0, j0 + 1);
    let ij10 = wrapped_pixel(img, i0 + 1, j0);
    let ij11 = wrapped_pixel(img, i0 + 1, j0 + 1);

    let mut out = [0.0; 3];
    for (c, o) in out.iter_mut().enumerate() {
        *o = (1.0 - fi) * ((1.0 - fj) * ij00[c] + fj * ij01[c])
            + fi * ((1.0 - fj) * ij10[c] + fj * ij11[c]);
    }
    out
}
