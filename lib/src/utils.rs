use crate::{img_pyramid::ColorImage, Dims, Error};
use std::path::Path;

/// Helper type used to define the source of `ImageSource`'s data
#[derive(Clone)]
pub enum ImageSource<'a> {
    /// A raw buffer of image data, see `image::load_from_memory` for details
    /// on what is supported
    Memory(&'a [u8]),
    /// The path to an image to load from disk. The image format is inferred
    /// from the file extension, see `image::open` for details
    Path(&'a Path),
    /// An already loaded image that is passed directly to the analyzer
    Image(image::DynamicImage),
}

impl<'a> ImageSource<'a> {
    pub fn from_path(path: &'a Path) -> Self {
        Self::Path(path)
    }
}

impl<'a> From<image::DynamicImage> for ImageSource<'a> {
    fn from(img: image::DynamicImage) -> Self {
        Self::Image(img)
    }
}

impl<'a, S> From<&'a S> for ImageSource<'a>
where
    S: AsRef<Path> + 'a,
{
    fn from(path: &'a S) -> Self {
        Self::Path(path.as_ref())
    }
}

pub fn load_dynamic_image(src: ImageSource<'_>) -> Result<image::DynamicImage, image::ImageError> {
    match src {
        ImageSource::Memory(data) => image::load_from_memory(data),
        ImageSource::Path(path) => image::open(path),
        ImageSource::Image(img) => Ok(img),
    }
}

/// Loads an image as normalized (0-1) floating point RGB, optionally resized
pub(crate) fn load_image(src: ImageSource<'_>, resize: Option<Dims>) -> Result<ColorImage, Error> {
    let img = load_dynamic_image(src)?;

    let img = match resize {
        None => img.to_rgb(),
        Some(ref size) => {
            use image::GenericImageView;

            if img.width() != size.width || img.height() != size.height {
                image::imageops::resize(
                    &img.to_rgb(),
                    size.width,
                    size.height,
                    image::imageops::CatmullRom,
                )
            } else {
                img.to_rgb()
            }
        }
    };

    Ok(to_color_image(&img))
}

pub fn to_color_image(img: &image::RgbImage) -> ColorImage {
    ColorImage::from_fn(img.width(), img.height(), |x, y| {
        let p = img.get_pixel(x, y);
        image::Rgb([
            f32::from(p[0]) / 255.0,
            f32::from(p[1]) / 255.0,
            f32::from(p[2]) / 255.0,
        ])
    })
}

pub fn to_rgb8(img: &ColorImage) -> image::RgbImage {
    image::RgbImage::from_fn(img.width(), img.height(), |x, y| {
        let p = img.get_pixel(x, y);
        let to_u8 = |v: f32| (v.max(0.0).min(1.0) * 255.0).round() as u8;
        image::Rgb([to_u8(p[0]), to_u8(p[1]), to_u8(p[2])])
    })
}

/// Runs `work` on `chunk_len` sized chunks of `items` in parallel, each chunk
/// being handed to exactly one thread along with its index.
pub(crate) fn par_chunks_mut<T, F>(items: &mut [T], chunk_len: usize, max_threads: usize, work: F)
where
    T: Send,
    F: Fn(usize, &mut [T]) + Sync,
{
    let chunk_len = chunk_len.max(1);

    // for WASM we do not have threads and crossbeam panics,
    // so let's just run the work directly
    if max_threads <= 1 || items.len() <= chunk_len || cfg!(target_arch = "wasm32") {
        for (i, chunk) in items.chunks_mut(chunk_len).enumerate() {
            work(i, chunk);
        }
        return;
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        let work = &work;
        crossbeam_utils::thread::scope(|scope| {
            for (i, chunk) in items.chunks_mut(chunk_len).enumerate() {
                scope.spawn(move |_| work(i, chunk));
            }
        })
        .unwrap_or_else(|panic| std::panic::resume_unwind(panic));
    }
}

/// Maps `0..count` through `work` on up to `max_threads` threads, results are
/// returned in index order.
pub(crate) fn par_map<R, F>(count: usize, max_threads: usize, work: F) -> Vec<R>
where
    R: Send,
    F: Fn(usize) -> R + Sync,
{
    let n_workers = max_threads.min(count);

    if n_workers <= 1 {
        return (0..count).map(&work).collect();
    }

    #[cfg(target_arch = "wasm32")]
    let mut results: Vec<(usize, R)> = (0..count).map(|i| (i, work(i))).collect();

    #[cfg(not(target_arch = "wasm32"))]
    let mut results: Vec<(usize, R)> = {
        use std::sync::atomic::{AtomicUsize, Ordering};

        // workers pull the next item until everything is taken
        let next_item = AtomicUsize::new(0);
        let next_item = &next_item;
        let work = &work;

        crossbeam_utils::thread::scope(|scope| {
            let handles: Vec<_> = (0..n_workers)
                .map(|_| {
                    scope.spawn(move |_| {
                        let mut mine = Vec::new();
                        loop {
                            let i = next_item.fetch_add(1, Ordering::Relaxed);
                            if i >= count {
                                break;
                            }
                            mine.push((i, work(i)));
                        }
                        mine
                    })
                })
                .collect();

            handles
                .into_iter()
                .flat_map(|handle| {
                    handle
                        .join()
                        .unwrap_or_else(|panic| std::panic::resume_unwind(panic))
                })
                .collect::<Vec<_>>()
        })
        .unwrap_or_else(|panic| std::panic::resume_unwind(panic))
    };

    results.sort_by_key(|(i, _)| *i);
    results.into_iter().map(|(_, r)| r).collect()
}
