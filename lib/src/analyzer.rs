use crate::img_pyramid::{ColorImage, ExemplarStack, ImagePyramid};
use crate::neighborhood::Neighborhood;
use crate::patch_index::PatchIndex;
use crate::{modulo, utils, Coord, Error};

/// Number of similar neighborhoods recorded for every exemplar pixel
pub const K: usize = 8;

/// The `K` pixels of the same stack level whose neighborhoods are the most
/// similar to a given pixel's, closest first. Unused slots hold
/// [`Coord::SENTINEL`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct KNearest {
    pub coords: [Coord; K],
}

impl Default for KNearest {
    fn default() -> Self {
        Self {
            coords: [Coord::SENTINEL; K],
        }
    }
}

impl KNearest {
    /// The valid matches, closest first.
    pub fn iter(&self) -> impl Iterator<Item = Coord> + '_ {
        self.coords.iter().copied().filter(|c| !c.is_sentinel())
    }
}

// everything gathered for a single stack level
struct LevelAnalysis {
    neighborhoods: Vec<Neighborhood>,
    k_nearest: Vec<KNearest>,
}

/// Builds the exemplar pyramid and stack. Call [`Analyzer::analyze`] to gather
/// the per-level neighborhoods and their nearest matches.
pub struct Analyzer {
    pyramid: ImagePyramid,
    stack: ExemplarStack,
}

impl Analyzer {
    /// Fails if the exemplar is neither square nor a power of two wide.
    pub fn new(exemplar: ColorImage) -> Result<Self, Error> {
        let pyramid = ImagePyramid::new(exemplar)?;
        let stack = ExemplarStack::from_pyramid(&pyramid);

        Ok(Self { pyramid, stack })
    }

    pub fn stack(&self) -> &ExemplarStack {
        &self.stack
    }

    /// Analyzes every stack level, levels being independent of each other
    /// and processed in parallel on up to `max_threads` threads.
    pub fn analyze(self, max_threads: usize) -> Result<Analysis, Error> {
        let num_levels = self.stack.num_levels();
        let dims = self.stack.dims();
        log::debug!(
            "analyzing {} exemplar levels of {}x{}",
            num_levels,
            dims.width,
            dims.height
        );

        let stack = &self.stack;
        let levels = utils::par_map(num_levels, max_threads, |level| {
            analyze_level(stack, level)
        })
        .into_iter()
        .collect::<Result<Vec<_>, Error>>()?;

        Ok(Analysis {
            pyramid: self.pyramid,
            stack: self.stack,
            levels,
        })
    }
}

fn analyze_level(stack: &ExemplarStack, level: usize) -> Result<LevelAnalysis, Error> {
    let neighborhoods = gather_neighborhoods(stack, level);
    let index = PatchIndex::build(level as u32, &neighborhoods)?;

    let width = stack.dims().width as usize;
    let mut k_nearest = vec![KNearest::default(); neighborhoods.len()];
    let mut found = Vec::with_capacity(K);

    for (neighborhood, nearest) in neighborhoods.iter().zip(k_nearest.iter_mut()) {
        index.k_nearest(neighborhood, K, &mut found);

        for (slot, &flat) in nearest.coords.iter_mut().zip(found.iter()) {
            let flat = flat as usize;
            *slot = Coord::new((flat % width) as i32, (flat / width) as i32);
        }
    }

    log::debug!(
        "analyzed exemplar level {} ({} neighborhoods)",
        level,
        index.len()
    );

    Ok(LevelAnalysis {
        neighborhoods,
        k_nearest,
    })
}

/// Gathers the neighborhood of every pixel of a stack level, in row major
/// order. Neighbors are `2^level` pixels apart.
pub fn gather_neighborhoods(stack: &ExemplarStack, level: usize) -> Vec<Neighborhood> {
    let img = stack.level(level);
    let (width, height) = img.dimensions();
    let spacing = 1 << level;

    let mut neighborhoods = Vec::with_capacity((width * height) as usize);
    for y in 0..height as i32 {
        for x in 0..width as i32 {
            neighborhoods.push(Neighborhood::from_image(img, spacing, x, y));
        }
    }
    neighborhoods
}

/// The result of analyzing an exemplar: its stack, plus the neighborhoods and
/// k-nearest matches of every pixel of every stack level. Read-only once
/// built.
pub struct Analysis {
    pyramid: ImagePyramid,
    stack: ExemplarStack,
    levels: Vec<LevelAnalysis>,
}

impl Analysis {
    /// The full resolution exemplar
    pub fn exemplar(&self) -> &ColorImage {
        self.pyramid.bottom()
    }

    pub fn pyramid(&self) -> &ImagePyramid {
        &self.pyramid
    }

    pub fn stack(&self) -> &ExemplarStack {
        &self.stack
    }

    pub fn num_levels(&self) -> usize {
        self.levels.len()
    }

    /// The pre-gathered neighborhood at `(x, y)` of stack level `level`,
    /// coordinates wrap around.
    #[inline]
    pub fn neighborhood_at(&self, level: usize, x: i32, y: i32) -> &Neighborhood {
        &self.levels[level].neighborhoods[self.flat_index(x, y)]
    }

    /// The k-nearest matches of every pixel of a level, in row major order.
    pub fn k_nearest(&self, level: usize) -> &[KNearest] {
        &self.levels[level].k_nearest
    }

    /// The k-nearest matches at `(x, y)`, coordinates wrap around.
    #[inline]
    pub fn k_nearest_at(&self, level: usize, x: i32, y: i32) -> &KNearest {
        &self.levels[level].k_nearest[self.flat_index(x, y)]
    }

    #[inline]
    fn flat_index(&self, x: i32, y: i32) -> usize {
        let dims = self.stack.dims();
        let x = modulo(x, dims.width as i32) as usize;
        let y = modulo(y, dims.height as i32) as usize;
        y * dims.width as usize + x
    }
}
