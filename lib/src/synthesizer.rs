use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::analyzer::{Analysis, K};
use crate::errors::InvalidRange;
use crate::img_pyramid::wrapped_pixel;
use crate::neighborhood::Neighborhood;
use crate::{utils, Coord, Dims, Error};

/// Every 3x3 neighbor contributes `K - 1` non-coherent candidates and one
/// coherent candidate, the pixel's current coordinate comes last.
const CANDIDATES: usize = 9 * K + 1;
/// Candidates from this slot up to `SELF_SLOT` are coherent
const COHERENT_START: usize = 9 * (K - 1);
const SELF_SLOT: usize = 9 * K;

/// How the jitter strength varies across exemplar levels
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum JitterPolicy {
    /// `strength * level / num_levels`, no jitter at all below `min_level`
    Scaled { min_level: u32 },
    /// The same strength at every level
    Uniform,
    /// No jitter
    Disabled,
}

impl Default for JitterPolicy {
    fn default() -> Self {
        Self::Scaled { min_level: 3 }
    }
}

impl JitterPolicy {
    /// The maximum per-axis offset, in exemplar pixels, at `level`
    pub fn strength(self, strength: f32, level: usize, num_levels: usize) -> f32 {
        match self {
            Self::Scaled { min_level } => {
                if level < min_level as usize || num_levels == 0 {
                    0.0
                } else {
                    strength * level as f32 / num_levels as f32
                }
            }
            Self::Uniform => strength,
            Self::Disabled => 0.0,
        }
    }
}

/// Parameters of the synthesis itself, the `Session` builder fills these in
/// from its own configuration.
#[derive(Clone, Debug)]
pub struct SynthesisParams {
    /// The requested output size, the synthesized fields are rounded up to
    /// whole exemplar tiles
    pub output_size: Dims,
    pub jitter_strength: f32,
    pub jitter_policy: JitterPolicy,
    /// Multiplies the cost of coherent candidates, below 1.0 favors
    /// coherence
    pub kappa: f32,
    /// Correction sub-passes per axis, each pass updating one of the
    /// `subpass_grid * subpass_grid` interleaved pixel groups at a time
    pub subpass_grid: u32,
    pub correction_passes: u32,
    pub seed: u64,
    pub max_thread_count: usize,
}

impl Default for SynthesisParams {
    fn default() -> Self {
        Self {
            output_size: Dims::square(512),
            jitter_strength: 25.0,
            jitter_policy: JitterPolicy::default(),
            kappa: 0.2,
            subpass_grid: 2,
            correction_passes: 2,
            seed: 0,
            max_thread_count: 1,
        }
    }
}

impl SynthesisParams {
    pub fn validate(&self) -> Result<(), Error> {
        fn check(ok: bool, name: &'static str, min: f32, max: f32, value: f32) -> Result<(), Error> {
            if ok {
                Ok(())
            } else {
                Err(Error::InvalidRange(InvalidRange {
                    min,
                    max,
                    value,
                    name,
                }))
            }
        }

        check(
            self.output_size.width > 0,
            "output-width",
            1.0,
            u32::MAX as f32,
            self.output_size.width as f32,
        )?;
        check(
            self.output_size.height > 0,
            "output-height",
            1.0,
            u32::MAX as f32,
            self.output_size.height as f32,
        )?;
        check(
            self.jitter_strength >= 0.0,
            "jitter",
            0.0,
            f32::MAX,
            self.jitter_strength,
        )?;
        check(self.kappa > 0.0, "kappa", f32::EPSILON, f32::MAX, self.kappa)?;
        check(
            self.subpass_grid >= 1,
            "subpasses",
            1.0,
            1024.0,
            self.subpass_grid as f32,
        )?;
        check(
            self.correction_passes >= 1,
            "correction-passes",
            1.0,
            1024.0,
            self.correction_passes as f32,
        )?;
        check(
            self.max_thread_count >= 1,
            "max-thread-count",
            1.0,
            1024.0,
            self.max_thread_count as f32,
        )
    }
}

/// A grid of exemplar coordinates, one per synthesized pixel.
#[derive(Clone, Debug, PartialEq)]
pub struct SynthesisField {
    width: u32,
    height: u32,
    coords: Vec<Coord>,
}

impl SynthesisField {
    pub fn new(width: u32, height: u32, fill: Coord) -> Self {
        Self {
            width,
            height,
            coords: vec![fill; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dims(&self) -> Dims {
        Dims::new(self.width, self.height)
    }

    #[inline]
    pub fn get(&self, x: u32, y: u32) -> Coord {
        self.coords[(y * self.width + x) as usize]
    }

    /// Like `get`, but `(x, y)` wraps around the field's borders
    #[inline]
    pub fn get_wrapped(&self, x: i32, y: i32) -> Coord {
        let x = crate::modulo(x, self.width as i32) as u32;
        let y = crate::modulo(y, self.height as i32) as u32;
        self.get(x, y)
    }

    #[inline]
    pub fn set(&mut self, x: u32, y: u32, coord: Coord) {
        self.coords[(y * self.width + x) as usize] = coord;
    }

    pub fn coords(&self) -> &[Coord] {
        &self.coords
    }

    /// Doubles the field in both dimensions, every cell spawning a 2x2 block
    /// of children `spacing` exemplar pixels apart.
    pub fn upsample(&self, spacing: i32) -> Self {
        let mut child = Self::new(self.width * 2, self.height * 2, Coord::default());

        for y in 0..self.height {
            for x in 0..self.width {
                let parent = self.get(x, y);
                for cy in 0..2 {
                    for cx in 0..2 {
                        child.set(
                            x * 2 + cx,
                            y * 2 + cy,
                            parent + Coord::new(cx as i32, cy as i32) * spacing,
                        );
                    }
                }
            }
        }

        child
    }
}

/// Slot of the `k`th match of the 3x3 neighbor `nid` in the candidate list.
/// The closest match (`k == 0`) is the coherent candidate.
#[inline]
fn candidate_slot(nid: usize, k: usize) -> usize {
    if k == 0 {
        COHERENT_START + nid
    } else {
        nid * (K - 1) + (k - 1)
    }
}

/// Picks the candidate with the lowest cost. Ties go to the candidate found
/// last, which keeps coherent candidates and the current assignment stable.
fn select_candidate<F>(candidates: &[Option<Coord>], cost: F) -> Option<(Coord, f32)>
where
    F: Fn(usize, Coord) -> f32,
{
    let mut best = None;
    let mut min_cost = f32::MAX;

    for (slot, candidate) in candidates.iter().enumerate() {
        if let Some(coord) = *candidate {
            let d = cost(slot, coord);
            if d <= min_cost {
                min_cost = d;
                best = Some(coord);
            }
        }
    }

    best.map(|coord| (coord, min_cost))
}

/// Grows a field of exemplar coordinates from the coarsest exemplar level to
/// the finest, one level per `step`.
///
/// Every synthesized field is kept, `fields()[0]` being the initial one.
pub struct Synthesizer<'a> {
    analysis: &'a Analysis,
    params: SynthesisParams,
    start_level: usize,
    fields: Vec<SynthesisField>,
}

impl<'a> Synthesizer<'a> {
    /// Initializes synthesis at the coarsest exemplar level, every cell of the
    /// first field pointing at the center of the exemplar.
    pub fn new(analysis: &'a Analysis, params: SynthesisParams) -> Result<Self, Error> {
        params.validate()?;

        let num_levels = analysis.num_levels();
        if num_levels < 2 {
            return Err(Error::InvalidStartLevel(num_levels as u32));
        }
        let start_level = num_levels - 1;

        let dims = analysis.stack().dims();
        let width = (params.output_size.width + dims.width - 1) / dims.width;
        let height = (params.output_size.height + dims.height - 1) / dims.height;

        let center = Coord::new(dims.width as i32 / 2, dims.height as i32 / 2);

        log::debug!(
            "synthesis starts at level {} with a {}x{} field",
            start_level,
            width,
            height
        );

        Ok(Self {
            analysis,
            params,
            start_level,
            fields: vec![SynthesisField::new(width, height, center)],
        })
    }

    pub fn analysis(&self) -> &'a Analysis {
        self.analysis
    }

    pub fn params(&self) -> &SynthesisParams {
        &self.params
    }

    /// The exemplar level the initial field belongs to
    pub fn start_level(&self) -> usize {
        self.start_level
    }

    /// The field history, from the initial field to the latest
    pub fn fields(&self) -> &[SynthesisField] {
        &self.fields
    }

    pub fn current_field(&self) -> &SynthesisField {
        &self.fields[self.fields.len() - 1]
    }

    pub fn steps_completed(&self) -> usize {
        self.fields.len() - 1
    }

    pub fn done(&self) -> bool {
        self.steps_completed() == self.start_level
    }

    /// The exemplar level of the latest field
    pub fn current_exemplar_level(&self) -> usize {
        self.start_level - self.steps_completed()
    }

    /// Correction sub-passes a single step runs
    pub fn subpasses_per_step(&self) -> usize {
        let grid = self.params.subpass_grid as usize;
        self.params.correction_passes as usize * grid * grid
    }

    /// Synthesizes the next finer level: upsample, jitter, then correction.
    pub fn step(&mut self) -> Result<(), Error> {
        self.step_with_progress(|_, _| {})
    }

    /// Same as `step`, `on_subpass` being called with the level being
    /// synthesized and the number of sub-passes finished in this step after
    /// every correction sub-pass.
    pub fn step_with_progress<F>(&mut self, mut on_subpass: F) -> Result<(), Error>
    where
        F: FnMut(usize, usize),
    {
        if self.done() {
            return Err(Error::SynthesisComplete);
        }

        let level = self.current_exemplar_level() - 1;

        let mut field = self.current_field().upsample(1 << level);
        self.jitter(&mut field, level);

        let mut finished = 0;
        for _ in 0..self.params.correction_passes {
            field = self.correction_pass(field, level, |subpass| {
                on_subpass(level, finished + subpass);
            });
            finished += (self.params.subpass_grid * self.params.subpass_grid) as usize;
        }

        log::debug!(
            "synthesized level {} ({}x{})",
            level,
            field.width(),
            field.height()
        );

        self.fields.push(field);
        Ok(())
    }

    /// Offsets every coordinate of `field` by a random amount on each axis,
    /// bounded by the jitter policy's strength at `level`.
    pub fn jitter(&self, field: &mut SynthesisField, level: usize) {
        let strength = self.params.jitter_policy.strength(
            self.params.jitter_strength,
            level,
            self.analysis.num_levels(),
        );

        if strength <= 0.0 {
            return;
        }

        // lookups wrap anyway, wrapping the offset as well keeps huge
        // strengths from overflowing
        let dims = self.analysis.stack().dims();
        let mut rng = Pcg32::seed_from_u64(self.params.seed.wrapping_add(level as u64));
        for coord in &mut field.coords {
            let dx = (rng.gen_range(-1.0f32..1.0) * strength) as i32;
            let dy = (rng.gen_range(-1.0f32..1.0) * strength) as i32;
            *coord = (coord.wrap(dims) + Coord::new(dx, dy).wrap(dims)).wrap(dims);
        }
    }

    /// Runs one correction pass over `field` at exemplar level `level`,
    /// calling `on_subpass` with the number of sub-passes done so far.
    pub fn correction_pass<F>(
        &self,
        mut field: SynthesisField,
        level: usize,
        mut on_subpass: F,
    ) -> SynthesisField
    where
        F: FnMut(usize),
    {
        let grid = self.params.subpass_grid;
        let mut done = 0;

        for sy in 0..grid {
            for sx in 0..grid {
                field = self.correction_subpass(&field, level, sx, sy);
                done += 1;
                on_subpass(done);
            }
        }

        field
    }

    /// Corrects the pixels with `x % grid == sx && y % grid == sy`, reading
    /// only from `snapshot` and writing into a new field.
    fn correction_subpass(
        &self,
        snapshot: &SynthesisField,
        level: usize,
        sx: u32,
        sy: u32,
    ) -> SynthesisField {
        let grid = self.params.subpass_grid;
        let width = snapshot.width;
        let threads = self.params.max_thread_count.max(1) as u32;
        let rows_per_band = ((snapshot.height + threads - 1) / threads).max(1);

        let mut output = snapshot.clone();

        utils::par_chunks_mut(
            &mut output.coords,
            (rows_per_band * width) as usize,
            threads as usize,
            |band, coords| {
                let first_row = band as u32 * rows_per_band;

                for (i, coord) in coords.iter_mut().enumerate() {
                    let x = i as u32 % width;
                    let y = first_row + i as u32 / width;

                    if x % grid != sx || y % grid != sy {
                        continue;
                    }

                    *coord = self.correct_pixel(snapshot, level, x, y).0;
                }
            },
        );

        output
    }

    /// Finds the best assignment for the pixel `(x, y)` of `field`, returning
    /// it along with its (kappa weighted) cost.
    pub fn correct_pixel(
        &self,
        field: &SynthesisField,
        level: usize,
        x: u32,
        y: u32,
    ) -> (Coord, f32) {
        let spacing = 1 << level;
        let (x, y) = (x as i32, y as i32);

        let mut candidates = [None; CANDIDATES];
        for nj in -1..=1 {
            for ni in -1..=1 {
                let neighbor = field.get_wrapped(x + ni, y + nj);
                let nid = ((ni + 1) + (nj + 1) * 3) as usize;
                let offset = Coord::new(ni, nj) * spacing;

                let nearest = self.analysis.k_nearest_at(level, neighbor.x, neighbor.y);
                for (k, matched) in nearest.coords.iter().enumerate() {
                    if matched.is_sentinel() {
                        continue;
                    }
                    candidates[candidate_slot(nid, k)] = Some(*matched - offset);
                }
            }
        }

        let current = field.get(x as u32, y as u32);
        candidates[SELF_SLOT] = Some(current);

        let synthesized = self.synthesized_neighborhood(field, level, x, y);

        select_candidate(&candidates, |slot, coord| {
            self.assignment_cost(&synthesized, level, slot, coord)
        })
        .unwrap_or((current, f32::MAX))
    }

    /// The distance between the exemplar neighborhood at `coord` and the
    /// synthesized one, weighted by kappa for coherent candidates. The
    /// pixel's current assignment is never weighted.
    fn assignment_cost(
        &self,
        synthesized: &Neighborhood,
        level: usize,
        slot: usize,
        coord: Coord,
    ) -> f32 {
        let d = self
            .analysis
            .neighborhood_at(level, coord.x, coord.y)
            .distance_sq(synthesized);

        if (COHERENT_START..SELF_SLOT).contains(&slot) {
            d * self.params.kappa
        } else {
            d
        }
    }

    /// Gathers the neighborhood of `(x, y)` in the synthesized image, without
    /// colorizing it: colors are read from the exemplar stack through the
    /// field's coordinates. Neighboring field cells are already `2^level`
    /// exemplar pixels apart, so the stencil isn't scaled.
    pub fn synthesized_neighborhood(
        &self,
        field: &SynthesisField,
        level: usize,
        x: i32,
        y: i32,
    ) -> Neighborhood {
        let img = self.analysis.stack().level(level);
        Neighborhood::gather(|dx, dy| {
            let coord = field.get_wrapped(x + dx, y + dy);
            wrapped_pixel(img, coord.x, coord.y)
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::analyzer::Analyzer;
    use crate::img_pyramid::ColorImage;

    fn unique_exemplar(size: u32) -> ColorImage {
        ColorImage::from_fn(size, size, |x, y| {
            image::Rgb([
                x as f32 / size as f32,
                y as f32 / size as f32,
                ((x * 5 + y * 3) % size) as f32 / size as f32,
            ])
        })
    }

    fn analysis(size: u32) -> Analysis {
        Analyzer::new(unique_exemplar(size))
            .unwrap()
            .analyze(2)
            .unwrap()
    }

    fn params() -> SynthesisParams {
        SynthesisParams {
            output_size: Dims::square(16),
            jitter_strength: 0.0,
            max_thread_count: 2,
            ..SynthesisParams::default()
        }
    }

    #[test]
    fn candidate_slots_are_unique() {
        let mut seen = [false; CANDIDATES];
        for nid in 0..9 {
            for k in 0..K {
                let slot = candidate_slot(nid, k);
                assert!(!seen[slot]);
                seen[slot] = true;

                assert_eq!(slot >= COHERENT_START, k == 0);
            }
        }

        // only the self slot is left
        assert_eq!(seen.iter().filter(|s| !**s).count(), 1);
        assert!(!seen[SELF_SLOT]);
    }

    #[test]
    fn ties_go_to_coherent_candidates() {
        let mut candidates = [None; CANDIDATES];
        candidates[candidate_slot(0, 1)] = Some(Coord::new(1, 1));
        candidates[candidate_slot(4, 0)] = Some(Coord::new(2, 2));

        let (best, cost) = select_candidate(&candidates, |_, _| 3.0).unwrap();
        assert_eq!(best, Coord::new(2, 2));
        assert_eq!(cost, 3.0);

        // but a strictly better non-coherent candidate still wins
        let (best, _) = select_candidate(&candidates, |slot, _| {
            if slot < COHERENT_START {
                1.0
            } else {
                2.0
            }
        })
        .unwrap();
        assert_eq!(best, Coord::new(1, 1));

        assert!(select_candidate(&[None; 4], |_, _| 0.0).is_none());
    }

    #[test]
    fn scaled_jitter_vanishes_at_fine_levels() {
        let policy = JitterPolicy::default();
        for level in 0..3 {
            assert_eq!(policy.strength(25.0, level, 6), 0.0);
        }
        assert_eq!(policy.strength(25.0, 3, 6), 12.5);
        assert!(policy.strength(25.0, 5, 6) > policy.strength(25.0, 4, 6));

        assert_eq!(JitterPolicy::Uniform.strength(4.0, 0, 6), 4.0);
        assert_eq!(JitterPolicy::Disabled.strength(4.0, 5, 6), 0.0);
    }

    #[test]
    fn jitter_is_bounded_and_reproducible() {
        let analysis = analysis(16);
        let synth = Synthesizer::new(
            &analysis,
            SynthesisParams {
                jitter_strength: 3.0,
                jitter_policy: JitterPolicy::Uniform,
                seed: 7,
                ..params()
            },
        )
        .unwrap();

        let original = SynthesisField::new(8, 8, Coord::new(8, 8));

        let mut a = original.clone();
        let mut b = original.clone();
        synth.jitter(&mut a, 2);
        synth.jitter(&mut b, 2);
        assert_eq!(a, b);
        assert_ne!(a, original);

        for c in a.coords() {
            assert!((c.x - 8).abs() < 3 && (c.y - 8).abs() < 3);
        }

        // the default policy leaves fine levels alone
        let synth = Synthesizer::new(
            &analysis,
            SynthesisParams {
                jitter_strength: 25.0,
                ..params()
            },
        )
        .unwrap();
        let mut fine = original.clone();
        synth.jitter(&mut fine, 2);
        assert_eq!(fine, original);
    }

    #[test]
    fn upsampled_children_stay_close_to_parent() {
        let mut parent = SynthesisField::new(2, 3, Coord::default());
        for y in 0..3 {
            for x in 0..2 {
                parent.set(x, y, Coord::new(x as i32 * 5 - 3, y as i32 * 7));
            }
        }

        let spacing = 4;
        let child = parent.upsample(spacing);
        assert_eq!(child.dims(), Dims::new(4, 6));

        for y in 0..6 {
            for x in 0..4 {
                let p = parent.get(x / 2, y / 2);
                let c = child.get(x, y);
                assert_eq!(c, p + Coord::new((x % 2) as i32, (y % 2) as i32) * spacing);
                assert!(c.x - p.x <= spacing && c.y - p.y <= spacing);
            }
        }
    }

    #[test]
    fn initial_field_is_centered() {
        let analysis = analysis(8);
        let synth = Synthesizer::new(
            &analysis,
            SynthesisParams {
                output_size: Dims::new(20, 9),
                ..params()
            },
        )
        .unwrap();

        assert_eq!(synth.start_level(), 3);
        assert_eq!(synth.current_exemplar_level(), 3);
        let field = synth.current_field();
        assert_eq!(field.dims(), Dims::new(3, 2));
        assert!(field.coords().iter().all(|c| *c == Coord::new(4, 4)));
    }

    #[test]
    fn identity_field_is_a_fixed_point() {
        let analysis = analysis(8);
        let synth = Synthesizer::new(
            &analysis,
            SynthesisParams {
                kappa: 1.0,
                ..params()
            },
        )
        .unwrap();

        let mut identity = SynthesisField::new(8, 8, Coord::default());
        for y in 0..8 {
            for x in 0..8 {
                identity.set(x, y, Coord::new(x as i32, y as i32));
            }
        }

        let corrected = synth.correction_pass(identity.clone(), 0, |_| {});
        assert_eq!(corrected, identity);
    }

    #[test]
    fn correction_never_worsens_a_pixel() {
        let analysis = analysis(16);

        let mut field = SynthesisField::new(8, 8, Coord::default());
        for y in 0..8 {
            for x in 0..8 {
                field.set(x, y, Coord::new((x * 7 + y) as i32 % 16, (y * 3) as i32));
            }
        }

        for &kappa in &[0.2, 1.0, 4.0] {
            let synth = Synthesizer::new(
                &analysis,
                SynthesisParams {
                    kappa,
                    ..params()
                },
            )
            .unwrap();

            for level in 0..analysis.num_levels() {
                for y in 0..8 {
                    for x in 0..8 {
                        let synthesized = synth.synthesized_neighborhood(&field, level, x, y);
                        let distance = |c: Coord| {
                            analysis
                                .neighborhood_at(level, c.x, c.y)
                                .distance_sq(&synthesized)
                        };

                        let current = distance(field.get(x as u32, y as u32));
                        let (chosen, cost) =
                            synth.correct_pixel(&field, level, x as u32, y as u32);

                        // the weighted cost never exceeds keeping the current
                        // assignment
                        assert!(cost <= current);

                        // and without a coherence bonus, neither does the
                        // actual distance
                        if kappa >= 1.0 {
                            assert!(
                                distance(chosen) <= current,
                                "kappa {} level {} ({}, {})",
                                kappa,
                                level,
                                x,
                                y
                            );
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn huge_jitter_stays_inside_the_exemplar() {
        let analysis = analysis(16);
        let mut synth = Synthesizer::new(
            &analysis,
            SynthesisParams {
                output_size: Dims::square(32),
                jitter_strength: 3.0e9,
                jitter_policy: JitterPolicy::Uniform,
                ..params()
            },
        )
        .unwrap();

        let mut field = SynthesisField::new(4, 4, Coord::new(15, 15));
        synth.jitter(&mut field, 3);
        for c in field.coords() {
            assert!((0..16).contains(&c.x) && (0..16).contains(&c.y));
        }

        while !synth.done() {
            synth.step().unwrap();
        }
        assert_eq!(synth.current_field().dims(), Dims::square(32));
    }

    #[test]
    fn stepping_past_the_finest_level_fails() {
        let analysis = analysis(8);
        let mut synth = Synthesizer::new(&analysis, params()).unwrap();

        let mut updates = 0;
        while !synth.done() {
            let before = synth.current_exemplar_level();
            synth.step_with_progress(|_, _| updates += 1).unwrap();
            assert_eq!(synth.current_exemplar_level(), before - 1);
        }

        assert_eq!(updates, 3 * synth.subpasses_per_step());
        assert_eq!(synth.fields().len(), 4);
        assert_eq!(synth.current_field().dims(), Dims::square(16));
        assert!(matches!(synth.step(), Err(Error::SynthesisComplete)));
    }

    #[test]
    fn rejects_invalid_parameters() {
        let analysis = analysis(8);

        let bad = [
            SynthesisParams {
                kappa: 0.0,
                ..params()
            },
            SynthesisParams {
                jitter_strength: -1.0,
                ..params()
            },
            SynthesisParams {
                subpass_grid: 0,
                ..params()
            },
            SynthesisParams {
                correction_passes: 0,
                ..params()
            },
            SynthesisParams {
                output_size: Dims::new(0, 4),
                ..params()
            },
        ];

        for params in bad.iter() {
            assert!(matches!(
                Synthesizer::new(&analysis, params.clone()),
                Err(Error::InvalidRange(_))
            ));
        }
    }

    #[test]
    fn single_level_stacks_cannot_start() {
        let analysis = Analyzer::new(unique_exemplar(1))
            .unwrap()
            .analyze(1)
            .unwrap();

        assert!(matches!(
            Synthesizer::new(&analysis, params()),
            Err(Error::InvalidStartLevel(1))
        ));
    }

    #[test]
    fn thread_count_does_not_change_results() {
        let analysis = analysis(16);

        let run = |threads| {
            let mut synth = Synthesizer::new(
                &analysis,
                SynthesisParams {
                    output_size: Dims::square(40),
                    jitter_strength: 25.0,
                    jitter_policy: JitterPolicy::Uniform,
                    max_thread_count: threads,
                    seed: 3,
                    ..params()
                },
            )
            .unwrap();
            while !synth.done() {
                synth.step().unwrap();
            }
            synth.current_field().clone()
        };

        assert_eq!(run(1), run(4));
    }
}
