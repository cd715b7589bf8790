use crate::*;

/// Texture synthesis session.
///
/// Calling `run()` will analyze the exemplar, synthesize a new image and
/// return it, consuming the session in the process. You can provide a
/// `GeneratorProgress` implementation to get updates after every correction
/// sub-pass.
///
/// # Example
/// ```no_run
/// let tex_synth = parallel_texture_synthesis::Session::builder()
///     .seed(10)
///     .add_example(&"imgs/1.jpg")
///     .build().expect("failed to build session");
///
/// let generated_img = tex_synth.run(None).expect("failed to synthesize");
/// generated_img.save("my_generated_img.png").expect("failed to save image");
/// ```
pub struct Session {
    analyzer: Analyzer,
    params: Parameters,
}

impl Session {
    /// Creates a new session with default parameters.
    pub fn builder<'a>() -> SessionBuilder<'a> {
        SessionBuilder::default()
    }

    /// Runs the analysis and the synthesis and outputs a generated image.
    pub fn run(
        self,
        mut progress: Option<Box<dyn GeneratorProgress>>,
    ) -> Result<GeneratedImage, Error> {
        let params = self.params.to_synthesis_params();
        let dims = self.analyzer.stack().dims();

        log::info!(
            "synthesizing {}x{} from a {}x{} exemplar on {} thread(s)",
            params.output_size.width,
            params.output_size.height,
            dims.width,
            dims.height,
            params.max_thread_count
        );

        let analysis = self.analyzer.analyze(params.max_thread_count)?;
        let mut synth = Synthesizer::new(&analysis, params)?;

        let per_step = synth.subpasses_per_step();
        let total = per_step * synth.start_level();
        let mut finished_steps = 0;

        while !synth.done() {
            match progress {
                Some(ref mut progress) => {
                    synth.step_with_progress(|level, stage| {
                        progress.update(ProgressUpdate {
                            level,
                            total: ProgressStat {
                                current: finished_steps * per_step + stage,
                                total,
                            },
                            stage: ProgressStat {
                                current: stage,
                                total: per_step,
                            },
                        });
                    })?;
                }
                None => synth.step()?,
            }

            finished_steps += 1;
        }

        let generated = GeneratedImage::from_synthesizer(&synth)?;
        log::info!("synthesis finished after {} step(s)", finished_steps);

        Ok(generated)
    }
}

/// Builds a session by setting parameters and adding the exemplar, calling
/// `build` will check all of the provided inputs to verify that texture
/// synthesis will provide valid output
#[derive(Default)]
pub struct SessionBuilder<'a> {
    example: Option<ImageSource<'a>>,
    params: Parameters,
}

impl<'a> SessionBuilder<'a> {
    /// Creates a new `SessionBuilder`, can also be created via
    /// `Session::builder()`
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the exemplar from which a new image will be synthesized,
    /// replacing any previously added one.
    ///
    /// The exemplar must be square, or have a power of two width.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// let tex_synth = parallel_texture_synthesis::Session::builder()
    ///     .add_example(&"imgs/1.jpg")
    ///     .build().expect("failed to build session");
    /// ```
    pub fn add_example<E: Into<ImageSource<'a>>>(mut self, example: E) -> Self {
        self.example = Some(example.into());
        self
    }

    /// Overwrite the exemplar's size
    pub fn resize_input(mut self, dims: Dims) -> Self {
        self.params.resize_input = Some(dims);
        self
    }

    /// Specify size of the generated image.
    ///
    /// Default: 512x512
    pub fn output_size(mut self, dims: Dims) -> Self {
        self.params.output_size = dims;
        self
    }

    /// The maximum random offset, in exemplar pixels, applied to the
    /// synthesized coordinates, scaled per level by the jitter policy.
    ///
    /// Larger values give more varied outputs at the cost of structure.
    ///
    /// Default: 25.0
    pub fn jitter_strength(mut self, strength: f32) -> Self {
        self.params.jitter_strength = strength;
        self
    }

    /// How the jitter strength varies from the coarsest level to the finest.
    ///
    /// Default: `JitterPolicy::Scaled { min_level: 3 }`
    pub fn jitter_policy(mut self, policy: JitterPolicy) -> Self {
        self.params.jitter_policy = policy;
        self
    }

    /// Weighs coherent candidates during correction. Values below 1.0 favor
    /// copying larger continuous patches of the exemplar, values above 1.0
    /// disfavor them. Must be above 0.
    ///
    /// Default: 0.2
    pub fn kappa(mut self, kappa: f32) -> Self {
        self.params.kappa = kappa;
        self
    }

    /// The number of interleaved pixel groups per axis a correction pass is
    /// split into.
    ///
    /// Default: 2
    pub fn subpass_grid(mut self, grid: u32) -> Self {
        self.params.subpass_grid = grid;
        self
    }

    /// The number of correction passes run at every level.
    ///
    /// Default: 2
    pub fn correction_passes(mut self, passes: u32) -> Self {
        self.params.correction_passes = passes;
        self
    }

    /// Changes the seed of the jitter.
    ///
    /// The same seed and inputs always produce the same image, regardless of
    /// the number of threads.
    pub fn seed(mut self, value: u64) -> Self {
        self.params.seed = value;
        self
    }

    /// Controls the maximum number of threads that will be spawned at any one
    /// time in parallel.
    ///
    /// This number is allowed to exceed the number of logical cores on the
    /// system, but it should generally be kept at or below that number.
    ///
    /// Default: The number of logical cores on this system.
    pub fn max_thread_count(mut self, count: usize) -> Self {
        self.params.max_thread_count = Some(count);
        self
    }

    /// Creates a `Session`, or returns an error if invalid parameters or an
    /// invalid exemplar were specified.
    pub fn build(self) -> Result<Session, Error> {
        self.check_parameters_validity()?;

        let example = self.example.ok_or(Error::NoExemplar)?;
        let exemplar = utils::load_image(example, self.params.resize_input)?;
        let analyzer = Analyzer::new(exemplar)?;

        Ok(Session {
            analyzer,
            params: self.params,
        })
    }

    fn check_parameters_validity(&self) -> Result<(), Error> {
        if let Some(resize) = self.params.resize_input {
            if resize.width == 0 || resize.height == 0 {
                return Err(Error::InvalidRange(errors::InvalidRange {
                    min: 1.0,
                    max: u32::MAX as f32,
                    value: resize.width.min(resize.height) as f32,
                    name: "in-size",
                }));
            }
        }

        if let Some(max_count) = self.params.max_thread_count {
            if max_count == 0 {
                return Err(Error::InvalidRange(errors::InvalidRange {
                    min: 1.0,
                    max: 1024.0,
                    value: max_count as f32,
                    name: "max-thread-count",
                }));
            }
        }

        self.params.to_synthesis_params().validate()
    }
}

/// Helper struct for passing progress information to external callers
pub struct ProgressStat {
    /// The current amount of work that has been done
    pub current: usize,
    /// The total amount of work to do
    pub total: usize,
}

/// The current state of the synthesis, counted in correction sub-passes
pub struct ProgressUpdate {
    /// The exemplar level being synthesized
    pub level: usize,
    /// The total progress for the final image
    pub total: ProgressStat,
    /// The progress for the current level
    pub stage: ProgressStat,
}

/// Allows the generator to update external callers with the current
/// progress of the image synthesis
pub trait GeneratorProgress {
    fn update(&mut self, info: ProgressUpdate);
}

impl<G> GeneratorProgress for G
where
    G: FnMut(ProgressUpdate) + Send,
{
    fn update(&mut self, info: ProgressUpdate) {
        self(info)
    }
}
