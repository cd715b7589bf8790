use std::fmt;

#[derive(Debug)]
pub struct InvalidRange {
    pub(crate) min: f32,
    pub(crate) max: f32,
    pub(crate) value: f32,
    pub(crate) name: &'static str,
}

impl fmt::Display for InvalidRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "parameter '{}' - value '{}' is outside the range of {}-{}",
            self.name, self.value, self.min, self.max
        )
    }
}

#[derive(Debug)]
pub struct InvalidExemplarSize {
    pub(crate) width: u32,
    pub(crate) height: u32,
}

impl fmt::Display for InvalidExemplarSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "the exemplar ({}x{}) must have a power of two width, or be square",
            self.width, self.height
        )
    }
}

#[derive(Debug)]
pub struct PatchIndexError {
    pub(crate) level: u32,
    pub(crate) reason: &'static str,
}

impl fmt::Display for PatchIndexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "failed to build the patch index for exemplar level {}: {}",
            self.level, self.reason
        )
    }
}

#[derive(Debug)]
pub enum Error {
    /// An error in the image library occurred, eg failed to load/save
    Image(image::ImageError),
    /// An input parameter had an invalid range specified
    InvalidRange(InvalidRange),
    /// The exemplar is neither square nor a power of two wide
    InvalidExemplarSize(InvalidExemplarSize),
    /// The exemplar stack is too shallow to start synthesis above level 0
    InvalidStartLevel(u32),
    /// `step` was called after the finest level was already synthesized
    SynthesisComplete,
    /// The nearest neighbor index for an exemplar level couldn't be built
    PatchIndex(PatchIndexError),
    /// A synthesis step that doesn't exist (yet) was requested
    StepOutOfRange(usize, usize),
    /// Io is notoriously error free with no problems, but we cover it just in case!
    Io(std::io::Error),
    /// The user specified an image format we don't support as the output
    UnsupportedOutputFormat(String),
    /// No exemplar was added to the session
    NoExemplar,
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Image(err) => Some(err),
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Image(ie) => write!(f, "{}", ie),
            Self::InvalidRange(ir) => write!(f, "{}", ir),
            Self::InvalidExemplarSize(ies) => write!(f, "{}", ies),
            Self::InvalidStartLevel(levels) => write!(
                f,
                "the exemplar stack has {} level(s), synthesis needs to start above level 0",
                levels
            ),
            Self::SynthesisComplete => write!(f, "the finest level has already been synthesized"),
            Self::PatchIndex(pie) => write!(f, "{}", pie),
            Self::StepOutOfRange(step, steps) => write!(
                f,
                "synthesis step {} was requested, but only {} step(s) are available",
                step, steps
            ),
            Self::Io(io) => write!(f, "{}", io),
            Self::UnsupportedOutputFormat(fmt) => {
                write!(f, "the output format '{}' is not supported", fmt)
            }
            Self::NoExemplar => write!(f, "an exemplar must be provided to synthesize from"),
        }
    }
}

impl From<image::ImageError> for Error {
    fn from(ie: image::ImageError) -> Self {
        Self::Image(ie)
    }
}

impl From<std::io::Error> for Error {
    fn from(io: std::io::Error) -> Self {
        Self::Io(io)
    }
}
