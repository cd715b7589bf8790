use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use parallel_texture_synthesis::{GeneratorProgress, ProgressUpdate};

/// Renders synthesis progress as two bars, one for the whole run and one for
/// the level currently being synthesized
pub struct ProgressBars {
    total_pb: ProgressBar,
    stage_pb: ProgressBar,

    total_len: usize,
    stage_len: usize,
    level: Option<usize>,
}

impl ProgressBars {
    pub fn new() -> Self {
        let multi_pb = MultiProgress::new();
        let sty = ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {percent}%")
            .progress_chars("##-");

        let total_pb = multi_pb.add(ProgressBar::new(100));
        total_pb.set_style(sty);

        let sty = ProgressStyle::default_bar()
            .template(" level {msg:>3} {bar:40.cyan/blue} {percent}%")
            .progress_chars("##-");
        let stage_pb = multi_pb.add(ProgressBar::new(100));
        stage_pb.set_style(sty);

        std::thread::spawn(move || {
            let _ = multi_pb.join();
        });

        Self {
            total_pb,
            stage_pb,
            total_len: 100,
            stage_len: 100,
            level: None,
        }
    }
}

impl Drop for ProgressBars {
    fn drop(&mut self) {
        self.total_pb.finish();
        self.stage_pb.finish();
    }
}

impl GeneratorProgress for ProgressBars {
    fn update(&mut self, update: ProgressUpdate) {
        if update.total.total != self.total_len {
            self.total_len = update.total.total;
            self.total_pb.set_length(self.total_len as u64);
        }

        if update.stage.total != self.stage_len {
            self.stage_len = update.stage.total;
            self.stage_pb.set_length(self.stage_len as u64);
        }

        if self.level != Some(update.level) {
            self.level = Some(update.level);
            self.stage_pb.set_message(&update.level.to_string());
        }

        self.total_pb.set_position(update.total.current as u64);
        self.stage_pb.set_position(update.stage.current as u64);
    }
}
