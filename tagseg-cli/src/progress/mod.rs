//! Progress of a multi-file run

use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tagseg_engine::RunStats;

const TEMPLATE: &str = "[{elapsed_precise}] {bar:40.cyan/blue} {bytes}/{total_bytes} {msg}";

/// Input bytes consumed and sentences written across the input files
///
/// The bar advances by a file's size once the engine is done with it and
/// shows that file's counters. Totals are kept even when no bar is drawn.
pub struct RunProgress {
    bar: Option<ProgressBar>,
    total: RunStats,
    files: usize,
}

impl RunProgress {
    /// Progress over `files`, drawn unless `quiet`
    pub fn new(files: &[PathBuf], quiet: bool) -> Self {
        let bar = (!quiet).then(|| {
            let total_bytes = files.iter().map(|file| file_size(file)).sum();
            let bar = ProgressBar::new(total_bytes);
            if let Ok(style) = ProgressStyle::default_bar().template(TEMPLATE) {
                bar.set_style(style.progress_chars("##-"));
            }
            bar.enable_steady_tick(Duration::from_millis(100));
            bar
        });

        Self {
            bar,
            total: RunStats::default(),
            files: 0,
        }
    }

    /// Account for a file the engine has finished
    pub fn record(&mut self, file: &Path, stats: RunStats) {
        self.total.sentences += stats.sentences;
        self.total.words += stats.words;
        self.files += 1;

        let name = file.display();
        let RunStats { sentences, words } = stats;
        log::debug!("{name}: {sentences} sentences, {words} words");
        if let Some(bar) = &self.bar {
            bar.inc(file_size(file));
            bar.set_message(format!("{name}: {sentences} sentences, {words} words"));
        }
    }

    /// Close the bar and hand back the summed counters
    pub fn finish(self) -> RunStats {
        let RunStats { sentences, words } = self.total;
        if let Some(bar) = &self.bar {
            let files = self.files;
            let summary = format!("{files} files: {sentences} sentences, {words} words");
            bar.finish_with_message(summary);
        }
        self.total
    }
}

// Unreadable files count as empty; the run itself reports the error
fn file_size(path: &Path) -> u64 {
    fs::metadata(path).map(|meta| meta.len()).unwrap_or(0)
}
