use std::cell::RefCell;

use anyhow::Result;
use cinestack_core::progress::{ProgressReporter, Stage};
use indicatif::{ProgressBar, ProgressStyle};

/// Bridges core progress reporting onto an indicatif bar, one bar per stage.
pub struct ConsoleReporter {
    style: ProgressStyle,
    bar: RefCell<Option<ProgressBar>>,
}

impl ConsoleReporter {
    pub fn new() -> Result<Self> {
        Ok(Self {
            style: ProgressStyle::default_bar()
                .template("{msg:24} [{bar:40}] {pos}/{len}")?
                .progress_chars("=> "),
            bar: RefCell::new(None),
        })
    }
}

impl ProgressReporter for ConsoleReporter {
    fn begin_stage(&self, stage: Stage, total_items: Option<usize>) {
        let pb = match total_items {
            Some(total) => {
                let pb = ProgressBar::new(total as u64);
                pb.set_style(self.style.clone());
                pb
            }
            None => ProgressBar::new_spinner(),
        };
        pb.set_message(stage.to_string());
        *self.bar.borrow_mut() = Some(pb);
    }

    fn advance(&self, items_done: usize) {
        if let Some(pb) = self.bar.borrow().as_ref() {
            pb.set_position(items_done as u64);
        }
    }

    fn finish_stage(&self) {
        if let Some(pb) = self.bar.borrow_mut().take() {
            pb.finish();
        }
    }
}
