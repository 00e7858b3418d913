//! # Progress Display Module / 进度显示模块
//!
//! Incremental progress display while tests run.
//!
//! 测试运行期间的增量进度显示。

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use crate::core::execution::{RunObserver, SilentObserver};
use crate::core::models::{RunReport, TestResult};
use crate::infra::t;

const BAR_TEMPLATE: &str = "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}";

/// Drives a progress bar: one step per finished test. Tests that do not
/// pass are printed above the bar as soon as they finish.
pub struct ProgressObserver {
    bar: ProgressBar,
    locale: String,
}

impl ProgressObserver {
    pub fn new(locale: &str) -> Self {
        Self::with_draw_target(locale, ProgressDrawTarget::stderr())
    }

    /// Creates an observer drawing to `target`; tests use a hidden target.
    pub fn with_draw_target(locale: &str, target: ProgressDrawTarget) -> Self {
        let bar = ProgressBar::with_draw_target(Some(0), target);
        if let Ok(style) = ProgressStyle::with_template(BAR_TEMPLATE) {
            bar.set_style(style.progress_chars("=> "));
        }
        Self {
            bar,
            locale: locale.to_string(),
        }
    }

    /// Number of steps advanced so far.
    pub fn position(&self) -> u64 {
        self.bar.position()
    }
}

impl RunObserver for ProgressObserver {
    fn on_start(&mut self, total: usize) {
        self.bar.set_length(total as u64);
        self.bar.set_position(0);
    }

    fn on_test_finished(&mut self, _index: usize, result: &TestResult) {
        if result.is_failure() {
            self.bar.println(format!(
                "{} {}",
                result.get_status_str(&self.locale),
                result.name()
            ));
        }
        self.bar.set_message(result.name().to_string());
        self.bar.inc(1);
    }

    fn on_finish(&mut self, report: &RunReport) {
        self.bar.finish_with_message(
            t!("progress.finished", locale = &self.locale, total = report.total()).to_string(),
        );
    }
}

/// The observer matching the progress flag of a run: a progress bar when
/// enabled, nothing at all otherwise.
pub fn observer_for(progress_enabled: bool, locale: &str) -> Box<dyn RunObserver> {
    if progress_enabled {
        Box::new(ProgressObserver::new(locale))
    } else {
        Box::new(SilentObserver)
    }
}
