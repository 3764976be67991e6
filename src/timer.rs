//! Scoped timing of diff phases, logged at debug level
use log::debug;
use std::time::Instant;

#[derive(Debug, Clone)]
pub struct DebugTimer {
    tag: String,
    enabled: bool,
}

impl DebugTimer {
    pub fn new(tag: impl Into<String>, enabled: bool) -> Self {
        DebugTimer {
            tag: tag.into(),
            enabled,
        }
    }

    pub fn disabled() -> Self {
        DebugTimer::new(String::new(), false)
    }

    /// Start timing `section`; the elapsed time is logged when the guard drops.
    pub fn section(&self, section: &'static str) -> TimedSection<'_> {
        TimedSection {
            tag: &self.tag,
            section,
            started: self.enabled.then(Instant::now),
        }
    }
}

#[must_use = "the section is timed until the guard is dropped"]
pub struct TimedSection<'a> {
    tag: &'a str,
    section: &'static str,
    started: Option<Instant>,
}

impl TimedSection<'_> {
    pub fn is_running(&self) -> bool {
        self.started.is_some()
    }
}

impl Drop for TimedSection<'_> {
    fn drop(&mut self) {
        if let Some(started) = self.started.take() {
            debug!("{}: {}: {:?}", self.tag, self.section, started.elapsed());
        }
    }
}
