use std::time::{Duration, Instant};

use lineend_buffer::{BufferId, Disposable, EditorBuffer, Subscription};
use lineend_config::{Config, DefaultLineEnding};
use lineend_core::{LineEnding, LineEndingSet, Platform};

use crate::debounce::RescanScheduler;
use crate::reaction::{classify, Reaction};
use crate::scan::compute_line_endings;

/// Consumer of the tracker's state, e.g. a status bar tile.
pub trait LineEndingDisplay {
    /// Replace the displayed set.
    fn set_line_endings(&mut self, endings: LineEndingSet);

    /// Check if the displayed set contains `ending`.
    fn has_line_ending(&self, ending: LineEnding) -> bool;

    /// Human-readable description of the displayed set.
    fn description(&self) -> String;
}

impl LineEndingDisplay for LineEndingSet {
    fn set_line_endings(&mut self, endings: LineEndingSet) {
        *self = endings;
    }

    fn has_line_ending(&self, ending: LineEnding) -> bool {
        self.contains(ending)
    }

    fn description(&self) -> String {
        LineEndingSet::description(self).to_string()
    }
}

/// Tracker settings, usually derived from `Config`.
#[derive(Debug, Clone)]
pub struct TrackerSettings {
    /// Style applied to buffers without terminators
    pub default_line_ending: DefaultLineEnding,
    /// Quiet period before a rescan runs
    pub rescan_debounce: Duration,
    /// Host platform, for "OS Default"
    pub platform: Platform,
}

impl TrackerSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            default_line_ending: config.line_endings.default_line_ending.clone(),
            rescan_debounce: Duration::from_millis(config.line_endings.rescan_debounce_ms),
            platform: Platform::current(),
        }
    }
}

impl Default for TrackerSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// The buffer currently tracked, identified by its change subscription.
#[derive(Debug)]
struct TrackedBuffer {
    subscription: Subscription,
}

impl TrackedBuffer {
    fn id(&self) -> BufferId {
        self.subscription.buffer_id()
    }
}

impl Drop for TrackedBuffer {
    fn drop(&mut self) {
        self.subscription.dispose();
    }
}

/// Keeps a display in sync with the line endings of one buffer at a time.
///
/// The tracker never owns the buffer. The host passes it to `attach` and then
/// to every `poll`; notifications queue on the subscription in between.
#[derive(Debug)]
pub struct LineEndingTracker<D> {
    display: D,
    default_line_ending: DefaultLineEnding,
    platform: Platform,
    tracked: Option<TrackedBuffer>,
    scheduler: RescanScheduler,
}

impl<D: LineEndingDisplay> LineEndingTracker<D> {
    pub fn new(display: D, settings: TrackerSettings) -> Self {
        Self {
            display,
            default_line_ending: settings.default_line_ending,
            platform: settings.platform,
            tracked: None,
            scheduler: RescanScheduler::new(settings.rescan_debounce),
        }
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    /// Buffer currently tracked, if any.
    pub fn tracked_buffer(&self) -> Option<BufferId> {
        self.tracked.as_ref().map(TrackedBuffer::id)
    }

    /// Check if a rescan is waiting for its debounce window.
    pub fn has_pending_rescan(&self) -> bool {
        self.scheduler.has_pending()
    }

    /// Line ending applied to buffers without terminators.
    pub fn get_default(&self) -> LineEnding {
        self.default_line_ending.resolve(self.platform)
    }

    /// Change the configured default. Applies to the next empty-buffer scan.
    pub fn set_default_line_ending(&mut self, default: DefaultLineEnding) {
        self.default_line_ending = default;
    }

    /// Change the quiet period. A rescan already pending keeps its due time.
    pub fn set_rescan_debounce(&mut self, delay: Duration) {
        self.scheduler.set_delay(delay);
    }

    /// Start tracking `buffer`, releasing the previously tracked one.
    ///
    /// Publishes the scanned set right away. The returned handle releases
    /// the change subscription; disposing it more than once is harmless.
    pub fn attach<B: EditorBuffer + ?Sized>(&mut self, buffer: &mut B) -> Disposable {
        self.release();
        self.refresh(buffer);

        let subscription = buffer.on_did_change();
        let handle = subscription.disposable();
        log::debug!("Tracking line endings of {}", buffer.id());
        self.tracked = Some(TrackedBuffer { subscription });
        handle
    }

    /// Stop tracking and clear the display.
    pub fn detach(&mut self) {
        self.release();
        self.display.set_line_endings(LineEndingSet::new());
    }

    /// Scan `buffer`, apply the default if it has no terminators, and publish.
    pub fn refresh<B: EditorBuffer + ?Sized>(&mut self, buffer: &mut B) -> LineEndingSet {
        let mut endings = compute_line_endings(buffer);
        if endings.is_empty() {
            let default = self.get_default();
            buffer.set_preferred_line_ending(default);
            endings = LineEndingSet::single(default);
            log::debug!("{} has no line endings, defaulting to {}", buffer.id(), default);
        }
        self.display.set_line_endings(endings);
        endings
    }

    /// Process queued notifications and run a due rescan.
    ///
    /// Returns true if a rescan ran and the display was updated.
    pub fn poll<B: EditorBuffer + ?Sized>(&mut self, buffer: &mut B) -> bool {
        self.poll_at(buffer, Instant::now())
    }

    /// `poll` against an explicit clock reading.
    pub fn poll_at<B: EditorBuffer + ?Sized>(&mut self, buffer: &mut B, now: Instant) -> bool {
        let Some(tracked_id) = self.tracked_buffer() else {
            return false;
        };

        if buffer.id() != tracked_id {
            log::debug!("Ignoring poll for untracked {}", buffer.id());
            return false;
        }

        let published = self.published();
        if let Some(tracked) = self.tracked.as_mut() {
            if tracked.subscription.is_disposed() {
                log::debug!("Subscription of {} was disposed", tracked_id);
                self.tracked = None;
                self.scheduler.cancel_for(tracked_id);
                return false;
            }

            for change in tracked.subscription.drain() {
                if classify(&change, &published) == Reaction::Rescan {
                    self.scheduler.schedule_at(tracked_id, now);
                }
            }
        }

        if !self.scheduler.is_due_at(now) {
            return false;
        }

        if self.scheduler.pending_buffer() != Some(tracked_id) {
            // Scheduled for a buffer that is no longer tracked
            self.scheduler.cancel();
            return false;
        }

        self.scheduler.take_due_at(now);
        self.refresh(buffer);
        true
    }

    /// Set currently shown by the display.
    fn published(&self) -> LineEndingSet {
        LineEnding::ALL
            .into_iter()
            .filter(|ending| self.display.has_line_ending(*ending))
            .collect()
    }

    fn release(&mut self) {
        if let Some(tracked) = self.tracked.take() {
            self.scheduler.cancel_for(tracked.id());
            log::debug!("Released {}", tracked.id());
        }
        // A rescan left over from an earlier buffer must never fire
        self.scheduler.cancel();
    }
}
