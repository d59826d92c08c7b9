use smallvec::SmallVec;

/// Playback decision for one item's background media.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaybackCommand {
    Play(usize),
    Pause(usize),
}

/// Tracks per-item viewport visibility and gates media playback.
///
/// The embedder reports visibility ratios (its intersection observer, its
/// scroll math); the gate emits play/pause commands on threshold crossings
/// and pauses everything while the page itself is hidden.
#[derive(Debug)]
pub struct VisibilityGate {
    threshold: f64,
    over: Vec<bool>,
    playing: Vec<bool>,
    page_hidden: bool,
}

impl VisibilityGate {
    pub fn new(item_count: usize, threshold: f64) -> Self {
        Self {
            threshold: threshold.clamp(0.0, 1.0),
            over: vec![false; item_count],
            playing: vec![false; item_count],
            page_hidden: false,
        }
    }

    /// Half-visible is the classic autoplay trigger.
    pub fn with_default_threshold(item_count: usize) -> Self {
        Self::new(item_count, 0.5)
    }

    /// Report a fresh visibility ratio for an item. Returns a command only on
    /// an actual playback change.
    pub fn update(&mut self, item: usize, ratio: f64) -> Option<PlaybackCommand> {
        if item >= self.over.len() {
            return None;
        }
        let over = ratio >= self.threshold;
        self.over[item] = over;
        if self.page_hidden {
            return None;
        }
        if over && !self.playing[item] {
            self.playing[item] = true;
            Some(PlaybackCommand::Play(item))
        } else if !over && self.playing[item] {
            self.playing[item] = false;
            Some(PlaybackCommand::Pause(item))
        } else {
            None
        }
    }

    /// Page visibility change. Hiding pauses every playing item; unhiding
    /// resumes items still over the threshold.
    pub fn set_page_hidden(&mut self, hidden: bool) -> SmallVec<[PlaybackCommand; 4]> {
        let mut out = SmallVec::new();
        if hidden == self.page_hidden {
            return out;
        }
        self.page_hidden = hidden;
        if hidden {
            for (i, p) in self.playing.iter_mut().enumerate() {
                if *p {
                    *p = false;
                    out.push(PlaybackCommand::Pause(i));
                }
            }
        } else {
            for (i, p) in self.playing.iter_mut().enumerate() {
                if self.over[i] && !*p {
                    *p = true;
                    out.push(PlaybackCommand::Play(i));
                }
            }
        }
        out
    }

    pub fn is_playing(&self, item: usize) -> bool {
        self.playing.get(item).copied().unwrap_or(false)
    }
}
