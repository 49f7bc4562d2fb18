//! Line-count policy for outbound chat messages.
//!
//! A message carrying a fenced block gets two extra lines of allowance for the
//! fence delimiters themselves. Only the first opening/closing pair is looked
//! at; this is a heuristic, not a markdown parser.

/// Base line limit used when nothing is configured.
pub const DEFAULT_MAX_LINES: usize = 15;

/// Extra lines granted to a message that carries a fenced block.
pub const FENCE_BONUS_LINES: usize = 2;

const TAGGED_FENCE: &str = "```yaml";
const BARE_FENCE: &str = "```";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineLimit {
    base: usize,
}

impl Default for LineLimit {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_LINES)
    }
}

impl LineLimit {
    pub fn new(base: usize) -> Self {
        Self { base }
    }

    pub fn base(&self) -> usize {
        self.base
    }

    /// The limit that applies to `text`, including the fence allowance.
    pub fn effective_limit(&self, text: &str) -> usize {
        if has_fenced_block(text) {
            self.base + FENCE_BONUS_LINES
        } else {
            self.base
        }
    }

    /// Whether `text` fits the limit. Empty text always fits.
    pub fn is_within_limit(&self, text: &str) -> bool {
        if text.is_empty() {
            return true;
        }
        line_count(text) <= self.effective_limit(text)
    }
}

/// Number of `\n`-separated segments, so a trailing newline counts as a line.
pub fn line_count(text: &str) -> usize {
    text.split('\n').count()
}

/// Whether `text` has an opening fence followed by a closing one.
///
/// The tagged fence is searched first; the bare fence is only considered when
/// no tagged fence exists anywhere in the text.
pub fn has_fenced_block(text: &str) -> bool {
    let Some(start) = text.find(TAGGED_FENCE).or_else(|| text.find(BARE_FENCE)) else {
        return false;
    };
    let after_open = start + BARE_FENCE.len();
    text[after_open..].contains(BARE_FENCE)
}
