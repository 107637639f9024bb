use std::time::Duration;

pub const REVEAL_INTERVAL: Duration = Duration::from_millis(15);
pub const CHARS_PER_TICK: usize = 1;

/// Typing effect over a finished string.
///
/// Each `tick` exposes `chars_per_tick` more characters. The state is just a
/// byte offset into the text, so restarting or fast-forwarding is trivial and
/// nothing here knows about timers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reveal {
    text: String,
    shown: usize,
    chars_per_tick: usize,
}

impl Default for Reveal {
    fn default() -> Self {
        Self::new(String::new())
    }
}

impl Reveal {
    pub fn new(text: impl Into<String>) -> Self {
        Self::with_rate(text, CHARS_PER_TICK)
    }

    pub fn with_rate(text: impl Into<String>, chars_per_tick: usize) -> Self {
        Self {
            text: text.into(),
            shown: 0,
            chars_per_tick: chars_per_tick.max(1),
        }
    }

    pub fn visible(&self) -> &str {
        &self.text[..self.shown]
    }

    pub fn full_text(&self) -> &str {
        &self.text
    }

    pub fn is_done(&self) -> bool {
        self.shown == self.text.len()
    }

    /// Advances one step. Returns `true` once everything is visible.
    pub fn tick(&mut self) -> bool {
        self.shown = advance(&self.text, self.shown, self.chars_per_tick);
        self.is_done()
    }

    pub fn finish(&mut self) {
        self.shown = self.text.len();
    }

    pub fn restart(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.shown = 0;
    }

    pub fn clear(&mut self) {
        self.restart(String::new());
    }

    /// Every prefix the reveal will show, from the current position onwards.
    pub fn frames(&self) -> Frames<'_> {
        Frames {
            text: &self.text,
            shown: self.shown,
            chars_per_tick: self.chars_per_tick,
        }
    }
}

fn advance(text: &str, shown: usize, chars: usize) -> usize {
    let rest = &text[shown..];
    shown
        + rest
            .char_indices()
            .nth(chars)
            .map(|(offset, _)| offset)
            .unwrap_or(rest.len())
}

pub struct Frames<'a> {
    text: &'a str,
    shown: usize,
    chars_per_tick: usize,
}

impl<'a> Iterator for Frames<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        if self.shown >= self.text.len() {
            return None;
        }
        self.shown = advance(self.text, self.shown, self.chars_per_tick);
        Some(&self.text[..self.shown])
    }
}
