//! Frame-stepping state machine for sprite animation.
//!
//! An [`Animator`] walks a linear strip of `frame_count` frames, advancing
//! once every `update_interval` game-loop updates. It knows nothing about
//! textures or UVs; the animated sprite renderable asks it for the current
//! frame index and maps that to a strip element.

/// How the walk behaves at the ends of the strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationKind {
    /// First frame to last, then restart from the first.
    Forward,
    /// Last frame to first, then restart from the last.
    Backward,
    /// First to last and back again, endpoints not repeated.
    Swing,
}

#[derive(Debug, Clone)]
pub struct Animator {
    kind: AnimationKind,
    frame_count: u32,
    /// Updates per frame advance. 1 advances every update.
    update_interval: u32,
    tick: u32,
    current: i32,
    advance: i32,
}

impl Animator {
    pub fn new(kind: AnimationKind, frame_count: u32, update_interval: u32) -> Self {
        let mut a = Self {
            kind,
            frame_count: frame_count.max(1),
            update_interval: update_interval.max(1),
            tick: 0,
            current: 0,
            advance: 1,
        };
        a.reset();
        a
    }

    /// Restart the walk from the kind's starting frame.
    pub fn reset(&mut self) {
        self.tick = 0;
        match self.kind {
            AnimationKind::Forward | AnimationKind::Swing => {
                self.current = 0;
                self.advance = 1;
            }
            AnimationKind::Backward => {
                self.current = self.frame_count as i32 - 1;
                self.advance = -1;
            }
        }
    }

    pub fn kind(&self) -> AnimationKind {
        self.kind
    }

    /// Switch the walk direction and restart.
    pub fn set_kind(&mut self, kind: AnimationKind) {
        self.kind = kind;
        self.reset();
    }

    pub fn update_interval(&self) -> u32 {
        self.update_interval
    }

    pub fn set_update_interval(&mut self, interval: u32) {
        self.update_interval = interval.max(1);
    }

    /// Adjust the interval by a delta, clamped to at least 1.
    pub fn nudge_update_interval(&mut self, delta: i32) {
        let interval = self.update_interval as i32 + delta;
        self.update_interval = interval.max(1) as u32;
    }

    pub fn current_frame(&self) -> u32 {
        self.current as u32
    }

    /// Advance the tick counter; step the frame once the interval elapses.
    ///
    /// Returns `true` when the current frame index changed, so callers
    /// only rebuild UVs on actual steps.
    pub fn update(&mut self) -> bool {
        self.tick += 1;
        if self.tick < self.update_interval {
            return false;
        }
        self.tick = 0;

        let last = self.frame_count as i32 - 1;
        let before = self.current;
        self.current += self.advance;
        if self.current < 0 || self.current > last {
            match self.kind {
                AnimationKind::Forward => self.current = 0,
                AnimationKind::Backward => self.current = last,
                AnimationKind::Swing => {
                    // Turn around without repeating the endpoint.
                    self.advance = -self.advance;
                    self.current = (self.current + 2 * self.advance).clamp(0, last);
                }
            }
        }
        self.current != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frames(animator: &mut Animator, updates: usize) -> Vec<u32> {
        let mut seen = vec![animator.current_frame()];
        for _ in 0..updates {
            animator.update();
            seen.push(animator.current_frame());
        }
        seen
    }

    #[test]
    fn forward_wraps_to_first() {
        let mut a = Animator::new(AnimationKind::Forward, 3, 1);
        assert_eq!(frames(&mut a, 5), vec![0, 1, 2, 0, 1, 2]);
    }

    #[test]
    fn backward_starts_at_last_and_wraps_to_last() {
        let mut a = Animator::new(AnimationKind::Backward, 3, 1);
        assert_eq!(frames(&mut a, 5), vec![2, 1, 0, 2, 1, 0]);
    }

    #[test]
    fn swing_reverses_without_repeating_endpoints() {
        let mut a = Animator::new(AnimationKind::Swing, 5, 1);
        assert_eq!(
            frames(&mut a, 10),
            vec![0, 1, 2, 3, 4, 3, 2, 1, 0, 1, 2]
        );
    }

    #[test]
    fn interval_gates_advancement() {
        let mut a = Animator::new(AnimationKind::Forward, 4, 3);
        let mut changes = 0;
        for _ in 0..9 {
            if a.update() {
                changes += 1;
            }
        }
        assert_eq!(changes, 3);
        assert_eq!(a.current_frame(), 3);
    }

    #[test]
    fn changing_kind_restarts_the_walk() {
        let mut a = Animator::new(AnimationKind::Forward, 4, 1);
        a.update();
        a.update();
        assert_eq!(a.current_frame(), 2);

        a.set_kind(AnimationKind::Backward);
        assert_eq!(a.current_frame(), 3);
    }

    #[test]
    fn single_frame_strip_stays_put() {
        let mut a = Animator::new(AnimationKind::Swing, 1, 1);
        for _ in 0..4 {
            assert!(!a.update());
            assert_eq!(a.current_frame(), 0);
        }
    }
}
