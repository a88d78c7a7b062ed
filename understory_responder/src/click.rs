// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Multi-click counting.
//!
//! A press continues the previous click sequence when it uses the same button,
//! lands on the same target, comes within [`GestureConfig::multi_click_time`] of
//! the previous press, and stays within the per-axis distance of it. Moving too
//! far between presses, or a release that did not click, breaks the sequence.

use core::time::Duration;

use kurbo::Point;

use crate::config::GestureConfig;
use crate::types::PointerButton;

#[derive(Copy, Clone, Debug, PartialEq)]
struct LastPress<K> {
    target: Option<K>,
    button: PointerButton,
    origin: Point,
    time: Duration,
    count: u32,
    out: bool,
}

/// Tracks the current multi-click sequence.
#[derive(Clone, Debug, PartialEq)]
pub struct ClickCounter<K> {
    config: GestureConfig,
    last: Option<LastPress<K>>,
}

impl<K: Copy + Eq> ClickCounter<K> {
    /// Create a counter with the given thresholds.
    pub fn new(config: GestureConfig) -> Self {
        Self { config, last: None }
    }

    /// Register a press and return its click count.
    pub fn press(
        &mut self,
        target: Option<K>,
        button: PointerButton,
        position: Point,
        time: Duration,
    ) -> u32 {
        let count = match self.last {
            Some(last) if self.continues(&last, target, button, position, time) => {
                last.count.saturating_add(1)
            }
            _ => 1,
        };
        self.last = Some(LastPress {
            target,
            button,
            origin: position,
            time,
            count,
            out: false,
        });
        count
    }

    fn continues(
        &self,
        last: &LastPress<K>,
        target: Option<K>,
        button: PointerButton,
        position: Point,
        time: Duration,
    ) -> bool {
        !last.out
            && last.button == button
            && last.target == target
            && time.saturating_sub(last.time) <= self.config.multi_click_time
            && self
                .config
                .within_distance(position.x - last.origin.x, position.y - last.origin.y)
    }

    /// Note pointer travel. Leaving the press neighborhood ends the sequence.
    ///
    /// Returns whether the pointer is still within the thresholds.
    pub fn moved(&mut self, position: Point) -> bool {
        let Some(last) = self.last.as_mut() else {
            return false;
        };
        if !self
            .config
            .within_distance(position.x - last.origin.x, position.y - last.origin.y)
        {
            last.out = true;
        }
        !last.out
    }

    /// Count of the current sequence, 0 when there is none.
    pub fn count(&self) -> u32 {
        self.last.map_or(0, |l| l.count)
    }

    /// Whether the pointer left the press neighborhood since the last press.
    pub fn is_out(&self) -> bool {
        self.last.is_none_or(|l| l.out)
    }

    /// End the sequence; the next press counts 1.
    pub fn reset(&mut self) {
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const B: PointerButton = PointerButton::Primary;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn counts_up_within_window() {
        let mut c: ClickCounter<u32> = ClickCounter::new(GestureConfig::default());
        let p = Point::new(10.0, 10.0);
        assert_eq!(c.press(Some(1), B, p, ms(0)), 1);
        assert_eq!(c.press(Some(1), B, p, ms(200)), 2);
        assert_eq!(c.press(Some(1), B, Point::new(13.0, 6.0), ms(650)), 3);
        assert_eq!(c.count(), 3);
    }

    #[test]
    fn time_gap_restarts() {
        let mut c: ClickCounter<u32> = ClickCounter::new(GestureConfig::default());
        let p = Point::new(10.0, 10.0);
        assert_eq!(c.press(Some(1), B, p, ms(0)), 1);
        assert_eq!(c.press(Some(1), B, p, ms(501)), 1, "gap beyond the window");
    }

    #[test]
    fn distance_restarts() {
        let mut c: ClickCounter<u32> = ClickCounter::new(GestureConfig::default());
        assert_eq!(c.press(Some(1), B, Point::new(10.0, 10.0), ms(0)), 1);
        assert_eq!(c.press(Some(1), B, Point::new(16.0, 10.0), ms(100)), 1);
    }

    #[test]
    fn moving_out_ends_sequence() {
        let mut c: ClickCounter<u32> = ClickCounter::new(GestureConfig::default());
        let p = Point::new(10.0, 10.0);
        c.press(Some(1), B, p, ms(0));
        assert!(c.moved(Point::new(12.0, 12.0)));
        assert!(!c.moved(Point::new(30.0, 10.0)));
        // Coming back does not restore it.
        assert!(!c.moved(p));
        assert!(c.is_out());
        assert_eq!(c.press(Some(1), B, p, ms(100)), 1);
    }

    #[test]
    fn button_and_target_must_match() {
        let mut c: ClickCounter<u32> = ClickCounter::new(GestureConfig::default());
        let p = Point::new(10.0, 10.0);
        c.press(Some(1), B, p, ms(0));
        assert_eq!(c.press(Some(1), PointerButton::Secondary, p, ms(50)), 1);
        assert_eq!(c.press(Some(2), PointerButton::Secondary, p, ms(100)), 1);
        assert_eq!(c.press(None, PointerButton::Secondary, p, ms(150)), 1);
        assert_eq!(c.press(None, PointerButton::Secondary, p, ms(200)), 2);
    }

    #[test]
    fn reset_clears() {
        let mut c: ClickCounter<u32> = ClickCounter::new(GestureConfig::default());
        let p = Point::new(0.0, 0.0);
        c.press(Some(1), B, p, ms(0));
        c.reset();
        assert_eq!(c.count(), 0);
        assert_eq!(c.press(Some(1), B, p, ms(10)), 1);
    }
}
