use crate::domain::services::schedule::OpenInterval;

/// A candidate reservable interval, in minutes from local midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CandidateSlot {
    pub start_min: u16,
    pub end_min: u16,
}

/// Lazy, finite sequence of candidate slots over a day's open intervals.
/// Starts are spaced by the generation step, not the duration, so
/// consecutive candidates overlap on purpose; the conflict resolver
/// filters them later. Cloning restarts the sequence from the beginning.
#[derive(Debug, Clone)]
pub struct SlotIter {
    intervals: Vec<OpenInterval>,
    duration_min: u16,
    step_min: u16,
    idx: usize,
    cursor: u16,
}

pub fn candidate_slots(intervals: &[OpenInterval], duration_min: u16, step_min: u16) -> SlotIter {
    let intervals = intervals.to_vec();
    let exhausted = duration_min == 0 || step_min == 0;
    let cursor = intervals.first().map(|i| i.start_min).unwrap_or(0);
    SlotIter {
        idx: if exhausted { intervals.len() } else { 0 },
        intervals,
        duration_min,
        step_min,
        cursor,
    }
}

impl Iterator for SlotIter {
    type Item = CandidateSlot;

    fn next(&mut self) -> Option<CandidateSlot> {
        while self.idx < self.intervals.len() {
            let interval = self.intervals[self.idx];
            let end = self.cursor.saturating_add(self.duration_min);
            if end <= interval.end_min {
                let slot = CandidateSlot { start_min: self.cursor, end_min: end };
                self.cursor = self.cursor.saturating_add(self.step_min);
                return Some(slot);
            }
            self.idx += 1;
            if let Some(next) = self.intervals.get(self.idx) {
                self.cursor = next.start_min;
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interval(start_min: u16, end_min: u16) -> OpenInterval {
        OpenInterval { start_min, end_min }
    }

    #[test]
    fn starts_are_spaced_by_step_not_duration() {
        // 09:00-12:00, 60 min duration, 30 min step: overlapping starts.
        let slots: Vec<_> = candidate_slots(&[interval(540, 720)], 60, 30).collect();
        let starts: Vec<u16> = slots.iter().map(|s| s.start_min).collect();
        assert_eq!(starts, vec![540, 570, 600, 630, 660]);
        assert!(slots.iter().all(|s| s.end_min == s.start_min + 60));
    }

    #[test]
    fn slot_must_fit_entirely_within_one_interval() {
        // 09:00-10:30 window: 09:00 and 09:30 starts fit, 10:00 does not.
        let slots: Vec<_> = candidate_slots(&[interval(540, 630)], 60, 30).collect();
        assert_eq!(slots.len(), 2);
        assert_eq!(slots.last().unwrap().end_min, 630);
    }

    #[test]
    fn interval_shorter_than_duration_yields_nothing() {
        let slots: Vec<_> = candidate_slots(&[interval(540, 570)], 60, 30).collect();
        assert!(slots.is_empty());
    }

    #[test]
    fn spans_multiple_intervals_without_bridging() {
        let slots: Vec<_> = candidate_slots(&[interval(540, 600), interval(720, 780)], 60, 30).collect();
        assert_eq!(
            slots,
            vec![
                CandidateSlot { start_min: 540, end_min: 600 },
                CandidateSlot { start_min: 720, end_min: 780 },
            ]
        );
    }

    #[test]
    fn zero_duration_or_step_is_empty() {
        assert_eq!(candidate_slots(&[interval(540, 720)], 0, 30).count(), 0);
        assert_eq!(candidate_slots(&[interval(540, 720)], 60, 0).count(), 0);
    }

    #[test]
    fn clone_restarts_the_sequence() {
        let mut iter = candidate_slots(&[interval(540, 720)], 60, 60);
        let restart = iter.clone();
        iter.next();
        iter.next();
        assert_eq!(restart.count(), 3);
        assert_eq!(iter.count(), 1);
    }
}
