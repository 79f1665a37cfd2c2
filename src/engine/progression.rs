//! Step transition rules.
//!
//! These functions only touch a [`StepList`]. Deciding whether a timer is
//! still allowed to fire, and logging the result, happens in the dashboard.

use crate::types::StepList;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The step at this index is now active and needs an advance timer.
    Started(usize),
    /// Nothing left to start.
    AllDone,
}

/// Normalizes the list around its resume point and returns it.
///
/// Steps below the resume point become done, the resume point becomes the
/// only active step, steps above are cleared. Calling this on an agent that
/// is already mid-flight leaves it where it was.
pub fn resume(steps: &mut StepList) -> usize {
    let resume_at = steps.resume_index();
    for (i, step) in steps.steps_mut().iter_mut().enumerate() {
        step.done = i < resume_at;
        step.active = i == resume_at;
    }
    resume_at
}

/// Applies one tick.
pub fn tick(steps: &mut StepList) -> TickOutcome {
    let current = steps
        .find_active_index()
        .or_else(|| steps.find_first_pending_index())
        .unwrap_or(steps.len());

    let steps = steps.steps_mut();
    if current > 0 {
        steps[current - 1].done = true;
    }
    for step in steps.iter_mut() {
        step.active = false;
    }

    if current < steps.len() {
        steps[current].active = true;
        TickOutcome::Started(current)
    } else {
        TickOutcome::AllDone
    }
}

/// Completes the step at `index` and activates the next one, if any.
///
/// Returns `false` without touching the list when `index` is out of range.
pub fn advance(steps: &mut StepList, index: usize) -> bool {
    let steps = steps.steps_mut();
    if index >= steps.len() {
        return false;
    }
    for step in steps.iter_mut() {
        step.active = false;
    }
    steps[index].done = true;
    if let Some(next) = steps.get_mut(index + 1) {
        next.active = true;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Step;

    fn step(label: &str, done: bool, active: bool) -> Step {
        Step {
            label: label.to_string(),
            done,
            active,
        }
    }

    fn flags(steps: &StepList) -> Vec<(bool, bool)> {
        steps.iter().map(|s| (s.done, s.active)).collect()
    }

    #[test]
    fn test_resume_is_idempotent() {
        let mut steps = StepList::from_steps(vec![
            step("A", true, false),
            step("B", true, false),
            step("C", false, true),
            step("D", false, false),
        ]);
        let before = steps.clone();

        assert_eq!(resume(&mut steps), 2);
        assert_eq!(steps, before);
        assert_eq!(resume(&mut steps), 2);
        assert_eq!(steps, before);
    }

    #[test]
    fn test_resume_fresh_list_activates_first() {
        let mut steps = StepList::pending(["A", "B"]);
        assert_eq!(resume(&mut steps), 0);
        assert_eq!(flags(&steps), vec![(false, true), (false, false)]);
    }

    #[test]
    fn test_resume_completed_list_replays() {
        let mut steps = StepList::from_steps(vec![step("A", true, false), step("B", true, false)]);
        assert_eq!(resume(&mut steps), 0);
        assert_eq!(flags(&steps), vec![(false, true), (false, false)]);
    }

    #[test]
    fn test_resume_empty_list() {
        let mut steps = StepList::default();
        assert_eq!(resume(&mut steps), 0);
        assert!(steps.is_empty());
    }

    #[test]
    fn test_tick_marks_previous_done() {
        let mut steps = StepList::from_steps(vec![step("A", false, false), step("B", false, true)]);
        assert_eq!(tick(&mut steps), TickOutcome::Started(1));
        assert_eq!(flags(&steps), vec![(true, false), (false, true)]);
    }

    #[test]
    fn test_tick_without_active_uses_first_pending() {
        let mut steps = StepList::from_steps(vec![
            step("A", true, false),
            step("B", false, false),
            step("C", false, false),
        ]);
        assert_eq!(tick(&mut steps), TickOutcome::Started(1));
        assert_eq!(steps.find_active_index(), Some(1));
    }

    #[test]
    fn test_tick_on_complete_list() {
        let mut steps = StepList::from_steps(vec![step("A", true, false), step("B", true, false)]);
        assert_eq!(tick(&mut steps), TickOutcome::AllDone);
        assert_eq!(steps.active_count(), 0);
        assert!(steps.is_complete());
    }

    #[test]
    fn test_tick_on_empty_list() {
        let mut steps = StepList::default();
        assert_eq!(tick(&mut steps), TickOutcome::AllDone);
    }

    #[test]
    fn test_advance_moves_active_forward() {
        let mut steps = StepList::pending(["A", "B", "C"]);
        resume(&mut steps);
        assert!(advance(&mut steps, 0));
        assert_eq!(flags(&steps), vec![(true, false), (false, true), (false, false)]);
    }

    #[test]
    fn test_advance_last_step() {
        let mut steps = StepList::in_progress(["A", "B"]);
        assert!(advance(&mut steps, 1));
        assert!(steps.is_complete());
        assert_eq!(steps.active_count(), 0);
    }

    #[test]
    fn test_advance_out_of_range() {
        let mut steps = StepList::pending(["A"]);
        let before = steps.clone();
        assert!(!advance(&mut steps, 3));
        assert_eq!(steps, before);
    }

    #[test]
    fn test_walk_preserves_invariants() {
        let mut steps = StepList::pending(["A", "B", "C", "D"]);
        resume(&mut steps);
        let mut done_before = vec![false; steps.len()];

        loop {
            let outcome = tick(&mut steps);
            assert!(steps.active_count() <= 1);
            let TickOutcome::Started(index) = outcome else {
                break;
            };
            advance(&mut steps, index);
            assert!(steps.active_count() <= 1);

            for (i, s) in steps.iter().enumerate() {
                assert!(!done_before[i] || s.done, "step {} was unmarked", i);
                done_before[i] = s.done;
            }
        }

        assert!(steps.is_complete());
    }
}
