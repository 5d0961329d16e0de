//! Lesson state machines
//!
//! Two independent machines per lesson page:
//! - the run flow around the code box: `Editing -> Running -> {OutputShown |
//!   Errored} -> Editing`
//! - the quiz flow that gates progression: `Explaining -> Question(i) ->
//!   Complete`, with an incorrect answer retrying the same question
//!
//! They only meet at one point: quiz completion triggers the one-time reward
//! grant against the progress collaborator.

use crate::lesson::Lesson;
use crate::progress::Progress;

/// State of the code box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunState {
    /// Learner is editing the snippet
    #[default]
    Editing,
    /// A run is in flight
    Running,
    /// The last run produced output
    OutputShown,
    /// The last run failed
    Errored,
}

impl RunState {
    /// Start a run; only legal while editing or after a previous run
    pub fn start(self) -> RunState {
        RunState::Running
    }

    /// Record the run's outcome
    pub fn finish(self, succeeded: bool) -> RunState {
        if succeeded {
            RunState::OutputShown
        } else {
            RunState::Errored
        }
    }

    /// Return to editing
    pub fn edit(self) -> RunState {
        RunState::Editing
    }
}

/// Position in the quiz
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizState {
    /// Pre-quiz explanation screen
    Explaining,
    /// Question at this index is showing
    Question(usize),
    /// All questions answered correctly
    Complete,
}

/// Outcome of answering a question
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    Correct,
    /// Wrong choice; the same question is asked again
    Retry,
}

/// Quiz flow for one lesson.
///
/// Tracks the current position, counts wrong answers for the star rating,
/// and guarantees the reward grant fires at most once.
#[derive(Debug)]
pub struct QuizFlow<'a> {
    lesson: &'a Lesson,
    state: QuizState,
    wrong_answers: u32,
    granted: bool,
}

impl<'a> QuizFlow<'a> {
    /// Start a quiz at the explanation screen
    pub fn new(lesson: &'a Lesson) -> Self {
        QuizFlow {
            lesson,
            state: QuizState::Explaining,
            wrong_answers: 0,
            granted: false,
        }
    }

    /// Current position
    pub fn state(&self) -> QuizState {
        self.state
    }

    /// Leave the explanation screen. A lesson without questions completes
    /// immediately.
    pub fn begin(&mut self) {
        if self.state == QuizState::Explaining {
            self.state = if self.lesson.quiz.is_empty() {
                QuizState::Complete
            } else {
                QuizState::Question(0)
            };
        }
    }

    /// Answer the current question. Ignored unless a question is showing.
    pub fn answer(&mut self, choice: usize) -> Answer {
        let QuizState::Question(i) = self.state else {
            return Answer::Retry;
        };

        if self.lesson.quiz[i].correct == choice {
            self.state = if i + 1 < self.lesson.quiz.len() {
                QuizState::Question(i + 1)
            } else {
                QuizState::Complete
            };
            Answer::Correct
        } else {
            self.wrong_answers += 1;
            Answer::Retry
        }
    }

    /// Star rating: flawless earns 3, up to two misses earns 2, more earns 1
    pub fn stars(&self) -> u32 {
        match self.wrong_answers {
            0 => 3,
            1..=2 => 2,
            _ => 1,
        }
    }

    /// Grant the lesson reward once the quiz is complete. Fires at most once
    /// per flow; repeat calls are no-ops.
    pub fn grant(&mut self, progress: &mut dyn Progress, time_seconds: u32) -> bool {
        if self.state != QuizState::Complete || self.granted {
            return false;
        }

        let reward = self.lesson.reward;
        progress.add_xp_and_coins(reward.xp, reward.coins);
        progress.complete_level(
            self.lesson.id,
            reward.xp,
            reward.coins,
            self.stars(),
            time_seconds,
        );
        self.granted = true;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lesson::{Lesson, QuizQuestion, Reward};
    use crate::progress::{MemoryProgress, Progress};
    use pretty_assertions::assert_eq;

    fn quiz_lesson(questions: usize) -> Lesson {
        Lesson {
            id: 7,
            title: "Quiz Me".to_string(),
            blurb: String::new(),
            tier: 0,
            starter: String::new(),
            challenges: Vec::new(),
            quiz: (0..questions)
                .map(|i| QuizQuestion {
                    prompt: format!("Question {}", i + 1),
                    choices: vec!["wrong".to_string(), "right".to_string()],
                    correct: 1,
                })
                .collect(),
            reward: Reward { xp: 40, coins: 15 },
        }
    }

    #[test]
    fn test_run_state_cycle() {
        let state = RunState::Editing.start().finish(true);
        assert_eq!(state, RunState::OutputShown);
        assert_eq!(state.edit(), RunState::Editing);
        assert_eq!(RunState::Running.finish(false), RunState::Errored);
    }

    #[test]
    fn test_quiz_walks_questions_in_order() {
        let lesson = quiz_lesson(2);
        let mut flow = QuizFlow::new(&lesson);
        assert_eq!(flow.state(), QuizState::Explaining);

        flow.begin();
        assert_eq!(flow.state(), QuizState::Question(0));

        assert_eq!(flow.answer(1), Answer::Correct);
        assert_eq!(flow.state(), QuizState::Question(1));

        assert_eq!(flow.answer(1), Answer::Correct);
        assert_eq!(flow.state(), QuizState::Complete);
    }

    #[test]
    fn test_wrong_answer_retries_same_question() {
        let lesson = quiz_lesson(1);
        let mut flow = QuizFlow::new(&lesson);
        flow.begin();

        assert_eq!(flow.answer(0), Answer::Retry);
        assert_eq!(flow.state(), QuizState::Question(0));
        assert_eq!(flow.answer(1), Answer::Correct);
        assert_eq!(flow.state(), QuizState::Complete);
    }

    #[test]
    fn test_star_rating() {
        let lesson = quiz_lesson(1);

        let mut flawless = QuizFlow::new(&lesson);
        flawless.begin();
        flawless.answer(1);
        assert_eq!(flawless.stars(), 3);

        let mut one_miss = QuizFlow::new(&lesson);
        one_miss.begin();
        one_miss.answer(0);
        one_miss.answer(1);
        assert_eq!(one_miss.stars(), 2);

        let mut many_misses = QuizFlow::new(&lesson);
        many_misses.begin();
        for _ in 0..4 {
            many_misses.answer(0);
        }
        many_misses.answer(1);
        assert_eq!(many_misses.stars(), 1);
    }

    #[test]
    fn test_grant_fires_exactly_once() {
        let lesson = quiz_lesson(1);
        let mut flow = QuizFlow::new(&lesson);
        let mut progress = MemoryProgress::new();

        flow.begin();
        flow.answer(1);

        assert!(flow.grant(&mut progress, 90));
        assert!(!flow.grant(&mut progress, 90));
        assert_eq!(progress.xp(), 40);
        assert_eq!(progress.coins(), 15);
        assert_eq!(progress.completed().len(), 1);
        assert_eq!(progress.completed()[0].stars, 3);
    }

    #[test]
    fn test_grant_refused_before_completion() {
        let lesson = quiz_lesson(2);
        let mut flow = QuizFlow::new(&lesson);
        let mut progress = MemoryProgress::new();

        flow.begin();
        flow.answer(1);
        assert!(!flow.grant(&mut progress, 10));
        assert_eq!(progress.xp(), 0);
    }

    #[test]
    fn test_empty_quiz_completes_on_begin() {
        let lesson = quiz_lesson(0);
        let mut flow = QuizFlow::new(&lesson);
        flow.begin();
        assert_eq!(flow.state(), QuizState::Complete);
    }

    #[test]
    fn test_answer_ignored_outside_question() {
        let lesson = quiz_lesson(1);
        let mut flow = QuizFlow::new(&lesson);
        assert_eq!(flow.answer(1), Answer::Retry);
        assert_eq!(flow.state(), QuizState::Explaining);
    }
}
