//! Screen-to-screen flow of one quiz attempt.
//!
//! The controller never sleeps: selecting an answer schedules the move to the
//! next question at a deadline, and the caller applies it with
//! [`QuizFlow::poll`] once its clock has passed that deadline. The bot drives
//! the clock with real time, tests with a manual clock.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use log::debug;

use crate::quiz::{crew::CrewMember, scoring, AnswerSet, Question, QUESTIONS, QUESTION_COUNT};

/// Pause between picking an answer and showing the next question.
pub const ADVANCE_DELAY: Duration = Duration::from_millis(500);

pub trait Clock: Send + Sync {
    /// Time elapsed since an arbitrary, fixed origin.
    fn now(&self) -> Duration;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        // Wall clock so that deadlines stored with the chat survive a restart
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Screen {
    Welcome,
    Quiz { index: usize },
    Result { member: CrewMember },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowEvent {
    Started,
    /// Answer recorded, the flow moves on at `due`.
    Selected { due: Duration },
    Advanced { index: usize },
    Completed { member: CrewMember },
    WentBack { index: usize },
    Retook,
    /// The event does not apply to the current screen.
    Ignored,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct QuizFlow {
    screen: Screen,
    answers: AnswerSet,
    highlighted: Option<String>,
    advance_due: Option<Duration>,
}

impl Default for QuizFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl QuizFlow {
    pub fn new() -> Self {
        Self {
            screen: Screen::Welcome,
            answers: AnswerSet::new(),
            highlighted: None,
            advance_due: None,
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn answers(&self) -> &AnswerSet {
        &self.answers
    }

    /// Value of the option currently marked as chosen on the quiz screen.
    pub fn highlighted(&self) -> Option<&str> {
        self.highlighted.as_deref()
    }

    pub fn advance_due(&self) -> Option<Duration> {
        self.advance_due
    }

    pub fn current_question(&self) -> Option<&'static Question> {
        match self.screen {
            Screen::Quiz { index } => QUESTIONS.get(index),
            _ => None,
        }
    }

    pub fn start(&mut self) -> FlowEvent {
        if self.screen != Screen::Welcome {
            return FlowEvent::Ignored;
        }
        self.answers.clear();
        self.highlighted = None;
        self.advance_due = None;
        self.screen = Screen::Quiz { index: 0 };
        debug!("Quiz started");
        FlowEvent::Started
    }

    pub fn select(&mut self, value: &str, now: Duration) -> FlowEvent {
        if self.advance_due.is_some() {
            return FlowEvent::Ignored;
        }
        let question = match self.current_question() {
            Some(question) => question,
            None => return FlowEvent::Ignored,
        };
        if question.option(value).is_none() {
            debug!("Ignoring unknown option {:?} for {}", value, question.id);
            return FlowEvent::Ignored;
        }

        self.answers.record(question.id, value);
        self.highlighted = Some(value.to_string());
        let due = now + ADVANCE_DELAY;
        self.advance_due = Some(due);
        FlowEvent::Selected { due }
    }

    /// Applies a pending advance whose deadline has passed.
    pub fn poll(&mut self, now: Duration) -> Option<FlowEvent> {
        let due = self.advance_due?;
        if now < due {
            return None;
        }
        self.advance_due = None;

        let index = match self.screen {
            Screen::Quiz { index } => index,
            _ => return None,
        };
        if index + 1 < QUESTION_COUNT {
            self.highlighted = None;
            self.screen = Screen::Quiz { index: index + 1 };
            debug!("Advanced to question {}", index + 2);
            Some(FlowEvent::Advanced { index: index + 1 })
        } else {
            let member = scoring::score(&self.answers);
            self.highlighted = None;
            self.screen = Screen::Result { member };
            Some(FlowEvent::Completed { member })
        }
    }

    pub fn back(&mut self) -> FlowEvent {
        if self.advance_due.is_some() {
            return FlowEvent::Ignored;
        }
        match self.screen {
            Screen::Quiz { index } if index > 0 => {
                let previous = index - 1;
                self.screen = Screen::Quiz { index: previous };
                self.highlighted = self
                    .answers
                    .get(QUESTIONS[previous].id)
                    .map(str::to_string);
                FlowEvent::WentBack { index: previous }
            }
            _ => FlowEvent::Ignored,
        }
    }

    pub fn retake(&mut self) -> FlowEvent {
        if !matches!(self.screen, Screen::Result { .. }) {
            return FlowEvent::Ignored;
        }
        *self = Self::new();
        FlowEvent::Retook
    }

    /// Drops a pending advance so that it never fires.
    pub fn teardown(&mut self) {
        self.advance_due = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};

    #[derive(Default)]
    struct ManualClock {
        millis: AtomicU64,
    }

    impl ManualClock {
        fn new() -> Self {
            Self::default()
        }

        fn advance(&self, by: Duration) {
            self.millis.fetch_add(by.as_millis() as u64, Ordering::SeqCst);
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> Duration {
            Duration::from_millis(self.millis.load(Ordering::SeqCst))
        }
    }

    fn answer_current(flow: &mut QuizFlow, clock: &ManualClock, value: &str) -> FlowEvent {
        assert!(matches!(
            flow.select(value, clock.now()),
            FlowEvent::Selected { .. }
        ));
        clock.advance(ADVANCE_DELAY);
        flow.poll(clock.now()).expect("advance should be due")
    }

    #[test]
    fn full_run_ends_on_result() {
        let clock = ManualClock::new();
        let mut flow = QuizFlow::new();
        assert_eq!(flow.start(), FlowEvent::Started);

        for (i, value) in ["chart", "coffee", "whisper", "logic"].iter().enumerate() {
            assert_eq!(
                answer_current(&mut flow, &clock, value),
                FlowEvent::Advanced { index: i + 1 }
            );
            assert_eq!(flow.highlighted(), None);
        }
        assert_eq!(
            answer_current(&mut flow, &clock, "fortress"),
            FlowEvent::Completed {
                member: CrewMember::ElCapo
            }
        );
        assert_eq!(
            flow.screen(),
            Screen::Result {
                member: CrewMember::ElCapo
            }
        );
        assert_eq!(flow.answers().len(), 5);
    }

    #[test]
    fn advance_waits_for_the_delay() {
        let clock = ManualClock::new();
        let mut flow = QuizFlow::new();
        flow.start();
        let due = match flow.select("party", clock.now()) {
            FlowEvent::Selected { due } => due,
            other => panic!("unexpected {:?}", other),
        };
        assert_eq!(due, ADVANCE_DELAY);
        assert_eq!(flow.highlighted(), Some("party"));

        clock.advance(Duration::from_millis(499));
        assert_eq!(flow.poll(clock.now()), None);
        assert_eq!(flow.screen(), Screen::Quiz { index: 0 });

        clock.advance(Duration::from_millis(1));
        assert_eq!(flow.poll(clock.now()), Some(FlowEvent::Advanced { index: 1 }));
    }

    #[test]
    fn input_during_pending_advance_is_ignored() {
        let clock = ManualClock::new();
        let mut flow = QuizFlow::new();
        flow.start();
        answer_current(&mut flow, &clock, "party");

        flow.select("rum", clock.now());
        assert_eq!(flow.select("beer", clock.now()), FlowEvent::Ignored);
        assert_eq!(flow.back(), FlowEvent::Ignored);
        assert_eq!(flow.answers().get("q2"), Some("rum"));
    }

    #[test]
    fn back_restores_previous_answer() {
        let clock = ManualClock::new();
        let mut flow = QuizFlow::new();
        flow.start();
        answer_current(&mut flow, &clock, "yell");

        assert_eq!(flow.back(), FlowEvent::WentBack { index: 0 });
        assert_eq!(flow.highlighted(), Some("yell"));
        assert_eq!(flow.back(), FlowEvent::Ignored);
        assert_eq!(flow.screen(), Screen::Quiz { index: 0 });

        // Revisiting overwrites instead of adding
        answer_current(&mut flow, &clock, "fix");
        assert_eq!(flow.answers().len(), 1);
        assert_eq!(flow.answers().get("q1"), Some("fix"));
    }

    #[test]
    fn teardown_cancels_pending_advance() {
        let clock = ManualClock::new();
        let mut flow = QuizFlow::new();
        flow.start();
        flow.select("stars", clock.now());
        flow.teardown();
        clock.advance(Duration::from_secs(5));
        assert_eq!(flow.poll(clock.now()), None);
        assert_eq!(flow.screen(), Screen::Quiz { index: 0 });
    }

    #[test]
    fn unknown_option_is_not_recorded() {
        let clock = ManualClock::new();
        let mut flow = QuizFlow::new();
        flow.start();
        assert_eq!(flow.select("rum", clock.now()), FlowEvent::Ignored);
        assert!(flow.answers().is_empty());
        assert_eq!(flow.advance_due(), None);
    }

    #[test]
    fn events_outside_their_screen_are_ignored() {
        let clock = ManualClock::new();
        let mut flow = QuizFlow::new();
        assert_eq!(flow.select("party", clock.now()), FlowEvent::Ignored);
        assert_eq!(flow.back(), FlowEvent::Ignored);
        assert_eq!(flow.retake(), FlowEvent::Ignored);
        flow.start();
        assert_eq!(flow.start(), FlowEvent::Ignored);
    }

    #[test]
    fn retake_clears_answers() {
        let clock = ManualClock::new();
        let mut flow = QuizFlow::new();
        flow.start();
        for value in ["party", "rum", "sing", "charisma", "bonfire"] {
            answer_current(&mut flow, &clock, value);
        }
        assert_eq!(flow.retake(), FlowEvent::Retook);
        assert_eq!(flow.screen(), Screen::Welcome);
        assert!(flow.answers().is_empty());
    }
}
