//! Turns session results into user-facing replies.

use tutor_core::action::Action;
use tutor_core::catalog::Catalog;
use tutor_core::model::{LessonHandle, QuizMode};
use tutor_core::reply::{Button, Reply};

use crate::sessions::{AnswerOutcome, LessonView, NextLesson, ProgressView, TaskView};

pub(crate) const RETRY_TEXT: &str = "Something went wrong on our side. Please try again in a moment.";
pub(crate) const STALE_TEXT: &str =
    "This task is no longer available. Press /start to pick up where you left off.";
pub(crate) const HELP_TEXT: &str = "Commands:\n\
    /start - open the main menu\n\
    /progress - show where you are in the course\n\
    /help - show this message";

fn start_over() -> Button {
    Button::new("Start over", Action::SelectTier(0))
}

/// Main menu. "Start over" only shows once the user has moved past the first lesson.
pub(crate) fn welcome(first_name: Option<&str>, catalog: &Catalog, cursor: u32) -> Reply {
    let greeting = first_name.map_or_else(|| "Hi!".to_owned(), |name| format!("Hi, {name}!"));
    let mut reply = Reply::text(format!(
        "{greeting}\n\nI am your JavaScript coach. Choose where to start:"
    ))
    .with_button(Button::new("Start learning", Action::StartLearning));

    if cursor > 0 {
        reply = reply.with_button(start_over());
    }
    for (tier, t) in catalog.tiers().iter().enumerate().skip(1) {
        reply = reply.with_button(Button::new(
            format!("Jump to {} level", t.name()),
            Action::SelectTier(tier),
        ));
    }

    reply
        .with_button(Button::new("Test yourself", Action::RequestTest))
        .with_button(Button::new("Random test", Action::RequestRandomTest))
}

pub(crate) fn next_lesson(next: NextLesson) -> Reply {
    match next {
        NextLesson::Lesson(view) => lesson(&view),
        NextLesson::Completed => completed(),
    }
}

fn lesson(view: &LessonView) -> Reply {
    Reply::text(format!(
        "Lesson {}: {}\n\n{}\n\nWhen you are ready, press the button below to go to the task.",
        view.number, view.title, view.content
    ))
    .with_button(Button::new("Go to the task", Action::RequestTask(view.handle)))
}

pub(crate) fn completed() -> Reply {
    Reply::text("You have finished every level of the course. Great work!")
        .with_button(start_over())
}

pub(crate) fn task(view: TaskView, mode: QuizMode) -> Reply {
    let handle = view.handle;
    let mut reply = Reply::text(format!("Task:\n{}", view.question));
    for choice in view.answers {
        reply = reply.with_button(Button::new(
            choice.text,
            Action::SubmitAnswer {
                handle,
                mode,
                choice: choice.index,
            },
        ));
    }
    reply
}

pub(crate) fn no_task(handle: LessonHandle, mode: QuizMode) -> Reply {
    Reply::text("There is no task for this lesson.")
        .with_button(Button::new("Continue", Action::AcknowledgeLesson { handle, mode }))
}

pub(crate) fn no_drill() -> Reply {
    Reply::text("There are no tasks to practise yet. Start learning first!")
        .with_button(Button::new("Start learning", Action::StartLearning))
}

pub(crate) fn answer(outcome: AnswerOutcome, mode: QuizMode) -> Reply {
    match outcome {
        AnswerOutcome::Incorrect => Reply::text("Not quite. Try again."),
        AnswerOutcome::Correct { .. } => match mode {
            QuizMode::Lesson => Reply::text("Correct! On to the next lesson.")
                .with_button(Button::new("Next lesson", Action::StartLearning)),
            QuizMode::Test => Reply::text("Correct! On to the next test.")
                .with_button(Button::new("Next test", Action::RequestTest)),
            QuizMode::Drill => Reply::text("Correct! Want another one?")
                .with_button(Button::new("Next test", Action::RequestRandomTest)),
        },
    }
}

pub(crate) fn progress(view: &ProgressView) -> Reply {
    match &view.current {
        Some(position) => Reply::text(format!(
            "Level: {}, lesson {} of {}.\nLessons completed: {} of {}.",
            position.tier_name,
            position.lesson_number,
            position.tier_len,
            view.cursor,
            view.total_lessons
        ))
        .with_button(Button::new("Continue learning", Action::StartLearning)),
        None => Reply::text(format!(
            "You have completed all {} lessons.",
            view.total_lessons
        ))
        .with_button(start_over()),
    }
}
