use std::sync::Arc;

use services::{AnswerOutcome, NextLesson, SessionController, SessionError, TaskPrompt};
use storage::repository::{InMemoryRepository, ProgressRepository};
use tutor_core::catalog::{Catalog, Tier};
use tutor_core::model::{Lesson, LessonHandle, Task, UserId};

fn lesson(title: &str) -> Lesson {
    Lesson::new(title, format!("{title} body"), Some(Task::new("Q", "X", ["Y", "Z"]).unwrap()))
        .unwrap()
}

fn two_tier_catalog() -> Catalog {
    Catalog::new(vec![
        Tier::new("beginner", vec![lesson("A"), lesson("B")]),
        Tier::new("intermediate", vec![lesson("C"), lesson("D"), lesson("E")]),
    ])
}

fn controller(catalog: Catalog, repo: &InMemoryRepository) -> SessionController {
    SessionController::new(catalog, Arc::new(repo.clone()))
}

#[tokio::test]
async fn new_user_walks_through_first_lesson() {
    let repo = InMemoryRepository::new();
    let sessions = controller(
        Catalog::new(vec![Tier::new("beginner", vec![lesson("A"), lesson("B")])]),
        &repo,
    );
    let user = UserId::new(1);

    let NextLesson::Lesson(view) = sessions.present_next_lesson(user).await.unwrap() else {
        panic!("expected a lesson");
    };
    assert_eq!(view.title, "A");
    assert_eq!(view.number, 1);

    let TaskPrompt::Task(task) = sessions.present_task(user, view.handle).await.unwrap() else {
        panic!("expected a task");
    };
    assert_eq!(task.question, "Q");
    let mut answers: Vec<_> = task.answers.iter().map(|c| c.text.as_str()).collect();
    answers.sort_unstable();
    assert_eq!(answers, vec!["X", "Y", "Z"]);

    let wrong = sessions.submit_answer(user, view.handle, "Y").await.unwrap();
    assert_eq!(wrong, AnswerOutcome::Incorrect);
    assert_eq!(repo.get_progress(user).await.unwrap(), 0);

    let right = sessions.submit_answer(user, view.handle, "X").await.unwrap();
    assert_eq!(right, AnswerOutcome::Correct { advanced_to: Some(1) });
    assert_eq!(repo.get_progress(user).await.unwrap(), 1);
}

#[tokio::test]
async fn presenting_a_lesson_is_idempotent() {
    let repo = InMemoryRepository::with_progress([(UserId::new(1), 3)]);
    let sessions = controller(two_tier_catalog(), &repo);
    let user = UserId::new(1);

    let first = sessions.present_next_lesson(user).await.unwrap();
    let second = sessions.present_next_lesson(user).await.unwrap();

    assert_eq!(first, second);
    let NextLesson::Lesson(view) = first else {
        panic!("expected a lesson");
    };
    assert_eq!(view.handle, LessonHandle::new(1, 1));
    assert_eq!(view.tier_name, "intermediate");
    assert_eq!(repo.get_progress(user).await.unwrap(), 3);
}

#[tokio::test]
async fn boundary_cursor_shows_first_lesson_of_next_tier() {
    let repo = InMemoryRepository::with_progress([(UserId::new(1), 2)]);
    let sessions = controller(two_tier_catalog(), &repo);

    let NextLesson::Lesson(view) = sessions.present_next_lesson(UserId::new(1)).await.unwrap()
    else {
        panic!("expected a lesson");
    };
    assert_eq!(view.title, "C");
    assert_eq!(view.handle, LessonHandle::new(1, 0));
}

#[tokio::test]
async fn cursor_past_the_end_is_completed() {
    let repo = InMemoryRepository::with_progress([(UserId::new(1), 5)]);
    let sessions = controller(two_tier_catalog(), &repo);

    assert_eq!(
        sessions.present_next_lesson(UserId::new(1)).await.unwrap(),
        NextLesson::Completed
    );
    assert_eq!(
        sessions.present_test(UserId::new(1)).await.unwrap(),
        TaskPrompt::Completed
    );
}

#[tokio::test]
async fn correct_answer_leaves_other_users_alone() {
    let repo = InMemoryRepository::with_progress([(UserId::new(2), 4)]);
    let sessions = controller(two_tier_catalog(), &repo);

    sessions
        .submit_answer(UserId::new(1), LessonHandle::new(0, 0), "X")
        .await
        .unwrap();

    assert_eq!(repo.get_progress(UserId::new(1)).await.unwrap(), 1);
    assert_eq!(repo.get_progress(UserId::new(2)).await.unwrap(), 4);
}

#[tokio::test]
async fn replaying_a_passed_lesson_does_not_move_cursor_back() {
    let repo = InMemoryRepository::with_progress([(UserId::new(1), 3)]);
    let sessions = controller(two_tier_catalog(), &repo);

    let outcome = sessions
        .submit_answer(UserId::new(1), LessonHandle::new(0, 0), "X")
        .await
        .unwrap();

    assert_eq!(outcome, AnswerOutcome::Correct { advanced_to: None });
    assert_eq!(repo.get_progress(UserId::new(1)).await.unwrap(), 3);
}

#[tokio::test]
async fn concurrent_correct_answers_advance_once() {
    let repo = InMemoryRepository::new();
    let sessions = Arc::new(controller(two_tier_catalog(), &repo));
    let user = UserId::new(1);

    let mut tasks = Vec::new();
    for _ in 0..8 {
        let sessions = Arc::clone(&sessions);
        tasks.push(tokio::spawn(async move {
            sessions
                .submit_answer(user, LessonHandle::new(0, 0), "X")
                .await
                .unwrap()
        }));
    }
    let mut advanced = 0;
    for task in tasks {
        if let AnswerOutcome::Correct { advanced_to: Some(_) } = task.await.unwrap() {
            advanced += 1;
        }
    }

    assert_eq!(advanced, 1);
    assert_eq!(repo.get_progress(user).await.unwrap(), 1);
}

#[tokio::test]
async fn stale_handle_is_not_found_and_leaves_progress() {
    let repo = InMemoryRepository::new();
    let sessions = controller(two_tier_catalog(), &repo);
    let user = UserId::new(1);

    sessions.replace_catalog(Catalog::new(vec![Tier::new("beginner", vec![lesson("A")])]));

    let err = sessions
        .submit_answer(user, LessonHandle::new(1, 2), "X")
        .await
        .unwrap_err();
    assert!(matches!(err, SessionError::NotFound(h) if h == LessonHandle::new(1, 2)));
    assert!(matches!(
        sessions.present_task(user, LessonHandle::new(0, 5)).await,
        Err(SessionError::NotFound(_))
    ));
    assert_eq!(repo.get_progress(user).await.unwrap(), 0);
}

#[tokio::test]
async fn reset_moves_cursor_to_tier_offset() {
    let repo = InMemoryRepository::with_progress([(UserId::new(1), 4)]);
    let sessions = controller(two_tier_catalog(), &repo);
    let user = UserId::new(1);

    assert_eq!(sessions.reset_to_tier(user, 1).await.unwrap(), 2);
    assert_eq!(repo.get_progress(user).await.unwrap(), 2);

    assert_eq!(sessions.reset_to_tier(user, 0).await.unwrap(), 0);
    assert_eq!(repo.get_progress(user).await.unwrap(), 0);

    assert!(matches!(
        sessions.reset_to_tier(user, 7).await,
        Err(SessionError::UnknownTier(7))
    ));
    assert_eq!(repo.get_progress(user).await.unwrap(), 0);
}

#[tokio::test]
async fn random_task_stays_within_unlocked_tiers_and_never_advances() {
    let repo = InMemoryRepository::new();
    let sessions = controller(two_tier_catalog(), &repo);
    let user = UserId::new(1);

    for _ in 0..50 {
        let view = sessions.present_random_task(user).await.unwrap().unwrap();
        assert_eq!(view.handle.tier(), 0);

        let outcome = sessions
            .check_drill_answer(user, view.handle, "X")
            .await
            .unwrap();
        assert_eq!(outcome, AnswerOutcome::Correct { advanced_to: None });
    }
    assert_eq!(repo.get_progress(user).await.unwrap(), 0);
}

#[tokio::test]
async fn completed_user_drills_from_every_tier() {
    let repo = InMemoryRepository::with_progress([(UserId::new(1), 5)]);
    let sessions = controller(two_tier_catalog(), &repo);

    let mut seen_tiers = std::collections::HashSet::new();
    for _ in 0..200 {
        let view = sessions
            .present_random_task(UserId::new(1))
            .await
            .unwrap()
            .unwrap();
        seen_tiers.insert(view.handle.tier());
    }
    assert_eq!(seen_tiers.len(), 2);
}

#[tokio::test]
async fn lesson_without_task_can_be_acknowledged() {
    let repo = InMemoryRepository::new();
    let intro = Lesson::new("Intro", "Welcome", None).unwrap();
    let sessions = controller(
        Catalog::new(vec![Tier::new("beginner", vec![intro, lesson("A")])]),
        &repo,
    );
    let user = UserId::new(1);
    let handle = LessonHandle::new(0, 0);

    assert_eq!(
        sessions.present_task(user, handle).await.unwrap(),
        TaskPrompt::NoTask(handle)
    );
    assert!(matches!(
        sessions.submit_answer(user, handle, "X").await,
        Err(SessionError::NotFound(_))
    ));

    assert_eq!(sessions.acknowledge_lesson(user, handle).await.unwrap(), Some(1));
    // A lesson with a task cannot be skipped.
    assert_eq!(
        sessions
            .acknowledge_lesson(user, LessonHandle::new(0, 1))
            .await
            .unwrap(),
        None
    );
    assert_eq!(repo.get_progress(user).await.unwrap(), 1);
}

#[tokio::test]
async fn progress_view_reports_position() {
    let repo = InMemoryRepository::with_progress([(UserId::new(1), 3), (UserId::new(2), 9)]);
    let sessions = controller(two_tier_catalog(), &repo);

    let view = sessions.progress(UserId::new(1)).await.unwrap();
    assert_eq!(view.cursor, 3);
    assert_eq!(view.total_lessons, 5);
    let current = view.current.unwrap();
    assert_eq!(current.tier_name, "intermediate");
    assert_eq!(current.lesson_number, 2);
    assert_eq!(current.tier_len, 3);

    assert!(sessions.progress(UserId::new(2)).await.unwrap().current.is_none());
}

#[tokio::test]
async fn empty_catalog_is_completed_for_everyone() {
    let repo = InMemoryRepository::new();
    let sessions = controller(
        Catalog::new(vec![Tier::new("beginner", Vec::new())]),
        &repo,
    );

    assert_eq!(
        sessions.present_next_lesson(UserId::new(1)).await.unwrap(),
        NextLesson::Completed
    );
    assert!(sessions.present_random_task(UserId::new(1)).await.unwrap().is_none());
}

#[tokio::test]
async fn choice_index_resolves_against_fixed_order() {
    let repo = InMemoryRepository::new();
    let sessions = controller(two_tier_catalog(), &repo);
    let handle = LessonHandle::new(0, 0);

    assert_eq!(sessions.answer_for_choice(handle, 0).unwrap(), "X");
    assert_eq!(sessions.answer_for_choice(handle, 2).unwrap(), "Z");
    assert!(matches!(
        sessions.answer_for_choice(handle, 3),
        Err(SessionError::NotFound(_))
    ));
    assert!(matches!(
        sessions.answer_for_choice(LessonHandle::new(4, 0), 0),
        Err(SessionError::NotFound(_))
    ));
}
