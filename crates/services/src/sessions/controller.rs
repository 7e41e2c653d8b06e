use std::sync::{Arc, PoisonError, RwLock};

use rand::seq::IndexedRandom;
use storage::repository::ProgressRepository;
use tutor_core::catalog::Catalog;
use tutor_core::model::{Lesson, LessonHandle, Task, UserId};
use tutor_core::resolver::Resolution;

use super::locks::UserLocks;
use super::view::{
    AnswerOutcome, LessonView, NextLesson, ProgressView, TaskPrompt, TaskView, TierPosition,
};
use crate::error::SessionError;
use crate::quiz;

/// Drives each user through the curriculum.
///
/// The cursor lives in the injected [`ProgressRepository`]; the controller is the
/// only writer. Writes for one user are serialised through a per-user lock, so
/// two concurrent correct answers for the same lesson advance the cursor once.
pub struct SessionController {
    catalog: RwLock<Arc<Catalog>>,
    progress: Arc<dyn ProgressRepository>,
    locks: UserLocks,
}

impl SessionController {
    #[must_use]
    pub fn new(catalog: Catalog, progress: Arc<dyn ProgressRepository>) -> Self {
        Self {
            catalog: RwLock::new(Arc::new(catalog)),
            progress,
            locks: UserLocks::default(),
        }
    }

    /// Snapshot of the catalog currently served.
    #[must_use]
    pub fn catalog(&self) -> Arc<Catalog> {
        let guard = self.catalog.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    /// Swap in a freshly loaded catalog. Handles issued against the old one that
    /// no longer resolve surface as [`SessionError::NotFound`].
    pub fn replace_catalog(&self, catalog: Catalog) {
        let mut guard = self.catalog.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Arc::new(catalog);
        tracing::info!(lessons = guard.total_lessons(), "catalog replaced");
    }

    /// Lesson at the user's cursor, or `Completed`. Never writes progress.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the cursor cannot be read.
    pub async fn present_next_lesson(&self, user: UserId) -> Result<NextLesson, SessionError> {
        let catalog = self.catalog();
        let cursor = self.progress.get_progress(user).await?;
        let Resolution::At(position) = catalog.resolve(cursor) else {
            tracing::info!(user_id = %user, cursor, "curriculum completed");
            return Ok(NextLesson::Completed);
        };

        let handle = LessonHandle::new(position.tier, position.index);
        let view = lesson_view(&catalog, handle).ok_or(SessionError::NotFound(handle))?;
        tracing::info!(
            user_id = %user,
            tier = position.tier,
            lesson = position.index,
            title = %view.title,
            "lesson presented"
        );
        Ok(NextLesson::Lesson(view))
    }

    /// Question and shuffled answers for the lesson behind `handle`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotFound` if `handle` does not resolve.
    pub async fn present_task(
        &self,
        user: UserId,
        handle: LessonHandle,
    ) -> Result<TaskPrompt, SessionError> {
        let catalog = self.catalog();
        let prompt = task_prompt(&catalog, handle)?;
        tracing::info!(user_id = %user, %handle, "task presented");
        Ok(prompt)
    }

    /// Task of the lesson at the cursor, skipping the lesson body.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the cursor cannot be read.
    pub async fn present_test(&self, user: UserId) -> Result<TaskPrompt, SessionError> {
        let catalog = self.catalog();
        let cursor = self.progress.get_progress(user).await?;
        let Resolution::At(position) = catalog.resolve(cursor) else {
            return Ok(TaskPrompt::Completed);
        };
        let handle = LessonHandle::new(position.tier, position.index);
        let prompt = task_prompt(&catalog, handle)?;
        tracing::info!(user_id = %user, %handle, "test presented");
        Ok(prompt)
    }

    /// Answer text behind `choice`, an index into the task's fixed choice order.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotFound` if `handle` has no task or `choice` is out
    /// of range.
    pub fn answer_for_choice(
        &self,
        handle: LessonHandle,
        choice: usize,
    ) -> Result<String, SessionError> {
        let catalog = self.catalog();
        task_of(&catalog, handle)?
            .choice(choice)
            .map(str::to_owned)
            .ok_or(SessionError::NotFound(handle))
    }

    /// Check `answer` and, when correct, move the cursor past the lesson.
    ///
    /// The cursor only moves when `handle` is the user's current lesson. Replaying
    /// an earlier lesson is still reported as correct, with `advanced_to: None`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotFound` if `handle` has no lesson or no task, and
    /// `SessionError::Storage` on progress read/write failures.
    pub async fn submit_answer(
        &self,
        user: UserId,
        handle: LessonHandle,
        answer: &str,
    ) -> Result<AnswerOutcome, SessionError> {
        let catalog = self.catalog();
        let global = catalog
            .global_index(handle)
            .ok_or(SessionError::NotFound(handle))?;
        let task = task_of(&catalog, handle)?;

        if !quiz::validate(task, answer) {
            tracing::info!(user_id = %user, %handle, "answer incorrect");
            return Ok(AnswerOutcome::Incorrect);
        }

        let advanced_to = self.advance_from(user, global).await?;
        tracing::info!(user_id = %user, %handle, ?advanced_to, "answer correct");
        Ok(AnswerOutcome::Correct { advanced_to })
    }

    /// Validate a drill answer. Drills never touch progress.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotFound` if `handle` has no lesson or no task.
    pub async fn check_drill_answer(
        &self,
        user: UserId,
        handle: LessonHandle,
        answer: &str,
    ) -> Result<AnswerOutcome, SessionError> {
        let catalog = self.catalog();
        let task = task_of(&catalog, handle)?;
        let correct = quiz::validate(task, answer);
        tracing::info!(user_id = %user, %handle, correct, "drill answer checked");
        Ok(if correct {
            AnswerOutcome::Correct { advanced_to: None }
        } else {
            AnswerOutcome::Incorrect
        })
    }

    /// Move past a lesson that has no task.
    ///
    /// Returns the new cursor, or `None` when nothing moved (the lesson has a task
    /// to answer, or it is not the user's current lesson).
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotFound` if `handle` does not resolve.
    pub async fn acknowledge_lesson(
        &self,
        user: UserId,
        handle: LessonHandle,
    ) -> Result<Option<u32>, SessionError> {
        let catalog = self.catalog();
        let lesson = catalog
            .lesson(handle)
            .ok_or(SessionError::NotFound(handle))?;
        if lesson.has_task() {
            return Ok(None);
        }
        let global = catalog
            .global_index(handle)
            .ok_or(SessionError::NotFound(handle))?;
        let advanced_to = self.advance_from(user, global).await?;
        tracing::info!(user_id = %user, %handle, ?advanced_to, "lesson acknowledged");
        Ok(advanced_to)
    }

    /// Put the cursor on the first lesson of `tier`. The only backward move.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::UnknownTier` for a tier outside the catalog and
    /// `SessionError::Storage` if the cursor cannot be written.
    pub async fn reset_to_tier(&self, user: UserId, tier: usize) -> Result<u32, SessionError> {
        let catalog = self.catalog();
        let offset = catalog
            .tier_offset(tier)
            .ok_or(SessionError::UnknownTier(tier))?;
        let cursor = u32::try_from(offset).map_err(|_| SessionError::UnknownTier(tier))?;

        let _guard = self.locks.acquire(user).await;
        self.progress.set_progress(user, cursor).await?;
        tracing::info!(user_id = %user, tier, cursor, "progress reset to tier");
        Ok(cursor)
    }

    /// Random drill question from the tiers the user has reached.
    ///
    /// Returns `None` when no reachable lesson carries a task.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the cursor cannot be read.
    pub async fn present_random_task(&self, user: UserId) -> Result<Option<TaskView>, SessionError> {
        let catalog = self.catalog();
        let cursor = self.progress.get_progress(user).await?;
        let last_tier = match catalog.resolve(cursor) {
            Resolution::At(position) => position.tier,
            Resolution::Completed => usize::MAX,
        };
        let view = random_task(&catalog, last_tier);
        match &view {
            Some(view) => tracing::info!(user_id = %user, handle = %view.handle, "drill presented"),
            None => tracing::info!(user_id = %user, "no drill available"),
        }
        Ok(view)
    }

    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the cursor cannot be read.
    pub async fn progress(&self, user: UserId) -> Result<ProgressView, SessionError> {
        let catalog = self.catalog();
        let cursor = self.progress.get_progress(user).await?;
        let current = catalog.resolve(cursor).position().and_then(|position| {
            catalog.tier(position.tier).map(|tier| TierPosition {
                tier_name: tier.name().to_owned(),
                lesson_number: position.index + 1,
                tier_len: tier.len(),
            })
        });
        Ok(ProgressView {
            cursor,
            total_lessons: catalog.total_lessons(),
            current,
        })
    }

    async fn advance_from(&self, user: UserId, global: usize) -> Result<Option<u32>, SessionError> {
        let _guard = self.locks.acquire(user).await;
        let cursor = self.progress.get_progress(user).await?;
        if usize::try_from(cursor).ok() != Some(global) {
            tracing::debug!(user_id = %user, cursor, global, "lesson is not current, cursor unchanged");
            return Ok(None);
        }
        let next = cursor.saturating_add(1);
        self.progress.set_progress(user, next).await?;
        Ok(Some(next))
    }
}

fn lesson_view(catalog: &Catalog, handle: LessonHandle) -> Option<LessonView> {
    let tier = catalog.tier(handle.tier())?;
    let lesson: &Lesson = tier.lessons().get(handle.index())?;
    let global = catalog.global_index(handle)?;
    Some(LessonView {
        handle,
        number: global + 1,
        tier_name: tier.name().to_owned(),
        title: lesson.title().to_owned(),
        content: lesson.content().to_owned(),
    })
}

fn task_of(catalog: &Catalog, handle: LessonHandle) -> Result<&Task, SessionError> {
    catalog
        .lesson(handle)
        .and_then(Lesson::task)
        .ok_or(SessionError::NotFound(handle))
}

fn task_view(handle: LessonHandle, task: &Task) -> TaskView {
    TaskView {
        handle,
        question: task.question().to_owned(),
        answers: quiz::build_answer_set(task, &mut rand::rng()),
    }
}

fn task_prompt(catalog: &Catalog, handle: LessonHandle) -> Result<TaskPrompt, SessionError> {
    let lesson = catalog
        .lesson(handle)
        .ok_or(SessionError::NotFound(handle))?;
    Ok(match lesson.task() {
        Some(task) => TaskPrompt::Task(task_view(handle, task)),
        None => TaskPrompt::NoTask(handle),
    })
}

fn random_task(catalog: &Catalog, last_tier: usize) -> Option<TaskView> {
    let candidates = catalog.lessons_with_tasks(last_tier);
    let handle = *candidates.choose(&mut rand::rng())?;
    let task = catalog.lesson(handle)?.task()?;
    Some(task_view(handle, task))
}
