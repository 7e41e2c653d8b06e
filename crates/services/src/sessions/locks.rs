use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tutor_core::model::UserId;

type LockMap = HashMap<UserId, Arc<AsyncMutex<()>>>;

/// One async mutex per user, so read-modify-write on a cursor never interleaves
/// with another action of the same user. Different users never contend.
///
/// An entry lives only while some caller holds or waits for it.
#[derive(Default)]
pub(crate) struct UserLocks {
    locks: Mutex<LockMap>,
}

impl UserLocks {
    pub(crate) async fn acquire(&self, user: UserId) -> UserLockGuard<'_> {
        let lock = {
            let mut map = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(map.entry(user).or_default())
        };
        UserLockGuard {
            locks: self,
            user,
            guard: Some(lock.lock_owned().await),
        }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

/// Held lock for one user. Dropping it prunes the map entry when nobody else
/// holds or waits for the same user.
pub(crate) struct UserLockGuard<'a> {
    locks: &'a UserLocks,
    user: UserId,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for UserLockGuard<'_> {
    fn drop(&mut self) {
        // Release first so the guard's own Arc no longer counts.
        drop(self.guard.take());
        let mut map = self
            .locks
            .locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        // New holders clone under this map lock, so a count of 1 is stable here.
        if map
            .get(&self.user)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            map.remove(&self.user);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn different_users_do_not_block_each_other() {
        let locks = UserLocks::default();
        let _a = locks.acquire(UserId::new(1)).await;
        let _b = locks.acquire(UserId::new(2)).await;
        assert_eq!(locks.len(), 2);
    }

    #[tokio::test]
    async fn same_user_waits_for_release() {
        let locks = Arc::new(UserLocks::default());
        let held = locks.acquire(UserId::new(1)).await;

        let contender = {
            let locks = Arc::clone(&locks);
            tokio::spawn(async move {
                let _guard = locks.acquire(UserId::new(1)).await;
            })
        };
        tokio::task::yield_now().await;
        assert!(!contender.is_finished());

        drop(held);
        contender.await.unwrap();
        assert_eq!(locks.len(), 0);
    }

    #[tokio::test]
    async fn released_lock_is_pruned() {
        let locks = UserLocks::default();
        for id in 0..100 {
            let _guard = locks.acquire(UserId::new(id)).await;
        }
        assert_eq!(locks.len(), 0);
    }

    #[tokio::test]
    async fn entry_survives_while_another_caller_holds_it() {
        let locks = UserLocks::default();
        let first = locks.acquire(UserId::new(1)).await;
        let other = locks.acquire(UserId::new(2)).await;
        drop(other);
        assert_eq!(locks.len(), 1);
        drop(first);
        assert_eq!(locks.len(), 0);
    }
}
