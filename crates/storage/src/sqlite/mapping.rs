use tutor_core::model::UserId;

use crate::repository::StorageError;

/// Telegram user ids fit in 52 bits, but the column is signed, so check anyway.
pub(crate) fn user_id_to_i64(user: UserId) -> Result<i64, StorageError> {
    i64::try_from(user.value())
        .map_err(|_| StorageError::Serialization("user_id overflow".into()))
}

pub(crate) fn cursor_from_i64(v: i64) -> Result<u32, StorageError> {
    u32::try_from(v).map_err(|_| StorageError::Serialization(format!("cursor out of range: {v}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_cursor_is_rejected() {
        assert!(matches!(
            cursor_from_i64(-1),
            Err(StorageError::Serialization(_))
        ));
        assert_eq!(cursor_from_i64(12).unwrap(), 12);
    }

    #[test]
    fn huge_user_id_is_rejected() {
        assert!(user_id_to_i64(UserId::new(u64::MAX)).is_err());
        assert_eq!(user_id_to_i64(UserId::new(42)).unwrap(), 42);
    }
}
