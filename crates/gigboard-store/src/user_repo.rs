//! User records.

use chrono::{DateTime, Utc};
use sqlx::SqliteExecutor;

use gigboard_models::{User, UserId};

use crate::error::StoreResult;

type UserRow = (String, String, String, String, DateTime<Utc>);

fn from_row(row: UserRow) -> User {
    let (id, name, email, password_digest, created_at) = row;
    User {
        id: UserId::from_string(id),
        name,
        email,
        password_digest,
        created_at,
    }
}

pub async fn insert<'e>(ex: impl SqliteExecutor<'e>, user: &User) -> StoreResult<()> {
    sqlx::query(
        "INSERT INTO users (id, name, email, password_digest, created_at) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(user.id.as_str())
    .bind(&user.name)
    .bind(&user.email)
    .bind(&user.password_digest)
    .bind(user.created_at)
    .execute(ex)
    .await?;
    Ok(())
}

pub async fn find_by_id<'e>(ex: impl SqliteExecutor<'e>, id: &UserId) -> StoreResult<Option<User>> {
    let row: Option<UserRow> = sqlx::query_as(
        "SELECT id, name, email, password_digest, created_at FROM users WHERE id = ?",
    )
    .bind(id.as_str())
    .fetch_optional(ex)
    .await?;
    Ok(row.map(from_row))
}

pub async fn find_by_email<'e>(
    ex: impl SqliteExecutor<'e>,
    email: &str,
) -> StoreResult<Option<User>> {
    let row: Option<UserRow> = sqlx::query_as(
        "SELECT id, name, email, password_digest, created_at FROM users WHERE email = ?",
    )
    .bind(email)
    .fetch_optional(ex)
    .await?;
    Ok(row.map(from_row))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Store;

    #[tokio::test]
    async fn test_insert_and_find() {
        let store = Store::in_memory().await.unwrap();
        let user = User::new("Ada", "ada@example.com", "salt$digest");
        insert(store.pool(), &user).await.unwrap();

        let found = find_by_email(store.pool(), "ada@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, user.id);
        assert_eq!(found.password_digest, "salt$digest");

        assert!(find_by_id(store.pool(), &UserId::from_string("missing"))
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_is_unique_violation() {
        let store = Store::in_memory().await.unwrap();
        let first = User::new("Ada", "ada@example.com", "d1");
        let second = User::new("Eve", "ada@example.com", "d2");
        insert(store.pool(), &first).await.unwrap();

        let err = insert(store.pool(), &second).await.unwrap_err();
        assert!(err.is_unique_violation());
    }
}
