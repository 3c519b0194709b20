use sqlx::SqlitePool;

use super::models::{db_error, UserRow};
use crate::domain::model::UserRecord;
use crate::ports::repo::RepoError;

pub async fn users_by_key_hash(
    pool: &SqlitePool,
    key_hash: &str,
) -> Result<Vec<UserRecord>, RepoError> {
    let rows = sqlx::query_as::<_, UserRow>(
        "SELECT username, email, phone, method, expire FROM users WHERE key_hash = ?1",
    )
    .bind(key_hash)
    .fetch_all(pool)
    .await
    .map_err(db_error("users_by_key_hash"))?;
    Ok(rows.into_iter().map(UserRecord::from).collect())
}

pub async fn insert_user(
    pool: &SqlitePool,
    key_hash: &str,
    user: &UserRecord,
) -> Result<(), RepoError> {
    sqlx::query(
        r#"
      INSERT INTO users(key_hash, username, email, phone, method, expire)
      VALUES (?1, ?2, ?3, ?4, ?5, ?6)
      "#,
    )
    .bind(key_hash)
    .bind(&user.user)
    .bind(user.email.as_deref())
    .bind(user.phone.as_deref())
    .bind(user.method.as_deref())
    .bind(user.expire)
    .execute(pool)
    .await
    .map_err(db_error("insert_user"))?;
    Ok(())
}
