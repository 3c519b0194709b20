//! API-key lookup against the user store.
use sha2::{Digest, Sha256};
use tracing::{info, warn};

use crate::domain::model::{SeedUser, UserRecord};
use crate::ports::repo::{Repo, RepoError};

pub fn hash_api_key(key: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(key.as_bytes());
    hex::encode(hasher.finalize())
}

/// Exactly one stored, unexpired user must match the key.
pub async fn authorize<R: Repo + ?Sized>(
    repo: &R,
    key: &str,
    now_ms: i64,
) -> Result<Option<UserRecord>, RepoError> {
    if key.trim().is_empty() {
        return Ok(None);
    }
    let mut users = repo.users_by_key_hash(&hash_api_key(key)).await?;
    if users.len() > 1 {
        warn!(matches = users.len(), "API key matches more than one user");
        return Ok(None);
    }
    Ok(users.pop().filter(|u| !is_expired(u, now_ms)))
}

fn is_expired(user: &UserRecord, now_ms: i64) -> bool {
    match user.expire {
        Some(secs) if secs > 0 => secs.saturating_mul(1000) <= now_ms,
        _ => false,
    }
}

/// Inserts the configured user unless its key is already known.
pub async fn seed_user<R: Repo + ?Sized>(repo: &R, seed: &SeedUser) -> Result<(), RepoError> {
    let key_hash = hash_api_key(&seed.api_key);
    if !repo.users_by_key_hash(&key_hash).await?.is_empty() {
        return Ok(());
    }
    let record = UserRecord {
        user: seed.user.clone(),
        email: seed.email.clone(),
        phone: None,
        method: Some("api".to_string()),
        expire: None,
    };
    repo.insert_user(&key_hash, &record).await?;
    info!(user = %seed.user, "Seeded API user");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_hash_is_hex_sha256() {
        let h = hash_api_key("abc");
        assert_eq!(
            h,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn zero_expire_never_expires() {
        let mut user = UserRecord {
            user: "u".into(),
            email: None,
            phone: None,
            method: None,
            expire: Some(0),
        };
        assert!(!is_expired(&user, i64::MAX));
        user.expire = Some(10);
        assert!(is_expired(&user, 10_000));
        assert!(!is_expired(&user, 9_999));
    }
}
