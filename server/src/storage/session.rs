use std::time::Duration;

use jiff::Timestamp;
use types::{Result, UserData};
use uuid::{Builder, Uuid};

use crate::{storage::POOL, uuid_v7::UuidV7Ext};

#[derive(sqlx::FromRow)]
struct SessionRow {
    id: Uuid,
    user_data: String,
}

impl TryFrom<SessionRow> for Session {
    type Error = types::Error;

    fn try_from(row: SessionRow) -> Result<Self> {
        Ok(Self {
            id: row.id,
            user_data: serde_json::from_str(&row.user_data)?,
        })
    }
}

/// A signed-in browser: the backend credentials it acts with, keyed by a v7 id
/// whose timestamp doubles as the session's start.
#[derive(Debug)]
pub struct Session {
    id: Uuid,
    user_data: UserData,
}

impl Session {
    /// Start and persist a session for freshly authenticated backend credentials.
    pub async fn open(user_data: UserData) -> Result<Self> {
        let session = Self {
            id: Uuid::now_v7(),
            user_data,
        };

        sqlx::query("INSERT INTO sessions (id, user_data) VALUES (?, ?)")
            .bind(session.id)
            .bind(serde_json::to_string(&session.user_data)?)
            .execute(&*POOL)
            .await?;

        Ok(session)
    }

    /// Resolve the session behind a signed cookie value.
    pub async fn lookup(token: &str) -> Result<Self> {
        let id = Uuid::from_token(token)?;

        sqlx::query_as::<_, SessionRow>("SELECT id, user_data FROM sessions WHERE id = ?")
            .bind(id)
            .fetch_one(&*POOL)
            .await?
            .try_into()
    }

    pub fn into_user_data(self) -> UserData {
        self.user_data
    }

    pub fn as_token(&self) -> Result<String> {
        self.id.as_token()
    }

    /// A session without a timestamp never validates; one whose expiry cannot
    /// be represented never lapses.
    pub fn is_expired_at(&self, now: Timestamp, ttl: Duration) -> bool {
        match self.id.jiff_timestamp() {
            Some(started) => started.checked_add(ttl).is_ok_and(|expiry| now >= expiry),
            None => true,
        }
    }

    pub async fn revoke(self) -> Result<()> {
        revoke_id(self.id).await
    }

    /// Sign out whatever session the cookie names. Unknown or forged tokens are ignored.
    pub async fn revoke_token(token: &str) -> Result<()> {
        match Uuid::from_token(token) {
            Ok(id) => revoke_id(id).await,
            Err(_) => Ok(()),
        }
    }

    /// Drop every session that started before `now - ttl`. Returns how many went.
    pub async fn purge_expired(now: Timestamp, ttl: Duration) -> Result<u64> {
        let result = sqlx::query("DELETE FROM sessions WHERE id < ?")
            .bind(expiry_cutoff(now, ttl))
            .execute(&*POOL)
            .await?;

        Ok(result.rows_affected())
    }
}

async fn revoke_id(id: Uuid) -> Result<()> {
    sqlx::query("DELETE FROM sessions WHERE id = ?")
        .bind(id)
        .execute(&*POOL)
        .await?;

    Ok(())
}

/// The smallest v7 id minted at `now - ttl`.
///
/// v7 ids lead with a big-endian millisecond timestamp, so the stored blobs sort
/// by start time and every expired session compares below this one.
fn expiry_cutoff(now: Timestamp, ttl: Duration) -> Uuid {
    let millis = now
        .checked_sub(ttl)
        .map(|start| start.as_millisecond())
        .unwrap_or(0);
    let millis = u64::try_from(millis).unwrap_or(0);

    Builder::from_unix_timestamp_millis(millis, &[0; 10]).into_uuid()
}

#[cfg(test)]
mod tests {
    use types::{Role, User};

    use super::*;

    const HOUR: Duration = Duration::from_secs(3600);

    fn session_with_id(id: Uuid) -> Session {
        Session {
            id,
            user_data: UserData {
                user: User {
                    id: "1".into(),
                    name: "Lee".into(),
                    email: "lee@example.com".into(),
                    role: Role::Landlord,
                    permissions: Default::default(),
                },
                access_token: "tok".to_string().into(),
            },
        }
    }

    #[test]
    fn fresh_session_is_valid() {
        let session = session_with_id(Uuid::now_v7());

        assert!(!session.is_expired_at(Timestamp::now(), HOUR));
    }

    #[test]
    fn session_expires_after_ttl() {
        let session = session_with_id(Uuid::now_v7());
        let later = Timestamp::now() + 2 * HOUR;

        assert!(session.is_expired_at(later, HOUR));
    }

    #[test]
    fn id_without_timestamp_is_expired() {
        let session = session_with_id(Uuid::nil());

        assert!(session.is_expired_at(Timestamp::now(), HOUR));
    }

    #[test]
    fn cutoff_separates_expired_ids_from_live_ones() {
        let started = Uuid::now_v7();
        let cutoff_now = expiry_cutoff(Timestamp::now(), HOUR);
        let cutoff_later = expiry_cutoff(Timestamp::now() + 2 * HOUR, HOUR);

        assert!(started > cutoff_now);
        assert!(started < cutoff_later);
        assert!(Uuid::nil() < cutoff_now);
    }

    #[test]
    fn cutoff_encodes_the_expiry_instant() {
        let now = Timestamp::from_millisecond(1_700_000_000_000).unwrap();
        let cutoff = expiry_cutoff(now, HOUR);

        assert_eq!(
            cutoff.jiff_timestamp(),
            Some(Timestamp::from_millisecond(1_700_000_000_000 - 3_600_000).unwrap())
        );
    }
}
