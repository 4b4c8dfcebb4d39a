use std::sync::Arc;

use tracing::{debug, info};

use kolam_crypto::password::hash_password;
use kolam_db::Database;
use kolam_types::models::{Session, User, UserStats};

use crate::error::AppError;

/// Signup, login and per-user lookups on top of the credential store.
#[derive(Clone)]
pub struct AccountService {
    db: Arc<Database>,
}

impl AccountService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Create an account and return its id.
    ///
    /// There is no "is this name free?" pre-check: the store's UNIQUE
    /// constraint decides, which also settles two simultaneous signups.
    pub fn create_account(&self, username: &str, password: &str) -> Result<i64, AppError> {
        let user_id = self.db.create_user(username, &hash_password(password))?;
        info!(user_id, username, "account created");
        Ok(user_id)
    }

    /// Id of the user with exactly this username and password, if any.
    pub fn authenticate(&self, username: &str, password: &str) -> Result<Option<i64>, AppError> {
        let user_id = self
            .db
            .find_user_id_by_credentials(username, &hash_password(password))?;
        if user_id.is_none() {
            debug!(username, "login rejected");
        }
        Ok(user_id)
    }

    /// Authenticate and open a session.
    pub fn login(&self, username: &str, password: &str) -> Result<Session, AppError> {
        let user_id = self
            .authenticate(username, password)?
            .ok_or(AppError::InvalidCredentials)?;

        Ok(Session {
            user_id,
            username: username.to_string(),
        })
    }

    pub fn user(&self, user_id: i64) -> Result<Option<User>, AppError> {
        Ok(self.db.get_user_by_id(user_id)?.map(User::from))
    }

    pub fn stats(&self, session: &Session) -> Result<UserStats, AppError> {
        let (artwork_count, total_likes) = self.db.user_stats(session.user_id)?;
        Ok(UserStats {
            artwork_count,
            total_likes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> AccountService {
        AccountService::new(Arc::new(Database::open_in_memory().unwrap()))
    }

    #[test]
    fn create_then_authenticate() {
        let accounts = service();
        let id = accounts.create_account("asha", "pass123").unwrap();

        assert_eq!(accounts.authenticate("asha", "pass123").unwrap(), Some(id));
        let session = accounts.login("asha", "pass123").unwrap();
        assert_eq!(session.user_id, id);
        assert_eq!(session.username, "asha");
    }

    #[test]
    fn duplicate_username_regardless_of_password() {
        let accounts = service();
        accounts.create_account("asha", "pass123").unwrap();

        for password in ["pass123", "different", ""] {
            let err = accounts.create_account("asha", password).unwrap_err();
            assert!(matches!(err, AppError::DuplicateUsername(ref name) if name == "asha"));
        }
    }

    #[test]
    fn wrong_password_yields_no_identity() {
        let accounts = service();
        accounts.create_account("asha", "pass123").unwrap();

        assert_eq!(accounts.authenticate("asha", "pass124").unwrap(), None);
        assert_eq!(accounts.authenticate("ASHA", "pass123").unwrap(), None);
        assert!(matches!(
            accounts.login("asha", "nope"),
            Err(AppError::InvalidCredentials)
        ));
    }

    #[test]
    fn password_is_not_stored_in_clear() {
        let db = Arc::new(Database::open_in_memory().unwrap());
        let accounts = AccountService::new(db.clone());
        accounts.create_account("asha", "pass123").unwrap();

        let row = db.get_user_by_username("asha").unwrap().unwrap();
        assert_ne!(row.password_hash, "pass123");
        assert_eq!(row.password_hash, hash_password("pass123"));
    }

    #[test]
    fn fresh_account_has_empty_stats() {
        let accounts = service();
        let session = {
            accounts.create_account("asha", "pass123").unwrap();
            accounts.login("asha", "pass123").unwrap()
        };

        assert_eq!(accounts.stats(&session).unwrap(), UserStats::default());
        assert_eq!(accounts.user(session.user_id).unwrap().unwrap().username, "asha");
    }
}
