//! Admin roster with an in-memory cache
//!
//! Admin checks run on every command, so the persisted roster is cached and
//! reloaded only after a mutation. Bootstrap admins from configuration are
//! always admins regardless of the persisted roster.

use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{info, instrument};

use auction_core::traits::AdminRepository;
use auction_core::value_objects::{ChatId, UserId};
use auction_core::DomainError;

use super::error::ServiceResult;

/// The admin roster, combining bootstrap admins with the persisted roster
pub struct AdminRegistry {
    repo: Arc<dyn AdminRepository>,
    bootstrap: Vec<UserId>,
    cache: RwLock<Option<HashSet<UserId>>>,
}

impl AdminRegistry {
    pub fn new(repo: Arc<dyn AdminRepository>, bootstrap: Vec<UserId>) -> Self {
        Self {
            repo,
            bootstrap,
            cache: RwLock::new(None),
        }
    }

    /// Whether the user holds admin rights
    pub async fn is_admin(&self, user: UserId) -> ServiceResult<bool> {
        Ok(self.roster().await?.contains(&user))
    }

    /// Error unless the user holds admin rights
    pub async fn require_admin(&self, user: UserId) -> ServiceResult<()> {
        if self.is_admin(user).await? {
            Ok(())
        } else {
            Err(DomainError::NotAdmin.into())
        }
    }

    /// Everyone currently holding admin rights
    pub async fn list(&self) -> ServiceResult<Vec<UserId>> {
        let roster = self.roster().await?;
        let mut admins: Vec<UserId> = roster.into_iter().collect();
        admins.sort();
        Ok(admins)
    }

    /// Private chats of every admin, for review fan-out
    pub async fn admin_chats(&self) -> ServiceResult<Vec<ChatId>> {
        Ok(self.list().await?.into_iter().map(ChatId::from).collect())
    }

    /// Grant admin rights; returns false when the user already had them
    #[instrument(skip(self))]
    pub async fn add(&self, user: UserId) -> ServiceResult<bool> {
        let added = self.repo.add(user).await?;
        if added {
            info!(user = %user, "admin granted");
            self.invalidate();
        }
        Ok(added)
    }

    /// Revoke admin rights; returns false when the user had none.
    ///
    /// Bootstrap admins cannot be removed this way, they are re-granted from
    /// configuration on the next restart anyway.
    #[instrument(skip(self))]
    pub async fn remove(&self, user: UserId) -> ServiceResult<bool> {
        let removed = self.repo.remove(user).await?;
        if removed {
            info!(user = %user, "admin revoked");
            self.invalidate();
        }
        Ok(removed)
    }

    /// Drop the cache so the next check reloads the persisted roster
    pub fn invalidate(&self) {
        *self.cache.write() = None;
    }

    async fn roster(&self) -> ServiceResult<HashSet<UserId>> {
        if let Some(cached) = self.cache.read().as_ref() {
            return Ok(cached.clone());
        }

        let mut roster: HashSet<UserId> = self.repo.list().await?.into_iter().collect();
        roster.extend(self.bootstrap.iter().copied());
        *self.cache.write() = Some(roster.clone());
        Ok(roster)
    }
}

impl std::fmt::Debug for AdminRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminRegistry")
            .field("bootstrap", &self.bootstrap)
            .finish()
    }
}
