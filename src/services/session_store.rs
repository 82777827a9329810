use tokio::sync::RwLock;

use crate::models::LogoSession;

/// In-memory holder of the single editing session.
///
/// Every read hands out a cloned snapshot so compositions are computed from
/// one consistent state; every write runs under the write lock.
pub struct SessionStore {
    session: RwLock<LogoSession>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            session: RwLock::new(LogoSession::default()),
        }
    }

    /// Clone of the current session
    pub async fn snapshot(&self) -> LogoSession {
        self.session.read().await.clone()
    }

    /// Read a projection of the session without cloning all of it
    pub async fn read<T>(&self, f: impl FnOnce(&LogoSession) -> T) -> T {
        let session = self.session.read().await;
        f(&session)
    }

    /// Mutate the session atomically and return the closure's result
    pub async fn update<T>(&self, f: impl FnOnce(&mut LogoSession) -> T) -> T {
        let mut session = self.session.write().await;
        f(&mut session)
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
