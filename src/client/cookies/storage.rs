//! Host-keyed cookie storage.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use parking_lot::Mutex;

use super::Cookie;

/// A store of cookies keyed by host, then by cookie name.
///
/// Hosts are passed in already lowercased by the cookies feature.
#[async_trait]
pub trait CookiesStorage: Send + Sync {
    /// Returns every cookie stored for `host`, ordered by name.
    async fn get(&self, host: &str) -> BTreeMap<String, Cookie>;

    /// Returns the cookie called `name` for `host`, if any.
    async fn get_one(&self, host: &str, name: &str) -> Option<Cookie> {
        self.get(host).await.remove(name)
    }

    /// Adds `cookie` for `host`, replacing a stored cookie with the same name.
    ///
    /// A cookie whose `Max-Age` is zero or negative removes the stored one.
    async fn add_cookie(&self, host: &str, cookie: Cookie);
}

/// In-memory storage that keeps every cookie it is given.
///
/// Nothing is persisted; the store lives as long as the value does.
///
/// # Example
///
/// ```
/// use chain_pipeline::client::{AcceptAllCookiesStorage, Cookie, CookiesStorage};
///
/// # futures::executor::block_on(async {
/// let storage = AcceptAllCookiesStorage::new();
/// storage.add_cookie("a.test", Cookie::new("sid", "1")).await;
/// storage.add_cookie("a.test", Cookie::new("sid", "2")).await;
///
/// assert_eq!(storage.get("a.test").await.len(), 1);
/// assert_eq!(storage.get_one("a.test", "sid").await.unwrap().value, "2");
/// # });
/// ```
#[derive(Debug, Default)]
pub struct AcceptAllCookiesStorage {
    cookies: Mutex<HashMap<String, BTreeMap<String, Cookie>>>,
}

impl AcceptAllCookiesStorage {
    /// Creates an empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of hosts with at least one cookie.
    pub fn host_count(&self) -> usize {
        self.cookies.lock().len()
    }
}

#[async_trait]
impl CookiesStorage for AcceptAllCookiesStorage {
    async fn get(&self, host: &str) -> BTreeMap<String, Cookie> {
        self.cookies.lock().get(host).cloned().unwrap_or_default()
    }

    async fn get_one(&self, host: &str, name: &str) -> Option<Cookie> {
        self.cookies
            .lock()
            .get(host)
            .and_then(|cookies| cookies.get(name))
            .cloned()
    }

    async fn add_cookie(&self, host: &str, cookie: Cookie) {
        let mut cookies = self.cookies.lock();
        if cookie.is_expired() {
            if let Some(stored) = cookies.get_mut(host) {
                stored.remove(&cookie.name);
                if stored.is_empty() {
                    cookies.remove(host);
                }
            }
            return;
        }

        cookies
            .entry(host.to_string())
            .or_default()
            .insert(cookie.name.clone(), cookie);
    }
}
