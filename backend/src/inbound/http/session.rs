//! Session helpers keeping handlers free of cookie plumbing.
//!
//! The session carries two things: the signed-in account and the finder's
//! most recent captured location. Unreadable entries count as absent.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::domain::{Account, Error, FinderLocation};

pub(crate) const ACCOUNT_KEY: &str = "account";
pub(crate) const FINDER_LOCATION_KEY: &str = "finder_location";

/// Handler-facing wrapper around the Actix session.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Wrap an Actix session.
    pub const fn new(session: Session) -> Self {
        Self(session)
    }

    fn read<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.0.get::<T>(key) {
            Ok(value) => value,
            Err(error) => {
                warn!(key, %error, "discarding unreadable session entry");
                self.0.remove(key);
                None
            }
        }
    }

    /// Store the signed-in account, renewing the session id.
    pub fn persist_account(&self, account: &Account) -> Result<(), Error> {
        self.0.renew();
        self.0
            .insert(ACCOUNT_KEY, account)
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Signed-in account, if any.
    pub fn account(&self) -> Option<Account> {
        self.read(ACCOUNT_KEY)
    }

    /// Signed-in account or `401 Unauthorized`.
    pub fn require_account(&self) -> Result<Account, Error> {
        self.account()
            .ok_or_else(|| Error::unauthorized("login required"))
    }

    /// Drop everything held in the session.
    pub fn clear(&self) {
        self.0.purge();
    }

    /// Remember a captured finder location until it expires.
    pub fn remember_location(&self, location: &FinderLocation) -> Result<(), Error> {
        self.0
            .insert(FINDER_LOCATION_KEY, location)
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Last captured finder location, expired or not.
    pub fn remembered_location(&self) -> Option<FinderLocation> {
        self.read(FINDER_LOCATION_KEY)
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(Self::new) })
    }
}
