//! Cache policies for API responses.

use actix_web::http::header::{CacheControl, CacheDirective};

/// Owner data and scan views must never be stored by shared caches.
pub(crate) fn private_no_store() -> CacheControl {
    CacheControl(vec![CacheDirective::Private, CacheDirective::NoStore])
}

/// Probe responses must always reach the server.
pub(crate) fn no_store() -> CacheControl {
    CacheControl(vec![CacheDirective::NoStore])
}
