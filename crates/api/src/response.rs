//! Shared response envelope types for API handlers.
//!
//! Every API response wraps its payload in `{ "data": ... }`, matching
//! the envelope the CMS uses, so the admin frontend reads both through
//! the same accessor.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
