//! Shared response envelope types for API handlers.
//!
//! Operator-facing list endpoints use a `{ "data": ... }` envelope. The
//! integrator-facing endpoints (key creation, token issuance, spell check,
//! webhook ingress) return their documented wire shapes directly.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
