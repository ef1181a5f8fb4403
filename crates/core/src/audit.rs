//! Audit event-name constants.
//!
//! Every administrative mutation writes an audit entry under one of these
//! names. Constants live here so handler code and tests never drift on
//! spelling.

pub const KEY_CREATED: &str = "key_created";
pub const KEY_REVOKED: &str = "key_revoked";
pub const SCOPE_GRANTED: &str = "scope_granted";
pub const SCOPE_REVOKED: &str = "scope_revoked";
pub const SPELL_CREATED: &str = "spell_created";
pub const SPELL_STATUS_CHANGED: &str = "spell_status_changed";
pub const BILLING_EVENT_PROCESSED: &str = "billing_event_processed";
