pub mod audit_repo;
pub mod billing_event_repo;
pub mod entitlement_repo;
pub mod key_repo;
pub mod scope_repo;
pub mod spell_repo;
pub mod token_repo;

pub use audit_repo::AuditRepo;
pub use billing_event_repo::BillingEventRepo;
pub use entitlement_repo::EntitlementRepo;
pub use key_repo::KeyRepo;
pub use scope_repo::ScopeRepo;
pub use spell_repo::SpellRepo;
pub use token_repo::TokenRepo;
