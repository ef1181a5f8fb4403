pub mod audit;
pub mod billing_event;
pub mod entitlement;
pub mod key;
pub mod scope;
pub mod spell;
pub mod token;
