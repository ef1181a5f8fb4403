pub mod audit;
pub mod billing;
pub mod check;
pub mod keys;
pub mod scopes;
pub mod spells;
pub mod tokens;
