pub mod builder;
pub mod defaults;
pub mod mfa;
pub mod runtime;
pub mod traits;
