mod translator;
mod types;

pub use translator::IdentityTranslator;
pub use types::IdentityRecord;
