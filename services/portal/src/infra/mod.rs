pub mod access_codes;
pub mod fixtures;
pub mod memory;
pub mod notifier;
