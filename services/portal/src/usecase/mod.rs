pub mod access;
pub mod broker;
pub mod offer;
pub mod policyholder;
pub mod proposal;
