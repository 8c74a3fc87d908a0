//! Reminder scheduling policy, the persisted-state store seam, and the
//! notification sweep.

pub mod policy;
pub mod store;
pub mod sweep;

#[cfg(test)]
mod policy_tests;
#[cfg(test)]
mod sweep_tests;
