pub mod scores;
pub mod signals;
pub mod store;
pub mod workflow;

#[cfg(test)]
mod store_tests;
#[cfg(test)]
mod workflow_tests;
