pub mod collector;
pub mod intelligence;
pub mod normalizer;
pub mod recommendations;
pub mod reporting;
pub mod scoring;
pub mod workflow;

#[cfg(test)]
mod collector_tests;
#[cfg(test)]
mod intelligence_tests;
