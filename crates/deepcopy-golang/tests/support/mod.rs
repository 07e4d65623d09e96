//! Shared fixtures for the deepcopy-golang integration tests.

#![allow(dead_code)]

pub mod assertions;
pub mod fixtures;
