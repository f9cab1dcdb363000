//! Shared repository tests, written against the repo traits so every backend
//! runs the same assertions. Each backend's `#[cfg(test)]` module builds a
//! pool and delegates here.

pub mod profiles;
