//! Cart Handlers

pub(crate) mod clear;
pub(crate) mod list;
