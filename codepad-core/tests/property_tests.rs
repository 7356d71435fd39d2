//! Property-based tests for the `Codepad` core library

#![allow(clippy::redundant_clone)]
#![allow(clippy::too_many_lines)]

mod properties;
