//! # Geoscape Development Tools
//!
//! Command-line tools for development:
//! - Catalog data validation
//! - Hour-by-hour equipment simulation
//! - Save file inspection

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod error;
pub mod inspect;
pub mod simulate;
pub mod validate;
