#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::cast_possible_truncation)]

pub mod beautify;
pub mod classify;
pub mod convert;
pub mod error;
pub mod naming;
pub mod options;

pub use convert::convert;
pub use error::ConvertError;
pub use options::ConvertOptions;
