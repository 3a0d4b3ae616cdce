use amdless_parser::ParseError;
use thiserror::Error;

/// Core error type for AMD conversion.
///
/// Every variant is fatal to the single file being converted; a batch driver
/// catches per file and continues.
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("found a named define() - this is not supported")]
    NamedDefine,

    #[error("define() was called with an identifier callback - the factory body cannot be inspected")]
    IdentifierCallback,

    #[error("found multiple module definitions in file")]
    MultipleDefinitions,

    #[error("dynamic module names are not supported")]
    DynamicRequire,

    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
}
