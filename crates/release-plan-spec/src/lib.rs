mod error;
mod parse;
mod template;

pub use error::{DocumentError, TemplateError};
pub use parse::{RawDirective, RawEntry, RawReleaseDocument, parse_document};
pub use template::{TemplateOptions, generate_template};
