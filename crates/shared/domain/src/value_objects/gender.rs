//! Gender value object.

use crate::code_enum::code_enum;
use crate::error::DomainError;

code_enum! {
    /// Gender as declared by the person. Parsed from `undefined`/`U`,
    /// `male`/`M` or `female`/`F`, ignoring case.
    #[derive(Default)]
    pub enum Gender (error = DomainError::NotAGender) {
        #[default]
        Undefined => ("undefined", "U"),
        Male => ("male", "M"),
        Female => ("female", "F"),
    }
}
