//! Graph analyses over edge sets: connectivity, tree checks, structural
//! validation and path search.
pub mod connectivity;
pub mod error;
pub mod path;
pub mod validation;

pub use connectivity::{is_connected, is_tree};
pub use error::{ValidationError, ValidationErrorType};
pub use path::{PathOutcome, PathResolver};
pub use validation::{trees_form_tree, validate_platform_config, validate_transfo_tree};
