//! Element name singularization
//!
//! Array entries are named after the singular form of the array's key
//! (`items` → `item`). The English rules come from the `Inflector` crate; a
//! renderer can swap in its own function.

use inflector::string::singularize::to_singular;

/// Signature of a singularization function
pub type SingularizeFn = fn(&str) -> String;

/// Singular form of an English word
pub fn singularize(word: &str) -> String {
    to_singular(word)
}
