//! Location slug derivation.
//!
//! Location primary keys are human-readable slugs derived from the display
//! name at provisioning time, so printed QR payloads stay legible.

/// Derive a slug id from a location name.
///
/// Lowercases the name, maps every run of non-alphanumeric characters to a
/// single `-`, and trims leading/trailing dashes.
///
/// # Examples
///
/// ```
/// use smartqueue_core::naming::slugify;
///
/// assert_eq!(slugify("Main Canteen"), "main-canteen");
/// assert_eq!(slugify("Library  Cafe!"), "library-cafe");
/// ```
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;

    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }

    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_joins_words() {
        assert_eq!(slugify("Main Canteen"), "main-canteen");
        assert_eq!(slugify("Science Block Cafeteria"), "science-block-cafeteria");
    }

    #[test]
    fn collapses_punctuation_runs() {
        assert_eq!(slugify("Library -- Cafe"), "library-cafe");
        assert_eq!(slugify("  Admin Office  "), "admin-office");
    }

    #[test]
    fn name_without_alphanumerics_yields_empty_slug() {
        assert_eq!(slugify("!!!"), "");
        assert_eq!(slugify(""), "");
    }
}
