//! Output file naming.
//!
//! Event names are used as file names, so characters that Windows refuses
//! in paths are replaced.

/// Characters not allowed in file names on Windows.
const FORBIDDEN: [char; 9] = ['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Replace path-hostile characters with `_` and drop one trailing `.`.
#[must_use]
pub fn sanitize_file_name(name: &str) -> String {
    let replaced: String = name
        .chars()
        .map(|c| if FORBIDDEN.contains(&c) { '_' } else { c })
        .collect();
    match replaced.strip_suffix('.') {
        Some(stripped) => stripped.to_string(),
        None => replaced,
    }
}

/// File stem for an event story: zero-padded id, then the sanitized name.
#[must_use]
pub fn story_file_stem(event_id: u32, event_name: &str) -> String {
    format!("{event_id:03} - {}", sanitize_file_name(event_name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forbidden_chars_replaced() {
        assert_eq!(
            sanitize_file_name(r#"a<b>c:d"e/f\g|h?i*j"#),
            "a_b_c_d_e_f_g_h_i_j"
        );
    }

    #[test]
    fn test_single_trailing_dot_dropped() {
        assert_eq!(sanitize_file_name("Wait for me..."), "Wait for me..");
        assert_eq!(sanitize_file_name("Done."), "Done");
        assert_eq!(sanitize_file_name("v1.0 party"), "v1.0 party");
    }

    #[test]
    fn test_stem_padding() {
        assert_eq!(
            story_file_stem(7, "Sakura*Blooming Party!"),
            "007 - Sakura_Blooming Party!"
        );
        assert_eq!(story_file_stem(1234, "x"), "1234 - x");
    }
}
