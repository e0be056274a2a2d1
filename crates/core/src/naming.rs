//! Clone name derivation.

/// Derives the name of a clone from the original name.
///
/// When `replace_text` is non-empty and found in `original`, every occurrence
/// is replaced with `append_text`. Otherwise `append_text` is appended.
///
/// # Examples
///
/// ```
/// use aws_control_core::naming::transform_name;
///
/// assert_eq!(transform_name("billing-handler", "-p313", ""), "billing-handler-p313");
/// assert_eq!(transform_name("svc-old", "-new", "-old"), "svc-new");
/// ```
pub fn transform_name(original: &str, append_text: &str, replace_text: &str) -> String {
    if !replace_text.is_empty() && original.contains(replace_text) {
        original.replace(replace_text, append_text)
    } else {
        format!("{original}{append_text}")
    }
}
