//! Field name -> display title.

/// Humanize a snake_case field for use as a column title.
/// e.g. "created_at" -> "Created At", "id" -> "Id". Only the first letter of each word changes.
pub fn humanize(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut capitalize_next = true;
    for c in field.chars() {
        if c == '_' || c == ' ' {
            out.push(' ');
            capitalize_next = true;
        } else if capitalize_next {
            out.extend(c.to_uppercase());
            capitalize_next = false;
        } else {
            out.push(c);
        }
    }
    out
}
