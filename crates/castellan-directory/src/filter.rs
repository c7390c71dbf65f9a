//! Search filter construction and escaping.
//!
//! Values interpolated into filters are escaped per RFC 4515 and values
//! interpolated into distinguished names per RFC 4514. The two rules
//! differ; using one for the other is an injection hazard.

/// Escape a value for interpolation into a search filter (RFC 4515).
pub fn escape_value(value: &str) -> String {
    value
        .replace('\\', "\\5c")
        .replace('*', "\\2a")
        .replace('(', "\\28")
        .replace(')', "\\29")
        .replace('\0', "\\00")
}

/// Escape a value for use inside a DN component (RFC 4514).
///
/// `,`, `+`, `"`, `\`, `<`, `>`, `;` and `=` always need a backslash;
/// space only at the start or end of the value; `#` only at the start;
/// NUL is hex-escaped.
pub fn escape_dn_value(value: &str) -> String {
    let last = value.chars().count().saturating_sub(1);
    let mut escaped = String::with_capacity(value.len() + 4);
    for (i, ch) in value.chars().enumerate() {
        match ch {
            ',' | '+' | '"' | '\\' | '<' | '>' | ';' | '=' => {
                escaped.push('\\');
                escaped.push(ch);
            }
            '\0' => escaped.push_str("\\00"),
            ' ' if i == 0 || i == last => escaped.push_str("\\20"),
            '#' if i == 0 => escaped.push_str("\\23"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Equality predicate with an escaped value: `(attr=value)`.
pub fn equals(attribute: &str, value: &str) -> String {
    format!("({}={})", attribute, escape_value(value))
}

/// Predicate matching entries carrying any of the given object classes:
/// `(&(objectClass=a)(objectClass=b))`.
pub fn object_class_condition(object_classes: &[&str]) -> String {
    let inner: String = object_classes
        .iter()
        .map(|oc| format!("(objectClass={oc})"))
        .collect();
    format!("(&{inner})")
}

/// Combine two already-parenthesized predicates with logical AND.
pub fn and(lhs: &str, rhs: &str) -> String {
    format!("(&{lhs}{rhs})")
}

/// Predicate matching every entry.
pub fn present_any() -> String {
    "(objectClass=*)".to_string()
}
