//! Response header list.

/// Renders a field name as an HTTP header name.
///
/// Underscore-separated words are capitalized and joined with hyphens, so
/// `content_type` becomes `Content-Type`.
///
/// ```
/// use tomoyo::canonical_header_name;
///
/// assert_eq!(canonical_header_name("content_type"), "Content-Type");
/// assert_eq!(canonical_header_name("X_REQUEST_ID"), "X-Request-Id");
/// ```
pub fn canonical_header_name(field: &str) -> String {
    field
        .split('_')
        .map(capitalize)
        .collect::<Vec<_>>()
        .join("-")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Ordered header fields of a response.
///
/// Fields are kept in insertion order under their attribute-style names and
/// rendered through [`canonical_header_name`] when handed to the transport.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpHeader {
    fields: Vec<(String, String)>,
}

impl HttpHeader {
    /// Creates an empty header list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a field, replacing an existing value in place.
    #[must_use]
    pub fn with(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(field, value);
        self
    }

    /// Sets a field, replacing an existing value in place.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<String>) {
        let field = field.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(f, _)| *f == field) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((field, value)),
        }
    }

    /// Looks a value up by field name or by rendered header name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(f, _)| f == name || canonical_header_name(f).eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if no fields are set.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Header pairs with canonical names, in insertion order.
    pub fn as_key_value_pairs(&self) -> Vec<(String, String)> {
        self.fields
            .iter()
            .map(|(f, v)| (canonical_header_name(f), v.clone()))
            .collect()
    }
}
