//! Output formatting switches.

/// Attributes that are written even when `show_attributes` is off.
pub const ALWAYS_SHOWN_ATTRIBUTES: [&str; 2] = ["href", "id"];

/// What the serializer leaves out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormattingPolicy {
    /// Write every attribute. When false only `href` and `id` survive.
    pub show_attributes: bool,
    /// Write `<span>` tags. When false a span is unwrapped and its children
    /// are written in its place, at its indentation level.
    pub show_inline_span: bool,
}

impl FormattingPolicy {
    /// Whether an attribute named `name` is written under this policy.
    #[must_use]
    pub fn shows_attribute(&self, name: &str) -> bool {
        self.show_attributes || ALWAYS_SHOWN_ATTRIBUTES.contains(&name)
    }
}

impl Default for FormattingPolicy {
    fn default() -> Self {
        Self {
            show_attributes: true,
            show_inline_span: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_shows_everything() {
        let policy = FormattingPolicy::default();
        assert!(policy.shows_attribute("class"));
        assert!(policy.show_inline_span);
    }

    #[test]
    fn test_href_and_id_always_shown() {
        let policy = FormattingPolicy {
            show_attributes: false,
            show_inline_span: true,
        };
        assert!(policy.shows_attribute("href"));
        assert!(policy.shows_attribute("id"));
        assert!(!policy.shows_attribute("class"));
        assert!(!policy.shows_attribute("ID"));
    }
}
