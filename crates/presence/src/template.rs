//! Display label templates.
//!
//! Templates use indexed placeholders: `{0}` is the current player count and
//! `{1}` the maximum. A bare `{}` takes the next argument in order, `{{` and
//! `}}` produce literal braces, and anything else in braces is copied through
//! unchanged.

/// Template used when none is configured.
pub const DEFAULT_TEMPLATE: &str = "Players: {0}/{1}";

/// A display label template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayTemplate {
    source: String,
}

impl Default for DisplayTemplate {
    fn default() -> Self {
        Self::new(DEFAULT_TEMPLATE)
    }
}

impl DisplayTemplate {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }

    /// Renders the label for `current` players out of `max`.
    pub fn render(&self, current: i64, max: u32) -> String {
        let args = [current.to_string(), max.to_string()];
        let mut out = String::with_capacity(self.source.len() + 8);
        let mut next_arg = 0;
        let mut rest = self.source.as_str();

        while let Some(pos) = rest.find(['{', '}']) {
            out.push_str(&rest[..pos]);
            let tail = &rest[pos..];

            if tail.starts_with("{{") || tail.starts_with("}}") {
                out.push_str(&tail[..1]);
                rest = &tail[2..];
                continue;
            }
            if tail.starts_with('}') {
                out.push('}');
                rest = &tail[1..];
                continue;
            }

            let Some(end) = tail[1..].find('}') else {
                out.push_str(tail);
                rest = "";
                break;
            };

            let placeholder = &tail[1..=end];
            let arg = if placeholder.is_empty() {
                next_arg += 1;
                args.get(next_arg - 1)
            } else {
                placeholder.parse::<usize>().ok().and_then(|i| args.get(i))
            };

            match arg {
                Some(value) => out.push_str(value),
                None => out.push_str(&tail[..end + 2]),
            }
            rest = &tail[end + 2..];
        }

        out.push_str(rest);
        out
    }
}
