//! URL templates with named `{placeholder}` slots.

use url::form_urlencoded;

/// A URL with `{name}` slots filled per request.
///
/// Substituted values are form-URL-escaped (space becomes `+`, non-ASCII is
/// percent-encoded), so a locality such as `São Paulo` is sent as
/// `S%C3%A3o+Paulo`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlTemplate {
    raw: String,
}

impl UrlTemplate {
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Names of every slot, in order of appearance.
    pub fn placeholders(&self) -> Vec<&str> {
        let mut names = Vec::new();
        let mut rest = self.raw.as_str();
        while let Some(open) = rest.find('{') {
            let after = &rest[open + 1..];
            match after.find('}') {
                Some(close) => {
                    let name = &after[..close];
                    if is_slot_name(name) {
                        names.push(name);
                    }
                    rest = &after[close + 1..];
                }
                None => break,
            }
        }
        names
    }

    /// Fill slots from `values`. Slots without a value are left untouched.
    pub fn render(&self, values: &[(&str, &str)]) -> String {
        let mut out = self.raw.clone();
        for (name, value) in values {
            let slot = format!("{{{name}}}");
            if out.contains(&slot) {
                out = out.replace(&slot, &escape(value));
            }
        }
        out
    }
}

/// Form-URL-escape a single value.
pub fn escape(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

fn is_slot_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholders() {
        let template =
            UrlTemplate::new("https://api.weatherapi.com/v1/current.json?key={key}&q={location}&aqi=no");
        assert_eq!(template.placeholders(), vec!["key", "location"]);
        assert!(UrlTemplate::new("http://resolver:8080/").placeholders().is_empty());
        assert!(UrlTemplate::new("http://x/{}/{a-b}").placeholders().is_empty());
    }

    #[test]
    fn test_render_escapes_values() {
        let template = UrlTemplate::new("http://wx/current.json?q={location}&aqi=no");
        assert_eq!(
            template.render(&[("location", "São Paulo")]),
            "http://wx/current.json?q=S%C3%A3o+Paulo&aqi=no"
        );
    }

    #[test]
    fn test_render_leaves_unknown_slots() {
        let template = UrlTemplate::new("http://geo/ws/{cep}/json/?k={key}");
        assert_eq!(
            template.render(&[("cep", "07096240")]),
            "http://geo/ws/07096240/json/?k={key}"
        );
        assert_eq!(template.render(&[("cep", "")]), "http://geo/ws//json/?k={key}");
    }
}
