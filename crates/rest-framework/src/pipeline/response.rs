//! Terminal response model.
//!
//! The pipeline never renders HTML. A [`Body::View`] names a template and carries its data; an
//! external renderer turns it into a document.

use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Empty,
    Text(String),
    Json(Value),
    View { template: String, data: Value },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Body,
}

impl Response {
    pub fn new(status: u16, body: Body) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body,
        }
    }

    pub fn text(message: impl Into<String>) -> Self {
        Self::new(200, Body::Text(message.into()))
    }

    /// Serializes `value` into a JSON body. Values that fail to serialize become `null`.
    pub fn json(value: impl Serialize) -> Self {
        let value = serde_json::to_value(value).unwrap_or(Value::Null);
        Self::new(200, Body::Json(value))
    }

    pub fn render(template: impl Into<String>, data: Value) -> Self {
        Self::new(
            200,
            Body::View {
                template: template.into(),
                data,
            },
        )
    }

    /// `302 Found` pointing at `location`.
    pub fn redirect(location: impl Into<String>) -> Self {
        let location = location.into();
        Self::new(302, Body::Text(format!("Found. Redirecting to {location}")))
            .with_header("Location", location)
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// First header with `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn text_body(&self) -> Option<&str> {
        match &self.body {
            Body::Text(text) => Some(text),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redirect_sets_location() {
        let response = Response::redirect("/posts");
        assert_eq!(response.status, 302);
        assert_eq!(response.header("location"), Some("/posts"));
    }
}
