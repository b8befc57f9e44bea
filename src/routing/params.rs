//! Named path parameters captured at dispatch.
//!
//! Values are percent-decoded; a segment that does not decode to UTF-8 is
//! kept as sent.

use axum::http::Request;

/// Path segments captured by `{name}` placeholders, in pattern order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathParams {
    values: Vec<(String, String)>,
}

impl PathParams {
    pub(crate) fn from_match(params: &matchit::Params<'_, '_>) -> Self {
        Self {
            values: params
                .iter()
                .map(|(k, v)| (k.to_owned(), decode(v)))
                .collect(),
        }
    }

    /// Value captured for `name`, if the matched pattern declares it.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

fn decode(raw: &str) -> String {
    match urlencoding::decode(raw) {
        Ok(value) => value.into_owned(),
        Err(_) => raw.to_owned(),
    }
}

/// Path parameter lookup on requests that went through the dispatcher.
pub trait PathParamsExt {
    /// Captured value for `name`, or `None` if nothing was captured.
    fn path_param(&self, name: &str) -> Option<&str>;

    /// All captured parameters.
    fn path_params(&self) -> Option<&PathParams>;
}

impl<B> PathParamsExt for Request<B> {
    fn path_param(&self, name: &str) -> Option<&str> {
        self.path_params().and_then(|p| p.get(name))
    }

    fn path_params(&self) -> Option<&PathParams> {
        self.extensions().get::<PathParams>()
    }
}
