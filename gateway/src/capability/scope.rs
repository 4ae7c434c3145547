use std::collections::BTreeMap;
use std::fmt;

/// A single Twilio Client permission, rendered as
/// `scope:<service>:<privilege>?<params>`.
///
/// Parameters are kept sorted by key so the same grant always renders to the
/// same string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeUri {
    service: String,
    privilege: String,
    params: BTreeMap<String, String>,
}

impl ScopeUri {
    pub fn new(service: impl Into<String>, privilege: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            privilege: privilege.into(),
            params: BTreeMap::new(),
        }
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.add_param(key, value);
        self
    }

    pub fn add_param(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.params.insert(key.into(), value.into());
    }

    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }
}

impl fmt::Display for ScopeUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "scope:{}:{}", self.service, self.privilege)?;
        if !self.params.is_empty() {
            let query = url::form_urlencoded::Serializer::new(String::new())
                .extend_pairs(self.params.iter())
                .finish();
            write!(f, "?{query}")?;
        }
        Ok(())
    }
}
