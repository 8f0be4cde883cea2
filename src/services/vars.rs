//! Plain name → value containers backing `env` and `alias`.
//!
//! Unlike configuration settings these carry no validators or defaults:
//! assigning the magic string `None` removes the variable, anything else
//! is stored verbatim.

use std::collections::BTreeMap;

/// Magic value that deletes a variable instead of assigning it.
pub const NONE_MAGIC: &str = "None";

#[derive(Debug)]
pub struct VarStore {
    title: &'static str,
    headers: (&'static str, &'static str),
    uppercase: bool,
    vars: BTreeMap<String, String>,
}

impl VarStore {
    pub fn env() -> Self {
        VarStore {
            title: "Environment Variables",
            headers: ("Variable", "Value"),
            uppercase: true,
            vars: BTreeMap::new(),
        }
    }

    pub fn aliases() -> Self {
        VarStore {
            title: "Command Aliases",
            headers: ("Alias", "Value"),
            uppercase: false,
            vars: BTreeMap::new(),
        }
    }

    pub fn title(&self) -> &'static str {
        self.title
    }

    pub fn headers(&self) -> (&'static str, &'static str) {
        self.headers
    }

    fn key(&self, name: &str) -> String {
        if self.uppercase {
            name.trim().to_ascii_uppercase()
        } else {
            name.trim().to_string()
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(&self.key(name)).map(String::as_str)
    }

    /// Assign, or remove when the value is the `None` magic string.
    pub fn set(&mut self, name: &str, value: &str) {
        let key = self.key(name);
        if value == NONE_MAGIC {
            self.vars.remove(&key);
        } else {
            self.vars.insert(key, value.to_string());
        }
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// `(name, value)` rows sorted by name, filter = name-prefix match.
    pub fn report(&self, filter: Option<&str>) -> Vec<(String, String)> {
        let prefix = filter.map(|f| self.key(f)).unwrap_or_default();
        self.vars
            .iter()
            .filter(|(name, _)| name.starts_with(&prefix))
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect()
    }

    pub fn snapshot(&self) -> BTreeMap<String, String> {
        self.vars.clone()
    }

    pub fn restore(&mut self, values: &BTreeMap<String, String>) {
        for (name, value) in values {
            self.set(name, value);
        }
    }
}
