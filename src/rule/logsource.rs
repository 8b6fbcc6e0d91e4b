use serde::{Deserialize, Serialize};

/// Logsource names the event stream a rule applies to and is used for
/// pre-filtering rule sets
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Logsource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Log category (e.g., process_creation, network_connection)
    pub category: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Product name (e.g., windows, linux)
    pub product: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Service name (e.g., sysmon, security)
    pub service: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Free-form description of the source
    pub definition: Option<String>,
}

impl Logsource {
    /// Whether this logsource satisfies `filter`.
    ///
    /// Every component set in the filter must be present here with the same
    /// value, ignoring ASCII case. `definition` is informational and ignored.
    pub fn matches(&self, filter: &Logsource) -> bool {
        component_matches(&self.category, &filter.category)
            && component_matches(&self.product, &filter.product)
            && component_matches(&self.service, &filter.service)
    }

    /// True when no component is set
    pub fn is_empty(&self) -> bool {
        self.category.is_none()
            && self.product.is_none()
            && self.service.is_none()
            && self.definition.is_none()
    }
}

fn component_matches(value: &Option<String>, wanted: &Option<String>) -> bool {
    match (value, wanted) {
        (_, None) => true,
        (Some(value), Some(wanted)) => value.eq_ignore_ascii_case(wanted),
        (None, Some(_)) => false,
    }
}
