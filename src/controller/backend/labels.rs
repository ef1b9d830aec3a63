use crate::constants::{
    CONTROLLER_NAME, LABEL_KEY_COMPONENT, LABEL_KEY_CREATED_BY, LABEL_KEY_DASHBOARD,
    LABEL_KEY_INSTANCE, LABEL_KEY_MANAGED_BY, LABEL_KEY_NAME, LABEL_KEY_PART_OF,
    LABEL_VALUE_COMPANION,
};
use std::collections::BTreeMap;

/// Standard labels for an object named `name`
pub fn common_labels(name: &str) -> BTreeMap<String, String> {
    let mut labels = BTreeMap::new();
    labels.insert(LABEL_KEY_INSTANCE.to_string(), name.to_string());
    labels.insert(LABEL_KEY_NAME.to_string(), name.to_string());
    labels.insert(LABEL_KEY_PART_OF.to_string(), name.to_string());
    labels.insert(
        LABEL_KEY_COMPONENT.to_string(),
        LABEL_VALUE_COMPANION.to_string(),
    );
    labels.insert(
        LABEL_KEY_DASHBOARD.to_string(),
        LABEL_VALUE_COMPANION.to_string(),
    );
    labels.insert(LABEL_KEY_CREATED_BY.to_string(), CONTROLLER_NAME.to_string());
    labels.insert(LABEL_KEY_MANAGED_BY.to_string(), CONTROLLER_NAME.to_string());
    labels
}

/// Label selector matching every object this controller manages
pub fn managed_by_selector() -> String {
    format!("{LABEL_KEY_MANAGED_BY}={CONTROLLER_NAME}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_managed_by_selector_matches_common_labels() {
        let selector = managed_by_selector();
        assert_eq!(selector, "app.kubernetes.io/managed-by=kyma-companion-manager");

        let (key, value) = selector.split_once('=').unwrap();
        let labels = common_labels("kyma-companion-backend");
        assert_eq!(labels.get(key).map(String::as_str), Some(value));
    }

    #[test]
    fn test_common_labels() {
        let labels = common_labels("kyma-companion-backend");
        assert_eq!(labels.len(), 7);
        assert_eq!(
            labels.get("app.kubernetes.io/instance").map(String::as_str),
            Some("kyma-companion-backend")
        );
        assert_eq!(
            labels.get("app.kubernetes.io/component").map(String::as_str),
            Some("companion")
        );
        assert_eq!(
            labels.get("app.kubernetes.io/managed-by").map(String::as_str),
            Some("kyma-companion-manager")
        );
        assert_eq!(
            labels.get("kyma-project.io/dashboard").map(String::as_str),
            Some("companion")
        );
    }
}
