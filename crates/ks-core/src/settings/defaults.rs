use super::model::*;

pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 5;

impl Default for AcquisitionSettings {
    fn default() -> Self {
        Self {
            fetch_timeout_secs: DEFAULT_FETCH_TIMEOUT_SECS,
        }
    }
}

impl Default for WizardSettings {
    fn default() -> Self {
        Self {
            delivery_policy: DeliveryPolicy::BestEffort,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            acquisition: AcquisitionSettings::default(),
            wizard: WizardSettings::default(),
            network: NetworkSettings::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let settings: Settings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.acquisition.fetch_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn delivery_policy_uses_snake_case() {
        let settings: Settings =
            serde_json::from_str(r#"{"wizard":{"delivery_policy":"strict"}}"#).unwrap();
        assert_eq!(settings.wizard.delivery_policy, DeliveryPolicy::Strict);
    }

    #[test]
    fn zero_timeout_is_clamped() {
        let acquisition = AcquisitionSettings {
            fetch_timeout_secs: 0,
        };
        assert_eq!(acquisition.fetch_timeout(), Duration::from_secs(1));
    }
}
