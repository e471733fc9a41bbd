/* ************************************************************************ **
** This file is part of matcalc, and is licensed under EITHER the MIT       **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use crate::SettingsError;
use serde::{Deserialize, Serialize};

/// Knobs for a [`Calculator`](crate::Calculator).
///
/// Every field has a default, so `{}` is a complete config.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Settings {
    /// Pivot-ratio tolerance below which a divisor counts as singular.
    ///
    /// `None` means `n * f64::EPSILON` for an `n × n` divisor.
    #[serde(default)]
    pub singular_rtol: Option<f64>,

    /// Let NaN and infinities through the input conversion instead of rejecting them.
    #[serde(default)]
    pub allow_non_finite: bool,
}

/// [`Settings`] that have passed [`Settings::validate`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ValidatedSettings(Settings);

impl std::ops::Deref for ValidatedSettings {
    type Target = Settings;

    fn deref(&self) -> &Settings { &self.0 }
}

impl ValidatedSettings {
    pub fn into_inner(self) -> Settings { self.0 }
}

impl Settings {
    pub fn validate(self) -> Result<ValidatedSettings, SettingsError> {
        if let Some(rtol) = self.singular_rtol {
            if !(0.0 <= rtol && rtol < 1.0) {
                return Err(SettingsError::BadTolerance(rtol));
            }
        }
        Ok(ValidatedSettings(self))
    }

    pub fn from_json_str(s: &str) -> Result<ValidatedSettings, SettingsError> {
        serde_json::from_str::<Settings>(s)?.validate()
    }

    pub fn from_yaml_str(s: &str) -> Result<ValidatedSettings, SettingsError> {
        serde_yaml::from_str::<Settings>(s)?.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_is_default() {
        assert_eq!(Settings::from_json_str("{}").unwrap().into_inner(), Settings::default());
    }

    #[test]
    fn parse_json_and_yaml() {
        let json = Settings::from_json_str(r#"{"singular-rtol": 1e-12, "allow-non-finite": true}"#).unwrap();
        let yaml = Settings::from_yaml_str("singular-rtol: 1.0e-12\nallow-non-finite: true\n").unwrap();
        assert_eq!(json, yaml);
        assert_eq!(json.singular_rtol, Some(1e-12));
        assert!(json.allow_non_finite);
    }

    #[test]
    fn unknown_field() {
        match Settings::from_json_str(r#"{"singular_rtol": 1e-12}"#) {
            Err(SettingsError::Parse(_)) => {},
            r => panic!("{:?}", r),
        }
    }

    #[test]
    fn bad_tolerance() {
        for &bad in &[-1e-3, 1.0, 2.5, f64::NAN, f64::INFINITY] {
            let settings = Settings { singular_rtol: Some(bad), ..Default::default() };
            assert!(settings.validate().is_err(), "{}", bad);
        }
        let settings = Settings { singular_rtol: Some(0.0), ..Default::default() };
        assert!(settings.validate().is_ok());
    }
}
