//! Philippine postal addresses.

use core::fmt;

use serde::{Deserialize, Serialize};

/// A Philippine delivery address.
///
/// Shared by user profiles, order shipping details and vendor business
/// records. All fields are optional at the type level; handlers decide
/// which operations require a complete address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default)]
    pub street_address: String,
    #[serde(default)]
    pub barangay: String,
    #[serde(default)]
    pub municipality: String,
    #[serde(default)]
    pub province: String,
    #[serde(default)]
    pub postal_code: String,
}

impl Address {
    /// True when every component is blank.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.street_address.is_empty()
            && self.barangay.is_empty()
            && self.municipality.is_empty()
            && self.province.is_empty()
            && self.postal_code.is_empty()
    }

    /// True when all components needed to ship a parcel are present.
    #[must_use]
    pub fn is_shippable(&self) -> bool {
        !self.street_address.is_empty()
            && !self.municipality.is_empty()
            && !self.province.is_empty()
            && !self.postal_code.is_empty()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<&str> = [
            self.street_address.as_str(),
            self.barangay.as_str(),
            self.municipality.as_str(),
            self.province.as_str(),
            self.postal_code.as_str(),
        ]
        .into_iter()
        .filter(|p| !p.is_empty())
        .collect();
        write!(f, "{}", parts.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Address {
        Address {
            street_address: "123 Mabini St".to_owned(),
            barangay: "Poblacion".to_owned(),
            municipality: "Dagupan".to_owned(),
            province: "Pangasinan".to_owned(),
            postal_code: "2400".to_owned(),
        }
    }

    #[test]
    fn test_display_skips_blank_parts() {
        let mut addr = sample();
        addr.barangay = String::new();
        assert_eq!(addr.to_string(), "123 Mabini St, Dagupan, Pangasinan, 2400");
    }

    #[test]
    fn test_is_shippable() {
        assert!(sample().is_shippable());

        let mut addr = sample();
        addr.postal_code = String::new();
        assert!(!addr.is_shippable());

        // Barangay is optional for shipping
        let mut addr = sample();
        addr.barangay = String::new();
        assert!(addr.is_shippable());
    }

    #[test]
    fn test_default_is_empty() {
        assert!(Address::default().is_empty());
        assert!(!sample().is_empty());
    }
}
