//! Static guidance per risk level

use super::threshold::RiskLevel;

const EXTREME: &[&str] = &[
    "Evacuate immediately to higher ground",
    "Follow designated evacuation routes",
    "Take emergency supplies and documents",
    "Stay tuned to emergency broadcasts",
];

const DANGER: &[&str] = &[
    "Prepare emergency kit and evacuation plan",
    "Monitor water levels closely",
    "Avoid low-lying areas",
    "Keep communication devices charged",
];

const ALERT: &[&str] = &[
    "Stay informed about weather conditions",
    "Check drainage systems around property",
    "Review emergency contacts",
    "Prepare basic emergency supplies",
];

const CAUTION: &[&str] = &[
    "Monitor weather forecasts regularly",
    "Ensure emergency kit is accessible",
    "Review evacuation routes",
    "Stay alert to changing conditions",
];

const SAFE: &[&str] = &[
    "Normal activities can continue",
    "Regular monitoring of conditions",
    "Maintain emergency preparedness",
    "Stay updated on weather forecasts",
];

pub fn recommendations(level: RiskLevel) -> &'static [&'static str] {
    match level {
        RiskLevel::Extreme => EXTREME,
        RiskLevel::Danger => DANGER,
        RiskLevel::Alert => ALERT,
        RiskLevel::Caution => CAUTION,
        RiskLevel::Safe => SAFE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_level_has_four_items() {
        for level in RiskLevel::ALL {
            assert_eq!(recommendations(level).len(), 4, "{:?}", level);
        }
    }

    #[test]
    fn test_order_is_stable() {
        assert_eq!(recommendations(RiskLevel::Extreme)[0], "Evacuate immediately to higher ground");
        assert_eq!(recommendations(RiskLevel::Safe)[3], "Stay updated on weather forecasts");
    }
}
