//! Field alias resolution: finds the scraped field that corresponds to an
//! authoritative field even when sources label it differently.

use std::collections::BTreeMap;

/// Groups of interchangeable field names, written as alias keys (see
/// [`alias_key`]).
const ALIAS_GROUPS: &[&[&str]] = &[
    &[
        "batterykwh",
        "batterysize",
        "batterycapacity",
        "battery",
        "batterycapacitykwh",
        "usablebattery",
    ],
    &[
        "range",
        "rangekm",
        "electricrange",
        "drivingrange",
        "wltprange",
        "claimedrange",
    ],
    &["power", "horsepower", "hp", "maxpower", "poweroutput", "output"],
    &["torque", "maxtorque", "peaktorque"],
    &["acceleration", "0100kmh", "0100", "zeroto100"],
    &["topspeed", "maxspeed", "maximumspeed"],
    &["drivetrain", "drive", "drivetype", "driveline", "wheeldrive"],
    &["fueltype", "fuel", "powertrain", "enginetype"],
    &["transmission", "gearbox"],
    &["seats", "seating", "seatingcapacity", "numberofseats"],
];

/// Comparable form of a field name: parenthetical qualifiers removed, then
/// only lowercase alphanumerics kept.
///
/// `"Battery Size (kWh)"` and `"battery_size"` both become `"batterysize"`.
#[must_use]
pub fn alias_key(name: &str) -> String {
    let mut depth = 0usize;
    let mut key = String::with_capacity(name.len());
    for c in name.chars() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            _ if depth == 0 && c.is_alphanumeric() => key.extend(c.to_lowercase()),
            _ => {}
        }
    }
    key
}

/// The alias group containing `key`, if any.
#[must_use]
pub fn alias_group(key: &str) -> Option<&'static [&'static str]> {
    ALIAS_GROUPS.iter().copied().find(|group| group.contains(&key))
}

/// Find the value a source reports for `field`: exact key match first, then
/// each alias in the field's group. At most one value is returned.
#[must_use]
pub fn resolve_field<'a>(
    field: &str,
    specs: &'a BTreeMap<String, String>,
) -> Option<(&'a str, &'a str)> {
    let key = alias_key(field);
    if key.is_empty() {
        return None;
    }
    let keyed: Vec<(String, &'a String, &'a String)> = specs
        .iter()
        .map(|(name, value)| (alias_key(name), name, value))
        .collect();
    let find = |wanted: &str| {
        keyed
            .iter()
            .find(|(k, _, _)| k == wanted)
            .map(|(_, name, value)| (name.as_str(), value.as_str()))
    };

    find(&key).or_else(|| {
        alias_group(&key)?
            .iter()
            .copied()
            .filter(|alias| *alias != key)
            .find_map(|alias| find(alias))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn specs(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn key_drops_qualifiers_and_separators() {
        assert_eq!(alias_key("Battery Size (kWh)"), "batterysize");
        assert_eq!(alias_key("battery_size"), "batterysize");
        assert_eq!(alias_key("0-100 km/h"), "0100kmh");
        assert_eq!(alias_key("(kWh)"), "");
    }

    #[test]
    fn exact_match_wins_over_aliases() {
        let scraped = specs(&[("Battery", "80"), ("Battery Capacity (kWh)", "82")]);
        assert_eq!(
            resolve_field("battery_capacity", &scraped),
            Some(("Battery Capacity (kWh)", "82"))
        );
    }

    #[test]
    fn falls_back_to_alias_group() {
        let scraped = specs(&[("Driving Range", "570 km")]);
        assert_eq!(
            resolve_field("range_km", &scraped),
            Some(("Driving Range", "570 km"))
        );
    }

    #[test]
    fn resolution_is_symmetric_within_a_group() {
        for group in ALIAS_GROUPS {
            for a in *group {
                for b in *group {
                    let scraped = specs(&[(*b, "x")]);
                    assert!(
                        resolve_field(a, &scraped).is_some(),
                        "{a} should resolve against a source exposing only {b}"
                    );
                }
            }
        }
    }

    #[test]
    fn unrelated_fields_do_not_resolve() {
        let scraped = specs(&[("Torque", "510 Nm")]);
        assert_eq!(resolve_field("range", &scraped), None);
        assert_eq!(resolve_field("colour", &scraped), None);
    }
}
