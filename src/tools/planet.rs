use serde_json::{json, Value};

use super::tool::{ToolParameter, ToolSpec};

pub const TOOL_NAME: &str = "get_planet_mass";

/// Planet masses in kilograms
const PLANET_MASSES: [(&str, f64); 8] = [
    ("mercury", 3.285e23),
    ("venus", 4.867e24),
    ("earth", 5.972e24),
    ("mars", 6.39e23),
    ("jupiter", 1.898e27),
    ("saturn", 5.683e26),
    ("uranus", 8.681e25),
    ("neptune", 1.024e26),
];

/// Look up a planet's mass, case-insensitively. Unknown names yield `0.0`.
pub fn get_planet_mass(planet: &str) -> f64 {
    let planet = planet.to_lowercase();
    PLANET_MASSES
        .iter()
        .find(|(name, _)| *name == planet)
        .map(|(_, mass)| *mass)
        .unwrap_or(0.0)
}

pub fn tool() -> ToolSpec {
    ToolSpec::new(
        TOOL_NAME,
        "Get the mass of a planet in the solar system, in kilograms",
        vec![ToolParameter::new("planet", "The planet name, e.g. Earth")],
        |args: &Value| {
            let planet = args["planet"].as_str().unwrap_or_default();
            Ok(json!(get_planet_mass(planet)))
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_ignores_case() {
        assert_eq!(get_planet_mass("earth"), 5.972e24);
        assert_eq!(get_planet_mass("EARTH"), 5.972e24);
        assert_eq!(get_planet_mass("Jupiter"), 1.898e27);
    }

    #[test]
    fn test_unknown_planet_is_zero() {
        assert_eq!(get_planet_mass("pluto"), 0.0);
        assert_eq!(get_planet_mass(""), 0.0);
    }

    #[test]
    fn test_all_eight_planets_present() {
        for (name, mass) in PLANET_MASSES {
            assert!(mass > 0.0);
            assert_eq!(get_planet_mass(&name.to_uppercase()), mass);
        }
    }

    #[test]
    fn test_tool_returns_number() {
        let result = tool().call(&json!({"planet": "Mars"})).unwrap();
        assert_eq!(result.as_f64(), Some(6.39e23));
    }
}
