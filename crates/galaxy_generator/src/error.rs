use std::fmt;

/// Reasons a set of galaxy parameters cannot be turned into particles.
#[derive(Debug, Clone, PartialEq)]
pub enum GalaxyError {
    /// Zero arms would divide by zero in the branch angle.
    NoBranches,
    /// `pow(0, p)` is undefined for `p <= 0`.
    InvalidRandomnessPower(f32),
    InvalidRadius(f32),
    InvalidRandomness(f32),
    NonFiniteSpin(f32),
    InvalidColor(String),
}

impl fmt::Display for GalaxyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GalaxyError::NoBranches => write!(f, "Galaxy needs at least one branch"),
            GalaxyError::InvalidRandomnessPower(p) => {
                write!(f, "Randomness power must be positive and finite, got {}", p)
            }
            GalaxyError::InvalidRadius(r) => {
                write!(f, "Radius must be non-negative and finite, got {}", r)
            }
            GalaxyError::InvalidRandomness(r) => {
                write!(f, "Randomness must be non-negative and finite, got {}", r)
            }
            GalaxyError::NonFiniteSpin(s) => write!(f, "Spin must be finite, got {}", s),
            GalaxyError::InvalidColor(c) => write!(f, "Invalid hex color: {}", c),
        }
    }
}

impl std::error::Error for GalaxyError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_the_value() {
        let msg = GalaxyError::InvalidRandomnessPower(0.0).to_string();
        assert!(msg.contains("Randomness power"));
        assert!(msg.contains('0'));

        let msg = GalaxyError::InvalidColor("#zzz".into()).to_string();
        assert!(msg.ends_with("#zzz"));
    }
}
