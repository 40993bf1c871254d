use crate::db::DatabaseError;
use serde::{Deserialize, Serialize};

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = DatabaseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(DatabaseError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

str_enum!(DietQuality {
    Excellent => "excellent",
    Good => "good",
    Average => "average",
    Poor => "poor",
});

str_enum!(SleepQuality {
    Excellent => "excellent",
    Good => "good",
    Fair => "fair",
    Poor => "poor",
});

str_enum!(StressLevel {
    Low => "low",
    Moderate => "moderate",
    High => "high",
});

str_enum!(RecommendationCategory {
    Diet => "diet",
    Exercise => "exercise",
    Supplements => "supplements",
    Lifestyle => "lifestyle",
    Stress => "stress",
    Sleep => "sleep",
});

str_enum!(RecommendationPriority {
    Low => "low",
    Medium => "medium",
    High => "high",
    Critical => "critical",
});

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn diet_quality_round_trips() {
        for s in ["excellent", "good", "average", "poor"] {
            assert_eq!(DietQuality::from_str(s).unwrap().as_str(), s);
        }
    }

    #[test]
    fn unknown_category_rejected() {
        let err = RecommendationCategory::from_str("meditation");
        assert!(err.is_err());
    }

    #[test]
    fn priority_serde_uses_snake_case() {
        let json = serde_json::to_string(&RecommendationPriority::Critical).unwrap();
        assert_eq!(json, "\"critical\"");
    }
}
