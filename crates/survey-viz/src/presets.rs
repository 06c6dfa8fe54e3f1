//! Ready-made recipes used throughout the tutorial.
use std::f64::consts::PI;

use crate::generator::{Distribution, Recipe, Transform};

/// Standard deviation of the noise added to `perimeter_mean`.
pub const PERIMETER_NOISE_SD: f64 = 2.0;
/// Slope linking `perimeter_mean` to `radius_mean`.
pub const PERIMETER_SLOPE: f64 = 6.0;

pub const DIAGNOSIS_LEVELS: [&str; 2] = ["Group A", "Group B"];
pub const SURVEY_LEVELS: [&str; 4] = ["Germany", "France", "Spain", "Italy"];

fn normal(mean: f64, sd: f64) -> Distribution {
    Distribution::Normal { mean, sd }
}

/// Two-group tumour-style measurements: six numeric columns, two of them
/// derived from `radius_mean`.
///
/// * `perimeter_mean = 6 * radius_mean + N(0, 2)`
/// * `area_mean = pi * radius_mean^2 + N(0, 25)`
/// * `compactness_mean = 1.1 * smoothness_mean - 0.01 + N(0, 0.01)`
pub fn diagnosis_recipe() -> Recipe {
    Recipe::new("diagnosis", DIAGNOSIS_LEVELS.to_vec())
        .by_group("radius_mean", vec![normal(12.1, 1.8), normal(17.5, 3.2)])
        .by_group("texture_mean", vec![normal(17.9, 4.0), normal(21.6, 3.8)])
        .derived(
            "perimeter_mean",
            "radius_mean",
            Transform::Linear {
                slope: PERIMETER_SLOPE,
                intercept: 0.0,
            },
            normal(0.0, PERIMETER_NOISE_SD),
        )
        .derived(
            "area_mean",
            "radius_mean",
            Transform::Quadratic {
                a: PI,
                b: 0.0,
                c: 0.0,
            },
            normal(0.0, 25.0),
        )
        .by_group("smoothness_mean", vec![normal(0.092, 0.013), normal(0.103, 0.013)])
        .derived(
            "compactness_mean",
            "smoothness_mean",
            Transform::Linear {
                slope: 1.1,
                intercept: -0.01,
            },
            normal(0.0, 0.01),
        )
}

/// Four-country survey with income-driven life satisfaction and trust.
pub fn survey_recipe() -> Recipe {
    Recipe::new("country", SURVEY_LEVELS.to_vec())
        .independent(
            "age",
            Distribution::Uniform {
                low: 18.0,
                high: 80.0,
            },
        )
        .by_group(
            "income",
            vec![
                normal(48.0, 12.0),
                normal(42.0, 11.0),
                normal(31.0, 9.0),
                normal(35.0, 10.0),
            ],
        )
        .by_group(
            "education_years",
            vec![
                normal(14.2, 2.4),
                normal(13.8, 2.6),
                normal(12.1, 3.0),
                normal(12.6, 2.8),
            ],
        )
        .independent("weekly_hours", normal(37.0, 7.0))
        .derived(
            "life_satisfaction",
            "income",
            Transform::Linear {
                slope: 0.06,
                intercept: 4.2,
            },
            normal(0.0, 1.0),
        )
        .derived(
            "institutional_trust",
            "life_satisfaction",
            Transform::Linear {
                slope: 0.5,
                intercept: 1.5,
            },
            normal(0.0, 1.2),
        )
}
