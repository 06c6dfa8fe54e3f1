//! Region lookup and aggregation for the map chart.
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::stats::mean;
use crate::table::WideTable;

/// Approximate (latitude, longitude) centroids of the regions the survey
/// recipes can sample.
const CENTROIDS: [(&str, f64, f64); 10] = [
    ("Germany", 51.17, 10.45),
    ("France", 46.60, 1.89),
    ("Spain", 40.46, -3.75),
    ("Italy", 42.50, 12.57),
    ("United Kingdom", 54.00, -2.00),
    ("Netherlands", 52.13, 5.29),
    ("Poland", 51.92, 19.15),
    ("Sweden", 62.20, 17.64),
    ("Portugal", 39.40, -8.22),
    ("Austria", 47.52, 14.55),
];

pub fn centroid(region: &str) -> Option<(f64, f64)> {
    CENTROIDS
        .iter()
        .find(|(name, _, _)| name.eq_ignore_ascii_case(region))
        .map(|&(_, lat, lon)| (lat, lon))
}

/// One aggregated value per region.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionMetric {
    pub region: String,
    pub lat: f64,
    pub lon: f64,
    pub count: usize,
    pub mean: f64,
}

/// Mean of `column` per group level, placed at the level's centroid.
///
/// Levels without a known centroid or without records are left out. `None`
/// if the column is absent.
pub fn region_metrics(wide: &WideTable, column: &str) -> Option<Vec<RegionMetric>> {
    let grouped = wide.values_by_group(column)?;
    let mut metrics = Vec::with_capacity(grouped.len());
    for (level, values) in wide.levels().iter().zip(grouped) {
        let Some((lat, lon)) = centroid(level) else {
            log::warn!("No centroid known for region '{}'; leaving it off the map", level);
            continue;
        };
        if values.is_empty() {
            continue;
        }
        metrics.push(RegionMetric {
            region: level.clone(),
            lat,
            lon,
            count: values.len(),
            mean: mean(&values),
        });
    }
    Some(metrics)
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapPoint {
    pub record: usize,
    pub region: String,
    pub lat: f64,
    pub lon: f64,
}

/// One point per record, scattered uniformly within `spread` degrees of its
/// region's centroid. Records of unknown regions are skipped.
pub fn respondent_points(wide: &WideTable, spread: f64, seed: u64) -> Vec<MapPoint> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let spread = spread.abs();
    let mut points = Vec::with_capacity(wide.nrows());
    for record in 0..wide.nrows() {
        let region = wide.group_label(record);
        let Some((lat, lon)) = centroid(region) else {
            continue;
        };
        let (dlat, dlon) = if spread > 0.0 {
            (rng.gen_range(-spread..spread), rng.gen_range(-spread..spread))
        } else {
            (0.0, 0.0)
        };
        points.push(MapPoint {
            record,
            region: region.to_string(),
            lat: lat + dlat,
            lon: lon + dlon,
        });
    }
    points
}
