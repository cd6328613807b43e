//! Shared test fixtures

#![allow(dead_code)]

use fiducia::ransac::ModelFitter;
use fiducia::spatial::PointCloud;
use nalgebra::Point3;

/// Builds the standard query cloud: eight labeled points with known
/// distances from the origin and from (490, 0, 0).
pub fn make_query_cloud() -> PointCloud<f64, u32> {
    let mut cloud = PointCloud::new();
    cloud.push(Point3::new(0.0, 0.0, 0.0), 0);
    cloud.push(Point3::new(5.0, 0.0, 0.0), 1);
    cloud.push(Point3::new(0.0, 5.0, 0.0), 2);
    cloud.push(Point3::new(0.0, 0.0, 5.0), 3);
    cloud.push(Point3::new(0.0, 0.0, 500.0), 4);
    cloud.push(Point3::new(500.0, 0.0, 0.0), 5);
    cloud.push(Point3::new(1.0, 0.0, 0.0), 6);
    cloud.push(Point3::new(0.0, 0.0, 1.0), 7);
    cloud
}

/// Labels of the cloud's current search space, in view order.
pub fn labels(cloud: &PointCloud<f64, u32>) -> Vec<u32> {
    cloud.iter().map(|(_, label)| *label).collect()
}

/// One-dimensional location fitter: the model is the mean of the sample,
/// a value supports it when within `tolerance`.
pub struct MeanFitter {
    pub tolerance: f64,
}

impl ModelFitter for MeanFitter {
    type Param = f64;
    type Model = f64;

    fn fit(&self, sample: &[&f64]) -> Option<f64> {
        if sample.is_empty() {
            return None;
        }
        Some(sample.iter().map(|v| **v).sum::<f64>() / sample.len() as f64)
    }

    fn supports(&self, param: &f64, model: &f64) -> bool {
        (param - model).abs() < self.tolerance
    }
}
