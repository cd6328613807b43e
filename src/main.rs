//! Example usage of the Fiducia library
//!
//! Tracks a single moving marker through simulated frames: candidate points
//! are narrowed spatially, a robust centroid is fitted with RANSAC, and an
//! unscented Kalman filter smooths the result over time.

use fiducia::prelude::*;
use nalgebra::{Point3, Vector3};

/// Centroid of a 3D point cluster, fitted robustly.
struct CentroidFitter {
    radius: f64,
}

impl ModelFitter for CentroidFitter {
    type Param = Point3<f64>;
    type Model = Point3<f64>;

    fn fit(&self, sample: &[&Point3<f64>]) -> Option<Point3<f64>> {
        if sample.is_empty() {
            return None;
        }
        let mut sum = Vector3::zeros();
        for point in sample {
            sum += point.coords;
        }
        Some(Point3::from(sum / sample.len() as f64))
    }

    fn supports(&self, param: &Point3<f64>, model: &Point3<f64>) -> bool {
        (param - model).norm() < self.radius
    }
}

fn main() {
    println!("Fiducia: Marker Tracking Primitives");
    println!("===================================\n");

    // Detections per frame: a cluster around the true marker position
    // (moving +2.0 per frame in x) plus stray points from other structures.
    let frames: Vec<Vec<Point3<f64>>> = (0..5)
        .map(|t| {
            let cx = 10.0 + 2.0 * t as f64;
            vec![
                Point3::new(cx - 0.3, 5.2, 80.1),
                Point3::new(cx + 0.2, 4.9, 79.8),
                Point3::new(cx + 0.1, 5.1, 80.3),
                Point3::new(cx - 0.1, 4.8, 79.9),
                Point3::new(cx + 45.0, -20.0, 60.0), // unrelated structure
                Point3::new(cx - 30.0, 90.0, 150.0), // unrelated structure
            ]
        })
        .collect();

    // Robust centroid estimation over candidate points
    let mut ransac = Ransac::seeded(CentroidFitter { radius: 1.5 }, 2, 3, 42);

    // Constant velocity track of the marker center, one frame per step
    let process = ConstantVelocity3D::new(1.0, 0.5);
    let mut sensor = PositionSensor3D::new(0.3);
    let mut filter = UnscentedKalmanFilter::new(
        StateVector::from_array([10.0, 5.0, 80.0, 0.0, 0.0, 0.0]),
        StateCovariance::identity().scale(4.0),
        1.0,
    );

    for (t, detections) in frames.iter().enumerate() {
        // Collect this frame's detections and narrow them around the
        // predicted marker position.
        let mut cloud: PointCloud<f64, usize> = PointCloud::with_capacity(detections.len());
        for (i, point) in detections.iter().enumerate() {
            cloud.push(*point, i);
        }

        let predicted = Point3::new(
            *filter.state().index(0),
            *filter.state().index(1),
            *filter.state().index(2),
        );
        cloud.retain_within(&predicted, 10.0);
        cloud.sort_by_distance(&predicted);

        let candidates: Vec<Point3<f64>> = cloud.iter().map(|(p, _)| *p).collect();
        println!(
            "Frame {}: {} detections, {} near the prediction",
            t,
            cloud.total_len(),
            candidates.len()
        );

        // Fit the marker center robustly, then refine it on its supporters.
        let found = match ransac.estimate(&candidates, 4, 50) {
            Ok(found) => found,
            Err(err) => {
                println!("  estimation failed: {}", err);
                continue;
            }
        };
        let refined = ransac.refine(&candidates, candidates.len(), 10, found.model);
        println!(
            "  centroid ({:.2}, {:.2}, {:.2}) supported by {}/{} after {} rounds",
            refined.model.x,
            refined.model.y,
            refined.model.z,
            refined.support,
            candidates.len(),
            found.rounds
        );

        // Feed the fitted center to the filter as a position measurement.
        sensor.set_measurement(Measurement::from_array([
            refined.model.x,
            refined.model.y,
            refined.model.z,
        ]));
        if let Err(err) = filter.step(&process, &sensor) {
            println!("  filter step failed: {}", err);
            continue;
        }

        println!(
            "  track pos=({:.2}, {:.2}, {:.2}) vel=({:.2}, {:.2}, {:.2}) trace={:.3}\n",
            filter.state().index(0),
            filter.state().index(1),
            filter.state().index(2),
            filter.state().index(3),
            filter.state().index(4),
            filter.state().index(5),
            filter.uncertainty()
        );
    }

    println!("Tracking complete!");

    // Demonstrate type safety (these would not compile):
    // let state: StateVector<f64, 3> = StateVector::from_array([1.0, 2.0, 3.0]);
    // let meas: Measurement<f64, 3> = Measurement::from_array([4.0, 5.0, 6.0]);
    // let invalid = state + meas;  // ERROR: cannot add different spaces
}
