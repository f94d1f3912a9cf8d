//! # Simulated world
//!
//! A rectangular arena containing axis aligned box obstacles, and the robot's pose within it.
//!
//! Frame: x north, y east, heading measured clockwise from north so that positive angles are to
//! the right, as in every message exchanged with the robot.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::sync::{Arc, Mutex};

use comms_if::eqpt::motion::MotionEvent;
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};
use util::maths::wrap_2pi;

// ------------------------------------------------------------------------------------------------
// TYPES
// ------------------------------------------------------------------------------------------------

/// The world shared between the simulated equipment.
pub type SharedWorld = Arc<Mutex<SimWorld>>;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SimParams {
    /// Size of the arena along x and y.
    ///
    /// Units: meters
    pub arena_size_m: [f32; 2],

    pub obstacles: Vec<Obstacle>,

    /// Starting position of the robot.
    ///
    /// Units: meters
    pub start_position_m: [f32; 2],

    /// Units: degrees
    pub start_heading_deg: f32,

    /// Radius of the robot's footprint, used to stop it driving into things.
    ///
    /// Units: meters
    pub robot_radius_m: f32,

    /// Ground speed at a full forward demand.
    ///
    /// Units: meters/second
    pub max_speed_ms: f32,

    /// Turn rate at a full turning demand.
    ///
    /// Units: degrees/second
    pub max_turn_rate_degs: f32,

    /// Ranges beyond this are reported at this value.
    ///
    /// Units: meters
    pub scanner_max_range_m: f32,

    /// Time taken by the scanner for each measurement.
    ///
    /// Units: milliseconds
    pub scan_point_time_ms: u64,

    /// Time taken by the gyroscope to calibrate.
    ///
    /// Units: milliseconds
    pub calibration_time_ms: u64,

    /// Period at which the world is stepped.
    ///
    /// Units: milliseconds
    pub tick_period_ms: u64,
}

/// An axis aligned box obstacle.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct Obstacle {
    /// Units: meters
    pub min_m: [f32; 2],

    /// Units: meters
    pub max_m: [f32; 2],
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Pose {
    /// Units: meters
    pub position_m: Vector2<f32>,

    /// Units: radians
    pub heading_rad: f32,
}

pub struct SimWorld {
    params: SimParams,
    pose: Pose,
    demand: MotionEvent,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Default for SimParams {
    fn default() -> Self {
        Self {
            arena_size_m: [8.0, 6.0],
            obstacles: vec![Obstacle {
                min_m: [4.5, 1.0],
                max_m: [5.5, 3.0],
            }],
            start_position_m: [1.0, 3.0],
            start_heading_deg: 0.0,
            robot_radius_m: 0.15,
            max_speed_ms: 0.3,
            max_turn_rate_degs: 60.0,
            scanner_max_range_m: 8.0,
            scan_point_time_ms: 1,
            calibration_time_ms: 500,
            tick_period_ms: 20,
        }
    }
}

impl Obstacle {
    fn contains(&self, p: &Vector2<f32>, margin: f32) -> bool {
        p.x > self.min_m[0] - margin
            && p.x < self.max_m[0] + margin
            && p.y > self.min_m[1] - margin
            && p.y < self.max_m[1] + margin
    }

    /// Distance along the ray to the box, if the ray hits it.
    fn ray_distance(&self, origin: &Vector2<f32>, dir: &Vector2<f32>) -> Option<f32> {
        let mut t_near = std::f32::NEG_INFINITY;
        let mut t_far = std::f32::INFINITY;

        for axis in 0..2 {
            let (o, d) = (origin[axis], dir[axis]);
            let (lo, hi) = (self.min_m[axis], self.max_m[axis]);

            if d.abs() < std::f32::EPSILON {
                if o < lo || o > hi {
                    return None;
                }
                continue;
            }

            let t1 = (lo - o) / d;
            let t2 = (hi - o) / d;
            t_near = t_near.max(t1.min(t2));
            t_far = t_far.min(t1.max(t2));
        }

        if t_near > t_far || t_far < 0.0 {
            None
        } else {
            Some(t_near.max(0.0))
        }
    }
}

impl SimWorld {
    pub fn new(params: SimParams) -> Self {
        Self {
            pose: Pose {
                position_m: Vector2::new(params.start_position_m[0], params.start_position_m[1]),
                heading_rad: params.start_heading_deg.to_radians(),
            },
            params,
            demand: MotionEvent::stop(),
        }
    }

    pub fn shared(params: SimParams) -> SharedWorld {
        Arc::new(Mutex::new(Self::new(params)))
    }

    pub fn params(&self) -> &SimParams {
        &self.params
    }

    pub fn pose(&self) -> Pose {
        self.pose
    }

    pub fn set_demand(&mut self, demand: MotionEvent) {
        self.demand = demand;
    }

    /// Advance the world by `dt_s`, returning the change in heading.
    ///
    /// Units: degrees
    pub fn step(&mut self, dt_s: f32) -> f32 {
        let forward = self.demand.speed * self.demand.direction_rad.cos() * self.params.max_speed_ms;
        let turn_degs =
            self.demand.speed * self.demand.direction_rad.sin() * self.params.max_turn_rate_degs;

        let dh_deg = turn_degs * dt_s;
        self.pose.heading_rad = wrap_2pi(self.pose.heading_rad + dh_deg.to_radians());

        let heading = self.pose.heading_rad;
        let next = self.pose.position_m
            + Vector2::new(heading.cos(), heading.sin()) * forward * dt_s;
        if self.is_free(&next) {
            self.pose.position_m = next;
        }

        dh_deg
    }

    /// Range measured by the scanner at the given bearing from the robot's heading.
    ///
    /// Units: meters
    pub fn range_at(&self, bearing_rad: f32) -> f32 {
        let angle = self.pose.heading_rad + bearing_rad;
        let dir = Vector2::new(angle.cos(), angle.sin());
        let origin = self.pose.position_m;

        // Walls: distance to leave the arena along each axis
        let mut range = self.params.scanner_max_range_m;
        for axis in 0..2 {
            let d = dir[axis];
            let t = if d > std::f32::EPSILON {
                (self.params.arena_size_m[axis] - origin[axis]) / d
            } else if d < -std::f32::EPSILON {
                -origin[axis] / d
            } else {
                continue;
            };
            range = range.min(t);
        }

        for obstacle in self.params.obstacles.iter() {
            if let Some(t) = obstacle.ray_distance(&origin, &dir) {
                range = range.min(t);
            }
        }

        range.max(0.0)
    }

    fn is_free(&self, p: &Vector2<f32>) -> bool {
        let r = self.params.robot_radius_m;
        let inside_arena = p.x > r
            && p.y > r
            && p.x < self.params.arena_size_m[0] - r
            && p.y < self.params.arena_size_m[1] - r;

        inside_arena && !self.params.obstacles.iter().any(|o| o.contains(p, r))
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
