// SPDX-License-Identifier: MIT

//! Routes: immutable, content-addressed sequences of jumps.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use crate::id::RouteId;

/// A single jump in a plotted route.
///
/// Optional fields are left `None` rather than defaulted to zero: the fuel
/// projection in the expedition engine depends on being able to tell "no
/// fuel figure was plotted for this jump" apart from "this jump costs no
/// fuel".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteJump {
    pub system_name: String,
    pub system_id: i64,
    /// Distance from the prior jump, in light years.
    pub distance_ly: f64,
    pub fuel_used_ly: Option<f64>,
    pub fuel_in_tank_ly: Option<f64>,
    /// The destination star can refuel the ship in-system.
    pub scoopable: bool,
    pub must_refuel: bool,
    pub position: Option<[f64; 3]>,
    pub neutron_boost: Option<bool>,
}

impl RouteJump {
    pub fn new(system_name: impl Into<String>, system_id: i64, distance_ly: f64) -> Self {
        Self {
            system_name: system_name.into(),
            system_id,
            distance_ly,
            fuel_used_ly: None,
            fuel_in_tank_ly: None,
            scoopable: false,
            must_refuel: false,
            position: None,
            neutron_boost: None,
        }
    }
}

/// An ordered, immutable sequence of jumps produced by a plotter (or by
/// baking an expedition graph — see [`crate::bake_route`]).
///
/// Routes are content-addressed by [`RouteId`] and never mutated after
/// creation; expeditions reference them by id rather than embedding them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub id: RouteId,
    pub name: String,
    /// Tag identifying which plotter produced this route (e.g. a third
    /// party HTTP plotter's name, or `"baked"` for expedition-internal
    /// routes — see [`crate::bake_route`]).
    pub plotter: String,
    /// Opaque parameters passed to the plotter; not interpreted by the
    /// core.
    #[serde(default)]
    pub plotter_params: HashMap<String, Value>,
    #[serde(default)]
    pub plotter_metadata: Option<Value>,
    pub jumps: Vec<RouteJump>,
    pub created_at: DateTime<Utc>,
}

impl Route {
    pub fn new(name: impl Into<String>, plotter: impl Into<String>, jumps: Vec<RouteJump>) -> Self {
        Self {
            id: RouteId::new(),
            name: name.into(),
            plotter: plotter.into(),
            plotter_params: HashMap::new(),
            plotter_metadata: None,
            jumps,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
#[path = "route_tests.rs"]
mod tests;
