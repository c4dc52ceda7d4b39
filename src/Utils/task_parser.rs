/// parse task documents with solver settings into a typed structure.
/// A task is a small TOML document with a [solver] and a [grid] section:
///
/// ```text
/// [solver]
/// method = "GEAR4"
/// tolerance = 1e-8
/// max_iterations = 50
/// loglevel = "info"
///
/// [grid]
/// t0 = 0.0
/// t_end = 1.0
/// n_steps = 101
/// ```
use crate::numerical::Examples_and_utils::linspace;
use nalgebra::DVector;
use std::error::Error;
use std::path::Path;
use std::str::FromStr;
use strum_macros::{Display, EnumIter, EnumString};
use toml::Table;

/// names of the implemented IVP methods as they appear in task documents
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display, EnumIter)]
pub enum GearMethod {
    GEAR1,
    GEAR2,
    GEAR3,
    GEAR4,
    GEAR5,
    GEAR6,
}

impl GearMethod {
    pub fn order(&self) -> usize {
        match self {
            GearMethod::GEAR1 => 1,
            GearMethod::GEAR2 => 2,
            GearMethod::GEAR3 => 3,
            GearMethod::GEAR4 => 4,
            GearMethod::GEAR5 => 5,
            GearMethod::GEAR6 => 6,
        }
    }
}

/// solver settings parsed from a task document
#[derive(Debug, Clone, PartialEq)]
pub struct GearTask {
    pub method: GearMethod,
    pub tolerance: f64,
    pub max_iterations: usize,
    pub loglevel: Option<String>,
    pub t0: f64,
    pub t_end: f64,
    pub n_steps: usize,
}

impl GearTask {
    pub fn time_grid(&self) -> DVector<f64> {
        linspace(self.t0, self.t_end, self.n_steps)
    }
}

// toml distinguishes integers from floats, task authors usually do not
fn as_f64(value: &toml::Value) -> Option<f64> {
    value
        .as_float()
        .or_else(|| value.as_integer().map(|i| i as f64))
}

pub fn parse_task(doc: &str) -> Result<GearTask, Box<dyn Error>> {
    let table: Table = toml::from_str(doc)?;
    let solver = table
        .get("solver")
        .and_then(|v| v.as_table())
        .ok_or("task must contain a [solver] section")?;
    let method_name = solver
        .get("method")
        .and_then(|v| v.as_str())
        .ok_or("solver.method must be a string like \"GEAR2\"")?;
    let method = GearMethod::from_str(method_name)
        .map_err(|_| format!("unknown method '{}', expected GEAR1..GEAR6", method_name))?;
    let tolerance = solver.get("tolerance").and_then(as_f64).unwrap_or(1e-6);
    let max_iterations = solver
        .get("max_iterations")
        .and_then(|v| v.as_integer())
        .unwrap_or(100) as usize;
    let loglevel = solver
        .get("loglevel")
        .and_then(|v| v.as_str())
        .map(|s| s.to_string());

    let grid = table
        .get("grid")
        .and_then(|v| v.as_table())
        .ok_or("task must contain a [grid] section")?;
    let t0 = grid.get("t0").and_then(as_f64).ok_or("grid.t0 must be a number")?;
    let t_end = grid
        .get("t_end")
        .and_then(as_f64)
        .ok_or("grid.t_end must be a number")?;
    let n_steps = grid
        .get("n_steps")
        .and_then(|v| v.as_integer())
        .ok_or("grid.n_steps must be an integer")? as usize;
    if t_end <= t0 {
        return Err("grid.t_end must be greater than grid.t0".into());
    }
    if n_steps < 2 {
        return Err("grid.n_steps must be at least 2".into());
    }

    Ok(GearTask {
        method,
        tolerance,
        max_iterations,
        loglevel,
        t0,
        t_end,
        n_steps,
    })
}

pub fn parse_task_file(path: &Path) -> Result<GearTask, Box<dyn Error>> {
    let doc = std::fs::read_to_string(path)?;
    parse_task(&doc)
}
