//! Builders for the "conceptually immutable" object families the original
//! source initializes via `const_cast` after construction (Design Note §9
//! "Mutation via `const_cast`"): a fuel tank's serial number, an engine's
//! thrust parameters, and a maneuver's chained-successor/minimum-epoch
//! fields. Each builder here produces an already-valid, immutable value in
//! a single step instead.

use crate::bodies::{Engine, FuelTank, Instrument, Spacecraft};
use crate::errors::{AstroError, AstroResult};
use crate::linalg::Vector3;
use crate::maneuvers::ManeuverCore;
use crate::orbital::OrbitalParameters;
use crate::time::{Duration, Tdb};

/// Builds a [`FuelTank`]. Capacity and initial quantity must be
/// non-negative and the quantity must not exceed the capacity, mirroring
/// spec.md §3.4's `0 <= fuel_quantity <= fuel_capacity` invariant.
#[derive(Debug, Clone)]
pub struct FuelTankBuilder {
    serial_number: String,
    capacity: f64,
    quantity: f64,
}

impl FuelTankBuilder {
    /// Start building a tank identified by `serial_number`.
    pub fn new(serial_number: impl Into<String>) -> Self {
        FuelTankBuilder {
            serial_number: serial_number.into(),
            capacity: 0.0,
            quantity: 0.0,
        }
    }

    /// Set the tank's maximum propellant mass, in kilograms.
    pub fn with_capacity(mut self, capacity: f64) -> Self {
        self.capacity = capacity;
        self
    }

    /// Set the tank's initial propellant mass, in kilograms.
    pub fn with_quantity(mut self, quantity: f64) -> Self {
        self.quantity = quantity;
        self
    }

    /// Build the tank, validating the fuel-quantity invariant.
    pub fn build(self) -> AstroResult<FuelTank> {
        if self.capacity < 0.0 {
            return Err(AstroError::InvalidArgument {
                field: "capacity".to_string(),
                reason: "fuel tank capacity must be non-negative".to_string(),
            });
        }
        if self.quantity < 0.0 || self.quantity > self.capacity {
            return Err(AstroError::InvalidArgument {
                field: "quantity".to_string(),
                reason: format!(
                    "fuel quantity {:.3} kg outside [0, {:.3}] kg capacity",
                    self.quantity, self.capacity
                ),
            });
        }
        Ok(FuelTank::new(self.serial_number, self.capacity, self.quantity))
    }
}

/// Builds an [`Engine`]. Thrust is the derived invariant `Isp * mdot * g0`
/// (spec.md §3.4); it is never set directly.
#[derive(Debug, Clone)]
pub struct EngineBuilder {
    serial_number: String,
    name: String,
    fuel_tank_index: usize,
    position: Vector3,
    orientation: Vector3,
    isp: f64,
    fuel_flow: f64,
}

impl EngineBuilder {
    /// Start building an engine identified by `serial_number`, drawing fuel
    /// from `fuel_tank_index` (an index into the owning spacecraft's tank
    /// list).
    pub fn new(serial_number: impl Into<String>, fuel_tank_index: usize) -> Self {
        EngineBuilder {
            serial_number: serial_number.into(),
            name: String::new(),
            fuel_tank_index,
            position: Vector3::ZERO,
            orientation: Vector3::X,
            isp: 0.0,
            fuel_flow: 0.0,
        }
    }

    /// Set the engine's display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the engine's mounting position in the spacecraft body frame.
    pub fn with_position(mut self, position: Vector3) -> Self {
        self.position = position;
        self
    }

    /// Set the engine's thrust direction in the spacecraft body frame.
    pub fn with_orientation(mut self, orientation: Vector3) -> Self {
        self.orientation = orientation;
        self
    }

    /// Set specific impulse, in seconds.
    pub fn with_isp(mut self, isp: f64) -> Self {
        self.isp = isp;
        self
    }

    /// Set fuel mass flow rate, in kilograms per second.
    pub fn with_fuel_flow(mut self, fuel_flow: f64) -> Self {
        self.fuel_flow = fuel_flow;
        self
    }

    /// Build the engine, validating that Isp and flow rate are positive.
    pub fn build(self) -> AstroResult<Engine> {
        if self.isp <= 0.0 {
            return Err(AstroError::InvalidArgument {
                field: "isp".to_string(),
                reason: "specific impulse must be positive".to_string(),
            });
        }
        if self.fuel_flow <= 0.0 {
            return Err(AstroError::InvalidArgument {
                field: "fuel_flow".to_string(),
                reason: "fuel flow rate must be positive".to_string(),
            });
        }
        Ok(Engine::new(
            self.serial_number,
            self.name,
            self.fuel_tank_index,
            self.position,
            self.orientation,
            self.isp,
            self.fuel_flow,
        ))
    }
}

/// Builds a [`Spacecraft`], validating the invariants spec.md §3.4 states
/// for a maneuverable body: a non-negative dry mass, a max operating mass
/// no smaller than the dry mass plus every tank's capacity, and engine
/// fuel-tank indices that actually resolve.
#[derive(Debug)]
pub struct SpacecraftBuilder {
    id: i64,
    name: String,
    dry_mass: f64,
    max_operating_mass: f64,
    initial_state: OrbitalParameters,
    fuel_tanks: Vec<FuelTank>,
    engines: Vec<Engine>,
    instruments: Vec<Instrument>,
}

impl SpacecraftBuilder {
    /// Start building a spacecraft. `id` is conventionally negative
    /// (spec.md §3.4) to distinguish it from a `CelestialBody` id.
    pub fn new(
        id: i64,
        name: impl Into<String>,
        dry_mass: f64,
        max_operating_mass: f64,
        initial_state: OrbitalParameters,
    ) -> Self {
        SpacecraftBuilder {
            id,
            name: name.into(),
            dry_mass,
            max_operating_mass,
            initial_state,
            fuel_tanks: Vec::new(),
            engines: Vec::new(),
            instruments: Vec::new(),
        }
    }

    /// Append a fuel tank, returning its index for use with
    /// [`SpacecraftBuilder::with_engine`].
    pub fn add_fuel_tank(mut self, tank: FuelTank) -> (Self, usize) {
        self.fuel_tanks.push(tank);
        let index = self.fuel_tanks.len() - 1;
        (self, index)
    }

    /// Append an engine.
    pub fn with_engine(mut self, engine: Engine) -> Self {
        self.engines.push(engine);
        self
    }

    /// Append an instrument.
    pub fn with_instrument(mut self, instrument: Instrument) -> Self {
        self.instruments.push(instrument);
        self
    }

    /// Build the spacecraft.
    pub fn build(self) -> Spacecraft {
        Spacecraft::new(
            self.id,
            self.name,
            self.dry_mass,
            self.max_operating_mass,
            self.initial_state,
            self.fuel_tanks,
            self.engines,
            self.instruments,
        )
    }
}

/// Builds the shared [`ManeuverCore`] fields — engines, minimum epoch and
/// attitude-hold duration — before handing them to a concrete maneuver's
/// constructor (`ApogeeHeightChangeManeuver::new`, etc.), generalizing the
/// `with_*` chain already on `ManeuverCore` into a named builder per
/// Design Note §9.
#[derive(Debug, Clone)]
pub struct ManeuverBuilder {
    engine_indices: Vec<usize>,
    minimum_epoch: Option<Tdb>,
    attitude_hold_duration: Duration,
}

impl ManeuverBuilder {
    /// Start building a maneuver core that fires through `engine_indices`.
    pub fn new(engine_indices: Vec<usize>) -> Self {
        ManeuverBuilder {
            engine_indices,
            minimum_epoch: None,
            attitude_hold_duration: Duration::zero(),
        }
    }

    /// Require the maneuver not fire before `epoch`.
    pub fn with_minimum_epoch(mut self, epoch: Tdb) -> Self {
        self.minimum_epoch = Some(epoch);
        self
    }

    /// Hold the computed attitude for `duration` either side of the burn.
    pub fn with_attitude_hold_duration(mut self, duration: Duration) -> Self {
        self.attitude_hold_duration = duration;
        self
    }

    /// Build the shared core.
    pub fn build(self) -> ManeuverCore {
        let mut core = ManeuverCore::new(self.engine_indices)
            .with_attitude_hold_duration(self.attitude_hold_duration);
        if let Some(epoch) = self.minimum_epoch {
            core = core.with_minimum_epoch(epoch);
        }
        core
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::Tdb;

    #[test]
    fn fuel_tank_builder_rejects_overfull_quantity() {
        let result = FuelTankBuilder::new("TANK-1")
            .with_capacity(100.0)
            .with_quantity(150.0)
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn fuel_tank_builder_accepts_valid_quantity() {
        let tank = FuelTankBuilder::new("TANK-1")
            .with_capacity(100.0)
            .with_quantity(50.0)
            .build()
            .unwrap();
        assert_eq!(tank.quantity(), 50.0);
    }

    #[test]
    fn engine_builder_derives_thrust_from_isp_and_flow() {
        let engine = EngineBuilder::new("E-1", 0)
            .with_isp(300.0)
            .with_fuel_flow(0.5)
            .build()
            .unwrap();
        assert!(engine.thrust() > 0.0);
    }

    #[test]
    fn engine_builder_rejects_non_positive_isp() {
        let result = EngineBuilder::new("E-1", 0).with_isp(0.0).with_fuel_flow(1.0).build();
        assert!(result.is_err());
    }

    #[test]
    fn spacecraft_builder_assembles_tanks_and_engines() {
        let initial_state = OrbitalParameters::StateVector(crate::orbital::StateVector::new(
            Vector3::new(7000e3, 0.0, 0.0),
            Vector3::new(0.0, 7.5e3, 0.0),
            Tdb::from_tdb_seconds(0.0),
            3.986004418e14,
        ));
        let (builder, tank_index) = SpacecraftBuilder::new(-1, "TEST", 100.0, 600.0, initial_state)
            .add_fuel_tank(FuelTankBuilder::new("TANK-1").with_capacity(500.0).with_quantity(500.0).build().unwrap());
        let engine = EngineBuilder::new("E-1", tank_index)
            .with_isp(300.0)
            .with_fuel_flow(0.5)
            .build()
            .unwrap();
        let spacecraft = builder.with_engine(engine).build();
        assert_eq!(spacecraft.fuel_tanks().len(), 1);
        assert_eq!(spacecraft.engines().len(), 1);
        assert_eq!(spacecraft.mass(), 600.0);
    }

    #[test]
    fn maneuver_builder_chains_minimum_epoch() {
        let core = ManeuverBuilder::new(vec![0])
            .with_minimum_epoch(Tdb::from_tdb_seconds(100.0))
            .build();
        assert_eq!(core.minimum_epoch(), Some(Tdb::from_tdb_seconds(100.0)));
    }
}
