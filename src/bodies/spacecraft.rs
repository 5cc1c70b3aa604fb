//! Spacecraft: a body-like object carrying fuel tanks, engines and
//! instruments, grounded on `IO.Astrodynamics/Body/Spacecraft/{Engine,
//! FuelTank}.h` and `IO.Astrodynamics/Instruments/Instrument.h`.

use crate::errors::{AstroError, AstroResult};
use crate::linalg::Vector3;
use crate::orbital::OrbitalParameters;
use crate::time::Duration;

/// A fuel tank: a bounded reservoir of propellant mass.
///
/// Built only through [`crate::builder::FuelTankBuilder`] (Design Note §9:
/// the original initializes "conceptually immutable" fields such as the
/// serial number through `const_cast` after construction; the builder here
/// produces an already-valid, immutable value instead).
#[derive(Debug, Clone, PartialEq)]
pub struct FuelTank {
    serial_number: String,
    capacity: f64,
    quantity: f64,
}

impl FuelTank {
    pub(crate) fn new(serial_number: String, capacity: f64, quantity: f64) -> Self {
        FuelTank {
            serial_number,
            capacity,
            quantity,
        }
    }

    /// The tank's serial number.
    pub fn serial_number(&self) -> &str {
        &self.serial_number
    }

    /// Maximum fuel mass the tank can hold, in kilograms.
    pub fn capacity(&self) -> f64 {
        self.capacity
    }

    /// Current fuel mass, in kilograms.
    pub fn quantity(&self) -> f64 {
        self.quantity
    }

    /// Whether the tank holds no fuel.
    pub fn is_empty(&self) -> bool {
        self.quantity <= 0.0
    }

    /// Remove `amount` kilograms of fuel, erroring if that would drive the
    /// tank negative (spec.md §3.4: `0 <= fuel_quantity <= fuel_capacity`
    /// at all times).
    pub fn burn(&mut self, amount: f64) -> AstroResult<()> {
        if amount > self.quantity {
            return Err(AstroError::InsufficientFuel {
                tank: self.serial_number.clone(),
                required: amount,
                available: self.quantity,
            });
        }
        self.quantity -= amount;
        Ok(())
    }
}

/// A rocket engine: consumes fuel from one tank at a fixed flow rate and
/// specific impulse.
///
/// Thrust `F = Isp * mdot * g0` is a derived invariant (spec.md §3.4), not
/// stored independently.
#[derive(Debug, Clone, PartialEq)]
pub struct Engine {
    serial_number: String,
    name: String,
    fuel_tank_index: usize,
    position: Vector3,
    orientation: Vector3,
    isp: f64,
    fuel_flow: f64,
}

/// Standard gravity, used to convert specific impulse (seconds) into an
/// effective exhaust velocity for thrust and Tsiolkovsky calculations.
pub const STANDARD_GRAVITY: f64 = 9.80665;

impl Engine {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        serial_number: String,
        name: String,
        fuel_tank_index: usize,
        position: Vector3,
        orientation: Vector3,
        isp: f64,
        fuel_flow: f64,
    ) -> Self {
        Engine {
            serial_number,
            name,
            fuel_tank_index,
            position,
            orientation,
            isp,
            fuel_flow,
        }
    }

    /// The engine's serial number.
    pub fn serial_number(&self) -> &str {
        &self.serial_number
    }

    /// The engine's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Index of the fuel tank this engine draws from, within the owning
    /// spacecraft's tank list.
    pub fn fuel_tank_index(&self) -> usize {
        self.fuel_tank_index
    }

    /// Mounting position in the spacecraft body frame.
    pub fn position(&self) -> Vector3 {
        self.position
    }

    /// Thrust direction in the spacecraft body frame.
    pub fn orientation(&self) -> Vector3 {
        self.orientation
    }

    /// Specific impulse, in seconds.
    pub fn isp(&self) -> f64 {
        self.isp
    }

    /// Fuel mass flow rate, in kilograms per second.
    pub fn fuel_flow(&self) -> f64 {
        self.fuel_flow
    }

    /// Derived thrust, in newtons: `Isp * mdot * g0`.
    pub fn thrust(&self) -> f64 {
        self.isp * self.fuel_flow * STANDARD_GRAVITY
    }

    /// Fuel mass consumed by a continuous burn of this engine for `duration`.
    pub fn fuel_burned(&self, duration: Duration) -> f64 {
        self.fuel_flow * duration.to_seconds()
    }
}

/// The shape of an instrument's field of view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FovShape {
    /// A circular cone, described by a single half-angle.
    Circular { half_angle: f64 },
    /// A rectangular pyramid, described by two half-angles.
    Rectangular { half_angle_x: f64, half_angle_y: f64 },
    /// An elliptical cone, described by two half-angles.
    Elliptical { half_angle_x: f64, half_angle_y: f64 },
}

/// An onboard instrument: a boresight direction, a field of view, and a
/// reference vector used to orient non-circular FOV shapes.
#[derive(Debug, Clone, PartialEq)]
pub struct Instrument {
    id: i32,
    boresight: Vector3,
    fov: FovShape,
    reference_vector: Vector3,
}

impl Instrument {
    /// Build an instrument.
    pub fn new(id: i32, boresight: Vector3, fov: FovShape, reference_vector: Vector3) -> Self {
        Instrument {
            id,
            boresight,
            fov,
            reference_vector,
        }
    }

    /// The instrument's id.
    pub fn id(&self) -> i32 {
        self.id
    }

    /// The boresight (optical axis), in the spacecraft body frame.
    pub fn boresight(&self) -> Vector3 {
        self.boresight
    }

    /// The field-of-view shape.
    pub fn fov(&self) -> FovShape {
        self.fov
    }

    /// The reference vector used to orient the FOV's non-circular axes.
    pub fn reference_vector(&self) -> Vector3 {
        self.reference_vector
    }

    /// Whether `direction` (in the spacecraft body frame) falls within this
    /// instrument's field of view.
    pub fn contains_direction(&self, direction: &Vector3) -> bool {
        let angle = self.boresight.angle(direction);
        match self.fov {
            FovShape::Circular { half_angle } => angle <= half_angle,
            FovShape::Rectangular {
                half_angle_x,
                half_angle_y,
            } => {
                let x_axis = self.reference_vector.cross(&self.boresight).normalize();
                let y_axis = self.boresight.cross(&x_axis).normalize();
                let dx = direction.angle_in_plane(&self.boresight, &y_axis).abs();
                let dy = direction.angle_in_plane(&self.boresight, &x_axis).abs();
                dx <= half_angle_x && dy <= half_angle_y
            }
            FovShape::Elliptical {
                half_angle_x,
                half_angle_y,
            } => {
                let x_axis = self.reference_vector.cross(&self.boresight).normalize();
                let y_axis = self.boresight.cross(&x_axis).normalize();
                let dx = direction.angle_in_plane(&self.boresight, &y_axis);
                let dy = direction.angle_in_plane(&self.boresight, &x_axis);
                (dx / half_angle_x).powi(2) + (dy / half_angle_y).powi(2) <= 1.0
            }
        }
    }
}

/// Axis convention exposed by every spacecraft: the six body-frame unit
/// vectors maneuvers and attitudes orient against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisConvention;

impl AxisConvention {
    /// The spacecraft's forward-facing axis (along +X).
    pub fn front() -> Vector3 {
        Vector3::X
    }
    /// The spacecraft's aft-facing axis.
    pub fn back() -> Vector3 {
        Vector3::X.reverse()
    }
    /// The spacecraft's left-facing axis.
    pub fn left() -> Vector3 {
        Vector3::Y.reverse()
    }
    /// The spacecraft's right-facing axis (along +Y).
    pub fn right() -> Vector3 {
        Vector3::Y
    }
    /// The spacecraft's top (zenith-facing, nominal) axis (along +Z).
    pub fn top() -> Vector3 {
        Vector3::Z
    }
    /// The spacecraft's bottom (nadir-facing, nominal) axis.
    pub fn bottom() -> Vector3 {
        Vector3::Z.reverse()
    }
}

/// A spacecraft: a maneuverable body carrying fuel tanks, engines and
/// instruments, with its own initial orbital state.
///
/// Built only through [`crate::builder::SpacecraftBuilder`].
#[derive(Debug, Clone, PartialEq)]
pub struct Spacecraft {
    id: i64,
    name: String,
    dry_mass: f64,
    max_operating_mass: f64,
    initial_state: OrbitalParameters,
    fuel_tanks: Vec<FuelTank>,
    engines: Vec<Engine>,
    instruments: Vec<Instrument>,
}

impl Spacecraft {
    pub(crate) fn new(
        id: i64,
        name: String,
        dry_mass: f64,
        max_operating_mass: f64,
        initial_state: OrbitalParameters,
        fuel_tanks: Vec<FuelTank>,
        engines: Vec<Engine>,
        instruments: Vec<Instrument>,
    ) -> Self {
        Spacecraft {
            id,
            name,
            dry_mass,
            max_operating_mass,
            initial_state,
            fuel_tanks,
            engines,
            instruments,
        }
    }

    /// The spacecraft's id (conventionally negative, spec.md §3.4).
    pub fn id(&self) -> i64 {
        self.id
    }

    /// The spacecraft's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Dry (propellant-free) mass, in kilograms.
    pub fn dry_mass(&self) -> f64 {
        self.dry_mass
    }

    /// Maximum allowed operating mass (dry mass plus full tanks), in
    /// kilograms.
    pub fn max_operating_mass(&self) -> f64 {
        self.max_operating_mass
    }

    /// The spacecraft's initial orbital state.
    pub fn initial_state(&self) -> &OrbitalParameters {
        &self.initial_state
    }

    /// The spacecraft's fuel tanks.
    pub fn fuel_tanks(&self) -> &[FuelTank] {
        &self.fuel_tanks
    }

    /// Mutable access to the fuel tanks, used by maneuver execution to burn
    /// fuel.
    pub fn fuel_tanks_mut(&mut self) -> &mut [FuelTank] {
        &mut self.fuel_tanks
    }

    /// The spacecraft's engines.
    pub fn engines(&self) -> &[Engine] {
        &self.engines
    }

    /// The spacecraft's instruments.
    pub fn instruments(&self) -> &[Instrument] {
        &self.instruments
    }

    /// Current total mass: dry mass plus the sum of all current fuel
    /// quantities (spec.md §3.4 invariant `mass(t) = dry_mass + sum
    /// fuel_quantity_i(t)`).
    pub fn mass(&self) -> f64 {
        self.dry_mass + self.fuel_tanks.iter().map(FuelTank::quantity).sum::<f64>()
    }

    /// Total fuel mass available across every tank feeding `engine_indices`.
    pub fn available_fuel(&self, engine_indices: &[usize]) -> f64 {
        let mut tanks_seen = std::collections::HashSet::new();
        let mut total = 0.0;
        for &ei in engine_indices {
            let tank_idx = self.engines[ei].fuel_tank_index();
            if tanks_seen.insert(tank_idx) {
                total += self.fuel_tanks[tank_idx].quantity();
            }
        }
        total
    }

    /// Burn `amount` kilograms of fuel out of `tank_index`.
    pub fn burn_fuel(&mut self, tank_index: usize, amount: f64) -> AstroResult<()> {
        self.fuel_tanks[tank_index].burn(amount)
    }
}
