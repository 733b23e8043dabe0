//! SI quantities at typed API boundaries.
//!
//! Reactor parameters carry `uom` quantities; engine internals work on plain
//! SI `f64` values read back with `get::<unit>()`.

use uom::si::f64::{
    Length as UomLength, MassRate as UomMassRate, Pressure as UomPressure,
    ThermodynamicTemperature as UomThermodynamicTemperature, Time as UomTime,
};

pub type Length = UomLength;
pub type MassRate = UomMassRate;
pub type Pressure = UomPressure;
pub type Temperature = UomThermodynamicTemperature;
pub type Time = UomTime;

#[inline]
pub fn pa(v: f64) -> Pressure {
    use uom::si::pressure::pascal;
    Pressure::new::<pascal>(v)
}

#[inline]
pub fn k(v: f64) -> Temperature {
    use uom::si::thermodynamic_temperature::kelvin;
    Temperature::new::<kelvin>(v)
}

#[inline]
pub fn kgps(v: f64) -> MassRate {
    use uom::si::mass_rate::kilogram_per_second;
    MassRate::new::<kilogram_per_second>(v)
}

/// Mass flow given in kg/h, the unit used in feed-rate configuration.
#[inline]
pub fn kgph(v: f64) -> MassRate {
    kgps(v / 3600.0)
}

#[inline]
pub fn m(v: f64) -> Length {
    use uom::si::length::meter;
    Length::new::<meter>(v)
}

#[inline]
pub fn s(v: f64) -> Time {
    use uom::si::time::second;
    Time::new::<second>(v)
}

pub mod constants {
    /// Universal gas constant [J/(kmol·K)].
    pub const R_UNIVERSAL: f64 = 8_314.462_618;

    /// Molar gas constant [J/(mol·K)], used with activation energies in J/mol.
    pub const R_MOLAR: f64 = 8.314_462_618;

    /// Offset between kelvin and degrees Celsius.
    pub const CELSIUS_OFFSET: f64 = 273.15;
}
