//! Typed reactor parameters.

use crate::error::{ReactorError, ReactorResult};
use efr_core::units::{Length, MassRate, Pressure, Temperature, Time};
use efr_kinetics::{EnergyEquation, ReactorKind};
use uom::si::length::meter;
use uom::si::mass_rate::kilogram_per_second;
use uom::si::pressure::pascal;
use uom::si::thermodynamic_temperature::kelvin;
use uom::si::time::second;

/// Number of evenly spaced output times of a batch run (both ends included).
pub const BATCH_TIME_POINTS: usize = 100;

fn positive(value: f64, what: &str) -> ReactorResult<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ReactorError::InvalidArg {
            what: format!("{what} must be positive, got {value}"),
        })
    }
}

/// Isolated batch reactor.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchParams {
    pub temperature: Temperature,
    pub pressure: Pressure,
    pub duration: Time,
    pub energy: EnergyEquation,
    pub kind: ReactorKind,
}

impl BatchParams {
    pub fn validate(&self) -> ReactorResult<()> {
        positive(self.temperature_k(), "batch temperature")?;
        positive(self.pressure_pa(), "batch pressure")?;
        positive(self.duration_s(), "batch duration")?;
        Ok(())
    }

    pub fn temperature_k(&self) -> f64 {
        self.temperature.get::<kelvin>()
    }

    pub fn pressure_pa(&self) -> f64 {
        self.pressure.get::<pascal>()
    }

    pub fn duration_s(&self) -> f64 {
        self.duration.get::<second>()
    }

    /// Output times `0, …, duration` [s].
    pub fn time_grid(&self) -> Vec<f64> {
        let tmax = self.duration_s();
        let last = (BATCH_TIME_POINTS - 1) as f64;
        (0..BATCH_TIME_POINTS)
            .map(|i| if i == BATCH_TIME_POINTS - 1 { tmax } else { tmax * i as f64 / last })
            .collect()
    }
}

/// Entrained-flow reactor approximated by a chain of stirred stages.
#[derive(Debug, Clone, PartialEq)]
pub struct EfrParams {
    pub pipe_diameter: Length,
    pub pipe_length: Length,
    pub temperature: Temperature,
    pub gauge_pressure: Pressure,
    pub atmospheric_pressure: Pressure,
    pub biomass_flow: MassRate,
    pub carrier_flow: MassRate,
    pub n_stages: usize,
    pub energy: EnergyEquation,
}

impl EfrParams {
    pub fn validate(&self) -> ReactorResult<()> {
        positive(self.pipe_diameter.get::<meter>(), "pipe diameter")?;
        positive(self.pipe_length.get::<meter>(), "pipe length")?;
        positive(self.temperature_k(), "reactor temperature")?;
        positive(self.absolute_pressure_pa(), "absolute pressure")?;
        positive(self.biomass_flow_kgps(), "biomass mass flow")?;
        let carrier = self.carrier_flow_kgps();
        if !(carrier.is_finite() && carrier >= 0.0) {
            return Err(ReactorError::InvalidArg {
                what: format!("carrier mass flow must be non-negative, got {carrier}"),
            });
        }
        if self.n_stages == 0 {
            return Err(ReactorError::InvalidArg {
                what: "stage count must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    pub fn temperature_k(&self) -> f64 {
        self.temperature.get::<kelvin>()
    }

    /// Gauge plus atmospheric pressure [Pa].
    pub fn absolute_pressure_pa(&self) -> f64 {
        self.gauge_pressure.get::<pascal>() + self.atmospheric_pressure.get::<pascal>()
    }

    pub fn biomass_flow_kgps(&self) -> f64 {
        self.biomass_flow.get::<kilogram_per_second>()
    }

    pub fn carrier_flow_kgps(&self) -> f64 {
        self.carrier_flow.get::<kilogram_per_second>()
    }

    pub fn total_flow_kgps(&self) -> f64 {
        self.biomass_flow_kgps() + self.carrier_flow_kgps()
    }

    /// Carrier-gas mass fraction of the feed, `ṁ_N2 / (ṁ_N2 + ṁ_bio)`.
    pub fn carrier_fraction(&self) -> f64 {
        self.carrier_flow_kgps() / self.total_flow_kgps()
    }

    /// Pipe cross-section `π·d²/4` [m²].
    pub fn cross_section_m2(&self) -> f64 {
        let d = self.pipe_diameter.get::<meter>();
        std::f64::consts::PI * d * d / 4.0
    }

    /// Axial length of one stage [m].
    pub fn stage_length_m(&self) -> f64 {
        self.pipe_length.get::<meter>() / self.n_stages as f64
    }

    pub fn stage_volume_m3(&self) -> f64 {
        self.cross_section_m2() * self.stage_length_m()
    }

    /// Axial position of each recorded state, inlet first [m].
    pub fn positions_m(&self) -> Vec<f64> {
        let dz = self.stage_length_m();
        (0..=self.n_stages).map(|k| k as f64 * dz).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use efr_core::units::{k, kgph, m, pa, s};

    fn efr() -> EfrParams {
        EfrParams {
            pipe_diameter: m(0.0254 * 2.0),
            pipe_length: m(1.0),
            temperature: k(773.15),
            gauge_pressure: pa(18_618.0),
            atmospheric_pressure: pa(81_343.0),
            biomass_flow: kgph(2.0),
            carrier_flow: kgph(0.5),
            n_stages: 20,
            energy: EnergyEquation::Off,
        }
    }

    #[test]
    fn batch_grid_is_inclusive() {
        let p = BatchParams {
            temperature: k(773.15),
            pressure: pa(101_325.0),
            duration: s(10.0),
            energy: EnergyEquation::Off,
            kind: ReactorKind::ConstantVolume,
        };
        p.validate().unwrap();
        let grid = p.time_grid();
        assert_eq!(grid.len(), 100);
        assert_eq!(grid[0], 0.0);
        assert_eq!(grid[99], 10.0);
        assert!(grid.windows(2).all(|w| w[1] > w[0]));
        assert!((grid[1] - 10.0 / 99.0).abs() < 1e-15);
    }

    #[test]
    fn efr_geometry_and_flows() {
        let p = efr();
        p.validate().unwrap();
        assert!((p.carrier_fraction() - 0.2).abs() < 1e-12);
        assert!((p.absolute_pressure_pa() - 99_961.0).abs() < 1e-9);
        let area = std::f64::consts::PI * 0.0508 * 0.0508 / 4.0;
        assert!((p.stage_volume_m3() - area * 0.05).abs() < 1e-15);
        let z = p.positions_m();
        assert_eq!(z.len(), 21);
        assert!((z[20] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn efr_rejects_bad_inputs() {
        let mut p = efr();
        p.n_stages = 0;
        assert!(p.validate().is_err());

        let mut p = efr();
        p.biomass_flow = kgph(0.0);
        assert!(p.validate().is_err());
    }
}
