//! Collect normalized stations into one table per variable.
use crate::{
    error::Result,
    keys::Variable,
    normalize::{MabAxis, NormalizedCast},
    table::{StationTable, StationTableBuilder},
};
use metfor::Quantity;
use strum::IntoEnumIterator;

/// The station tables of a transect, all sharing the same rows and columns.
#[derive(Debug, Clone)]
pub struct Transect {
    dissipation: StationTable,
    buoyancy_frequency: StationTable,
    thorpe_length: StationTable,
    temperature: StationTable,
    neutral_density: StationTable,
}

impl Transect {
    /// Get the table for a variable.
    pub fn table(&self, var: Variable) -> &StationTable {
        match var {
            Variable::Dissipation => &self.dissipation,
            Variable::BuoyancyFrequency => &self.buoyancy_frequency,
            Variable::ThorpeLength => &self.thorpe_length,
            Variable::Temperature => &self.temperature,
            Variable::NeutralDensity => &self.neutral_density,
        }
    }

    /// Get a mutable reference to the table for a variable.
    pub fn table_mut(&mut self, var: Variable) -> &mut StationTable {
        match var {
            Variable::Dissipation => &mut self.dissipation,
            Variable::BuoyancyFrequency => &mut self.buoyancy_frequency,
            Variable::ThorpeLength => &mut self.thorpe_length,
            Variable::Temperature => &mut self.temperature,
            Variable::NeutralDensity => &mut self.neutral_density,
        }
    }

    /// Longitudes of the stations, ascending.
    pub fn longitudes(&self) -> &[f64] {
        self.dissipation.longitudes()
    }

    /// Number of stations in the transect.
    pub fn n_stations(&self) -> usize {
        self.dissipation.n_cols()
    }
}

/// Builds a `Transect` one station at a time.
#[derive(Debug, Clone)]
pub struct TransectBuilder {
    dissipation: StationTableBuilder,
    buoyancy_frequency: StationTableBuilder,
    thorpe_length: StationTableBuilder,
    temperature: StationTableBuilder,
    neutral_density: StationTableBuilder,
}

impl TransectBuilder {
    /// Start an empty transect on the given axis.
    pub fn new(axis: &MabAxis) -> Self {
        let mab: Vec<f64> = axis.values().iter().map(|h| h.unpack()).collect();

        TransectBuilder {
            dissipation: StationTableBuilder::new(mab.clone()),
            buoyancy_frequency: StationTableBuilder::new(mab.clone()),
            thorpe_length: StationTableBuilder::new(mab.clone()),
            temperature: StationTableBuilder::new(mab.clone()),
            neutral_density: StationTableBuilder::new(mab),
        }
    }

    fn builder_mut(&mut self, var: Variable) -> &mut StationTableBuilder {
        match var {
            Variable::Dissipation => &mut self.dissipation,
            Variable::BuoyancyFrequency => &mut self.buoyancy_frequency,
            Variable::ThorpeLength => &mut self.thorpe_length,
            Variable::Temperature => &mut self.temperature,
            Variable::NeutralDensity => &mut self.neutral_density,
        }
    }

    /// Add a station to every table. A station at a longitude already present replaces the
    /// earlier one.
    pub fn push(&mut self, station: &NormalizedCast) -> Result<()> {
        for var in Variable::iter() {
            self.builder_mut(var)
                .insert(station.longitude, station.column(var).to_vec())?;
        }
        Ok(())
    }

    /// Sort every table by longitude.
    pub fn build(self) -> Transect {
        Transect {
            dissipation: self.dissipation.build(),
            buoyancy_frequency: self.buoyancy_frequency.build(),
            thorpe_length: self.thorpe_length.build(),
            temperature: self.temperature.build(),
            neutral_density: self.neutral_density.build(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use optional::{none, some, Optioned};

    fn make_station(id: &str, lon: f64, eps: f64) -> NormalizedCast {
        let col = |v: f64| -> Vec<Optioned<f64>> { vec![some(v), some(v), none()] };
        NormalizedCast {
            id: id.to_owned(),
            longitude: lon,
            thorpe_length: col(1.0),
            buoyancy_frequency: col(1.0e-3),
            dissipation: col(eps),
            temperature: col(-0.5),
            neutral_density: col(28.3),
        }
    }

    #[test]
    fn test_tables_share_columns() {
        let mut builder = TransectBuilder::new(&MabAxis::new(3));
        builder.push(&make_station("a", -48.0, 1.0e-9)).unwrap();
        builder.push(&make_station("b", -52.0, 2.0e-9)).unwrap();
        builder.push(&make_station("c", -50.0, 3.0e-9)).unwrap();
        let transect = builder.build();

        assert_eq!(transect.longitudes(), &[-52.0, -50.0, -48.0]);
        assert_eq!(transect.n_stations(), 3);
        for var in Variable::iter() {
            let table = transect.table(var);
            assert!(table.ensure_aligned(transect.table(Variable::Dissipation)).is_ok());
            assert_eq!(table.n_rows(), 3);
        }

        let eps = transect.table(Variable::Dissipation);
        assert_eq!(eps.get(0, 0).unwrap(), 2.0e-9);
        assert_eq!(eps.get(0, 2).unwrap(), 1.0e-9);
        assert_eq!(transect.table(Variable::Temperature).get(1, 1).unwrap(), -0.5);
    }

    #[test]
    fn test_push_wrong_axis() {
        let mut builder = TransectBuilder::new(&MabAxis::new(4));
        assert!(builder.push(&make_station("a", -48.0, 1.0e-9)).is_err());
    }
}
