//! Column schema of the needle output files
//!
//! The simulator writes every needle table with the same fixed column order.
//! `Field` names each position so that plotting code never indexes by number.

/// One column of a needle table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Iteration,
    TimeRsVs,
    TimeSi,
    Needle,
    Delta,
    DeltaS,
    Omega,
    OmegaAlt,
    LengthRs,
    LengthSi,
    VelocityVs,
    VelocitySi,
    RadiusRs,
    RadiusSi,
    Peclet,
    PecletIv,
    XTip,
    YTip,
    Rx,
    Ry,
    R,
    Theta,
    Dl0,
    Dl1,
    XOffset,
    YOffset,
    ActiveNeedles,
    NeedleSize,
    ComputationTime,
    MaxFluidVelocity,
    Order,
    XTipMax,
    YTipMax,
    XTipPb,
    YTipPb,
    DirectionX,
    DirectionY,
    DeltaInd,
    OmegaInd,
}

impl Field {
    /// Every field in file order; `Field::ALL[i].index() == i`
    pub const ALL: [Field; 39] = [
        Field::Iteration,
        Field::TimeRsVs,
        Field::TimeSi,
        Field::Needle,
        Field::Delta,
        Field::DeltaS,
        Field::Omega,
        Field::OmegaAlt,
        Field::LengthRs,
        Field::LengthSi,
        Field::VelocityVs,
        Field::VelocitySi,
        Field::RadiusRs,
        Field::RadiusSi,
        Field::Peclet,
        Field::PecletIv,
        Field::XTip,
        Field::YTip,
        Field::Rx,
        Field::Ry,
        Field::R,
        Field::Theta,
        Field::Dl0,
        Field::Dl1,
        Field::XOffset,
        Field::YOffset,
        Field::ActiveNeedles,
        Field::NeedleSize,
        Field::ComputationTime,
        Field::MaxFluidVelocity,
        Field::Order,
        Field::XTipMax,
        Field::YTipMax,
        Field::XTipPb,
        Field::YTipPb,
        Field::DirectionX,
        Field::DirectionY,
        Field::DeltaInd,
        Field::OmegaInd,
    ];

    /// Zero-based column position in the file
    pub fn index(self) -> usize {
        self as usize
    }

    /// Field at a column position, if the position is part of the schema
    pub fn from_index(index: usize) -> Option<Field> {
        Self::ALL.get(index).copied()
    }

    /// Column name used in the in-memory DataFrame
    pub fn key(self) -> &'static str {
        match self {
            Field::Iteration => "iteration",
            Field::TimeRsVs => "time_rsvs",
            Field::TimeSi => "time_s",
            Field::Needle => "needle",
            Field::Delta => "delta",
            Field::DeltaS => "delta_s",
            Field::Omega => "omega",
            Field::OmegaAlt => "omega_alt",
            Field::LengthRs => "length_rs",
            Field::LengthSi => "length_si",
            Field::VelocityVs => "velocity_vs",
            Field::VelocitySi => "velocity_si",
            Field::RadiusRs => "radius_rs",
            Field::RadiusSi => "radius_si",
            Field::Peclet => "peclet",
            Field::PecletIv => "peclet_iv",
            Field::XTip => "x_tip",
            Field::YTip => "y_tip",
            Field::Rx => "rx",
            Field::Ry => "ry",
            Field::R => "r",
            Field::Theta => "theta",
            Field::Dl0 => "dl0",
            Field::Dl1 => "dl1",
            Field::XOffset => "x_offset",
            Field::YOffset => "y_offset",
            Field::ActiveNeedles => "active_needles",
            Field::NeedleSize => "needle_size",
            Field::ComputationTime => "computation_time",
            Field::MaxFluidVelocity => "max_fluid_velocity",
            Field::Order => "order",
            Field::XTipMax => "x_tip_max",
            Field::YTipMax => "y_tip_max",
            Field::XTipPb => "x_tip_pb",
            Field::YTipPb => "y_tip_pb",
            Field::DirectionX => "direction_x",
            Field::DirectionY => "direction_y",
            Field::DeltaInd => "delta_ind",
            Field::OmegaInd => "omega_ind",
        }
    }

    /// Axis label, written with Unicode math symbols
    pub fn label(self) -> &'static str {
        match self {
            Field::Iteration => "Iteration",
            Field::TimeRsVs => "Time  t·V_S / R_S",
            Field::TimeSi => "Time  t / s",
            Field::Needle => "Needle",
            Field::Delta => "Undercooling  Δ",
            Field::DeltaS => "Undercooling  ΔS",
            Field::Omega | Field::OmegaAlt => "Supersaturation  Ω",
            Field::LengthRs => "Length  L / R_S",
            Field::LengthSi => "Length",
            Field::VelocityVs => "Velocity  V / V_S",
            Field::VelocitySi => "Velocity  V",
            Field::RadiusRs => "Radius  R / R_S",
            Field::RadiusSi => "Radius",
            Field::Peclet => "Péclet  Pe",
            Field::PecletIv => "Péclet Iv.",
            Field::XTip => "X_tip  V / V_S",
            Field::YTip => "Y_tip",
            Field::Rx => "r_x",
            Field::Ry => "r_y",
            Field::R => "r",
            Field::Theta => "Theta  θ / rad",
            Field::Dl0 => "dl[0]",
            Field::Dl1 => "dl[1]",
            Field::XOffset => "X-offset",
            Field::YOffset => "Y-offset",
            Field::ActiveNeedles => "Num. Needles",
            Field::NeedleSize => "Needles' size",
            Field::ComputationTime => "Computation  t / s",
            Field::MaxFluidVelocity => "max. fluid vel. comp.",
            Field::Order => "Order",
            Field::XTipMax => "X_tip_max",
            Field::YTipMax => "Y_tip_max",
            Field::XTipPb => "X_tip_PB",
            Field::YTipPb => "Y_tip_PB",
            Field::DirectionX => "Dir. X  V / V_S",
            Field::DirectionY => "Dir. Y  V / V_S",
            Field::DeltaInd => "Undercooling ind.",
            Field::OmegaInd => "Oversaturation ind.",
        }
    }
}

/// Column name for a position, including positions past the schema
pub fn column_key(index: usize) -> String {
    match Field::from_index(index) {
        Some(field) => field.key().to_string(),
        None => format!("col_{}", index),
    }
}

/// Which column set the time-dependent panels read from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnitMode {
    /// Scaled by the selected tip radius R_S and velocity V_S
    Normalized,
    /// Physical units
    #[default]
    Physical,
}

impl UnitMode {
    /// Parse from string value
    ///
    /// Validation happens in PropertyReader::get_enum()
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "normalized" => Self::Normalized,
            _ => Self::Physical,
        }
    }

    pub fn time(self) -> Field {
        match self {
            Self::Normalized => Field::TimeRsVs,
            Self::Physical => Field::TimeSi,
        }
    }

    pub fn length(self) -> Field {
        match self {
            Self::Normalized => Field::LengthRs,
            Self::Physical => Field::LengthSi,
        }
    }

    pub fn velocity(self) -> Field {
        match self {
            Self::Normalized => Field::VelocityVs,
            Self::Physical => Field::VelocitySi,
        }
    }

    pub fn radius(self) -> Field {
        match self {
            Self::Normalized => Field::RadiusRs,
            Self::Physical => Field::RadiusSi,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indices_follow_file_order() {
        for (i, field) in Field::ALL.iter().enumerate() {
            assert_eq!(field.index(), i);
            assert_eq!(Field::from_index(i), Some(*field));
        }
        assert_eq!(Field::from_index(39), None);
    }

    #[test]
    fn test_documented_positions() {
        assert_eq!(Field::TimeRsVs.index(), 1);
        assert_eq!(Field::TimeSi.index(), 2);
        assert_eq!(Field::Delta.index(), 4);
        assert_eq!(Field::LengthRs.index(), 8);
        assert_eq!(Field::LengthSi.index(), 9);
        assert_eq!(Field::VelocityVs.index(), 10);
        assert_eq!(Field::VelocitySi.index(), 11);
        assert_eq!(Field::RadiusRs.index(), 12);
        assert_eq!(Field::RadiusSi.index(), 13);
        assert_eq!(Field::Peclet.index(), 14);
        assert_eq!(Field::XTip.index(), 16);
        assert_eq!(Field::YTip.index(), 17);
        assert_eq!(Field::ActiveNeedles.index(), 26);
        assert_eq!(Field::NeedleSize.index(), 27);
        assert_eq!(Field::ComputationTime.index(), 28);
        assert_eq!(Field::OmegaInd.index(), 38);
    }

    #[test]
    fn test_keys_are_unique() {
        let mut keys: Vec<&str> = Field::ALL.iter().map(|f| f.key()).collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), Field::ALL.len());
    }

    #[test]
    fn test_column_key_past_schema() {
        assert_eq!(column_key(17), "y_tip");
        assert_eq!(column_key(42), "col_42");
    }

    #[test]
    fn test_unit_mode_columns() {
        let normalized = UnitMode::parse("normalized");
        assert_eq!(normalized.time(), Field::TimeRsVs);
        assert_eq!(normalized.velocity(), Field::VelocityVs);

        let physical = UnitMode::parse("PHYSICAL");
        assert_eq!(physical, UnitMode::Physical);
        assert_eq!(physical.length(), Field::LengthSi);
        assert_eq!(physical.radius(), Field::RadiusSi);

        assert_eq!(UnitMode::parse("other"), UnitMode::Physical);
    }
}
