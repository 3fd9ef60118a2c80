//! Unit tables and type aliases for the supported quantities
//!
//! Every table lists its SI unit first. Absolute quantities (position,
//! time, absolute temperature) pair each unit with the relative unit of the
//! same scale factor; the offset only applies to absolute values.

use crate::define_units;
use crate::unit::AbsoluteUnit;
use crate::value::{Absolute, Matrix, MutableMatrix, MutableVector, Relative, Scalar, Vector};

// ============================================================================
// Unit tables
// ============================================================================

define_units! {
    /// Units of dimensionless ratios
    pub enum DimensionlessUnit: "Dimensionless", si = Si {
        Si => ("", "unit", 1.0, 0.0),
    }
}

define_units! {
    /// Units of length (distances)
    pub enum LengthUnit: "Length", si = Meter {
        Meter => ("m", "meter", 1.0, 0.0),
        Kilometer => ("km", "kilometer", 1000.0, 0.0),
        Centimeter => ("cm", "centimeter", 0.01, 0.0),
        Millimeter => ("mm", "millimeter", 0.001, 0.0),
        Inch => ("in", "inch", 0.0254, 0.0),
        Foot => ("ft", "foot", 0.3048, 0.0),
        Yard => ("yd", "yard", 0.9144, 0.0),
        Mile => ("mi", "mile", 1609.344, 0.0),
        NauticalMile => ("NM", "nautical mile", 1852.0, 0.0),
    }
}

define_units! {
    /// Units of position (locations relative to a common origin)
    pub enum PositionUnit: "Position", si = Meter {
        Meter => ("m", "meter", 1.0, 0.0),
        Kilometer => ("km", "kilometer", 1000.0, 0.0),
        Centimeter => ("cm", "centimeter", 0.01, 0.0),
        Millimeter => ("mm", "millimeter", 0.001, 0.0),
        Inch => ("in", "inch", 0.0254, 0.0),
        Foot => ("ft", "foot", 0.3048, 0.0),
        Yard => ("yd", "yard", 0.9144, 0.0),
        Mile => ("mi", "mile", 1609.344, 0.0),
        NauticalMile => ("NM", "nautical mile", 1852.0, 0.0),
    }
}

define_units! {
    /// Units of duration (time spans)
    pub enum DurationUnit: "Duration", si = Second {
        Second => ("s", "second", 1.0, 0.0),
        Millisecond => ("ms", "millisecond", 0.001, 0.0),
        Minute => ("min", "minute", 60.0, 0.0),
        Hour => ("h", "hour", 3600.0, 0.0),
        Day => ("day", "day", 86_400.0, 0.0),
        Week => ("wk", "week", 604_800.0, 0.0),
    }
}

define_units! {
    /// Units of time (instants since the base epoch)
    pub enum TimeUnit: "Time", si = BaseSecond {
        BaseSecond => ("s", "second", 1.0, 0.0),
        BaseMillisecond => ("ms", "millisecond", 0.001, 0.0),
        BaseMinute => ("min", "minute", 60.0, 0.0),
        BaseHour => ("h", "hour", 3600.0, 0.0),
        BaseDay => ("day", "day", 86_400.0, 0.0),
        BaseWeek => ("wk", "week", 604_800.0, 0.0),
    }
}

define_units! {
    /// Units of mass
    pub enum MassUnit: "Mass", si = Kilogram {
        Kilogram => ("kg", "kilogram", 1.0, 0.0),
        Gram => ("g", "gram", 0.001, 0.0),
        Milligram => ("mg", "milligram", 1.0e-6, 0.0),
        Tonne => ("t", "tonne", 1000.0, 0.0),
        Pound => ("lb", "pound", 0.453_592_37, 0.0),
        Ounce => ("oz", "ounce", 0.028_349_523_125, 0.0),
    }
}

define_units! {
    /// Units of energy
    pub enum EnergyUnit: "Energy", si = Joule {
        Joule => ("J", "joule", 1.0, 0.0),
        Kilojoule => ("kJ", "kilojoule", 1.0e3, 0.0),
        Megajoule => ("MJ", "megajoule", 1.0e6, 0.0),
        WattHour => ("Wh", "watt hour", 3600.0, 0.0),
        KilowattHour => ("kWh", "kilowatt hour", 3.6e6, 0.0),
        Calorie => ("cal", "calorie (IT)", 4.1868, 0.0),
        ElectronVolt => ("eV", "electronvolt", 1.602_176_634e-19, 0.0),
    }
}

define_units! {
    /// Units of speed
    pub enum SpeedUnit: "Speed", si = MeterPerSecond {
        MeterPerSecond => ("m/s", "meter per second", 1.0, 0.0),
        KilometerPerHour => ("km/h", "kilometer per hour", 1.0 / 3.6, 0.0),
        MilePerHour => ("mi/h", "mile per hour", 0.44704, 0.0),
        FootPerSecond => ("ft/s", "foot per second", 0.3048, 0.0),
        Knot => ("kt", "knot", 1852.0 / 3600.0, 0.0),
    }
}

define_units! {
    /// Units of temperature differences
    pub enum TemperatureUnit: "Temperature", si = Kelvin {
        Kelvin => ("K", "kelvin", 1.0, 0.0),
        DegreeCelsius => ("°C", "degree Celsius", 1.0, 0.0),
        DegreeFahrenheit => ("°F", "degree Fahrenheit", 5.0 / 9.0, 0.0),
        DegreeRankine => ("°R", "degree Rankine", 5.0 / 9.0, 0.0),
    }
}

define_units! {
    /// Units of absolute temperature
    pub enum AbsoluteTemperatureUnit: "AbsoluteTemperature", si = Kelvin {
        Kelvin => ("K", "kelvin", 1.0, 0.0),
        DegreeCelsius => ("°C", "degree Celsius", 1.0, 273.15),
        DegreeFahrenheit => ("°F", "degree Fahrenheit", 5.0 / 9.0, 459.67 * 5.0 / 9.0),
        DegreeRankine => ("°R", "degree Rankine", 5.0 / 9.0, 0.0),
    }
}

// ============================================================================
// Absolute to relative unit pairs
// ============================================================================

impl AbsoluteUnit for PositionUnit {
    type Relative = LengthUnit;

    fn relative(self) -> LengthUnit {
        match self {
            PositionUnit::Meter => LengthUnit::Meter,
            PositionUnit::Kilometer => LengthUnit::Kilometer,
            PositionUnit::Centimeter => LengthUnit::Centimeter,
            PositionUnit::Millimeter => LengthUnit::Millimeter,
            PositionUnit::Inch => LengthUnit::Inch,
            PositionUnit::Foot => LengthUnit::Foot,
            PositionUnit::Yard => LengthUnit::Yard,
            PositionUnit::Mile => LengthUnit::Mile,
            PositionUnit::NauticalMile => LengthUnit::NauticalMile,
        }
    }
}

impl AbsoluteUnit for TimeUnit {
    type Relative = DurationUnit;

    fn relative(self) -> DurationUnit {
        match self {
            TimeUnit::BaseSecond => DurationUnit::Second,
            TimeUnit::BaseMillisecond => DurationUnit::Millisecond,
            TimeUnit::BaseMinute => DurationUnit::Minute,
            TimeUnit::BaseHour => DurationUnit::Hour,
            TimeUnit::BaseDay => DurationUnit::Day,
            TimeUnit::BaseWeek => DurationUnit::Week,
        }
    }
}

impl AbsoluteUnit for AbsoluteTemperatureUnit {
    type Relative = TemperatureUnit;

    fn relative(self) -> TemperatureUnit {
        match self {
            AbsoluteTemperatureUnit::Kelvin => TemperatureUnit::Kelvin,
            AbsoluteTemperatureUnit::DegreeCelsius => TemperatureUnit::DegreeCelsius,
            AbsoluteTemperatureUnit::DegreeFahrenheit => TemperatureUnit::DegreeFahrenheit,
            AbsoluteTemperatureUnit::DegreeRankine => TemperatureUnit::DegreeRankine,
        }
    }
}

// ============================================================================
// Type aliases
// ============================================================================

macro_rules! quantity_aliases {
    (
        $kind:ident $unit:ident:
        $scalar:ident, $float_scalar:ident,
        $vector:ident, $float_vector:ident, $mutable_vector:ident,
        $matrix:ident, $float_matrix:ident, $mutable_matrix:ident
    ) => {
        #[doc = concat!("Scalar in [`", stringify!($unit), "`]")]
        pub type $scalar = Scalar<$unit, $kind, f64>;
        #[doc = concat!("Single precision scalar in [`", stringify!($unit), "`]")]
        pub type $float_scalar = Scalar<$unit, $kind, f32>;
        #[doc = concat!("Vector in [`", stringify!($unit), "`]")]
        pub type $vector = Vector<$unit, $kind, f64>;
        #[doc = concat!("Single precision vector in [`", stringify!($unit), "`]")]
        pub type $float_vector = Vector<$unit, $kind, f32>;
        #[doc = concat!("Mutable vector in [`", stringify!($unit), "`]")]
        pub type $mutable_vector = MutableVector<$unit, $kind, f64>;
        #[doc = concat!("Matrix in [`", stringify!($unit), "`]")]
        pub type $matrix = Matrix<$unit, $kind, f64>;
        #[doc = concat!("Single precision matrix in [`", stringify!($unit), "`]")]
        pub type $float_matrix = Matrix<$unit, $kind, f32>;
        #[doc = concat!("Mutable matrix in [`", stringify!($unit), "`]")]
        pub type $mutable_matrix = MutableMatrix<$unit, $kind, f64>;
    };
}

quantity_aliases!(Relative DimensionlessUnit:
    Dimensionless, FloatDimensionless,
    DimensionlessVector, FloatDimensionlessVector, MutableDimensionlessVector,
    DimensionlessMatrix, FloatDimensionlessMatrix, MutableDimensionlessMatrix);

quantity_aliases!(Relative LengthUnit:
    Length, FloatLength,
    LengthVector, FloatLengthVector, MutableLengthVector,
    LengthMatrix, FloatLengthMatrix, MutableLengthMatrix);

quantity_aliases!(Absolute PositionUnit:
    Position, FloatPosition,
    PositionVector, FloatPositionVector, MutablePositionVector,
    PositionMatrix, FloatPositionMatrix, MutablePositionMatrix);

quantity_aliases!(Relative DurationUnit:
    Duration, FloatDuration,
    DurationVector, FloatDurationVector, MutableDurationVector,
    DurationMatrix, FloatDurationMatrix, MutableDurationMatrix);

quantity_aliases!(Absolute TimeUnit:
    Time, FloatTime,
    TimeVector, FloatTimeVector, MutableTimeVector,
    TimeMatrix, FloatTimeMatrix, MutableTimeMatrix);

quantity_aliases!(Relative MassUnit:
    Mass, FloatMass,
    MassVector, FloatMassVector, MutableMassVector,
    MassMatrix, FloatMassMatrix, MutableMassMatrix);

quantity_aliases!(Relative EnergyUnit:
    Energy, FloatEnergy,
    EnergyVector, FloatEnergyVector, MutableEnergyVector,
    EnergyMatrix, FloatEnergyMatrix, MutableEnergyMatrix);

quantity_aliases!(Relative SpeedUnit:
    Speed, FloatSpeed,
    SpeedVector, FloatSpeedVector, MutableSpeedVector,
    SpeedMatrix, FloatSpeedMatrix, MutableSpeedMatrix);

quantity_aliases!(Relative TemperatureUnit:
    Temperature, FloatTemperature,
    TemperatureVector, FloatTemperatureVector, MutableTemperatureVector,
    TemperatureMatrix, FloatTemperatureMatrix, MutableTemperatureMatrix);

quantity_aliases!(Absolute AbsoluteTemperatureUnit:
    AbsoluteTemperature, FloatAbsoluteTemperature,
    AbsoluteTemperatureVector, FloatAbsoluteTemperatureVector, MutableAbsoluteTemperatureVector,
    AbsoluteTemperatureMatrix, FloatAbsoluteTemperatureMatrix, MutableAbsoluteTemperatureMatrix);
