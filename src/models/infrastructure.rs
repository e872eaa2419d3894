use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Road features flagged near an accident.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum InfrastructureFeature {
    Amenity,
    Bump,
    Crossing,
    #[serde(rename = "Give_Way")]
    GiveWay,
    Junction,
    #[serde(rename = "No_Exit")]
    NoExit,
    Railway,
    Roundabout,
    Station,
    Stop,
    #[serde(rename = "Traffic_Calming")]
    TrafficCalming,
    #[serde(rename = "Traffic_Signal")]
    TrafficSignal,
    #[serde(rename = "Turning_Loop")]
    TurningLoop,
}

impl InfrastructureFeature {
    pub const ALL: [InfrastructureFeature; 13] = [
        InfrastructureFeature::Amenity,
        InfrastructureFeature::Bump,
        InfrastructureFeature::Crossing,
        InfrastructureFeature::GiveWay,
        InfrastructureFeature::Junction,
        InfrastructureFeature::NoExit,
        InfrastructureFeature::Railway,
        InfrastructureFeature::Roundabout,
        InfrastructureFeature::Station,
        InfrastructureFeature::Stop,
        InfrastructureFeature::TrafficCalming,
        InfrastructureFeature::TrafficSignal,
        InfrastructureFeature::TurningLoop,
    ];

    /// Position in `ALL`, also the bit used by `InfrastructureFlags`.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn column_name(&self) -> &'static str {
        match self {
            InfrastructureFeature::Amenity => "Amenity",
            InfrastructureFeature::Bump => "Bump",
            InfrastructureFeature::Crossing => "Crossing",
            InfrastructureFeature::GiveWay => "Give_Way",
            InfrastructureFeature::Junction => "Junction",
            InfrastructureFeature::NoExit => "No_Exit",
            InfrastructureFeature::Railway => "Railway",
            InfrastructureFeature::Roundabout => "Roundabout",
            InfrastructureFeature::Station => "Station",
            InfrastructureFeature::Stop => "Stop",
            InfrastructureFeature::TrafficCalming => "Traffic_Calming",
            InfrastructureFeature::TrafficSignal => "Traffic_Signal",
            InfrastructureFeature::TurningLoop => "Turning_Loop",
        }
    }

    pub fn from_column_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.column_name() == name)
    }
}

impl fmt::Display for InfrastructureFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

/// Set of infrastructure features, one bit per feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct InfrastructureFlags(u16);

impl InfrastructureFlags {
    pub fn empty() -> Self {
        Self(0)
    }

    pub fn all() -> Self {
        Self((1 << InfrastructureFeature::ALL.len()) - 1)
    }

    pub fn with(mut self, feature: InfrastructureFeature) -> Self {
        self.set(feature, true);
        self
    }

    pub fn set(&mut self, feature: InfrastructureFeature, value: bool) {
        let bit = 1 << feature.index();
        if value {
            self.0 |= bit;
        } else {
            self.0 &= !bit;
        }
    }

    pub fn contains(&self, feature: InfrastructureFeature) -> bool {
        self.0 & (1 << feature.index()) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn iter(&self) -> impl Iterator<Item = InfrastructureFeature> + '_ {
        InfrastructureFeature::ALL
            .into_iter()
            .filter(move |f| self.contains(*f))
    }
}

impl FromIterator<InfrastructureFeature> for InfrastructureFlags {
    fn from_iter<I: IntoIterator<Item = InfrastructureFeature>>(iter: I) -> Self {
        iter.into_iter().fold(Self::empty(), Self::with)
    }
}

impl Serialize for InfrastructureFlags {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

/// Boolean coercion for flag columns. Anything unrecognised reads as false.
pub fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim(),
        "True" | "true" | "TRUE" | "1" | "1.0"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_names_round_trip() {
        for feature in InfrastructureFeature::ALL {
            assert_eq!(
                InfrastructureFeature::from_column_name(feature.column_name()),
                Some(feature)
            );
        }
        assert_eq!(InfrastructureFeature::from_column_name("Bridge"), None);
    }

    #[test]
    fn test_flags_set_and_clear() {
        let mut flags = InfrastructureFlags::empty()
            .with(InfrastructureFeature::Crossing)
            .with(InfrastructureFeature::TurningLoop);
        assert!(flags.contains(InfrastructureFeature::Crossing));
        assert!(flags.contains(InfrastructureFeature::TurningLoop));
        assert!(!flags.contains(InfrastructureFeature::Stop));
        assert_eq!(flags.len(), 2);

        flags.set(InfrastructureFeature::Crossing, false);
        assert_eq!(
            flags.iter().collect::<Vec<_>>(),
            vec![InfrastructureFeature::TurningLoop]
        );
        assert_eq!(InfrastructureFlags::all().len(), 13);
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("True"));
        assert!(parse_flag("1"));
        assert!(!parse_flag("False"));
        assert!(!parse_flag(""));
        assert!(!parse_flag("maybe"));
    }

    #[test]
    fn test_flags_serialize_as_names() {
        let flags = InfrastructureFlags::empty()
            .with(InfrastructureFeature::GiveWay)
            .with(InfrastructureFeature::Amenity);
        assert_eq!(
            serde_json::to_string(&flags).unwrap(),
            r#"["Amenity","Give_Way"]"#
        );
    }
}
