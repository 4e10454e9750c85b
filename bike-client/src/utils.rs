use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Token amount that crosses the JSON boundary as a base-10 string.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct U128(pub u128);

impl From<u128> for U128 {
    fn from(v: u128) -> Self {
        Self(v)
    }
}

impl From<U128> for u128 {
    fn from(v: U128) -> u128 {
        v.0
    }
}

impl PartialEq<u128> for U128 {
    fn eq(&self, other: &u128) -> bool {
        &self.0 == other
    }
}

impl Serialize for U128 {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for U128 {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s: String = Deserialize::deserialize(deserializer)?;
        s.parse::<u128>()
            .map(Self)
            .map_err(|err| serde::de::Error::custom(err.to_string()))
    }
}
