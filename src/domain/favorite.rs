use {
    super::Asset,
    serde::{Deserialize, Serialize},
};

/// The slice of an [`Asset`] a favorite keeps, so it stays meaningful
/// even if a later fetch no longer returns that asset.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct FavoriteRef {
    pub id: String,
    pub symbol: String,
    pub name: String,
}

impl From<&Asset> for FavoriteRef {
    fn from(a: &Asset) -> Self {
        Self {
            id: a.id.clone(),
            symbol: a.symbol.to_uppercase(),
            name: a.name.clone(),
        }
    }
}

impl std::fmt::Display for FavoriteRef {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.symbol)
    }
}
