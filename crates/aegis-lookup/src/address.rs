use aegis_core::GeoPoint;

/// Structured address components as returned by the gazetteer.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AddressFields {
    pub house_number: Option<String>,
    pub road:         Option<String>,
    pub city:         Option<String>,
    pub state:        Option<String>,
    pub country:      Option<String>,
    pub postcode:     Option<String>,
}

impl AddressFields {
    /// City, state, country and postcode, in that order, skipping blanks.
    pub fn region_components(&self) -> impl Iterator<Item = &str> {
        [&self.city, &self.state, &self.country, &self.postcode]
            .into_iter()
            .filter_map(|c| c.as_deref())
            .filter(|c| !c.is_empty())
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AddressCandidate {
    pub point: GeoPoint,
    pub display_name: String,
    pub address: AddressFields,
}

impl AddressCandidate {
    pub fn new(point: GeoPoint, display_name: impl Into<String>) -> Self {
        Self { point, display_name: display_name.into(), address: AddressFields::default() }
    }

    pub fn with_house_number(mut self, n: impl Into<String>) -> Self {
        self.address.house_number = Some(n.into());
        self
    }

    pub fn with_road(mut self, road: impl Into<String>) -> Self {
        self.address.road = Some(road.into());
        self
    }

    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.address.city = Some(city.into());
        self
    }

    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.address.state = Some(state.into());
        self
    }

    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.address.country = Some(country.into());
        self
    }

    pub fn with_postcode(mut self, postcode: impl Into<String>) -> Self {
        self.address.postcode = Some(postcode.into());
        self
    }
}
