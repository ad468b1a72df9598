//! PX-Web dimension (variable) codes used by the tourism tables.

pub const PURPOSE: &str = "Matkan tarkoitus";
pub const SEASON: &str = "Kausi";
pub const AGE_GROUP: &str = "Ikäryhmä";
pub const GENDER: &str = "Sukupuoli";
pub const YEAR: &str = "Vuosi";
/// The indicator ("information") dimension.
pub const INDICATOR: &str = "Tiedot";
pub const ACCOMMODATION: &str = "Majoitus";
pub const DURATION: &str = "Matkan kesto";
pub const TRANSPORT: &str = "Kulkuväline";
pub const COUNTRY_OF_RESIDENCE: &str = "Matkustajan asuinmaa";
pub const DESTINATION_MUNICIPALITY: &str = "Matkan kohdekunta";
pub const DESTINATION_REGION: &str = "Matkan kohdemaakunta";
pub const PRODUCT: &str = "Tuotteet";
pub const PROVINCE: &str = "Maakunta";
pub const TOURISM_TYPE: &str = "Matkailutyyppi";

/// Code of the whole-country aggregate row.
pub const WHOLE_COUNTRY_CODE: &str = "SSS";

/// Location name that stands for the whole country.
pub const WHOLE_COUNTRY_NAME: &str = "Finland";
