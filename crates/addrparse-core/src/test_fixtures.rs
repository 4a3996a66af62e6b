//! Small reference data set shared by unit tests.

use crate::reference::{ReferenceData, ReferenceDataBuilder};

pub(crate) fn builder() -> ReferenceDataBuilder {
    let mut builder = ReferenceData::builder();
    builder
        .add_state("CA", "California", ["Calif.", "Cal"])
        .add_state("WV", "West Virginia", ["W. Va."])
        .add_state("WI", "Wisconsin", ["Wis.", "Wisc."])
        .add_state("MO", "Missouri", ["Mo."])
        .add_location("94401", "San Mateo", "CA")
        .add_location("94103", "San Francisco", "CA")
        .add_location("94010", "Burlingame", "CA")
        .add_location("93277", "Visalia", "CA")
        .add_location("54301", "Green Bay", "WI")
        .add_location("63101", "Saint Louis", "MO")
        .add_location("25301", "Charleston", "WV");
    builder
}

pub(crate) fn fixture() -> ReferenceData {
    builder().build().expect("fixture reference data is valid")
}
