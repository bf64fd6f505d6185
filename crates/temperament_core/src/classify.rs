//! Deterministic temperament scoring.
//!
//! Three independent votes over an [`AnswerSheet`]:
//! - positions 0..11: hot (`A`) vs cold (`B`), hot wins ties
//! - positions 11..22: humid (`A`) vs dry (`B`), humid wins ties
//! - positions 22..42: plurality over the twelve sub-temperament names,
//!   ties go to the earliest name in [`SubTemperament::DECLARATION_ORDER`]

use crate::answers::{Answer, AnswerSheet};
use crate::error::Result;
use crate::types::{Classification, SubTemperament, Temperament};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Temperature {
    Hot,
    Cold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Humidity {
    Humid,
    Dry,
}

/// `(A votes, B votes)` for one axis block.
fn tally_axis(block: &[Answer]) -> (usize, usize) {
    block.iter().fold((0, 0), |(a, b), answer| match answer {
        Answer::A => (a + 1, b),
        Answer::B => (a, b + 1),
        _ => (a, b),
    })
}

pub fn temperature(sheet: &AnswerSheet) -> Temperature {
    let (hot, cold) = tally_axis(sheet.temperature());
    if hot >= cold {
        Temperature::Hot
    } else {
        Temperature::Cold
    }
}

pub fn humidity(sheet: &AnswerSheet) -> Humidity {
    let (humid, dry) = tally_axis(sheet.humidity());
    if humid >= dry {
        Humidity::Humid
    } else {
        Humidity::Dry
    }
}

pub fn temperament_for(temperature: Temperature, humidity: Humidity) -> Temperament {
    match (temperature, humidity) {
        (Temperature::Hot, Humidity::Humid) => Temperament::Sanguine,
        (Temperature::Hot, Humidity::Dry) => Temperament::Choleric,
        (Temperature::Cold, Humidity::Dry) => Temperament::Melancholic,
        (Temperature::Cold, Humidity::Humid) => Temperament::Phlegmatic,
    }
}

/// Vote counts indexed by declaration order.
pub fn subtemperament_tally(sheet: &AnswerSheet) -> [usize; 12] {
    let mut counts = [0usize; 12];
    for answer in sheet.subtemperament() {
        if let Answer::Sub(sub) = answer {
            counts[sub.ordinal()] += 1;
        }
    }
    counts
}

pub fn subtemperament(sheet: &AnswerSheet) -> SubTemperament {
    let counts = subtemperament_tally(sheet);
    let mut winner = SubTemperament::DECLARATION_ORDER[0];
    let mut best = counts[0];
    for (sub, &count) in SubTemperament::DECLARATION_ORDER.iter().zip(&counts).skip(1) {
        // Strictly greater: an equal count never displaces an earlier name.
        if count > best {
            winner = *sub;
            best = count;
        }
    }
    winner
}

pub fn classify(sheet: &AnswerSheet) -> Classification {
    Classification {
        temperament: temperament_for(temperature(sheet), humidity(sheet)),
        subtemperament: subtemperament(sheet),
    }
}

/// Parses and classifies raw tokens. Fails with `InvalidInput` unless there
/// are exactly 42 of them.
pub fn classify_tokens<S: AsRef<str>>(tokens: &[S]) -> Result<Classification> {
    let sheet = AnswerSheet::parse(tokens)?;
    Ok(classify(&sheet))
}
