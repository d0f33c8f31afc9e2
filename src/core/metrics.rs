/// Body metric derivation: race ranges, class and gender offsets, BMI clamp.

use rand::Rng;

use crate::schema::character::BodyMetrics;
use crate::schema::entity::{BodyModifier, BodyRange};
use crate::schema::gender::Gender;

pub const BMI_MIN: f64 = 16.0;
pub const BMI_MAX: f64 = 28.0;

/// Offsets for a gender, zero when the tables define none for its label.
pub fn gender_modifier(gender: &Gender) -> BodyModifier {
    match gender.modifier {
        Some(modifier) => modifier,
        None => {
            tracing::warn!("no body modifiers for gender '{}', using zero offset", gender.label);
            BodyModifier::ZERO
        }
    }
}

/// Draw a height and weight.
///
/// Both race ranges are shifted by the summed class and gender offsets,
/// sampled independently, and the weight is then pulled back into the
/// plausible BMI band once.
pub fn derive_body<R: Rng + ?Sized>(
    (height_range, weight_range): (BodyRange, BodyRange),
    class_modifier: BodyModifier,
    gender_modifier: BodyModifier,
    rng: &mut R,
) -> BodyMetrics {
    let offset = class_modifier + gender_modifier;
    let height_cm = sample(height_range.shifted(offset.height), rng).max(1);
    let weight_kg = sample(weight_range.shifted(offset.weight), rng);

    BodyMetrics {
        height_cm,
        weight_kg: clamp_bmi(height_cm, weight_kg),
    }
}

/// Weight adjusted so that BMI lies within [`BMI_MIN`, `BMI_MAX`].
///
/// Heavy bodies are rounded down onto the upper bound and light bodies up
/// onto the lower bound, so the result always satisfies both.
pub fn clamp_bmi(height_cm: i32, weight_kg: i32) -> i32 {
    let meters = f64::from(height_cm) / 100.0;
    let area = meters * meters;
    let bmi = f64::from(weight_kg) / area;

    if bmi > BMI_MAX {
        (BMI_MAX * area).floor() as i32
    } else if bmi < BMI_MIN {
        (BMI_MIN * area).ceil() as i32
    } else {
        weight_kg
    }
}

fn sample<R: Rng + ?Sized>(range: BodyRange, rng: &mut R) -> i32 {
    let (low, high) = if range.min <= range.max {
        (range.min, range.max)
    } else {
        (range.max, range.min)
    };
    rng.gen_range(low..=high)
}
