//! Reference attribute list for bird identification.
//!
//! The identification feature this crate was built for asks people to
//! describe a bird they saw. These are the nine attributes it asks about,
//! in tie-break order. Catalog columns use the same names.
//!
//! Any other domain follows the same pattern: build an [`AttributeSpec`]
//! from your own attribute names and pass it in an
//! [`IdentifyConfig`](crate::config::IdentifyConfig).
//!
//! ```rust
//! use ident_core::birds::{bird_attribute_spec, BIRD_ATTRIBUTES};
//!
//! let spec = bird_attribute_spec();
//! assert_eq!(spec.len(), BIRD_ATTRIBUTES.len());
//! assert_eq!(spec.iter().next(), Some("plumage_colour"));
//! ```

use crate::attribute::AttributeSpec;

/// Plumage colours, e.g. `"black, white"`.
pub const PLUMAGE_COLOUR: &str = "plumage_colour";
/// Beak colours.
pub const BEAK_COLOUR: &str = "beak_colour";
/// Feet colours.
pub const FEET_COLOUR: &str = "feet_colour";
/// Leg colours.
pub const LEG_COLOUR: &str = "leg_colour";
/// Primary beak shape, e.g. `"hooked"`.
pub const BEAK_SHAPE: &str = "beak_shape_1";
/// Primary tail shape, e.g. `"forked"`.
pub const TAIL_SHAPE: &str = "tail_shape_1";
/// Size band, e.g. `"small"`.
pub const SIZE: &str = "size";
/// Habitats, e.g. `"woodland, gardens"`.
pub const HABITAT: &str = "habitat";
/// Patterns and markings, e.g. `"spotted breast"`.
pub const PATTERN_MARKINGS: &str = "pattern_markings";

/// All bird attributes in question tie-break order.
pub const BIRD_ATTRIBUTES: [&str; 9] = [
    PLUMAGE_COLOUR,
    BEAK_COLOUR,
    FEET_COLOUR,
    LEG_COLOUR,
    BEAK_SHAPE,
    TAIL_SHAPE,
    SIZE,
    HABITAT,
    PATTERN_MARKINGS,
];

/// [`BIRD_ATTRIBUTES`] as an [`AttributeSpec`].
pub fn bird_attribute_spec() -> AttributeSpec {
    AttributeSpec::from_known(&BIRD_ATTRIBUTES)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bird_spec_has_every_attribute_once() {
        let spec = bird_attribute_spec();
        assert_eq!(spec.len(), 9);
        for name in BIRD_ATTRIBUTES {
            assert!(spec.contains(name), "{name} missing");
        }
        assert_eq!(spec.position(PATTERN_MARKINGS), Some(8));
    }
}
